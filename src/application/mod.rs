//! Application layer - use cases orchestrating the domain

pub mod booking;

pub use booking::{
    BookingDetails, BookingReceipt, CreateBooking, EngineConfig, ReservationEngine, UpdateStatus,
};
