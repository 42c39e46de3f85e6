//! Booking use cases

pub mod commands;
pub mod engine;

pub use commands::{BookingDetails, BookingReceipt, CreateBooking, UpdateStatus};
pub use engine::{EngineConfig, ReservationEngine};
