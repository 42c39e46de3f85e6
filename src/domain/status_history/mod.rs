//! Reservation status ledger
//!
//! Status is never stored on the reservation itself; it is projected from
//! the most recent ledger event.

pub mod model;
pub mod repository;

pub use model::{current_status, sort_chronologically, ReservationStatus, StatusEvent};
pub use repository::StatusHistoryRepository;
