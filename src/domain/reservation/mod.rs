//! Reservation aggregate
//!
//! Contains the Reservation entity, its stay window, and the overlap repository interface.

pub mod model;
pub mod repository;

pub use model::{GuestContact, NewReservation, Reservation, StayWindow};
pub use repository::ReservationRepository;
