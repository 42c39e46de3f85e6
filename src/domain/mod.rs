pub mod pricing;
pub mod reservation;
pub mod room;
pub mod status_history;
pub mod unit_of_work;

// Re-export commonly used types
pub use reservation::{GuestContact, NewReservation, Reservation, ReservationRepository, StayWindow};
pub use room::{InventoryClient, RoomStatus, RoomSummary, RoomType, SearchCriteria};
pub use status_history::{ReservationStatus, StatusEvent, StatusHistoryRepository};
pub use unit_of_work::{TransactionScope, UnitOfWork};

// Re-export DomainError from support for convenience
pub use crate::support::errors::{DomainError, DomainResult};
