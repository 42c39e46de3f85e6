//! Database entities module

pub mod reservation;
pub mod reservation_status_event;
pub mod room_lock;

pub use reservation::Entity as Reservation;
pub use reservation_status_event::Entity as ReservationStatusEvent;
pub use room_lock::Entity as RoomLock;
