//! Database repository implementations
//!
//! Per-aggregate SeaORM repositories plus the transactional unit of work.

pub mod reservation_repository;
pub mod status_history_repository;
pub mod unit_of_work;

pub use reservation_repository::SeaOrmReservationRepository;
pub use status_history_repository::SeaOrmStatusHistoryRepository;
pub use unit_of_work::{SeaOrmTransactionScope, SeaOrmUnitOfWork};
