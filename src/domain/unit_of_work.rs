//! Unit of work
//!
//! Scopes repository access to a single store transaction that is
//! committed when the work succeeds and rolled back otherwise.

use futures_util::future::BoxFuture;

use super::reservation::ReservationRepository;
use super::status_history::StatusHistoryRepository;
use super::DomainResult;

/// Repositories bound to one open transaction.
pub trait TransactionScope: Send + Sync {
    fn reservations(&self) -> &dyn ReservationRepository;
    fn status_history(&self) -> &dyn StatusHistoryRepository;
}

/// Opens transactions.
///
/// `work` receives the transactional scope and must not open a nested
/// transaction. Commit happens only when `work` returns `Ok`; an `Err`,
/// a timeout or a panic inside `work` leaves the store untouched.
pub trait UnitOfWork: Send + Sync {
    fn run_in_transaction<'a, T, F>(&'a self, work: F) -> BoxFuture<'a, DomainResult<T>>
    where
        T: Send + 'a,
        F: for<'t> FnOnce(&'t dyn TransactionScope) -> BoxFuture<'t, DomainResult<T>> + Send + 'a;
}
