//! SeaORM unit of work
//!
//! Each unit of work owns one `DatabaseTransaction`. Repositories handed to
//! the work closure borrow that transaction, so every read and write it
//! performs commits or rolls back together.

use std::time::Duration;

use futures_util::future::BoxFuture;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionTrait};
use tracing::{debug, warn};

use crate::domain::reservation::ReservationRepository;
use crate::domain::status_history::StatusHistoryRepository;
use crate::domain::unit_of_work::{TransactionScope, UnitOfWork};
use crate::domain::{DomainError, DomainResult};

use super::reservation_repository::SeaOrmReservationRepository;
use super::status_history_repository::SeaOrmStatusHistoryRepository;

/// Repositories bound to one open transaction.
pub struct SeaOrmTransactionScope<'t> {
    reservations: SeaOrmReservationRepository<'t, DatabaseTransaction>,
    status_history: SeaOrmStatusHistoryRepository<'t, DatabaseTransaction>,
}

impl<'t> SeaOrmTransactionScope<'t> {
    pub fn new(txn: &'t DatabaseTransaction) -> Self {
        Self {
            reservations: SeaOrmReservationRepository::new(txn),
            status_history: SeaOrmStatusHistoryRepository::new(txn),
        }
    }
}

impl TransactionScope for SeaOrmTransactionScope<'_> {
    fn reservations(&self) -> &dyn ReservationRepository {
        &self.reservations
    }

    fn status_history(&self) -> &dyn StatusHistoryRepository {
        &self.status_history
    }
}

/// Transaction runner over the shared connection pool.
///
/// Every transaction carries a deadline so a stalled request cannot hold
/// row locks indefinitely.
#[derive(Clone)]
pub struct SeaOrmUnitOfWork {
    db: DatabaseConnection,
    transaction_timeout: Duration,
}

impl SeaOrmUnitOfWork {
    pub fn new(db: DatabaseConnection, transaction_timeout: Duration) -> Self {
        Self {
            db,
            transaction_timeout,
        }
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }
}

async fn rollback(txn: DatabaseTransaction) {
    if let Err(e) = txn.rollback().await {
        warn!("⚠️ Transaction rollback failed: {}", e);
    }
}

impl UnitOfWork for SeaOrmUnitOfWork {
    fn run_in_transaction<'a, T, F>(&'a self, work: F) -> BoxFuture<'a, DomainResult<T>>
    where
        T: Send + 'a,
        F: for<'t> FnOnce(&'t dyn TransactionScope) -> BoxFuture<'t, DomainResult<T>> + Send + 'a,
    {
        Box::pin(async move {
            let txn = self.db.begin().await?;

            // Dropping an open DatabaseTransaction rolls it back, which
            // covers a panic inside `work`.
            let outcome = {
                let scope = SeaOrmTransactionScope::new(&txn);
                let scope: &dyn TransactionScope = &scope;
                tokio::time::timeout(self.transaction_timeout, work(scope)).await
            };

            match outcome {
                Ok(Ok(value)) => {
                    txn.commit().await?;
                    debug!("Transaction committed");
                    Ok(value)
                }
                Ok(Err(e)) => {
                    debug!(error = %e, "Rolling back transaction");
                    rollback(txn).await;
                    Err(e)
                }
                Err(_) => {
                    warn!(
                        timeout_ms = self.transaction_timeout.as_millis() as u64,
                        "⏱️ Transaction deadline exceeded, rolling back"
                    );
                    rollback(txn).await;
                    Err(DomainError::Internal(format!(
                        "transaction exceeded {} ms deadline",
                        self.transaction_timeout.as_millis()
                    )))
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::reservation::{GuestContact, NewReservation, StayWindow};
    use crate::domain::status_history::ReservationStatus;
    use crate::infrastructure::database::entities::{reservation, reservation_status_event};
    use crate::infrastructure::database::test_support::memory_db;
    use chrono::{Duration as ChronoDuration, Utc};
    use rust_decimal::Decimal;
    use sea_orm::{EntityTrait, PaginatorTrait};
    use uuid::Uuid;

    fn new_reservation() -> NewReservation {
        let check_in = Utc::now() + ChronoDuration::days(1);
        NewReservation {
            room_id: Uuid::new_v4(),
            account_id: None,
            guest: GuestContact::new("Cy", "cy@example.com", ""),
            window: StayWindow::new(check_in, check_in + ChronoDuration::days(1)).unwrap(),
            total_price: Decimal::new(9900, 2),
        }
    }

    async fn counts(db: &DatabaseConnection) -> (u64, u64) {
        (
            reservation::Entity::find().count(db).await.unwrap(),
            reservation_status_event::Entity::find().count(db).await.unwrap(),
        )
    }

    #[tokio::test]
    async fn commits_when_work_succeeds() {
        let db = memory_db().await;
        let uow = SeaOrmUnitOfWork::new(db.clone(), Duration::from_secs(5));

        let id = uow
            .run_in_transaction(|scope| {
                Box::pin(async move {
                    let created = scope.reservations().insert(new_reservation()).await?;
                    scope
                        .status_history()
                        .append(created.id, ReservationStatus::Pending, "", "system")
                        .await?;
                    Ok(created.id)
                })
            })
            .await
            .unwrap();

        assert_eq!(counts(&db).await, (1, 1));
        assert!(reservation::Entity::find_by_id(id).one(&db).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn rolls_back_when_work_fails() {
        let db = memory_db().await;
        let uow = SeaOrmUnitOfWork::new(db.clone(), Duration::from_secs(5));

        let result: DomainResult<()> = uow
            .run_in_transaction(|scope| {
                Box::pin(async move {
                    scope.reservations().insert(new_reservation()).await?;
                    Err(DomainError::Conflict("late failure".into()))
                })
            })
            .await;

        assert!(matches!(result, Err(DomainError::Conflict(_))));
        assert_eq!(counts(&db).await, (0, 0));
    }

    #[tokio::test]
    async fn rolls_back_when_deadline_expires() {
        let db = memory_db().await;
        let uow = SeaOrmUnitOfWork::new(db.clone(), Duration::from_millis(50));

        let result: DomainResult<()> = uow
            .run_in_transaction(|scope| {
                Box::pin(async move {
                    scope.reservations().insert(new_reservation()).await?;
                    tokio::time::sleep(Duration::from_secs(2)).await;
                    Ok(())
                })
            })
            .await;

        assert!(matches!(result, Err(DomainError::Internal(_))));
        assert_eq!(counts(&db).await, (0, 0));
    }
}
