//! Status history ledger interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{ReservationStatus, StatusEvent};
use crate::domain::DomainResult;

/// Append-only ledger of reservation status transitions.
///
/// There is intentionally no update or delete primitive.
#[async_trait]
pub trait StatusHistoryRepository: Send + Sync {
    /// Record a transition; the store assigns `id` and `changed_at`.
    async fn append(
        &self,
        reservation_id: Uuid,
        status: ReservationStatus,
        reason: &str,
        changed_by: &str,
    ) -> DomainResult<StatusEvent>;

    /// Status of the latest event, `None` if the reservation has no history.
    async fn current_status(&self, reservation_id: Uuid) -> DomainResult<Option<ReservationStatus>>;

    /// All events, oldest first
    async fn history(&self, reservation_id: Uuid) -> DomainResult<Vec<StatusEvent>>;
}
