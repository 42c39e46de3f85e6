//! SeaORM implementation of StatusHistoryRepository

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder, Set};
use tracing::debug;
use uuid::Uuid;

use crate::domain::status_history::{
    current_status, sort_chronologically, ReservationStatus, StatusEvent, StatusHistoryRepository,
};
use crate::domain::DomainResult;
use crate::infrastructure::database::entities::reservation_status_event;

pub struct SeaOrmStatusHistoryRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmStatusHistoryRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }
}

fn model_to_domain(m: reservation_status_event::Model) -> StatusEvent {
    StatusEvent {
        id: m.id,
        reservation_id: m.reservation_id,
        status: m.status.into(),
        reason: m.reason,
        changed_by: m.changed_by,
        changed_at: m.changed_at,
    }
}

/// All ledger events of the given reservations, oldest first.
pub(super) async fn load_events<C: ConnectionTrait>(
    conn: &C,
    reservation_ids: &[Uuid],
) -> DomainResult<Vec<StatusEvent>> {
    if reservation_ids.is_empty() {
        return Ok(Vec::new());
    }
    let models = reservation_status_event::Entity::find()
        .filter(reservation_status_event::Column::ReservationId.is_in(reservation_ids.iter().copied()))
        .order_by_asc(reservation_status_event::Column::ChangedAt)
        .order_by_asc(reservation_status_event::Column::Id)
        .all(conn)
        .await?;

    let mut events: Vec<StatusEvent> = models.into_iter().map(model_to_domain).collect();
    // Timestamps may be stored as text; settle the order on parsed values.
    sort_chronologically(&mut events);
    Ok(events)
}

#[async_trait]
impl<'c, C> StatusHistoryRepository for SeaOrmStatusHistoryRepository<'c, C>
where
    C: ConnectionTrait,
{
    async fn append(
        &self,
        reservation_id: Uuid,
        status: ReservationStatus,
        reason: &str,
        changed_by: &str,
    ) -> DomainResult<StatusEvent> {
        debug!(%reservation_id, %status, changed_by, "Appending status event");

        let model = reservation_status_event::ActiveModel {
            reservation_id: Set(reservation_id),
            status: Set(status.into()),
            reason: Set(reason.to_string()),
            changed_by: Set(changed_by.to_string()),
            changed_at: Set(Utc::now()),
            ..Default::default()
        };
        let inserted = model.insert(self.conn).await?;
        Ok(model_to_domain(inserted))
    }

    async fn current_status(&self, reservation_id: Uuid) -> DomainResult<Option<ReservationStatus>> {
        let events = load_events(self.conn, &[reservation_id]).await?;
        Ok(current_status(&events))
    }

    async fn history(&self, reservation_id: Uuid) -> DomainResult<Vec<StatusEvent>> {
        load_events(self.conn, &[reservation_id]).await
    }
}
