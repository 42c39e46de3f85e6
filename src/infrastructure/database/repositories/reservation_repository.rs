//! SeaORM implementation of ReservationRepository

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

use crate::domain::pricing::{from_minor_units, to_minor_units};
use crate::domain::reservation::{
    GuestContact, NewReservation, Reservation, ReservationRepository, StayWindow,
};
use crate::domain::status_history::current_status;
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{reservation, room_lock};

use super::status_history_repository::load_events;

/// Works against a pooled connection or an open transaction alike; the
/// locking read only holds its locks when `C` is a transaction.
pub struct SeaOrmReservationRepository<'c, C> {
    conn: &'c C,
}

impl<'c, C: ConnectionTrait> SeaOrmReservationRepository<'c, C> {
    pub fn new(conn: &'c C) -> Self {
        Self { conn }
    }

    /// Reservations on `rooms` (all rooms when `None`) whose window
    /// intersects `window`, optionally read `FOR UPDATE`.
    async fn overlapping(
        &self,
        rooms: Option<&[Uuid]>,
        window: &StayWindow,
        for_update: bool,
    ) -> DomainResult<Vec<reservation::Model>> {
        // [a,b) ∩ [c,d) ≠ ∅  ⇔  a < d ∧ c < b
        let mut query = reservation::Entity::find()
            .filter(reservation::Column::CheckIn.lt(window.check_out()))
            .filter(reservation::Column::CheckOut.gt(window.check_in()));
        if let Some(rooms) = rooms {
            query = query.filter(reservation::Column::RoomId.is_in(rooms.iter().copied()));
        }
        if for_update {
            query = query.lock_exclusive();
        }

        let models = query
            .order_by_asc(reservation::Column::CheckIn)
            .order_by_asc(reservation::Column::Id)
            .all(self.conn)
            .await?;
        Ok(models)
    }

    /// Keep only reservations whose latest ledger event is PENDING or CONFIRMED.
    async fn retain_active(
        &self,
        models: Vec<reservation::Model>,
    ) -> DomainResult<Vec<reservation::Model>> {
        if models.is_empty() {
            return Ok(models);
        }
        let ids: Vec<Uuid> = models.iter().map(|m| m.id).collect();
        let mut by_reservation: HashMap<Uuid, Vec<_>> = HashMap::new();
        for event in load_events(self.conn, &ids).await? {
            by_reservation
                .entry(event.reservation_id)
                .or_default()
                .push(event);
        }

        Ok(models
            .into_iter()
            .filter(|m| {
                by_reservation
                    .get(&m.id)
                    .and_then(|events| current_status(events))
                    .is_some_and(|status| status.is_active())
            })
            .collect())
    }

    /// Make sure a guard row exists for every candidate, then lock them in
    /// ascending room order so concurrent bookings cannot deadlock.
    async fn lock_rooms(&self, rooms: &BTreeSet<Uuid>) -> DomainResult<()> {
        let now = Utc::now();
        let guards = rooms.iter().map(|room_id| room_lock::ActiveModel {
            room_id: Set(*room_id),
            created_at: Set(now),
        });
        room_lock::Entity::insert_many(guards)
            .on_conflict(
                OnConflict::column(room_lock::Column::RoomId)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(self.conn)
            .await?;

        room_lock::Entity::find()
            .filter(room_lock::Column::RoomId.is_in(rooms.iter().copied()))
            .order_by_asc(room_lock::Column::RoomId)
            .lock_exclusive()
            .all(self.conn)
            .await?;
        Ok(())
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: reservation::Model) -> DomainResult<Reservation> {
    let window = StayWindow::new(m.check_in, m.check_out).map_err(|_| {
        DomainError::Internal(format!("stored reservation {} has an empty stay window", m.id))
    })?;
    Ok(Reservation {
        id: m.id,
        room_id: m.room_id,
        account_id: m.account_id,
        guest: GuestContact::new(m.guest_name, m.guest_email, m.guest_phone),
        window,
        total_price: from_minor_units(m.total_price_minor),
        created_at: m.created_at,
    })
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl<'c, C> ReservationRepository for SeaOrmReservationRepository<'c, C>
where
    C: ConnectionTrait,
{
    async fn period_overlaps(&self, window: &StayWindow) -> DomainResult<Vec<Reservation>> {
        let overlapping = self.overlapping(None, window, false).await?;
        self.retain_active(overlapping)
            .await?
            .into_iter()
            .map(model_to_domain)
            .collect()
    }

    async fn locked_booked_room_ids(
        &self,
        candidates: &[Uuid],
        window: &StayWindow,
    ) -> DomainResult<Vec<Uuid>> {
        if candidates.is_empty() {
            return Ok(Vec::new());
        }
        let rooms: BTreeSet<Uuid> = candidates.iter().copied().collect();
        self.lock_rooms(&rooms).await?;

        let rooms: Vec<Uuid> = rooms.into_iter().collect();
        let overlapping = self.overlapping(Some(&rooms), window, true).await?;
        let booked: BTreeSet<Uuid> = self
            .retain_active(overlapping)
            .await?
            .into_iter()
            .map(|m| m.room_id)
            .collect();

        debug!(
            candidates = rooms.len(),
            booked = booked.len(),
            "Locked booked rooms for stay window"
        );
        Ok(booked.into_iter().collect())
    }

    async fn insert(&self, r: NewReservation) -> DomainResult<Reservation> {
        let id = Uuid::new_v4();
        debug!(reservation_id = %id, room_id = %r.room_id, "Inserting reservation");

        let model = reservation::ActiveModel {
            id: Set(id),
            room_id: Set(r.room_id),
            account_id: Set(r.account_id),
            guest_name: Set(r.guest.name),
            guest_email: Set(r.guest.email),
            guest_phone: Set(r.guest.phone),
            check_in: Set(r.window.check_in()),
            check_out: Set(r.window.check_out()),
            total_price_minor: Set(to_minor_units(r.total_price)?),
            created_at: Set(Utc::now()),
        };
        let inserted = model.insert(self.conn).await?;
        model_to_domain(inserted)
    }

    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reservation>> {
        reservation::Entity::find_by_id(id)
            .one(self.conn)
            .await?
            .map(model_to_domain)
            .transpose()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::status_history::{ReservationStatus, StatusHistoryRepository};
    use crate::infrastructure::database::repositories::SeaOrmStatusHistoryRepository;
    use crate::infrastructure::database::test_support::memory_db;
    use chrono::{DateTime, TimeZone};
    use rust_decimal::Decimal;
    use sea_orm::DatabaseConnection;

    fn day(d: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 7, d, 14, 0, 0).unwrap()
    }

    fn window(from: u32, to: u32) -> StayWindow {
        StayWindow::new(day(from), day(to)).unwrap()
    }

    async fn book(
        db: &DatabaseConnection,
        room_id: Uuid,
        stay: StayWindow,
        status: ReservationStatus,
    ) -> Reservation {
        let reservations = SeaOrmReservationRepository::new(db);
        let ledger = SeaOrmStatusHistoryRepository::new(db);
        let created = reservations
            .insert(NewReservation {
                room_id,
                account_id: None,
                guest: GuestContact::new("Ann", "ann@example.com", "555-0100"),
                window: stay,
                total_price: Decimal::new(24000, 2),
            })
            .await
            .unwrap();
        ledger
            .append(created.id, ReservationStatus::Pending, "initial booking creation", "system")
            .await
            .unwrap();
        if status != ReservationStatus::Pending {
            ledger.append(created.id, status, "test", "tester").await.unwrap();
        }
        created
    }

    #[tokio::test]
    async fn insert_assigns_id_and_round_trips_price() {
        let db = memory_db().await;
        let repo = SeaOrmReservationRepository::new(&db);
        let room = Uuid::new_v4();

        let created = book(&db, room, window(1, 3), ReservationStatus::Pending).await;
        let loaded = repo.find_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(loaded.room_id, room);
        assert_eq!(loaded.total_price, Decimal::new(24000, 2));
        assert_eq!(loaded.window, window(1, 3));
        assert!(repo.find_by_id(Uuid::new_v4()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn overlaps_ignore_inactive_and_adjacent_stays() {
        let db = memory_db().await;
        let repo = SeaOrmReservationRepository::new(&db);

        let pending = book(&db, Uuid::new_v4(), window(2, 5), ReservationStatus::Pending).await;
        let confirmed = book(&db, Uuid::new_v4(), window(4, 8), ReservationStatus::Confirmed).await;
        book(&db, Uuid::new_v4(), window(3, 6), ReservationStatus::Cancelled).await;
        book(&db, Uuid::new_v4(), window(3, 6), ReservationStatus::NoShow).await;
        // Checks out exactly when the query window starts
        book(&db, Uuid::new_v4(), window(1, 4), ReservationStatus::Confirmed).await;

        let found = repo.period_overlaps(&window(4, 6)).await.unwrap();
        let ids: Vec<Uuid> = found.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![pending.id, confirmed.id]);

        // Plain read, repeatable without intervening writes
        let again = repo.period_overlaps(&window(4, 6)).await.unwrap();
        assert_eq!(found, again);
    }

    #[tokio::test]
    async fn locked_booked_room_ids_is_restricted_to_candidates() {
        let db = memory_db().await;
        let repo = SeaOrmReservationRepository::new(&db);
        let (a, b, c) = (Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4());

        book(&db, a, window(10, 12), ReservationStatus::Pending).await;
        book(&db, b, window(10, 12), ReservationStatus::Cancelled).await;
        book(&db, c, window(10, 12), ReservationStatus::Confirmed).await;

        let booked = repo
            .locked_booked_room_ids(&[a, b], &window(11, 13))
            .await
            .unwrap();
        assert_eq!(booked, vec![a]);

        let none = repo
            .locked_booked_room_ids(&[a, b, c], &window(12, 14))
            .await
            .unwrap();
        assert!(none.is_empty());
    }

    #[tokio::test]
    async fn empty_candidate_set_touches_nothing() {
        let db = memory_db().await;
        let repo = SeaOrmReservationRepository::new(&db);

        let booked = repo.locked_booked_room_ids(&[], &window(1, 2)).await.unwrap();
        assert!(booked.is_empty());
        let guards = room_lock::Entity::find().all(&db).await.unwrap();
        assert!(guards.is_empty());
    }

    #[tokio::test]
    async fn guard_rows_are_created_once_per_room() {
        let db = memory_db().await;
        let repo = SeaOrmReservationRepository::new(&db);
        let room = Uuid::new_v4();

        repo.locked_booked_room_ids(&[room, room], &window(1, 2)).await.unwrap();
        repo.locked_booked_room_ids(&[room], &window(3, 4)).await.unwrap();

        let guards = room_lock::Entity::find().all(&db).await.unwrap();
        assert_eq!(guards.len(), 1);
        assert_eq!(guards[0].room_id, room);
    }
}
