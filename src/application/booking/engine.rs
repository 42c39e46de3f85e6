//! Reservation engine
//!
//! CreateBooking protocol:
//! 1. validate the request (no I/O on failure)
//! 2. look up AVAILABLE candidate rooms, outside any transaction
//! 3. in one unit of work: lock the candidates and read which are booked,
//!    pick the lowest free room ID, fetch its rate, price the stay, insert
//!    the reservation and its PENDING ledger event
//!
//! Mutual exclusion comes entirely from the store's row locks taken in
//! step 3; the engine keeps no shared in-memory state.

use std::collections::BTreeSet;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::time::Instant;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::commands::{
    BookingDetails, BookingReceipt, CreateBooking, UpdateStatus, INITIAL_REASON, SYSTEM_ACTOR,
};
use crate::domain::pricing;
use crate::domain::reservation::{GuestContact, NewReservation, Reservation, StayWindow};
use crate::domain::room::{InventoryClient, RoomStatus, RoomSummary, SearchCriteria};
use crate::domain::status_history::{ReservationStatus, StatusEvent};
use crate::domain::unit_of_work::{TransactionScope, UnitOfWork};
use crate::domain::{DomainError, DomainResult};

/// About thirty years; stands in for "no deadline".
const FAR_FUTURE: Duration = Duration::from_secs(86_400 * 365 * 30);

/// Engine tuning
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Default time budget for inventory calls made on behalf of one request
    pub upstream_deadline: Duration,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            upstream_deadline: Duration::from_secs(3),
        }
    }
}

pub struct ReservationEngine<U> {
    uow: U,
    inventory: Arc<dyn InventoryClient>,
    config: EngineConfig,
}

/// Everything the transactional part of CreateBooking needs, owned so it
/// can move into the unit of work.
struct PlannedBooking {
    guest: GuestContact,
    account_id: Option<Uuid>,
    window: StayWindow,
    candidates: Vec<Uuid>,
    deadline: Instant,
}

impl<U: UnitOfWork> ReservationEngine<U> {
    pub fn new(uow: U, inventory: Arc<dyn InventoryClient>, config: EngineConfig) -> Self {
        Self {
            uow,
            inventory,
            config,
        }
    }

    /// Book a room using the configured upstream deadline.
    pub async fn create_booking(&self, cmd: CreateBooking) -> DomainResult<BookingReceipt> {
        self.create_booking_within(cmd, self.config.upstream_deadline)
            .await
    }

    /// Book a room; both inventory calls must finish within `budget` of
    /// the request start.
    pub async fn create_booking_within(
        &self,
        cmd: CreateBooking,
        budget: Duration,
    ) -> DomainResult<BookingReceipt> {
        let started = std::time::Instant::now();
        let result = self.book(cmd, deadline_after(budget)).await;
        metrics::histogram!("booking_create_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(receipt) => {
                metrics::counter!("bookings_created_total").increment(1);
                info!(
                    reservation_id = %receipt.reservation_id,
                    room_id = %receipt.room_id,
                    total_price = %receipt.total_price,
                    "✅ Booking created"
                );
            }
            Err(e) => {
                metrics::counter!("bookings_rejected_total", "reason" => e.code()).increment(1);
                match e {
                    DomainError::Internal(_) | DomainError::UpstreamUnavailable(_) => {
                        warn!(error = %e, "❌ Booking failed")
                    }
                    _ => debug!(error = %e, "Booking rejected"),
                }
            }
        }
        result
    }

    async fn book(&self, cmd: CreateBooking, deadline: Instant) -> DomainResult<BookingReceipt> {
        let window = cmd.validate()?;

        let criteria =
            SearchCriteria::new(cmd.room_type, cmd.capacity).with_status(RoomStatus::Available);
        let rooms = within_deadline(
            deadline,
            "room lookup",
            self.inventory.find_by_criteria(&criteria),
        )
        .await?;
        let candidates: Vec<Uuid> = rooms.iter().map(|room| room.id).collect();
        debug!(candidates = candidates.len(), "Candidate rooms fetched");

        let inventory = Arc::clone(&self.inventory);
        let plan = PlannedBooking {
            guest: cmd.guest,
            account_id: cmd.account_id,
            window,
            candidates,
            deadline,
        };
        self.uow
            .run_in_transaction(move |scope| {
                Box::pin(async move { reserve(scope, inventory.as_ref(), plan).await })
            })
            .await
    }

    /// Append a status transition, after checking the reservation exists.
    pub async fn update_status(&self, cmd: UpdateStatus) -> DomainResult<StatusEvent> {
        cmd.validate()?;
        let status = cmd.status;

        let event = self
            .uow
            .run_in_transaction(move |scope| {
                Box::pin(async move {
                    ensure_exists(scope, cmd.reservation_id).await?;
                    scope
                        .status_history()
                        .append(cmd.reservation_id, cmd.status, &cmd.reason, &cmd.changed_by)
                        .await
                })
            })
            .await?;

        metrics::counter!("booking_status_updates_total", "status" => status.as_str())
            .increment(1);
        info!(
            reservation_id = %event.reservation_id,
            status = %event.status,
            changed_by = %event.changed_by,
            "📝 Reservation status changed"
        );
        Ok(event)
    }

    /// Rooms matching `criteria` that have no active reservation
    /// overlapping the stay. Unlocked read; the answer may be stale by the
    /// time a booking is attempted.
    pub async fn available_rooms(
        &self,
        criteria: SearchCriteria,
        check_in: DateTime<Utc>,
        check_out: DateTime<Utc>,
    ) -> DomainResult<Vec<RoomSummary>> {
        let window = StayWindow::new(check_in, check_out)?;
        let criteria = match criteria.status {
            Some(_) => criteria,
            None => criteria.with_status(RoomStatus::Available),
        };

        let deadline = Instant::now() + self.config.upstream_deadline;
        let rooms = within_deadline(
            deadline,
            "room lookup",
            self.inventory.find_by_criteria(&criteria),
        )
        .await?;

        let overlapping = self
            .uow
            .run_in_transaction(move |scope| {
                Box::pin(async move { scope.reservations().period_overlaps(&window).await })
            })
            .await?;
        let booked: BTreeSet<Uuid> = overlapping.iter().map(|r| r.room_id).collect();

        Ok(rooms
            .into_iter()
            .filter(|room| !booked.contains(&room.id))
            .collect())
    }

    /// Reservation with its current status.
    pub async fn booking(&self, reservation_id: Uuid) -> DomainResult<BookingDetails> {
        self.uow
            .run_in_transaction(move |scope| {
                Box::pin(async move {
                    let reservation = ensure_exists(scope, reservation_id).await?;
                    let current_status = scope
                        .status_history()
                        .current_status(reservation_id)
                        .await?
                        .ok_or_else(|| {
                            DomainError::Internal(format!(
                                "reservation {reservation_id} has no status history"
                            ))
                        })?;
                    Ok(BookingDetails {
                        reservation,
                        current_status,
                    })
                })
            })
            .await
    }

    /// Every status event of a reservation, oldest first.
    pub async fn status_history(&self, reservation_id: Uuid) -> DomainResult<Vec<StatusEvent>> {
        self.uow
            .run_in_transaction(move |scope| {
                Box::pin(async move {
                    ensure_exists(scope, reservation_id).await?;
                    scope.status_history().history(reservation_id).await
                })
            })
            .await
    }
}

// ── Transactional steps ─────────────────────────────────────────

async fn reserve(
    scope: &dyn TransactionScope,
    inventory: &dyn InventoryClient,
    plan: PlannedBooking,
) -> DomainResult<BookingReceipt> {
    let booked = scope
        .reservations()
        .locked_booked_room_ids(&plan.candidates, &plan.window)
        .await?;
    let room_id = select_room(&plan.candidates, &booked).ok_or(DomainError::NoRoomsAvailable)?;
    debug!(%room_id, booked = booked.len(), "Room selected");

    let room = within_deadline(plan.deadline, "room details", inventory.get_room(room_id))
        .await
        .map_err(|e| match e {
            DomainError::NotFound { .. } => {
                DomainError::Internal(format!("room {room_id} vanished from inventory"))
            }
            other => other,
        })?;
    let total_price = pricing::price(
        room.nightly_rate,
        plan.window.check_in(),
        plan.window.check_out(),
    )?;

    let reservation = scope
        .reservations()
        .insert(NewReservation {
            room_id,
            account_id: plan.account_id,
            guest: plan.guest,
            window: plan.window,
            total_price,
        })
        .await?;
    let event = scope
        .status_history()
        .append(
            reservation.id,
            ReservationStatus::Pending,
            INITIAL_REASON,
            SYSTEM_ACTOR,
        )
        .await?;

    Ok(BookingReceipt {
        reservation_id: reservation.id,
        room_id: reservation.room_id,
        total_price: reservation.total_price,
        current_status: event.status,
    })
}

async fn ensure_exists(
    scope: &dyn TransactionScope,
    reservation_id: Uuid,
) -> DomainResult<Reservation> {
    scope
        .reservations()
        .find_by_id(reservation_id)
        .await?
        .ok_or_else(|| DomainError::not_found("Reservation", "id", reservation_id))
}

/// Lowest candidate ID that is not booked.
fn select_room(candidates: &[Uuid], booked: &[Uuid]) -> Option<Uuid> {
    let booked: BTreeSet<&Uuid> = booked.iter().collect();
    candidates
        .iter()
        .filter(|id| !booked.contains(id))
        .min()
        .copied()
}

/// `now + budget`, saturating at a far-future instant for budgets too
/// large to represent.
fn deadline_after(budget: Duration) -> Instant {
    let now = Instant::now();
    now.checked_add(budget).unwrap_or_else(|| now + FAR_FUTURE)
}

async fn within_deadline<T>(
    deadline: Instant,
    what: &str,
    call: impl Future<Output = DomainResult<T>>,
) -> DomainResult<T> {
    tokio::time::timeout_at(deadline, call)
        .await
        .map_err(|_| DomainError::UpstreamUnavailable(format!("{what} exceeded its deadline")))?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn selects_lowest_free_id() {
        let ids: Vec<Uuid> = (1..=4).map(Uuid::from_u128).collect();
        assert_eq!(select_room(&ids, &[]), Some(ids[0]));
        assert_eq!(select_room(&ids, &[ids[0], ids[2]]), Some(ids[1]));

        let reversed: Vec<Uuid> = ids.iter().rev().copied().collect();
        assert_eq!(select_room(&reversed, &[ids[0]]), Some(ids[1]));
    }

    #[test]
    fn nothing_to_select_when_everything_is_booked() {
        let ids: Vec<Uuid> = (1..=2).map(Uuid::from_u128).collect();
        assert_eq!(select_room(&ids, &ids), None);
        assert_eq!(select_room(&[], &[]), None);
    }

    #[test]
    fn oversized_budgets_saturate() {
        let deadline = deadline_after(Duration::MAX);
        assert!(deadline > Instant::now() + Duration::from_secs(86_400 * 365));
    }

    #[tokio::test]
    async fn slow_calls_miss_the_deadline() {
        let deadline = Instant::now() + Duration::from_millis(20);
        let result: DomainResult<()> = within_deadline(deadline, "room lookup", async {
            tokio::time::sleep(Duration::from_secs(1)).await;
            Ok(())
        })
        .await;
        assert!(matches!(result, Err(DomainError::UpstreamUnavailable(_))));
    }
}
