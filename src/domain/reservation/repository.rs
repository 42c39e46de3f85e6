//! Reservation repository interface (the overlap repository)

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{NewReservation, Reservation, StayWindow};
use crate::domain::DomainResult;

#[async_trait]
pub trait ReservationRepository: Send + Sync {
    /// Reservations intersecting `window` whose current status is active
    /// (PENDING or CONFIRMED). Plain read, no locks.
    async fn period_overlaps(&self, window: &StayWindow) -> DomainResult<Vec<Reservation>>;

    /// Subset of `candidates` already booked under an active status for
    /// `window`, read with exclusive row locks held until the enclosing
    /// transaction ends. An empty candidate set yields an empty result.
    async fn locked_booked_room_ids(
        &self,
        candidates: &[Uuid],
        window: &StayWindow,
    ) -> DomainResult<Vec<Uuid>>;

    /// Single-row insert; the store assigns `id` and `created_at`.
    async fn insert(&self, reservation: NewReservation) -> DomainResult<Reservation>;

    /// Find reservation by ID
    async fn find_by_id(&self, id: Uuid) -> DomainResult<Option<Reservation>>;
}
