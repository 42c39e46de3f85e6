//! Reservation domain entity

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::{DomainError, DomainResult};

/// Half-open stay interval `[check_in, check_out)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StayWindow {
    check_in: DateTime<Utc>,
    check_out: DateTime<Utc>,
}

impl StayWindow {
    /// Check-out must be strictly after check-in.
    pub fn new(check_in: DateTime<Utc>, check_out: DateTime<Utc>) -> DomainResult<Self> {
        if check_out <= check_in {
            return Err(DomainError::Validation(
                "check-out must be after check-in".into(),
            ));
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    pub fn check_in(&self) -> DateTime<Utc> {
        self.check_in
    }

    pub fn check_out(&self) -> DateTime<Utc> {
        self.check_out
    }

    /// `[a,b)` and `[c,d)` intersect iff `a < d && c < b`, so a check-out on
    /// day X does not collide with a check-in on day X.
    pub fn overlaps(&self, other: &StayWindow) -> bool {
        self.check_in < other.check_out && other.check_in < self.check_out
    }
}

/// Guest contact details captured with the booking
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GuestContact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

impl GuestContact {
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
        }
    }

    pub fn validate(&self) -> DomainResult<()> {
        if self.name.trim().is_empty() {
            return Err(DomainError::Validation("guest name is required".into()));
        }
        if self.email.trim().is_empty() {
            return Err(DomainError::Validation("guest email is required".into()));
        }
        if !self.email.contains('@') {
            return Err(DomainError::Validation("invalid email format".into()));
        }
        Ok(())
    }
}

/// Reservation about to be inserted; the store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewReservation {
    pub room_id: Uuid,
    /// `None` for guest (anonymous) bookings
    pub account_id: Option<Uuid>,
    pub guest: GuestContact,
    pub window: StayWindow,
    pub total_price: Decimal,
}

/// Persisted reservation.
///
/// Immutable once written: status lives in the append-only history ledger.
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: Uuid,
    pub room_id: Uuid,
    pub account_id: Option<Uuid>,
    pub guest: GuestContact,
    pub window: StayWindow,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
}

// ── Tests ──────────────────────────────────────────────────────
