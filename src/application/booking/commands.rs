//! Booking commands and results

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::domain::reservation::{GuestContact, Reservation, StayWindow};
use crate::domain::room::RoomType;
use crate::domain::status_history::ReservationStatus;
use crate::domain::{DomainError, DomainResult};

/// Actor recorded on events the engine writes itself
pub const SYSTEM_ACTOR: &str = "system";

/// Reason recorded on the PENDING event written with every new reservation
pub const INITIAL_REASON: &str = "initial booking creation";

/// Request to book any room matching the criteria for a stay.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub guest: GuestContact,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub room_type: Option<RoomType>,
    /// Minimum room capacity
    pub capacity: Option<u32>,
    /// Authenticated account, `None` for guest bookings
    pub account_id: Option<Uuid>,
}

impl CreateBooking {
    /// Preconditions checked before any I/O.
    pub fn validate(&self) -> DomainResult<StayWindow> {
        self.guest.validate()?;
        StayWindow::new(self.check_in, self.check_out)
    }
}

/// Append a status transition to a reservation's ledger.
#[derive(Debug, Clone)]
pub struct UpdateStatus {
    pub reservation_id: Uuid,
    pub status: ReservationStatus,
    pub reason: String,
    pub changed_by: String,
}

impl UpdateStatus {
    pub fn validate(&self) -> DomainResult<()> {
        if self.changed_by.trim().is_empty() {
            return Err(DomainError::Validation("actor is required".into()));
        }
        Ok(())
    }
}

/// Outcome of a successful CreateBooking
#[derive(Debug, Clone, PartialEq)]
pub struct BookingReceipt {
    pub reservation_id: Uuid,
    pub room_id: Uuid,
    pub total_price: Decimal,
    pub current_status: ReservationStatus,
}

/// Reservation together with its projected status
#[derive(Debug, Clone, PartialEq)]
pub struct BookingDetails {
    pub reservation: Reservation,
    pub current_status: ReservationStatus,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn command(name: &str, email: &str, nights: i64) -> CreateBooking {
        let check_in = Utc::now();
        CreateBooking {
            guest: GuestContact::new(name, email, ""),
            check_in,
            check_out: check_in + Duration::days(nights),
            room_type: None,
            capacity: None,
            account_id: None,
        }
    }

    #[test]
    fn valid_command_yields_its_window() {
        let cmd = command("Ann", "ann@example.com", 2);
        let window = cmd.validate().unwrap();
        assert_eq!(window.check_in(), cmd.check_in);
        assert_eq!(window.check_out(), cmd.check_out);
    }

    #[test]
    fn guest_checks_run_before_window_checks() {
        let err = command("", "ann@example.com", 0).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("name")));

        let err = command("Ann", "ann@example.com", 0).validate().unwrap_err();
        assert!(matches!(err, DomainError::Validation(ref m) if m.contains("check-out")));
    }

    #[test]
    fn status_update_needs_an_actor() {
        let cmd = UpdateStatus {
            reservation_id: Uuid::new_v4(),
            status: ReservationStatus::Confirmed,
            reason: String::new(),
            changed_by: " ".into(),
        };
        assert!(cmd.validate().is_err());
    }
}
