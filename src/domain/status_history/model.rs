//! Reservation status and the append-only status event

use std::str::FromStr;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::DomainError;

/// Reservation lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Created, awaiting confirmation
    Pending,
    Confirmed,
    Cancelled,
    /// Guest checked out
    Completed,
    NoShow,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 5] = [
        Self::Pending,
        Self::Confirmed,
        Self::Cancelled,
        Self::Completed,
        Self::NoShow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Cancelled => "CANCELLED",
            Self::Completed => "COMPLETED",
            Self::NoShow => "NO_SHOW",
        }
    }

    /// Only active reservations block a room.
    pub fn is_active(&self) -> bool {
        matches!(self, Self::Pending | Self::Confirmed)
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| DomainError::Validation(format!("invalid booking status: {s}")))
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One entry of the status ledger
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusEvent {
    /// Store-assigned, monotonically increasing
    pub id: i64,
    pub reservation_id: Uuid,
    pub status: ReservationStatus,
    pub reason: String,
    /// Who changed it ("system", a username, ...)
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
}

impl StatusEvent {
    fn order_key(&self) -> (DateTime<Utc>, i64) {
        (self.changed_at, self.id)
    }
}

/// Status of the most recent event, by timestamp then event ID.
///
/// Independent of the order in which events are supplied.
pub fn current_status<'a, I>(events: I) -> Option<ReservationStatus>
where
    I: IntoIterator<Item = &'a StatusEvent>,
{
    events
        .into_iter()
        .max_by_key(|event| event.order_key())
        .map(|event| event.status)
}

/// Sort events into ledger order (oldest first).
pub fn sort_chronologically(events: &mut [StatusEvent]) {
    events.sort_by_key(StatusEvent::order_key);
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn event(id: i64, status: ReservationStatus, at: DateTime<Utc>) -> StatusEvent {
        StatusEvent {
            id,
            reservation_id: Uuid::nil(),
            status,
            reason: String::new(),
            changed_by: "system".into(),
            changed_at: at,
        }
    }

    #[test]
    fn latest_event_wins_regardless_of_input_order() {
        let t1 = Utc::now();
        let t2 = t1 + Duration::minutes(5);
        let t3 = t2 + Duration::minutes(5);
        let pending = event(1, ReservationStatus::Pending, t1);
        let confirmed = event(2, ReservationStatus::Confirmed, t2);
        let cancelled = event(3, ReservationStatus::Cancelled, t3);

        let orders = [
            vec![&pending, &confirmed, &cancelled],
            vec![&cancelled, &pending, &confirmed],
            vec![&confirmed, &cancelled, &pending],
        ];
        for events in orders {
            assert_eq!(
                current_status(events),
                Some(ReservationStatus::Cancelled)
            );
        }
    }

    #[test]
    fn equal_timestamps_fall_back_to_event_id() {
        let at = Utc::now();
        let events = [
            event(8, ReservationStatus::Confirmed, at),
            event(7, ReservationStatus::Pending, at),
        ];
        assert_eq!(current_status(&events), Some(ReservationStatus::Confirmed));
    }

    #[test]
    fn no_events_means_no_status() {
        assert_eq!(current_status(&[] as &[StatusEvent]), None);
    }

    #[test]
    fn sorting_restores_ledger_order() {
        let at = Utc::now();
        let mut events = vec![
            event(3, ReservationStatus::Completed, at + Duration::hours(2)),
            event(1, ReservationStatus::Pending, at),
            event(2, ReservationStatus::Confirmed, at + Duration::hours(1)),
        ];
        sort_chronologically(&mut events);
        let ids: Vec<i64> = events.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn only_pending_and_confirmed_are_active() {
        let active: Vec<_> = ReservationStatus::ALL
            .into_iter()
            .filter(ReservationStatus::is_active)
            .collect();
        assert_eq!(
            active,
            vec![ReservationStatus::Pending, ReservationStatus::Confirmed]
        );
    }

    #[test]
    fn status_wire_names_round_trip() {
        for status in ReservationStatus::ALL {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
        assert_eq!(
            "no_show".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::NoShow
        );
        assert!("ARCHIVED".parse::<ReservationStatus>().is_err());
    }
}
