//! Booking DTOs

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::application::{BookingDetails, BookingReceipt};
use crate::domain::room::{RoomSummary, RoomType};
use crate::domain::status_history::StatusEvent;
use crate::domain::{DomainError, DomainResult};

/// Accepts a calendar date (`2025-06-01`, midnight UTC) or an RFC 3339 instant.
pub fn parse_instant(field: &str, raw: &str) -> DomainResult<DateTime<Utc>> {
    let raw = raw.trim();
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(midnight.and_utc());
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|_| DomainError::Validation(format!("invalid {field} date format")))
}

pub fn parse_room_type(raw: Option<&str>) -> DomainResult<Option<RoomType>> {
    raw.map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::parse)
        .transpose()
}

/// Query of `GET /api/v1/bookings/available-rooms`
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailableRoomsQuery {
    /// Check-in date (YYYY-MM-DD) or instant (RFC 3339)
    pub check_in: String,
    /// Check-out date (YYYY-MM-DD) or instant (RFC 3339)
    pub check_out: String,
    /// Minimum room capacity
    pub capacity: Option<u32>,
    /// STANDARD, DELUXE or SUITE
    #[serde(rename = "type")]
    pub room_type: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AvailableRoomDto {
    pub id: Uuid,
    pub room_number: String,
    #[serde(rename = "type")]
    pub room_type: String,
    /// Nightly rate as a decimal string
    pub price: String,
    pub capacity: u32,
}

impl From<RoomSummary> for AvailableRoomDto {
    fn from(room: RoomSummary) -> Self {
        Self {
            id: room.id,
            room_number: room.number,
            room_type: room.room_type.to_string(),
            price: room.nightly_rate.to_string(),
            capacity: room.capacity,
        }
    }
}

/// Request body of `POST /api/v1/bookings`
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookingRequest {
    #[validate(length(max = 200, message = "must be at most 200 characters"))]
    pub guest_name: String,
    #[validate(length(max = 254, message = "must be at most 254 characters"))]
    pub guest_email: String,
    #[serde(default)]
    #[validate(length(max = 32, message = "must be at most 32 characters"))]
    pub guest_phone: String,
    /// Check-in date or RFC 3339 instant
    pub check_in: String,
    /// Check-out date or RFC 3339 instant
    pub check_out: String,
    #[serde(default)]
    pub room_type: Option<String>,
    #[serde(default)]
    #[validate(range(min = 1, max = 50, message = "capacity must be positive"))]
    pub capacity: Option<u32>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub id: Uuid,
    pub room_id: Uuid,
    /// Decimal string, two fractional digits
    pub total_price: String,
    pub status: String,
}

impl From<BookingReceipt> for BookingResponse {
    fn from(receipt: BookingReceipt) -> Self {
        Self {
            id: receipt.reservation_id,
            room_id: receipt.room_id,
            total_price: receipt.total_price.to_string(),
            status: receipt.current_status.to_string(),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ReservationDto {
    pub id: Uuid,
    pub room_id: Uuid,
    pub account_id: Option<Uuid>,
    pub guest_name: String,
    pub guest_email: String,
    pub guest_phone: String,
    pub check_in: DateTime<Utc>,
    pub check_out: DateTime<Utc>,
    pub total_price: String,
    pub status: String,
    pub created_at: DateTime<Utc>,
}

impl From<BookingDetails> for ReservationDto {
    fn from(details: BookingDetails) -> Self {
        let r = details.reservation;
        Self {
            id: r.id,
            room_id: r.room_id,
            account_id: r.account_id,
            guest_name: r.guest.name,
            guest_email: r.guest.email,
            guest_phone: r.guest.phone,
            check_in: r.window.check_in(),
            check_out: r.window.check_out(),
            total_price: r.total_price.to_string(),
            status: details.current_status.to_string(),
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusEventDto {
    pub id: i64,
    pub status: String,
    pub reason: String,
    pub changed_by: String,
    pub changed_at: DateTime<Utc>,
}

impl From<StatusEvent> for StatusEventDto {
    fn from(event: StatusEvent) -> Self {
        Self {
            id: event.id,
            status: event.status.to_string(),
            reason: event.reason,
            changed_by: event.changed_by,
            changed_at: event.changed_at,
        }
    }
}

/// Request body of `POST /api/v1/bookings/{id}/status`
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// PENDING, CONFIRMED, CANCELLED, COMPLETED or NO_SHOW
    #[validate(length(min = 1, max = 20, message = "status is required"))]
    pub status: String,
    #[serde(default)]
    #[validate(length(max = 500, message = "must be at most 500 characters"))]
    pub reason: String,
}
