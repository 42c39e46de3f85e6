//! Booking handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use uuid::Uuid;

use super::dto::{
    parse_instant, parse_room_type, AvailableRoomDto, AvailableRoomsQuery, BookingResponse,
    CreateBookingRequest, ReservationDto, StatusEventDto, UpdateStatusRequest,
};
use crate::application::{CreateBooking, ReservationEngine, UpdateStatus};
use crate::domain::reservation::GuestContact;
use crate::domain::room::SearchCriteria;
use crate::domain::status_history::ReservationStatus;
use crate::infrastructure::database::repositories::SeaOrmUnitOfWork;
use crate::interfaces::http::common::{ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::middleware::AuthenticatedUser;

/// Booking handler state
#[derive(Clone)]
pub struct BookingState {
    pub engine: Arc<ReservationEngine<SeaOrmUnitOfWork>>,
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/available-rooms",
    tag = "Bookings",
    params(AvailableRoomsQuery),
    responses(
        (status = 200, description = "Rooms free for the whole stay", body = ApiResponse<Vec<AvailableRoomDto>>),
        (status = 400, description = "Invalid dates or room type"),
        (status = 503, description = "Room inventory unavailable")
    )
)]
pub async fn available_rooms(
    State(state): State<BookingState>,
    Query(query): Query<AvailableRoomsQuery>,
) -> ApiResult<Vec<AvailableRoomDto>> {
    let check_in = parse_instant("check-in", &query.check_in)?;
    let check_out = parse_instant("check-out", &query.check_out)?;
    let room_type = parse_room_type(query.room_type.as_deref())?;

    let rooms = state
        .engine
        .available_rooms(SearchCriteria::new(room_type, query.capacity), check_in, check_out)
        .await?;
    Ok(Json(ApiResponse::success(
        rooms.into_iter().map(AvailableRoomDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings",
    tag = "Bookings",
    request_body = CreateBookingRequest,
    security((), ("bearer_auth" = [])),
    responses(
        (status = 201, description = "Reservation created in PENDING state", body = ApiResponse<BookingResponse>),
        (status = 400, description = "Invalid request"),
        (status = 409, description = "No matching room is free for the stay"),
        (status = 503, description = "Room inventory unavailable")
    )
)]
pub async fn create_booking(
    State(state): State<BookingState>,
    user: Option<Extension<AuthenticatedUser>>,
    ValidatedJson(body): ValidatedJson<CreateBookingRequest>,
) -> Result<(StatusCode, Json<ApiResponse<BookingResponse>>), ApiError> {
    let command = CreateBooking {
        guest: GuestContact::new(body.guest_name, body.guest_email, body.guest_phone),
        check_in: parse_instant("check-in", &body.check_in)?,
        check_out: parse_instant("check-out", &body.check_out)?,
        room_type: parse_room_type(body.room_type.as_deref())?,
        capacity: body.capacity,
        account_id: user.and_then(|Extension(u)| u.account_uuid()),
    };

    let receipt = state.engine.create_booking(command).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(BookingResponse::from(receipt))),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Reservation with its current status", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_booking(
    State(state): State<BookingState>,
    Path(id): Path<Uuid>,
) -> ApiResult<ReservationDto> {
    let details = state.engine.booking(id).await?;
    Ok(Json(ApiResponse::success(details.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}/history",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Status events, oldest first", body = ApiResponse<Vec<StatusEventDto>>),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn get_booking_history(
    State(state): State<BookingState>,
    Path(id): Path<Uuid>,
) -> ApiResult<Vec<StatusEventDto>> {
    let events = state.engine.status_history(id).await?;
    Ok(Json(ApiResponse::success(
        events.into_iter().map(StatusEventDto::from).collect(),
    )))
}

#[utoipa::path(
    post,
    path = "/api/v1/bookings/{id}/status",
    tag = "Bookings",
    params(("id" = Uuid, Path, description = "Reservation ID")),
    request_body = UpdateStatusRequest,
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Status event appended", body = ApiResponse<StatusEventDto>),
        (status = 400, description = "Unknown status"),
        (status = 401, description = "Missing or invalid token"),
        (status = 404, description = "Reservation not found")
    )
)]
pub async fn update_booking_status(
    State(state): State<BookingState>,
    Extension(user): Extension<AuthenticatedUser>,
    Path(id): Path<Uuid>,
    ValidatedJson(body): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<StatusEventDto> {
    let status: ReservationStatus = body.status.parse()?;
    let event = state
        .engine
        .update_status(UpdateStatus {
            reservation_id: id,
            status,
            reason: body.reason,
            changed_by: user.username,
        })
        .await?;
    Ok(Json(ApiResponse::success(event.into())))
}
