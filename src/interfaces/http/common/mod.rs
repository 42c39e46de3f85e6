//! Response envelope and error mapping shared by every handler

pub mod validated_json;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::DomainError;

pub use validated_json::ValidatedJson;

/// Standard API response wrapper.
///
/// Success: `{"success": true, "data": {...}}`,
/// failure: `{"success": false, "data": null, "error": "...", "code": "NOT_FOUND"}`.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    /// Payload, `null` on failure
    pub data: Option<T>,
    /// Human-readable error, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Machine-readable error code, omitted on success
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            code: None,
        }
    }

    pub fn error(code: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
            code: Some(code.to_string()),
        }
    }
}

/// Domain error rendered as an HTTP response
#[derive(Debug)]
pub struct ApiError(pub DomainError);

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(err)
    }
}

pub fn status_for(err: &DomainError) -> StatusCode {
    match err {
        DomainError::Validation(_) => StatusCode::BAD_REQUEST,
        DomainError::NotFound { .. } => StatusCode::NOT_FOUND,
        DomainError::NoRoomsAvailable | DomainError::Conflict(_) => StatusCode::CONFLICT,
        DomainError::UpstreamUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        DomainError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = status_for(&self.0);
        // Internal details stay in the logs
        let message = match &self.0 {
            DomainError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed with internal error");
                "internal server error".to_string()
            }
            other => other.to_string(),
        };
        let body = ApiResponse::<()>::error(self.0.code(), message);
        (status, Json(body)).into_response()
    }
}

pub type ApiResult<T> = Result<Json<ApiResponse<T>>, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_taxonomy_to_status_codes() {
        assert_eq!(
            status_for(&DomainError::Validation("x".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_for(&DomainError::not_found("Reservation", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(status_for(&DomainError::NoRoomsAvailable), StatusCode::CONFLICT);
        assert_eq!(
            status_for(&DomainError::UpstreamUnavailable("x".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
        assert_eq!(
            status_for(&DomainError::Internal("x".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn error_envelope_carries_code_but_no_data_payload() {
        let body = serde_json::to_value(ApiResponse::<()>::error("NO_ROOMS_AVAILABLE", "full"))
            .unwrap();
        assert_eq!(body["success"], false);
        assert_eq!(body["code"], "NO_ROOMS_AVAILABLE");
        assert!(body["data"].is_null());

        let ok = serde_json::to_value(ApiResponse::success(1)).unwrap();
        assert!(ok.get("code").is_none());
        assert!(ok.get("error").is_none());
    }
}
