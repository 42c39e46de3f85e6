use thiserror::Error;

#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Not found: {entity} with {field}={value}")]
    NotFound {
        entity: &'static str,
        field: &'static str,
        value: String,
    },

    /// Caller error detected before any I/O.
    #[error("Validation: {0}")]
    Validation(String),

    /// Every candidate room is already booked for the requested stay.
    #[error("No rooms available for the requested stay")]
    NoRoomsAvailable,

    #[error("Conflict: {0}")]
    Conflict(String),

    /// The room inventory could not be reached in time.
    #[error("Upstream unavailable: {0}")]
    UpstreamUnavailable(String),

    #[error("Internal: {0}")]
    Internal(String),
}

impl DomainError {
    pub fn not_found(entity: &'static str, field: &'static str, value: impl ToString) -> Self {
        Self::NotFound {
            entity,
            field,
            value: value.to_string(),
        }
    }

    /// Stable machine-readable code, shared with the gateway's error envelope.
    pub fn code(&self) -> &'static str {
        match self {
            Self::NotFound { .. } => "NOT_FOUND",
            Self::Validation(_) => "INVALID_INPUT",
            Self::NoRoomsAvailable => "NO_ROOMS_AVAILABLE",
            Self::Conflict(_) => "CONFLICT",
            Self::UpstreamUnavailable(_) => "UPSTREAM_UNAVAILABLE",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Debug, Error)]
pub enum InfraError {
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl From<InfraError> for DomainError {
    fn from(err: InfraError) -> Self {
        match err {
            InfraError::Http(e) => DomainError::UpstreamUnavailable(e.to_string()),
            other => DomainError::Internal(other.to_string()),
        }
    }
}

impl From<sea_orm::DbErr> for DomainError {
    fn from(err: sea_orm::DbErr) -> Self {
        InfraError::Database(err).into()
    }
}

/// Result type for domain operations
pub type DomainResult<T> = Result<T, DomainError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn database_errors_surface_as_internal() {
        let err: DomainError = sea_orm::DbErr::Custom("boom".into()).into();
        assert!(matches!(err, DomainError::Internal(ref msg) if msg.contains("boom")));
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn undecodable_payloads_are_internal() {
        let decode = serde_json::from_str::<u32>("\"ten\"").unwrap_err();
        let err: DomainError = InfraError::Serialization(decode).into();
        assert_eq!(err.code(), "INTERNAL_ERROR");
    }

    #[test]
    fn not_found_formats_entity_and_key() {
        let err = DomainError::not_found("Reservation", "id", "42");
        assert_eq!(err.to_string(), "Not found: Reservation with id=42");
        assert_eq!(err.code(), "NOT_FOUND");
    }

    #[test]
    fn business_exclusion_has_its_own_code() {
        assert_eq!(DomainError::NoRoomsAvailable.code(), "NO_ROOMS_AVAILABLE");
        assert_eq!(
            DomainError::Validation("guest name is required".into()).code(),
            "INVALID_INPUT"
        );
    }
}
