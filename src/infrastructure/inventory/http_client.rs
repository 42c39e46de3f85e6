//! Reqwest-backed room inventory adapter
//!
//! Owns transport details only: query encoding, request timeout, HTTP
//! status mapping and JSON decoding into room snapshots.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use uuid::Uuid;

use super::dto::{RoomCountDto, RoomDto};
use crate::domain::room::{InventoryClient, RoomSummary, SearchCriteria};
use crate::domain::{DomainError, DomainResult};
use crate::support::errors::InfraError;

const ROOMS_PATH: &str = "api/v1/rooms";

pub struct HttpInventoryClient {
    client: Client,
    base_url: Url,
}

impl HttpInventoryClient {
    /// Build an adapter using a reqwest client with an explicit request timeout.
    ///
    /// # Errors
    ///
    /// Returns an error when the reqwest client cannot be constructed.
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            base_url: with_trailing_slash(base_url),
        })
    }

    fn endpoint(&self, suffix: &str) -> DomainResult<Url> {
        self.base_url
            .join(suffix)
            .map_err(|e| DomainError::Internal(format!("invalid inventory URL: {e}")))
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        url: Url,
        query: &[(&str, String)],
    ) -> Result<T, FetchError> {
        debug!(%url, "Querying room inventory");
        let response = self
            .client
            .get(url)
            .header(reqwest::header::ACCEPT, "application/json")
            .query(query)
            .send()
            .await
            .map_err(map_transport_error)?;

        let status = response.status();
        let body = response.bytes().await.map_err(map_transport_error)?;
        if !status.is_success() {
            return Err(FetchError::Status(status, body_preview(&body)));
        }

        serde_json::from_slice(&body)
            .map_err(|e| FetchError::Domain(InfraError::Serialization(e).into()))
    }
}

/// `Url::join` drops the last path segment unless the base ends with `/`.
fn with_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}

fn criteria_query(criteria: &SearchCriteria) -> Vec<(&'static str, String)> {
    let mut query = Vec::with_capacity(3);
    if let Some(room_type) = criteria.room_type {
        query.push(("type", room_type.as_str().to_string()));
    }
    if let Some(capacity) = criteria.min_capacity {
        query.push(("capacity", capacity.to_string()));
    }
    if let Some(status) = criteria.status {
        query.push(("status", status.as_str().to_string()));
    }
    query
}

enum FetchError {
    Status(StatusCode, String),
    Domain(DomainError),
}

impl FetchError {
    /// Any non-success status is an upstream failure, except where the
    /// caller maps a specific status (404 on a single room) itself.
    fn into_domain(self) -> DomainError {
        match self {
            Self::Status(status, body) => {
                warn!(status = status.as_u16(), %body, "Room inventory returned an error");
                map_status_error(status, &body)
            }
            Self::Domain(err) => err,
        }
    }
}

fn map_transport_error(error: reqwest::Error) -> FetchError {
    if error.is_timeout() {
        warn!(error = %error, "Room inventory request timed out");
    }
    FetchError::Domain(InfraError::Http(error).into())
}

fn map_status_error(status: StatusCode, body: &str) -> DomainError {
    let message = if body.is_empty() {
        format!("room inventory status {}", status.as_u16())
    } else {
        format!("room inventory status {}: {}", status.as_u16(), body)
    };
    if status.is_client_error()
        && status != StatusCode::REQUEST_TIMEOUT
        && status != StatusCode::TOO_MANY_REQUESTS
    {
        DomainError::Internal(message)
    } else {
        DomainError::UpstreamUnavailable(message)
    }
}

fn body_preview(body: &[u8]) -> String {
    const PREVIEW_CHAR_LIMIT: usize = 160;

    let compact = String::from_utf8_lossy(body)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ");
    let preview = compact.chars().take(PREVIEW_CHAR_LIMIT).collect::<String>();
    if compact.chars().count() > PREVIEW_CHAR_LIMIT {
        format!("{preview}...")
    } else {
        preview
    }
}

fn decode_room(dto: RoomDto) -> DomainResult<RoomSummary> {
    dto.into_domain().map_err(DomainError::Internal)
}

#[async_trait]
impl InventoryClient for HttpInventoryClient {
    async fn find_by_criteria(&self, criteria: &SearchCriteria) -> DomainResult<Vec<RoomSummary>> {
        let url = self.endpoint(ROOMS_PATH)?;
        let rooms: Vec<RoomDto> = self
            .get_json(url, &criteria_query(criteria))
            .await
            .map_err(FetchError::into_domain)?;
        rooms.into_iter().map(decode_room).collect()
    }

    async fn get_room(&self, id: Uuid) -> DomainResult<RoomSummary> {
        let url = self.endpoint(&format!("{ROOMS_PATH}/{id}"))?;
        match self.get_json::<RoomDto>(url, &[]).await {
            Ok(dto) => decode_room(dto),
            Err(FetchError::Status(StatusCode::NOT_FOUND, _)) => {
                Err(DomainError::not_found("Room", "id", id))
            }
            Err(e) => Err(e.into_domain()),
        }
    }

    async fn count(&self, criteria: &SearchCriteria) -> DomainResult<u64> {
        let url = self.endpoint(&format!("{ROOMS_PATH}/count"))?;
        let counted: RoomCountDto = self
            .get_json(url, &criteria_query(criteria))
            .await
            .map_err(FetchError::into_domain)?;
        Ok(counted.count)
    }
}
