//! Inventory collaborator interface

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{RoomSummary, SearchCriteria};
use crate::domain::DomainResult;

/// Typed view of the remote room catalog.
///
/// Implementations report transport failures as
/// [`DomainError::UpstreamUnavailable`](crate::domain::DomainError::UpstreamUnavailable)
/// and a missing room as `NotFound`.
#[async_trait]
pub trait InventoryClient: Send + Sync {
    /// All rooms matching the criteria, in the catalog's order
    async fn find_by_criteria(&self, criteria: &SearchCriteria) -> DomainResult<Vec<RoomSummary>>;

    /// A single room by ID
    async fn get_room(&self, id: Uuid) -> DomainResult<RoomSummary>;

    /// Number of rooms matching the criteria
    async fn count(&self, criteria: &SearchCriteria) -> DomainResult<u64>;
}
