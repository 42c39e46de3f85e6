//! In-process room catalog
//!
//! Seeded catalog used by tests and local runs without a room service.

use std::time::Duration;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use rust_decimal::Decimal;

use crate::domain::room::{InventoryClient, RoomStatus, RoomSummary, RoomType, SearchCriteria};
use crate::domain::{DomainError, DomainResult};

#[derive(Default)]
pub struct InMemoryInventory {
    rooms: RwLock<Vec<RoomSummary>>,
    latency: Option<Duration>,
}

impl InMemoryInventory {
    pub fn new(rooms: Vec<RoomSummary>) -> Self {
        Self {
            rooms: RwLock::new(rooms),
            latency: None,
        }
    }

    /// Delay every answer, to exercise caller deadlines.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    pub async fn add_room(&self, room: RoomSummary) {
        self.rooms.write().await.push(room);
    }

    /// Returns `false` if the room is unknown.
    pub async fn set_status(&self, id: Uuid, status: RoomStatus) -> bool {
        let mut rooms = self.rooms.write().await;
        match rooms.iter_mut().find(|room| room.id == id) {
            Some(room) => {
                room.status = status;
                true
            }
            None => false,
        }
    }

    async fn simulate_latency(&self) {
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }
    }
}

/// Small fixed catalog served when no room service is configured.
/// IDs are stable across restarts so bookings stay meaningful.
pub fn sample_catalog() -> Vec<RoomSummary> {
    let rooms = [
        ("101", RoomType::Standard, 12000, 2),
        ("102", RoomType::Standard, 12000, 2),
        ("103", RoomType::Standard, 9500, 1),
        ("201", RoomType::Deluxe, 21000, 3),
        ("202", RoomType::Deluxe, 21000, 3),
        ("301", RoomType::Suite, 45000, 4),
    ];
    rooms
        .into_iter()
        .enumerate()
        .map(|(i, (number, room_type, rate_minor, capacity))| RoomSummary {
            id: Uuid::from_u128(0x1000 + i as u128),
            number: number.to_string(),
            room_type,
            nightly_rate: Decimal::new(rate_minor, 2),
            capacity,
            status: RoomStatus::Available,
        })
        .collect()
}

#[async_trait]
impl InventoryClient for InMemoryInventory {
    async fn find_by_criteria(&self, criteria: &SearchCriteria) -> DomainResult<Vec<RoomSummary>> {
        self.simulate_latency().await;
        let rooms = self.rooms.read().await;
        Ok(rooms
            .iter()
            .filter(|room| criteria.matches(room))
            .cloned()
            .collect())
    }

    async fn get_room(&self, id: Uuid) -> DomainResult<RoomSummary> {
        self.simulate_latency().await;
        let rooms = self.rooms.read().await;
        rooms
            .iter()
            .find(|room| room.id == id)
            .cloned()
            .ok_or_else(|| DomainError::not_found("Room", "id", id))
    }

    async fn count(&self, criteria: &SearchCriteria) -> DomainResult<u64> {
        self.simulate_latency().await;
        let rooms = self.rooms.read().await;
        Ok(rooms.iter().filter(|room| criteria.matches(room)).count() as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(number: &str, room_type: RoomType, capacity: u32) -> RoomSummary {
        RoomSummary {
            id: Uuid::new_v4(),
            number: number.into(),
            room_type,
            nightly_rate: Decimal::new(10000, 2),
            capacity,
            status: RoomStatus::Available,
        }
    }

    #[tokio::test]
    async fn filters_like_the_room_service() {
        let inventory = InMemoryInventory::new(vec![
            room("101", RoomType::Standard, 2),
            room("102", RoomType::Standard, 1),
            room("201", RoomType::Deluxe, 3),
        ]);

        let criteria = SearchCriteria::new(Some(RoomType::Standard), Some(2));
        let found = inventory.find_by_criteria(&criteria).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].number, "101");
        assert_eq!(inventory.count(&SearchCriteria::default()).await.unwrap(), 3);
    }

    #[tokio::test]
    async fn status_changes_affect_availability_queries() {
        let first = room("101", RoomType::Suite, 2);
        let id = first.id;
        let inventory = InMemoryInventory::new(vec![first]);
        let available = SearchCriteria::default().with_status(RoomStatus::Available);

        assert!(inventory.set_status(id, RoomStatus::Maintenance).await);
        assert_eq!(inventory.count(&available).await.unwrap(), 0);
        assert!(!inventory.set_status(Uuid::new_v4(), RoomStatus::Available).await);
    }

    #[tokio::test]
    async fn sample_catalog_has_every_room_type() {
        let inventory = InMemoryInventory::new(sample_catalog());
        for room_type in [RoomType::Standard, RoomType::Deluxe, RoomType::Suite] {
            let criteria = SearchCriteria::new(Some(room_type), None);
            assert!(inventory.count(&criteria).await.unwrap() > 0);
        }
    }

    #[tokio::test]
    async fn unknown_room_is_not_found() {
        let inventory = InMemoryInventory::default();
        let err = inventory.get_room(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, DomainError::NotFound { entity: "Room", .. }));
    }
}
