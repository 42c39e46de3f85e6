//! Room snapshots and the inventory collaborator

pub mod client;
pub mod model;

pub use client::InventoryClient;
pub use model::{RoomStatus, RoomSummary, RoomType, SearchCriteria};
