//! Room inventory adapters

pub mod dto;
pub mod http_client;
pub mod memory;

pub use http_client::HttpInventoryClient;
pub use memory::{sample_catalog, InMemoryInventory};
