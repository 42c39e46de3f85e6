//! Infrastructure layer - external concerns

pub mod crypto;
pub mod database;
pub mod inventory;

pub use database::{init_database, run_migrations, DatabaseConfig};
pub use inventory::{HttpInventoryClient, InMemoryInventory};
