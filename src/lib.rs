//! # Hotel Booking
//!
//! Reservation engine for hotel rooms: picks a free room out of a remote
//! inventory, guarantees that no two concurrent requests commit
//! overlapping stays for the same room, prices the stay and keeps an
//! append-only status ledger per reservation.
//!
//! ## Architecture
//!
//! - **domain**: entities, value objects, repository and collaborator traits
//! - **application**: the reservation engine and its commands
//! - **infrastructure**: SeaORM persistence, unit of work, inventory adapters, JWT
//! - **interfaces**: REST API with Swagger documentation
//! - **support**: error taxonomy and graceful shutdown
//! - **server**: runtime bootstrap shared by the CLI

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;
pub mod server;
pub mod support;

pub use config::{default_config_path, AppConfig};

pub use application::{EngineConfig, ReservationEngine};
pub use infrastructure::{init_database, run_migrations, DatabaseConfig};
pub use interfaces::http::create_api_router;
