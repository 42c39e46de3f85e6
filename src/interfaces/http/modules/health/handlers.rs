//! Health check handler

use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::{extract::State, http::StatusCode, Json};
use sea_orm::{ConnectionTrait, DatabaseConnection, Statement};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::room::{InventoryClient, SearchCriteria};

const INVENTORY_PROBE_TIMEOUT: Duration = Duration::from_secs(1);

#[derive(Clone)]
pub struct HealthState {
    pub db: DatabaseConnection,
    pub inventory: Arc<dyn InventoryClient>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// "ok" or "degraded"
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub database: ComponentHealth,
    pub inventory: ComponentHealth,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ComponentHealth {
    pub status: String,
    pub latency_ms: Option<u64>,
}

impl ComponentHealth {
    fn ok(since: Instant) -> Self {
        Self {
            status: "ok".to_string(),
            latency_ms: Some(since.elapsed().as_millis() as u64),
        }
    }

    fn error() -> Self {
        Self {
            status: "error".to_string(),
            latency_ms: None,
        }
    }

    fn is_ok(&self) -> bool {
        self.status == "ok"
    }
}

async fn probe_database(db: &DatabaseConnection) -> ComponentHealth {
    let started = Instant::now();
    let ping = Statement::from_string(db.get_database_backend(), "SELECT 1".to_string());
    match db.execute(ping).await {
        Ok(_) => ComponentHealth::ok(started),
        Err(e) => {
            tracing::warn!(error = %e, "Database health probe failed");
            ComponentHealth::error()
        }
    }
}

async fn probe_inventory(inventory: &dyn InventoryClient) -> ComponentHealth {
    let started = Instant::now();
    match tokio::time::timeout(INVENTORY_PROBE_TIMEOUT, inventory.count(&SearchCriteria::default())).await {
        Ok(Ok(_)) => ComponentHealth::ok(started),
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Inventory health probe failed");
            ComponentHealth::error()
        }
        Err(_) => {
            tracing::warn!("Inventory health probe timed out");
            ComponentHealth::error()
        }
    }
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let (database, inventory) = tokio::join!(
        probe_database(&state.db),
        probe_inventory(state.inventory.as_ref())
    );

    let healthy = database.is_ok() && inventory.is_ok();
    let status = if healthy {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (
        status,
        Json(HealthResponse {
            status: if healthy { "ok" } else { "degraded" }.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: state.started_at.elapsed().as_secs(),
            database,
            inventory,
        }),
    )
}
