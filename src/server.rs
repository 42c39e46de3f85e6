//! Reusable booking service runtime.
//!
//! [`ServerHandle`] owns the full lifecycle: metrics recorder, database and
//! migrations, the room inventory adapter, the reservation engine, the REST
//! API and graceful shutdown.

use std::net::SocketAddr;
use std::sync::{Arc, OnceLock};

use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tracing::{error, info, warn};

use crate::application::{EngineConfig, ReservationEngine};
use crate::config::{AppConfig, InventoryConfig};
use crate::domain::room::InventoryClient;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmUnitOfWork;
use crate::infrastructure::inventory::{sample_catalog, HttpInventoryClient, InMemoryInventory};
use crate::infrastructure::{init_database, run_migrations};
use crate::interfaces::http::modules::metrics::{
    detached_prometheus_handle, install_prometheus_recorder,
};
use crate::interfaces::http::{create_api_router, ApiContext};
use crate::support::shutdown::{ShutdownCoordinator, ShutdownSignal};

// ── Options ────────────────────────────────────────────────────────

/// Options for starting the booking service.
pub struct ServerOptions {
    pub config: AppConfig,
    /// Run database migrations on startup (default: true).
    pub auto_migrate: bool,
}

impl Default for ServerOptions {
    fn default() -> Self {
        Self {
            config: AppConfig::default(),
            auto_migrate: true,
        }
    }
}

// ── ServerHandle ───────────────────────────────────────────────────

/// Handle to a running booking service.
///
/// ```rust,no_run
/// use hotel_booking::server::{ServerHandle, ServerOptions};
///
/// #[tokio::main]
/// async fn main() -> Result<(), Box<dyn std::error::Error>> {
///     let handle = ServerHandle::start(ServerOptions::default()).await?;
///     handle.install_signal_handler();
///     handle.shutdown_signal().wait().await;
///     handle.wait().await;
///     Ok(())
/// }
/// ```
pub struct ServerHandle {
    /// The configuration the server was started with.
    pub config: AppConfig,
    /// Address the REST API is bound to (the real port when 0 was requested).
    pub local_addr: SocketAddr,

    db: DatabaseConnection,
    shutdown: ShutdownCoordinator,
    api_task: tokio::task::JoinHandle<()>,
}

impl ServerHandle {
    /// Start the booking service with the given options.
    ///
    /// This will:
    /// 1. Install the Prometheus metrics recorder
    /// 2. Connect to the database and run migrations
    /// 3. Build the room inventory client and the reservation engine
    /// 4. Start the REST API server (with Swagger UI)
    pub async fn start(opts: ServerOptions) -> Result<Self, Box<dyn std::error::Error>> {
        let app_cfg = opts.config;
        app_cfg.validate()?;

        info!("Starting hotel booking service...");

        let prometheus_handle = prometheus_handle();

        // ── Database ───────────────────────────────────────────
        let db = init_database(&app_cfg.database).await?;
        if opts.auto_migrate {
            run_migrations(&db).await?;
        }

        // ── Collaborators & engine ─────────────────────────────
        let inventory = build_inventory(&app_cfg.inventory)?;

        let jwt_config = JwtConfig::new(
            app_cfg.security.jwt_secret.clone(),
            app_cfg.security.jwt_issuer.clone(),
        );
        if app_cfg.security.uses_default_secret() {
            warn!("⚠️  Using the default JWT secret; set JWT_SECRET in production!");
        }

        let uow = SeaOrmUnitOfWork::new(db.clone(), app_cfg.booking.transaction_timeout());
        let engine = Arc::new(ReservationEngine::new(
            uow,
            Arc::clone(&inventory),
            EngineConfig {
                upstream_deadline: app_cfg.booking.upstream_deadline(),
            },
        ));
        info!(
            upstream_deadline_ms = app_cfg.booking.upstream_deadline_ms,
            transaction_timeout_ms = app_cfg.booking.transaction_timeout_ms,
            "🏨 Reservation engine ready"
        );

        // ── REST API server ────────────────────────────────────
        let api_router = create_api_router(ApiContext {
            db: db.clone(),
            engine,
            inventory,
            jwt_config,
            metrics: prometheus_handle,
        });

        let shutdown = ShutdownCoordinator::new(app_cfg.server.shutdown_timeout);
        let api_shutdown = shutdown.signal();

        let api_addr = format!("{}:{}", app_cfg.server.api_host, app_cfg.server.api_port);
        let listener = tokio::net::TcpListener::bind(&api_addr).await?;
        let local_addr = listener.local_addr()?;
        info!("REST API server listening on http://{}", local_addr);
        info!("Swagger UI available at http://{}/docs/", local_addr);

        let api_server = axum::serve(listener, api_router).with_graceful_shutdown(async move {
            api_shutdown.wait().await;
            info!("🛑 REST API server received shutdown signal");
        });

        let api_task = tokio::spawn(async move {
            if let Err(e) = api_server.await {
                error!("REST API server error: {}", e);
            }
        });

        info!("🚀 Booking service started.");

        Ok(Self {
            config: app_cfg,
            local_addr,
            db,
            shutdown,
            api_task,
        })
    }

    /// Get a cloneable shutdown signal.
    pub fn shutdown_signal(&self) -> ShutdownSignal {
        self.shutdown.signal()
    }

    /// Install OS signal listeners (SIGTERM, SIGINT) that trigger shutdown.
    pub fn install_signal_handler(&self) {
        self.shutdown.start_signal_listener();
    }

    /// Trigger graceful shutdown (non-blocking).
    pub fn trigger_shutdown(&self) {
        self.shutdown.signal().trigger();
    }

    /// Wait for the server to stop after shutdown has been triggered, then
    /// close the pool. In-flight requests get `server.shutdown_timeout`.
    pub async fn wait(self) {
        info!("⏳ Waiting for in-flight requests to complete...");

        match tokio::time::timeout(self.shutdown.timeout(), self.api_task).await {
            Ok(Ok(())) => info!("REST API server stopped"),
            Ok(Err(e)) => error!("REST API server task panicked: {}", e),
            Err(_) => warn!(
                timeout_secs = self.shutdown.timeout().as_secs(),
                "REST API server did not drain in time"
            ),
        }

        if let Err(e) = self.db.close().await {
            warn!("Error closing database connection: {}", e);
        } else {
            info!("✅ Database connection closed");
        }

        info!("👋 Booking service shutdown complete");
    }

    /// Trigger shutdown and wait for completion.
    pub async fn shutdown(self) {
        info!("🛑 Shutting down booking service...");
        self.trigger_shutdown();
        self.wait().await;
    }

    pub fn is_running(&self) -> bool {
        !self.api_task.is_finished()
    }
}

// ── Helpers ────────────────────────────────────────────────────────

/// The global recorder can be installed once per process; later starts
/// (tests, restarts) reuse it.
fn prometheus_handle() -> PrometheusHandle {
    static PROM_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

    PROM_HANDLE
        .get_or_init(|| match install_prometheus_recorder() {
            Ok(handle) => {
                info!("📊 Prometheus metrics recorder installed");
                handle
            }
            Err(e) => {
                warn!(error = %e, "Prometheus recorder unavailable; /metrics will be empty");
                detached_prometheus_handle()
            }
        })
        .clone()
}

fn build_inventory(
    config: &InventoryConfig,
) -> Result<Arc<dyn InventoryClient>, Box<dyn std::error::Error>> {
    match config.parsed_base_url()? {
        Some(base_url) => {
            info!(%base_url, "Using remote room inventory");
            let client = HttpInventoryClient::new(base_url, config.request_timeout())?;
            Ok(Arc::new(client))
        }
        None => {
            warn!("No inventory.base_url configured; serving the built-in sample catalog");
            Ok(Arc::new(InMemoryInventory::new(sample_catalog())))
        }
    }
}

/// Initialize tracing (logging) from the application config.
///
/// Call this once at process startup (before [`ServerHandle::start`]).
/// `RUST_LOG` takes precedence over `logging.level`.
pub fn init_tracing(config: &AppConfig) {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::util::SubscriberInitExt;

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.logging.level));

    match config.logging.format.to_lowercase().as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer())
                .init();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::DatabaseConfig;

    fn test_config() -> AppConfig {
        let mut config = AppConfig::default();
        config.server.api_host = "127.0.0.1".into();
        config.server.api_port = 0;
        config.server.shutdown_timeout = 5;
        config.database = DatabaseConfig::in_memory();
        config
    }

    #[tokio::test]
    async fn starts_serves_and_stops() {
        let handle = ServerHandle::start(ServerOptions {
            config: test_config(),
            auto_migrate: true,
        })
        .await
        .unwrap();
        assert!(handle.is_running());

        let url = format!("http://{}/health", handle.local_addr);
        let response = reqwest::get(&url).await.unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::OK);

        let metrics = reqwest::get(format!("http://{}/metrics", handle.local_addr))
            .await
            .unwrap();
        assert_eq!(metrics.status(), reqwest::StatusCode::OK);

        handle.shutdown().await;
    }

    #[tokio::test]
    async fn invalid_config_is_refused() {
        let mut config = test_config();
        config.logging.format = "xml".into();
        let result = ServerHandle::start(ServerOptions {
            config,
            auto_migrate: true,
        })
        .await;
        assert!(result.is_err());
    }

    #[test]
    fn sample_catalog_is_used_without_base_url() {
        assert!(build_inventory(&InventoryConfig::default()).is_ok());

        let remote = InventoryConfig {
            base_url: Some("http://rooms.internal:8081".into()),
            ..InventoryConfig::default()
        };
        assert!(build_inventory(&remote).is_ok());
    }
}
