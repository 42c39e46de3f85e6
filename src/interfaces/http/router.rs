//! API Router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::ReservationEngine;
use crate::domain::room::InventoryClient;
use crate::infrastructure::crypto::jwt::JwtConfig;
use crate::infrastructure::database::repositories::SeaOrmUnitOfWork;
use crate::interfaces::http::middleware::{auth_middleware, optional_auth_middleware, AuthState};
use crate::interfaces::http::modules::bookings::{self, BookingState};
use crate::interfaces::http::modules::health::{self, HealthState};
use crate::interfaces::http::modules::metrics::{
    http_metrics_middleware, prometheus_metrics, MetricsState,
};
use crate::interfaces::http::modules::request_id::request_id_middleware;

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT issued by the identity service"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::handlers::health_check,
        bookings::handlers::available_rooms,
        bookings::handlers::create_booking,
        bookings::handlers::get_booking,
        bookings::handlers::get_booking_history,
        bookings::handlers::update_booking_status,
    ),
    components(schemas(
        health::HealthResponse,
        health::handlers::ComponentHealth,
        bookings::AvailableRoomDto,
        bookings::CreateBookingRequest,
        bookings::BookingResponse,
        bookings::ReservationDto,
        bookings::StatusEventDto,
        bookings::UpdateStatusRequest,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service and dependency health"),
        (name = "Bookings", description = "Room availability, reservations and their status ledger"),
    ),
    info(
        title = "Hotel Booking API",
        version = "1.0.0",
        description = "Reservation engine: conflict-free room booking with an auditable status history",
    )
)]
pub struct ApiDoc;

/// Everything the HTTP layer needs, built by the server bootstrap
#[derive(Clone)]
pub struct ApiContext {
    pub db: DatabaseConnection,
    pub engine: Arc<ReservationEngine<SeaOrmUnitOfWork>>,
    pub inventory: Arc<dyn InventoryClient>,
    pub jwt_config: JwtConfig,
    pub metrics: PrometheusHandle,
}

/// Create the API router with all routes
pub fn create_api_router(ctx: ApiContext) -> Router {
    let auth_state = AuthState {
        jwt_config: ctx.jwt_config,
    };
    let booking_state = BookingState { engine: ctx.engine };

    // ── Bookings ────────────────────────────────────────────────
    // Anonymous callers may search and book; a token, when sent, must be valid.
    let public_booking_routes = Router::new()
        .route(
            "/api/v1/bookings/available-rooms",
            get(bookings::available_rooms),
        )
        .route("/api/v1/bookings", post(bookings::create_booking))
        .route("/api/v1/bookings/{id}", get(bookings::get_booking))
        .route(
            "/api/v1/bookings/{id}/history",
            get(bookings::get_booking_history),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            optional_auth_middleware,
        ))
        .with_state(booking_state.clone());

    let protected_booking_routes = Router::new()
        .route(
            "/api/v1/bookings/{id}/status",
            post(bookings::update_booking_status),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(booking_state);

    // ── Operational endpoints ───────────────────────────────────
    let health_routes = Router::new()
        .route("/health", get(health::health_check))
        .with_state(HealthState {
            db: ctx.db,
            inventory: ctx.inventory,
            started_at: Arc::new(Instant::now()),
        });

    let metrics_routes = Router::new()
        .route("/metrics", get(prometheus_metrics))
        .with_state(MetricsState {
            handle: ctx.metrics,
        });

    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .merge(health_routes)
        .merge(metrics_routes)
        .merge(public_booking_routes)
        .merge(protected_booking_routes)
        .merge(SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi()))
        .layer(middleware::from_fn(http_metrics_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
}
