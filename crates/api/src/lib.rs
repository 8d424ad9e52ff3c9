//! HTTP surface for the cash register.
//!
//! Routes live under `/api/v1`. Everything except `/health` requires a
//! bearer token; see [`middleware::auth`]. Handlers translate between the
//! camelCase wire format and the snake_case domain types.

pub mod middleware;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use chrono_tz::Tz;
use sea_orm::DatabaseConnection;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use arqo_shared::JwtService;

/// State shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub db: Arc<DatabaseConnection>,
    /// Validates bearer tokens on protected routes.
    pub jwt_service: Arc<JwtService>,
    /// Store timezone; register days roll over in this zone, not UTC.
    pub timezone: Tz,
}

impl AppState {
    /// Bundles the shared services handlers need.
    #[must_use]
    pub fn new(db: DatabaseConnection, jwt_service: JwtService, timezone: Tz) -> Self {
        Self {
            db: Arc::new(db),
            jwt_service: Arc::new(jwt_service),
            timezone,
        }
    }
}

/// Builds the application router with tracing and permissive CORS.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .nest("/api/v1", routes::api_routes_with_state(state.clone()))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
