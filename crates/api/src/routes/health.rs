//! Liveness endpoint.
//!
//! `/health` sits outside the auth layer so load balancers and uptime
//! checks can probe it without a token.

use axum::{Json, Router, routing::get};
use serde::Serialize;

use crate::AppState;

/// Body returned by `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Always `"healthy"` while the process is serving.
    pub status: &'static str,
    /// Service name.
    pub service: &'static str,
    /// Crate version baked in at build time.
    pub version: &'static str,
}

async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        service: "arqo",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Routes for the liveness probe.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use super::health_check;

    #[tokio::test]
    async fn reports_healthy() {
        let response = health_check().await;
        assert_eq!(response.0.status, "healthy");
        assert_eq!(response.0.service, "arqo");
    }
}
