//! Health check endpoint.

use axum::{Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get};
use serde::Serialize;
use tracing::warn;

use crate::AppState;

/// Health check response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `healthy` or `degraded`.
    pub status: &'static str,
    /// `ok` when the database answers a ping.
    pub database: &'static str,
    /// Service version.
    pub version: &'static str,
}

/// Reports service and database health. Answers 503 while the database is unreachable.
async fn health_check(State(state): State<AppState>) -> impl IntoResponse {
    let (code, status, database) = match state.db.ping().await {
        Ok(()) => (StatusCode::OK, "healthy", "ok"),
        Err(e) => {
            warn!(error = %e, "Database ping failed");
            (StatusCode::SERVICE_UNAVAILABLE, "degraded", "unavailable")
        }
    };

    (
        code,
        Json(HealthResponse {
            status,
            database,
            version: env!("CARGO_PKG_VERSION"),
        }),
    )
}

/// Creates health check routes.
pub fn routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}

#[cfg(test)]
mod tests {
    use crate::routes::test_support::{request, test_state};
    use axum::http::StatusCode;

    #[tokio::test]
    async fn test_health_is_public_and_reports_database() {
        let state = test_state();
        let (status, body) = request(&state, "GET", "/health", None, None).await;

        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "degraded");
        assert_eq!(body["database"], "unavailable");
    }
}
