//! Liveness and database reachability at `/health`.

use std::time::Duration;

use axum::extract::State;
use axum::{routing::get, Json, Router};
use serde::Serialize;

use crate::state::AppState;

/// A database that takes longer than this to answer is reported unhealthy.
const DB_CHECK_TIMEOUT: Duration = Duration::from_secs(2);

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// `"ok"`, or `"degraded"` when the database is unreachable.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
}

impl HealthResponse {
    fn from_db_check(db_healthy: bool) -> Self {
        Self {
            status: if db_healthy { "ok" } else { "degraded" },
            version: env!("CARGO_PKG_VERSION"),
            db_healthy,
        }
    }
}

/// GET /health
///
/// Always 200 while the process is serving; database trouble shows up in
/// the body only.
async fn health(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = match tokio::time::timeout(DB_CHECK_TIMEOUT, mosaic_db::health_check(&state.pool)).await {
        Ok(Ok(())) => true,
        Ok(Err(e)) => {
            tracing::warn!(error = %e, "Database health check failed");
            false
        }
        Err(_) => {
            tracing::warn!(timeout_secs = DB_CHECK_TIMEOUT.as_secs(), "Database health check timed out");
            false
        }
    };

    Json(HealthResponse::from_db_check(db_healthy))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health))
}
