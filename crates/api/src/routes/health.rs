use axum::extract::State;
use axum::{routing::get, Json, Router};
use plexus_db::SchemaStatus;
use serde::Serialize;

use crate::state::AppState;

/// Readiness of the dashboard store.
#[derive(Serialize)]
pub struct HealthResponse {
    /// `ok` when the database answers and every bundled migration is applied.
    pub status: &'static str,
    pub version: &'static str,
    pub db_healthy: bool,
    /// `None` when the migration table could not be read.
    pub schema: Option<SchemaStatus>,
}

/// GET /health
async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    let db_healthy = plexus_db::health_check(&state.pool).await.is_ok();
    let schema = if db_healthy {
        match plexus_db::schema_status(&state.pool).await {
            Ok(schema) => Some(schema),
            Err(e) => {
                tracing::warn!(error = %e, "Could not read migration state");
                None
            }
        }
    } else {
        None
    };

    let ready = schema.is_some_and(|s| s.is_current());
    if db_healthy && !ready {
        tracing::warn!(?schema, "Database schema is behind the bundled migrations");
    }

    Json(HealthResponse {
        status: if ready { "ok" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        db_healthy,
        schema,
    })
}

/// Root-level routes, mounted outside `/api`.
pub fn router() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
