//! Handlers for a dashboard's layout document.

use axum::extract::{Path, State};
use axum::Json;
use plexus_core::error::CoreError;
use plexus_core::layout::{decode_stored, LayoutPayload};
use plexus_core::types::DbId;
use plexus_db::models::layout::{LayoutDocument, SaveLayout};
use plexus_db::repositories::{DashboardRepo, LayoutRepo};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// GET /api/dashboards/{id}/layout
///
/// The stored layout document, with `layout` decoded to JSON.
pub async fn get_layout(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(dashboard_id): Path<DbId>,
) -> AppResult<Json<LayoutDocument>> {
    let mut doc = LayoutRepo::find_by_dashboard(&state.pool, dashboard_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Layout for dashboard",
            id: dashboard_id,
        }))?;

    doc.layout = decode_stored(doc.layout).map_err(|e| {
        AppError::InternalError(format!("Stored layout for dashboard {dashboard_id}: {e}"))
    })?;

    Ok(Json(doc))
}

/// POST /api/dashboards/{id}/layout
///
/// Create or replace the layout document. `layout` may be a JSON array or a
/// string holding one, in either the legacy or the rich shape. The decoded
/// array is stored exactly as sent once its shape checks out.
pub async fn save_layout(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(dashboard_id): Path<DbId>,
    Json(input): Json<SaveLayout>,
) -> AppResult<Json<LayoutDocument>> {
    let raw = input
        .layout
        .ok_or_else(|| AppError::BadRequest("Missing layout in request body".into()))?;
    let layout = decode_stored(raw).map_err(CoreError::from)?;
    let payload = LayoutPayload::from_value(&layout).map_err(CoreError::from)?;

    DashboardRepo::find_by_id(&state.pool, dashboard_id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Dashboard",
            id: dashboard_id,
        }))?;

    let doc = LayoutRepo::upsert(&state.pool, dashboard_id, &layout).await?;

    tracing::info!(
        dashboard_id,
        source = ?payload.source(),
        entries = payload.len(),
        user_id = auth.user_id,
        "Layout saved"
    );

    Ok(Json(doc))
}
