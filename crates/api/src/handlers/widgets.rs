//! Handlers for the `/widgets` registry.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use plexus_core::error::CoreError;
use plexus_core::types::DbId;
use plexus_db::models::widget::{Widget, WidgetInput};
use plexus_db::repositories::WidgetRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

fn not_found(id: DbId) -> AppError {
    AppError::Core(CoreError::NotFound {
        entity: "Widget",
        id,
    })
}

/// GET /api/widgets
pub async fn list(_auth: AuthUser, State(state): State<AppState>) -> AppResult<Json<Vec<Widget>>> {
    let widgets = WidgetRepo::list(&state.pool).await?;
    Ok(Json(widgets))
}

/// POST /api/widgets
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<WidgetInput>,
) -> AppResult<(StatusCode, Json<Widget>)> {
    let input = input.validate()?;
    let widget = WidgetRepo::create(&state.pool, &input).await?;

    tracing::info!(
        widget_id = widget.id,
        widget_type = %widget.widget_type,
        user_id = auth.user_id,
        "Widget created"
    );

    Ok((StatusCode::CREATED, Json(widget)))
}

/// PUT /api/widgets/{id}
///
/// Replaces every field; fields missing from the body are cleared.
pub async fn update(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<WidgetInput>,
) -> AppResult<Json<Widget>> {
    let input = input.validate()?;
    let widget = WidgetRepo::replace(&state.pool, id, &input)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(widget_id = id, user_id = auth.user_id, "Widget updated");

    Ok(Json(widget))
}

/// DELETE /api/widgets/{id}
///
/// Returns the deleted widget.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Widget>> {
    let widget = WidgetRepo::delete(&state.pool, id)
        .await?
        .ok_or(not_found(id))?;

    tracing::info!(widget_id = id, user_id = auth.user_id, "Widget deleted");

    Ok(Json(widget))
}
