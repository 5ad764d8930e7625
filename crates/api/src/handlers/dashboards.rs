//! Handlers for the `/dashboards` resource.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use plexus_core::error::CoreError;
use plexus_core::layout::{resolve, LayoutPayload, LayoutSource, WidgetDescriptor};
use plexus_core::types::DbId;
use plexus_db::models::dashboard::{CreateDashboard, Dashboard, DashboardWithWidgets};
use plexus_db::models::widget::Widget;
use plexus_db::repositories::{DashboardRepo, LayoutRepo, WidgetRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::state::AppState;

/// Response for `GET /dashboards/{id}/resolved`.
#[derive(Debug, Serialize)]
pub struct ResolvedDashboard {
    pub dashboard_id: DbId,
    pub source: LayoutSource,
    pub descriptors: Vec<WidgetDescriptor>,
}

/// GET /api/dashboards
///
/// Every dashboard with its referenced widgets expanded in stored order.
pub async fn list(
    _auth: AuthUser,
    State(state): State<AppState>,
) -> AppResult<Json<Vec<DashboardWithWidgets>>> {
    let dashboards = DashboardRepo::list_with_widgets(&state.pool).await?;
    Ok(Json(dashboards))
}

/// POST /api/dashboards
pub async fn create(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<CreateDashboard>,
) -> AppResult<(StatusCode, Json<Dashboard>)> {
    let input = input.validate()?;
    let dashboard = DashboardRepo::create(&state.pool, &input).await?;

    tracing::info!(
        dashboard_id = dashboard.id,
        widget_count = dashboard.widget_ids.len(),
        user_id = auth.user_id,
        "Dashboard created"
    );

    Ok((StatusCode::CREATED, Json(dashboard)))
}

/// DELETE /api/dashboards/{id}
///
/// Returns the deleted dashboard. Its layout document goes with it; the
/// referenced widgets stay.
pub async fn delete(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Dashboard>> {
    let dashboard = DashboardRepo::delete(&state.pool, id)
        .await?
        .ok_or(AppError::Core(CoreError::NotFound {
            entity: "Dashboard",
            id,
        }))?;

    tracing::info!(dashboard_id = id, user_id = auth.user_id, "Dashboard deleted");

    Ok(Json(dashboard))
}

/// GET /api/dashboards/{id}/widgets
///
/// Live widgets of a dashboard in ascending id order. An unknown dashboard
/// yields an empty list.
pub async fn widgets(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<Vec<Widget>>> {
    let widgets = WidgetRepo::list_for_dashboard(&state.pool, id).await?;
    Ok(Json(widgets))
}

/// GET /api/dashboards/{id}/resolved
///
/// Merge the stored layout with the live widgets and return render-ready
/// descriptors. A stored layout that no longer decodes is ignored in favour
/// of registry order.
pub async fn resolved(
    _auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<Json<ResolvedDashboard>> {
    let live = WidgetRepo::list_for_dashboard(&state.pool, id).await?;
    let stored = LayoutRepo::find_by_dashboard(&state.pool, id).await?;

    let payload = match stored {
        Some(doc) => match LayoutPayload::from_stored(doc.layout) {
            Ok(payload) => Some(payload),
            Err(e) => {
                tracing::warn!(
                    dashboard_id = id,
                    error = %e,
                    "Stored layout unreadable, using registry order"
                );
                None
            }
        },
        None => None,
    };

    let resolved = resolve(payload.as_ref(), &live);
    Ok(Json(ResolvedDashboard {
        dashboard_id: id,
        source: resolved.source(),
        descriptors: resolved.descriptors(&live),
    }))
}
