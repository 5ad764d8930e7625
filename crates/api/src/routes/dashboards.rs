//! Route definitions for dashboards and their layout documents.

use axum::routing::{delete, get};
use axum::Router;

use crate::handlers::{dashboards, layouts};
use crate::state::AppState;

/// Routes mounted at `/dashboards`.
///
/// ```text
/// GET    /                  -> list
/// POST   /                  -> create
/// DELETE /{id}              -> delete
/// GET    /{id}/widgets      -> widgets
/// GET    /{id}/layout       -> get_layout
/// POST   /{id}/layout       -> save_layout
/// GET    /{id}/resolved     -> resolved
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboards::list).post(dashboards::create))
        .route("/{id}", delete(dashboards::delete))
        .route("/{id}/widgets", get(dashboards::widgets))
        .route(
            "/{id}/layout",
            get(layouts::get_layout).post(layouts::save_layout),
        )
        .route("/{id}/resolved", get(dashboards::resolved))
}
