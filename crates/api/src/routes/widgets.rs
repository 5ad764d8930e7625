//! Route definitions for the widget registry.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::widgets;
use crate::state::AppState;

/// Routes mounted at `/widgets`.
///
/// ```text
/// GET    /        -> list
/// POST   /        -> create
/// PUT    /{id}    -> update
/// DELETE /{id}    -> delete
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(widgets::list).post(widgets::create))
        .route("/{id}", put(widgets::update).delete(widgets::delete))
}
