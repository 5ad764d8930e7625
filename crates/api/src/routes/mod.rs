pub mod auth;
pub mod dashboards;
pub mod health;
pub mod widgets;

use axum::Router;

use crate::state::AppState;

/// Build the `/api` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /auth/signup                      signup (public)
/// /auth/login                       login (public)
/// /auth/me                          current session user (cookie)
/// /auth/logout                      revoke session (cookie)
///
/// /widgets                          list, create
/// /widgets/{id}                     replace, delete
///
/// /dashboards                       list (widgets expanded), create
/// /dashboards/{id}                  delete
/// /dashboards/{id}/widgets          live widgets
/// /dashboards/{id}/layout           get, upsert
/// /dashboards/{id}/resolved         resolved render descriptors
/// ```
///
/// Everything outside `/auth` requires a bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/widgets", widgets::router())
        .nest("/dashboards", dashboards::router())
}
