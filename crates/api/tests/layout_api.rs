//! HTTP-level tests for reading and saving layout documents.

mod common;

use assert_matches::assert_matches;
use axum::http::StatusCode;
use common::{
    auth_token, body_json, create_dashboard, create_widget, delete_auth, get_auth,
    post_json_auth,
};
use serde_json::json;
use sqlx::PgPool;

async fn dashboard_with_two_widgets(pool: &PgPool, token: &str) -> (i64, i64, i64) {
    let a = create_widget(pool, token, json!({ "type": "kpi", "name": "A" })).await;
    let b = create_widget(pool, token, json!({ "type": "chart", "name": "B" })).await;
    let dashboard = create_dashboard(pool, token, "Main", &[a, b]).await;
    (dashboard, a, b)
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_get_layout_before_save_returns_404(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, _, _) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/layout"), &token).await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(body_json(response).await["code"], "NOT_FOUND");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_saved_rich_layout_reads_back_exactly(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;
    let layout = json!([
        {"id": b, "type": "chart", "props": {}},
        {"id": a, "type": "kpi", "props": {"style": {"border": "none"}, "size": {"width": 310, "height": 210}}}
    ]);

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": layout }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let saved = body_json(response).await;
    assert_eq!(saved["dashboard_id"], dashboard);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/layout"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["layout"], layout);
    assert_eq!(json["id"], saved["id"]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_rich_layout_with_editor_details_reads_back_unchanged(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;
    let layout = json!([
        {
            "widget_id": b,
            "type": "chart",
            "props": {
                "size": {"width": 320.5, "height": 199.25},
                "handlePosition": {"right": 12.5}
            }
        },
        {"id": a, "widget_id": 99, "type": "kpi", "props": null}
    ]);
    let uri = format!("/api/dashboards/{dashboard}/layout");

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(app, &uri, json!({ "layout": layout }), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["layout"], layout);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &uri, &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["layout"], layout);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_empty_type_is_not_a_placement(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, _) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": [{"id": a, "type": ""}] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_matches!(
        body_json(response).await["error"].as_str(),
        Some(message) if message.contains("is not a widget id")
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_string_encoded_layout_is_accepted(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;
    let encoded = json!([{"id": a, "type": "kpi"}, {"id": b, "type": "chart"}]).to_string();

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": encoded }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/layout"), &token).await;
    let json = body_json(response).await;
    assert_eq!(
        json["layout"],
        json!([{"id": a, "type": "kpi"}, {"id": b, "type": "chart"}])
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_legacy_layout_is_stored_as_sent(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": [b.to_string(), a] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["layout"], json!([b.to_string(), a]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_second_save_replaces_in_place(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;
    let uri = format!("/api/dashboards/{dashboard}/layout");

    let app = common::build_test_app(pool.clone());
    let first = body_json(post_json_auth(app, &uri, json!({ "layout": [a, b] }), &token).await).await;

    let app = common::build_test_app(pool.clone());
    let second = body_json(
        post_json_auth(
            app,
            &uri,
            json!({ "layout": [{"id": b, "type": "chart"}] }),
            &token,
        )
        .await,
    )
    .await;

    assert_eq!(first["id"], second["id"]);
    assert_eq!(second["layout"], json!([{"id": b, "type": "chart"}]));

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM config_layouts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 1);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_missing_layout_returns_400(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, _, _) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "widgets": [] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(
        body_json(response).await["error"],
        "Missing layout in request body"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_mixed_shape_layout_returns_400(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": [{"id": a, "type": "kpi"}, b] }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "VALIDATION_ERROR");

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/layout"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND, "nothing was stored");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_non_array_layout_returns_400(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, _, _) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": {"id": 1} }),
        &token,
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_save_for_unknown_dashboard_returns_404(pool: PgPool) {
    let token = auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/dashboards/31337/layout",
        json!({ "layout": [1, 2] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(
        body_json(response).await["error"],
        "Dashboard with id 31337 not found"
    );
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_deleting_dashboard_removes_layout(pool: PgPool) {
    let token = auth_token(&pool).await;
    let (dashboard, a, b) = dashboard_with_two_widgets(&pool, &token).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": [a, b] }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool.clone());
    delete_auth(app, &format!("/api/dashboards/{dashboard}"), &token).await;

    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM config_layouts")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(count, 0);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_layout_routes_require_bearer_token(pool: PgPool) {
    let app = common::build_test_app(pool);
    let response = common::post_json(app, "/api/dashboards/1/layout", json!({ "layout": [] })).await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}
