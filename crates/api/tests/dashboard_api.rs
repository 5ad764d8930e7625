//! HTTP-level tests for dashboards and their resolved view.

mod common;

use axum::http::StatusCode;
use common::{
    auth_token, body_json, create_dashboard, create_widget, delete_auth, get_auth,
    post_json_auth,
};
use serde_json::{json, Value};
use sqlx::PgPool;

fn ids(list: &Value) -> Vec<i64> {
    list.as_array()
        .unwrap()
        .iter()
        .map(|w| w["id"].as_i64().unwrap())
        .collect()
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_dashboard(pool: PgPool) {
    let token = auth_token(&pool).await;
    let w = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a" })).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(
        app,
        "/api/dashboards",
        json!({ "name": "Sales", "widgets": [w] }),
        &token,
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["name"], "Sales");
    assert_eq!(json["widget_ids"], json!([w]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_dashboard_without_widgets(pool: PgPool) {
    let token = auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/dashboards", json!({ "name": "Empty" }), &token).await;

    assert_eq!(response.status(), StatusCode::CREATED);
    assert_eq!(body_json(response).await["widget_ids"], json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_create_dashboard_requires_name(pool: PgPool) {
    let token = auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = post_json_auth(app, "/api/dashboards", json!({ "widget_ids": [1] }), &token).await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["error"], "Dashboard name is required");
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_list_expands_widgets_in_stored_order(pool: PgPool) {
    let token = auth_token(&pool).await;
    let a = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a" })).await;
    let b = create_widget(&pool, &token, json!({ "type": "chart", "name": "b" })).await;
    let c = create_widget(&pool, &token, json!({ "type": "table", "name": "c" })).await;
    create_dashboard(&pool, &token, "Ops", &[c, a, b]).await;

    let app = common::build_test_app(pool.clone());
    delete_auth(app, &format!("/api/widgets/{a}"), &token).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboards", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let dashboard = &json.as_array().unwrap()[0];
    assert_eq!(dashboard["name"], "Ops");
    assert_eq!(dashboard["widget_ids"], json!([c, a, b]));
    assert_eq!(ids(&dashboard["widgets"]), vec![c, b]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_dashboard_widgets_are_live_and_ascending(pool: PgPool) {
    let token = auth_token(&pool).await;
    let a = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a" })).await;
    let b = create_widget(&pool, &token, json!({ "type": "chart", "name": "b" })).await;
    let dashboard = create_dashboard(&pool, &token, "Ops", &[b, 999_999, a]).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/widgets"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(ids(&body_json(response).await), vec![a, b]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_widgets_of_unknown_dashboard_is_empty(pool: PgPool) {
    let token = auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboards/424242/widgets", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await, json!([]));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_delete_dashboard_keeps_widgets(pool: PgPool) {
    let token = auth_token(&pool).await;
    let w = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a" })).await;
    let dashboard = create_dashboard(&pool, &token, "Ops", &[w]).await;

    let app = common::build_test_app(pool.clone());
    let response = delete_auth(app, &format!("/api/dashboards/{dashboard}"), &token).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["id"], dashboard);

    let app = common::build_test_app(pool.clone());
    let response = get_auth(app, "/api/widgets", &token).await;
    assert_eq!(ids(&body_json(response).await), vec![w]);

    let app = common::build_test_app(pool);
    let response = delete_auth(app, &format!("/api/dashboards/{dashboard}"), &token).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolved_without_layout_uses_registry_order(pool: PgPool) {
    let token = auth_token(&pool).await;
    let a = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a", "title": "A" })).await;
    let b = create_widget(&pool, &token, json!({ "type": "chart", "name": "b" })).await;
    let dashboard = create_dashboard(&pool, &token, "Ops", &[b, a]).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/resolved"), &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["dashboard_id"], dashboard);
    assert_eq!(json["source"], "registry");
    let descriptors = &json["descriptors"];
    assert_eq!(ids(descriptors), vec![a, b]);
    assert_eq!(descriptors[0]["title"], "A");
    assert_eq!(descriptors[0]["size"], json!({"width": 300, "height": 200}));
    assert_eq!(descriptors[1]["title"], "b");
    assert_eq!(descriptors[1]["size"], json!({"width": 600, "height": 300}));
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolved_applies_rich_overrides(pool: PgPool) {
    let token = auth_token(&pool).await;
    let a = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a" })).await;
    let b = create_widget(
        &pool,
        &token,
        json!({ "type": "chart", "name": "b", "size": {"width": 500, "height": 250} }),
    )
    .await;
    let dashboard = create_dashboard(&pool, &token, "Ops", &[a, b]).await;

    let layout = json!([
        {"id": b, "type": "chart", "props": {"size": {"width": 800, "height": 400}, "handlePosition": {"right": 4}}},
        {"id": a, "type": "kpi", "props": {}}
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

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/resolved"), &token).await;
    let json = body_json(response).await;

    assert_eq!(json["source"], "rich");
    let descriptors = &json["descriptors"];
    assert_eq!(ids(descriptors), vec![b, a]);
    assert_eq!(descriptors[0]["size"], json!({"width": 800, "height": 400}));
    assert_eq!(descriptors[0]["handlePosition"], json!({"right": 4}));
    assert_eq!(descriptors[1]["size"], json!({"width": 300, "height": 200}));
    assert_eq!(descriptors[1]["detached"], false);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolved_legacy_layout_drops_stale_ids(pool: PgPool) {
    let token = auth_token(&pool).await;
    let a = create_widget(&pool, &token, json!({ "type": "kpi", "name": "a" })).await;
    let b = create_widget(&pool, &token, json!({ "type": "chart", "name": "b" })).await;
    let dashboard = create_dashboard(&pool, &token, "Ops", &[a, b]).await;

    let app = common::build_test_app(pool.clone());
    post_json_auth(
        app,
        &format!("/api/dashboards/{dashboard}/layout"),
        json!({ "layout": [b, 999_999, a] }),
        &token,
    )
    .await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, &format!("/api/dashboards/{dashboard}/resolved"), &token).await;
    let json = body_json(response).await;

    assert_eq!(json["source"], "legacy");
    assert_eq!(ids(&json["descriptors"]), vec![b, a]);
}

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_resolved_for_unknown_dashboard_is_empty(pool: PgPool) {
    let token = auth_token(&pool).await;

    let app = common::build_test_app(pool);
    let response = get_auth(app, "/api/dashboards/77/resolved", &token).await;

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["source"], "registry");
    assert_eq!(json["descriptors"], json!([]));
}
