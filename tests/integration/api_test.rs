//! HTTP API integration tests.
//!
//! Drives the router against a real database.

use std::sync::Arc;

use axum::body::{to_bytes, Body};
use axum::http::{Method, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use sql_playground::db::DatabaseClient;
use sql_playground::server::{router, AppState};
use tower::ServiceExt;

use super::{get_test_client, unique_name};

async fn get_test_app() -> Option<Router> {
    let client = get_test_client().await?;
    let pool = client.pool().clone();
    let db: Arc<dyn DatabaseClient> = Arc::new(client);
    Some(router(AppState::new(db, pool)))
}

async fn send(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let request = Request::builder().method(method).uri(uri);
    let request = match body {
        Some(body) => request
            .header("content-type", "application/json")
            .body(Body::from(body.to_string())),
        None => request.body(Body::empty()),
    }
    .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_brick_endpoints() {
    let Some(app) = get_test_app().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let color = unique_name("red");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/lego-bricks",
        Some(json!({
            "name": "Classic",
            "color": color,
            "size": "2x4",
            "shape": "rectangle",
            "quantity": 10
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["quantity"], 10);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::GET,
        &format!("/api/lego-bricks?color={color}&limit=5"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["count"], 1);

    let (status, body) = send(&app, Method::DELETE, &format!("/api/lego-bricks/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["removedBrick"]["color"], color.as_str());

    let (status, body) = send(&app, Method::GET, &format!("/api/lego-bricks/{id}"), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"], "Lego brick not found");
}

#[tokio::test]
async fn test_order_status_announcements() {
    let Some(app) = get_test_app().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let (_, menu) = send(&app, Method::GET, "/api/menu", None).await;
    let dish_id = menu["data"][0]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/orders",
        Some(json!({
            "customerName": unique_name("Guest"),
            "tableNumber": "12",
            "items": [{"menuItemId": dish_id, "quantity": 2}]
        })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["data"]["tableNumber"], 12);
    let id = body["data"]["id"].as_str().unwrap().to_string();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{id}"),
        Some(json!({"status": "CONFIRMED"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "✅ Order confirmed and sent to kitchen");

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/orders/{id}"),
        Some(json!({"status": "EATEN"})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "Invalid status");

    let (status, body) = send(&app, Method::DELETE, &format!("/api/orders/{id}"), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["cancelledOrder"]["tableNumber"], 12);
}

#[tokio::test]
async fn test_console_over_http() {
    let Some(app) = get_test_app().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/database/query",
        Some(json!({"query": "DELETE FROM orders WHERE status = 'NOPE'"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["isPreview"], true);
    assert_eq!(body["affectedRows"], 0);

    let (status, body) = send(&app, Method::GET, "/api/database/schema", None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body["data"]["orders"]["columns"][1]["quotedName"],
        "\"customerName\""
    );
}
