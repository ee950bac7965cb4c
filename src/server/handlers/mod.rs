//! Request handlers, one module per resource.

pub mod bricks;
pub mod database;
pub mod demo;
pub mod menu;
pub mod orders;
pub mod sets;

use axum::extract::rejection::JsonRejection;
use axum::response::IntoResponse;
use axum::Json;
use tracing::debug;

use crate::error::{PlaygroundError, Result};

pub async fn health_check() -> impl IntoResponse {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// Unwraps a JSON body, turning a malformed one into a 400.
fn read_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    payload.map(|Json(body)| body).map_err(|rejection| {
        debug!("Rejected request body: {}", rejection.body_text());
        PlaygroundError::bad_request(rejection.body_text())
    })
}
