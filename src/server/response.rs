//! JSON envelopes shared by the HTTP handlers.
//!
//! Successful responses carry `{success: true, data, message}`; failures carry
//! `{success: false, error, message}` with a status derived from the error.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use crate::error::PlaygroundError;

/// Shown when the database rejects a console query.
pub const QUERY_FAILED_MESSAGE: &str = "There was an error executing your query. Check the syntax!";

/// Shown instead of [`QUERY_FAILED_MESSAGE`] for an unknown column.
pub const UNDEFINED_COLUMN_MESSAGE: &str = "Column name error: PostgreSQL requires quoted identifiers for camelCase columns. Use \"tableNumber\" instead of tableNumber, or \"totalPrice\" instead of totalPrice. Check the table schema for exact column names.";

pub const UNDEFINED_COLUMN_HINT: &str = "Tip: Use double quotes around camelCase column names like \"tableNumber\", \"totalPrice\", \"customerName\", etc.";

/// 200 response with a single record.
pub fn success<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    Json(json!({
        "success": true,
        "data": data,
        "message": message.into(),
    }))
    .into_response()
}

/// 200 response with a list of records and their count.
pub fn listing<T: Serialize>(data: &[T], message: impl Into<String>) -> Response {
    Json(json!({
        "success": true,
        "data": data,
        "count": data.len(),
        "message": message.into(),
    }))
    .into_response()
}

/// 201 response echoing a newly stored record.
pub fn created<T: Serialize>(data: T, message: impl Into<String>) -> Response {
    (
        StatusCode::CREATED,
        Json(json!({
            "success": true,
            "data": data,
            "message": message.into(),
        })),
    )
        .into_response()
}

/// 200 response for a removal, carrying a summary of the removed record
/// under `key`.
pub fn removed<T: Serialize>(key: &str, summary: T, message: impl Into<String>) -> Response {
    let mut body = json!({
        "success": true,
        "message": message.into(),
    });
    body[key] = json!(summary);
    Json(body).into_response()
}

impl PlaygroundError {
    /// HTTP status for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::Validation { .. } | Self::Rejected { .. } | Self::BadRequest(_) => {
                StatusCode::BAD_REQUEST
            }
            Self::NotFound { .. } => StatusCode::NOT_FOUND,
            Self::Store { .. }
            | Self::Database { .. }
            | Self::Connection(_)
            | Self::Config(_)
            | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The failure envelope for this error.
    pub fn to_json(&self) -> Value {
        match self {
            Self::Validation {
                error,
                message,
                required,
                missing,
            } => {
                let mut body = json!({
                    "success": false,
                    "error": error,
                    "message": message,
                });
                if !required.is_empty() {
                    body["required"] = json!(required);
                    body["missing"] = json!(missing);
                }
                body
            }
            Self::NotFound { error, message }
            | Self::Rejected { error, message }
            | Self::Store { error, message, .. } => json!({
                "success": false,
                "error": error,
                "message": message,
            }),
            Self::BadRequest(reason) => json!({
                "success": false,
                "error": "Invalid JSON",
                "message": reason,
            }),
            Self::Database { message, .. } => {
                let mut body = json!({
                    "success": false,
                    "error": message,
                    "message": QUERY_FAILED_MESSAGE,
                });
                if self.is_undefined_column() {
                    body["message"] = json!(UNDEFINED_COLUMN_MESSAGE);
                    body["hint"] = json!(UNDEFINED_COLUMN_HINT);
                }
                body
            }
            Self::Connection(_) | Self::Config(_) | Self::Internal(_) => json!({
                "success": false,
                "error": self.to_string(),
                "message": "Try again in a moment",
            }),
        }
    }
}

impl IntoResponse for PlaygroundError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            error!("{}: {}", self.category(), self);
        }
        (status, Json(self.to_json())).into_response()
    }
}
