//! SQL console, schema and walkthrough endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Map, Value};
use tracing::{info, warn};

use super::read_body;
use crate::db::{known_tables, Column, Schema};
use crate::error::{PlaygroundError, Result};
use crate::query::{ConsoleOutcome, QueryConsole};
use crate::safety::{explain_query, QueryInfo, QueryKind};
use crate::server::response::success;
use crate::server::AppState;

/// Body of console and walkthrough requests.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Kept as raw JSON so a non-string value is reported as a missing query.
    query: Option<Value>,
}

impl QueryRequest {
    fn sql(&self) -> Result<&str> {
        match &self.query {
            Some(Value::String(sql)) if !sql.is_empty() => Ok(sql),
            _ => Err(PlaygroundError::invalid(
                "Query is required",
                "Please provide a SQL query",
            )),
        }
    }
}

/// `POST /api/database/query`
pub async fn run_query(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Response> {
    let request = read_body(payload)?;
    let sql = request.sql()?;

    let console = QueryConsole::new(state.db.as_ref());
    match console.run(sql).await {
        Ok(ConsoleOutcome::Preview {
            info,
            affected_rows,
        }) => Ok(Json(preview_body(&info, affected_rows)).into_response()),
        Ok(ConsoleOutcome::Rows(result)) => {
            info!(rows = result.row_count, "Console query executed");
            Ok(Json(json!({
                "success": true,
                "isPreview": false,
                "data": result.to_json_rows(),
                "count": result.row_count,
                "message": "Query executed successfully!",
            }))
            .into_response())
        }
        Err(e @ PlaygroundError::Rejected { .. }) => {
            let mut body = e.to_json();
            body["isPreview"] = json!(false);
            Ok((StatusCode::BAD_REQUEST, Json(body)).into_response())
        }
        Err(e) => Err(e),
    }
}

/// Describes a previewed statement without running it.
fn preview_body(info: &QueryInfo, affected_rows: Option<u64>) -> Value {
    let table = info.table_or_placeholder();
    let rows = affected_rows.unwrap_or(0);
    let plural = if rows == 1 { "" } else { "s" };

    let (message, warning) = match info.kind {
        QueryKind::Delete => (
            format!("⚠️ This would DELETE {rows} row{plural} from {table}"),
            "This is a preview only. No data was actually deleted. Be careful with DELETE commands!",
        ),
        QueryKind::Update => (
            format!("⚠️ This would UPDATE {rows} row{plural} in {table}"),
            "This is a preview only. No data was actually updated. Be careful with UPDATE commands!",
        ),
        _ => (
            format!("⚠️ This would INSERT a new row into {table}"),
            "This is a preview only. No data was actually inserted. Be careful with INSERT commands!",
        ),
    };

    let mut body = json!({
        "success": true,
        "isPreview": true,
        "queryType": info.kind,
        "table": info.table,
        "message": message,
        "warning": warning,
        "data": [],
    });
    if info.kind.needs_row_estimate() {
        body["affectedRows"] = json!(rows);
    }
    body
}

/// `GET /api/database/schema`
///
/// Always answers 200. When introspection fails the known tables are listed
/// with empty column lists.
pub async fn schema(State(state): State<Arc<AppState>>) -> Response {
    match state.db.introspect_schema().await {
        Ok(schema) => success(schema_body(Some(&schema)), "Schema retrieved successfully"),
        Err(e) => {
            warn!("Schema introspection failed: {}", e);
            success(
                schema_body(None),
                "Could not read column details; showing known tables only",
            )
        }
    }
}

fn column_json(column: &Column) -> Value {
    json!({
        "name": column.name,
        "quotedName": column.quoted_name(),
        "type": column.data_type,
        "nullable": column.is_nullable,
        "default": column.default,
    })
}

/// Maps each known table to its columns and static metadata.
fn schema_body(schema: Option<&Schema>) -> Value {
    let tables: Map<String, Value> = known_tables()
        .iter()
        .map(|metadata| {
            let columns: Vec<Value> = schema
                .and_then(|s| s.table(metadata.table))
                .map(|table| table.columns.iter().map(column_json).collect())
                .unwrap_or_default();
            (
                metadata.table.to_string(),
                json!({
                    "columns": columns,
                    "metadata": metadata,
                }),
            )
        })
        .collect();
    Value::Object(tables)
}

/// `POST /api/database/explain`
pub async fn explain(
    payload: std::result::Result<Json<QueryRequest>, JsonRejection>,
) -> Result<Response> {
    let request = read_body(payload)?;
    let walkthrough = explain_query(request.sql()?);
    Ok(success(walkthrough, "Here is how this query runs, step by step"))
}
