//! `/api/users` and `/api/posts`: the in-memory beginner examples.
//!
//! These keep a bare `{data, ...}` / `{error}` envelope without `success`.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Deserialize;
use serde_json::json;

use crate::error::PlaygroundError;
use crate::server::AppState;
use crate::store::demo::{PostInput, UserInput};

/// `?limit=` on the list routes.
#[derive(Debug, Default, Deserialize)]
pub struct LimitQuery {
    limit: Option<String>,
}

impl LimitQuery {
    fn limit(&self) -> Option<usize> {
        crate::store::parse_limit(self.limit.as_deref()).and_then(|l| usize::try_from(l).ok())
    }
}

fn demo_error(status: StatusCode, error: &str) -> Response {
    (status, Json(json!({ "error": error }))).into_response()
}

fn invalid_json() -> Response {
    demo_error(StatusCode::BAD_REQUEST, "Invalid JSON")
}

fn rejected(e: PlaygroundError) -> Response {
    let reason = match e {
        PlaygroundError::BadRequest(reason) => reason,
        other => other.to_string(),
    };
    demo_error(StatusCode::BAD_REQUEST, &reason)
}

fn user_not_found() -> Response {
    demo_error(StatusCode::NOT_FOUND, "User not found")
}

fn post_not_found() -> Response {
    demo_error(StatusCode::NOT_FOUND, "Post not found")
}

pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let users = state.demo.list_users(query.limit()).await;
    Json(json!({ "data": users, "count": users.len() })).into_response()
}

pub async fn create_user(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Response {
    let Ok(Json(input)) = payload else {
        return invalid_json();
    };
    match state.demo.create_user(input).await {
        Ok(user) => (
            StatusCode::CREATED,
            Json(json!({ "data": user, "message": "User created" })),
        )
            .into_response(),
        Err(e) => rejected(e),
    }
}

pub async fn get_user(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.demo.get_user(&id).await {
        Some(user) => Json(json!({ "data": user })).into_response(),
        None => user_not_found(),
    }
}

pub async fn update_user(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<UserInput>, JsonRejection>,
) -> Response {
    let Ok(Json(input)) = payload else {
        return invalid_json();
    };
    match state.demo.update_user(&id, input).await {
        Some(user) => Json(json!({ "data": user, "message": "User updated" })).into_response(),
        None => user_not_found(),
    }
}

pub async fn delete_user(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.demo.delete_user(&id).await {
        Some(user) => Json(json!({ "data": user, "message": "User deleted" })).into_response(),
        None => user_not_found(),
    }
}

pub async fn list_posts(
    State(state): State<Arc<AppState>>,
    Query(query): Query<LimitQuery>,
) -> Response {
    let posts = state.demo.list_posts(query.limit()).await;
    Json(json!({ "data": posts, "count": posts.len() })).into_response()
}

pub async fn create_post(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> Response {
    let Ok(Json(input)) = payload else {
        return invalid_json();
    };
    match state.demo.create_post(input).await {
        Ok(post) => (
            StatusCode::CREATED,
            Json(json!({ "data": post, "message": "Post created" })),
        )
            .into_response(),
        Err(e) => rejected(e),
    }
}

pub async fn get_post(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.demo.get_post(&id).await {
        Some(post) => Json(json!({ "data": post })).into_response(),
        None => post_not_found(),
    }
}

pub async fn update_post(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<PostInput>, JsonRejection>,
) -> Response {
    let Ok(Json(input)) = payload else {
        return invalid_json();
    };
    match state.demo.update_post(&id, input).await {
        Some(post) => Json(json!({ "data": post, "message": "Post updated" })).into_response(),
        None => post_not_found(),
    }
}

pub async fn delete_post(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    match state.demo.delete_post(&id).await {
        Some(post) => Json(json!({ "data": post, "message": "Post deleted" })).into_response(),
        None => post_not_found(),
    }
}
