//! `/api/lego-bricks` endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use serde_json::json;

use super::read_body;
use crate::error::{PlaygroundError, Result};
use crate::server::response::{created, listing, removed, success};
use crate::server::AppState;
use crate::store::bricks::{self, BrickFilter, BrickInput};

fn brick_not_found(message: &str) -> PlaygroundError {
    PlaygroundError::not_found("Lego brick not found", message)
}

pub async fn list_bricks(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<BrickFilter>,
) -> Result<Response> {
    let bricks = bricks::list_bricks(&state.pool, &filter)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Oops! Something went wrong while getting your Lego bricks",
                "Try again in a moment",
            )
        })?;
    Ok(listing(&bricks, "Here are your Lego bricks! 🧱"))
}

pub async fn create_brick(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<BrickInput>, JsonRejection>,
) -> Result<Response> {
    let brick = read_body(payload)?.validate()?;
    let brick = bricks::create_brick(&state.pool, &brick)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't add your Lego brick",
                "Check your brick details and try again",
            )
        })?;

    let message = format!(
        "🎉 New {} {} brick added to your collection!",
        brick.color, brick.shape
    );
    Ok(created(brick, message))
}

pub async fn get_brick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let brick = bricks::get_brick(&state.pool, &id)
        .await
        .map_err(|e| e.into_store_failure("Couldn't get your Lego brick", "Try again in a moment"))?
        .ok_or_else(|| brick_not_found("This brick doesn't exist in your collection"))?;

    let message = format!("Found your {} {} brick! 🧱", brick.color, brick.shape);
    Ok(success(brick, message))
}

pub async fn update_brick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<BrickInput>, JsonRejection>,
) -> Result<Response> {
    let changes = read_body(payload)?;
    let brick = bricks::update_brick(&state.pool, &id, &changes)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't update your Lego brick",
                "Check your brick details and try again",
            )
        })?
        .ok_or_else(|| brick_not_found("Can't update a brick that doesn't exist"))?;

    let message = format!(
        "✨ Your {} {} brick has been updated!",
        brick.color, brick.shape
    );
    Ok(success(brick, message))
}

pub async fn delete_brick(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let brick = bricks::delete_brick(&state.pool, &id)
        .await
        .map_err(|e| {
            e.into_store_failure("Couldn't remove your Lego brick", "Try again in a moment")
        })?
        .ok_or_else(|| brick_not_found("Can't remove a brick that doesn't exist"))?;

    Ok(removed(
        "removedBrick",
        json!({
            "name": brick.name,
            "color": brick.color,
            "shape": brick.shape,
        }),
        format!(
            "🗑️ Removed {} {} brick from your collection",
            brick.color, brick.shape
        ),
    ))
}
