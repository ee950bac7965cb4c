//! `/api/lego-sets` endpoints.

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
use crate::store::sets::{self, SetFilter, SetInput};

fn set_not_found(message: &str) -> PlaygroundError {
    PlaygroundError::not_found("Lego set not found", message)
}

pub async fn list_sets(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<SetFilter>,
) -> Result<Response> {
    let sets = sets::list_sets(&state.pool, &filter).await.map_err(|e| {
        e.into_store_failure(
            "Oops! Something went wrong while getting your Lego sets",
            "Try again in a moment",
        )
    })?;
    Ok(listing(&sets, "Here are your Lego sets! 📦"))
}

pub async fn create_set(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<SetInput>, JsonRejection>,
) -> Result<Response> {
    let set = read_body(payload)?.validate()?;
    let set = sets::create_set(&state.pool, &set).await.map_err(|e| {
        e.into_store_failure(
            "Couldn't add your Lego set",
            "Check your set details and try again",
        )
    })?;

    let message = format!(
        "🎉 New {} Lego set \"{}\" added to your collection!",
        set.theme, set.name
    );
    Ok(created(set, message))
}

pub async fn get_set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let set = sets::get_set(&state.pool, &id)
        .await
        .map_err(|e| e.into_store_failure("Couldn't get your Lego set", "Try again in a moment"))?
        .ok_or_else(|| set_not_found("This set doesn't exist in your collection"))?;

    let message = format!("Found your {} set \"{}\"! 📦", set.theme, set.name);
    Ok(success(set, message))
}

pub async fn update_set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<SetInput>, JsonRejection>,
) -> Result<Response> {
    let changes = read_body(payload)?;
    let set = sets::update_set(&state.pool, &id, &changes)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't update your Lego set",
                "Check your set details and try again",
            )
        })?
        .ok_or_else(|| set_not_found("Can't update a set that doesn't exist"))?;

    let message = format!(
        "✨ Your {} set \"{}\" has been updated!",
        set.theme, set.name
    );
    Ok(success(set, message))
}

pub async fn delete_set(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let set = sets::delete_set(&state.pool, &id)
        .await
        .map_err(|e| e.into_store_failure("Couldn't remove your Lego set", "Try again in a moment"))?
        .ok_or_else(|| set_not_found("Can't remove a set that doesn't exist"))?;

    Ok(removed(
        "removedSet",
        json!({
            "name": set.name,
            "theme": set.theme,
            "pieceCount": set.piece_count,
        }),
        format!(
            "🗑️ Removed {} set \"{}\" from your collection",
            set.theme, set.name
        ),
    ))
}
