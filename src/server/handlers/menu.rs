//! `/api/menu` endpoints.

use std::sync::Arc;

use axum::extract::rejection::JsonRejection;
use axum::extract::{Query, State};
use axum::response::Response;
use axum::Json;

use super::read_body;
use crate::error::Result;
use crate::server::response::{created, listing};
use crate::server::AppState;
use crate::store::menu::{self, MenuFilter, MenuItemInput};

pub async fn list_menu(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<MenuFilter>,
) -> Result<Response> {
    let items = menu::list_menu_items(&state.pool, &filter)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Sorry, couldn't fetch the menu",
                "The kitchen is having trouble right now",
            )
        })?;
    Ok(listing(&items, "🍽️ Here's our delicious menu!"))
}

pub async fn create_menu_item(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<MenuItemInput>, JsonRejection>,
) -> Result<Response> {
    let item = read_body(payload)?.validate()?;
    let item = menu::create_menu_item(&state.pool, &item)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't add menu item",
                "The chef couldn't add this to the menu",
            )
        })?;

    let message = format!(
        "👨‍🍳 New {} \"{}\" added to the menu!",
        item.category, item.name
    );
    Ok(created(item, message))
}
