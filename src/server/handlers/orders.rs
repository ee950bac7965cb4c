//! `/api/orders` endpoints.

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
use crate::store::orders::{self, OrderFilter, OrderInput, OrderUpdate};

fn order_not_found(message: &str) -> PlaygroundError {
    PlaygroundError::not_found("Order not found", message)
}

pub async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(filter): Query<OrderFilter>,
) -> Result<Response> {
    let orders = orders::list_orders(&state.pool, &filter)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Sorry, couldn't fetch orders",
                "The waiter lost track of the orders",
            )
        })?;
    Ok(listing(&orders, "📋 Here are the current orders!"))
}

pub async fn create_order(
    State(state): State<Arc<AppState>>,
    payload: std::result::Result<Json<OrderInput>, JsonRejection>,
) -> Result<Response> {
    let order = read_body(payload)?.validate()?;
    let placed = orders::create_order(&state.pool, &order)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't place the order",
                "The waiter couldn't send this order to the kitchen",
            )
        })?;

    let message = format!(
        "🍽️ Order for {} at table {} has been placed!",
        placed.order.customer_name, placed.order.table_number
    );
    Ok(created(placed, message))
}

pub async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let order = orders::get_order(&state.pool, &id)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't get the order",
                "The waiter couldn't find this order",
            )
        })?
        .ok_or_else(|| order_not_found("This order doesn't exist in our system"))?;

    let message = format!(
        "📋 Found order for {} at table {}",
        order.order.customer_name, order.order.table_number
    );
    Ok(success(order, message))
}

pub async fn update_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: std::result::Result<Json<OrderUpdate>, JsonRejection>,
) -> Result<Response> {
    let changes = read_body(payload)?;
    let order = orders::update_order(&state.pool, &id, &changes)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't update the order",
                "The waiter couldn't update this order",
            )
        })?
        .ok_or_else(|| order_not_found("Can't update an order that doesn't exist"))?;

    let message = match changes.status() {
        Ok(Some(status)) => status.announcement(),
        _ => "✨ Order updated!",
    };
    Ok(success(order, message))
}

pub async fn delete_order(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Response> {
    let order = orders::delete_order(&state.pool, &id)
        .await
        .map_err(|e| {
            e.into_store_failure(
                "Couldn't cancel the order",
                "The waiter couldn't cancel this order",
            )
        })?
        .ok_or_else(|| order_not_found("Can't cancel an order that doesn't exist"))?;

    Ok(removed(
        "cancelledOrder",
        json!({
            "customerName": order.customer_name,
            "tableNumber": order.table_number,
            "totalPrice": order.total_price,
        }),
        format!(
            "🗑️ Order for {} at table {} has been cancelled",
            order.customer_name, order.table_number
        ),
    ))
}
