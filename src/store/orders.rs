//! Restaurant orders and their line items.

use std::collections::HashMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, QueryBuilder};

use super::menu::{menu_items_by_ids, MenuItem};
use super::{is_blank, lenient_integer};
use crate::error::{PlaygroundError, Result};

/// Fields a new order must carry.
pub const REQUIRED_FIELDS: &[&str] = &["customerName", "tableNumber", "items"];

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Preparing,
    Ready,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 6] = [
        Self::Pending,
        Self::Confirmed,
        Self::Preparing,
        Self::Ready,
        Self::Delivered,
        Self::Cancelled,
    ];

    /// Parses the exact uppercase status name.
    pub fn parse(status: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|s| s.as_str() == status)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Preparing => "PREPARING",
            Self::Ready => "READY",
            Self::Delivered => "DELIVERED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// What the kitchen tells the customer after moving to this status.
    pub fn announcement(self) -> &'static str {
        match self {
            Self::Pending => "⏳ Order is waiting to be confirmed",
            Self::Confirmed => "✅ Order confirmed and sent to kitchen",
            Self::Preparing => "👨‍🍳 Kitchen is preparing your order",
            Self::Ready => "🛎️ Order is ready for pickup/delivery",
            Self::Delivered => "🍽️ Order has been delivered",
            Self::Cancelled => "❌ Order has been cancelled",
        }
    }

    /// Comma-separated list of every status name.
    pub fn valid_list() -> String {
        Self::ALL
            .iter()
            .map(|s| s.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A stored order row.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub customer_name: String,
    pub user_id: Option<String>,
    pub table_number: i32,
    pub status: String,
    pub total_price: f64,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A stored order line.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: String,
    pub order_id: String,
    pub menu_item_id: String,
    pub quantity: i32,
    pub special_requests: Option<String>,
}

/// An order line together with the dish it refers to.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderLine {
    #[serde(flatten)]
    pub item: OrderItem,
    pub menu_item: Option<MenuItem>,
}

/// An order with its lines, as returned by the API.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderDetails {
    #[serde(flatten)]
    pub order: Order,
    pub items: Vec<OrderLine>,
}

/// One requested line of a new order.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemInput {
    pub menu_item_id: String,
    pub quantity: Option<i32>,
    pub special_requests: Option<String>,
}

impl OrderItemInput {
    fn quantity(&self) -> i32 {
        self.quantity.unwrap_or(1)
    }
}

/// Request body for placing an order.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderInput {
    pub customer_name: Option<String>,
    pub table_number: Option<JsonValue>,
    pub items: Option<Vec<OrderItemInput>>,
    pub notes: Option<String>,
}

impl OrderInput {
    /// Checks the body of a create request.
    pub fn validate(self) -> Result<NewOrder> {
        let table_number = lenient_integer(self.table_number.as_ref()).filter(|n| *n != 0);
        let items = self.items.filter(|items| !items.is_empty());

        let mut missing = Vec::new();
        if is_blank(self.customer_name.as_deref()) {
            missing.push("customerName");
        }
        if table_number.is_none() {
            missing.push("tableNumber");
        }
        if items.is_none() {
            missing.push("items");
        }

        match (table_number, items) {
            (Some(table_number), Some(items)) if missing.is_empty() => Ok(NewOrder {
                customer_name: self.customer_name.unwrap_or_default(),
                table_number,
                items,
                notes: self.notes,
            }),
            _ => Err(PlaygroundError::validation(
                "Missing required information",
                "Every order needs: customerName, tableNumber, and at least one item",
                REQUIRED_FIELDS,
                missing,
            )),
        }
    }
}

/// A validated order about to be placed.
#[derive(Debug, Clone)]
pub struct NewOrder {
    pub customer_name: String,
    pub table_number: i32,
    pub items: Vec<OrderItemInput>,
    pub notes: Option<String>,
}

impl NewOrder {
    /// Sums price times quantity over every line.
    ///
    /// Fails when a line names a dish that is not on the menu.
    pub fn total_price(&self, menu: &[MenuItem]) -> Result<f64> {
        self.items.iter().try_fold(0.0, |total, line| {
            let dish = menu
                .iter()
                .find(|m| m.id == line.menu_item_id)
                .ok_or_else(|| {
                    PlaygroundError::invalid(
                        "Unknown menu item",
                        format!("Menu item {} not found", line.menu_item_id),
                    )
                })?;
            Ok(total + dish.price * f64::from(line.quantity()))
        })
    }
}

/// Request body for updating an order.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct OrderUpdate {
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl OrderUpdate {
    /// Returns the requested status, rejecting unknown names.
    pub fn status(&self) -> Result<Option<OrderStatus>> {
        match self.status.as_deref().filter(|s| !s.is_empty()) {
            None => Ok(None),
            Some(status) => OrderStatus::parse(status).map(Some).ok_or_else(|| {
                PlaygroundError::invalid(
                    "Invalid status",
                    format!("Status must be one of: {}", OrderStatus::valid_list()),
                )
            }),
        }
    }
}

/// Query-string filters for listing orders.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderFilter {
    pub status: Option<String>,
    pub table_number: Option<String>,
}

/// Lists orders with their lines, newest first.
pub async fn list_orders(pool: &PgPool, filter: &OrderFilter) -> Result<Vec<OrderDetails>> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM orders WHERE 1=1");

    if let Some(status) = filter.status.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND status = ").push_bind(status.to_uppercase());
    }
    if let Some(table) = filter
        .table_number
        .as_deref()
        .and_then(|t| t.trim().parse::<i32>().ok())
    {
        query.push(r#" AND "tableNumber" = "#).push_bind(table);
    }

    query.push(r#" ORDER BY "createdAt" DESC"#);

    let orders = query.build_query_as::<Order>().fetch_all(pool).await?;
    attach_lines(pool, orders).await
}

/// Gets an order with its lines.
pub async fn get_order(pool: &PgPool, id: &str) -> Result<Option<OrderDetails>> {
    let order: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;

    match order {
        Some(order) => Ok(attach_lines(pool, vec![order]).await?.pop()),
        None => Ok(None),
    }
}

/// Places an order, pricing it from the current menu.
pub async fn create_order(pool: &PgPool, order: &NewOrder) -> Result<OrderDetails> {
    let ids: Vec<String> = order
        .items
        .iter()
        .map(|line| line.menu_item_id.clone())
        .collect();
    let menu = menu_items_by_ids(pool, &ids).await?;
    let total_price = order.total_price(&menu)?;

    let mut tx = pool.begin().await?;

    let created: Order = sqlx::query_as(
        r#"
        INSERT INTO orders ("customerName", "tableNumber", "totalPrice", notes)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(&order.customer_name)
    .bind(order.table_number)
    .bind(total_price)
    .bind(&order.notes)
    .fetch_one(&mut *tx)
    .await?;

    for line in &order.items {
        sqlx::query(
            r#"
            INSERT INTO order_items ("orderId", "menuItemId", quantity, "specialRequests")
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(&created.id)
        .bind(&line.menu_item_id)
        .bind(line.quantity())
        .bind(&line.special_requests)
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;

    get_order(pool, &created.id)
        .await?
        .ok_or_else(|| PlaygroundError::internal("Order vanished after being placed"))
}

/// Updates status and notes. Returns `None` when the order does not exist.
pub async fn update_order(
    pool: &PgPool,
    id: &str,
    changes: &OrderUpdate,
) -> Result<Option<OrderDetails>> {
    let existing: Option<Order> = sqlx::query_as("SELECT * FROM orders WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    let Some(existing) = existing else {
        return Ok(None);
    };

    let status = changes
        .status()?
        .map(|s| s.as_str().to_string())
        .unwrap_or(existing.status);
    let notes = changes.notes.clone().or(existing.notes);

    sqlx::query(r#"UPDATE orders SET status = $2, notes = $3, "updatedAt" = now() WHERE id = $1"#)
        .bind(id)
        .bind(&status)
        .bind(&notes)
        .execute(pool)
        .await?;

    get_order(pool, id).await
}

/// Deletes an order and its lines, returning the removed order.
pub async fn delete_order(pool: &PgPool, id: &str) -> Result<Option<Order>> {
    let removed = sqlx::query_as("DELETE FROM orders WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(removed)
}

/// Loads the lines of each order along with their dishes.
async fn attach_lines(pool: &PgPool, orders: Vec<Order>) -> Result<Vec<OrderDetails>> {
    if orders.is_empty() {
        return Ok(Vec::new());
    }

    let order_ids: Vec<String> = orders.iter().map(|o| o.id.clone()).collect();
    let lines: Vec<OrderItem> =
        sqlx::query_as(r#"SELECT * FROM order_items WHERE "orderId" = ANY($1) ORDER BY id"#)
            .bind(&order_ids)
            .fetch_all(pool)
            .await?;

    let mut dish_ids: Vec<String> = lines.iter().map(|l| l.menu_item_id.clone()).collect();
    dish_ids.sort();
    dish_ids.dedup();
    let dishes: HashMap<String, MenuItem> = menu_items_by_ids(pool, &dish_ids)
        .await?
        .into_iter()
        .map(|m| (m.id.clone(), m))
        .collect();

    let mut by_order: HashMap<String, Vec<OrderLine>> = HashMap::new();
    for item in lines {
        let menu_item = dishes.get(&item.menu_item_id).cloned();
        by_order
            .entry(item.order_id.clone())
            .or_default()
            .push(OrderLine { item, menu_item });
    }

    Ok(orders
        .into_iter()
        .map(|order| {
            let items = by_order.remove(&order.id).unwrap_or_default();
            OrderDetails { order, items }
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn dish(id: &str, price: f64) -> MenuItem {
        MenuItem {
            id: id.to_string(),
            name: format!("Dish {id}"),
            description: "Tasty".to_string(),
            price,
            category: "Main Courses".to_string(),
            prep_time: 10,
            is_available: true,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn order_input(body: JsonValue) -> OrderInput {
        serde_json::from_value(body).unwrap()
    }

    #[test]
    fn test_status_round_trip_names() {
        for status in OrderStatus::ALL {
            assert_eq!(OrderStatus::parse(status.as_str()), Some(status));
        }
        assert_eq!(OrderStatus::parse("ready"), None);
        assert_eq!(
            OrderStatus::valid_list(),
            "PENDING, CONFIRMED, PREPARING, READY, DELIVERED, CANCELLED"
        );
    }

    #[test]
    fn test_update_rejects_unknown_status() {
        let update = OrderUpdate {
            status: Some("LOST".to_string()),
            notes: None,
        };
        let err = update.status().unwrap_err();
        assert_eq!(err.to_string(), "Invalid status");

        let update = OrderUpdate {
            status: Some("READY".to_string()),
            notes: None,
        };
        assert_eq!(update.status().unwrap(), Some(OrderStatus::Ready));
        assert_eq!(OrderUpdate::default().status().unwrap(), None);
    }

    #[test]
    fn test_validate_requires_items() {
        let err = order_input(json!({
            "customerName": "Ada",
            "tableNumber": 4,
            "items": []
        }))
        .validate()
        .unwrap_err();

        match err {
            PlaygroundError::Validation { missing, .. } => assert_eq!(missing, vec!["items"]),
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_rejects_out_of_range_table_number() {
        let err = order_input(json!({
            "customerName": "Ada",
            "tableNumber": 1e12,
            "items": [{"menuItemId": "m1"}]
        }))
        .validate()
        .unwrap_err();

        match err {
            PlaygroundError::Validation { missing, .. } => {
                assert_eq!(missing, vec!["tableNumber"])
            }
            other => panic!("Expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_validate_accepts_string_table_number() {
        let order = order_input(json!({
            "customerName": "Ada",
            "tableNumber": "12",
            "items": [{"menuItemId": "m1", "quantity": 2}]
        }))
        .validate()
        .unwrap();

        assert_eq!(order.table_number, 12);
        assert_eq!(order.items.len(), 1);
    }

    #[test]
    fn test_total_price() {
        let order = order_input(json!({
            "customerName": "Ada",
            "tableNumber": 3,
            "items": [
                {"menuItemId": "wings", "quantity": 2},
                {"menuItemId": "lemonade"}
            ]
        }))
        .validate()
        .unwrap();

        let menu = vec![dish("wings", 12.5), dish("lemonade", 4.0)];
        assert_eq!(order.total_price(&menu).unwrap(), 29.0);
    }

    #[test]
    fn test_total_price_unknown_dish() {
        let order = order_input(json!({
            "customerName": "Ada",
            "tableNumber": 3,
            "items": [{"menuItemId": "nope", "quantity": 1}]
        }))
        .validate()
        .unwrap();

        let err = order.total_price(&[dish("wings", 12.5)]).unwrap_err();
        assert!(matches!(err, PlaygroundError::Validation { .. }));
    }

    #[test]
    fn test_order_details_flatten() {
        let details = OrderDetails {
            order: Order {
                id: "o1".to_string(),
                customer_name: "Ada".to_string(),
                user_id: None,
                table_number: 3,
                status: "PENDING".to_string(),
                total_price: 4.0,
                notes: None,
                created_at: Utc::now(),
                updated_at: Utc::now(),
            },
            items: vec![OrderLine {
                item: OrderItem {
                    id: "i1".to_string(),
                    order_id: "o1".to_string(),
                    menu_item_id: "lemonade".to_string(),
                    quantity: 1,
                    special_requests: None,
                },
                menu_item: Some(dish("lemonade", 4.0)),
            }],
        };

        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["customerName"], "Ada");
        assert_eq!(json["items"][0]["menuItemId"], "lemonade");
        assert_eq!(json["items"][0]["menuItem"]["price"], 4.0);
    }
}
