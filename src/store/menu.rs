//! Restaurant menu items.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, QueryBuilder};

use super::{contains_pattern, is_blank, lenient_integer, lenient_number};
use crate::error::{PlaygroundError, Result};

/// Fields a new menu item must carry.
pub const REQUIRED_FIELDS: &[&str] = &["name", "description", "price", "category", "prepTime"];

/// A dish on the menu.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    /// Preparation time in minutes.
    pub prep_time: i32,
    pub is_available: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request body for adding a menu item.
///
/// `price` and `prepTime` accept numbers or numeric strings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemInput {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<JsonValue>,
    pub category: Option<String>,
    pub prep_time: Option<JsonValue>,
    pub is_available: Option<bool>,
}

impl MenuItemInput {
    /// Checks the body of a create request.
    ///
    /// A zero or unreadable price or prep time counts as missing.
    pub fn validate(self) -> Result<NewMenuItem> {
        let price = lenient_number(self.price.as_ref()).filter(|p| *p != 0.0);
        let prep_time = lenient_integer(self.prep_time.as_ref()).filter(|t| *t != 0);

        let mut missing = Vec::new();
        if is_blank(self.name.as_deref()) {
            missing.push("name");
        }
        if is_blank(self.description.as_deref()) {
            missing.push("description");
        }
        if price.is_none() {
            missing.push("price");
        }
        if is_blank(self.category.as_deref()) {
            missing.push("category");
        }
        if prep_time.is_none() {
            missing.push("prepTime");
        }

        match (price, prep_time) {
            (Some(price), Some(prep_time)) if missing.is_empty() => Ok(NewMenuItem {
                name: self.name.unwrap_or_default(),
                description: self.description.unwrap_or_default(),
                price,
                category: self.category.unwrap_or_default(),
                prep_time,
                is_available: self.is_available.unwrap_or(true),
            }),
            _ => Err(PlaygroundError::validation(
                "Missing required information",
                "Every menu item needs: name, description, price, category, and prep time",
                REQUIRED_FIELDS,
                missing,
            )),
        }
    }
}

/// Column values of a menu item about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewMenuItem {
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category: String,
    pub prep_time: i32,
    pub is_available: bool,
}

/// Query-string filters for the menu.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MenuFilter {
    pub category: Option<String>,
}

/// Lists menu items ordered by category.
pub async fn list_menu_items(pool: &PgPool, filter: &MenuFilter) -> Result<Vec<MenuItem>> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM menu_items WHERE 1=1");

    if let Some(category) = filter.category.as_deref().filter(|c| !c.is_empty()) {
        query
            .push(" AND category ILIKE ")
            .push_bind(contains_pattern(category));
    }

    query.push(" ORDER BY category ASC, name ASC");

    let items = query.build_query_as::<MenuItem>().fetch_all(pool).await?;
    Ok(items)
}

/// Fetches the menu items with the given IDs, in no particular order.
pub async fn menu_items_by_ids(pool: &PgPool, ids: &[String]) -> Result<Vec<MenuItem>> {
    let items = sqlx::query_as("SELECT * FROM menu_items WHERE id = ANY($1)")
        .bind(ids)
        .fetch_all(pool)
        .await?;
    Ok(items)
}

/// Inserts a menu item and returns the stored row.
pub async fn create_menu_item(pool: &PgPool, item: &NewMenuItem) -> Result<MenuItem> {
    let created = sqlx::query_as(
        r#"
        INSERT INTO menu_items (name, description, price, category, "prepTime", "isAvailable")
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&item.name)
    .bind(&item.description)
    .bind(item.price)
    .bind(&item.category)
    .bind(item.prep_time)
    .bind(item.is_available)
    .fetch_one(pool)
    .await?;
    Ok(created)
}
