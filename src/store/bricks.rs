//! Lego brick records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, QueryBuilder};

use super::{contains_pattern, is_blank, keep_or_replace, nullable, parse_limit};
use crate::error::{PlaygroundError, Result};

/// Fields a new brick must carry.
pub const REQUIRED_FIELDS: &[&str] = &["name", "color", "size", "shape"];

/// A stored Lego brick.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct LegoBrick {
    pub id: String,
    pub name: String,
    pub color: String,
    pub size: String,
    pub shape: String,
    pub quantity: i32,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LegoBrick {
    /// Applies a partial update, returning the column values to store.
    ///
    /// Empty or absent text fields keep their current value; quantity and
    /// description are replaced whenever they are present, description
    /// also by an explicit `null`.
    pub fn merged(&self, changes: &BrickInput) -> NewBrick {
        NewBrick {
            name: keep_or_replace(&self.name, changes.name.as_deref()),
            color: keep_or_replace(&self.color, changes.color.as_deref()),
            size: keep_or_replace(&self.size, changes.size.as_deref()),
            shape: keep_or_replace(&self.shape, changes.shape.as_deref()),
            quantity: changes.quantity.unwrap_or(self.quantity),
            description: changes
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
        }
    }
}

/// Request body for creating or updating a brick.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BrickInput {
    pub name: Option<String>,
    pub color: Option<String>,
    pub size: Option<String>,
    pub shape: Option<String>,
    pub quantity: Option<i32>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl BrickInput {
    /// Returns the required fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("name", &self.name),
            ("color", &self.color),
            ("size", &self.size),
            ("shape", &self.shape),
        ]
        .into_iter()
        .filter(|(_, value)| is_blank(value.as_deref()))
        .map(|(field, _)| field)
        .collect()
    }

    /// Checks the body of a create request.
    pub fn validate(self) -> Result<NewBrick> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(PlaygroundError::validation(
                "Missing required information",
                "Every Lego brick needs: name, color, size, and shape",
                REQUIRED_FIELDS,
                missing,
            ));
        }

        Ok(NewBrick {
            name: self.name.unwrap_or_default(),
            color: self.color.unwrap_or_default(),
            size: self.size.unwrap_or_default(),
            shape: self.shape.unwrap_or_default(),
            quantity: self.quantity.filter(|q| *q != 0).unwrap_or(1),
            description: self.description.flatten(),
        })
    }
}

/// Column values of a brick about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewBrick {
    pub name: String,
    pub color: String,
    pub size: String,
    pub shape: String,
    pub quantity: i32,
    pub description: Option<String>,
}

/// Query-string filters for listing bricks.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct BrickFilter {
    pub color: Option<String>,
    pub shape: Option<String>,
    pub limit: Option<String>,
}

/// Lists bricks, newest first.
pub async fn list_bricks(pool: &PgPool, filter: &BrickFilter) -> Result<Vec<LegoBrick>> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM lego_bricks WHERE 1=1");

    if let Some(color) = filter.color.as_deref().filter(|c| !c.is_empty()) {
        query.push(" AND color ILIKE ").push_bind(contains_pattern(color));
    }
    if let Some(shape) = filter.shape.as_deref().filter(|s| !s.is_empty()) {
        query.push(" AND shape ILIKE ").push_bind(contains_pattern(shape));
    }

    query.push(r#" ORDER BY "createdAt" DESC"#);

    if let Some(limit) = parse_limit(filter.limit.as_deref()) {
        query.push(" LIMIT ").push_bind(limit);
    }

    let bricks = query.build_query_as::<LegoBrick>().fetch_all(pool).await?;
    Ok(bricks)
}

/// Gets a brick by ID.
pub async fn get_brick(pool: &PgPool, id: &str) -> Result<Option<LegoBrick>> {
    let brick = sqlx::query_as("SELECT * FROM lego_bricks WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(brick)
}

/// Inserts a brick and returns the stored row.
pub async fn create_brick(pool: &PgPool, brick: &NewBrick) -> Result<LegoBrick> {
    let created = sqlx::query_as(
        r#"
        INSERT INTO lego_bricks (name, color, size, shape, quantity, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&brick.name)
    .bind(&brick.color)
    .bind(&brick.size)
    .bind(&brick.shape)
    .bind(brick.quantity)
    .bind(&brick.description)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Applies a partial update. Returns `None` when the brick does not exist.
pub async fn update_brick(
    pool: &PgPool,
    id: &str,
    changes: &BrickInput,
) -> Result<Option<LegoBrick>> {
    let Some(existing) = get_brick(pool, id).await? else {
        return Ok(None);
    };
    let merged = existing.merged(changes);

    let updated = sqlx::query_as(
        r#"
        UPDATE lego_bricks
        SET name = $2, color = $3, size = $4, shape = $5, quantity = $6,
            description = $7, "updatedAt" = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&merged.name)
    .bind(&merged.color)
    .bind(&merged.size)
    .bind(&merged.shape)
    .bind(merged.quantity)
    .bind(&merged.description)
    .fetch_optional(pool)
    .await?;
    Ok(updated)
}

/// Deletes a brick, returning the removed row if there was one.
pub async fn delete_brick(pool: &PgPool, id: &str) -> Result<Option<LegoBrick>> {
    let removed = sqlx::query_as("DELETE FROM lego_bricks WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(removed)
}
