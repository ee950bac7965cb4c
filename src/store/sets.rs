//! Lego set records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::postgres::{PgPool, Postgres};
use sqlx::{FromRow, QueryBuilder};

use super::{contains_pattern, is_blank, keep_or_replace, nullable, parse_limit};
use crate::error::{PlaygroundError, Result};

/// Fields a new set must carry.
pub const REQUIRED_FIELDS: &[&str] = &["name", "theme", "pieceCount", "difficulty"];

/// A stored Lego set.
#[derive(Debug, Clone, PartialEq, Serialize, FromRow)]
#[serde(rename_all = "camelCase")]
#[sqlx(rename_all = "camelCase")]
pub struct LegoSet {
    pub id: String,
    pub name: String,
    pub theme: String,
    pub piece_count: i32,
    pub difficulty: String,
    pub price: Option<f64>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl LegoSet {
    /// Applies a validated partial update, returning the column values to store.
    fn merged(&self, changes: &SetInput, piece_count: Option<i32>) -> NewSet {
        NewSet {
            name: keep_or_replace(&self.name, changes.name.as_deref()),
            theme: keep_or_replace(&self.theme, changes.theme.as_deref()),
            piece_count: piece_count.unwrap_or(self.piece_count),
            difficulty: keep_or_replace(&self.difficulty, changes.difficulty.as_deref()),
            price: changes.price.unwrap_or(self.price),
            description: changes
                .description
                .clone()
                .unwrap_or_else(|| self.description.clone()),
        }
    }
}

/// Request body for creating or updating a set.
///
/// `pieceCount` is kept as raw JSON so a non-numeric value is reported as an
/// invalid piece count rather than a malformed body.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SetInput {
    pub name: Option<String>,
    pub theme: Option<String>,
    pub piece_count: Option<JsonValue>,
    pub difficulty: Option<String>,
    #[serde(default, deserialize_with = "nullable")]
    pub price: Option<Option<f64>>,
    #[serde(default, deserialize_with = "nullable")]
    pub description: Option<Option<String>>,
}

impl SetInput {
    fn raw_piece_count(&self) -> Option<&JsonValue> {
        self.piece_count.as_ref().filter(|v| !v.is_null())
    }

    /// Returns the required fields that are absent or empty.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if is_blank(self.name.as_deref()) {
            missing.push("name");
        }
        if is_blank(self.theme.as_deref()) {
            missing.push("theme");
        }
        if self.raw_piece_count().is_none() {
            missing.push("pieceCount");
        }
        if is_blank(self.difficulty.as_deref()) {
            missing.push("difficulty");
        }
        missing
    }

    /// Validates `pieceCount` when present.
    pub fn piece_count(&self) -> Result<Option<i32>> {
        self.raw_piece_count().map(validate_piece_count).transpose()
    }

    /// Checks the body of a create request.
    pub fn validate(self) -> Result<NewSet> {
        let missing = self.missing_fields();
        if !missing.is_empty() {
            return Err(PlaygroundError::validation(
                "Missing required information",
                "Every Lego set needs: name, theme, pieceCount, and difficulty",
                REQUIRED_FIELDS,
                missing,
            ));
        }
        let piece_count = self.piece_count()?.unwrap_or_default();

        Ok(NewSet {
            name: self.name.unwrap_or_default(),
            theme: self.theme.unwrap_or_default(),
            piece_count,
            difficulty: self.difficulty.unwrap_or_default(),
            price: self.price.flatten(),
            description: self.description.flatten(),
        })
    }
}

/// A piece count must be a JSON integer of at least one.
fn validate_piece_count(value: &JsonValue) -> Result<i32> {
    value
        .as_i64()
        .filter(|n| *n >= 1)
        .and_then(|n| i32::try_from(n).ok())
        .ok_or_else(|| {
            PlaygroundError::invalid(
                "Invalid piece count",
                "Piece count must be a positive number",
            )
        })
}

/// Column values of a set about to be written.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSet {
    pub name: String,
    pub theme: String,
    pub piece_count: i32,
    pub difficulty: String,
    pub price: Option<f64>,
    pub description: Option<String>,
}

/// Query-string filters for listing sets.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SetFilter {
    pub theme: Option<String>,
    pub difficulty: Option<String>,
    pub limit: Option<String>,
}

/// Lists sets, newest first.
pub async fn list_sets(pool: &PgPool, filter: &SetFilter) -> Result<Vec<LegoSet>> {
    let mut query = QueryBuilder::<Postgres>::new("SELECT * FROM lego_sets WHERE 1=1");

    if let Some(theme) = filter.theme.as_deref().filter(|t| !t.is_empty()) {
        query.push(" AND theme ILIKE ").push_bind(contains_pattern(theme));
    }
    if let Some(difficulty) = filter.difficulty.as_deref().filter(|d| !d.is_empty()) {
        query
            .push(" AND difficulty ILIKE ")
            .push_bind(contains_pattern(difficulty));
    }

    query.push(r#" ORDER BY "createdAt" DESC"#);

    if let Some(limit) = parse_limit(filter.limit.as_deref()) {
        query.push(" LIMIT ").push_bind(limit);
    }

    let sets = query.build_query_as::<LegoSet>().fetch_all(pool).await?;
    Ok(sets)
}

/// Gets a set by ID.
pub async fn get_set(pool: &PgPool, id: &str) -> Result<Option<LegoSet>> {
    let set = sqlx::query_as("SELECT * FROM lego_sets WHERE id = $1")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(set)
}

/// Inserts a set and returns the stored row.
pub async fn create_set(pool: &PgPool, set: &NewSet) -> Result<LegoSet> {
    let created = sqlx::query_as(
        r#"
        INSERT INTO lego_sets (name, theme, "pieceCount", difficulty, price, description)
        VALUES ($1, $2, $3, $4, $5, $6)
        RETURNING *
        "#,
    )
    .bind(&set.name)
    .bind(&set.theme)
    .bind(set.piece_count)
    .bind(&set.difficulty)
    .bind(set.price)
    .bind(&set.description)
    .fetch_one(pool)
    .await?;
    Ok(created)
}

/// Applies a partial update. Returns `None` when the set does not exist.
///
/// An invalid `pieceCount` is reported only for sets that exist.
pub async fn update_set(pool: &PgPool, id: &str, changes: &SetInput) -> Result<Option<LegoSet>> {
    let Some(existing) = get_set(pool, id).await? else {
        return Ok(None);
    };
    let merged = existing.merged(changes, changes.piece_count()?);

    let updated = sqlx::query_as(
        r#"
        UPDATE lego_sets
        SET name = $2, theme = $3, "pieceCount" = $4, difficulty = $5, price = $6,
            description = $7, "updatedAt" = now()
        WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(&merged.name)
    .bind(&merged.theme)
    .bind(merged.piece_count)
    .bind(&merged.difficulty)
    .bind(merged.price)
    .bind(&merged.description)
    .fetch_optional(pool)
    .await?;
    Ok(updated)
}

/// Deletes a set, returning the removed row if there was one.
pub async fn delete_set(pool: &PgPool, id: &str) -> Result<Option<LegoSet>> {
    let removed = sqlx::query_as("DELETE FROM lego_sets WHERE id = $1 RETURNING *")
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(removed)
}
