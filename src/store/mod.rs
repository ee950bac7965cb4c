//! PostgreSQL-backed records served by the CRUD endpoints.
//!
//! Each submodule owns one table family: its row types, request validation
//! and the queries that read and write it. The in-memory demo records live in
//! [`demo`].

pub mod bricks;
pub mod demo;
pub mod menu;
pub mod migrations;
pub mod orders;
pub mod seed;
pub mod sets;

use serde::{Deserialize, Deserializer};
use serde_json::Value as JsonValue;

/// Returns true when a JSON string field is absent or empty.
pub(crate) fn is_blank(value: Option<&str>) -> bool {
    value.map_or(true, |s| s.is_empty())
}

/// Picks the new value for a text column during a partial update.
///
/// Absent and empty strings keep the stored value.
pub(crate) fn keep_or_replace(current: &str, incoming: Option<&str>) -> String {
    match incoming {
        Some(value) if !value.is_empty() => value.to_string(),
        _ => current.to_string(),
    }
}

/// Deserializes an optional field so an explicit `null` is kept apart from an
/// absent one: absent is `None`, `null` is `Some(None)`.
///
/// Pair with `#[serde(default)]`.
pub(crate) fn nullable<'de, D, T>(
    deserializer: D,
) -> std::result::Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

/// Reads a number that clients may send either as a JSON number or as a
/// numeric string.
pub(crate) fn lenient_number(value: Option<&JsonValue>) -> Option<f64> {
    match value? {
        JsonValue::Number(n) => n.as_f64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Like [`lenient_number`], truncated toward zero as an integer.
///
/// Values outside the `i32` range read as absent.
pub(crate) fn lenient_integer(value: Option<&JsonValue>) -> Option<i32> {
    lenient_number(value)
        .map(f64::trunc)
        .filter(|n| (f64::from(i32::MIN)..=f64::from(i32::MAX)).contains(n))
        .map(|n| n as i32)
}

/// Parses a `limit` query parameter; anything that is not a non-negative
/// integer means no limit.
pub(crate) fn parse_limit(limit: Option<&str>) -> Option<i64> {
    limit
        .and_then(|l| l.trim().parse::<i64>().ok())
        .filter(|l| *l >= 0)
}

/// Builds a `%term%` pattern for case-insensitive substring filters.
pub(crate) fn contains_pattern(term: &str) -> String {
    format!("%{term}%")
}
