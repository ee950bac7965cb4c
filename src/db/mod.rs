//! Database abstraction layer for the playground.
//!
//! The SQL console talks to the store through the `DatabaseClient` trait so it
//! can be exercised against a scripted mock in tests.

mod mock;
mod postgres;
mod schema;
mod types;

pub use mock::MockDatabaseClient;
pub use postgres::PostgresClient;
pub use schema::{known_tables, Column, Schema, Table, TableMetadata};
pub use types::{ColumnInfo, QueryResult, Row, Value};

use crate::error::Result;
use async_trait::async_trait;

/// Trait defining the interface for database clients.
///
/// All database operations are async and return Results with PlaygroundError.
#[async_trait]
pub trait DatabaseClient: Send + Sync {
    /// Introspects the public schema, returning tables and their columns.
    async fn introspect_schema(&self) -> Result<Schema>;

    /// Executes a SQL statement verbatim and returns the resulting rows.
    async fn execute_query(&self, sql: &str) -> Result<QueryResult>;

    /// Closes the database connection.
    async fn close(&self) -> Result<()>;
}
