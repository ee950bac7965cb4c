//! The SQL teaching console.
//!
//! Classifies console input, then either rejects it, previews it without
//! touching any data, or forwards a SELECT verbatim to the database.

use tracing::{debug, warn};

use crate::db::{DatabaseClient, QueryResult};
use crate::error::{PlaygroundError, Result};
use crate::safety::{classify_sql, QueryInfo, QueryKind};

/// Runs console input against a database client.
pub struct QueryConsole<'a> {
    db: &'a dyn DatabaseClient,
}

impl<'a> QueryConsole<'a> {
    /// Creates a new console over the given client.
    pub fn new(db: &'a dyn DatabaseClient) -> Self {
        Self { db }
    }

    /// Classifies and handles one piece of console input.
    ///
    /// Dangerous and unrecognised input is rejected. DELETE and UPDATE return a
    /// preview with an estimated row count; INSERT returns a preview without
    /// one. Only SELECT reaches the database as typed.
    pub async fn run(&self, sql: &str) -> Result<ConsoleOutcome> {
        let info = classify_sql(sql);
        debug!(kind = %info.kind, table = ?info.table, "Classified console query");

        match info.kind {
            QueryKind::Dangerous => Err(PlaygroundError::rejected(
                "This command is not allowed for safety",
                "Commands like DROP, ALTER, CREATE, TRUNCATE are blocked to protect the database",
            )),
            QueryKind::Unknown => Err(PlaygroundError::rejected(
                "Unknown query type",
                "Could not determine query type. Please check your SQL syntax.",
            )),
            QueryKind::Delete | QueryKind::Update => {
                let affected_rows = match info.table.as_deref() {
                    Some(table) => {
                        estimate_affected_rows(self.db, table, info.where_clause.as_deref()).await
                    }
                    None => 0,
                };
                Ok(ConsoleOutcome::Preview {
                    info,
                    affected_rows: Some(affected_rows),
                })
            }
            QueryKind::Insert => Ok(ConsoleOutcome::Preview {
                info,
                affected_rows: None,
            }),
            QueryKind::Select => {
                let result = self.db.execute_query(sql).await?;
                Ok(ConsoleOutcome::Rows(result))
            }
        }
    }
}

/// What the console did with a query.
#[derive(Debug)]
pub enum ConsoleOutcome {
    /// A mutating statement that was described but not executed.
    Preview {
        info: QueryInfo,
        /// Estimated rows touched; absent for INSERT.
        affected_rows: Option<u64>,
    },
    /// A SELECT that was executed.
    Rows(QueryResult),
}

/// Builds the statement that counts rows matched by a table and WHERE clause.
pub fn count_query(table: &str, where_clause: Option<&str>) -> String {
    match where_clause {
        Some(clause) => format!("SELECT COUNT(*) AS count FROM {table} WHERE {clause}"),
        None => format!("SELECT COUNT(*) AS count FROM {table}"),
    }
}

/// Estimates how many rows a DELETE or UPDATE would touch.
///
/// Runs a separate `COUNT(*)`, so the figure is advisory. Any failure, such as
/// an unknown table or a malformed WHERE clause, yields 0.
pub async fn estimate_affected_rows(
    db: &dyn DatabaseClient,
    table: &str,
    where_clause: Option<&str>,
) -> u64 {
    let sql = count_query(table, where_clause);

    match db.execute_query(&sql).await {
        Ok(result) => result
            .first_value()
            .and_then(|value| value.as_i64())
            .map(|count| count.max(0) as u64)
            .unwrap_or(0),
        Err(e) => {
            warn!("Row estimate failed for table {table}: {e}");
            0
        }
    }
}
