//! Mock database client for testing.
//!
//! Replies to statements from a script of canned results and records every
//! statement it receives, so tests can assert what was (or was not) executed.

use super::{ColumnInfo, DatabaseClient, QueryResult, Schema, Value};
use crate::error::{PlaygroundError, Result};
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum MockReply {
    Rows(QueryResult),
    Error { message: String, code: Option<String> },
}

/// A mock database client that returns predefined results.
#[derive(Debug, Default)]
pub struct MockDatabaseClient {
    schema: Option<Schema>,
    replies: Mutex<Vec<(String, MockReply)>>,
    executed: Mutex<Vec<String>>,
}

impl MockDatabaseClient {
    /// Creates a new mock database client with an empty schema.
    pub fn new() -> Self {
        Self {
            schema: Some(Schema::default()),
            ..Default::default()
        }
    }

    /// Creates a new mock database client with the given schema.
    pub fn with_schema(schema: Schema) -> Self {
        Self {
            schema: Some(schema),
            ..Default::default()
        }
    }

    /// Creates a mock whose schema introspection always fails.
    pub fn without_schema() -> Self {
        Self::default()
    }

    /// Replies with `result` to any statement containing `fragment`.
    pub fn respond_to(self, fragment: &str, result: QueryResult) -> Self {
        self.push_reply(fragment, MockReply::Rows(result));
        self
    }

    /// Fails any statement containing `fragment` with a database error.
    pub fn fail_on(self, fragment: &str, message: &str, code: Option<&str>) -> Self {
        self.push_reply(
            fragment,
            MockReply::Error {
                message: message.to_string(),
                code: code.map(String::from),
            },
        );
        self
    }

    /// Returns every statement executed so far, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed
            .lock()
            .map(|sqls| sqls.clone())
            .unwrap_or_default()
    }

    fn push_reply(&self, fragment: &str, reply: MockReply) {
        if let Ok(mut replies) = self.replies.lock() {
            replies.push((fragment.to_string(), reply));
        }
    }

    fn find_reply(&self, sql: &str) -> Option<MockReply> {
        let replies = self.replies.lock().ok()?;
        replies
            .iter()
            .find(|(fragment, _)| sql.contains(fragment.as_str()))
            .map(|(_, reply)| reply.clone())
    }
}

#[async_trait]
impl DatabaseClient for MockDatabaseClient {
    async fn introspect_schema(&self) -> Result<Schema> {
        self.schema
            .clone()
            .ok_or_else(|| PlaygroundError::database("relation \"information_schema\" is unavailable"))
    }

    async fn execute_query(&self, sql: &str) -> Result<QueryResult> {
        if let Ok(mut executed) = self.executed.lock() {
            executed.push(sql.to_string());
        }

        match self.find_reply(sql) {
            Some(MockReply::Rows(result)) => Ok(result),
            Some(MockReply::Error { message, code }) => {
                Err(PlaygroundError::Database { message, code })
            }
            None if sql.trim_start().to_uppercase().starts_with("SELECT") => {
                let columns = vec![ColumnInfo::new("result", "TEXT")];
                let rows = vec![vec![Value::String(format!("Mock result for: {}", sql))]];
                Ok(QueryResult::with_data(columns, rows))
            }
            None => Ok(QueryResult::new()),
        }
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_default_select() {
        let client = MockDatabaseClient::new();
        let result = client.execute_query("SELECT 1").await.unwrap();
        assert_eq!(result.row_count, 1);
        assert_eq!(result.columns.len(), 1);
        assert_eq!(client.executed(), vec!["SELECT 1".to_string()]);
    }

    #[tokio::test]
    async fn test_mock_scripted_reply() {
        let client = MockDatabaseClient::new().respond_to(
            "COUNT(*)",
            QueryResult::with_data(
                vec![ColumnInfo::new("count", "INT8")],
                vec![vec![Value::Int(4)]],
            ),
        );
        let result = client
            .execute_query("SELECT COUNT(*) AS count FROM orders")
            .await
            .unwrap();
        assert_eq!(result.first_value(), Some(&Value::Int(4)));
    }

    #[tokio::test]
    async fn test_mock_scripted_failure() {
        let client = MockDatabaseClient::new().fail_on("missing", "no such table", Some("42P01"));
        let err = client.execute_query("SELECT * FROM missing").await.unwrap_err();
        assert_eq!(err.sql_state(), Some("42P01"));
    }

    #[tokio::test]
    async fn test_mock_without_schema_fails() {
        let client = MockDatabaseClient::without_schema();
        assert!(client.introspect_schema().await.is_err());
        assert!(MockDatabaseClient::new().introspect_schema().await.is_ok());
    }
}
