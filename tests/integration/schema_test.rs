//! Schema introspection integration tests.
//!
//! Tests discovery of the playground tables and their camelCase columns.

use super::get_test_client;
use sql_playground::db::{known_tables, DatabaseClient};

#[tokio::test]
async fn test_introspect_known_tables() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let schema = client.introspect_schema().await.unwrap();

    for metadata in known_tables() {
        assert!(
            schema.table(metadata.table).is_some(),
            "Expected '{}' table to exist",
            metadata.table
        );
    }
}

#[tokio::test]
async fn test_introspect_camel_case_columns() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let schema = client.introspect_schema().await.unwrap();
    let orders = schema.table("orders").expect("orders table");

    let table_number = orders
        .columns
        .iter()
        .find(|c| c.name == "tableNumber")
        .expect("tableNumber column");
    assert_eq!(table_number.quoted_name(), "\"tableNumber\"");
    assert!(!table_number.is_nullable);

    let status = orders
        .columns
        .iter()
        .find(|c| c.name == "status")
        .expect("status column");
    assert_eq!(status.quoted_name(), "status");
    assert!(status.default.is_some());
}

#[tokio::test]
async fn test_introspect_column_order() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let schema = client.introspect_schema().await.unwrap();
    let bricks = schema.table("lego_bricks").expect("lego_bricks table");
    let names: Vec<&str> = bricks.columns.iter().map(|c| c.name.as_str()).collect();

    assert_eq!(names.first(), Some(&"id"));
    assert!(names.contains(&"createdAt"));
}
