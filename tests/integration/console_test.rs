//! SQL console integration tests.
//!
//! Runs console input against the seeded restaurant tables and checks that
//! previews never change data.

use super::get_test_client;
use sql_playground::db::{DatabaseClient, Value};
use sql_playground::error::PlaygroundError;
use sql_playground::query::{ConsoleOutcome, QueryConsole};

async fn count_rows(client: &dyn DatabaseClient, sql: &str) -> i64 {
    client
        .execute_query(sql)
        .await
        .unwrap()
        .first_value()
        .and_then(Value::as_i64)
        .unwrap()
}

#[tokio::test]
async fn test_select_returns_rows() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let console = QueryConsole::new(&client);

    let outcome = console
        .run(r#"SELECT name, price, "prepTime" FROM menu_items ORDER BY name LIMIT 3;"#)
        .await
        .unwrap();

    let ConsoleOutcome::Rows(result) = outcome else {
        panic!("Expected rows");
    };
    assert_eq!(result.row_count, 3);
    let rows = result.to_json_rows();
    assert!(rows[0].get("prepTime").is_some());
    assert!(rows[0]["price"].is_number());
}

#[tokio::test]
async fn test_delete_preview_matches_count_and_changes_nothing() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let console = QueryConsole::new(&client);

    let before = count_rows(&client, "SELECT COUNT(*) FROM menu_items").await;
    let expected = count_rows(
        &client,
        "SELECT COUNT(*) FROM menu_items WHERE category = 'Desserts'",
    )
    .await;

    for _ in 0..2 {
        let outcome = console
            .run("DELETE FROM menu_items WHERE category = 'Desserts';")
            .await
            .unwrap();
        match outcome {
            ConsoleOutcome::Preview { affected_rows, .. } => {
                assert_eq!(affected_rows, Some(expected as u64))
            }
            other => panic!("Expected preview, got {other:?}"),
        }
    }

    let after = count_rows(&client, "SELECT COUNT(*) FROM menu_items").await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_update_preview_changes_nothing() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let console = QueryConsole::new(&client);

    let before = count_rows(
        &client,
        r#"SELECT COUNT(*) FROM menu_items WHERE "isAvailable" = false"#,
    )
    .await;

    let outcome = console
        .run(r#"UPDATE menu_items SET "isAvailable" = false WHERE price > 0"#)
        .await
        .unwrap();
    assert!(matches!(outcome, ConsoleOutcome::Preview { .. }));

    let after = count_rows(
        &client,
        r#"SELECT COUNT(*) FROM menu_items WHERE "isAvailable" = false"#,
    )
    .await;
    assert_eq!(before, after);
}

#[tokio::test]
async fn test_preview_of_missing_table_is_zero() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let console = QueryConsole::new(&client);

    let outcome = console
        .run("DELETE FROM no_such_table WHERE id = 1")
        .await
        .unwrap();

    assert!(matches!(
        outcome,
        ConsoleOutcome::Preview {
            affected_rows: Some(0),
            ..
        }
    ));
}

#[tokio::test]
async fn test_unquoted_camel_case_column_fails() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let console = QueryConsole::new(&client);

    let err = console
        .run("SELECT tableNumber FROM orders")
        .await
        .unwrap_err();

    assert!(matches!(err, PlaygroundError::Database { .. }));
    assert_eq!(err.sql_state(), Some("42703"));
}

#[tokio::test]
async fn test_numeric_aggregates_are_not_null() {
    let Some(client) = get_test_client().await else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };
    let console = QueryConsole::new(&client);

    for sql in [
        "SELECT AVG(quantity) AS value FROM order_items",
        "SELECT ROUND(AVG(price)::numeric, 2) AS value FROM menu_items",
        r#"SELECT SUM("totalPrice")::numeric AS value FROM orders"#,
    ] {
        let ConsoleOutcome::Rows(result) = console.run(sql).await.unwrap() else {
            panic!("Expected rows for {sql}");
        };
        let rows = result.to_json_rows();
        assert!(rows[0]["value"].is_number(), "{sql} returned {:?}", rows[0]);
    }
}
