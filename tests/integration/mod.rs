//! Integration tests for the SQL playground.
//!
//! These tests require a running PostgreSQL database.
//! Set DATABASE_URL environment variable to run them.

pub mod api_test;
pub mod console_test;
pub mod schema_test;
pub mod store_test;

use sql_playground::config::ConnectionConfig;
use sql_playground::db::PostgresClient;
use sql_playground::store::{migrations, seed};
use tokio::sync::OnceCell;

static PREPARED: OnceCell<bool> = OnceCell::const_new();

/// Helper to get test database URL from environment.
pub fn get_test_database_url() -> Option<String> {
    std::env::var("DATABASE_URL").ok()
}

/// Helper to create a test client against a migrated, seeded database.
///
/// Migrations and seed data are applied once per test run.
pub async fn get_test_client() -> Option<PostgresClient> {
    let url = get_test_database_url()?;
    let config = ConnectionConfig::from_connection_string(&url).ok()?;

    let prepared = PREPARED
        .get_or_init(|| async {
            let Ok(client) = PostgresClient::connect(&config).await else {
                return false;
            };
            let ok = migrations::run_migrations(client.pool()).await.is_ok()
                && seed::seed_database(client.pool()).await.is_ok();
            client.pool().close().await;
            ok
        })
        .await;
    if !*prepared {
        return None;
    }

    PostgresClient::connect(&config).await.ok()
}

/// A name that will not collide with seed data or other test runs.
pub fn unique_name(prefix: &str) -> String {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map(|d| d.subsec_nanos())
        .unwrap_or_default();
    format!("{prefix}-{}-{nanos}", std::process::id())
}
