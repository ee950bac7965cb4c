//! Schema versioning and migrations for the playground store.
//!
//! Manages database schema evolution with forward-only migrations. Column
//! names are camelCase and quoted so the console teaches identifier quoting.

use crate::error::{PlaygroundError, Result};
use sqlx::postgres::PgPool;
use tracing::info;

const CURRENT_VERSION: i32 = 1;

/// Statements of migration v1, applied in order.
const MIGRATION_V1: &[(&str, &str)] = &[
    (
        "lego_bricks",
        r#"
        CREATE TABLE IF NOT EXISTS lego_bricks (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            name TEXT NOT NULL,
            color TEXT NOT NULL,
            size TEXT NOT NULL,
            shape TEXT NOT NULL,
            quantity INTEGER NOT NULL DEFAULT 1,
            description TEXT,
            "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "lego_sets",
        r#"
        CREATE TABLE IF NOT EXISTS lego_sets (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            name TEXT NOT NULL,
            theme TEXT NOT NULL,
            "pieceCount" INTEGER NOT NULL CHECK ("pieceCount" > 0),
            difficulty TEXT NOT NULL,
            price DOUBLE PRECISION,
            description TEXT,
            "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "menu_items",
        r#"
        CREATE TABLE IF NOT EXISTS menu_items (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            name TEXT NOT NULL UNIQUE,
            description TEXT NOT NULL,
            price DOUBLE PRECISION NOT NULL,
            category TEXT NOT NULL,
            "prepTime" INTEGER NOT NULL,
            "isAvailable" BOOLEAN NOT NULL DEFAULT TRUE,
            "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "users",
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            email TEXT NOT NULL UNIQUE,
            "firstName" TEXT NOT NULL,
            "lastName" TEXT NOT NULL,
            city TEXT,
            country TEXT,
            "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "orders",
        r#"
        CREATE TABLE IF NOT EXISTS orders (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            "customerName" TEXT NOT NULL,
            "userId" TEXT REFERENCES users(id) ON DELETE SET NULL,
            "tableNumber" INTEGER NOT NULL,
            status TEXT NOT NULL DEFAULT 'PENDING'
                CHECK (status IN ('PENDING', 'CONFIRMED', 'PREPARING', 'READY', 'DELIVERED', 'CANCELLED')),
            "totalPrice" DOUBLE PRECISION NOT NULL DEFAULT 0,
            notes TEXT,
            "createdAt" TIMESTAMPTZ NOT NULL DEFAULT now(),
            "updatedAt" TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    ),
    (
        "order_items",
        r#"
        CREATE TABLE IF NOT EXISTS order_items (
            id TEXT PRIMARY KEY DEFAULT gen_random_uuid()::text,
            "orderId" TEXT NOT NULL REFERENCES orders(id) ON DELETE CASCADE,
            "menuItemId" TEXT NOT NULL REFERENCES menu_items(id),
            quantity INTEGER NOT NULL DEFAULT 1,
            "specialRequests" TEXT
        )
        "#,
    ),
    (
        "orders status index",
        r#"CREATE INDEX IF NOT EXISTS idx_orders_status ON orders(status)"#,
    ),
    (
        "order_items order index",
        r#"CREATE INDEX IF NOT EXISTS idx_order_items_order ON order_items("orderId")"#,
    ),
];

/// Runs all pending migrations on the database.
pub async fn run_migrations(pool: &PgPool) -> Result<()> {
    ensure_schema_versions_table(pool).await?;

    let current = get_current_version(pool).await?;

    if current > CURRENT_VERSION {
        return Err(PlaygroundError::config(format!(
            "Database schema version ({}) is newer than supported version ({}). \
             Please upgrade the playground to the latest version.",
            current, CURRENT_VERSION
        )));
    }

    if current < CURRENT_VERSION {
        info!(
            "Migrating database from version {} to {}",
            current, CURRENT_VERSION
        );
        for version in (current + 1)..=CURRENT_VERSION {
            run_migration(pool, version).await?;
            record_version(pool, version).await?;
            info!("Applied migration v{}", version);
        }
    }

    Ok(())
}

/// Ensures the schema_versions table exists.
async fn ensure_schema_versions_table(pool: &PgPool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS schema_versions (
            version INTEGER PRIMARY KEY,
            applied_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#,
    )
    .execute(pool)
    .await
    .map_err(|e| {
        PlaygroundError::database(format!("Failed to create schema_versions table: {e}"))
    })?;

    Ok(())
}

/// Gets the current schema version.
pub async fn get_current_version(pool: &PgPool) -> Result<i32> {
    let version: Option<i32> = sqlx::query_scalar("SELECT MAX(version) FROM schema_versions")
        .fetch_one(pool)
        .await
        .map_err(|e| PlaygroundError::database(format!("Failed to get schema version: {e}")))?;

    Ok(version.unwrap_or(0))
}

/// Records a completed migration version.
async fn record_version(pool: &PgPool, version: i32) -> Result<()> {
    sqlx::query("INSERT INTO schema_versions (version) VALUES ($1)")
        .bind(version)
        .execute(pool)
        .await
        .map_err(|e| PlaygroundError::database(format!("Failed to record migration: {e}")))?;
    Ok(())
}

/// Runs a specific migration version inside a transaction.
async fn run_migration(pool: &PgPool, version: i32) -> Result<()> {
    let statements = match version {
        1 => MIGRATION_V1,
        _ => {
            return Err(PlaygroundError::internal(format!(
                "Unknown migration version: {version}"
            )))
        }
    };

    let mut tx = pool.begin().await?;

    for (what, sql) in statements {
        sqlx::query(sql).execute(&mut *tx).await.map_err(|e| {
            PlaygroundError::database(format!("Failed to create {what}: {e}"))
        })?;
    }

    tx.commit().await?;
    Ok(())
}
