//! HTTP server for the playground.
//!
//! Builds the axum router over shared application state and serves it until
//! Ctrl+C.

pub mod handlers;
pub mod response;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::Router;
use sqlx::postgres::PgPool;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

use crate::config::ServerConfig;
use crate::db::DatabaseClient;
use crate::error::{PlaygroundError, Result};
use crate::store::demo::DemoStore;

/// State shared by every request.
#[derive(Clone)]
pub struct AppState {
    /// Client used by the SQL console and schema introspection.
    pub db: Arc<dyn DatabaseClient>,
    /// Pool used by the CRUD endpoints.
    pub pool: PgPool,
    /// In-memory users and posts.
    pub demo: Arc<DemoStore>,
}

impl AppState {
    /// Creates state with freshly seeded demo records.
    pub fn new(db: Arc<dyn DatabaseClient>, pool: PgPool) -> Self {
        Self {
            db,
            pool,
            demo: Arc::new(DemoStore::seeded()),
        }
    }
}

/// Builds the application router.
pub fn router(state: AppState) -> Router {
    use handlers::{bricks, database, demo, menu, orders, sets};

    Router::new()
        .route("/health", get(handlers::health_check))
        .route("/api/database/query", post(database::run_query))
        .route("/api/database/schema", get(database::schema))
        .route("/api/database/explain", post(database::explain))
        .route(
            "/api/lego-bricks",
            get(bricks::list_bricks).post(bricks::create_brick),
        )
        .route(
            "/api/lego-bricks/{id}",
            get(bricks::get_brick)
                .put(bricks::update_brick)
                .delete(bricks::delete_brick),
        )
        .route("/api/lego-sets", get(sets::list_sets).post(sets::create_set))
        .route(
            "/api/lego-sets/{id}",
            get(sets::get_set)
                .put(sets::update_set)
                .delete(sets::delete_set),
        )
        .route("/api/menu", get(menu::list_menu).post(menu::create_menu_item))
        .route(
            "/api/orders",
            get(orders::list_orders).post(orders::create_order),
        )
        .route(
            "/api/orders/{id}",
            get(orders::get_order)
                .put(orders::update_order)
                .delete(orders::delete_order),
        )
        .route("/api/users", get(demo::list_users).post(demo::create_user))
        .route(
            "/api/users/{id}",
            get(demo::get_user)
                .put(demo::update_user)
                .delete(demo::delete_user),
        )
        .route("/api/posts", get(demo::list_posts).post(demo::create_post))
        .route(
            "/api/posts/{id}",
            get(demo::get_post)
                .put(demo::update_post)
                .delete(demo::delete_post),
        )
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::new())
        .with_state(Arc::new(state))
}

/// Binds the configured address and serves requests until Ctrl+C.
pub async fn serve(config: &ServerConfig, state: AppState) -> Result<()> {
    let address = config.bind_address()?;
    let listener = TcpListener::bind(address).await.map_err(|e| {
        PlaygroundError::config(format!("Failed to bind HTTP listener to {address}: {e}"))
    })?;

    info!("SQL playground listening on http://{}", address);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| PlaygroundError::internal(format!("HTTP server error: {e}")))?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for Ctrl+C: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown requested");
}
