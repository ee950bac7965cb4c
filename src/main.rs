//! SQL playground server binary.

use std::sync::Arc;

use sql_playground::cli::Cli;
use sql_playground::config::{Config, ConnectionConfig};
use sql_playground::db::{DatabaseClient, PostgresClient};
use sql_playground::error::Result;
use sql_playground::logging;
use sql_playground::server::{self, AppState};
use sql_playground::store::{migrations, seed};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let cli = Cli::parse_args();

    match cli.log_path() {
        Some(path) => logging::init_file_logging(&path),
        None => logging::init_stderr_logging(),
    }

    if let Err(e) = run(cli).await {
        error!("{}: {}", e.category(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config_path = cli.config_path();
    info!("Loading config from: {}", config_path.display());
    let mut config = Config::load_from_file(&config_path)?;
    cli.apply_to(&mut config);

    let connection = resolve_connection(&cli, &config)?;
    info!("Connecting to {}", connection.display_string());

    let client = PostgresClient::connect(&connection).await?;
    let pool = client.pool().clone();

    if cli.should_migrate() {
        migrations::run_migrations(&pool).await?;
    }
    if cli.seed {
        seed::seed_database(&pool).await?;
    }

    let db: Arc<dyn DatabaseClient> = Arc::new(client);
    let state = AppState::new(Arc::clone(&db), pool);

    let result = server::serve(&config.server, state).await;
    db.close().await?;
    result
}

/// Resolves the database connection with precedence:
/// 1. DATABASE_URL argument or environment variable (highest)
/// 2. `[database]` section of the config file
/// 3. PG* environment variables
fn resolve_connection(cli: &Cli, config: &Config) -> Result<ConnectionConfig> {
    let mut connection = config.database.clone();

    if let Some(from_cli) = cli.to_connection_config()? {
        connection.merge(&from_cli);
    }

    connection.apply_env_defaults();
    Ok(connection)
}
