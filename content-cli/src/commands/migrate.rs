//! Schema migration command

use anyhow::{Context, Result};
use clap::Parser;

use content_server::db::{create_pool, migrations};
use content_server::DatabaseConfig;

/// Arguments for the migrate command
#[derive(Parser, Debug)]
pub struct MigrateArgs {
    /// Database URL (overrides DATABASE_URL and DB_* variables)
    #[arg(long)]
    pub database_url: Option<String>,
}

/// Create tables and seed content types
pub async fn run_migrate(args: MigrateArgs) -> Result<()> {
    let mut config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    if let Some(url) = args.database_url {
        config.url = Some(url);
    }

    let pool = create_pool(&config)
        .await
        .context("Failed to create database pool")?;

    let result = migrations::run(&pool).await;
    pool.close().await;

    result.context("Failed to run migrations")?;
    tracing::info!("Schema is up to date");
    Ok(())
}
