//! HTTP server command
//!
//! Connects to PostgreSQL, runs migrations, and serves `/content` until
//! Ctrl+C or SIGTERM.

use std::net::IpAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use clap::Parser;

use content_server::db::repos::PgContentRepository;
use content_server::db::{create_pool, migrations};
use content_server::{run_server, ContentService, DatabaseConfig, ServerConfig};

/// Arguments for the serve command
#[derive(Parser, Debug, Default)]
pub struct ServeArgs {
    /// Port to listen on (overrides SERVICE_PORT, default 8080)
    #[arg(long, short = 'p')]
    pub port: Option<u16>,

    /// Address to bind to (overrides SERVICE_HOST, default 0.0.0.0)
    #[arg(long, short = 'b')]
    pub bind: Option<IpAddr>,

    /// Database URL (overrides DATABASE_URL and DB_* variables)
    #[arg(long)]
    pub database_url: Option<String>,

    /// Request timeout in seconds (overrides REQUEST_TIMEOUT_SECS)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Skip schema migrations at startup
    #[arg(long)]
    pub no_migrate: bool,
}

/// Run the HTTP server
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut db_config = DatabaseConfig::from_env().context("Invalid database configuration")?;
    if let Some(url) = args.database_url {
        db_config.url = Some(url);
    }

    let mut server_config = ServerConfig::from_env().context("Invalid server configuration")?;
    if let Some(port) = args.port {
        server_config.bind_addr.set_port(port);
    }
    if let Some(ip) = args.bind {
        server_config.bind_addr.set_ip(ip);
    }
    if let Some(secs) = args.timeout {
        server_config.request_timeout = Duration::from_secs(secs);
    }

    let pool = create_pool(&db_config)
        .await
        .context("Failed to create database pool")?;

    if !args.no_migrate {
        migrations::run(&pool)
            .await
            .context("Failed to run migrations")?;
    }

    tracing::info!("Starting content service on {}", server_config.bind_addr);

    let repo = Arc::new(PgContentRepository::new(pool.clone()));
    let service = ContentService::with_system_clock(repo);

    // Run server (blocks until shutdown), then release connections
    let result = run_server(service, server_config).await;
    pool.close().await;

    result.context("Server error")?;
    Ok(())
}
