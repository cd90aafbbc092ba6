//! content-service: command line entry point for the content HTTP service

mod commands;
mod tracing_setup;

use anyhow::Result;
use clap::{Parser, Subcommand};

use tracing_setup::TracingConfig;

#[derive(Parser, Debug)]
#[command(name = "content-service", version, about = "Content CRUD service")]
struct Cli {
    /// Enable debug logging (RUST_LOG still takes precedence)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (default)
    Serve(commands::serve::ServeArgs),

    /// Create tables and seed content types, then exit
    Migrate(commands::migrate::MigrateArgs),
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env must be in place before config is read
    let dotenv = dotenvy::dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&TracingConfig { debug: cli.debug }).ok();
    tracing_setup::report_dotenv(dotenv);

    match cli.command {
        Some(Commands::Serve(args)) => commands::run_serve(args).await?,
        Some(Commands::Migrate(args)) => commands::run_migrate(args).await?,
        None => commands::run_serve(commands::serve::ServeArgs::default()).await?,
    }

    Ok(())
}
