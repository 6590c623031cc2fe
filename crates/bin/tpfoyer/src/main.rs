//! # tpfoyer — dormitory bloc manager
//!
//! Composition root that wires the storage adapter into the bloc service and
//! runs one command against it.
//!
//! ## Responsibilities
//! - Parse CLI arguments and configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct the repository implementation (adapter)
//! - Construct the application service, injecting the repository via its port trait
//! - Print the command result as JSON on stdout
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod cli;
mod config;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use tpfoyer_adapter_storage_sqlite_sqlx::{Database, SqliteBlocRepository};
use tpfoyer_app::services::bloc_service::BlocService;

use crate::cli::Cli;
use crate::config::Config;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .with_writer(std::io::stderr)
        .init();

    // Database
    let db = Database::open(&config.database.url).await?;

    // Service
    let service = BlocService::new(SqliteBlocRepository::new(db.pool().clone()));

    let output = cli::run(&service, cli.command).await.inspect_err(|err| {
        tracing::error!(error = %err, "command failed");
    })?;
    println!("{}", output.to_json()?);

    Ok(())
}
