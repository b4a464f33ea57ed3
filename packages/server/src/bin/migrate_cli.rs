//! CLI for running schema migrations
//!
//! The same embedded migrations run automatically at server startup; this
//! binary exists for operators who want to apply or inspect them without
//! starting the API. It outputs JSON for scripting.

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use portal_core::Config;
use serde::Serialize;
use sqlx::migrate::Migrator;
use sqlx::PgPool;

static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

#[derive(Parser)]
#[command(name = "migrate_cli")]
#[command(about = "Schema migration CLI for the community portal database")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List embedded migrations and whether each is applied
    Status,

    /// Apply all pending migrations
    Run,
}

// ============================================================================
// JSON Response Types
// ============================================================================

#[derive(Serialize)]
struct Response {
    success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    migrations: Option<Vec<MigrationInfo>>,
}

#[derive(Serialize)]
struct MigrationInfo {
    version: i64,
    description: String,
    applied: bool,
}

fn output(resp: Response) {
    println!("{}", serde_json::to_string(&resp).unwrap());
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Status => cmd_status().await,
        Commands::Run => cmd_run().await,
    }
}

async fn get_pool() -> Result<PgPool> {
    let config = Config::from_env()?;
    PgPool::connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

/// Versions already recorded by sqlx. The bookkeeping table does not exist
/// until the first run, so errors read as nothing applied.
async fn applied_versions(pool: &PgPool) -> Vec<i64> {
    sqlx::query_scalar::<_, i64>("SELECT version FROM _sqlx_migrations ORDER BY version")
        .fetch_all(pool)
        .await
        .unwrap_or_default()
}

// ============================================================================
// Commands
// ============================================================================

async fn cmd_status() -> Result<()> {
    let pool = get_pool().await?;
    let applied = applied_versions(&pool).await;

    let migrations: Vec<MigrationInfo> = MIGRATOR
        .iter()
        .map(|m| MigrationInfo {
            version: m.version,
            description: m.description.to_string(),
            applied: applied.contains(&m.version),
        })
        .collect();

    output(Response {
        success: true,
        message: None,
        migrations: Some(migrations),
    });

    Ok(())
}

async fn cmd_run() -> Result<()> {
    let pool = get_pool().await?;

    match MIGRATOR.run(&pool).await {
        Ok(()) => {
            output(Response {
                success: true,
                message: Some("Migrations applied".to_string()),
                migrations: None,
            });
        }
        Err(e) => {
            output(Response {
                success: false,
                message: Some(format!("Migration failed: {}", e)),
                migrations: None,
            });
        }
    }

    Ok(())
}
