//! Operator CLI for the CMS
//!
//! Applies schema migrations, mints editor tokens, prints the content-type
//! catalog and loads sample content. Outputs JSON for scripting.

use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use cms_core::config::Config;
use cms_core::domains::auth::JwtService;
use cms_core::domains::catalog::{self, samples};
use cms_core::kernel::ServerDeps;
use serde::Serialize;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

#[derive(Parser)]
#[command(name = "cms_admin")]
#[command(about = "Institute CMS operator CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,

    /// Mint a bearer token for an editor
    Token {
        #[arg(long)]
        subject: String,
        #[arg(long, default_value_t = 24)]
        hours: i64,
        /// Issue a read-only token
        #[arg(long)]
        no_admin: bool,
    },

    /// List the content types and their descriptors
    Types,

    /// Insert sample content through the engine
    Seed {
        /// Run against an in-memory store instead of the database
        #[arg(long)]
        dry_run: bool,
    },
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
    count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    token: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    data: Option<serde_json::Value>,
}

impl Response {
    fn ok(message: impl Into<String>) -> Self {
        Self {
            success: true,
            message: Some(message.into()),
            count: None,
            token: None,
            data: None,
        }
    }
}

fn output(resp: Response) -> Result<()> {
    println!("{}", serde_json::to_string(&resp)?);
    Ok(())
}

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Migrate => cmd_migrate().await,
        Commands::Token {
            subject,
            hours,
            no_admin,
        } => cmd_token(&subject, hours, !no_admin),
        Commands::Types => cmd_types(),
        Commands::Seed { dry_run } => cmd_seed(dry_run).await,
    };

    match result {
        Ok(resp) => output(resp),
        Err(e) => {
            output(Response {
                success: false,
                message: Some(format!("{e:#}")),
                ..Response::ok("")
            })?;
            std::process::exit(1);
        }
    }
}

async fn get_pool(config: &Config) -> Result<PgPool> {
    PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await
        .context("Failed to connect to database")
}

async fn cmd_migrate() -> Result<Response> {
    let config = Config::from_env()?;
    let pool = get_pool(&config).await?;

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .context("Failed to run migrations")?;

    Ok(Response::ok("Migrations applied"))
}

fn cmd_token(subject: &str, hours: i64, is_admin: bool) -> Result<Response> {
    let _ = dotenvy::dotenv();
    let secret = std::env::var("JWT_SECRET").context("JWT_SECRET must be set")?;
    let issuer = std::env::var("JWT_ISSUER").unwrap_or_else(|_| "institute-cms".to_string());

    let service = JwtService::new(&secret, issuer);
    let token = service.create_token(subject, is_admin, chrono::Duration::hours(hours))?;

    Ok(Response {
        token: Some(token),
        ..Response::ok(format!("Token for {subject} valid for {hours}h"))
    })
}

fn cmd_types() -> Result<Response> {
    let types = catalog::all();
    Ok(Response {
        count: Some(types.len()),
        data: Some(serde_json::to_value(types)?),
        ..Response::ok("Content types")
    })
}

async fn cmd_seed(dry_run: bool) -> Result<Response> {
    let deps = if dry_run {
        // Tokens are never checked when seeding directly through the engine.
        let jwt = Arc::new(JwtService::new("seed", "seed".to_string()));
        ServerDeps::in_memory(jwt)
    } else {
        let config = Config::from_env()?;
        let pool = get_pool(&config).await?;
        let jwt = Arc::new(JwtService::new(&config.jwt_secret, config.jwt_issuer.clone()));
        ServerDeps::postgres(pool, jwt)
    };

    let created = samples::seed(&deps).await?;
    let summary: Vec<serde_json::Value> = created
        .iter()
        .map(|(resource, doc)| serde_json::json!({"resource": resource, "id": doc.id}))
        .collect();

    Ok(Response {
        count: Some(summary.len()),
        data: Some(serde_json::Value::Array(summary)),
        ..Response::ok(if dry_run { "Seed dry run complete" } else { "Seeded sample content" })
    })
}
