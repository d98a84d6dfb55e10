//! Emporium — group management host process.

mod config;

use anyhow::Context;
use emporium_db::repository::{SurrealAccountRepository, SurrealShopRepository};
use emporium_db::{DbManager, run_migrations};
use emporium_groups::{AccountRoleGate, GroupService, MethodRegistry};
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("emporium=info".parse()?))
        .json()
        .init();

    tracing::info!("Starting Emporium...");

    let config = ServerConfig::from_env()?;

    let manager = DbManager::connect(&config.db)
        .await
        .context("failed to connect to SurrealDB")?;
    let db = manager.client().clone();
    run_migrations(&db)
        .await
        .context("failed to apply migrations")?;

    let registry = MethodRegistry::new(GroupService::new(
        SurrealShopRepository::new(db.clone()),
        SurrealAccountRepository::new(db.clone()),
        AccountRoleGate::new(SurrealAccountRepository::new(db), config.gate),
        config.groups,
    ));

    tracing::info!(methods = ?registry.methods(), "Group methods registered");

    tokio::signal::ctrl_c()
        .await
        .context("failed to listen for shutdown signal")?;

    tracing::info!("Emporium stopped.");
    Ok(())
}
