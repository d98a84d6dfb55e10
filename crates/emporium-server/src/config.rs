//! Server configuration.
//!
//! Loads configuration from environment variables; anything unset falls
//! back to the library defaults.

use std::env;

use anyhow::{Context, Result};
use emporium_db::DbConfig;
use emporium_groups::{GateConfig, GroupServiceConfig};

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub db: DbConfig,
    pub groups: GroupServiceConfig,
    pub gate: GateConfig,
}

impl ServerConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let db_defaults = DbConfig::default();
        let db = DbConfig {
            url: lookup("EMPORIUM_DB_URL").unwrap_or(db_defaults.url),
            namespace: lookup("EMPORIUM_DB_NAMESPACE").unwrap_or(db_defaults.namespace),
            database: lookup("EMPORIUM_DB_DATABASE").unwrap_or(db_defaults.database),
            username: lookup("EMPORIUM_DB_USER").unwrap_or(db_defaults.username),
            password: lookup("EMPORIUM_DB_PASSWORD").unwrap_or(db_defaults.password),
        };

        let mut groups = GroupServiceConfig::default();
        if let Some(raw) = lookup("EMPORIUM_MAX_WRITE_ATTEMPTS") {
            groups.max_write_attempts = raw
                .parse()
                .with_context(|| format!("EMPORIUM_MAX_WRITE_ATTEMPTS is not a number: {raw}"))?;
            anyhow::ensure!(
                groups.max_write_attempts > 0,
                "EMPORIUM_MAX_WRITE_ATTEMPTS must be at least 1"
            );
        }

        let mut gate = GateConfig::default();
        if let Some(raw) = lookup("EMPORIUM_ADMIN_PERMISSIONS") {
            gate.admin_permissions = raw
                .split(',')
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(String::from)
                .collect();
        }

        Ok(Self { db, groups, gate })
    }
}
