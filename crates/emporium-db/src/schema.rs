//! Schema definitions and migration runner for SurrealDB.
//!
//! Tables are SCHEMAFULL. UUIDs are stored as strings. Groups live
//! embedded in the shop document; memberships and the role projection
//! live embedded in the account document.

use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use tracing::info;

use crate::error::DbError;

// -----------------------------------------------------------------------
// Migration tracking
// -----------------------------------------------------------------------

const MIGRATION_TABLE_DDL: &str = "\
DEFINE TABLE IF NOT EXISTS _migration SCHEMAFULL;
DEFINE FIELD IF NOT EXISTS version ON TABLE _migration TYPE int;
DEFINE FIELD IF NOT EXISTS name ON TABLE _migration TYPE string;
DEFINE FIELD IF NOT EXISTS applied_at ON TABLE _migration TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX IF NOT EXISTS idx_migration_version ON TABLE _migration \
    COLUMNS version UNIQUE;
";

#[derive(Debug, SurrealValue)]
struct MigrationRecord {
    version: u32,
}

struct Migration {
    version: u32,
    name: &'static str,
    sql: &'static str,
}

static MIGRATIONS: &[Migration] = &[Migration {
    version: 1,
    name: "shops_and_accounts",
    sql: SCHEMA_V1,
}];

// -----------------------------------------------------------------------
// Schema v1
// -----------------------------------------------------------------------

const SCHEMA_V1: &str = "\
-- =======================================================================
-- Shops, with embedded permission groups
-- =======================================================================
DEFINE TABLE shop SCHEMAFULL;
DEFINE FIELD name ON TABLE shop TYPE string;
DEFINE FIELD groups ON TABLE shop TYPE array DEFAULT [];
DEFINE FIELD groups.* ON TABLE shop TYPE object;
DEFINE FIELD groups.*.group_id ON TABLE shop TYPE string;
DEFINE FIELD groups.*.name ON TABLE shop TYPE string;
DEFINE FIELD groups.*.permissions ON TABLE shop TYPE array;
DEFINE FIELD groups.*.permissions.* ON TABLE shop TYPE string;
DEFINE FIELD version ON TABLE shop TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE shop TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE shop TYPE datetime \
    DEFAULT time::now();

-- =======================================================================
-- Accounts, with embedded memberships and role projection
-- =======================================================================
DEFINE TABLE account SCHEMAFULL;
DEFINE FIELD username ON TABLE account TYPE string;
DEFINE FIELD groups ON TABLE account TYPE array DEFAULT [];
DEFINE FIELD groups.* ON TABLE account TYPE object;
DEFINE FIELD groups.*.shop_id ON TABLE account TYPE string;
DEFINE FIELD groups.*.group_ids ON TABLE account TYPE array;
DEFINE FIELD groups.*.group_ids.* ON TABLE account TYPE string;
-- shop id -> permission strings
DEFINE FIELD roles ON TABLE account TYPE object FLEXIBLE DEFAULT {};
DEFINE FIELD version ON TABLE account TYPE int DEFAULT 0;
DEFINE FIELD created_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE FIELD updated_at ON TABLE account TYPE datetime \
    DEFAULT time::now();
DEFINE INDEX idx_account_username ON TABLE account \
    COLUMNS username UNIQUE;
";

// -----------------------------------------------------------------------
// Public API
// -----------------------------------------------------------------------

/// Run all pending migrations against the given SurrealDB client.
///
/// Creates the `_migration` tracking table on first run, then applies
/// each migration whose version exceeds the recorded maximum.
pub async fn run_migrations<C: Connection>(db: &Surreal<C>) -> Result<(), DbError> {
    db.query(MIGRATION_TABLE_DDL)
        .await?
        .check()
        .map_err(|e| DbError::Migration(e.to_string()))?;

    let mut result = db
        .query("SELECT version FROM _migration ORDER BY version DESC LIMIT 1")
        .await?;
    let records: Vec<MigrationRecord> = result.take(0)?;
    let current_version = records.first().map(|m| m.version).unwrap_or(0);

    for migration in MIGRATIONS {
        if migration.version <= current_version {
            continue;
        }

        info!(
            version = migration.version,
            name = migration.name,
            "Applying migration"
        );
        db.query(migration.sql).await?.check().map_err(|e| {
            DbError::Migration(format!(
                "Migration v{} '{}' failed: {}",
                migration.version, migration.name, e,
            ))
        })?;

        db.query("CREATE _migration SET version = $version, name = $name")
            .bind(("version", migration.version))
            .bind(("name", migration.name))
            .await?
            .check()
            .map_err(|e| {
                DbError::Migration(format!(
                    "Failed to record migration v{}: {}",
                    migration.version, e,
                ))
            })?;

        info!(version = migration.version, "Migration applied");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn schema_v1_defines_both_tables() {
        assert!(SCHEMA_V1.contains("DEFINE TABLE shop"));
        assert!(SCHEMA_V1.contains("DEFINE TABLE account"));
    }

    #[test]
    fn migrations_are_ordered() {
        for window in MIGRATIONS.windows(2) {
            assert!(
                window[0].version < window[1].version,
                "Migrations must be in ascending version order"
            );
        }
    }
}
