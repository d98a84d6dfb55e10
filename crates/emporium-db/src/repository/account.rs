//! SurrealDB implementation of [`AccountRepository`].

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use emporium_core::error::EmporiumResult;
use emporium_core::models::account::{Account, CreateAccount, GroupMembership};
use emporium_core::repository::AccountRepository;
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

#[derive(Debug, SurrealValue)]
struct AccountRow {
    username: String,
    groups: serde_json::Value,
    roles: serde_json::Value,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored shape of a per-shop membership record.
#[derive(Debug, Serialize, Deserialize)]
struct MembershipDoc {
    shop_id: Uuid,
    group_ids: Vec<Uuid>,
}

impl AccountRow {
    fn into_account(self, id: Uuid) -> Result<Account, DbError> {
        let memberships: Vec<MembershipDoc> = serde_json::from_value(self.groups)?;
        let roles: BTreeMap<Uuid, BTreeSet<String>> = serde_json::from_value(self.roles)?;
        Ok(Account {
            id,
            username: self.username,
            groups: memberships
                .into_iter()
                .map(|m| GroupMembership {
                    shop_id: m.shop_id,
                    group_ids: m.group_ids,
                })
                .collect(),
            roles,
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

/// SurrealDB implementation of the Account repository.
#[derive(Clone)]
pub struct SurrealAccountRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealAccountRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Account, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('account', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<AccountRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        row.into_account(id)
    }
}

impl<C: Connection> AccountRepository for SurrealAccountRepository<C> {
    async fn create(&self, input: CreateAccount) -> EmporiumResult<Account> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('account', $id) SET username = $username")
            .bind(("id", id_str.clone()))
            .bind(("username", input.username))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "account".into(),
            id: id_str,
        })?;

        Ok(row.into_account(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EmporiumResult<Account> {
        Ok(self.fetch(id).await?)
    }

    async fn save_memberships(&self, account: &Account) -> EmporiumResult<Account> {
        let id_str = account.id.to_string();

        let memberships: Vec<MembershipDoc> = account
            .groups
            .iter()
            .map(|m| MembershipDoc {
                shop_id: m.shop_id,
                group_ids: m.group_ids.clone(),
            })
            .collect();
        let groups = serde_json::to_value(memberships).map_err(DbError::from)?;
        let roles = serde_json::to_value(&account.roles).map_err(DbError::from)?;

        // Groups and roles are written in one statement so the
        // projection never diverges from the memberships on disk.
        let result = self
            .db
            .query(
                "UPDATE type::record('account', $id) SET \
                 groups = $groups, \
                 roles = $roles, \
                 version = version + 1, \
                 updated_at = time::now() \
                 WHERE version = $version",
            )
            .bind(("id", id_str.clone()))
            .bind(("groups", groups))
            .bind(("roles", roles))
            .bind(("version", account.version))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<AccountRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_account(account.id)?),
            None => {
                self.fetch(account.id).await?;
                Err(DbError::Conflict {
                    entity: "account".into(),
                    id: id_str,
                }
                .into())
            }
        }
    }
}
