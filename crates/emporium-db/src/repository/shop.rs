//! SurrealDB implementation of [`ShopRepository`].

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use emporium_core::error::EmporiumResult;
use emporium_core::models::shop::{CreateShop, Shop, ShopGroup};
use emporium_core::repository::ShopRepository;
use serde::{Deserialize, Serialize};
use surrealdb::{Connection, Surreal};
use surrealdb_types::SurrealValue;
use uuid::Uuid;

use crate::error::DbError;

/// DB-side row struct; the record id is known by the caller.
#[derive(Debug, SurrealValue)]
struct ShopRow {
    name: String,
    groups: serde_json::Value,
    version: u64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

/// Stored shape of an embedded group.
#[derive(Debug, Serialize, Deserialize)]
struct GroupDoc {
    group_id: Uuid,
    name: String,
    permissions: Vec<String>,
}

impl From<&ShopGroup> for GroupDoc {
    fn from(group: &ShopGroup) -> Self {
        Self {
            group_id: group.group_id,
            name: group.name.clone(),
            permissions: group.permissions.iter().cloned().collect(),
        }
    }
}

impl From<GroupDoc> for ShopGroup {
    fn from(doc: GroupDoc) -> Self {
        Self {
            group_id: doc.group_id,
            name: doc.name,
            permissions: doc.permissions.into_iter().collect::<BTreeSet<_>>(),
        }
    }
}

impl ShopRow {
    fn into_shop(self, id: Uuid) -> Result<Shop, DbError> {
        let docs: Vec<GroupDoc> = serde_json::from_value(self.groups)?;
        Ok(Shop {
            id,
            name: self.name,
            groups: docs.into_iter().map(ShopGroup::from).collect(),
            version: self.version,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

fn encode_groups(groups: &[ShopGroup]) -> Result<serde_json::Value, DbError> {
    let docs: Vec<GroupDoc> = groups.iter().map(GroupDoc::from).collect();
    Ok(serde_json::to_value(docs)?)
}

/// SurrealDB implementation of the Shop repository.
#[derive(Clone)]
pub struct SurrealShopRepository<C: Connection> {
    db: Surreal<C>,
}

impl<C: Connection> SurrealShopRepository<C> {
    pub fn new(db: Surreal<C>) -> Self {
        Self { db }
    }

    async fn fetch(&self, id: Uuid) -> Result<Shop, DbError> {
        let id_str = id.to_string();

        let mut result = self
            .db
            .query("SELECT * FROM type::record('shop', $id)")
            .bind(("id", id_str.clone()))
            .await?;

        let rows: Vec<ShopRow> = result.take(0)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "shop".into(),
            id: id_str,
        })?;

        row.into_shop(id)
    }
}

impl<C: Connection> ShopRepository for SurrealShopRepository<C> {
    async fn create(&self, input: CreateShop) -> EmporiumResult<Shop> {
        let id = Uuid::new_v4();
        let id_str = id.to_string();

        let result = self
            .db
            .query("CREATE type::record('shop', $id) SET name = $name")
            .bind(("id", id_str.clone()))
            .bind(("name", input.name))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ShopRow> = result.take(0).map_err(DbError::from)?;
        let row = rows.into_iter().next().ok_or_else(|| DbError::NotFound {
            entity: "shop".into(),
            id: id_str,
        })?;

        Ok(row.into_shop(id)?)
    }

    async fn get_by_id(&self, id: Uuid) -> EmporiumResult<Shop> {
        Ok(self.fetch(id).await?)
    }

    async fn save_groups(&self, shop: &Shop) -> EmporiumResult<Shop> {
        let id_str = shop.id.to_string();
        let groups = encode_groups(&shop.groups)?;

        let result = self
            .db
            .query(
                "UPDATE type::record('shop', $id) SET \
                 groups = $groups, \
                 version = version + 1, \
                 updated_at = time::now() \
                 WHERE version = $version",
            )
            .bind(("id", id_str.clone()))
            .bind(("groups", groups))
            .bind(("version", shop.version))
            .await
            .map_err(DbError::from)?;

        let mut result = result
            .check()
            .map_err(|e| DbError::Query(e.to_string()))?;

        let rows: Vec<ShopRow> = result.take(0).map_err(DbError::from)?;
        match rows.into_iter().next() {
            Some(row) => Ok(row.into_shop(shop.id)?),
            None => {
                // Nothing matched: either the shop is gone or the
                // version moved on.
                self.fetch(shop.id).await?;
                Err(DbError::Conflict {
                    entity: "shop".into(),
                    id: id_str,
                }
                .into())
            }
        }
    }
}
