//! Shop domain model.
//!
//! A shop is the scope for every permission decision. Its permission
//! groups are embedded in the shop document and have no lifecycle of
//! their own.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Shop {
    pub id: Uuid,
    pub name: String,
    /// Groups in creation order.
    pub groups: Vec<ShopGroup>,
    /// Incremented on every write; used for conditional updates.
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Shop {
    /// Look up a group by id.
    pub fn group(&self, group_id: Uuid) -> Option<&ShopGroup> {
        self.groups.iter().find(|g| g.group_id == group_id)
    }
}

/// A named set of permissions defined by a shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShopGroup {
    /// Unique within the owning shop.
    pub group_id: Uuid,
    pub name: String,
    pub permissions: BTreeSet<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateShop {
    pub name: String,
}

/// Request payload for creating a group.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewGroup {
    pub name: String,
    /// Order is irrelevant; duplicates are collapsed on storage.
    #[serde(default)]
    pub permissions: Vec<String>,
}

impl NewGroup {
    pub fn permission_set(&self) -> BTreeSet<String> {
        self.permissions.iter().cloned().collect()
    }
}
