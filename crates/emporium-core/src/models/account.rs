//! Account domain model.

use std::collections::{BTreeMap, BTreeSet};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Uuid,
    pub username: String,
    /// At most one record per shop.
    pub groups: Vec<GroupMembership>,
    /// Effective permissions per shop, derived from `groups`.
    /// Never edited directly; see [`crate::projection`].
    pub roles: BTreeMap<Uuid, BTreeSet<String>>,
    pub version: u64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Account {
    /// Group ids the account belongs to in `shop_id`.
    pub fn group_ids(&self, shop_id: Uuid) -> &[Uuid] {
        self.groups
            .iter()
            .find(|m| m.shop_id == shop_id)
            .map(|m| m.group_ids.as_slice())
            .unwrap_or(&[])
    }

    pub fn is_member(&self, shop_id: Uuid, group_id: Uuid) -> bool {
        self.group_ids(shop_id).contains(&group_id)
    }

    /// Effective permissions in `shop_id`, if any.
    pub fn roles_in(&self, shop_id: Uuid) -> Option<&BTreeSet<String>> {
        self.roles.get(&shop_id)
    }

    pub fn has_role(&self, shop_id: Uuid, permission: &str) -> bool {
        self.roles_in(shop_id)
            .is_some_and(|roles| roles.contains(permission))
    }
}

/// The groups an account belongs to within one shop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupMembership {
    pub shop_id: Uuid,
    /// Insertion ordered, no duplicates. Clients read this as `groupId`.
    #[serde(rename = "groupId")]
    pub group_ids: Vec<Uuid>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateAccount {
    pub username: String,
}
