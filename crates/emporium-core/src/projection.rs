//! Per-shop role projection.
//!
//! An account's `roles[shop]` is always the union of the permissions of
//! the groups it belongs to in that shop. Membership edits go through
//! [`join_group`] and [`leave_group`], which rebuild the projection from
//! scratch so that permissions shared by several groups survive the
//! removal of any one of them.

use std::collections::BTreeSet;

use uuid::Uuid;

use crate::models::account::{Account, GroupMembership};
use crate::models::shop::{Shop, ShopGroup};

/// Union of the permissions of `member_of`, resolved against `groups`.
///
/// Ids that do not resolve to a group contribute nothing.
pub fn project_roles(member_of: &[Uuid], groups: &[ShopGroup]) -> BTreeSet<String> {
    groups
        .iter()
        .filter(|g| member_of.contains(&g.group_id))
        .flat_map(|g| g.permissions.iter().cloned())
        .collect()
}

/// Add the account to `group_id` in `shop` and refresh its roles there.
///
/// Returns `false` if the account was already a member. The projection
/// is refreshed either way.
pub fn join_group(account: &mut Account, shop: &Shop, group_id: Uuid) -> bool {
    let added = match account.groups.iter_mut().find(|m| m.shop_id == shop.id) {
        Some(membership) if membership.group_ids.contains(&group_id) => false,
        Some(membership) => {
            membership.group_ids.push(group_id);
            true
        }
        None => {
            account.groups.push(GroupMembership {
                shop_id: shop.id,
                group_ids: vec![group_id],
            });
            true
        }
    };
    refresh_roles(account, shop);
    added
}

/// Remove the account from `group_id` in `shop` and refresh its roles.
///
/// Returns `false` (and leaves the account untouched) if the account
/// was not a member.
pub fn leave_group(account: &mut Account, shop: &Shop, group_id: Uuid) -> bool {
    let Some(membership) = account.groups.iter_mut().find(|m| m.shop_id == shop.id) else {
        return false;
    };
    let before = membership.group_ids.len();
    membership.group_ids.retain(|id| *id != group_id);
    if membership.group_ids.len() == before {
        return false;
    }

    account.groups.retain(|m| !m.group_ids.is_empty());
    refresh_roles(account, shop);
    true
}

/// Recompute `roles[shop.id]` from the account's memberships in `shop`.
pub fn refresh_roles(account: &mut Account, shop: &Shop) {
    let roles = project_roles(account.group_ids(shop.id), &shop.groups);
    if roles.is_empty() {
        account.roles.remove(&shop.id);
    } else {
        account.roles.insert(shop.id, roles);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use chrono::Utc;

    use super::*;

    fn group(name: &str, permissions: &[&str]) -> ShopGroup {
        ShopGroup {
            group_id: Uuid::new_v4(),
            name: name.into(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    fn shop(groups: Vec<ShopGroup>) -> Shop {
        Shop {
            id: Uuid::new_v4(),
            name: "Test Shop".into(),
            groups,
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn account() -> Account {
        Account {
            id: Uuid::new_v4(),
            username: "alice".into(),
            groups: Vec::new(),
            roles: BTreeMap::new(),
            version: 0,
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn join_grants_group_permissions() {
        let manager = group("Shop Manager", &["sample-role1", "sample-role2"]);
        let shop = shop(vec![manager.clone()]);
        let mut acc = account();

        assert!(join_group(&mut acc, &shop, manager.group_id));

        assert_eq!(acc.group_ids(shop.id), &[manager.group_id]);
        assert!(acc.has_role(shop.id, "sample-role1"));
        assert!(acc.has_role(shop.id, "sample-role2"));
    }

    #[test]
    fn join_twice_does_not_duplicate_membership() {
        let manager = group("Shop Manager", &["sample-role1"]);
        let shop = shop(vec![manager.clone()]);
        let mut acc = account();

        assert!(join_group(&mut acc, &shop, manager.group_id));
        assert!(!join_group(&mut acc, &shop, manager.group_id));

        assert_eq!(acc.groups.len(), 1);
        assert_eq!(acc.group_ids(shop.id).len(), 1);
        assert_eq!(acc.roles_in(shop.id).unwrap().len(), 1);
    }

    #[test]
    fn leave_restores_previous_roles() {
        let viewer = group("Viewer", &["read"]);
        let manager = group("Manager", &["read", "write"]);
        let shop = shop(vec![viewer.clone(), manager.clone()]);
        let mut acc = account();

        join_group(&mut acc, &shop, viewer.group_id);
        let before = acc.roles.clone();

        join_group(&mut acc, &shop, manager.group_id);
        assert!(acc.has_role(shop.id, "write"));

        assert!(leave_group(&mut acc, &shop, manager.group_id));
        assert_eq!(acc.roles, before);
        assert!(!acc.is_member(shop.id, manager.group_id));
    }

    #[test]
    fn leave_keeps_permissions_shared_with_remaining_group() {
        let a = group("A", &["shared", "only-a"]);
        let b = group("B", &["shared", "only-b"]);
        let shop = shop(vec![a.clone(), b.clone()]);
        let mut acc = account();

        join_group(&mut acc, &shop, a.group_id);
        join_group(&mut acc, &shop, b.group_id);
        leave_group(&mut acc, &shop, a.group_id);

        let roles = acc.roles_in(shop.id).unwrap();
        assert!(roles.contains("shared"));
        assert!(roles.contains("only-b"));
        assert!(!roles.contains("only-a"));
    }

    #[test]
    fn leaving_last_group_drops_shop_entries() {
        let manager = group("Manager", &["write"]);
        let shop = shop(vec![manager.clone()]);
        let mut acc = account();

        join_group(&mut acc, &shop, manager.group_id);
        leave_group(&mut acc, &shop, manager.group_id);

        assert!(acc.groups.is_empty());
        assert!(acc.roles_in(shop.id).is_none());
    }

    #[test]
    fn leave_unknown_membership_is_reported() {
        let manager = group("Manager", &["write"]);
        let shop = shop(vec![manager.clone()]);
        let mut acc = account();

        assert!(!leave_group(&mut acc, &shop, manager.group_id));

        join_group(&mut acc, &shop, manager.group_id);
        assert!(!leave_group(&mut acc, &shop, Uuid::new_v4()));
        assert!(acc.has_role(shop.id, "write"));
    }

    #[test]
    fn roles_are_scoped_per_shop() {
        let first_group = group("Manager", &["write"]);
        let second_group = group("Viewer", &["read"]);
        let first = shop(vec![first_group.clone()]);
        let second = shop(vec![second_group.clone()]);
        let mut acc = account();

        join_group(&mut acc, &first, first_group.group_id);
        join_group(&mut acc, &second, second_group.group_id);
        leave_group(&mut acc, &first, first_group.group_id);

        assert!(acc.roles_in(first.id).is_none());
        assert!(acc.has_role(second.id, "read"));
    }

    #[test]
    fn unresolved_group_ids_contribute_nothing() {
        let manager = group("Manager", &["write"]);
        let roles = project_roles(&[Uuid::new_v4(), manager.group_id], &[manager]);
        assert_eq!(roles.into_iter().collect::<Vec<_>>(), vec!["write"]);
    }
}
