//! Group management service — create groups, add and remove members.

use emporium_core::authz::AuthorizationGate;
use emporium_core::error::{EmporiumError, EmporiumResult};
use emporium_core::models::account::Account;
use emporium_core::models::shop::{NewGroup, Shop, ShopGroup};
use emporium_core::projection;
use emporium_core::repository::{AccountRepository, ShopRepository};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::GroupServiceConfig;

/// Group management service.
///
/// Generic over repository and gate implementations so that this crate
/// has no dependency on the database crate. Every operation takes the
/// acting account id explicitly and checks it against the gate before
/// reading or writing anything else.
pub struct GroupService<S: ShopRepository, A: AccountRepository, G: AuthorizationGate> {
    shop_repo: S,
    account_repo: A,
    gate: G,
    config: GroupServiceConfig,
}

impl<S, A, G> GroupService<S, A, G>
where
    S: ShopRepository,
    A: AccountRepository,
    G: AuthorizationGate,
{
    pub fn new(shop_repo: S, account_repo: A, gate: G, config: GroupServiceConfig) -> Self {
        Self {
            shop_repo,
            account_repo,
            gate,
            config,
        }
    }

    /// Define a new group in `shop_id` and return it.
    ///
    /// The group is appended after the shop's existing groups. No
    /// account is modified.
    pub async fn create_group(
        &self,
        actor_id: Uuid,
        spec: NewGroup,
        shop_id: Uuid,
    ) -> EmporiumResult<ShopGroup> {
        self.authorize(actor_id, shop_id).await?;

        if spec.name.trim().is_empty() {
            return Err(EmporiumError::Validation {
                message: "group name must not be empty".into(),
            });
        }
        let permissions = spec.permission_set();

        let mut attempt = 1;
        loop {
            let mut shop = self.shop_repo.get_by_id(shop_id).await?;
            let group = ShopGroup {
                group_id: fresh_group_id(&shop),
                name: spec.name.clone(),
                permissions: permissions.clone(),
            };
            shop.groups.push(group.clone());

            match self.shop_repo.save_groups(&shop).await {
                Ok(_) => {
                    info!(
                        %actor_id,
                        %shop_id,
                        group_id = %group.group_id,
                        name = %group.name,
                        "Group created"
                    );
                    return Ok(group);
                }
                Err(e) if self.should_retry(&e, attempt) => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }

    /// Add `user_id` to `group` in `shop_id` and return the updated
    /// account.
    ///
    /// The group must exist in the shop; its stored definition decides
    /// which permissions are granted. Adding an existing member is a
    /// no-op.
    pub async fn add_user(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        group: &ShopGroup,
        shop_id: Uuid,
    ) -> EmporiumResult<Account> {
        self.authorize(actor_id, shop_id).await?;

        let mut attempt = 1;
        loop {
            let shop = self.shop_repo.get_by_id(shop_id).await?;
            if shop.group(group.group_id).is_none() {
                return Err(EmporiumError::not_found("group", group.group_id));
            }

            let mut account = self.account_repo.get_by_id(user_id).await?;
            let roles_before = account.roles.get(&shop_id).cloned();
            let added = projection::join_group(&mut account, &shop, group.group_id);
            if !added && account.roles.get(&shop_id) == roles_before.as_ref() {
                debug!(%user_id, %shop_id, group_id = %group.group_id, "Already a member");
                return Ok(account);
            }

            match self.account_repo.save_memberships(&account).await {
                Ok(saved) => {
                    info!(
                        %actor_id,
                        %user_id,
                        %shop_id,
                        group_id = %group.group_id,
                        "User added to group"
                    );
                    return Ok(saved);
                }
                Err(e) if self.should_retry(&e, attempt) => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }

    /// Remove `user_id` from `group_id` in `shop_id` and return the
    /// updated account.
    ///
    /// Roles in the shop are rebuilt from the remaining memberships, so
    /// permissions also granted by another group are kept. Fails with
    /// `NotFound` if the account is not a member of the group.
    pub async fn remove_user(
        &self,
        actor_id: Uuid,
        user_id: Uuid,
        group_id: Uuid,
        shop_id: Uuid,
    ) -> EmporiumResult<Account> {
        self.authorize(actor_id, shop_id).await?;

        let mut attempt = 1;
        loop {
            let shop: Shop = self.shop_repo.get_by_id(shop_id).await?;
            let mut account = self.account_repo.get_by_id(user_id).await?;

            if !projection::leave_group(&mut account, &shop, group_id) {
                return Err(EmporiumError::not_found(
                    "group membership",
                    format!("{user_id}/{group_id}"),
                ));
            }

            match self.account_repo.save_memberships(&account).await {
                Ok(saved) => {
                    info!(
                        %actor_id,
                        %user_id,
                        %shop_id,
                        %group_id,
                        "User removed from group"
                    );
                    return Ok(saved);
                }
                Err(e) if self.should_retry(&e, attempt) => attempt += 1,
                Err(e) => return Err(e),
            }
        }
    }

    async fn authorize(&self, actor_id: Uuid, shop_id: Uuid) -> EmporiumResult<()> {
        if self.gate.has_permission(actor_id, shop_id).await? {
            return Ok(());
        }

        warn!(%actor_id, %shop_id, "Group management denied");
        Err(EmporiumError::AccessDenied {
            reason: format!("{actor_id} may not manage groups of shop {shop_id}"),
        })
    }

    fn should_retry(&self, err: &EmporiumError, attempt: u32) -> bool {
        let retry = matches!(err, EmporiumError::Conflict { .. })
            && attempt < self.config.max_write_attempts;
        if retry {
            debug!(attempt, error = %err, "Retrying after concurrent modification");
        }
        retry
    }
}

/// A group id not yet used in `shop`.
fn fresh_group_id(shop: &Shop) -> Uuid {
    loop {
        let id = Uuid::new_v4();
        if shop.group(id).is_none() {
            return id;
        }
    }
}
