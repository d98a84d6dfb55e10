//! Authorization gate implementations.

use emporium_core::authz::AuthorizationGate;
use emporium_core::error::{EmporiumError, EmporiumResult};
use emporium_core::repository::AccountRepository;
use uuid::Uuid;

use crate::config::GateConfig;

/// A gate with a fixed answer.
#[derive(Debug, Clone, Copy)]
pub struct StaticGate {
    allow: bool,
}

impl StaticGate {
    pub fn allow() -> Self {
        Self { allow: true }
    }

    pub fn deny() -> Self {
        Self { allow: false }
    }
}

impl AuthorizationGate for StaticGate {
    async fn has_permission(&self, _actor_id: Uuid, _shop_id: Uuid) -> EmporiumResult<bool> {
        Ok(self.allow)
    }
}

/// Grants access when the actor's account holds one of the configured
/// administrative permissions in the target shop.
pub struct AccountRoleGate<A: AccountRepository> {
    accounts: A,
    config: GateConfig,
}

impl<A: AccountRepository> AccountRoleGate<A> {
    pub fn new(accounts: A, config: GateConfig) -> Self {
        Self { accounts, config }
    }
}

impl<A: AccountRepository> AuthorizationGate for AccountRoleGate<A> {
    async fn has_permission(&self, actor_id: Uuid, shop_id: Uuid) -> EmporiumResult<bool> {
        let actor = match self.accounts.get_by_id(actor_id).await {
            Ok(account) => account,
            // Unknown actors are denied, not reported.
            Err(EmporiumError::NotFound { .. }) => return Ok(false),
            Err(e) => return Err(e),
        };

        Ok(self
            .config
            .admin_permissions
            .iter()
            .any(|permission| actor.has_role(shop_id, permission)))
    }
}
