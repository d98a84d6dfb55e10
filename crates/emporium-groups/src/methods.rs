//! Remote method dispatch.
//!
//! Maps the platform's method names onto [`GroupService`] calls.
//! Arguments arrive as a JSON array in positional order and results are
//! returned as JSON.

use emporium_core::authz::AuthorizationGate;
use emporium_core::error::{EmporiumError, EmporiumResult};
use emporium_core::models::shop::{NewGroup, ShopGroup};
use emporium_core::repository::{AccountRepository, ShopRepository};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use crate::service::GroupService;

/// `[groupSpec, shopId]` → created group.
pub const CREATE_GROUP: &str = "group/createGroup";
/// `[userId, group, shopId]` → updated account.
pub const ADD_USER: &str = "group/addUser";
/// `[userId, groupId, shopId]` → updated account.
pub const REMOVE_USER: &str = "group/removeUser";

pub struct MethodRegistry<S: ShopRepository, A: AccountRepository, G: AuthorizationGate> {
    service: GroupService<S, A, G>,
}

impl<S, A, G> MethodRegistry<S, A, G>
where
    S: ShopRepository,
    A: AccountRepository,
    G: AuthorizationGate,
{
    pub fn new(service: GroupService<S, A, G>) -> Self {
        Self { service }
    }

    /// Names of all registered methods.
    pub fn methods(&self) -> &'static [&'static str] {
        &[CREATE_GROUP, ADD_USER, REMOVE_USER]
    }

    /// Invoke `method` on behalf of `actor_id`.
    pub async fn call(
        &self,
        actor_id: Uuid,
        method: &str,
        args: serde_json::Value,
    ) -> EmporiumResult<serde_json::Value> {
        match method {
            CREATE_GROUP => {
                let (spec, shop_id): (NewGroup, Uuid) = decode_args(method, args)?;
                let group = self.service.create_group(actor_id, spec, shop_id).await?;
                encode_result(&group)
            }
            ADD_USER => {
                let (user_id, group, shop_id): (Uuid, ShopGroup, Uuid) =
                    decode_args(method, args)?;
                let account = self
                    .service
                    .add_user(actor_id, user_id, &group, shop_id)
                    .await?;
                encode_result(&account)
            }
            REMOVE_USER => {
                let (user_id, group_id, shop_id): (Uuid, Uuid, Uuid) = decode_args(method, args)?;
                let account = self
                    .service
                    .remove_user(actor_id, user_id, group_id, shop_id)
                    .await?;
                encode_result(&account)
            }
            other => Err(EmporiumError::not_found("method", other)),
        }
    }
}

fn decode_args<T: DeserializeOwned>(method: &str, args: serde_json::Value) -> EmporiumResult<T> {
    serde_json::from_value(args).map_err(|e| EmporiumError::Validation {
        message: format!("invalid arguments for {method}: {e}"),
    })
}

fn encode_result<T: Serialize>(value: &T) -> EmporiumResult<serde_json::Value> {
    serde_json::to_value(value).map_err(|e| EmporiumError::Internal(e.to_string()))
}
