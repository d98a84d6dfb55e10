//! Repository trait definitions for data access abstraction.
//!
//! All repository operations are async. Writes that replace embedded
//! collections are conditional on the `version` the caller read and
//! fail with [`EmporiumError::Conflict`](crate::error::EmporiumError::Conflict)
//! when another writer got there first.

use uuid::Uuid;

use crate::error::EmporiumResult;
use crate::models::{
    account::{Account, CreateAccount},
    shop::{CreateShop, Shop},
};

pub trait ShopRepository: Send + Sync {
    fn create(&self, input: CreateShop) -> impl Future<Output = EmporiumResult<Shop>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EmporiumResult<Shop>> + Send;

    /// Persist `shop.groups` if the stored version still equals
    /// `shop.version`. Returns the stored shop with its new version.
    fn save_groups(&self, shop: &Shop) -> impl Future<Output = EmporiumResult<Shop>> + Send;
}

pub trait AccountRepository: Send + Sync {
    fn create(&self, input: CreateAccount)
    -> impl Future<Output = EmporiumResult<Account>> + Send;
    fn get_by_id(&self, id: Uuid) -> impl Future<Output = EmporiumResult<Account>> + Send;

    /// Persist `account.groups` and `account.roles` together if the
    /// stored version still equals `account.version`.
    fn save_memberships(
        &self,
        account: &Account,
    ) -> impl Future<Output = EmporiumResult<Account>> + Send;
}
