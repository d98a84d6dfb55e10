//! Authorization gate contract.

use uuid::Uuid;

use crate::error::EmporiumResult;

/// Decides whether `actor_id` may administer `shop_id`.
///
/// Implementations must not mutate anything. An `Err` means the decision
/// could not be made (e.g. the backing store failed), not a denial.
pub trait AuthorizationGate: Send + Sync {
    fn has_permission(
        &self,
        actor_id: Uuid,
        shop_id: Uuid,
    ) -> impl Future<Output = EmporiumResult<bool>> + Send;
}
