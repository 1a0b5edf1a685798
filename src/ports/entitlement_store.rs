//! Entitlement store port.
//!
//! Reads and writes the entitlement fields of a user profile
//! (`subscriptionTier`, `purchasedContent`) and streams changes to them.

use async_trait::async_trait;
use futures::stream::BoxStream;

use crate::domain::entitlement::UserEntitlement;
use crate::domain::foundation::{ContentId, UserId};
use crate::domain::payment::PaymentError;

/// Entitlement snapshots, the current one first. Dropping it unsubscribes.
pub type EntitlementStream = BoxStream<'static, Result<UserEntitlement, PaymentError>>;

#[async_trait]
pub trait EntitlementStore: Send + Sync {
    /// Current entitlement. A user without a profile is on the free tier.
    async fn get(&self, user_id: &UserId) -> Result<UserEntitlement, PaymentError>;

    /// Adds `content_id` to the purchased set. Adding twice is a no-op.
    async fn add_purchased_content(
        &self,
        user_id: &UserId,
        content_id: &ContentId,
    ) -> Result<(), PaymentError>;

    /// Sets the subscription tier to premium.
    async fn upgrade_to_premium(&self, user_id: &UserId) -> Result<(), PaymentError>;

    /// Streams the user's entitlement as it changes.
    async fn watch(&self, user_id: &UserId) -> Result<EntitlementStream, PaymentError>;
}
