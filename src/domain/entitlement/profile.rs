//! The entitlement slice of a user profile.

use std::collections::BTreeSet;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ContentId, UserId};

use super::SubscriptionTier;

/// What a user may watch: their tier plus everything bought one by one.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserEntitlement {
    pub user_id: UserId,
    #[serde(default)]
    pub subscription_tier: SubscriptionTier,
    #[serde(default)]
    pub purchased_content: BTreeSet<ContentId>,
}

impl UserEntitlement {
    /// A user with no purchases on the free tier.
    pub fn free(user_id: UserId) -> Self {
        Self {
            user_id,
            subscription_tier: SubscriptionTier::Free,
            purchased_content: BTreeSet::new(),
        }
    }

    /// Returns true if this entitlement gives full access to `content_id`.
    pub fn grants(&self, content_id: &ContentId) -> bool {
        self.subscription_tier.unlocks_everything() || self.purchased_content.contains(content_id)
    }

    pub fn with_purchase(mut self, content_id: ContentId) -> Self {
        self.purchased_content.insert(content_id);
        self
    }

    pub fn with_tier(mut self, tier: SubscriptionTier) -> Self {
        self.subscription_tier = tier;
        self
    }
}
