//! Subscription tier levels.

use serde::{Deserialize, Serialize};

/// User subscription tier, stored on the user profile as `subscriptionTier`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubscriptionTier {
    /// Preview access only, plus individually purchased content.
    #[default]
    Free,

    /// Full access to every gated item.
    Premium,
}

impl SubscriptionTier {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionTier::Free => "free",
            SubscriptionTier::Premium => "premium",
        }
    }

    /// Returns true if this tier unlocks all content.
    pub fn unlocks_everything(&self) -> bool {
        matches!(self, SubscriptionTier::Premium)
    }
}

impl std::fmt::Display for SubscriptionTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
