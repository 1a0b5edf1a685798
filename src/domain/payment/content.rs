//! What a transaction pays for.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ContentId, ValidationError};

/// Kind of catalog item being purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    /// A single VR destination.
    Destination,
    /// The premium plan. Completing it upgrades the subscription tier.
    Premium,
    /// A single 360° video.
    Video,
}

impl ContentKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ContentKind::Destination => "destination",
            ContentKind::Premium => "premium",
            ContentKind::Video => "video",
        }
    }

    /// Returns true if a completed purchase of this kind upgrades the tier.
    pub fn upgrades_tier(&self) -> bool {
        matches!(self, ContentKind::Premium)
    }
}

/// Reference to the purchased item, denormalized onto the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentRef {
    pub content_id: ContentId,
    pub content_kind: ContentKind,
    pub content_title: String,
}

impl ContentRef {
    pub fn new(
        content_id: ContentId,
        content_kind: ContentKind,
        content_title: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        let content_title = content_title.into();
        if content_title.trim().is_empty() {
            return Err(ValidationError::empty_field("content_title"));
        }
        Ok(Self {
            content_id,
            content_kind,
            content_title,
        })
    }
}
