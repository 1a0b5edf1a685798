//! Entitlement domain module.
//!
//! Who may watch what, and the preview gate that enforces it.
//!
//! # Module Structure
//!
//! - `tier` - SubscriptionTier levels
//! - `profile` - UserEntitlement (tier + purchased content)
//! - `gate` - EntitlementGate countdown state machine

mod gate;
mod profile;
mod tier;

pub use gate::{
    EntitlementGate, EntitlementState, GateEvent, GatePhase, TickOutcome, DEFAULT_PREVIEW_SECONDS,
};
pub use profile::UserEntitlement;
pub use tier::SubscriptionTier;
