//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, state machine)
//! - `payment` - Transactions, gateway settings, outcomes and request signing
//! - `entitlement` - Subscription tier, purchased content and the preview gate

pub mod entitlement;
pub mod foundation;
pub mod payment;
