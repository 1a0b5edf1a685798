//! Foundation module - Shared domain primitives.
//!
//! Contains identifiers, timestamps, error types and the state machine
//! trait that form the vocabulary of the payment and entitlement domains.

mod auth;
mod errors;
mod ids;
mod state_machine;
mod timestamp;

pub use auth::{AuthError, AuthenticatedUser};
pub use errors::{ErrorCode, ValidationError};
pub use ids::{ContentId, TransactionId, UserId};
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
