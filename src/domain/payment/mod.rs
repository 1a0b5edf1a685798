//! Payment domain module.
//!
//! Transaction lifecycle, gateway settings, normalized outcomes and the
//! Paytm checksum.
//!
//! # Module Structure
//!
//! - `status` - TransactionStatus state machine
//! - `transaction` - Transaction record and write models
//! - `money` - Amount and currency value objects
//! - `gateway_config` - Admin gateway settings record
//! - `outcome` - Gateway receipts and the normalized payment outcome
//! - `signature` - Paytm checksum sign/verify
//! - `stats` - Revenue aggregation

mod content;
mod errors;
mod gateway_config;
mod method;
mod money;
mod outcome;
pub mod signature;
mod stats;
mod status;
mod transaction;

pub use content::{ContentKind, ContentRef};
pub use errors::{GatewayError, PaymentError, GENERIC_PAYMENT_FAILURE};
pub use gateway_config::{GatewayConfig, GatewayCredentials};
pub use method::PaymentMethod;
pub use money::{CurrencyCode, Money, MAX_AMOUNT};
pub use outcome::{Confirmation, GatewayReceipt, PaymentOutcome};
pub use signature::SignatureError;
pub use stats::{ContentRevenue, TransactionStats, TOP_CONTENT_LIMIT};
pub use status::TransactionStatus;
pub use transaction::{
    NewTransaction, StatusUpdate, Transaction, META_CONFIRMATION, META_FAILURE_REASON,
    META_REFUNDED_AT,
};
