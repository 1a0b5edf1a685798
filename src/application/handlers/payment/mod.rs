//! Payment handlers.
//!
//! ## Commands
//! - Creating a pending transaction
//! - Processing a payment through the chosen gateway
//! - Granting the purchased entitlement
//! - Marking a transaction refunded (admin)
//!
//! ## Queries
//! - Get a transaction
//! - List transactions by user or all
//! - Revenue statistics (admin)

mod create_transaction;
mod get_transaction;
mod get_transaction_stats;
mod grant_entitlement;
mod list_transactions;
mod process_payment;
mod refund_transaction;

#[cfg(test)]
mod test_fixtures;

// Commands
pub use create_transaction::{
    CreateTransactionCommand, CreateTransactionHandler, CreateTransactionResult,
};
pub use grant_entitlement::{
    GrantEntitlementCommand, GrantEntitlementHandler, GrantEntitlementResult,
};
pub use process_payment::{ProcessPaymentCommand, ProcessPaymentHandler, ProcessPaymentResult};
pub use refund_transaction::{
    RefundTransactionCommand, RefundTransactionHandler, RefundTransactionResult,
};

// Queries
pub use get_transaction::{
    GetTransactionHandler, GetTransactionQuery, GetTransactionResult, Requester,
};
pub use get_transaction_stats::{
    GetTransactionStatsHandler, GetTransactionStatsQuery, GetTransactionStatsResult,
};
pub use list_transactions::{
    ListScope, ListTransactionsHandler, ListTransactionsQuery, ListTransactionsResult,
};
