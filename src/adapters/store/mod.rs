//! Document store adapters.
//!
//! - `InMemoryDocumentStore` - the store itself, for tests and local runs
//! - `DocumentTransactionStore` - transactions collection
//! - `DocumentGatewayConfigReader` - `settings/paymentGateways`
//! - `DocumentEntitlementStore` - entitlement fields on `users`

mod entitlement_store;
mod gateway_config_store;
mod in_memory;
mod transaction_store;

pub use entitlement_store::{DocumentEntitlementStore, USERS_COLLECTION};
pub use gateway_config_store::{
    DocumentGatewayConfigReader, GATEWAY_SETTINGS_DOCUMENT, SETTINGS_COLLECTION,
};
pub use in_memory::InMemoryDocumentStore;
pub use transaction_store::{DocumentTransactionStore, TRANSACTIONS_COLLECTION};

use crate::domain::payment::PaymentError;
use crate::ports::StoreError;

impl From<StoreError> for PaymentError {
    fn from(err: StoreError) -> Self {
        PaymentError::infrastructure(err.to_string())
    }
}
