//! Shared wiring for payment handler tests: the in-memory store with the
//! real document adapters on top.

use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::json;

use crate::adapters::store::{
    DocumentEntitlementStore, DocumentGatewayConfigReader, DocumentTransactionStore,
    InMemoryDocumentStore, GATEWAY_SETTINGS_DOCUMENT, SETTINGS_COLLECTION,
    TRANSACTIONS_COLLECTION,
};
use crate::domain::entitlement::UserEntitlement;
use crate::domain::foundation::{ContentId, TransactionId, UserId};
use crate::domain::payment::{
    ContentKind, ContentRef, CurrencyCode, Money, NewTransaction, PaymentMethod, Transaction,
};
use crate::ports::{
    DocumentStore, EntitlementStore, FieldValue, FieldWrites, GatewayConfigReader,
    TransactionRepository,
};

pub const USER: &str = "user-1";
pub const CONTENT: &str = "dest-petra";

pub struct Harness {
    pub store: Arc<InMemoryDocumentStore>,
}

impl Harness {
    pub fn new() -> Self {
        Self {
            store: Arc::new(InMemoryDocumentStore::new()),
        }
    }

    pub fn repository(&self) -> Arc<dyn TransactionRepository> {
        Arc::new(DocumentTransactionStore::new(self.store.clone()))
    }

    pub fn entitlements(&self) -> Arc<dyn EntitlementStore> {
        Arc::new(DocumentEntitlementStore::new(self.store.clone()))
    }

    pub fn config_reader(&self) -> Arc<dyn GatewayConfigReader> {
        Arc::new(DocumentGatewayConfigReader::new(self.store.clone()))
    }

    pub fn user() -> UserId {
        UserId::new(USER).unwrap()
    }

    pub fn content() -> ContentId {
        ContentId::new(CONTENT).unwrap()
    }

    /// Stores a pending 499.00 INR purchase by `USER`.
    pub async fn pending(&self, kind: ContentKind, method: PaymentMethod) -> TransactionId {
        let txn = NewTransaction::new(
            Self::user(),
            "traveller@example.com",
            Money::new(Decimal::new(49900, 2), CurrencyCode::new("INR").unwrap()).unwrap(),
            ContentRef::new(Self::content(), kind, "Petra at Dawn").unwrap(),
            method,
        )
        .unwrap();
        self.repository().create(&txn).await.unwrap()
    }

    pub async fn transaction(&self, id: &TransactionId) -> Transaction {
        self.repository().get(id).await.unwrap().unwrap()
    }

    pub async fn transaction_count(&self) -> usize {
        self.store.count(TRANSACTIONS_COLLECTION).await
    }

    pub async fn entitlement(&self) -> UserEntitlement {
        self.entitlements().get(&Self::user()).await.unwrap()
    }

    /// Writes a config block for `method`.
    pub async fn configure(&self, method: PaymentMethod, is_active: bool) {
        let mut fields = FieldWrites::new();
        fields.insert(
            method.as_str().to_string(),
            FieldValue::value(json!({
                "publicKey": format!("{}_test_public", method.as_str()),
                "secretKey": format!("{}_test_secret", method.as_str()),
                "isActive": is_active,
            })),
        );
        self.store
            .set(SETTINGS_COLLECTION, GATEWAY_SETTINGS_DOCUMENT, fields)
            .await
            .unwrap();
    }
}
