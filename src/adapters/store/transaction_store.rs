//! Transaction repository over the document store.
//!
//! Amounts are stored as decimal strings. Timestamps are server-assigned.
//! Status writes re-read the record and validate the transition first, so a
//! second terminal write is refused instead of overwriting the first.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::{Map, Value};

use crate::domain::foundation::{StateMachine, Timestamp, TransactionId, UserId};
use crate::domain::payment::{
    NewTransaction, PaymentError, StatusUpdate, Transaction, TransactionStatus, META_CONFIRMATION,
    META_FAILURE_REASON, META_REFUNDED_AT,
};
use crate::ports::{
    Direction, DocumentStore, FieldValue, FieldWrites, Query, TransactionRepository,
};

pub const TRANSACTIONS_COLLECTION: &str = "transactions";

/// Transactions collection adapter.
#[derive(Clone)]
pub struct DocumentTransactionStore {
    store: Arc<dyn DocumentStore>,
}

impl DocumentTransactionStore {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self { store }
    }

    async fn list(&self, query: Query) -> Result<Vec<Transaction>, PaymentError> {
        let docs = self.store.query(TRANSACTIONS_COLLECTION, &query).await?;
        docs.into_iter()
            .map(|doc| doc.into_typed::<Transaction>().map_err(PaymentError::from))
            .collect()
    }
}

/// Verb for the "Cannot {verb} transaction" message.
fn attempted_action(target: TransactionStatus) -> &'static str {
    match target {
        TransactionStatus::Pending => "reopen",
        TransactionStatus::Completed => "complete",
        TransactionStatus::Failed => "fail",
        TransactionStatus::Refunded => "refund",
    }
}

#[async_trait]
impl TransactionRepository for DocumentTransactionStore {
    async fn create(&self, transaction: &NewTransaction) -> Result<TransactionId, PaymentError> {
        let content = &transaction.content;
        let metadata: Map<String, Value> = transaction
            .metadata
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();

        let mut fields = FieldWrites::new();
        fields.insert("userId".into(), FieldValue::value(transaction.user_id.as_str()));
        fields.insert("userEmail".into(), FieldValue::value(transaction.user_email.as_str()));
        fields.insert(
            "amount".into(),
            FieldValue::value(transaction.money.amount().to_string()),
        );
        fields.insert(
            "currency".into(),
            FieldValue::value(transaction.money.currency().as_str()),
        );
        fields.insert("contentId".into(), FieldValue::value(content.content_id.as_str()));
        fields.insert("contentKind".into(), FieldValue::value(content.content_kind.as_str()));
        fields.insert("contentTitle".into(), FieldValue::value(content.content_title.as_str()));
        fields.insert(
            "paymentMethod".into(),
            FieldValue::value(transaction.payment_method.as_str()),
        );
        fields.insert(
            "status".into(),
            FieldValue::value(TransactionStatus::Pending.as_str()),
        );
        fields.insert("metadata".into(), FieldValue::Value(Value::Object(metadata)));
        fields.insert("createdAt".into(), FieldValue::ServerTimestamp);
        fields.insert("updatedAt".into(), FieldValue::ServerTimestamp);

        let id = self.store.create(TRANSACTIONS_COLLECTION, fields).await?;
        let id: TransactionId = id.parse().map_err(|e| {
            PaymentError::infrastructure(format!("store assigned a non-UUID id '{}': {}", id, e))
        })?;

        tracing::debug!(
            transaction_id = %id,
            user_id = %transaction.user_id,
            gateway = transaction.payment_method.as_str(),
            "Transaction created"
        );
        Ok(id)
    }

    async fn update_status(
        &self,
        id: &TransactionId,
        update: &StatusUpdate,
    ) -> Result<(), PaymentError> {
        let current = self
            .get(id)
            .await?
            .ok_or_else(|| PaymentError::not_found(*id))?;

        if !current.status.can_transition_to(&update.status) {
            return Err(PaymentError::invalid_state(
                current.status.as_str(),
                attempted_action(update.status),
            ));
        }

        let mut metadata: Map<String, Value> = current.metadata.into_iter().collect();
        if let Some(reason) = &update.failure_reason {
            metadata.insert(META_FAILURE_REASON.into(), Value::String(reason.clone()));
        }
        if let Some(confirmation) = update.confirmation {
            metadata.insert(
                META_CONFIRMATION.into(),
                Value::String(confirmation.as_str().to_string()),
            );
        }
        if update.status == TransactionStatus::Refunded {
            metadata.insert(
                META_REFUNDED_AT.into(),
                Value::String(Timestamp::now().to_rfc3339()),
            );
        }

        let mut fields = FieldWrites::new();
        fields.insert("status".into(), FieldValue::value(update.status.as_str()));
        fields.insert("updatedAt".into(), FieldValue::ServerTimestamp);
        fields.insert("metadata".into(), FieldValue::Value(Value::Object(metadata)));
        if let Some(provider_payment_id) = &update.provider_payment_id {
            fields.insert(
                "providerPaymentId".into(),
                FieldValue::value(provider_payment_id.as_str()),
            );
        }

        self.store
            .update(TRANSACTIONS_COLLECTION, &id.to_string(), fields)
            .await?;

        tracing::info!(
            transaction_id = %id,
            status = update.status.as_str(),
            "Transaction status updated"
        );
        Ok(())
    }

    async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>, PaymentError> {
        self.store
            .get(TRANSACTIONS_COLLECTION, &id.to_string())
            .await?
            .map(|doc| doc.into_typed::<Transaction>())
            .transpose()
            .map_err(PaymentError::from)
    }

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Transaction>, PaymentError> {
        self.list(
            Query::new()
                .where_eq("userId", user_id.as_str())
                .order_by("createdAt", Direction::Descending),
        )
        .await
    }

    async fn list_all(&self) -> Result<Vec<Transaction>, PaymentError> {
        self.list(Query::new().order_by("createdAt", Direction::Descending))
            .await
    }
}
