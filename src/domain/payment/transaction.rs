//! Transaction record - one attempted purchase.

use std::collections::BTreeMap;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::{Timestamp, TransactionId, UserId, ValidationError};

use super::{Confirmation, ContentRef, CurrencyCode, Money, PaymentMethod, TransactionStatus};

/// Metadata key holding the gateway or config error text on `failed`.
pub const META_FAILURE_REASON: &str = "failureReason";
/// Metadata key holding `confirmed` or `optimistic` on `completed`.
pub const META_CONFIRMATION: &str = "confirmation";
/// Metadata key holding the refund time.
pub const META_REFUNDED_AT: &str = "refundedAt";

/// A persisted purchase attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: TransactionId,
    pub user_id: UserId,
    pub user_email: String,
    pub amount: Decimal,
    pub currency: CurrencyCode,
    #[serde(flatten)]
    pub content: ContentRef,
    pub payment_method: PaymentMethod,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub provider_payment_id: Option<String>,
    pub status: TransactionStatus,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
    #[serde(default)]
    pub metadata: BTreeMap<String, Value>,
}

impl Transaction {
    pub fn is_pending(&self) -> bool {
        self.status == TransactionStatus::Pending
    }

    /// Failure text recorded by the coordinator, if any.
    pub fn failure_reason(&self) -> Option<&str> {
        self.metadata.get(META_FAILURE_REASON).and_then(Value::as_str)
    }

    /// Confirmation strength recorded on completion, if any.
    pub fn confirmation(&self) -> Option<Confirmation> {
        match self.metadata.get(META_CONFIRMATION).and_then(Value::as_str) {
            Some("confirmed") => Some(Confirmation::Confirmed),
            Some("optimistic") => Some(Confirmation::Optimistic),
            _ => None,
        }
    }

    /// Returns true if `user_id` placed this transaction.
    pub fn is_owned_by(&self, user_id: &UserId) -> bool {
        &self.user_id == user_id
    }
}

/// Validated input for creating a transaction.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTransaction {
    pub user_id: UserId,
    pub user_email: String,
    pub money: Money,
    pub content: ContentRef,
    pub payment_method: PaymentMethod,
    pub metadata: BTreeMap<String, Value>,
}

impl NewTransaction {
    pub fn new(
        user_id: UserId,
        user_email: impl Into<String>,
        money: Money,
        content: ContentRef,
        payment_method: PaymentMethod,
    ) -> Result<Self, ValidationError> {
        let user_email = user_email.into().trim().to_string();
        if user_email.is_empty() {
            return Err(ValidationError::empty_field("user_email"));
        }
        if !user_email.contains('@') {
            return Err(ValidationError::invalid_format(
                "user_email",
                "must be an email address",
            ));
        }
        Ok(Self {
            user_id,
            user_email,
            money,
            content,
            payment_method,
            metadata: BTreeMap::new(),
        })
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}

/// A status write, with the audit fields that go along with it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusUpdate {
    pub status: TransactionStatus,
    pub provider_payment_id: Option<String>,
    pub failure_reason: Option<String>,
    pub confirmation: Option<Confirmation>,
}

impl StatusUpdate {
    pub fn completed(provider_payment_id: Option<String>, confirmation: Confirmation) -> Self {
        Self {
            status: TransactionStatus::Completed,
            provider_payment_id,
            failure_reason: None,
            confirmation: Some(confirmation),
        }
    }

    pub fn failed(reason: impl Into<String>) -> Self {
        Self {
            status: TransactionStatus::Failed,
            provider_payment_id: None,
            failure_reason: Some(reason.into()),
            confirmation: None,
        }
    }

    pub fn refunded() -> Self {
        Self {
            status: TransactionStatus::Refunded,
            provider_payment_id: None,
            failure_reason: None,
            confirmation: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::foundation::ContentId;
    use crate::domain::payment::ContentKind;
    use serde_json::json;

    fn money() -> Money {
        Money::new(Decimal::new(49900, 2), CurrencyCode::new("INR").unwrap()).unwrap()
    }

    fn content() -> ContentRef {
        ContentRef::new(
            ContentId::new("dest-petra").unwrap(),
            ContentKind::Destination,
            "Petra at Dawn",
        )
        .unwrap()
    }

    #[test]
    fn new_transaction_requires_email() {
        let user = UserId::new("user-1").unwrap();
        assert!(NewTransaction::new(user.clone(), "", money(), content(), PaymentMethod::Stripe).is_err());
        assert!(NewTransaction::new(user.clone(), "nobody", money(), content(), PaymentMethod::Stripe).is_err());
        assert!(NewTransaction::new(user, " a@b.io ", money(), content(), PaymentMethod::Stripe).is_ok());
    }

    #[test]
    fn deserializes_store_document() {
        let txn: Transaction = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "userId": "user-1",
            "userEmail": "a@b.io",
            "amount": "499.00",
            "currency": "INR",
            "contentId": "dest-petra",
            "contentKind": "destination",
            "contentTitle": "Petra at Dawn",
            "paymentMethod": "paytm",
            "status": "completed",
            "providerPaymentId": "20240115111212800110168",
            "createdAt": "2024-01-15T10:30:00.000Z",
            "updatedAt": "2024-01-15T10:31:00.000Z",
            "metadata": { "confirmation": "optimistic" }
        }))
        .unwrap();

        assert_eq!(txn.status, TransactionStatus::Completed);
        assert_eq!(txn.amount, Decimal::new(49900, 2));
        assert_eq!(txn.content.content_kind, ContentKind::Destination);
        assert_eq!(txn.confirmation(), Some(Confirmation::Optimistic));
        assert!(txn.failure_reason().is_none());
    }

    #[test]
    fn amount_accepts_plain_numbers() {
        let txn: Transaction = serde_json::from_value(json!({
            "id": "550e8400-e29b-41d4-a716-446655440000",
            "userId": "user-1",
            "userEmail": "a@b.io",
            "amount": 10,
            "currency": "usd",
            "contentId": "premium-annual",
            "contentKind": "premium",
            "contentTitle": "Premium",
            "paymentMethod": "stripe",
            "status": "failed",
            "createdAt": "2024-01-15T10:30:00Z",
            "updatedAt": "2024-01-15T10:30:00Z",
            "metadata": { "failureReason": "Card declined" }
        }))
        .unwrap();

        assert_eq!(txn.amount, Decimal::from(10));
        assert_eq!(txn.currency.as_str(), "USD");
        assert_eq!(txn.failure_reason(), Some("Card declined"));
    }

    #[test]
    fn status_update_constructors_fill_audit_fields() {
        let done = StatusUpdate::completed(Some("pay_1".into()), Confirmation::Confirmed);
        assert_eq!(done.status, TransactionStatus::Completed);
        assert_eq!(done.confirmation, Some(Confirmation::Confirmed));

        let failed = StatusUpdate::failed("Payment cancelled");
        assert_eq!(failed.status, TransactionStatus::Failed);
        assert_eq!(failed.failure_reason.as_deref(), Some("Payment cancelled"));
        assert!(failed.provider_payment_id.is_none());
    }
}
