//! CreateTransactionHandler - Command handler for opening a purchase attempt.

use std::collections::BTreeMap;
use std::sync::Arc;

use rust_decimal::Decimal;
use serde_json::Value;

use crate::domain::foundation::{ContentId, TransactionId, UserId};
use crate::domain::payment::{
    ContentKind, ContentRef, CurrencyCode, Money, NewTransaction, PaymentError, PaymentMethod,
};
use crate::ports::TransactionRepository;

/// Command to create a pending transaction.
#[derive(Debug, Clone)]
pub struct CreateTransactionCommand {
    pub user_id: String,
    pub user_email: String,
    pub amount: Decimal,
    pub currency: String,
    pub content_id: String,
    pub content_kind: ContentKind,
    pub content_title: String,
    pub payment_method: PaymentMethod,
    /// Free-form caller data stored alongside the transaction.
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateTransactionResult {
    pub transaction_id: TransactionId,
}

/// Validates the purchase and stores it as `pending`.
pub struct CreateTransactionHandler {
    repository: Arc<dyn TransactionRepository>,
}

impl CreateTransactionHandler {
    pub fn new(repository: Arc<dyn TransactionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(
        &self,
        cmd: CreateTransactionCommand,
    ) -> Result<CreateTransactionResult, PaymentError> {
        let user_id = UserId::new(cmd.user_id)?;
        let money = Money::new(cmd.amount, CurrencyCode::new(&cmd.currency)?)?;
        let content = ContentRef::new(
            ContentId::new(cmd.content_id)?,
            cmd.content_kind,
            cmd.content_title,
        )?;
        let transaction = cmd.metadata.into_iter().fold(
            NewTransaction::new(user_id, cmd.user_email, money, content, cmd.payment_method)?,
            |txn, (key, value)| txn.with_metadata(key, value),
        );

        let transaction_id = self.repository.create(&transaction).await?;

        Ok(CreateTransactionResult { transaction_id })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::payment::test_fixtures::Harness;
    use crate::domain::payment::TransactionStatus;

    fn command() -> CreateTransactionCommand {
        CreateTransactionCommand {
            user_id: "user-1".into(),
            user_email: "traveller@example.com".into(),
            amount: Decimal::new(49900, 2),
            currency: "inr".into(),
            content_id: "dest-petra".into(),
            content_kind: ContentKind::Destination,
            content_title: "Petra at Dawn".into(),
            payment_method: PaymentMethod::Paytm,
            metadata: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn creates_pending_transaction() {
        let harness = Harness::new();
        let handler = CreateTransactionHandler::new(harness.repository());

        let result = handler.handle(command()).await.unwrap();

        let txn = harness.transaction(&result.transaction_id).await;
        assert_eq!(txn.status, TransactionStatus::Pending);
        assert_eq!(txn.provider_payment_id, None);
        assert_eq!(txn.currency.as_str(), "INR");
        assert_eq!(txn.payment_method, PaymentMethod::Paytm);
    }

    #[tokio::test]
    async fn caller_metadata_is_stored_with_the_transaction() {
        let harness = Harness::new();
        let handler = CreateTransactionHandler::new(harness.repository());
        let mut metadata = BTreeMap::new();
        metadata.insert("campaign".to_string(), Value::from("diwali-2024"));
        metadata.insert("headsetModel".to_string(), Value::from("quest-3"));

        let result = handler
            .handle(CreateTransactionCommand {
                metadata,
                ..command()
            })
            .await
            .unwrap();

        let txn = harness.transaction(&result.transaction_id).await;
        assert_eq!(txn.metadata["campaign"], "diwali-2024");
        assert_eq!(txn.metadata["headsetModel"], "quest-3");
    }

    #[tokio::test]
    async fn rejects_amount_above_cap() {
        let harness = Harness::new();
        let handler = CreateTransactionHandler::new(harness.repository());

        let err = handler
            .handle(CreateTransactionCommand {
                amount: Decimal::MAX,
                ..command()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ValidationFailed { ref field, .. } if field == "amount"));
        assert_eq!(harness.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn rejects_non_positive_amount() {
        let harness = Harness::new();
        let handler = CreateTransactionHandler::new(harness.repository());

        let err = handler
            .handle(CreateTransactionCommand {
                amount: Decimal::ZERO,
                ..command()
            })
            .await
            .unwrap_err();

        assert!(matches!(err, PaymentError::ValidationFailed { ref field, .. } if field == "amount"));
        assert_eq!(harness.transaction_count().await, 0);
    }

    #[tokio::test]
    async fn rejects_bad_currency_email_and_title() {
        let harness = Harness::new();
        let handler = CreateTransactionHandler::new(harness.repository());

        for cmd in [
            CreateTransactionCommand { currency: "RUPEES".into(), ..command() },
            CreateTransactionCommand { user_email: "nobody".into(), ..command() },
            CreateTransactionCommand { content_title: " ".into(), ..command() },
            CreateTransactionCommand { user_id: "".into(), ..command() },
            CreateTransactionCommand { content_id: "".into(), ..command() },
        ] {
            let err = handler.handle(cmd).await.unwrap_err();
            assert!(matches!(err, PaymentError::ValidationFailed { .. }));
        }
        assert_eq!(harness.transaction_count().await, 0);
    }
}
