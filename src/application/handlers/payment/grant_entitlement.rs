//! GrantEntitlementHandler - Command handler for unlocking purchased content.

use std::sync::Arc;

use crate::domain::foundation::{ContentId, TransactionId, UserId};
use crate::domain::payment::{PaymentError, TransactionStatus};
use crate::ports::{EntitlementStore, TransactionRepository};

#[derive(Debug, Clone)]
pub struct GrantEntitlementCommand {
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GrantEntitlementResult {
    pub user_id: UserId,
    pub content_id: ContentId,
    pub upgraded_to_premium: bool,
}

/// Adds the purchased content to the payer's entitlement.
///
/// Only a `completed` transaction grants. The purchased set is a set union,
/// so granting the same transaction twice is harmless.
pub struct GrantEntitlementHandler {
    transactions: Arc<dyn TransactionRepository>,
    entitlements: Arc<dyn EntitlementStore>,
}

impl GrantEntitlementHandler {
    pub fn new(
        transactions: Arc<dyn TransactionRepository>,
        entitlements: Arc<dyn EntitlementStore>,
    ) -> Self {
        Self {
            transactions,
            entitlements,
        }
    }

    pub async fn handle(
        &self,
        cmd: GrantEntitlementCommand,
    ) -> Result<GrantEntitlementResult, PaymentError> {
        let transaction = self
            .transactions
            .get(&cmd.transaction_id)
            .await?
            .ok_or_else(|| PaymentError::not_found(cmd.transaction_id))?;

        if transaction.status != TransactionStatus::Completed {
            return Err(PaymentError::invalid_state(
                transaction.status.as_str(),
                "grant entitlement for",
            ));
        }

        let content = transaction.content;
        self.entitlements
            .add_purchased_content(&transaction.user_id, &content.content_id)
            .await?;

        let upgraded_to_premium = content.content_kind.upgrades_tier();
        if upgraded_to_premium {
            self.entitlements
                .upgrade_to_premium(&transaction.user_id)
                .await?;
        }

        tracing::info!(
            transaction_id = %cmd.transaction_id,
            user_id = %transaction.user_id,
            content_id = %content.content_id,
            upgraded_to_premium,
            "Entitlement granted"
        );

        Ok(GrantEntitlementResult {
            user_id: transaction.user_id,
            content_id: content.content_id,
            upgraded_to_premium,
        })
    }
}
