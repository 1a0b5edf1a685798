//! RefundTransactionHandler - Command handler for marking a payment refunded.

use std::sync::Arc;

use crate::domain::foundation::TransactionId;
use crate::domain::payment::{PaymentError, StatusUpdate, TransactionStatus};
use crate::ports::TransactionRepository;

#[derive(Debug, Clone)]
pub struct RefundTransactionCommand {
    pub transaction_id: TransactionId,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefundTransactionResult {
    pub transaction_id: TransactionId,
    pub previous_status: TransactionStatus,
}

/// Moves a completed transaction to `refunded`.
///
/// Records only. Money movement happens in the provider's dashboard and the
/// user keeps whatever the purchase unlocked.
pub struct RefundTransactionHandler {
    transactions: Arc<dyn TransactionRepository>,
}

impl RefundTransactionHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        cmd: RefundTransactionCommand,
    ) -> Result<RefundTransactionResult, PaymentError> {
        let transaction = self
            .transactions
            .get(&cmd.transaction_id)
            .await?
            .ok_or_else(|| PaymentError::not_found(cmd.transaction_id))?;

        if transaction.status != TransactionStatus::Completed {
            return Err(PaymentError::invalid_state(
                transaction.status.as_str(),
                "refund",
            ));
        }

        self.transactions
            .update_status(&cmd.transaction_id, &StatusUpdate::refunded())
            .await?;

        tracing::info!(
            transaction_id = %cmd.transaction_id,
            user_id = %transaction.user_id,
            amount = %transaction.amount,
            currency = transaction.currency.as_str(),
            "Transaction refunded"
        );

        Ok(RefundTransactionResult {
            transaction_id: cmd.transaction_id,
            previous_status: transaction.status,
        })
    }
}
