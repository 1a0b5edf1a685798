//! GetTransactionHandler - Query handler for a single transaction.

use std::sync::Arc;

use crate::domain::foundation::{TransactionId, UserId};
use crate::domain::payment::{PaymentError, Transaction};
use crate::ports::TransactionRepository;

/// Who is asking. Users only see their own records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Requester {
    User(UserId),
    Admin,
}

impl Requester {
    pub fn may_read(&self, transaction: &Transaction) -> bool {
        match self {
            Requester::Admin => true,
            Requester::User(user_id) => transaction.is_owned_by(user_id),
        }
    }
}

#[derive(Debug, Clone)]
pub struct GetTransactionQuery {
    pub transaction_id: TransactionId,
    pub requester: Requester,
}

pub type GetTransactionResult = Transaction;

pub struct GetTransactionHandler {
    transactions: Arc<dyn TransactionRepository>,
}

impl GetTransactionHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: GetTransactionQuery,
    ) -> Result<GetTransactionResult, PaymentError> {
        let transaction = self
            .transactions
            .get(&query.transaction_id)
            .await?
            .ok_or_else(|| PaymentError::not_found(query.transaction_id))?;

        if !query.requester.may_read(&transaction) {
            return Err(PaymentError::forbidden(
                "Transaction belongs to another user",
            ));
        }

        Ok(transaction)
    }
}
