//! ListTransactionsHandler - Query handler for transaction history.

use std::sync::Arc;

use crate::domain::foundation::UserId;
use crate::domain::payment::{PaymentError, Transaction};
use crate::ports::TransactionRepository;

/// Which transactions to list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListScope {
    /// One user's purchase history.
    User(UserId),
    /// Every transaction, for the admin view.
    All,
}

#[derive(Debug, Clone)]
pub struct ListTransactionsQuery {
    pub scope: ListScope,
}

/// Newest first.
pub type ListTransactionsResult = Vec<Transaction>;

pub struct ListTransactionsHandler {
    transactions: Arc<dyn TransactionRepository>,
}

impl ListTransactionsHandler {
    pub fn new(transactions: Arc<dyn TransactionRepository>) -> Self {
        Self { transactions }
    }

    pub async fn handle(
        &self,
        query: ListTransactionsQuery,
    ) -> Result<ListTransactionsResult, PaymentError> {
        match query.scope {
            ListScope::User(user_id) => self.transactions.list_by_user(&user_id).await,
            ListScope::All => self.transactions.list_all().await,
        }
    }
}
