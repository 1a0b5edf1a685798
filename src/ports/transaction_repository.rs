//! Transaction repository port.
//!
//! Persists purchase attempts and guards their status transitions.
//!
//! # Contract
//!
//! - `create` always stores `pending` with no provider payment id
//! - `update_status` rejects transitions the status machine forbids
//! - lists are newest-first by creation time

use async_trait::async_trait;

use crate::domain::foundation::{TransactionId, UserId};
use crate::domain::payment::{NewTransaction, PaymentError, StatusUpdate, Transaction};

#[async_trait]
pub trait TransactionRepository: Send + Sync {
    /// Stores a new pending transaction and returns its id.
    async fn create(&self, transaction: &NewTransaction) -> Result<TransactionId, PaymentError>;

    /// Writes a status change with its audit fields.
    ///
    /// # Errors
    ///
    /// - `NotFound` if the transaction doesn't exist
    /// - `InvalidState` if the current status cannot move to `update.status`
    /// - `Infrastructure` on store failure
    async fn update_status(
        &self,
        id: &TransactionId,
        update: &StatusUpdate,
    ) -> Result<(), PaymentError>;

    /// Returns `None` if not found.
    async fn get(&self, id: &TransactionId) -> Result<Option<Transaction>, PaymentError>;

    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Transaction>, PaymentError>;

    /// Admin listing of every transaction.
    async fn list_all(&self) -> Result<Vec<Transaction>, PaymentError>;
}
