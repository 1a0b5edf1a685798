//! Payment gateway port.
//!
//! One implementation per provider. Each translates a generic request into
//! the provider's client integration and reports a single result per attempt.
//!
//! # Contract
//!
//! - Check the provider's config block first: absent or inactive returns
//!   `GatewayError::NotConfigured` before any script, network or form action
//! - Never touch the transaction record; the coordinator owns status writes
//! - Safe to call again for the same transaction after a failure

use async_trait::async_trait;

use crate::domain::foundation::{TransactionId, UserId};
use crate::domain::payment::{GatewayConfig, GatewayError, GatewayReceipt, Money, PaymentMethod};

/// Who is paying.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payer {
    pub user_id: UserId,
    pub email: String,
}

/// Provider-neutral description of one payment attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayRequest {
    /// Our transaction id, used as the provider's order reference.
    pub transaction_id: TransactionId,
    pub money: Money,
    pub payer: Payer,
    /// Shown on the provider's checkout page.
    pub description: String,
}

#[async_trait]
pub trait PaymentGatewayAdapter: Send + Sync {
    /// The gateway this adapter drives.
    fn method(&self) -> PaymentMethod;

    /// Runs one payment attempt with freshly loaded settings.
    async fn attempt(
        &self,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError>;
}
