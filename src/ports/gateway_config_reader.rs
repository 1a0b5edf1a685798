//! Gateway settings reader port.

use async_trait::async_trait;

use crate::domain::payment::{GatewayConfig, PaymentError};

/// Loads the admin-managed gateway settings record.
///
/// Callers read it once per payment attempt and pass it down explicitly;
/// implementations must not cache across calls.
#[async_trait]
pub trait GatewayConfigReader: Send + Sync {
    /// Returns `None` when no settings record exists yet.
    async fn load(&self) -> Result<Option<GatewayConfig>, PaymentError>;
}
