//! Hosted payment session port (Cashfree order API).
//!
//! Creating a session needs the merchant secret, so it is a server-to-server
//! call; the resulting session id is what the redirect form carries.

use async_trait::async_trait;

use crate::domain::payment::{GatewayError, Money};

/// Which provider environment to talk to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderEnvironment {
    Sandbox,
    Production,
}

/// Order details for a hosted session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSessionRequest {
    pub environment: ProviderEnvironment,
    pub order_id: String,
    pub money: Money,
    pub customer_id: String,
    pub customer_email: String,
    pub return_url: Option<String>,
}

/// A created session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HostedSession {
    pub payment_session_id: String,
    /// Provider-side order reference.
    pub order_id: String,
}

#[async_trait]
pub trait HostedSessionApi: Send + Sync {
    /// Creates an order and returns its payment session.
    ///
    /// # Errors
    ///
    /// - `ProviderDeclined` when the provider rejects the order
    /// - `Transport` on network failure
    async fn create_session(
        &self,
        app_id: &str,
        secret_key: &str,
        request: &HostedSessionRequest,
    ) -> Result<HostedSession, GatewayError>;
}
