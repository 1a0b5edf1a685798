//! Cashfree hosted checkout.
//!
//! Creates a payment session server-side, then POSTs the session id to the
//! hosted checkout page. Sandbox is chosen when the secret key carries the
//! test prefix. The provider confirms out of band, so a submitted form is an
//! optimistic success.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::payment::{GatewayConfig, GatewayError, GatewayReceipt, PaymentMethod};
use crate::ports::{
    CheckoutHost, GatewayRequest, HostedSessionApi, HostedSessionRequest, HtmlForm,
    PaymentGatewayAdapter, ProviderEnvironment,
};

use super::cashfree_api::cashfree_base_url;

const SANDBOX_SECRET_PREFIX: &str = "cfsk_ma_test";

/// Picks the environment from the secret key.
pub fn cashfree_environment(secret_key: &str) -> ProviderEnvironment {
    if secret_key.starts_with(SANDBOX_SECRET_PREFIX) {
        ProviderEnvironment::Sandbox
    } else {
        ProviderEnvironment::Production
    }
}

pub struct CashfreeGateway {
    host: Arc<dyn CheckoutHost>,
    sessions: Arc<dyn HostedSessionApi>,
    return_url: Option<String>,
}

impl CashfreeGateway {
    pub fn new(
        host: Arc<dyn CheckoutHost>,
        sessions: Arc<dyn HostedSessionApi>,
        return_url: Option<String>,
    ) -> Self {
        Self {
            host,
            sessions,
            return_url,
        }
    }
}

#[async_trait]
impl PaymentGatewayAdapter for CashfreeGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Cashfree
    }

    async fn attempt(
        &self,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError> {
        let credentials = config.active_credentials(PaymentMethod::Cashfree)?;
        let app_id = credentials.require_public_key()?;
        let secret_key = credentials.require_secret_key()?;
        let environment = cashfree_environment(secret_key);

        let session = self
            .sessions
            .create_session(
                app_id,
                secret_key,
                &HostedSessionRequest {
                    environment,
                    order_id: request.transaction_id.to_string(),
                    money: request.money.clone(),
                    customer_id: request.payer.user_id.to_string(),
                    customer_email: request.payer.email.clone(),
                    return_url: self.return_url.clone(),
                },
            )
            .await?;

        let form = HtmlForm::post(format!(
            "{}/view/sessions/checkout",
            cashfree_base_url(environment)
        ))
        .field("payment_session_id", session.payment_session_id);

        self.host.submit_form(&form).await?;

        tracing::info!(
            transaction_id = %request.transaction_id,
            gateway = "cashfree",
            "Redirected to hosted checkout"
        );
        Ok(GatewayReceipt::optimistic(Some(session.order_id)))
    }
}
