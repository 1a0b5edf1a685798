//! Razorpay popup checkout.
//!
//! Loads `checkout.js`, opens the overlay keyed by the merchant key id and
//! waits for it to close. The overlay's success callback is the provider's
//! confirmation, so a completed overlay yields a confirmed receipt.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::payment::{GatewayConfig, GatewayError, GatewayReceipt, PaymentMethod};
use crate::ports::{CheckoutHost, GatewayRequest, OverlayOptions, OverlayResult, PaymentGatewayAdapter};

pub const RAZORPAY_CHECKOUT_SCRIPT: &str = "https://checkout.razorpay.com/v1/checkout.js";

pub struct RazorpayGateway {
    host: Arc<dyn CheckoutHost>,
    merchant_name: String,
}

impl RazorpayGateway {
    pub fn new(host: Arc<dyn CheckoutHost>, merchant_name: impl Into<String>) -> Self {
        Self {
            host,
            merchant_name: merchant_name.into(),
        }
    }
}

#[async_trait]
impl PaymentGatewayAdapter for RazorpayGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Razorpay
    }

    async fn attempt(
        &self,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError> {
        let credentials = config.active_credentials(PaymentMethod::Razorpay)?;
        let key_id = credentials.require_public_key()?;
        let amount_minor = request
            .money
            .to_minor_units()
            .map_err(|e| GatewayError::unexpected(e.to_string()))?;

        self.host.load_script(RAZORPAY_CHECKOUT_SCRIPT).await?;

        let options = OverlayOptions {
            key: key_id.to_string(),
            amount_minor,
            currency: request.money.currency().as_str().to_string(),
            merchant_name: self.merchant_name.clone(),
            description: request.description.clone(),
            reference: request.transaction_id.to_string(),
            prefill_email: request.payer.email.clone(),
        };

        match self.host.open_overlay(&options).await? {
            OverlayResult::Completed { payment_id } => Ok(GatewayReceipt::confirmed(payment_id)),
            OverlayResult::Failed { reason } => {
                Err(GatewayError::declined(reason.unwrap_or_default()))
            }
            OverlayResult::Dismissed => Err(GatewayError::Cancelled),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateways::test_support::{config_with, request};
    use crate::adapters::gateways::RecordingCheckoutHost;
    use crate::domain::payment::{Confirmation, GatewayCredentials};

    fn gateway(host: &RecordingCheckoutHost) -> RazorpayGateway {
        RazorpayGateway::new(Arc::new(host.clone()), "VR Tours")
    }

    fn active() -> GatewayConfig {
        config_with(
            PaymentMethod::Razorpay,
            GatewayCredentials::new("rzp_test_abc", "secret", true),
        )
    }

    #[tokio::test]
    async fn completed_overlay_is_confirmed_receipt() {
        let host = RecordingCheckoutHost::new();
        host.set_overlay_result(OverlayResult::Completed {
            payment_id: "pay_29QQoUBi66xm2f".into(),
        });

        let receipt = gateway(&host).attempt(&request("499.00", "INR"), &active()).await.unwrap();

        assert_eq!(receipt.provider_payment_id.as_deref(), Some("pay_29QQoUBi66xm2f"));
        assert_eq!(receipt.confirmation, Confirmation::Confirmed);
        assert_eq!(host.loaded_scripts(), vec![RAZORPAY_CHECKOUT_SCRIPT.to_string()]);

        let overlay = &host.opened_overlays()[0];
        assert_eq!(overlay.key, "rzp_test_abc");
        assert_eq!(overlay.amount_minor, 49900);
        assert_eq!(overlay.currency, "INR");
        assert_eq!(overlay.merchant_name, "VR Tours");
        assert_eq!(overlay.prefill_email, "payer@example.com");
    }

    #[tokio::test]
    async fn failed_overlay_passes_reason_through() {
        let host = RecordingCheckoutHost::new();
        host.set_overlay_result(OverlayResult::Failed {
            reason: Some("Card declined by issuer".into()),
        });

        let err = gateway(&host).attempt(&request("499.00", "INR"), &active()).await.unwrap_err();
        assert_eq!(err.user_message(PaymentMethod::Razorpay), "Card declined by issuer");
    }

    #[tokio::test]
    async fn dismissed_overlay_is_cancelled() {
        let host = RecordingCheckoutHost::new();
        host.set_overlay_result(OverlayResult::Dismissed);

        let err = gateway(&host).attempt(&request("499.00", "INR"), &active()).await.unwrap_err();
        assert_eq!(err, GatewayError::Cancelled);
        assert_eq!(err.user_message(PaymentMethod::Razorpay), "Payment cancelled");
    }

    #[tokio::test]
    async fn inactive_config_has_no_side_effects() {
        let host = RecordingCheckoutHost::new();
        let config = config_with(
            PaymentMethod::Razorpay,
            GatewayCredentials::new("rzp_test_abc", "secret", false),
        );

        let err = gateway(&host).attempt(&request("499.00", "INR"), &config).await.unwrap_err();
        assert_eq!(err, GatewayError::NotConfigured);
        assert!(host.is_untouched());
    }

    #[tokio::test]
    async fn script_failure_is_transport_error() {
        let host = RecordingCheckoutHost::new();
        host.fail_script_loads("blocked by extension");

        let err = gateway(&host).attempt(&request("499.00", "INR"), &active()).await.unwrap_err();
        assert!(matches!(err, GatewayError::Transport(_)));
        assert!(host.opened_overlays().is_empty());
    }
}
