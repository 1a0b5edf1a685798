//! Paytm signed redirect.
//!
//! Builds the canonical order parameters, signs them with the merchant key
//! and POSTs them with `CHECKSUMHASH` to the payment page. Staging is chosen
//! when the merchant id looks like a test id.

use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::payment::signature::{self, SignaturePayload};
use crate::domain::payment::{GatewayConfig, GatewayError, GatewayReceipt, PaymentMethod};
use crate::ports::{CheckoutHost, GatewayRequest, HtmlForm, PaymentGatewayAdapter};

pub const PAYTM_STAGING_URL: &str = "https://securegw-stage.paytm.in/order/process";
pub const PAYTM_PRODUCTION_URL: &str = "https://securegw.paytm.in/order/process";

const CHANNEL_ID: &str = "WEB";

/// Merchant-level order parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaytmSettings {
    pub website: String,
    pub industry_type: String,
    pub callback_url: String,
}

impl Default for PaytmSettings {
    fn default() -> Self {
        Self {
            website: "WEBSTAGING".to_string(),
            industry_type: "Retail".to_string(),
            callback_url: String::new(),
        }
    }
}

/// Payment page for a merchant id.
pub fn paytm_endpoint(merchant_id: &str) -> &'static str {
    if merchant_id.to_ascii_lowercase().contains("test") {
        PAYTM_STAGING_URL
    } else {
        PAYTM_PRODUCTION_URL
    }
}

pub struct PaytmGateway {
    host: Arc<dyn CheckoutHost>,
    settings: PaytmSettings,
}

impl PaytmGateway {
    pub fn new(host: Arc<dyn CheckoutHost>, settings: PaytmSettings) -> Self {
        Self { host, settings }
    }

    /// The parameters that are both signed and posted.
    pub fn order_params(&self, merchant_id: &str, request: &GatewayRequest) -> SignaturePayload {
        [
            ("MID", merchant_id.to_string()),
            ("ORDER_ID", request.transaction_id.to_string()),
            ("CUST_ID", request.payer.user_id.to_string()),
            ("TXN_AMOUNT", request.money.to_major_string()),
            ("CHANNEL_ID", CHANNEL_ID.to_string()),
            ("WEBSITE", self.settings.website.clone()),
            ("INDUSTRY_TYPE_ID", self.settings.industry_type.clone()),
            ("CALLBACK_URL", self.settings.callback_url.clone()),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v))
        .collect()
    }
}

#[async_trait]
impl PaymentGatewayAdapter for PaytmGateway {
    fn method(&self) -> PaymentMethod {
        PaymentMethod::Paytm
    }

    async fn attempt(
        &self,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError> {
        let credentials = config.active_credentials(PaymentMethod::Paytm)?;
        let merchant_id = credentials.require_public_key()?;
        let merchant_key = credentials.require_secret_key()?;

        let params = self.order_params(merchant_id, request);
        let checksum = signature::sign(&params, merchant_key).map_err(|e| {
            tracing::error!(
                transaction_id = %request.transaction_id,
                error = %e,
                "Paytm checksum generation failed"
            );
            GatewayError::Signing(e)
        })?;

        let form = params
            .into_iter()
            .fold(HtmlForm::post(paytm_endpoint(merchant_id)), |form, (k, v)| {
                form.field(k, v)
            })
            .field("CHECKSUMHASH", checksum);

        self.host.submit_form(&form).await?;

        tracing::info!(
            transaction_id = %request.transaction_id,
            gateway = "paytm",
            "Redirected to payment page"
        );
        Ok(GatewayReceipt::optimistic(None))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateways::test_support::{config_with, request};
    use crate::adapters::gateways::RecordingCheckoutHost;
    use crate::domain::payment::{Confirmation, GatewayCredentials, SignatureError};

    fn gateway(host: &RecordingCheckoutHost) -> PaytmGateway {
        PaytmGateway::new(Arc::new(host.clone()), PaytmSettings::default())
    }

    #[test]
    fn merchant_id_heuristic_picks_endpoint() {
        assert_eq!(paytm_endpoint("VRTOUR_Test_123"), PAYTM_STAGING_URL);
        assert_eq!(paytm_endpoint("VRTOUR12345678901234"), PAYTM_PRODUCTION_URL);
    }

    #[tokio::test]
    async fn posts_signed_form_with_all_params() {
        let host = RecordingCheckoutHost::new();
        let config = config_with(
            PaymentMethod::Paytm,
            GatewayCredentials::new("VRTOURtest0001", "kbzk1DSbJiV_O3p5", true),
        );
        let req = request("499.00", "INR");

        let receipt = gateway(&host).attempt(&req, &config).await.unwrap();
        assert_eq!(receipt.confirmation, Confirmation::Optimistic);

        let form = &host.submitted_forms()[0];
        assert_eq!(form.action, PAYTM_STAGING_URL);
        assert_eq!(form.value_of("MID"), Some("VRTOURtest0001"));
        assert_eq!(form.value_of("TXN_AMOUNT"), Some("499.00"));
        assert_eq!(form.value_of("CHANNEL_ID"), Some("WEB"));
        assert_eq!(form.value_of("ORDER_ID"), Some(req.transaction_id.to_string().as_str()));

        let checksum = form.value_of("CHECKSUMHASH").unwrap();
        let params = gateway(&host).order_params("VRTOURtest0001", &req);
        assert!(signature::verify(&params, "kbzk1DSbJiV_O3p5", checksum));
    }

    #[tokio::test]
    async fn inactive_paytm_is_not_configured_without_side_effects() {
        let host = RecordingCheckoutHost::new();
        let config = config_with(
            PaymentMethod::Paytm,
            GatewayCredentials::new("VRTOURtest0001", "key", false),
        );

        let err = gateway(&host).attempt(&request("499.00", "INR"), &config).await.unwrap_err();
        assert_eq!(err.user_message(PaymentMethod::Paytm), "Paytm is not configured or enabled");
        assert!(host.is_untouched());
    }

    #[tokio::test]
    async fn blank_merchant_key_is_missing_credential() {
        let host = RecordingCheckoutHost::new();
        let config = config_with(
            PaymentMethod::Paytm,
            GatewayCredentials::new("VRTOURtest0001", "  ", true),
        );

        let err = gateway(&host).attempt(&request("499.00", "INR"), &config).await.unwrap_err();
        assert_eq!(err, GatewayError::MissingCredential { key: "secretKey" });
        assert!(host.is_untouched());
    }

    #[test]
    fn signing_errors_show_generic_message() {
        let err = GatewayError::Signing(SignatureError::EmptySecret);
        assert_eq!(
            err.user_message(PaymentMethod::Paytm),
            "Payment failed. Please try again."
        );
    }
}
