//! Client checkout configuration
//!
//! Merchant-facing settings the gateway adapters need besides the admin
//! credentials record, which is read from the store on every attempt.

use serde::Deserialize;

use crate::adapters::functions::HttpBackendFunctions;
use crate::adapters::gateways::{
    CashfreeSessionClient, CheckoutSettings, PaytmSettings, DEFAULT_CASHFREE_API_VERSION,
};

use super::error::ValidationError;
use super::payment::is_http_url;

#[derive(Debug, Clone, Deserialize)]
pub struct CheckoutConfig {
    /// Shown in the Razorpay overlay
    #[serde(default = "default_merchant_name")]
    pub merchant_name: String,

    #[serde(default = "default_paytm_website")]
    pub paytm_website: String,

    #[serde(default = "default_paytm_industry_type")]
    pub paytm_industry_type: String,

    #[serde(default)]
    pub paytm_callback_url: String,

    #[serde(default = "default_cashfree_api_version")]
    pub cashfree_api_version: String,

    pub cashfree_return_url: Option<String>,

    /// Where the backend functions are hosted
    pub functions_base_url: Option<String>,
}

impl CheckoutConfig {
    /// Settings for `GatewayRegistry::standard`.
    pub fn settings(&self) -> CheckoutSettings {
        CheckoutSettings {
            merchant_name: self.merchant_name.clone(),
            paytm: PaytmSettings {
                website: self.paytm_website.clone(),
                industry_type: self.paytm_industry_type.clone(),
                callback_url: self.paytm_callback_url.clone(),
            },
            cashfree_return_url: self.cashfree_return_url.clone(),
        }
    }

    /// Hosted-session client pinned to `cashfree_api_version`.
    pub fn cashfree_client(&self) -> CashfreeSessionClient {
        CashfreeSessionClient::new(&self.cashfree_api_version)
    }

    /// Client for the backend functions host, if one is configured.
    pub fn backend_functions(&self) -> Option<HttpBackendFunctions> {
        self.functions_base_url
            .as_deref()
            .map(HttpBackendFunctions::new)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.merchant_name.trim().is_empty() {
            return Err(ValidationError::MissingRequired("CHECKOUT__MERCHANT_NAME"));
        }
        if !self.paytm_callback_url.is_empty() && !is_http_url(&self.paytm_callback_url) {
            return Err(ValidationError::InvalidUrl("CHECKOUT__PAYTM_CALLBACK_URL"));
        }
        let optional_urls = [
            (&self.cashfree_return_url, "CHECKOUT__CASHFREE_RETURN_URL"),
            (&self.functions_base_url, "CHECKOUT__FUNCTIONS_BASE_URL"),
        ];
        for (value, name) in optional_urls {
            if let Some(url) = value {
                if !is_http_url(url) {
                    return Err(ValidationError::InvalidUrl(name));
                }
            }
        }
        Ok(())
    }
}

impl Default for CheckoutConfig {
    fn default() -> Self {
        Self {
            merchant_name: default_merchant_name(),
            paytm_website: default_paytm_website(),
            paytm_industry_type: default_paytm_industry_type(),
            paytm_callback_url: String::new(),
            cashfree_api_version: default_cashfree_api_version(),
            cashfree_return_url: None,
            functions_base_url: None,
        }
    }
}

fn default_merchant_name() -> String {
    "VR Tours".to_string()
}

fn default_paytm_website() -> String {
    PaytmSettings::default().website
}

fn default_paytm_industry_type() -> String {
    PaytmSettings::default().industry_type
}

fn default_cashfree_api_version() -> String {
    DEFAULT_CASHFREE_API_VERSION.to_string()
}
