//! Cashfree order API client.
//!
//! Creates an order and returns its `payment_session_id`. Requests carry the
//! app id and secret in headers, so this must only run where the secret may
//! live.

use async_trait::async_trait;
use rust_decimal::prelude::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::domain::payment::GatewayError;
use crate::ports::{HostedSession, HostedSessionApi, HostedSessionRequest, ProviderEnvironment};

pub const CASHFREE_SANDBOX_BASE: &str = "https://sandbox.cashfree.com/pg";
pub const CASHFREE_PRODUCTION_BASE: &str = "https://api.cashfree.com/pg";
pub const DEFAULT_CASHFREE_API_VERSION: &str = "2023-08-01";

/// API base for an environment.
pub fn cashfree_base_url(environment: ProviderEnvironment) -> &'static str {
    match environment {
        ProviderEnvironment::Sandbox => CASHFREE_SANDBOX_BASE,
        ProviderEnvironment::Production => CASHFREE_PRODUCTION_BASE,
    }
}

#[derive(Debug, Serialize)]
struct CreateOrderBody<'a> {
    order_id: &'a str,
    order_amount: f64,
    order_currency: &'a str,
    customer_details: CustomerDetails<'a>,
    #[serde(skip_serializing_if = "Option::is_none")]
    order_meta: Option<OrderMeta<'a>>,
}

#[derive(Debug, Serialize)]
struct CustomerDetails<'a> {
    customer_id: &'a str,
    customer_email: &'a str,
}

#[derive(Debug, Serialize)]
struct OrderMeta<'a> {
    return_url: &'a str,
}

#[derive(Debug, Deserialize)]
struct CreateOrderResponse {
    payment_session_id: String,
    order_id: String,
}

#[derive(Debug, Deserialize)]
struct CashfreeErrorBody {
    message: Option<String>,
}

/// reqwest client for the order endpoint.
pub struct CashfreeSessionClient {
    http_client: reqwest::Client,
    api_version: String,
    base_url_override: Option<String>,
}

impl CashfreeSessionClient {
    pub fn new(api_version: impl Into<String>) -> Self {
        Self {
            http_client: reqwest::Client::new(),
            api_version: api_version.into(),
            base_url_override: None,
        }
    }

    pub fn api_version(&self) -> &str {
        &self.api_version
    }

    /// Send every request to `url` regardless of environment (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url_override = Some(url.into());
        self
    }

    fn orders_url(&self, environment: ProviderEnvironment) -> String {
        let base = self
            .base_url_override
            .as_deref()
            .unwrap_or_else(|| cashfree_base_url(environment));
        format!("{}/orders", base.trim_end_matches('/'))
    }
}

impl Default for CashfreeSessionClient {
    fn default() -> Self {
        Self::new(DEFAULT_CASHFREE_API_VERSION)
    }
}

#[async_trait]
impl HostedSessionApi for CashfreeSessionClient {
    async fn create_session(
        &self,
        app_id: &str,
        secret_key: &str,
        request: &HostedSessionRequest,
    ) -> Result<HostedSession, GatewayError> {
        let order_amount = request.money.amount().to_f64().ok_or_else(|| {
            GatewayError::unexpected(format!("amount {} is not representable", request.money))
        })?;

        let body = CreateOrderBody {
            order_id: &request.order_id,
            order_amount,
            order_currency: request.money.currency().as_str(),
            customer_details: CustomerDetails {
                customer_id: &request.customer_id,
                customer_email: &request.customer_email,
            },
            order_meta: request
                .return_url
                .as_deref()
                .map(|return_url| OrderMeta { return_url }),
        };

        let response = self
            .http_client
            .post(self.orders_url(request.environment))
            .header("x-client-id", app_id)
            .header("x-client-secret", secret_key)
            .header("x-api-version", &self.api_version)
            .json(&body)
            .send()
            .await
            .map_err(|e| GatewayError::transport(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            tracing::warn!(
                status = %status,
                order_id = %request.order_id,
                "Cashfree order creation failed"
            );
            let reason = serde_json::from_str::<CashfreeErrorBody>(&error_text)
                .ok()
                .and_then(|body| body.message)
                .unwrap_or_default();
            return Err(GatewayError::declined(reason));
        }

        let order: CreateOrderResponse = response
            .json()
            .await
            .map_err(|e| GatewayError::unexpected(format!("invalid Cashfree response: {}", e)))?;

        Ok(HostedSession {
            payment_session_id: order.payment_session_id,
            order_id: order.order_id,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn environment_selects_base_url() {
        let client = CashfreeSessionClient::default();
        assert_eq!(
            client.orders_url(ProviderEnvironment::Sandbox),
            "https://sandbox.cashfree.com/pg/orders"
        );
        assert_eq!(
            client.orders_url(ProviderEnvironment::Production),
            "https://api.cashfree.com/pg/orders"
        );
    }

    #[test]
    fn base_url_override_wins() {
        let client = CashfreeSessionClient::default().with_base_url("http://localhost:9000/");
        assert_eq!(
            client.orders_url(ProviderEnvironment::Production),
            "http://localhost:9000/orders"
        );
    }

    #[test]
    fn order_body_uses_provider_field_names() {
        let body = CreateOrderBody {
            order_id: "txn-1",
            order_amount: 499.0,
            order_currency: "INR",
            customer_details: CustomerDetails {
                customer_id: "user-1",
                customer_email: "a@b.io",
            },
            order_meta: None,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["order_amount"], 499.0);
        assert_eq!(json["customer_details"]["customer_email"], "a@b.io");
        assert!(json.get("order_meta").is_none());
    }
}
