//! Checkout host port.
//!
//! Gateways integrate on the client: inject a script, open a hosted overlay,
//! POST a redirect form, confirm an intent with the provider's library. The
//! host is whatever can do those things (browser bridge, embedded webview,
//! test double). Each operation resolves once with the outcome that the
//! provider's callbacks would have delivered.

use async_trait::async_trait;
use thiserror::Error;

/// Options for a popup checkout overlay.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OverlayOptions {
    /// Merchant public key the overlay is keyed by.
    pub key: String,
    /// Amount in the currency's minor unit.
    pub amount_minor: i64,
    pub currency: String,
    /// Merchant name shown in the overlay header.
    pub merchant_name: String,
    pub description: String,
    /// Our transaction id, echoed back in provider notes.
    pub reference: String,
    pub prefill_email: String,
}

/// How an overlay closed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OverlayResult {
    /// Success callback fired with the provider's payment id.
    Completed { payment_id: String },
    /// Failure callback fired.
    Failed { reason: Option<String> },
    /// The payer closed the overlay.
    Dismissed,
}

/// A form the host submits as a top-level POST navigation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HtmlForm {
    pub action: String,
    pub fields: Vec<(String, String)>,
}

impl HtmlForm {
    pub fn post(action: impl Into<String>) -> Self {
        Self {
            action: action.into(),
            fields: Vec::new(),
        }
    }

    pub fn field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push((name.into(), value.into()));
        self
    }

    pub fn value_of(&self, name: &str) -> Option<&str> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value.as_str())
    }

    /// Self-submitting HTML document for hosts that render markup.
    pub fn to_auto_submit_html(&self) -> String {
        let inputs: String = self
            .fields
            .iter()
            .map(|(name, value)| {
                format!(
                    r#"<input type="hidden" name="{}" value="{}">"#,
                    escape_html(name),
                    escape_html(value)
                )
            })
            .collect();
        format!(
            r#"<!DOCTYPE html><html><body><form id="checkout" method="POST" action="{}">{}</form><script>document.getElementById("checkout").submit();</script></body></html>"#,
            escape_html(&self.action),
            inputs
        )
    }
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

/// Result of confirming a payment intent client-side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IntentConfirmation {
    Succeeded { payment_intent_id: String },
    Failed { message: Option<String> },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("failed to load script {url}: {reason}")]
    ScriptLoad { url: String, reason: String },

    #[error("form submission failed: {0}")]
    Submission(String),

    #[error("checkout host unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CheckoutHost: Send + Sync {
    /// Injects a provider script. Loading an already loaded URL is a no-op.
    async fn load_script(&self, url: &str) -> Result<(), HostError>;

    /// Opens a popup checkout overlay and waits for it to close.
    async fn open_overlay(&self, options: &OverlayOptions) -> Result<OverlayResult, HostError>;

    /// Submits a POST form, navigating to the provider.
    async fn submit_form(&self, form: &HtmlForm) -> Result<(), HostError>;

    /// Confirms a card payment for an intent with the provider's library.
    async fn confirm_card_payment(
        &self,
        publishable_key: &str,
        client_secret: &str,
    ) -> Result<IntentConfirmation, HostError>;
}
