//! Recording checkout host for testing.
//!
//! Stands in for the browser bridge. Every call is logged so tests can
//! assert exactly which side effects a gateway attempt produced, and the
//! provider outcomes (overlay result, intent confirmation, failures) are
//! scripted up front.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{
    CheckoutHost, HostError, HtmlForm, IntentConfirmation, OverlayOptions, OverlayResult,
};

/// One recorded host interaction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostCall {
    LoadScript(String),
    OpenOverlay(OverlayOptions),
    SubmitForm(HtmlForm),
    ConfirmCardPayment {
        publishable_key: String,
        client_secret: String,
    },
}

struct HostState {
    calls: Vec<HostCall>,
    loaded_scripts: HashSet<String>,
    overlay_result: OverlayResult,
    confirmation: IntentConfirmation,
    script_failure: Option<String>,
    form_failure: Option<String>,
}

impl Default for HostState {
    fn default() -> Self {
        Self {
            calls: Vec::new(),
            loaded_scripts: HashSet::new(),
            overlay_result: OverlayResult::Completed {
                payment_id: "pay_mock_001".to_string(),
            },
            confirmation: IntentConfirmation::Succeeded {
                payment_intent_id: "pi_mock_001".to_string(),
            },
            script_failure: None,
            form_failure: None,
        }
    }
}

/// Checkout host double with scripted outcomes and a call log.
#[derive(Clone, Default)]
pub struct RecordingCheckoutHost {
    inner: Arc<Mutex<HostState>>,
}

impl RecordingCheckoutHost {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Scripting
    // ════════════════════════════════════════════════════════════════════════════

    /// Sets how the next overlays close.
    pub fn set_overlay_result(&self, result: OverlayResult) {
        self.inner.lock().unwrap().overlay_result = result;
    }

    /// Sets the result of intent confirmation.
    pub fn set_confirmation(&self, confirmation: IntentConfirmation) {
        self.inner.lock().unwrap().confirmation = confirmation;
    }

    /// Makes every script load fail with `reason`.
    pub fn fail_script_loads(&self, reason: impl Into<String>) {
        self.inner.lock().unwrap().script_failure = Some(reason.into());
    }

    /// Makes every form submission fail with `reason`.
    pub fn fail_form_submission(&self, reason: impl Into<String>) {
        self.inner.lock().unwrap().form_failure = Some(reason.into());
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Assertions
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<HostCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// True if no script, overlay, form or confirmation was attempted.
    pub fn is_untouched(&self) -> bool {
        self.inner.lock().unwrap().calls.is_empty()
    }

    pub fn loaded_scripts(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::LoadScript(url) => Some(url),
                _ => None,
            })
            .collect()
    }

    pub fn submitted_forms(&self) -> Vec<HtmlForm> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::SubmitForm(form) => Some(form),
                _ => None,
            })
            .collect()
    }

    pub fn opened_overlays(&self) -> Vec<OverlayOptions> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                HostCall::OpenOverlay(options) => Some(options),
                _ => None,
            })
            .collect()
    }
}

#[async_trait]
impl CheckoutHost for RecordingCheckoutHost {
    async fn load_script(&self, url: &str) -> Result<(), HostError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(HostCall::LoadScript(url.to_string()));
        if let Some(reason) = &state.script_failure {
            return Err(HostError::ScriptLoad {
                url: url.to_string(),
                reason: reason.clone(),
            });
        }
        state.loaded_scripts.insert(url.to_string());
        Ok(())
    }

    async fn open_overlay(&self, options: &OverlayOptions) -> Result<OverlayResult, HostError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(HostCall::OpenOverlay(options.clone()));
        Ok(state.overlay_result.clone())
    }

    async fn submit_form(&self, form: &HtmlForm) -> Result<(), HostError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(HostCall::SubmitForm(form.clone()));
        match &state.form_failure {
            Some(reason) => Err(HostError::Submission(reason.clone())),
            None => Ok(()),
        }
    }

    async fn confirm_card_payment(
        &self,
        publishable_key: &str,
        client_secret: &str,
    ) -> Result<IntentConfirmation, HostError> {
        let mut state = self.inner.lock().unwrap();
        state.calls.push(HostCall::ConfirmCardPayment {
            publishable_key: publishable_key.to_string(),
            client_secret: client_secret.to_string(),
        });
        Ok(state.confirmation.clone())
    }
}
