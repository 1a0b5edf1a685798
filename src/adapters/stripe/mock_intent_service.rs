//! Mock payment intent service for testing.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::ports::{CreateIntentRequest, IntentError, PaymentIntent, PaymentIntentService};

#[derive(Default)]
struct MockState {
    next_error: Option<IntentError>,
    requests: Vec<CreateIntentRequest>,
}

/// Creates `pi_mock_<n>` intents, or returns an injected error once.
#[derive(Clone, Default)]
pub struct MockPaymentIntentService {
    inner: Arc<Mutex<MockState>>,
}

impl MockPaymentIntentService {
    pub fn new() -> Self {
        Self::default()
    }

    /// The next call fails with `error`.
    pub fn fail_next(&self, error: IntentError) {
        self.inner.lock().unwrap().next_error = Some(error);
    }

    pub fn requests(&self) -> Vec<CreateIntentRequest> {
        self.inner.lock().unwrap().requests.clone()
    }
}

#[async_trait]
impl PaymentIntentService for MockPaymentIntentService {
    async fn create_intent(
        &self,
        request: &CreateIntentRequest,
    ) -> Result<PaymentIntent, IntentError> {
        let mut state = self.inner.lock().unwrap();
        state.requests.push(request.clone());
        if let Some(err) = state.next_error.take() {
            return Err(err);
        }

        let id = format!("pi_mock_{}", state.requests.len());
        Ok(PaymentIntent {
            client_secret: format!("{}_secret_test", id),
            id,
            status: "requires_payment_method".to_string(),
        })
    }
}
