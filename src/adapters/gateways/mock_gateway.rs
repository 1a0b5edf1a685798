//! Mock gateway adapter for testing.
//!
//! Returns a scripted result, counts attempts and can be told to panic, so
//! coordinator tests can exercise every branch without a checkout host.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use crate::domain::payment::{GatewayConfig, GatewayError, GatewayReceipt, PaymentMethod};
use crate::ports::{GatewayRequest, PaymentGatewayAdapter};

enum Behavior {
    Return(Result<GatewayReceipt, GatewayError>),
    Panic(String),
}

pub struct MockGatewayAdapter {
    method: PaymentMethod,
    behavior: Mutex<Behavior>,
    attempts: AtomicUsize,
    last_request: Mutex<Option<GatewayRequest>>,
}

impl MockGatewayAdapter {
    pub fn returning(method: PaymentMethod, result: Result<GatewayReceipt, GatewayError>) -> Self {
        Self {
            method,
            behavior: Mutex::new(Behavior::Return(result)),
            attempts: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Confirms every attempt with provider id `mock_<method>_payment`.
    pub fn succeeding(method: PaymentMethod) -> Self {
        Self::returning(
            method,
            Ok(GatewayReceipt::confirmed(format!("mock_{}_payment", method.as_str()))),
        )
    }

    pub fn failing(method: PaymentMethod, err: GatewayError) -> Self {
        Self::returning(method, Err(err))
    }

    pub fn panicking(method: PaymentMethod, message: impl Into<String>) -> Self {
        Self {
            method,
            behavior: Mutex::new(Behavior::Panic(message.into())),
            attempts: AtomicUsize::new(0),
            last_request: Mutex::new(None),
        }
    }

    pub fn set_result(&self, result: Result<GatewayReceipt, GatewayError>) {
        *self.behavior.lock().unwrap() = Behavior::Return(result);
    }

    pub fn attempts(&self) -> usize {
        self.attempts.load(Ordering::SeqCst)
    }

    pub fn last_request(&self) -> Option<GatewayRequest> {
        self.last_request.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentGatewayAdapter for MockGatewayAdapter {
    fn method(&self) -> PaymentMethod {
        self.method
    }

    async fn attempt(
        &self,
        request: &GatewayRequest,
        config: &GatewayConfig,
    ) -> Result<GatewayReceipt, GatewayError> {
        self.attempts.fetch_add(1, Ordering::SeqCst);
        *self.last_request.lock().unwrap() = Some(request.clone());

        config.active_credentials(self.method)?;

        let outcome = match &*self.behavior.lock().unwrap() {
            Behavior::Return(result) => Ok(result.clone()),
            Behavior::Panic(message) => Err(message.clone()),
        };
        match outcome {
            Ok(result) => result,
            Err(message) => panic!("{}", message),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::gateways::test_support::{config_with, request};
    use crate::domain::payment::GatewayCredentials;
    use futures::FutureExt;
    use std::panic::AssertUnwindSafe;

    #[tokio::test]
    async fn stays_usable_after_a_scripted_panic() {
        let mock = MockGatewayAdapter::panicking(PaymentMethod::Stripe, "checkout crashed");
        let config = config_with(
            PaymentMethod::Stripe,
            GatewayCredentials::new("pk_test_123", "sk_test_123", true),
        );
        let request = request("12.99", "USD");

        let crashed = AssertUnwindSafe(mock.attempt(&request, &config))
            .catch_unwind()
            .await;
        assert!(crashed.is_err());

        mock.set_result(Ok(GatewayReceipt::confirmed("pi_after_panic")));
        let receipt = mock.attempt(&request, &config).await.unwrap();

        assert_eq!(receipt.provider_payment_id.as_deref(), Some("pi_after_panic"));
        assert_eq!(mock.attempts(), 2);
        assert!(mock.last_request().is_some());
    }
}
