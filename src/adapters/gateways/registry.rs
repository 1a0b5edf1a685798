//! Gateway registry.
//!
//! One adapter per `PaymentMethod`. The standard registry wires all four
//! providers against a shared checkout host.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::payment::PaymentMethod;
use crate::ports::{BackendFunctions, CheckoutHost, HostedSessionApi, PaymentGatewayAdapter};

use super::{CashfreeGateway, PaytmGateway, PaytmSettings, RazorpayGateway, StripeGateway};

/// Merchant settings shared by the standard adapters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CheckoutSettings {
    /// Shown in the Razorpay overlay header.
    pub merchant_name: String,
    pub paytm: PaytmSettings,
    /// Where Cashfree sends the payer after checkout.
    pub cashfree_return_url: Option<String>,
}

#[derive(Default, Clone)]
pub struct GatewayRegistry {
    adapters: HashMap<PaymentMethod, Arc<dyn PaymentGatewayAdapter>>,
}

impl GatewayRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the Razorpay, Cashfree, Paytm and Stripe adapters.
    pub fn standard(
        host: Arc<dyn CheckoutHost>,
        sessions: Arc<dyn HostedSessionApi>,
        functions: Arc<dyn BackendFunctions>,
        settings: CheckoutSettings,
    ) -> Self {
        Self::new()
            .with(Arc::new(RazorpayGateway::new(
                host.clone(),
                settings.merchant_name,
            )))
            .with(Arc::new(CashfreeGateway::new(
                host.clone(),
                sessions,
                settings.cashfree_return_url,
            )))
            .with(Arc::new(PaytmGateway::new(host.clone(), settings.paytm)))
            .with(Arc::new(StripeGateway::new(host, functions)))
    }

    /// Registers `adapter` under its own method, replacing any previous one.
    pub fn with(mut self, adapter: Arc<dyn PaymentGatewayAdapter>) -> Self {
        self.adapters.insert(adapter.method(), adapter);
        self
    }

    pub fn get(&self, method: PaymentMethod) -> Option<Arc<dyn PaymentGatewayAdapter>> {
        self.adapters.get(&method).cloned()
    }

    /// Methods that have an adapter.
    pub fn methods(&self) -> Vec<PaymentMethod> {
        let mut methods: Vec<PaymentMethod> = self.adapters.keys().copied().collect();
        methods.sort();
        methods
    }
}
