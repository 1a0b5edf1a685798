//! Payment gateway adapters.
//!
//! Four provider strategies behind `PaymentGatewayAdapter`:
//!
//! - `RazorpayGateway` - popup overlay with completion callback
//! - `CashfreeGateway` - hosted session plus redirect form
//! - `PaytmGateway` - checksum-signed redirect form
//! - `StripeGateway` - server-created intent confirmed client-side
//!
//! Plus the registry, the Cashfree order API client and test doubles.

mod cashfree;
mod cashfree_api;
mod mock_checkout_host;
mod mock_gateway;
mod paytm;
mod razorpay;
mod registry;
mod stripe;

pub use cashfree::{cashfree_environment, CashfreeGateway};
pub use cashfree_api::{
    cashfree_base_url, CashfreeSessionClient, CASHFREE_PRODUCTION_BASE, CASHFREE_SANDBOX_BASE,
    DEFAULT_CASHFREE_API_VERSION,
};
pub use mock_checkout_host::{HostCall, RecordingCheckoutHost};
pub use mock_gateway::MockGatewayAdapter;
pub use paytm::{paytm_endpoint, PaytmGateway, PaytmSettings, PAYTM_PRODUCTION_URL, PAYTM_STAGING_URL};
pub use razorpay::{RazorpayGateway, RAZORPAY_CHECKOUT_SCRIPT};
pub use registry::{CheckoutSettings, GatewayRegistry};
pub use stripe::{StripeGateway, STRIPE_JS_URL};

use crate::domain::payment::GatewayError;
use crate::ports::HostError;

impl From<HostError> for GatewayError {
    fn from(err: HostError) -> Self {
        GatewayError::transport(err.to_string())
    }
}
