//! Stripe PaymentIntents adapter.
//!
//! Implements the `PaymentIntentService` port behind `createPaymentIntent`.
//!
//! # Security
//!
//! - The secret key is handled via `secrecy::SecretString`
//! - Intent creation is idempotent per transaction id
//!
//! # Configuration
//!
//! - `VR_TOUR__PAYMENT__STRIPE_SECRET_KEY`: Stripe secret API key
//! - `VR_TOUR__PAYMENT__STRIPE_API_BASE`: optional API base override

mod mock_intent_service;
mod payment_intent_adapter;

pub use mock_intent_service::MockPaymentIntentService;
pub use payment_intent_adapter::{StripeConfig, StripePaymentIntentAdapter, STRIPE_API_BASE};
