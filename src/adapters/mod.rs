//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `store` - Document store (in-memory) and the transaction, entitlement
//!   and gateway settings adapters on top of it
//! - `gateways` - Razorpay, Cashfree, Paytm and Stripe checkout adapters
//! - `stripe` - Server-side PaymentIntents API
//! - `functions` - Backend function client (callable envelope)
//! - `auth` - JWT session validation
//! - `http` - axum service hosting the backend functions

pub mod auth;
pub mod functions;
pub mod gateways;
pub mod http;
pub mod store;
pub mod stripe;

pub use auth::{JwtSessionValidator, MockSessionValidator};
pub use functions::{HttpBackendFunctions, MockBackendFunctions};
pub use gateways::{GatewayRegistry, MockGatewayAdapter, RecordingCheckoutHost};
pub use store::{
    DocumentEntitlementStore, DocumentGatewayConfigReader, DocumentTransactionStore,
    InMemoryDocumentStore,
};
pub use stripe::{MockPaymentIntentService, StripePaymentIntentAdapter};
