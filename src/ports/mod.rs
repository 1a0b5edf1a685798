//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Persistence Ports
//!
//! - `DocumentStore` - Managed document database (collections, queries, listeners)
//! - `TransactionRepository` - Transaction records and guarded status writes
//! - `GatewayConfigReader` - Admin gateway settings record
//! - `EntitlementStore` - Tier and purchased content on the user profile
//!
//! ## Payment Ports
//!
//! - `PaymentGatewayAdapter` - One payment attempt against one provider
//! - `CheckoutHost` - Client integration surface (scripts, overlays, forms)
//! - `HostedSessionApi` - Server-side hosted session creation
//! - `BackendFunctions` - Trusted callable functions
//! - `PaymentIntentService` - Server side of intent creation
//!
//! ## Identity
//!
//! - `SessionValidator` - Bearer token validation

mod backend_functions;
mod checkout_host;
mod document_store;
mod entitlement_store;
mod gateway_config_reader;
mod hosted_session;
mod payment_gateway;
mod payment_intents;
mod session_validator;
mod transaction_repository;

pub use backend_functions::{BackendFunctions, FunctionError, CREATE_PAYMENT_INTENT};
pub use checkout_host::{
    CheckoutHost, HostError, HtmlForm, IntentConfirmation, OverlayOptions, OverlayResult,
};
pub use document_store::{
    Direction, Document, DocumentStore, DocumentStream, FieldValue, FieldWrites, Filter, OrderBy,
    Query, StoreError, DOCUMENT_ID_FIELD,
};
pub use entitlement_store::{EntitlementStore, EntitlementStream};
pub use gateway_config_reader::GatewayConfigReader;
pub use hosted_session::{HostedSession, HostedSessionApi, HostedSessionRequest, ProviderEnvironment};
pub use payment_gateway::{GatewayRequest, Payer, PaymentGatewayAdapter};
pub use payment_intents::{CreateIntentRequest, IntentError, PaymentIntent, PaymentIntentService};
pub use session_validator::SessionValidator;
pub use transaction_repository::TransactionRepository;
