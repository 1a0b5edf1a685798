//! HTTP adapter for trusted backend functions.
//!
//! - `POST /functions/createPaymentIntent` - Stripe intent for the caller's transaction
//!
//! Requests require a bearer token validated by the auth middleware.

pub mod dto;
pub mod handlers;
pub mod routes;

pub use handlers::{CallableError, FunctionsAppState};
pub use routes::{functions_router, functions_routes};
