//! VR Tour Payments - purchase and access core for the VR tour storefront
//!
//! Records purchase attempts, dispatches them to one of four payment
//! gateways (Razorpay, Cashfree, Paytm, Stripe), grants the purchased
//! entitlement on success and gates playback of locked content behind a
//! preview countdown.
//!
//! # Layers
//!
//! - `domain` - transactions, gateway settings, outcomes, the Paytm
//!   checksum and the entitlement gate
//! - `ports` - store, gateway, host and identity interfaces
//! - `adapters` - in-memory store, gateway adapters, HTTP clients and the
//!   backend function service
//! - `application` - payment command/query handlers and the preview session
//! - `config` - environment-driven settings

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
