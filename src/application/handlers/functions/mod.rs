//! Backend function handlers.
//!
//! Trusted operations the client calls through the callable-function
//! envelope because they need server-held secrets.

mod create_payment_intent;

pub use create_payment_intent::{
    CreatePaymentIntentCommand, CreatePaymentIntentError, CreatePaymentIntentHandler,
    CreatePaymentIntentResult,
};
