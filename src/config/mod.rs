//! Service configuration.
//!
//! Every setting comes from `VR_TOUR__<SECTION>__<KEY>` environment
//! variables, with a `.env` file honored during development. Sections:
//!
//! - `server` - listener, environment, log filter, CORS
//! - `auth` - bearer token verification
//! - `payment` - Stripe secret key for `createPaymentIntent`
//! - `checkout` - merchant name, Paytm order params, Cashfree return URL
//! - `preview` - preview length and tick
//!
//! ```no_run
//! use vr_tour_payments::config::AppConfig;
//!
//! let config = AppConfig::load().expect("configuration");
//! config.validate().expect("valid configuration");
//! ```

mod auth;
mod checkout;
mod error;
mod payment;
mod preview;
mod server;

pub use auth::AuthConfig;
pub use checkout::CheckoutConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use preview::PreviewConfig;
pub use server::{Environment, ServerConfig};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,
    pub auth: AuthConfig,
    pub payment: PaymentConfig,
    #[serde(default)]
    pub checkout: CheckoutConfig,
    #[serde(default)]
    pub preview: PreviewConfig,
}

impl AppConfig {
    /// Reads the environment (after `.env`, if present).
    ///
    /// `VR_TOUR__SERVER__PORT=8080` sets `server.port`. Fails when a
    /// required value such as `auth.jwt_secret` is missing or a value does
    /// not parse.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("VR_TOUR")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// First problem found, section by section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        self.auth.validate(&self.server.environment)?;
        self.payment.validate()?;
        self.checkout.validate()?;
        self.preview.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}
