//! Configuration failures: unreadable environment, then invalid values.

use thiserror::Error;

/// The environment could not be read into `AppConfig`.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),
}

/// A loaded value that the service cannot run with. Names are given as the
/// variable suffix after `VR_TOUR__`.
#[derive(Debug, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("JWT secret must be at least 32 bytes in production")]
    JwtSecretTooShort,

    #[error("Invalid Stripe secret key format")]
    InvalidStripeKey,

    #[error("{0} must be an http(s) URL")]
    InvalidUrl(&'static str),

    #[error("Preview length must be between 1 and 3600 seconds")]
    InvalidPreviewSeconds,

    #[error("Preview tick must be between 100 and 60000 milliseconds")]
    InvalidPreviewTick,
}
