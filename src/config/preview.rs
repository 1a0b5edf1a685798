//! Preview gate configuration

use std::time::Duration;

use serde::Deserialize;

use crate::application::PreviewSessionConfig;
use crate::domain::entitlement::DEFAULT_PREVIEW_SECONDS;

use super::error::ValidationError;

#[derive(Debug, Clone, Deserialize)]
pub struct PreviewConfig {
    /// Free preview length for gated content
    #[serde(default = "default_preview_seconds")]
    pub preview_seconds: u32,

    /// Countdown resolution
    #[serde(default = "default_tick_millis")]
    pub tick_millis: u64,
}

impl PreviewConfig {
    pub fn session_config(&self) -> PreviewSessionConfig {
        PreviewSessionConfig {
            preview_seconds: self.preview_seconds,
            tick_interval: Duration::from_millis(self.tick_millis),
        }
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.preview_seconds == 0 || self.preview_seconds > 3600 {
            return Err(ValidationError::InvalidPreviewSeconds);
        }
        if !(100..=60_000).contains(&self.tick_millis) {
            return Err(ValidationError::InvalidPreviewTick);
        }
        Ok(())
    }
}

impl Default for PreviewConfig {
    fn default() -> Self {
        Self {
            preview_seconds: default_preview_seconds(),
            tick_millis: default_tick_millis(),
        }
    }
}

fn default_preview_seconds() -> u32 {
    DEFAULT_PREVIEW_SECONDS
}

fn default_tick_millis() -> u64 {
    1000
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_sixty_one_second_ticks() {
        let config = PreviewConfig::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.session_config(), PreviewSessionConfig::default());
    }

    #[test]
    fn test_zero_preview_is_invalid() {
        let config = PreviewConfig {
            preview_seconds: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPreviewSeconds));
    }

    #[test]
    fn test_tick_bounds() {
        let config = PreviewConfig {
            tick_millis: 10,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidPreviewTick));
    }
}
