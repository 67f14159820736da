//! Enhancement settings.
//!
//! [`EnhanceConfig`] is the typed configuration a [`Session`](crate::Session)
//! runs with. [`SettingsForm`] is its text-field counterpart: three strings as
//! a user would type them, parsed and validated into a new configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::enhance::{validate_clip_limit, validate_kernel, validate_tile_grid, EnhanceError};

/// Default Gaussian kernel size.
pub const DEFAULT_BLUR_KERNEL: u32 = 5;

/// Default CLAHE clip limit.
pub const DEFAULT_CLIP_LIMIT: f32 = 2.0;

/// Default CLAHE tile grid (tiles per side).
pub const DEFAULT_TILE_GRID: u32 = 8;

/// Settings validation failure. The previous configuration stays in effect.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A text field did not parse as the expected number type.
    #[error("Invalid value {value:?} for {field}: {reason}")]
    Parse {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// The values parsed but cannot be used.
    #[error("Invalid settings: {0}")]
    Invalid(#[from] EnhanceError),
}

/// Enhancement parameters for the grayscale pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnhanceConfig {
    /// Convert to single-channel output (must stay true)
    pub grayscale: bool,
    /// Gaussian kernel size, odd; `None` disables blurring
    pub blur_kernel: Option<u32>,
    /// CLAHE clip limit; `None` disables equalization
    pub clip_limit: Option<f32>,
    /// CLAHE tiles per side; `None` disables equalization
    pub tile_grid: Option<u32>,
}

impl Default for EnhanceConfig {
    fn default() -> Self {
        Self {
            grayscale: true,
            blur_kernel: Some(DEFAULT_BLUR_KERNEL),
            clip_limit: Some(DEFAULT_CLIP_LIMIT),
            tile_grid: Some(DEFAULT_TILE_GRID),
        }
    }
}

impl EnhanceConfig {
    /// Create the default configuration (blur 5, CLAHE 2.0 over 8x8 tiles).
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain grayscale conversion with no blur and no equalization.
    pub fn grayscale_only() -> Self {
        Self {
            grayscale: true,
            blur_kernel: None,
            clip_limit: None,
            tile_grid: None,
        }
    }

    /// CLAHE parameters, present only when both are configured.
    pub fn contrast(&self) -> Option<(f32, u32)> {
        self.clip_limit.zip(self.tile_grid)
    }

    /// Check if this configuration only converts to grayscale
    pub fn is_grayscale_only(&self) -> bool {
        self.blur_kernel.is_none() && self.contrast().is_none()
    }

    /// Validate every configured parameter.
    pub fn check(&self) -> Result<(), EnhanceError> {
        if !self.grayscale {
            return Err(EnhanceError::GrayscaleDisabled);
        }
        if let Some(kernel) = self.blur_kernel {
            validate_kernel(kernel)?;
        }
        if let Some(clip_limit) = self.clip_limit {
            validate_clip_limit(clip_limit)?;
        }
        if let Some(tile_grid) = self.tile_grid {
            validate_tile_grid(tile_grid)?;
        }
        Ok(())
    }
}

/// Text fields of the settings form.
///
/// An empty field (or `none`) leaves that step disabled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SettingsForm {
    pub blur_kernel: String,
    pub clip_limit: String,
    pub tile_grid: String,
}

impl SettingsForm {
    /// Pre-fill the form from an existing configuration.
    pub fn from_config(config: &EnhanceConfig) -> Self {
        fn field<T: ToString>(value: Option<T>) -> String {
            value.map(|v| v.to_string()).unwrap_or_default()
        }

        Self {
            blur_kernel: field(config.blur_kernel),
            clip_limit: field(config.clip_limit),
            tile_grid: field(config.tile_grid),
        }
    }

    /// Parse the fields into a configuration.
    ///
    /// Fields not on the form (`grayscale`) are taken from `base`.
    ///
    /// # Errors
    ///
    /// `ConfigError::Parse` names the first field that is not a number,
    /// `ConfigError::Invalid` reports a number that cannot be used.
    pub fn parse(&self, base: &EnhanceConfig) -> Result<EnhanceConfig, ConfigError> {
        let config = EnhanceConfig {
            grayscale: base.grayscale,
            blur_kernel: parse_field("blur kernel", &self.blur_kernel)?,
            clip_limit: parse_field("clip limit", &self.clip_limit)?,
            tile_grid: parse_field("tile grid", &self.tile_grid)?,
        };
        config.check()?;
        Ok(config)
    }
}

fn parse_field<T>(field: &'static str, raw: &str) -> Result<Option<T>, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let trimmed = raw.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("none") {
        return Ok(None);
    }

    trimmed
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Parse {
            field,
            value: raw.to_string(),
            reason: e.to_string(),
        })
}
