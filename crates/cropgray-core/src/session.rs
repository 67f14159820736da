//! The interactive crop-and-enhance session.
//!
//! A [`Session`] owns one loaded image, the current crop rectangle and the
//! active [`EnhanceConfig`]. It moves through these states:
//!
//! ```text
//! (no session) --load--> Loaded <--crop--> CropSelected
//!                           |                  |
//!                           +------apply-------+--> Previewed
//! ```
//!
//! Changing the crop or the configuration drops a stale preview, so
//! `Previewed` always means the preview matches the current inputs.

use std::path::Path;

use thiserror::Error;

use crate::config::{ConfigError, EnhanceConfig, SettingsForm};
use crate::decode::{load_image, DecodeError, DecodedImage};
use crate::encode::{save_gray, EncodeError, OutputFormat};
use crate::enhance::{enhance, EnhanceError};
use crate::transform::{apply_crop, CropError, CropRect, PixelRegion};
use crate::GrayImage;

/// Drag gestures narrower or shorter than this (in pixels) are ignored.
pub const MIN_SELECTION_SPAN: f64 = 5.0;

/// Errors surfaced by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Crop(#[from] CropError),

    #[error(transparent)]
    Enhance(#[from] EnhanceError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Where a session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Image loaded, crop covers the full image.
    Loaded,
    /// A custom crop rectangle is set.
    CropSelected,
    /// A preview matching the current crop and configuration exists.
    Previewed,
}

/// Output of [`Session::apply`].
#[derive(Debug, Clone, PartialEq)]
pub struct ProcessedImage {
    /// Enhanced single-channel pixels.
    pub image: GrayImage,
    /// Source region the pixels were taken from.
    pub region: PixelRegion,
}

impl ProcessedImage {
    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    /// Raw row-major intensities.
    pub fn pixels(&self) -> &[u8] {
        self.image.as_raw()
    }
}

/// One loaded image plus its crop rectangle and enhancement settings.
#[derive(Debug, Clone)]
pub struct Session {
    image: DecodedImage,
    crop: CropRect,
    config: EnhanceConfig,
    preview: Option<ProcessedImage>,
}

impl Session {
    /// Load an image file and start a session with a full-extent crop.
    ///
    /// # Errors
    ///
    /// `SessionError::Decode` if the file is missing or unreadable,
    /// `SessionError::Config` if `config` is invalid.
    pub fn load(path: impl AsRef<Path>, config: EnhanceConfig) -> Result<Self, SessionError> {
        let path = path.as_ref();
        let image = load_image(path)?;
        let session = Self::from_image(image, config)?;
        log::info!(
            "Opened {} ({}x{})",
            path.display(),
            session.image.width,
            session.image.height
        );
        Ok(session)
    }

    /// Start a session over an already-decoded image.
    pub fn from_image(image: DecodedImage, config: EnhanceConfig) -> Result<Self, ConfigError> {
        config.check()?;
        Ok(Self {
            crop: CropRect::full(image.width, image.height),
            image,
            config,
            preview: None,
        })
    }

    pub fn image(&self) -> &DecodedImage {
        &self.image
    }

    pub fn crop(&self) -> CropRect {
        self.crop
    }

    pub fn config(&self) -> &EnhanceConfig {
        &self.config
    }

    /// Last output of [`apply`](Self::apply), if still current.
    pub fn preview(&self) -> Option<&ProcessedImage> {
        self.preview.as_ref()
    }

    pub fn state(&self) -> SessionState {
        if self.preview.is_some() {
            SessionState::Previewed
        } else if self.crop == CropRect::full(self.image.width, self.image.height) {
            SessionState::Loaded
        } else {
            SessionState::CropSelected
        }
    }

    /// Replace the crop rectangle.
    ///
    /// Coordinates are stored as given; they are checked when the crop is
    /// applied.
    pub fn update_crop(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.crop = CropRect::new(x1, y1, x2, y2);
        self.preview = None;
        log::debug!("Crop set to ({}, {}, {}, {})", x1, y1, x2, y2);
    }

    /// Handle a completed drag from `press` to `release`.
    ///
    /// Gestures spanning less than [`MIN_SELECTION_SPAN`] on either axis are
    /// treated as clicks and leave the crop unchanged. Returns whether the
    /// crop was updated.
    pub fn select(&mut self, press: (f64, f64), release: (f64, f64)) -> bool {
        let rect = CropRect::from_corners(press, release);
        let (span_x, span_y) = rect.span();
        if !(span_x >= MIN_SELECTION_SPAN && span_y >= MIN_SELECTION_SPAN) {
            log::debug!("Ignoring {:.1}x{:.1} selection", span_x, span_y);
            return false;
        }

        self.update_crop(rect.x1, rect.y1, rect.x2, rect.y2);
        true
    }

    /// Go back to cropping the full image.
    pub fn reset_crop(&mut self) {
        self.update_crop(0.0, 0.0, self.image.width as f64, self.image.height as f64);
    }

    /// Install a new configuration after validating it.
    ///
    /// On error the previous configuration stays in effect.
    pub fn set_config(&mut self, config: EnhanceConfig) -> Result<(), ConfigError> {
        config.check()?;
        if config != self.config {
            self.preview = None;
        }
        log::debug!("Enhancement settings: {:?}", config);
        self.config = config;
        Ok(())
    }

    /// Parse settings-form fields into the configuration.
    ///
    /// On error the previous configuration stays in effect.
    pub fn update_config(&mut self, form: &SettingsForm) -> Result<(), ConfigError> {
        let config = form.parse(&self.config).inspect_err(|e| {
            log::warn!("Settings not applied: {}", e);
        })?;
        self.set_config(config)
    }

    /// Crop, convert and enhance the current region; keep the result as the preview.
    ///
    /// # Errors
    ///
    /// `SessionError::Crop` if the crop rectangle is unusable,
    /// `SessionError::Enhance` if the configuration is.
    pub fn apply(&mut self) -> Result<&ProcessedImage, SessionError> {
        let region = self.crop.resolve(self.image.width, self.image.height)?;
        let cropped = apply_crop(&self.image, region)?;
        let image = enhance(&cropped, &self.config)?;

        log::debug!(
            "Processed region {}x{} at ({}, {})",
            region.width,
            region.height,
            region.x,
            region.y
        );

        Ok(&*self.preview.insert(ProcessedImage { image, region }))
    }

    /// Re-run [`apply`](Self::apply) and write the result to `path`.
    ///
    /// The format follows the extension (`jpg`/`jpeg` or `png`).
    pub fn save(&mut self, path: impl AsRef<Path>) -> Result<OutputFormat, SessionError> {
        let path = path.as_ref();
        // Reject the destination before doing any processing
        OutputFormat::from_path(path)?;

        let processed = self.apply()?;
        let format = save_gray(&processed.image, path)?;
        log::info!(
            "Saved {}x{} image to {}",
            processed.width(),
            processed.height(),
            path.display()
        );
        Ok(format)
    }
}
