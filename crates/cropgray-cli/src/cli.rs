//! Command-line arguments.

use std::path::PathBuf;

use clap::Parser;
use cropgray_core::{CropRect, EnhanceConfig, SettingsForm};

/// File name used when `--output` is given without a value.
pub const DEFAULT_OUTPUT_NAME: &str = "preprocessed_cropped_image.jpg";

/// Crop an image, convert it to enhanced grayscale and save the result.
#[derive(Debug, Parser)]
#[command(name = "cropgray", version, about)]
pub struct Cli {
    /// Image to open (jpg, jpeg, png or bmp)
    pub input: Option<PathBuf>,

    /// Crop rectangle in source pixels: X1,Y1,X2,Y2
    #[arg(long, value_parser = parse_crop, allow_hyphen_values = true)]
    pub crop: Option<CropRect>,

    /// Gaussian blur kernel size (odd); empty or "none" disables blurring
    #[arg(long)]
    pub blur: Option<String>,

    /// CLAHE clip limit; empty or "none" disables equalization
    #[arg(long)]
    pub clip_limit: Option<String>,

    /// CLAHE tiles per side; empty or "none" disables equalization
    #[arg(long)]
    pub tile_grid: Option<String>,

    /// Start from plain grayscale conversion instead of the default settings
    #[arg(long)]
    pub plain: bool,

    /// Where to save the processed image (.jpg, .jpeg or .png);
    /// a bare flag saves to preprocessed_cropped_image.jpg
    #[arg(short, long, num_args = 0..=1, default_missing_value = DEFAULT_OUTPUT_NAME)]
    pub output: Option<PathBuf>,

    /// Print a JSON summary of the run to stdout
    #[arg(long)]
    pub report: bool,
}

impl Cli {
    /// Configuration the session starts with.
    pub fn base_config(&self) -> EnhanceConfig {
        if self.plain {
            EnhanceConfig::grayscale_only()
        } else {
            EnhanceConfig::default()
        }
    }

    /// Settings form with any command-line overrides filled in.
    ///
    /// Returns `None` when no setting was given on the command line.
    pub fn settings_form(&self, current: &EnhanceConfig) -> Option<SettingsForm> {
        if self.blur.is_none() && self.clip_limit.is_none() && self.tile_grid.is_none() {
            return None;
        }

        let mut form = SettingsForm::from_config(current);
        if let Some(blur) = &self.blur {
            form.blur_kernel = blur.clone();
        }
        if let Some(clip_limit) = &self.clip_limit {
            form.clip_limit = clip_limit.clone();
        }
        if let Some(tile_grid) = &self.tile_grid {
            form.tile_grid = tile_grid.clone();
        }
        Some(form)
    }
}

/// Parse `X1,Y1,X2,Y2` into a crop rectangle.
pub fn parse_crop(s: &str) -> Result<CropRect, String> {
    let coords = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("invalid coordinate {:?}: {}", part.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    match coords.as_slice() {
        &[x1, y1, x2, y2] => Ok(CropRect::new(x1, y1, x2, y2)),
        _ => Err(format!("expected 4 comma-separated numbers, got {}", coords.len())),
    }
}
