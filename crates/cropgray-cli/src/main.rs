//! Cropgray - crop an image and save an enhanced grayscale copy.
//!
//! Each step of the interactive workflow maps onto a flag:
//!
//! - open-file dialog: the positional `INPUT` (omitted = cancelled)
//! - rectangle drag: `--crop X1,Y1,X2,Y2`
//! - settings form: `--blur`, `--clip-limit`, `--tile-grid`
//! - save dialog: `--output` (bare `-o` saves to `preprocessed_cropped_image.jpg`)
//!
//! Set `RUST_LOG=debug` to trace session state changes.

mod cli;

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Context;
use clap::Parser;
use cropgray_core::{CropRect, EnhanceConfig, PixelRegion, Session};
use serde::Serialize;

use cli::Cli;

/// JSON summary printed with `--report`.
#[derive(Debug, Serialize)]
struct RunReport {
    input: PathBuf,
    crop: CropRect,
    region: PixelRegion,
    width: u32,
    height: u32,
    config: EnhanceConfig,
    saved: Option<PathBuf>,
}

/// How a run ended, short of a fatal error.
#[derive(Debug, PartialEq, Eq)]
enum Outcome {
    /// No input was given; nothing was opened.
    NoInput,
    /// The image was processed and every requested output was written.
    Done,
    /// The image was processed but the output could not be written.
    SaveFailed,
}

fn init_logger() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format(|buf, record| {
            let style = buf.default_level_style(record.level());
            writeln!(buf, "[{style}{}{style:#}] {}", record.level(), record.args())
        })
        .init();
}

fn run(cli: &Cli, out: &mut impl Write) -> anyhow::Result<Outcome> {
    let Some(input) = &cli.input else {
        writeln!(out, "No file selected.")?;
        return Ok(Outcome::NoInput);
    };

    let mut session = Session::load(input, cli.base_config())
        .with_context(|| format!("failed to open {}", input.display()))?;

    // Bad settings are reported and the previous settings kept
    if let Some(form) = cli.settings_form(session.config()) {
        if let Err(e) = session.update_config(&form) {
            log::error!("{}; continuing with {:?}", e, session.config());
        }
    }

    if let Some(crop) = cli.crop {
        session.update_crop(crop.x1, crop.y1, crop.x2, crop.y2);
    }

    let processed = session.apply().context("failed to process crop region")?;
    log::info!(
        "Preview ready: {}x{} from region at ({}, {})",
        processed.width(),
        processed.height(),
        processed.region.x,
        processed.region.y
    );

    let mut outcome = Outcome::Done;
    let mut saved = None;
    if let Some(output) = &cli.output {
        match session.save(output) {
            Ok(_) => {
                writeln!(out, "Preprocessed cropped image saved at: {}", output.display())?;
                saved = Some(output.clone());
            }
            Err(e) => {
                log::error!("Could not save {}: {}", output.display(), e);
                outcome = Outcome::SaveFailed;
            }
        }
    }

    if cli.report {
        if let Some(preview) = session.preview() {
            let report = RunReport {
                input: input.clone(),
                crop: session.crop(),
                region: preview.region,
                width: preview.width(),
                height: preview.height(),
                config: session.config().clone(),
                saved,
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&report)?)?;
        }
    }

    Ok(outcome)
}

fn main() -> anyhow::Result<ExitCode> {
    init_logger();
    let cli = Cli::parse();

    let outcome = run(&cli, &mut std::io::stdout().lock())?;
    Ok(match outcome {
        Outcome::NoInput | Outcome::Done => ExitCode::SUCCESS,
        Outcome::SaveFailed => ExitCode::FAILURE,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_gradient(path: &std::path::Path) {
        image::RgbImage::from_fn(100, 100, |x, y| image::Rgb([(x * 2) as u8, (y * 2) as u8, 40]))
            .save(path)
            .unwrap();
    }

    fn run_with(args: &[&str]) -> (anyhow::Result<Outcome>, String) {
        let cli = Cli::try_parse_from(std::iter::once("cropgray").chain(args.iter().copied())).unwrap();
        let mut out = Vec::new();
        let result = run(&cli, &mut out);
        (result, String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_no_input_prints_message() {
        let (result, out) = run_with(&[]);
        assert_eq!(result.unwrap(), Outcome::NoInput);
        assert_eq!(out, "No file selected.\n");
    }

    #[test]
    fn test_missing_input_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("missing.png");

        let (result, _) = run_with(&[input.to_str().unwrap()]);
        let err = result.unwrap_err();
        assert!(err.to_string().contains("failed to open"));
    }

    #[test]
    fn test_crop_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.png");
        write_gradient(&input);

        let (result, out) = run_with(&[
            input.to_str().unwrap(),
            "--plain",
            "--crop",
            "10,10,60,60",
            "--output",
            output.to_str().unwrap(),
        ]);

        assert_eq!(result.unwrap(), Outcome::Done);
        assert!(out.starts_with("Preprocessed cropped image saved at: "));

        let saved = image::open(&output).unwrap().into_luma8();
        assert_eq!(saved.dimensions(), (50, 50));
    }

    #[test]
    fn test_unsupported_output_is_not_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        let output = dir.path().join("out.webp");
        write_gradient(&input);

        let (result, out) = run_with(&[input.to_str().unwrap(), "-o", output.to_str().unwrap()]);

        assert_eq!(result.unwrap(), Outcome::SaveFailed);
        assert!(out.is_empty());
        assert!(!output.exists());
    }

    #[test]
    fn test_invalid_settings_keep_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_gradient(&input);

        let (result, out) = run_with(&[input.to_str().unwrap(), "--blur", "4", "--report"]);

        assert_eq!(result.unwrap(), Outcome::Done);
        let report: serde_json::Value = serde_json::from_str(&out).unwrap();
        assert_eq!(report["config"]["blur_kernel"], 5);
        assert_eq!(report["width"], 100);
        assert_eq!(report["saved"], serde_json::Value::Null);
    }

    #[test]
    fn test_degenerate_crop_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("in.png");
        write_gradient(&input);

        let (result, _) = run_with(&[input.to_str().unwrap(), "--crop", "500,500,600,600"]);
        assert!(result.is_err());
    }
}
