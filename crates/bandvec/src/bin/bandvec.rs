use std::path::PathBuf;
use std::process::ExitCode;

use bandvec::extract;
use bandvec::features::io::{ExtractConfig, ExtractReport};
use bandvec::ExtractParams;
use clap::Parser;

#[cfg(feature = "tracing")]
use tracing_log::LogTracer;

/// Binarize a grayscale image and print dark-pixel density per vertical band.
#[derive(Parser, Debug)]
#[command(name = "bandvec", version, about)]
struct Cli {
    /// Input image. Color images are converted to luma first.
    image: Option<PathBuf>,

    /// Pixels with value <= threshold count as dark.
    #[arg(short, long, value_parser = clap::value_parser!(i32).range(0..=255))]
    threshold: Option<i32>,

    /// Number of vertical bands (at least 2, at most the image width).
    #[arg(short, long)]
    segments: Option<usize>,

    /// JSON config file; command-line values override it.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the binarized image with band boundaries to this file.
    #[arg(long)]
    annotated: Option<PathBuf>,

    /// Resize the annotated image to a square of this many pixels (300 when
    /// given without a value).
    #[arg(long, num_args = 0..=1, default_missing_value = "300")]
    preview_size: Option<u32>,

    /// Write the JSON report to this file. With `--config` and no path, the
    /// report goes to `bandvec_report.json`.
    #[arg(long)]
    report: Option<PathBuf>,

    /// Print the JSON report instead of the text vectors.
    #[arg(long)]
    json: bool,

    /// Log level (off, error, warn, info, debug, trace). With the `tracing`
    /// feature, `RUST_LOG` overrides it when set.
    #[arg(long, default_value = "warn")]
    log_level: String,
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(&cli.log_level);

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(not(feature = "tracing"))]
fn init_logging(level: &str) {
    let _ = bandvec::core::init_from_str(level);
}

#[cfg(feature = "tracing")]
fn init_logging(level: &str) {
    // Ignore errors if a logger/subscriber was already installed.
    let _ = LogTracer::init();
    bandvec::core::init_tracing(level, false);
}

fn resolve_config(cli: &Cli) -> Result<ExtractConfig, Box<dyn std::error::Error>> {
    let mut cfg = match (&cli.config, &cli.image) {
        (Some(path), _) => ExtractConfig::load_json(path)?,
        (None, Some(image)) => {
            ExtractConfig::new(image.to_string_lossy(), ExtractParams::default())
        }
        (None, None) => return Err("no input image: pass IMAGE or --config".into()),
    };

    if let Some(image) = &cli.image {
        cfg.image_path = image.to_string_lossy().into_owned();
    }
    if let Some(threshold) = cli.threshold {
        cfg.params.threshold = threshold;
    }
    if let Some(segments) = cli.segments {
        cfg.params.segments = segments;
    }
    if let Some(path) = &cli.annotated {
        cfg.annotated_path = Some(path.to_string_lossy().into_owned());
    }
    if cli.preview_size.is_some() {
        cfg.preview_size = cli.preview_size;
    }
    if let Some(path) = &cli.report {
        cfg.output_path = Some(path.to_string_lossy().into_owned());
    }
    Ok(cfg)
}

fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let cfg = resolve_config(&cli)?;
    log::info!(
        "extracting {} (threshold={}, segments={})",
        cfg.image_path,
        cfg.params.threshold,
        cfg.params.segments
    );

    let mut report = ExtractReport::new(&cfg.image_path, &cfg.params);
    let result = extract::extract_path(&cfg.image_path, &cfg.params).and_then(|out| {
        if let Some(path) = &cfg.annotated_path {
            extract::save_annotated(&out.annotated, path, cfg.preview_size)?;
        }
        Ok(out)
    });

    match &result {
        Ok(out) => {
            report.set_extraction(out);
            report.annotated_path = cfg.annotated_path.clone();
        }
        Err(err) => {
            log::warn!("extraction failed: {err}");
            report.set_error(err);
        }
    }

    // A config file always produces a report, at its default path if unset.
    if cfg.output_path.is_some() || cli.config.is_some() {
        let path = cfg.output_path();
        report.write_json(&path)?;
        log::info!("wrote report JSON to {}", path.display());
    }

    let out = result?;
    if cli.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!("{}", out.features);
        if out.features.degenerate {
            println!("note: no dark pixels inside any band; normalized vectors are zero");
        }
    }
    Ok(())
}
