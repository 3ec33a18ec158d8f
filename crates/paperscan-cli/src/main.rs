//! paperscan: CLI tool for running document-boundary detection against
//! image files on disk.
//!
//! Decodes an image, runs `detect` or `detect_enhanced`, and prints a
//! report of the boundaries found. Useful for:
//!
//! - Trying detection options against real photos
//! - Dumping intermediate buffers (grayscale/edges/threshold/processed) as
//!   PNGs for visual inspection
//! - Comparing `detect` against `detect_enhanced`'s strategy sweep
//!
//! # Usage
//!
//! ```text
//! cargo run --release --bin paperscan -- [OPTIONS] <IMAGE_PATH>
//! ```

#![allow(clippy::print_stdout, clippy::print_stderr)]

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use paperscan_core::{detect, detect_enhanced, DetectOptions, DetectionResult, Raster};

/// Run document-boundary detection against an image file.
#[derive(Parser)]
#[command(name = "paperscan", version)]
struct Cli {
    /// Path to the input image (PNG, JPEG, BMP, WebP).
    image_path: PathBuf,

    /// Minimum boundary area as a fraction of the image area.
    #[arg(long, default_value_t = DetectOptions::default().min_area_ratio)]
    min_area_ratio: f64,

    /// Maximum boundary area as a fraction of the image area.
    #[arg(long, default_value_t = DetectOptions::default().max_area_ratio)]
    max_area_ratio: f64,

    /// Sobel-magnitude threshold used by the combine stage.
    #[arg(long, default_value_t = DetectOptions::default().edge_threshold)]
    edge_threshold: u8,

    /// Gaussian blur radius in pixels.
    #[arg(long, default_value_t = DetectOptions::default().blur_radius)]
    blur_radius: u32,

    /// Run the multi-strategy `detectEnhanced` search instead of a single
    /// `detect` pass.
    #[arg(long)]
    enhanced: bool,

    /// Directory to dump the named intermediate buffers into as PNGs.
    #[arg(long)]
    save_intermediates: Option<PathBuf>,

    /// Print the result as JSON instead of a human-readable report.
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    env_logger::init();
    let cli = Cli::parse();

    let options = DetectOptions {
        min_area_ratio: cli.min_area_ratio,
        max_area_ratio: cli.max_area_ratio,
        edge_threshold: cli.edge_threshold,
        blur_radius: cli.blur_radius,
    };

    let image = match image::open(&cli.image_path) {
        Ok(image) => image.to_rgba8(),
        Err(e) => {
            eprintln!("Error reading {}: {e}", cli.image_path.display());
            return ExitCode::FAILURE;
        }
    };

    let (width, height) = (image.width(), image.height());
    let raster = match Raster::new(width, height, image.into_raw()) {
        Ok(raster) => raster,
        Err(e) => {
            eprintln!("Error building raster: {e}");
            return ExitCode::FAILURE;
        }
    };

    eprintln!("Image: {} ({width}x{height})", cli.image_path.display());
    eprintln!("Options: {options:?}");
    eprintln!("Strategy: {}", if cli.enhanced { "detectEnhanced" } else { "detect" });
    eprintln!();

    let result = if cli.enhanced {
        detect_enhanced(&raster, &options)
    } else {
        detect(&raster, &options)
    };

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("Detection error: {e}");
            return ExitCode::FAILURE;
        }
    };

    if let Some(dir) = &cli.save_intermediates
        && let Err(e) = save_intermediates(&result, dir)
    {
        eprintln!("Error saving intermediates: {e}");
        return ExitCode::FAILURE;
    }

    if cli.json {
        match serde_json::to_string_pretty(&report(&result)) {
            Ok(json) => println!("{json}"),
            Err(e) => {
                eprintln!("Error serializing report: {e}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        println!("{}", human_report(&result));
    }

    ExitCode::SUCCESS
}

fn save_intermediates(result: &DetectionResult, dir: &std::path::Path) -> std::io::Result<()> {
    std::fs::create_dir_all(dir)?;
    for (key, buffer) in &result.intermediate {
        let name = match key {
            paperscan_core::IntermediateKey::Grayscale => "grayscale",
            paperscan_core::IntermediateKey::Edges => "edges",
            paperscan_core::IntermediateKey::Threshold => "threshold",
            paperscan_core::IntermediateKey::Processed => "processed",
        };
        let path = dir.join(format!("{name}.png"));
        let image = image::GrayImage::from_raw(buffer.width(), buffer.height(), buffer.data().to_vec())
            .ok_or_else(|| std::io::Error::other("intermediate buffer length does not match its own dimensions"))?;
        image
            .save(&path)
            .map_err(|e| std::io::Error::other(e.to_string()))?;
        eprintln!("Wrote {}", path.display());
    }
    Ok(())
}

#[derive(serde::Serialize)]
struct Report {
    total_detected: usize,
    boundaries: Vec<BoundaryReport>,
}

#[derive(serde::Serialize)]
struct BoundaryReport {
    kind: paperscan_core::BoundaryKind,
    num_vertices: usize,
    area: f64,
    aspect_ratio: f64,
    is_convex: bool,
    points: Vec<(f64, f64)>,
}

fn report(result: &DetectionResult) -> Report {
    Report {
        total_detected: result.stats.total_detected,
        boundaries: result
            .boundaries
            .iter()
            .map(|b| BoundaryReport {
                kind: b.kind,
                num_vertices: b.num_vertices,
                area: b.area,
                aspect_ratio: b.aspect_ratio,
                is_convex: b.is_convex,
                points: b.points.iter().map(|p| (p.x, p.y)).collect(),
            })
            .collect(),
    }
}

fn human_report(result: &DetectionResult) -> String {
    use std::fmt::Write as _;

    let mut out = String::new();
    let _ = writeln!(out, "Boundaries found: {}", result.stats.total_detected);
    for (i, boundary) in result.boundaries.iter().enumerate() {
        let _ = writeln!(
            out,
            "  [{i}] {:?}  vertices={}  area={:.1}  aspect={:.2}  convex={}",
            boundary.kind, boundary.num_vertices, boundary.area, boundary.aspect_ratio, boundary.is_convex
        );
    }
    out
}
