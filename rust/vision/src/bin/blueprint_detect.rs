// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: recognize a blueprint image and write classified objects (JSON)
//!
//! Usage:
//!   blueprint-detect <image_path> <objects.json> [options]

use anyhow::{bail, Context, Result};
use blueprint_lite_vision::{
    load_grayscale, persistence, BlueprintPipeline, ObjectClass, PipelineConfig, RegionTextMask,
};
use std::env;
use std::path::PathBuf;

struct Args {
    image: PathBuf,
    objects: PathBuf,
    lines: Option<PathBuf>,
    text_boxes: Option<PathBuf>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let argv: Vec<String> = env::args().collect();
    let Some(args) = parse_args(&argv).inspect_err(|_| print_usage())? else {
        print_usage();
        return Ok(());
    };

    let config = PipelineConfig::from_env();
    let gray = load_grayscale(&args.image)
        .with_context(|| format!("loading {}", args.image.display()))?;

    let mut pipeline = BlueprintPipeline::new(config);
    if let Some(path) = &args.text_boxes {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading OCR boxes {}", path.display()))?;
        pipeline = pipeline.with_text_mask(RegionTextMask::from_tesseract_boxes(&text, gray.height())?);
    }

    let report = pipeline.process(&gray)?;
    for warning in &report.warnings {
        tracing::warn!("{}", warning);
    }

    persistence::save_objects(&args.objects, &report.objects)
        .with_context(|| format!("writing {}", args.objects.display()))?;
    if let Some(path) = &args.lines {
        persistence::save_segments(path, &report.segments)
            .with_context(|| format!("writing {}", path.display()))?;
    }

    let counts = report.class_counts();
    let count = |class: ObjectClass| counts.get(&class).copied().unwrap_or(0);
    tracing::info!(
        objects = report.objects.len(),
        walls = count(ObjectClass::Wall),
        doors = count(ObjectClass::Door),
        shapes = count(ObjectClass::Shape),
        detected_lines = count(ObjectClass::DetectedLine),
        lines = report.segments.len(),
        output = %args.objects.display(),
        "blueprint processed"
    );
    Ok(())
}

/// `Ok(None)` means help was requested
fn parse_args(args: &[String]) -> Result<Option<Args>> {
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        return Ok(None);
    }
    if args.len() < 3 {
        bail!("expected <image_path> <objects.json>");
    }

    let mut parsed = Args {
        image: PathBuf::from(&args[1]),
        objects: PathBuf::from(&args[2]),
        lines: None,
        text_boxes: None,
    };

    let mut i = 3;
    while i < args.len() {
        match args[i].as_str() {
            "--lines" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--lines requires a path");
                };
                parsed.lines = Some(PathBuf::from(path));
            }
            "--text-boxes" => {
                i += 1;
                let Some(path) = args.get(i) else {
                    bail!("--text-boxes requires a path");
                };
                parsed.text_boxes = Some(PathBuf::from(path));
            }
            other => bail!("unknown option: {}", other),
        }
        i += 1;
    }

    Ok(Some(parsed))
}

fn print_usage() {
    eprintln!("Usage: blueprint-detect <image_path> <objects.json> [options]");
    eprintln!();
    eprintln!("Options:");
    eprintln!("  --lines <path>        Also write the deduplicated line segments");
    eprintln!("  --text-boxes <path>   Tesseract box file; boxed regions are masked out");
    eprintln!();
    eprintln!("Tuning is read from BLUEPRINT_* environment variables.");
}
