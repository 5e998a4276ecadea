// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! CLI tool: synthesize 3D walls with door cutouts and write Wavefront OBJ
//!
//! Usage:
//!   blueprint-walls <walls.json> <out.obj> [--segments]

use anyhow::{bail, Context, Result};
use blueprint_lite_geometry::{synthesize_walls, ObjSink};
use blueprint_lite_vision::{
    export_wall_batch, persistence, wall_specs_from_segments, PipelineConfig,
};
use std::env;
use std::fs::File;
use std::io::BufWriter;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("RUST_LOG").unwrap_or_else(|_| "info".into()))
        .init();

    let argv: Vec<String> = env::args().collect();
    let Some(Args {
        input,
        output,
        from_segments,
    }) = parse_args(&argv).inspect_err(|_| print_usage())?
    else {
        print_usage();
        return Ok(());
    };

    let config = PipelineConfig::from_env();
    let specs = if from_segments {
        let segments = persistence::load_segments(&input)
            .with_context(|| format!("reading segments {}", input))?;
        wall_specs_from_segments(&segments, &config.walls)
    } else {
        persistence::load_walls(&input, &config.walls)
            .with_context(|| format!("reading walls {}", input))?
    };

    let batch = synthesize_walls(&specs, &config.synthesis);

    let file = File::create(&output).with_context(|| format!("creating {}", output))?;
    let mut sink = ObjSink::new(BufWriter::new(file));
    let warnings = export_wall_batch(&batch, &mut sink)?;
    sink.finish()?;

    tracing::info!(
        walls = specs.len(),
        written = batch.meshes().count(),
        failed = batch.failures().count(),
        warnings = warnings.len(),
        output = %output,
        "walls exported"
    );
    Ok(())
}

struct Args {
    input: String,
    output: String,
    from_segments: bool,
}

/// `Ok(None)` means help was requested
fn parse_args(args: &[String]) -> Result<Option<Args>> {
    if args.len() > 1 && (args[1] == "--help" || args[1] == "-h") {
        return Ok(None);
    }
    if args.len() < 3 {
        bail!("expected <walls.json> <out.obj>");
    }

    let mut from_segments = false;
    for extra in &args[3..] {
        match extra.as_str() {
            "--segments" => from_segments = true,
            other => bail!("unknown option: {}", other),
        }
    }

    Ok(Some(Args {
        input: args[1].clone(),
        output: args[2].clone(),
        from_segments,
    }))
}

fn print_usage() {
    eprintln!("Usage: blueprint-walls <walls.json> <out.obj> [--segments]");
    eprintln!();
    eprintln!("  walls.json   [[[sx, sy], [ex, ey], [dx, dy] | null], ...]");
    eprintln!("  --segments   Input is a line-segment list; every segment becomes a wall");
    eprintln!();
    eprintln!("Wall height, door size, scale and thickness come from BLUEPRINT_* variables.");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(items: &[&str]) -> Vec<String> {
        std::iter::once("blueprint-walls")
            .chain(items.iter().copied())
            .map(String::from)
            .collect()
    }

    #[test]
    fn test_missing_arguments_are_an_error() {
        assert!(parse_args(&argv(&[])).is_err());
        assert!(parse_args(&argv(&["walls.json"])).is_err());
    }

    #[test]
    fn test_segments_flag() {
        let args = parse_args(&argv(&["lines.json", "out.obj", "--segments"]))
            .unwrap()
            .unwrap();
        assert!(args.from_segments);
        assert_eq!(args.output, "out.obj");
        assert!(parse_args(&argv(&["-h"])).unwrap().is_none());
        assert!(parse_args(&argv(&["a.json", "b.obj", "--bogus"])).is_err());
    }
}
