// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Pipeline configuration
//!
//! Every stage takes its tuning explicitly, so independent pipelines can run
//! side by side with different settings. [`PipelineConfig::from_env`] layers
//! `BLUEPRINT_*` environment variables over the defaults.

use blueprint_lite_geometry::{
    SynthesisConfig, DEFAULT_DOOR_HEIGHT, DEFAULT_DOOR_WIDTH, DEFAULT_WALL_HEIGHT,
};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Parameters handed to the vision toolkit
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolkitParams {
    /// Gaussian kernel size in pixels; sigma is derived from it
    pub blur_kernel: u32,
    pub canny_low: f32,
    pub canny_high: f32,
    /// Hough distance resolution in pixels
    pub hough_rho: f64,
    /// Hough angle resolution in radians
    pub hough_theta: f64,
    pub hough_threshold: u32,
    pub min_line_length: f64,
    pub max_line_gap: f64,
    /// Adaptive threshold neighbourhood (odd, in pixels)
    pub block_size: u32,
    /// Subtracted from the local mean before thresholding
    pub threshold_c: f64,
    /// Morphological closing kernel size in pixels
    pub closing_kernel: u32,
    /// Douglas-Peucker tolerance as a fraction of contour perimeter
    pub polygon_epsilon: f64,
}

impl Default for ToolkitParams {
    fn default() -> Self {
        Self {
            blur_kernel: 5,
            canny_low: 50.0,
            canny_high: 150.0,
            hough_rho: 1.0,
            hough_theta: std::f64::consts::PI / 180.0,
            hough_threshold: 50,
            min_line_length: 50.0,
            max_line_gap: 10.0,
            block_size: 11,
            threshold_c: 2.0,
            closing_kernel: 5,
            polygon_epsilon: 0.02,
        }
    }
}

/// Near-duplicate segment detection
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DedupConfig {
    /// Maximum endpoint distance for two segments to be the same edge
    pub merge_radius: f64,
    /// Tolerance on |cross| of unit directions
    pub parallel_epsilon: f64,
}

impl Default for DedupConfig {
    fn default() -> Self {
        Self {
            merge_radius: 10.0,
            parallel_epsilon: 1e-2,
        }
    }
}

/// Which classifier gate runs first
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum GatePrecedence {
    /// Elongation decides before size: a 5x100 box is a wall
    #[default]
    AspectFirst,
    /// Size decides before elongation: a 5x100 box is a door
    SizeFirst,
}

impl FromStr for GatePrecedence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "aspect-first" | "aspect" => Ok(GatePrecedence::AspectFirst),
            "size-first" | "size" => Ok(GatePrecedence::SizeFirst),
            other => Err(format!("unknown gate precedence '{}'", other)),
        }
    }
}

/// Bounding-box classifier thresholds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Boxes narrower or shorter than this are doors
    pub size_threshold: f64,
    /// Boxes more elongated than this ratio are walls
    pub aspect_ratio: f64,
    pub precedence: GatePrecedence,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            size_threshold: 20.0,
            aspect_ratio: 3.0,
            precedence: GatePrecedence::AspectFirst,
        }
    }
}

/// Values used to complete wall records that only carry endpoints
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WallDefaults {
    pub height: f64,
    pub door_width: f64,
    pub door_height: f64,
}

impl Default for WallDefaults {
    fn default() -> Self {
        Self {
            height: DEFAULT_WALL_HEIGHT,
            door_width: DEFAULT_DOOR_WIDTH,
            door_height: DEFAULT_DOOR_HEIGHT,
        }
    }
}

/// Full pipeline configuration
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub toolkit: ToolkitParams,
    pub dedup: DedupConfig,
    pub classifier: ClassifierConfig,
    pub walls: WallDefaults,
    pub synthesis: SynthesisConfig,
}

impl PipelineConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` returns for each
    /// `BLUEPRINT_*` key. Unparseable values are ignored with a warning.
    pub fn from_lookup<F: Fn(&str) -> Option<String>>(lookup: F) -> Self {
        let mut config = Self::default();

        let t = &mut config.toolkit;
        override_from(&lookup, "BLUEPRINT_BLUR_KERNEL", &mut t.blur_kernel);
        override_from(&lookup, "BLUEPRINT_CANNY_LOW", &mut t.canny_low);
        override_from(&lookup, "BLUEPRINT_CANNY_HIGH", &mut t.canny_high);
        override_from(&lookup, "BLUEPRINT_HOUGH_THRESHOLD", &mut t.hough_threshold);
        override_from(&lookup, "BLUEPRINT_MIN_LINE_LENGTH", &mut t.min_line_length);
        override_from(&lookup, "BLUEPRINT_MAX_LINE_GAP", &mut t.max_line_gap);
        override_from(&lookup, "BLUEPRINT_BLOCK_SIZE", &mut t.block_size);
        override_from(&lookup, "BLUEPRINT_THRESHOLD_C", &mut t.threshold_c);
        override_from(&lookup, "BLUEPRINT_CLOSING_KERNEL", &mut t.closing_kernel);

        let d = &mut config.dedup;
        override_from(&lookup, "BLUEPRINT_MERGE_RADIUS", &mut d.merge_radius);
        override_from(&lookup, "BLUEPRINT_PARALLEL_EPSILON", &mut d.parallel_epsilon);

        let c = &mut config.classifier;
        override_from(&lookup, "BLUEPRINT_SIZE_THRESHOLD", &mut c.size_threshold);
        override_from(&lookup, "BLUEPRINT_ASPECT_RATIO", &mut c.aspect_ratio);
        override_from(&lookup, "BLUEPRINT_GATE_PRECEDENCE", &mut c.precedence);

        let w = &mut config.walls;
        override_from(&lookup, "BLUEPRINT_WALL_HEIGHT", &mut w.height);
        override_from(&lookup, "BLUEPRINT_DOOR_WIDTH", &mut w.door_width);
        override_from(&lookup, "BLUEPRINT_DOOR_HEIGHT", &mut w.door_height);

        let s = &mut config.synthesis;
        override_from(&lookup, "BLUEPRINT_SCALE", &mut s.scale);
        override_from(&lookup, "BLUEPRINT_WALL_THICKNESS", &mut s.wall_thickness);
        override_from(&lookup, "BLUEPRINT_SLAB_THICKNESS", &mut s.slab_thickness);

        config
    }
}

fn override_from<F, T>(lookup: &F, key: &str, target: &mut T)
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    if let Some(raw) = lookup(key) {
        match raw.trim().parse() {
            Ok(value) => *target = value,
            Err(_) => tracing::warn!(key, value = %raw, "ignoring unparseable setting"),
        }
    }
}
