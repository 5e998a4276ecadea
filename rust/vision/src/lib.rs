// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint recognition
//!
//! This crate turns a raster floor plan into classified 2D primitives:
//! 1. Optional text suppression (OCR boxes painted out)
//! 2. Line segments (Canny + probabilistic Hough) and simplified contours
//!    (adaptive threshold + border following + Douglas-Peucker)
//! 3. Near-duplicate segment removal
//! 4. Bounding-box classification into walls, doors, shapes and lines
//! 5. JSON interchange for segments, objects and wall specifications
//!
//! Wall solids are synthesized by `blueprint-lite-geometry`; the helpers in
//! [`pipeline`] bridge recognized primitives to wall specifications and slabs.
//!
//! # Usage
//!
//! ```rust,ignore
//! use blueprint_lite_vision::{BlueprintPipeline, PipelineConfig, persistence};
//!
//! let pipeline = BlueprintPipeline::new(PipelineConfig::from_env());
//! let report = pipeline.process_file("plan.png")?;
//! persistence::save_objects("detected_objects.json", &report.objects)?;
//! ```

pub mod classifier;
pub mod config;
pub mod dedup;
pub mod error;
pub mod extractor;
pub mod persistence;
pub mod pipeline;
pub mod text_mask;
pub mod toolkit;
pub mod types;

// Re-export commonly used types and functions
pub use classifier::{classify_all, classify_box, classify_contour, classify_segment};
pub use config::{
    ClassifierConfig, DedupConfig, GatePrecedence, PipelineConfig, ToolkitParams, WallDefaults,
};
pub use dedup::{are_parallel, are_proximate, dedup_segments, is_duplicate};
pub use error::{Error, Result, Warning};
pub use extractor::{Extraction, SegmentExtractor};
pub use pipeline::{
    export_wall_batch, load_grayscale, slabs_from_objects, wall_batch_warnings,
    wall_specs_from_segments, BlueprintPipeline, BlueprintReport,
};
pub use text_mask::{apply_text_mask, RegionTextMask, TextMasker};
pub use toolkit::{ImageprocToolkit, VisionToolkit};
pub use types::{BoundingBox, ClassifiedObject, Contour, LineSegment, ObjectClass, Point2D};
