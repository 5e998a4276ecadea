// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use blueprint_lite_geometry::BooleanOperationWarning;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for recognition operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while reading, recognizing or persisting a blueprint
#[derive(Error, Debug)]
pub enum Error {
    #[error("Source not found: {}", .0.display())]
    SourceNotFound(PathBuf),

    #[error("Schema decode error: {0}")]
    SchemaDecode(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Empty image ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Geometry(#[from] blueprint_lite_geometry::Error),
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::SchemaDecode(e.to_string())
    }
}

/// Non-fatal problem scoped to a single primitive or wall
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Warning {
    #[error("Skipped segment {index}: {reason}")]
    SkippedSegment { index: usize, reason: String },

    #[error("Skipped contour {index}: {reason}")]
    SkippedContour { index: usize, reason: String },

    #[error("Skipped object {index}: {reason}")]
    SkippedObject { index: usize, reason: String },

    #[error("Wall {index}: {reason}")]
    InvalidWall { index: usize, reason: String },

    #[error("Wall {index}: {warning}")]
    WallCutout {
        index: usize,
        warning: BooleanOperationWarning,
    },
}
