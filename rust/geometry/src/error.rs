// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use thiserror::Error;

/// Result type for geometry operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur during wall synthesis
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid wall geometry: {0}")]
    InvalidWallGeometry(String),

    #[error("Degenerate geometry: {0}")]
    DegenerateGeometry(String),

    #[error("Boolean operation failed: {0}")]
    BooleanOperation(String),

    #[error("Cut not supported by this kernel: {0}")]
    UnsupportedCut(String),

    #[error("Triangulation failed: {0}")]
    TriangulationError(String),

    #[error("Mesh sink I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Non-fatal failure of a door cutout. The wall is still emitted, uncut.
#[derive(Error, Debug, Clone, PartialEq)]
#[error("Door cutout skipped: {reason}")]
pub struct BooleanOperationWarning {
    pub reason: String,
}

impl BooleanOperationWarning {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}
