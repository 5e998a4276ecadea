// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Wall synthesis
//!
//! Turns a [`WallSpec`] (two plan endpoints, a height and an optional door)
//! into a 3D solid. The wall is an oriented box along the segment; a door
//! becomes a second box that is subtracted through a [`SolidKernel`]. A
//! failed cut never drops the wall: the uncut solid is returned together
//! with a [`BooleanOperationWarning`].

use crate::csg::{DefaultKernel, SolidKernel};
use crate::error::{BooleanOperationWarning, Error, Result};
use crate::extrusion::extrude_elevation;
use crate::mesh::WallMesh;
use crate::profile::Profile2D;
use crate::solid::{ElevationFrame, OrientedBox};
use nalgebra::{Point2, Point3};
use serde::{Deserialize, Serialize};

pub const DEFAULT_WALL_HEIGHT: f64 = 3.0;
pub const DEFAULT_DOOR_WIDTH: f64 = 1.0;
pub const DEFAULT_DOOR_HEIGHT: f64 = 2.5;
pub const DEFAULT_WALL_THICKNESS: f64 = 0.2;
pub const DEFAULT_SLAB_THICKNESS: f64 = 10.0;

/// Geometric tuning for wall and slab synthesis
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SynthesisConfig {
    /// Plan units to world units, applied to every coordinate and dimension
    pub scale: f64,
    pub wall_thickness: f64,
    /// Extrusion height of classified-object slabs
    pub slab_thickness: f64,
}

impl Default for SynthesisConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            wall_thickness: DEFAULT_WALL_THICKNESS,
            slab_thickness: DEFAULT_SLAB_THICKNESS,
        }
    }
}

/// A straight wall with an optional door
#[derive(Debug, Clone, PartialEq)]
pub struct WallSpec {
    pub start: Point2<f64>,
    pub end: Point2<f64>,
    pub height: f64,
    /// Plan point that, together with `start`, places the door center
    pub door_position: Option<Point2<f64>>,
    pub door_width: f64,
    pub door_height: f64,
}

impl WallSpec {
    pub fn new(start: Point2<f64>, end: Point2<f64>, height: f64) -> Self {
        Self {
            start,
            end,
            height,
            door_position: None,
            door_width: DEFAULT_DOOR_WIDTH,
            door_height: DEFAULT_DOOR_HEIGHT,
        }
    }

    pub fn with_door(mut self, position: Point2<f64>, width: f64, height: f64) -> Self {
        self.door_position = Some(position);
        self.door_width = width;
        self.door_height = height;
        self
    }

    #[inline]
    pub fn length(&self) -> f64 {
        (self.end - self.start).norm()
    }

    /// Orientation of start→end, radians
    #[inline]
    pub fn angle(&self) -> f64 {
        let d = self.end - self.start;
        d.y.atan2(d.x)
    }

    #[inline]
    pub fn midpoint(&self) -> Point2<f64> {
        nalgebra::center(&self.start, &self.end)
    }

    pub fn validate(&self) -> Result<()> {
        if !(self.height > 0.0) || !self.height.is_finite() {
            return Err(Error::InvalidWallGeometry(format!(
                "height must be positive, got {}",
                self.height
            )));
        }
        let length = self.length();
        if !(length > 0.0) || !length.is_finite() {
            return Err(Error::InvalidWallGeometry(format!(
                "wall from ({}, {}) to ({}, {}) has zero length",
                self.start.x, self.start.y, self.end.x, self.end.y
            )));
        }
        if self.door_position.is_some() && !(self.door_width > 0.0 && self.door_height > 0.0) {
            return Err(Error::InvalidWallGeometry(format!(
                "door dimensions must be positive, got {} x {}",
                self.door_width, self.door_height
            )));
        }
        Ok(())
    }

    /// The uncut wall solid in world units
    pub fn wall_box(&self, config: &SynthesisConfig) -> OrientedBox {
        let s = config.scale;
        let mid = self.midpoint();
        OrientedBox::new(
            Point3::new(mid.x * s, mid.y * s, self.height * s * 0.5),
            self.length() * s,
            config.wall_thickness * s,
            self.height * s,
            self.angle(),
        )
    }

    /// The door cutter in world units, if the wall has a door
    pub fn door_box(&self, config: &SynthesisConfig) -> Option<OrientedBox> {
        let s = config.scale;
        self.door_position.map(|door| {
            let center = nalgebra::center(&self.start, &door);
            OrientedBox::new(
                Point3::new(center.x * s, center.y * s, self.door_height * s * 0.5),
                self.door_width * s,
                config.wall_thickness * s,
                self.door_height * s,
                self.angle(),
            )
        })
    }
}

/// Result of synthesizing one wall
#[derive(Debug, Clone)]
pub struct WallOutcome {
    pub mesh: WallMesh,
    /// Set when the door cut failed and `mesh` is the uncut wall
    pub warning: Option<BooleanOperationWarning>,
}

/// Synthesize a wall with the default kernel
pub fn synthesize_wall(spec: &WallSpec, config: &SynthesisConfig) -> Result<WallOutcome> {
    synthesize_wall_with(&DefaultKernel::default(), spec, config)
}

/// Synthesize a wall with an explicit kernel
pub fn synthesize_wall_with<K: SolidKernel + ?Sized>(
    kernel: &K,
    spec: &WallSpec,
    config: &SynthesisConfig,
) -> Result<WallOutcome> {
    spec.validate()?;

    let host = spec.wall_box(config);
    let Some(cutter) = spec.door_box(config) else {
        return Ok(WallOutcome {
            mesh: host.to_mesh()?,
            warning: None,
        });
    };

    match kernel.difference(&host, &cutter) {
        Ok(mesh) => Ok(WallOutcome {
            mesh,
            warning: None,
        }),
        Err(e) => {
            tracing::warn!(error = %e, "door cutout failed, emitting uncut wall");
            Ok(WallOutcome {
                mesh: host.to_mesh()?,
                warning: Some(BooleanOperationWarning::new(e.to_string())),
            })
        }
    }
}

/// Outcome of a batch; one entry per input wall, in order
#[derive(Debug, Default)]
pub struct WallBatch {
    pub results: Vec<Result<WallOutcome>>,
}

impl WallBatch {
    /// Meshes of every wall that synthesized, with their input index
    pub fn meshes(&self) -> impl Iterator<Item = (usize, &WallMesh)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().ok().map(|o| (i, &o.mesh)))
    }

    pub fn warnings(&self) -> impl Iterator<Item = (usize, &BooleanOperationWarning)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().ok().and_then(|o| o.warning.as_ref()).map(|w| (i, w)))
    }

    pub fn failures(&self) -> impl Iterator<Item = (usize, &Error)> {
        self.results
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().err().map(|e| (i, e)))
    }

    /// Every successful wall merged into one mesh
    pub fn merged(&self) -> WallMesh {
        let mut mesh = WallMesh::new();
        for (_, m) in self.meshes() {
            mesh.merge(m);
        }
        mesh
    }
}

/// Synthesize every wall; a failing wall never aborts the batch
pub fn synthesize_walls(specs: &[WallSpec], config: &SynthesisConfig) -> WallBatch {
    let kernel = DefaultKernel::default();
    let results: Vec<Result<WallOutcome>> = specs
        .iter()
        .enumerate()
        .map(|(i, spec)| {
            let result = synthesize_wall_with(&kernel, spec, config);
            if let Err(e) = &result {
                tracing::warn!(wall = i, error = %e, "skipping wall");
            }
            result
        })
        .collect();

    tracing::debug!(walls = specs.len(), "synthesized wall batch");
    WallBatch { results }
}

/// Extrude an axis-aligned plan rectangle upward by `thickness`
///
/// `min`/`max` are plan corners before scaling; the slab sits on z = 0.
pub fn slab_for_box(
    min: Point2<f64>,
    max: Point2<f64>,
    thickness: f64,
    scale: f64,
) -> Result<WallMesh> {
    let (w, h) = (max.x - min.x, max.y - min.y);
    if !(w > 0.0 && h > 0.0) {
        return Err(Error::DegenerateGeometry(format!(
            "slab footprint {} x {} is empty",
            w, h
        )));
    }
    if !(thickness > 0.0) {
        return Err(Error::DegenerateGeometry(format!(
            "slab thickness must be positive, got {}",
            thickness
        )));
    }

    // Elevation along x, swept along y
    let frame = ElevationFrame::new(Point3::origin(), 0.0);
    let profile = Profile2D::rectangle(
        Point2::new(min.x * scale, 0.0),
        Point2::new(max.x * scale, thickness * scale),
    );
    extrude_elevation(&profile, &frame, min.y * scale, max.y * scale)
}
