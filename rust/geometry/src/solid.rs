// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Oriented boxes and the wall-local coordinate frame
//!
//! Every wall solid lives in an [`ElevationFrame`]: `u` runs along the wall,
//! `v` across its thickness and `z` up. The frame is right-handed, so a
//! profile drawn counter-clockwise in (u, z) faces `-v`.

use crate::extrusion::extrude_elevation;
use crate::mesh::WallMesh;
use crate::profile::Profile2D;
use crate::Result;
use nalgebra::{Point2, Point3, Vector3};

/// Wall-local frame rotated by `yaw` about the vertical axis
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ElevationFrame {
    pub origin: Point3<f64>,
    pub yaw: f64,
}

impl ElevationFrame {
    pub fn new(origin: Point3<f64>, yaw: f64) -> Self {
        Self { origin, yaw }
    }

    /// Unit vector along the wall
    #[inline]
    pub fn along(&self) -> Vector3<f64> {
        Vector3::new(self.yaw.cos(), self.yaw.sin(), 0.0)
    }

    /// Unit vector across the wall
    #[inline]
    pub fn across(&self) -> Vector3<f64> {
        Vector3::new(-self.yaw.sin(), self.yaw.cos(), 0.0)
    }

    /// Local (u, v, z) to world
    #[inline]
    pub fn to_world(&self, u: f64, v: f64, z: f64) -> Point3<f64> {
        self.origin + self.along() * u + self.across() * v + Vector3::z() * z
    }

    /// World to local (u, v, z)
    #[inline]
    pub fn to_local(&self, p: &Point3<f64>) -> Point3<f64> {
        let d = p - self.origin;
        Point3::new(d.dot(&self.along()), d.dot(&self.across()), d.z)
    }
}

/// Box rotated by `yaw` about the vertical axis through its center
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct OrientedBox {
    pub center: Point3<f64>,
    /// Extent along the yaw direction
    pub length: f64,
    /// Extent across the yaw direction
    pub depth: f64,
    pub height: f64,
    pub yaw: f64,
}

impl OrientedBox {
    pub fn new(center: Point3<f64>, length: f64, depth: f64, height: f64, yaw: f64) -> Self {
        Self {
            center,
            length,
            depth,
            height,
            yaw,
        }
    }

    /// Frame anchored on the box's footprint center at z = 0
    pub fn frame(&self) -> ElevationFrame {
        ElevationFrame::new(Point3::new(self.center.x, self.center.y, 0.0), self.yaw)
    }

    /// (u, z) rectangle of the box in its own frame
    pub fn elevation_rect(&self) -> (Point2<f64>, Point2<f64>) {
        let half_l = self.length * 0.5;
        let half_h = self.height * 0.5;
        (
            Point2::new(-half_l, self.center.z - half_h),
            Point2::new(half_l, self.center.z + half_h),
        )
    }

    /// (v_min, v_max) of the box in its own frame
    pub fn depth_range(&self) -> (f64, f64) {
        (-self.depth * 0.5, self.depth * 0.5)
    }

    /// The eight world-space corners, bottom ring first
    pub fn corners(&self) -> [Point3<f64>; 8] {
        let frame = self.frame();
        let (min, max) = self.elevation_rect();
        let (v0, v1) = self.depth_range();
        [
            frame.to_world(min.x, v0, min.y),
            frame.to_world(max.x, v0, min.y),
            frame.to_world(max.x, v1, min.y),
            frame.to_world(min.x, v1, min.y),
            frame.to_world(min.x, v0, max.y),
            frame.to_world(max.x, v0, max.y),
            frame.to_world(max.x, v1, max.y),
            frame.to_world(min.x, v1, max.y),
        ]
    }

    pub fn volume(&self) -> f64 {
        self.length * self.depth * self.height
    }

    /// Closed box mesh: 8 vertices, 6 quads
    pub fn to_mesh(&self) -> Result<WallMesh> {
        let (min, max) = self.elevation_rect();
        let (v0, v1) = self.depth_range();
        extrude_elevation(&Profile2D::rectangle(min, max), &self.frame(), v0, v1)
    }
}
