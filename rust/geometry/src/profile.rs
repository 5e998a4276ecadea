// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D elevation profiles
//!
//! A wall is modelled as an elevation profile in its own (u, z) plane:
//! `u` runs along the wall, `z` points up. Door cutouts are subtracted at
//! this level and the result is extruded through the wall thickness.

use crate::bool2d::{compute_signed_area, ensure_ccw, ensure_cw};
use nalgebra::Point2;

/// 2D Profile with optional holes
#[derive(Debug, Clone, PartialEq)]
pub struct Profile2D {
    /// Outer boundary (counter-clockwise)
    pub outer: Vec<Point2<f64>>,
    /// Holes (clockwise)
    pub holes: Vec<Vec<Point2<f64>>>,
}

impl Profile2D {
    /// Create a new profile; the outer boundary is reoriented counter-clockwise
    pub fn new(outer: Vec<Point2<f64>>) -> Self {
        Self {
            outer: ensure_ccw(&outer),
            holes: Vec::new(),
        }
    }

    /// Axis-aligned rectangle spanning `min..max`
    pub fn rectangle(min: Point2<f64>, max: Point2<f64>) -> Self {
        Self::new(vec![
            Point2::new(min.x, min.y),
            Point2::new(max.x, min.y),
            Point2::new(max.x, max.y),
            Point2::new(min.x, max.y),
        ])
    }

    /// Add a hole to the profile; it is reoriented clockwise
    pub fn add_hole(&mut self, hole: Vec<Point2<f64>>) {
        self.holes.push(ensure_cw(&hole));
    }

    /// Net area (outer minus holes)
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| compute_signed_area(h).abs()).sum();
        compute_signed_area(&self.outer).abs() - holes
    }

    /// All contours, outer first
    pub fn contours(&self) -> impl Iterator<Item = &Vec<Point2<f64>>> {
        std::iter::once(&self.outer).chain(self.holes.iter())
    }
}
