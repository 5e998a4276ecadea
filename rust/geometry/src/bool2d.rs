// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! 2D Boolean Operations for Elevation-Level Door Subtraction
//!
//! Door cutouts that pass straight through a wall are subtracted from the
//! wall's elevation profile with i_overlay before extrusion. This is exact and
//! keeps the extruded solid a clean closed manifold, which a 3D BSP difference
//! on coplanar boxes does not guarantee.

use crate::error::{Error, Result};
use crate::profile::Profile2D;
use i_overlay::core::fill_rule::FillRule;
use i_overlay::core::overlay_rule::OverlayRule;
use i_overlay::float::single::SingleFloatOverlay;
use nalgebra::Point2;

/// Epsilon for collinearity and duplicate-point checks
const EPSILON_2D: f64 = 1e-9;

/// Minimum area threshold - polygons smaller than this are considered degenerate
const MIN_AREA_THRESHOLD: f64 = 1e-10;

/// Perform 2D boolean difference: profile - cutter
///
/// Returns every resulting piece. A cutter spanning the full profile height
/// splits a wall into two pieces; a cutter that misses the profile returns
/// the profile unchanged.
pub fn subtract_2d(profile: &Profile2D, cutter: &[Point2<f64>]) -> Result<Vec<Profile2D>> {
    if cutter.len() < 3 {
        return Err(Error::DegenerateGeometry(
            "Cutter contour must have at least 3 vertices".to_string(),
        ));
    }

    if profile.outer.len() < 3 {
        return Err(Error::DegenerateGeometry(
            "Profile must have at least 3 vertices".to_string(),
        ));
    }

    let subject = profile_to_paths(profile);
    let clip = vec![contour_to_path(&ensure_ccw(cutter))];

    // Result is Vec<Vec<Vec<[f64; 2]>>> - Vec of shapes, each shape is Vec of contours
    let result = subject.overlay(&clip, OverlayRule::Difference, FillRule::EvenOdd);

    Ok(shapes_to_profiles(&result))
}

/// True when two rectangles `(min, max)` share a region of positive area
pub fn rects_overlap(
    a_min: &Point2<f64>,
    a_max: &Point2<f64>,
    b_min: &Point2<f64>,
    b_max: &Point2<f64>,
) -> bool {
    let w = a_max.x.min(b_max.x) - a_min.x.max(b_min.x);
    let h = a_max.y.min(b_max.y) - a_min.y.max(b_min.y);
    w > EPSILON_2D && h > EPSILON_2D
}

/// Check if a contour is valid (has area, not degenerate)
pub fn is_valid_contour(contour: &[Point2<f64>]) -> bool {
    if contour.len() < 3 {
        return false;
    }

    let area = compute_signed_area(contour).abs();
    area > MIN_AREA_THRESHOLD
}

/// Compute the signed area of a 2D contour
/// Positive = counter-clockwise, Negative = clockwise
pub fn compute_signed_area(contour: &[Point2<f64>]) -> f64 {
    if contour.len() < 3 {
        return 0.0;
    }

    let mut area = 0.0;
    let n = contour.len();

    for i in 0..n {
        let j = (i + 1) % n;
        area += contour[i].x * contour[j].y;
        area -= contour[j].x * contour[i].y;
    }

    area * 0.5
}

/// Ensure contour has counter-clockwise winding (positive area)
pub fn ensure_ccw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) < 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Ensure contour has clockwise winding (for holes)
pub fn ensure_cw(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    if compute_signed_area(contour) > 0.0 {
        contour.iter().rev().cloned().collect()
    } else {
        contour.to_vec()
    }
}

/// Drop repeated points and vertices lying on the segment between their
/// neighbours. Returns the input unchanged if fewer than 3 points would remain.
pub fn simplify_contour(contour: &[Point2<f64>]) -> Vec<Point2<f64>> {
    let mut deduped: Vec<Point2<f64>> = Vec::with_capacity(contour.len());
    for p in contour {
        if deduped
            .last()
            .map_or(true, |q| (p - q).norm() > EPSILON_2D)
        {
            deduped.push(*p);
        }
    }
    while deduped.len() > 1 && (deduped[0] - deduped[deduped.len() - 1]).norm() <= EPSILON_2D {
        deduped.pop();
    }

    // Repeat until stable: removing one vertex can make its neighbour collinear
    loop {
        let n = deduped.len();
        if n <= 3 {
            break;
        }
        let before = n;
        let mut result = Vec::with_capacity(n);
        for i in 0..n {
            let prev = &deduped[(i + n - 1) % n];
            let curr = &deduped[i];
            let next = &deduped[(i + 1) % n];

            let cross =
                (curr.x - prev.x) * (next.y - prev.y) - (curr.y - prev.y) * (next.x - prev.x);
            let scale = (next - prev).norm().max(1.0);
            if cross.abs() > EPSILON_2D * scale {
                result.push(*curr);
            }
        }
        if result.len() < 3 {
            return contour.to_vec();
        }
        deduped = result;
        if deduped.len() == before {
            break;
        }
    }

    deduped
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

/// Convert Profile2D to i_overlay path format
fn profile_to_paths(profile: &Profile2D) -> Vec<Vec<[f64; 2]>> {
    let mut paths = Vec::with_capacity(1 + profile.holes.len());
    paths.push(contour_to_path(&ensure_ccw(&profile.outer)));
    for hole in &profile.holes {
        paths.push(contour_to_path(&ensure_cw(hole)));
    }
    paths
}

/// Convert a Point2 contour to i_overlay path format
fn contour_to_path(contour: &[Point2<f64>]) -> Vec<[f64; 2]> {
    contour.iter().map(|p| [p.x, p.y]).collect()
}

/// Convert i_overlay result shapes back to profiles
///
/// i_overlay returns Vec<Vec<Vec<[f64; 2]>>> where:
/// - Outer Vec: list of shapes
/// - Middle Vec: list of contours per shape (first is outer, rest are holes)
/// - Inner Vec: list of points per contour
fn shapes_to_profiles(shapes: &[Vec<Vec<[f64; 2]>>]) -> Vec<Profile2D> {
    let mut profiles = Vec::with_capacity(shapes.len());

    for shape in shapes {
        let Some(first) = shape.first() else {
            continue;
        };

        let outer = simplify_contour(&path_to_contour(first));
        if !is_valid_contour(&outer) {
            continue;
        }

        let mut profile = Profile2D::new(outer);
        for contour in shape.iter().skip(1) {
            let hole = simplify_contour(&path_to_contour(contour));
            if is_valid_contour(&hole) {
                profile.add_hole(hole);
            }
        }
        profiles.push(profile);
    }

    profiles
}

fn path_to_contour(path: &[[f64; 2]]) -> Vec<Point2<f64>> {
    path.iter().map(|p| Point2::new(p[0], p[1])).collect()
}
