// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Face triangulation
//!
//! Wall caps with door holes and arbitrary polygon faces are split into
//! triangles with earcutr. Planar faces are first flattened into a 2D basis
//! spanned inside their own plane.

use crate::{Error, Point2, Point3, Result, Vector3};

/// Triangulate an outer contour with optional hole contours.
///
/// Indices refer to the concatenation `outer ++ holes[0] ++ holes[1] ...`.
/// Holes with fewer than three points are ignored but still counted, so the
/// caller's flat vertex list stays aligned.
pub fn triangulate_contours(outer: &[Point2<f64>], holes: &[Vec<Point2<f64>>]) -> Result<Vec<usize>> {
    if outer.len() < 3 {
        return Err(Error::TriangulationError(format!(
            "contour has {} points, need at least 3",
            outer.len()
        )));
    }

    if outer.len() == 3 && holes.is_empty() {
        return Ok(vec![0, 1, 2]);
    }

    let total = outer.len() + holes.iter().map(Vec::len).sum::<usize>();
    let mut flat = Vec::with_capacity(total * 2);
    flat.extend(outer.iter().flat_map(|p| [p.x, p.y]));

    let mut hole_starts = Vec::with_capacity(holes.len());
    let mut skipped: Vec<(usize, usize)> = Vec::new();
    let mut offset = outer.len();
    for hole in holes {
        if hole.len() >= 3 {
            hole_starts.push(flat.len() / 2);
            flat.extend(hole.iter().flat_map(|p| [p.x, p.y]));
        } else {
            skipped.push((offset, hole.len()));
        }
        offset += hole.len();
    }

    let mut indices = earcutr::earcut(&flat, &hole_starts, 2)
        .map_err(|e| Error::TriangulationError(format!("{:?}", e)))?;

    // Shift indices past any dropped hole so they address the caller's layout
    if !skipped.is_empty() {
        for index in &mut indices {
            let mut shifted = *index;
            for &(start, len) in &skipped {
                if shifted >= start {
                    shifted += len;
                }
            }
            *index = shifted;
        }
    }

    Ok(indices)
}

/// Newell normal of a planar polygon, normalized.
///
/// Returns the zero vector for collinear or repeated points so callers can
/// detect and drop degenerate faces.
pub fn newell_normal(points: &[Point3<f64>]) -> Vector3<f64> {
    let n = points.len();
    if n < 3 {
        return Vector3::zeros();
    }

    let mut normal = Vector3::<f64>::zeros();
    for i in 0..n {
        let a = &points[i];
        let b = &points[(i + 1) % n];
        normal.x += (a.y - b.y) * (a.z + b.z);
        normal.y += (a.z - b.z) * (a.x + b.x);
        normal.z += (a.x - b.x) * (a.y + b.y);
    }

    normal.try_normalize(1e-12).unwrap_or_else(Vector3::zeros)
}

/// Express points of a plane with the given unit normal in a 2D basis of
/// that plane. The basis is right-handed around the normal, so a loop that
/// is CCW around `normal` stays CCW in 2D.
pub fn flatten_to_plane(points: &[Point3<f64>], normal: &Vector3<f64>) -> Vec<Point2<f64>> {
    let Some(origin) = points.first() else {
        return Vec::new();
    };

    // Least aligned world axis keeps the cross product well conditioned
    let (ax, ay, az) = (normal.x.abs(), normal.y.abs(), normal.z.abs());
    let seed = if ax <= ay && ax <= az {
        Vector3::x()
    } else if ay <= az {
        Vector3::y()
    } else {
        Vector3::z()
    };
    let u = seed.cross(normal).normalize();
    let v = normal.cross(&u);

    points
        .iter()
        .map(|p| {
            let d = p - origin;
            Point2::new(d.dot(&u), d.dot(&v))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square(min: f64, max: f64) -> Vec<Point2<f64>> {
        vec![
            Point2::new(min, min),
            Point2::new(max, min),
            Point2::new(max, max),
            Point2::new(min, max),
        ]
    }

    fn triangle_area(points: &[Point2<f64>], tri: &[usize]) -> f64 {
        let (a, b, c) = (points[tri[0]], points[tri[1]], points[tri[2]]);
        ((b - a).perp(&(c - a)) / 2.0).abs()
    }

    #[test]
    fn test_quad_gives_two_triangles() {
        let indices = triangulate_contours(&square(0.0, 1.0), &[]).unwrap();
        assert_eq!(indices.len(), 6);
    }

    #[test]
    fn test_too_few_points() {
        let outer = vec![Point2::new(0.0, 0.0), Point2::new(1.0, 0.0)];
        assert!(triangulate_contours(&outer, &[]).is_err());
    }

    #[test]
    fn test_hole_area_is_excluded() {
        let outer = square(0.0, 10.0);
        let hole = square(3.0, 7.0);
        let indices = triangulate_contours(&outer, &[hole.clone()]).unwrap();

        let flat: Vec<Point2<f64>> = outer.iter().chain(hole.iter()).copied().collect();
        let area: f64 = indices.chunks_exact(3).map(|t| triangle_area(&flat, t)).sum();
        assert!((area - 84.0).abs() < 1e-9);
    }

    #[test]
    fn test_short_hole_keeps_index_layout() {
        let outer = square(0.0, 10.0);
        let stub = vec![Point2::new(1.0, 1.0)];
        let hole = square(3.0, 7.0);
        let indices = triangulate_contours(&outer, &[stub.clone(), hole.clone()]).unwrap();

        let flat: Vec<Point2<f64>> = outer
            .iter()
            .chain(stub.iter())
            .chain(hole.iter())
            .copied()
            .collect();
        assert!(indices.iter().all(|&i| i != 4));
        let area: f64 = indices.chunks_exact(3).map(|t| triangle_area(&flat, t)).sum();
        assert!((area - 84.0).abs() < 1e-9);
    }

    #[test]
    fn test_newell_normal_of_vertical_face() {
        // Face in the x/z plane, CCW seen from -y
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 1.0),
            Point3::new(0.0, 0.0, 1.0),
        ];
        let normal = newell_normal(&points);
        assert!((normal - Vector3::new(0.0, -1.0, 0.0)).norm() < 1e-12);
    }

    #[test]
    fn test_newell_normal_degenerate() {
        let points = vec![
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(1.0, 0.0, 0.0),
            Point3::new(2.0, 0.0, 0.0),
        ];
        assert_eq!(newell_normal(&points), Vector3::zeros());
    }

    #[test]
    fn test_flatten_keeps_orientation() {
        let points = vec![
            Point3::new(0.0, 5.0, 0.0),
            Point3::new(2.0, 5.0, 0.0),
            Point3::new(2.0, 5.0, 3.0),
            Point3::new(0.0, 5.0, 3.0),
        ];
        let normal = newell_normal(&points);
        let flat = flatten_to_plane(&points, &normal);

        let signed: f64 = (0..flat.len())
            .map(|i| {
                let a = flat[i];
                let b = flat[(i + 1) % flat.len()];
                a.x * b.y - b.x * a.y
            })
            .sum::<f64>()
            / 2.0;
        assert!((signed - 6.0).abs() < 1e-9);
    }
}
