// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Extrusion operations - converting elevation profiles to closed wall solids

use crate::bool2d::compute_signed_area;
use crate::error::{Error, Result};
use crate::mesh::WallMesh;
use crate::profile::Profile2D;
use crate::solid::ElevationFrame;
use crate::triangulation::triangulate_contours;
use nalgebra::Point2;

/// Extrude an elevation profile across the wall thickness
///
/// The profile is drawn in the frame's (u, z) plane and swept along `v` from
/// `v_min` to `v_max`. Vertices are shared between caps and sides so the
/// result is a closed manifold with outward faces. Caps without holes stay a
/// single polygon face; caps with holes are triangulated.
pub fn extrude_elevation(
    profile: &Profile2D,
    frame: &ElevationFrame,
    v_min: f64,
    v_max: f64,
) -> Result<WallMesh> {
    if v_max - v_min <= 0.0 {
        return Err(Error::DegenerateGeometry(
            "Extrusion depth must be positive".to_string(),
        ));
    }
    if profile.outer.len() < 3 {
        return Err(Error::DegenerateGeometry(
            "Profile must have at least 3 vertices".to_string(),
        ));
    }

    let contours: Vec<&Vec<Point2<f64>>> = profile.contours().collect();
    let ring_size: usize = contours.iter().map(|c| c.len()).sum();
    let mut mesh = WallMesh::with_capacity(ring_size * 2, ring_size + 2);

    // Back ring (v_min) then front ring (v_max), contour by contour
    let mut back = Vec::with_capacity(ring_size);
    let mut front = Vec::with_capacity(ring_size);
    for p in contours.iter().flat_map(|c| c.iter()) {
        back.push(mesh.add_vertex(frame.to_world(p.x, v_min, p.y)));
    }
    for p in contours.iter().flat_map(|c| c.iter()) {
        front.push(mesh.add_vertex(frame.to_world(p.x, v_max, p.y)));
    }

    if profile.holes.is_empty() {
        // CCW in (u, z) faces -v
        mesh.add_face(back.iter().copied());
        mesh.add_face(front.iter().rev().copied());
    } else {
        let flat: Vec<Point2<f64>> = contours.iter().flat_map(|c| c.iter().copied()).collect();
        let indices = triangulate_contours(&profile.outer, &profile.holes)?;
        for tri in indices.chunks_exact(3) {
            let (a, b, c) = (tri[0], tri[1], tri[2]);
            let (a, b, c) = if compute_signed_area(&[flat[a], flat[b], flat[c]]) >= 0.0 {
                (a, b, c)
            } else {
                (a, c, b)
            };
            mesh.add_face([back[a], back[b], back[c]]);
            mesh.add_face([front[a], front[c], front[b]]);
        }
    }

    let mut offset = 0;
    for contour in &contours {
        let n = contour.len();
        for i in 0..n {
            let i0 = offset + i;
            let i1 = offset + (i + 1) % n;
            mesh.add_face([back[i0], front[i0], front[i1], back[i1]]);
        }
        offset += n;
    }

    Ok(mesh)
}
