// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Solid subtraction kernels
//!
//! A [`SolidKernel`] subtracts one oriented box from another. Two kernels are
//! provided:
//!
//! - [`ProfileKernel`] handles cutters that share the host's orientation and
//!   pass fully through its thickness (every door in a wall). The cut is an
//!   exact 2D difference on the elevation profile followed by extrusion, so
//!   the result is always a closed manifold.
//! - [`MeshKernel`] is a general BSP difference via csgrs. Output faces are
//!   welded back into a shared-vertex [`WallMesh`] but may carry T-junctions.
//!
//! [`DefaultKernel`] tries the profile kernel first and falls back to the
//! mesh kernel for cuts it does not support.

use crate::bool2d::{rects_overlap, subtract_2d};
use crate::error::{Error, Result};
use crate::extrusion::extrude_elevation;
use crate::mesh::WallMesh;
use crate::solid::OrientedBox;
use crate::triangulation::newell_normal;
use csgrs::mesh::{polygon::Polygon, vertex::Vertex, Mesh as CSGMesh};
use csgrs::traits::CSG;
use nalgebra::{Point2, Point3};
use rustc_hash::FxHashMap;

/// Angular tolerance (radians, as |sin|) for treating two yaws as parallel
const YAW_EPSILON: f64 = 1e-9;

/// Linear tolerance for through-cut and overlap checks
const LENGTH_EPSILON: f64 = 1e-9;

/// Grid used to weld csgrs output vertices
const WELD_QUANTUM: f64 = 1e-7;

/// Boolean difference `host - cutter` between oriented boxes
pub trait SolidKernel {
    fn difference(&self, host: &OrientedBox, cutter: &OrientedBox) -> Result<WallMesh>;
}

/// Exact elevation-profile kernel for same-orientation through-cuts
#[derive(Debug, Clone, Copy, Default)]
pub struct ProfileKernel;

impl SolidKernel for ProfileKernel {
    fn difference(&self, host: &OrientedBox, cutter: &OrientedBox) -> Result<WallMesh> {
        if (host.yaw - cutter.yaw).sin().abs() > YAW_EPSILON {
            return Err(Error::UnsupportedCut(format!(
                "cutter yaw {:.4} is not parallel to host yaw {:.4}",
                cutter.yaw, host.yaw
            )));
        }

        let frame = host.frame();
        let corners: Vec<Point3<f64>> = cutter
            .corners()
            .iter()
            .map(|c| frame.to_local(c))
            .collect();
        let (mut cmin, mut cmax) = (corners[0], corners[0]);
        for c in &corners[1..] {
            cmin = cmin.inf(c);
            cmax = cmax.sup(c);
        }

        let (v_min, v_max) = host.depth_range();
        if cmin.y > v_min + LENGTH_EPSILON || cmax.y < v_max - LENGTH_EPSILON {
            return Err(Error::UnsupportedCut(
                "cutter does not pass through the host thickness".to_string(),
            ));
        }

        let (hmin, hmax) = host.elevation_rect();
        let cut_min = Point2::new(cmin.x, cmin.z);
        let cut_max = Point2::new(cmax.x, cmax.z);
        if !rects_overlap(&hmin, &hmax, &cut_min, &cut_max) {
            tracing::debug!("cutter misses host elevation, returning host unchanged");
            return host.to_mesh();
        }

        let profile = crate::profile::Profile2D::rectangle(hmin, hmax);
        let cutter_rect = [
            Point2::new(cut_min.x, cut_min.y),
            Point2::new(cut_max.x, cut_min.y),
            Point2::new(cut_max.x, cut_max.y),
            Point2::new(cut_min.x, cut_max.y),
        ];
        let pieces = subtract_2d(&profile, &cutter_rect)?;
        if pieces.is_empty() {
            return Err(Error::BooleanOperation(
                "cutter removes the entire host".to_string(),
            ));
        }

        let mut mesh = WallMesh::new();
        for piece in &pieces {
            mesh.merge(&extrude_elevation(piece, &frame, v_min, v_max)?);
        }
        Ok(mesh)
    }
}

/// General BSP kernel backed by csgrs
#[derive(Debug, Clone, Copy, Default)]
pub struct MeshKernel;

impl MeshKernel {
    /// Convert a polygonal mesh to csgrs format, one csgrs polygon per face
    fn to_csgrs(mesh: &WallMesh) -> CSGMesh<()> {
        let mut polygons = Vec::with_capacity(mesh.face_count());

        for face in &mesh.faces {
            let points = mesh.face_points(face);
            let normal = match newell_normal(&points).try_normalize(1e-10) {
                Some(n) => n,
                None => continue, // Skip degenerate faces to avoid NaN propagation
            };
            let vertices = points.iter().map(|p| Vertex::new(*p, normal)).collect();
            polygons.push(Polygon::new(vertices, None));
        }

        CSGMesh::from_polygons(&polygons, None)
    }

    /// Convert csgrs output back, welding coincident vertices
    fn from_csgrs(csg_mesh: &CSGMesh<()>) -> WallMesh {
        let mut mesh = WallMesh::with_capacity(
            csg_mesh.polygons.len() * 4,
            csg_mesh.polygons.len(),
        );
        let mut welded: FxHashMap<(i64, i64, i64), u32> = FxHashMap::default();

        for polygon in &csg_mesh.polygons {
            if polygon.vertices.len() < 3 {
                continue;
            }

            let mut face: Vec<u32> = Vec::with_capacity(polygon.vertices.len());
            for v in &polygon.vertices {
                let p = Point3::new(v.pos[0], v.pos[1], v.pos[2]);
                let key = (
                    (p.x / WELD_QUANTUM).round() as i64,
                    (p.y / WELD_QUANTUM).round() as i64,
                    (p.z / WELD_QUANTUM).round() as i64,
                );
                let index = *welded.entry(key).or_insert_with(|| mesh.add_vertex(p));
                if face.last() != Some(&index) {
                    face.push(index);
                }
            }
            if face.len() > 1 && face.first() == face.last() {
                face.pop();
            }
            if face.len() >= 3 {
                mesh.add_face(face);
            }
        }

        mesh
    }
}

impl SolidKernel for MeshKernel {
    fn difference(&self, host: &OrientedBox, cutter: &OrientedBox) -> Result<WallMesh> {
        let host_csg = Self::to_csgrs(&host.to_mesh()?);
        let cutter_csg = Self::to_csgrs(&cutter.to_mesh()?);

        let result = host_csg.difference(&cutter_csg);
        let mesh = Self::from_csgrs(&result);

        if mesh.is_empty() {
            return Err(Error::BooleanOperation(
                "CSG difference produced no geometry".to_string(),
            ));
        }
        Ok(mesh)
    }
}

/// Profile kernel with a csgrs fallback for unsupported cuts
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultKernel {
    pub primary: ProfileKernel,
    pub fallback: MeshKernel,
}

impl SolidKernel for DefaultKernel {
    fn difference(&self, host: &OrientedBox, cutter: &OrientedBox) -> Result<WallMesh> {
        match self.primary.difference(host, cutter) {
            Err(Error::UnsupportedCut(reason)) => {
                tracing::debug!(%reason, "falling back to mesh kernel");
                self.fallback.difference(host, cutter)
            }
            other => other,
        }
    }
}
