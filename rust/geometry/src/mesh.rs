// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh data structures
//!
//! Two representations live here:
//! - [`WallMesh`]: indexed polygon mesh produced by the wall synthesizer.
//!   Vertices are shared between faces so the boundary can be checked for
//!   closedness. Faces are counter-clockwise when seen from outside.
//! - [`Mesh`]: flat triangle buffers (positions, normals, indices) for sinks
//!   that only understand triangles.

use crate::error::{Error, Result};
use crate::triangulation::{flatten_to_plane, newell_normal, triangulate_contours};
use nalgebra::{Point3, Vector3};
use rustc_hash::FxHashMap;
use smallvec::SmallVec;

/// One polygonal face: a closed loop of vertex indices
pub type Face = SmallVec<[u32; 4]>;

/// Indexed polygon mesh of a single synthesized solid
#[derive(Debug, Clone, Default, PartialEq)]
pub struct WallMesh {
    /// Vertex positions in world coordinates
    pub vertices: Vec<Point3<f64>>,
    /// Faces as vertex loops, CCW seen from outside
    pub faces: Vec<Face>,
}

impl WallMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Add a vertex and return its index
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>) -> u32 {
        self.vertices.push(position);
        (self.vertices.len() - 1) as u32
    }

    /// Add a face from a loop of vertex indices
    #[inline]
    pub fn add_face<I: IntoIterator<Item = u32>>(&mut self, indices: I) {
        self.faces.push(indices.into_iter().collect());
    }

    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Append another mesh, offsetting its indices
    pub fn merge(&mut self, other: &WallMesh) {
        let offset = self.vertices.len() as u32;
        self.vertices.extend_from_slice(&other.vertices);
        self.faces.extend(
            other
                .faces
                .iter()
                .map(|face| face.iter().map(|&i| i + offset).collect::<Face>()),
        );
    }

    /// Axis-aligned bounds (min, max)
    pub fn bounds(&self) -> (Point3<f64>, Point3<f64>) {
        if self.vertices.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f64::MAX, f64::MAX, f64::MAX);
        let mut max = Point3::new(f64::MIN, f64::MIN, f64::MIN);
        for v in &self.vertices {
            min.x = min.x.min(v.x);
            min.y = min.y.min(v.y);
            min.z = min.z.min(v.z);
            max.x = max.x.max(v.x);
            max.y = max.y.max(v.y);
            max.z = max.z.max(v.z);
        }
        (min, max)
    }

    /// Positions of one face's vertices
    pub fn face_points(&self, face: &Face) -> Vec<Point3<f64>> {
        face.iter().map(|&i| self.vertices[i as usize]).collect()
    }

    /// Unit normal of a face, zero for a degenerate face
    pub fn face_normal(&self, face: &Face) -> Vector3<f64> {
        newell_normal(&self.face_points(face))
    }

    /// Signed enclosed volume. Positive when faces wind outward.
    pub fn signed_volume(&self) -> f64 {
        let mut volume = 0.0;
        for face in &self.faces {
            if face.len() < 3 {
                continue;
            }
            let a = self.vertices[face[0] as usize].coords;
            for k in 1..face.len() - 1 {
                let b = self.vertices[face[k] as usize].coords;
                let c = self.vertices[face[k + 1] as usize].coords;
                volume += a.dot(&b.cross(&c));
            }
        }
        volume / 6.0
    }

    /// True when every directed edge is matched by exactly one opposite edge,
    /// i.e. the faces form a closed, consistently wound 2-manifold boundary.
    pub fn is_closed(&self) -> bool {
        if self.is_empty() {
            return false;
        }

        let mut edges: FxHashMap<(u32, u32), u32> = FxHashMap::default();
        for face in &self.faces {
            let n = face.len();
            if n < 3 {
                return false;
            }
            for k in 0..n {
                let edge = (face[k], face[(k + 1) % n]);
                let count = edges.entry(edge).or_insert(0);
                *count += 1;
                if *count > 1 {
                    return false;
                }
            }
        }

        edges
            .keys()
            .all(|&(a, b)| edges.get(&(b, a)).copied() == Some(1))
    }

    /// Triangulate all faces into flat buffers with per-face normals
    pub fn triangulate(&self) -> Result<Mesh> {
        let mut mesh = Mesh::with_capacity(self.faces.len() * 4, self.faces.len() * 6);

        for face in &self.faces {
            if face.len() < 3 {
                continue;
            }
            let points = self.face_points(face);
            let normal = newell_normal(&points);
            if normal == Vector3::zeros() {
                continue;
            }

            let local = triangulate_contours(&flatten_to_plane(&points, &normal), &[])?;

            let base = mesh.vertex_count() as u32;
            for p in &points {
                mesh.add_vertex(*p, normal);
            }
            for tri in local.chunks_exact(3) {
                let (i0, i1, i2) = (tri[0], tri[1], tri[2]);
                // earcut output winding depends on the projection basis; keep
                // the face's outward orientation
                let e1 = points[i1] - points[i0];
                let e2 = points[i2] - points[i0];
                if e1.cross(&e2).dot(&normal) >= 0.0 {
                    mesh.add_triangle(base + i0 as u32, base + i1 as u32, base + i2 as u32);
                } else {
                    mesh.add_triangle(base + i0 as u32, base + i2 as u32, base + i1 as u32);
                }
            }
        }

        if mesh.is_empty() && !self.faces.is_empty() {
            return Err(Error::TriangulationError(
                "No face produced any triangle".to_string(),
            ));
        }

        Ok(mesh)
    }
}

/// Triangle mesh
#[derive(Debug, Clone)]
pub struct Mesh {
    /// Vertex positions (x, y, z)
    pub positions: Vec<f32>,
    /// Vertex normals (nx, ny, nz)
    pub normals: Vec<f32>,
    /// Triangle indices (i0, i1, i2)
    pub indices: Vec<u32>,
}

impl Mesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            positions: Vec::new(),
            normals: Vec::new(),
            indices: Vec::new(),
        }
    }

    /// Create a mesh with capacity
    pub fn with_capacity(vertex_count: usize, index_count: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_count * 3),
            normals: Vec::with_capacity(vertex_count * 3),
            indices: Vec::with_capacity(index_count),
        }
    }

    /// Add a vertex with normal
    #[inline]
    pub fn add_vertex(&mut self, position: Point3<f64>, normal: Vector3<f64>) {
        self.positions.push(position.x as f32);
        self.positions.push(position.y as f32);
        self.positions.push(position.z as f32);

        self.normals.push(normal.x as f32);
        self.normals.push(normal.y as f32);
        self.normals.push(normal.z as f32);
    }

    /// Add a triangle
    #[inline]
    pub fn add_triangle(&mut self, i0: u32, i1: u32, i2: u32) {
        self.indices.push(i0);
        self.indices.push(i1);
        self.indices.push(i2);
    }

    /// Merge another mesh into this one
    #[inline]
    pub fn merge(&mut self, other: &Mesh) {
        if other.is_empty() {
            return;
        }

        let vertex_offset = (self.positions.len() / 3) as u32;

        self.positions.reserve(other.positions.len());
        self.normals.reserve(other.normals.len());
        self.indices.reserve(other.indices.len());

        self.positions.extend_from_slice(&other.positions);
        self.normals.extend_from_slice(&other.normals);
        self.indices
            .extend(other.indices.iter().map(|&i| i + vertex_offset));
    }

    /// Get vertex count
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len() / 3
    }

    /// Get triangle count
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Calculate bounds (min, max)
    #[inline]
    pub fn bounds(&self) -> (Point3<f32>, Point3<f32>) {
        if self.is_empty() {
            return (Point3::origin(), Point3::origin());
        }

        let mut min = Point3::new(f32::MAX, f32::MAX, f32::MAX);
        let mut max = Point3::new(f32::MIN, f32::MIN, f32::MIN);

        self.positions.chunks_exact(3).for_each(|chunk| {
            let (x, y, z) = (chunk[0], chunk[1], chunk[2]);
            min.x = min.x.min(x);
            min.y = min.y.min(y);
            min.z = min.z.min(z);
            max.x = max.x.max(x);
            max.y = max.y.max(y);
            max.z = max.z.max(z);
        });

        (min, max)
    }
}

impl Default for Mesh {
    fn default() -> Self {
        Self::new()
    }
}
