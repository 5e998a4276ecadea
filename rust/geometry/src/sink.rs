// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Mesh sinks - where synthesized solids go

use crate::error::Result;
use crate::mesh::{Mesh, WallMesh};
use std::io::Write;

/// Consumer of named wall solids
pub trait MeshSink {
    fn submit(&mut self, name: &str, mesh: &WallMesh) -> Result<()>;
}

/// Wavefront OBJ writer with polygon faces
///
/// Converts from Z-up (synthesis output) to Y-up (OBJ convention):
///   OBJ X =  source X
///   OBJ Y =  source Z
///   OBJ Z = -source Y
/// This is a rotation, so face winding is kept as is.
pub struct ObjSink<W: Write> {
    writer: W,
    vertex_offset: u32,
    header_written: bool,
}

impl<W: Write> ObjSink<W> {
    pub fn new(writer: W) -> Self {
        Self {
            writer,
            vertex_offset: 0,
            header_written: false,
        }
    }

    /// Flush and hand back the writer
    pub fn finish(mut self) -> Result<W> {
        self.writer.flush()?;
        Ok(self.writer)
    }

    fn write_header(&mut self) -> Result<()> {
        writeln!(self.writer, "# blueprint-lite wall export")?;
        writeln!(self.writer, "# Coordinate system: Y-up (OBJ convention)")?;
        writeln!(self.writer)?;
        self.header_written = true;
        Ok(())
    }
}

impl<W: Write> MeshSink for ObjSink<W> {
    fn submit(&mut self, name: &str, mesh: &WallMesh) -> Result<()> {
        if !self.header_written {
            self.write_header()?;
        }

        writeln!(self.writer, "o {}", name)?;
        for v in &mesh.vertices {
            writeln!(self.writer, "v {:.6} {:.6} {:.6}", v.x, v.z, -v.y)?;
        }
        for face in &mesh.faces {
            write!(self.writer, "f")?;
            for &i in face {
                write!(self.writer, " {}", i + self.vertex_offset + 1)?;
            }
            writeln!(self.writer)?;
        }
        writeln!(self.writer)?;

        self.vertex_offset += mesh.vertex_count() as u32;
        Ok(())
    }
}

/// Accumulates every submitted solid into one triangle buffer
#[derive(Debug, Default)]
pub struct MergedMeshSink {
    pub mesh: Mesh,
    pub names: Vec<String>,
}

impl MergedMeshSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn into_mesh(self) -> Mesh {
        self.mesh
    }
}

impl MeshSink for MergedMeshSink {
    fn submit(&mut self, name: &str, mesh: &WallMesh) -> Result<()> {
        self.mesh.merge(&mesh.triangulate()?);
        self.names.push(name.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::solid::OrientedBox;
    use nalgebra::Point3;

    fn unit_box(x: f64) -> WallMesh {
        OrientedBox::new(Point3::new(x, 0.0, 0.5), 1.0, 1.0, 1.0, 0.0)
            .to_mesh()
            .unwrap()
    }

    #[test]
    fn test_obj_offsets_indices() {
        let mut sink = ObjSink::new(Vec::new());
        sink.submit("wall_0", &unit_box(0.0)).unwrap();
        sink.submit("wall_1", &unit_box(5.0)).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();

        assert_eq!(text.lines().filter(|l| l.starts_with("v ")).count(), 16);
        assert_eq!(text.lines().filter(|l| l.starts_with("f ")).count(), 12);
        assert!(text.contains("o wall_1"));

        let max_index = text
            .lines()
            .filter(|l| l.starts_with("f "))
            .flat_map(|l| l.split_whitespace().skip(1).map(|i| i.parse::<u32>().unwrap()))
            .max()
            .unwrap();
        assert_eq!(max_index, 16);
    }

    #[test]
    fn test_obj_is_y_up() {
        let mut sink = ObjSink::new(Vec::new());
        sink.submit("w", &unit_box(0.0)).unwrap();
        let text = String::from_utf8(sink.finish().unwrap()).unwrap();

        let max_y = text
            .lines()
            .filter(|l| l.starts_with("v "))
            .map(|l| l.split_whitespace().nth(2).unwrap().parse::<f64>().unwrap())
            .fold(f64::MIN, f64::max);
        assert!((max_y - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_merged_sink_triangulates() {
        let mut sink = MergedMeshSink::new();
        sink.submit("a", &unit_box(0.0)).unwrap();
        sink.submit("b", &unit_box(3.0)).unwrap();

        assert_eq!(sink.names, vec!["a", "b"]);
        let mesh = sink.into_mesh();
        assert_eq!(mesh.triangle_count(), 24);
    }
}
