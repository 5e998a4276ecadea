// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Blueprint-Lite Geometry
//!
//! Synthesizes 3D wall solids with door cutouts from plan segments. Walls are
//! oriented boxes; doors are subtracted on the wall's elevation profile with
//! i_overlay (falling back to csgrs BSP for cuts that are not straight
//! through the wall) and the result is extruded into a closed polygon mesh.
//!
//! ```no_run
//! use blueprint_lite_geometry::{synthesize_wall, Point2, SynthesisConfig, WallSpec};
//!
//! let spec = WallSpec::new(Point2::new(0.0, 0.0), Point2::new(15.0, 0.0), 3.0)
//!     .with_door(Point2::new(7.5, 0.0), 1.0, 2.5);
//! let outcome = synthesize_wall(&spec, &SynthesisConfig::default()).unwrap();
//! assert!(outcome.mesh.is_closed());
//! ```

pub mod bool2d;
pub mod csg;
pub mod error;
pub mod extrusion;
pub mod mesh;
pub mod profile;
pub mod sink;
pub mod solid;
pub mod triangulation;
pub mod wall;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point2, Point3, Vector2, Vector3};

pub use csg::{DefaultKernel, MeshKernel, ProfileKernel, SolidKernel};
pub use error::{BooleanOperationWarning, Error, Result};
pub use extrusion::extrude_elevation;
pub use mesh::{Face, Mesh, WallMesh};
pub use profile::Profile2D;
pub use sink::{MergedMeshSink, MeshSink, ObjSink};
pub use solid::{ElevationFrame, OrientedBox};
pub use wall::{
    slab_for_box, synthesize_wall, synthesize_wall_with, synthesize_walls, SynthesisConfig,
    WallBatch, WallOutcome, WallSpec, DEFAULT_DOOR_HEIGHT, DEFAULT_DOOR_WIDTH,
    DEFAULT_SLAB_THICKNESS, DEFAULT_WALL_HEIGHT, DEFAULT_WALL_THICKNESS,
};
