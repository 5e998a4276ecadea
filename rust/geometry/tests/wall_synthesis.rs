// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use approx::assert_relative_eq;
use blueprint_lite_geometry::{
    synthesize_wall, synthesize_walls, MeshSink, ObjSink, Point2, Point3, SynthesisConfig,
    WallMesh, WallSpec,
};

fn door_wall() -> WallSpec {
    WallSpec::new(Point2::new(0.0, 0.0), Point2::new(15.0, 0.0), 3.0)
        .with_door(Point2::new(7.5, 0.0), 1.0, 2.5)
}

/// Vertices lying on the wall's front face (y = +thickness/2)
fn front_face_points(mesh: &WallMesh, half_thickness: f64) -> Vec<Point3<f64>> {
    mesh.vertices
        .iter()
        .filter(|v| (v.y - half_thickness).abs() < 1e-9)
        .copied()
        .collect()
}

#[test]
fn test_plain_wall_is_a_box() {
    let spec = WallSpec::new(Point2::new(2.0, 1.0), Point2::new(7.0, 4.0), 3.0);
    let outcome = synthesize_wall(&spec, &SynthesisConfig::default()).unwrap();

    assert!(outcome.warning.is_none());
    assert_eq!(outcome.mesh.vertex_count(), 8);
    assert_eq!(outcome.mesh.face_count(), 6);
    assert!(outcome.mesh.is_closed());
    assert_relative_eq!(
        outcome.mesh.signed_volume(),
        spec.length() * 0.2 * 3.0,
        epsilon = 1e-6
    );
}

#[test]
fn test_door_cut_at_unit_scale() {
    let outcome = synthesize_wall(&door_wall(), &SynthesisConfig::default()).unwrap();
    let mesh = &outcome.mesh;

    assert!(outcome.warning.is_none());
    assert!(mesh.is_closed());

    let (min, max) = mesh.bounds();
    assert_relative_eq!(max.z - min.z, 3.0, epsilon = 1e-6);
    assert_relative_eq!(min.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(max.x, 15.0, epsilon = 1e-6);

    // The notch spans x = 3.25..4.25, z = 0..2.5
    let front = front_face_points(mesh, 0.1);
    let notch: Vec<_> = front
        .iter()
        .filter(|p| p.x > 3.0 && p.x < 4.5)
        .collect();
    assert_eq!(notch.len(), 4);
    let notch_min_x = notch.iter().map(|p| p.x).fold(f64::MAX, f64::min);
    let notch_max_x = notch.iter().map(|p| p.x).fold(f64::MIN, f64::max);
    let notch_top = notch.iter().map(|p| p.z).fold(f64::MIN, f64::max);
    assert_relative_eq!((notch_min_x + notch_max_x) / 2.0, 3.75, epsilon = 1e-6);
    assert_relative_eq!(notch_top, 2.5, epsilon = 1e-6);

    assert_relative_eq!(mesh.signed_volume(), (45.0 - 2.5) * 0.2, epsilon = 1e-6);
}

#[test]
fn test_door_overhanging_wall_end_is_trimmed() {
    // Door centered on the start point: half of it lies outside the wall
    let spec = WallSpec::new(Point2::new(0.0, 0.0), Point2::new(15.0, 0.0), 3.0)
        .with_door(Point2::new(0.0, 0.0), 1.0, 2.5);
    let outcome = synthesize_wall(&spec, &SynthesisConfig::default()).unwrap();
    let mesh = &outcome.mesh;

    assert!(outcome.warning.is_none());
    assert!(mesh.is_closed());
    assert_eq!(mesh.vertex_count(), 12);
    assert_eq!(mesh.face_count(), 8);
    assert_relative_eq!(mesh.signed_volume(), 45.0 * 0.2 - 0.5 * 2.5 * 0.2, epsilon = 1e-6);

    let (min, max) = mesh.bounds();
    assert_relative_eq!(min.x, 0.0, epsilon = 1e-6);
    assert_relative_eq!(max.x, 15.0, epsilon = 1e-6);
}

#[test]
fn test_off_axis_door_uses_mesh_fallback() {
    // Door point off the wall line shifts the cutter across the thickness,
    // so it no longer passes straight through
    let spec = WallSpec::new(Point2::new(0.0, 0.0), Point2::new(15.0, 0.0), 3.0)
        .with_door(Point2::new(7.5, 0.1), 1.0, 2.5);
    let outcome = synthesize_wall(&spec, &SynthesisConfig::default()).unwrap();

    assert!(outcome.warning.is_none());
    // Cutter overlaps y = -0.05..0.1 of the wall's -0.1..0.1
    let removed = 1.0 * 2.5 * 0.15;
    assert_relative_eq!(outcome.mesh.signed_volume(), 45.0 * 0.2 - removed, epsilon = 1e-6);

    let (min, max) = outcome.mesh.bounds();
    assert_relative_eq!(min, Point3::new(0.0, -0.1, 0.0), epsilon = 1e-6);
    assert_relative_eq!(max, Point3::new(15.0, 0.1, 3.0), epsilon = 1e-6);
}

#[test]
fn test_door_cut_scales_uniformly() {
    let config = SynthesisConfig {
        scale: 2.0,
        ..Default::default()
    };
    let outcome = synthesize_wall(&door_wall(), &config).unwrap();
    let mesh = &outcome.mesh;

    assert!(mesh.is_closed());
    let (min, max) = mesh.bounds();
    assert_relative_eq!(max.z - min.z, 6.0, epsilon = 1e-6);
    assert_relative_eq!(max.x, 30.0, epsilon = 1e-6);

    let front = front_face_points(mesh, 0.2);
    let notch_top = front
        .iter()
        .filter(|p| p.x > 6.0 && p.x < 9.0)
        .map(|p| p.z)
        .fold(f64::MIN, f64::max);
    assert_relative_eq!(notch_top, 5.0, epsilon = 1e-6);
}

#[test]
fn test_notch_faces_point_outward() {
    let outcome = synthesize_wall(&door_wall(), &SynthesisConfig::default()).unwrap();
    let mesh = &outcome.mesh;
    let (min, max) = mesh.bounds();
    let center = nalgebra::center(&min, &max);

    assert_eq!(mesh.vertex_count(), 16);
    assert_eq!(mesh.face_count(), 10);
    assert!(mesh.signed_volume() > 0.0);

    // Outer caps face away from the wall's center plane
    for face in &mesh.faces {
        let normal = mesh.face_normal(face);
        let p = mesh.vertices[face[0] as usize];
        if normal.y.abs() > 0.99 {
            assert!((p.y - center.y) * normal.y > 0.0);
        }
    }
}

#[test]
fn test_diagonal_wall_with_door() {
    let spec = WallSpec::new(Point2::new(0.0, 0.0), Point2::new(6.0, 8.0), 3.0)
        .with_door(Point2::new(3.0, 4.0), 1.0, 2.0);
    let outcome = synthesize_wall(&spec, &SynthesisConfig::default()).unwrap();

    assert!(outcome.warning.is_none());
    assert!(outcome.mesh.is_closed());
    assert_relative_eq!(
        outcome.mesh.signed_volume(),
        (10.0 * 3.0 - 1.0 * 2.0) * 0.2,
        epsilon = 1e-6
    );
}

#[test]
fn test_floor_plan_layout() {
    let layout: [((f64, f64), (f64, f64), Option<(f64, f64)>); 8] = [
        ((0.0, 0.0), (15.0, 0.0), Some((7.5, 0.0))),
        ((15.0, 0.0), (15.0, 12.0), None),
        ((15.0, 12.0), (0.0, 12.0), None),
        ((0.0, 12.0), (0.0, 0.0), None),
        ((0.0, 12.0), (10.0, 12.0), Some((5.0, 12.0))),
        ((10.0, 12.0), (10.0, 18.0), None),
        ((10.0, 18.0), (0.0, 18.0), None),
        ((0.0, 18.0), (0.0, 12.0), None),
    ];
    let specs: Vec<WallSpec> = layout
        .iter()
        .map(|&(s, e, door)| {
            let spec = WallSpec::new(Point2::new(s.0, s.1), Point2::new(e.0, e.1), 3.0);
            match door {
                Some(d) => spec.with_door(Point2::new(d.0, d.1), 1.0, 2.5),
                None => spec,
            }
        })
        .collect();

    let batch = synthesize_walls(&specs, &SynthesisConfig::default());

    assert_eq!(batch.meshes().count(), 8);
    assert_eq!(batch.failures().count(), 0);
    assert_eq!(batch.warnings().count(), 0);
    for (_, mesh) in batch.meshes() {
        assert!(mesh.is_closed());
        assert!(mesh.signed_volume() > 0.0);
    }

    let mut sink = ObjSink::new(Vec::new());
    for (i, mesh) in batch.meshes() {
        sink.submit(&format!("wall_{}", i), mesh).unwrap();
    }
    let obj = String::from_utf8(sink.finish().unwrap()).unwrap();
    assert_eq!(obj.lines().filter(|l| l.starts_with("o ")).count(), 8);
    assert_eq!(
        obj.lines().filter(|l| l.starts_with("v ")).count(),
        batch.merged().vertex_count()
    );
}
