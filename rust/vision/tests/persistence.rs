// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

use blueprint_lite_geometry::{synthesize_walls, Point2, SynthesisConfig, WallSpec};
use blueprint_lite_vision::persistence::{
    load_objects, load_segments, load_walls, save_objects, save_segments, save_walls,
};
use blueprint_lite_vision::{
    BoundingBox, ClassifiedObject, Error, LineSegment, ObjectClass, WallDefaults,
};
use tempfile::TempDir;

#[test]
fn test_classified_objects_round_trip() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("detected_objects.json");
    let objects = vec![
        ClassifiedObject::new(ObjectClass::Wall, BoundingBox::new(12.0, 40.0, 5.0, 100.0)),
        ClassifiedObject::new(ObjectClass::Door, BoundingBox::new(0.0, 0.0, 10.0, 12.0)),
        ClassifiedObject::new(ObjectClass::Shape, BoundingBox::new(3.5, 7.25, 40.0, 41.5)),
        ClassifiedObject::new(ObjectClass::DetectedLine, BoundingBox::new(0.0, 0.0, 100.0, 1.0)),
    ];

    save_objects(&path, &objects).unwrap();
    let loaded = load_objects(&path).unwrap();

    assert_eq!(loaded, objects);
}

#[test]
fn test_pixel_segments_survive_bit_for_bit() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("line_coordinates.json");
    let segments = vec![
        LineSegment::from_coords(0.0, 0.0, 100.0, 0.0),
        LineSegment::from_coords(2.0, 1.0, 98.0, 1.0),
        LineSegment::from_coords(4095.0, 3.0, 4095.0, 2160.0),
    ];

    save_segments(&path, &segments).unwrap();
    let text = std::fs::read_to_string(&path).unwrap();
    assert!(!text.contains('.'));

    let loaded = load_segments(&path).unwrap();
    for (a, b) in loaded.iter().zip(&segments) {
        assert_eq!(a.start.x.to_bits(), b.start.x.to_bits());
        assert_eq!(a.end.y.to_bits(), b.end.y.to_bits());
    }
}

#[test]
fn test_wall_file_feeds_synthesizer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("walls.json");
    std::fs::write(
        &path,
        "[[[0, 0], [15, 0], [7.5, 0]], [[15, 0], [15, 12], null], [[15, 12], [0, 12], null]]",
    )
    .unwrap();

    let walls = load_walls(&path, &WallDefaults::default()).unwrap();
    let batch = synthesize_walls(&walls, &SynthesisConfig::default());

    assert_eq!(batch.meshes().count(), 3);
    assert_eq!(batch.warnings().count(), 0);

    let copy = dir.path().join("walls_copy.json");
    save_walls(&copy, &walls).unwrap();
    assert_eq!(load_walls(&copy, &WallDefaults::default()).unwrap(), walls);
}

#[test]
fn test_world_coordinates_within_tolerance() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("walls.json");
    let walls = vec![WallSpec::new(
        Point2::new(0.1 * 3.0, 2.0 / 3.0),
        Point2::new(1e-7, 12.345678901),
        3.0,
    )];

    save_walls(&path, &walls).unwrap();
    let loaded = load_walls(&path, &WallDefaults::default()).unwrap();

    assert!((loaded[0].start - walls[0].start).norm() < 1e-6);
    assert!((loaded[0].end - walls[0].end).norm() < 1e-6);
}

#[test]
fn test_missing_file_is_source_not_found() {
    let dir = TempDir::new().unwrap();
    let missing = dir.path().join("nope.json");
    assert!(matches!(load_objects(&missing), Err(Error::SourceNotFound(_))));
    assert!(matches!(load_segments(&missing), Err(Error::SourceNotFound(_))));
    assert!(matches!(
        load_walls(&missing, &WallDefaults::default()),
        Err(Error::SourceNotFound(_))
    ));
}

#[test]
fn test_malformed_file_is_schema_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{\"class\": \"wall\"").unwrap();
    assert!(matches!(load_objects(&path), Err(Error::SchemaDecode(_))));

    std::fs::write(&path, "[[[0, 0], [1, 1], \"door\"]]").unwrap();
    assert!(matches!(
        load_walls(&path, &WallDefaults::default()),
        Err(Error::SchemaDecode(_))
    ));
}
