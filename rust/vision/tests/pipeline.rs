// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

mod common;

use blueprint_lite_geometry::synthesize_walls;
use blueprint_lite_vision::{
    dedup_segments, wall_specs_from_segments, BlueprintPipeline, BoundingBox, ObjectClass,
    PipelineConfig, RegionTextMask,
};
use common::{fill, single_wall_blueprint};

#[test]
fn test_wall_stroke_is_recognized() {
    let pipeline = BlueprintPipeline::new(PipelineConfig::default());
    let report = pipeline.process(&single_wall_blueprint()).unwrap();

    assert!(!report.segments.is_empty(), "should detect line segments");
    assert!(report.count(ObjectClass::Wall) >= 1, "should classify the stroke as a wall");
    assert_eq!(
        report.count(ObjectClass::DetectedLine),
        report.segments.len()
    );
    for segment in &report.segments {
        assert!((segment.start.y - segment.end.y).abs() <= 4.0);
    }
}

#[test]
fn test_reported_segments_are_already_unique() {
    let config = PipelineConfig::default();
    let report = BlueprintPipeline::new(config)
        .process(&single_wall_blueprint())
        .unwrap();

    let again = dedup_segments(&report.segments, &config.dedup).unwrap();
    assert_eq!(again, report.segments);
}

#[test]
fn test_text_mask_removes_label_blob() {
    let mut img = single_wall_blueprint();
    fill(&mut img, 150, 120, 160, 130);

    let config = PipelineConfig::default();
    let plain = BlueprintPipeline::new(config).process(&img).unwrap();
    let masked = BlueprintPipeline::new(config)
        .with_text_mask(RegionTextMask::new(vec![BoundingBox::new(145.0, 115.0, 20.0, 20.0)]))
        .process(&img)
        .unwrap();

    assert!(plain.count(ObjectClass::Door) >= 1);
    assert!(masked.count(ObjectClass::Door) < plain.count(ObjectClass::Door));
    assert!(masked.count(ObjectClass::Wall) >= 1);
}

#[test]
fn test_blank_sheet_gives_empty_report() {
    let img = image::GrayImage::from_pixel(120, 80, image::Luma([255]));
    let report = BlueprintPipeline::new(PipelineConfig::default())
        .process(&img)
        .unwrap();

    assert!(report.objects.is_empty());
    assert!(report.warnings.is_empty());
}

#[test]
fn test_segments_become_closed_walls() {
    let config = PipelineConfig::default();
    let report = BlueprintPipeline::new(config)
        .process(&single_wall_blueprint())
        .unwrap();

    let specs = wall_specs_from_segments(&report.segments, &config.walls);
    let batch = synthesize_walls(&specs, &config.synthesis);

    assert_eq!(batch.failures().count(), 0);
    assert_eq!(batch.meshes().count(), specs.len());
    for (_, mesh) in batch.meshes() {
        assert!(mesh.is_closed());
    }
}
