// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! End-to-end blueprint processing
//!
//! text mask (optional) → extract → drop degenerate segments → dedup →
//! classify. File-level failures abort; per-primitive failures become
//! [`Warning`]s in the report.

use crate::classifier::classify_all;
use crate::config::{PipelineConfig, WallDefaults};
use crate::dedup::dedup_segments;
use crate::error::{Error, Result, Warning};
use crate::extractor::SegmentExtractor;
use crate::text_mask::{apply_text_mask, TextMasker};
use crate::toolkit::{ImageprocToolkit, VisionToolkit};
use crate::types::{ClassifiedObject, Contour, LineSegment, ObjectClass};
use blueprint_lite_geometry::{
    slab_for_box, MeshSink, SynthesisConfig, WallBatch, WallMesh, WallSpec,
};
use image::GrayImage;
use rustc_hash::FxHashMap;
use std::path::Path;

/// Everything recognized in one blueprint
#[derive(Debug, Clone, Default)]
pub struct BlueprintReport {
    /// Deduplicated line segments
    pub segments: Vec<LineSegment>,
    pub contours: Vec<Contour>,
    /// Classified contours followed by classified segments
    pub objects: Vec<ClassifiedObject>,
    pub warnings: Vec<Warning>,
}

impl BlueprintReport {
    pub fn class_counts(&self) -> FxHashMap<ObjectClass, usize> {
        let mut counts = FxHashMap::default();
        for object in &self.objects {
            *counts.entry(object.class).or_insert(0) += 1;
        }
        counts
    }

    pub fn count(&self, class: ObjectClass) -> usize {
        self.objects.iter().filter(|o| o.class == class).count()
    }
}

/// Configured recognition pipeline. Holds no state between runs.
pub struct BlueprintPipeline<T: VisionToolkit = ImageprocToolkit> {
    config: PipelineConfig,
    extractor: SegmentExtractor<T>,
    text_mask: Option<Box<dyn TextMasker + Send + Sync>>,
}

impl BlueprintPipeline<ImageprocToolkit> {
    pub fn new(config: PipelineConfig) -> Self {
        Self::with_toolkit(ImageprocToolkit, config)
    }
}

impl<T: VisionToolkit> BlueprintPipeline<T> {
    pub fn with_toolkit(toolkit: T, config: PipelineConfig) -> Self {
        Self {
            extractor: SegmentExtractor::with_toolkit(toolkit, config.toolkit),
            config,
            text_mask: None,
        }
    }

    /// Suppress text regions before extraction
    pub fn with_text_mask<M: TextMasker + Send + Sync + 'static>(mut self, masker: M) -> Self {
        self.text_mask = Some(Box::new(masker));
        self
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run every stage on a grayscale blueprint
    pub fn process(&self, gray: &GrayImage) -> Result<BlueprintReport> {
        let masked;
        let image = match &self.text_mask {
            Some(masker) => {
                masked = apply_text_mask(gray, &masker.mask(gray)?)?;
                &masked
            }
            None => gray,
        };

        let extraction = self.extractor.extract(image)?;
        let mut warnings = Vec::new();

        let mut raw_segments = Vec::with_capacity(extraction.segments.len());
        for (index, segment) in extraction.segments.into_iter().enumerate() {
            if segment.direction().is_none() {
                tracing::warn!(index, "skipping zero-length segment");
                warnings.push(Warning::SkippedSegment {
                    index,
                    reason: "zero-length segment".to_string(),
                });
            } else {
                raw_segments.push(segment);
            }
        }

        let segments = dedup_segments(&raw_segments, &self.config.dedup)?;
        let (objects, classify_warnings) =
            classify_all(&extraction.contours, &segments, &self.config.classifier);
        warnings.extend(classify_warnings);

        let report = BlueprintReport {
            segments,
            contours: extraction.contours,
            objects,
            warnings,
        };
        tracing::debug!(
            segments = report.segments.len(),
            contours = report.contours.len(),
            walls = report.count(ObjectClass::Wall),
            doors = report.count(ObjectClass::Door),
            shapes = report.count(ObjectClass::Shape),
            warnings = report.warnings.len(),
            "processed blueprint"
        );
        Ok(report)
    }

    /// Load an image file and process it
    pub fn process_file(&self, path: impl AsRef<Path>) -> Result<BlueprintReport> {
        let gray = load_grayscale(path.as_ref())?;
        self.process(&gray)
    }
}

/// Decode an image file to 8-bit grayscale
pub fn load_grayscale(path: &Path) -> Result<GrayImage> {
    if !path.exists() {
        return Err(Error::SourceNotFound(path.to_path_buf()));
    }
    let image = image::ImageReader::open(path)?
        .with_guessed_format()?
        .decode()?;
    tracing::debug!(
        path = %path.display(),
        width = image.width(),
        height = image.height(),
        "loaded image"
    );
    Ok(image.to_luma8())
}

/// One door-less wall per segment, completed from `defaults`
pub fn wall_specs_from_segments(segments: &[LineSegment], defaults: &WallDefaults) -> Vec<WallSpec> {
    segments
        .iter()
        .map(|s| WallSpec {
            door_width: defaults.door_width,
            door_height: defaults.door_height,
            ..WallSpec::new(s.start.to_nalgebra(), s.end.to_nalgebra(), defaults.height)
        })
        .collect()
}

/// Per-wall problems of a synthesized batch, in input order
///
/// Walls that failed validation become [`Warning::InvalidWall`]; walls whose
/// door cut failed (and were emitted uncut) become [`Warning::WallCutout`].
pub fn wall_batch_warnings(batch: &WallBatch) -> Vec<Warning> {
    let mut warnings: Vec<(usize, Warning)> = batch
        .failures()
        .map(|(index, e)| {
            (
                index,
                Warning::InvalidWall {
                    index,
                    reason: e.to_string(),
                },
            )
        })
        .chain(batch.warnings().map(|(index, w)| {
            (
                index,
                Warning::WallCutout {
                    index,
                    warning: w.clone(),
                },
            )
        }))
        .collect();
    warnings.sort_by_key(|(index, _)| *index);
    warnings.into_iter().map(|(_, w)| w).collect()
}

/// Submit every synthesized wall to `sink` as `wall_<index>`
///
/// Sink failures abort with [`Error::Geometry`]; per-wall problems are
/// returned as warnings.
pub fn export_wall_batch<S: MeshSink + ?Sized>(batch: &WallBatch, sink: &mut S) -> Result<Vec<Warning>> {
    for (index, mesh) in batch.meshes() {
        sink.submit(&format!("wall_{}", index), mesh)?;
    }

    let warnings = wall_batch_warnings(batch);
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    Ok(warnings)
}

/// Extrude each classified object's footprint into a slab
///
/// Detected lines have no footprint and are skipped silently; degenerate
/// boxes are skipped with a warning.
pub fn slabs_from_objects(
    objects: &[ClassifiedObject],
    config: &SynthesisConfig,
) -> (Vec<(ObjectClass, WallMesh)>, Vec<Warning>) {
    let mut slabs = Vec::new();
    let mut warnings = Vec::new();

    for (index, object) in objects.iter().enumerate() {
        if object.class == ObjectClass::DetectedLine {
            continue;
        }
        let min = object.bbox.min().to_nalgebra();
        let max = object.bbox.max().to_nalgebra();
        match slab_for_box(min, max, config.slab_thickness, config.scale) {
            Ok(mesh) => slabs.push((object.class, mesh)),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping object slab");
                warnings.push(Warning::SkippedObject {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }

    (slabs, warnings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BoundingBox;
    use blueprint_lite_geometry::{synthesize_walls, MergedMeshSink, Point2};

    fn mixed_batch() -> WallBatch {
        let specs = vec![
            WallSpec::new(Point2::new(0.0, 0.0), Point2::new(10.0, 0.0), 3.0),
            WallSpec::new(Point2::new(4.0, 4.0), Point2::new(4.0, 4.0), 3.0),
            // Door larger than the whole wall
            WallSpec::new(Point2::new(0.0, 0.0), Point2::new(2.0, 0.0), 3.0)
                .with_door(Point2::new(2.0, 0.0), 10.0, 5.0),
        ];
        synthesize_walls(&specs, &SynthesisConfig::default())
    }

    struct BrokenSink;

    impl MeshSink for BrokenSink {
        fn submit(&mut self, _: &str, _: &WallMesh) -> blueprint_lite_geometry::Result<()> {
            Err(blueprint_lite_geometry::Error::Io(std::io::Error::new(
                std::io::ErrorKind::Other,
                "disk full",
            )))
        }
    }

    #[test]
    fn test_wall_specs_from_segments() {
        let defaults = WallDefaults::default();
        let segments = vec![LineSegment::from_coords(0.0, 0.0, 10.0, 0.0)];
        let specs = wall_specs_from_segments(&segments, &defaults);

        assert_eq!(specs.len(), 1);
        assert_eq!(specs[0].height, defaults.height);
        assert!(specs[0].door_position.is_none());
        assert_eq!(specs[0].length(), 10.0);
    }

    #[test]
    fn test_slabs_skip_lines_and_degenerate_boxes() {
        let objects = vec![
            ClassifiedObject::new(ObjectClass::Wall, BoundingBox::new(0.0, 0.0, 100.0, 5.0)),
            ClassifiedObject::new(ObjectClass::DetectedLine, BoundingBox::new(0.0, 0.0, 50.0, 0.0)),
            ClassifiedObject::new(ObjectClass::Door, BoundingBox::new(3.0, 3.0, 0.0, 12.0)),
        ];
        let (slabs, warnings) = slabs_from_objects(&objects, &SynthesisConfig::default());

        assert_eq!(slabs.len(), 1);
        assert_eq!(slabs[0].0, ObjectClass::Wall);
        assert!(slabs[0].1.is_closed());
        assert_eq!(warnings.len(), 1);
        assert!(matches!(warnings[0], Warning::SkippedObject { index: 2, .. }));
    }

    #[test]
    fn test_class_counts() {
        let report = BlueprintReport {
            objects: vec![
                ClassifiedObject::new(ObjectClass::Wall, BoundingBox::new(0.0, 0.0, 90.0, 5.0)),
                ClassifiedObject::new(ObjectClass::Wall, BoundingBox::new(0.0, 9.0, 90.0, 5.0)),
                ClassifiedObject::new(ObjectClass::Door, BoundingBox::new(4.0, 4.0, 10.0, 12.0)),
            ],
            ..Default::default()
        };
        let counts = report.class_counts();

        assert_eq!(counts.get(&ObjectClass::Wall), Some(&2));
        assert_eq!(counts.get(&ObjectClass::Door), Some(&1));
        assert_eq!(counts.get(&ObjectClass::Shape), None);
        assert_eq!(report.count(ObjectClass::Wall), 2);
    }

    #[test]
    fn test_wall_batch_warnings_in_input_order() {
        let warnings = wall_batch_warnings(&mixed_batch());

        assert_eq!(warnings.len(), 2);
        assert!(matches!(warnings[0], Warning::InvalidWall { index: 1, .. }));
        assert!(matches!(warnings[1], Warning::WallCutout { index: 2, .. }));
    }

    #[test]
    fn test_export_wall_batch_submits_every_mesh() {
        let mut sink = MergedMeshSink::new();
        let warnings = export_wall_batch(&mixed_batch(), &mut sink).unwrap();

        assert_eq!(warnings.len(), 2);
        assert_eq!(sink.names, vec!["wall_0", "wall_2"]);
    }

    #[test]
    fn test_export_wall_batch_reports_sink_failure() {
        assert!(matches!(
            export_wall_batch(&mixed_batch(), &mut BrokenSink),
            Err(Error::Geometry(_))
        ));
    }

    #[test]
    fn test_missing_image() {
        let pipeline = BlueprintPipeline::new(PipelineConfig::default());
        assert!(matches!(
            pipeline.process_file("/nonexistent/blueprint.png"),
            Err(Error::SourceNotFound(_))
        ));
    }
}
