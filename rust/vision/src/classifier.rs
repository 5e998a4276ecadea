// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Bounding-box classification of detected primitives
//!
//! The class is a pure function of box width and height:
//!
//! | condition                              | class  |
//! |----------------------------------------|--------|
//! | width <= 0 or height <= 0              | door   |
//! | w/h or h/w above the aspect ratio      | wall   |
//! | width or height below the size cutoff  | door   |
//! | otherwise                              | shape  |
//!
//! The two middle rows swap under [`GatePrecedence::SizeFirst`]. Position
//! and polygon vertex count never influence the result.

use crate::config::{ClassifierConfig, GatePrecedence};
use crate::error::{Error, Result, Warning};
use crate::types::{BoundingBox, ClassifiedObject, Contour, LineSegment, ObjectClass};

/// Classify a box by its dimensions
pub fn classify_box(bbox: &BoundingBox, config: &ClassifierConfig) -> ObjectClass {
    let (w, h) = (bbox.width, bbox.height);
    if !(w > 0.0 && h > 0.0) {
        return ObjectClass::Door;
    }

    let elongated = w / h > config.aspect_ratio || h / w > config.aspect_ratio;
    let small = w < config.size_threshold || h < config.size_threshold;

    match config.precedence {
        GatePrecedence::AspectFirst if elongated => ObjectClass::Wall,
        GatePrecedence::AspectFirst if small => ObjectClass::Door,
        GatePrecedence::SizeFirst if small => ObjectClass::Door,
        GatePrecedence::SizeFirst if elongated => ObjectClass::Wall,
        _ => ObjectClass::Shape,
    }
}

/// Classify a simplified contour by its bounding box
pub fn classify_contour(contour: &Contour, config: &ClassifierConfig) -> Result<ClassifiedObject> {
    let bbox = contour
        .bounding_box()
        .ok_or_else(|| Error::DegenerateGeometry("contour has no points".to_string()))?;
    if bbox.width.is_nan() || bbox.height.is_nan() {
        return Err(Error::DegenerateGeometry(
            "contour has non-finite coordinates".to_string(),
        ));
    }
    Ok(ClassifiedObject::new(classify_box(&bbox, config), bbox))
}

/// Segments are reported as detected lines with their bounding box
pub fn classify_segment(segment: &LineSegment) -> ClassifiedObject {
    ClassifiedObject::new(ObjectClass::DetectedLine, segment.bounding_box())
}

/// Classify every contour then every segment. Contours that cannot be
/// classified are skipped with a warning.
pub fn classify_all(
    contours: &[Contour],
    segments: &[LineSegment],
    config: &ClassifierConfig,
) -> (Vec<ClassifiedObject>, Vec<Warning>) {
    let mut objects = Vec::with_capacity(contours.len() + segments.len());
    let mut warnings = Vec::new();

    for (index, contour) in contours.iter().enumerate() {
        match classify_contour(contour, config) {
            Ok(object) => objects.push(object),
            Err(e) => {
                tracing::warn!(index, error = %e, "skipping contour");
                warnings.push(Warning::SkippedContour {
                    index,
                    reason: e.to_string(),
                });
            }
        }
    }
    objects.extend(segments.iter().map(classify_segment));

    (objects, warnings)
}
