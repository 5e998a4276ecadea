// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! JSON interchange
//!
//! - segments: `[[[x1, y1], [x2, y2]], ...]`
//! - classified objects: `[{"class": "wall", "box": [x, y, w, h]}, ...]`
//! - wall specifications: `[[[sx, sy], [ex, ey], [dx, dy] | null], ...]`
//!
//! Integral coordinates are written as JSON integers so pixel data survives
//! bit-for-bit; everything else is written as a shortest round-trip float.

use crate::config::WallDefaults;
use crate::error::{Error, Result};
use crate::types::{BoundingBox, ClassifiedObject, LineSegment, ObjectClass, Point2D};
use blueprint_lite_geometry::{Point2, WallSpec};
use serde::Deserialize;
use serde_json::{json, Value};
use std::path::Path;

/// Largest magnitude at which every integer is exactly representable in f64
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

type WirePoint = [f64; 2];

#[derive(Deserialize)]
struct ObjectRecord {
    class: String,
    #[serde(rename = "box")]
    bbox: [f64; 4],
}

// ============================================================================
// Segments
// ============================================================================

pub fn encode_segments(segments: &[LineSegment]) -> Result<String> {
    let records = segments
        .iter()
        .map(|s| Ok(json!([point_value(&s.start)?, point_value(&s.end)?])))
        .collect::<Result<Vec<Value>>>()?;
    Ok(serde_json::to_string(&records)?)
}

pub fn decode_segments(text: &str) -> Result<Vec<LineSegment>> {
    let records: Vec<[WirePoint; 2]> = serde_json::from_str(text)?;
    Ok(records
        .into_iter()
        .map(|[a, b]| LineSegment::from_coords(a[0], a[1], b[0], b[1]))
        .collect())
}

pub fn save_segments(path: impl AsRef<Path>, segments: &[LineSegment]) -> Result<()> {
    write_file(path.as_ref(), &encode_segments(segments)?)
}

pub fn load_segments(path: impl AsRef<Path>) -> Result<Vec<LineSegment>> {
    decode_segments(&read_file(path.as_ref())?)
}

// ============================================================================
// Classified objects
// ============================================================================

pub fn encode_objects(objects: &[ClassifiedObject]) -> Result<String> {
    let records = objects
        .iter()
        .map(|o| {
            let bbox = o
                .bbox
                .to_array()
                .iter()
                .map(|&v| number_value(v))
                .collect::<Result<Vec<Value>>>()?;
            Ok(json!({ "class": o.class.as_str(), "box": bbox }))
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(serde_json::to_string(&records)?)
}

pub fn decode_objects(text: &str) -> Result<Vec<ClassifiedObject>> {
    let records: Vec<ObjectRecord> = serde_json::from_str(text)?;
    records
        .into_iter()
        .enumerate()
        .map(|(i, r)| {
            let class = ObjectClass::from_name(&r.class).ok_or_else(|| {
                Error::SchemaDecode(format!("object {}: unknown class '{}'", i, r.class))
            })?;
            Ok(ClassifiedObject::new(class, BoundingBox::from_array(r.bbox)))
        })
        .collect()
}

pub fn save_objects(path: impl AsRef<Path>, objects: &[ClassifiedObject]) -> Result<()> {
    write_file(path.as_ref(), &encode_objects(objects)?)
}

pub fn load_objects(path: impl AsRef<Path>) -> Result<Vec<ClassifiedObject>> {
    decode_objects(&read_file(path.as_ref())?)
}

// ============================================================================
// Wall specifications
// ============================================================================

/// Endpoints and door point only; height and door size are not part of the
/// record and come back from [`WallDefaults`] on load.
pub fn encode_walls(walls: &[WallSpec]) -> Result<String> {
    let records = walls
        .iter()
        .map(|w| {
            let door = match &w.door_position {
                Some(d) => nalgebra_point_value(d)?,
                None => Value::Null,
            };
            Ok(json!([
                nalgebra_point_value(&w.start)?,
                nalgebra_point_value(&w.end)?,
                door
            ]))
        })
        .collect::<Result<Vec<Value>>>()?;
    Ok(serde_json::to_string(&records)?)
}

pub fn decode_walls(text: &str, defaults: &WallDefaults) -> Result<Vec<WallSpec>> {
    let records: Vec<(WirePoint, WirePoint, Option<WirePoint>)> = serde_json::from_str(text)?;
    Ok(records
        .into_iter()
        .map(|(start, end, door)| {
            let spec = WallSpec::new(
                Point2::new(start[0], start[1]),
                Point2::new(end[0], end[1]),
                defaults.height,
            );
            let spec = WallSpec {
                door_width: defaults.door_width,
                door_height: defaults.door_height,
                ..spec
            };
            match door {
                Some(d) => spec.with_door(
                    Point2::new(d[0], d[1]),
                    defaults.door_width,
                    defaults.door_height,
                ),
                None => spec,
            }
        })
        .collect())
}

pub fn save_walls(path: impl AsRef<Path>, walls: &[WallSpec]) -> Result<()> {
    write_file(path.as_ref(), &encode_walls(walls)?)
}

pub fn load_walls(path: impl AsRef<Path>, defaults: &WallDefaults) -> Result<Vec<WallSpec>> {
    decode_walls(&read_file(path.as_ref())?, defaults)
}

// ============================================================================
// Internal Helper Functions
// ============================================================================

fn read_file(path: &Path) -> Result<String> {
    match std::fs::read_to_string(path) {
        Ok(text) => Ok(text),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(Error::SourceNotFound(path.to_path_buf()))
        }
        Err(e) => Err(Error::Io(e)),
    }
}

fn write_file(path: &Path, text: &str) -> Result<()> {
    std::fs::write(path, text)?;
    tracing::debug!(path = %path.display(), bytes = text.len(), "wrote interchange file");
    Ok(())
}

fn point_value(p: &Point2D) -> Result<Value> {
    Ok(json!([number_value(p.x)?, number_value(p.y)?]))
}

fn nalgebra_point_value(p: &Point2<f64>) -> Result<Value> {
    Ok(json!([number_value(p.x)?, number_value(p.y)?]))
}

/// Integral values become JSON integers
fn number_value(v: f64) -> Result<Value> {
    if !v.is_finite() {
        return Err(Error::DegenerateGeometry(format!(
            "cannot serialize non-finite coordinate {}",
            v
        )));
    }
    if v.fract() == 0.0 && v.abs() <= MAX_EXACT_INTEGER {
        Ok(Value::from(v as i64))
    } else {
        Ok(Value::from(v))
    }
}
