// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Core primitive types for blueprint recognition

use nalgebra::Point2;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A 2D point (simplified for serialization)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct Point2D {
    pub x: f64,
    pub y: f64,
}

impl Point2D {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn to_nalgebra(&self) -> Point2<f64> {
        Point2::new(self.x, self.y)
    }

    pub fn distance_to(&self, other: &Point2D) -> f64 {
        let dx = other.x - self.x;
        let dy = other.y - self.y;
        (dx * dx + dy * dy).sqrt()
    }
}

/// Straight line primitive. Undirected for geometric comparisons.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct LineSegment {
    pub start: Point2D,
    pub end: Point2D,
}

impl LineSegment {
    pub fn new(start: Point2D, end: Point2D) -> Self {
        Self { start, end }
    }

    pub fn from_coords(x1: f64, y1: f64, x2: f64, y2: f64) -> Self {
        Self::new(Point2D::new(x1, y1), Point2D::new(x2, y2))
    }

    pub fn length(&self) -> f64 {
        self.start.distance_to(&self.end)
    }

    /// Start and end coincide
    pub fn is_degenerate(&self) -> bool {
        self.start == self.end
    }

    /// Unit direction, `None` for a degenerate segment
    pub fn direction(&self) -> Option<(f64, f64)> {
        let dx = self.end.x - self.start.x;
        let dy = self.end.y - self.start.y;
        let len = (dx * dx + dy * dy).sqrt();
        if len > 0.0 && len.is_finite() {
            Some((dx / len, dy / len))
        } else {
            None
        }
    }

    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }

    pub fn bounding_box(&self) -> BoundingBox {
        BoundingBox::enclosing([self.start, self.end].iter())
            .unwrap_or_else(|| BoundingBox::new(self.start.x, self.start.y, 0.0, 0.0))
    }
}

/// Traced region boundary, reduced to an approximate polygon
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Contour {
    pub points: Vec<Point2D>,
    pub closed: bool,
}

impl Contour {
    pub fn new(points: Vec<Point2D>, closed: bool) -> Self {
        Self { points, closed }
    }

    /// Axis-aligned box of the polygon, `None` when empty
    pub fn bounding_box(&self) -> Option<BoundingBox> {
        BoundingBox::enclosing(self.points.iter())
    }
}

/// Axis-aligned box. Wire form is `[x, y, width, height]`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Smallest box containing every point, `None` for no points
    pub fn enclosing<'a, I: Iterator<Item = &'a Point2D>>(points: I) -> Option<Self> {
        let mut iter = points.peekable();
        iter.peek()?;
        let (mut min_x, mut min_y) = (f64::MAX, f64::MAX);
        let (mut max_x, mut max_y) = (f64::MIN, f64::MIN);
        for p in iter {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Some(Self::new(min_x, min_y, max_x - min_x, max_y - min_y))
    }

    pub fn min(&self) -> Point2D {
        Point2D::new(self.x, self.y)
    }

    pub fn max(&self) -> Point2D {
        Point2D::new(self.x + self.width, self.y + self.height)
    }

    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0)
    }

    pub fn to_array(&self) -> [f64; 4] {
        [self.x, self.y, self.width, self.height]
    }

    pub fn from_array(a: [f64; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }
}

/// Semantic class of a detected primitive
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum ObjectClass {
    #[serde(rename = "wall")]
    Wall,
    #[serde(rename = "door")]
    Door,
    #[serde(rename = "shape", alias = "detected shape")]
    Shape,
    #[serde(rename = "detected line")]
    DetectedLine,
}

impl ObjectClass {
    pub fn as_str(&self) -> &'static str {
        match self {
            ObjectClass::Wall => "wall",
            ObjectClass::Door => "door",
            ObjectClass::Shape => "shape",
            ObjectClass::DetectedLine => "detected line",
        }
    }

    /// Parse a wire name; accepts the legacy "detected shape"
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "wall" => Some(ObjectClass::Wall),
            "door" => Some(ObjectClass::Door),
            "shape" | "detected shape" => Some(ObjectClass::Shape),
            "detected line" => Some(ObjectClass::DetectedLine),
            _ => None,
        }
    }
}

impl fmt::Display for ObjectClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A primitive's class and box; never mutated after creation
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct ClassifiedObject {
    pub class: ObjectClass,
    #[serde(rename = "box")]
    pub bbox: BoundingBox,
}

impl ClassifiedObject {
    pub fn new(class: ObjectClass, bbox: BoundingBox) -> Self {
        Self { class, bbox }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_geometry() {
        let seg = LineSegment::from_coords(0.0, 0.0, 3.0, 4.0);
        assert_eq!(seg.length(), 5.0);
        let (dx, dy) = seg.direction().unwrap();
        assert!((dx - 0.6).abs() < 1e-12 && (dy - 0.8).abs() < 1e-12);
        assert_eq!(seg.bounding_box(), BoundingBox::new(0.0, 0.0, 3.0, 4.0));
    }

    #[test]
    fn test_degenerate_segment() {
        let seg = LineSegment::from_coords(2.0, 2.0, 2.0, 2.0);
        assert!(seg.is_degenerate());
        assert!(seg.direction().is_none());
    }

    #[test]
    fn test_reversed_segment_has_same_box() {
        let seg = LineSegment::from_coords(10.0, 5.0, 1.0, 8.0);
        assert_eq!(seg.bounding_box(), seg.reversed().bounding_box());
    }

    #[test]
    fn test_contour_box() {
        let contour = Contour::new(
            vec![
                Point2D::new(1.0, 1.0),
                Point2D::new(5.0, 1.0),
                Point2D::new(5.0, 3.0),
                Point2D::new(1.0, 3.0),
            ],
            true,
        );
        assert_eq!(contour.bounding_box(), Some(BoundingBox::new(1.0, 1.0, 4.0, 2.0)));
        assert!(Contour::new(Vec::new(), true).bounding_box().is_none());
    }

    #[test]
    fn test_class_names() {
        assert_eq!(ObjectClass::from_name("detected shape"), Some(ObjectClass::Shape));
        assert_eq!(ObjectClass::from_name("detected line"), Some(ObjectClass::DetectedLine));
        assert_eq!(ObjectClass::from_name("window"), None);
        assert_eq!(ObjectClass::Wall.to_string(), "wall");
    }
}
