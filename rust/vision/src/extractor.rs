// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Segment extraction
//!
//! Wraps the toolkit's line finder and contour tracer into uniform
//! [`LineSegment`] / [`Contour`] lists. Toolkit pixel types never leave this
//! module: every coordinate comes out as an `f64` [`Point2D`].

use crate::config::ToolkitParams;
use crate::error::{Error, Result};
use crate::toolkit::{ImageprocToolkit, VisionToolkit};
use crate::types::{Contour, LineSegment, Point2D};
use image::GrayImage;
use imageproc::geometry::arc_length;
use imageproc::point::Point;

/// Raw primitives from one image pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Extraction {
    pub segments: Vec<LineSegment>,
    pub contours: Vec<Contour>,
}

/// Turns a grayscale blueprint into raw segments and simplified contours
#[derive(Debug, Clone)]
pub struct SegmentExtractor<T: VisionToolkit = ImageprocToolkit> {
    toolkit: T,
    params: ToolkitParams,
}

impl SegmentExtractor<ImageprocToolkit> {
    pub fn new(params: ToolkitParams) -> Self {
        Self::with_toolkit(ImageprocToolkit, params)
    }
}

impl<T: VisionToolkit> SegmentExtractor<T> {
    pub fn with_toolkit(toolkit: T, params: ToolkitParams) -> Self {
        Self { toolkit, params }
    }

    pub fn params(&self) -> &ToolkitParams {
        &self.params
    }

    /// Probabilistic line segments of the edge map
    pub fn extract_segments(&self, image: &GrayImage) -> Result<Vec<LineSegment>> {
        ensure_non_empty(image)?;

        let edges = self.toolkit.edges(image, &self.params);
        let segments: Vec<LineSegment> = self
            .toolkit
            .hough_segments(&edges, &self.params)
            .into_iter()
            .map(|[x1, y1, x2, y2]| LineSegment::from_coords(x1 as f64, y1 as f64, x2 as f64, y2 as f64))
            .collect();

        tracing::debug!(count = segments.len(), "extracted line segments");
        Ok(segments)
    }

    /// Traced region borders, each reduced to an approximate polygon
    pub fn extract_contours(&self, image: &GrayImage) -> Result<Vec<Contour>> {
        ensure_non_empty(image)?;

        let binary = self.toolkit.binarize(image, &self.params);
        let contours: Vec<Contour> = self
            .toolkit
            .trace_contours(&binary)
            .iter()
            .map(|border| {
                let epsilon = self.params.polygon_epsilon * arc_length(border, true);
                let polygon = self.toolkit.approximate_polygon(border, epsilon, true);
                Contour::new(polygon.iter().map(to_point).collect(), true)
            })
            .collect();

        tracing::debug!(count = contours.len(), "extracted contours");
        Ok(contours)
    }

    /// Both segments and contours
    pub fn extract(&self, image: &GrayImage) -> Result<Extraction> {
        Ok(Extraction {
            segments: self.extract_segments(image)?,
            contours: self.extract_contours(image)?,
        })
    }
}

fn ensure_non_empty(image: &GrayImage) -> Result<()> {
    if image.width() == 0 || image.height() == 0 {
        return Err(Error::EmptyImage {
            width: image.width(),
            height: image.height(),
        });
    }
    Ok(())
}

fn to_point(p: &Point<i32>) -> Point2D {
    Point2D::new(p.x as f64, p.y as f64)
}
