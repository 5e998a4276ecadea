// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Optional text suppression ahead of extraction
//!
//! Labels and dimensions on a blueprint trace as small closed contours and
//! short Hough segments. A [`TextMasker`] produces a mask of text regions
//! (255 = text) which [`apply_text_mask`] paints over with background.

use crate::error::{Error, Result};
use crate::types::BoundingBox;
use image::{GrayImage, Luma};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;

/// Background value painted over masked pixels
pub const BACKGROUND: u8 = 255;

/// Image in, text mask out
pub trait TextMasker {
    fn mask(&self, gray: &GrayImage) -> Result<GrayImage>;
}

/// Mask built from text boxes found by an external OCR engine
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RegionTextMask {
    /// Boxes in image coordinates (origin top-left)
    pub regions: Vec<BoundingBox>,
}

impl RegionTextMask {
    pub fn new(regions: Vec<BoundingBox>) -> Self {
        Self { regions }
    }

    /// Parse tesseract `image_to_boxes` output
    ///
    /// Each line is `<char> <left> <bottom> <right> <top> <page>` with a
    /// bottom-left origin; boxes are flipped into image coordinates.
    pub fn from_tesseract_boxes(text: &str, image_height: u32) -> Result<Self> {
        let h = image_height as f64;
        let mut regions = Vec::new();

        for (line_no, line) in text.lines().enumerate() {
            let fields: Vec<&str> = line.split_whitespace().collect();
            if fields.is_empty() {
                continue;
            }
            if fields.len() < 5 {
                return Err(Error::SchemaDecode(format!(
                    "OCR box line {} has {} fields, expected at least 5",
                    line_no + 1,
                    fields.len()
                )));
            }

            let mut coords = [0.0f64; 4];
            for (slot, raw) in coords.iter_mut().zip(&fields[1..5]) {
                *slot = raw.parse().map_err(|_| {
                    Error::SchemaDecode(format!(
                        "OCR box line {}: '{}' is not a number",
                        line_no + 1,
                        raw
                    ))
                })?;
            }
            let [left, bottom, right, top] = coords;
            regions.push(BoundingBox::new(left, h - top, right - left, top - bottom));
        }

        Ok(Self { regions })
    }
}

impl TextMasker for RegionTextMask {
    fn mask(&self, gray: &GrayImage) -> Result<GrayImage> {
        let mut mask = GrayImage::new(gray.width(), gray.height());

        for region in &self.regions {
            if region.is_degenerate() {
                continue;
            }
            // Cover every pixel the box touches
            let (left, top) = (region.x.floor(), region.y.floor());
            let right = (region.x + region.width).ceil();
            let bottom = (region.y + region.height).ceil();
            let rect = Rect::at(left as i32, top as i32)
                .of_size((right - left) as u32, (bottom - top) as u32);
            draw_filled_rect_mut(&mut mask, rect, Luma([255]));
        }

        Ok(mask)
    }
}

/// Paint masked pixels with the background value
pub fn apply_text_mask(gray: &GrayImage, mask: &GrayImage) -> Result<GrayImage> {
    if gray.dimensions() != mask.dimensions() {
        return Err(Error::DegenerateGeometry(format!(
            "text mask is {}x{} but image is {}x{}",
            mask.width(),
            mask.height(),
            gray.width(),
            gray.height()
        )));
    }

    let mut result = gray.clone();
    for (pixel, m) in result.pixels_mut().zip(mask.pixels()) {
        if m.0[0] > 0 {
            pixel.0[0] = BACKGROUND;
        }
    }
    Ok(result)
}
