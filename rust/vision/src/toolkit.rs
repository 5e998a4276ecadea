// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Vision toolkit boundary
//!
//! [`VisionToolkit`] is everything the extractor needs from an image
//! processing library: edge and binary preprocessing, a probabilistic line
//! finder, border following and polygon approximation. Results stay in the
//! toolkit's pixel types; the extractor converts them.
//! [`ImageprocToolkit`] implements it on top of `image`/`imageproc`.

use crate::config::ToolkitParams;
use image::{GrayImage, Luma};
use imageproc::distance_transform::Norm;
use imageproc::geometry::approximate_polygon_dp;
use imageproc::point::Point;

/// Image processing operations used by the segment extractor
pub trait VisionToolkit {
    /// Blur then Canny edge map (edges are 255)
    fn edges(&self, gray: &GrayImage, params: &ToolkitParams) -> GrayImage;

    /// Blur, inverse adaptive threshold and morphological closing
    /// (foreground is 255)
    fn binarize(&self, gray: &GrayImage, params: &ToolkitParams) -> GrayImage;

    /// Probabilistic Hough segments as `[x1, y1, x2, y2]`
    fn hough_segments(&self, edges: &GrayImage, params: &ToolkitParams) -> Vec<[i32; 4]>;

    /// Border following on a binary image
    fn trace_contours(&self, binary: &GrayImage) -> Vec<Vec<Point<i32>>>;

    /// Polygonal approximation within `epsilon` pixels
    fn approximate_polygon(
        &self,
        points: &[Point<i32>],
        epsilon: f64,
        closed: bool,
    ) -> Vec<Point<i32>>;
}

/// Pure Rust toolkit backed by imageproc
#[derive(Debug, Clone, Copy, Default)]
pub struct ImageprocToolkit;

impl VisionToolkit for ImageprocToolkit {
    fn edges(&self, gray: &GrayImage, params: &ToolkitParams) -> GrayImage {
        let blurred = gaussian_blur(gray, params.blur_kernel);
        imageproc::edges::canny(&blurred, params.canny_low, params.canny_high)
    }

    fn binarize(&self, gray: &GrayImage, params: &ToolkitParams) -> GrayImage {
        let blurred = gaussian_blur(gray, params.blur_kernel);
        let binary = adaptive_threshold_inv(&blurred, params.block_size, params.threshold_c);
        morphological_close(&binary, (params.closing_kernel / 2).min(u8::MAX as u32) as u8)
    }

    fn hough_segments(&self, edges: &GrayImage, params: &ToolkitParams) -> Vec<[i32; 4]> {
        detect_lines(edges, params)
    }

    fn trace_contours(&self, binary: &GrayImage) -> Vec<Vec<Point<i32>>> {
        imageproc::contours::find_contours::<i32>(binary)
            .into_iter()
            .map(|c| c.points)
            .filter(|points| !points.is_empty())
            .collect()
    }

    fn approximate_polygon(
        &self,
        points: &[Point<i32>],
        epsilon: f64,
        closed: bool,
    ) -> Vec<Point<i32>> {
        simplify_polygon(points, epsilon, closed)
    }
}

/// Gaussian blur for a square kernel size, sigma derived the same way
/// common toolkits do for an unspecified sigma. Kernels of 1 or less are a no-op.
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32) -> GrayImage {
    if kernel_size <= 1 {
        return image.clone();
    }
    let sigma = 0.3 * ((kernel_size as f32 - 1.0) * 0.5 - 1.0) + 0.8;
    imageproc::filter::gaussian_blur_f32(image, sigma)
}

/// Inverse adaptive mean threshold
///
/// A pixel becomes foreground (255) when it is at least `c` darker than the
/// mean of its `block_size` neighbourhood.
pub fn adaptive_threshold_inv(image: &GrayImage, block_size: u32, c: f64) -> GrayImage {
    let radius = (block_size / 2).max(1);
    let mean = imageproc::filter::box_filter(image, radius, radius);

    let mut result = GrayImage::new(image.width(), image.height());
    for (x, y, pixel) in image.enumerate_pixels() {
        let local = mean.get_pixel(x, y).0[0] as f64;
        let value = if pixel.0[0] as f64 <= local - c { 255 } else { 0 };
        result.put_pixel(x, y, Luma([value]));
    }
    result
}

/// Morphological dilation with a square structuring element
pub fn dilate(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::dilate(image, Norm::LInf, radius)
}

/// Morphological erosion with a square structuring element
pub fn erode(image: &GrayImage, radius: u8) -> GrayImage {
    imageproc::morphology::erode(image, Norm::LInf, radius)
}

/// Morphological closing (dilate then erode) - fills small gaps
pub fn morphological_close(image: &GrayImage, radius: u8) -> GrayImage {
    if radius == 0 {
        return image.clone();
    }
    let dilated = dilate(image, radius);
    erode(&dilated, radius)
}

/// Detect lines using probabilistic Hough transform
///
/// Votes every edge pixel into (theta, rho) space, then walks the strongest
/// peaks, collecting unclaimed pixels near each line and splitting them into
/// runs at gaps larger than `max_line_gap`. Runs of at least
/// `min_line_length` become segments and claim their pixels.
pub fn detect_lines(edges: &GrayImage, params: &ToolkitParams) -> Vec<[i32; 4]> {
    if edges.width() == 0 || edges.height() == 0 {
        return Vec::new();
    }

    let rho_resolution = params.hough_rho.max(f64::EPSILON);
    let theta_resolution = params.hough_theta.max(f64::EPSILON);
    let num_thetas = ((std::f64::consts::PI / theta_resolution).round() as usize).max(1);

    // Precompute sin/cos tables
    let mut cos_table = Vec::with_capacity(num_thetas);
    let mut sin_table = Vec::with_capacity(num_thetas);
    for i in 0..num_thetas {
        let theta = i as f64 * theta_resolution;
        cos_table.push(theta.cos());
        sin_table.push(theta.sin());
    }

    let max_rho = rho_extent(edges.width(), edges.height());
    let num_rhos = (2.0 * max_rho / rho_resolution) as usize + 1;
    let rho_offset = max_rho;

    let mut accumulator = vec![0u32; num_thetas * num_rhos];

    let mut edge_points: Vec<(i32, i32)> = Vec::new();
    for (x, y, pixel) in edges.enumerate_pixels() {
        if pixel.0[0] > 128 {
            edge_points.push((x as i32, y as i32));
        }
    }

    for &(x, y) in &edge_points {
        for theta_idx in 0..num_thetas {
            let rho = x as f64 * cos_table[theta_idx] + y as f64 * sin_table[theta_idx];
            let rho_idx = ((rho + rho_offset) / rho_resolution) as usize;
            if rho_idx < num_rhos {
                accumulator[theta_idx * num_rhos + rho_idx] += 1;
            }
        }
    }

    let mut peaks: Vec<(usize, usize, u32)> = Vec::new();
    for theta_idx in 0..num_thetas {
        for rho_idx in 0..num_rhos {
            let votes = accumulator[theta_idx * num_rhos + rho_idx];
            if votes >= params.hough_threshold {
                peaks.push((theta_idx, rho_idx, votes));
            }
        }
    }
    peaks.sort_by(|a, b| b.2.cmp(&a.2));

    let mut lines = Vec::new();
    let mut used_points = vec![false; edge_points.len()];
    let band = 2.0 * rho_resolution;

    for &(theta_idx, rho_idx, _) in peaks.iter().take(500) {
        let rho = rho_idx as f64 * rho_resolution - rho_offset;
        let cos_t = cos_table[theta_idx];
        let sin_t = sin_table[theta_idx];

        let mut line_points: Vec<(i32, i32, usize)> = edge_points
            .iter()
            .enumerate()
            .filter(|(i, _)| !used_points[*i])
            .filter(|(_, &(x, y))| (x as f64 * cos_t + y as f64 * sin_t - rho).abs() < band)
            .map(|(i, &(x, y))| (x, y, i))
            .collect();

        if line_points.len() < 2 {
            continue;
        }

        // Order along the line direction
        line_points.sort_by(|a, b| {
            let proj_a = a.0 as f64 * (-sin_t) + a.1 as f64 * cos_t;
            let proj_b = b.0 as f64 * (-sin_t) + b.1 as f64 * cos_t;
            proj_a.total_cmp(&proj_b)
        });

        let mut segment_start = 0;
        for i in 1..=line_points.len() {
            let split = i == line_points.len() || {
                let dx = (line_points[i].0 - line_points[i - 1].0) as f64;
                let dy = (line_points[i].1 - line_points[i - 1].1) as f64;
                (dx * dx + dy * dy).sqrt() > params.max_line_gap
            };
            if !split {
                continue;
            }

            if i - segment_start >= 2 {
                let (x1, y1, _) = line_points[segment_start];
                let (x2, y2, _) = line_points[i - 1];
                let length = (((x2 - x1) as f64).powi(2) + ((y2 - y1) as f64).powi(2)).sqrt();

                if length >= params.min_line_length {
                    lines.push([x1, y1, x2, y2]);
                    for point in &line_points[segment_start..i] {
                        used_points[point.2] = true;
                    }
                }
            }
            segment_start = i;
        }
    }

    lines
}

/// Largest |rho| a pixel of a `width` x `height` image can vote for
fn rho_extent(width: u32, height: u32) -> f64 {
    (width as f64).hypot(height as f64)
}

/// Douglas-Peucker simplification on top of imageproc
///
/// Closed borders are split at the vertex farthest from the first one and
/// each half is simplified as an open curve, so neither half has a
/// degenerate chord.
pub fn simplify_polygon(points: &[Point<i32>], epsilon: f64, closed: bool) -> Vec<Point<i32>> {
    if points.len() < 3 || epsilon <= 0.0 {
        return points.to_vec();
    }
    if !closed {
        return approximate_polygon_dp(points, epsilon, false);
    }

    let first = points[0];
    let far = (1..points.len())
        .max_by_key(|&i| {
            let (dx, dy) = ((points[i].x - first.x) as i64, (points[i].y - first.y) as i64);
            dx * dx + dy * dy
        })
        .unwrap_or(0);
    if points[far] == first {
        return vec![first];
    }

    let mut polygon = approximate_polygon_dp(&points[..=far], epsilon, false);
    polygon.pop();

    let tail: Vec<Point<i32>> = points[far..].iter().chain(&points[..1]).copied().collect();
    let mut rest = approximate_polygon_dp(&tail, epsilon, false);
    rest.pop();
    polygon.extend(rest);
    polygon
}
