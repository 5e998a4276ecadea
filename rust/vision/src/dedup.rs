// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Near-duplicate segment removal
//!
//! Probabilistic line detection reports several overlapping fragments for a
//! single drawn edge. A candidate is a duplicate of an accepted segment when
//! the two are parallel AND both endpoint pairs lie within the merge radius.
//! The first accepted match wins; nothing is averaged. Comparisons treat
//! segments as undirected.

use crate::config::DedupConfig;
use crate::error::{Error, Result};
use crate::types::LineSegment;

/// Collapse near-duplicate segments, keeping the first of each group
pub fn dedup_segments(segments: &[LineSegment], config: &DedupConfig) -> Result<Vec<LineSegment>> {
    if let Some((index, seg)) = segments.iter().enumerate().find(|(_, s)| s.direction().is_none()) {
        return Err(Error::DegenerateGeometry(format!(
            "segment {} from ({}, {}) to ({}, {}) has zero length",
            index, seg.start.x, seg.start.y, seg.end.x, seg.end.y
        )));
    }

    let mut accepted: Vec<LineSegment> = Vec::with_capacity(segments.len());
    for candidate in segments {
        if !accepted.iter().any(|a| is_duplicate(candidate, a, config)) {
            accepted.push(*candidate);
        }
    }

    tracing::debug!(
        input = segments.len(),
        unique = accepted.len(),
        "deduplicated segments"
    );
    Ok(accepted)
}

/// Parallel and proximate
pub fn is_duplicate(candidate: &LineSegment, accepted: &LineSegment, config: &DedupConfig) -> bool {
    are_parallel(candidate, accepted, config.parallel_epsilon)
        && are_proximate(candidate, accepted, config.merge_radius)
}

/// |cross| of the unit directions below `epsilon`; degenerate segments are
/// never parallel to anything
pub fn are_parallel(a: &LineSegment, b: &LineSegment, epsilon: f64) -> bool {
    match (a.direction(), b.direction()) {
        (Some((ax, ay)), Some((bx, by))) => (ax * by - ay * bx).abs() < epsilon,
        _ => false,
    }
}

/// Both corresponding endpoint distances below `radius`, under whichever
/// endpoint pairing matches better
pub fn are_proximate(a: &LineSegment, b: &LineSegment, radius: f64) -> bool {
    let same = a.start.distance_to(&b.start).max(a.end.distance_to(&b.end));
    let swapped = a.start.distance_to(&b.end).max(a.end.distance_to(&b.start));
    same.min(swapped) < radius
}
