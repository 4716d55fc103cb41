//! Profile smoothing.
//!
//! Difficulty injection and sub-climb overlays splice new elevations into the
//! base curve, which leaves kinks at span boundaries. A single weighted
//! 3-point pass removes them while leaving both ends of the profile anchored.

use super::ElevationPoint;

/// Weight of the centre sample.
pub const CENTER_WEIGHT: f64 = 0.5;

/// Weight of each neighbour sample.
pub const NEIGHBOR_WEIGHT: f64 = 0.25;

/// Apply one 0.25/0.5/0.25 pass over every interior sample.
///
/// The pass reads from a snapshot of the input so each output depends only
/// on original elevations. The first and last samples are never modified.
pub fn smooth_elevations(points: &mut [ElevationPoint]) {
    if points.len() < 3 {
        return;
    }

    let original: Vec<f64> = points.iter().map(|p| p.elevation).collect();
    let last = points.len() - 1;

    for (i, point) in points.iter_mut().enumerate().take(last).skip(1) {
        point.elevation = original[i - 1] * NEIGHBOR_WEIGHT
            + original[i] * CENTER_WEIGHT
            + original[i + 1] * NEIGHBOR_WEIGHT;
    }
}
