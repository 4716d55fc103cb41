//! Elevation profile synthesis.
//!
//! Turns the handful of scalars describing a col into a dense, plausible
//! profile in three composable passes:
//!
//! 1. [`base_curve`] - an eased S-curve from the foot to the summit.
//! 2. [`inject_difficulty`] - steeper ramps drawn up to the col's maximum
//!    gradient, placed in the middle half of the climb.
//! 3. [`overlay_climbs`] - named sub-climbs with their declared gradients,
//!    re-blending the remainder so the summit is still reached on time.
//!
//! Ramp placement in pass 2 is random. A synthesizer built with
//! [`ProfileSynthesizer::with_seed`] reproduces the same profile for the same
//! col; [`ProfileSynthesizer::new`] draws a fresh seed, so two calls may place
//! the ramps differently.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use super::smoothing::smooth_elevations;
use super::{
    index_at_or_after, recompute_gradients, Col, ElevationPoint, ElevationProfile, ProfileResult,
    SubClimb,
};

/// Fewest injected ramps.
const MIN_RAMPS: usize = 2;

/// Most injected ramps.
const MAX_RAMPS: usize = 4;

/// Ramp gradients are drawn from `[RAMP_FLOOR * max_gradient, max_gradient]`.
const RAMP_FLOOR: f64 = 0.8;

/// Placement attempts per ramp before giving up on it.
const PLACEMENT_ATTEMPTS: usize = 16;

/// Output of a synthesis run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SynthesizedProfile {
    /// Declared attributes of the col
    pub profile: ElevationProfile,
    /// Dense samples ordered by distance
    pub points: Vec<ElevationPoint>,
}

/// Profile synthesizer with an explicit random source.
#[derive(Debug, Clone)]
pub struct ProfileSynthesizer {
    rng: StdRng,
}

impl Default for ProfileSynthesizer {
    fn default() -> Self {
        Self::new()
    }
}

impl ProfileSynthesizer {
    /// Create a synthesizer seeded from system entropy.
    pub fn new() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    /// Create a deterministic synthesizer.
    pub fn with_seed(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Synthesize the profile of a col.
    pub fn synthesize(&mut self, col: &Col) -> ProfileResult<SynthesizedProfile> {
        col.validate()?;

        let profile = ElevationProfile::from_col(col);
        let mut points = base_curve(col.length, profile.start, profile.summit, col.sample_count());

        if let Some(max_gradient) = col.max_gradient {
            inject_difficulty(&mut points, max_gradient, &mut self.rng);
        }

        if let Some(climbs) = col.climbs.as_deref() {
            if !climbs.is_empty() {
                overlay_climbs(&mut points, climbs, col.length, profile.summit);
            }
        }

        debug!(
            col = %col.name,
            samples = points.len(),
            start = profile.start,
            summit = profile.summit,
            "Synthesized elevation profile"
        );

        Ok(SynthesizedProfile { profile, points })
    }
}

/// Synthesize a profile with a freshly seeded synthesizer.
pub fn synthesize(col: &Col) -> ProfileResult<SynthesizedProfile> {
    ProfileSynthesizer::new().synthesize(col)
}

/// Cubic ease-in-out over `t` in `[0, 1]`.
pub fn ease_in_out_cubic(t: f64) -> f64 {
    if t < 0.5 {
        4.0 * t * t * t
    } else {
        1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
    }
}

/// Evenly spaced samples on an eased curve from `start` to `summit`.
///
/// The first sample sits at distance 0 with `start`, the last at `length`
/// with `summit`.
pub fn base_curve(length: f64, start: f64, summit: f64, samples: usize) -> Vec<ElevationPoint> {
    let samples = samples.max(2);
    let last = samples - 1;
    let rise = summit - start;

    let mut points: Vec<ElevationPoint> = (0..samples)
        .map(|i| {
            let t = i as f64 / last as f64;
            ElevationPoint {
                distance: length * t,
                elevation: start + rise * ease_in_out_cubic(t),
                gradient: None,
            }
        })
        .collect();

    points[0].elevation = start;
    points[last].distance = length;
    points[last].elevation = summit;

    recompute_gradients(&mut points);
    points
}

/// Splice 2-4 steeper ramps into the middle half of the profile.
///
/// Each ramp climbs at a gradient drawn from `[0.8 * max_gradient,
/// max_gradient]`, carrying its elevation forward sample by sample within
/// the ramp only. The whole profile is smoothed afterwards.
pub fn inject_difficulty<R: Rng + ?Sized>(
    points: &mut [ElevationPoint],
    max_gradient: f64,
    rng: &mut R,
) {
    if max_gradient <= 0.0 || points.len() < 8 {
        return;
    }

    let n = points.len();
    let window_start = n / 4;
    let window_end = n - n / 4;
    let max_span = (n / 12).max(3);

    let wanted = rng.gen_range(MIN_RAMPS..=MAX_RAMPS);
    let mut spans: Vec<(usize, usize)> = Vec::with_capacity(wanted);

    for _ in 0..wanted {
        for _ in 0..PLACEMENT_ATTEMPTS {
            let span_len = rng.gen_range(2..=max_span);
            if window_start + span_len > window_end {
                break;
            }
            let start = rng.gen_range(window_start..=window_end - span_len);
            let end = start + span_len;

            // Keep at least one untouched sample between ramps.
            let overlaps = spans.iter().any(|&(s, e)| start <= e && s <= end);
            if !overlaps {
                spans.push((start, end));
                break;
            }
        }
    }

    spans.sort_unstable();

    for &(start, end) in &spans {
        let gradient = rng.gen_range(RAMP_FLOOR * max_gradient..=max_gradient);
        for i in start.max(1)..end {
            let run_km = points[i].distance - points[i - 1].distance;
            points[i].elevation = points[i - 1].elevation + gradient * 10.0 * run_km;
        }
        debug!(start, end, gradient, "Injected ramp");
    }

    smooth_elevations(points);
    recompute_gradients(points);
}

/// Overlay named sub-climbs onto the profile.
///
/// A sub-climb needs both a gradient and a length; its range starts at the
/// first sample at or after its start distance. Samples past the range are
/// re-blended at a constant gradient that lands exactly on `summit` at the
/// final distance. Sub-climbs starting beyond `length` are skipped. Ranges
/// that overlap are applied in input order, so later entries win.
pub fn overlay_climbs(
    points: &mut [ElevationPoint],
    climbs: &[SubClimb],
    length: f64,
    summit: f64,
) {
    if points.len() < 2 {
        return;
    }
    let last = points.len() - 1;

    for climb in climbs {
        let (Some(gradient), Some(climb_length)) = (climb.gradient, climb.length) else {
            continue;
        };
        let start_distance = climb.start_distance.unwrap_or(0.0);

        if !start_distance.is_finite() || start_distance < 0.0 || start_distance > length {
            warn!(
                climb = climb.name.as_deref().unwrap_or("unnamed"),
                start_distance, length, "Skipping sub-climb outside the col"
            );
            continue;
        }
        if !gradient.is_finite() || !climb_length.is_finite() || climb_length <= 0.0 {
            continue;
        }

        let range_start = index_at_or_after(points, start_distance);
        let range_end = index_at_or_after(points, start_distance + climb_length);

        let anchor = points[range_start];
        for point in &mut points[range_start + 1..=range_end] {
            point.elevation = anchor.elevation + gradient * 10.0 * (point.distance - anchor.distance);
        }

        if range_end < last {
            let end = points[range_end];
            let remaining_m = (points[last].distance - end.distance) * 1000.0;
            if remaining_m > 0.0 {
                let remaining_gradient = (summit - end.elevation) / remaining_m * 100.0;
                for point in &mut points[range_end + 1..] {
                    point.elevation = end.elevation
                        + remaining_gradient / 100.0 * (point.distance - end.distance) * 1000.0;
                }
            }
        }

        debug!(
            climb = climb.name.as_deref().unwrap_or("unnamed"),
            range_start, range_end, gradient, "Applied sub-climb"
        );
    }

    points[last].elevation = summit;
    smooth_elevations(points);
    recompute_gradients(points);
}
