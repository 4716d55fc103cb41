//! Elevation profiles for cols.
//!
//! A [`Col`] is the sparse description of a climb that upstream data sources
//! provide (summit, length, average gradient and optionally a maximum gradient
//! and named sub-climbs). The [`synthesizer`] expands it into a dense sequence
//! of [`ElevationPoint`]s that 2D profile renderers and the terrain mesh
//! builder consume.

pub mod smoothing;
pub mod synthesizer;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use synthesizer::{synthesize, ProfileSynthesizer, SynthesizedProfile};

/// Minimum number of samples in a synthesized profile.
pub const MIN_SAMPLES: usize = 50;

/// Samples per kilometer of climb.
pub const SAMPLES_PER_KM: f64 = 10.0;

/// Longest climb accepted, in kilometers. Caps a profile at 10 000 samples.
pub const MAX_LENGTH_KM: f64 = 1000.0;

/// Errors that can occur while synthesizing a profile.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ProfileError {
    /// Required numeric fields missing, non-finite or non-positive.
    #[error("Invalid col data: {0}")]
    InvalidColData(String),
}

/// Result type for profile operations.
pub type ProfileResult<T> = Result<T, ProfileError>;

/// A named section of a col with its own gradient.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubClimb {
    /// Display name
    #[serde(default)]
    pub name: Option<String>,
    /// Gradient of the section in percent
    #[serde(default)]
    pub gradient: Option<f64>,
    /// Length of the section in kilometers
    #[serde(default)]
    pub length: Option<f64>,
    /// Distance from the foot of the col in kilometers
    #[serde(default)]
    pub start_distance: Option<f64>,
}

/// A mountain pass climb as supplied by the data layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Col {
    /// Col name
    #[serde(default)]
    pub name: String,
    /// Summit altitude in meters
    pub elevation: f64,
    /// Climb length in kilometers
    pub length: f64,
    /// Average gradient in percent
    pub avg_gradient: f64,
    /// Altitude at the foot of the climb in meters
    #[serde(default)]
    pub start_elevation: Option<f64>,
    /// Steepest gradient in percent
    #[serde(default)]
    pub max_gradient: Option<f64>,
    /// Named sub-climbs
    #[serde(default)]
    pub climbs: Option<Vec<SubClimb>>,
}

impl Col {
    /// Create a col from its three required attributes.
    pub fn new(name: impl Into<String>, elevation: f64, length: f64, avg_gradient: f64) -> Self {
        Self {
            name: name.into(),
            elevation,
            length,
            avg_gradient,
            start_elevation: None,
            max_gradient: None,
            climbs: None,
        }
    }

    /// Set an explicit base altitude.
    pub fn with_start_elevation(mut self, start: f64) -> Self {
        self.start_elevation = Some(start);
        self
    }

    /// Set the steepest gradient.
    pub fn with_max_gradient(mut self, max_gradient: f64) -> Self {
        self.max_gradient = Some(max_gradient);
        self
    }

    /// Set the named sub-climbs.
    pub fn with_climbs(mut self, climbs: Vec<SubClimb>) -> Self {
        self.climbs = Some(climbs);
        self
    }

    /// Check the required numeric fields.
    pub fn validate(&self) -> ProfileResult<()> {
        if !self.elevation.is_finite() || self.elevation <= 0.0 {
            return Err(ProfileError::InvalidColData(format!(
                "elevation must be positive, got {}",
                self.elevation
            )));
        }
        if !self.length.is_finite() || self.length <= 0.0 {
            return Err(ProfileError::InvalidColData(format!(
                "length must be positive, got {}",
                self.length
            )));
        }
        if self.length > MAX_LENGTH_KM {
            return Err(ProfileError::InvalidColData(format!(
                "length {} km exceeds the {MAX_LENGTH_KM} km limit",
                self.length
            )));
        }
        if !self.avg_gradient.is_finite() {
            return Err(ProfileError::InvalidColData(
                "average gradient must be a finite number".to_string(),
            ));
        }
        if let Some(start) = self.start_elevation {
            if !start.is_finite() {
                return Err(ProfileError::InvalidColData(
                    "start elevation must be a finite number".to_string(),
                ));
            }
        }
        if let Some(max) = self.max_gradient {
            if !max.is_finite() {
                return Err(ProfileError::InvalidColData(
                    "max gradient must be a finite number".to_string(),
                ));
            }
        }
        Ok(())
    }

    /// Base altitude, explicit or estimated from length and average gradient.
    ///
    /// The estimate is `elevation - length * avg_gradient / 100 * 1000`,
    /// clamped so it never goes below sea level.
    pub fn resolved_start_elevation(&self) -> f64 {
        match self.start_elevation {
            Some(start) => start,
            None => (self.elevation - self.length * self.avg_gradient / 100.0 * 1000.0).max(0.0),
        }
    }

    /// Number of samples a synthesized profile of this col carries.
    pub fn sample_count(&self) -> usize {
        let per_length = (self.length * SAMPLES_PER_KM).ceil();
        if per_length.is_finite() && per_length > MIN_SAMPLES as f64 {
            per_length as usize
        } else {
            MIN_SAMPLES
        }
    }
}

/// One sample of a synthesized profile.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ElevationPoint {
    /// Distance from the foot of the climb in kilometers
    pub distance: f64,
    /// Altitude in meters
    pub elevation: f64,
    /// Slope from the previous sample in percent (absent on the first sample)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gradient: Option<f64>,
}

/// Scalar summary of a col, kept next to the point sequence.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ElevationProfile {
    /// Base altitude in meters
    pub start: f64,
    /// Summit altitude in meters
    pub summit: f64,
    /// Climb length in kilometers
    pub distance: f64,
    /// Declared average gradient in percent
    pub gradient: f64,
    /// Declared maximum gradient in percent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_gradient: Option<f64>,
}

impl ElevationProfile {
    /// Summary of a col's declared attributes.
    pub fn from_col(col: &Col) -> Self {
        Self {
            start: col.resolved_start_elevation(),
            summit: col.elevation,
            distance: col.length,
            gradient: col.avg_gradient,
            max_gradient: col.max_gradient,
        }
    }

    /// Height difference between base and summit in meters.
    pub fn elevation_gain(&self) -> f64 {
        (self.summit - self.start).max(0.0)
    }
}

/// Recompute the local gradient of every sample from its neighbours.
pub fn recompute_gradients(points: &mut [ElevationPoint]) {
    if let Some(first) = points.first_mut() {
        first.gradient = None;
    }
    for i in 1..points.len() {
        let prev = points[i - 1];
        let curr = &mut points[i];
        let run_km = curr.distance - prev.distance;
        curr.gradient = if run_km > 0.0 {
            Some((curr.elevation - prev.elevation) / run_km / 10.0)
        } else {
            Some(0.0)
        };
    }
}

/// Index of the first sample at or after `distance`, or the last sample.
pub fn index_at_or_after(points: &[ElevationPoint], distance: f64) -> usize {
    points
        .iter()
        .position(|p| p.distance >= distance)
        .unwrap_or_else(|| points.len().saturating_sub(1))
}

/// Elevation at a distance along the profile, linearly interpolated.
///
/// Distances outside the profile clamp to its ends. Returns `None` for an
/// empty profile.
pub fn elevation_at(points: &[ElevationPoint], distance: f64) -> Option<f64> {
    let first = points.first()?;
    if distance <= first.distance {
        return Some(first.elevation);
    }

    for pair in points.windows(2) {
        let (prev, curr) = (pair[0], pair[1]);
        if curr.distance >= distance {
            let span = curr.distance - prev.distance;
            let t = if span > 1e-9 {
                (distance - prev.distance) / span
            } else {
                0.0
            };
            return Some(prev.elevation + t * (curr.elevation - prev.elevation));
        }
    }

    points.last().map(|p| p.elevation)
}

/// Local gradient at a distance along the profile.
pub fn gradient_at(points: &[ElevationPoint], distance: f64) -> Option<f64> {
    if points.len() < 2 {
        return None;
    }
    let idx = index_at_or_after(points, distance).max(1);
    points[idx].gradient
}
