//! Mode and quality selection.
//!
//! A pure function of the capability snapshot, the benchmark result and any
//! explicit user choice. Rules, first match wins:
//!
//! 1. An explicit mode is used as given, except that 3D is never chosen
//!    without accelerated rendering.
//! 2. Without accelerated rendering the mode is `profile-2d`.
//! 3. Otherwise the combined benchmark score picks the mode: below 30
//!    `mini-profile`, below 60 `profile-2d`, else `terrain-3d`.
//!
//! Quality is the explicit choice if any, else from the score (below 40
//! low, below 75 medium, else high), and is always forced to low for
//! `mini-profile` and for low-tier mobile devices.

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{Mode, ModePreference, Quality};
use crate::benchmark::BenchmarkResult;
use crate::capability::{CapabilitySnapshot, DeviceClass, Tier};

/// Combined score below which the mini profile is used.
pub const MINI_PROFILE_BELOW: f64 = 30.0;

/// Combined score below which the 2D profile is used.
pub const PROFILE_2D_BELOW: f64 = 60.0;

/// Combined score below which quality is low.
pub const LOW_QUALITY_BELOW: f64 = 40.0;

/// Combined score below which quality is medium.
pub const MEDIUM_QUALITY_BELOW: f64 = 75.0;

/// Chosen mode and quality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Selection {
    pub mode: Mode,
    pub quality: Quality,
}

/// Mode implied by a combined score alone.
pub fn mode_for_score(score: f64) -> Mode {
    if score < MINI_PROFILE_BELOW {
        Mode::MiniProfile
    } else if score < PROFILE_2D_BELOW {
        Mode::Profile2d
    } else {
        Mode::Terrain3d
    }
}

/// Quality implied by a combined score alone.
pub fn quality_for_score(score: f64) -> Quality {
    if score < LOW_QUALITY_BELOW {
        Quality::Low
    } else if score < MEDIUM_QUALITY_BELOW {
        Quality::Medium
    } else {
        Quality::High
    }
}

fn quality_for_tier(tier: Tier) -> Quality {
    match tier {
        Tier::Low => Quality::Low,
        Tier::Medium => Quality::Medium,
        Tier::High => Quality::High,
    }
}

/// Choose a visualization mode and quality.
///
/// Without a benchmark result the automatic mode is `profile-2d` and the
/// quality follows the rendering tier.
pub fn select(
    capability: &CapabilitySnapshot,
    benchmark: Option<&BenchmarkResult>,
    preference: ModePreference,
    explicit_quality: Option<Quality>,
) -> Selection {
    let accelerated = capability.rendering.supported;
    let score = benchmark.map(|b| b.combined_score);

    let mode = match (preference.explicit(), score) {
        (Some(Mode::Terrain3d), _) if !accelerated => Mode::Profile2d,
        (Some(mode), _) => mode,
        (None, _) if !accelerated => Mode::Profile2d,
        (None, Some(score)) => mode_for_score(score),
        (None, None) => Mode::Profile2d,
    };

    let mut quality = match (explicit_quality, score) {
        (Some(quality), _) => quality,
        (None, Some(score)) => quality_for_score(score),
        (None, None) => quality_for_tier(capability.rendering.tier),
    };

    let low_end_mobile = capability.device_class == DeviceClass::Mobile
        && capability.rendering.tier == Tier::Low;
    if mode == Mode::MiniProfile || low_end_mobile {
        quality = Quality::Low;
    }

    debug!(%mode, %quality, ?score, accelerated, "Selected visualization");

    Selection { mode, quality }
}
