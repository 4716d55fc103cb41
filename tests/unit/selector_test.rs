//! Unit tests for mode and quality selection

use colviz::benchmark::BenchmarkResult;
use colviz::capability::{CapabilitySnapshot, DeviceClass, RenderingSupport, Tier};
use colviz::visualization::selector::{mode_for_score, quality_for_score};
use colviz::visualization::{select, Mode, ModePreference, Quality};

const PREFERENCES: [ModePreference; 4] = [
    ModePreference::Auto,
    ModePreference::Profile2d,
    ModePreference::Terrain3d,
    ModePreference::MiniProfile,
];

const CLASSES: [DeviceClass; 3] = [DeviceClass::Mobile, DeviceClass::Tablet, DeviceClass::Desktop];

const TIERS: [Tier; 3] = [Tier::Low, Tier::Medium, Tier::High];

fn snapshot(supported: bool, tier: Tier, class: DeviceClass) -> CapabilitySnapshot {
    CapabilitySnapshot {
        rendering: RenderingSupport {
            supported,
            tier,
            ..Default::default()
        },
        device_class: class,
        ..Default::default()
    }
}

#[test]
fn test_never_3d_without_rendering() {
    for preference in PREFERENCES {
        for class in CLASSES {
            for score in [0.0, 29.0, 45.0, 60.0, 100.0] {
                let cap = snapshot(false, Tier::Low, class);
                let bench = BenchmarkResult::with_combined_score(score);
                let selection = select(&cap, Some(&bench), preference, None);
                assert_ne!(selection.mode, Mode::Terrain3d, "{preference:?} {class:?} {score}");
            }
        }
    }
}

#[test]
fn test_auto_mode_follows_score() {
    let cap = snapshot(true, Tier::High, DeviceClass::Desktop);
    for (score, mode) in [
        (0.0, Mode::MiniProfile),
        (29.99, Mode::MiniProfile),
        (30.0, Mode::Profile2d),
        (59.99, Mode::Profile2d),
        (60.0, Mode::Terrain3d),
        (100.0, Mode::Terrain3d),
    ] {
        let bench = BenchmarkResult::with_combined_score(score);
        assert_eq!(select(&cap, Some(&bench), ModePreference::Auto, None).mode, mode);
    }
}

#[test]
fn test_quality_monotonic_in_score() {
    for class in CLASSES {
        for tier in TIERS {
            let cap = snapshot(true, tier, class);
            let mut previous = Quality::Low;
            for step in 0..=100 {
                let bench = BenchmarkResult::with_combined_score(step as f64);
                let quality = select(&cap, Some(&bench), ModePreference::Profile2d, None).quality;
                assert!(quality >= previous, "{class:?} {tier:?} at {step}");
                previous = quality;
            }
        }
    }
}

#[test]
fn test_mobile_low_tier_high_score() {
    let cap = snapshot(true, Tier::Low, DeviceClass::Mobile);
    let bench = BenchmarkResult::with_combined_score(85.0);
    let selection = select(&cap, Some(&bench), ModePreference::Auto, None);

    assert_eq!(selection.mode, Mode::Terrain3d);
    assert_eq!(selection.quality, Quality::Low);
}

#[test]
fn test_mini_profile_always_low_quality() {
    for tier in TIERS {
        let cap = snapshot(true, tier, DeviceClass::Desktop);
        let bench = BenchmarkResult::with_combined_score(95.0);
        for quality in [None, Some(Quality::Medium), Some(Quality::High)] {
            let selection = select(&cap, Some(&bench), ModePreference::MiniProfile, quality);
            assert_eq!(selection.quality, Quality::Low);
        }
    }
}

#[test]
fn test_explicit_quality_honored_elsewhere() {
    let cap = snapshot(true, Tier::Medium, DeviceClass::Tablet);
    let bench = BenchmarkResult::with_combined_score(10.0);
    let selection = select(&cap, Some(&bench), ModePreference::Profile2d, Some(Quality::High));
    assert_eq!(selection, colviz::Selection { mode: Mode::Profile2d, quality: Quality::High });
}

#[test]
fn test_benchmark_recommendation_matches_thresholds() {
    for step in 0..=20 {
        let score = step as f64 * 5.0;
        let bench = BenchmarkResult::with_combined_score(score);
        assert_eq!(bench.recommended_mode, mode_for_score(score));
        assert_eq!(bench.recommended_quality, quality_for_score(score));
    }
}
