//! Unit tests for profile synthesis

use colviz::profile::synthesizer::{base_curve, inject_difficulty, overlay_climbs};
use colviz::profile::{
    elevation_at, gradient_at, Col, ElevationPoint, ElevationProfile, ProfileError,
    ProfileSynthesizer, SubClimb,
};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

fn galibier() -> Col {
    Col::new("Col du Galibier", 2642.0, 18.1, 6.9).with_max_gradient(10.1)
}

/// Random but valid col, optionally with a max gradient and sub-climbs.
fn random_col(rng: &mut StdRng) -> Col {
    let length = rng.gen_range(0.5..40.0);
    let avg = rng.gen_range(1.0..12.0);
    let summit = rng.gen_range(500.0..3000.0);

    let mut col = Col::new("Random", summit, length, avg);
    if rng.gen_bool(0.5) {
        col = col.with_max_gradient(avg + rng.gen_range(0.0..8.0));
    }
    if rng.gen_bool(0.3) {
        let climbs = (0..rng.gen_range(1..4))
            .map(|i| SubClimb {
                name: Some(format!("Section {i}")),
                gradient: Some(rng.gen_range(2.0..14.0)),
                length: Some(rng.gen_range(0.2..length)),
                start_distance: Some(rng.gen_range(0.0..length * 1.2)),
            })
            .collect();
        col = col.with_climbs(climbs);
    }
    col
}

#[test]
fn test_galibier_start_and_count() {
    let col = galibier();
    assert!((col.resolved_start_elevation() - 1393.1).abs() < 1e-6);

    let result = ProfileSynthesizer::with_seed(1).synthesize(&col).unwrap();
    assert_eq!(result.points.len(), 181);
    assert!((result.points[0].elevation - 1393.1).abs() < 1e-6);
    assert_eq!(result.points[180].elevation, 2642.0);
}

#[test]
fn test_short_col_uses_minimum_samples() {
    let col = Col::new("Côte", 300.0, 0.3, 5.0);
    let result = ProfileSynthesizer::with_seed(1).synthesize(&col).unwrap();
    assert_eq!(result.points.len(), 50);
}

#[test]
fn test_start_never_below_sea_level() {
    let col = Col::new("Steep", 200.0, 10.0, 8.0);
    assert_eq!(col.resolved_start_elevation(), 0.0);

    let result = ProfileSynthesizer::with_seed(1).synthesize(&col).unwrap();
    assert_eq!(result.points[0].elevation, 0.0);
}

#[test]
fn test_profile_properties_hold_for_random_cols() {
    let mut rng = StdRng::seed_from_u64(2024);
    let mut synth = ProfileSynthesizer::with_seed(99);

    for _ in 0..200 {
        let col = random_col(&mut rng);
        let result = synth.synthesize(&col).unwrap();
        let points = &result.points;
        let expected = ((col.length * 10.0).ceil() as usize).max(50);

        assert_eq!(points.len(), expected, "sample count for {col:?}");
        assert_eq!(points[0].distance, 0.0);
        assert!((points[points.len() - 1].distance - col.length).abs() < 1e-9);
        assert!((points[0].elevation - result.profile.start).abs() < 1e-6);
        assert!((points[points.len() - 1].elevation - col.elevation).abs() < 1e-6);

        assert!(points[0].gradient.is_none());
        for pair in points.windows(2) {
            assert!(pair[1].distance > pair[0].distance);
            assert!(pair[1].gradient.is_some());
            assert!(pair[1].elevation.is_finite());
        }
    }
}

#[test]
fn test_same_seed_same_profile() {
    let col = galibier();
    let a = ProfileSynthesizer::with_seed(5).synthesize(&col).unwrap();
    let b = ProfileSynthesizer::with_seed(5).synthesize(&col).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_without_max_gradient_is_deterministic() {
    let col = Col::new("Plain", 1500.0, 8.0, 6.0);
    let a = ProfileSynthesizer::with_seed(1).synthesize(&col).unwrap();
    let b = ProfileSynthesizer::with_seed(2).synthesize(&col).unwrap();
    assert_eq!(a.points, b.points);
}

#[test]
fn test_sub_climb_sets_local_gradient() {
    let col = Col::new("Sections", 2000.0, 10.0, 7.0).with_climbs(vec![SubClimb {
        name: Some("Wall".into()),
        gradient: Some(12.0),
        length: Some(2.0),
        start_distance: Some(3.0),
    }]);
    let result = ProfileSynthesizer::with_seed(1).synthesize(&col).unwrap();

    // Well inside the section, away from the smoothed edges.
    let g = gradient_at(&result.points, 4.0).unwrap();
    assert!((g - 12.0).abs() < 0.5, "gradient {g}");
    let summit = elevation_at(&result.points, 10.0).unwrap();
    assert!((summit - 2000.0).abs() < 1e-9);
}

#[test]
fn test_invalid_cols_rejected() {
    let mut synth = ProfileSynthesizer::with_seed(1);
    for col in [
        Col::new("No length", 1000.0, 0.0, 5.0),
        Col::new("Negative", -10.0, 5.0, 5.0),
        Col::new("NaN", 1000.0, f64::NAN, 5.0),
        Col::new("Inf gradient", 1000.0, 5.0, f64::INFINITY),
        Col::new("Absurd length", 1000.0, 1e9, 0.0),
    ] {
        assert!(matches!(
            synth.synthesize(&col),
            Err(ProfileError::InvalidColData(_))
        ));
    }
}

#[test]
fn test_col_from_json() {
    let json = r#"{
        "name": "Mont Ventoux",
        "elevation": 1909,
        "length": 21.5,
        "avgGradient": 7.5,
        "maxGradient": 12,
        "climbs": [{ "gradient": 10, "length": 2, "startDistance": 5 }]
    }"#;
    let col: Col = serde_json::from_str(json).unwrap();
    assert_eq!(col.max_gradient, Some(12.0));
    assert_eq!(col.climbs.as_ref().map(Vec::len), Some(1));

    let result = ProfileSynthesizer::with_seed(3).synthesize(&col).unwrap();
    assert_eq!(result.points.len(), 215);
}

/// Straight 5% climb: smoothing leaves it unchanged.
fn straight_climb(samples: usize) -> Vec<ElevationPoint> {
    (0..samples)
        .map(|i| {
            let distance = i as f64 * 0.1;
            ElevationPoint {
                distance,
                elevation: 800.0 + 50.0 * distance,
                gradient: if i == 0 { None } else { Some(5.0) },
            }
        })
        .collect()
}

#[test]
fn test_ramps_stay_in_middle_half() {
    let n = 200;
    let max_gradient = 15.0;
    let before = straight_climb(n);

    for seed in 0..50 {
        let mut points = before.clone();
        inject_difficulty(&mut points, max_gradient, &mut StdRng::seed_from_u64(seed));

        let changed: Vec<usize> = (0..n)
            .filter(|&i| (points[i].elevation - before[i].elevation).abs() > 1e-9)
            .collect();
        assert!(!changed.is_empty(), "seed {seed} injected nothing");

        // Smoothing spreads each ramp by one sample on either side.
        let lo = n / 4 - 1;
        let hi = n - n / 4;
        assert!(
            changed.iter().all(|&i| (lo..=hi).contains(&i)),
            "seed {seed} touched {changed:?}"
        );

        let gradients: Vec<f64> = points.iter().filter_map(|p| p.gradient).collect();
        let peak = gradients.iter().copied().fold(f64::MIN, f64::max);
        assert!(peak <= max_gradient + 1e-9, "seed {seed} peak {peak}");
        assert!(peak > 10.0, "seed {seed} peak {peak}");

        assert_eq!(points.len(), n);
        assert_eq!(points[0].elevation, before[0].elevation);
        assert_eq!(points[n - 1].elevation, before[n - 1].elevation);
    }
}

#[test]
fn test_no_ramps_without_max_gradient() {
    let before = straight_climb(120);
    let mut points = before.clone();
    inject_difficulty(&mut points, 0.0, &mut StdRng::seed_from_u64(3));
    assert_eq!(points, before);
}

#[test]
fn test_overlapping_climbs_last_one_wins() {
    let long = SubClimb {
        name: Some("Long drag".into()),
        gradient: Some(4.0),
        length: Some(4.0),
        start_distance: Some(2.0),
    };
    let wall = SubClimb {
        name: Some("Wall".into()),
        gradient: Some(12.0),
        length: Some(1.0),
        start_distance: Some(4.0),
    };

    let mut wall_last = base_curve(10.0, 1000.0, 1700.0, 101);
    overlay_climbs(&mut wall_last, &[long.clone(), wall.clone()], 10.0, 1700.0);
    let g = gradient_at(&wall_last, 4.5).unwrap();
    assert!((g - 12.0).abs() < 1e-6, "gradient {g}");

    let mut long_last = base_curve(10.0, 1000.0, 1700.0, 101);
    overlay_climbs(&mut long_last, &[wall, long], 10.0, 1700.0);
    let g = gradient_at(&long_last, 4.5).unwrap();
    assert!((g - 4.0).abs() < 1e-6, "gradient {g}");

    for points in [&wall_last, &long_last] {
        assert!((elevation_at(points, 10.0).unwrap() - 1700.0).abs() < 1e-9);
    }
}

#[test]
fn test_declared_attributes_pass_through() {
    let col = galibier().with_climbs(vec![SubClimb {
        name: Some("Plan Lachat".into()),
        gradient: Some(9.0),
        length: Some(3.0),
        start_distance: Some(10.0),
    }]);
    let result = ProfileSynthesizer::with_seed(8).synthesize(&col).unwrap();

    let ElevationProfile {
        start,
        summit,
        distance,
        gradient,
        max_gradient,
    } = result.profile;
    assert!((start - 1393.1).abs() < 1e-9);
    assert_eq!(summit, 2642.0);
    assert_eq!(distance, 18.1);
    assert_eq!(gradient, 6.9);
    assert_eq!(max_gradient, Some(10.1));

    let plain = ProfileSynthesizer::with_seed(8)
        .synthesize(&Col::new("Plain", 1500.0, 8.0, 6.0))
        .unwrap();
    assert_eq!(plain.profile.max_gradient, None);
}
