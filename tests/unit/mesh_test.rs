//! Unit tests for terrain mesh building

use colviz::profile::{Col, ElevationPoint, ProfileSynthesizer};
use colviz::terrain::{
    build_mesh, build_terrain, MeshError, MeshOptions, SurroundNoise, TerrainStyle, TerrainVertex,
};

fn galibier_points() -> Vec<ElevationPoint> {
    let col = Col::new("Col du Galibier", 2642.0, 18.1, 6.9).with_max_gradient(10.1);
    ProfileSynthesizer::with_seed(11)
        .synthesize(&col)
        .unwrap()
        .points
}

#[test]
fn test_galibier_mesh_sizes() {
    let points = galibier_points();
    let mesh = build_mesh(&points, 18.1, &MeshOptions::default()).unwrap();

    assert_eq!(mesh.vertex_count(), 33 * 181);
    assert_eq!(mesh.triangle_count(), 2 * 32 * 180);
    assert_eq!(mesh.normals.len(), mesh.vertices.len());
    assert_eq!(mesh.uvs.len(), mesh.vertex_count() * 2);
}

#[test]
fn test_indices_in_range() {
    let points = galibier_points();
    let options = MeshOptions {
        width_segments: 8,
        surround: SurroundNoise::Perlin { seed: 3 },
        ..Default::default()
    };
    let mesh = build_mesh(&points, 18.1, &options).unwrap();

    let count = mesh.vertex_count() as u32;
    assert!(mesh.indices.iter().all(|&i| i < count));
    assert!(mesh.uvs.iter().all(|uv| (0.0..=1.0).contains(uv)));
}

#[test]
fn test_ground_never_above_road() {
    let points = galibier_points();
    let options = MeshOptions::default();
    let mesh = build_mesh(&points, 18.1, &options).unwrap();
    let columns = options.width_segments + 1;

    for (row, point) in points.iter().enumerate() {
        let road = point.elevation as f32 * options.vertical_exaggeration / 1000.0;
        for col in 0..columns {
            let y = mesh.position(row * columns + col).unwrap().y;
            assert!(y <= road + 1e-4, "row {row} col {col}: {y} > {road}");
        }
    }
}

#[test]
fn test_two_samples_is_enough() {
    let points = vec![
        ElevationPoint {
            distance: 0.0,
            elevation: 100.0,
            gradient: None,
        },
        ElevationPoint {
            distance: 1.0,
            elevation: 150.0,
            gradient: Some(5.0),
        },
    ];
    let mesh = build_mesh(&points, 1.0, &MeshOptions::default()).unwrap();
    assert_eq!(mesh.length_segments, 1);
    assert_eq!(mesh.triangle_count(), 64);
}

#[test]
fn test_insufficient_samples() {
    let single = [ElevationPoint {
        distance: 0.0,
        elevation: 100.0,
        gradient: None,
    }];
    assert_eq!(
        build_mesh(&single, 1.0, &MeshOptions::default()),
        Err(MeshError::InsufficientSamples { count: 1 })
    );
    assert_eq!(
        build_mesh(&[], 1.0, &MeshOptions::default()),
        Err(MeshError::InsufficientSamples { count: 0 })
    );
}

#[test]
fn test_buffers_for_upload() {
    let points = galibier_points();
    let mesh = build_mesh(&points, 18.1, &MeshOptions::default()).unwrap();

    let stride = std::mem::size_of::<TerrainVertex>();
    assert_eq!(stride, 32);
    assert_eq!(mesh.vertex_bytes().len(), mesh.vertex_count() * stride);
    assert_eq!(mesh.index_bytes().len(), mesh.indices.len() * 4);
}

#[test]
fn test_terrain_centerline_matches_samples() {
    let points = galibier_points();
    let geometry = build_terrain(&points, 18.1, &MeshOptions::default()).unwrap();

    assert_eq!(geometry.centerline.len(), points.len());
    assert!(geometry.centerline.iter().all(|p| p.x == 0.0));

    let (min, max) = geometry.mesh.bounds().unwrap();
    let half_corridor = 0.4 * 18.1 / 2.0;
    assert!((max.x - half_corridor).abs() < 1e-3);
    assert!((min.x + half_corridor).abs() < 1e-3);
    assert!((max.z - 18.1).abs() < 1e-3);
}

#[test]
fn test_style_from_profile() {
    let alpine = Col::new("Stelvio", 2757.0, 24.3, 7.4);
    let hills = Col::new("Mur", 400.0, 2.0, 4.0);
    let flat = Col::new("Drag", 150.0, 5.0, 1.0);

    let style = |col: &Col| {
        TerrainStyle::from_profile(&ProfileSynthesizer::with_seed(1).synthesize(col).unwrap().profile)
    };
    assert_eq!(style(&alpine), TerrainStyle::Mountain);
    assert_eq!(style(&hills), TerrainStyle::RollingHills);
    assert_eq!(style(&flat), TerrainStyle::Flat);
}
