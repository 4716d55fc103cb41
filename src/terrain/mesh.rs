//! Grid mesh and road centerline construction.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::noise::NoiseSampler;
use super::{MeshError, MeshOptions, MeshResult, TerrainMesh};
use crate::profile::ElevationPoint;

/// Corridor width as a fraction of the climb length.
pub const CORRIDOR_WIDTH_RATIO: f32 = 0.4;

/// Half-width of the flat road band, in UV units from the centre line.
pub const ROAD_HALF_WIDTH: f32 = 0.05;

/// Depth of the ground falloff beside the road.
pub const FALLOFF_DEPTH: f32 = 0.3;

/// Meters to scene units.
const METERS_PER_UNIT: f32 = 1000.0;

/// Mesh plus the road centerline built from the same samples.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainGeometry {
    pub mesh: TerrainMesh,
    pub centerline: Vec<Vec3>,
}

/// Build the terrain grid for a profile.
///
/// One row per elevation sample and `width_segments` columns across a
/// corridor `0.4 * length` wide. Cells within the road band take the
/// profile elevation; cells beside it drop away with lateral distance.
/// Triangles wind `(a, c, b)` and `(c, d, b)` per quad.
pub fn build_mesh(
    points: &[ElevationPoint],
    length: f64,
    options: &MeshOptions,
) -> MeshResult<TerrainMesh> {
    if points.len() < 2 {
        return Err(MeshError::InsufficientSamples {
            count: points.len(),
        });
    }

    let width_segments = options.width_segments.max(1);
    let length_segments = points.len() - 1;
    let columns = width_segments + 1;
    let rows = length_segments + 1;
    let vertex_count = columns * rows;

    let length = length as f32;
    let corridor_width = CORRIDOR_WIDTH_RATIO * length;
    let noise = NoiseSampler::new(options.surround);

    let mut vertices = Vec::with_capacity(vertex_count * 3);
    let mut normals = Vec::with_capacity(vertex_count * 3);
    let mut uvs = Vec::with_capacity(vertex_count * 2);

    for (z, point) in points.iter().enumerate() {
        let u = z as f32 / length_segments as f32;
        let z_pos = u * length * options.horizontal_exaggeration;
        let road_y = point.elevation as f32 * options.vertical_exaggeration / METERS_PER_UNIT;

        for x in 0..columns {
            let v = x as f32 / width_segments as f32;
            let x_pos = (v - 0.5) * corridor_width;

            let lateral = (v - 0.5).abs();
            let y_pos = if lateral > ROAD_HALF_WIDTH {
                road_y - (lateral - ROAD_HALF_WIDTH) * FALLOFF_DEPTH * noise.sample(x, z)
            } else {
                road_y
            };

            vertices.extend_from_slice(&[x_pos, y_pos, z_pos]);
            normals.extend_from_slice(&[0.0, 1.0, 0.0]);
            uvs.extend_from_slice(&[u, v]);
        }
    }

    let mut indices = Vec::with_capacity(length_segments * width_segments * 6);
    for z in 0..length_segments {
        for x in 0..width_segments {
            let a = (z * columns + x) as u32;
            let b = a + 1;
            let c = ((z + 1) * columns + x) as u32;
            let d = c + 1;

            indices.extend_from_slice(&[a, c, b]);
            indices.extend_from_slice(&[c, d, b]);
        }
    }

    debug!(
        vertices = vertex_count,
        triangles = indices.len() / 3,
        width_segments,
        length_segments,
        "Built terrain mesh"
    );

    Ok(TerrainMesh {
        vertices,
        indices,
        normals,
        uvs,
        width_segments,
        length_segments,
    })
}

/// Road centerline through the middle of the corridor.
///
/// One point per sample at `x = 0`, using the same scaling as the mesh so a
/// ribbon or tube laid along it sits on the road band.
pub fn road_centerline(points: &[ElevationPoint], options: &MeshOptions) -> Vec<Vec3> {
    points
        .iter()
        .map(|p| {
            Vec3::new(
                0.0,
                p.elevation as f32 * options.vertical_exaggeration / METERS_PER_UNIT,
                p.distance as f32 * options.horizontal_exaggeration,
            )
        })
        .collect()
}

/// Build both the mesh and its centerline.
pub fn build_terrain(
    points: &[ElevationPoint],
    length: f64,
    options: &MeshOptions,
) -> MeshResult<TerrainGeometry> {
    let mesh = build_mesh(points, length, options)?;
    let centerline = road_centerline(points, options);
    Ok(TerrainGeometry { mesh, centerline })
}
