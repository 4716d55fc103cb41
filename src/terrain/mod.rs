//! Terrain geometry for 3D col views.
//!
//! The mesh builder turns a synthesized elevation profile into a regular grid
//! that follows the climb along its length, with a flat road band down the
//! middle and gently falling ground either side. Geometry is emitted as flat
//! arrays ready for upload; the consuming renderer owns cameras, lighting,
//! normal recomputation and GPU resource lifetimes.

pub mod mesh;
pub mod noise;

use bytemuck::{Pod, Zeroable};
use glam::Vec3;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::profile::ElevationProfile;

pub use mesh::{build_mesh, build_terrain, road_centerline, TerrainGeometry};
pub use noise::SurroundNoise;

/// Errors that can occur while building terrain geometry.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MeshError {
    /// Fewer than two samples cannot form a grid.
    #[error("Insufficient samples: need at least 2 elevation points, got {count}")]
    InsufficientSamples { count: usize },
}

/// Result type for terrain operations.
pub type MeshResult<T> = Result<T, MeshError>;

/// Mesh building options.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MeshOptions {
    /// Grid columns across the corridor
    pub width_segments: usize,
    /// Scale applied along the climb
    pub horizontal_exaggeration: f32,
    /// Scale applied to elevations
    pub vertical_exaggeration: f32,
    /// Perturbation source for ground outside the road band
    pub surround: SurroundNoise,
}

impl Default for MeshOptions {
    fn default() -> Self {
        Self {
            width_segments: 32,
            horizontal_exaggeration: 1.0,
            vertical_exaggeration: 1.5,
            surround: SurroundNoise::Harmonic,
        }
    }
}

/// Triangulated grid surface around a climb.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TerrainMesh {
    /// Flat XYZ triplets
    pub vertices: Vec<f32>,
    /// Flat triangle index triples
    pub indices: Vec<u32>,
    /// Flat XYZ triplets; up-vector placeholders until the renderer recomputes them
    pub normals: Vec<f32>,
    /// Flat UV pairs in `[0, 1]`
    pub uvs: Vec<f32>,
    /// Grid columns
    pub width_segments: usize,
    /// Grid rows
    pub length_segments: usize,
}

/// Interleaved vertex layout for direct buffer upload.
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, Pod, Zeroable)]
pub struct TerrainVertex {
    pub position: [f32; 3],
    pub normal: [f32; 3],
    pub uv: [f32; 2],
}

impl TerrainMesh {
    /// Number of grid vertices.
    pub fn vertex_count(&self) -> usize {
        self.vertices.len() / 3
    }

    /// Number of triangles.
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Vertex position by grid index.
    pub fn position(&self, index: usize) -> Option<Vec3> {
        let base = index.checked_mul(3)?;
        let xyz = self.vertices.get(base..base + 3)?;
        Some(Vec3::new(xyz[0], xyz[1], xyz[2]))
    }

    /// Axis-aligned bounds of all vertices, `None` for an empty mesh.
    pub fn bounds(&self) -> Option<(Vec3, Vec3)> {
        if self.vertices.is_empty() {
            return None;
        }

        let mut min = Vec3::splat(f32::INFINITY);
        let mut max = Vec3::splat(f32::NEG_INFINITY);
        for xyz in self.vertices.chunks_exact(3) {
            let p = Vec3::new(xyz[0], xyz[1], xyz[2]);
            min = min.min(p);
            max = max.max(p);
        }
        Some((min, max))
    }

    /// Vertices with position, normal and UV interleaved.
    pub fn interleaved(&self) -> Vec<TerrainVertex> {
        self.vertices
            .chunks_exact(3)
            .zip(self.normals.chunks_exact(3))
            .zip(self.uvs.chunks_exact(2))
            .map(|((p, n), uv)| TerrainVertex {
                position: [p[0], p[1], p[2]],
                normal: [n[0], n[1], n[2]],
                uv: [uv[0], uv[1]],
            })
            .collect()
    }

    /// Interleaved vertices as raw bytes.
    pub fn vertex_bytes(&self) -> Vec<u8> {
        bytemuck::cast_slice(&self.interleaved()).to_vec()
    }

    /// Index buffer as raw bytes.
    pub fn index_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.indices)
    }
}

/// Palette hint for the terrain around a climb.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TerrainStyle {
    /// Gentle ground near the valley floor
    Flat,
    /// Grassy hills
    #[default]
    RollingHills,
    /// High alpine rock
    Mountain,
}

impl TerrainStyle {
    /// Pick a style from a col's declared attributes.
    pub fn from_profile(profile: &ElevationProfile) -> Self {
        if profile.summit > 2000.0 || profile.gradient > 6.0 {
            return TerrainStyle::Mountain;
        }

        if profile.elevation_gain() > 500.0 || profile.gradient > 3.0 {
            return TerrainStyle::RollingHills;
        }

        TerrainStyle::Flat
    }

    /// Base ground color.
    pub fn base_color(&self) -> Vec3 {
        match self {
            TerrainStyle::Flat => Vec3::new(0.25, 0.55, 0.25),
            TerrainStyle::RollingHills => Vec3::new(0.2, 0.5, 0.2),
            TerrainStyle::Mountain => Vec3::new(0.4, 0.4, 0.35),
        }
    }

    /// Sky color tint.
    pub fn sky_tint(&self) -> Vec3 {
        match self {
            TerrainStyle::Flat | TerrainStyle::RollingHills => Vec3::new(0.5, 0.7, 0.9),
            TerrainStyle::Mountain => Vec3::new(0.6, 0.7, 0.85), // hazy
        }
    }
}
