//! The benchmark battery.
//!
//! Expected times are what a mid-range reference laptop takes for each
//! workload in a release build.

use std::hint::black_box;
use std::time::{Duration, Instant};

use bytemuck::{Pod, Zeroable};
use glam::{Mat4, Quat, Vec3};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

use super::surface::{RenderSurface, MAX_PROBE_TEXTURE};
use super::SubTestResult;

/// Which score a workload contributes to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Phase {
    Render,
    Cpu,
}

/// One synthetic workload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Workload {
    /// Bulk triangle submission
    Primitives,
    /// Texture size probing and allocation
    Textures,
    /// Per-frame transform matrix updates
    Transforms,
    /// Floating-point math loop
    MathLoop,
    /// Object allocation and sort
    AllocSort,
    /// String and array churn
    StringChurn,
    /// Tree building and re-parenting
    TreeEdit,
}

const TRIANGLES_PER_BATCH: usize = 20_000;
const PRIMITIVE_BATCHES: usize = 8;
const TRANSFORM_FRAMES: usize = 120;
const TRANSFORM_OBJECTS: usize = 256;
const MATH_ITERATIONS: usize = 1_000_000;
const SORT_ITEMS: usize = 100_000;
const STRING_ITEMS: usize = 20_000;
const TREE_NODES: usize = 10_000;

impl Workload {
    /// Every workload, render phase first.
    pub const ALL: [Workload; 7] = [
        Workload::Primitives,
        Workload::Textures,
        Workload::Transforms,
        Workload::MathLoop,
        Workload::AllocSort,
        Workload::StringChurn,
        Workload::TreeEdit,
    ];

    pub fn phase(self) -> Phase {
        match self {
            Workload::Primitives | Workload::Textures | Workload::Transforms => Phase::Render,
            _ => Phase::Cpu,
        }
    }

    /// Weight within the CPU score; render workloads are averaged evenly.
    pub fn weight(self) -> f64 {
        match self {
            Workload::MathLoop | Workload::AllocSort => 0.3,
            Workload::StringChurn | Workload::TreeEdit => 0.2,
            _ => 1.0 / 3.0,
        }
    }

    /// Reference time in milliseconds.
    pub fn expected_ms(self) -> f64 {
        match self {
            Workload::Primitives => 40.0,
            Workload::Textures => 25.0,
            Workload::Transforms => 30.0,
            Workload::MathLoop => 30.0,
            Workload::AllocSort => 40.0,
            Workload::StringChurn => 30.0,
            Workload::TreeEdit => 30.0,
        }
    }

    /// Run the workload and return its wall time.
    pub fn run(self, surface: &mut dyn RenderSurface) -> SubTestResult<Duration> {
        let start = Instant::now();
        match self {
            Workload::Primitives => submit_primitives(surface)?,
            Workload::Textures => probe_textures(surface)?,
            Workload::Transforms => update_transforms(surface)?,
            Workload::MathLoop => math_loop(),
            Workload::AllocSort => alloc_sort(),
            Workload::StringChurn => string_churn(),
            Workload::TreeEdit => tree_edit(),
        }
        Ok(start.elapsed())
    }
}

impl std::fmt::Display for Workload {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Workload::Primitives => "primitives",
            Workload::Textures => "textures",
            Workload::Transforms => "transforms",
            Workload::MathLoop => "math-loop",
            Workload::AllocSort => "alloc-sort",
            Workload::StringChurn => "string-churn",
            Workload::TreeEdit => "tree-edit",
        };
        write!(f, "{name}")
    }
}

#[repr(C)]
#[derive(Copy, Clone, Debug, Pod, Zeroable)]
struct BenchVertex {
    position: [f32; 3],
    color: [f32; 3],
}

fn submit_primitives(surface: &mut dyn RenderSurface) -> SubTestResult<()> {
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let mut vertices = Vec::with_capacity(TRIANGLES_PER_BATCH * 3);

    for _ in 0..PRIMITIVE_BATCHES {
        vertices.clear();
        for _ in 0..TRIANGLES_PER_BATCH * 3 {
            vertices.push(BenchVertex {
                position: [rng.gen(), rng.gen(), rng.gen()],
                color: [rng.gen(), rng.gen(), rng.gen()],
            });
        }
        surface.upload_vertices(bytemuck::cast_slice(&vertices))?;
    }
    Ok(())
}

fn probe_textures(surface: &mut dyn RenderSurface) -> SubTestResult<()> {
    let limit = surface.max_texture_size()?.min(MAX_PROBE_TEXTURE);
    let mut size = 256;
    while size <= limit {
        surface.allocate_texture(size)?;
        size *= 2;
    }
    Ok(())
}

fn update_transforms(surface: &mut dyn RenderSurface) -> SubTestResult<()> {
    let view_proj = Mat4::perspective_rh(60f32.to_radians(), 16.0 / 9.0, 0.1, 1000.0)
        * Mat4::look_at_rh(Vec3::new(0.0, 5.0, -10.0), Vec3::ZERO, Vec3::Y);
    let mut uniforms: Vec<[[f32; 4]; 4]> = Vec::with_capacity(TRANSFORM_OBJECTS);

    for frame in 0..TRANSFORM_FRAMES {
        uniforms.clear();
        let t = frame as f32 / 60.0;
        for i in 0..TRANSFORM_OBJECTS {
            let model = Mat4::from_scale_rotation_translation(
                Vec3::splat(1.0 + (i % 7) as f32 * 0.1),
                Quat::from_rotation_y(t + i as f32 * 0.01),
                Vec3::new(i as f32 * 0.5, 0.0, t),
            );
            uniforms.push((view_proj * model).to_cols_array_2d());
        }
        surface.upload_uniforms(bytemuck::cast_slice(&uniforms))?;
    }
    Ok(())
}

fn math_loop() {
    let mut acc = 0.0f64;
    for i in 0..MATH_ITERATIONS {
        let x = i as f64 * 0.001;
        acc += x.sin() * x.cos() + (x + 1.0).sqrt();
    }
    black_box(acc);
}

#[derive(Debug, Clone)]
struct SortItem {
    key: f64,
    label: u32,
    tags: Vec<u8>,
}

fn alloc_sort() {
    let mut rng = StdRng::seed_from_u64(0xc0ffee);
    let mut items: Vec<SortItem> = (0..SORT_ITEMS)
        .map(|i| SortItem {
            key: rng.gen(),
            label: i as u32,
            tags: vec![(i % 251) as u8; 4],
        })
        .collect();
    items.sort_by(|a, b| a.key.total_cmp(&b.key));
    black_box(items.first().map(|item| item.label + item.tags.len() as u32));
}

fn string_churn() {
    let words: Vec<String> = (0..STRING_ITEMS)
        .map(|i| format!("col-{i}-{}", i % 97))
        .collect();
    let joined = words.join(",");
    let mut parts: Vec<&str> = joined.split(',').filter(|s| s.ends_with('7')).collect();
    parts.reverse();
    let upper: Vec<String> = parts.iter().map(|s| s.to_uppercase()).collect();
    black_box(upper.len() + joined.len());
}

/// Arena tree standing in for document-tree manipulation.
struct Node {
    parent: Option<usize>,
    children: Vec<usize>,
}

fn tree_edit() {
    let mut nodes: Vec<Node> = Vec::with_capacity(TREE_NODES);
    nodes.push(Node {
        parent: None,
        children: Vec::new(),
    });

    for i in 1..TREE_NODES {
        let parent = (i - 1) / 4;
        nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
        });
        nodes[parent].children.push(i);
    }

    // Re-parent every tenth node under the root.
    for i in (10..TREE_NODES).step_by(10) {
        if let Some(old) = nodes[i].parent {
            nodes[old].children.retain(|&c| c != i);
        }
        nodes[i].parent = Some(0);
        nodes[0].children.push(i);
    }

    let mut stack = vec![(0usize, 0usize)];
    let mut max_depth = 0;
    while let Some((node, depth)) = stack.pop() {
        max_depth = max_depth.max(depth);
        stack.extend(nodes[node].children.iter().map(|&c| (c, depth + 1)));
    }
    black_box(max_depth);
}
