//! Rendering and CPU micro-benchmarks.
//!
//! A short fixed battery of synthetic workloads, each scored 0-100 against
//! the time a mid-range reference device takes. Render sub-tests go through a
//! [`RenderSurface`], normally a [`WgpuSurface`] on the detected adapter; CPU sub-tests are self-contained. The [`runner`] yields
//! to the scheduler between sub-tests and reports progress through a
//! callback.

pub mod gpu;
pub mod runner;
pub mod surface;
pub mod workloads;

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::visualization::{Mode, Quality};

pub use gpu::WgpuSurface;
pub use runner::BenchmarkRunner;
pub use surface::{HeadlessSurface, RenderSurface, UnavailableSurface};
pub use workloads::{Phase, Workload};

/// Weight of the render score in the combined score.
pub const RENDER_WEIGHT: f64 = 0.7;

/// Weight of the CPU score in the combined score.
pub const CPU_WEIGHT: f64 = 0.3;

/// Measurements below this are treated as this, in milliseconds.
pub const FLOOR_MS: f64 = 1.0;

/// Score given to a sub-test that failed to run.
pub const FAILED_SUBTEST_SCORE: f64 = 10.0;

/// Errors raised by a single sub-test. They never escape the runner.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum BenchmarkError {
    #[error("No accelerated rendering context")]
    ContextUnavailable,

    #[error("Unsupported: {0}")]
    Unsupported(String),
}

/// Result type for sub-test operations.
pub type SubTestResult<T> = Result<T, BenchmarkError>;

/// Phase reported to progress callbacks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BenchmarkStatus {
    Starting,
    #[serde(rename = "webgl")]
    Rendering,
    Cpu,
    Complete,
}

/// Progress update passed to the callback.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkProgress {
    /// Fraction complete, non-decreasing over a run
    pub progress: f32,
    pub status: BenchmarkStatus,
    /// Attached on `Complete`
    pub result: Option<BenchmarkResult>,
}

/// Outcome of one sub-test.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubTestScore {
    pub workload: Workload,
    pub score: f64,
    /// Wall time, absent when the sub-test failed or was skipped
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub elapsed_ms: Option<f64>,
}

/// Scores from one benchmark run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BenchmarkResult {
    pub render_score: f64,
    pub cpu_score: f64,
    pub combined_score: f64,
    pub recommended_mode: Mode,
    pub recommended_quality: Quality,
    pub timestamp: DateTime<Utc>,
    /// Set when the run was aborted before every sub-test finished
    #[serde(default)]
    pub partial: bool,
    #[serde(default)]
    pub subtests: Vec<SubTestScore>,
}

impl BenchmarkResult {
    /// Assemble a result from per-sub-test scores.
    ///
    /// The render score is the plain mean of the render sub-tests; the CPU
    /// score is the weighted mean of the CPU sub-tests. Sub-tests missing
    /// from `subtests` count as zero.
    pub fn from_subtests(subtests: Vec<SubTestScore>, partial: bool) -> Self {
        let score_of = |workload: Workload| {
            subtests
                .iter()
                .find(|s| s.workload == workload)
                .map(|s| s.score)
                .unwrap_or(0.0)
        };

        let render: Vec<Workload> = Workload::ALL
            .iter()
            .copied()
            .filter(|w| w.phase() == Phase::Render)
            .collect();
        let render_score =
            render.iter().map(|&w| score_of(w)).sum::<f64>() / render.len().max(1) as f64;

        let cpu_score = Workload::ALL
            .iter()
            .filter(|w| w.phase() == Phase::Cpu)
            .map(|&w| score_of(w) * w.weight())
            .sum::<f64>();

        let combined_score = render_score * RENDER_WEIGHT + cpu_score * CPU_WEIGHT;

        Self {
            render_score,
            cpu_score,
            combined_score,
            recommended_mode: crate::visualization::selector::mode_for_score(combined_score),
            recommended_quality: crate::visualization::selector::quality_for_score(combined_score),
            timestamp: Utc::now(),
            partial,
            subtests,
        }
    }

    /// A result with only the combined score set, for callers that already
    /// know the score (persisted results, tests).
    pub fn with_combined_score(combined_score: f64) -> Self {
        Self {
            render_score: combined_score,
            cpu_score: combined_score,
            combined_score,
            recommended_mode: crate::visualization::selector::mode_for_score(combined_score),
            recommended_quality: crate::visualization::selector::quality_for_score(combined_score),
            timestamp: Utc::now(),
            partial: false,
            subtests: Vec::new(),
        }
    }
}

/// Score a measured time against the reference expectation.
///
/// `min(100, 100 * expected / max(FLOOR_MS, measured))`.
pub fn time_score(expected_ms: f64, measured_ms: f64) -> f64 {
    (100.0 * expected_ms / measured_ms.max(FLOOR_MS)).min(100.0)
}

/// Cooperative cancellation flag, checked between sub-tests.
#[derive(Debug, Clone, Default)]
pub struct AbortSignal {
    aborted: Arc<AtomicBool>,
}

impl AbortSignal {
    pub fn new() -> Self {
        Self::default()
    }

    /// Request that the run stop at the next sub-test boundary.
    pub fn abort(&self) {
        self.aborted.store(true, Ordering::SeqCst);
    }

    pub fn is_aborted(&self) -> bool {
        self.aborted.load(Ordering::SeqCst)
    }
}
