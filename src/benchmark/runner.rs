//! Benchmark runner with a single-flight result cache.

use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use super::gpu::WgpuSurface;
use super::surface::{RenderSurface, UnavailableSurface};
use super::workloads::{Phase, Workload};
use super::{
    time_score, AbortSignal, BenchmarkProgress, BenchmarkResult, BenchmarkStatus, SubTestScore,
    FAILED_SUBTEST_SCORE,
};
use crate::capability::CapabilitySnapshot;

/// Progress reached when the render phase starts.
const RENDER_PHASE_START: f32 = 0.1;

/// Progress reached when the CPU phase starts.
const CPU_PHASE_START: f32 = 0.5;

/// Progress reached when the CPU phase ends.
const CPU_PHASE_END: f32 = 0.95;

struct RunnerState {
    surface: Box<dyn RenderSurface>,
    result: Option<BenchmarkResult>,
}

/// Runs the benchmark battery once per session.
///
/// The first complete run is cached; later calls return it without
/// measuring again until [`reset`](Self::reset). A call made while another
/// run is in flight waits for that run and shares its result. Aborted runs
/// return partial scores and are not cached.
pub struct BenchmarkRunner {
    state: Mutex<RunnerState>,
}

impl std::fmt::Debug for BenchmarkRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BenchmarkRunner").finish_non_exhaustive()
    }
}

impl BenchmarkRunner {
    /// Create a runner drawing into `surface`.
    pub fn new(surface: impl RenderSurface + 'static) -> Self {
        Self {
            state: Mutex::new(RunnerState {
                surface: Box::new(surface),
                result: None,
            }),
        }
    }

    /// Create a runner for `capability`: a wgpu surface on the adapter
    /// picked by `power_preference` when accelerated rendering was detected,
    /// otherwise a surface on which every render sub-test fails.
    pub fn for_capability(
        capability: &CapabilitySnapshot,
        power_preference: wgpu::PowerPreference,
    ) -> Self {
        if capability.rendering.supported {
            Self::new(WgpuSurface::new(power_preference))
        } else {
            Self::new(UnavailableSurface)
        }
    }

    /// Cached result of an earlier run, if any.
    pub async fn cached(&self) -> Option<BenchmarkResult> {
        self.state.lock().await.result.clone()
    }

    /// Forget the cached result.
    pub async fn reset(&self) {
        self.state.lock().await.result = None;
        debug!("Benchmark result cleared");
    }

    /// Swap the render surface and forget the cached result.
    pub async fn set_surface(&self, surface: impl RenderSurface + 'static) {
        let mut state = self.state.lock().await;
        state.surface = Box::new(surface);
        state.result = None;
    }

    /// Run the battery, or return the cached result.
    ///
    /// `progress` sees non-decreasing progress values tagged with the current
    /// phase; the final `Complete` update carries the result. The runner
    /// yields to the scheduler after every sub-test and checks `abort` there.
    pub async fn run<F>(&self, mut progress: F, abort: &AbortSignal) -> BenchmarkResult
    where
        F: FnMut(BenchmarkProgress) + Send,
    {
        let mut state = self.state.lock().await;

        if let Some(result) = state.result.clone() {
            progress(BenchmarkProgress {
                progress: 1.0,
                status: BenchmarkStatus::Complete,
                result: Some(result.clone()),
            });
            return result;
        }

        progress(BenchmarkProgress {
            progress: 0.0,
            status: BenchmarkStatus::Starting,
            result: None,
        });
        tokio::task::yield_now().await;

        let mut subtests = Vec::with_capacity(Workload::ALL.len());
        let mut aborted = false;

        for phase in [Phase::Render, Phase::Cpu] {
            let workloads: Vec<Workload> = Workload::ALL
                .iter()
                .copied()
                .filter(|w| w.phase() == phase)
                .collect();
            let (status, start, end) = match phase {
                Phase::Render => (BenchmarkStatus::Rendering, RENDER_PHASE_START, CPU_PHASE_START),
                Phase::Cpu => (BenchmarkStatus::Cpu, CPU_PHASE_START, CPU_PHASE_END),
            };

            progress(BenchmarkProgress {
                progress: start,
                status,
                result: None,
            });

            for (i, workload) in workloads.iter().copied().enumerate() {
                if abort.is_aborted() {
                    aborted = true;
                    break;
                }

                subtests.push(score_workload(workload, state.surface.as_mut()));

                progress(BenchmarkProgress {
                    progress: start + (end - start) * (i + 1) as f32 / workloads.len() as f32,
                    status,
                    result: None,
                });
                tokio::task::yield_now().await;
            }

            if aborted {
                break;
            }
        }

        let result = BenchmarkResult::from_subtests(subtests, aborted);

        if aborted {
            warn!(
                completed = result.subtests.len(),
                "Benchmark aborted, returning partial scores"
            );
        } else {
            info!(
                render = result.render_score,
                cpu = result.cpu_score,
                combined = result.combined_score,
                mode = %result.recommended_mode,
                quality = %result.recommended_quality,
                "Benchmark complete"
            );
            state.result = Some(result.clone());
        }

        progress(BenchmarkProgress {
            progress: 1.0,
            status: BenchmarkStatus::Complete,
            result: Some(result.clone()),
        });

        result
    }
}

fn score_workload(workload: Workload, surface: &mut dyn RenderSurface) -> SubTestScore {
    match workload.run(surface) {
        Ok(elapsed) => {
            let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
            let score = time_score(workload.expected_ms(), elapsed_ms);
            debug!(%workload, elapsed_ms, score, "Sub-test finished");
            SubTestScore {
                workload,
                score,
                elapsed_ms: Some(elapsed_ms),
            }
        }
        Err(e) => {
            warn!(%workload, error = %e, "Sub-test failed, using minimum score");
            SubTestScore {
                workload,
                score: FAILED_SUBTEST_SCORE,
                elapsed_ms: None,
            }
        }
    }
}
