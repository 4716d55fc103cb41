//! Wires detection, benchmarking and selection to the synthesizer and mesh
//! builder.
//!
//! The orchestrator owns the memoized detector and benchmark runner. A
//! renderer asks it for a [`Selection`] and then for a [`PreparedView`] of a
//! col; on resize or orientation change it calls
//! [`on_environment_change`](VisualizationOrchestrator::on_environment_change)
//! and redraws with the new choice.

use thiserror::Error;
use tracing::{debug, info};

use super::selector::{select, Selection};
use super::{Mode, ModePreference, Quality};
use crate::benchmark::{AbortSignal, BenchmarkProgress, BenchmarkRunner};
use crate::capability::{CapabilityDetector, CapabilitySnapshot, Environment, RenderingProbe};
use crate::profile::{Col, ProfileError, ProfileSynthesizer, SynthesizedProfile};
use crate::storage::config::AppConfig;
use crate::terrain::{build_terrain, MeshError, MeshOptions, TerrainGeometry, TerrainStyle};

/// Errors from [`VisualizationOrchestrator::prepare`].
#[derive(Debug, Error, Clone, PartialEq)]
pub enum PrepareError {
    #[error(transparent)]
    Profile(#[from] ProfileError),

    #[error(transparent)]
    Mesh(#[from] MeshError),
}

/// Everything a renderer needs to draw one col.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedView {
    pub selection: Selection,
    pub profile: SynthesizedProfile,
    /// Present only for `terrain-3d`
    pub terrain: Option<TerrainGeometry>,
    pub style: TerrainStyle,
}

/// Chooses a visualization and prepares cols for it.
#[derive(Debug)]
pub struct VisualizationOrchestrator {
    detector: CapabilityDetector,
    runner: BenchmarkRunner,
    synthesizer: ProfileSynthesizer,
    mesh_options: MeshOptions,
    preference: ModePreference,
    quality: Option<Quality>,
    run_benchmark: bool,
    selection: Option<Selection>,
}

impl VisualizationOrchestrator {
    /// Create an orchestrator with automatic mode and quality.
    pub fn new(detector: CapabilityDetector, runner: BenchmarkRunner) -> Self {
        Self {
            detector,
            runner,
            synthesizer: ProfileSynthesizer::new(),
            mesh_options: MeshOptions::default(),
            preference: ModePreference::Auto,
            quality: None,
            run_benchmark: true,
            selection: None,
        }
    }

    /// Create an orchestrator from configuration.
    ///
    /// Detection runs once here. With accelerated rendering the benchmark
    /// draws on a wgpu device from the configured adapter preference.
    pub fn from_config(config: &AppConfig, probe: impl RenderingProbe + 'static) -> Self {
        let detector = CapabilityDetector::new(probe, config.environment.clone());
        let power_preference = if config.visualization.high_performance_adapter {
            wgpu::PowerPreference::HighPerformance
        } else {
            wgpu::PowerPreference::default()
        };
        let runner = BenchmarkRunner::for_capability(&detector.detect(), power_preference);

        let synthesizer = match config.synthesis.seed {
            Some(seed) => ProfileSynthesizer::with_seed(seed),
            None => ProfileSynthesizer::new(),
        };

        Self {
            synthesizer,
            mesh_options: config.mesh,
            preference: config.visualization.mode,
            quality: config.visualization.quality,
            run_benchmark: config.visualization.run_benchmark,
            ..Self::new(detector, runner)
        }
    }

    pub fn with_synthesizer(mut self, synthesizer: ProfileSynthesizer) -> Self {
        self.synthesizer = synthesizer;
        self
    }

    pub fn with_mesh_options(mut self, options: MeshOptions) -> Self {
        self.mesh_options = options;
        self
    }

    pub fn with_quality(mut self, quality: Option<Quality>) -> Self {
        self.quality = quality;
        self
    }

    /// Skip the benchmark; selection then relies on capability alone.
    pub fn without_benchmark(mut self) -> Self {
        self.run_benchmark = false;
        self
    }

    /// Current capability snapshot.
    pub fn capability(&self) -> CapabilitySnapshot {
        self.detector.detect()
    }

    /// Most recent selection, if [`choose`](Self::choose) has run.
    pub fn selection(&self) -> Option<Selection> {
        self.selection
    }

    pub fn preference(&self) -> ModePreference {
        self.preference
    }

    /// Detect, benchmark if useful, and select a mode.
    ///
    /// The benchmark only runs when accelerated rendering is available; its
    /// result is memoized by the runner, so repeated calls are cheap.
    pub async fn choose(&mut self, abort: &AbortSignal) -> Selection {
        let capability = self.detector.detect();

        let benchmark = if self.run_benchmark && capability.rendering.supported {
            Some(self.runner.run(log_progress, abort).await)
        } else {
            self.runner.cached().await
        };

        let selection = select(&capability, benchmark.as_ref(), self.preference, self.quality);
        if self.selection != Some(selection) {
            info!(mode = %selection.mode, quality = %selection.quality, "Visualization chosen");
        }
        self.selection = Some(selection);
        selection
    }

    /// Re-detect for a new viewport or device and choose again.
    pub async fn on_environment_change(
        &mut self,
        environment: impl Environment + 'static,
        abort: &AbortSignal,
    ) -> Selection {
        self.detector.set_environment(environment);
        debug!("Environment changed, re-detecting");
        self.choose(abort).await
    }

    /// Apply an explicit mode choice and choose again.
    pub async fn set_preference(
        &mut self,
        preference: ModePreference,
        abort: &AbortSignal,
    ) -> Selection {
        self.preference = preference;
        self.choose(abort).await
    }

    /// Synthesize a col and build its mesh if the current mode needs one.
    ///
    /// Before any [`choose`](Self::choose), the selection is made from the
    /// capability snapshot alone.
    pub fn prepare(&mut self, col: &Col) -> Result<PreparedView, PrepareError> {
        let selection = match self.selection {
            Some(selection) => selection,
            None => select(&self.detector.detect(), None, self.preference, self.quality),
        };

        let profile = self.synthesizer.synthesize(col)?;
        let style = TerrainStyle::from_profile(&profile.profile);

        let terrain = if selection.mode == Mode::Terrain3d {
            Some(build_terrain(&profile.points, col.length, &self.mesh_options)?)
        } else {
            None
        };

        Ok(PreparedView {
            selection,
            profile,
            terrain,
            style,
        })
    }
}

fn log_progress(update: BenchmarkProgress) {
    debug!(
        progress = update.progress,
        status = ?update.status,
        "Benchmark progress"
    );
}
