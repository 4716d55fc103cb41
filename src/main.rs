//! ColViz command line
//!
//! Synthesizes col profiles and terrain meshes, and reports which
//! visualization this machine would get.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueHint};
use serde_json::json;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use colviz::benchmark::AbortSignal;
use colviz::capability::{CapabilityDetector, WgpuProbe};
use colviz::profile::{Col, ProfileSynthesizer};
use colviz::storage::config::{load_config, load_config_from, AppConfig};
use colviz::terrain::{build_terrain, TerrainStyle};
use colviz::visualization::VisualizationOrchestrator;

#[derive(Parser, Debug)]
#[command(author, version, about = "Adaptive col profile and terrain visualization", long_about = None)]
struct Cli {
    /// Configuration file (defaults to the per-user config)
    #[arg(long, global = true, value_hint = ValueHint::FilePath)]
    config: Option<PathBuf>,

    /// Seed for reproducible profiles
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the synthesized elevation profile of a col as JSON
    Profile {
        #[arg(value_hint = ValueHint::FilePath)]
        col: PathBuf,
    },
    /// Build the terrain mesh of a col and print its statistics
    Mesh {
        #[arg(value_hint = ValueHint::FilePath)]
        col: PathBuf,
    },
    /// Print the detected rendering capability
    Detect,
    /// Print the visualization mode and quality this machine would get
    Select {
        /// Run the benchmark before choosing
        #[arg(long)]
        benchmark: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    tracing::debug!("Starting ColViz v{}", env!("CARGO_PKG_VERSION"));

    let mut config = match &cli.config {
        Some(path) => load_config_from(path),
        None => load_config(),
    }
    .context("loading configuration")?;

    if let Some(seed) = cli.seed {
        config.synthesis.seed = Some(seed);
    }

    match cli.command {
        Command::Profile { col } => {
            let col = read_col(&col)?;
            let profile = synthesizer(&config).synthesize(&col)?;
            println!("{}", serde_json::to_string_pretty(&profile)?);
        }
        Command::Mesh { col } => {
            let col = read_col(&col)?;
            let profile = synthesizer(&config).synthesize(&col)?;
            let geometry = build_terrain(&profile.points, col.length, &config.mesh)?;
            let mesh = &geometry.mesh;
            let bounds = mesh.bounds().map(|(min, max)| json!({ "min": min, "max": max }));

            let stats = json!({
                "col": col.name,
                "samples": profile.points.len(),
                "vertices": mesh.vertex_count(),
                "triangles": mesh.triangle_count(),
                "widthSegments": mesh.width_segments,
                "lengthSegments": mesh.length_segments,
                "vertexBytes": mesh.vertex_bytes().len(),
                "indexBytes": mesh.index_bytes().len(),
                "bounds": bounds,
                "style": TerrainStyle::from_profile(&profile.profile),
            });
            println!("{}", serde_json::to_string_pretty(&stats)?);
        }
        Command::Detect => {
            let detector = CapabilityDetector::new(probe(&config), config.environment.clone());
            println!("{}", serde_json::to_string_pretty(&detector.detect())?);
        }
        Command::Select { benchmark } => {
            let mut orchestrator = VisualizationOrchestrator::from_config(&config, probe(&config));
            if !benchmark {
                orchestrator = orchestrator.without_benchmark();
            }

            let selection = orchestrator.choose(&AbortSignal::new()).await;
            let output = json!({
                "capability": orchestrator.capability(),
                "selection": selection,
            });
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
    }

    Ok(())
}

fn read_col(path: &Path) -> Result<Col> {
    let content =
        std::fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("parsing col from {}", path.display()))
}

fn synthesizer(config: &AppConfig) -> ProfileSynthesizer {
    match config.synthesis.seed {
        Some(seed) => ProfileSynthesizer::with_seed(seed),
        None => ProfileSynthesizer::new(),
    }
}

fn probe(config: &AppConfig) -> WgpuProbe {
    if config.visualization.high_performance_adapter {
        WgpuProbe::high_performance()
    } else {
        WgpuProbe::new()
    }
}
