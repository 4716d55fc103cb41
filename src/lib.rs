//! ColViz - adaptive col visualization
//!
//! Turns the sparse description of a mountain pass climb (summit, length,
//! average gradient) into a dense elevation profile and a 3D terrain mesh,
//! and decides how a given device should display it: full 3D terrain, a 2D
//! profile or a compact mini profile, at low, medium or high quality.

pub mod benchmark;
pub mod capability;
pub mod profile;
pub mod storage;
pub mod terrain;
pub mod visualization;

// Re-export commonly used types
pub use benchmark::{BenchmarkResult, BenchmarkRunner};
pub use capability::{CapabilityDetector, CapabilitySnapshot};
pub use profile::{synthesize, Col, ElevationPoint, ProfileSynthesizer};
pub use storage::config::AppConfig;
pub use terrain::{build_mesh, MeshOptions, TerrainMesh};
pub use visualization::{select, Mode, Quality, Selection, VisualizationOrchestrator};
