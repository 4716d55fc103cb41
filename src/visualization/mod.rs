//! Visualization mode and quality selection.

pub mod orchestrator;
pub mod selector;

use serde::{Deserialize, Serialize};

pub use orchestrator::{PreparedView, VisualizationOrchestrator};
pub use selector::{select, Selection};

/// How a col is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Mode {
    /// Full 2D elevation profile
    #[serde(rename = "profile-2d")]
    Profile2d,
    /// 3D terrain with road ribbon
    #[serde(rename = "terrain-3d")]
    Terrain3d,
    /// Compact sparkline-style profile
    MiniProfile,
}

impl std::fmt::Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Mode::Profile2d => write!(f, "profile-2d"),
            Mode::Terrain3d => write!(f, "terrain-3d"),
            Mode::MiniProfile => write!(f, "mini-profile"),
        }
    }
}

/// Mode requested by the user or configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ModePreference {
    /// Let the selector decide
    #[default]
    Auto,
    #[serde(rename = "profile-2d")]
    Profile2d,
    #[serde(rename = "terrain-3d")]
    Terrain3d,
    MiniProfile,
}

impl ModePreference {
    /// The explicit mode, or `None` for `Auto`.
    pub fn explicit(self) -> Option<Mode> {
        match self {
            ModePreference::Auto => None,
            ModePreference::Profile2d => Some(Mode::Profile2d),
            ModePreference::Terrain3d => Some(Mode::Terrain3d),
            ModePreference::MiniProfile => Some(Mode::MiniProfile),
        }
    }
}

impl From<Mode> for ModePreference {
    fn from(mode: Mode) -> Self {
        match mode {
            Mode::Profile2d => ModePreference::Profile2d,
            Mode::Terrain3d => ModePreference::Terrain3d,
            Mode::MiniProfile => ModePreference::MiniProfile,
        }
    }
}

/// Rendering detail level.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Quality {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Quality {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Quality::Low => write!(f, "low"),
            Quality::Medium => write!(f, "medium"),
            Quality::High => write!(f, "high"),
        }
    }
}
