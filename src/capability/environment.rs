//! Host environment facts the detector needs.

use serde::{Deserialize, Serialize};

use super::Viewport;

/// Coarse device-family hint (e.g. from a user agent or the OS).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceFamily {
    Phone,
    Tablet,
    Desktop,
}

/// Source of viewport and device information.
pub trait Environment: Send + Sync {
    /// Current viewport size.
    fn viewport(&self) -> Viewport;

    /// Device family hint, if the platform offers one.
    fn device_family(&self) -> Option<DeviceFamily> {
        None
    }

    /// Whether the primary input is touch.
    fn touch_capable(&self) -> bool {
        false
    }

    /// Installed memory in gigabytes, if the platform exposes it.
    fn memory_gb(&self) -> Option<f32> {
        None
    }
}

/// Environment described by fixed values (configuration, tests, headless runs).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticEnvironment {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub device_family: Option<DeviceFamily>,
    pub touch: bool,
    pub memory_gb: Option<f32>,
}

impl Default for StaticEnvironment {
    fn default() -> Self {
        let viewport = Viewport::default();
        Self {
            viewport_width: viewport.width,
            viewport_height: viewport.height,
            device_family: None,
            touch: false,
            memory_gb: None,
        }
    }
}

impl StaticEnvironment {
    /// Environment with the given viewport and no other hints.
    pub fn with_viewport(width: u32, height: u32) -> Self {
        Self {
            viewport_width: width,
            viewport_height: height,
            ..Default::default()
        }
    }

    /// A touch phone in portrait.
    pub fn phone() -> Self {
        Self {
            viewport_width: 390,
            viewport_height: 844,
            device_family: Some(DeviceFamily::Phone),
            touch: true,
            memory_gb: None,
        }
    }
}

impl Environment for StaticEnvironment {
    fn viewport(&self) -> Viewport {
        Viewport::new(self.viewport_width, self.viewport_height)
    }

    fn device_family(&self) -> Option<DeviceFamily> {
        self.device_family
    }

    fn touch_capable(&self) -> bool {
        self.touch
    }

    fn memory_gb(&self) -> Option<f32> {
        self.memory_gb
    }
}
