//! Runtime rendering capability detection.
//!
//! A [`CapabilitySnapshot`] describes what the current environment can do:
//! whether an accelerated rendering context is obtainable and how capable it
//! is, roughly how much memory is around, and what kind of device and
//! viewport we are drawing into. Platform specifics stay behind the
//! [`RenderingProbe`] and [`Environment`] traits.

pub mod detector;
pub mod environment;
pub mod probe;

use serde::{Deserialize, Serialize};

pub use detector::CapabilityDetector;
pub use environment::{DeviceFamily, Environment, StaticEnvironment};
pub use probe::{accelerated_adapter, ContextInfo, FixedProbe, RenderingProbe, WgpuProbe};

/// Viewport width below which a device counts as mobile.
pub const MOBILE_MAX_WIDTH: u32 = 768;

/// Viewport width below which a device counts as a tablet.
pub const TABLET_MAX_WIDTH: u32 = 1024;

/// Coarse capability classification.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum Tier {
    #[default]
    Low,
    Medium,
    High,
}

impl std::fmt::Display for Tier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Tier::Low => write!(f, "low"),
            Tier::Medium => write!(f, "medium"),
            Tier::High => write!(f, "high"),
        }
    }
}

/// Kind of device, inferred from viewport size and hints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeviceClass {
    Mobile,
    Tablet,
    #[default]
    Desktop,
}

impl std::fmt::Display for DeviceClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DeviceClass::Mobile => write!(f, "mobile"),
            DeviceClass::Tablet => write!(f, "tablet"),
            DeviceClass::Desktop => write!(f, "desktop"),
        }
    }
}

/// Viewport orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    Portrait,
    #[default]
    Landscape,
}

/// Viewport size in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn orientation(&self) -> Orientation {
        if self.width >= self.height {
            Orientation::Landscape
        } else {
            Orientation::Portrait
        }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1280, 800)
    }
}

/// Accelerated rendering support.
///
/// An environment without an accelerated context is not an error: it is
/// recorded here with `supported: false` and a low tier.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderingSupport {
    /// Whether an accelerated context could be created
    pub supported: bool,
    /// Largest 2D texture edge the context accepts
    pub max_texture_size: u32,
    /// Number of optional features the context exposes
    pub extension_count: u32,
    /// Derived capability tier
    pub tier: Tier,
    /// Adapter name, when known
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub adapter: Option<String>,
}

impl RenderingSupport {
    /// Support record for an environment with no accelerated context.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Support record for a context that was created successfully.
    pub fn from_context(info: &ContextInfo) -> Self {
        Self {
            supported: true,
            max_texture_size: info.max_texture_size,
            extension_count: info.extension_count,
            tier: rendering_tier(info.max_texture_size, info.extension_count),
            adapter: info.name.clone(),
        }
    }
}

/// Snapshot of the environment's rendering capability.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CapabilitySnapshot {
    pub rendering: RenderingSupport,
    pub memory_tier: Tier,
    pub device_class: DeviceClass,
    pub touch: bool,
    pub orientation: Orientation,
    pub viewport: Viewport,
}

/// Map context limits to a tier.
///
/// `>= 8192` texels and more than 20 extensions is high, `>= 4096` and more
/// than 15 is medium, anything else is low.
pub fn rendering_tier(max_texture_size: u32, extension_count: u32) -> Tier {
    if max_texture_size >= 8192 && extension_count > 20 {
        Tier::High
    } else if max_texture_size >= 4096 && extension_count > 15 {
        Tier::Medium
    } else {
        Tier::Low
    }
}

/// Classify a device from its viewport width and an optional family hint.
///
/// A phone hint always means mobile; a tablet hint caps a wide viewport at
/// tablet.
pub fn device_class(width: u32, hint: Option<DeviceFamily>) -> DeviceClass {
    let by_width = if width < MOBILE_MAX_WIDTH {
        DeviceClass::Mobile
    } else if width < TABLET_MAX_WIDTH {
        DeviceClass::Tablet
    } else {
        DeviceClass::Desktop
    };

    match (hint, by_width) {
        (Some(DeviceFamily::Phone), _) => DeviceClass::Mobile,
        (Some(DeviceFamily::Tablet), DeviceClass::Desktop) => DeviceClass::Tablet,
        (_, class) => class,
    }
}

/// Memory tier from installed memory, or from the device class when the
/// environment cannot tell.
pub fn memory_tier(memory_gb: Option<f32>, class: DeviceClass) -> Tier {
    match memory_gb {
        Some(gb) if gb >= 8.0 => Tier::High,
        Some(gb) if gb >= 4.0 => Tier::Medium,
        Some(_) => Tier::Low,
        None => match class {
            DeviceClass::Mobile => Tier::Low,
            DeviceClass::Tablet => Tier::Medium,
            DeviceClass::Desktop => Tier::High,
        },
    }
}
