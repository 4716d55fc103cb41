//! Accelerated rendering context probes.

use tracing::{info, warn};

/// Limits read back from a successfully created context.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContextInfo {
    /// Largest 2D texture edge
    pub max_texture_size: u32,
    /// Number of optional features
    pub extension_count: u32,
    /// Adapter or renderer name
    pub name: Option<String>,
}

/// Attempts to obtain a hardware-accelerated rendering context.
pub trait RenderingProbe: Send + Sync {
    /// Returns `None` when no accelerated context is obtainable.
    fn probe(&self) -> Option<ContextInfo>;
}

/// Probe backed by a wgpu adapter request.
///
/// Software adapters (`DeviceType::Cpu`) do not count as accelerated.
#[derive(Debug, Clone, Default)]
pub struct WgpuProbe {
    power_preference: wgpu::PowerPreference,
}

impl WgpuProbe {
    pub fn new() -> Self {
        Self::default()
    }

    /// Prefer the discrete GPU when several are present.
    pub fn high_performance() -> Self {
        Self {
            power_preference: wgpu::PowerPreference::HighPerformance,
        }
    }
}

/// Request a hardware adapter, rejecting software rasterizers.
///
/// Shared by the probe and the benchmark surface so both see the same GPU.
pub fn accelerated_adapter(power_preference: wgpu::PowerPreference) -> Option<wgpu::Adapter> {
    let instance = wgpu::Instance::new(wgpu::InstanceDescriptor::default());

    let adapter = futures::executor::block_on(instance.request_adapter(
        &wgpu::RequestAdapterOptions {
            power_preference,
            compatible_surface: None,
            force_fallback_adapter: false,
        },
    ));

    let Some(adapter) = adapter else {
        warn!("No GPU adapter available, accelerated rendering unsupported");
        return None;
    };

    let adapter_info = adapter.get_info();
    if adapter_info.device_type == wgpu::DeviceType::Cpu {
        warn!(adapter = %adapter_info.name, "Only a software adapter is available");
        return None;
    }

    Some(adapter)
}

impl RenderingProbe for WgpuProbe {
    fn probe(&self) -> Option<ContextInfo> {
        let adapter = accelerated_adapter(self.power_preference)?;
        let adapter_info = adapter.get_info();

        let limits = adapter.limits();
        let info = ContextInfo {
            max_texture_size: limits.max_texture_dimension_2d,
            extension_count: adapter.features().bits().count_ones(),
            name: Some(adapter_info.name),
        };

        info!(
            adapter = info.name.as_deref().unwrap_or("unknown"),
            backend = ?adapter_info.backend,
            max_texture_size = info.max_texture_size,
            extensions = info.extension_count,
            "Probed GPU adapter"
        );

        Some(info)
    }
}

/// Probe that always reports the same result.
#[derive(Debug, Clone, Default)]
pub struct FixedProbe {
    context: Option<ContextInfo>,
}

impl FixedProbe {
    /// A probe reporting a context with the given limits.
    pub fn supported(max_texture_size: u32, extension_count: u32) -> Self {
        Self {
            context: Some(ContextInfo {
                max_texture_size,
                extension_count,
                name: None,
            }),
        }
    }

    /// A probe reporting no accelerated context.
    pub fn unsupported() -> Self {
        Self { context: None }
    }
}

impl RenderingProbe for FixedProbe {
    fn probe(&self) -> Option<ContextInfo> {
        self.context.clone()
    }
}
