//! Memoized capability detection.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::environment::Environment;
use super::probe::RenderingProbe;
use super::{device_class, memory_tier, CapabilitySnapshot, RenderingSupport};

/// Detects and caches a [`CapabilitySnapshot`].
///
/// The first [`detect`](Self::detect) probes the environment and caches the
/// snapshot; later calls return the cached value until [`reset`](Self::reset)
/// or [`set_environment`](Self::set_environment). Concurrent callers during
/// the first detection wait for it instead of probing twice.
pub struct CapabilityDetector {
    probe: Box<dyn RenderingProbe>,
    environment: Box<dyn Environment>,
    cached: Mutex<Option<CapabilitySnapshot>>,
}

impl std::fmt::Debug for CapabilityDetector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CapabilityDetector")
            .field("viewport", &self.environment.viewport())
            .field("cached", &self.slot().is_some())
            .finish()
    }
}

impl CapabilityDetector {
    /// Create a detector over a probe and an environment.
    pub fn new(
        probe: impl RenderingProbe + 'static,
        environment: impl Environment + 'static,
    ) -> Self {
        Self {
            probe: Box::new(probe),
            environment: Box::new(environment),
            cached: Mutex::new(None),
        }
    }

    /// Capability snapshot, detected on first use.
    pub fn detect(&self) -> CapabilitySnapshot {
        let mut slot = self.slot();
        if let Some(snapshot) = slot.as_ref() {
            return snapshot.clone();
        }

        let snapshot = self.detect_uncached();
        *slot = Some(snapshot.clone());
        snapshot
    }

    /// Clear the cached snapshot.
    pub fn reset(&self) {
        *self.slot() = None;
        debug!("Capability snapshot cleared");
    }

    /// Replace the environment (resize, orientation change) and clear the cache.
    pub fn set_environment(&mut self, environment: impl Environment + 'static) {
        self.environment = Box::new(environment);
        self.reset();
    }

    /// Detect without touching the cache.
    pub fn detect_uncached(&self) -> CapabilitySnapshot {
        let viewport = self.environment.viewport();
        let class = device_class(viewport.width, self.environment.device_family());

        let rendering = match self.probe.probe() {
            Some(info) => RenderingSupport::from_context(&info),
            None => RenderingSupport::unavailable(),
        };

        let snapshot = CapabilitySnapshot {
            memory_tier: memory_tier(self.environment.memory_gb(), class),
            device_class: class,
            touch: self.environment.touch_capable(),
            orientation: viewport.orientation(),
            viewport,
            rendering,
        };

        info!(
            supported = snapshot.rendering.supported,
            rendering_tier = %snapshot.rendering.tier,
            device = %snapshot.device_class,
            memory_tier = %snapshot.memory_tier,
            "Detected rendering capability"
        );

        snapshot
    }

    fn slot(&self) -> MutexGuard<'_, Option<CapabilitySnapshot>> {
        self.cached.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}
