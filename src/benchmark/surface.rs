//! Drawable targets for the render sub-tests.

use std::hint::black_box;

use super::{BenchmarkError, SubTestResult};

/// Largest texture edge the texture probe will actually allocate.
pub const MAX_PROBE_TEXTURE: u32 = 2048;

/// Target the render workloads submit data to.
pub trait RenderSurface: Send + Sync {
    /// Submit a vertex buffer.
    fn upload_vertices(&mut self, bytes: &[u8]) -> SubTestResult<()>;

    /// Submit per-object uniform data for one frame.
    fn upload_uniforms(&mut self, bytes: &[u8]) -> SubTestResult<()>;

    /// Largest 2D texture edge the surface accepts.
    fn max_texture_size(&self) -> SubTestResult<u32>;

    /// Allocate and clear an RGBA8 texture of `size x size`.
    fn allocate_texture(&mut self, size: u32) -> SubTestResult<()>;
}

/// Surface used when no accelerated context was detected. Every call fails,
/// so each render sub-test scores the failure minimum.
#[derive(Debug, Default, Clone, Copy)]
pub struct UnavailableSurface;

impl RenderSurface for UnavailableSurface {
    fn upload_vertices(&mut self, _bytes: &[u8]) -> SubTestResult<()> {
        Err(BenchmarkError::ContextUnavailable)
    }

    fn upload_uniforms(&mut self, _bytes: &[u8]) -> SubTestResult<()> {
        Err(BenchmarkError::ContextUnavailable)
    }

    fn max_texture_size(&self) -> SubTestResult<u32> {
        Err(BenchmarkError::ContextUnavailable)
    }

    fn allocate_texture(&mut self, _size: u32) -> SubTestResult<()> {
        Err(BenchmarkError::ContextUnavailable)
    }
}

/// In-memory surface that copies uploads into staging memory. Used for
/// headless runs and tests where no GPU is present.
#[derive(Debug, Default)]
pub struct HeadlessSurface {
    max_texture_size: Option<u32>,
    staging: Vec<u8>,
    bytes_uploaded: u64,
}

impl HeadlessSurface {
    /// Surface with the given texture limit.
    pub fn new(max_texture_size: u32) -> Self {
        Self {
            max_texture_size: Some(max_texture_size),
            ..Default::default()
        }
    }

    /// Surface with no accelerated context behind it.
    pub fn unavailable() -> Self {
        Self::default()
    }

    /// Total bytes submitted so far.
    pub fn bytes_uploaded(&self) -> u64 {
        self.bytes_uploaded
    }

    fn ensure_available(&self) -> SubTestResult<u32> {
        self.max_texture_size
            .ok_or(BenchmarkError::ContextUnavailable)
    }

    fn stage(&mut self, bytes: &[u8]) {
        self.staging.clear();
        self.staging.extend_from_slice(bytes);
        self.bytes_uploaded += bytes.len() as u64;
        black_box(&self.staging);
    }
}

impl RenderSurface for HeadlessSurface {
    fn upload_vertices(&mut self, bytes: &[u8]) -> SubTestResult<()> {
        self.ensure_available()?;
        self.stage(bytes);
        Ok(())
    }

    fn upload_uniforms(&mut self, bytes: &[u8]) -> SubTestResult<()> {
        self.ensure_available()?;
        self.stage(bytes);
        Ok(())
    }

    fn max_texture_size(&self) -> SubTestResult<u32> {
        self.ensure_available()
    }

    fn allocate_texture(&mut self, size: u32) -> SubTestResult<()> {
        let limit = self.ensure_available()?;
        if size > limit {
            return Err(BenchmarkError::Unsupported(format!(
                "texture size {size} exceeds limit {limit}"
            )));
        }

        let texels = vec![0u8; size as usize * size as usize * 4];
        black_box(&texels);
        Ok(())
    }
}
