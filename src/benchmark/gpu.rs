//! wgpu-backed surface for the render sub-tests.
//!
//! The device is requested lazily from the same adapter the capability probe
//! reports, on the first sub-test that needs it. Every submission is followed
//! by a blocking poll so the measured time includes the GPU work.

use std::sync::OnceLock;

use tracing::{info, warn};

use super::surface::RenderSurface;
use super::{BenchmarkError, SubTestResult};
use crate::capability::accelerated_adapter;

#[derive(Debug)]
struct Gpu {
    device: wgpu::Device,
    queue: wgpu::Queue,
    max_texture_size: u32,
}

impl Gpu {
    fn acquire(power_preference: wgpu::PowerPreference) -> Option<Self> {
        let adapter = accelerated_adapter(power_preference)?;
        let limits = adapter.limits();

        let request = adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("Benchmark Device"),
                required_features: wgpu::Features::empty(),
                required_limits: limits.clone(),
            },
            None,
        );

        match futures::executor::block_on(request) {
            Ok((device, queue)) => {
                info!(adapter = %adapter.get_info().name, "Benchmark device ready");
                Some(Self {
                    device,
                    queue,
                    max_texture_size: limits.max_texture_dimension_2d,
                })
            }
            Err(e) => {
                warn!(error = %e, "Could not create benchmark device");
                None
            }
        }
    }

    fn flush(&self) {
        self.queue.submit(std::iter::empty());
        self.device.poll(wgpu::Maintain::Wait);
    }
}

/// Render surface backed by a real wgpu device.
#[derive(Debug)]
pub struct WgpuSurface {
    power_preference: wgpu::PowerPreference,
    gpu: OnceLock<Option<Gpu>>,
    vertex_buffer: Option<wgpu::Buffer>,
    uniform_buffer: Option<wgpu::Buffer>,
}

impl WgpuSurface {
    /// Surface on the adapter chosen for `power_preference`.
    pub fn new(power_preference: wgpu::PowerPreference) -> Self {
        Self {
            power_preference,
            gpu: OnceLock::new(),
            vertex_buffer: None,
            uniform_buffer: None,
        }
    }
}

fn device(
    cell: &OnceLock<Option<Gpu>>,
    power_preference: wgpu::PowerPreference,
) -> SubTestResult<&Gpu> {
    cell.get_or_init(|| Gpu::acquire(power_preference))
        .as_ref()
        .ok_or(BenchmarkError::ContextUnavailable)
}

/// Write `bytes` into a reusable buffer, growing it when too small.
fn write_staged(
    gpu: &Gpu,
    slot: &mut Option<wgpu::Buffer>,
    bytes: &[u8],
    usage: wgpu::BufferUsages,
    label: &'static str,
) -> SubTestResult<()> {
    let size = bytes.len() as u64;
    if size == 0 {
        return Ok(());
    }
    if size % wgpu::COPY_BUFFER_ALIGNMENT != 0 {
        return Err(BenchmarkError::Unsupported(format!(
            "upload of {size} bytes is not {}-byte aligned",
            wgpu::COPY_BUFFER_ALIGNMENT
        )));
    }

    if !slot.as_ref().is_some_and(|buffer| buffer.size() >= size) {
        *slot = Some(gpu.device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(label),
            size,
            usage: usage | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        }));
    }
    if let Some(buffer) = slot.as_ref() {
        gpu.queue.write_buffer(buffer, 0, bytes);
    }

    gpu.flush();
    Ok(())
}

impl RenderSurface for WgpuSurface {
    fn upload_vertices(&mut self, bytes: &[u8]) -> SubTestResult<()> {
        let gpu = device(&self.gpu, self.power_preference)?;
        write_staged(
            gpu,
            &mut self.vertex_buffer,
            bytes,
            wgpu::BufferUsages::VERTEX,
            "Benchmark Vertex Buffer",
        )
    }

    fn upload_uniforms(&mut self, bytes: &[u8]) -> SubTestResult<()> {
        let gpu = device(&self.gpu, self.power_preference)?;
        write_staged(
            gpu,
            &mut self.uniform_buffer,
            bytes,
            wgpu::BufferUsages::UNIFORM,
            "Benchmark Uniform Buffer",
        )
    }

    fn max_texture_size(&self) -> SubTestResult<u32> {
        device(&self.gpu, self.power_preference).map(|gpu| gpu.max_texture_size)
    }

    fn allocate_texture(&mut self, size: u32) -> SubTestResult<()> {
        let gpu = device(&self.gpu, self.power_preference)?;
        if size == 0 || size > gpu.max_texture_size {
            return Err(BenchmarkError::Unsupported(format!(
                "texture size {size} exceeds limit {}",
                gpu.max_texture_size
            )));
        }

        let extent = wgpu::Extent3d {
            width: size,
            height: size,
            depth_or_array_layers: 1,
        };
        let texture = gpu.device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Benchmark Texture"),
            size: extent,
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: wgpu::TextureFormat::Rgba8Unorm,
            usage: wgpu::TextureUsages::TEXTURE_BINDING | wgpu::TextureUsages::COPY_DST,
            view_formats: &[],
        });

        let texels = vec![0u8; size as usize * size as usize * 4];
        gpu.queue.write_texture(
            wgpu::ImageCopyTexture {
                texture: &texture,
                mip_level: 0,
                origin: wgpu::Origin3d::ZERO,
                aspect: wgpu::TextureAspect::All,
            },
            &texels,
            wgpu::ImageDataLayout {
                offset: 0,
                bytes_per_row: Some(4 * size),
                rows_per_image: Some(size),
            },
            extent,
        );
        gpu.flush();

        texture.destroy();
        Ok(())
    }
}
