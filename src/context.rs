//! Device handles and every GPU object the frame loop touches

use crate::config::AppConfig;
use crate::error::ContextError;
use particle_physics::SceneSeed;
use particle_renderer::PointRenderer;
use particle_simulation::{BufferCounts, ParticleBuffers, ParticleSimulation};

/// Pick an adapter (compatible with `surface` when one is given) and open
/// its device with default limits.
pub async fn request_device(
    instance: &wgpu::Instance,
    surface: Option<&wgpu::Surface<'_>>,
) -> Result<(wgpu::Adapter, wgpu::Device, wgpu::Queue), ContextError> {
    let adapter = instance
        .request_adapter(&wgpu::RequestAdapterOptions {
            power_preference: wgpu::PowerPreference::HighPerformance,
            compatible_surface: surface,
            force_fallback_adapter: false,
        })
        .await?;

    log::info!("✓ Using GPU: {}", adapter.get_info().name);

    let (device, queue) = adapter
        .request_device(&wgpu::DeviceDescriptor {
            label: Some("Device"),
            required_features: wgpu::Features::empty(),
            required_limits: wgpu::Limits::default(),
            memory_hints: wgpu::MemoryHints::default(),
            experimental_features: wgpu::ExperimentalFeatures::default(),
            trace: wgpu::Trace::Off,
        })
        .await?;

    Ok((adapter, device, queue))
}

/// Owns the device, the particle buffers, both pipelines and the camera
/// uniform. Created once; the frame driver only borrows it.
pub struct RenderContext {
    device: wgpu::Device,
    queue: wgpu::Queue,
    buffers: ParticleBuffers,
    simulation: ParticleSimulation,
    renderer: PointRenderer,
}

impl RenderContext {
    /// Upload `seed` and build both stages. The seed arrays are dropped
    /// after the upload.
    pub async fn new(
        device: wgpu::Device,
        queue: wgpu::Queue,
        color_format: wgpu::TextureFormat,
        width: u32,
        height: u32,
        config: &AppConfig,
        seed: SceneSeed,
    ) -> Result<Self, ContextError> {
        config.simulation.validate()?;
        let counts = BufferCounts {
            particles: config.simulation.particle_count,
            attractors: config.simulation.attractor_count,
        };
        let shader_dir = config.shader_dir.as_deref();

        let buffers = ParticleBuffers::upload(&device, seed, counts)?;
        log::info!(
            "✓ Buffers uploaded: {} particles, {} attractors",
            counts.particles,
            counts.attractors
        );

        let simulation = ParticleSimulation::new(
            &device,
            &buffers,
            &config.simulation.step_params(),
            shader_dir,
        )
        .await?;
        let renderer = PointRenderer::new(&device, color_format, width, height, shader_dir).await?;

        Ok(Self {
            device,
            queue,
            buffers,
            simulation,
            renderer,
        })
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.queue
    }

    pub fn buffers(&self) -> &ParticleBuffers {
        &self.buffers
    }

    pub fn simulation(&self) -> &ParticleSimulation {
        &self.simulation
    }

    pub fn renderer(&self) -> &PointRenderer {
        &self.renderer
    }
}
