use crate::config::ConfigError;
use crate::driver::FrameStage;
use particle_renderer::RenderError;
use particle_simulation::SimulationError;

/// Startup failures. All of them are fatal.
#[derive(Debug, thiserror::Error)]
pub enum ContextError {
    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),
    #[error("failed to open the GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),
    #[error("failed to create the window surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Simulation(#[from] SimulationError),
    #[error(transparent)]
    Render(#[from] RenderError),
}

/// Failures while driving a single frame
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("frame stage {found:?} recorded while {expected:?} was due")]
    OutOfOrder {
        expected: FrameStage,
        found: FrameStage,
    },
    #[error("surface unavailable: {0}")]
    Surface(#[from] wgpu::SurfaceError),
    #[error("frame requested after the driver closed")]
    Closed,
}
