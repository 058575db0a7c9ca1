//! Gravity Particles
//!
//! One million particles, six attractors, one compute pass and one point
//! draw per frame.

use anyhow::Context;
use gravity_particles::{
    request_device, window_title, AppConfig, DriverState, FrameDriver, FrameError, RenderContext,
    SurfaceTarget,
};
use particle_physics::{seed_scene, seed_scene_from_time};
use std::sync::Arc;
use winit::{
    application::ApplicationHandler,
    event::*,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::{Window, WindowId},
};

struct GpuState {
    context: RenderContext,
    target: SurfaceTarget,
}

impl GpuState {
    async fn new(window: Arc<Window>, config: &AppConfig) -> anyhow::Result<Self> {
        let size = window.inner_size();

        let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
            backends: wgpu::Backends::all(),
            ..Default::default()
        });
        let surface = instance
            .create_surface(window)
            .context("creating window surface")?;

        let (adapter, device, queue) = request_device(&instance, Some(&surface))
            .await
            .context("opening GPU device")?;

        let target = SurfaceTarget::new(surface, &adapter, &device, size.width, size.height);

        let seed_config = config.simulation.seed_config();
        let seed = match config.simulation.rng_seed {
            Some(rng_seed) => seed_scene(&seed_config, rng_seed),
            None => seed_scene_from_time(&seed_config).0,
        };

        let context = RenderContext::new(
            device,
            queue,
            target.format(),
            size.width,
            size.height,
            config,
            seed,
        )
        .await
        .context("building GPU pipelines")?;

        Ok(Self { context, target })
    }
}

struct App {
    config: AppConfig,
    window: Option<Arc<Window>>,
    gpu_state: Option<GpuState>,
    driver: FrameDriver,
    failure: Option<anyhow::Error>,
}

impl App {
    fn fail(&mut self, event_loop: &ActiveEventLoop, error: anyhow::Error) {
        log::error!("{:#}", error);
        self.failure = Some(error);
        event_loop.exit();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let window_attributes = Window::default_attributes()
            .with_title(self.config.window.title.clone())
            .with_inner_size(winit::dpi::PhysicalSize::new(
                self.config.window.width,
                self.config.window.height,
            ))
            .with_resizable(false);

        let window = match event_loop.create_window(window_attributes) {
            Ok(window) => Arc::new(window),
            Err(e) => return self.fail(event_loop, anyhow::Error::new(e).context("creating window")),
        };
        self.window = Some(window.clone());

        match pollster::block_on(GpuState::new(window, &self.config)) {
            Ok(gpu_state) => self.gpu_state = Some(gpu_state),
            Err(e) => self.fail(event_loop, e),
        }
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _window_id: WindowId,
        event: WindowEvent,
    ) {
        match event {
            WindowEvent::CloseRequested
            | WindowEvent::KeyboardInput {
                event:
                    KeyEvent {
                        physical_key: PhysicalKey::Code(KeyCode::Escape),
                        ..
                    },
                ..
            } => {
                self.driver.request_close();
                self.driver.poll_events();
            }

            WindowEvent::RedrawRequested => {
                let (Some(window), Some(gpu_state)) = (&self.window, &mut self.gpu_state) else {
                    return;
                };
                match self.driver.run_frame(&gpu_state.context, &mut gpu_state.target) {
                    Ok(report) => {
                        if let Some(fps) = report.fps {
                            window.set_title(&window_title(&self.config.window.title, fps));
                        }
                    }
                    Err(FrameError::Surface(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated)) => {
                        gpu_state.target.reconfigure(gpu_state.context.device());
                    }
                    Err(FrameError::Surface(wgpu::SurfaceError::OutOfMemory)) => {
                        let error = anyhow::anyhow!("surface out of memory");
                        return self.fail(event_loop, error);
                    }
                    Err(FrameError::Closed) => {}
                    Err(e) => log::warn!("Frame skipped: {}", e),
                }
            }

            _ => {}
        }

        if self.driver.state() == DriverState::Closing {
            event_loop.exit();
            return;
        }

        if let Some(window) = &self.window {
            window.request_redraw();
        }
    }
}

fn main() -> anyhow::Result<()> {
    // Initialize logger (RUST_LOG=debug for FPS lines, trace for frame stages)
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = AppConfig::from_env().context("reading PARTICLES_* configuration")?;
    log::info!(
        "Starting gravity simulation: {} particles, {} attractors",
        config.simulation.particle_count,
        config.simulation.attractor_count
    );

    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App {
        config,
        window: None,
        gpu_state: None,
        driver: FrameDriver::new(),
        failure: None,
    };

    event_loop.run_app(&mut app)?;

    match app.failure {
        Some(error) => Err(error),
        None => Ok(()),
    }
}
