//! Full frames rendered into an offscreen texture on a real adapter

use gravity_particles::*;
use particle_physics::*;

const SIZE: u32 = 64;

/// Run with `cargo test -- --ignored` on a machine with an adapter
fn init_device() -> (wgpu::Device, wgpu::Queue) {
    let instance = wgpu::Instance::new(&wgpu::InstanceDescriptor {
        backends: wgpu::Backends::all(),
        ..Default::default()
    });
    let (_adapter, device, queue) =
        pollster::block_on(request_device(&instance, None)).expect("no GPU adapter available");
    (device, queue)
}

fn small_config(particle_count: u32) -> AppConfig {
    let mut config = AppConfig::default();
    config.simulation.particle_count = particle_count;
    config
}

fn still_scene(config: &AppConfig) -> SceneSeed {
    let scene = seed_scene(&config.simulation.seed_config(), 17);
    let attractors = scene
        .attractors
        .iter()
        .map(|a| Attractor { strength: 0.0, ..*a })
        .collect();
    SceneSeed::at_rest(scene.positions, attractors)
}

fn context(
    device: wgpu::Device,
    queue: wgpu::Queue,
    config: &AppConfig,
    seed: SceneSeed,
) -> RenderContext {
    pollster::block_on(RenderContext::new(
        device,
        queue,
        OffscreenTarget::FORMAT,
        SIZE,
        SIZE,
        config,
        seed,
    ))
    .unwrap()
}

#[test]
#[ignore = "requires a GPU adapter"]
fn draw_sees_colors_written_by_the_dispatch() {
    let (device, queue) = init_device();
    let config = small_config(4096);
    let context = context(device, queue, &config, still_scene(&config));
    let mut target = OffscreenTarget::new(context.device(), SIZE, SIZE);
    let mut driver = FrameDriver::new();

    let report = driver.run_frame(&context, &mut target).unwrap();
    assert_eq!(report.state, DriverState::Running);

    // Seeded colors are all zero; only the compute pass paints them
    let pixels = target
        .read_pixels(context.device(), context.queue())
        .unwrap();
    assert_eq!(pixels.len(), (SIZE * SIZE) as usize);
    let lit = pixels.iter().filter(|px| px[..3] != [0, 0, 0]).count();
    assert!(lit > 0, "no particle reached the target");
    assert!(pixels
        .iter()
        .filter(|px| px[..3] != [0, 0, 0])
        .all(|px| px[2] > px[0]), "resting particles draw in the cool color");

    // Corner lies outside the projected spawn cube
    assert_eq!(pixels[0], [0, 0, 0, 255]);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn one_frame_advances_the_simulation_by_one_step() {
    let (device, queue) = init_device();
    let config = small_config(1000);
    let scene = seed_scene(&config.simulation.seed_config(), 3);

    let mut positions = scene.positions.clone();
    let mut velocities = scene.velocities.clone();
    let mut colors = scene.colors.clone();
    let attractors = scene.attractors.clone();
    step_all(
        &mut positions,
        &mut velocities,
        &mut colors,
        &attractors,
        &config.simulation.step_params(),
    );

    let context = context(device, queue, &config, scene);
    let mut target = OffscreenTarget::new(context.device(), SIZE, SIZE);
    FrameDriver::new().run_frame(&context, &mut target).unwrap();

    let snapshot = context
        .buffers()
        .read_snapshot(context.device(), context.queue())
        .unwrap();
    for (device_pos, reference) in snapshot.positions.iter().zip(&positions) {
        for c in 0..3 {
            assert!((device_pos[c] - reference[c]).abs() < 1e-3);
        }
    }
}

#[test]
#[ignore = "requires a GPU adapter"]
fn close_request_finishes_the_frame_then_stops() {
    let (device, queue) = init_device();
    let config = small_config(256);
    let context = context(device, queue, &config, still_scene(&config));
    let mut target = OffscreenTarget::new(context.device(), SIZE, SIZE);
    let mut driver = FrameDriver::new();

    driver.request_close();
    assert_eq!(driver.state(), DriverState::Running);

    let report = driver.run_frame(&context, &mut target).unwrap();
    assert_eq!(report.state, DriverState::Closing);
    assert!(matches!(
        driver.run_frame(&context, &mut target),
        Err(FrameError::Closed)
    ));
}

#[test]
#[ignore = "requires a GPU adapter"]
fn mismatched_seed_is_rejected_at_startup() {
    let (device, queue) = init_device();
    let config = small_config(512);
    let seed = seed_scene(&small_config(500).simulation.seed_config(), 1);

    let result = pollster::block_on(RenderContext::new(
        device,
        queue,
        OffscreenTarget::FORMAT,
        SIZE,
        SIZE,
        &config,
        seed,
    ));
    assert!(matches!(
        result,
        Err(ContextError::Simulation(
            particle_simulation::SimulationError::UploadSizeMismatch { .. }
        ))
    ));
}
