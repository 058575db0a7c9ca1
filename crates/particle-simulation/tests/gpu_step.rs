//! Headless tests running the compute kernel on a real adapter and reading
//! the buffers back.

mod common;

use glam::Vec3;
use particle_physics::*;
use particle_simulation::readback::ParticleSnapshot;
use particle_simulation::*;

const TOLERANCE: f32 = 1e-4;

fn counts_for(seed: &SceneSeed) -> BufferCounts {
    BufferCounts {
        particles: seed.particle_count() as u32,
        attractors: seed.attractor_count() as u32,
    }
}

fn upload(
    device: &wgpu::Device,
    seed: SceneSeed,
    step: &StepParams,
) -> (ParticleBuffers, ParticleSimulation) {
    let counts = counts_for(&seed);
    let buffers = ParticleBuffers::upload(device, seed, counts).unwrap();
    let simulation =
        pollster::block_on(ParticleSimulation::new(device, &buffers, step, None)).unwrap();
    (buffers, simulation)
}

/// Evenly spread directions on a sphere of `radius` around the origin
fn sphere_positions(count: usize, radius: f32) -> Vec<Vec4Slot> {
    let golden = std::f32::consts::PI * (3.0 - 5.0f32.sqrt());
    (0..count)
        .map(|i| {
            let y = 1.0 - 2.0 * (i as f32 + 0.5) / count as f32;
            let ring = (1.0 - y * y).sqrt();
            let theta = golden * i as f32;
            position_slot(Vec3::new(ring * theta.cos(), y, ring * theta.sin()) * radius)
        })
        .collect()
}

fn assert_close(a: &[Vec4Slot], b: &[Vec4Slot], tolerance: f32) {
    assert_eq!(a.len(), b.len());
    for (i, (x, y)) in a.iter().zip(b).enumerate() {
        for c in 0..4 {
            let scale = x[c].abs().max(y[c].abs()).max(1.0);
            assert!(
                (x[c] - y[c]).abs() <= tolerance * scale,
                "particle {} component {}: {} vs {}",
                i,
                c,
                x[c],
                y[c]
            );
        }
    }
}

#[test]
#[ignore = "requires a GPU adapter"]
fn single_attractor_scenario() {
    let (device, queue) = common::init_device();
    let step = StepParams::default();
    let start = sphere_positions(1024, 10.0);
    let seed = SceneSeed::at_rest(start.clone(), vec![Attractor::new(Vec3::ZERO, -5.0)]);
    let (buffers, simulation) = upload(&device, seed, &step);

    simulation.step(&device, &queue);
    let snapshot = buffers.read_snapshot(&device, &queue).unwrap();

    let expected_speed = 5.0 / (10.0 * 10.0) * step.dt;
    for i in 0..start.len() {
        let p0 = slot_xyz(&start[i]);
        let v = slot_xyz(&snapshot.velocities[i]);
        let p1 = slot_xyz(&snapshot.positions[i]);

        let speed = v.length();
        assert!(
            ((speed - expected_speed) / expected_speed).abs() < 1e-3,
            "particle {}: speed {} vs {}",
            i,
            speed,
            expected_speed
        );
        // Points at the origin
        assert!(v.normalize().dot(-p0.normalize()) > 0.9999, "particle {}", i);
        assert!(((p1 - p0) - v * step.dt).length() < TOLERANCE);
        assert_eq!(snapshot.positions[i][3], 1.0);
    }
}

#[test]
#[ignore = "requires a GPU adapter"]
fn zero_strength_attractors_leave_particles_in_place() {
    let (device, queue) = common::init_device();
    let step = StepParams::default();
    let scene = seed_scene(
        &SeedConfig {
            particle_count: 4096,
            ..Default::default()
        },
        5,
    );
    let attractors = scene
        .attractors
        .iter()
        .map(|a| Attractor { strength: 0.0, ..*a })
        .collect();
    let start = scene.positions.clone();
    let (buffers, simulation) = upload(&device, SceneSeed::at_rest(scene.positions, attractors), &step);

    for _ in 0..30 {
        simulation.step(&device, &queue);
    }
    let snapshot = buffers.read_snapshot(&device, &queue).unwrap();

    assert_eq!(snapshot.positions, start);
    assert!(snapshot.velocities.iter().all(|v| v[..3] == [0.0; 3]));
}

#[test]
#[ignore = "requires a GPU adapter"]
fn device_step_matches_reference_kernel() {
    let (device, queue) = common::init_device();
    let step = StepParams::default();
    let scene = seed_scene(
        &SeedConfig {
            particle_count: 2000,
            ..Default::default()
        },
        99,
    );

    let mut positions = scene.positions.clone();
    let mut velocities = scene.velocities.clone();
    let mut colors = scene.colors.clone();
    let attractors = scene.attractors.clone();

    let (buffers, simulation) = upload(&device, scene, &step);
    for _ in 0..10 {
        simulation.step(&device, &queue);
        step_all(&mut positions, &mut velocities, &mut colors, &attractors, &step);
    }
    let snapshot = buffers.read_snapshot(&device, &queue).unwrap();

    assert_close(&snapshot.positions, &positions, 1e-3);
    assert_close(&snapshot.velocities, &velocities, 1e-3);
    assert_close(&snapshot.colors, &colors, 1e-3);
}

#[test]
#[ignore = "requires a GPU adapter"]
fn partial_last_workgroup_updates_every_particle() {
    let (device, queue) = common::init_device();
    let step = StepParams::default();
    // 300 = one full group of 256 plus a partial one
    let seed = SceneSeed::at_rest(
        sphere_positions(300, 20.0),
        vec![Attractor::new(Vec3::ZERO, -1.0)],
    );
    let (buffers, simulation) = upload(&device, seed, &step);
    assert_eq!(simulation.particle_count(), 300);
    assert_eq!(simulation.workgroup_count(), 2);

    simulation.step(&device, &queue);
    let snapshot = buffers.read_snapshot(&device, &queue).unwrap();

    assert!(snapshot.colors.iter().all(|c| c[3] == 1.0));
    assert!(snapshot.velocities.iter().all(|v| v[..3] != [0.0; 3]));
}

#[test]
#[ignore = "requires a GPU adapter"]
fn repeated_step_from_same_state_is_deterministic() {
    let (device, queue) = common::init_device();
    let step = StepParams::default();
    let config = SeedConfig {
        particle_count: 1000,
        ..Default::default()
    };

    let run = || -> ParticleSnapshot {
        let (buffers, simulation) = upload(&device, seed_scene(&config, 1234), &step);
        simulation.step(&device, &queue);
        buffers.read_snapshot(&device, &queue).unwrap()
    };

    assert_eq!(run(), run());
}

#[test]
#[ignore = "requires a GPU adapter"]
fn buffers_have_exact_sizes_and_reject_mismatched_uploads() {
    let (device, _queue) = common::init_device();
    let counts = BufferCounts {
        particles: 500,
        attractors: ATTRACTOR_COUNT,
    };
    let config = SeedConfig {
        particle_count: 500,
        ..Default::default()
    };

    let buffers = ParticleBuffers::upload(&device, seed_scene(&config, 1), counts).unwrap();
    assert_eq!(buffers.position_buffer().size(), 500 * 16);
    assert_eq!(buffers.velocity_buffer().size(), 500 * 16);
    assert_eq!(buffers.color_buffer().size(), 500 * 16);
    assert_eq!(buffers.attractor_buffer().size(), ATTRACTOR_COUNT as u64 * 16);

    let wrong = BufferCounts {
        particles: 501,
        ..counts
    };
    assert!(matches!(
        ParticleBuffers::upload(&device, seed_scene(&config, 1), wrong),
        Err(SimulationError::UploadSizeMismatch { .. })
    ));
}
