//! Initial scene generation
//!
//! Produces the one-time CPU payload that is uploaded into the particle
//! buffers. After upload the payload is dropped; nothing on the CPU keeps
//! particle state.

use crate::constants::*;
use crate::particle::{position_slot, Attractor, Vec4Slot};
use glam::Vec3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{SystemTime, UNIX_EPOCH};

/// Sizes and extents for a generated scene
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SeedConfig {
    pub particle_count: u32,
    pub attractor_count: u32,
    /// Half-width of the cube particles are spawned in
    pub position_extent: f32,
    /// Half-width of the cube attractors are placed in
    pub attractor_extent: f32,
    /// Strengths are drawn from `(-max_strength, 0]`
    pub max_strength: f32,
}

impl Default for SeedConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            attractor_count: ATTRACTOR_COUNT,
            position_extent: POSITION_EXTENT,
            attractor_extent: ATTRACTOR_EXTENT,
            max_strength: MAX_ATTRACTOR_STRENGTH,
        }
    }
}

/// CPU-side arrays for the initial upload
#[derive(Clone, Debug, PartialEq)]
pub struct SceneSeed {
    pub positions: Vec<Vec4Slot>,
    pub velocities: Vec<Vec4Slot>,
    pub colors: Vec<Vec4Slot>,
    pub attractors: Vec<Attractor>,
}

impl SceneSeed {
    /// Generate a scene from `rng`
    pub fn generate<R: Rng + ?Sized>(config: &SeedConfig, rng: &mut R) -> Self {
        let n = config.particle_count as usize;
        let mut positions = Vec::with_capacity(n);

        for _ in 0..n {
            positions.push(position_slot(random_in_cube(rng, config.position_extent)));
        }

        let attractors = (0..config.attractor_count)
            .map(|_| {
                let position = random_in_cube(rng, config.attractor_extent);
                // random() is in [0, 1), so strength lands in (-max, 0]
                let strength = -rng.random::<f32>() * config.max_strength;
                Attractor::new(position, strength)
            })
            .collect();

        Self {
            positions,
            velocities: vec![[0.0; 4]; n],
            colors: vec![[0.0; 4]; n],
            attractors,
        }
    }

    /// Build a seed from explicit arrays. Used for hand-made test scenes.
    ///
    /// Array lengths are not checked here; the buffer upload rejects
    /// mismatched lengths.
    pub fn from_parts(
        positions: Vec<Vec4Slot>,
        velocities: Vec<Vec4Slot>,
        colors: Vec<Vec4Slot>,
        attractors: Vec<Attractor>,
    ) -> Self {
        Self {
            positions,
            velocities,
            colors,
            attractors,
        }
    }

    /// Particles at rest with zero color
    pub fn at_rest(positions: Vec<Vec4Slot>, attractors: Vec<Attractor>) -> Self {
        let n = positions.len();
        Self::from_parts(positions, vec![[0.0; 4]; n], vec![[0.0; 4]; n], attractors)
    }

    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }

    pub fn attractor_count(&self) -> usize {
        self.attractors.len()
    }
}

fn random_in_cube<R: Rng + ?Sized>(rng: &mut R, extent: f32) -> Vec3 {
    Vec3::new(
        (rng.random::<f32>() * 2.0 - 1.0) * extent,
        (rng.random::<f32>() * 2.0 - 1.0) * extent,
        (rng.random::<f32>() * 2.0 - 1.0) * extent,
    )
}

/// Seed derived from the wall clock, so consecutive runs differ
pub fn time_seed() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0)
}

/// Generate a scene from a fixed seed
pub fn seed_scene(config: &SeedConfig, seed: u64) -> SceneSeed {
    let mut rng = StdRng::seed_from_u64(seed);
    let scene = SceneSeed::generate(config, &mut rng);
    log::info!(
        "✓ Seeded {} particles and {} attractors (seed {})",
        scene.particle_count(),
        scene.attractor_count(),
        seed
    );
    for (j, attractor) in scene.attractors.iter().enumerate() {
        log::debug!(
            "    attractor[{}] at {:?} strength {:.3}",
            j,
            attractor.position,
            attractor.strength
        );
    }
    scene
}

/// Generate a scene from a time-derived seed. Returns the seed used so the
/// run can be reproduced.
pub fn seed_scene_from_time(config: &SeedConfig) -> (SceneSeed, u64) {
    let seed = time_seed();
    (seed_scene(config, seed), seed)
}
