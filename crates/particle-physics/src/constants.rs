//! Fixed workload sizes and physical constants for the simulation
//!
//! The scene is in arbitrary simulation units. Strengths and extents are
//! picked so that particles orbit the attractors within the camera frustum.

/// Number of particles simulated per run
pub const PARTICLE_COUNT: u32 = 1_000_000;

/// Number of gravitational attractors
pub const ATTRACTOR_COUNT: u32 = 6;

/// Bytes per element in every device buffer (one `vec4<f32>`)
pub const VEC4_STRIDE: u64 = 16;

/// Particles start uniformly in `[-POSITION_EXTENT, POSITION_EXTENT]^3`
pub const POSITION_EXTENT: f32 = 32.0;

/// Attractors are placed uniformly in `[-ATTRACTOR_EXTENT, ATTRACTOR_EXTENT]^3`
pub const ATTRACTOR_EXTENT: f32 = 50.0;

/// Attractor strengths are drawn from `(-MAX_ATTRACTOR_STRENGTH, 0]`
pub const MAX_ATTRACTOR_STRENGTH: f32 = 10.0;

/// Integration timestep (one frame at 60 Hz)
pub const TIME_STEP: f32 = 1.0 / 60.0;

/// Added to `|d|^3` in the force denominator so a particle sitting on an
/// attractor sees a bounded acceleration instead of a singularity.
/// With the largest strength the peak acceleration stays around 115.
pub const SOFTENING: f32 = 0.01;

/// Speed that maps to the hot end of the color ramp is `1 / COLOR_SCALE`
pub const COLOR_SCALE: f32 = 0.05;

/// Color for particles at rest (linear RGBA)
pub const COOL_COLOR: [f32; 4] = [0.12, 0.35, 1.0, 1.0];

/// Color for particles at or above the top of the speed ramp (linear RGBA)
pub const HOT_COLOR: [f32; 4] = [1.0, 0.55, 0.15, 1.0];
