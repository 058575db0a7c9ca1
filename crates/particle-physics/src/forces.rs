//! Attractor forces and integration
//!
//! NOTE: These are reference implementations for documentation and testing.
//! The actual simulation runs `particles.wgsl` on the GPU; both must compute
//! the same thing.

use crate::constants::*;
use crate::particle::{position_slot, slot_xyz, velocity_slot, Attractor, Vec4Slot};
use glam::{Vec3, Vec4};

/// Per-step parameters shared by every particle
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StepParams {
    pub dt: f32,
    pub softening: f32,
    /// Multiplies speed before it is clamped into the color ramp
    pub color_scale: f32,
    pub cool_color: [f32; 4],
    pub hot_color: [f32; 4],
}

impl Default for StepParams {
    fn default() -> Self {
        Self {
            dt: TIME_STEP,
            softening: SOFTENING,
            color_scale: COLOR_SCALE,
            cool_color: COOL_COLOR,
            hot_color: HOT_COLOR,
        }
    }
}

/// New state of one particle after a step
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParticleStep {
    pub position: Vec4Slot,
    pub velocity: Vec4Slot,
    pub color: Vec4Slot,
}

/// Acceleration from all attractors at `position`
/// a = Σ s_j * (p - a_j) / (|p - a_j|³ + ε)
///
/// Attractors are summed in index order.
pub fn attractor_acceleration(position: Vec3, attractors: &[Attractor], softening: f32) -> Vec3 {
    attractors.iter().fold(Vec3::ZERO, |acc, attractor| {
        let d = position - attractor.position();
        let r = d.length();
        acc + attractor.strength * d / (r * r * r + softening)
    })
}

/// Speed mapped onto the cool→hot ramp
pub fn speed_color(velocity: Vec3, params: &StepParams) -> Vec4Slot {
    let t = (velocity.length() * params.color_scale).clamp(0.0, 1.0);
    Vec4::from_array(params.cool_color)
        .lerp(Vec4::from_array(params.hot_color), t)
        .to_array()
}

/// Advance one particle by one timestep (semi-implicit Euler)
pub fn step_particle(
    position: &Vec4Slot,
    velocity: &Vec4Slot,
    attractors: &[Attractor],
    params: &StepParams,
) -> ParticleStep {
    let p = slot_xyz(position);
    let acceleration = attractor_acceleration(p, attractors, params.softening);
    let v = slot_xyz(velocity) + acceleration * params.dt;
    let p = p + v * params.dt;

    ParticleStep {
        position: position_slot(p),
        velocity: velocity_slot(v),
        color: speed_color(v, params),
    }
}

/// Advance every particle in parallel arrays by one timestep
pub fn step_all(
    positions: &mut [Vec4Slot],
    velocities: &mut [Vec4Slot],
    colors: &mut [Vec4Slot],
    attractors: &[Attractor],
    params: &StepParams,
) {
    assert_eq!(positions.len(), velocities.len());
    assert_eq!(positions.len(), colors.len());

    for ((position, velocity), color) in positions
        .iter_mut()
        .zip(velocities.iter_mut())
        .zip(colors.iter_mut())
    {
        let next = step_particle(position, velocity, attractors, params);
        *position = next.position;
        *velocity = next.velocity;
        *color = next.color;
    }
}

/// Invocations needed to cover `particle_count` with groups of `group_size`
pub fn workgroups_for(particle_count: u32, group_size: u32) -> u32 {
    particle_count.div_ceil(group_size)
}
