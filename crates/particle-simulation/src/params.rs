//! Simulation parameter uniform

use bytemuck::{Pod, Zeroable};
use particle_physics::StepParams;

/// Matches `SimParams` in `particles.wgsl` (48 bytes)
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SimParams {
    pub dt: f32,
    pub softening: f32,
    pub color_scale: f32,
    /// Invocations with an index at or above this write nothing
    pub particle_count: u32,
    pub cool_color: [f32; 4],
    pub hot_color: [f32; 4],
}

impl SimParams {
    pub fn new(step: &StepParams, particle_count: u32) -> Self {
        Self {
            dt: step.dt,
            softening: step.softening,
            color_scale: step.color_scale,
            particle_count,
            cool_color: step.cool_color,
            hot_color: step.hot_color,
        }
    }
}
