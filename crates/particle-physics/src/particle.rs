//! GPU-compatible particle and attractor records
//!
//! Particles are stored as three parallel arrays of `vec4<f32>` (position,
//! velocity, color). Index `i` in each array is the same particle.

use bytemuck::{Pod, Zeroable};
use glam::{Vec3, Vec4};

/// One `vec4<f32>` slot in a particle buffer
pub type Vec4Slot = [f32; 4];

/// Gravitational attractor, packed as `vec4` (xyz = position, w = strength)
///
/// Strength is non-positive; a negative strength pulls particles in.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Pod, Zeroable)]
pub struct Attractor {
    pub position: [f32; 3],
    pub strength: f32,
}

impl Attractor {
    pub fn new(position: Vec3, strength: f32) -> Self {
        Self {
            position: position.to_array(),
            strength,
        }
    }

    pub fn position(&self) -> Vec3 {
        Vec3::from_array(self.position)
    }
}

/// Homogeneous position slot (w = 1)
pub fn position_slot(position: Vec3) -> Vec4Slot {
    position.extend(1.0).to_array()
}

/// Velocity slot (w unused, kept at 0)
pub fn velocity_slot(velocity: Vec3) -> Vec4Slot {
    velocity.extend(0.0).to_array()
}

/// xyz part of a slot
pub fn slot_xyz(slot: &Vec4Slot) -> Vec3 {
    Vec4::from_array(*slot).truncate()
}
