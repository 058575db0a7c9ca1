//! # Particle Physics
//!
//! Data layout, scene seeding and the reference force model for the
//! attractor-driven particle simulation. The live simulation runs in a
//! compute shader; this crate describes what that shader computes.

pub mod constants;
pub mod forces;
pub mod particle;
pub mod seed;

pub use constants::*;
pub use forces::*;
pub use particle::*;
pub use seed::*;
