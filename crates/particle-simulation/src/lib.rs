//! # Particle Simulation Engine
//!
//! GPU buffer set and compute stage for the attractor simulation. Particle
//! state lives only in device buffers once uploaded.

pub mod buffers;
pub mod error;
pub mod params;
pub mod readback;
pub mod shader;
pub mod simulation;

pub use buffers::*;
pub use error::*;
pub use params::*;
pub use shader::*;
pub use simulation::*;
