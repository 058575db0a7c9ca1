//! # Gravity Particles
//!
//! A million particles pulled around by a handful of attractors, simulated
//! and drawn entirely on the GPU. Particle state is seeded once on the CPU,
//! uploaded, and never read back by the frame loop.

pub mod config;
pub mod context;
pub mod driver;
pub mod error;
pub mod target;

pub use config::*;
pub use context::*;
pub use driver::*;
pub use error::*;
pub use target::*;
