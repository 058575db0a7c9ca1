//! # Particle Renderer
//!
//! Draws every particle as a single point through a fixed camera.

pub mod camera;
pub mod error;
pub mod renderer;

pub use camera::*;
pub use error::*;
pub use renderer::*;
