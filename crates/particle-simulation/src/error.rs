//! Error types for buffer setup, shader loading and pipeline creation
//!
//! Every variant is a startup failure. Nothing in the per-frame path returns
//! these.

use std::path::PathBuf;

/// Failure to read or compile a WGSL source
#[derive(Debug, thiserror::Error)]
pub enum ShaderError {
    #[error("failed to read shader {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to compile {label}:\n{log}")]
    Compile { label: &'static str, log: String },
}

#[derive(Debug, thiserror::Error)]
pub enum SimulationError {
    #[error("{buffer} upload has {actual} elements, expected {expected}")]
    UploadSizeMismatch {
        buffer: &'static str,
        expected: usize,
        actual: usize,
    },
    #[error("particle and attractor counts must both be non-zero")]
    EmptyWorkload,
    #[error("workload of {particle_count} particles exceeds device limits: {reason}")]
    WorkloadTooLarge { particle_count: u32, reason: String },
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("failed to create {label}:\n{log}")]
    Pipeline { label: &'static str, log: String },
    #[error("buffer readback failed: {0}")]
    Readback(String),
}

pub type SimulationResult<T> = Result<T, SimulationError>;
