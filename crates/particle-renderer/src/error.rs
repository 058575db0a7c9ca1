use particle_simulation::ShaderError;

/// Render stage setup failures. All are fatal at startup.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error(transparent)]
    Shader(#[from] ShaderError),
    #[error("failed to create {label}:\n{log}")]
    Pipeline { label: &'static str, log: String },
}
