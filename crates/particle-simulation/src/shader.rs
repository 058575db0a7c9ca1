//! WGSL source loading and compilation
//!
//! Shaders are embedded at build time. When a shader directory is configured
//! the same file names are read from disk instead, which allows editing the
//! kernels without rebuilding.

use crate::error::ShaderError;
use std::borrow::Cow;
use std::path::Path;

/// One WGSL file used by the pipeline
#[derive(Clone, Copy, Debug)]
pub struct ShaderStage {
    pub label: &'static str,
    pub file_name: &'static str,
    pub embedded: &'static str,
}

/// Compute kernel advancing every particle by one step
pub const COMPUTE_SHADER: ShaderStage = ShaderStage {
    label: "Particle Compute Shader",
    file_name: "particles.wgsl",
    embedded: include_str!("shaders/particles.wgsl"),
};

impl ShaderStage {
    /// Source text, from `dir` when given, otherwise the embedded copy
    pub fn load(&self, dir: Option<&Path>) -> Result<Cow<'static, str>, ShaderError> {
        match dir {
            Some(dir) => {
                let path = dir.join(self.file_name);
                log::info!("Loading {} from {:?}", self.label, path);
                std::fs::read_to_string(&path)
                    .map(Cow::Owned)
                    .map_err(|source| ShaderError::Read { path, source })
            }
            None => Ok(Cow::Borrowed(self.embedded)),
        }
    }

    /// Load and compile. Compiler diagnostics are returned in the error
    /// instead of reaching wgpu's uncaptured error handler.
    pub async fn compile(
        &self,
        device: &wgpu::Device,
        dir: Option<&Path>,
    ) -> Result<wgpu::ShaderModule, ShaderError> {
        let source = self.load(dir)?;
        let (module, error) = capture_validation(device, || {
            device.create_shader_module(wgpu::ShaderModuleDescriptor {
                label: Some(self.label),
                source: wgpu::ShaderSource::Wgsl(source),
            })
        })
        .await;

        match error {
            Some(error) => Err(ShaderError::Compile {
                label: self.label,
                log: error.to_string(),
            }),
            None => Ok(module),
        }
    }
}

/// Run `create` inside a validation error scope and return whatever error it
/// raised alongside the created object.
pub async fn capture_validation<T>(
    device: &wgpu::Device,
    create: impl FnOnce() -> T,
) -> (T, Option<wgpu::Error>) {
    device.push_error_scope(wgpu::ErrorFilter::Validation);
    let value = create();
    let error = device.pop_error_scope().await;
    (value, error)
}
