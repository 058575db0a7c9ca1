//! Startup configuration with environment overrides

use particle_physics::{
    workgroups_for, SeedConfig, StepParams, ATTRACTOR_COUNT, COLOR_SCALE, COOL_COLOR, HOT_COLOR,
    PARTICLE_COUNT, SOFTENING, TIME_STEP,
};
use particle_simulation::WORKGROUP_SIZE;
use std::path::{Path, PathBuf};
use std::str::FromStr;

pub const ENV_COUNT: &str = "PARTICLES_COUNT";
pub const ENV_ATTRACTORS: &str = "PARTICLES_ATTRACTORS";
pub const ENV_DT: &str = "PARTICLES_DT";
pub const ENV_SEED: &str = "PARTICLES_SEED";
pub const ENV_SHADER_DIR: &str = "PARTICLES_SHADER_DIR";

/// Checked relative to the working directory when no shader directory is set
pub const DEFAULT_SHADER_DIR: &str = "shaders";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum ConfigError {
    #[error("{key}={value:?} is not a valid value: {reason}")]
    InvalidValue {
        key: &'static str,
        value: String,
        reason: String,
    },
    #[error("{field} must be greater than zero")]
    Zero { field: &'static str },
    #[error("{field} must be finite and positive, got {value}")]
    NotPositive { field: &'static str, value: f32 },
    #[error("{particle_count} particles need {groups} workgroups, the dispatch limit is {limit}")]
    DispatchLimit {
        particle_count: u32,
        groups: u32,
        limit: u32,
    },
}

#[derive(Clone, Debug, PartialEq)]
pub struct WindowConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Particles".to_string(),
            width: 1280,
            height: 720,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimulationConfig {
    pub particle_count: u32,
    pub attractor_count: u32,
    pub dt: f32,
    pub softening: f32,
    pub color_scale: f32,
    /// Fixed RNG seed; `None` seeds from the clock
    pub rng_seed: Option<u64>,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            particle_count: PARTICLE_COUNT,
            attractor_count: ATTRACTOR_COUNT,
            dt: TIME_STEP,
            softening: SOFTENING,
            color_scale: COLOR_SCALE,
            rng_seed: None,
        }
    }
}

impl SimulationConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.particle_count == 0 {
            return Err(ConfigError::Zero {
                field: "particle_count",
            });
        }
        if self.attractor_count == 0 {
            return Err(ConfigError::Zero {
                field: "attractor_count",
            });
        }
        for (field, value) in [
            ("dt", self.dt),
            ("softening", self.softening),
            ("color_scale", self.color_scale),
        ] {
            if !(value.is_finite() && value > 0.0) {
                return Err(ConfigError::NotPositive { field, value });
            }
        }

        let limit = wgpu::Limits::default().max_compute_workgroups_per_dimension;
        let groups = workgroups_for(self.particle_count, WORKGROUP_SIZE);
        if groups > limit {
            return Err(ConfigError::DispatchLimit {
                particle_count: self.particle_count,
                groups,
                limit,
            });
        }
        Ok(())
    }

    pub fn seed_config(&self) -> SeedConfig {
        SeedConfig {
            particle_count: self.particle_count,
            attractor_count: self.attractor_count,
            ..Default::default()
        }
    }

    pub fn step_params(&self) -> StepParams {
        StepParams {
            dt: self.dt,
            softening: self.softening,
            color_scale: self.color_scale,
            cool_color: COOL_COLOR,
            hot_color: HOT_COLOR,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct AppConfig {
    pub window: WindowConfig,
    pub simulation: SimulationConfig,
    /// Read WGSL from here instead of the embedded copies
    pub shader_dir: Option<PathBuf>,
}

impl AppConfig {
    /// Defaults with `PARTICLES_*` overrides from the process environment.
    /// Without `PARTICLES_SHADER_DIR`, a `shaders/` directory in the working
    /// directory is used when present; otherwise the embedded copies are.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self::from_lookup(|key| std::env::var(key).ok())?;
        config.shader_dir = resolve_shader_dir(config.shader_dir, Path::new(DEFAULT_SHADER_DIR));
        if let Some(dir) = &config.shader_dir {
            log::info!("Reading shaders from {:?}", dir);
        }
        Ok(config)
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&'static str) -> Option<String>,
    {
        let mut config = Self::default();
        let sim = &mut config.simulation;

        if let Some(count) = parse(&lookup, ENV_COUNT)? {
            sim.particle_count = count;
        }
        if let Some(count) = parse(&lookup, ENV_ATTRACTORS)? {
            sim.attractor_count = count;
        }
        if let Some(dt) = parse(&lookup, ENV_DT)? {
            sim.dt = dt;
        }
        sim.rng_seed = parse(&lookup, ENV_SEED)?;
        config.shader_dir = lookup(ENV_SHADER_DIR)
            .filter(|dir| !dir.is_empty())
            .map(PathBuf::from);

        config.simulation.validate()?;
        Ok(config)
    }
}

/// An explicit directory wins; otherwise `fallback` if it exists
pub fn resolve_shader_dir(explicit: Option<PathBuf>, fallback: &Path) -> Option<PathBuf> {
    explicit.or_else(|| fallback.is_dir().then(|| fallback.to_path_buf()))
}

fn parse<T, F>(lookup: &F, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    F: Fn(&'static str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| ConfigError::InvalidValue {
                key,
                reason: e.to_string(),
                value,
            }),
    }
}
