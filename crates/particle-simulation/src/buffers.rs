//! Device buffers holding all particle state
//!
//! Binding contract (bind group 0 of the compute kernel, stride 16 bytes):
//!
//! | binding | contents   | elements |
//! |---------|------------|----------|
//! | 0       | positions  | N        |
//! | 1       | velocities | N        |
//! | 2       | colors     | N        |
//! | 3       | attractors | M        |
//!
//! The render stage reads positions and colors as vertex attributes at
//! shader locations 0 and 3. These indices are fixed for the process lifetime
//! and must match `particles.wgsl`, `vert.wgsl` and the pipeline layouts.

use crate::error::{SimulationError, SimulationResult};
use particle_physics::{SceneSeed, VEC4_STRIDE};
use wgpu::util::DeviceExt;

pub const POSITION_BINDING: u32 = 0;
pub const VELOCITY_BINDING: u32 = 1;
pub const COLOR_BINDING: u32 = 2;
pub const ATTRACTOR_BINDING: u32 = 3;
pub const PARAMS_BINDING: u32 = 4;

/// Vertex shader location of the position attribute
pub const POSITION_LOCATION: u32 = 0;
/// Vertex shader location of the color attribute
pub const COLOR_LOCATION: u32 = 3;

/// Usage for buffers written by compute and read as vertices.
/// COPY_SRC is only exercised by diagnostic readback.
const PARTICLE_USAGE: wgpu::BufferUsages = wgpu::BufferUsages::STORAGE
    .union(wgpu::BufferUsages::VERTEX)
    .union(wgpu::BufferUsages::COPY_DST)
    .union(wgpu::BufferUsages::COPY_SRC);

/// Expected element counts for an upload
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferCounts {
    pub particles: u32,
    pub attractors: u32,
}

impl BufferCounts {
    pub fn particle_bytes(&self) -> u64 {
        self.particles as u64 * VEC4_STRIDE
    }

    pub fn attractor_bytes(&self) -> u64 {
        self.attractors as u64 * VEC4_STRIDE
    }

    /// Reject a seed whose arrays do not match these counts
    pub fn check(&self, seed: &SceneSeed) -> SimulationResult<()> {
        let expected = self.particles as usize;
        for (buffer, actual) in [
            ("position", seed.positions.len()),
            ("velocity", seed.velocities.len()),
            ("color", seed.colors.len()),
        ] {
            if actual != expected {
                return Err(SimulationError::UploadSizeMismatch {
                    buffer,
                    expected,
                    actual,
                });
            }
        }

        if seed.attractors.len() != self.attractors as usize {
            return Err(SimulationError::UploadSizeMismatch {
                buffer: "attractor",
                expected: self.attractors as usize,
                actual: seed.attractors.len(),
            });
        }

        Ok(())
    }
}

/// The four particle buffers. Created once, never resized.
pub struct ParticleBuffers {
    position_buffer: wgpu::Buffer,
    velocity_buffer: wgpu::Buffer,
    color_buffer: wgpu::Buffer,
    attractor_buffer: wgpu::Buffer,
    counts: BufferCounts,
}

impl ParticleBuffers {
    /// Allocate the buffers and upload `seed` in one bulk copy each.
    ///
    /// The seed is consumed; no CPU copy of particle state survives this call.
    pub fn upload(
        device: &wgpu::Device,
        seed: SceneSeed,
        counts: BufferCounts,
    ) -> SimulationResult<Self> {
        // Zero-sized buffers cannot be bound
        if counts.particles == 0 || counts.attractors == 0 {
            return Err(SimulationError::EmptyWorkload);
        }
        counts.check(&seed)?;

        let position_buffer = create_init(device, "Position Buffer", &seed.positions, PARTICLE_USAGE);
        let velocity_buffer = create_init(device, "Velocity Buffer", &seed.velocities, PARTICLE_USAGE);
        let color_buffer = create_init(device, "Color Buffer", &seed.colors, PARTICLE_USAGE);
        let attractor_buffer = create_init(
            device,
            "Attractor Buffer",
            &seed.attractors,
            wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        );

        assert_eq!(position_buffer.size(), counts.particle_bytes());
        assert_eq!(velocity_buffer.size(), counts.particle_bytes());
        assert_eq!(color_buffer.size(), counts.particle_bytes());
        assert_eq!(attractor_buffer.size(), counts.attractor_bytes());

        log::info!(
            "✓ Particle buffers created: 3 x {} bytes + {} bytes of attractors",
            counts.particle_bytes(),
            counts.attractor_bytes()
        );

        Ok(Self {
            position_buffer,
            velocity_buffer,
            color_buffer,
            attractor_buffer,
            counts,
        })
    }

    pub fn position_buffer(&self) -> &wgpu::Buffer {
        &self.position_buffer
    }

    pub fn velocity_buffer(&self) -> &wgpu::Buffer {
        &self.velocity_buffer
    }

    pub fn color_buffer(&self) -> &wgpu::Buffer {
        &self.color_buffer
    }

    pub fn attractor_buffer(&self) -> &wgpu::Buffer {
        &self.attractor_buffer
    }

    pub fn particle_count(&self) -> u32 {
        self.counts.particles
    }

    /// Bind group entries for bindings 0..=3
    pub fn bind_group_entries(&self) -> [wgpu::BindGroupEntry<'_>; 4] {
        [
            wgpu::BindGroupEntry {
                binding: POSITION_BINDING,
                resource: self.position_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: VELOCITY_BINDING,
                resource: self.velocity_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: COLOR_BINDING,
                resource: self.color_buffer.as_entire_binding(),
            },
            wgpu::BindGroupEntry {
                binding: ATTRACTOR_BINDING,
                resource: self.attractor_buffer.as_entire_binding(),
            },
        ]
    }
}

fn create_init<T: bytemuck::Pod>(
    device: &wgpu::Device,
    label: &'static str,
    contents: &[T],
    usage: wgpu::BufferUsages,
) -> wgpu::Buffer {
    device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
        label: Some(label),
        contents: bytemuck::cast_slice(contents),
        usage,
    })
}

/// Layout entries matching [`ParticleBuffers::bind_group_entries`] plus the
/// parameter uniform
pub fn compute_layout_entries() -> [wgpu::BindGroupLayoutEntry; 5] {
    let storage = |binding, read_only| wgpu::BindGroupLayoutEntry {
        binding,
        visibility: wgpu::ShaderStages::COMPUTE,
        ty: wgpu::BindingType::Buffer {
            ty: wgpu::BufferBindingType::Storage { read_only },
            has_dynamic_offset: false,
            min_binding_size: None,
        },
        count: None,
    };

    [
        storage(POSITION_BINDING, false),
        storage(VELOCITY_BINDING, false),
        storage(COLOR_BINDING, false),
        // Attractors are read-only for the whole run
        storage(ATTRACTOR_BINDING, true),
        wgpu::BindGroupLayoutEntry {
            binding: PARAMS_BINDING,
            visibility: wgpu::ShaderStages::COMPUTE,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: None,
            },
            count: None,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use particle_physics::{position_slot, Attractor};

    fn seed(particles: usize, attractors: usize) -> SceneSeed {
        SceneSeed::at_rest(
            vec![position_slot(Vec3::ONE); particles],
            vec![Attractor::default(); attractors],
        )
    }

    #[test]
    fn byte_sizes_follow_vec4_stride() {
        let counts = BufferCounts {
            particles: 1_000_000,
            attractors: 6,
        };
        assert_eq!(counts.particle_bytes(), 16_000_000);
        assert_eq!(counts.attractor_bytes(), 96);
    }

    #[test]
    fn matching_seed_passes_check() {
        let counts = BufferCounts {
            particles: 10,
            attractors: 2,
        };
        assert!(counts.check(&seed(10, 2)).is_ok());
    }

    #[test]
    fn mismatched_seed_is_rejected() {
        let counts = BufferCounts {
            particles: 10,
            attractors: 2,
        };

        match counts.check(&seed(9, 2)) {
            Err(SimulationError::UploadSizeMismatch {
                buffer, expected, actual,
            }) => {
                assert_eq!(buffer, "position");
                assert_eq!((expected, actual), (10, 9));
            }
            other => panic!("expected mismatch, got {:?}", other.err()),
        }

        assert!(matches!(
            counts.check(&seed(10, 3)),
            Err(SimulationError::UploadSizeMismatch { buffer: "attractor", .. })
        ));

        let mut short_colors = seed(10, 2);
        short_colors.colors.pop();
        assert!(matches!(
            counts.check(&short_colors),
            Err(SimulationError::UploadSizeMismatch { buffer: "color", .. })
        ));
    }

    #[test]
    fn binding_indices_are_distinct() {
        let entries = compute_layout_entries();
        let mut bindings: Vec<u32> = entries.iter().map(|e| e.binding).collect();
        bindings.dedup();
        assert_eq!(bindings, vec![0, 1, 2, 3, 4]);
    }
}
