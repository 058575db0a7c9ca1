//! GPU compute stage advancing every particle once per frame

use crate::buffers::{compute_layout_entries, ParticleBuffers, PARAMS_BINDING};
use crate::error::{SimulationError, SimulationResult};
use crate::params::SimParams;
use crate::shader::{capture_validation, COMPUTE_SHADER};
use particle_physics::{workgroups_for, StepParams};
use std::path::Path;
use wgpu::util::DeviceExt;

/// Must match `@workgroup_size` in `particles.wgsl`
pub const WORKGROUP_SIZE: u32 = 256;

/// Physics compute pipeline bound to a [`ParticleBuffers`] set
pub struct ParticleSimulation {
    pipeline: wgpu::ComputePipeline,
    bind_group: wgpu::BindGroup,
    _params_buffer: wgpu::Buffer,
    particle_count: u32,
    workgroup_count: u32,
}

impl ParticleSimulation {
    pub async fn new(
        device: &wgpu::Device,
        buffers: &ParticleBuffers,
        step: &StepParams,
        shader_dir: Option<&Path>,
    ) -> SimulationResult<Self> {
        log::info!("Initializing ParticleSimulation...");
        let particle_count = buffers.particle_count();
        check_limits(&device.limits(), particle_count)?;
        let workgroup_count = workgroups_for(particle_count, WORKGROUP_SIZE);

        let params_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("Simulation Params Buffer"),
            contents: bytemuck::cast_slice(&[SimParams::new(step, particle_count)]),
            usage: wgpu::BufferUsages::UNIFORM,
        });

        let shader = COMPUTE_SHADER.compile(device, shader_dir).await?;
        log::info!("Shaders loaded");

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("Particle Compute Bind Group Layout"),
            entries: &compute_layout_entries(),
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("Particle Compute Pipeline Layout"),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        let (pipeline, error) = capture_validation(device, || {
            device.create_compute_pipeline(&wgpu::ComputePipelineDescriptor {
                label: Some("Particle Compute Pipeline"),
                layout: Some(&pipeline_layout),
                module: &shader,
                entry_point: Some("main"),
                compilation_options: Default::default(),
                cache: None,
            })
        })
        .await;
        if let Some(error) = error {
            return Err(SimulationError::Pipeline {
                label: "Particle Compute Pipeline",
                log: error.to_string(),
            });
        }
        log::info!("Pipelines created");

        let [position, velocity, color, attractor] = buffers.bind_group_entries();
        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("Particle Compute Bind Group"),
            layout: &bind_group_layout,
            entries: &[
                position,
                velocity,
                color,
                attractor,
                wgpu::BindGroupEntry {
                    binding: PARAMS_BINDING,
                    resource: params_buffer.as_entire_binding(),
                },
            ],
        });

        log::info!(
            "✓ Compute stage ready: {} workgroups x {} invocations for {} particles",
            workgroup_count,
            WORKGROUP_SIZE,
            particle_count
        );

        Ok(Self {
            pipeline,
            bind_group,
            _params_buffer: params_buffer,
            particle_count,
            workgroup_count,
        })
    }

    /// Record one simulation step into `encoder`.
    ///
    /// The compute pass is closed when this returns. wgpu inserts the
    /// storage-write to vertex-read barrier at that pass boundary, so any
    /// later pass in the same encoder sees the new particle state.
    pub fn encode_step(&self, encoder: &mut wgpu::CommandEncoder) {
        let mut compute_pass = encoder.begin_compute_pass(&wgpu::ComputePassDescriptor {
            label: Some("Particle Compute Pass"),
            timestamp_writes: None,
        });
        compute_pass.set_pipeline(&self.pipeline);
        compute_pass.set_bind_group(0, &self.bind_group, &[]);
        compute_pass.dispatch_workgroups(self.workgroup_count, 1, 1);
    }

    /// Step the simulation forward by one timestep in its own submission
    pub fn step(&self, device: &wgpu::Device, queue: &wgpu::Queue) {
        let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("Simulation Encoder"),
        });
        self.encode_step(&mut encoder);
        queue.submit(std::iter::once(encoder.finish()));
    }

    pub fn particle_count(&self) -> u32 {
        self.particle_count
    }

    pub fn workgroup_count(&self) -> u32 {
        self.workgroup_count
    }
}

/// Reject workloads the device cannot bind or dispatch in one go
pub fn check_limits(limits: &wgpu::Limits, particle_count: u32) -> SimulationResult<()> {
    let groups = workgroups_for(particle_count, WORKGROUP_SIZE);
    if groups > limits.max_compute_workgroups_per_dimension {
        return Err(SimulationError::WorkloadTooLarge {
            particle_count,
            reason: format!(
                "{} workgroups > max_compute_workgroups_per_dimension {}",
                groups, limits.max_compute_workgroups_per_dimension
            ),
        });
    }

    let bytes = particle_count as u64 * particle_physics::VEC4_STRIDE;
    if bytes > limits.max_storage_buffer_binding_size as u64 {
        return Err(SimulationError::WorkloadTooLarge {
            particle_count,
            reason: format!(
                "{} byte buffers > max_storage_buffer_binding_size {}",
                bytes, limits.max_storage_buffer_binding_size
            ),
        });
    }

    Ok(())
}
