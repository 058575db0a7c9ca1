//! Blocking GPU → CPU copies for tests and diagnostics
//!
//! The frame loop never calls into this module. Particle state is owned by
//! the device; these helpers exist so a test harness can check what the
//! kernel wrote.

use crate::buffers::ParticleBuffers;
use crate::error::{SimulationError, SimulationResult};
use particle_physics::{Vec4Slot, VEC4_STRIDE};

/// Snapshot of the three particle buffers
#[derive(Clone, Debug, PartialEq)]
pub struct ParticleSnapshot {
    pub positions: Vec<Vec4Slot>,
    pub velocities: Vec<Vec4Slot>,
    pub colors: Vec<Vec4Slot>,
}

impl ParticleBuffers {
    /// Read all particle buffers back (blocking)
    pub fn read_snapshot(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
    ) -> SimulationResult<ParticleSnapshot> {
        let count = self.particle_count() as usize;
        Ok(ParticleSnapshot {
            positions: read_vec4_buffer(device, queue, self.position_buffer(), count)?,
            velocities: read_vec4_buffer(device, queue, self.velocity_buffer(), count)?,
            colors: read_vec4_buffer(device, queue, self.color_buffer(), count)?,
        })
    }
}

/// Copy the first `count` vec4 elements of `buffer` into a staging buffer and
/// map it. `buffer` needs `COPY_SRC`.
pub fn read_vec4_buffer(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    count: usize,
) -> SimulationResult<Vec<Vec4Slot>> {
    if count == 0 {
        return Ok(Vec::new());
    }
    let bytes = read_bytes(device, queue, buffer, count as u64 * VEC4_STRIDE)?;
    // Mapped copies carry no alignment guarantee for [f32; 4]
    Ok(bytes
        .chunks_exact(VEC4_STRIDE as usize)
        .map(bytemuck::pod_read_unaligned)
        .collect())
}

/// Blocking readback of the first `size` bytes of `buffer`
pub fn read_bytes(
    device: &wgpu::Device,
    queue: &wgpu::Queue,
    buffer: &wgpu::Buffer,
    size: u64,
) -> SimulationResult<Vec<u8>> {
    let staging = device.create_buffer(&wgpu::BufferDescriptor {
        label: Some("Readback Staging Buffer"),
        size,
        usage: wgpu::BufferUsages::MAP_READ | wgpu::BufferUsages::COPY_DST,
        mapped_at_creation: false,
    });

    let mut encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
        label: Some("Readback Encoder"),
    });
    encoder.copy_buffer_to_buffer(buffer, 0, &staging, 0, size);
    queue.submit(std::iter::once(encoder.finish()));

    map_staging(device, &staging)
}

/// Map an already-filled `MAP_READ` buffer and copy its contents out
pub fn map_staging(device: &wgpu::Device, staging: &wgpu::Buffer) -> SimulationResult<Vec<u8>> {
    let slice = staging.slice(..);
    let (tx, rx) = std::sync::mpsc::channel();
    slice.map_async(wgpu::MapMode::Read, move |result| {
        let _ = tx.send(result);
    });
    device
        .poll(wgpu::PollType::Wait {
            submission_index: None,
            timeout: None,
        })
        .map_err(|e| SimulationError::Readback(e.to_string()))?;
    rx.recv()
        .map_err(|e| SimulationError::Readback(e.to_string()))?
        .map_err(|e| SimulationError::Readback(e.to_string()))?;

    let data = slice.get_mapped_range().to_vec();
    staging.unmap();
    Ok(data)
}
