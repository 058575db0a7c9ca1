//! Per-frame state machine: dispatch, barrier, clear, draw, present, poll,
//! count.

use crate::context::RenderContext;
use crate::error::FrameError;
use crate::target::PresentTarget;
use std::time::{Duration, Instant};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FrameStage {
    /// Compute pass recorded
    Dispatch,
    /// Compute pass closed. Storage writes become visible to vertex reads.
    Barrier,
    /// Render pass opened with clear load ops
    Clear,
    Draw,
    /// Submitted and handed to the presentation engine
    Present,
    /// Pending close request applied
    PollEvents,
    CountFrame,
}

impl FrameStage {
    pub const ORDER: [FrameStage; 7] = [
        FrameStage::Dispatch,
        FrameStage::Barrier,
        FrameStage::Clear,
        FrameStage::Draw,
        FrameStage::Present,
        FrameStage::PollEvents,
        FrameStage::CountFrame,
    ];
}

/// Tracks the stages of one frame and rejects any recorded out of order
#[derive(Debug, Default)]
pub struct FrameSequence {
    next: usize,
}

impl FrameSequence {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn advance(&mut self, stage: FrameStage) -> Result<(), FrameError> {
        match FrameStage::ORDER.get(self.next) {
            Some(&expected) if expected == stage => {
                self.next += 1;
                log::trace!("frame stage {:?}", stage);
                Ok(())
            }
            Some(&expected) => Err(FrameError::OutOfOrder {
                expected,
                found: stage,
            }),
            // A finished frame only accepts a new Dispatch via a new sequence
            None => Err(FrameError::OutOfOrder {
                expected: FrameStage::Dispatch,
                found: stage,
            }),
        }
    }

    pub fn completed(&self) -> &[FrameStage] {
        &FrameStage::ORDER[..self.next]
    }

    pub fn is_complete(&self) -> bool {
        self.next == FrameStage::ORDER.len()
    }
}

/// Frames per second, reported once per elapsed second
#[derive(Debug)]
pub struct FpsCounter {
    frames: u32,
    window_start: Instant,
}

impl FpsCounter {
    pub const WINDOW: Duration = Duration::from_secs(1);

    pub fn new(now: Instant) -> Self {
        Self {
            frames: 0,
            window_start: now,
        }
    }

    /// Count one frame. Returns the count once a full second has passed,
    /// then starts a new window.
    pub fn tick(&mut self, now: Instant) -> Option<u32> {
        self.frames += 1;
        if now.duration_since(self.window_start) >= Self::WINDOW {
            let fps = self.frames;
            self.frames = 0;
            self.window_start = now;
            Some(fps)
        } else {
            None
        }
    }
}

pub fn window_title(base: &str, fps: u32) -> String {
    format!("{} | FPS: {}", base, fps)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DriverState {
    Running,
    /// Terminal
    Closing,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameReport {
    /// Set on the frame that closed a one-second window
    pub fps: Option<u32>,
    pub state: DriverState,
}

pub struct FrameDriver {
    state: DriverState,
    close_requested: bool,
    fps: FpsCounter,
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameDriver {
    pub fn new() -> Self {
        Self {
            state: DriverState::Running,
            close_requested: false,
            fps: FpsCounter::new(Instant::now()),
        }
    }

    /// Record a close request. It takes effect at the next [`poll_events`].
    ///
    /// [`poll_events`]: FrameDriver::poll_events
    pub fn request_close(&mut self) {
        self.close_requested = true;
    }

    /// Apply a pending close request. `run_frame` calls this at its poll
    /// stage and after a failed acquire; the event loop calls it between
    /// frames so a close never waits for another dispatch.
    pub fn poll_events(&mut self) -> DriverState {
        if self.close_requested && self.state == DriverState::Running {
            log::info!("Close requested, finishing up");
            self.state = DriverState::Closing;
        }
        self.state
    }

    /// Acquire the next target texture. A failed acquire still polls, so a
    /// surface that keeps failing cannot hold off a close.
    pub fn acquire<T: PresentTarget>(
        &mut self,
        target: &mut T,
    ) -> Result<(T::Frame, wgpu::TextureView), FrameError> {
        if self.state == DriverState::Closing {
            return Err(FrameError::Closed);
        }
        target.acquire().map_err(|e| {
            self.poll_events();
            FrameError::Surface(e)
        })
    }

    pub fn state(&self) -> DriverState {
        self.state
    }

    /// Run one full frame. Nothing is encoded when the target cannot be
    /// acquired, so a surface error skips the frame.
    pub fn run_frame<T: PresentTarget>(
        &mut self,
        context: &RenderContext,
        target: &mut T,
    ) -> Result<FrameReport, FrameError> {
        let (frame, view) = self.acquire(target)?;
        // Stage calls below are already in order; the sequence traces them
        // and guards edits to this function.
        let mut sequence = FrameSequence::new();

        let mut encoder = context
            .device()
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        context.simulation().encode_step(&mut encoder);
        sequence.advance(FrameStage::Dispatch)?;
        // encode_step has ended the compute pass
        sequence.advance(FrameStage::Barrier)?;

        {
            let renderer = context.renderer();
            let mut render_pass = renderer.begin_pass(&mut encoder, &view);
            sequence.advance(FrameStage::Clear)?;
            renderer.draw(&mut render_pass, context.buffers());
            sequence.advance(FrameStage::Draw)?;
        }

        context.queue().submit(std::iter::once(encoder.finish()));
        target.present(frame);
        sequence.advance(FrameStage::Present)?;

        self.poll_events();
        sequence.advance(FrameStage::PollEvents)?;

        let fps = self.fps.tick(Instant::now());
        if let Some(fps) = fps {
            log::debug!("FPS: {}", fps);
        }
        sequence.advance(FrameStage::CountFrame)?;
        debug_assert!(sequence.is_complete());

        Ok(FrameReport {
            fps,
            state: self.state,
        })
    }
}
