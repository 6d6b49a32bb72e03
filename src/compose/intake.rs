//! Frame intake buffer
//!
//! Pending decoded frames queued in arrival order, interleaved across
//! participants. The compositor drains the buffer exactly once per tick;
//! every drained frame is consumed (and its pixel memory released) whether
//! it was drawn or not, so the buffer never carries frames across ticks.

use crate::media::{StreamId, VideoFrame};

/// A decoded frame waiting for the next compositing tick
#[derive(Debug)]
pub struct PendingFrame {
    /// Owning participant
    pub stream_id: StreamId,
    /// The decoded frame
    pub frame: VideoFrame,
}

/// Per-tick intake buffer
#[derive(Debug, Default)]
pub struct IntakeBuffer {
    frames: Vec<PendingFrame>,
}

impl IntakeBuffer {
    /// Create an empty buffer
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a frame in arrival order
    pub fn push(&mut self, stream_id: StreamId, frame: VideoFrame) {
        self.frames.push(PendingFrame { stream_id, frame });
    }

    /// Take all pending frames, leaving the buffer empty
    ///
    /// The caller owns the returned frames and is responsible for
    /// releasing them after the tick.
    pub fn drain(&mut self) -> Vec<PendingFrame> {
        std::mem::take(&mut self.frames)
    }

    /// Number of pending frames
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Whether there are no pending frames
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }
}
