//! Session statistics

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Shared counters for a running mixer session
///
/// Updated by the session tasks, readable from any thread.
#[derive(Debug, Default)]
pub struct MixStats {
    /// Frames drawn into participant cells
    pub frames_drawn: AtomicU64,
    /// Frames released without drawing
    pub frames_dropped: AtomicU64,
    /// Placeholder cells painted
    pub placeholders_painted: AtomicU64,
    /// Compositing ticks executed
    pub ticks: AtomicU64,
    /// Video units handed downstream
    pub video_units: AtomicU64,
    /// Video key frames handed downstream
    pub key_frames: AtomicU64,
    /// Audio units handed downstream
    pub audio_units: AtomicU64,
    /// Audio blocks encoded (forwarded or not)
    pub audio_blocks: AtomicU64,
}

impl MixStats {
    /// Create a zeroed shared counter set
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    /// Point-in-time copy of all counters
    pub fn snapshot(&self) -> MixStatsSnapshot {
        MixStatsSnapshot {
            frames_drawn: self.frames_drawn.load(Ordering::Relaxed),
            frames_dropped: self.frames_dropped.load(Ordering::Relaxed),
            placeholders_painted: self.placeholders_painted.load(Ordering::Relaxed),
            ticks: self.ticks.load(Ordering::Relaxed),
            video_units: self.video_units.load(Ordering::Relaxed),
            key_frames: self.key_frames.load(Ordering::Relaxed),
            audio_units: self.audio_units.load(Ordering::Relaxed),
            audio_blocks: self.audio_blocks.load(Ordering::Relaxed),
        }
    }

    pub(crate) fn add(counter: &AtomicU64, n: u64) {
        if n > 0 {
            counter.fetch_add(n, Ordering::Relaxed);
        }
    }
}

/// A point-in-time copy of `MixStats`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MixStatsSnapshot {
    /// Frames drawn into participant cells
    pub frames_drawn: u64,
    /// Frames released without drawing
    pub frames_dropped: u64,
    /// Placeholder cells painted
    pub placeholders_painted: u64,
    /// Compositing ticks executed
    pub ticks: u64,
    /// Video units handed downstream
    pub video_units: u64,
    /// Video key frames handed downstream
    pub key_frames: u64,
    /// Audio units handed downstream
    pub audio_units: u64,
    /// Audio blocks encoded
    pub audio_blocks: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshot_reflects_counters() {
        let stats = MixStats::new();
        MixStats::add(&stats.frames_drawn, 3);
        MixStats::add(&stats.ticks, 1);
        MixStats::add(&stats.frames_dropped, 0);

        let snap = stats.snapshot();
        assert_eq!(snap.frames_drawn, 3);
        assert_eq!(snap.ticks, 1);
        assert_eq!(snap.frames_dropped, 0);
    }
}
