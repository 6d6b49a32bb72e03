//! Compositor
//!
//! Owns the composite surface and renders one tick at a time: drained
//! intake frames are drawn into their participants' cells, then stale
//! participants get a solid placeholder painted over theirs. The surface
//! is never cleared between ticks.

use std::time::Duration;

use tokio::time::Instant;

use crate::config::MixerConfig;
use crate::media::VideoFrame;
use crate::room::ParticipantTracker;

use super::intake::PendingFrame;
use super::surface::{Color, Surface};

/// Compositor state
///
/// Idle until the first successful subscription starts the tick timer;
/// there is no automatic transition back (teardown is external).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompositorState {
    /// No participants yet, no tick timer running
    Idle,
    /// Tick timer running at the configured cadence
    Active,
}

/// What happened during one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickReport {
    /// Frames drawn into a participant cell
    pub drawn: usize,
    /// Frames released without drawing (no layout entry)
    pub dropped: usize,
    /// Placeholder cells painted
    pub placeholders: usize,
}

/// The fixed-cadence compositor
#[derive(Debug)]
pub struct Compositor {
    surface: Surface,
    staleness: Duration,
    placeholder_color: Color,
    state: CompositorState,
}

impl Compositor {
    /// Create an idle compositor for the configured canvas
    pub fn new(config: &MixerConfig) -> Self {
        Self {
            surface: Surface::new(config.width, config.height),
            staleness: config.staleness,
            placeholder_color: config.placeholder_color,
            state: CompositorState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> CompositorState {
        self.state
    }

    /// Transition to active (first subscription)
    ///
    /// Returns true on the idle->active edge, false if already active.
    pub fn activate(&mut self) -> bool {
        if self.state == CompositorState::Active {
            return false;
        }
        self.state = CompositorState::Active;
        true
    }

    /// Render one tick
    ///
    /// Draws every drained frame whose participant is still laid out and
    /// stamps that participant's last-drawn time; frames without a layout
    /// entry are released untouched. Participants without a fresh frame
    /// for longer than the staleness threshold get their cell painted
    /// with the placeholder color.
    pub fn tick(
        &mut self,
        frames: Vec<PendingFrame>,
        tracker: &mut ParticipantTracker,
        now: Instant,
    ) -> TickReport {
        let mut report = TickReport::default();

        for pending in frames {
            match tracker.layout().rect(&pending.stream_id) {
                Some(rect) => {
                    self.surface.draw_frame(&pending.frame, rect);
                    tracker.mark_drawn(&pending.stream_id, now);
                    report.drawn += 1;
                }
                None => {
                    report.dropped += 1;
                }
            }
            // pending.frame released here in both cases
        }

        for (_, rect) in tracker.stale_cells(now, self.staleness) {
            self.surface.fill_rect(self.placeholder_color, rect);
            report.placeholders += 1;
        }

        report
    }

    /// Read-only snapshot of the composite surface
    pub fn snapshot(&self) -> VideoFrame {
        self.surface.snapshot()
    }

    /// Borrow the surface (tests)
    #[cfg(test)]
    pub(crate) fn surface(&self) -> &Surface {
        &self.surface
    }
}
