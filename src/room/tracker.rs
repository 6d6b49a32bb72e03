//! Participant lifecycle tracking
//!
//! Maintains the active participant set in join order, absorbs duplicate
//! subscription notifications via a set-membership guard at this boundary,
//! and rebuilds the layout table in full on every membership change.

use std::time::Duration;

use tokio::time::Instant;

use crate::layout::{LayoutTable, Rect};
use crate::media::StreamId;

/// A tracked participant
#[derive(Debug, Clone)]
pub struct Participant {
    /// The participant's stream id
    pub id: StreamId,
    /// When a frame was last drawn for this participant
    ///
    /// `None` until the first draw, which counts as stale immediately.
    pub last_drawn_at: Option<Instant>,
}

/// The active participant set plus its derived layout
#[derive(Debug)]
pub struct ParticipantTracker {
    participants: Vec<Participant>,
    layout: LayoutTable,
    canvas_width: u32,
    canvas_height: u32,
}

impl ParticipantTracker {
    /// Create an empty tracker for the given canvas
    pub fn new(canvas_width: u32, canvas_height: u32) -> Self {
        Self {
            participants: Vec::new(),
            layout: LayoutTable::default(),
            canvas_width,
            canvas_height,
        }
    }

    /// Register a participant and recompute the layout
    ///
    /// Idempotent: returns false (and changes nothing) if the id is
    /// already tracked. Upstream double-fires subscription events.
    pub fn add(&mut self, id: StreamId) -> bool {
        if self.contains(&id) {
            tracing::debug!(stream = %id, "Duplicate subscription ignored");
            return false;
        }

        self.participants.push(Participant {
            id: id.clone(),
            last_drawn_at: None,
        });
        self.recompute();

        tracing::info!(
            stream = %id,
            participants = self.participants.len(),
            "Participant registered"
        );
        true
    }

    /// Deregister a participant and recompute the layout
    ///
    /// Returns false if the id was not tracked.
    pub fn remove(&mut self, id: &StreamId) -> bool {
        let before = self.participants.len();
        self.participants.retain(|p| &p.id != id);

        if self.participants.len() == before {
            return false;
        }

        self.recompute();
        tracing::info!(
            stream = %id,
            participants = self.participants.len(),
            "Participant removed"
        );
        true
    }

    /// Whether the id is tracked
    pub fn contains(&self, id: &StreamId) -> bool {
        self.participants.iter().any(|p| &p.id == id)
    }

    /// Number of tracked participants
    pub fn len(&self) -> usize {
        self.participants.len()
    }

    /// Whether no participants are tracked
    pub fn is_empty(&self) -> bool {
        self.participants.is_empty()
    }

    /// Current layout snapshot
    pub fn layout(&self) -> &LayoutTable {
        &self.layout
    }

    /// Stamp a participant's last-drawn time
    pub fn mark_drawn(&mut self, id: &StreamId, now: Instant) {
        if let Some(p) = self.participants.iter_mut().find(|p| &p.id == id) {
            p.last_drawn_at = Some(now);
        }
    }

    /// Cells of participants whose last drawn frame is older than the
    /// staleness threshold (never-drawn participants are always stale)
    pub fn stale_cells(&self, now: Instant, staleness: Duration) -> Vec<(StreamId, Rect)> {
        self.participants
            .iter()
            .filter(|p| match p.last_drawn_at {
                Some(at) => now.duration_since(at) > staleness,
                None => true,
            })
            .filter_map(|p| self.layout.rect(&p.id).map(|rect| (p.id.clone(), rect)))
            .collect()
    }

    fn recompute(&mut self) {
        let ids: Vec<StreamId> = self.participants.iter().map(|p| p.id.clone()).collect();
        self.layout = LayoutTable::compute(&ids, self.canvas_width, self.canvas_height);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_add_is_idempotent() {
        let mut tracker = ParticipantTracker::new(640, 480);

        assert!(tracker.add(StreamId::new("a")));
        assert!(!tracker.add(StreamId::new("a")));
        assert!(!tracker.add(StreamId::new("a")));

        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_add_recomputes_layout() {
        let mut tracker = ParticipantTracker::new(640, 480);

        tracker.add(StreamId::new("a"));
        assert_eq!(
            tracker.layout().rect(&"a".into()),
            Some(Rect::new(0, 0, 640, 480))
        );

        tracker.add(StreamId::new("b"));
        assert_eq!(
            tracker.layout().rect(&"a".into()),
            Some(Rect::new(0, 0, 320, 480))
        );
        assert_eq!(
            tracker.layout().rect(&"b".into()),
            Some(Rect::new(320, 0, 320, 480))
        );
    }

    #[test]
    fn test_remove_drops_layout_entry() {
        let mut tracker = ParticipantTracker::new(640, 480);
        tracker.add(StreamId::new("a"));
        tracker.add(StreamId::new("b"));

        assert!(tracker.remove(&StreamId::new("a")));
        assert!(!tracker.contains(&"a".into()));
        assert!(tracker.layout().rect(&"a".into()).is_none());

        // Remaining participant reflows to fill the canvas
        assert_eq!(
            tracker.layout().rect(&"b".into()),
            Some(Rect::new(0, 0, 640, 480))
        );
    }

    #[test]
    fn test_remove_unknown_is_noop() {
        let mut tracker = ParticipantTracker::new(640, 480);
        tracker.add(StreamId::new("a"));

        assert!(!tracker.remove(&StreamId::new("ghost")));
        assert_eq!(tracker.len(), 1);
    }

    #[test]
    fn test_stale_cells() {
        let mut tracker = ParticipantTracker::new(640, 480);
        tracker.add(StreamId::new("a"));
        tracker.add(StreamId::new("b"));

        let now = Instant::now();

        // Neither has ever been drawn: both stale
        assert_eq!(tracker.stale_cells(now, Duration::from_secs(3)).len(), 2);

        tracker.mark_drawn(&StreamId::new("a"), now);
        let stale = tracker.stale_cells(now, Duration::from_secs(3));
        assert_eq!(stale.len(), 1);
        assert_eq!(stale[0].0, "b".into());

        // Later, "a" goes stale too
        let later = now + Duration::from_millis(3001);
        assert_eq!(tracker.stale_cells(later, Duration::from_secs(3)).len(), 2);
    }

    #[test]
    fn test_join_order_is_stable() {
        let mut tracker = ParticipantTracker::new(640, 480);
        tracker.add(StreamId::new("a"));
        tracker.add(StreamId::new("b"));
        tracker.add(StreamId::new("c"));

        // 640x480 with three participants: a(0,0) b(320,0) c(0,240)
        assert_eq!(
            tracker.layout().rect(&"a".into()),
            Some(Rect::new(0, 0, 320, 240))
        );
        assert_eq!(
            tracker.layout().rect(&"b".into()),
            Some(Rect::new(320, 0, 320, 240))
        );
        assert_eq!(
            tracker.layout().rect(&"c".into()),
            Some(Rect::new(0, 240, 320, 240))
        );
    }
}
