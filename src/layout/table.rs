//! Layout table snapshot
//!
//! A read-mostly mapping of stream id to rectangle, rebuilt in full on
//! every membership change and swapped in atomically. A compositing tick
//! only ever sees a complete table.

use std::collections::HashMap;

use crate::media::StreamId;

use super::grid::{Grid, Rect};

/// Derived layout snapshot: participant id -> rectangle
#[derive(Debug, Clone, Default)]
pub struct LayoutTable {
    /// Ids in stable (join) order
    order: Vec<StreamId>,
    /// Rectangle per id
    rects: HashMap<StreamId, Rect>,
}

impl LayoutTable {
    /// Build a table for the given ordered participant set
    ///
    /// Deterministic: the same ordered ids on the same canvas always
    /// produce identical rectangles.
    pub fn compute(ids: &[StreamId], width: u32, height: u32) -> Self {
        let grid = Grid::for_count(ids.len(), width, height);

        let mut rects = HashMap::with_capacity(ids.len());
        for (i, id) in ids.iter().enumerate() {
            rects.insert(id.clone(), grid.cell(i));
        }

        Self {
            order: ids.to_vec(),
            rects,
        }
    }

    /// Look up the rectangle for a stream id
    pub fn rect(&self, id: &StreamId) -> Option<Rect> {
        self.rects.get(id).copied()
    }

    /// Whether the id has a cell in this table
    pub fn contains(&self, id: &StreamId) -> bool {
        self.rects.contains_key(id)
    }

    /// Ids in stable order
    pub fn ids(&self) -> &[StreamId] {
        &self.order
    }

    /// Number of cells
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<StreamId> {
        names.iter().map(|n| StreamId::new(*n)).collect()
    }

    #[test]
    fn test_compute_assigns_all_ids() {
        let table = LayoutTable::compute(&ids(&["a", "b", "c"]), 640, 480);

        assert_eq!(table.len(), 3);
        assert_eq!(table.rect(&"a".into()), Some(Rect::new(0, 0, 320, 240)));
        assert_eq!(table.rect(&"b".into()), Some(Rect::new(320, 0, 320, 240)));
        assert_eq!(table.rect(&"c".into()), Some(Rect::new(0, 240, 320, 240)));
    }

    #[test]
    fn test_unknown_id_has_no_rect() {
        let table = LayoutTable::compute(&ids(&["a"]), 640, 480);
        assert!(table.rect(&"b".into()).is_none());
        assert!(!table.contains(&"b".into()));
    }

    #[test]
    fn test_recompute_is_idempotent() {
        let set = ids(&["a", "b", "c", "d", "e"]);
        let first = LayoutTable::compute(&set, 640, 480);
        let second = LayoutTable::compute(&set, 640, 480);

        for id in first.ids() {
            assert_eq!(first.rect(id), second.rect(id));
        }
    }

    #[test]
    fn test_empty_set() {
        let table = LayoutTable::compute(&[], 640, 480);
        assert!(table.is_empty());
    }
}
