//! Undo records for removals.
//!
//! A removal collapses every mark inside the removed range onto its start offset and
//! regroups them (backward-biased marks first). [`MarkUndo`] remembers, for each affected
//! mark, where it was before, kept as one chain per bias in original array order. Replaying
//! the matching insertion with the record puts every still-valid mark back at its original
//! offset and in its original relative order.

use std::collections::HashMap;

use crate::mark::{Bias, MarkId};
use crate::vector::{MarkTable, offset_of_raw};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct UndoEntry {
    pub(crate) id: MarkId,
    /// Offset of the mark before the removal.
    pub(crate) offset: usize,
}

/// Captured effect of a removal on the marks of a [`MarkVector`](crate::MarkVector).
///
/// Produced by [`MarkVector::update`](crate::MarkVector::update) for `length < 0` and
/// consumed by the inverse insertion (same offset, same length). Marks disposed in between
/// are skipped when the record is applied.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkUndo {
    offset: usize,
    length: usize,
    backward: Vec<UndoEntry>,
    forward: Vec<UndoEntry>,
    /// Compatible marks whose zero flag was set by the removal.
    zeroed: Vec<MarkId>,
}

impl MarkUndo {
    pub(crate) fn new(offset: usize, length: usize) -> Self {
        Self {
            offset,
            length,
            backward: Vec::new(),
            forward: Vec::new(),
            zeroed: Vec::new(),
        }
    }

    pub(crate) fn record(&mut self, id: MarkId, bias: Bias, offset: usize) {
        let entry = UndoEntry { id, offset };
        match bias {
            Bias::Backward => self.backward.push(entry),
            Bias::Forward => self.forward.push(entry),
        }
    }

    pub(crate) fn record_zeroed(&mut self, id: MarkId) {
        self.zeroed.push(id);
    }

    /// Start offset of the removal.
    pub fn offset(&self) -> usize {
        self.offset
    }

    /// Number of removed chars.
    pub fn length(&self) -> usize {
        self.length
    }

    /// Number of marks whose offset the record restores.
    pub fn mark_count(&self) -> usize {
        self.backward.len() + self.forward.len()
    }

    /// Whether the record restores nothing.
    pub fn is_empty(&self) -> bool {
        self.backward.is_empty() && self.forward.is_empty() && self.zeroed.is_empty()
    }

    /// Whether this record reverses an insertion of `length` chars at `offset`.
    pub fn matches(&self, offset: usize, length: usize) -> bool {
        self.offset == offset && self.length == length
    }
}

impl MarkTable {
    /// Apply the insertion that reverses `undo`'s removal and restore the recorded marks.
    pub(crate) fn restore_undo(&mut self, undo: MarkUndo) {
        let MarkUndo {
            offset,
            length,
            backward,
            forward,
            zeroed,
        } = undo;
        let end = offset + length;

        // Released marks shift like any other forward mark at 0.
        if offset == 0 {
            for &id in &zeroed {
                if let Some(slot) = self.slots.get_mut(id)
                    && slot.is_valid()
                {
                    slot.zero = false;
                }
            }
        }

        // Recorded backward marks stay at `offset`, recorded forward marks land on `end`.
        self.shift_for_insert(offset, length);
        let lo = self.lower_bound(offset, Bias::Backward);
        let hi = self.upper_bound(end, Bias::Forward);

        let mut restored = 0usize;
        let mut skipped = 0usize;
        for entry in backward.iter().chain(forward.iter()) {
            let Some(slot) = self.slots.get(entry.id) else {
                continue;
            };
            if !slot.is_valid() {
                continue;
            }
            let current = self.offset_of_raw(slot.raw_offset);
            if current < offset || current > end {
                // Moved by an edit that was not undone; restoring would break ordering.
                skipped += 1;
                continue;
            }
            let raw = self.raw_of_offset(entry.offset);
            self.slots[entry.id].raw_offset = raw;
            restored += 1;
        }

        // Every restored mark stayed inside `lo..hi`. The chains hold the original array
        // order, which breaks ties there; unrecorded marks keep their current order.
        let rank: HashMap<MarkId, usize> = backward
            .iter()
            .chain(forward.iter())
            .enumerate()
            .map(|(rank, entry)| (entry.id, rank + 1))
            .collect();
        self.move_gap_outside(lo, hi);
        let start = self.raw_index(lo);
        let (gap_start, gap_len) = (self.offset_gap_start, self.offset_gap_len);
        let slots = &self.slots;
        self.marks[start..start + (hi - lo)].sort_by_key(|id| {
            let slot = &slots[*id];
            (
                offset_of_raw(slot.raw_offset, gap_start, gap_len),
                slot.bias,
                rank.get(id).copied().unwrap_or(0),
            )
        });

        if skipped > 0 {
            tracing::warn!(offset, length, skipped, "undo record marks moved since removal");
        }
        tracing::trace!(offset, length, restored, "restored marks from undo record");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MarkVector;

    #[test]
    fn test_record_splits_chains_by_bias() {
        let vector = MarkVector::new();
        let a = vector.create_mark(1, Bias::Backward);
        let b = vector.create_mark(2, Bias::Forward);

        let mut undo = MarkUndo::new(0, 5);
        assert!(undo.is_empty());
        undo.record(a.id(), Bias::Backward, 1);
        undo.record(b.id(), Bias::Forward, 2);

        assert_eq!(undo.mark_count(), 2);
        assert_eq!(undo.backward, vec![UndoEntry { id: a.id(), offset: 1 }]);
        assert_eq!(undo.forward, vec![UndoEntry { id: b.id(), offset: 2 }]);
        assert!(undo.matches(0, 5));
        assert!(!undo.matches(0, 4));
        assert!(!undo.matches(1, 5));
    }

    #[test]
    fn test_zeroed_only_record_is_not_empty() {
        let vector = MarkVector::new();
        let mark = vector.create_compatible_mark(3);
        let mut undo = MarkUndo::new(0, 3);
        undo.record_zeroed(mark.id());
        assert!(!undo.is_empty());
        assert_eq!(undo.mark_count(), 0);
    }

    #[test]
    fn test_mismatched_record_is_ignored() {
        let vector = MarkVector::new();
        let mark = vector.create_mark(4, Bias::Backward);
        vector.insert(&mark).unwrap();

        let undo = vector.update(2, -3, None).unwrap();
        assert_eq!(mark.offset().unwrap(), 2);

        // Different length: plain insertion, the backward mark at 2 stays put.
        vector.update(2, 2, Some(undo));
        assert_eq!(mark.offset().unwrap(), 2);
        vector.check_integrity().unwrap();
    }
}
