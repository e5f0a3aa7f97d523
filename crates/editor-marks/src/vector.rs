//! Mark vector: the sorted, gap-indexed collection of all marks of one buffer.
//!
//! # Layout
//!
//! Marks are kept in a `Vec<MarkId>` sorted by offset, ties broken by [`Bias`]. The vector
//! carries an *index gap* (a run of unused slots at `gap_start..gap_start + gap_len`) so that
//! inserting near the previous insertion point costs O(1) amortized; moving the gap costs
//! O(distance moved).
//!
//! # Offset gap
//!
//! Independently of the index gap there is an *offset gap*: a virtual discontinuity in offset
//! space at `offset_gap_start` with length `offset_gap_len`. A mark whose raw offset is
//! `<= offset_gap_start` stores its true offset; a mark above the gap stores
//! `true_offset + offset_gap_len`. Shrinking the gap by `n` moves every mark above it `n`
//! characters later without touching any of them, which is what makes a single edit cheap
//! even with thousands of live marks.
//!
//! ```text
//!   raw:   0 ... offset_gap_start | (gap) | offset_gap_start + offset_gap_len ...
//!   true:  0 ... offset_gap_start         | offset_gap_start ...
//! ```

use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::SlotMap;

use crate::config::MarkVectorConfig;
use crate::error::MarkError;
use crate::mark::{Bias, Mark, MarkId, MarkSlot, MarkState};
use crate::position::Position;
use crate::undo::MarkUndo;

/// Offset gap length of a fresh vector (and after every rebase).
pub(crate) const INITIAL_OFFSET_GAP_LEN: usize = usize::MAX / 4;
/// Removals grow the offset gap; past this length it is rebased to [`INITIAL_OFFSET_GAP_LEN`].
const OFFSET_GAP_CEILING: usize = usize::MAX / 2;

/// Translate a raw offset through an offset gap.
pub(crate) fn offset_of_raw(raw: usize, gap_start: usize, gap_len: usize) -> usize {
    if raw <= gap_start { raw } else { raw - gap_len }
}

/// Vector state guarded by the vector lock.
pub(crate) struct MarkTable {
    pub(crate) slots: SlotMap<MarkId, MarkSlot>,
    /// Sorted mark ids with an index gap.
    pub(crate) marks: Vec<MarkId>,
    pub(crate) gap_start: usize,
    pub(crate) gap_len: usize,
    pub(crate) offset_gap_start: usize,
    pub(crate) offset_gap_len: usize,
    /// Disposed marks still present in `marks`.
    pub(crate) disposed_count: usize,
    pub(crate) config: MarkVectorConfig,
}

impl MarkTable {
    pub(crate) fn new(config: MarkVectorConfig) -> Self {
        let capacity = config.initial_capacity;
        Self {
            slots: SlotMap::with_key(),
            marks: vec![MarkId::default(); capacity],
            gap_start: 0,
            gap_len: capacity,
            offset_gap_start: 0,
            offset_gap_len: INITIAL_OFFSET_GAP_LEN,
            disposed_count: 0,
            config,
        }
    }

    /// Number of marks in the array, disposed ones awaiting compaction included.
    pub(crate) fn count(&self) -> usize {
        self.marks.len() - self.gap_len
    }

    pub(crate) fn raw_index(&self, index: usize) -> usize {
        if index < self.gap_start {
            index
        } else {
            index + self.gap_len
        }
    }

    pub(crate) fn id_at(&self, index: usize) -> MarkId {
        self.marks[self.raw_index(index)]
    }

    pub(crate) fn offset_of_raw(&self, raw: usize) -> usize {
        offset_of_raw(raw, self.offset_gap_start, self.offset_gap_len)
    }

    /// Raw offset a mark at `offset` must store under the current offset gap.
    pub(crate) fn raw_of_offset(&self, offset: usize) -> usize {
        if offset <= self.offset_gap_start {
            offset
        } else {
            offset + self.offset_gap_len
        }
    }

    /// Ordering key of the mark at `index`: its internal offset and bias. Zero-flagged marks
    /// are kept at internal offset 0, so this is also the reported order.
    pub(crate) fn key_at(&self, index: usize) -> (usize, Bias) {
        let slot = &self.slots[self.id_at(index)];
        (self.offset_of_raw(slot.raw_offset), slot.bias)
    }

    fn partition_point(
        &self,
        mut lo: usize,
        mut hi: usize,
        pred: impl Fn((usize, Bias)) -> bool,
    ) -> usize {
        while lo < hi {
            let mid = lo + (hi - lo) / 2;
            if pred(self.key_at(mid)) {
                lo = mid + 1;
            } else {
                hi = mid;
            }
        }
        lo
    }

    /// First index whose key is `>= (offset, bias)`.
    pub(crate) fn lower_bound(&self, offset: usize, bias: Bias) -> usize {
        self.partition_point(0, self.count(), |key| key < (offset, bias))
    }

    /// First index whose key is `> (offset, bias)`.
    pub(crate) fn upper_bound(&self, offset: usize, bias: Bias) -> usize {
        self.upper_bound_in(0, self.count(), offset, bias)
    }

    fn upper_bound_in(&self, lo: usize, hi: usize, offset: usize, bias: Bias) -> usize {
        self.partition_point(lo, hi, |key| key <= (offset, bias))
    }

    /// Move the index gap so that it starts at logical `index`.
    pub(crate) fn move_gap(&mut self, index: usize) {
        match index.cmp(&self.gap_start) {
            Ordering::Less => {
                self.marks
                    .copy_within(index..self.gap_start, index + self.gap_len);
            }
            Ordering::Greater => {
                let from = self.gap_start + self.gap_len;
                self.marks
                    .copy_within(from..index + self.gap_len, self.gap_start);
            }
            Ordering::Equal => {}
        }
        self.gap_start = index;
    }

    /// Make `lo..hi` physically contiguous.
    pub(crate) fn move_gap_outside(&mut self, lo: usize, hi: usize) {
        if self.gap_start > lo && self.gap_start < hi {
            self.move_gap(hi);
        }
    }

    fn ensure_gap(&mut self) {
        if self.gap_len > 0 {
            return;
        }
        let grow = self.config.min_gap_growth.max(self.count() / 2).max(1);
        self.marks.splice(
            self.gap_start..self.gap_start,
            std::iter::repeat_n(MarkId::default(), grow),
        );
        self.gap_len = grow;
        tracing::trace!(grow, count = self.count(), "grew mark index gap");
    }

    fn insert_at(&mut self, index: usize, id: MarkId) {
        self.ensure_gap();
        self.move_gap(index);
        self.marks[self.gap_start] = id;
        self.gap_start += 1;
        self.gap_len -= 1;
    }

    /// Remove the index gap entirely.
    pub(crate) fn compact(&mut self) {
        let count = self.count();
        self.move_gap(count);
        self.marks.truncate(count);
        self.marks.shrink_to_fit();
        self.gap_len = 0;
    }

    /// Move the offset gap boundary to `new_start`, rewriting the raw offsets of the marks
    /// that change sides.
    pub(crate) fn move_offset_gap(&mut self, new_start: usize) {
        let old_start = self.offset_gap_start;
        let gap_len = self.offset_gap_len;
        match new_start.cmp(&old_start) {
            Ordering::Greater => {
                let lo = self.lower_bound(old_start, Bias::Backward);
                let hi = self.upper_bound(new_start, Bias::Forward);
                for index in lo..hi {
                    let id = self.id_at(index);
                    let slot = &mut self.slots[id];
                    if slot.raw_offset > old_start {
                        slot.raw_offset -= gap_len;
                    }
                }
            }
            Ordering::Less => {
                let lo = self.upper_bound(new_start, Bias::Forward);
                let hi = self.upper_bound(old_start, Bias::Forward);
                for index in lo..hi {
                    let id = self.id_at(index);
                    let slot = &mut self.slots[id];
                    if slot.raw_offset <= old_start {
                        slot.raw_offset += gap_len;
                    }
                }
            }
            Ordering::Equal => {}
        }
        self.offset_gap_start = new_start;
    }

    /// Rewrite every raw offset above the offset gap against a fresh gap length.
    fn rebase_offset_gap(&mut self) {
        let (start, old_len) = (self.offset_gap_start, self.offset_gap_len);
        for index in 0..self.count() {
            let id = self.id_at(index);
            let slot = &mut self.slots[id];
            if slot.raw_offset > start {
                slot.raw_offset = slot.raw_offset - old_len + INITIAL_OFFSET_GAP_LEN;
            }
        }
        self.offset_gap_len = INITIAL_OFFSET_GAP_LEN;
        tracing::trace!(old_len, "rebased offset gap");
    }

    pub(crate) fn mark_offset(&self, id: MarkId) -> Result<usize, MarkError> {
        let slot = self.slots.get(id).ok_or(MarkError::Disposed)?;
        match slot.state {
            MarkState::Disposed => Err(MarkError::Disposed),
            _ if slot.zero => Ok(0),
            MarkState::Detached => Ok(slot.raw_offset),
            MarkState::Valid => Ok(self.offset_of_raw(slot.raw_offset)),
        }
    }

    pub(crate) fn check_insertable(&self, id: MarkId) -> Result<(), MarkError> {
        match self.slots.get(id).map(|slot| slot.state) {
            Some(MarkState::Detached) => Ok(()),
            Some(MarkState::Valid) => Err(MarkError::AlreadyValid),
            Some(MarkState::Disposed) | None => Err(MarkError::Disposed),
        }
    }

    /// Insert a detached mark, searching for its index within `lo..hi` only.
    fn insert_in(&mut self, id: MarkId, lo: usize, hi: usize) -> usize {
        let (offset, bias) = {
            let slot = &self.slots[id];
            (slot.raw_offset, slot.bias)
        };
        // Sorted input lands right after the previous mark; probe that slot first.
        let index = if lo == hi || self.key_at(lo) > (offset, bias) {
            lo
        } else {
            self.upper_bound_in(lo + 1, hi, offset, bias)
        };
        let raw = self.raw_of_offset(offset);
        let slot = &mut self.slots[id];
        slot.raw_offset = raw;
        slot.state = MarkState::Valid;
        self.insert_at(index, id);
        index
    }

    fn insert_in_all(&mut self, id: MarkId) {
        self.insert_in(id, 0, self.count());
    }

    pub(crate) fn insert(&mut self, id: MarkId) -> Result<(), MarkError> {
        self.check_insertable(id)?;
        self.insert_in_all(id);
        Ok(())
    }

    /// Insert already validated detached marks in list order.
    pub(crate) fn insert_list(&mut self, ids: &[MarkId]) {
        let mut previous: Option<(usize, (usize, Bias))> = None;
        for &id in ids {
            let key = {
                let slot = &self.slots[id];
                (slot.raw_offset, slot.bias)
            };
            let count = self.count();
            // The previous mark splits the array: everything before it sorts <= its key.
            let (lo, hi) = match previous {
                Some((index, prev_key)) if key >= prev_key => (index + 1, count),
                Some((index, _)) => (0, index),
                None => (0, count),
            };
            let index = self.insert_in(id, lo, hi);
            previous = Some((index, key));
        }
    }

    pub(crate) fn dispose(&mut self, id: MarkId) -> Result<(), MarkError> {
        let state = self.slots.get(id).ok_or(MarkError::Disposed)?.state;
        match state {
            MarkState::Disposed => Err(MarkError::Disposed),
            MarkState::Detached => {
                self.slots.remove(id);
                Ok(())
            }
            MarkState::Valid => {
                self.slots[id].state = MarkState::Disposed;
                self.notify_mark_disposed();
                Ok(())
            }
        }
    }

    pub(crate) fn release_detached(&mut self, id: MarkId) {
        if self
            .slots
            .get(id)
            .is_some_and(|slot| slot.state == MarkState::Detached)
        {
            self.slots.remove(id);
        }
    }

    fn notify_mark_disposed(&mut self) {
        self.disposed_count += 1;
        if self.disposed_count > self.config.compaction_threshold(self.count()) {
            self.remove_disposed_marks();
        }
    }

    /// Physically drop disposed marks from the array and free their slots.
    pub(crate) fn remove_disposed_marks(&mut self) {
        let count = self.count();
        let gap = self.config.min_gap_growth;
        let mut retained = Vec::with_capacity(count + gap);
        for index in 0..count {
            let id = self.id_at(index);
            if self.slots[id].is_valid() {
                retained.push(id);
            } else {
                self.slots.remove(id);
            }
        }
        let remaining = retained.len();
        retained.resize(remaining + gap, MarkId::default());
        self.marks = retained;
        self.gap_start = remaining;
        self.gap_len = gap;
        self.disposed_count = 0;
        tracing::debug!(
            removed = count - remaining,
            remaining,
            "removed disposed marks"
        );
    }

    pub(crate) fn update(
        &mut self,
        offset: usize,
        length: isize,
        undo: Option<MarkUndo>,
    ) -> Option<MarkUndo> {
        match length.cmp(&0) {
            Ordering::Greater => {
                self.insert_update(offset, length.unsigned_abs(), undo);
                None
            }
            Ordering::Less => {
                if undo.is_some() {
                    tracing::warn!(offset, length, "undo record passed to a removal, ignoring");
                }
                self.remove_update(offset, length.unsigned_abs())
            }
            Ordering::Equal => None,
        }
    }

    pub(crate) fn insert_update(&mut self, offset: usize, length: usize, undo: Option<MarkUndo>) {
        if length == 0 {
            return;
        }
        match undo {
            Some(undo) if undo.matches(offset, length) => self.restore_undo(undo),
            Some(undo) => {
                tracing::warn!(
                    offset,
                    length,
                    undo_offset = undo.offset(),
                    undo_length = undo.length(),
                    "undo record does not match the insertion, ignoring"
                );
                self.shift_for_insert(offset, length);
            }
            None => self.shift_for_insert(offset, length),
        }
    }

    /// Shift marks after `offset` (and forward marks at it) by `length`.
    pub(crate) fn shift_for_insert(&mut self, offset: usize, length: usize) {
        if self.offset_gap_len < length.saturating_add(self.config.offset_gap_floor) {
            self.rebase_offset_gap();
        }
        self.move_offset_gap(offset);

        // Forward marks at `offset` go above the gap. Zero-flagged marks lead that run at 0
        // and stay below it.
        let lo = self.lower_bound(offset, Bias::Forward);
        let hi = self.upper_bound(offset, Bias::Forward);
        let above = offset + self.offset_gap_len;
        for index in lo..hi {
            let id = self.id_at(index);
            let slot = &mut self.slots[id];
            slot.raw_offset = if slot.zero { offset } else { above };
        }

        self.offset_gap_len -= length;
    }

    /// Collapse the marks inside `offset..offset + length` and record how to undo it.
    pub(crate) fn remove_update(&mut self, offset: usize, length: usize) -> Option<MarkUndo> {
        if length == 0 {
            return None;
        }
        let end = offset + length;
        if self.offset_gap_len > OFFSET_GAP_CEILING.saturating_sub(length) {
            self.rebase_offset_gap();
        }
        self.move_offset_gap(offset);

        // At 0 the forward marks at `end` join the window: zero flagging may reorder them.
        let lo = self.lower_bound(offset, Bias::Forward);
        let hi = if offset == 0 {
            self.upper_bound(end, Bias::Forward)
        } else {
            self.upper_bound(end, Bias::Backward)
        };

        let mut undo = MarkUndo::new(offset, length);
        let mut backward = Vec::new();
        let mut forward = Vec::new();
        for index in lo..hi {
            let id = self.id_at(index);
            let slot = &self.slots[id];
            if slot.is_valid() {
                undo.record(id, slot.bias, self.offset_of_raw(slot.raw_offset));
            }
            match slot.bias {
                Bias::Backward => backward.push(id),
                Bias::Forward => forward.push(id),
            }
        }

        self.offset_gap_len += length;
        let collapsed_above = offset + self.offset_gap_len;
        for &id in &backward {
            self.slots[id].raw_offset = offset;
        }
        for &id in &forward {
            self.slots[id].raw_offset = collapsed_above;
        }

        // Backward marks first; each run keeps its original relative order.
        self.move_gap_outside(lo, hi);
        let start = self.raw_index(lo);
        let window = &mut self.marks[start..start + (hi - lo)];
        for (entry, id) in window.iter_mut().zip(backward.iter().chain(forward.iter())) {
            *entry = *id;
        }

        if offset == 0 {
            self.zero_compatible_marks(&mut undo);
        }

        tracing::trace!(
            offset,
            length,
            collapsed = hi - lo,
            "collapsed marks for removal"
        );
        (!undo.is_empty()).then_some(undo)
    }

    /// Flag every compatible mark now sitting at offset 0 and move the flagged forward marks
    /// to the front of the forward run there.
    fn zero_compatible_marks(&mut self, undo: &mut MarkUndo) {
        let lo = self.lower_bound(0, Bias::Forward);
        let hi = self.upper_bound(0, Bias::Forward);
        for index in 0..hi {
            let id = self.id_at(index);
            let slot = &mut self.slots[id];
            if slot.is_valid() && slot.compatible && !slot.zero {
                slot.zero = true;
                undo.record_zeroed(id);
            }
        }

        self.move_gap_outside(lo, hi);
        let start = self.raw_index(lo);
        let slots = &self.slots;
        self.marks[start..start + (hi - lo)].sort_by_key(|id| !slots[*id].zero);
    }

    fn info_at(&self, index: usize) -> MarkInfo {
        let id = self.id_at(index);
        let slot = &self.slots[id];
        MarkInfo {
            id,
            offset: if slot.zero {
                0
            } else {
                self.offset_of_raw(slot.raw_offset)
            },
            bias: slot.bias,
            valid: slot.is_valid(),
            compatible: slot.compatible,
            zero: slot.zero,
        }
    }

    pub(crate) fn check_integrity(&self) -> Result<(), MarkError> {
        let violation = |message: String| Err(MarkError::IntegrityViolation(message));
        let count = self.count();
        if self.gap_start > count {
            return violation(format!("gap start {} beyond count {count}", self.gap_start));
        }

        let mut disposed = 0;
        let mut previous: Option<(usize, Bias)> = None;
        let mut previous_reported = 0;
        let mut unpinned_at_zero = false;
        for index in 0..count {
            let id = self.id_at(index);
            let Some(slot) = self.slots.get(id) else {
                return violation(format!("index {index} refers to a freed slot"));
            };
            match slot.state {
                MarkState::Detached => {
                    return violation(format!("index {index} holds a detached mark"));
                }
                MarkState::Disposed => disposed += 1,
                MarkState::Valid => {}
            }
            if slot.raw_offset > self.offset_gap_start
                && slot.raw_offset < self.offset_gap_start + self.offset_gap_len
            {
                return violation(format!(
                    "index {index} has raw offset {} inside the offset gap",
                    slot.raw_offset
                ));
            }
            let key = self.key_at(index);
            if previous.is_some_and(|prev| prev > key) {
                return violation(format!("index {index} is out of order: {key:?}"));
            }
            previous = Some(key);

            if slot.zero && key.0 != 0 {
                return violation(format!(
                    "index {index} is zero-flagged at internal offset {}",
                    key.0
                ));
            }
            if key == (0, Bias::Forward) {
                if slot.zero && unpinned_at_zero {
                    return violation(format!(
                        "index {index} is zero-flagged after an unflagged forward mark at 0"
                    ));
                }
                unpinned_at_zero |= !slot.zero;
            }
            let reported = if slot.zero { 0 } else { key.0 };
            if reported < previous_reported {
                return violation(format!(
                    "index {index} reports offset {reported} after {previous_reported}"
                ));
            }
            previous_reported = reported;
        }

        if disposed != self.disposed_count {
            return violation(format!(
                "disposed count {} but {disposed} disposed marks present",
                self.disposed_count
            ));
        }
        Ok(())
    }
}

/// Snapshot of one mark, as returned by [`MarkVector::mark_at`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MarkInfo {
    /// Arena key of the mark.
    pub id: MarkId,
    /// Offset the mark reports (`0` for a zero-flagged compatible mark).
    pub offset: usize,
    /// Bias of the mark.
    pub bias: Bias,
    /// `false` for disposed marks awaiting compaction.
    pub valid: bool,
    /// Legacy simple-position semantics.
    pub compatible: bool,
    /// Sticky collapse-to-zero flag.
    pub zero: bool,
}

/// All marks of one buffer.
///
/// `MarkVector` is a cheap handle around a single lock; clones share the same marks. Every
/// method on the vector, on its [`Mark`]s and on its [`Position`]s takes that lock for its
/// full duration, so edits and offset queries from different threads are serialized.
///
/// The owning document must call [`MarkVector::update`] once for every applied edit, in edit
/// order, before trusting any mark offset.
#[derive(Clone)]
pub struct MarkVector {
    table: Arc<Mutex<MarkTable>>,
}

impl MarkVector {
    /// Create an empty vector with the default configuration.
    pub fn new() -> Self {
        Self::with_config(MarkVectorConfig::default())
    }

    /// Create an empty vector.
    pub fn with_config(config: MarkVectorConfig) -> Self {
        Self {
            table: Arc::new(Mutex::new(MarkTable::new(config))),
        }
    }

    /// Configuration the vector was created with.
    pub fn config(&self) -> MarkVectorConfig {
        self.table.lock().config.clone()
    }

    fn wrap(&self, slot: MarkSlot) -> Mark {
        let bias = slot.bias;
        let id = self.table.lock().slots.insert(slot);
        Mark {
            id,
            bias,
            table: Arc::clone(&self.table),
        }
    }

    /// Create a detached mark. It does not take part in ordering until inserted.
    pub fn create_mark(&self, offset: usize, bias: Bias) -> Mark {
        self.wrap(MarkSlot::detached(offset, bias))
    }

    /// Create a detached mark with simple-position semantics.
    ///
    /// At offset 0 the mark is backward-biased and pinned to the start of the buffer;
    /// anywhere else it is forward-biased and becomes pinned to 0 once the text before it is
    /// removed from the start of the buffer.
    pub fn create_compatible_mark(&self, offset: usize) -> Mark {
        self.wrap(MarkSlot::compatible(offset))
    }

    fn position_for(&self, slot: MarkSlot) -> Position {
        let mark = self.wrap(slot);
        self.table.lock().insert_in_all(mark.id);
        Position::new(mark)
    }

    /// Create and insert a mark wrapped in a [`Position`] that disposes it on drop.
    pub fn create_position(&self, offset: usize, bias: Bias) -> Position {
        self.position_for(MarkSlot::detached(offset, bias))
    }

    /// Create and insert a compatible mark wrapped in a [`Position`].
    pub fn create_compatible_position(&self, offset: usize) -> Position {
        self.position_for(MarkSlot::compatible(offset))
    }

    /// Start tracking a detached mark.
    pub fn insert(&self, mark: &Mark) -> Result<(), MarkError> {
        if !mark.belongs_to(&self.table) {
            return Err(MarkError::ForeignMark);
        }
        self.table.lock().insert(mark.id)
    }

    /// Start tracking several detached marks.
    ///
    /// Equivalent to calling [`MarkVector::insert`] for each mark in order, but cheaper when
    /// the marks are roughly sorted by offset. All marks are validated first; on error none
    /// of them is inserted.
    pub fn insert_list<'a>(&self, marks: impl IntoIterator<Item = &'a Mark>) -> Result<(), MarkError> {
        let mut ids = Vec::new();
        for mark in marks {
            if !mark.belongs_to(&self.table) {
                return Err(MarkError::ForeignMark);
            }
            ids.push(mark.id);
        }

        let mut table = self.table.lock();
        let mut seen = HashSet::with_capacity(ids.len());
        for &id in &ids {
            table.check_insertable(id)?;
            if !seen.insert(id) {
                return Err(MarkError::AlreadyValid);
            }
        }
        table.insert_list(&ids);
        Ok(())
    }

    /// Adjust marks for an edit already applied to the text.
    ///
    /// `length > 0` is an insertion of `length` chars at `offset`, `length < 0` a removal of
    /// `-length` chars starting at `offset`. A removal returns the record needed to restore the
    /// affected marks (`None` if no mark was affected); pass it back with the matching
    /// re-insertion to undo the removal exactly.
    pub fn update(&self, offset: usize, length: isize, undo: Option<MarkUndo>) -> Option<MarkUndo> {
        self.table.lock().update(offset, length, undo)
    }

    /// Adjust marks for an insertion of `length` chars at `offset`.
    pub fn insert_update(&self, offset: usize, length: usize, undo: Option<MarkUndo>) {
        self.table.lock().insert_update(offset, length, undo);
    }

    /// Adjust marks for a removal of `length` chars at `offset`.
    pub fn remove_update(&self, offset: usize, length: usize) -> Option<MarkUndo> {
        self.table.lock().remove_update(offset, length)
    }

    /// Translate a raw offset through the current offset gap.
    pub fn offset_of_raw(&self, raw: usize) -> usize {
        self.table.lock().offset_of_raw(raw)
    }

    /// Number of marks in the array, including disposed ones not yet compacted away.
    pub fn mark_count(&self) -> usize {
        self.table.lock().count()
    }

    /// Number of tracked (valid) marks.
    pub fn valid_mark_count(&self) -> usize {
        let table = self.table.lock();
        table.count() - table.disposed_count
    }

    /// Whether the vector holds no marks at all.
    pub fn is_empty(&self) -> bool {
        self.mark_count() == 0
    }

    /// Snapshot of the mark at `index` in sorted order.
    pub fn mark_at(&self, index: usize) -> Option<MarkInfo> {
        let table = self.table.lock();
        (index < table.count()).then(|| table.info_at(index))
    }

    /// Reported offset of the mark at `index` in sorted order.
    pub fn mark_offset(&self, index: usize) -> Option<usize> {
        self.mark_at(index).map(|info| info.offset)
    }

    /// Reported offsets of all valid marks in sorted order.
    pub fn offsets(&self) -> Vec<usize> {
        let table = self.table.lock();
        (0..table.count())
            .map(|index| table.info_at(index))
            .filter(|info| info.valid)
            .map(|info| info.offset)
            .collect()
    }

    /// Remove the index gap, leaving a dense array. Offsets are unaffected.
    pub fn compact(&self) {
        self.table.lock().compact();
    }

    /// Drop disposed marks right away instead of waiting for the threshold.
    pub fn remove_disposed_marks(&self) {
        self.table.lock().remove_disposed_marks();
    }

    /// Verify the ordering and gap invariants.
    pub fn check_integrity(&self) -> Result<(), MarkError> {
        self.table.lock().check_integrity()
    }
}

impl Default for MarkVector {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for MarkVector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let table = self.table.lock();
        f.debug_struct("MarkVector")
            .field("mark_count", &table.count())
            .field("disposed_count", &table.disposed_count)
            .field("gap_start", &table.gap_start)
            .field("gap_len", &table.gap_len)
            .field("offset_gap_start", &table.offset_gap_start)
            .finish()
    }
}
