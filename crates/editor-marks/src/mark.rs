//! Marks: tracked logical offsets owned by a [`MarkVector`](crate::MarkVector).
//!
//! A [`Mark`] is a handle to a slot in its vector's arena. The slot holds the raw offset (in
//! the vector's internal coordinate space), the bias and the lifecycle flags; the handle only
//! remembers which slot it names, so every query goes through the vector lock.

use std::fmt;
use std::sync::Arc;

use parking_lot::Mutex;
use slotmap::new_key_type;

use crate::error::MarkError;
use crate::vector::MarkTable;

new_key_type! {
    /// Arena key of a mark slot.
    ///
    /// Keys are generational: once a disposed mark's slot is reclaimed, its old key never
    /// resolves to a newer mark.
    pub struct MarkId;
}

/// Which side of an edit boundary a mark sticks to.
///
/// At equal offsets, backward-biased marks always sort before forward-biased ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Bias {
    /// Stays put when text is inserted exactly at the mark.
    #[default]
    Backward,
    /// Moves with text inserted exactly at the mark.
    Forward,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum MarkState {
    /// Created but not inserted; `raw_offset` holds the creation offset verbatim.
    Detached,
    Valid,
    Disposed,
}

#[derive(Debug, Clone)]
pub(crate) struct MarkSlot {
    pub(crate) raw_offset: usize,
    pub(crate) bias: Bias,
    pub(crate) state: MarkState,
    /// Clamps to zero once the text before it is removed from the start of the buffer.
    pub(crate) compatible: bool,
    /// Sticky "collapsed to offset 0" flag of a compatible mark.
    pub(crate) zero: bool,
}

impl MarkSlot {
    pub(crate) fn detached(offset: usize, bias: Bias) -> Self {
        Self {
            raw_offset: offset,
            bias,
            state: MarkState::Detached,
            compatible: false,
            zero: false,
        }
    }

    pub(crate) fn compatible(offset: usize) -> Self {
        if offset == 0 {
            Self {
                raw_offset: 0,
                bias: Bias::Backward,
                state: MarkState::Detached,
                compatible: true,
                zero: true,
            }
        } else {
            Self {
                raw_offset: offset,
                bias: Bias::Forward,
                state: MarkState::Detached,
                compatible: true,
                zero: false,
            }
        }
    }

    pub(crate) fn is_valid(&self) -> bool {
        self.state == MarkState::Valid
    }
}

/// A tracked position inside a text buffer that survives edits.
///
/// Created detached by [`MarkVector::create_mark`](crate::MarkVector::create_mark) and
/// tracked after [`MarkVector::insert`](crate::MarkVector::insert). A tracked mark lives until
/// [`Mark::dispose`] is called; dropping the handle of a tracked mark does not stop tracking.
/// Use [`Position`](crate::Position) for a handle that disposes on drop.
pub struct Mark {
    pub(crate) id: MarkId,
    pub(crate) bias: Bias,
    pub(crate) table: Arc<Mutex<MarkTable>>,
}

impl Mark {
    /// Arena key of this mark.
    pub fn id(&self) -> MarkId {
        self.id
    }

    /// Bias of the mark. Available regardless of validity.
    pub fn bias(&self) -> Bias {
        self.bias
    }

    /// Current offset of the mark in the document.
    ///
    /// A detached mark reports its creation offset. A compatible mark that collapsed to the
    /// start of the buffer reports `0`.
    pub fn offset(&self) -> Result<usize, MarkError> {
        self.table.lock().mark_offset(self.id)
    }

    /// Whether the mark is currently tracked by its vector.
    pub fn is_valid(&self) -> bool {
        self.table
            .lock()
            .slots
            .get(self.id)
            .is_some_and(MarkSlot::is_valid)
    }

    /// Whether this mark follows legacy simple-position semantics.
    pub fn is_compatible(&self) -> bool {
        self.table
            .lock()
            .slots
            .get(self.id)
            .is_some_and(|slot| slot.compatible)
    }

    /// Stop tracking the mark.
    ///
    /// Disposing twice is an error: the second call returns [`MarkError::Disposed`].
    pub fn dispose(&self) -> Result<(), MarkError> {
        self.table.lock().dispose(self.id)
    }

    pub(crate) fn belongs_to(&self, table: &Arc<Mutex<MarkTable>>) -> bool {
        Arc::ptr_eq(&self.table, table)
    }
}

impl fmt::Debug for Mark {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mark")
            .field("id", &self.id)
            .field("bias", &self.bias)
            .field("offset", &self.offset().ok())
            .finish()
    }
}

impl Drop for Mark {
    fn drop(&mut self) {
        // A detached slot is reachable only through this handle.
        self.table.lock().release_detached(self.id);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bias_ordering() {
        assert!(Bias::Backward < Bias::Forward);
        assert_eq!(Bias::default(), Bias::Backward);
    }

    #[test]
    fn test_compatible_slot_at_zero() {
        let slot = MarkSlot::compatible(0);
        assert!(slot.zero);
        assert!(slot.compatible);
        assert_eq!(slot.bias, Bias::Backward);

        let slot = MarkSlot::compatible(7);
        assert!(!slot.zero);
        assert_eq!(slot.bias, Bias::Forward);
        assert_eq!(slot.raw_offset, 7);
    }
}
