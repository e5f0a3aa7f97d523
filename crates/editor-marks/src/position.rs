//! Owning position handles.
//!
//! A [`Position`] ties the lifetime of a tracked mark to a value: dropping the handle disposes
//! the mark. This replaces reclaim-on-unreachable semantics with plain ownership, so a
//! document never accumulates marks for positions nobody holds anymore.

use std::fmt;

use crate::mark::{Bias, Mark, MarkId};

/// A tracked offset that stops being tracked when dropped.
///
/// Created by [`MarkVector::create_position`](crate::MarkVector::create_position).
pub struct Position {
    mark: Mark,
}

impl Position {
    pub(crate) fn new(mark: Mark) -> Self {
        Self { mark }
    }

    /// Current offset in the document.
    pub fn offset(&self) -> usize {
        // Inserted on creation; only `Drop` disposes it.
        match self.mark.offset() {
            Ok(offset) => offset,
            Err(err) => {
                debug_assert!(false, "position mark unavailable: {err}");
                tracing::error!(%err, "position mark unavailable");
                0
            }
        }
    }

    /// Bias of the underlying mark.
    pub fn bias(&self) -> Bias {
        self.mark.bias()
    }

    /// Arena key of the underlying mark.
    pub fn id(&self) -> MarkId {
        self.mark.id()
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Position")
            .field("offset", &self.offset())
            .field("bias", &self.bias())
            .finish()
    }
}

impl Drop for Position {
    fn drop(&mut self) {
        if let Err(err) = self.mark.dispose() {
            tracing::warn!(%err, "failed to dispose position mark");
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::{Bias, MarkVector};

    #[test]
    fn test_drop_disposes_mark() {
        let vector = MarkVector::new();
        let position = vector.create_position(3, Bias::Forward);
        assert_eq!(position.offset(), 3);
        assert_eq!(vector.valid_mark_count(), 1);

        drop(position);
        assert_eq!(vector.valid_mark_count(), 0);
        vector.check_integrity().unwrap();
    }

    #[test]
    fn test_position_follows_edits() {
        let vector = MarkVector::new();
        let position = vector.create_position(5, Bias::Backward);
        vector.update(0, 4, None);
        assert_eq!(position.offset(), 9);
        vector.update(2, -3, None);
        assert_eq!(position.offset(), 6);
    }

    #[test]
    #[should_panic(expected = "position mark unavailable")]
    fn test_disposed_mark_is_not_reported_as_zero() {
        let vector = MarkVector::new();
        let position = vector.create_position(5, Bias::Forward);
        position.mark.dispose().unwrap();
        position.offset();
    }
}
