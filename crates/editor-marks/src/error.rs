//! Error type shared by marks, positions, the vector and documents.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
/// Errors produced by marks, positions and the mark vector.
///
/// Every variant is a caller contract violation; none of them is expected during
/// normal editing.
pub enum MarkError {
    #[error("mark has been disposed")]
    /// The mark was disposed (explicitly, or by dropping its [`Position`](crate::Position)).
    Disposed,

    #[error("mark is already inserted into the vector")]
    /// `insert` was called on a mark that is already tracked.
    AlreadyValid,

    #[error("mark belongs to a different mark vector")]
    /// A mark created by one vector was handed to another one.
    ForeignMark,

    #[error("offset {offset} is out of range for a document of length {len}")]
    /// An edit or mark offset lies outside `0..=len`.
    OffsetOutOfRange {
        /// The rejected offset.
        offset: usize,
        /// Document length (in chars) at the time of the call.
        len: usize,
    },

    #[error("mark vector integrity violation: {0}")]
    /// Internal invariants do not hold (reported by
    /// [`MarkVector::check_integrity`](crate::MarkVector::check_integrity)).
    IntegrityViolation(String),
}
