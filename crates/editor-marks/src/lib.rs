#![warn(missing_docs)]
//! Editor Marks - position tracking for headless editor documents
//!
//! # Overview
//!
//! `editor-marks` keeps logical positions (marks) stable inside a mutable text buffer across
//! arbitrary insertions and removals. It is the engine behind cursors, highlight anchors and
//! any other offset a document has to keep pointing at the same text while the user types.
//!
//! # Core Features
//!
//! - **Gap-indexed storage**: marks live in a sorted array with an index gap, O(1) amortized
//!   insertion near the previous insertion point
//! - **Offset gap**: a virtual discontinuity in offset space; one edit shifts every later mark
//!   by moving a single boundary instead of rewriting each mark
//! - **Bias**: backward marks stay before text inserted at their offset, forward marks move
//!   after it; at equal offsets backward marks always sort first
//! - **Undoable removals**: a removal returns a [`MarkUndo`] that restores the collapsed marks
//!   to their original offsets and order when the text is inserted back
//! - **Compatible marks**: simple-position semantics, pinned to offset 0 once the text before
//!   them is removed from the start of the buffer
//!
//! # Architecture Layers
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Document (Rope + undo/redo history)        │  ← Collaborator
//! ├─────────────────────────────────────────────┤
//! │  Position (disposes on drop)                │  ← Handles
//! ├─────────────────────────────────────────────┤
//! │  Mark (offset, bias, lifecycle)             │
//! ├─────────────────────────────────────────────┤
//! │  MarkVector (index gap + offset gap)        │  ← Engine
//! └─────────────────────────────────────────────┘
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use editor_marks::{Bias, MarkVector};
//!
//! let marks = MarkVector::new();
//! let before = marks.create_mark(5, Bias::Backward);
//! let after = marks.create_mark(5, Bias::Forward);
//! marks.insert_list([&before, &after]).unwrap();
//!
//! // Three chars typed at offset 5.
//! marks.update(5, 3, None);
//! assert_eq!(before.offset().unwrap(), 5);
//! assert_eq!(after.offset().unwrap(), 8);
//!
//! // Remove them again, then undo the removal.
//! let undo = marks.update(5, -3, None);
//! assert_eq!(after.offset().unwrap(), 5);
//! marks.update(5, 3, undo);
//! assert_eq!(after.offset().unwrap(), 8);
//! ```
//!
//! ## Using a Document
//!
//! ```rust
//! use editor_marks::{Bias, Document};
//!
//! let mut doc = Document::new("hello world");
//! let word = doc.create_position(6, Bias::Backward).unwrap();
//!
//! doc.insert(0, ">> ").unwrap();
//! assert_eq!(word.offset(), 9);
//!
//! doc.undo();
//! assert_eq!(word.offset(), 6);
//! ```
//!
//! # Module Description
//!
//! - [`vector`] - Mark vector: sorted storage, index gap, offset gap, edit updates
//! - [`mark`] - Marks and bias
//! - [`position`] - Self-disposing position handles
//! - [`undo`] - Undo records for removals
//! - [`document`] - Rope-backed document that keeps its marks in sync
//! - [`config`] - Vector tuning
//!
//! # Concurrency
//!
//! A [`MarkVector`] is a handle around one lock. Every vector, mark and position call takes it
//! for its whole duration; nothing blocks or performs I/O while holding it.

pub mod config;
pub mod document;
pub mod error;
pub mod mark;
pub mod position;
pub mod undo;
pub mod vector;

pub use config::MarkVectorConfig;
pub use document::Document;
pub use error::MarkError;
pub use mark::{Bias, Mark, MarkId};
pub use position::Position;
pub use undo::MarkUndo;
pub use vector::{MarkInfo, MarkVector};
