//! Text document driving a [`MarkVector`].
//!
//! [`Document`] is the reference collaborator of the mark engine: it owns the text (a
//! [`Rope`]), reports every applied edit to its vector, and threads the undo records returned
//! by removals through its own undo/redo history. Offsets are in chars.
//!
//! This is also where offsets get validated: the vector itself trusts whatever it is told.

use ropey::Rope;

use crate::error::MarkError;
use crate::mark::{Bias, Mark};
use crate::position::Position;
use crate::undo::MarkUndo;
use crate::vector::MarkVector;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditKind {
    Insert,
    Remove,
}

#[derive(Debug)]
struct TextEdit {
    kind: EditKind,
    offset: usize,
    text: String,
    /// Record of the most recent removal of `text` (the edit itself for a removal, its undo
    /// for an insertion), consumed when the text is inserted back.
    marks: Option<MarkUndo>,
}

impl TextEdit {
    fn char_len(&self) -> usize {
        self.text.chars().count()
    }
}

/// A text buffer whose marks follow its edits.
pub struct Document {
    rope: Rope,
    marks: MarkVector,
    undo_stack: Vec<TextEdit>,
    redo_stack: Vec<TextEdit>,
}

impl Document {
    /// Create a document with a fresh mark vector.
    pub fn new(text: &str) -> Self {
        Self::with_marks(text, MarkVector::new())
    }

    /// Create a document around an existing (normally empty) mark vector.
    pub fn with_marks(text: &str, marks: MarkVector) -> Self {
        Self {
            rope: Rope::from_str(text),
            marks,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
        }
    }

    /// Full document text.
    pub fn text(&self) -> String {
        self.rope.to_string()
    }

    /// Document length in chars.
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// The document's mark vector.
    pub fn marks(&self) -> &MarkVector {
        &self.marks
    }

    fn check_offset(&self, offset: usize) -> Result<(), MarkError> {
        let len = self.len_chars();
        if offset > len {
            return Err(MarkError::OffsetOutOfRange { offset, len });
        }
        Ok(())
    }

    /// Create and insert a mark at `offset`.
    pub fn create_mark(&self, offset: usize, bias: Bias) -> Result<Mark, MarkError> {
        self.check_offset(offset)?;
        let mark = self.marks.create_mark(offset, bias);
        self.marks.insert(&mark)?;
        Ok(mark)
    }

    /// Create a self-disposing position at `offset`.
    pub fn create_position(&self, offset: usize, bias: Bias) -> Result<Position, MarkError> {
        self.check_offset(offset)?;
        Ok(self.marks.create_position(offset, bias))
    }

    /// Create a self-disposing position with simple-position semantics.
    pub fn create_compatible_position(&self, offset: usize) -> Result<Position, MarkError> {
        self.check_offset(offset)?;
        Ok(self.marks.create_compatible_position(offset))
    }

    /// Insert `text` at char `offset`.
    pub fn insert(&mut self, offset: usize, text: &str) -> Result<(), MarkError> {
        self.check_offset(offset)?;
        if text.is_empty() {
            return Ok(());
        }
        self.apply_insert(offset, text, None);
        self.push_edit(TextEdit {
            kind: EditKind::Insert,
            offset,
            text: text.to_string(),
            marks: None,
        });
        Ok(())
    }

    /// Remove the chars in `start..end`.
    pub fn remove(&mut self, start: usize, end: usize) -> Result<(), MarkError> {
        self.check_offset(end)?;
        if start > end {
            return Err(MarkError::OffsetOutOfRange {
                offset: start,
                len: self.len_chars(),
            });
        }
        if start == end {
            return Ok(());
        }
        let text = self.rope.slice(start..end).to_string();
        let marks = self.apply_remove(start, end - start);
        self.push_edit(TextEdit {
            kind: EditKind::Remove,
            offset: start,
            text,
            marks,
        });
        Ok(())
    }

    fn push_edit(&mut self, edit: TextEdit) {
        self.redo_stack.clear();
        self.undo_stack.push(edit);
    }

    fn apply_insert(&mut self, offset: usize, text: &str, marks: Option<MarkUndo>) {
        self.rope.insert(offset, text);
        self.marks
            .insert_update(offset, text.chars().count(), marks);
    }

    fn apply_remove(&mut self, offset: usize, len: usize) -> Option<MarkUndo> {
        self.rope.remove(offset..offset + len);
        self.marks.remove_update(offset, len)
    }

    /// Whether there is an edit to undo.
    pub fn can_undo(&self) -> bool {
        !self.undo_stack.is_empty()
    }

    /// Whether there is an undone edit to redo.
    pub fn can_redo(&self) -> bool {
        !self.redo_stack.is_empty()
    }

    /// Revert the most recent edit. Returns `false` if there was nothing to undo.
    pub fn undo(&mut self) -> bool {
        let Some(mut edit) = self.undo_stack.pop() else {
            return false;
        };
        match edit.kind {
            EditKind::Insert => {
                edit.marks = self.apply_remove(edit.offset, edit.char_len());
            }
            EditKind::Remove => {
                let marks = edit.marks.take();
                self.apply_insert(edit.offset, &edit.text, marks);
            }
        }
        self.redo_stack.push(edit);
        true
    }

    /// Re-apply the most recently undone edit. Returns `false` if there was nothing to redo.
    pub fn redo(&mut self) -> bool {
        let Some(mut edit) = self.redo_stack.pop() else {
            return false;
        };
        match edit.kind {
            EditKind::Insert => {
                let marks = edit.marks.take();
                self.apply_insert(edit.offset, &edit.text, marks);
            }
            EditKind::Remove => {
                edit.marks = self.apply_remove(edit.offset, edit.char_len());
            }
        }
        self.undo_stack.push(edit);
        true
    }
}

impl std::fmt::Debug for Document {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Document")
            .field("len_chars", &self.len_chars())
            .field("marks", &self.marks)
            .field("undo_depth", &self.undo_stack.len())
            .field("redo_depth", &self.redo_stack.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_offsets_are_rejected() {
        let mut doc = Document::new("hello");
        assert_eq!(
            doc.insert(6, "x"),
            Err(MarkError::OffsetOutOfRange { offset: 6, len: 5 })
        );
        assert!(doc.remove(3, 9).is_err());
        assert_eq!(
            doc.remove(4, 2),
            Err(MarkError::OffsetOutOfRange { offset: 4, len: 5 })
        );
        assert!(doc.create_position(6, Bias::Forward).is_err());
        assert_eq!(doc.text(), "hello");
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_empty_edits_are_not_recorded() {
        let mut doc = Document::new("hello");
        doc.insert(2, "").unwrap();
        doc.remove(3, 3).unwrap();
        assert!(!doc.can_undo());
    }

    #[test]
    fn test_chars_not_bytes() {
        let mut doc = Document::new("héllo");
        let mark = doc.create_mark(3, Bias::Backward).unwrap();
        doc.insert(0, "你好").unwrap();
        assert_eq!(mark.offset().unwrap(), 5);
        assert_eq!(doc.len_chars(), 7);
    }

    #[test]
    fn test_new_edit_clears_redo() {
        let mut doc = Document::new("abc");
        doc.insert(3, "d").unwrap();
        assert!(doc.undo());
        assert!(doc.can_redo());
        doc.insert(0, "x").unwrap();
        assert!(!doc.can_redo());
        assert!(!doc.redo());
        assert_eq!(doc.text(), "xabc");
    }
}
