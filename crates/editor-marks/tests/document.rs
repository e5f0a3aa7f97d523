use editor_marks::{Bias, Document, MarkError};
use pretty_assertions::assert_eq;

#[test]
fn test_cursor_survives_typing_before_it() {
    let mut doc = Document::new("fn main() {}\n");
    let body = doc.create_position(11, Bias::Backward).unwrap();

    doc.insert(0, "pub ").unwrap();
    assert_eq!(doc.text(), "pub fn main() {}\n");
    assert_eq!(body.offset(), 15);

    doc.remove(0, 4).unwrap();
    assert_eq!(body.offset(), 11);
}

#[test]
fn test_bias_decides_side_of_insertion() {
    let mut doc = Document::new("ab");
    let left = doc.create_position(1, Bias::Backward).unwrap();
    let right = doc.create_position(1, Bias::Forward).unwrap();

    doc.insert(1, "XYZ").unwrap();
    assert_eq!(doc.text(), "aXYZb");
    assert_eq!(left.offset(), 1);
    assert_eq!(right.offset(), 4);
}

#[test]
fn test_undo_removal_restores_positions() {
    let mut doc = Document::new("0123456789");
    let positions: Vec<_> = [2, 4, 6, 8]
        .into_iter()
        .map(|offset| doc.create_position(offset, Bias::Forward).unwrap())
        .collect();

    doc.remove(3, 7).unwrap();
    assert_eq!(doc.text(), "012789");
    let collapsed: Vec<_> = positions.iter().map(|p| p.offset()).collect();
    assert_eq!(collapsed, vec![2, 3, 3, 4]);

    assert!(doc.undo());
    assert_eq!(doc.text(), "0123456789");
    let restored: Vec<_> = positions.iter().map(|p| p.offset()).collect();
    assert_eq!(restored, vec![2, 4, 6, 8]);

    assert!(doc.redo());
    let collapsed_again: Vec<_> = positions.iter().map(|p| p.offset()).collect();
    assert_eq!(collapsed_again, vec![2, 3, 3, 4]);
}

#[test]
fn test_redo_insertion_restores_marks_inside_it() {
    let mut doc = Document::new("ac");
    doc.insert(1, "bbbb").unwrap();
    let inside = doc.create_position(3, Bias::Backward).unwrap();

    assert!(doc.undo());
    assert_eq!(doc.text(), "ac");
    assert_eq!(inside.offset(), 1);

    assert!(doc.redo());
    assert_eq!(doc.text(), "abbbbc");
    assert_eq!(inside.offset(), 3);
}

#[test]
fn test_compatible_position_pins_to_start() {
    let mut doc = Document::new("hello world");
    let start = doc.create_compatible_position(0).unwrap();
    let word = doc.create_compatible_position(6).unwrap();

    doc.insert(0, "> ").unwrap();
    assert_eq!(start.offset(), 0);
    assert_eq!(word.offset(), 8);

    doc.remove(0, 8).unwrap();
    assert_eq!(word.offset(), 0);
    doc.insert(0, "big ").unwrap();
    assert_eq!(doc.text(), "big world");
    assert_eq!(word.offset(), 0);

    assert!(doc.undo());
    assert!(doc.undo());
    assert_eq!(doc.text(), "> hello world");
    assert_eq!(word.offset(), 8);
}

#[test]
fn test_dropped_positions_are_released() {
    let doc = Document::new("abcdef");
    let keep = doc.create_position(2, Bias::Forward).unwrap();
    for offset in 0..=6 {
        let _temp = doc.create_position(offset, Bias::Backward).unwrap();
    }
    assert_eq!(doc.marks().valid_mark_count(), 1);
    doc.marks().remove_disposed_marks();
    assert_eq!(doc.marks().mark_count(), 1);
    assert_eq!(keep.offset(), 2);
}

#[test]
fn test_explicit_marks_need_dispose() {
    let mut doc = Document::new("abc");
    let mark = doc.create_mark(1, Bias::Forward).unwrap();
    doc.insert(0, "z").unwrap();
    assert_eq!(mark.offset(), Ok(2));
    mark.dispose().unwrap();
    assert_eq!(mark.offset(), Err(MarkError::Disposed));
    assert_eq!(doc.marks().valid_mark_count(), 0);
}
