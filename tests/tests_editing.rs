//! Editing Tests - splices, notifications, caret, load/save
#![allow(clippy::unwrap_used)]

#[path = "helpers/mod.rs"]
mod helpers;

use helpers::fixtures::{CSHARP_CLASS, PLAIN_LINES};
use helpers::store::{MemoryStore, RecordingView, ViewEvent};
use helpers::{csharp_document, token_pairs};
use relex::buffer::LeafPosition;
use relex::{CaretMove, DocumentError, EditError, LineEnding, Position, TokenKind, UndoAction};

// ============================================================================
// Splices
// ============================================================================

#[test]
fn test_insert_returns_end_position() {
    let mut doc = csharp_document("hello");
    assert_eq!(doc.insert_text(Position::new(0, 5), " world").unwrap(), Position::new(0, 11));
    assert_eq!(doc.insert_text(Position::new(0, 0), "a\nb\n").unwrap(), Position::new(2, 0));
    assert_eq!(doc.text(), "a\nb\nhello world");
    assert_eq!(doc.caret().position, Position::new(2, 0));
}

#[test]
fn test_delete_spanning_three_lines() {
    let mut doc = csharp_document(PLAIN_LINES);
    let view = RecordingView::default();
    doc.set_view(Box::new(view.clone()));
    view.take();

    let at = doc.delete_text(Position::new(3, 2), Position::new(1, 1)).unwrap();
    assert_eq!(at, Position::new(1, 1));
    assert_eq!(doc.text(), "alpha\nblta\nepsilon");
    assert_eq!(doc.line_count(), 3);
    assert_eq!(doc.buffer().info(2).map(|i| i.stamps.change), Some(0));

    let removed: Vec<_> = view
        .take()
        .into_iter()
        .filter(|e| matches!(e, ViewEvent::Removed(..)))
        .collect();
    assert_eq!(removed, vec![ViewEvent::Removed(2, 2)]);
}

#[test]
fn test_insert_notifies_inserted_lines() {
    let mut doc = csharp_document(PLAIN_LINES);
    let view = RecordingView::default();
    doc.set_view(Box::new(view.clone()));
    view.take();

    doc.insert_text(Position::new(1, 2), "X\nY\nZ").unwrap();
    let events = view.take();
    assert_eq!(events[0], ViewEvent::Inserted(2, 2));
    assert!(events.contains(&ViewEvent::Formatted(1)));
}

#[test]
fn test_zero_width_delete_is_noop() {
    let mut doc = csharp_document("abc");
    let at = doc.delete_text(Position::new(0, 1), Position::new(0, 1)).unwrap();
    assert_eq!(at, Position::new(0, 1));
    assert!(doc.undo_log().is_empty());
    assert!(!doc.is_modified());
}

#[test]
fn test_out_of_range_rejected_before_mutation() {
    let mut doc = csharp_document("abc\nde");
    assert_eq!(
        doc.insert_text(Position::new(5, 0), "x"),
        Err(EditError::InvalidLine { line: 5, line_count: 2 })
    );
    assert_eq!(
        doc.delete_text(Position::new(0, 0), Position::new(1, 9)),
        Err(EditError::InvalidIndex { line: 1, index: 9, len: 2 })
    );
    assert_eq!(doc.text(), "abc\nde");
    assert!(doc.undo_log().is_empty());
}

#[test]
fn test_crlf_text_is_split_into_lines() {
    let mut doc = csharp_document("");
    doc.insert_text(Position::new(0, 0), "a\r\nb").unwrap();
    assert_eq!(doc.line(0), Some("a"));
    assert_eq!(doc.line(1), Some("b"));
}

#[test]
fn test_replace_selection_by_typing() {
    let mut doc = csharp_document("int value = 1;");
    doc.select(Position::new(0, 4), Position::new(0, 9)).unwrap();
    doc.type_text("count").unwrap();
    assert_eq!(doc.text(), "int count = 1;");
    assert_eq!(doc.undo_log().len(), 1);
    assert!(doc.undo());
    assert_eq!(doc.text(), "int value = 1;");
}

#[test]
fn test_cut_returns_selection_as_one_record() {
    let mut doc = csharp_document("int a;\nint b;\nint c;");
    doc.select(Position::new(0, 4), Position::new(2, 4)).unwrap();

    assert_eq!(doc.cut().unwrap().as_deref(), Some("a;\nint b;\nint "));
    assert_eq!(doc.text(), "int c;");
    assert_eq!(doc.caret().position, Position::new(0, 4));
    assert!(!doc.caret().has_selection());
    assert_eq!(doc.undo_log().len(), 1);
    assert_eq!(doc.undo_log().records()[0].action, UndoAction::Cut);

    assert!(doc.undo());
    assert_eq!(doc.text(), "int a;\nint b;\nint c;");
}

#[test]
fn test_cut_without_selection_records_nothing() {
    let mut doc = csharp_document("abc");
    doc.set_caret(Position::new(0, 1)).unwrap();
    assert_eq!(doc.cut(), Ok(None));
    assert!(doc.undo_log().is_empty());
}

#[test]
fn test_backspace_joins_lines() {
    let mut doc = csharp_document("ab\ncd");
    doc.set_caret(Position::new(1, 0)).unwrap();
    doc.backspace().unwrap();
    assert_eq!(doc.text(), "abcd");
    assert_eq!(doc.caret().position, Position::new(0, 2));
}

// ============================================================================
// Tokens and leaves stay consistent
// ============================================================================

fn assert_leaves_consistent(doc: &mut relex::Document<helpers::engine::RecordingEngine>) {
    let buffer = doc.buffer();
    for line in 0..buffer.line_count() {
        for (index, token) in buffer.tokens(line).iter().enumerate() {
            if let Some(id) = token.leaf {
                assert_eq!(
                    buffer.leaves().get(id),
                    Some(LeafPosition::new(line, index)),
                    "leaf of {:?} at {line}:{index}",
                    token.text
                );
            }
        }
    }
}

#[test]
fn test_leaves_follow_edits() {
    let mut doc = csharp_document(CSHARP_CLASS);
    assert_leaves_consistent(&mut doc);

    doc.insert_text(Position::new(2, 0), "\n\n").unwrap();
    assert_leaves_consistent(&mut doc);
    doc.finish_analysis();
    assert_leaves_consistent(&mut doc);

    doc.delete_text(Position::new(1, 0), Position::new(5, 0)).unwrap();
    doc.finish_analysis();
    assert_leaves_consistent(&mut doc);
    assert_eq!(doc.resync_leaves(), 0);
}

#[test]
fn test_line_tokens_reproduce_text_after_edits() {
    let mut doc = csharp_document(CSHARP_CLASS);
    doc.insert_text(Position::new(4, 4), "/* ").unwrap();
    doc.insert_text(Position::new(9, 0), "@\"raw\nstill").unwrap();
    for line in 0..doc.line_count() {
        let joined: String = doc.tokens(line).iter().map(|t| t.text.as_str()).collect();
        assert_eq!(joined, doc.line(line).unwrap());
    }
}

#[test]
fn test_fixture_classification() {
    let mut doc = csharp_document(CSHARP_CLASS);
    let field = token_pairs(&mut doc, 8);
    assert!(field.contains(&(TokenKind::Keyword, "private".to_string())));
    assert!(field.contains(&(TokenKind::IntegerLiteral, "0x1Fu".to_string())));
    let property = token_pairs(&mut doc, 9);
    assert!(property.contains(&(TokenKind::VerbatimStringLiteral, "@\"".to_string())));
    assert!(property.contains(&(
        TokenKind::VerbatimStringLiteral,
        "verbatim \"\"quoted\"\"\"".to_string()
    )));
    assert_eq!(doc.buffer().block_state(9), relex::BlockState::Plain);
    let method = token_pairs(&mut doc, 11);
    assert!(method.contains(&(TokenKind::RealLiteral, "2.5e3".to_string())));
}

// ============================================================================
// Caret
// ============================================================================

#[test]
fn test_word_moves() {
    let mut doc = csharp_document("int x1 = 3.25;");
    doc.set_caret(Position::new(0, 0)).unwrap();
    doc.move_caret(CaretMove::WordRight, false);
    assert_eq!(doc.caret().position, Position::new(0, 3));
    doc.set_caret(Position::new(0, 9)).unwrap();
    doc.move_caret(CaretMove::WordRight, false);
    assert_eq!(doc.caret().position, Position::new(0, 13));
    doc.move_caret(CaretMove::WordLeft, true);
    assert_eq!(doc.caret().selection(), Some((Position::new(0, 9), Position::new(0, 13))));
}

// ============================================================================
// Load and save
// ============================================================================

#[test]
fn test_load_and_save_round_trip_line_endings() {
    let mut store = MemoryStore::with_text("a\r\nb\r\nc");
    let mut doc = csharp_document("");
    doc.load(&mut store).unwrap();
    assert_eq!(doc.line_ending(), LineEnding::CrLf);
    assert_eq!(doc.line_count(), 3);

    doc.insert_text(Position::new(1, 1), "!").unwrap();
    assert!(doc.is_modified());
    assert!(doc.buffer().is_modified_line(1));

    doc.save(&mut store).unwrap();
    assert_eq!(store.text, "a\r\nb!\r\nc");
    assert!(!doc.is_modified());
    assert!(!doc.buffer().is_modified_line(1));
}

#[test]
fn test_load_failure_leaves_empty_document() {
    let mut store = MemoryStore {
        fail_load: true,
        ..MemoryStore::default()
    };
    let mut doc = csharp_document("previous content");
    let err = doc.load(&mut store).unwrap_err();
    assert!(matches!(err, DocumentError::Load(_)));
    assert_eq!(doc.line_count(), 1);
    assert_eq!(doc.text(), "");

    doc.insert_text(Position::new(0, 0), "usable").unwrap();
    assert_eq!(doc.text(), "usable");
}

#[test]
fn test_save_failure_keeps_state() {
    let mut store = MemoryStore {
        fail_save: true,
        ..MemoryStore::default()
    };
    let mut doc = csharp_document("x");
    doc.insert_text(Position::new(0, 1), "y").unwrap();
    let stamps = doc.buffer().stamps(0);

    assert!(matches!(doc.save(&mut store), Err(DocumentError::Save(_))));
    assert!(doc.is_modified());
    assert_eq!(doc.buffer().stamps(0), stamps);
    assert_eq!(store.saves, 0);
}
