//! In-memory persistence and view doubles.

use std::cell::RefCell;
use std::io;
use std::rc::Rc;

use relex::{LineEnding, LoadedText, Persistence, Token, ViewObserver};

/// Persistence backed by a string; can be told to fail.
#[derive(Debug, Default)]
pub struct MemoryStore {
    pub text: String,
    pub fail_load: bool,
    pub fail_save: bool,
    pub saves: usize,
}

impl MemoryStore {
    pub fn with_text(text: &str) -> Self {
        Self {
            text: text.to_string(),
            ..Self::default()
        }
    }
}

impl Persistence for MemoryStore {
    fn load(&mut self) -> io::Result<LoadedText> {
        if self.fail_load {
            return Err(io::Error::new(io::ErrorKind::NotFound, "no such document"));
        }
        Ok(LoadedText::from_text(&self.text))
    }

    fn save(&mut self, lines: &[&str], line_ending: LineEnding) -> io::Result<()> {
        if self.fail_save {
            return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
        }
        self.text = line_ending.join(lines);
        self.saves += 1;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Formatted(usize),
    Inserted(usize, usize),
    Removed(usize, usize),
    Refresh,
}

/// View that logs notifications into a shared vector.
#[derive(Debug, Clone, Default)]
pub struct RecordingView {
    pub events: Rc<RefCell<Vec<ViewEvent>>>,
}

impl RecordingView {
    pub fn take(&self) -> Vec<ViewEvent> {
        std::mem::take(&mut self.events.borrow_mut())
    }
}

impl ViewObserver for RecordingView {
    fn line_formatted(&mut self, line: usize, _tokens: &[Token]) {
        self.events.borrow_mut().push(ViewEvent::Formatted(line));
    }

    fn lines_inserted(&mut self, index: usize, count: usize) {
        self.events.borrow_mut().push(ViewEvent::Inserted(index, count));
    }

    fn lines_removed(&mut self, index: usize, count: usize) {
        self.events.borrow_mut().push(ViewEvent::Removed(index, count));
    }

    fn refresh_needed(&mut self) {
        self.events.borrow_mut().push(ViewEvent::Refresh);
    }
}
