//! Document facade tying the buffer, undo log and reanalysis together.
//!
//! Every mutating call first joins an outstanding reload worker, then cancels
//! any in-flight parse continuation before touching the buffer. Reanalysis
//! runs when the outermost edit bracket closes.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::analysis::{GrammarEngine, ReanalysisDriver, ReanalysisReport, ReloadWorker, Step};
use crate::base::{Position, TabStops};
use crate::buffer::{
    BufferEvent, Caret, CaretMove, EditOperation, TextBuffer, UndoAction, UndoLog, normalize_newlines,
};
use crate::config::EngineConfig;
use crate::error::{DocumentError, EditError};
use crate::lexer::{LanguageProfile, Token};
use crate::persistence::{LineEnding, LoadedText, Persistence};
use crate::view::{NullView, ViewObserver};

pub struct Document<E: GrammarEngine> {
    config: EngineConfig,
    tabs: TabStops,
    buffer: TextBuffer,
    undo: UndoLog,
    driver: ReanalysisDriver<E>,
    caret: Caret,
    worker: ReloadWorker,
    view: Box<dyn ViewObserver>,
    line_ending: LineEnding,
    last_report: Option<ReanalysisReport>,
}

impl<E: GrammarEngine> Document<E> {
    /// An empty document (one empty line), fully analyzed.
    pub fn new(profile: Arc<LanguageProfile>, engine: E, config: EngineConfig) -> Self {
        let mut document = Self {
            tabs: config.tab_stops(),
            undo: UndoLog::new(config.coalesce_typing),
            driver: ReanalysisDriver::new(engine, profile, config.lines_per_tick),
            config,
            buffer: TextBuffer::new(),
            caret: Caret::default(),
            worker: ReloadWorker::default(),
            view: Box::new(NullView),
            line_ending: LineEnding::default(),
            last_report: None,
        };
        document.driver.analyze_all(&mut document.buffer, document.view.as_mut());
        document
    }

    /// A document holding `text`, fully analyzed.
    pub fn with_text(profile: Arc<LanguageProfile>, engine: E, config: EngineConfig, text: &str) -> Self {
        let mut document = Self::new(profile, engine, config);
        document.set_text(text);
        document
    }

    pub fn set_view(&mut self, view: Box<dyn ViewObserver>) {
        self.view = view;
        self.view.refresh_needed();
    }

    // ── Accessors ───────────────────────────────────────────────────
    //
    // Readers of lexer or parser output join the reload worker first, so they
    // take `&mut self`. Line text is installed synchronously and needs no join.

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn buffer(&mut self) -> &TextBuffer {
        self.wait_for_reload();
        &self.buffer
    }

    pub fn text(&self) -> String {
        self.buffer.text()
    }

    pub fn line_count(&self) -> usize {
        self.buffer.line_count()
    }

    pub fn line(&self, line: usize) -> Option<&str> {
        self.buffer.line(line)
    }

    pub fn tokens(&mut self, line: usize) -> &[Token] {
        self.wait_for_reload();
        self.buffer.tokens(line)
    }

    pub fn caret(&self) -> Caret {
        self.caret
    }

    pub fn undo_log(&self) -> &UndoLog {
        &self.undo
    }

    pub fn engine(&mut self) -> &E {
        self.wait_for_reload();
        self.driver.engine()
    }

    pub fn engine_mut(&mut self) -> &mut E {
        self.wait_for_reload();
        self.driver.engine_mut()
    }

    pub fn profile(&self) -> &Arc<LanguageProfile> {
        self.driver.profile()
    }

    pub fn line_ending(&self) -> LineEnding {
        self.line_ending
    }

    pub fn set_line_ending(&mut self, line_ending: LineEnding) {
        self.line_ending = line_ending;
    }

    /// Report of the most recent incremental reanalysis.
    pub fn last_report(&mut self) -> Option<ReanalysisReport> {
        self.wait_for_reload();
        self.last_report
    }

    pub fn is_modified(&self) -> bool {
        self.undo.is_modified()
    }

    /// A reload is still lexing in the background or a continuation is pending.
    pub fn is_analysis_pending(&self) -> bool {
        self.worker.is_pending() || self.driver.is_pending()
    }

    // ── Background work ─────────────────────────────────────────────

    /// Join the reload worker, if one is outstanding, and install its result.
    pub fn wait_for_reload(&mut self) {
        if !self.worker.is_pending() {
            return;
        }
        match self.worker.join() {
            Some(lexed) => self.driver.install(&mut self.buffer, lexed, self.view.as_mut()),
            None => self.driver.analyze_all(&mut self.buffer, self.view.as_mut()),
        }
        self.view.refresh_needed();
    }

    /// Advance the parse continuation by one bounded step.
    pub fn idle_tick(&mut self) -> Step {
        self.wait_for_reload();
        self.driver.idle_tick(&mut self.buffer)
    }

    /// Run all pending analysis to completion.
    pub fn finish_analysis(&mut self) {
        self.wait_for_reload();
        self.driver.finish(&mut self.buffer);
    }

    /// Switch language profile and re-analyze everything.
    pub fn set_profile(&mut self, profile: Arc<LanguageProfile>) {
        self.wait_for_reload();
        self.driver.set_profile(profile);
        self.driver.analyze_all(&mut self.buffer, self.view.as_mut());
        self.view.refresh_needed();
    }

    /// Correct token ↔ leaf drift. Returns the number of corrections.
    pub fn resync_leaves(&mut self) -> usize {
        self.wait_for_reload();
        self.buffer.resync_leaves()
    }

    // ── Loading and saving ──────────────────────────────────────────

    /// Replace the content, dropping history. Large documents are lexed on
    /// the reload worker.
    pub fn set_text(&mut self, text: &str) {
        self.reload(LoadedText::from_text(text).lines);
    }

    fn reload(&mut self, lines: Vec<String>) {
        self.wait_for_reload();
        self.driver.cancel();
        self.buffer.reset(lines);
        self.undo.clear();
        self.caret = Caret::default();
        self.last_report = None;

        if self.buffer.line_count() >= self.config.background_reload_threshold {
            debug!(lines = self.buffer.line_count(), "lexing reload in the background");
            let lines = self.buffer.lines().map(str::to_string).collect();
            self.worker = ReloadWorker::spawn(self.driver.profile().clone(), lines);
        } else {
            self.driver.analyze_all(&mut self.buffer, self.view.as_mut());
        }
        self.view.refresh_needed();
    }

    /// Load content from `store`. On failure the document is left as a single
    /// empty line and remains usable.
    pub fn load(&mut self, store: &mut dyn Persistence) -> Result<(), DocumentError> {
        self.wait_for_reload();
        match store.load() {
            Ok(loaded) => {
                self.line_ending = loaded.line_ending;
                self.reload(loaded.lines);
                Ok(())
            }
            Err(err) => {
                warn!(error = %err, "load failed, starting with an empty document");
                self.reload(Vec::new());
                Err(DocumentError::Load(err))
            }
        }
    }

    /// Hand the lines to `store`. Stamps and the save marker only move when
    /// the store reports success.
    pub fn save(&mut self, store: &mut dyn Persistence) -> Result<(), DocumentError> {
        self.wait_for_reload();
        let lines: Vec<&str> = self.buffer.lines().collect();
        store
            .save(&lines, self.line_ending)
            .map_err(DocumentError::Save)?;
        self.buffer.mark_saved();
        self.undo.mark_saved();
        Ok(())
    }

    // ── Editing ─────────────────────────────────────────────────────

    /// Open an edit bracket. Edits until the matching [`end_edit`](Self::end_edit)
    /// undo as one action.
    pub fn begin_edit(&mut self, action: UndoAction) {
        self.wait_for_reload();
        self.driver.cancel();
        self.undo.begin_edit(action, self.caret);
    }

    /// Close an edit bracket; the outermost close triggers reanalysis.
    pub fn end_edit(&mut self) {
        self.wait_for_reload();
        if self.undo.end_edit(self.caret) {
            self.reanalyze();
        }
    }

    /// Insert `text` at `position`. Returns the position after the text.
    pub fn insert_text(&mut self, position: Position, text: &str) -> Result<Position, EditError> {
        self.wait_for_reload();
        self.buffer.validate(position)?;
        let text = normalize_newlines(text);
        if text.is_empty() {
            return Ok(position);
        }
        let action = if text.chars().count() == 1 {
            UndoAction::Typing
        } else {
            UndoAction::Paste
        };

        self.begin_edit(action);
        let stamp = self.buffer.next_stamp();
        self.undo
            .record(EditOperation::insertion(&self.buffer, position, &text, stamp));
        let end = self.buffer.splice_insert(position, &text, stamp);
        self.caret = Caret::place(&self.buffer, self.tabs, end);
        self.end_edit();
        Ok(end)
    }

    /// Delete between two positions in either order. Returns the start of
    /// the deleted range. An empty range changes nothing.
    pub fn delete_text(&mut self, from: Position, to: Position) -> Result<Position, EditError> {
        self.wait_for_reload();
        self.buffer.validate(from)?;
        self.buffer.validate(to)?;
        let (from, to) = Position::ordered(from, to);
        if from == to {
            return Ok(from);
        }

        self.begin_edit(UndoAction::Delete);
        let stamp = self.buffer.next_stamp();
        self.undo
            .record(EditOperation::deletion(&self.buffer, from, to, stamp));
        self.buffer.splice_delete(from, to, stamp);
        self.caret = Caret::place(&self.buffer, self.tabs, from);
        self.end_edit();
        Ok(from)
    }

    /// Replace a range with `text` as one undoable action.
    pub fn replace_text(&mut self, from: Position, to: Position, text: &str) -> Result<Position, EditError> {
        self.wait_for_reload();
        self.buffer.validate(from)?;
        self.buffer.validate(to)?;
        self.begin_edit(UndoAction::Replace);
        let result = self
            .delete_text(from, to)
            .and_then(|start| self.insert_text(start, text));
        self.end_edit();
        result
    }

    /// Type `text` at the caret, replacing the selection if there is one.
    pub fn type_text(&mut self, text: &str) -> Result<Position, EditError> {
        match self.caret.selection() {
            Some((from, to)) => self.replace_text(from, to, text),
            None => self.insert_text(self.caret.position, text),
        }
    }

    /// Delete the selection, or the character before the caret.
    pub fn backspace(&mut self) -> Result<Position, EditError> {
        if let Some((from, to)) = self.caret.selection() {
            return self.delete_text(from, to);
        }
        let to = self.caret.position;
        let from = self
            .caret
            .moved(&self.buffer, self.tabs, CaretMove::Left, false)
            .position;
        self.delete_text(from, to)
    }

    /// Delete the selection and return its text. Nothing is recorded when
    /// the selection is empty.
    pub fn cut(&mut self) -> Result<Option<String>, EditError> {
        let Some((from, to)) = self.caret.selection() else {
            return Ok(None);
        };
        self.wait_for_reload();
        self.buffer.validate(from)?;
        self.buffer.validate(to)?;
        let removed = self.buffer.text_range(from, to);
        self.begin_edit(UndoAction::Cut);
        let result = self.delete_text(from, to);
        self.end_edit();
        result.map(|_| Some(removed))
    }

    pub fn undo(&mut self) -> bool {
        self.wait_for_reload();
        self.driver.cancel();
        match self.undo.undo(&mut self.buffer) {
            Some(caret) => {
                self.caret = caret;
                self.reanalyze();
                true
            }
            None => false,
        }
    }

    pub fn redo(&mut self) -> bool {
        self.wait_for_reload();
        self.driver.cancel();
        match self.undo.redo(&mut self.buffer) {
            Some(caret) => {
                self.caret = caret;
                self.reanalyze();
                true
            }
            None => false,
        }
    }

    // ── Caret ───────────────────────────────────────────────────────

    pub fn set_caret(&mut self, position: Position) -> Result<(), EditError> {
        self.buffer.validate(position)?;
        self.caret = Caret::place(&self.buffer, self.tabs, position);
        self.undo.break_coalescing();
        Ok(())
    }

    /// Select from `anchor` to `position`, leaving the caret at `position`.
    pub fn select(&mut self, anchor: Position, position: Position) -> Result<(), EditError> {
        self.buffer.validate(anchor)?;
        self.set_caret(position)?;
        self.caret.anchor = Some(anchor);
        Ok(())
    }

    pub fn move_caret(&mut self, movement: CaretMove, select: bool) {
        self.caret = self.caret.moved(&self.buffer, self.tabs, movement, select);
        self.undo.break_coalescing();
    }

    // ── Internals ───────────────────────────────────────────────────

    fn reanalyze(&mut self) {
        for event in self.buffer.drain_events() {
            match event {
                BufferEvent::LinesInserted { index, count } => self.view.lines_inserted(index, count),
                BufferEvent::LinesRemoved { index, count } => self.view.lines_removed(index, count),
            }
        }
        if let Some(range) = self.buffer.take_dirty() {
            let report = self.driver.reanalyze(&mut self.buffer, range, self.view.as_mut());
            self.last_report = Some(report);
        }
    }
}
