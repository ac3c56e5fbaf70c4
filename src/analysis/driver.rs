//! Incremental reanalysis after an edit.
//!
//! For a dirty line range the driver:
//! 1. cuts the parse tree after the last clean leaf before the restart line
//!    (skipped for pure appends at the end of the document);
//! 2. re-lexes from the first dirty line with the state carried from above;
//! 3. records each re-lexed line's lookahead distance;
//! 4. keeps re-lexing past the range until a line's outgoing state matches
//!    its previous value (the stability fixpoint);
//! 5. notifies the engine about tokens below the fixpoint whose lexing
//!    window reached into the edit;
//! 6. stores a [`Continuation`] that re-parses from the restart line on
//!    later idle ticks.

use std::sync::Arc;

use tracing::{debug, trace, warn};

use super::continuation::{Continuation, Step};
use super::engine::GrammarEngine;
use crate::buffer::{DirtyRange, TextBuffer};
use crate::lexer::{BlockState, LexedLine, LanguageProfile, LineLexer};
use crate::view::ViewObserver;

/// What one reanalysis pass touched.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReanalysisReport {
    pub first_relexed: usize,
    pub last_relexed: usize,
    /// Re-lexing stopped because a line's outgoing state was unchanged
    /// (as opposed to running into the end of the document)
    pub reached_fixpoint: bool,
    /// Line the tree was cut and the continuation starts at, `None` for appends
    pub tree_cut: Option<usize>,
    /// Lines below the fixpoint whose tokens were handed to `reparse_token`
    pub reattached_lines: usize,
}

/// Lookahead distance of `line` given the state it starts in.
fn lookahead_of(buffer: &TextBuffer, line: usize, incoming: BlockState) -> usize {
    match (incoming, line) {
        (BlockState::Plain, _) | (_, 0) => 0,
        (_, line) => buffer.info(line - 1).map_or(0, |info| info.lookahead) + 1,
    }
}

pub struct ReanalysisDriver<E: GrammarEngine> {
    engine: E,
    profile: Arc<LanguageProfile>,
    continuation: Option<Continuation<E::Cursor>>,
    lines_per_tick: usize,
}

impl<E: GrammarEngine> ReanalysisDriver<E> {
    pub fn new(engine: E, profile: Arc<LanguageProfile>, lines_per_tick: usize) -> Self {
        Self {
            engine,
            profile,
            continuation: None,
            lines_per_tick: lines_per_tick.max(1),
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn engine_mut(&mut self) -> &mut E {
        &mut self.engine
    }

    pub fn profile(&self) -> &Arc<LanguageProfile> {
        &self.profile
    }

    pub fn set_profile(&mut self, profile: Arc<LanguageProfile>) {
        self.profile = profile;
    }

    pub fn continuation(&self) -> Option<&Continuation<E::Cursor>> {
        self.continuation.as_ref()
    }

    pub fn is_pending(&self) -> bool {
        self.continuation.is_some()
    }

    /// Drop any in-flight continuation.
    pub fn cancel(&mut self) {
        if let Some(continuation) = self.continuation.take() {
            debug!(
                start = continuation.start_line(),
                next = continuation.next_line(),
                "continuation cancelled"
            );
        }
    }

    /// Lex and parse the whole document from scratch.
    pub fn analyze_all(&mut self, buffer: &mut TextBuffer, view: &mut dyn ViewObserver) {
        self.cancel();
        let lexer = LineLexer::new(&self.profile);
        let lexed = lexer.lex_all(buffer.lines());
        self.install(buffer, lexed, view);
    }

    /// Install a whole-document lexing result (from the reload worker or
    /// [`analyze_all`](Self::analyze_all)) and run the full parse.
    pub fn install(&mut self, buffer: &mut TextBuffer, lexed: Vec<LexedLine>, view: &mut dyn ViewObserver) {
        self.cancel();
        if lexed.len() != buffer.line_count() {
            warn!(
                lexed = lexed.len(),
                lines = buffer.line_count(),
                "lexing result does not match the buffer, relexing"
            );
            let lexer = LineLexer::new(&self.profile);
            let fresh = lexer.lex_all(buffer.lines());
            return self.install(buffer, fresh, view);
        }
        for (line, lexed) in lexed.into_iter().enumerate() {
            let lookahead = lookahead_of(buffer, line, buffer.incoming_state(line));
            buffer.set_lexed(line, lexed, lookahead);
            view.line_formatted(line, buffer.tokens(line));
        }
        buffer.take_dirty();
        self.engine.parse_document(buffer);
        debug!(lines = buffer.line_count(), "full analysis installed");
    }

    /// Reanalyze after an edit touching `range`.
    pub fn reanalyze(
        &mut self,
        buffer: &mut TextBuffer,
        range: DirtyRange,
        view: &mut dyn ViewObserver,
    ) -> ReanalysisReport {
        self.cancel();

        let count = buffer.line_count();
        let mut first = range.first;
        if first >= count {
            warn!(line = first, lines = count, "dirty range starts past the end");
            first = count - 1;
        }
        let last = range.last.clamp(first, count - 1);

        let restart = first - buffer.info(first).map_or(0, |info| info.lookahead).min(first);
        let tree_cut = if range.append_only {
            None
        } else {
            let leaf = self.engine.last_clean_leaf_before(buffer, restart);
            self.engine.invalidate_from(buffer, leaf);
            Some(restart)
        };

        // Re-lex until the outgoing state settles past the edited lines
        let lexer = LineLexer::new(&self.profile);
        let mut line = first;
        let mut reached_fixpoint = false;
        loop {
            let incoming = buffer.incoming_state(line);
            let lookahead = lookahead_of(buffer, line, incoming);
            let lexed = lexer.lex_line(buffer.line(line).unwrap_or_default(), incoming);
            let state = lexed.state;
            let previous = buffer.set_lexed(line, lexed, lookahead);
            view.line_formatted(line, buffer.tokens(line));
            trace!(line, ?previous, ?state, "relexed");

            if line >= last && state == previous {
                reached_fixpoint = true;
                debug!(line, "relexing reached fixpoint");
                break;
            }
            if line + 1 >= count {
                break;
            }
            line += 1;
        }
        let last_relexed = line;

        let reattached_lines = if reached_fixpoint {
            self.reattach_below(buffer, last_relexed, last)
        } else {
            0
        };

        let parse_from = tree_cut.unwrap_or(first);
        let cursor = self.engine.cursor_at(buffer, parse_from);
        self.continuation = Some(Continuation::new(cursor, parse_from));
        debug!(line = parse_from, "continuation started");

        ReanalysisReport {
            first_relexed: first,
            last_relexed,
            reached_fixpoint,
            tree_cut,
            reattached_lines,
        }
    }

    /// Refresh lookahead counts below the fixpoint and tell the engine about
    /// tokens whose lexing window overlapped the edited lines.
    fn reattach_below(&mut self, buffer: &mut TextBuffer, fixpoint: usize, last_edited: usize) -> usize {
        let mut reattached = 0;
        let mut line = fixpoint + 1;
        while line < buffer.line_count() {
            let incoming = buffer.incoming_state(line);
            if incoming == BlockState::Plain {
                break;
            }
            let lookahead = lookahead_of(buffer, line, incoming);
            let Some(info) = buffer.info(line) else { break };
            let overlapped = line - info.lookahead.min(line) <= last_edited;
            let tokens = info.tokens.len();
            buffer.set_lookahead(line, lookahead);
            if overlapped {
                for token in 0..tokens {
                    self.engine.reparse_token(buffer, line, token);
                }
                reattached += 1;
            }
            line += 1;
        }
        reattached
    }

    /// Advance the continuation by one tick.
    pub fn idle_tick(&mut self, buffer: &mut TextBuffer) -> Step {
        let Some(continuation) = self.continuation.as_mut() else {
            return Step::Done;
        };
        let step = continuation.step(&mut self.engine, buffer, self.lines_per_tick);
        if step == Step::Done {
            self.continuation = None;
        }
        step
    }

    /// Run the continuation to completion.
    pub fn finish(&mut self, buffer: &mut TextBuffer) {
        while self.idle_tick(buffer) == Step::Continue {}
    }
}
