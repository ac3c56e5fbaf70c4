//! One-shot background lexing for full reloads.
//!
//! At most one worker exists per document. The foreground joins it before
//! touching the buffer, so the worker only ever sees its own copy of the
//! lines and never races with an edit.

use std::sync::Arc;
use std::thread::{self, JoinHandle};

use tracing::{debug, warn};

use crate::lexer::{LexedLine, LanguageProfile, LineLexer};

#[derive(Debug, Default)]
pub struct ReloadWorker {
    handle: Option<JoinHandle<Vec<LexedLine>>>,
}

impl ReloadWorker {
    /// Start lexing `lines` on a background thread.
    pub fn spawn(profile: Arc<LanguageProfile>, lines: Vec<String>) -> Self {
        let handle = thread::spawn(move || {
            let lexer = LineLexer::new(&profile);
            lexer.lex_all(lines.iter().map(String::as_str))
        });
        Self {
            handle: Some(handle),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.handle.is_some()
    }

    /// Wait for the outstanding job. `None` when nothing was outstanding or
    /// the job panicked.
    pub fn join(&mut self) -> Option<Vec<LexedLine>> {
        let handle = self.handle.take()?;
        match handle.join() {
            Ok(lexed) => {
                debug!(lines = lexed.len(), "reload worker joined");
                Some(lexed)
            }
            Err(_) => {
                warn!("reload worker panicked, falling back to foreground lexing");
                None
            }
        }
    }
}
