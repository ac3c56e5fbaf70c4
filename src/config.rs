//! Engine configuration.

use crate::base::{DEFAULT_TAB_SIZE, TabStops};

/// Tunables for a [`Document`](crate::document::Document).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EngineConfig {
    /// Tab stop width used by the column model
    pub tab_size: usize,
    /// Lines the syntactic continuation may consume per idle tick
    pub lines_per_tick: usize,
    /// Merge consecutive single-character typing into word-sized undo steps
    pub coalesce_typing: bool,
    /// Documents with at least this many lines are lexed on the reload worker
    pub background_reload_threshold: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            tab_size: DEFAULT_TAB_SIZE,
            lines_per_tick: 64,
            coalesce_typing: true,
            background_reload_threshold: 2000,
        }
    }
}

impl EngineConfig {
    pub fn with_tab_size(mut self, tab_size: usize) -> Self {
        self.tab_size = tab_size;
        self
    }

    pub fn with_lines_per_tick(mut self, lines: usize) -> Self {
        self.lines_per_tick = lines.max(1);
        self
    }

    pub fn with_coalesce_typing(mut self, enabled: bool) -> Self {
        self.coalesce_typing = enabled;
        self
    }

    pub fn with_background_reload_threshold(mut self, lines: usize) -> Self {
        self.background_reload_threshold = lines;
        self
    }

    pub fn tab_stops(&self) -> TabStops {
        TabStops::new(self.tab_size)
    }
}
