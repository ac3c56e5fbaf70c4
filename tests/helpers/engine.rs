//! Grammar engine double that records every call and attaches leaves to
//! non-trivia tokens.

use relex::buffer::{LeafId, TextBuffer};
use relex::{GrammarEngine, LineParse};

#[derive(Debug, Default)]
pub struct RecordingEngine {
    pub full_parses: usize,
    /// Line of the leaf each cut started after (`None` = whole tree)
    pub cuts: Vec<Option<usize>>,
    pub cursors: Vec<usize>,
    pub parsed_lines: Vec<usize>,
    pub reparsed: Vec<(usize, usize)>,
}

impl RecordingEngine {
    fn attach_line(buffer: &mut TextBuffer, line: usize) {
        let Some((tokens, leaves)) = buffer.tokens_and_leaves_mut(line) else {
            return;
        };
        for index in 0..tokens.len() {
            if !tokens[index].kind.is_trivia() {
                leaves.attach(tokens, line, index);
            }
        }
    }
}

impl GrammarEngine for RecordingEngine {
    type Cursor = usize;

    fn parse_document(&mut self, buffer: &mut TextBuffer) {
        self.full_parses += 1;
        for line in 0..buffer.line_count() {
            Self::attach_line(buffer, line);
        }
    }

    fn last_clean_leaf_before(&self, buffer: &TextBuffer, line: usize) -> Option<LeafId> {
        (0..line.min(buffer.line_count()))
            .rev()
            .find_map(|l| buffer.tokens(l).iter().rev().find_map(|t| t.leaf))
            .filter(|id| buffer.leaves().is_live(*id))
    }

    fn invalidate_from(&mut self, buffer: &TextBuffer, leaf: Option<LeafId>) {
        let line = leaf.and_then(|id| buffer.leaves().get(id)).map(|p| p.line);
        self.cuts.push(line);
    }

    fn cursor_at(&mut self, _buffer: &TextBuffer, line: usize) -> usize {
        self.cursors.push(line);
        line
    }

    fn parse_line(&mut self, cursor: &mut usize, buffer: &mut TextBuffer, line: usize) -> LineParse {
        *cursor = line + 1;
        self.parsed_lines.push(line);
        Self::attach_line(buffer, line);
        LineParse::Continue
    }

    fn reparse_token(&mut self, buffer: &mut TextBuffer, line: usize, token: usize) {
        self.reparsed.push((line, token));
        if let Some((tokens, leaves)) = buffer.tokens_and_leaves_mut(line) {
            if tokens.get(token).is_some_and(|t| t.leaf.is_some()) {
                leaves.attach(tokens, line, token);
            }
        }
    }
}
