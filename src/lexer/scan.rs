//! Logos-backed line lexer.
//!
//! Lexing is a pure function of `(line text, incoming block state)`. Plain
//! text is tokenized with a logos automaton; the multi-line constructs (block
//! comments and verbatim strings) are scanned by hand so that their state can
//! cross the line boundary. Nothing here can fail: unterminated constructs are
//! carried to the next line through [`BlockState`].

use logos::Logos;

use super::classify::{classify_tokens, is_forced_identifier};
use super::profile::LanguageProfile;
use super::token::{BlockState, LexedLine, Token, TokenKind};

/// Raw token shapes recognised in plain state.
///
/// Punctuators are deliberately absent: they come from the profile's operator
/// table, so anything logos rejects falls through to maximal munch.
#[derive(Logos, Debug, Clone, Copy, PartialEq)]
enum RawToken {
    #[regex(r"[ \t\r\f]+")]
    Whitespace,

    #[token("//")]
    LineCommentStart,

    #[token("/*")]
    BlockCommentStart,

    #[regex(r"'([^'\\]|\\.)*('|\\)?", allow_greedy = true)]
    CharLiteral,

    #[regex(r#""([^"\\]|\\.)*("|\\)?"#, allow_greedy = true)]
    StringLiteral,

    #[token("@\"")]
    VerbatimOpen,

    #[regex(r"0[xX][0-9a-fA-F]+")]
    HexLiteral,

    #[regex(r"[0-9]+")]
    IntegerLiteral,

    #[regex(r"[0-9]*\.[0-9]+([eE][+-]?[0-9]+)?")]
    #[regex(r"[0-9]+[eE][+-]?[0-9]+")]
    RealLiteral,

    #[regex(r"@?[a-zA-Z_][a-zA-Z0-9_]*", extend_identifier)]
    #[regex(r"@?\\u[0-9a-fA-F]{4}", extend_identifier)]
    Identifier,
}

/// Continue an ASCII identifier over non-ASCII continue characters and
/// `\uXXXX` escapes.
fn extend_identifier(lex: &mut logos::Lexer<RawToken>) -> bool {
    let extra = identifier_tail_len(lex.remainder());
    lex.bump(extra);
    true
}

/// Byte length of the identifier continuation at the start of `rest`.
fn identifier_tail_len(rest: &str) -> usize {
    let mut len = 0;
    loop {
        let tail = &rest[len..];
        let Some(ch) = tail.chars().next() else {
            return len;
        };
        if unicode_ident::is_xid_continue(ch) {
            len += ch.len_utf8();
        } else if let Some(escape) = unicode_escape_len(tail) {
            len += escape;
        } else {
            return len;
        }
    }
}

/// Length of a `\uXXXX` escape at the start of `rest`.
fn unicode_escape_len(rest: &str) -> Option<usize> {
    let bytes = rest.as_bytes();
    (bytes.len() >= 6
        && bytes[0] == b'\\'
        && bytes[1] == b'u'
        && bytes[2..6].iter().all(u8::is_ascii_hexdigit))
    .then_some(6)
}

/// Lexes single lines against one language profile.
#[derive(Debug, Clone, Copy)]
pub struct LineLexer<'p> {
    profile: &'p LanguageProfile,
}

impl<'p> LineLexer<'p> {
    pub fn new(profile: &'p LanguageProfile) -> Self {
        Self { profile }
    }

    pub fn profile(&self) -> &'p LanguageProfile {
        self.profile
    }

    /// Tokenize `text`, starting in `incoming` state.
    pub fn lex_line(&self, text: &str, incoming: BlockState) -> LexedLine {
        let mut scanner = LineScanner {
            text,
            pos: 0,
            state: incoming,
            directive_gate: true,
            tokens: Vec::new(),
            profile: self.profile,
        };
        scanner.run();

        let LineScanner {
            mut tokens, state, ..
        } = scanner;
        classify_tokens(&mut tokens, self.profile);
        LexedLine { tokens, state }
    }

    /// Tokenize a whole document from a plain start.
    pub fn lex_all<'a>(&self, lines: impl IntoIterator<Item = &'a str>) -> Vec<LexedLine> {
        let mut state = BlockState::Plain;
        lines
            .into_iter()
            .map(|line| {
                let lexed = self.lex_line(line, state);
                state = lexed.state;
                lexed
            })
            .collect()
    }
}

struct LineScanner<'a, 'p> {
    text: &'a str,
    pos: usize,
    state: BlockState,
    /// True until the first token that is neither whitespace nor `#`
    directive_gate: bool,
    tokens: Vec<Token>,
    profile: &'p LanguageProfile,
}

impl<'a> LineScanner<'a, '_> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn push(&mut self, kind: TokenKind, len: usize) {
        let end = self.pos + len;
        let text = &self.text[self.pos..end];
        let is_hash = kind == TokenKind::Punctuator && text == "#";
        if kind != TokenKind::Whitespace && !is_hash {
            self.directive_gate = false;
        }
        self.tokens.push(Token::new(kind, text));
        self.pos = end;
    }

    fn run(&mut self) {
        while self.pos < self.text.len() {
            match self.state {
                BlockState::InBlockComment => self.block_comment_body(),
                BlockState::InRawString => self.raw_string_body(),
                BlockState::Plain => self.plain(),
            }
        }
    }

    fn block_comment_body(&mut self) {
        match self.rest().find("*/") {
            Some(at) => {
                self.push(TokenKind::Comment, at + 2);
                self.state = BlockState::Plain;
            }
            None => self.push(TokenKind::Comment, self.rest().len()),
        }
    }

    fn raw_string_body(&mut self) {
        let rest = self.rest();
        let bytes = rest.as_bytes();
        let mut i = 0;
        while i < bytes.len() {
            if bytes[i] == b'"' {
                if bytes.get(i + 1) == Some(&b'"') {
                    i += 2;
                    continue;
                }
                self.push(TokenKind::VerbatimStringLiteral, i + 1);
                self.state = BlockState::Plain;
                return;
            }
            i += 1;
        }
        self.push(TokenKind::VerbatimStringLiteral, rest.len());
    }

    fn plain(&mut self) {
        if self.directive_gate && self.rest().starts_with('#') && self.directive() {
            return;
        }

        let mut raw = RawToken::lexer(self.rest());
        let Some(Ok(token)) = raw.next() else {
            self.fallback();
            return;
        };
        let len = raw.span().end;

        match token {
            RawToken::Whitespace => self.push(TokenKind::Whitespace, len),
            RawToken::LineCommentStart => {
                self.push(TokenKind::Comment, len);
                let remaining = self.rest().len();
                if remaining > 0 {
                    self.push(TokenKind::Comment, remaining);
                }
            }
            RawToken::BlockCommentStart => {
                self.push(TokenKind::Comment, len);
                self.state = BlockState::InBlockComment;
            }
            RawToken::CharLiteral => self.push(TokenKind::CharLiteral, len),
            RawToken::StringLiteral => self.push(TokenKind::StringLiteral, len),
            RawToken::VerbatimOpen => {
                self.push(TokenKind::VerbatimStringLiteral, len);
                self.state = BlockState::InRawString;
            }
            RawToken::HexLiteral => {
                let suffix = integer_suffix_len(&self.rest()[len..]);
                self.push(TokenKind::IntegerLiteral, len + suffix);
            }
            RawToken::IntegerLiteral => {
                let after = &self.rest()[len..];
                if self.real_suffix(after) {
                    self.push(TokenKind::RealLiteral, len + 1);
                } else {
                    let suffix = integer_suffix_len(after);
                    self.push(TokenKind::IntegerLiteral, len + suffix);
                }
            }
            RawToken::RealLiteral => {
                let suffix = usize::from(self.real_suffix(&self.rest()[len..]));
                self.push(TokenKind::RealLiteral, len + suffix);
            }
            RawToken::Identifier => self.word(len),
        }
    }

    fn real_suffix(&self, after: &str) -> bool {
        after
            .chars()
            .next()
            .is_some_and(|ch| self.profile.is_real_suffix(ch))
    }

    fn word(&mut self, len: usize) {
        let text = &self.rest()[..len];
        let kind = if !is_forced_identifier(text) && self.profile.is_keyword_shaped(text) {
            TokenKind::Keyword
        } else {
            TokenKind::Identifier
        };
        self.push(kind, len);
    }

    /// Characters the logos automaton does not start a token on.
    fn fallback(&mut self) {
        let rest = self.rest();
        let Some(ch) = rest.chars().next() else {
            return;
        };

        if ch.is_whitespace() {
            let len = rest
                .char_indices()
                .find(|(_, c)| !c.is_whitespace())
                .map_or(rest.len(), |(i, _)| i);
            self.push(TokenKind::Whitespace, len);
        } else if unicode_ident::is_xid_start(ch) {
            let len = ch.len_utf8() + identifier_tail_len(&rest[ch.len_utf8()..]);
            self.word(len);
        } else {
            let len = self
                .profile
                .match_operator(rest)
                .map_or(ch.len_utf8(), str::len);
            self.push(TokenKind::Punctuator, len);
        }
    }

    /// Line-leading `#directive`; returns false when the word after `#` is
    /// not a directive of this profile.
    fn directive(&mut self) -> bool {
        let rest = self.rest();
        let after_hash = &rest[1..];
        let gap = after_hash.len() - after_hash.trim_start_matches([' ', '\t']).len();
        let word_start = &after_hash[gap..];
        let word_len = word_start
            .char_indices()
            .find(|(_, c)| !unicode_ident::is_xid_continue(*c))
            .map_or(word_start.len(), |(i, _)| i);

        if !self
            .profile
            .is_preprocessor_directive(&word_start[..word_len])
        {
            return false;
        }

        self.push(TokenKind::Preprocessor, 1);
        if gap > 0 {
            self.push(TokenKind::Whitespace, gap);
        }
        self.push(TokenKind::Preprocessor, word_len);
        let remaining = self.rest().len();
        if remaining > 0 {
            self.push(TokenKind::Preprocessor, remaining);
        }
        true
    }
}

/// Integer suffix after the digits: up to two of `u`/`l` in either order.
fn integer_suffix_len(after: &str) -> usize {
    let mut chars = after.chars().map(|c| c.to_ascii_lowercase());
    match chars.next() {
        Some(first @ ('u' | 'l')) => match chars.next() {
            Some(second @ ('u' | 'l')) if second != first => 2,
            _ => 1,
        },
        _ => 0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(text: &str) -> Vec<(TokenKind, String)> {
        let profile = LanguageProfile::csharp();
        LineLexer::new(&profile)
            .lex_line(text, BlockState::Plain)
            .tokens
            .into_iter()
            .map(|t| (t.kind, t.text.to_string()))
            .collect()
    }

    #[test]
    fn test_integer_suffixes() {
        assert_eq!(integer_suffix_len("UL;"), 2);
        assert_eq!(integer_suffix_len("lu"), 2);
        assert_eq!(integer_suffix_len("uu"), 1);
        assert_eq!(integer_suffix_len("x"), 0);
    }

    #[test]
    fn test_unicode_escape_forces_identifier() {
        let tokens = kinds(r"\u0069f");
        assert_eq!(tokens, vec![(TokenKind::Identifier, r"\u0069f".to_string())]);
    }

    #[test]
    fn test_non_ascii_identifier_is_one_token() {
        let tokens = kinds("café = 1");
        assert_eq!(tokens[0], (TokenKind::Identifier, "café".to_string()));
        let tokens = kinds("αβγ");
        assert_eq!(tokens, vec![(TokenKind::Identifier, "αβγ".to_string())]);
    }

    #[test]
    fn test_unknown_hash_is_punctuator() {
        let tokens = kinds("#nope");
        assert_eq!(tokens[0], (TokenKind::Punctuator, "#".to_string()));
        assert_eq!(tokens[1], (TokenKind::Identifier, "nope".to_string()));
    }

    #[test]
    fn test_member_access_after_integer() {
        let tokens = kinds("1.ToString()");
        assert_eq!(tokens[0], (TokenKind::IntegerLiteral, "1".to_string()));
        assert_eq!(tokens[1], (TokenKind::Punctuator, ".".to_string()));
    }
}
