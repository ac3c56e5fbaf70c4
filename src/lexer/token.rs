//! Token and block-state types produced by the line lexer.

use smol_str::SmolStr;

use crate::buffer::LeafId;

/// Lexer state carried from the end of one line to the start of the next.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum BlockState {
    /// Not inside any multi-line construct
    #[default]
    Plain,
    InBlockComment,
    InRawString,
}

/// Lexical category of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Whitespace,
    Comment,
    Preprocessor,
    CharLiteral,
    StringLiteral,
    VerbatimStringLiteral,
    IntegerLiteral,
    RealLiteral,
    Punctuator,
    Keyword,
    Identifier,
    ContextualKeyword,
    BuiltInLiteral,
    EndOfFile,
    /// Placeholder inserted by the grammar engine, never produced by lexing
    Missing,
}

impl TokenKind {
    pub fn is_trivia(self) -> bool {
        matches!(self, TokenKind::Whitespace | TokenKind::Comment)
    }

    /// Kinds whose text is re-examined against a language profile.
    pub fn is_word(self) -> bool {
        matches!(
            self,
            TokenKind::Keyword
                | TokenKind::Identifier
                | TokenKind::ContextualKeyword
                | TokenKind::BuiltInLiteral
        )
    }
}

/// Display style consumed by the renderer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum TokenStyle {
    #[default]
    Normal,
    Keyword,
    Type,
    Identifier,
    Comment,
    String,
    Number,
    Operator,
    Preprocessor,
    Literal,
}

/// A token: kind, exact source text, display style, and an optional
/// reference into the parse-leaf side table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub text: SmolStr,
    pub style: TokenStyle,
    pub leaf: Option<LeafId>,
}

impl Token {
    pub fn new(kind: TokenKind, text: impl Into<SmolStr>) -> Self {
        Self {
            kind,
            text: text.into(),
            style: TokenStyle::Normal,
            leaf: None,
        }
    }

    /// Placeholder for a token the grammar engine expected but did not find.
    pub fn missing() -> Self {
        Self::new(TokenKind::Missing, "")
    }

    /// Length in characters
    pub fn len_chars(&self) -> usize {
        self.text.chars().count()
    }
}

/// Output of lexing one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LexedLine {
    pub tokens: Vec<Token>,
    pub state: BlockState,
}

impl LexedLine {
    /// Concatenated token text; always equals the lexed line.
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }
}
