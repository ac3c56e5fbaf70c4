//! Stateful per-line lexer.
//!
//! ## Architecture
//!
//! ```text
//! line text + incoming BlockState
//!     ↓
//! LineLexer (logos automaton + hand-written block scanners)
//!     ↓
//! classify_tokens (keyword/type/literal sets of the LanguageProfile)
//!     ↓
//! LexedLine { tokens, outgoing BlockState }
//! ```
//!
//! Concatenating the token texts of a line always reproduces the line.

mod classify;
mod profile;
mod scan;
mod token;

pub use classify::{classify_tokens, is_forced_identifier};
pub use profile::{LanguageProfile, ProfileBuilder, WordClass};
pub use scan::LineLexer;
pub use token::{BlockState, LexedLine, Token, TokenKind, TokenStyle};
