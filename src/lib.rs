//! # relex-base
//!
//! Incremental lexical re-analysis engine for interactive source editors:
//! a line model with per-line lexer state, an invertible undo log, and a
//! driver that keeps tokens and an external parse tree current after each
//! edit without rescanning the document.
//!
//! ## Module Structure (dependency order)
//!
//! ```text
//! document  → Document facade: edits, undo/redo, caret, load/save
//!   ↓
//! analysis  → ReanalysisDriver, GrammarEngine seam, Continuation, ReloadWorker
//!   ↓
//! buffer    → TextBuffer, UndoLog, Caret, LeafTable
//!   ↓
//! lexer     → Logos line lexer, LanguageProfile, classification pass
//!   ↓
//! base      → Position, Span, tab-aware columns, word stops
//! ```

// ============================================================================
// MODULES (dependency order: base → lexer → buffer → analysis → document)
// ============================================================================

/// Foundation types: Position, Span, TabStops, word stops
pub mod base;

/// Lexer: per-line tokenizer with carried block state
pub mod lexer;

/// Buffer: lines, metadata, undo log, caret, leaf side table
pub mod buffer;

/// Analysis: reanalysis driver and grammar engine seam
pub mod analysis;

/// Document facade
pub mod document;

pub mod config;
pub mod error;
pub mod persistence;
pub mod view;

// Re-export commonly needed items
pub use analysis::{GrammarEngine, LineParse, NullGrammar, Step};
pub use base::{Position, Span, TabStops};
pub use buffer::{Caret, CaretMove, UndoAction};
pub use config::EngineConfig;
pub use document::Document;
pub use error::{DocumentError, EditError};
pub use lexer::{BlockState, LanguageProfile, LineLexer, Token, TokenKind, TokenStyle};
pub use persistence::{FileStore, LineEnding, LoadedText, Persistence};
pub use view::ViewObserver;
