//! Incremental reanalysis.
//!
//! ## Architecture
//!
//! ```text
//! DirtyRange (from TextBuffer splices)
//!     ↓
//! ReanalysisDriver ── cut tree ──→ GrammarEngine
//!     ↓ relex to fixpoint
//! LineLexer
//!     ↓
//! Continuation ── step() per idle tick ──→ GrammarEngine::parse_line
//! ```
//!
//! Full reloads of large documents are lexed by a [`ReloadWorker`] instead.

mod continuation;
mod driver;
mod engine;
mod worker;

pub use continuation::{Continuation, Step};
pub use driver::{ReanalysisDriver, ReanalysisReport};
pub use engine::{GrammarEngine, LineParse, NullGrammar};
pub use worker::ReloadWorker;
