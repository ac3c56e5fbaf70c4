//! Foundation types for the relex engine.
//!
//! This module provides the coordinate model shared by every other layer:
//! - [`Position`] - (line, character index)
//! - [`Span`] - anchor plus relative end, cheap to shift on edits
//! - [`TabStops`] - character index ↔ visual column mapping
//! - [`CharClass`], [`word_stop_left`], [`word_stop_right`] - word boundaries
//!
//! This module has NO dependencies on other relex modules.

mod column;
mod position;
mod word;

pub use column::{DEFAULT_TAB_SIZE, TabStops};
pub use position::{Position, Span};
pub use word::{CharClass, word_stop_left, word_stop_right};
