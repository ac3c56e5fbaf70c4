//! Shared test helpers.
#![allow(dead_code)]

pub mod engine;
pub mod fixtures;
pub mod store;

use std::sync::Arc;

use once_cell::sync::Lazy;
use relex::{Document, EngineConfig, LanguageProfile, TokenKind};

use self::engine::RecordingEngine;

/// Built once and shared by every document in a test binary.
pub static CSHARP: Lazy<Arc<LanguageProfile>> = Lazy::new(|| Arc::new(LanguageProfile::csharp()));

/// A C# document over `text` driven by a [`RecordingEngine`].
pub fn csharp_document(text: &str) -> Document<RecordingEngine> {
    Document::with_text(
        CSHARP.clone(),
        RecordingEngine::default(),
        EngineConfig::default(),
        text,
    )
}

/// Kinds and texts of a line's tokens.
pub fn token_pairs(document: &mut Document<RecordingEngine>, line: usize) -> Vec<(TokenKind, String)> {
    document
        .tokens(line)
        .iter()
        .map(|t| (t.kind, t.text.to_string()))
        .collect()
}
