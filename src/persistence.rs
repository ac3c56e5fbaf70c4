//! Load/save seam.
//!
//! Encoding detection and file I/O belong to the host. The engine receives
//! decoded lines and hands lines back together with the line ending to write.
//! [`FileStore`] covers the common case of a UTF-8 file on disk.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Line terminator written between lines on save.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum LineEnding {
    #[default]
    Lf,
    CrLf,
}

impl LineEnding {
    pub fn as_str(self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// The ending used by the first line break in `text` (`Lf` if none).
    pub fn detect(text: &str) -> Self {
        match text.find('\n') {
            Some(at) if text[..at].ends_with('\r') => LineEnding::CrLf,
            _ => LineEnding::Lf,
        }
    }

    /// Join `lines` with this ending.
    pub fn join<S: AsRef<str>>(self, lines: &[S]) -> String {
        let mut text = String::new();
        for (i, line) in lines.iter().enumerate() {
            if i > 0 {
                text.push_str(self.as_str());
            }
            text.push_str(line.as_ref());
        }
        text
    }
}

/// Decoded document content.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoadedText {
    pub lines: Vec<String>,
    pub line_ending: LineEnding,
}

impl LoadedText {
    /// Split decoded text into lines, remembering its line ending.
    pub fn from_text(text: &str) -> Self {
        let line_ending = LineEnding::detect(text);
        let lines = text
            .split('\n')
            .map(|line| line.strip_suffix('\r').unwrap_or(line).to_string())
            .collect();
        Self { lines, line_ending }
    }
}

/// Host-side storage for one document.
pub trait Persistence {
    fn load(&mut self) -> io::Result<LoadedText>;

    fn save(&mut self, lines: &[&str], line_ending: LineEnding) -> io::Result<()>;
}

/// Plain UTF-8 file on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Persistence for FileStore {
    fn load(&mut self) -> io::Result<LoadedText> {
        let text = fs::read_to_string(&self.path)?;
        Ok(LoadedText::from_text(&text))
    }

    /// Writes a sibling `.saving` file, then renames it over the target.
    fn save(&mut self, lines: &[&str], line_ending: LineEnding) -> io::Result<()> {
        let mut staging = self.path.clone().into_os_string();
        staging.push(".saving");
        let staging = PathBuf::from(staging);
        fs::write(&staging, line_ending.join(lines))?;
        fs::rename(&staging, &self.path)
    }
}
