//! Document snapshot - a read-only, line-indexed view of buffer text
//!
//! The engine treats document access as a pure function of the current
//! buffer contents; out-of-range lookups resolve to "no content".

use std::path::{Path, PathBuf};

use crate::line::Line;
use crate::position::{TextPosition, TextRange};

/// A document to scan
#[derive(Debug)]
pub struct Document {
    /// Lines of text
    lines: Vec<Line>,
    /// Document name (e.g., a file name or "*scratch*")
    name: String,
    /// Associated file path (None for in-memory documents)
    filename: Option<PathBuf>,
}

impl Document {
    /// Create a new empty document with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![Line::new()], // Always have at least one line
            name: name.into(),
            filename: None,
        }
    }

    /// Create a document from a text snapshot
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let lines: Vec<Line> = if text.is_empty() {
            vec![Line::new()]
        } else {
            text.lines().map(Line::from).collect()
        };

        Self {
            lines,
            name: name.into(),
            filename: None,
        }
    }

    /// Create a document from file contents
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "unnamed".to_string());

        let mut doc = Self::from_text(name, &content);
        doc.filename = Some(path.to_path_buf());
        Ok(doc)
    }

    /// Get document name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&PathBuf> {
        self.filename.as_ref()
    }

    /// Get the file extension, used to select language-specific rules
    pub fn extension(&self) -> Option<&str> {
        self.filename.as_ref()?.extension()?.to_str()
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get a line's text by index
    pub fn line_text(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(Line::text)
    }

    /// Get a line's length in UTF-16 code units
    pub fn line_utf16_len(&self, idx: usize) -> Option<usize> {
        self.lines.get(idx).map(Line::utf16_len)
    }

    /// The range spanning the whole document
    pub fn full_range(&self) -> TextRange {
        let last = self.lines.len() - 1;
        TextRange::new(
            TextPosition::ZERO,
            TextPosition::new(last, self.lines[last].utf16_len()),
        )
    }
}
