//! Document model - text buffer plus the file identity it round-trips to
//!
//! A document remembers how its bytes looked on disk (encoding, line
//! endings) so a later save can reproduce them exactly. The buffer itself
//! always holds canonical text: LF line endings, form feeds escaped.

use ropey::Rope;
use std::path::{Path, PathBuf};

use super::session::DocumentId;
use crate::encoding::{DecodedDocument, EncodingTag, Eol};
use crate::save::SaveRequest;

/// The text buffer and associated file metadata
#[derive(Debug, Clone)]
pub struct Document {
    /// Unique identifier (set when added to a Session)
    pub id: Option<DocumentId>,

    /// The text buffer (canonical form)
    pub buffer: Rope,
    /// Path to the file on disk (None for new/unsaved files)
    pub path: Option<PathBuf>,
    /// Display name for untitled documents (e.g., "Untitled", "Untitled-2")
    pub untitled_name: Option<String>,
    /// Whether the buffer has unsaved changes
    pub is_modified: bool,

    /// Encoding the file had on disk; saves re-encode with this tag
    pub encoding: EncodingTag,
    /// Line-ending style the file had on disk
    pub eol: Eol,
    /// Detection warning attached at load time, if any
    pub warning: Option<String>,
    /// Whether the user has seen and dismissed the warning. Saving over
    /// the original file is gated on this.
    pub warning_acknowledged: bool,

    /// Revision counter (incremented on each edit)
    pub revision: u64,
}

impl Document {
    /// Create a new empty document
    pub fn new() -> Self {
        Self {
            id: None,
            buffer: Rope::from(""),
            path: None,
            untitled_name: None,
            is_modified: false,
            encoding: EncodingTag::Utf8,
            eol: Eol::Lf,
            warning: None,
            warning_acknowledged: false,
            revision: 0,
        }
    }

    /// Create a document with initial text (canonical form assumed)
    pub fn with_text(text: &str) -> Self {
        Self {
            buffer: Rope::from(text),
            ..Self::new()
        }
    }

    /// Wrap the result of loading and decoding a file
    pub fn from_decoded(path: PathBuf, decoded: DecodedDocument) -> Self {
        Self {
            id: None,
            buffer: Rope::from(decoded.content.as_str()),
            path: Some(path),
            untitled_name: None,
            is_modified: false,
            encoding: decoded.encoding,
            eol: decoded.eol,
            warning: decoded.warning,
            warning_acknowledged: false,
            revision: 0,
        }
    }

    /// Get the display name for this document.
    /// Returns the filename if saved, the untitled name if set, or "Untitled" as fallback.
    pub fn display_name(&self) -> String {
        if let Some(path) = &self.path {
            if let Some(name) = path.file_name() {
                return name.to_string_lossy().to_string();
            }
        }
        if let Some(name) = &self.untitled_name {
            return name.clone();
        }
        "Untitled".to_string()
    }

    /// Full buffer contents as a String
    pub fn content(&self) -> String {
        self.buffer.to_string()
    }

    /// Get the number of lines in the document
    pub fn line_count(&self) -> usize {
        self.buffer.len_lines()
    }

    /// Insert text at a character offset (clamped to buffer length)
    pub fn insert(&mut self, char_idx: usize, text: &str) {
        let at = char_idx.min(self.buffer.len_chars());
        self.buffer.insert(at, text);
        self.mark_edited();
    }

    /// Delete a character range (clamped to buffer length)
    pub fn delete(&mut self, start: usize, end: usize) {
        let len = self.buffer.len_chars();
        let start = start.min(len);
        let end = end.min(len);
        if start < end {
            self.buffer.remove(start..end);
            self.mark_edited();
        }
    }

    fn mark_edited(&mut self) {
        self.is_modified = true;
        self.revision = self.revision.wrapping_add(1);
    }

    /// An unacknowledged detection warning blocks silent overwrite saves.
    pub fn needs_warning_ack(&self) -> bool {
        self.warning.is_some() && !self.warning_acknowledged
    }

    pub fn acknowledge_warning(&mut self) {
        self.warning_acknowledged = true;
    }

    /// Override the encoding the next save will use. Clears any detection
    /// warning since the user has taken over the decision.
    pub fn set_encoding(&mut self, encoding: EncodingTag) {
        if self.encoding != encoding {
            self.encoding = encoding;
            self.is_modified = true;
        }
        self.warning = None;
        self.warning_acknowledged = true;
    }

    pub fn set_eol(&mut self, eol: Eol) {
        if self.eol != eol {
            self.eol = eol;
            self.is_modified = true;
        }
    }

    /// Build the save request for this document. `save_as` forces a path
    /// prompt even when the document already has a path.
    pub fn save_request(&self, save_as: bool) -> SaveRequest {
        SaveRequest {
            target_path: if save_as { None } else { self.path.clone() },
            content: self.content(),
            encoding: self.encoding,
            eol: self.eol,
        }
    }

    /// Record a completed save: the document now lives at `path` and has
    /// no unsaved changes.
    pub fn mark_saved(&mut self, path: PathBuf) {
        self.path = Some(path);
        self.untitled_name = None;
        self.is_modified = false;
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
