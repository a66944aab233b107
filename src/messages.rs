//! Message types for the Elm-style architecture
//!
//! All state changes flow through these message types.

use std::path::PathBuf;

use crate::encoding::{DecodedDocument, EncodingTag, Eol};
use crate::model::DocumentId;
use crate::save::SaveOutcome;

/// Application-level messages (file lifecycle)
#[derive(Debug, Clone)]
pub enum AppMsg {
    /// Open a file from disk (or activate its tab if already open)
    OpenFile(PathBuf),
    /// Create a new untitled document
    NewDocument,
    /// Save a document. `id: None` targets the active document;
    /// `save_as` forces a path prompt.
    SaveRequested {
        id: Option<DocumentId>,
        save_as: bool,
    },
    /// A background load finished
    FileLoaded {
        path: PathBuf,
        result: Result<DecodedDocument, String>,
    },
    /// A background save finished
    SaveCompleted {
        id: DocumentId,
        outcome: SaveOutcome,
    },
    /// Close a document tab
    CloseDocument(DocumentId),
}

/// Document-specific messages (text editing, per-document settings)
#[derive(Debug, Clone)]
pub enum DocumentMsg {
    /// Insert text at a character offset
    Insert {
        id: DocumentId,
        char_idx: usize,
        text: String,
    },
    /// Delete a character range
    Delete {
        id: DocumentId,
        start: usize,
        end: usize,
    },
    /// Override the encoding the next save will use
    SetEncoding {
        id: DocumentId,
        encoding: EncodingTag,
    },
    /// Override the line-ending style the next save will use
    SetEol { id: DocumentId, eol: Eol },
    /// Dismiss the detection warning, unblocking overwrite saves
    AcknowledgeWarning(DocumentId),
}

/// Top-level message type
#[derive(Debug, Clone)]
pub enum Msg {
    App(AppMsg),
    Document(DocumentMsg),
}
