//! Command types for the Elm-style architecture
//!
//! Commands represent side effects that should be performed after an update.
//! The update function stays pure; the runtime executes these.

use std::path::PathBuf;

use crate::bus::AppEvent;
use crate::model::DocumentId;
use crate::save::SaveRequest;

/// A side effect requested by the update function
#[derive(Debug, Clone)]
pub enum Cmd {
    /// Read and decode a file on a background thread
    LoadFile { path: PathBuf },
    /// Run the save pipeline on a background thread
    SaveDocument {
        id: DocumentId,
        request: SaveRequest,
    },
    /// Publish an event on the bus
    Announce(AppEvent),
    /// Execute several commands in order
    Batch(Vec<Cmd>),
}
