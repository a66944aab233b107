//! Sumi - Elm-style writing app core
//!
//! This crate provides the core types and logic for a multi-tab markdown
//! writing app with encoding-safe file handling: detection of legacy
//! Japanese encodings on load, canonical in-memory text, and an atomic
//! save pipeline that reproduces the original byte form.

pub mod bus;
pub mod cli;
pub mod commands;
pub mod config;
pub mod config_paths;
pub mod encoding;
pub mod logging;
pub mod messages;
pub mod model;
pub mod preview;
pub mod recent_files;
pub mod runtime;
pub mod save;
pub mod update;

// Re-export commonly used types
pub use bus::{AppEvent, EventBus};
pub use commands::Cmd;
pub use config::AppConfig;
pub use encoding::{detect, DecodedDocument, EncodingTag, Eol};
pub use messages::Msg;
pub use model::{DocumentId, Session};
pub use runtime::Runtime;
pub use save::{SaveOutcome, SavePrompts};
