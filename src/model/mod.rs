//! Application state model

pub mod document;
pub mod session;

pub use document::Document;
pub use session::{DocumentId, Session};
