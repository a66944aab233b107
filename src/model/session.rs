//! Session - the registry of open documents
//!
//! Owns every open document, assigns their identifiers, tracks tab order
//! and the active tab. All open/close/lookup traffic goes through this
//! registry; nothing about open documents lives in globals.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use super::document::Document;
use crate::encoding::DecodedDocument;

/// Unique identifier for a document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DocumentId(pub u64);

/// Registry of all open documents plus tab ordering
#[derive(Debug, Clone)]
pub struct Session {
    /// All open documents
    documents: HashMap<DocumentId, Document>,
    /// Tab order (insertion order, close removes)
    tab_order: Vec<DocumentId>,
    /// Currently active document
    active: Option<DocumentId>,

    next_document_id: u64,
    /// Counter for generating unique untitled document names
    next_untitled_number: u32,
}

impl Session {
    pub fn new() -> Self {
        Self {
            documents: HashMap::new(),
            tab_order: Vec::new(),
            active: None,
            next_document_id: 1,
            next_untitled_number: 1,
        }
    }

    fn allocate_id(&mut self) -> DocumentId {
        let id = DocumentId(self.next_document_id);
        self.next_document_id += 1;
        id
    }

    fn register(&mut self, mut document: Document) -> DocumentId {
        let id = self.allocate_id();
        document.id = Some(id);
        self.documents.insert(id, document);
        self.tab_order.push(id);
        self.active = Some(id);
        id
    }

    /// Open a freshly decoded file. If the path is already open, the
    /// existing tab is activated instead of opening a duplicate.
    pub fn open_decoded(&mut self, path: PathBuf, decoded: DecodedDocument) -> DocumentId {
        if let Some(existing) = self.document_for_path(&path) {
            self.active = Some(existing);
            return existing;
        }
        self.register(Document::from_decoded(path, decoded))
    }

    /// Create a new empty document named "Untitled", "Untitled-2", ...
    pub fn new_untitled(&mut self) -> DocumentId {
        let mut doc = Document::new();
        doc.untitled_name = Some(if self.next_untitled_number == 1 {
            "Untitled".to_string()
        } else {
            format!("Untitled-{}", self.next_untitled_number)
        });
        self.next_untitled_number += 1;
        self.register(doc)
    }

    /// Close a document. The active tab falls back to the nearest
    /// remaining tab in order.
    pub fn close(&mut self, id: DocumentId) -> Option<Document> {
        let doc = self.documents.remove(&id)?;
        if let Some(pos) = self.tab_order.iter().position(|&d| d == id) {
            self.tab_order.remove(pos);
            if self.active == Some(id) {
                self.active = self
                    .tab_order
                    .get(pos)
                    .or_else(|| self.tab_order.last())
                    .copied();
            }
        }
        Some(doc)
    }

    pub fn get(&self, id: DocumentId) -> Option<&Document> {
        self.documents.get(&id)
    }

    pub fn get_mut(&mut self, id: DocumentId) -> Option<&mut Document> {
        self.documents.get_mut(&id)
    }

    /// Find the open document backed by `path`, if any
    pub fn document_for_path(&self, path: &Path) -> Option<DocumentId> {
        self.tab_order
            .iter()
            .copied()
            .find(|id| self.documents.get(id).and_then(|d| d.path()) == Some(path))
    }

    pub fn active_id(&self) -> Option<DocumentId> {
        self.active
    }

    pub fn active_document(&self) -> Option<&Document> {
        self.active.and_then(|id| self.documents.get(&id))
    }

    pub fn set_active(&mut self, id: DocumentId) {
        if self.documents.contains_key(&id) {
            self.active = Some(id);
        }
    }

    /// Document ids in tab order
    pub fn tab_order(&self) -> &[DocumentId] {
        &self.tab_order
    }

    pub fn len(&self) -> usize {
        self.documents.len()
    }

    pub fn is_empty(&self) -> bool {
        self.documents.is_empty()
    }

    /// Ids of documents with unsaved changes, in tab order
    pub fn modified_ids(&self) -> Vec<DocumentId> {
        self.tab_order
            .iter()
            .copied()
            .filter(|id| {
                self.documents
                    .get(id)
                    .map(|d| d.is_modified)
                    .unwrap_or(false)
            })
            .collect()
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{EncodingTag, Eol};

    fn decoded(text: &str) -> DecodedDocument {
        DecodedDocument {
            content: text.to_string(),
            encoding: EncodingTag::Utf8,
            eol: Eol::Lf,
            warning: None,
        }
    }

    #[test]
    fn test_new_session_is_empty() {
        let session = Session::new();
        assert!(session.is_empty());
        assert!(session.active_id().is_none());
    }

    #[test]
    fn test_open_assigns_id_and_activates() {
        let mut session = Session::new();
        let id = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        assert_eq!(session.active_id(), Some(id));
        assert_eq!(session.get(id).unwrap().id, Some(id));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_ids_are_unique_and_sequential() {
        let mut session = Session::new();
        let a = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        let b = session.open_decoded(PathBuf::from("/tmp/b.md"), decoded("b"));
        assert_ne!(a, b);
        assert_eq!(session.tab_order(), &[a, b]);
    }

    #[test]
    fn test_reopening_same_path_activates_existing_tab() {
        let mut session = Session::new();
        let a = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        let b = session.open_decoded(PathBuf::from("/tmp/b.md"), decoded("b"));
        let again = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        assert_eq!(again, a);
        assert_eq!(session.active_id(), Some(a));
        assert_eq!(session.len(), 2);
        assert_eq!(session.tab_order(), &[a, b]);
    }

    #[test]
    fn test_untitled_naming_sequence() {
        let mut session = Session::new();
        let first = session.new_untitled();
        let second = session.new_untitled();
        assert_eq!(session.get(first).unwrap().display_name(), "Untitled");
        assert_eq!(session.get(second).unwrap().display_name(), "Untitled-2");
    }

    #[test]
    fn test_close_removes_and_moves_active() {
        let mut session = Session::new();
        let a = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        let b = session.open_decoded(PathBuf::from("/tmp/b.md"), decoded("b"));
        let c = session.open_decoded(PathBuf::from("/tmp/c.md"), decoded("c"));
        session.set_active(b);

        assert!(session.close(b).is_some());
        assert_eq!(session.tab_order(), &[a, c]);
        // active falls to the tab that took the closed tab's slot
        assert_eq!(session.active_id(), Some(c));
    }

    #[test]
    fn test_close_last_tab_clears_active() {
        let mut session = Session::new();
        let a = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        session.close(a);
        assert!(session.is_empty());
        assert!(session.active_id().is_none());
    }

    #[test]
    fn test_close_unknown_id_is_noop() {
        let mut session = Session::new();
        assert!(session.close(DocumentId(42)).is_none());
    }

    #[test]
    fn test_set_active_ignores_unknown_id() {
        let mut session = Session::new();
        let a = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        session.set_active(DocumentId(99));
        assert_eq!(session.active_id(), Some(a));
    }

    #[test]
    fn test_modified_ids() {
        let mut session = Session::new();
        let a = session.open_decoded(PathBuf::from("/tmp/a.md"), decoded("a"));
        let b = session.open_decoded(PathBuf::from("/tmp/b.md"), decoded("b"));
        session.get_mut(b).unwrap().insert(0, "x");
        assert_eq!(session.modified_ids(), vec![b]);
        let _ = a;
    }
}
