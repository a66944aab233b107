//! Update functions - pure state transitions
//!
//! `update` takes the session and a message, mutates the session, and
//! returns the side effects to perform. No I/O happens here; the runtime
//! executes the returned commands.

use crate::bus::AppEvent;
use crate::commands::Cmd;
use crate::messages::{AppMsg, DocumentMsg, Msg};
use crate::model::Session;

pub fn update(session: &mut Session, msg: Msg) -> Option<Cmd> {
    match msg {
        Msg::App(msg) => update_app(session, msg),
        Msg::Document(msg) => update_document(session, msg),
    }
}

fn update_app(session: &mut Session, msg: AppMsg) -> Option<Cmd> {
    match msg {
        AppMsg::OpenFile(path) => {
            // Already open: just activate the tab
            if let Some(existing) = session.document_for_path(&path) {
                session.set_active(existing);
                return None;
            }
            Some(Cmd::LoadFile { path })
        }

        AppMsg::NewDocument => {
            session.new_untitled();
            None
        }

        AppMsg::SaveRequested { id, save_as } => {
            let id = id.or_else(|| session.active_id())?;
            let doc = session.get(id)?;

            // An unacknowledged detection warning must be surfaced before
            // the original bytes get overwritten.
            if doc.needs_warning_ack() {
                let message = doc.warning.clone().unwrap_or_default();
                return Some(Cmd::Announce(AppEvent::EncodingWarning { id, message }));
            }

            Some(Cmd::SaveDocument {
                id,
                request: doc.save_request(save_as),
            })
        }

        AppMsg::FileLoaded { path, result } => match result {
            Ok(decoded) => {
                let warning = decoded.warning.clone();
                let id = session.open_decoded(path.clone(), decoded);
                let opened = Cmd::Announce(AppEvent::DocumentOpened { id, path });
                match warning {
                    Some(message) => Some(Cmd::Batch(vec![
                        opened,
                        Cmd::Announce(AppEvent::EncodingWarning { id, message }),
                    ])),
                    None => Some(opened),
                }
            }
            Err(error) => Some(Cmd::Announce(AppEvent::LoadFailed { path, error })),
        },

        AppMsg::SaveCompleted { id, outcome } => {
            use crate::save::SaveOutcome;
            match outcome {
                SaveOutcome::Saved { path } => {
                    session.get_mut(id)?.mark_saved(path.clone());
                    Some(Cmd::Announce(AppEvent::DocumentSaved { id, path }))
                }
                SaveOutcome::Cancelled => None,
                SaveOutcome::Failed { error } => {
                    Some(Cmd::Announce(AppEvent::SaveFailed { id, error }))
                }
            }
        }

        AppMsg::CloseDocument(id) => {
            session.close(id)?;
            Some(Cmd::Announce(AppEvent::DocumentClosed { id }))
        }
    }
}

fn update_document(session: &mut Session, msg: DocumentMsg) -> Option<Cmd> {
    match msg {
        DocumentMsg::Insert { id, char_idx, text } => {
            session.get_mut(id)?.insert(char_idx, &text);
            None
        }
        DocumentMsg::Delete { id, start, end } => {
            session.get_mut(id)?.delete(start, end);
            None
        }
        DocumentMsg::SetEncoding { id, encoding } => {
            session.get_mut(id)?.set_encoding(encoding);
            None
        }
        DocumentMsg::SetEol { id, eol } => {
            session.get_mut(id)?.set_eol(eol);
            None
        }
        DocumentMsg::AcknowledgeWarning(id) => {
            session.get_mut(id)?.acknowledge_warning();
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encoding::{DecodedDocument, EncodingTag, Eol};
    use crate::save::SaveOutcome;
    use std::path::PathBuf;

    fn decoded(text: &str, warning: Option<&str>) -> DecodedDocument {
        DecodedDocument {
            content: text.to_string(),
            encoding: EncodingTag::Utf8,
            eol: Eol::Lf,
            warning: warning.map(str::to_string),
        }
    }

    fn loaded(session: &mut Session, path: &str, text: &str) -> crate::model::DocumentId {
        update(
            session,
            Msg::App(AppMsg::FileLoaded {
                path: PathBuf::from(path),
                result: Ok(decoded(text, None)),
            }),
        );
        session.document_for_path(std::path::Path::new(path)).unwrap()
    }

    // ========================================================================
    // Opening files
    // ========================================================================

    #[test]
    fn test_open_file_requests_load() {
        let mut session = Session::new();
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::OpenFile(PathBuf::from("/tmp/a.md"))),
        );
        assert!(matches!(cmd, Some(Cmd::LoadFile { .. })));
    }

    #[test]
    fn test_open_already_open_file_activates_tab() {
        let mut session = Session::new();
        let a = loaded(&mut session, "/tmp/a.md", "a");
        let _b = loaded(&mut session, "/tmp/b.md", "b");

        let cmd = update(
            &mut session,
            Msg::App(AppMsg::OpenFile(PathBuf::from("/tmp/a.md"))),
        );
        assert!(cmd.is_none());
        assert_eq!(session.active_id(), Some(a));
        assert_eq!(session.len(), 2);
    }

    #[test]
    fn test_file_loaded_announces_opened() {
        let mut session = Session::new();
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::FileLoaded {
                path: PathBuf::from("/tmp/a.md"),
                result: Ok(decoded("hello", None)),
            }),
        );
        assert!(matches!(
            cmd,
            Some(Cmd::Announce(AppEvent::DocumentOpened { .. }))
        ));
        assert_eq!(session.len(), 1);
    }

    #[test]
    fn test_file_loaded_with_warning_announces_both() {
        let mut session = Session::new();
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::FileLoaded {
                path: PathBuf::from("/tmp/a.md"),
                result: Ok(decoded("hello", Some("ambiguous bytes"))),
            }),
        );
        let Some(Cmd::Batch(cmds)) = cmd else {
            panic!("expected batch");
        };
        assert_eq!(cmds.len(), 2);
        assert!(matches!(
            cmds[1],
            Cmd::Announce(AppEvent::EncodingWarning { .. })
        ));
    }

    #[test]
    fn test_file_load_failure_announces_error() {
        let mut session = Session::new();
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::FileLoaded {
                path: PathBuf::from("/tmp/missing.md"),
                result: Err("no such file".to_string()),
            }),
        );
        assert!(matches!(
            cmd,
            Some(Cmd::Announce(AppEvent::LoadFailed { .. }))
        ));
        assert!(session.is_empty());
    }

    // ========================================================================
    // Saving
    // ========================================================================

    #[test]
    fn test_save_requested_produces_save_command() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "body");
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveRequested {
                id: Some(id),
                save_as: false,
            }),
        );
        let Some(Cmd::SaveDocument { id: save_id, request }) = cmd else {
            panic!("expected save command");
        };
        assert_eq!(save_id, id);
        assert_eq!(request.target_path, Some(PathBuf::from("/tmp/a.md")));
    }

    #[test]
    fn test_save_requested_defaults_to_active_document() {
        let mut session = Session::new();
        let _a = loaded(&mut session, "/tmp/a.md", "a");
        let b = loaded(&mut session, "/tmp/b.md", "b");
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveRequested {
                id: None,
                save_as: false,
            }),
        );
        let Some(Cmd::SaveDocument { id, .. }) = cmd else {
            panic!("expected save command");
        };
        assert_eq!(id, b);
    }

    #[test]
    fn test_unacknowledged_warning_blocks_save() {
        let mut session = Session::new();
        update(
            &mut session,
            Msg::App(AppMsg::FileLoaded {
                path: PathBuf::from("/tmp/a.md"),
                result: Ok(decoded("body", Some("could be Shift_JIS"))),
            }),
        );
        let id = session.active_id().unwrap();

        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveRequested {
                id: Some(id),
                save_as: false,
            }),
        );
        assert!(matches!(
            cmd,
            Some(Cmd::Announce(AppEvent::EncodingWarning { .. }))
        ));

        // acknowledging unblocks the save
        update(&mut session, Msg::Document(DocumentMsg::AcknowledgeWarning(id)));
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveRequested {
                id: Some(id),
                save_as: false,
            }),
        );
        assert!(matches!(cmd, Some(Cmd::SaveDocument { .. })));
    }

    #[test]
    fn test_save_completed_marks_document_clean() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "body");
        session.get_mut(id).unwrap().insert(0, "x");
        assert!(session.get(id).unwrap().is_modified);

        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveCompleted {
                id,
                outcome: SaveOutcome::Saved {
                    path: PathBuf::from("/tmp/a.md"),
                },
            }),
        );
        assert!(matches!(
            cmd,
            Some(Cmd::Announce(AppEvent::DocumentSaved { .. }))
        ));
        assert!(!session.get(id).unwrap().is_modified);
    }

    #[test]
    fn test_save_cancelled_leaves_document_dirty() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "body");
        session.get_mut(id).unwrap().insert(0, "x");

        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveCompleted {
                id,
                outcome: SaveOutcome::Cancelled,
            }),
        );
        assert!(cmd.is_none());
        assert!(session.get(id).unwrap().is_modified);
    }

    #[test]
    fn test_save_failure_announces_error() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "body");
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveCompleted {
                id,
                outcome: SaveOutcome::Failed {
                    error: "disk full".to_string(),
                },
            }),
        );
        assert!(matches!(
            cmd,
            Some(Cmd::Announce(AppEvent::SaveFailed { .. }))
        ));
    }

    // ========================================================================
    // Editing and settings
    // ========================================================================

    #[test]
    fn test_insert_and_delete() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "hello");
        update(
            &mut session,
            Msg::Document(DocumentMsg::Insert {
                id,
                char_idx: 5,
                text: " world".to_string(),
            }),
        );
        assert_eq!(session.get(id).unwrap().content(), "hello world");

        update(
            &mut session,
            Msg::Document(DocumentMsg::Delete { id, start: 0, end: 6 }),
        );
        assert_eq!(session.get(id).unwrap().content(), "world");
    }

    #[test]
    fn test_set_encoding_applies_to_next_save() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "body");
        update(
            &mut session,
            Msg::Document(DocumentMsg::SetEncoding {
                id,
                encoding: EncodingTag::ShiftJis,
            }),
        );
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::SaveRequested {
                id: Some(id),
                save_as: false,
            }),
        );
        let Some(Cmd::SaveDocument { request, .. }) = cmd else {
            panic!("expected save command");
        };
        assert_eq!(request.encoding, EncodingTag::ShiftJis);
    }

    // ========================================================================
    // Closing
    // ========================================================================

    #[test]
    fn test_close_announces_and_removes() {
        let mut session = Session::new();
        let id = loaded(&mut session, "/tmp/a.md", "a");
        let cmd = update(&mut session, Msg::App(AppMsg::CloseDocument(id)));
        assert!(matches!(
            cmd,
            Some(Cmd::Announce(AppEvent::DocumentClosed { .. }))
        ));
        assert!(session.is_empty());
    }

    #[test]
    fn test_close_unknown_document_is_noop() {
        let mut session = Session::new();
        let cmd = update(
            &mut session,
            Msg::App(AppMsg::CloseDocument(crate::model::DocumentId(7))),
        );
        assert!(cmd.is_none());
    }
}
