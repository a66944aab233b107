//! Runtime - owns the session, executes commands, pumps messages
//!
//! The update functions stay pure; this is where the side effects happen.
//! File loads and saves run on background threads and post their results
//! back through an mpsc channel as messages, which feed back into the
//! update loop.

use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use crate::bus::{AppEvent, EventBus};
use crate::commands::Cmd;
use crate::config::AppConfig;
use crate::encoding::{detect_with, DetectorConfig};
use crate::messages::{AppMsg, Msg};
use crate::model::Session;
use crate::recent_files::RecentFiles;
use crate::save::{save_with_ratio, SavePrompts};
use crate::update::update;

/// Native dialog implementation of the save prompts
pub struct DialogPrompts;

impl SavePrompts for DialogPrompts {
    fn pick_save_path(&self, suggested: Option<&Path>) -> Option<PathBuf> {
        let mut dlg = rfd::FileDialog::new();
        if let Some(path) = suggested {
            if let Some(dir) = path.parent() {
                dlg = dlg.set_directory(dir);
            }
            if let Some(name) = path.file_name() {
                dlg = dlg.set_file_name(name.to_string_lossy());
            }
        }
        dlg.save_file()
    }

    fn confirm_size_collapse(&self, path: &Path, original_len: u64, new_len: u64) -> bool {
        let result = rfd::MessageDialog::new()
            .set_level(rfd::MessageLevel::Warning)
            .set_title("Save anyway?")
            .set_description(format!(
                "The encoded output for {} is {} bytes, much smaller than the {} bytes \
                 currently on disk. Overwrite?",
                path.display(),
                new_len,
                original_len
            ))
            .set_buttons(rfd::MessageButtons::OkCancel)
            .show();
        result == rfd::MessageDialogResult::Ok
    }
}

/// Owns the session and drives the message loop
pub struct Runtime {
    session: Session,
    bus: EventBus,
    config: AppConfig,
    recent: RecentFiles,
    prompts: Arc<dyn SavePrompts + Send + Sync>,
    msg_tx: Sender<Msg>,
    msg_rx: Receiver<Msg>,
    /// Background operations in flight (loads + saves)
    pending: usize,
}

impl Runtime {
    pub fn new(config: AppConfig) -> Self {
        Self::with_prompts(config, Arc::new(DialogPrompts))
    }

    /// Construct with injected prompts (deterministic stubs in tests)
    pub fn with_prompts(config: AppConfig, prompts: Arc<dyn SavePrompts + Send + Sync>) -> Self {
        let (msg_tx, msg_rx) = mpsc::channel();
        Self {
            session: Session::new(),
            bus: EventBus::new(),
            config,
            recent: RecentFiles::default(),
            prompts,
            msg_tx,
            msg_rx,
            pending: 0,
        }
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn recent_files(&self) -> &RecentFiles {
        &self.recent
    }

    pub fn recent_files_mut(&mut self) -> &mut RecentFiles {
        &mut self.recent
    }

    /// Channel for posting messages from outside the runtime
    pub fn sender(&self) -> Sender<Msg> {
        self.msg_tx.clone()
    }

    /// Run one message through the update loop and execute the side effects
    pub fn dispatch(&mut self, msg: Msg) {
        // Completions decrement the in-flight counter before the state
        // transition runs.
        if let Msg::App(AppMsg::FileLoaded { .. } | AppMsg::SaveCompleted { .. }) = &msg {
            self.pending = self.pending.saturating_sub(1);
        }

        if let Some(cmd) = update(&mut self.session, msg) {
            self.execute(cmd);
        }
    }

    /// Block until every in-flight background operation has completed and
    /// its completion message has been processed.
    pub fn run_until_idle(&mut self) {
        while self.pending > 0 {
            match self.msg_rx.recv() {
                Ok(msg) => self.dispatch(msg),
                Err(_) => break,
            }
        }
        // Drain anything the completions queued behind them
        while let Ok(msg) = self.msg_rx.try_recv() {
            self.dispatch(msg);
        }
    }

    fn execute(&mut self, cmd: Cmd) {
        match cmd {
            Cmd::LoadFile { path } => {
                self.pending += 1;
                let tx = self.msg_tx.clone();
                let detector = DetectorConfig {
                    prefer_utf8: self.config.prefer_utf8,
                };
                std::thread::spawn(move || {
                    let result = std::fs::read(&path)
                        .map(|bytes| detect_with(&bytes, &detector))
                        .map_err(|e| e.to_string());
                    let _ = tx.send(Msg::App(AppMsg::FileLoaded { path, result }));
                });
            }

            Cmd::SaveDocument { id, request } => {
                self.pending += 1;
                let tx = self.msg_tx.clone();
                let prompts = Arc::clone(&self.prompts);
                let ratio = self.config.size_guard_ratio;
                std::thread::spawn(move || {
                    let outcome = save_with_ratio(&request, prompts.as_ref(), ratio);
                    let _ = tx.send(Msg::App(AppMsg::SaveCompleted { id, outcome }));
                });
            }

            Cmd::Announce(event) => {
                if let AppEvent::DocumentOpened { id, path } = &event {
                    let encoding = self
                        .session
                        .get(*id)
                        .map(|doc| doc.encoding.display_name().to_string());
                    self.recent.add(path.clone(), encoding);
                }
                self.bus.publish(&event);
            }

            Cmd::Batch(cmds) => {
                for cmd in cmds {
                    self.execute(cmd);
                }
            }
        }
    }
}
