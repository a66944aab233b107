//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use sumi::config::AppConfig;
use sumi::runtime::Runtime;
use sumi::save::SavePrompts;

/// Deterministic save prompts for driving the pipeline without dialogs
pub struct TestPrompts {
    pick: Mutex<Option<PathBuf>>,
    confirm_collapse: bool,
    collapse_asks: Mutex<Vec<(u64, u64)>>,
}

impl TestPrompts {
    /// Cancels path prompts, confirms size-collapse prompts
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            pick: Mutex::new(None),
            confirm_collapse: true,
            collapse_asks: Mutex::new(Vec::new()),
        })
    }

    /// Answers path prompts with `path`
    pub fn picking(path: PathBuf) -> Arc<Self> {
        Arc::new(Self {
            pick: Mutex::new(Some(path)),
            confirm_collapse: true,
            collapse_asks: Mutex::new(Vec::new()),
        })
    }

    /// Refuses size-collapse prompts
    pub fn refusing_collapse() -> Arc<Self> {
        Arc::new(Self {
            pick: Mutex::new(None),
            confirm_collapse: false,
            collapse_asks: Mutex::new(Vec::new()),
        })
    }

    /// How many times the size-collapse prompt was shown
    pub fn collapse_ask_count(&self) -> usize {
        self.collapse_asks.lock().unwrap().len()
    }
}

impl SavePrompts for TestPrompts {
    fn pick_save_path(&self, _suggested: Option<&Path>) -> Option<PathBuf> {
        self.pick.lock().unwrap().clone()
    }

    fn confirm_size_collapse(&self, _path: &Path, original_len: u64, new_len: u64) -> bool {
        self.collapse_asks
            .lock()
            .unwrap()
            .push((original_len, new_len));
        self.confirm_collapse
    }
}

/// Runtime wired to stub prompts and default config
pub fn test_runtime(prompts: Arc<TestPrompts>) -> Runtime {
    Runtime::with_prompts(AppConfig::default(), prompts)
}

/// Write raw fixture bytes into `dir` and return the path
pub fn write_fixture(dir: &Path, name: &str, bytes: &[u8]) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, bytes).unwrap();
    path
}

/// Shift_JIS bytes for "テスト"
pub const SJIS_TESUTO: [u8; 6] = [0x83, 0x65, 0x83, 0x58, 0x83, 0x67];

/// EUC-JP bytes for "あ"
pub const EUC_A: [u8; 2] = [0xA4, 0xA2];

/// ISO-2022-JP bytes for "あ" (ESC $ B, hiragana, ESC ( B)
pub const JIS_A: [u8; 8] = [0x1B, 0x24, 0x42, 0x24, 0x22, 0x1B, 0x28, 0x42];
