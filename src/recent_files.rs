//! Persistent recent files list
//!
//! Tracks files opened in the app and persists them to disk.
//! Files are stored in MRU (most recently used) order with a capacity
//! limit. Each entry remembers the encoding the file was detected as, so
//! the recent-files view can surface it.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::SystemTime;

/// Maximum number of entries to keep
const MAX_ENTRIES: usize = 50;

/// A single entry in the recent files list
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecentEntry {
    /// Absolute path to the file
    pub path: PathBuf,
    /// Timestamp when last opened (Unix epoch seconds)
    pub opened_at: u64,
    /// Encoding label the file was last opened with (e.g., "Shift_JIS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub encoding: Option<String>,
    /// Number of times file has been opened (for ranking)
    #[serde(default)]
    pub open_count: u32,
}

impl RecentEntry {
    /// Create a new entry for the current time
    pub fn new(path: PathBuf, encoding: Option<String>) -> Self {
        Self {
            path,
            opened_at: now_epoch_secs(),
            encoding,
            open_count: 1,
        }
    }

    /// Update entry for re-opening
    pub fn touch(&mut self) {
        self.opened_at = now_epoch_secs();
        self.open_count += 1;
    }

    /// Display name (filename, falling back to the full path)
    pub fn display_path(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_else(|| self.path.to_string_lossy().to_string())
    }

    /// Get human-readable time since opened
    pub fn time_ago(&self) -> String {
        let now = now_epoch_secs();
        let diff = now.saturating_sub(self.opened_at);

        if diff < 60 {
            "just now".to_string()
        } else if diff < 3600 {
            let mins = diff / 60;
            format!("{} min{} ago", mins, if mins == 1 { "" } else { "s" })
        } else if diff < 86400 {
            let hours = diff / 3600;
            format!("{} hour{} ago", hours, if hours == 1 { "" } else { "s" })
        } else if diff < 604800 {
            let days = diff / 86400;
            format!("{} day{} ago", days, if days == 1 { "" } else { "s" })
        } else {
            let weeks = diff / 604800;
            format!("{} week{} ago", weeks, if weeks == 1 { "" } else { "s" })
        }
    }

    /// Check if file still exists
    pub fn exists(&self) -> bool {
        self.path.exists()
    }
}

fn now_epoch_secs() -> u64 {
    SystemTime::now()
        .duration_since(SystemTime::UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

/// Persistent recent files list
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RecentFiles {
    /// Schema version for forward compatibility
    #[serde(default)]
    pub version: u32,
    /// Recent file entries, most recent first
    pub entries: Vec<RecentEntry>,
}

impl RecentFiles {
    pub const CURRENT_VERSION: u32 = 1;

    /// Load recent files from disk
    pub fn load() -> Self {
        let Some(path) = crate::config_paths::recent_files_path() else {
            return Self::default();
        };
        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                let mut recent: Self = serde_json::from_str(&contents).unwrap_or_default();
                recent.prune_missing();
                recent
            }
            Err(_) => Self::default(),
        }
    }

    /// Save recent files to disk
    pub fn save(&self) -> std::io::Result<()> {
        let Some(path) = crate::config_paths::recent_files_path() else {
            return Err(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "No config directory available",
            ));
        };
        if let Err(e) = crate::config_paths::ensure_config_dir() {
            tracing::warn!("Failed to ensure config directory: {}", e);
        }
        let contents = serde_json::to_string_pretty(self)?;
        std::fs::write(path, contents)
    }

    /// Add a file to recent list (or update if already present)
    pub fn add(&mut self, path: PathBuf, encoding: Option<String>) {
        // Canonicalize path for consistent matching
        let canonical = path.canonicalize().unwrap_or(path);

        if let Some(idx) = self.find_index(&canonical) {
            // Update existing entry and move to front
            self.entries[idx].touch();
            if encoding.is_some() {
                self.entries[idx].encoding = encoding;
            }
            let entry = self.entries.remove(idx);
            self.entries.insert(0, entry);
        } else {
            let entry = RecentEntry::new(canonical, encoding);
            self.entries.insert(0, entry);
        }

        self.entries.truncate(MAX_ENTRIES);
    }

    /// Remove a file from recent list
    pub fn remove(&mut self, path: &Path) {
        let canonical = path.canonicalize().unwrap_or_else(|_| path.to_path_buf());
        self.entries.retain(|e| e.path != canonical);
    }

    /// Clear all recent files
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Prune entries for files that no longer exist
    pub fn prune_missing(&mut self) {
        let original_len = self.entries.len();
        self.entries.retain(|e| e.exists());
        if self.entries.len() != original_len {
            tracing::debug!(
                "Pruned {} missing files from recent list",
                original_len - self.entries.len()
            );
        }
    }

    /// Find index of entry by path
    fn find_index(&self, path: &Path) -> Option<usize> {
        self.entries.iter().position(|e| e.path == path)
    }
}
