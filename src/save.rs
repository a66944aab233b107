//! Atomic save pipeline
//!
//! Persists a document's canonical text back to disk in its original byte
//! form without ever risking a half-written target file: bytes go to a
//! uniquely named temp sibling first and are renamed over the target only
//! once they are complete. A size-collapse tripwire catches the most common
//! real-world failure mode (wrong encoding, most characters dropped) before
//! it silently destroys data.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::encoding::{encode_for_disk, EncodingTag, Eol};

/// One save invocation. Created fresh per save, discarded after completion.
#[derive(Debug, Clone)]
pub struct SaveRequest {
    /// Destination; `None` means the user must be prompted for a path.
    pub target_path: Option<PathBuf>,
    /// Canonical text (LF line endings, form feeds escaped).
    pub content: String,
    /// Carried forward from detection, never re-detected.
    pub encoding: EncodingTag,
    pub eol: Eol,
}

/// Result of a save. Cancellation is not an error and leaves zero residual
/// state on disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved { path: PathBuf },
    Cancelled,
    Failed { error: String },
}

impl SaveOutcome {
    pub fn is_saved(&self) -> bool {
        matches!(self, SaveOutcome::Saved { .. })
    }
}

/// User-facing confirmation points of the pipeline. The runtime implements
/// this with native dialogs; tests use deterministic stubs. Prompts suspend
/// the save until answered; the only state held across the suspension is
/// the temp file already on disk.
pub trait SavePrompts {
    /// Ask for a destination path. `None` cancels the save.
    fn pick_save_path(&self, suggested: Option<&Path>) -> Option<PathBuf>;

    /// The freshly encoded output is suspiciously small compared to the
    /// file being replaced. `true` proceeds with the overwrite, `false`
    /// aborts it.
    fn confirm_size_collapse(&self, path: &Path, original_len: u64, new_len: u64) -> bool;
}

/// New output below this fraction of the original size trips the
/// confirmation prompt.
pub const DEFAULT_SIZE_GUARD_RATIO: f64 = 0.5;

/// Save with the default size-guard ratio. See [`save_with_ratio`].
pub fn save(request: &SaveRequest, prompts: &dyn SavePrompts) -> SaveOutcome {
    save_with_ratio(request, prompts, DEFAULT_SIZE_GUARD_RATIO)
}

/// Run the pipeline:
///
/// 1. Resolve the target path, prompting when the request has none.
/// 2. Re-encode the canonical text (form feeds restored, EOL applied)
///    with the encoding recorded at load time.
/// 3. Record the existing target's length, write the bytes to a unique
///    temp sibling in the same directory.
/// 4. If the new output is empty or collapsed below `ratio` of the
///    original, ask before proceeding; aborting deletes the temp file.
/// 5. Atomically rename the temp file over the target.
///
/// Any I/O failure removes the temp file (best effort; cleanup failures
/// are logged, never allowed to mask the primary error) and surfaces the
/// underlying message.
pub fn save_with_ratio(
    request: &SaveRequest,
    prompts: &dyn SavePrompts,
    ratio: f64,
) -> SaveOutcome {
    let path = match &request.target_path {
        Some(path) => path.clone(),
        None => match prompts.pick_save_path(None) {
            Some(path) => path,
            None => {
                tracing::debug!("save cancelled at path selection");
                return SaveOutcome::Cancelled;
            }
        },
    };

    match write_atomic(&path, request, prompts, ratio) {
        Ok(true) => {
            tracing::info!(path = %path.display(), encoding = %request.encoding, "saved");
            SaveOutcome::Saved { path }
        }
        Ok(false) => {
            tracing::info!(path = %path.display(), "save aborted at size confirmation");
            SaveOutcome::Cancelled
        }
        Err(e) => {
            tracing::warn!(path = %path.display(), error = %e, "save failed");
            SaveOutcome::Failed {
                error: e.to_string(),
            }
        }
    }
}

/// Ok(true) = renamed into place, Ok(false) = user aborted. The temp file
/// is gone in every non-Saved outcome: `NamedTempFile` removes it on drop,
/// and the explicit `close` on abort logs any cleanup failure.
fn write_atomic(
    path: &Path,
    request: &SaveRequest,
    prompts: &dyn SavePrompts,
    ratio: f64,
) -> std::io::Result<bool> {
    let bytes = encode_for_disk(&request.content, request.encoding, request.eol);

    let original_len = fs::metadata(path).map(|m| m.len()).ok();

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let stem = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "untitled".to_string());

    // Temp sibling in the same directory so the rename below stays on one
    // filesystem and is atomic. The random infix keeps overlapping saves
    // from colliding.
    let mut temp = tempfile::Builder::new()
        .prefix(&format!(".{}.", stem))
        .suffix(".tmp")
        .tempfile_in(dir)?;
    temp.write_all(&bytes)?;
    temp.as_file().sync_all()?;

    let new_len = bytes.len() as u64;
    if let Some(original_len) = original_len {
        if size_collapsed(original_len, new_len, ratio)
            && !prompts.confirm_size_collapse(path, original_len, new_len)
        {
            if let Err(e) = temp.close() {
                tracing::warn!(error = %e, "failed to remove temp file after abort");
            }
            return Ok(false);
        }
    }

    temp.persist(path).map_err(|e| e.error)?;
    Ok(true)
}

/// Empty output, or output under `ratio` of the original size, is a
/// suspicious truncation signal. Empty output trips the guard whenever a
/// file is being replaced, even a zero-byte one.
fn size_collapsed(original_len: u64, new_len: u64, ratio: f64) -> bool {
    new_len == 0 || (new_len as f64) < (original_len as f64) * ratio
}
