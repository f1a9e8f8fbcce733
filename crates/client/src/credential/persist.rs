// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Durable credential store: JSON file written through atomically.

use std::io::Write;
use std::path::{Path, PathBuf};

use parking_lot::RwLock;

use crate::credential::{CredentialStore, SessionRecord};

/// File name of the persisted session inside the state directory.
pub const SESSION_FILE: &str = "session.json";

/// Store backed by `<dir>/session.json`.
///
/// The file is read once on open; every update changes memory and rewrites
/// the file under the same write guard, so the file never lags behind a
/// later update. A failed write is logged and the in-memory value stays
/// authoritative for the rest of the process.
pub struct FileStore {
    path: PathBuf,
    record: RwLock<SessionRecord>,
}

impl FileStore {
    /// Open the store in `dir`, loading any previously persisted session.
    ///
    /// A missing file yields an empty session. A corrupt file is logged and
    /// treated as empty; the next write replaces it.
    pub fn open(dir: &Path) -> Self {
        let path = dir.join(SESSION_FILE);
        let record = match load(&path) {
            Ok(record) => record,
            Err(e) => {
                if path.exists() {
                    tracing::warn!(path = %path.display(), err = %e, "ignoring unreadable session file");
                }
                SessionRecord::default()
            }
        };
        Self { path, record: RwLock::new(record) }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl CredentialStore for FileStore {
    fn get(&self) -> SessionRecord {
        self.record.read().clone()
    }

    fn update(&self, f: &mut dyn FnMut(&mut SessionRecord)) {
        let mut guard = self.record.write();
        f(&mut guard);
        if let Err(e) = save(&self.path, &guard) {
            tracing::warn!(path = %self.path.display(), err = %e, "failed to persist session");
        }
    }
}

/// Load a persisted session from a JSON file.
pub fn load(path: &Path) -> anyhow::Result<SessionRecord> {
    let contents = std::fs::read_to_string(path)?;
    let record: SessionRecord = serde_json::from_str(&contents)?;
    Ok(record)
}

/// Save a session to a JSON file atomically (write tmp + rename).
///
/// Uses a unique temp filename (PID + counter) so two processes saving at
/// once never interleave bytes in the same `.tmp` file. The file is created
/// owner-only on unix since it holds bearer credentials.
pub fn save(path: &Path, record: &SessionRecord) -> anyhow::Result<()> {
    use std::sync::atomic::{AtomicU32, Ordering};
    static COUNTER: AtomicU32 = AtomicU32::new(0);

    if let Some(dir) = path.parent() {
        if !dir.as_os_str().is_empty() && !dir.exists() {
            std::fs::create_dir_all(dir)?;
        }
    }

    let json = serde_json::to_string_pretty(record)?;
    let seq = COUNTER.fetch_add(1, Ordering::Relaxed);
    let tmp_name = format!(
        "{}.{}.{}.tmp",
        path.file_name().unwrap_or_default().to_string_lossy(),
        std::process::id(),
        seq,
    );
    let tmp_path = path.with_file_name(tmp_name);
    let mut options = std::fs::OpenOptions::new();
    options.write(true).create_new(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        options.mode(0o600);
    }
    let mut file = options.open(&tmp_path)?;
    file.write_all(json.as_bytes())?;
    file.sync_all()?;
    drop(file);
    std::fs::rename(&tmp_path, path)?;
    Ok(())
}

#[cfg(test)]
#[path = "persist_tests.rs"]
mod tests;
