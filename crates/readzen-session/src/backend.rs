// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Storage backends for the opaque preference blob.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use readzen_core::error::{ReaderError, Result};
use tracing::debug;

use crate::data_dir;

/// Where the preference blob lives.
///
/// A backend only moves strings; parsing and merging belong to
/// [`PreferenceStore`](crate::PreferenceStore).
pub trait PreferenceBackend: Send {
    /// Read the stored blob, `None` when nothing has been stored yet.
    fn read(&self) -> Result<Option<String>>;

    /// Replace the stored blob.
    fn write(&self, blob: &str) -> Result<()>;
}

/// JSON file on disk.
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `preferences.json` inside `dir`.
    pub fn in_dir(dir: impl AsRef<Path>) -> Self {
        Self::new(dir.as_ref().join(data_dir::PREFERENCES_FILE))
    }

    /// The per-user default location.
    pub fn default_location() -> Self {
        Self::new(data_dir::preferences_path())
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl PreferenceBackend for FileBackend {
    fn read(&self) -> Result<Option<String>> {
        match std::fs::read_to_string(&self.path) {
            Ok(blob) => Ok(Some(blob)),
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no stored preferences yet");
                Ok(None)
            }
            Err(e) => Err(ReaderError::Io(e)),
        }
    }

    fn write(&self, blob: &str) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(&self.path, blob)?;
        Ok(())
    }
}

/// Blob held in memory. Clones share the same slot, so a test can keep a
/// handle and inspect what the store wrote.
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Arc<Mutex<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start with an existing blob, as if a previous session had written it.
    pub fn with_blob(blob: impl Into<String>) -> Self {
        Self {
            slot: Arc::new(Mutex::new(Some(blob.into()))),
        }
    }

    /// The blob currently stored.
    pub fn snapshot(&self) -> Option<String> {
        self.read().ok().flatten()
    }
}

impl PreferenceBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>> {
        let guard = self
            .slot
            .lock()
            .map_err(|_| ReaderError::Storage("memory backend lock poisoned".into()))?;
        Ok(guard.clone())
    }

    fn write(&self, blob: &str) -> Result<()> {
        let mut guard = self
            .slot
            .lock()
            .map_err(|_| ReaderError::Storage("memory backend lock poisoned".into()))?;
        *guard = Some(blob.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_clones_share_storage() {
        let backend = MemoryBackend::new();
        let handle = backend.clone();
        assert_eq!(handle.snapshot(), None);
        backend.write("{}").unwrap();
        assert_eq!(handle.snapshot().as_deref(), Some("{}"));
    }

    #[test]
    fn in_dir_uses_preferences_file_name() {
        let backend = FileBackend::in_dir("/some/dir");
        assert_eq!(backend.path(), Path::new("/some/dir/preferences.json"));
    }
}
