// svgward/src/utils/recording_store.rs
//! A `FileStore` wrapper that remembers what passed through it.
//!
//! The CLI needs the bytes before and after sanitization for `--diff` and the
//! JSON digests, and `--dry-run` needs every write to be discarded. Both are
//! handled here so the decision engine runs exactly as it does for a host.

use anyhow::{Result, anyhow};
use log::debug;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use svgward_core::{FileStore, LocalFileStore};

#[derive(Debug, Default)]
pub struct RecordingStore<F: FileStore = LocalFileStore> {
    inner: F,
    dry_run: bool,
    reads: Mutex<HashMap<PathBuf, Vec<u8>>>,
    writes: Mutex<HashMap<PathBuf, Vec<u8>>>,
}

impl<F: FileStore> RecordingStore<F> {
    pub fn new(inner: F, dry_run: bool) -> Self {
        Self {
            inner,
            dry_run,
            reads: Mutex::new(HashMap::new()),
            writes: Mutex::new(HashMap::new()),
        }
    }

    /// Removes and returns the recorded bytes read from, and written to, `path`.
    pub fn take(&self, path: &Path) -> (Option<Vec<u8>>, Option<Vec<u8>>) {
        let read = self.reads.lock().ok().and_then(|mut reads| reads.remove(path));
        let written = self.writes.lock().ok().and_then(|mut writes| writes.remove(path));
        (read, written)
    }
}

impl<F: FileStore> FileStore for RecordingStore<F> {
    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        let contents = self.inner.read_all(path)?;
        self.reads
            .lock()
            .map_err(|_| anyhow!("read log poisoned"))?
            .insert(path.to_path_buf(), contents.clone());
        Ok(contents)
    }

    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        if self.dry_run {
            debug!("Dry run: not writing {} bytes to {}", contents.len(), path.display());
        } else {
            self.inner.replace(path, contents)?;
        }
        self.writes
            .lock()
            .map_err(|_| anyhow!("write log poisoned"))?
            .insert(path.to_path_buf(), contents.to_vec());
        Ok(())
    }
}
