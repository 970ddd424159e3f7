//! File access used by the decision engine.
//!
//! The validator reads a document once and, when sanitization changed it,
//! replaces it once. Both go through the [`FileStore`] trait so hosts can
//! plug in their own storage layer.
//!
//! The core does not lock per path. Callers must not validate the same path
//! from two places at once.
//!
//! License: MIT OR Apache-2.0

use anyhow::{Context, Result};
use log::debug;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};

const REPLACE_TMP_SUFFIX: &str = ".svgward-tmp";

pub trait FileStore: Send + Sync {
    fn read_all(&self, path: &Path) -> Result<Vec<u8>>;

    /// Replaces the contents of `path` with `contents`.
    ///
    /// On error the previous contents must still be in place.
    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()>;
}

/// Local filesystem store.
///
/// New content goes to a sibling temp file which is flushed, synced and then
/// renamed over the original.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileStore;

impl LocalFileStore {
    pub fn new() -> Self {
        Self
    }

    fn temp_path_for(path: &Path) -> PathBuf {
        let mut name = path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(REPLACE_TMP_SUFFIX);
        path.with_file_name(name)
    }
}

impl FileStore for LocalFileStore {
    fn read_all(&self, path: &Path) -> Result<Vec<u8>> {
        fs::read(path).with_context(|| format!("Failed to read {}", path.display()))
    }

    fn replace(&self, path: &Path, contents: &[u8]) -> Result<()> {
        let tmp_path = Self::temp_path_for(path);
        debug!("Writing {} bytes to {}", contents.len(), tmp_path.display());

        let written = (|| -> Result<()> {
            let mut tmp = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&tmp_path)
                .with_context(|| format!("Failed to create {}", tmp_path.display()))?;
            fs2::FileExt::lock_exclusive(&tmp)?;
            tmp.write_all(contents)?;
            tmp.flush()?;
            tmp.sync_all()?;
            fs2::FileExt::unlock(&tmp)?;
            Ok(())
        })();

        if let Err(e) = written {
            let _ = fs::remove_file(&tmp_path);
            return Err(e);
        }

        if let Err(e) = fs::rename(&tmp_path, path) {
            let _ = fs::remove_file(&tmp_path);
            return Err(e).with_context(|| format!("Failed to replace {}", path.display()));
        }
        Ok(())
    }
}
