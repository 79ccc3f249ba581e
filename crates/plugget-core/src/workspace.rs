//! Scratch workspace for the downloaded archive and its extracted contents.
//!
//! One directory per run, exclusively owned. `Drop` removes it on every
//! exit path: normal return, error return, or panic unwind.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Ephemeral working directory.
///
/// Prefers a secure platform temp directory (`tempfile`); if that fails,
/// falls back to a PID-suffixed path under the shared temp root, which this
/// type then removes itself.
#[derive(Debug)]
pub struct ScratchDir {
    /// `Some` when `tempfile` owns the directory and removes it on drop.
    secure: Option<tempfile::TempDir>,
    path: PathBuf,
}

impl ScratchDir {
    pub fn new() -> Result<Self> {
        match tempfile::Builder::new().prefix("plugget-").tempdir() {
            Ok(dir) => {
                let path = dir.path().to_path_buf();
                tracing::debug!("scratch workspace at {}", path.display());
                Ok(Self {
                    secure: Some(dir),
                    path,
                })
            }
            Err(err) => {
                let path = std::env::temp_dir().join(format!("plugget.{}", std::process::id()));
                tracing::warn!(
                    "secure temp dir creation failed ({}); falling back to {}",
                    err,
                    path.display()
                );
                fs::create_dir_all(&path)
                    .with_context(|| format!("create scratch dir {}", path.display()))?;
                Ok(Self { secure: None, path })
            }
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl Drop for ScratchDir {
    fn drop(&mut self) {
        // The tempfile-owned variant cleans up itself.
        if self.secure.is_none() {
            if let Err(err) = fs::remove_dir_all(&self.path) {
                tracing::warn!(
                    "failed to remove scratch dir {}: {}",
                    self.path.display(),
                    err
                );
            }
        }
    }
}
