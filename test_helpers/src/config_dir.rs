//! Temporary directories holding configuration documents.

use anyhow::{Context, Result, anyhow};
use camino::{Utf8Path, Utf8PathBuf};
use tempfile::TempDir;

/// A temporary directory deleted on drop.
#[derive(Debug)]
pub struct ConfigDir {
    _dir: TempDir,
    root: Utf8PathBuf,
}

impl ConfigDir {
    /// Create an empty directory.
    ///
    /// # Errors
    ///
    /// Fails when the directory cannot be created or its path is not UTF-8.
    pub fn new() -> Result<Self> {
        let dir = tempfile::tempdir().context("create temporary config dir")?;
        let root = Utf8PathBuf::from_path_buf(dir.path().to_path_buf())
            .map_err(|path| anyhow!("non UTF-8 temp path: {}", path.display()))?;
        Ok(Self { _dir: dir, root })
    }

    /// Directory path.
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.root
    }

    /// Path of `name` inside the directory, whether or not it exists.
    #[must_use]
    pub fn join(&self, name: &str) -> Utf8PathBuf {
        self.root.join(name)
    }

    /// Write `contents` to `name`, replacing any previous file.
    ///
    /// # Errors
    ///
    /// Fails when the file cannot be written.
    pub fn write(&self, name: &str, contents: &str) -> Result<Utf8PathBuf> {
        let path = self.join(name);
        std::fs::write(&path, contents).with_context(|| format!("write {path}"))?;
        Ok(path)
    }
}
