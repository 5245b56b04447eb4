//! JSON document on the local filesystem.

use async_trait::async_trait;
use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use super::RetainedStore;
use crate::error::{Error, Result};
use crate::types::RetainedSet;

/// Retained set stored as `retained_servers.json` (or any configured path).
///
/// Writes go through a temporary file in the same directory followed by a
/// rename, so readers never observe a partially written document.
#[derive(Debug, Clone)]
pub struct FileRetainedStore {
    path: PathBuf,
}

impl FileRetainedStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_blocking(path: &Path) -> Result<RetainedSet> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                debug!("No retained list at {:?}, starting empty", path);
                return Ok(RetainedSet::new());
            }
            Err(e) => return Err(Error::Store(format!("read {:?}: {}", path, e))),
        };

        if content.trim().is_empty() {
            return Ok(RetainedSet::new());
        }

        serde_json::from_str(&content)
            .map_err(|e| Error::Store(format!("parse {:?}: {}", path, e)))
    }

    fn write_blocking(path: &Path, retained: &RetainedSet) -> Result<()> {
        let dir = match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
            _ => PathBuf::from("."),
        };
        std::fs::create_dir_all(&dir)
            .map_err(|e| Error::Store(format!("create {:?}: {}", dir, e)))?;

        let json = serde_json::to_vec(retained)?;
        let mut tmp = tempfile::NamedTempFile::new_in(&dir)
            .map_err(|e| Error::Store(format!("temp file in {:?}: {}", dir, e)))?;
        tmp.write_all(&json)
            .and_then(|_| tmp.as_file().sync_all())
            .map_err(|e| Error::Store(format!("write {:?}: {}", path, e)))?;
        tmp.persist(path)
            .map_err(|e| Error::Store(format!("replace {:?}: {}", path, e.error)))?;
        Ok(())
    }

    fn clear_blocking(path: &Path) -> Result<()> {
        match std::fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(Error::Store(format!("remove {:?}: {}", path, e))),
        }
    }

    async fn blocking<T, F>(&self, f: F) -> Result<T>
    where
        T: Send + 'static,
        F: FnOnce(&Path) -> Result<T> + Send + 'static,
    {
        let path = self.path.clone();
        tokio::task::spawn_blocking(move || f(&path))
            .await
            .map_err(|e| Error::Store(format!("storage task failed: {}", e)))?
    }
}

#[async_trait]
impl RetainedStore for FileRetainedStore {
    async fn read(&self) -> Result<RetainedSet> {
        let retained = self.blocking(Self::read_blocking).await?;
        debug!(count = retained.len(), "Retained list loaded");
        Ok(retained)
    }

    async fn write(&self, retained: &RetainedSet) -> Result<()> {
        let snapshot = retained.clone();
        self.blocking(move |path| Self::write_blocking(path, &snapshot))
            .await?;
        info!(count = retained.len(), "Retained list saved");
        Ok(())
    }

    async fn clear(&self) -> Result<()> {
        self.blocking(Self::clear_blocking).await?;
        info!("Retained list cleared");
        Ok(())
    }
}
