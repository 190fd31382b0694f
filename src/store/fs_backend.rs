use super::backend::StorageBackend;
use crate::error::{LumbungError, Result};
use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// File-backed storage: one `<key>.json` document per namespace under a
/// root directory. Writes go to a temp file first and are renamed into
/// place, so a crash mid-write never leaves a torn document.
pub struct FsBackend {
    root: PathBuf,
}

impl FsBackend {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{}.json", sanitize_key(key)))
    }

    fn ensure_dir(&self) -> Result<()> {
        if !self.root.exists() {
            fs::create_dir_all(&self.root).map_err(LumbungError::Io)?;
        }
        Ok(())
    }
}

/// Map a namespace key to a safe filename stem. Keys are expected to be
/// plain identifiers; anything else is flattened to '_'.
fn sanitize_key(key: &str) -> String {
    key.chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect()
}

impl StorageBackend for FsBackend {
    fn read(&self, key: &str) -> Result<Option<String>> {
        let path = self.key_path(key);
        if !path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(path).map_err(LumbungError::Io)?;
        Ok(Some(content))
    }

    fn write(&self, key: &str, value: &str) -> Result<()> {
        self.ensure_dir()?;
        let target = self.key_path(key);

        // Atomic write
        let tmp = self
            .root
            .join(format!(".{}-{}.tmp", sanitize_key(key), Uuid::new_v4()));
        fs::write(&tmp, value).map_err(LumbungError::Io)?;
        fs::rename(&tmp, target).map_err(LumbungError::Io)?;

        Ok(())
    }

    fn remove(&self, key: &str) -> Result<()> {
        let path = self.key_path(key);
        if path.exists() {
            fs::remove_file(path).map_err(LumbungError::Io)?;
        }
        Ok(())
    }
}
