//! Filesystem-backed key-value store.
//!
//! [`FileBackend`] keeps one file per key inside a base directory so that
//! documents survive server restarts.
//!
//! ## Layout
//!
//! ```text
//! <base_dir>/
//! ├── 6e6f7465732d…          # hex-encoded key, holds the value text
//! └── 6e6f7465732d….<uuid>.tmp   # transient, one per in-flight put
//! ```
//!
//! Keys are hex-encoded before they become file names, so a user ID taken
//! from a cookie can never escape the base directory or collide with
//! another key. Each put writes the whole value to its own sibling temp
//! file and renames it over the target, so readers see either the old
//! value or one complete new value. Overlapping puts to one key never
//! share a temp file; the last rename wins.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{KvBackend, Result};

#[derive(Clone, Debug)]
pub struct FileBackend {
    base: PathBuf,
}

impl FileBackend {
    pub fn new(base: impl Into<PathBuf>) -> Self {
        Self { base: base.into() }
    }

    pub fn base_dir(&self) -> &Path {
        &self.base
    }

    fn value_path(&self, key: &str) -> PathBuf {
        self.base.join(hex::encode(key.as_bytes()))
    }
}

impl KvBackend for FileBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        match tokio::fs::read_to_string(self.value_path(key)).await {
            Ok(value) => Ok(Some(value)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        tokio::fs::create_dir_all(&self.base).await?;
        let path = self.value_path(key);
        let tmp = path.with_extension(format!("{}.tmp", Uuid::new_v4().simple()));
        if let Err(e) = tokio::fs::write(&tmp, value).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        if let Err(e) = tokio::fs::rename(&tmp, &path).await {
            let _ = tokio::fs::remove_file(&tmp).await;
            return Err(e.into());
        }
        Ok(())
    }
}
