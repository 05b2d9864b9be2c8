use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use crate::{KvBackend, NotesError, Result};

/// In-memory backend for tests and throwaway servers.
///
/// Clones share the same map.
#[derive(Clone, Debug, Default)]
pub struct MemoryBackend {
    entries: Arc<Mutex<HashMap<String, String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of keys written so far.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::Backend`] if the map's lock is poisoned.
    pub fn len(&self) -> Result<usize> {
        Ok(self.entries.lock().map_err(poisoned)?.len())
    }

    pub fn is_empty(&self) -> Result<bool> {
        Ok(self.len()? == 0)
    }
}

fn poisoned<T>(_: T) -> NotesError {
    NotesError::Backend("memory backend lock poisoned".to_string())
}

impl KvBackend for MemoryBackend {
    async fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.entries.lock().map_err(poisoned)?.get(key).cloned())
    }

    async fn put(&self, key: &str, value: String) -> Result<()> {
        self.entries
            .lock()
            .map_err(poisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }
}
