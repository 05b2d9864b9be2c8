//! The key-value storage contract the notes store is written against.
//!
//! A backend is a flat map from string keys to string values with two
//! operations and nothing else: no listing, no transactions, no
//! conditional writes. Two implementations ship with the crate:
//! [`MemoryBackend`](super::memory::MemoryBackend) and
//! [`FileBackend`](super::file_backend::FileBackend).

use crate::Result;
use std::future::Future;

/// Durable string-keyed storage.
///
/// Futures are required to be `Send` so that stores built on any backend
/// can be driven from a multi-threaded HTTP server.
pub trait KvBackend: Send + Sync {
    /// Reads the value stored under `key`, or `None` if nothing was ever written.
    fn get(&self, key: &str) -> impl Future<Output = Result<Option<String>>> + Send;

    /// Overwrites the value stored under `key`.
    fn put(&self, key: &str, value: String) -> impl Future<Output = Result<()>> + Send;
}
