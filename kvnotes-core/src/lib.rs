//! Core library for kvnotes — per-user note categories kept as one JSON
//! document in a key-value store.
//!
//! The primary entry point is [`NotesStore`], which performs every read and
//! write of a user's [`NotesDocument`] against a [`KvBackend`]. Callers pass
//! the user ID explicitly; [`SessionCodec`] is how an HTTP front end derives
//! that ID from a signed cookie.
//!
//! Types are re-exported from their respective sub-modules for convenience;
//! consumers should import from the crate root rather than the `core` module.

pub mod core;

// Re-export commonly used types.
#[doc(inline)]
pub use core::{
    backend::KvBackend,
    error::{NotesError, Result},
    file_backend::FileBackend,
    memory::MemoryBackend,
    note::{Category, Note, NotesDocument},
    session::{Session, SessionCodec, DEFAULT_COOKIE_NAME, USER_ID_KEY},
    settings::{load_settings, load_settings_or_default, save_settings, settings_file_path, Settings},
    store::{user_key, NotesStore, KEY_PREFIX},
    summary::{category_initials, NoteSummary},
};
