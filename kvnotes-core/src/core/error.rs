//! Error types for the kvnotes core library.

use thiserror::Error;

/// All errors that can occur within the kvnotes core library.
#[derive(Debug, Error)]
pub enum NotesError {
    /// A category ID was referenced that does not exist in the user's document.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// A note ID was referenced that does not exist in the user's document.
    #[error("Note not found: {0}")]
    NoteNotFound(String),

    /// A request arrived without a user identifier.
    #[error("Unauthorized")]
    Unauthorized,

    /// A required input field was missing.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The session cookie codec could not be built or used.
    #[error("Invalid session: {0}")]
    InvalidSession(String),

    /// The key-value backend rejected a read or write.
    #[error("Backend error: {0}")]
    Backend(String),

    /// An I/O operation on the filesystem failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A stored document could not be serialized or deserialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Convenience alias that pins the error type to [`NotesError`].
pub type Result<T> = std::result::Result<T, NotesError>;

impl NotesError {
    /// Returns `true` for the variants that mean "the referenced entity is gone".
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::CategoryNotFound(_) | Self::NoteNotFound(_))
    }

    /// Returns a short, human-readable message suitable for display to the end user.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::CategoryNotFound(_) => "Category no longer exists".to_string(),
            Self::NoteNotFound(_) => "Note no longer exists".to_string(),
            Self::Unauthorized => "Unauthorized".to_string(),
            Self::InvalidInput(msg) => msg.clone(),
            Self::InvalidSession(_) => "Session could not be read".to_string(),
            Self::Backend(e) => format!("Failed to save: {e}"),
            Self::Io(e) => format!("File error: {e}"),
            Self::Json(e) => format!("Data format error: {e}"),
        }
    }
}
