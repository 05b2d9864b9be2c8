//! The per-user document and the entities it contains.
//!
//! A [`NotesDocument`] is the unit of storage: one JSON value per user,
//! holding an ordered list of [`Category`] entries, each of which owns an
//! ordered list of [`Note`] entries. Ownership is by containment only; a
//! note carries no back-reference to its category.
//!
//! The serialized shape is fixed:
//!
//! ```json
//! {"categories":[{"id":"…","name":"…","notes":[{"id":"…","title":"…","body":"…"}]}]}
//! ```
//!
//! The lookup and removal helpers here are plain linear scans. They never
//! touch storage; [`NotesStore`](super::store::NotesStore) wraps them in a
//! load/mutate/save cycle.

use crate::{NotesError, Result};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A single note. `title` may be empty while the note is still being written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
    pub id: String,
    pub title: String,
    pub body: String,
}

impl Note {
    /// Creates a note with a freshly generated ID.
    pub fn new(title: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            title: title.into(),
            body: body.into(),
        }
    }
}

/// A named group of notes. `name` may be empty while the category is being created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub notes: Vec<Note>,
}

impl Category {
    /// Creates an empty category with a freshly generated ID.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            name: name.into(),
            notes: Vec::new(),
        }
    }

    /// Looks up a note owned directly by this category.
    pub fn note(&self, note_id: &str) -> Option<&Note> {
        self.notes.iter().find(|n| n.id == note_id)
    }

    /// Mutable lookup of a note owned by this category.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] if this category has no such note.
    pub fn note_mut(&mut self, note_id: &str) -> Result<&mut Note> {
        self.notes
            .iter_mut()
            .find(|n| n.id == note_id)
            .ok_or_else(|| NotesError::NoteNotFound(note_id.to_string()))
    }
}

/// Everything stored for one user.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotesDocument {
    #[serde(default)]
    pub categories: Vec<Category>,
}

impl NotesDocument {
    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    pub fn category(&self, category_id: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == category_id)
    }

    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if no category has this ID.
    pub fn category_mut(&mut self, category_id: &str) -> Result<&mut Category> {
        self.categories
            .iter_mut()
            .find(|c| c.id == category_id)
            .ok_or_else(|| NotesError::CategoryNotFound(category_id.to_string()))
    }

    /// Finds a note anywhere in the document, in category order.
    pub fn find_note(&self, note_id: &str) -> Option<&Note> {
        self.categories.iter().find_map(|c| c.note(note_id))
    }

    /// Removes the note from the first category that contains it.
    ///
    /// Returns the removed note, or `None` if no category held it.
    pub fn remove_note(&mut self, note_id: &str) -> Option<Note> {
        self.categories.iter_mut().find_map(|c| {
            let index = c.notes.iter().position(|n| n.id == note_id)?;
            Some(c.notes.remove(index))
        })
    }

    /// Removes a category together with every note it contains.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if no category has this ID.
    pub fn remove_category(&mut self, category_id: &str) -> Result<Category> {
        let index = self
            .categories
            .iter()
            .position(|c| c.id == category_id)
            .ok_or_else(|| NotesError::CategoryNotFound(category_id.to_string()))?;
        Ok(self.categories.remove(index))
    }

    pub fn note_count(&self) -> usize {
        self.categories.iter().map(|c| c.notes.len()).sum()
    }
}
