//! Category and note CRUD over a per-user JSON document.

use crate::{Category, KvBackend, Note, NotesDocument, NotesError, Result};

/// Prefix prepended to every user ID to form its storage key.
pub const KEY_PREFIX: &str = "notes-";

/// Returns the storage key holding `user_id`'s document.
pub fn user_key(user_id: &str) -> String {
    format!("{KEY_PREFIX}{user_id}")
}

/// Treats an empty user ID the same as a missing one.
fn present(user_id: Option<&str>) -> Option<&str> {
    user_id.filter(|u| !u.is_empty())
}

/// Data access for every user's notes.
///
/// Each user's categories and notes live in one [`NotesDocument`] stored
/// under [`user_key`]. Every operation reads the whole document, and every
/// mutation writes the whole document back. Nothing is cached between
/// calls.
///
/// There is no locking: two concurrent mutations for the same user both
/// read the same starting document and the later `put` wins, discarding
/// the other change. Different users never interact.
///
/// All operations take the user ID as an `Option`. A missing (or empty)
/// ID short-circuits to an empty result and never writes.
pub struct NotesStore<B> {
    backend: B,
}

impl<B: KvBackend> NotesStore<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    async fn load(&self, user_id: &str) -> Result<NotesDocument> {
        match self.backend.get(&user_key(user_id)).await? {
            Some(json) => Ok(serde_json::from_str(&json)?),
            None => Ok(NotesDocument::default()),
        }
    }

    async fn save(&self, user_id: &str, document: &NotesDocument) -> Result<()> {
        let json = serde_json::to_string(document)?;
        self.backend.put(&user_key(user_id), json).await
    }

    /// Returns the user's whole document, or an empty one if nothing has been stored.
    ///
    /// # Errors
    ///
    /// Only backend and decoding failures; an unknown or missing user is not an error.
    pub async fn fetch_all(&self, user_id: Option<&str>) -> Result<NotesDocument> {
        match present(user_id) {
            Some(user_id) => self.load(user_id).await,
            None => Ok(NotesDocument::default()),
        }
    }

    /// Returns the category with `category_id`, or `None` if it does not exist.
    pub async fn fetch_category(
        &self,
        user_id: Option<&str>,
        category_id: &str,
    ) -> Result<Option<Category>> {
        let Some(user_id) = present(user_id) else {
            return Ok(None);
        };
        let document = self.load(user_id).await?;
        Ok(document.category(category_id).cloned())
    }

    /// Returns the note with `note_id` from whichever category holds it.
    ///
    /// Unlike [`fetch_category`](Self::fetch_category), an unknown ID is an
    /// error here. A missing user still yields `Ok(None)`.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::NoteNotFound`] if no category contains the note.
    pub async fn fetch_note(&self, user_id: Option<&str>, note_id: &str) -> Result<Option<Note>> {
        let Some(user_id) = present(user_id) else {
            return Ok(None);
        };
        let document = self.load(user_id).await?;
        document
            .find_note(note_id)
            .cloned()
            .map(Some)
            .ok_or_else(|| NotesError::NoteNotFound(note_id.to_string()))
    }

    /// Appends a category with an empty name, for the user to fill in later.
    pub async fn create_empty_category(&self, user_id: Option<&str>) -> Result<Option<Category>> {
        self.create_category(user_id, "").await
    }

    /// Appends a new category named `name` and returns it.
    pub async fn create_category(
        &self,
        user_id: Option<&str>,
        name: &str,
    ) -> Result<Option<Category>> {
        let Some(user_id) = present(user_id) else {
            return Ok(None);
        };
        let mut document = self.load(user_id).await?;
        let category = Category::new(name);
        document.categories.push(category.clone());
        self.save(user_id, &document).await?;
        log::debug!("created category {} for user {user_id}", category.id);
        Ok(Some(category))
    }

    /// Appends an untitled, empty note to a category.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if the category does not exist.
    pub async fn create_empty_note(
        &self,
        user_id: Option<&str>,
        category_id: &str,
    ) -> Result<Option<Note>> {
        self.create_note(user_id, category_id, "", "").await
    }

    /// Appends a note with the given title and body to a category.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if the category does not exist.
    pub async fn create_note(
        &self,
        user_id: Option<&str>,
        category_id: &str,
        title: &str,
        body: &str,
    ) -> Result<Option<Note>> {
        let Some(user_id) = present(user_id) else {
            return Ok(None);
        };
        let mut document = self.load(user_id).await?;
        let note = Note::new(title, body);
        document
            .category_mut(category_id)?
            .notes
            .push(note.clone());
        self.save(user_id, &document).await?;
        log::debug!("created note {} in category {category_id}", note.id);
        Ok(Some(note))
    }

    /// Overwrites the title and body of a note. Its ID never changes.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if the category does not exist,
    /// or [`NotesError::NoteNotFound`] if the note is not in that category.
    pub async fn update_note(
        &self,
        user_id: Option<&str>,
        category_id: &str,
        note_id: &str,
        title: &str,
        body: &str,
    ) -> Result<()> {
        let Some(user_id) = present(user_id) else {
            return Ok(());
        };
        let mut document = self.load(user_id).await?;
        let note = document.category_mut(category_id)?.note_mut(note_id)?;
        note.title = title.to_string();
        note.body = body.to_string();
        self.save(user_id, &document).await?;
        log::debug!("updated note {note_id}");
        Ok(())
    }

    /// Renames a category.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if the category does not exist.
    pub async fn update_category(
        &self,
        user_id: Option<&str>,
        category_id: &str,
        name: &str,
    ) -> Result<()> {
        let Some(user_id) = present(user_id) else {
            return Ok(());
        };
        let mut document = self.load(user_id).await?;
        document.category_mut(category_id)?.name = name.to_string();
        self.save(user_id, &document).await?;
        log::debug!("renamed category {category_id}");
        Ok(())
    }

    /// Removes a note from whichever category holds it.
    ///
    /// An unknown note ID is silently ignored and nothing is written.
    pub async fn delete_note(&self, user_id: Option<&str>, note_id: &str) -> Result<()> {
        let Some(user_id) = present(user_id) else {
            return Ok(());
        };
        let mut document = self.load(user_id).await?;
        if document.remove_note(note_id).is_some() {
            self.save(user_id, &document).await?;
            log::debug!("deleted note {note_id}");
        }
        Ok(())
    }

    /// Removes a category and every note inside it.
    ///
    /// # Errors
    ///
    /// Returns [`NotesError::CategoryNotFound`] if the category does not exist.
    pub async fn delete_category(&self, user_id: Option<&str>, category_id: &str) -> Result<()> {
        let Some(user_id) = present(user_id) else {
            return Ok(());
        };
        let mut document = self.load(user_id).await?;
        let removed = document.remove_category(category_id)?;
        self.save(user_id, &document).await?;
        log::debug!(
            "deleted category {category_id} with {} notes",
            removed.notes.len()
        );
        Ok(())
    }
}
