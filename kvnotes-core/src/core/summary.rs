//! Flattened views over a [`NotesDocument`] for navigation lists.

use crate::NotesDocument;
use serde::{Deserialize, Serialize};

/// One entry in the "all notes" listing: a note plus the category it lives in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NoteSummary {
    pub note_id: String,
    pub title: String,
    pub category_id: String,
    pub category_name: String,
    /// Uppercase initials of the category name, used as a badge.
    pub category_initials: String,
}

/// Returns the uppercase first letter of each space-separated word in `name`.
///
/// Runs of spaces are skipped, so `"  to  do "` yields `"TD"`.
pub fn category_initials(name: &str) -> String {
    name.split(' ')
        .filter_map(|word| word.chars().next())
        .flat_map(char::to_uppercase)
        .collect()
}

impl NotesDocument {
    /// Lists every note in display order (category order, then note order).
    pub fn note_summaries(&self) -> Vec<NoteSummary> {
        self.categories
            .iter()
            .flat_map(|category| {
                category.notes.iter().map(move |note| NoteSummary {
                    note_id: note.id.clone(),
                    title: note.title.clone(),
                    category_id: category.id.clone(),
                    category_name: category.name.clone(),
                    category_initials: category_initials(&category.name),
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Category, Note};

    #[test]
    fn test_category_initials() {
        assert_eq!(category_initials("Work"), "W");
        assert_eq!(category_initials("side projects"), "SP");
        assert_eq!(category_initials("  to  do "), "TD");
        assert_eq!(category_initials(""), "");
    }

    #[test]
    fn test_note_summaries_follow_display_order() {
        let mut first = Category::new("Side projects");
        first.notes.push(Note::new("Ideas", ""));
        let empty = Category::new("Empty");
        let mut last = Category::new("home");
        last.notes.push(Note::new("Groceries", "milk"));
        last.notes.push(Note::new("Chores", ""));
        let doc = NotesDocument {
            categories: vec![first.clone(), empty, last.clone()],
        };

        let summaries = doc.note_summaries();
        let titles: Vec<&str> = summaries.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Ideas", "Groceries", "Chores"]);
        assert_eq!(summaries[0].category_id, first.id);
        assert_eq!(summaries[0].category_initials, "SP");
        assert_eq!(summaries[2].category_id, last.id);
        assert_eq!(summaries[2].category_initials, "H");
    }

    #[test]
    fn test_summary_serializes_camel_case() {
        let summary = NoteSummary {
            note_id: "n".to_string(),
            title: "t".to_string(),
            category_id: "c".to_string(),
            category_name: "Work".to_string(),
            category_initials: "W".to_string(),
        };
        let json = serde_json::to_string(&summary).unwrap();
        assert!(json.contains("noteId"));
        assert!(json.contains("categoryInitials"));
    }
}
