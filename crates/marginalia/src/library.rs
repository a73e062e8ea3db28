//! Read-only book and note snapshots handed to the classifier.
//!
//! The real store lives elsewhere; this module only knows how to load a
//! snapshot file and look entities up by substring.

use chrono::{DateTime, Utc};
use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

use crate::error::{MarginaliaError, Result};
use crate::files;

/// Environment override for the snapshot location
pub const LIBRARY_ENV_VAR: &str = "MARGINALIA_LIBRARY";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Book {
  #[serde(default = "Uuid::new_v4")]
  pub id: Uuid,
  pub title: String,
  #[serde(default)]
  pub author: String,
}

impl Book {
  pub fn new(title: impl Into<String>, author: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4(), title: title.into(), author: author.into() }
  }

  /// Title or author contains `query`, ignoring case
  pub fn matches(&self, query: &str) -> bool {
    contains_ignore_case(&self.title, query) || contains_ignore_case(&self.author, query)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Note {
  #[serde(default = "Uuid::new_v4")]
  pub id: Uuid,
  pub content: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub created_at: Option<DateTime<Utc>>,
}

impl Note {
  pub fn new(content: impl Into<String>) -> Self {
    Self { id: Uuid::new_v4(), content: content.into(), created_at: Some(Utc::now()) }
  }

  pub fn matches(&self, query: &str) -> bool {
    contains_ignore_case(&self.content, query)
  }
}

/// Snapshot of the reader's books and notes, in the store's order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Library {
  #[serde(default)]
  pub books: Vec<Book>,
  #[serde(default)]
  pub notes: Vec<Note>,
}

impl Library {
  pub fn new(books: Vec<Book>, notes: Vec<Note>) -> Self {
    Self { books, notes }
  }

  /// Load a snapshot from a YAML or JSON file
  pub fn load_from_file(path: &Path) -> Result<Self> {
    let library: Library = files::load_structured(path)?;
    tracing::debug!(
      path = %path.display(),
      books = library.books.len(),
      notes = library.notes.len(),
      "loaded library snapshot"
    );
    Ok(library)
  }

  /// Load from `MARGINALIA_LIBRARY`, or the default location.
  ///
  /// A missing default file is an empty library; a missing file named by the
  /// environment variable is an error.
  pub fn load() -> Result<Self> {
    if let Ok(custom) = std::env::var(LIBRARY_ENV_VAR) {
      return Self::load_from_file(Path::new(&custom));
    }

    let path = default_library_path()?;
    if !path.exists() {
      tracing::debug!(path = %path.display(), "no library snapshot found, using an empty one");
      return Ok(Self::default());
    }

    Self::load_from_file(&path)
  }

  pub fn save_to_file(&self, path: &Path) -> Result<()> {
    files::save_structured(self, path)
  }

  pub fn is_empty(&self) -> bool {
    self.books.is_empty() && self.notes.is_empty()
  }

  pub fn find_book(&self, query: &str) -> Option<&Book> {
    find_book(&self.books, query)
  }

  pub fn find_note(&self, query: &str) -> Option<&Note> {
    find_note(&self.notes, query)
  }
}

/// `~/.marginalia/library.yaml`
pub fn default_library_path() -> Result<PathBuf> {
  let home = home_dir().ok_or(MarginaliaError::NoHomeDirectory)?;
  Ok(home.join(".marginalia").join("library.yaml"))
}

/// First book whose title or author contains `query`
pub fn find_book<'a>(books: &'a [Book], query: &str) -> Option<&'a Book> {
  books.iter().find(|book| book.matches(query))
}

/// First note whose content contains `query`
pub fn find_note<'a>(notes: &'a [Note], query: &str) -> Option<&'a Note> {
  notes.iter().find(|note| note.matches(query))
}

pub(crate) fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
  haystack.to_lowercase().contains(&needle.to_lowercase())
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;

  fn sample_books() -> Vec<Book> {
    vec![
      Book::new("Dune", "Frank Herbert"),
      Book::new("Children of Dune", "Frank Herbert"),
      Book::new("Middlemarch", "George Eliot"),
    ]
  }

  #[test]
  fn test_book_matches_title_or_author() {
    let book = Book::new("Middlemarch", "George Eliot");
    assert!(book.matches("march"));
    assert!(book.matches("ELIOT"));
    assert!(!book.matches("Herbert"));
  }

  #[test]
  fn test_find_book_is_first_in_order() {
    let books = sample_books();
    let found = find_book(&books, "dune").unwrap();
    assert_eq!(found.title, "Dune");

    let found = find_book(&books, "children").unwrap();
    assert_eq!(found.title, "Children of Dune");
  }

  #[test]
  fn test_find_note_ignores_case() {
    let notes = vec![Note::new("The spice must flow"), Note::new("Remember the Fremen")];
    assert_eq!(find_note(&notes, "FREMEN").unwrap().content, "Remember the Fremen");
    assert!(find_note(&notes, "sandworm").is_none());
  }

  #[test]
  fn test_contains_ignore_case_unicode() {
    assert!(contains_ignore_case("Éloge de l'ombre", "éloge"));
    assert!(contains_ignore_case("STRASSE", "strasse"));
  }

  #[test]
  fn test_load_yaml_snapshot_without_ids() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("library.yaml");
    std::fs::write(
      &path,
      "books:\n  - title: Dune\n    author: Frank Herbert\nnotes:\n  - content: Fear is the mind-killer\n",
    )
    .unwrap();

    let library = Library::load_from_file(&path).unwrap();
    assert_eq!(library.books.len(), 1);
    assert_eq!(library.books[0].author, "Frank Herbert");
    assert_eq!(library.notes[0].content, "Fear is the mind-killer");
    assert!(library.notes[0].created_at.is_none());
  }

  #[test]
  fn test_save_and_reload_json() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("nested").join("library.json");
    let library = Library::new(sample_books(), vec![Note::new("Margins are for thinking")]);

    library.save_to_file(&path).unwrap();
    let loaded = Library::load_from_file(&path).unwrap();

    assert_eq!(loaded, library);
  }

  #[test]
  fn test_invalid_yaml_is_reported() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("library.yml");
    std::fs::write(&path, "books: [title: {").unwrap();

    let err = Library::load_from_file(&path).unwrap_err();
    assert!(matches!(err, MarginaliaError::Yaml { .. }));
  }
}
