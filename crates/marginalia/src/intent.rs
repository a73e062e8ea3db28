use serde::Serialize;
use std::fmt;

use crate::library::{Book, Note};
use crate::quote::Quote;

/// What the reader asked the command palette to do.
///
/// `ExistingBook`/`ExistingNote` borrow from the snapshot handed to the
/// parser; every other variant describes something new for the caller to
/// create or search for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent<'a> {
  Unknown,
  AddBook { query: String },
  CreateNote { content: String },
  CreateQuote(Quote),
  SearchLibrary { query: String },
  ExistingBook(&'a Book),
  SearchNotes { query: String },
  ExistingNote(&'a Note),
  SearchAll { query: String },
}

impl Intent<'_> {
  /// Stable label, matching the serialized `kind`
  pub fn kind(&self) -> &'static str {
    match self {
      Intent::Unknown => "unknown",
      Intent::AddBook { .. } => "add_book",
      Intent::CreateNote { .. } => "create_note",
      Intent::CreateQuote(_) => "create_quote",
      Intent::SearchLibrary { .. } => "search_library",
      Intent::ExistingBook(_) => "existing_book",
      Intent::SearchNotes { .. } => "search_notes",
      Intent::ExistingNote(_) => "existing_note",
      Intent::SearchAll { .. } => "search_all",
    }
  }

  pub fn is_unknown(&self) -> bool {
    matches!(self, Intent::Unknown)
  }
}

impl fmt::Display for Intent<'_> {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Intent::Unknown => write!(f, "no recognizable command"),
      Intent::AddBook { query } => write!(f, "add book \"{query}\""),
      Intent::CreateNote { content } => write!(f, "create note \"{content}\""),
      Intent::CreateQuote(quote) => match &quote.attribution {
        Some(attribution) => write!(f, "create quote \"{}\" {attribution}", quote.content),
        None => write!(f, "create quote \"{}\"", quote.content),
      },
      Intent::SearchLibrary { query } => write!(f, "search library for \"{query}\""),
      Intent::ExistingBook(book) if book.author.is_empty() => write!(f, "open book \"{}\"", book.title),
      Intent::ExistingBook(book) => write!(f, "open book \"{}\" by {}", book.title, book.author),
      Intent::SearchNotes { query } => write!(f, "search notes for \"{query}\""),
      Intent::ExistingNote(note) => write!(f, "open note \"{}\"", note.content),
      Intent::SearchAll { query } => write!(f, "search everything for \"{query}\""),
    }
  }
}
