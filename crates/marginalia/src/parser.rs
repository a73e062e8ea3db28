//! Command palette classifier
//!
//! Maps free text plus the current book/note snapshot to exactly one
//! [`Intent`]. Rules are tried in a fixed order and the first one that
//! matches wins:
//!
//! 1. blank text is `Unknown`
//! 2. any quote mark makes a `CreateQuote`
//! 3. a note prefix makes a `CreateNote`
//! 4. an add-book prefix makes an `AddBook`
//! 5. search prefixes (library-scoped, note-scoped, then general) look the
//!    remainder up in the snapshot
//! 6. otherwise the whole text is looked up as a book, then as a note
//!
//! Classification is pure: no I/O, no state kept between calls, and no
//! failure mode. It runs on every keystroke.

use once_cell::sync::Lazy;

use crate::config::ParserConfig;
use crate::intent::Intent;
use crate::library::{find_book, find_note, Book, Library, Note};
use crate::quote::{contains_quote, parse_quote};

static DEFAULT_PARSER: Lazy<CommandParser> = Lazy::new(CommandParser::default);

/// Classify with the built-in English prefixes
pub fn parse<'a>(text: &str, books: &'a [Book], notes: &'a [Note]) -> Intent<'a> {
  DEFAULT_PARSER.parse(text, books, notes)
}

#[derive(Debug, Clone, Default)]
pub struct CommandParser {
  config: ParserConfig,
}

impl CommandParser {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn with_config(config: ParserConfig) -> Self {
    Self { config }
  }

  pub fn config(&self) -> &ParserConfig {
    &self.config
  }

  pub fn parse<'a>(&self, text: &str, books: &'a [Book], notes: &'a [Note]) -> Intent<'a> {
    let text = text.trim();
    if text.is_empty() {
      return Intent::Unknown;
    }

    if contains_quote(text) {
      tracing::trace!("quote mark found");
      return Intent::CreateQuote(parse_quote(text));
    }

    if let Some(content) = strip_any_prefix(text, &self.config.note_prefixes) {
      return payload(content).map_or(Intent::Unknown, |content| Intent::CreateNote { content });
    }

    if let Some(query) = strip_any_prefix(text, &self.config.add_book_prefixes) {
      return payload(query).map_or(Intent::Unknown, |query| Intent::AddBook { query });
    }

    if let Some(query) = strip_any_prefix(text, &self.config.library_search_prefixes) {
      return payload(query).map_or(Intent::Unknown, |query| match find_book(books, &query) {
        Some(book) => Intent::ExistingBook(book),
        None => Intent::SearchLibrary { query },
      });
    }

    if let Some(query) = strip_any_prefix(text, &self.config.note_search_prefixes) {
      return payload(query).map_or(Intent::Unknown, |query| match find_note(notes, &query) {
        Some(note) => Intent::ExistingNote(note),
        None => Intent::SearchNotes { query },
      });
    }

    if let Some(query) = strip_any_prefix(text, &self.config.search_prefixes) {
      return payload(query).map_or(Intent::Unknown, |query| {
        match (find_book(books, &query), find_note(notes, &query)) {
          (Some(book), None) => Intent::ExistingBook(book),
          (None, Some(note)) => Intent::ExistingNote(note),
          _ => Intent::SearchAll { query },
        }
      });
    }

    if let Some(book) = find_book(books, text) {
      return Intent::ExistingBook(book);
    }
    if let Some(note) = find_note(notes, text) {
      return Intent::ExistingNote(note);
    }

    Intent::Unknown
  }

  /// Classify against a whole library snapshot
  pub fn parse_library<'a>(&self, text: &str, library: &'a Library) -> Intent<'a> {
    self.parse(text, &library.books, &library.notes)
  }
}

/// Trimmed remainder, or `None` when a prefix left nothing behind
fn payload(rest: &str) -> Option<String> {
  let rest = rest.trim();
  (!rest.is_empty()).then(|| rest.to_string())
}

/// First prefix in table order that `text` starts with. Input arrives
/// trimmed, so text equal to a prefix minus its trailing space (`add book`)
/// also matches, with an empty remainder.
fn strip_any_prefix<'t>(text: &'t str, prefixes: &[String]) -> Option<&'t str> {
  prefixes.iter().find_map(|prefix| {
    let rest = strip_prefix_ignore_case(text, prefix).or_else(|| bare_prefix(text, prefix))?;
    tracing::trace!(prefix = prefix.as_str(), "command prefix matched");
    Some(rest)
  })
}

fn bare_prefix<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
  let bare = prefix.trim_end();
  if bare.is_empty() || bare.len() == prefix.len() {
    return None;
  }
  strip_prefix_ignore_case(text, bare).filter(|rest| rest.is_empty())
}

/// Unicode-aware case-insensitive `strip_prefix`
fn strip_prefix_ignore_case<'t>(text: &'t str, prefix: &str) -> Option<&'t str> {
  let mut chars = text.char_indices();
  let mut end = 0;

  for expected in prefix.chars() {
    let (index, actual) = chars.next()?;
    if actual != expected && !actual.to_lowercase().eq(expected.to_lowercase()) {
      return None;
    }
    end = index + actual.len_utf8();
  }

  Some(&text[end..])
}
