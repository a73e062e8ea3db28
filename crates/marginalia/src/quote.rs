//! Quote extraction and attribution handling
//!
//! A quote is typed as `"passage" - Author, Book Title, p. 42`. Everything
//! after the closing quote mark is the attribution; each part of it is
//! optional and a malformed part is dropped rather than failing the parse.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Sentinel between fields of an encoded attribution
pub const FIELD_SEPARATOR: &str = "|||";

const AUTHOR_TAG: &str = "author";
const BOOK_TAG: &str = "book";
const PAGE_TAG: &str = "page";
const ESCAPE: char = '\\';

/// `p. 42`, `pg 42`, `page42` and friends
static PAGE_MARKER: Lazy<Regex> =
  Lazy::new(|| Regex::new(r"(?i)^(?:p\.|pg\.?|page)\s*(\d+)$").expect("page marker pattern"));

/// A marker whose value is not a page number: `p. xlii`, `pg 12a`
static MALFORMED_PAGE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)^(?:p\.|pg\.|pg\s|page\s)\s*(?:[ivxlcdm]+|\S*\d\S*)$")
    .expect("malformed page pattern")
});

/// A numeric page marker trailing a title or author without a comma
static TRAILING_PAGE: Lazy<Regex> = Lazy::new(|| {
  Regex::new(r"(?i)^(.*\S)\s+(?:p\.|pg\.?|page)\s*(\d+)$").expect("trailing page pattern")
});

pub fn is_quote_char(c: char) -> bool {
  matches!(c, '"' | '“' | '”')
}

fn is_dash(c: char) -> bool {
  matches!(c, '-' | '—' | '–')
}

/// True if the text contains a straight or curly double quote anywhere
pub fn contains_quote(text: &str) -> bool {
  text.chars().any(is_quote_char)
}

/// Replace curly double quotes with straight ones
pub fn normalize_quotes(text: &str) -> String {
  text.chars().map(|c| if is_quote_char(c) { '"' } else { c }).collect()
}

/// Author, book and page trailing a quoted passage. Never empty when present.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Attribution {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub author: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub book: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub page: Option<u32>,
}

impl Attribution {
  pub fn is_empty(&self) -> bool {
    self.author.is_none() && self.book.is_none() && self.page.is_none()
  }

  /// Parse the text that follows a closing quote mark.
  ///
  /// Returns `None` when nothing usable is left after the separator.
  pub fn parse(suffix: &str) -> Option<Self> {
    let cleaned: String = suffix.chars().filter(|c| !is_quote_char(*c)).collect();
    let rest = cleaned.trim().trim_start_matches(|c: char| is_dash(c) || c == ',' || c.is_whitespace());

    let mut attribution = Attribution::default();
    let mut title_parts: Vec<&str> = Vec::new();

    for part in rest.split(',').map(str::trim).filter(|part| !part.is_empty()) {
      if let Some(page) = page_marker(part) {
        if page.is_some() {
          attribution.page = page;
        }
        continue;
      }

      // the first part is always the author, even when it reads like a marker
      let author_position = attribution.author.is_none() && title_parts.is_empty();
      if !author_position && MALFORMED_PAGE.is_match(part) {
        tracing::trace!(part, "dropping malformed page marker");
        continue;
      }

      let (text, page) = split_trailing_page(part);
      if page.is_some() {
        attribution.page = page;
      }

      if author_position {
        attribution.author = Some(text.to_string());
      } else {
        title_parts.push(text);
      }
    }

    if !title_parts.is_empty() {
      attribution.book = Some(title_parts.join(", "));
    }

    (!attribution.is_empty()).then_some(attribution)
  }

  /// Pack the present fields as `tag=value` joined by [`FIELD_SEPARATOR`].
  /// `|` and `\` inside values are backslash-escaped.
  pub fn encode(&self) -> String {
    let mut fields = Vec::new();
    if let Some(author) = &self.author {
      fields.push(format!("{AUTHOR_TAG}={}", escape_value(author)));
    }
    if let Some(book) = &self.book {
      fields.push(format!("{BOOK_TAG}={}", escape_value(book)));
    }
    if let Some(page) = self.page {
      fields.push(format!("{PAGE_TAG}={page}"));
    }
    fields.join(FIELD_SEPARATOR)
  }

  /// Inverse of [`Attribution::encode`]. Unknown tags, blank values and
  /// non-numeric pages are skipped.
  pub fn decode(encoded: &str) -> Option<Self> {
    let mut attribution = Attribution::default();

    for field in split_fields(encoded) {
      let Some((tag, value)) = field.split_once('=') else {
        continue;
      };
      let value = value.trim();
      if value.is_empty() {
        continue;
      }

      match tag.trim() {
        AUTHOR_TAG => attribution.author = Some(value.to_string()),
        BOOK_TAG => attribution.book = Some(value.to_string()),
        PAGE_TAG => {
          if let Ok(page) = value.parse() {
            attribution.page = Some(page);
          }
        }
        other => tracing::trace!(tag = other, "ignoring unknown attribution field"),
      }
    }

    (!attribution.is_empty()).then_some(attribution)
  }
}

/// Renders the typed form, `- Author, Book, p. 42`
impl fmt::Display for Attribution {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut parts = Vec::new();
    if let Some(author) = &self.author {
      parts.push(author.clone());
    }
    if let Some(book) = &self.book {
      parts.push(book.clone());
    }
    if let Some(page) = self.page {
      parts.push(format!("p. {page}"));
    }
    write!(f, "- {}", parts.join(", "))
  }
}

/// `Some(page)` if `part` is a numeric page marker; the inner value is
/// `None` when the number doesn't fit a `u32`
fn page_marker(part: &str) -> Option<Option<u32>> {
  let captures = PAGE_MARKER.captures(part)?;
  Some(captures[1].parse().ok())
}

fn escape_value(value: &str) -> String {
  let mut escaped = String::with_capacity(value.len());
  for c in value.chars() {
    if c == ESCAPE || c == '|' {
      escaped.push(ESCAPE);
    }
    escaped.push(c);
  }
  escaped
}

/// Split on unescaped separators and unescape each field
fn split_fields(encoded: &str) -> Vec<String> {
  let mut fields = Vec::new();
  let mut current = String::new();
  let mut rest = encoded;

  while let Some(c) = rest.chars().next() {
    if let Some(after) = rest.strip_prefix(FIELD_SEPARATOR) {
      fields.push(std::mem::take(&mut current));
      rest = after;
      continue;
    }

    rest = &rest[c.len_utf8()..];
    if c == ESCAPE {
      if let Some(escaped) = rest.chars().next() {
        current.push(escaped);
        rest = &rest[escaped.len_utf8()..];
        continue;
      }
    }
    current.push(c);
  }

  fields.push(current);
  fields
}

fn split_trailing_page(part: &str) -> (&str, Option<u32>) {
  match TRAILING_PAGE.captures(part) {
    Some(captures) => {
      let text = captures.get(1).map_or(part, |m| m.as_str());
      (text, captures[2].parse().ok())
    }
    None => (part, None),
  }
}

fn clean_content(content: &str) -> String {
  content.trim().trim_end_matches(|c: char| is_dash(c) || c.is_whitespace()).to_string()
}

/// A passage to be saved, with whatever attribution was typed after it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Quote {
  pub content: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub attribution: Option<Attribution>,
}

impl Quote {
  /// The attribution in its delimited wire form
  pub fn encoded_attribution(&self) -> Option<String> {
    self.attribution.as_ref().map(Attribution::encode)
  }
}

/// Split quoted text into the passage and its attribution.
///
/// Only the first pair of quote marks counts. Without a closing mark the
/// whole text (minus a leading mark) is the passage.
pub fn parse_quote(text: &str) -> Quote {
  let normalized = normalize_quotes(text);
  let trimmed = normalized.trim();

  let Some(open) = trimmed.find('"') else {
    return Quote { content: clean_content(trimmed), attribution: None };
  };

  let after_open = &trimmed[open + 1..];
  match after_open.find('"') {
    Some(close) => Quote {
      content: clean_content(&after_open[..close]),
      attribution: Attribution::parse(&after_open[close + 1..]),
    },
    None => {
      let content = trimmed.strip_prefix('"').unwrap_or(trimmed);
      Quote { content: clean_content(content), attribution: None }
    }
  }
}
