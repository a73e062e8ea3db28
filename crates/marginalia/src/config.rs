//! Configuration for the command parser
//!
//! The recognized command prefixes are data rather than code, so a
//! non-English palette only needs a config file. Every table defaults to the
//! English set; a config file may override any subset of them.

use dirs::home_dir;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{MarginaliaError, Result};
use crate::files;

/// Environment override for the config file location
pub const CONFIG_ENV_VAR: &str = "MARGINALIA_CONFIG";

/// Prefix tables, each tried in order (first match wins)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParserConfig {
  /// Prefixes that turn the rest of the text into a new note
  #[serde(default = "default_note_prefixes")]
  pub note_prefixes: Vec<String>,
  /// Prefixes that turn the rest of the text into a book lookup
  #[serde(default = "default_add_book_prefixes")]
  pub add_book_prefixes: Vec<String>,
  /// Search prefixes scoped to the book library
  #[serde(default = "default_library_search_prefixes")]
  pub library_search_prefixes: Vec<String>,
  /// Search prefixes scoped to notes
  #[serde(default = "default_note_search_prefixes")]
  pub note_search_prefixes: Vec<String>,
  /// Unscoped search prefixes, tried after the scoped ones
  #[serde(default = "default_search_prefixes")]
  pub search_prefixes: Vec<String>,
}

fn owned(prefixes: &[&str]) -> Vec<String> {
  prefixes.iter().map(|p| p.to_string()).collect()
}

// "note -" has to come before "note " or the dash ends up in the content
fn default_note_prefixes() -> Vec<String> {
  owned(&["note:", "note -", "note ", "thought:", "idea:", "reminder:", "todo:"])
}
fn default_add_book_prefixes() -> Vec<String> {
  owned(&["add book ", "add "])
}
fn default_library_search_prefixes() -> Vec<String> {
  owned(&["search library ", "search books ", "find book "])
}
fn default_note_search_prefixes() -> Vec<String> {
  owned(&["search notes ", "find note "])
}
fn default_search_prefixes() -> Vec<String> {
  owned(&["search ", "find "])
}

impl Default for ParserConfig {
  fn default() -> Self {
    Self {
      note_prefixes: default_note_prefixes(),
      add_book_prefixes: default_add_book_prefixes(),
      library_search_prefixes: default_library_search_prefixes(),
      note_search_prefixes: default_note_search_prefixes(),
      search_prefixes: default_search_prefixes(),
    }
  }
}

impl ParserConfig {
  /// Load configuration from a YAML or JSON file
  pub fn load_from_file(path: &Path) -> Result<Self> {
    let config: ParserConfig = files::load_structured(path)?;
    config.validate()?;
    tracing::debug!(path = %path.display(), "loaded parser config");
    Ok(config)
  }

  /// Load configuration from `MARGINALIA_CONFIG`, the working directory,
  /// `~/.marginalia/config.yaml`, or fall back to defaults
  pub fn load() -> Result<Self> {
    if let Ok(custom) = std::env::var(CONFIG_ENV_VAR) {
      return Self::load_from_file(Path::new(&custom));
    }

    for path in candidate_paths() {
      if path.exists() {
        return Self::load_from_file(&path);
      }
    }

    tracing::debug!("no parser config found, using defaults");
    Ok(Self::default())
  }

  /// Save configuration to a file
  pub fn save_to_file(&self, path: &Path) -> Result<()> {
    files::save_structured(self, path)
  }

  /// Reject prefixes that would match every input
  pub fn validate(&self) -> Result<()> {
    for (table, prefixes) in self.tables() {
      if let Some(position) = prefixes.iter().position(|p| p.trim().is_empty()) {
        return Err(MarginaliaError::InvalidConfig {
          message: format!("{table}[{position}] is empty"),
        });
      }
    }
    Ok(())
  }

  /// Named prefix tables, in the order the parser consults them
  pub fn tables(&self) -> [(&'static str, &[String]); 5] {
    [
      ("note_prefixes", self.note_prefixes.as_slice()),
      ("add_book_prefixes", self.add_book_prefixes.as_slice()),
      ("library_search_prefixes", self.library_search_prefixes.as_slice()),
      ("note_search_prefixes", self.note_search_prefixes.as_slice()),
      ("search_prefixes", self.search_prefixes.as_slice()),
    ]
  }
}

fn candidate_paths() -> Vec<PathBuf> {
  let mut paths = vec![PathBuf::from(".marginalia.yaml"), PathBuf::from("marginalia.yaml")];
  if let Some(home) = home_dir() {
    paths.push(home.join(".marginalia").join("config.yaml"));
  }
  paths
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::fs;
  use tempfile::TempDir;

  #[test]
  fn test_default_tables_are_valid() {
    let config = ParserConfig::default();
    assert!(config.validate().is_ok());
    assert_eq!(config.note_prefixes[0], "note:");
    assert_eq!(config.add_book_prefixes, vec!["add book ", "add "]);
  }

  #[test]
  fn test_note_dash_prefix_precedes_note_space() {
    let config = ParserConfig::default();
    let dash = config.note_prefixes.iter().position(|p| p == "note -").unwrap();
    let space = config.note_prefixes.iter().position(|p| p == "note ").unwrap();
    assert!(dash < space);
  }

  #[test]
  fn test_partial_file_keeps_defaults() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.yaml");
    fs::write(&path, "note_prefixes:\n  - \"notiz:\"\n  - \"notiz \"\n").unwrap();

    let config = ParserConfig::load_from_file(&path).unwrap();
    assert_eq!(config.note_prefixes, vec!["notiz:", "notiz "]);
    assert_eq!(config.search_prefixes, ParserConfig::default().search_prefixes);
  }

  #[test]
  fn test_empty_prefix_is_rejected() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    fs::write(&path, r#"{"search_prefixes": ["search ", "  "]}"#).unwrap();

    let err = ParserConfig::load_from_file(&path).unwrap_err();
    assert!(err.to_string().contains("search_prefixes[1] is empty"));
  }

  #[test]
  fn test_save_and_reload() {
    let temp = TempDir::new().unwrap();
    let path = temp.path().join("config.json");
    let mut config = ParserConfig::default();
    config.add_book_prefixes = vec!["ajouter ".to_string()];

    config.save_to_file(&path).unwrap();
    assert_eq!(ParserConfig::load_from_file(&path).unwrap(), config);
  }
}
