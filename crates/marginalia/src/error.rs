use std::path::PathBuf;
use thiserror::Error;

/// Failures from the file-backed surfaces (config and library snapshots).
///
/// Classification itself never fails; see [`crate::parser`].
#[derive(Error, Debug)]
pub enum MarginaliaError {
  #[error("Failed to read {path}: {source}")]
  Io {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to write {path}: {source}")]
  Write {
    path: PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("Invalid YAML in {path}: {source}")]
  Yaml {
    path: PathBuf,
    #[source]
    source: serde_yaml::Error,
  },

  #[error("Invalid JSON in {path}: {source}")]
  Json {
    path: PathBuf,
    #[source]
    source: serde_json::Error,
  },

  #[error("Unsupported file format for {path} (expected .yaml, .yml or .json)")]
  UnsupportedFormat { path: PathBuf },

  #[error("Invalid configuration: {message}")]
  InvalidConfig { message: String },

  #[error("Could not find home directory")]
  NoHomeDirectory,
}

pub type Result<T> = std::result::Result<T, MarginaliaError>;
