//! YAML/JSON file handling shared by the config and library loaders.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::path::Path;

use crate::error::{MarginaliaError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
  Yaml,
  Json,
}

impl FileFormat {
  /// Pick a format from the file extension
  pub fn from_path(path: &Path) -> Result<Self> {
    let extension = path.extension().and_then(|ext| ext.to_str()).map(str::to_ascii_lowercase);

    match extension.as_deref() {
      Some("yaml") | Some("yml") => Ok(FileFormat::Yaml),
      Some("json") => Ok(FileFormat::Json),
      _ => Err(MarginaliaError::UnsupportedFormat { path: path.to_path_buf() }),
    }
  }
}

/// Read and deserialize a YAML or JSON file
pub fn load_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
  let format = FileFormat::from_path(path)?;
  let content = fs::read_to_string(path)
    .map_err(|source| MarginaliaError::Io { path: path.to_path_buf(), source })?;

  match format {
    FileFormat::Yaml => serde_yaml::from_str(&content)
      .map_err(|source| MarginaliaError::Yaml { path: path.to_path_buf(), source }),
    FileFormat::Json => serde_json::from_str(&content)
      .map_err(|source| MarginaliaError::Json { path: path.to_path_buf(), source }),
  }
}

/// Serialize a value and write it as YAML or JSON
pub fn save_structured<T: Serialize>(value: &T, path: &Path) -> Result<()> {
  let content = match FileFormat::from_path(path)? {
    FileFormat::Yaml => serde_yaml::to_string(value)
      .map_err(|source| MarginaliaError::Yaml { path: path.to_path_buf(), source })?,
    FileFormat::Json => serde_json::to_string_pretty(value)
      .map_err(|source| MarginaliaError::Json { path: path.to_path_buf(), source })?,
  };

  if let Some(parent) = path.parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent)
        .map_err(|source| MarginaliaError::Write { path: parent.to_path_buf(), source })?;
    }
  }

  fs::write(path, content).map_err(|source| MarginaliaError::Write { path: path.to_path_buf(), source })
}
