// SPDX-License-Identifier: GPL-3.0-only

//! Reading the filesystem list from disk
//!
//! The list is a YAML sequence by default. TOML and JSON are accepted too,
//! chosen by file extension. TOML cannot have a top-level array, so its
//! entries live under `[[filesystem]]` tables.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::error::{MkfstabError, Result};
use crate::record::value_kind;

/// Input read when no path is given
pub const DEFAULT_INPUT_PATH: &str = "/etc/fstab.yml";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum InputFormat {
    #[default]
    Yaml,
    Toml,
    Json,
}

impl InputFormat {
    /// Pick a format from the file extension, falling back to YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("toml") => InputFormat::Toml,
            Some(ext) if ext.eq_ignore_ascii_case("json") => InputFormat::Json,
            _ => InputFormat::Yaml,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InputFormat::Yaml => "yaml",
            InputFormat::Toml => "toml",
            InputFormat::Json => "json",
        }
    }
}

impl fmt::Display for InputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct TomlDocument {
    #[serde(default)]
    filesystem: Vec<Value>,
}

fn into_records(document: Value) -> Result<Vec<Value>> {
    match document {
        Value::Array(records) => Ok(records),
        Value::Null => Ok(Vec::new()),
        other => Err(MkfstabError::NotASequence(value_kind(&other))),
    }
}

/// Parse a filesystem list from text.
pub fn parse_records(format: InputFormat, text: &str) -> Result<Vec<Value>> {
    match format {
        // An empty file holds no entries.
        InputFormat::Yaml if text.trim().is_empty() => Ok(Vec::new()),
        InputFormat::Yaml => into_records(serde_yaml::from_str(text)?),
        InputFormat::Json => into_records(serde_json::from_str(text)?),
        InputFormat::Toml => Ok(toml::from_str::<TomlDocument>(text)?.filesystem),
    }
}

/// Read and parse a filesystem list, detecting the format from `path`.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Value>> {
    let path = path.as_ref();
    load_records_as(path, InputFormat::from_path(path))
}

/// Read and parse a filesystem list in an explicit format.
pub fn load_records_as<P: AsRef<Path>>(path: P, format: InputFormat) -> Result<Vec<Value>> {
    let path = path.as_ref();
    let contents = fs::read_to_string(path)?;
    let records = parse_records(format, &contents)?;

    tracing::debug!(
        path = %path.display(),
        %format,
        "Loaded {} filesystem records",
        records.len()
    );

    Ok(records)
}
