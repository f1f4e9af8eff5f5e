// SPDX-License-Identifier: GPL-3.0-only

use thiserror::Error;

/// Reasons a filesystem record is rejected while it is being built
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("serial and partuuid cannot be both set")]
    CryptIdentityConflict,

    #[error("either serial or partuuid must be set")]
    CryptIdentityMissing,

    #[error("field 'where' must be provided")]
    MissingMountPoint,

    #[error("fsck must be 0, 1 or 2, got {0}")]
    InvalidFsck(i64),

    #[error("source '{0}' must have the KEY=value form to be matched by udev")]
    InvalidSource(String),

    #[error("malformed record: {0}")]
    Malformed(String),
}

/// Error types for loading and rendering a filesystem list
#[derive(Error, Debug)]
pub enum MkfstabError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML parse error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a list of filesystem entries, found {0}")]
    NotASequence(&'static str),

    #[error("entry #{index}: {source}")]
    Entry {
        index: usize,
        #[source]
        source: ValidationError,
    },
}

/// Result type alias for mkfstab operations
pub type Result<T> = std::result::Result<T, MkfstabError>;
