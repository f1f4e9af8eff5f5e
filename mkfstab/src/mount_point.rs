// SPDX-License-Identifier: GPL-3.0-only

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::filesystem::Filesystem;
use crate::options::{DEVICE_BOUND, GVFS_HIDE, join_options, subvol_option};
use crate::record::{decode, lax_bool, non_empty, value_kind, warn_unknown_keys};

/// One target directory of a filesystem entry plus options local to it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountPoint {
    path: String,
    subvol: Option<String>,
    options: Option<Vec<String>>,
    hide: bool,
}

#[derive(Debug, Deserialize)]
struct RawMountPoint {
    path: String,
    #[serde(default)]
    subvol: Option<String>,
    #[serde(default)]
    options: Option<Vec<String>>,
    #[serde(default, deserialize_with = "lax_bool")]
    hide: bool,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl MountPoint {
    /// Mount point for a bare path with every other field left at its default
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            subvol: None,
            options: None,
            hide: false,
        }
    }

    pub fn with_subvol(mut self, subvol: impl Into<String>) -> Self {
        self.subvol = non_empty(Some(subvol.into()));
        self
    }

    pub fn with_options(mut self, options: Vec<String>) -> Self {
        self.options = Some(options);
        self
    }

    pub fn hidden(mut self, hide: bool) -> Self {
        self.hide = hide;
        self
    }

    /// Build from either a bare path string or a `{path, subvol?, options?, hide?}` record.
    pub fn from_record(value: &Value) -> Result<Self, ValidationError> {
        match value {
            Value::String(path) if path.is_empty() => Err(ValidationError::Malformed(
                "mount point path must not be empty".to_string(),
            )),
            Value::String(path) => Ok(Self::new(path.clone())),
            Value::Object(_) => {
                let raw: RawMountPoint = decode(value)?;
                warn_unknown_keys("mount point", &raw.extra);
                if raw.path.is_empty() {
                    return Err(ValidationError::Malformed(
                        "mount point path must not be empty".to_string(),
                    ));
                }
                Ok(Self {
                    path: raw.path,
                    subvol: non_empty(raw.subvol),
                    options: raw.options,
                    hide: raw.hide,
                })
            }
            other => Err(ValidationError::Malformed(format!(
                "mount point must be a path or a map, got {}",
                value_kind(other)
            ))),
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn subvol(&self) -> Option<&str> {
        self.subvol.as_deref()
    }

    pub fn options(&self) -> Option<&[String]> {
        self.options.as_deref()
    }

    pub fn hide(&self) -> bool {
        self.hide
    }

    /// Options used when mounting this path as part of `fs`.
    ///
    /// Local options come first, then the entry's shared options, then
    /// `subvol=`, `x-gvfs-hide` and `x-systemd.device-bound` as they apply.
    pub fn effective_options(&self, fs: &Filesystem) -> String {
        let mut tokens: Vec<String> = self.options.clone().unwrap_or_default();
        tokens.extend(fs.options().iter().cloned());

        if let Some(subvol) = &self.subvol {
            tokens.push(subvol_option(subvol));
        }
        if self.hide || fs.hide() {
            tokens.push(GVFS_HIDE.to_string());
        }
        if fs.automount() {
            tokens.push(DEVICE_BOUND.to_string());
        }

        join_options(&tokens)
    }
}
