// SPDX-License-Identifier: GPL-3.0-only

//! Filesystem entries and their rendering
//!
//! An entry is built once from a record, validated eagerly and read-only
//! afterwards. It renders either to fstab lines or, when it is an encrypted
//! automount, to udev rules. Never both.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::encryption::Encryption;
use crate::error::ValidationError;
use crate::mount_point::MountPoint;
use crate::options::{default_options, join_options};
use crate::record::{decode, lax_bool, value_kind, warn_unknown_keys};
use crate::rules;

/// Filesystem type that needs no mount point
pub const SWAP: &str = "swap";

/// A validated filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filesystem {
    what: String,
    fs_type: String,
    mount_points: Option<Vec<MountPoint>>,
    options: Vec<String>,
    automount: bool,
    hide: bool,
    fsck: u8,
    crypt: Option<Encryption>,
}

#[derive(Debug, Deserialize)]
struct RawFilesystem {
    what: String,
    #[serde(rename = "type")]
    fs_type: String,
    #[serde(rename = "where", default)]
    mount_points: Option<Value>,
    #[serde(default = "default_options")]
    options: Vec<String>,
    #[serde(default, deserialize_with = "lax_bool")]
    automount: bool,
    #[serde(default, deserialize_with = "lax_bool")]
    hide: bool,
    #[serde(default)]
    fsck: i64,
    #[serde(default)]
    crypt: Option<Value>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

/// Normalize the `where` field: a bare path becomes one mount point, list
/// items that are bare paths are coerced one by one. An empty string counts
/// as no `where` at all.
fn coerce_where(value: Option<Value>) -> Result<Option<Vec<MountPoint>>, ValidationError> {
    match value {
        None | Some(Value::Null) => Ok(None),
        Some(Value::String(path)) if path.is_empty() => Ok(None),
        Some(Value::String(path)) => Ok(Some(vec![MountPoint::new(path)])),
        Some(Value::Array(items)) => items
            .iter()
            .map(MountPoint::from_record)
            .collect::<Result<Vec<_>, _>>()
            .map(Some),
        Some(other) => Err(ValidationError::Malformed(format!(
            "'where' must be a path or a list of mount points, got {}",
            value_kind(&other)
        ))),
    }
}

/// Split a `KEY=value` source at the first `=`.
fn split_source(what: &str) -> Option<(&str, &str)> {
    what.split_once('=').filter(|(key, _)| !key.is_empty())
}

impl Filesystem {
    /// Build and validate an entry from one loosely-typed record.
    ///
    /// `where` is required unless the entry is swap or encrypted, `fsck`
    /// must be 0, 1 or 2, and an encrypted automount needs a `KEY=value`
    /// source so udev can recognise the decrypted filesystem.
    pub fn from_record(value: &Value) -> Result<Self, ValidationError> {
        let raw: RawFilesystem = decode(value)?;
        warn_unknown_keys("filesystem", &raw.extra);

        let mount_points = coerce_where(raw.mount_points)?;
        let crypt_given = raw.crypt.as_ref().is_some_and(|crypt| !crypt.is_null());
        let has_mount_points = mount_points.as_ref().is_some_and(|mps| !mps.is_empty());
        if !crypt_given && raw.fs_type != SWAP && !has_mount_points {
            return Err(ValidationError::MissingMountPoint);
        }

        let fsck = match raw.fsck {
            0..=2 => raw.fsck as u8,
            other => return Err(ValidationError::InvalidFsck(other)),
        };

        let crypt = match raw.crypt {
            Some(value) if !value.is_null() => Some(Encryption::from_record(&value)?),
            _ => None,
        };

        let fs = Self {
            what: raw.what,
            fs_type: raw.fs_type,
            mount_points,
            options: raw.options,
            automount: raw.automount,
            hide: raw.hide,
            fsck,
            crypt,
        };

        if fs.need_udev() && split_source(&fs.what).is_none() {
            return Err(ValidationError::InvalidSource(fs.what));
        }

        Ok(fs)
    }

    pub fn what(&self) -> &str {
        &self.what
    }

    pub fn fs_type(&self) -> &str {
        &self.fs_type
    }

    /// Mount points in render order, `None` when the record had no `where`
    pub fn mount_points(&self) -> Option<&[MountPoint]> {
        self.mount_points.as_deref()
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn automount(&self) -> bool {
        self.automount
    }

    pub fn hide(&self) -> bool {
        self.hide
    }

    pub fn fsck(&self) -> u8 {
        self.fsck
    }

    pub fn crypt(&self) -> Option<&Encryption> {
        self.crypt.as_ref()
    }

    pub fn is_swap(&self) -> bool {
        self.fs_type == SWAP
    }

    /// Encrypted automounts are handled by udev instead of fstab.
    pub fn need_udev(&self) -> bool {
        self.crypt.is_some() && self.automount
    }

    /// fstab lines for this entry, each newline-terminated.
    ///
    /// Returns `None` for entries routed to udev, since an fstab line would
    /// race the udev-driven mount of the decrypted device.
    pub fn fstab(&self) -> Option<Vec<String>> {
        if self.need_udev() {
            return None;
        }

        if self.is_swap() {
            return Some(vec![format!(
                "{} none swap {} 0 0\n",
                self.what,
                join_options(&self.options)
            )]);
        }

        let mount_points = self.mount_points().unwrap_or_default();
        if mount_points.is_empty() {
            tracing::warn!(what = %self.what, "encrypted entry has no mount point, no fstab line written");
        }

        Some(
            mount_points
                .iter()
                .map(|mp| {
                    format!(
                        "{} {} {} {} 0 {}\n",
                        self.what,
                        mp.path(),
                        self.fs_type,
                        mp.effective_options(self),
                        self.fsck
                    )
                })
                .collect(),
        )
    }

    /// udev rules for this entry: one arrival rule, then one activation rule
    /// per mount point (or for `/media/<dm_name>` when there are none).
    ///
    /// Only call this for entries where [`Filesystem::need_udev`] is true.
    /// Those are the only entries whose `KEY=value` source is checked at
    /// construction; an encrypted entry without `automount` may have a plain
    /// device path such as `/dev/mapper/cr` as its source.
    ///
    /// # Panics
    ///
    /// Panics when the entry has no `crypt`, or when its source is not of
    /// the `KEY=value` form.
    pub fn udev_rule(&self) -> Vec<String> {
        let crypt = self
            .crypt
            .as_ref()
            .expect("udev rules are only rendered for encrypted filesystems");
        let (id_name, id_value) = split_source(&self.what)
            .expect("udev rules need a KEY=value filesystem source, see need_udev");

        let default_mount_point;
        let mount_points = match self.mount_points() {
            Some(mps) if !mps.is_empty() => mps,
            _ => {
                default_mount_point = [MountPoint::new(rules::default_media_path(crypt))];
                &default_mount_point[..]
            }
        };

        let mut fragments = Vec::with_capacity(mount_points.len() + 1);
        fragments.push(rules::arrival_rule(crypt));
        for mp in mount_points {
            fragments.push(rules::activation_rule(
                crypt,
                id_name,
                id_value,
                &mp.effective_options(self),
                mp.path(),
            ));
        }

        fragments
    }
}
