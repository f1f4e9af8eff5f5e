// SPDX-License-Identifier: GPL-3.0-only

//! Turn a whole filesystem list into fstab and udev rule text

use serde_json::Value;

use crate::error::{MkfstabError, Result};
use crate::filesystem::Filesystem;

/// Rendered output of one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Generated {
    /// fstab lines of every entry not handled by udev, in input order
    pub fstab: String,
    /// udev rule fragments of every encrypted automount, in input order
    pub udev: String,
    pub fstab_entries: usize,
    pub udev_entries: usize,
}

/// Build every entry, failing on the first invalid record.
///
/// Nothing is returned unless all records are valid.
pub fn build_filesystems(records: &[Value]) -> Result<Vec<Filesystem>> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| {
            Filesystem::from_record(record).map_err(|source| MkfstabError::Entry { index, source })
        })
        .collect()
}

/// Split entries into those rendered to fstab and those rendered to udev rules.
pub fn partition(filesystems: &[Filesystem]) -> (Vec<&Filesystem>, Vec<&Filesystem>) {
    filesystems.iter().partition(|fs| !fs.need_udev())
}

/// Render already-built entries.
pub fn render(filesystems: &[Filesystem]) -> Generated {
    let (fstab_fs, udev_fs) = partition(filesystems);

    for fs in &fstab_fs {
        tracing::debug!(what = fs.what(), fs_type = fs.fs_type(), "routing entry to fstab");
    }
    for fs in &udev_fs {
        tracing::debug!(what = fs.what(), fs_type = fs.fs_type(), "routing entry to udev");
    }

    let fstab: String = fstab_fs
        .iter()
        .filter_map(|fs| fs.fstab())
        .flatten()
        .collect();
    let udev: String = udev_fs.iter().flat_map(|fs| fs.udev_rule()).collect();

    Generated {
        fstab,
        udev,
        fstab_entries: fstab_fs.len(),
        udev_entries: udev_fs.len(),
    }
}

/// Validate every record and render the result.
pub fn generate(records: &[Value]) -> Result<Generated> {
    let filesystems = build_filesystems(records)?;
    let generated = render(&filesystems);

    tracing::info!(
        "Rendered {} fstab entries and {} udev automount entries",
        generated.fstab_entries,
        generated.udev_entries
    );

    Ok(generated)
}
