// SPDX-License-Identifier: GPL-3.0-only

//! Generate fstab entries and udev automount rules from a filesystem list
//!
//! Each record of the list describes one filesystem: its source, type,
//! mount points, options and optional encryption. Records are validated
//! into [`Filesystem`] entries, then every entry is rendered either as
//! fstab lines or, for encrypted automounts, as udev rules that unlock
//! the device and mount it with `systemd-mount` once it is plugged in.

pub mod encryption;
pub mod error;
pub mod filesystem;
pub mod generate;
pub mod input;
pub mod mount_point;
pub mod options;
pub mod rules;

mod record;

// Re-export commonly used types
pub use encryption::{Encryption, EncryptionId};
pub use error::{MkfstabError, Result, ValidationError};
pub use filesystem::Filesystem;
pub use generate::{Generated, build_filesystems, generate, render};
pub use input::{DEFAULT_INPUT_PATH, InputFormat, load_records, load_records_as, parse_records};
pub use mount_point::MountPoint;
