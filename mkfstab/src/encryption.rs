// SPDX-License-Identifier: GPL-3.0-only

//! Encrypted block device description
//!
//! An encrypted device is identified either by the serial number the kernel
//! reports for it or by its partition UUID, never both. The decrypted mapping
//! is named by `dm_name` and unlocked through the matching
//! `systemd-cryptsetup@` instance.

use std::collections::BTreeMap;

use serde::Deserialize;
use serde_json::Value;

use crate::error::ValidationError;
use crate::record::{decode, non_empty, warn_unknown_keys};

/// Stable identity of the raw (still encrypted) block device
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncryptionId {
    Serial(String),
    PartUuid(String),
}

impl EncryptionId {
    /// udev match expression selecting the raw device
    pub fn udev_match(&self) -> String {
        match self {
            EncryptionId::Serial(serial) => format!("ENV{{ID_SERIAL_SHORT}}==\"{serial}\""),
            EncryptionId::PartUuid(partuuid) => format!("ENV{{PARTUUID}}==\"{partuuid}\""),
        }
    }
}

/// Validated encryption settings of a filesystem entry
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Encryption {
    dm_name: String,
    id: EncryptionId,
}

#[derive(Debug, Deserialize)]
struct RawEncryption {
    dm_name: String,
    #[serde(default)]
    serial: Option<String>,
    #[serde(default)]
    partuuid: Option<String>,
    #[serde(flatten)]
    extra: BTreeMap<String, Value>,
}

impl Encryption {
    /// Build encryption settings, requiring exactly one of `serial` and `partuuid`.
    ///
    /// Empty strings count as unset.
    pub fn new(
        dm_name: impl Into<String>,
        serial: Option<String>,
        partuuid: Option<String>,
    ) -> Result<Self, ValidationError> {
        let id = match (non_empty(serial), non_empty(partuuid)) {
            (Some(_), Some(_)) => return Err(ValidationError::CryptIdentityConflict),
            (None, None) => return Err(ValidationError::CryptIdentityMissing),
            (Some(serial), None) => EncryptionId::Serial(serial),
            (None, Some(partuuid)) => EncryptionId::PartUuid(partuuid),
        };

        Ok(Self {
            dm_name: dm_name.into(),
            id,
        })
    }

    /// Build from a `{dm_name, serial?, partuuid?}` record.
    pub fn from_record(value: &Value) -> Result<Self, ValidationError> {
        let raw: RawEncryption = decode(value)?;
        warn_unknown_keys("crypt", &raw.extra);
        Self::new(raw.dm_name, raw.serial, raw.partuuid)
    }

    pub fn dm_name(&self) -> &str {
        &self.dm_name
    }

    pub fn id(&self) -> &EncryptionId {
        &self.id
    }

    pub fn serial(&self) -> Option<&str> {
        match &self.id {
            EncryptionId::Serial(serial) => Some(serial),
            EncryptionId::PartUuid(_) => None,
        }
    }

    pub fn partuuid(&self) -> Option<&str> {
        match &self.id {
            EncryptionId::PartUuid(partuuid) => Some(partuuid),
            EncryptionId::Serial(_) => None,
        }
    }

    /// Unit that unlocks this device, `systemd-cryptsetup@<dm_name>.service`
    pub fn cryptsetup_service(&self) -> String {
        format!("systemd-cryptsetup@{}.service", self.dm_name)
    }
}
