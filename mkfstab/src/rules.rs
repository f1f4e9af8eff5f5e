// SPDX-License-Identifier: GPL-3.0-only

//! udev rule text for decrypt-then-mount of removable encrypted devices
//!
//! Two kinds of rules are produced. The arrival rule fires when the raw
//! block device shows up and pulls in its `systemd-cryptsetup@` unit. The
//! activation rule fires once the decrypted mapping is active and hands the
//! device to `systemd-mount`.

use crate::encryption::Encryption;
use crate::options::after_option;

/// Mount invocation embedded in activation rules
pub const SYSTEMD_MOUNT: &str = "/usr/bin/systemd-mount -A -G --no-block";

/// Rule starting the cryptsetup unit when the encrypted device appears.
pub fn arrival_rule(crypt: &Encryption) -> String {
    format!(
        "ACTION==\"add\", SUBSYSTEM==\"block\", {}, \\\n  ENV{{SYSTEMD_WANTS}}+=\"{}\"\n",
        crypt.id().udev_match(),
        crypt.cryptsetup_service()
    )
}

/// Rule mounting the decrypted filesystem identified by `ID_FS_<id_name>` at `path`.
pub fn activation_rule(
    crypt: &Encryption,
    id_name: &str,
    id_value: &str,
    options: &str,
    path: &str,
) -> String {
    format!(
        "ACTION==\"change\", ENV{{ID_FS_{id_name}}}==\"{id_value}\", ENV{{DM_ACTIVATION}}==\"1\", ENV{{UDISKS_FILESYSTEM_SHARED}}=\"1\", \\\n  RUN+=\"{SYSTEMD_MOUNT} -o {options},{after} $devnode {path}\"\n",
        after = after_option(&crypt.cryptsetup_service()),
    )
}

/// Mount point used when an encrypted automount entry names none.
pub fn default_media_path(crypt: &Encryption) -> String {
    format!("/media/{}", crypt.dm_name())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arrival_rule_by_serial() {
        let crypt = Encryption::new("cr1", Some("S1".to_string()), None).unwrap();
        assert_eq!(
            arrival_rule(&crypt),
            "ACTION==\"add\", SUBSYSTEM==\"block\", ENV{ID_SERIAL_SHORT}==\"S1\", \\\n  \
             ENV{SYSTEMD_WANTS}+=\"systemd-cryptsetup@cr1.service\"\n"
        );
    }

    #[test]
    fn arrival_rule_by_partuuid() {
        let crypt = Encryption::new("cr1", None, Some("0a-1b".to_string())).unwrap();
        assert!(arrival_rule(&crypt).contains("ENV{PARTUUID}==\"0a-1b\""));
    }

    #[test]
    fn activation_rule_text() {
        let crypt = Encryption::new("cr1", Some("S1".to_string()), None).unwrap();
        let rule = activation_rule(
            &crypt,
            "UUID",
            "2",
            "defaults,x-systemd.device-bound",
            "/media/cr1",
        );
        assert_eq!(
            rule,
            "ACTION==\"change\", ENV{ID_FS_UUID}==\"2\", ENV{DM_ACTIVATION}==\"1\", \
             ENV{UDISKS_FILESYSTEM_SHARED}=\"1\", \\\n  \
             RUN+=\"/usr/bin/systemd-mount -A -G --no-block -o \
             defaults,x-systemd.device-bound,x-systemd.after=systemd-cryptsetup@cr1.service \
             $devnode /media/cr1\"\n"
        );
    }

    #[test]
    fn default_path_uses_mapping_name() {
        let crypt = Encryption::new("backup", None, Some("p".to_string())).unwrap();
        assert_eq!(default_media_path(&crypt), "/media/backup");
    }
}
