// SPDX-License-Identifier: GPL-3.0-only

//! Mount option tokens written into generated fstab lines and udev rules

/// Shared option list used when an entry does not name its own
pub const DEFAULT_OPTION: &str = "defaults";

/// Keeps the mount out of GVfs based file managers
pub const GVFS_HIDE: &str = "x-gvfs-hide";

/// Ties the mount unit lifetime to its backing device
pub const DEVICE_BOUND: &str = "x-systemd.device-bound";

/// Join tokens into a comma-delimited option string.
///
/// Order is kept exactly as given and nothing is de-duplicated.
pub fn join_options(tokens: &[String]) -> String {
    tokens.join(",")
}

/// `subvol=<name>` token for btrfs subvolume mounts.
pub fn subvol_option(subvol: &str) -> String {
    format!("subvol={subvol}")
}

/// `x-systemd.after=<unit>` ordering token.
pub fn after_option(unit: &str) -> String {
    format!("x-systemd.after={unit}")
}

pub(crate) fn default_options() -> Vec<String> {
    vec![DEFAULT_OPTION.to_string()]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn join_keeps_order_and_duplicates() {
        let tokens = vec![
            "noatime".to_string(),
            "defaults".to_string(),
            "noatime".to_string(),
        ];
        assert_eq!(join_options(&tokens), "noatime,defaults,noatime");
        assert_eq!(join_options(&[]), "");
    }

    #[test]
    fn prefixed_tokens() {
        assert_eq!(subvol_option("@home"), "subvol=@home");
        assert_eq!(
            after_option("systemd-cryptsetup@data.service"),
            "x-systemd.after=systemd-cryptsetup@data.service"
        );
    }

    #[test]
    fn default_options_are_fresh_per_call() {
        let mut first = default_options();
        first.push("noatime".to_string());
        assert_eq!(default_options(), vec!["defaults".to_string()]);
    }
}
