// SPDX-License-Identifier: GPL-3.0-only

use std::fs;

use mkfstab::{InputFormat, MkfstabError, ValidationError, generate, load_records, load_records_as};
use tempfile::TempDir;

const HOST_LIST: &str = "\
- what: UUID=1
  type: ext4
  where: /mnt/d
  options: [noatime]
  fsck: 1
- what: LABEL=swap1
  type: swap
- what: UUID=2
  type: ext4
  automount: true
  crypt:
    dm_name: cr1
    serial: S1
- what: UUID=fa
  type: btrfs
  where:
    - /data
    - path: /data/snapshots
      subvol: '@snapshots'
      hide: true
";

#[test]
fn yaml_file_renders_fstab_and_udev_rules() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fstab.yml");
    fs::write(&path, HOST_LIST).unwrap();

    let generated = generate(&load_records(&path).unwrap()).unwrap();

    assert_eq!(
        generated.fstab,
        "UUID=1 /mnt/d ext4 noatime 0 1\n\
         LABEL=swap1 none swap defaults 0 0\n\
         UUID=fa /data btrfs defaults 0 0\n\
         UUID=fa /data/snapshots btrfs defaults,subvol=@snapshots,x-gvfs-hide 0 0\n"
    );
    assert_eq!(
        generated.udev,
        "ACTION==\"add\", SUBSYSTEM==\"block\", ENV{ID_SERIAL_SHORT}==\"S1\", \\\n  \
         ENV{SYSTEMD_WANTS}+=\"systemd-cryptsetup@cr1.service\"\n\
         ACTION==\"change\", ENV{ID_FS_UUID}==\"2\", ENV{DM_ACTIVATION}==\"1\", \
         ENV{UDISKS_FILESYSTEM_SHARED}=\"1\", \\\n  \
         RUN+=\"/usr/bin/systemd-mount -A -G --no-block -o \
         defaults,x-systemd.device-bound,x-systemd.after=systemd-cryptsetup@cr1.service \
         $devnode /media/cr1\"\n"
    );
}

#[test]
fn json_file_with_explicit_format() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("filesystems.list");
    fs::write(&path, r#"[{"what": "LABEL=swap1", "type": "swap"}]"#).unwrap();

    let records = load_records_as(&path, InputFormat::Json).unwrap();
    assert_eq!(generate(&records).unwrap().fstab, "LABEL=swap1 none swap defaults 0 0\n");
}

#[test]
fn invalid_entry_names_its_position() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("fstab.yml");
    fs::write(
        &path,
        "- what: LABEL=swap1\n  type: swap\n- what: UUID=1\n  type: ext4\n  where: /a\n  fsck: 3\n",
    )
    .unwrap();

    let err = generate(&load_records(&path).unwrap()).unwrap_err();
    assert!(matches!(
        err,
        MkfstabError::Entry {
            index: 1,
            source: ValidationError::InvalidFsck(3)
        }
    ));
    assert_eq!(err.to_string(), "entry #1: fsck must be 0, 1 or 2, got 3");
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = TempDir::new().unwrap();
    let err = load_records(dir.path().join("absent.yml")).unwrap_err();
    assert!(matches!(err, MkfstabError::Io(_)));
}

#[test]
fn yaml_1_1_booleans_and_unknown_keys_are_accepted() {
    let records = mkfstab::parse_records(
        InputFormat::Yaml,
        "- what: UUID=1\n  type: ext4\n  where: /a\n  hide: yes\n  automount: on\n  note: usb stick\n",
    )
    .unwrap();

    assert_eq!(
        generate(&records).unwrap().fstab,
        "UUID=1 /a ext4 defaults,x-gvfs-hide,x-systemd.device-bound 0 0\n"
    );
}

#[test]
fn empty_where_is_rejected_before_writing_a_broken_line() {
    let records =
        mkfstab::parse_records(InputFormat::Yaml, "- what: UUID=1\n  type: ext4\n  where: ''\n")
            .unwrap();

    let err = generate(&records).unwrap_err();
    assert!(matches!(
        err,
        MkfstabError::Entry {
            index: 0,
            source: ValidationError::MissingMountPoint
        }
    ));
}
