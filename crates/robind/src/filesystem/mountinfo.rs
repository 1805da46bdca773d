//! `/proc/self/mountinfo` parsing.
//!
//! Each line has the layout described in `proc(5)`:
//!
//! ```text
//! 36 35 98:0 /mnt1 /mnt2 rw,noatime master:1 - ext3 /dev/root rw,errors=continue
//! (1)(2)(3)   (4)   (5)      (6)      (7)   (8) (9)   (10)         (11)
//! ```
//!
//! Field 7 is a variable number of optional fields terminated by `-`.

use std::ffi::OsString;
use std::os::unix::ffi::OsStringExt;
use std::path::{Path, PathBuf};

use robind_common::{RobindError, RobindResult};

const MOUNTINFO_PATH: &str = "/proc/self/mountinfo";

/// One entry of the mount table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MountInfo {
    /// Unique mount ID.
    pub mount_id: u32,
    /// ID of the parent mount.
    pub parent_id: u32,
    /// `major:minor` of the backing device.
    pub device: String,
    /// Directory of the filesystem that forms the root of this mount.
    pub root: PathBuf,
    /// Mount point relative to the process root.
    pub mount_point: PathBuf,
    /// Per-mount options (`rw`, `ro`, `nosuid`, ...).
    pub mount_options: Vec<String>,
    /// Optional tagged fields such as `shared:1`.
    pub optional_fields: Vec<String>,
    /// Filesystem type.
    pub fs_type: String,
    /// Filesystem-specific source, or `none`.
    pub source: String,
    /// Per-superblock options.
    pub super_options: Vec<String>,
}

impl MountInfo {
    /// Parse one line of `/proc/self/mountinfo`.
    pub fn parse_line(line: &str) -> RobindResult<Self> {
        let malformed = |message: &str| RobindError::MountInfo {
            line: line.to_string(),
            message: message.to_string(),
        };

        let mut fields = line.split_ascii_whitespace();
        let mut next = |name: &str| {
            fields
                .next()
                .ok_or_else(|| malformed(&format!("missing {name}")))
        };

        let mount_id: u32 = next("mount ID")?
            .parse()
            .map_err(|_| malformed("invalid mount ID"))?;
        let parent_id: u32 = next("parent ID")?
            .parse()
            .map_err(|_| malformed("invalid parent ID"))?;
        let device = next("device")?.to_string();
        let root = unescape(next("root")?);
        let mount_point = unescape(next("mount point")?);
        let mount_options = split_options(next("mount options")?);

        let mut optional_fields = Vec::new();
        loop {
            match next("separator")? {
                "-" => break,
                tag => optional_fields.push(tag.to_string()),
            }
        }

        let fs_type = next("filesystem type")?.to_string();
        let source = next("mount source")?.to_string();
        let super_options = fields.next().map(split_options).unwrap_or_default();

        Ok(Self {
            mount_id,
            parent_id,
            device,
            root,
            mount_point,
            mount_options,
            optional_fields,
            fs_type,
            source,
            super_options,
        })
    }

    /// Whether writes through this mount point are refused.
    #[must_use]
    pub fn is_read_only(&self) -> bool {
        self.mount_options.iter().any(|o| o == "ro")
    }
}

/// Read the mount table of the calling process.
pub fn read_mountinfo() -> RobindResult<Vec<MountInfo>> {
    let content = std::fs::read_to_string(MOUNTINFO_PATH)?;
    parse_mountinfo(&content)
}

/// Parse a whole mountinfo table, skipping blank lines.
pub fn parse_mountinfo(content: &str) -> RobindResult<Vec<MountInfo>> {
    content
        .lines()
        .filter(|line| !line.trim().is_empty())
        .map(MountInfo::parse_line)
        .collect()
}

/// Find the topmost mount at `target`.
///
/// Later entries shadow earlier ones at the same mount point, so the last
/// match is the visible one.
pub fn find_mount(target: &Path) -> RobindResult<Option<MountInfo>> {
    let target = std::fs::canonicalize(target).unwrap_or_else(|_| target.to_path_buf());
    let mounts = read_mountinfo()?;

    Ok(mounts.into_iter().rev().find(|m| m.mount_point == target))
}

fn split_options(field: &str) -> Vec<String> {
    field.split(',').map(str::to_string).collect()
}

/// Decode the `\ooo` octal escapes the kernel uses for space, tab, newline
/// and backslash.
fn unescape(field: &str) -> PathBuf {
    let bytes = field.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] == b'\\' {
            if let Some(value) = bytes.get(i + 1..i + 4).and_then(octal_byte) {
                out.push(value);
                i += 4;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }

    PathBuf::from(OsString::from_vec(out))
}

fn octal_byte(digits: &[u8]) -> Option<u8> {
    digits.iter().try_fold(0u8, |acc, &d| {
        if (b'0'..=b'7').contains(&d) {
            acc.checked_mul(8)?.checked_add(d - b'0')
        } else {
            None
        }
    })
}
