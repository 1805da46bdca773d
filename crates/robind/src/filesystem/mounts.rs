//! Mount operations.

use std::path::Path;

use robind_common::{MountStage, RobindError, RobindResult};
#[cfg(target_os = "linux")]
use rustix::fs::StatVfsMountFlags;
#[cfg(target_os = "linux")]
use rustix::mount::MountFlags;

/// Mount options for a bind mount.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MountOptions {
    /// Read-only mount.
    pub readonly: bool,
}

impl MountOptions {
    /// Options for a plain read-only bind mount.
    #[must_use]
    pub const fn read_only_bind() -> Self {
        Self { readonly: true }
    }

    /// Flags passed to the initial bind call.
    #[cfg(target_os = "linux")]
    #[must_use]
    pub fn bind_flags(&self) -> MountFlags {
        let mut flags = MountFlags::BIND;
        if self.readonly {
            flags |= MountFlags::RDONLY;
        }
        flags
    }

    /// Flags for the follow-up remount, if one is needed.
    ///
    /// The kernel ignores `MS_RDONLY` on a fresh `MS_BIND`, so read-only
    /// only takes effect through `MS_REMOUNT | MS_BIND | MS_RDONLY`. A bind
    /// remount replaces every per-mount flag, so `inherited` (the flags the
    /// bind copied from its source) must be passed along or they are lost.
    #[cfg(target_os = "linux")]
    #[must_use]
    pub fn remount_flags(&self, inherited: MountFlags) -> Option<MountFlags> {
        self.readonly.then_some(MountFlags::BIND | MountFlags::RDONLY | inherited)
    }
}

/// Per-mount flags reported by `statvfs(3)` that a bind remount must keep.
#[cfg(target_os = "linux")]
#[must_use]
pub fn inherited_flags(stat: StatVfsMountFlags) -> MountFlags {
    const KEPT: [(StatVfsMountFlags, MountFlags); 6] = [
        (StatVfsMountFlags::NOSUID, MountFlags::NOSUID),
        (StatVfsMountFlags::NODEV, MountFlags::NODEV),
        (StatVfsMountFlags::NOEXEC, MountFlags::NOEXEC),
        (StatVfsMountFlags::NOATIME, MountFlags::NOATIME),
        (StatVfsMountFlags::NODIRATIME, MountFlags::NODIRATIME),
        (StatVfsMountFlags::RELATIME, MountFlags::RELATIME),
    ];

    KEPT.iter()
        .filter(|(from, _)| stat.contains(*from))
        .fold(MountFlags::empty(), |acc, (_, to)| acc | *to)
}

/// Bind mount `source` onto `target`.
#[cfg(target_os = "linux")]
pub fn bind_mount(source: &Path, target: &Path, options: &MountOptions) -> RobindResult<()> {
    use rustix::mount::{mount, mount_remount};

    let flags = options.bind_flags();
    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        ?flags,
        "Creating bind mount"
    );

    mount(source, target, c"", flags, c"").map_err(|e| mount_error(MountStage::Bind, target, e))?;

    if options.readonly {
        let inherited = rustix::fs::statvfs(target)
            .map(|stat| inherited_flags(stat.f_flag))
            .map_err(|e| mount_error(MountStage::Remount, target, e))?;

        if let Some(flags) = options.remount_flags(inherited) {
            tracing::debug!(target = %target.display(), ?flags, "Remounting read-only");

            mount_remount(target, flags, c"").map_err(|e| {
                tracing::debug!(target = %target.display(), "Bind mount left writable");
                mount_error(MountStage::Remount, target, e)
            })?;
        }
    }

    tracing::debug!(
        source = %source.display(),
        target = %target.display(),
        "Bind mount created successfully"
    );
    Ok(())
}

/// Bind mounts are Linux-only.
#[cfg(not(target_os = "linux"))]
pub fn bind_mount(_source: &Path, _target: &Path, _options: &MountOptions) -> RobindResult<()> {
    Err(RobindError::Unsupported {
        feature: "bind mounts".to_string(),
    })
}

#[cfg(target_os = "linux")]
fn mount_error(stage: MountStage, target: &Path, errno: rustix::io::Errno) -> RobindError {
    RobindError::Mount {
        stage,
        target: target.to_path_buf(),
        source: errno.into(),
    }
}
