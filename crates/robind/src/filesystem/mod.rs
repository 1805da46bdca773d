//! Filesystem operations.
//!
//! This module handles:
//! - Bind mounts, with the read-only remount step
//! - Inspecting the mount table

#[cfg(target_os = "linux")]
pub mod mountinfo;
mod mounts;

#[cfg(target_os = "linux")]
pub use mountinfo::{MountInfo, find_mount};
#[cfg(target_os = "linux")]
pub use mounts::inherited_flags;
pub use mounts::{MountOptions, bind_mount};
