//! Default source and target paths.

use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;

use crate::{RobindError, RobindResult};

/// Directory exposed when no source is given.
pub static DEFAULT_SOURCE: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("ROBIND_SOURCE")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/tmp"))
});

/// Mount point used when no target is given.
pub static DEFAULT_TARGET: Lazy<PathBuf> = Lazy::new(|| {
    std::env::var("ROBIND_TARGET")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from("/var/empty"))
});

/// Source directory and mount point of a bind mount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindPaths {
    /// Directory whose contents become visible at `target`.
    pub source: PathBuf,
    /// Existing directory that becomes the mount point.
    pub target: PathBuf,
}

impl BindPaths {
    /// Create paths from explicit values.
    #[must_use]
    pub fn new(source: impl Into<PathBuf>, target: impl Into<PathBuf>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
        }
    }

    /// Combine optional overrides with the defaults.
    ///
    /// Empty paths are rejected; mount(2) would fail on them with a less
    /// helpful `ENOENT`.
    pub fn resolve(source: Option<&Path>, target: Option<&Path>) -> RobindResult<Self> {
        let paths = Self::new(
            source.unwrap_or(DEFAULT_SOURCE.as_path()),
            target.unwrap_or(DEFAULT_TARGET.as_path()),
        );

        for (name, path) in [("source", &paths.source), ("target", &paths.target)] {
            if path.as_os_str().is_empty() {
                return Err(RobindError::Config {
                    message: format!("{name} path must not be empty"),
                });
            }
        }

        Ok(paths)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_take_precedence() {
        let paths =
            BindPaths::resolve(Some(Path::new("/srv/data")), Some(Path::new("/mnt/data"))).unwrap();
        assert_eq!(paths, BindPaths::new("/srv/data", "/mnt/data"));
    }

    #[test]
    fn missing_overrides_use_defaults() {
        let paths = BindPaths::resolve(None, Some(Path::new("/mnt/data"))).unwrap();
        assert_eq!(paths.source, *DEFAULT_SOURCE);
        assert_eq!(paths.target, PathBuf::from("/mnt/data"));
    }

    #[test]
    fn empty_path_is_rejected() {
        let err = BindPaths::resolve(Some(Path::new("")), None).unwrap_err();
        assert!(matches!(err, RobindError::Config { .. }));
        assert_eq!(
            err.to_string(),
            "Configuration error: source path must not be empty"
        );
    }
}
