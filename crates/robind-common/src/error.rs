//! Common error types for robind.

use std::fmt;
use std::io;
use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

/// Result type alias using [`RobindError`].
pub type RobindResult<T> = Result<T, RobindError>;

/// Which mount(2) call of a read-only bind failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MountStage {
    /// The initial `MS_BIND` call.
    Bind,
    /// The `MS_REMOUNT | MS_BIND | MS_RDONLY` call that applies read-only.
    Remount,
}

impl fmt::Display for MountStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Bind => f.write_str("bind"),
            Self::Remount => f.write_str("remount"),
        }
    }
}

/// Errors reported by robind.
#[derive(Error, Diagnostic, Debug)]
pub enum RobindError {
    /// A mount(2) call returned -1.
    #[error("Failed to {stage} {}: {source}", target.display())]
    #[diagnostic(
        code(robind::mount),
        help("Bind mounts need CAP_SYS_ADMIN and an existing target directory")
    )]
    Mount {
        /// The step that failed.
        stage: MountStage,
        /// The mount point.
        target: PathBuf,
        /// The OS error reported by the kernel.
        source: io::Error,
    },

    /// A `/proc/self/mountinfo` line could not be parsed.
    #[error("Malformed mountinfo line ({message}): {line}")]
    #[diagnostic(code(robind::mountinfo))]
    MountInfo {
        /// The offending line.
        line: String,
        /// What was wrong with it.
        message: String,
    },

    /// I/O error.
    #[error("I/O error: {0}")]
    #[diagnostic(code(robind::io))]
    Io(#[from] io::Error),

    /// Feature not supported on this platform.
    #[error("Feature not supported: {feature}")]
    #[diagnostic(code(robind::unsupported), help("Bind mounts are only available on Linux"))]
    Unsupported {
        /// The unsupported feature.
        feature: String,
    },

    /// Configuration error.
    #[error("Configuration error: {message}")]
    #[diagnostic(code(robind::config))]
    Config {
        /// The error message.
        message: String,
    },
}

impl RobindError {
    /// The errno behind this error, if it came from the OS.
    #[must_use]
    pub fn raw_os_error(&self) -> Option<i32> {
        match self {
            Self::Mount { source, .. } | Self::Io(source) => source.raw_os_error(),
            _ => None,
        }
    }

    /// Human-readable description in the form `perror(3)` prints it.
    ///
    /// OS errors yield the bare `strerror` text ("Operation not permitted"),
    /// everything else falls back to the error's display text.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Mount { source, .. } | Self::Io(source) => os_error_description(source),
            other => other.to_string(),
        }
    }
}

/// Platform text for an I/O error without std's `(os error N)` suffix.
#[must_use]
pub fn os_error_description(err: &io::Error) -> String {
    let text = err.to_string();
    if let Some(code) = err.raw_os_error() {
        let suffix = format!(" (os error {code})");
        if let Some(stripped) = text.strip_suffix(&suffix) {
            return stripped.to_owned();
        }
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENOENT: i32 = 2;
    const EPERM: i32 = 1;

    #[test]
    fn error_display() {
        let err = RobindError::Mount {
            stage: MountStage::Remount,
            target: PathBuf::from("/var/empty"),
            source: io::Error::from_raw_os_error(EPERM),
        };
        assert!(
            err.to_string()
                .starts_with("Failed to remount /var/empty: Operation not permitted")
        );
    }

    #[test]
    fn description_strips_os_error_suffix() {
        let err = RobindError::Mount {
            stage: MountStage::Bind,
            target: PathBuf::from("/nonexistent"),
            source: io::Error::from_raw_os_error(ENOENT),
        };
        assert_eq!(err.description(), "No such file or directory");
        assert_eq!(err.raw_os_error(), Some(ENOENT));
    }

    #[test]
    fn description_of_non_os_error() {
        let err = RobindError::Unsupported {
            feature: "bind mounts".to_string(),
        };
        assert_eq!(err.description(), "Feature not supported: bind mounts");
        assert_eq!(err.raw_os_error(), None);
    }

    #[test]
    fn custom_io_error_keeps_message() {
        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let err: RobindError = io_err.into();
        assert!(matches!(err, RobindError::Io(_)));
        assert_eq!(err.description(), "file not found");
    }
}
