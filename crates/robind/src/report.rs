//! Reporting the outcome of a mount to the user.

use std::io::{self, Write};
use std::process::ExitCode;

use robind_common::{RobindError, RobindResult};

/// Result of a bind mount, in the shape the user sees it.
///
/// Prints `Ret: <n>` on stdout with the conventional mount(2) return value
/// and, on failure, a `perror`-style `Failed: <description>` on stderr.
#[derive(Debug)]
pub struct Outcome {
    error: Option<RobindError>,
}

impl Outcome {
    /// Wrap the result of a mount operation.
    #[must_use]
    pub fn from_result(result: RobindResult<()>) -> Self {
        Self { error: result.err() }
    }

    /// Whether the mount succeeded.
    #[must_use]
    pub const fn is_success(&self) -> bool {
        self.error.is_none()
    }

    /// The mount(2) style return value: 0 on success, -1 on failure.
    #[must_use]
    pub const fn ret(&self) -> i32 {
        if self.is_success() { 0 } else { -1 }
    }

    /// Process exit status: 0 on success, 1 on failure.
    #[must_use]
    pub const fn exit_status(&self) -> u8 {
        if self.is_success() { 0 } else { 1 }
    }

    /// Process exit code for `main`.
    #[must_use]
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.exit_status())
    }

    /// Write the result line to `out` and the failure line, if any, to `err`.
    pub fn write_to(&self, out: &mut impl Write, err: &mut impl Write) -> io::Result<()> {
        writeln!(out, "Ret: {}", self.ret())?;
        out.flush()?;

        if let Some(error) = &self.error {
            writeln!(err, "Failed: {}", error.description())?;
            err.flush()?;
        }
        Ok(())
    }

    /// Like [`Outcome::write_to`], but an unwritable stdout or stderr is only
    /// logged. The exit code must still describe the mount.
    pub fn emit(&self, out: &mut impl Write, err: &mut impl Write) {
        if let Err(e) = self.write_to(out, err) {
            tracing::debug!(error = %e, ret = self.ret(), "Could not write result");
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use robind_common::MountStage;

    use super::*;

    const EPERM: i32 = 1;

    fn render(outcome: &Outcome) -> (String, String) {
        let mut out = Vec::new();
        let mut err = Vec::new();
        outcome.write_to(&mut out, &mut err).unwrap();
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(err).unwrap(),
        )
    }

    #[test]
    fn success_prints_ret_zero_only() {
        let outcome = Outcome::from_result(Ok(()));
        let (out, err) = render(&outcome);

        insta::assert_snapshot!(out.trim_end(), @"Ret: 0");
        assert!(err.is_empty());
        assert_eq!(outcome.ret(), 0);
        assert_eq!(outcome.exit_status(), 0);
    }

    #[test]
    fn mount_failure_prints_perror_line() {
        let outcome = Outcome::from_result(Err(RobindError::Mount {
            stage: MountStage::Bind,
            target: PathBuf::from("/var/empty"),
            source: io::Error::from_raw_os_error(EPERM),
        }));
        let (out, err) = render(&outcome);

        insta::assert_snapshot!(out.trim_end(), @"Ret: -1");
        insta::assert_snapshot!(err.trim_end(), @"Failed: Operation not permitted");
        assert_eq!(outcome.exit_status(), 1);
        assert!(!outcome.is_success());
    }

    #[test]
    fn non_os_failure_uses_display_text() {
        let outcome = Outcome::from_result(Err(RobindError::Unsupported {
            feature: "bind mounts".to_string(),
        }));
        let (out, err) = render(&outcome);

        assert_eq!(out, "Ret: -1\n");
        assert_eq!(err, "Failed: Feature not supported: bind mounts\n");
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> io::Result<usize> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }

        fn flush(&mut self) -> io::Result<()> {
            Err(io::Error::from(io::ErrorKind::BrokenPipe))
        }
    }

    #[test_log::test]
    fn closed_stdout_does_not_change_exit_status() {
        let outcome = Outcome::from_result(Ok(()));
        assert!(outcome.write_to(&mut BrokenPipe, &mut BrokenPipe).is_err());

        outcome.emit(&mut BrokenPipe, &mut BrokenPipe);
        assert_eq!(outcome.exit_status(), 0);
    }
}
