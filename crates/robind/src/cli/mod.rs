//! CLI definition and handler.

use std::io;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::Parser;
use color_eyre::eyre::Result;
use robind_common::BindPaths;

use crate::filesystem::{MountOptions, bind_mount};
use crate::report::Outcome;

/// robind - bind-mount a directory read-only
#[derive(Parser, Debug)]
#[command(name = "robind")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory to expose [default: $ROBIND_SOURCE or /tmp]
    #[arg(short, long)]
    pub source: Option<PathBuf>,

    /// Existing directory to mount over [default: $ROBIND_TARGET or /var/empty]
    #[arg(short, long)]
    pub target: Option<PathBuf>,

    /// Enable debug logging
    #[arg(long)]
    pub debug: bool,
}

impl Cli {
    /// Perform the read-only bind mount and report the result.
    ///
    /// Mount failures are reported on stdout/stderr and turned into exit
    /// status 1; only configuration errors are returned.
    pub fn execute(&self) -> Result<ExitCode> {
        let paths = BindPaths::resolve(self.source.as_deref(), self.target.as_deref())?;

        let result = bind_mount(
            &paths.source,
            &paths.target,
            &MountOptions::read_only_bind(),
        );
        if result.is_ok() {
            log_mount_entry(&paths.target);
        }

        let outcome = Outcome::from_result(result);
        outcome.emit(&mut io::stdout().lock(), &mut io::stderr().lock());

        Ok(outcome.exit_code())
    }
}

#[cfg(target_os = "linux")]
fn log_mount_entry(target: &Path) {
    match crate::filesystem::find_mount(target) {
        Ok(Some(entry)) => tracing::debug!(
            target = %target.display(),
            mount_id = entry.mount_id,
            root = %entry.root.display(),
            read_only = entry.is_read_only(),
            "Mount table entry"
        ),
        Ok(None) => tracing::debug!(target = %target.display(), "No mount table entry"),
        Err(e) => tracing::debug!(error = %e, "Could not read mount table"),
    }
}

#[cfg(not(target_os = "linux"))]
fn log_mount_entry(_target: &Path) {}

#[cfg(test)]
mod tests {
    use clap::CommandFactory;

    use super::*;

    #[test]
    fn cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn no_arguments_means_defaults() {
        let cli = Cli::try_parse_from(["robind"]).unwrap();
        assert!(cli.source.is_none());
        assert!(cli.target.is_none());
        assert!(!cli.debug);
    }

    #[test]
    fn explicit_paths() {
        let cli =
            Cli::try_parse_from(["robind", "-s", "/srv/data", "--target", "/mnt/data", "--debug"])
                .unwrap();
        assert_eq!(cli.source, Some(PathBuf::from("/srv/data")));
        assert_eq!(cli.target, Some(PathBuf::from("/mnt/data")));
        assert!(cli.debug);
    }

    #[test]
    fn positional_arguments_are_rejected() {
        assert!(Cli::try_parse_from(["robind", "/tmp"]).is_err());
    }
}
