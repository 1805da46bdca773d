//! # robind
//!
//! Bind-mount a directory read-only and report the result the way `mount(2)`
//! callers traditionally do: print the return value, and on failure the
//! `perror` description, then exit 0 or 1.
//!
//! ## Usage
//!
//! ```no_run
//! use std::path::Path;
//!
//! use robind::filesystem::{MountOptions, bind_mount};
//! use robind::report::Outcome;
//!
//! let result = bind_mount(
//!     Path::new("/tmp"),
//!     Path::new("/var/empty"),
//!     &MountOptions::read_only_bind(),
//! );
//! let outcome = Outcome::from_result(result);
//! outcome.write_to(&mut std::io::stdout(), &mut std::io::stderr())?;
//! std::process::exit(i32::from(outcome.exit_status()));
//! # Ok::<(), std::io::Error>(())
//! ```

#![warn(missing_docs)]

pub mod cli;
pub mod filesystem;
pub mod report;
