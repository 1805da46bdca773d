//! # robind-common
//!
//! Shared types for robind:
//! - Error type with `perror`-style descriptions
//! - Default source and target paths

#![warn(missing_docs)]

pub mod error;
pub mod paths;

pub use error::{MountStage, RobindError, RobindResult};
pub use paths::BindPaths;
