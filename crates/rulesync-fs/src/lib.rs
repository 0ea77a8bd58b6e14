//! Filesystem layer for rulesync
//!
//! Path handling, atomic writes, verbatim copies, manifest loading and
//! checksums used by the rule synchronizer.

pub mod checksum;
pub mod config;
pub mod constants;
pub mod error;
pub mod io;
pub mod path;

pub use config::ConfigStore;
pub use constants::RulesPath;
pub use error::{Error, Result};
pub use path::NormalizedPath;
