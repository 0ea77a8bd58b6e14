//! Rule synchronization engine for rulesync
//!
//! Builds the assistant's `.agent/rules/` directory from the repository's
//! documentation:
//!
//! - **Mapping**: which documents feed which rule file ([`RuleMapping`])
//! - **Rendering**: concatenation, link rewriting and size-bounded chunking
//! - **Sync**: writing every chunk with its frontmatter, then the auxiliary
//!   copies of `AGENTS.md` and `docs/ARCHITECTURE.md`
//! - **Check**: comparing the rules directory with what a sync would write
//!
//! # Example
//!
//! ```no_run
//! use rulesync_core::{RuleSynchronizer, SyncConfig, SyncOptions};
//! use rulesync_fs::NormalizedPath;
//!
//! fn example() -> rulesync_core::Result<()> {
//!     let config = SyncConfig::load(NormalizedPath::new("."), None)?;
//!     let report = RuleSynchronizer::new(config).sync(SyncOptions::default())?;
//!     println!("{} files written", report.file_count());
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod frontmatter;
pub mod links;
pub mod mapping;
pub mod report;
pub mod split;
pub mod synchronizer;

pub use config::{AuxiliaryCopy, Manifest, SyncConfig};
pub use error::{Error, Result};
pub use frontmatter::{ALWAYS_ON_FRONTMATTER, Trigger};
pub use mapping::{ResolvedRule, RuleEntry, RuleMapping};
pub use report::{
    CheckReport, CheckStatus, CopiedFile, DriftItem, RuleOutcome, SyncReport, WrittenFile,
};
pub use synchronizer::{
    CheckOptions, RenderedFile, RenderedRule, RuleSynchronizer, SyncEvent, SyncOptions,
};
