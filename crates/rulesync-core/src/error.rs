//! Error types for rulesync-core

use std::path::PathBuf;

/// Result type for rulesync-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur while synchronizing rules
///
/// A missing mapped document is not an error; it is reported as a warning
/// in [`crate::RuleOutcome::missing_docs`].
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The repository root does not exist
    #[error("Repository root not found at {path}")]
    RootNotFound { path: PathBuf },

    /// The rules output directory does not exist
    #[error("Rules directory not found at {path}")]
    RulesDirNotFound { path: PathBuf },

    /// A file that is always copied into the rules directory is missing
    #[error("Auxiliary source not found at {path}")]
    AuxiliaryNotFound { path: PathBuf },

    /// A rule enumerates a documentation directory that does not exist
    #[error("Documentation directory for {rule} not found at {path}")]
    DocsDirNotFound { rule: String, path: PathBuf },

    /// The rule mapping is malformed
    #[error("Invalid rule mapping: {message}")]
    InvalidMapping { message: String },

    /// The preamble and safety margin leave no room for content
    #[error(
        "No room for content in {rule}: max_chars {max_chars} minus preamble {preamble_chars} minus margin {safety_margin}"
    )]
    ChunkBudgetExhausted {
        rule: String,
        max_chars: usize,
        preamble_chars: usize,
        safety_margin: usize,
    },

    /// Filesystem error from rulesync-fs
    #[error(transparent)]
    Fs(#[from] rulesync_fs::Error),
}

impl Error {
    pub fn invalid_mapping(message: impl Into<String>) -> Self {
        Self::InvalidMapping {
            message: message.into(),
        }
    }
}
