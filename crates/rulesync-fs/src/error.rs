//! Error types for rulesync-fs

use std::path::PathBuf;

/// Result type for rulesync-fs operations
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur in rulesync-fs operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {format} config at {path}: {message}")]
    ConfigParse {
        path: PathBuf,
        format: String,
        message: String,
    },

    #[error("Unsupported config format: {extension}")]
    UnsupportedFormat { extension: String },

    #[error("Lock acquisition failed for {path}")]
    LockFailed { path: PathBuf },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// True when the underlying cause is a missing file or directory.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Self::Io { source, .. } if source.kind() == std::io::ErrorKind::NotFound
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn io_error_display_includes_path() {
        let err = Error::io(
            "/tmp/missing.md",
            std::io::Error::new(std::io::ErrorKind::NotFound, "gone"),
        );
        let display = err.to_string();
        assert!(display.contains("/tmp/missing.md"), "got: {}", display);
        assert!(err.is_not_found());
    }

    #[test]
    fn non_io_error_is_not_not_found() {
        let err = Error::UnsupportedFormat {
            extension: "ini".into(),
        };
        assert!(!err.is_not_found());
    }
}
