//! Error types for the SimpleNS onboarding service.
//!
//! Library crates use [`SimplensError`] via `thiserror`.
//! The CLI wraps this with `color-eyre` for rich diagnostics.

use std::path::PathBuf;

/// Top-level error type for all SimpleNS operations.
#[derive(Debug, thiserror::Error)]
pub enum SimplensError {
    /// Configuration loading or validation error.
    #[error("config error: {message}")]
    Config { message: String },

    /// An installer script asset could not be located or read.
    #[error("failed to read script asset {path:?}: {source}")]
    AssetRead {
        path: PathBuf,
        source: std::io::Error,
    },

    /// The changelog document could not be read or its front matter parsed.
    #[error("changelog error: {0}")]
    Changelog(String),

    /// Writing to the system clipboard failed.
    #[error("clipboard error: {0}")]
    Clipboard(String),

    /// Binding or running the HTTP server failed.
    #[error("server error: {0}")]
    Server(String),

    /// Filesystem I/O error outside of asset reads.
    #[error("I/O error at {path:?}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Convenience alias used throughout the codebase.
pub type Result<T> = std::result::Result<T, SimplensError>;

impl SimplensError {
    /// Create a config error from any displayable message.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config {
            message: msg.into(),
        }
    }

    /// Wrap an asset read failure with the asset path.
    pub fn asset_read(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::AssetRead {
            path: path.into(),
            source,
        }
    }

    /// Wrap a `std::io::Error` with a path for context.
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_formatting() {
        let err = SimplensError::config("bind address is empty");
        assert_eq!(err.to_string(), "config error: bind address is empty");

        let err = SimplensError::asset_read(
            "public/scripts/onboard.sh",
            std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
        );
        let msg = err.to_string();
        assert!(msg.contains("onboard.sh"));
        assert!(msg.contains("no such file"));
    }
}
