//! VC-prefixed error types with structured error codes.

#![allow(missing_docs)]

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

/// Shared `Result` alias for the project.
pub type Result<T> = std::result::Result<T, CleanupError>;

/// Top-level error type for vendor cleanup.
#[derive(Debug, Error)]
pub enum CleanupError {
    #[error("[VC-1001] invalid configuration: {details}")]
    InvalidConfig { details: String },

    #[error("[VC-1002] missing project manifest: {path}")]
    MissingConfig { path: PathBuf },

    #[error("[VC-1003] configuration parse failure in {context}: {details}")]
    ConfigParse {
        context: &'static str,
        details: String,
    },

    #[error("[VC-2001] unsafe path '{path}' for package {package}")]
    UnsafePath { package: String, path: String },

    #[error("[VC-3001] permission denied for {path}")]
    PermissionDenied { path: PathBuf },

    #[error("[VC-3002] IO failure at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("[VC-3900] runtime failure: {details}")]
    Runtime { details: String },
}

impl CleanupError {
    /// Stable machine-parseable error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        match self {
            Self::InvalidConfig { .. } => "VC-1001",
            Self::MissingConfig { .. } => "VC-1002",
            Self::ConfigParse { .. } => "VC-1003",
            Self::UnsafePath { .. } => "VC-2001",
            Self::PermissionDenied { .. } => "VC-3001",
            Self::Io { .. } => "VC-3002",
            Self::Runtime { .. } => "VC-3900",
        }
    }

    /// Whether the failure comes from the project's own configuration.
    #[must_use]
    pub const fn is_config_error(&self) -> bool {
        matches!(
            self,
            Self::InvalidConfig { .. } | Self::MissingConfig { .. } | Self::ConfigParse { .. }
        )
    }

    /// Convenience constructor for IO errors with a known path.
    ///
    /// Permission failures get their own variant so reports can tell them apart.
    #[must_use]
    pub fn io(path: impl AsRef<Path>, source: io::Error) -> Self {
        let path = path.as_ref().to_path_buf();
        if source.kind() == io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Io { path, source }
        }
    }
}
