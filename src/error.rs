//! Error types for index construction.

use std::io;
use std::path::PathBuf;

/// Errors raised while reading resources from disk.
///
/// Only [`ResourceError::WorkspaceRoot`] ever escapes a full index build;
/// everything else is isolated to the file that produced it and logged.
#[derive(Debug, thiserror::Error)]
pub enum ResourceError {
    #[error("workspace root {} is not readable: {source}", path.display())]
    WorkspaceRoot {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("malformed resource file {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("resource file {} is not a JSON object", path.display())]
    NotAnObject { path: PathBuf },
}

impl ResourceError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ResourceError::Io {
            path: path.into(),
            source,
        }
    }

    /// Whether the error means the whole build cannot proceed.
    pub fn is_fatal(&self) -> bool {
        matches!(self, ResourceError::WorkspaceRoot { .. })
    }
}

pub type Result<T> = std::result::Result<T, ResourceError>;
