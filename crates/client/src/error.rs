//! Client runtime errors

use std::path::PathBuf;

/// Errors from persistent brand storage.
///
/// `BrandState` logs and swallows these; they never reach callers of `set`.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("Storage unavailable: {0}")]
    Unavailable(String),

    #[error("Failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Corrupt storage file {path}: {source}")]
    Corrupt {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to encode stored brand: {0}")]
    Encode(#[from] serde_json::Error),
}
