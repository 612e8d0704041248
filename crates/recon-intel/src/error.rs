//! Error types for the `recon-intel` crate.
//!
//! Store and queue operations never fail; only snapshot persistence does.

/// Errors that can occur while persisting shared state.
#[derive(Debug, thiserror::Error)]
pub enum IntelError {
    /// Reading or writing the snapshot file failed.
    #[error("snapshot I/O error: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Encoding the snapshot failed.
    #[error("snapshot JSON error: {source}")]
    Json {
        /// The underlying JSON error.
        source: serde_json::Error,
    },
}

impl From<serde_json::Error> for IntelError {
    fn from(source: serde_json::Error) -> Self {
        Self::Json { source }
    }
}
