pub mod file;

use std::path::PathBuf;

use crate::types::State;

/// Whole-document storage backend.
/// Implementations: JsonFileStore (filesystem).
///
/// There is no caching and no locking: every `load` reads the backend again,
/// and every `save` replaces the whole document.
pub trait StateStore: Send + Sync {
    /// Read and parse the full document.
    fn load(&self) -> Result<State, StoreError>;

    /// Serialize and write back the full document.
    fn save(&self, state: &State) -> Result<(), StoreError>;
}

#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid state document {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to serialize state: {0}")]
    Serialize(#[from] serde_json::Error),
}
