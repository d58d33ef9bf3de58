use std::path::PathBuf;
use thiserror::Error;

/// Infrastructure failures. Per-plugin problems never surface here; see
/// [`crate::validator::ValidationFailure`].
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read plugins directory {path}: {message}")]
    Discovery { path: PathBuf, message: String },

    #[error("Failed to parse config {path}: {message}")]
    ConfigParse { path: PathBuf, message: String },

    #[error("Failed to serialize index: {0}")]
    IndexSerialize(#[from] serde_yaml_ng::Error),

    #[error("Failed to write index {path}: {source}")]
    IndexWrite {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, RegistryError>;

impl RegistryError {
    /// Exit status for fatal errors. Validation failures exit with 1, so
    /// anything that aborts the run uses a distinct code.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigParse { .. } => 3,
            _ => 2,
        }
    }
}
