//! Error types shared by the client modules.

use thiserror::Error;

/// Config load/save error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),
}

/// Transport-level failure. Callers treat every variant the same way.
#[derive(Debug, Error)]
pub enum NetworkError {
    #[error("no response within {0} ms")]
    Timeout(u64),
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
}

/// History persistence failure. Never surfaced to the user.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("storage poisoned")]
    Poisoned,
}
