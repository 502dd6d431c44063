//! Error types for the clustering engine.

use crate::index::ClusterHandle;
use thiserror::Error;

/// Errors returned by index construction, queries, and configuration loading.
#[derive(Debug, Error)]
pub enum ClusterError {
    /// The handle was issued by a different index build.
    ///
    /// Recoverable: re-query the current index at the current zoom and use
    /// the fresh handles.
    #[error("Cluster handle {handle} does not belong to index generation {current}")]
    InvalidHandle {
        handle: ClusterHandle,
        current: u64,
    },

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "toml")]
    #[error("TOML parse error: {0}")]
    TomlDe(#[from] toml::de::Error),

    #[cfg(feature = "toml")]
    #[error("TOML serialization error: {0}")]
    TomlSer(#[from] toml::ser::Error),
}

pub type Result<T> = std::result::Result<T, ClusterError>;
