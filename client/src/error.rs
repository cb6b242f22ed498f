//! Unified error handling for the client.

use crate::{config::ConfigError, remote::RemoteError};
use thiserror::Error;

/// Application error type.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("ledger error: {0}")]
    Engine(#[from] till_engine::Error),

    #[error("storage io error: {0}")]
    Io(#[from] std::io::Error),

    #[error("remote error: {0}")]
    Remote(#[from] RemoteError),

    #[error("config error: {0}")]
    Config(#[from] ConfigError),

    #[error("storage error: {0}")]
    Storage(String),
}

/// Result type alias for client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
