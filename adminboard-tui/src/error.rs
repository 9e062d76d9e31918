//! Error types for the TUI.

use crate::api_client::ApiClientError;
use crate::config::ConfigError;
use crate::persistence::PersistenceError;
use crate::source::SourceError;

#[derive(Debug, thiserror::Error)]
pub enum TuiError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Api(#[from] ApiClientError),
    #[error(transparent)]
    Source(#[from] SourceError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error("Failed to initialize logging: {0}")]
    Logging(String),
}
