//! Provider error types

use std::path::PathBuf;

use thecloud_client::ClientError;
use thiserror::Error;

/// Errors raised while reconciling a resource
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error(transparent)]
    Client(#[from] ClientError),

    #[error("invalid attributes: {0}")]
    InvalidAttributes(#[source] serde_json::Error),

    #[error("missing required attribute: {0}")]
    MissingAttribute(String),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Expected import identifier with format: {expected}. Got: {got:?}")]
    InvalidImportId { expected: String, got: String },

    #[error("unknown resource type: {0}")]
    UnknownResourceType(String),

    #[error("either 'id' or 'name' must be specified")]
    MissingLookupKey,
}

impl ProviderError {
    /// Whether the error is an expired poll deadline
    pub fn is_timeout(&self) -> bool {
        matches!(self, ProviderError::Client(err) if err.is_timeout())
    }
}

pub type Result<T> = std::result::Result<T, ProviderError>;
