//! Client error types

use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Which layer of a response failed to decode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DecodeStage {
    /// The outer `{data, error}` wrapper
    Envelope,
    /// The `data` payload into the requested type
    Data,
}

impl fmt::Display for DecodeStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DecodeStage::Envelope => write!(f, "response"),
            DecodeStage::Data => write!(f, "data"),
        }
    }
}

/// Errors surfaced by the control-plane client
#[derive(Error, Debug)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("failed to decode {stage}: {source}")]
    Decode {
        stage: DecodeStage,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to encode request body: {0}")]
    Encode(#[source] serde_json::Error),

    /// Error reported by the server, either in an error body or in the envelope
    #[error("[{status}] {message}")]
    Api {
        status: u16,
        kind: Option<String>,
        message: String,
        code: Option<String>,
    },

    #[error("unexpected status code: {0}")]
    UnexpectedStatus(u16),

    #[error("timed out after {0:?}")]
    Timeout(Duration),

    #[error("operation cancelled")]
    Cancelled,

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl ClientError {
    /// HTTP status attached to the error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            ClientError::Api { status, .. } | ClientError::UnexpectedStatus(status) => {
                Some(*status)
            }
            ClientError::Transport(err) => err.status().map(|s| s.as_u16()),
            _ => None,
        }
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, ClientError::Timeout(_))
    }

    pub fn is_cancelled(&self) -> bool {
        matches!(self, ClientError::Cancelled)
    }
}

pub type Result<T> = std::result::Result<T, ClientError>;
