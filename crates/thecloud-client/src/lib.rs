//! The Cloud control-plane client
//!
//! Authenticated, retried HTTP access to The Cloud REST API with typed
//! request and response models for every managed resource.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────┐
//! │         ops (typed operations)           │
//! │  create_vpc / get_vpc / delete_vpc ...   │
//! └──────────────┬───────────────────────────┘
//!                │
//! ┌──────────────▼─────────────┐  ┌──────────┐
//! │ transport (retry, 404)     │  │  poll    │
//! └──────────────┬─────────────┘  └──────────┘
//!                │
//! ┌──────────────▼─────────────┐
//! │ envelope ({data, error})   │
//! └────────────────────────────┘
//! ```
//!
//! Reads return `Ok(None)` when the server answers 404, so "gone" is never
//! confused with a failed request.

pub mod config;
pub mod envelope;
pub mod error;
pub mod ops;
pub mod poll;
pub mod transport;

// Re-exports
pub use config::{ClientConfig, PollConfig, RetryConfig};
pub use error::{ClientError, DecodeStage, Result};
pub use ops::*;
pub use transport::{API_KEY_HEADER, Client};
