//! The Cloud infrastructure provider
//!
//! Lifecycle reconciliation (create, read, update, delete, import) for every
//! The Cloud resource type, built on [`thecloud_client`].
//!
//! # Architecture
//!
//! ```text
//! ┌────────────────────────────────────────────┐
//! │ provider (configure, registry by type)     │
//! └──────────────┬─────────────────────────────┘
//!                │
//! ┌──────────────▼─────────────┐  ┌────────────┐
//! │ reconcile::Resource<B>     │  │  lookup    │
//! │ merge / removal / diags    │  │ (data src) │
//! └──────────────┬─────────────┘  └────────────┘
//!                │
//! ┌──────────────▼─────────────┐
//! │ resources (EntityBackend)  │
//! └────────────────────────────┘
//! ```

pub mod descriptor;
pub mod diagnostics;
pub mod error;
pub mod logging;
pub mod lookup;
pub mod provider;
pub mod reconcile;
pub mod resources;
pub mod state;

// Re-exports
pub use descriptor::{EntityDescriptor, ImportKey, UpdateSupport};
pub use diagnostics::{Diagnostic, Diagnostics, Operation, Outcome, Severity};
pub use error::{ProviderError, Result};
pub use logging::{init_logging, try_init_logging};
pub use lookup::{DataSources, Lookup};
pub use provider::{ProviderConfig, TheCloudProvider};
pub use reconcile::{EntityBackend, Observed, Reconciler, Resource};
pub use state::{Attributes, ResourceState};
