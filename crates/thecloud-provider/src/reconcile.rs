//! Reconciliation contract and the generic reconciler
//!
//! Entity-specific code lives in small [`EntityBackend`] implementations
//! that map state onto client calls. [`Resource`] wraps a backend and owns
//! the shared policies: merging observations, turning a missing resource
//! into removal, and converting errors into diagnostics.

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thecloud_client::Client;
use tracing::{debug, trace};

use crate::descriptor::{EntityDescriptor, UpdateSupport};
use crate::diagnostics::{CLIENT_ERROR, Diagnostics, Operation, Outcome};
use crate::error::{ProviderError, Result};
use crate::state::ResourceState;

/// What a read found
#[derive(Debug, Clone, PartialEq)]
pub enum Observed {
    Present(ResourceState),
    /// The resource no longer exists and should leave state
    Removed,
}

/// Lifecycle operations the host drives for one resource type
#[async_trait]
pub trait Reconciler: Send + Sync {
    fn descriptor(&self) -> &EntityDescriptor;

    async fn create(&self, desired: ResourceState) -> Outcome<ResourceState>;

    async fn read(&self, prior: ResourceState) -> Outcome<Observed>;

    async fn update(&self, desired: ResourceState, prior: ResourceState)
    -> Outcome<ResourceState>;

    async fn delete(&self, prior: ResourceState) -> Diagnostics;

    /// Seed state from an external identifier; the host follows with a read
    fn import(&self, external_id: &str) -> Outcome<ResourceState> {
        let descriptor = self.descriptor();
        match descriptor.import_state(external_id) {
            Ok(state) => Outcome::ok(state),
            Err(err @ ProviderError::InvalidImportId { .. }) => {
                Outcome::error("Unexpected Import Identifier", err.to_string())
            }
            Err(err) => Outcome::error(
                CLIENT_ERROR,
                failure_detail(Operation::Import, descriptor, &err),
            ),
        }
    }
}

/// Entity-specific mapping between state and client calls
///
/// Observations are returned as JSON objects whose keys match state
/// attribute names.
#[async_trait]
pub trait EntityBackend: Send + Sync {
    fn descriptor(&self) -> &'static EntityDescriptor;

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value>;

    /// `Ok(None)` when the resource is gone
    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>>;

    /// Apply supported changes; only called for [`UpdateSupport::InPlace`].
    ///
    /// Returning `None` keeps the desired state as is.
    async fn update(
        &self,
        _client: &Client,
        _desired: &ResourceState,
        _prior: &ResourceState,
    ) -> Result<Option<Value>> {
        Ok(None)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()>;
}

/// Serialize an API entity as an observation
pub fn observe<T: Serialize>(entity: &T) -> Result<Value> {
    serde_json::to_value(entity).map_err(ProviderError::InvalidAttributes)
}

/// Same as [`observe`] for reads that may find nothing
pub fn observe_opt<T: Serialize>(entity: Option<T>) -> Result<Option<Value>> {
    entity.as_ref().map(observe).transpose()
}

fn failure_detail(op: Operation, descriptor: &EntityDescriptor, err: &ProviderError) -> String {
    format!(
        "Unable to {} {}, got error: {}",
        op, descriptor.display_name, err
    )
}

/// Generic reconciler over one backend
pub struct Resource<B> {
    client: Client,
    backend: B,
}

impl<B: EntityBackend> Resource<B> {
    pub fn new(client: Client, backend: B) -> Self {
        Self { client, backend }
    }

    fn merge(&self, state: &mut ResourceState, observed: &Value) {
        let d = self.backend.descriptor();
        state.merge_observed(observed, d.attributes, d.secret_attributes);
    }

    fn failure<T>(&self, op: Operation, err: ProviderError) -> Outcome<T> {
        Outcome::error(CLIENT_ERROR, failure_detail(op, self.backend.descriptor(), &err))
    }
}

#[async_trait]
impl<B: EntityBackend> Reconciler for Resource<B> {
    fn descriptor(&self) -> &EntityDescriptor {
        self.backend.descriptor()
    }

    async fn create(&self, mut desired: ResourceState) -> Outcome<ResourceState> {
        match self.backend.create(&self.client, &desired).await {
            Ok(observed) => {
                self.merge(&mut desired, &observed);
                trace!(
                    "created a {} resource (id: {})",
                    self.backend.descriptor().display_name,
                    desired.id().unwrap_or_default()
                );
                Outcome::ok(desired)
            }
            Err(err) => self.failure(Operation::Create, err),
        }
    }

    async fn read(&self, mut prior: ResourceState) -> Outcome<Observed> {
        match self.backend.read(&self.client, &prior).await {
            Ok(Some(observed)) => {
                self.merge(&mut prior, &observed);
                Outcome::ok(Observed::Present(prior))
            }
            Ok(None) => {
                debug!(
                    "{} {} no longer exists, removing from state",
                    self.backend.descriptor().display_name,
                    prior.id().unwrap_or_default()
                );
                Outcome::ok(Observed::Removed)
            }
            Err(err) => self.failure(Operation::Read, err),
        }
    }

    async fn update(
        &self,
        mut desired: ResourceState,
        prior: ResourceState,
    ) -> Outcome<ResourceState> {
        let d = self.backend.descriptor();
        if d.update == UpdateSupport::Unsupported {
            let mut diagnostics = Diagnostics::new();
            diagnostics.add_warning(
                "Update Not Supported",
                format!(
                    "Updating a {} is not supported by the API; the prior state is kept. \
                     Changes to this resource require replacement.",
                    d.display_name
                ),
            );
            return Outcome::with_diagnostics(prior, diagnostics);
        }

        // carry computed values the plan may not know
        for (key, value) in &prior.attributes {
            if desired.is_null(key) {
                desired.attributes.insert(key.clone(), value.clone());
            }
        }

        match self.backend.update(&self.client, &desired, &prior).await {
            Ok(Some(observed)) => {
                self.merge(&mut desired, &observed);
                Outcome::ok(desired)
            }
            Ok(None) => Outcome::ok(desired),
            Err(err) => self.failure(Operation::Update, err),
        }
    }

    async fn delete(&self, prior: ResourceState) -> Diagnostics {
        let d = self.backend.descriptor();
        let mut diagnostics = Diagnostics::new();

        if !d.deletable {
            diagnostics.add_warning(
                "Delete Not Supported",
                format!(
                    "The API cannot delete a {}; it was removed from state only.",
                    d.display_name
                ),
            );
            return diagnostics;
        }

        match self.backend.delete(&self.client, &prior).await {
            Ok(()) => {
                trace!("deleted a {} resource", d.display_name);
            }
            Err(err) if err.is_timeout() => diagnostics.add_error(
                "Delete Timeout",
                format!("Timed out waiting for {} to be deleted.", d.display_name),
            ),
            Err(err) => {
                diagnostics.add_error(CLIENT_ERROR, failure_detail(Operation::Delete, d, &err))
            }
        }
        diagnostics
    }
}
