//! API keys and tenants

use async_trait::async_trait;
use serde_json::Value;
use thecloud_client::{self as api, Client};

use crate::descriptor::{EntityDescriptor, ImportKey};
use crate::error::Result;
use crate::reconcile::{EntityBackend, observe, observe_opt};
use crate::state::ResourceState;

/// The key itself is only returned on create
pub struct ApiKeyBackend;

static API_KEY: EntityDescriptor = EntityDescriptor::new(
    "thecloud_api_key",
    "API Key",
    &["id", "name", "key", "created_at"],
)
.secrets(&["key"]);

#[async_trait]
impl EntityBackend for ApiKeyBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &API_KEY
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateApiKeyRequest = desired.decode()?;
        observe(&client.create_api_key(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.find_api_key(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.revoke_api_key(state.require_id()?).await?)
    }
}

/// Tenants are looked up by slug and cannot be deleted through the API
pub struct TenantBackend;

static TENANT: EntityDescriptor = EntityDescriptor::new(
    "thecloud_tenant",
    "Tenant",
    &[
        "id",
        "name",
        "slug",
        "owner_id",
        "plan",
        "status",
        "created_at",
    ],
)
.import_by(ImportKey::Attribute("slug"))
.undeletable();

#[async_trait]
impl EntityBackend for TenantBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &TENANT
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateTenantRequest = desired.decode()?;
        observe(&client.create_tenant(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.find_tenant_by_slug(state.require_str("slug")?).await?)
    }

    async fn delete(&self, _client: &Client, _state: &ResourceState) -> Result<()> {
        Ok(())
    }
}
