//! Databases, caches, buckets, queues and secrets

use async_trait::async_trait;
use serde_json::{Value, json};
use thecloud_client::{self as api, Client};
use tracing::debug;

use crate::descriptor::{EntityDescriptor, ImportKey};
use crate::error::Result;
use crate::reconcile::{EntityBackend, observe, observe_opt};
use crate::state::ResourceState;

pub struct DatabaseBackend;

static DATABASE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_database",
    "Database",
    &[
        "id",
        "name",
        "engine",
        "version",
        "vpc_id",
        "status",
        "port",
        "username",
        "connection_string",
    ],
)
.secrets(&["connection_string"]);

#[async_trait]
impl EntityBackend for DatabaseBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &DATABASE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateDatabaseRequest = desired.decode()?;
        observe(&client.create_database(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_database(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_database(state.require_id()?).await?)
    }
}

pub struct CacheBackend;

static CACHE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_cache",
    "Cache",
    &[
        "id",
        "name",
        "engine",
        "version",
        "vpc_id",
        "memory_mb",
        "status",
        "port",
        "connection_string",
    ],
)
.secrets(&["connection_string"]);

#[async_trait]
impl EntityBackend for CacheBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &CACHE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateCacheRequest = desired.decode()?;
        observe(&client.create_cache(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_cache(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_cache(state.require_id()?).await?)
    }
}

/// Buckets are addressed by name; versioning can change in place
pub struct BucketBackend;

static BUCKET: EntityDescriptor = EntityDescriptor::new(
    "thecloud_bucket",
    "Bucket",
    &[
        "id",
        "name",
        "is_public",
        "versioning_enabled",
        "encryption_enabled",
        "created_at",
    ],
)
.import_by(ImportKey::Attribute("name"))
.updatable();

#[async_trait]
impl EntityBackend for BucketBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &BUCKET
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateBucketRequest = desired.decode()?;
        let mut bucket = client.create_bucket(&req).await?;

        if desired.get_attribute::<bool>("versioning_enabled") == Some(true) {
            client.set_bucket_versioning(&bucket.name, true).await?;
            bucket.versioning_enabled = true;
        }
        observe(&bucket)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_bucket(state.require_str("name")?).await?)
    }

    async fn update(
        &self,
        client: &Client,
        desired: &ResourceState,
        prior: &ResourceState,
    ) -> Result<Option<Value>> {
        let wanted = desired
            .get_attribute::<bool>("versioning_enabled")
            .unwrap_or_default();
        let current = prior
            .get_attribute::<bool>("versioning_enabled")
            .unwrap_or_default();
        if wanted == current {
            return Ok(None);
        }

        let name = prior.require_str("name")?;
        debug!("setting versioning on bucket {} to {}", name, wanted);
        client.set_bucket_versioning(name, wanted).await?;
        Ok(Some(json!({ "versioning_enabled": wanted })))
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_bucket(state.require_str("name")?).await?)
    }
}

pub struct QueueBackend;

static QUEUE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_queue",
    "Queue",
    &[
        "id",
        "name",
        "arn",
        "visibility_timeout",
        "retention_days",
        "max_message_size",
        "status",
    ],
);

#[async_trait]
impl EntityBackend for QueueBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &QUEUE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateQueueRequest = desired.decode()?;
        observe(&client.create_queue(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_queue(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_queue(state.require_id()?).await?)
    }
}

/// Secret values are write-only; reads keep the value held in state
pub struct SecretBackend;

static SECRET: EntityDescriptor = EntityDescriptor::new(
    "thecloud_secret",
    "Secret",
    &["id", "name", "value", "description"],
)
.secrets(&["value"]);

#[async_trait]
impl EntityBackend for SecretBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &SECRET
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateSecretRequest = desired.decode()?;
        observe(&client.create_secret(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_secret(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_secret(state.require_id()?).await?)
    }
}
