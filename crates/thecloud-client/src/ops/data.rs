//! Managed data services: databases, caches, buckets, queues and secrets

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transport::Client;

/// Managed relational database
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Database {
    pub id: String,
    pub name: String,
    pub engine: String,
    pub version: String,
    pub vpc_id: String,
    pub status: String,
    pub port: u16,
    pub username: String,
    /// Only returned by some calls
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDatabaseRequest {
    pub name: String,
    pub engine: String,
    pub version: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

/// Managed in-memory cache
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cache {
    pub id: String,
    pub name: String,
    pub engine: String,
    pub version: String,
    pub vpc_id: String,
    pub memory_mb: u32,
    pub status: String,
    pub port: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub connection_string: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateCacheRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory_mb: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

/// Object storage bucket, addressed by name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Bucket {
    pub id: String,
    pub name: String,
    pub is_public: bool,
    pub versioning_enabled: bool,
    pub encryption_enabled: bool,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateBucketRequest {
    pub name: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
struct BucketVersioningRequest {
    enabled: bool,
}

/// Message queue
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Queue {
    pub id: String,
    pub name: String,
    pub arn: String,
    pub visibility_timeout: u32,
    pub retention_days: u32,
    pub max_message_size: u32,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateQueueRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub visibility_timeout: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retention_days: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_message_size: Option<u32>,
}

/// Stored secret; reads usually omit `value`
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Secret {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSecretRequest {
    pub name: String,
    pub value: String,
    #[serde(default)]
    pub description: String,
}

impl Client {
    // Database

    pub async fn create_database(&self, req: &CreateDatabaseRequest) -> Result<Database> {
        self.send_json(Method::POST, "/databases", req).await
    }

    pub async fn get_database(&self, id: &str) -> Result<Option<Database>> {
        self.get_json(&format!("/databases/{}", id)).await
    }

    pub async fn list_databases(&self) -> Result<Vec<Database>> {
        self.list_json("/databases").await
    }

    pub async fn delete_database(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/databases/{}", id)).await
    }

    // Cache

    pub async fn create_cache(&self, req: &CreateCacheRequest) -> Result<Cache> {
        self.send_json(Method::POST, "/caches", req).await
    }

    pub async fn get_cache(&self, id: &str) -> Result<Option<Cache>> {
        self.get_json(&format!("/caches/{}", id)).await
    }

    pub async fn list_caches(&self) -> Result<Vec<Cache>> {
        self.list_json("/caches").await
    }

    pub async fn delete_cache(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/caches/{}", id)).await
    }

    // Bucket

    pub async fn create_bucket(&self, req: &CreateBucketRequest) -> Result<Bucket> {
        self.send_json(Method::POST, "/storage/buckets", req).await
    }

    pub async fn get_bucket(&self, name: &str) -> Result<Option<Bucket>> {
        self.get_json(&format!("/storage/buckets/{}", name)).await
    }

    pub async fn list_buckets(&self) -> Result<Vec<Bucket>> {
        self.list_json("/storage/buckets").await
    }

    pub async fn set_bucket_versioning(&self, name: &str, enabled: bool) -> Result<()> {
        self.send_unit(
            Method::PATCH,
            &format!("/storage/buckets/{}/versioning", name),
            Some(&BucketVersioningRequest { enabled }),
        )
        .await
    }

    pub async fn delete_bucket(&self, name: &str) -> Result<()> {
        self.delete_path(&format!("/storage/buckets/{}", name)).await
    }

    // Queue

    pub async fn create_queue(&self, req: &CreateQueueRequest) -> Result<Queue> {
        self.send_json(Method::POST, "/queues", req).await
    }

    pub async fn get_queue(&self, id: &str) -> Result<Option<Queue>> {
        self.get_json(&format!("/queues/{}", id)).await
    }

    pub async fn list_queues(&self) -> Result<Vec<Queue>> {
        self.list_json("/queues").await
    }

    pub async fn delete_queue(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/queues/{}", id)).await
    }

    // Secret

    pub async fn create_secret(&self, req: &CreateSecretRequest) -> Result<Secret> {
        self.send_json(Method::POST, "/secrets", req).await
    }

    pub async fn get_secret(&self, id: &str) -> Result<Option<Secret>> {
        self.get_json(&format!("/secrets/{}", id)).await
    }

    pub async fn list_secrets(&self) -> Result<Vec<Secret>> {
        self.list_json("/secrets").await
    }

    pub async fn delete_secret(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/secrets/{}", id)).await
    }
}
