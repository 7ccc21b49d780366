//! API keys and tenants
//!
//! Neither has a singleton GET; lookups list the collection and scan it.

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transport::Client;

/// API key record; `key` is only present in the create response
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiKey {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,
    pub created_at: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateApiKeyRequest {
    pub name: String,
}

/// Tenant of a multi-tenant installation
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tenant {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub owner_id: String,
    pub plan: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateTenantRequest {
    pub name: String,
    pub slug: String,
}

impl Client {
    // API key

    pub async fn create_api_key(&self, req: &CreateApiKeyRequest) -> Result<ApiKey> {
        self.send_json(Method::POST, "/auth/keys", req).await
    }

    pub async fn list_api_keys(&self) -> Result<Vec<ApiKey>> {
        self.list_json("/auth/keys").await
    }

    pub async fn find_api_key(&self, id: &str) -> Result<Option<ApiKey>> {
        Ok(self
            .list_api_keys()
            .await?
            .into_iter()
            .find(|key| key.id == id))
    }

    pub async fn revoke_api_key(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/auth/keys/{}", id)).await
    }

    // Tenant

    pub async fn create_tenant(&self, req: &CreateTenantRequest) -> Result<Tenant> {
        self.send_json(Method::POST, "/tenants", req).await
    }

    pub async fn list_tenants(&self) -> Result<Vec<Tenant>> {
        self.list_json("/tenants").await
    }

    pub async fn find_tenant_by_slug(&self, slug: &str) -> Result<Option<Tenant>> {
        Ok(self
            .list_tenants()
            .await?
            .into_iter()
            .find(|tenant| tenant.slug == slug))
    }
}
