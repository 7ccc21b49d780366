//! DNS zones and records

use async_trait::async_trait;
use serde_json::Value;
use thecloud_client::{self as api, Client};

use crate::descriptor::EntityDescriptor;
use crate::error::Result;
use crate::reconcile::{EntityBackend, observe, observe_opt};
use crate::state::ResourceState;

pub struct DnsZoneBackend;

static DNS_ZONE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_dns_zone",
    "DNS Zone",
    &["id", "name", "description", "vpc_id", "status"],
);

#[async_trait]
impl EntityBackend for DnsZoneBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &DNS_ZONE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateDnsZoneRequest = desired.decode()?;
        observe(&client.create_dns_zone(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_dns_zone(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_dns_zone(state.require_id()?).await?)
    }
}

/// Records are replaced in full on update
pub struct DnsRecordBackend;

static DNS_RECORD: EntityDescriptor = EntityDescriptor::new(
    "thecloud_dns_record",
    "DNS Record",
    &["id", "zone_id", "name", "type", "content", "ttl", "priority"],
)
.updatable();

#[async_trait]
impl EntityBackend for DnsRecordBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &DNS_RECORD
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::DnsRecordRequest = desired.decode()?;
        observe(&client.create_dns_record(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_dns_record(state.require_id()?).await?)
    }

    async fn update(
        &self,
        client: &Client,
        desired: &ResourceState,
        prior: &ResourceState,
    ) -> Result<Option<Value>> {
        let req: api::DnsRecordRequest = desired.decode()?;
        let record = client
            .update_dns_record(prior.require_id()?, &req)
            .await?;
        observe(&record).map(Some)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_dns_record(state.require_id()?).await?)
    }
}
