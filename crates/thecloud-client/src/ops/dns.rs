//! DNS zones and records

use reqwest::Method;
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::transport::Client;

/// Hosted DNS zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsZone {
    pub id: String,
    pub name: String,
    pub description: String,
    pub vpc_id: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDnsZoneRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
}

/// Record inside a zone
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DnsRecord {
    pub id: String,
    pub zone_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    pub ttl: u32,
    /// MX and SRV only
    #[serde(skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

/// Body for both record creation and full replacement
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DnsRecordRequest {
    /// Parent zone, sent in the path on create
    #[serde(skip_serializing)]
    pub zone_id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub record_type: String,
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ttl: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl Client {
    // Zone

    pub async fn create_dns_zone(&self, req: &CreateDnsZoneRequest) -> Result<DnsZone> {
        self.send_json(Method::POST, "/dns/zones", req).await
    }

    pub async fn get_dns_zone(&self, id: &str) -> Result<Option<DnsZone>> {
        self.get_json(&format!("/dns/zones/{}", id)).await
    }

    pub async fn list_dns_zones(&self) -> Result<Vec<DnsZone>> {
        self.list_json("/dns/zones").await
    }

    pub async fn delete_dns_zone(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/dns/zones/{}", id)).await
    }

    // Record

    pub async fn create_dns_record(&self, req: &DnsRecordRequest) -> Result<DnsRecord> {
        self.send_json(
            Method::POST,
            &format!("/dns/zones/{}/records", req.zone_id),
            req,
        )
        .await
    }

    pub async fn get_dns_record(&self, id: &str) -> Result<Option<DnsRecord>> {
        self.get_json(&format!("/dns/records/{}", id)).await
    }

    pub async fn list_dns_records(&self, zone_id: &str) -> Result<Vec<DnsRecord>> {
        self.list_json(&format!("/dns/zones/{}/records", zone_id))
            .await
    }

    /// Replace a record's content in place
    pub async fn update_dns_record(&self, id: &str, req: &DnsRecordRequest) -> Result<DnsRecord> {
        self.send_json(Method::PUT, &format!("/dns/records/{}", id), req)
            .await
    }

    pub async fn delete_dns_record(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/dns/records/{}", id)).await
    }
}
