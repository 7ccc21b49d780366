//! VPCs, subnets, security groups, elastic IPs and gateway routes

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::transport::{Client, NO_BODY};

/// Virtual private cloud
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Vpc {
    pub id: String,
    pub name: String,
    pub cidr_block: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVpcRequest {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr_block: Option<String>,
}

/// Subnet inside a VPC
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Subnet {
    pub id: String,
    pub vpc_id: String,
    pub name: String,
    pub cidr_block: String,
    pub availability_zone: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSubnetRequest {
    /// Parent VPC, sent in the path
    #[serde(skip_serializing)]
    pub vpc_id: String,
    pub name: String,
    pub cidr_block: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_zone: Option<String>,
}

/// Security group with its rules
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityGroup {
    pub id: String,
    pub vpc_id: String,
    pub name: String,
    pub description: String,
    pub rules: Vec<SecurityRule>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSecurityGroupRequest {
    pub vpc_id: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

/// Single ingress or egress rule
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SecurityRule {
    pub id: String,
    pub group_id: String,
    pub direction: String,
    pub protocol: String,
    pub port_min: u16,
    pub port_max: u16,
    pub cidr: String,
    pub priority: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddSecurityRuleRequest {
    #[serde(rename(serialize = "group_id", deserialize = "security_group_id"))]
    pub group_id: String,
    pub direction: String,
    pub protocol: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_min: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port_max: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cidr: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

/// Public address that can be attached to an instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ElasticIp {
    pub id: String,
    pub public_ip: String,
    /// Attached instance; serialized as `null` when detached
    pub instance_id: Option<String>,
    pub status: String,
}

impl ElasticIp {
    /// Instance the address is attached to, if any
    pub fn attached_instance(&self) -> Option<&str> {
        self.instance_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize)]
struct AssociateElasticIpRequest<'a> {
    instance_id: &'a str,
}

/// API gateway route
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewayRoute {
    pub id: String,
    pub name: String,
    pub path_prefix: String,
    pub target_url: String,
    pub methods: Vec<String>,
    pub strip_prefix: bool,
    pub rate_limit: u32,
    pub priority: i32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateGatewayRouteRequest {
    pub name: String,
    pub path_prefix: String,
    pub target_url: String,
    #[serde(default)]
    pub methods: Vec<String>,
    #[serde(default)]
    pub strip_prefix: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rate_limit: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<i32>,
}

impl Client {
    // VPC

    pub async fn create_vpc(&self, req: &CreateVpcRequest) -> Result<Vpc> {
        self.send_json(Method::POST, "/vpcs", req).await
    }

    pub async fn get_vpc(&self, id: &str) -> Result<Option<Vpc>> {
        self.get_json(&format!("/vpcs/{}", id)).await
    }

    pub async fn list_vpcs(&self) -> Result<Vec<Vpc>> {
        self.list_json("/vpcs").await
    }

    pub async fn delete_vpc(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/vpcs/{}", id)).await
    }

    // Subnet

    pub async fn create_subnet(&self, req: &CreateSubnetRequest) -> Result<Subnet> {
        self.send_json(Method::POST, &format!("/vpcs/{}/subnets", req.vpc_id), req)
            .await
    }

    pub async fn get_subnet(&self, id: &str) -> Result<Option<Subnet>> {
        self.get_json(&format!("/subnets/{}", id)).await
    }

    /// Subnets of one VPC
    pub async fn list_subnets(&self, vpc_id: &str) -> Result<Vec<Subnet>> {
        self.list_json(&format!("/vpcs/{}/subnets", vpc_id)).await
    }

    pub async fn delete_subnet(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/subnets/{}", id)).await
    }

    // Security group

    pub async fn create_security_group(
        &self,
        req: &CreateSecurityGroupRequest,
    ) -> Result<SecurityGroup> {
        self.send_json(Method::POST, "/security-groups", req).await
    }

    /// Fetch a security group including its rules
    pub async fn get_security_group(&self, id: &str) -> Result<Option<SecurityGroup>> {
        self.get_json(&format!("/security-groups/{}", id)).await
    }

    pub async fn list_security_groups(&self) -> Result<Vec<SecurityGroup>> {
        self.list_json("/security-groups").await
    }

    pub async fn delete_security_group(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/security-groups/{}", id)).await
    }

    pub async fn add_security_rule(&self, req: &AddSecurityRuleRequest) -> Result<SecurityRule> {
        self.send_json(
            Method::POST,
            &format!("/security-groups/{}/rules", req.group_id),
            req,
        )
        .await
    }

    /// Look a rule up through its group; `None` if either is gone
    pub async fn find_security_rule(
        &self,
        group_id: &str,
        rule_id: &str,
    ) -> Result<Option<SecurityRule>> {
        let Some(group) = self.get_security_group(group_id).await? else {
            return Ok(None);
        };
        Ok(group.rules.into_iter().find(|rule| rule.id == rule_id))
    }

    pub async fn remove_security_rule(&self, rule_id: &str) -> Result<()> {
        self.delete_path(&format!("/security-groups/rules/{}", rule_id))
            .await
    }

    // Elastic IP

    pub async fn allocate_elastic_ip(&self) -> Result<ElasticIp> {
        self.send_json(Method::POST, "/elastic-ips", &serde_json::Map::new())
            .await
    }

    pub async fn get_elastic_ip(&self, id: &str) -> Result<Option<ElasticIp>> {
        self.get_json(&format!("/elastic-ips/{}", id)).await
    }

    pub async fn list_elastic_ips(&self) -> Result<Vec<ElasticIp>> {
        self.list_json("/elastic-ips").await
    }

    pub async fn release_elastic_ip(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/elastic-ips/{}", id)).await
    }

    pub async fn associate_elastic_ip(&self, id: &str, instance_id: &str) -> Result<ElasticIp> {
        debug!("associating elastic IP {} with instance {}", id, instance_id);
        self.send_json(
            Method::POST,
            &format!("/elastic-ips/{}/associate", id),
            &AssociateElasticIpRequest { instance_id },
        )
        .await
    }

    pub async fn disassociate_elastic_ip(&self, id: &str) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("/elastic-ips/{}/disassociate", id),
            NO_BODY,
        )
        .await
    }

    // Gateway route

    pub async fn create_gateway_route(
        &self,
        req: &CreateGatewayRouteRequest,
    ) -> Result<GatewayRoute> {
        self.send_json(Method::POST, "/gateway/routes", req).await
    }

    pub async fn get_gateway_route(&self, id: &str) -> Result<Option<GatewayRoute>> {
        self.get_json(&format!("/gateway/routes/{}", id)).await
    }

    pub async fn list_gateway_routes(&self) -> Result<Vec<GatewayRoute>> {
        self.list_json("/gateway/routes").await
    }

    pub async fn delete_gateway_route(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/gateway/routes/{}", id)).await
    }
}
