//! VPCs, subnets, security groups and rules, elastic IPs, gateway routes

use async_trait::async_trait;
use serde_json::{Value, json};
use thecloud_client::{self as api, Client};

use crate::descriptor::{
    EntityDescriptor, ImportKey, composite_keys, join_composite, split_composite,
};
use crate::error::Result;
use crate::reconcile::{EntityBackend, observe, observe_opt};
use crate::state::ResourceState;

pub struct VpcBackend;

static VPC: EntityDescriptor = EntityDescriptor::new(
    "thecloud_vpc",
    "VPC",
    &["id", "name", "cidr_block", "status"],
);

#[async_trait]
impl EntityBackend for VpcBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &VPC
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateVpcRequest = desired.decode()?;
        observe(&client.create_vpc(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_vpc(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_vpc(state.require_id()?).await?)
    }
}

pub struct SubnetBackend;

static SUBNET: EntityDescriptor = EntityDescriptor::new(
    "thecloud_subnet",
    "Subnet",
    &["id", "vpc_id", "name", "cidr_block", "availability_zone"],
);

#[async_trait]
impl EntityBackend for SubnetBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &SUBNET
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateSubnetRequest = desired.decode()?;
        observe(&client.create_subnet(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_subnet(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_subnet(state.require_id()?).await?)
    }
}

pub struct SecurityGroupBackend;

static SECURITY_GROUP: EntityDescriptor = EntityDescriptor::new(
    "thecloud_security_group",
    "Security Group",
    &["id", "vpc_id", "name", "description"],
);

#[async_trait]
impl EntityBackend for SecurityGroupBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &SECURITY_GROUP
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateSecurityGroupRequest = desired.decode()?;
        observe(&client.create_security_group(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_security_group(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_security_group(state.require_id()?).await?)
    }
}

/// Rules are read through their group; imported as
/// `security_group_id:rule_id`
pub struct SecurityRuleBackend;

const SECURITY_RULE_KEYS: [&str; 2] = ["security_group_id", "rule_id"];

static SECURITY_RULE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_security_rule",
    "Security Rule",
    &[
        "id",
        "rule_id",
        "security_group_id",
        "direction",
        "protocol",
        "port_min",
        "port_max",
        "cidr",
        "priority",
    ],
)
.import_by(ImportKey::Composite(SECURITY_RULE_KEYS));

fn rule_observation(rule: &api::SecurityRule, group_id: &str) -> Result<Value> {
    let mut value = observe(rule)?;
    if let Some(fields) = value.as_object_mut() {
        fields.remove("group_id");
        fields.insert("security_group_id".to_string(), json!(group_id));
        fields.insert("rule_id".to_string(), json!(rule.id));
    }
    Ok(value)
}

/// Group and rule ids; an imported state may only hold the composite `id`
fn rule_keys(state: &ResourceState) -> Result<(&str, &str)> {
    let group_id = state.str_attr("security_group_id");
    match (group_id, state.str_attr("rule_id"), state.id()) {
        (Some(group_id), Some(rule_id), _) => Ok((group_id, rule_id)),
        (Some(group_id), None, Some(id)) if split_composite(id).is_none() => Ok((group_id, id)),
        _ => composite_keys(state, SECURITY_RULE_KEYS),
    }
}

#[async_trait]
impl EntityBackend for SecurityRuleBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &SECURITY_RULE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::AddSecurityRuleRequest = desired.decode()?;
        let rule = client.add_security_rule(&req).await?;
        rule_observation(&rule, &req.group_id)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        let (group_id, rule_id) = rule_keys(state)?;
        match client.find_security_rule(group_id, rule_id).await? {
            Some(rule) => rule_observation(&rule, group_id).map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        let (_, rule_id) = rule_keys(state)?;
        Ok(client.remove_security_rule(rule_id).await?)
    }
}

pub struct ElasticIpBackend;

static ELASTIC_IP: EntityDescriptor = EntityDescriptor::new(
    "thecloud_elastic_ip",
    "Elastic IP",
    &["id", "public_ip", "instance_id", "status"],
);

#[async_trait]
impl EntityBackend for ElasticIpBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &ELASTIC_IP
    }

    async fn create(&self, client: &Client, _desired: &ResourceState) -> Result<Value> {
        observe(&client.allocate_elastic_ip().await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_elastic_ip(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.release_elastic_ip(state.require_id()?).await?)
    }
}

/// Attachment of an elastic IP to an instance, keyed `eip_id:instance_id`
pub struct ElasticIpAssociationBackend;

const EIP_ASSOCIATION_KEYS: [&str; 2] = ["eip_id", "instance_id"];

static ELASTIC_IP_ASSOCIATION: EntityDescriptor = EntityDescriptor::new(
    "thecloud_elastic_ip_association",
    "Elastic IP Association",
    &["id", "eip_id", "instance_id", "public_ip"],
)
.import_by(ImportKey::Composite(EIP_ASSOCIATION_KEYS));

#[async_trait]
impl EntityBackend for ElasticIpAssociationBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &ELASTIC_IP_ASSOCIATION
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let eip_id = desired.require_str("eip_id")?;
        let instance_id = desired.require_str("instance_id")?;
        let eip = client.associate_elastic_ip(eip_id, instance_id).await?;
        Ok(json!({
            "id": join_composite(eip_id, instance_id),
            "eip_id": eip_id,
            "instance_id": instance_id,
            "public_ip": eip.public_ip,
        }))
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        let (eip_id, instance_id) = composite_keys(state, EIP_ASSOCIATION_KEYS)?;
        let Some(eip) = client.get_elastic_ip(eip_id).await? else {
            return Ok(None);
        };
        if eip.attached_instance() != Some(instance_id) {
            return Ok(None);
        }
        Ok(Some(json!({
            "id": join_composite(eip_id, instance_id),
            "eip_id": eip_id,
            "instance_id": instance_id,
            "public_ip": eip.public_ip,
        })))
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        let (eip_id, _) = composite_keys(state, EIP_ASSOCIATION_KEYS)?;
        match client.disassociate_elastic_ip(eip_id).await {
            Err(err) if err.status() == Some(404) => Ok(()),
            other => Ok(other?),
        }
    }
}

pub struct GatewayRouteBackend;

static GATEWAY_ROUTE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_gateway_route",
    "Gateway Route",
    &[
        "id",
        "name",
        "path_prefix",
        "target_url",
        "methods",
        "strip_prefix",
        "rate_limit",
        "priority",
    ],
);

#[async_trait]
impl EntityBackend for GatewayRouteBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &GATEWAY_ROUTE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateGatewayRouteRequest = desired.decode()?;
        observe(&client.create_gateway_route(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_gateway_route(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_gateway_route(state.require_id()?).await?)
    }
}
