//! Load balancers, target registrations, global load balancers and their
//! endpoints

use async_trait::async_trait;
use serde_json::{Value, json};
use thecloud_client::{self as api, Client};

use crate::descriptor::{EntityDescriptor, ImportKey, composite_keys, join_composite};
use crate::error::Result;
use crate::reconcile::{EntityBackend, observe, observe_opt};
use crate::state::ResourceState;

pub struct LoadBalancerBackend;

static LOAD_BALANCER: EntityDescriptor = EntityDescriptor::new(
    "thecloud_load_balancer",
    "Load Balancer",
    &["id", "name", "vpc_id", "port", "algorithm", "status"],
);

#[async_trait]
impl EntityBackend for LoadBalancerBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &LOAD_BALANCER
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateLoadBalancerRequest = desired.decode()?;
        observe(&client.create_load_balancer(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_load_balancer(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_load_balancer(state.require_id()?).await?)
    }
}

/// Registration of an instance behind a load balancer, keyed
/// `load_balancer_id:instance_id`
pub struct LbTargetBackend;

const LB_TARGET_KEYS: [&str; 2] = ["load_balancer_id", "instance_id"];

static LB_TARGET: EntityDescriptor = EntityDescriptor::new(
    "thecloud_lb_target",
    "Load Balancer Target",
    &["id", "load_balancer_id", "instance_id", "port", "weight"],
)
.import_by(ImportKey::Composite(LB_TARGET_KEYS));

fn target_observation(lb_id: &str, target: &api::LbTarget) -> Value {
    json!({
        "id": join_composite(lb_id, &target.instance_id),
        "load_balancer_id": lb_id,
        "instance_id": target.instance_id,
        "port": target.port,
        "weight": target.weight,
    })
}

#[async_trait]
impl EntityBackend for LbTargetBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &LB_TARGET
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::AddLbTargetRequest = desired.decode()?;
        client.add_lb_target(&req).await?;
        Ok(json!({
            "id": join_composite(&req.load_balancer_id, &req.instance_id),
            "load_balancer_id": req.load_balancer_id,
            "instance_id": req.instance_id,
        }))
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        let (lb_id, instance_id) = composite_keys(state, LB_TARGET_KEYS)?;
        Ok(client
            .find_lb_target(lb_id, instance_id)
            .await?
            .map(|target| target_observation(lb_id, &target)))
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        let (lb_id, instance_id) = composite_keys(state, LB_TARGET_KEYS)?;
        Ok(client.remove_lb_target(lb_id, instance_id).await?)
    }
}

pub struct GlobalLbBackend;

static GLOBAL_LB: EntityDescriptor = EntityDescriptor::new(
    "thecloud_global_lb",
    "Global Load Balancer",
    &["id", "name", "hostname", "policy", "status", "health_check"],
);

#[async_trait]
impl EntityBackend for GlobalLbBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &GLOBAL_LB
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateGlobalLbRequest = desired.decode()?;
        observe(&client.create_global_lb(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_global_lb(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_global_lb(state.require_id()?).await?)
    }
}

/// Endpoint membership of a global load balancer, keyed
/// `global_lb_id:endpoint_id`
pub struct GlobalEndpointBackend;

const GLOBAL_ENDPOINT_KEYS: [&str; 2] = ["global_lb_id", "endpoint_id"];

static GLOBAL_ENDPOINT: EntityDescriptor = EntityDescriptor::new(
    "thecloud_global_lb_endpoint",
    "Global Load Balancer Endpoint",
    &[
        "id",
        "global_lb_id",
        "endpoint_id",
        "region",
        "target_type",
        "target_id",
        "target_ip",
        "weight",
        "priority",
        "healthy",
    ],
)
.import_by(ImportKey::Composite(GLOBAL_ENDPOINT_KEYS));

fn endpoint_observation(glb_id: &str, endpoint: &api::GlobalEndpoint) -> Result<Value> {
    let mut value = observe(endpoint)?;
    if let Some(fields) = value.as_object_mut() {
        fields.insert("id".to_string(), json!(join_composite(glb_id, &endpoint.id)));
        fields.insert("global_lb_id".to_string(), json!(glb_id));
        fields.insert("endpoint_id".to_string(), json!(endpoint.id));
    }
    Ok(value)
}

#[async_trait]
impl EntityBackend for GlobalEndpointBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &GLOBAL_ENDPOINT
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::AddGlobalEndpointRequest = desired.decode()?;
        let endpoint = client.add_global_endpoint(&req).await?;
        endpoint_observation(&req.global_lb_id, &endpoint)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        let (glb_id, endpoint_id) = composite_keys(state, GLOBAL_ENDPOINT_KEYS)?;
        match client.find_global_endpoint(glb_id, endpoint_id).await? {
            Some(endpoint) => endpoint_observation(glb_id, &endpoint).map(Some),
            None => Ok(None),
        }
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        let (glb_id, endpoint_id) = composite_keys(state, GLOBAL_ENDPOINT_KEYS)?;
        Ok(client.remove_global_endpoint(glb_id, endpoint_id).await?)
    }
}
