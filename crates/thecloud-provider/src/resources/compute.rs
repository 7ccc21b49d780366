//! Instances, volumes, snapshots, scaling groups, images, functions,
//! deployments and clusters

use std::path::Path;

use async_trait::async_trait;
use serde_json::Value;
use thecloud_client::{self as api, Client};
use tracing::{debug, info, warn};

use crate::descriptor::EntityDescriptor;
use crate::error::{ProviderError, Result};
use crate::reconcile::{EntityBackend, observe, observe_opt};
use crate::state::ResourceState;

/// Read a local file referenced by a resource attribute
async fn read_payload(path: &str) -> Result<Vec<u8>> {
    tokio::fs::read(path)
        .await
        .map_err(|source| ProviderError::Io {
            path: Path::new(path).to_path_buf(),
            source,
        })
}

pub struct InstanceBackend;

static INSTANCE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_instance",
    "Instance",
    &[
        "id",
        "name",
        "image",
        "ports",
        "vpc_id",
        "status",
        "ip_address",
    ],
);

#[async_trait]
impl EntityBackend for InstanceBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &INSTANCE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::LaunchInstanceRequest = desired.decode()?;
        observe(&client.launch_instance(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_instance(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.terminate_instance(state.require_id()?).await?)
    }
}

pub struct VolumeBackend;

static VOLUME: EntityDescriptor = EntityDescriptor::new(
    "thecloud_volume",
    "Volume",
    &["id", "name", "size_gb", "status"],
);

#[async_trait]
impl EntityBackend for VolumeBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &VOLUME
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateVolumeRequest = desired.decode()?;
        observe(&client.create_volume(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_volume(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_volume(state.require_id()?).await?)
    }
}

pub struct SnapshotBackend;

static SNAPSHOT: EntityDescriptor = EntityDescriptor::new(
    "thecloud_snapshot",
    "Snapshot",
    &["id", "volume_id", "description", "status"],
);

#[async_trait]
impl EntityBackend for SnapshotBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &SNAPSHOT
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateSnapshotRequest = desired.decode()?;
        observe(&client.create_snapshot(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_snapshot(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_snapshot(state.require_id()?).await?)
    }
}

/// Scaling groups drain their instances after the delete call returns;
/// delete waits until the group is gone.
pub struct ScalingGroupBackend;

static SCALING_GROUP: EntityDescriptor = EntityDescriptor::new(
    "thecloud_scaling_group",
    "Scaling Group",
    &[
        "id",
        "name",
        "vpc_id",
        "load_balancer_id",
        "image",
        "ports",
        "min_instances",
        "max_instances",
        "desired_count",
        "status",
    ],
);

#[async_trait]
impl EntityBackend for ScalingGroupBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &SCALING_GROUP
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateScalingGroupRequest = desired.decode()?;
        observe(&client.create_scaling_group(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_scaling_group(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        let id = state.require_id()?;
        client.delete_scaling_group(id).await?;
        debug!("waiting for scaling group {} to drain", id);
        client
            .wait_until_absent(move || client.get_scaling_group(id))
            .await?;
        Ok(())
    }
}

/// Images are registered first, then the disk file is uploaded. A failed
/// upload removes the registration again.
pub struct ImageBackend;

static IMAGE: EntityDescriptor = EntityDescriptor::new(
    "thecloud_image",
    "Image",
    &[
        "id",
        "name",
        "description",
        "os",
        "version",
        "is_public",
        "status",
    ],
);

#[async_trait]
impl EntityBackend for ImageBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &IMAGE
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::RegisterImageRequest = desired.decode()?;
        let data = read_payload(desired.require_str("file")?).await?;

        let image = client.register_image(&req).await?;
        if let Err(err) = client.upload_image(&image.id, &data).await {
            // not in state yet, so remove it here
            if let Err(cleanup) = client.delete_image(&image.id).await {
                warn!("failed to remove image {} after upload error: {}", image.id, cleanup);
            }
            return Err(err.into());
        }
        info!("uploaded image {} ({} bytes)", image.id, data.len());
        observe(&image)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_image(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_image(state.require_id()?).await?)
    }
}

/// Functions upload the archive named by `filename` on create
pub struct FunctionBackend;

static FUNCTION: EntityDescriptor = EntityDescriptor::new(
    "thecloud_function",
    "Function",
    &["id", "name", "runtime", "handler", "status", "created_at"],
);

#[async_trait]
impl EntityBackend for FunctionBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &FUNCTION
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req = api::CreateFunctionRequest {
            name: desired.require_str("name")?.to_string(),
            runtime: desired.require_str("runtime")?.to_string(),
            handler: desired.require_str("handler")?.to_string(),
            code: read_payload(desired.require_str("filename")?).await?,
        };
        observe(&client.create_function(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_function(state.require_id()?).await?)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_function(state.require_id()?).await?)
    }
}

/// Deployments scale in place
pub struct DeploymentBackend;

static DEPLOYMENT: EntityDescriptor = EntityDescriptor::new(
    "thecloud_deployment",
    "Deployment",
    &[
        "id",
        "name",
        "image",
        "replicas",
        "current_count",
        "ports",
        "status",
    ],
)
.updatable();

#[async_trait]
impl EntityBackend for DeploymentBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &DEPLOYMENT
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateDeploymentRequest = desired.decode()?;
        observe(&client.create_deployment(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_deployment(state.require_id()?).await?)
    }

    async fn update(
        &self,
        client: &Client,
        desired: &ResourceState,
        prior: &ResourceState,
    ) -> Result<Option<Value>> {
        let replicas: Option<u32> = desired.get_attribute("replicas");
        match replicas {
            Some(replicas) if Some(replicas) != prior.get_attribute::<u32>("replicas") => {
                client
                    .scale_deployment(prior.require_id()?, replicas)
                    .await?;
            }
            _ => {}
        }
        Ok(None)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_deployment(state.require_id()?).await?)
    }
}

/// Clusters support worker scaling and version upgrades in place
pub struct ClusterBackend;

static CLUSTER: EntityDescriptor = EntityDescriptor::new(
    "thecloud_kubernetes_cluster",
    "Cluster",
    &[
        "id",
        "name",
        "vpc_id",
        "version",
        "worker_count",
        "status",
        "pod_cidr",
        "service_cidr",
        "network_isolation",
        "ha_enabled",
        "api_server_lb_address",
    ],
)
.updatable();

#[async_trait]
impl EntityBackend for ClusterBackend {
    fn descriptor(&self) -> &'static EntityDescriptor {
        &CLUSTER
    }

    async fn create(&self, client: &Client, desired: &ResourceState) -> Result<Value> {
        let req: api::CreateClusterRequest = desired.decode()?;
        observe(&client.create_cluster(&req).await?)
    }

    async fn read(&self, client: &Client, state: &ResourceState) -> Result<Option<Value>> {
        observe_opt(client.get_cluster(state.require_id()?).await?)
    }

    async fn update(
        &self,
        client: &Client,
        desired: &ResourceState,
        prior: &ResourceState,
    ) -> Result<Option<Value>> {
        let id = prior.require_id()?;

        let workers: Option<u32> = desired.get_attribute("worker_count");
        match workers {
            Some(workers) if Some(workers) != prior.get_attribute::<u32>("worker_count") => {
                client.scale_cluster(id, workers).await?;
            }
            _ => {}
        }

        match desired.str_attr("version") {
            Some(version) if Some(version) != prior.str_attr("version") => {
                client.upgrade_cluster(id, version).await?;
            }
            _ => {}
        }

        Ok(None)
    }

    async fn delete(&self, client: &Client, state: &ResourceState) -> Result<()> {
        Ok(client.delete_cluster(state.require_id()?).await?)
    }
}
