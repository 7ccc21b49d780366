//! Instances, volumes, snapshots, scaling groups, images, functions,
//! deployments and Kubernetes clusters

use chrono::{DateTime, Utc};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::as_base64;
use crate::error::Result;
use crate::transport::Client;

/// Compute instance
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Instance {
    pub id: String,
    pub name: String,
    pub image: String,
    pub ports: String,
    pub vpc_id: String,
    pub status: String,
    pub ip_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LaunchInstanceRequest {
    pub name: String,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vpc_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subnet_id: Option<String>,
}

/// Block storage volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Volume {
    pub id: String,
    pub name: String,
    pub size_gb: u32,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateVolumeRequest {
    pub name: String,
    pub size_gb: u32,
}

/// Point-in-time copy of a volume
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub id: String,
    pub volume_id: String,
    pub description: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateSnapshotRequest {
    pub volume_id: String,
    #[serde(default)]
    pub description: String,
}

/// Auto-scaling group of identical instances
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScalingGroup {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub load_balancer_id: String,
    pub image: String,
    pub ports: String,
    pub min_instances: u32,
    pub max_instances: u32,
    pub desired_count: u32,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateScalingGroupRequest {
    pub name: String,
    pub vpc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub load_balancer_id: Option<String>,
    pub image: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
    /// Sent as 0 when unset
    #[serde(default)]
    pub min_instances: u32,
    pub max_instances: u32,
    pub desired_count: u32,
}

/// Machine image
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Image {
    pub id: String,
    pub name: String,
    pub description: String,
    pub os: String,
    pub version: String,
    pub is_public: bool,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RegisterImageRequest {
    pub name: String,
    #[serde(default)]
    pub description: String,
    pub os: String,
    pub version: String,
    #[serde(default)]
    pub is_public: bool,
}

#[derive(Debug, Serialize)]
struct UploadRequest<'a> {
    #[serde(serialize_with = "as_base64")]
    data: &'a [u8],
}

/// Serverless function
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Function {
    pub id: String,
    pub name: String,
    pub runtime: String,
    pub handler: String,
    pub status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
}

/// Function creation with its code archive
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CreateFunctionRequest {
    pub name: String,
    pub runtime: String,
    pub handler: String,
    #[serde(serialize_with = "as_base64")]
    pub code: Vec<u8>,
}

/// Container deployment
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Deployment {
    pub id: String,
    pub name: String,
    pub image: String,
    pub replicas: u32,
    pub current_count: u32,
    pub ports: String,
    pub status: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateDeploymentRequest {
    pub name: String,
    pub image: String,
    pub replicas: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ports: Option<String>,
}

#[derive(Debug, Serialize)]
struct ScaleDeploymentRequest {
    replicas: u32,
}

/// Managed Kubernetes cluster
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Cluster {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub version: String,
    pub worker_count: u32,
    pub status: String,
    pub pod_cidr: String,
    pub service_cidr: String,
    pub network_isolation: bool,
    pub ha_enabled: bool,
    pub api_server_lb_address: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateClusterRequest {
    pub name: String,
    pub vpc_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(
        default,
        rename(serialize = "workers", deserialize = "worker_count"),
        skip_serializing_if = "Option::is_none"
    )]
    pub workers: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_isolation: Option<bool>,
    #[serde(
        default,
        rename(serialize = "ha", deserialize = "ha_enabled"),
        skip_serializing_if = "Option::is_none"
    )]
    pub ha: Option<bool>,
}

#[derive(Debug, Serialize)]
struct ScaleClusterRequest {
    workers: u32,
}

#[derive(Debug, Serialize)]
struct UpgradeClusterRequest<'a> {
    version: &'a str,
}

impl Client {
    // Instance

    pub async fn launch_instance(&self, req: &LaunchInstanceRequest) -> Result<Instance> {
        self.send_json(Method::POST, "/instances", req).await
    }

    pub async fn get_instance(&self, id: &str) -> Result<Option<Instance>> {
        self.get_json(&format!("/instances/{}", id)).await
    }

    pub async fn list_instances(&self) -> Result<Vec<Instance>> {
        self.list_json("/instances").await
    }

    pub async fn terminate_instance(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/instances/{}", id)).await
    }

    // Volume

    pub async fn create_volume(&self, req: &CreateVolumeRequest) -> Result<Volume> {
        self.send_json(Method::POST, "/volumes", req).await
    }

    pub async fn get_volume(&self, id: &str) -> Result<Option<Volume>> {
        self.get_json(&format!("/volumes/{}", id)).await
    }

    pub async fn list_volumes(&self) -> Result<Vec<Volume>> {
        self.list_json("/volumes").await
    }

    pub async fn delete_volume(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/volumes/{}", id)).await
    }

    // Snapshot

    pub async fn create_snapshot(&self, req: &CreateSnapshotRequest) -> Result<Snapshot> {
        self.send_json(Method::POST, "/snapshots", req).await
    }

    pub async fn get_snapshot(&self, id: &str) -> Result<Option<Snapshot>> {
        self.get_json(&format!("/snapshots/{}", id)).await
    }

    pub async fn list_snapshots(&self) -> Result<Vec<Snapshot>> {
        self.list_json("/snapshots").await
    }

    pub async fn delete_snapshot(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/snapshots/{}", id)).await
    }

    // Scaling group

    pub async fn create_scaling_group(
        &self,
        req: &CreateScalingGroupRequest,
    ) -> Result<ScalingGroup> {
        self.send_json(Method::POST, "/autoscaling/groups", req).await
    }

    pub async fn get_scaling_group(&self, id: &str) -> Result<Option<ScalingGroup>> {
        self.get_json(&format!("/autoscaling/groups/{}", id)).await
    }

    pub async fn list_scaling_groups(&self) -> Result<Vec<ScalingGroup>> {
        self.list_json("/autoscaling/groups").await
    }

    /// Request deletion; the group drains asynchronously
    pub async fn delete_scaling_group(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/autoscaling/groups/{}", id))
            .await
    }

    // Image

    pub async fn register_image(&self, req: &RegisterImageRequest) -> Result<Image> {
        self.send_json(Method::POST, "/images", req).await
    }

    pub async fn upload_image(&self, id: &str, data: &[u8]) -> Result<()> {
        debug!("uploading {} bytes to image {}", data.len(), id);
        self.send_unit(
            Method::POST,
            &format!("/images/{}/upload", id),
            Some(&UploadRequest { data }),
        )
        .await
    }

    pub async fn get_image(&self, id: &str) -> Result<Option<Image>> {
        self.get_json(&format!("/images/{}", id)).await
    }

    pub async fn list_images(&self) -> Result<Vec<Image>> {
        self.list_json("/images").await
    }

    pub async fn delete_image(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/images/{}", id)).await
    }

    // Function

    pub async fn create_function(&self, req: &CreateFunctionRequest) -> Result<Function> {
        debug!("creating function {} with {} bytes of code", req.name, req.code.len());
        self.send_json(Method::POST, "/functions", req).await
    }

    pub async fn get_function(&self, id: &str) -> Result<Option<Function>> {
        self.get_json(&format!("/functions/{}", id)).await
    }

    pub async fn list_functions(&self) -> Result<Vec<Function>> {
        self.list_json("/functions").await
    }

    pub async fn delete_function(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/functions/{}", id)).await
    }

    // Deployment

    pub async fn create_deployment(&self, req: &CreateDeploymentRequest) -> Result<Deployment> {
        self.send_json(Method::POST, "/deployments", req).await
    }

    pub async fn get_deployment(&self, id: &str) -> Result<Option<Deployment>> {
        self.get_json(&format!("/deployments/{}", id)).await
    }

    pub async fn list_deployments(&self) -> Result<Vec<Deployment>> {
        self.list_json("/deployments").await
    }

    pub async fn scale_deployment(&self, id: &str, replicas: u32) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("/deployments/{}/scale", id),
            Some(&ScaleDeploymentRequest { replicas }),
        )
        .await
    }

    pub async fn delete_deployment(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/deployments/{}", id)).await
    }

    // Cluster

    pub async fn create_cluster(&self, req: &CreateClusterRequest) -> Result<Cluster> {
        self.send_json(Method::POST, "/clusters", req).await
    }

    pub async fn get_cluster(&self, id: &str) -> Result<Option<Cluster>> {
        self.get_json(&format!("/clusters/{}", id)).await
    }

    pub async fn list_clusters(&self) -> Result<Vec<Cluster>> {
        self.list_json("/clusters").await
    }

    pub async fn scale_cluster(&self, id: &str, workers: u32) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("/clusters/{}/scale", id),
            Some(&ScaleClusterRequest { workers }),
        )
        .await
    }

    pub async fn upgrade_cluster(&self, id: &str, version: &str) -> Result<()> {
        self.send_unit(
            Method::POST,
            &format!("/clusters/{}/upgrade", id),
            Some(&UpgradeClusterRequest { version }),
        )
        .await
    }

    pub async fn delete_cluster(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/clusters/{}", id)).await
    }
}
