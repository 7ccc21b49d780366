//! Regional and global load balancers with their memberships

use reqwest::Method;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::Result;
use crate::transport::Client;

/// Regional load balancer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoadBalancer {
    pub id: String,
    pub name: String,
    pub vpc_id: String,
    pub port: u16,
    pub algorithm: String,
    pub status: String,
    pub targets: Vec<LbTarget>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateLoadBalancerRequest {
    pub name: String,
    pub vpc_id: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub algorithm: Option<String>,
}

/// Instance registered behind a load balancer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LbTarget {
    pub instance_id: String,
    pub port: u16,
    pub weight: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddLbTargetRequest {
    /// Parent load balancer, sent in the path
    #[serde(skip_serializing)]
    pub load_balancer_id: String,
    pub instance_id: String,
    pub port: u16,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
}

/// Health check settings of a global load balancer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalHealthCheck {
    pub protocol: String,
    pub port: u16,
    pub path: String,
    pub interval_sec: u32,
    pub timeout_sec: u32,
    pub healthy_count: u32,
    pub unhealthy_count: u32,
}

/// DNS-based load balancer spanning regions
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalLb {
    pub id: String,
    pub name: String,
    pub hostname: String,
    pub policy: String,
    pub status: String,
    pub health_check: GlobalHealthCheck,
    pub endpoints: Vec<GlobalEndpoint>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CreateGlobalLbRequest {
    pub name: String,
    pub hostname: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub policy: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub health_check: Option<GlobalHealthCheck>,
}

/// Regional target of a global load balancer
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GlobalEndpoint {
    pub id: String,
    pub region: String,
    pub target_type: String,
    pub target_id: String,
    pub target_ip: String,
    pub weight: u32,
    pub priority: u32,
    pub healthy: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AddGlobalEndpointRequest {
    /// Parent global load balancer, sent in the path
    #[serde(skip_serializing)]
    pub global_lb_id: String,
    pub region: String,
    pub target_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_ip: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub weight: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,
}

impl Client {
    // Load balancer

    pub async fn create_load_balancer(
        &self,
        req: &CreateLoadBalancerRequest,
    ) -> Result<LoadBalancer> {
        self.send_json(Method::POST, "/lb", req).await
    }

    /// Fetch a load balancer together with its registered targets
    pub async fn get_load_balancer(&self, id: &str) -> Result<Option<LoadBalancer>> {
        let Some(mut lb) = self.get_json::<LoadBalancer>(&format!("/lb/{}", id)).await? else {
            return Ok(None);
        };
        lb.targets = self.list_lb_targets(id).await?;
        Ok(Some(lb))
    }

    pub async fn list_load_balancers(&self) -> Result<Vec<LoadBalancer>> {
        self.list_json("/lb").await
    }

    pub async fn delete_load_balancer(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/lb/{}", id)).await
    }

    // Load balancer target

    pub async fn add_lb_target(&self, req: &AddLbTargetRequest) -> Result<()> {
        debug!(
            "registering instance {} with load balancer {}",
            req.instance_id, req.load_balancer_id
        );
        self.send_unit(
            Method::POST,
            &format!("/lb/{}/targets", req.load_balancer_id),
            Some(req),
        )
        .await
    }

    pub async fn list_lb_targets(&self, lb_id: &str) -> Result<Vec<LbTarget>> {
        self.list_json(&format!("/lb/{}/targets", lb_id)).await
    }

    /// Find the registration of `instance_id` behind `lb_id`
    pub async fn find_lb_target(&self, lb_id: &str, instance_id: &str) -> Result<Option<LbTarget>> {
        Ok(self
            .list_lb_targets(lb_id)
            .await?
            .into_iter()
            .find(|target| target.instance_id == instance_id))
    }

    pub async fn remove_lb_target(&self, lb_id: &str, instance_id: &str) -> Result<()> {
        self.delete_path(&format!("/lb/{}/targets/{}", lb_id, instance_id))
            .await
    }

    // Global load balancer

    pub async fn create_global_lb(&self, req: &CreateGlobalLbRequest) -> Result<GlobalLb> {
        self.send_json(Method::POST, "/global-lb", req).await
    }

    pub async fn get_global_lb(&self, id: &str) -> Result<Option<GlobalLb>> {
        self.get_json(&format!("/global-lb/{}", id)).await
    }

    pub async fn list_global_lbs(&self) -> Result<Vec<GlobalLb>> {
        self.list_json("/global-lb").await
    }

    pub async fn delete_global_lb(&self, id: &str) -> Result<()> {
        self.delete_path(&format!("/global-lb/{}", id)).await
    }

    pub async fn add_global_endpoint(
        &self,
        req: &AddGlobalEndpointRequest,
    ) -> Result<GlobalEndpoint> {
        self.send_json(
            Method::POST,
            &format!("/global-lb/{}/endpoints", req.global_lb_id),
            req,
        )
        .await
    }

    /// Look an endpoint up through its global load balancer
    pub async fn find_global_endpoint(
        &self,
        glb_id: &str,
        endpoint_id: &str,
    ) -> Result<Option<GlobalEndpoint>> {
        let Some(glb) = self.get_global_lb(glb_id).await? else {
            return Ok(None);
        };
        Ok(glb.endpoints.into_iter().find(|ep| ep.id == endpoint_id))
    }

    pub async fn remove_global_endpoint(&self, glb_id: &str, endpoint_id: &str) -> Result<()> {
        self.delete_path(&format!("/global-lb/{}/endpoints/{}", glb_id, endpoint_id))
            .await
    }
}
