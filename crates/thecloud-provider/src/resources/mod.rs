//! Entity backends for every managed resource type

pub mod balancing;
pub mod compute;
pub mod data;
pub mod dns;
pub mod identity;
pub mod network;

use std::sync::Arc;

use thecloud_client::Client;

use crate::reconcile::{Reconciler, Resource};

pub use balancing::{GlobalEndpointBackend, GlobalLbBackend, LbTargetBackend, LoadBalancerBackend};
pub use compute::{
    ClusterBackend, DeploymentBackend, FunctionBackend, ImageBackend, InstanceBackend,
    ScalingGroupBackend, SnapshotBackend, VolumeBackend,
};
pub use data::{BucketBackend, CacheBackend, DatabaseBackend, QueueBackend, SecretBackend};
pub use dns::{DnsRecordBackend, DnsZoneBackend};
pub use identity::{ApiKeyBackend, TenantBackend};
pub use network::{
    ElasticIpAssociationBackend, ElasticIpBackend, GatewayRouteBackend, SecurityGroupBackend,
    SecurityRuleBackend, SubnetBackend, VpcBackend,
};

/// One reconciler per resource type, all sharing `client`
pub fn all(client: &Client) -> Vec<Arc<dyn Reconciler>> {
    fn wrap<B: crate::reconcile::EntityBackend + 'static>(
        client: &Client,
        backend: B,
    ) -> Arc<dyn Reconciler> {
        Arc::new(Resource::new(client.clone(), backend))
    }

    vec![
        wrap(client, VpcBackend),
        wrap(client, SubnetBackend),
        wrap(client, SecurityGroupBackend),
        wrap(client, SecurityRuleBackend),
        wrap(client, ElasticIpBackend),
        wrap(client, ElasticIpAssociationBackend),
        wrap(client, GatewayRouteBackend),
        wrap(client, InstanceBackend),
        wrap(client, VolumeBackend),
        wrap(client, SnapshotBackend),
        wrap(client, ScalingGroupBackend),
        wrap(client, ImageBackend),
        wrap(client, FunctionBackend),
        wrap(client, DeploymentBackend),
        wrap(client, ClusterBackend),
        wrap(client, LoadBalancerBackend),
        wrap(client, LbTargetBackend),
        wrap(client, GlobalLbBackend),
        wrap(client, GlobalEndpointBackend),
        wrap(client, DatabaseBackend),
        wrap(client, CacheBackend),
        wrap(client, BucketBackend),
        wrap(client, QueueBackend),
        wrap(client, SecretBackend),
        wrap(client, DnsZoneBackend),
        wrap(client, DnsRecordBackend),
        wrap(client, ApiKeyBackend),
        wrap(client, TenantBackend),
    ]
}
