use std::fmt::Debug;

use chrono::{TimeZone, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use thecloud_client::envelope::decode_data;
use thecloud_client::*;

/// Wrap `value` in an envelope and decode it back
fn assert_decodes<T>(value: T)
where
    T: Serialize + DeserializeOwned + PartialEq + Debug,
{
    let body = serde_json::to_vec(&json!({ "data": value })).unwrap();
    let decoded: T = decode_data(200, &body).unwrap();
    assert_eq!(decoded, value);
}

#[test]
fn test_every_entity_decodes_from_envelope() {
    let created = Utc.with_ymd_and_hms(2025, 1, 2, 3, 4, 5).unwrap();

    assert_decodes(Vpc {
        id: "vpc-1".into(),
        name: "main".into(),
        cidr_block: "10.0.0.0/16".into(),
        status: "ACTIVE".into(),
    });
    assert_decodes(Instance {
        id: "i-1".into(),
        ports: "80:80".into(),
        ip_address: "10.0.0.5".into(),
        ..Default::default()
    });
    assert_decodes(Volume {
        id: "vol-1".into(),
        size_gb: 20,
        ..Default::default()
    });
    assert_decodes(SecurityGroup {
        id: "sg-1".into(),
        rules: vec![SecurityRule {
            id: "r-1".into(),
            group_id: "sg-1".into(),
            port_min: 22,
            port_max: 22,
            ..Default::default()
        }],
        ..Default::default()
    });
    assert_decodes(LoadBalancer {
        id: "lb-1".into(),
        port: 443,
        targets: vec![LbTarget {
            instance_id: "i-1".into(),
            port: 8443,
            weight: 3,
        }],
        ..Default::default()
    });
    assert_decodes(Secret {
        id: "s-1".into(),
        value: Some("hunter2".into()),
        ..Default::default()
    });
    assert_decodes(ApiKey {
        id: "k-1".into(),
        key: Some("tc_abc".into()),
        created_at: "2025-01-02T03:04:05Z".into(),
        ..Default::default()
    });
    assert_decodes(ScalingGroup {
        id: "asg-1".into(),
        min_instances: 1,
        max_instances: 5,
        desired_count: 2,
        ..Default::default()
    });
    assert_decodes(Subnet {
        id: "sub-1".into(),
        availability_zone: "zone-a".into(),
        ..Default::default()
    });
    assert_decodes(Snapshot {
        id: "snap-1".into(),
        volume_id: "vol-1".into(),
        ..Default::default()
    });
    assert_decodes(Database {
        id: "db-1".into(),
        engine: "postgres".into(),
        port: 5432,
        connection_string: Some("postgres://u@h/db".into()),
        ..Default::default()
    });
    assert_decodes(ElasticIp {
        id: "eip-1".into(),
        public_ip: "203.0.113.7".into(),
        instance_id: Some("i-1".into()),
        ..Default::default()
    });
    assert_decodes(DnsZone {
        id: "z-1".into(),
        name: "example.internal".into(),
        ..Default::default()
    });
    assert_decodes(DnsRecord {
        id: "rec-1".into(),
        record_type: "MX".into(),
        ttl: 300,
        priority: Some(10),
        ..Default::default()
    });
    assert_decodes(Cluster {
        id: "k-1".into(),
        worker_count: 3,
        ha_enabled: true,
        ..Default::default()
    });
    assert_decodes(GlobalLb {
        id: "glb-1".into(),
        health_check: GlobalHealthCheck {
            protocol: "HTTP".into(),
            port: 80,
            path: "/healthz".into(),
            ..Default::default()
        },
        endpoints: vec![GlobalEndpoint {
            id: "ep-1".into(),
            healthy: true,
            ..Default::default()
        }],
        ..Default::default()
    });
    assert_decodes(Bucket {
        id: "b-1".into(),
        name: "assets".into(),
        versioning_enabled: true,
        ..Default::default()
    });
    assert_decodes(Queue {
        id: "q-1".into(),
        arn: "arn:thecloud:queue:q-1".into(),
        retention_days: 4,
        ..Default::default()
    });
    assert_decodes(Function {
        id: "fn-1".into(),
        created_at: Some(created),
        ..Default::default()
    });
    assert_decodes(Deployment {
        id: "dep-1".into(),
        replicas: 3,
        current_count: 2,
        ..Default::default()
    });
    assert_decodes(GatewayRoute {
        id: "gw-1".into(),
        methods: vec!["GET".into(), "POST".into()],
        strip_prefix: true,
        ..Default::default()
    });
    assert_decodes(Tenant {
        id: "t-1".into(),
        slug: "acme".into(),
        created_at: Some(created),
        ..Default::default()
    });
    assert_decodes(Image {
        id: "img-1".into(),
        is_public: true,
        ..Default::default()
    });
    assert_decodes(Cache {
        id: "c-1".into(),
        memory_mb: 512,
        ..Default::default()
    });
}

#[test]
fn test_missing_fields_default() {
    let body = br#"{"data":{"id":"vpc-1"}}"#;
    let vpc: Vpc = decode_data(200, body).unwrap();
    assert_eq!(vpc.id, "vpc-1");
    assert!(vpc.name.is_empty());
}
