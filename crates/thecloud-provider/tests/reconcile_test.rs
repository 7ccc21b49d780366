use std::io::Write;
use std::time::Duration;

use serde_json::{Value, json};
use thecloud_client::{Client, ClientConfig, PollConfig, RetryConfig};
use thecloud_provider::{Observed, ResourceState, Severity, TheCloudProvider};
use wiremock::matchers::{body_json, body_partial_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const KEY: &str = "test-key";

fn client_with_poll(server: &MockServer, poll: PollConfig) -> Client {
    let retry = RetryConfig {
        max_retries: 1,
        min_wait: Duration::from_millis(5),
        max_wait: Duration::from_millis(10),
        multiplier: 2.0,
    };
    let config = ClientConfig::new(server.uri(), KEY)
        .with_retry(retry)
        .with_poll(poll);
    Client::new(config).unwrap()
}

fn provider(server: &MockServer) -> TheCloudProvider {
    let poll = PollConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_secs(5),
    };
    TheCloudProvider::with_client(client_with_poll(server, poll))
}

fn state(resource_type: &str, attributes: Value) -> ResourceState {
    ResourceState::from_value(resource_type, attributes).unwrap()
}

fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({ "data": data }))
}

fn not_found() -> ResponseTemplate {
    ResponseTemplate::new(404).set_body_json(json!({"error": "not found"}))
}

#[tokio::test]
async fn test_create_vpc_fills_computed_attributes() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vpcs"))
        .and(header("X-API-Key", KEY))
        .and(body_json(json!({"name": "x", "cidr_block": "10.0.0.0/16"})))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "data": {"id": "v1", "name": "x", "cidr_block": "10.0.0.0/16", "status": "ACTIVE"}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let vpc = provider(&server).resource("thecloud_vpc").unwrap();
    let outcome = vpc
        .create(state(
            "thecloud_vpc",
            json!({"name": "x", "cidr_block": "10.0.0.0/16", "id": null, "status": null}),
        ))
        .await;

    assert!(outcome.diagnostics.is_empty());
    let created = outcome.value.unwrap();
    assert_eq!(created.id(), Some("v1"));
    assert_eq!(created.str_attr("status"), Some("ACTIVE"));
    assert_eq!(created.str_attr("name"), Some("x"));
}

#[tokio::test]
async fn test_create_failure_is_client_error_diagnostic() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/vpcs"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"type": "INVALID_INPUT", "message": "bad cidr"}
        })))
        .mount(&server)
        .await;

    let vpc = provider(&server).resource("thecloud_vpc").unwrap();
    let outcome = vpc
        .create(state("thecloud_vpc", json!({"name": "x", "cidr_block": "nope"})))
        .await;

    assert!(outcome.value.is_none());
    let diag = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(diag.summary, "Client Error");
    assert_eq!(diag.detail, "Unable to create VPC, got error: [400] bad cidr");
}

#[tokio::test]
async fn test_read_missing_resource_is_removed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vpcs/gone"))
        .respond_with(not_found())
        .mount(&server)
        .await;

    let vpc = provider(&server).resource("thecloud_vpc").unwrap();
    let outcome = vpc
        .read(state("thecloud_vpc", json!({"id": "gone", "name": "x"})))
        .await;

    assert!(outcome.diagnostics.is_empty());
    assert_eq!(outcome.value, Some(Observed::Removed));
}

#[tokio::test]
async fn test_read_keeps_secret_value() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/secrets/s1"))
        .respond_with(ok(json!({"id": "s1", "name": "db", "description": "rotated"})))
        .mount(&server)
        .await;

    let secret = provider(&server).resource("thecloud_secret").unwrap();
    let outcome = secret
        .read(state(
            "thecloud_secret",
            json!({"id": "s1", "name": "db", "value": "hunter2", "description": "old"}),
        ))
        .await;

    let Some(Observed::Present(read)) = outcome.value else {
        panic!("secret should still exist");
    };
    assert_eq!(read.str_attr("value"), Some("hunter2"));
    assert_eq!(read.str_attr("description"), Some("rotated"));
}

#[tokio::test]
async fn test_api_key_is_kept_after_create() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/keys"))
        .respond_with(ok(json!({
            "id": "k1", "name": "ci", "key": "tc_secret", "created_at": "2024-01-01"
        })))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/auth/keys"))
        .respond_with(ok(json!([
            {"id": "k0", "name": "other", "created_at": "2023-01-01"},
            {"id": "k1", "name": "ci", "created_at": "2024-01-01"}
        ])))
        .mount(&server)
        .await;

    let api_key = provider(&server).resource("thecloud_api_key").unwrap();
    let created = api_key
        .create(state("thecloud_api_key", json!({"name": "ci"})))
        .await
        .value
        .unwrap();
    assert_eq!(created.str_attr("key"), Some("tc_secret"));

    let Some(Observed::Present(read)) = api_key.read(created).await.value else {
        panic!("key should still exist");
    };
    assert_eq!(read.str_attr("key"), Some("tc_secret"));
    assert_eq!(read.id(), Some("k1"));
}

#[tokio::test]
async fn test_update_unsupported_keeps_prior_with_warning() {
    let server = MockServer::start().await;

    let vpc = provider(&server).resource("thecloud_vpc").unwrap();
    let prior = state("thecloud_vpc", json!({"id": "v1", "name": "old"}));
    let outcome = vpc
        .update(state("thecloud_vpc", json!({"id": "v1", "name": "new"})), prior.clone())
        .await;

    assert!(!outcome.diagnostics.has_error());
    let warning = outcome.diagnostics.warnings().next().unwrap();
    assert_eq!(warning.severity, Severity::Warning);
    assert_eq!(warning.summary, "Update Not Supported");
    assert_eq!(outcome.value, Some(prior));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_cluster_update_scales_and_upgrades() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/clusters/c1/scale"))
        .and(body_json(json!({"workers": 5})))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/clusters/c1/upgrade"))
        .and(body_json(json!({"version": "1.30"})))
        .respond_with(ResponseTemplate::new(202))
        .expect(1)
        .mount(&server)
        .await;

    let cluster = provider(&server)
        .resource("thecloud_kubernetes_cluster")
        .unwrap();
    let prior = state(
        "thecloud_kubernetes_cluster",
        json!({"id": "c1", "name": "k", "vpc_id": "v1", "version": "1.29",
               "worker_count": 3, "status": "RUNNING"}),
    );
    let desired = state(
        "thecloud_kubernetes_cluster",
        json!({"id": null, "name": "k", "vpc_id": "v1", "version": "1.30",
               "worker_count": 5, "status": null}),
    );

    let outcome = cluster.update(desired, prior).await;
    assert!(outcome.diagnostics.is_empty());
    let updated = outcome.value.unwrap();
    assert_eq!(updated.id(), Some("c1"));
    assert_eq!(updated.str_attr("status"), Some("RUNNING"));
    assert_eq!(updated.get_attribute::<u32>("worker_count"), Some(5));
}

#[tokio::test]
async fn test_bucket_create_enables_versioning() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/storage/buckets"))
        .and(body_json(json!({"name": "assets", "is_public": false})))
        .respond_with(ok(json!({
            "id": "b1", "name": "assets", "is_public": false,
            "versioning_enabled": false, "created_at": "2024-01-01T00:00:00Z"
        })))
        .mount(&server)
        .await;
    Mock::given(method("PATCH"))
        .and(path("/storage/buckets/assets/versioning"))
        .and(body_json(json!({"enabled": true})))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let bucket = provider(&server).resource("thecloud_bucket").unwrap();
    let created = bucket
        .create(state(
            "thecloud_bucket",
            json!({"name": "assets", "versioning_enabled": true}),
        ))
        .await
        .value
        .unwrap();

    assert_eq!(created.id(), Some("b1"));
    assert_eq!(created.get_attribute::<bool>("versioning_enabled"), Some(true));
}

#[tokio::test]
async fn test_lb_target_create_and_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/lb/lb1/targets"))
        .and(body_json(json!({"instance_id": "i1", "port": 80, "weight": 1})))
        .respond_with(ResponseTemplate::new(201))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/lb/lb1/targets"))
        .respond_with(ok(json!([
            {"instance_id": "i0", "port": 80, "weight": 1},
            {"instance_id": "i1", "port": 8080, "weight": 3}
        ])))
        .mount(&server)
        .await;

    let target = provider(&server).resource("thecloud_lb_target").unwrap();
    let created = target
        .create(state(
            "thecloud_lb_target",
            json!({"load_balancer_id": "lb1", "instance_id": "i1", "port": 80, "weight": 1}),
        ))
        .await
        .value
        .unwrap();
    assert_eq!(created.id(), Some("lb1:i1"));

    let Some(Observed::Present(read)) = target.read(created).await.value else {
        panic!("target should be registered");
    };
    assert_eq!(read.get_attribute::<u16>("port"), Some(8080));
    assert_eq!(read.get_attribute::<u32>("weight"), Some(3));
    assert_eq!(read.str_attr("instance_id"), Some("i1"));
}

#[tokio::test]
async fn test_lb_target_read_after_import() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/lb/lb1/targets"))
        .respond_with(ok(json!([])))
        .mount(&server)
        .await;

    let target = provider(&server).resource("thecloud_lb_target").unwrap();
    let imported = target.import("lb1:i1").value.unwrap();
    assert_eq!(imported.str_attr("load_balancer_id"), Some("lb1"));
    assert_eq!(imported.str_attr("instance_id"), Some("i1"));

    let outcome = target.read(imported).await;
    assert_eq!(outcome.value, Some(Observed::Removed));
}

#[tokio::test]
async fn test_malformed_composite_import() {
    let server = MockServer::start().await;
    let association = provider(&server)
        .resource("thecloud_elastic_ip_association")
        .unwrap();

    for id in ["eip-only", ":i1", "e1:", "a:b:c"] {
        let outcome = association.import(id);
        assert!(outcome.value.is_none(), "{id} should be rejected");
        let diag = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(diag.summary, "Unexpected Import Identifier");
    }
}

#[tokio::test]
async fn test_eip_association_attached_elsewhere_is_removed() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/elastic-ips/e1"))
        .respond_with(ok(json!({
            "id": "e1", "public_ip": "203.0.113.7", "instance_id": "i2", "status": "associated"
        })))
        .mount(&server)
        .await;

    let association = provider(&server)
        .resource("thecloud_elastic_ip_association")
        .unwrap();
    let outcome = association
        .read(state(
            "thecloud_elastic_ip_association",
            json!({"id": "e1:i1", "eip_id": "e1", "instance_id": "i1"}),
        ))
        .await;
    assert_eq!(outcome.value, Some(Observed::Removed));
}

#[tokio::test]
async fn test_tenant_delete_warns() {
    let server = MockServer::start().await;
    let tenant = provider(&server).resource("thecloud_tenant").unwrap();

    let diagnostics = tenant
        .delete(state("thecloud_tenant", json!({"id": "t1", "slug": "acme"})))
        .await;

    assert!(!diagnostics.has_error());
    assert_eq!(
        diagnostics.warnings().next().unwrap().summary,
        "Delete Not Supported"
    );
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_delete_treats_missing_as_success() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/volumes/vol1"))
        .respond_with(not_found())
        .expect(1)
        .mount(&server)
        .await;

    let volume = provider(&server).resource("thecloud_volume").unwrap();
    let diagnostics = volume
        .delete(state("thecloud_volume", json!({"id": "vol1"})))
        .await;
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_scaling_group_delete_waits_until_gone() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/autoscaling/groups/g1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/autoscaling/groups/g1"))
        .respond_with(ok(json!({"id": "g1", "name": "web", "status": "DELETING"})))
        .up_to_n_times(2)
        .expect(2)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/autoscaling/groups/g1"))
        .respond_with(not_found())
        .expect(1)
        .mount(&server)
        .await;

    let group = provider(&server)
        .resource("thecloud_scaling_group")
        .unwrap();
    let diagnostics = group
        .delete(state("thecloud_scaling_group", json!({"id": "g1"})))
        .await;
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_scaling_group_delete_timeout() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/autoscaling/groups/g1"))
        .respond_with(ResponseTemplate::new(204))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/autoscaling/groups/g1"))
        .respond_with(ok(json!({"id": "g1", "status": "DELETING"})))
        .mount(&server)
        .await;

    let poll = PollConfig {
        interval: Duration::from_millis(20),
        timeout: Duration::from_millis(100),
    };
    let provider = TheCloudProvider::with_client(client_with_poll(&server, poll));
    let group = provider.resource("thecloud_scaling_group").unwrap();

    let diagnostics = group
        .delete(state("thecloud_scaling_group", json!({"id": "g1"})))
        .await;
    let diag = diagnostics.errors().next().unwrap();
    assert_eq!(diag.summary, "Delete Timeout");
    assert_eq!(
        diag.detail,
        "Timed out waiting for Scaling Group to be deleted."
    );
}

#[tokio::test]
async fn test_function_create_uploads_archive() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions"))
        .and(body_partial_json(json!({
            "name": "hello", "runtime": "nodejs20", "handler": "index.handler",
            "code": "emlwZGF0YQ=="
        })))
        .respond_with(ok(json!({
            "id": "f1", "name": "hello", "runtime": "nodejs20",
            "handler": "index.handler", "status": "ACTIVE",
            "created_at": "2024-01-01T00:00:00Z"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut archive = tempfile::NamedTempFile::new().unwrap();
    archive.write_all(b"zipdata").unwrap();
    let filename = archive.path().to_str().unwrap().to_string();

    let function = provider(&server).resource("thecloud_function").unwrap();
    let created = function
        .create(state(
            "thecloud_function",
            json!({"name": "hello", "runtime": "nodejs20", "handler": "index.handler",
                   "filename": filename}),
        ))
        .await
        .value
        .unwrap();

    assert_eq!(created.id(), Some("f1"));
    assert_eq!(created.str_attr("filename"), Some(filename.as_str()));
}

#[tokio::test]
async fn test_function_create_missing_archive() {
    let server = MockServer::start().await;
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("missing.zip");

    let function = provider(&server).resource("thecloud_function").unwrap();
    let outcome = function
        .create(state(
            "thecloud_function",
            json!({"name": "hello", "runtime": "nodejs20", "handler": "index.handler",
                   "filename": missing.to_str().unwrap()}),
        ))
        .await;

    let diag = outcome.diagnostics.errors().next().unwrap();
    assert!(diag.detail.starts_with("Unable to create Function, got error: failed to read"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_data_source_lookup_by_name() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/vpcs"))
        .respond_with(ok(json!([
            {"id": "v1", "name": "a", "cidr_block": "10.0.0.0/16", "status": "ACTIVE"},
            {"id": "v2", "name": "b", "cidr_block": "10.1.0.0/16", "status": "ACTIVE"}
        ])))
        .mount(&server)
        .await;

    let provider = provider(&server);
    let data_sources = provider.data_sources();

    let found = data_sources
        .read("thecloud_vpc", state("thecloud_vpc", json!({"name": "b"})))
        .await
        .value
        .unwrap();
    assert_eq!(found.id(), Some("v2"));
    assert_eq!(found.str_attr("cidr_block"), Some("10.1.0.0/16"));

    let missing = data_sources
        .read("thecloud_vpc", state("thecloud_vpc", json!({"name": "c"})))
        .await;
    assert_eq!(
        missing.diagnostics.errors().next().unwrap().summary,
        "VPC Not Found"
    );

    let listed = data_sources
        .read("thecloud_vpcs", ResourceState::new("thecloud_vpcs"))
        .await
        .value
        .unwrap();
    assert_eq!(listed.attributes["vpcs"].as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn test_data_source_requires_id_or_name() {
    let server = MockServer::start().await;
    let outcome = provider(&server)
        .data_sources()
        .read("thecloud_instance", ResourceState::new("thecloud_instance"))
        .await;

    let diag = outcome.diagnostics.errors().next().unwrap();
    assert_eq!(diag.detail, "either 'id' or 'name' must be specified");
}

#[tokio::test]
async fn test_cancelled_client_reports_error() {
    let server = MockServer::start().await;
    let cancel = tokio_util::sync::CancellationToken::new();
    let client = Client::with_cancellation(ClientConfig::new(server.uri(), KEY), cancel.clone())
        .unwrap();
    cancel.cancel();

    let provider = TheCloudProvider::with_client(client);
    let group = provider.resource("thecloud_scaling_group").unwrap();
    let diagnostics = group
        .delete(state("thecloud_scaling_group", json!({"id": "g1"})))
        .await;

    let diag = diagnostics.errors().next().unwrap();
    assert_eq!(diag.summary, "Client Error");
    assert!(diag.detail.starts_with("Unable to delete Scaling Group"));
}

#[tokio::test]
async fn test_create_errors_carry_server_message() {
    let server = MockServer::start().await;
    let cases = [
        ("thecloud_vpc", "/vpcs", "VPC", json!({"name": "x", "cidr_block": "10.0.0.0/99"})),
        (
            "thecloud_subnet",
            "/vpcs/v1/subnets",
            "Subnet",
            json!({"vpc_id": "v1", "name": "s", "cidr_block": "10.0.0.0/99"}),
        ),
        (
            "thecloud_security_group",
            "/security-groups",
            "Security Group",
            json!({"vpc_id": "v1", "name": "web"}),
        ),
        (
            "thecloud_database",
            "/databases",
            "Database",
            json!({"name": "db", "engine": "postgres", "version": "16"}),
        ),
        ("thecloud_queue", "/queues", "Queue", json!({"name": "jobs"})),
        ("thecloud_dns_zone", "/dns/zones", "DNS Zone", json!({"name": "example.com"})),
    ];
    for (_, route, _, _) in &cases {
        Mock::given(method("POST"))
            .and(path(*route))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "error": {"message": "invalid cidr"}
            })))
            .expect(1)
            .mount(&server)
            .await;
    }

    let provider = provider(&server);
    for (resource_type, _, display_name, attributes) in cases {
        let outcome = provider
            .resource(resource_type)
            .unwrap()
            .create(state(resource_type, attributes))
            .await;

        assert!(outcome.value.is_none(), "{resource_type} should fail");
        let diag = outcome.diagnostics.errors().next().unwrap();
        assert_eq!(diag.summary, "Client Error");
        assert_eq!(
            diag.detail,
            format!("Unable to create {display_name}, got error: [400] invalid cidr")
        );
    }
}

#[tokio::test]
async fn test_security_rule_create_and_read() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/security-groups/sg1/rules"))
        .and(body_json(json!({
            "group_id": "sg1", "direction": "ingress", "protocol": "tcp",
            "port_min": 22, "port_max": 22, "cidr": "0.0.0.0/0"
        })))
        .respond_with(ok(json!({
            "id": "r1", "group_id": "sg1", "direction": "ingress", "protocol": "tcp",
            "port_min": 22, "port_max": 22, "cidr": "0.0.0.0/0", "priority": 100
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/security-groups/sg1"))
        .respond_with(ok(json!({
            "id": "sg1", "vpc_id": "v1", "name": "web",
            "rules": [
                {"id": "r0", "group_id": "sg1", "direction": "egress", "protocol": "all"},
                {"id": "r1", "group_id": "sg1", "direction": "ingress", "protocol": "tcp",
                 "port_min": 22, "port_max": 22, "cidr": "10.0.0.0/8", "priority": 100}
            ]
        })))
        .mount(&server)
        .await;

    let rule = provider(&server).resource("thecloud_security_rule").unwrap();
    let created = rule
        .create(state(
            "thecloud_security_rule",
            json!({"security_group_id": "sg1", "direction": "ingress", "protocol": "tcp",
                   "port_min": 22, "port_max": 22, "cidr": "0.0.0.0/0"}),
        ))
        .await
        .value
        .unwrap();
    assert_eq!(created.id(), Some("r1"));
    assert_eq!(created.str_attr("rule_id"), Some("r1"));
    assert_eq!(created.get_attribute::<i32>("priority"), Some(100));
    assert!(!created.attributes.contains_key("group_id"));

    let Some(Observed::Present(read)) = rule.read(created).await.value else {
        panic!("rule should still exist");
    };
    assert_eq!(read.str_attr("cidr"), Some("10.0.0.0/8"));
    assert_eq!(read.str_attr("security_group_id"), Some("sg1"));
}

#[tokio::test]
async fn test_security_rule_import_then_read_and_delete() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/security-groups/sg1"))
        .respond_with(ok(json!({
            "id": "sg1",
            "rules": [{"id": "r1", "group_id": "sg1", "direction": "ingress", "protocol": "tcp"}]
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/security-groups/rules/r1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let rule = provider(&server).resource("thecloud_security_rule").unwrap();

    let bare = rule.import("r1");
    assert_eq!(
        bare.diagnostics.errors().next().unwrap().summary,
        "Unexpected Import Identifier"
    );

    let imported = rule.import("sg1:r1").value.unwrap();
    assert_eq!(imported.str_attr("security_group_id"), Some("sg1"));
    assert_eq!(imported.str_attr("rule_id"), Some("r1"));

    let outcome = rule.read(imported.clone()).await;
    assert!(outcome.diagnostics.is_empty());
    let Some(Observed::Present(read)) = outcome.value else {
        panic!("imported rule should be readable");
    };
    assert_eq!(read.id(), Some("r1"));
    assert_eq!(read.str_attr("protocol"), Some("tcp"));

    let diagnostics = rule.delete(imported).await;
    assert!(diagnostics.is_empty());
}

#[tokio::test]
async fn test_scaling_group_create_without_min_instances() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/autoscaling/groups"))
        .and(body_partial_json(json!({
            "name": "web", "vpc_id": "v1", "image": "nginx",
            "min_instances": 0, "max_instances": 3, "desired_count": 1
        })))
        .respond_with(ok(json!({
            "id": "g1", "name": "web", "vpc_id": "v1", "image": "nginx",
            "min_instances": 0, "max_instances": 3, "desired_count": 1, "status": "ACTIVE"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let group = provider(&server)
        .resource("thecloud_scaling_group")
        .unwrap();
    let outcome = group
        .create(state(
            "thecloud_scaling_group",
            json!({"name": "web", "vpc_id": "v1", "image": "nginx", "max_instances": 3,
                   "desired_count": 1, "min_instances": null}),
        ))
        .await;

    assert!(outcome.diagnostics.is_empty());
    let created = outcome.value.unwrap();
    assert_eq!(created.id(), Some("g1"));
    assert_eq!(created.get_attribute::<u32>("min_instances"), Some(0));
}

#[tokio::test]
async fn test_image_upload_failure_removes_registration() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/images"))
        .respond_with(ok(json!({"id": "img1", "name": "base", "status": "PENDING"})))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .and(path("/images/img1/upload"))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"message": "corrupt image"}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/images/img1"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    let mut disk = tempfile::NamedTempFile::new().unwrap();
    disk.write_all(b"qcow2").unwrap();

    let image = provider(&server).resource("thecloud_image").unwrap();
    let outcome = image
        .create(state(
            "thecloud_image",
            json!({"name": "base", "os": "linux", "version": "1",
                   "file": disk.path().to_str().unwrap()}),
        ))
        .await;

    assert!(outcome.value.is_none());
    assert_eq!(
        outcome.diagnostics.errors().next().unwrap().detail,
        "Unable to create Image, got error: [400] corrupt image"
    );
}

#[tokio::test]
async fn test_function_without_timestamp_leaves_created_at_unset() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/functions"))
        .respond_with(ok(json!({
            "id": "f1", "name": "hello", "runtime": "nodejs20", "handler": "index.handler"
        })))
        .mount(&server)
        .await;

    let mut archive = tempfile::NamedTempFile::new().unwrap();
    archive.write_all(b"zipdata").unwrap();

    let function = provider(&server).resource("thecloud_function").unwrap();
    let created = function
        .create(state(
            "thecloud_function",
            json!({"name": "hello", "runtime": "nodejs20", "handler": "index.handler",
                   "filename": archive.path().to_str().unwrap(), "created_at": null}),
        ))
        .await
        .value
        .unwrap();

    assert_eq!(created.id(), Some("f1"));
    assert!(created.is_null("created_at"));
}
