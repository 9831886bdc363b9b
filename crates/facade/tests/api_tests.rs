//! Integration tests for the facade HTTP surface

use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    Router,
};
use facade_lib::{
    health::HealthRegistry,
    select,
    source::FIXTURE_FILES,
    ClusterView,
};
use schedview_facade::api::{create_router, AppState};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tower::ServiceExt;

fn fixtures_dir() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("../../fixtures")
}

async fn app_with(mock: bool, dir: &Path) -> (Router, Arc<AppState>) {
    let health_registry = HealthRegistry::new();
    if mock {
        health_registry.check_fixtures(dir).await;
    } else {
        health_registry
            .record_client(Err("no kubeconfig".to_string()))
            .await;
    }

    let view = ClusterView::new(select(mock, None, dir));
    let state = Arc::new(AppState::new(view, health_registry));
    (create_router(state.clone()), state)
}

async fn setup_test_app() -> (Router, Arc<AppState>) {
    app_with(true, &fixtures_dir()).await
}

async fn send(app: Router, method: Method, uri: &str, body: Option<&str>) -> (StatusCode, Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header("content-type", "application/json")
        .body(body.map_or_else(Body::empty, |b| Body::from(b.to_string())))
        .unwrap();

    let response = app.oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
}

async fn get(app: Router, uri: &str) -> (StatusCode, Value) {
    send(app, Method::GET, uri, None).await
}

async fn post(app: Router, uri: &str, body: &str) -> (StatusCode, Value) {
    send(app, Method::POST, uri, Some(body)).await
}

fn empty_fixtures() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    for file in FIXTURE_FILES {
        std::fs::write(dir.path().join(file), r#"{"items": []}"#).unwrap();
    }
    dir
}

#[tokio::test]
async fn test_health_up_with_complete_fixtures() {
    let (app, _state) = setup_test_app().await;

    let (status, health) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "UP");
    assert_eq!(health["components"]["fixtures"]["status"], "UP");
}

#[tokio::test]
async fn test_health_degraded_with_missing_fixture() {
    let dir = empty_fixtures();
    std::fs::remove_file(dir.path().join("local_queues.json")).unwrap();
    let (app, _state) = app_with(true, dir.path()).await;

    let (status, health) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "DEGRADED");
    assert_eq!(
        health["components"]["fixtures"]["detail"],
        "missing fixtures: local_queues.json"
    );
}

#[tokio::test]
async fn test_health_down_without_fixture_directory() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(true, &dir.path().join("absent")).await;

    let (status, health) = get(app.clone(), "/api/health").await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(health["status"], "DOWN");

    let (status, _) = get(app, "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_health_degraded_without_client() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(false, dir.path()).await;

    let (status, health) = get(app, "/api/health").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(health["status"], "DEGRADED");
    assert_eq!(health["components"]["cluster_client"]["status"], "DEGRADED");
}

#[tokio::test]
async fn test_metrics_endpoint_exposes_facade_metrics() {
    let (app, _state) = setup_test_app().await;
    let (status, _) = get(app.clone(), "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::OK);

    let response = app
        .oneshot(Request::builder().uri("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("schedview_requests_total"));
    assert!(text.contains("schedview_mock_mode"));
}

#[tokio::test]
async fn test_list_nodes_from_fixtures() {
    let (app, _state) = setup_test_app().await;

    let (status, nodes) = get(app, "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::OK);

    let nodes = nodes.as_array().unwrap();
    assert_eq!(nodes.len(), 3);
    assert_eq!(nodes[0]["name"], "cp-1");
    assert_eq!(nodes[0]["roles"], "control-plane");
    assert_eq!(nodes[0]["ready"], true);
    assert_eq!(nodes[0]["cpu"], "4");
    assert_eq!(nodes[0]["memory"], "16Gi");
    assert_eq!(nodes[0]["ip"], "10.0.0.10");
    assert_eq!(nodes[0]["kubeletVersion"], "v1.28.3");

    // Ready=Unknown is not ready; InternalIP need not be the first address
    assert_eq!(nodes[2]["ready"], false);
    assert_eq!(nodes[2]["roles"], "<none>");
    assert_eq!(nodes[2]["ip"], "10.0.0.22");
}

#[tokio::test]
async fn test_node_detail_and_missing_node() {
    let (app, _state) = setup_test_app().await;

    let (status, node) = get(app.clone(), "/api/v1/nodes/gpu-worker-1").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(node["roles"], "worker");
    assert_eq!(node["capacity"]["nvidia.com/gpu"], "8");
    assert_eq!(node["allocatable"]["cpu"], "63500m");
    assert_eq!(node["taints"][0]["key"], "nvidia.com/gpu");
    assert_eq!(node["creationTimestamp"], "2024-01-12T09:30:00Z");

    let (status, body) = get(app, "/api/v1/nodes/ghost").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Node not found" }));
}

#[tokio::test]
async fn test_list_pods_from_fixtures() {
    let (app, _state) = setup_test_app().await;

    let (status, pods) = get(app, "/api/v1/pods").await;
    assert_eq!(status, StatusCode::OK);

    let pods = pods.as_array().unwrap();
    assert_eq!(pods.len(), 4);

    let web = pods.iter().find(|p| p["name"] == "web-0").unwrap();
    assert_eq!(web["restarts"], 12);
    assert_eq!(web["statusClass"], "running");
    assert_eq!(web["podIP"], "10.244.2.8");

    let etl = pods.iter().find(|p| p["namespace"] == "data").unwrap();
    assert_eq!(etl["statusClass"], "ready");

    let pending = pods.iter().find(|p| p["name"] == "inference-pending").unwrap();
    assert_eq!(pending["statusClass"], "pending");
    assert_eq!(pending["node"], "");
}

#[tokio::test]
async fn test_pod_detail_hides_indirect_env() {
    let (app, _state) = setup_test_app().await;

    let (status, pod) = get(app.clone(), "/api/v1/namespaces/ml/pods/trainer-0").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pod["node"], "gpu-worker-1");

    let trainer = &pod["containers"][0];
    let env = trainer["env"].as_array().unwrap();
    assert_eq!(env.len(), 1);
    assert_eq!(env[0]["name"], "EPOCHS");
    assert_eq!(trainer["restartCount"], 1);
    assert_eq!(trainer["resources"]["limits"]["nvidia.com/gpu"], "4");

    let volumes = pod["volumes"].as_array().unwrap();
    assert_eq!(volumes.len(), 3);
    assert_eq!(volumes[0]["source"], "trainer-data");
    assert_eq!(volumes[1]["source"], "trainer-config");

    // same name in another namespace does not match
    let (status, body) = get(app, "/api/v1/namespaces/default/pods/trainer-0").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Pod not found" }));
}

#[tokio::test]
async fn test_empty_lists_return_no_content() {
    let dir = empty_fixtures();
    let (app, _state) = app_with(true, dir.path()).await;

    for uri in [
        "/api/v1/nodes",
        "/api/v1/pods",
        "/api/v1/local-queues",
        "/api/v1/resource-flavors",
        "/api/v1/kai-scheduler-queues",
    ] {
        let (status, body) = get(app.clone(), uri).await;
        assert_eq!(status, StatusCode::NO_CONTENT, "{}", uri);
        assert_eq!(body, Value::Null);
    }
}

#[tokio::test]
async fn test_unreadable_fixtures_fail_reads() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("nodes.json"), "not json").unwrap();
    let (app, _state) = app_with(true, dir.path()).await;

    let (status, body) = get(app.clone(), "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed reading nodes" }));

    let (status, _) = get(app, "/api/v1/pods").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn test_local_queues_listing_and_detail() {
    let (app, _state) = setup_test_app().await;

    let (status, queues) = get(app.clone(), "/api/v1/local-queues").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queues.as_array().unwrap().len(), 3);

    let (status, queue) = get(app.clone(), "/api/v1/namespaces/ml/local-queues/team-a").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue["clusterQueue"], "gpu-cluster-queue");
    assert_eq!(queue["pendingWorkloads"], 2);
    assert_eq!(queue["flavorsUsage"][0]["resources"][2]["total"], "4");
    assert!(queue.get("stopPolicy").is_none());

    let (status, queue) = get(app.clone(), "/api/v1/namespaces/ml/local-queues/team-b").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(queue["stopPolicy"], "HoldAndDrain");

    let (status, body) = get(app, "/api/v1/namespaces/data/local-queues/team-a").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Local queue not found" }));
}

#[tokio::test]
async fn test_resource_flavor_keeps_zero_toleration_seconds() {
    let (app, _state) = setup_test_app().await;

    let (status, flavor) = get(app.clone(), "/api/v1/resource-flavors/a100").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(flavor["topologyName"], "gpu-rack-topology");

    let tolerations = flavor["tolerations"].as_array().unwrap();
    assert!(tolerations[0].get("tolerationSeconds").is_none());
    assert_eq!(tolerations[1]["tolerationSeconds"], 0);

    let (status, body) = get(app, "/api/v1/resource-flavors/h100").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Resource flavor not found" }));
}

#[tokio::test]
async fn test_parent_queues_exclude_children() {
    let (app, _state) = setup_test_app().await;

    let (status, queues) = get(app, "/api/v1/kai-scheduler-queues").await;
    assert_eq!(status, StatusCode::OK);

    let names: Vec<&str> = queues
        .as_array()
        .unwrap()
        .iter()
        .map(|q| q["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["research", "inference"]);
    assert_eq!(queues[0]["resources"]["gpu"]["over_quota_weight"], 2.0);
    assert!(queues[1]["resources"].get("memory").is_none());
}

#[tokio::test]
async fn test_child_queues_distinguish_empty_from_missing() {
    let (app, _state) = setup_test_app().await;

    let (status, children) =
        get(app.clone(), "/api/v1/kai-scheduler-queues/research/child-queues").await;
    assert_eq!(status, StatusCode::OK);
    let children = children.as_array().unwrap();
    assert_eq!(children.len(), 2);
    assert!(children.iter().all(|c| c["parent"] == "research"));

    let (status, _) = get(
        app.clone(),
        "/api/v1/kai-scheduler-queues/inference/child-queues",
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, body) = get(app.clone(), "/api/v1/kai-scheduler-queues/ghost/child-queues").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Kai scheduler queue not found" }));

    // a child is not a parent
    let (status, _) = get(app, "/api/v1/kai-scheduler-queues/research-nlp/child-queues").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_job() {
    let (app, _state) = setup_test_app().await;

    let (status, job) = post(app, "/api/v1/jobs", r#"{"name": "smoke"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job, json!({ "name": "smoke" }));
}

#[tokio::test]
async fn test_create_job_rejects_bad_bodies() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(app.clone(), "/api/v1/jobs", r#"{"name": "a", "image": "x"}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], 400);
    assert_eq!(body["message"], "Bad Request");
    assert_eq!(body["reason"], "request must contain only 'name' field");

    let (status, body) = post(app.clone(), "/api/v1/jobs", r#"{"name": ""}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "field 'name' cannot be empty");

    let (status, body) = post(app.clone(), "/api/v1/jobs", r#"{"name": 7}"#).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "field 'name' must be a string");

    let (status, body) = post(app, "/api/v1/jobs", "name=smoke").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "Cannot parse JSON");
}

#[tokio::test]
async fn test_create_local_queue() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(
        app.clone(),
        "/api/v1/namespaces/ml/local-queues",
        r#"{"name": "team-c"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "field 'clusterQueue' is required");

    // unknown fields are ignored
    let (status, queue) = post(
        app,
        "/api/v1/namespaces/ml/local-queues",
        r#"{"name": "team-c", "clusterQueue": "cq", "labels": {"a": "b"}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(queue["name"], "team-c");
    assert_eq!(queue["namespace"], "ml");
    assert_eq!(queue["clusterQueue"], "cq");
    assert_eq!(queue["admittedWorkloads"], 0);
}

#[tokio::test]
async fn test_create_resource_flavor() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = post(
        app.clone(),
        "/api/v1/resource-flavors",
        r#"{"name": "h100", "nodeLabels": {"gpus": 8}}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "nodeLabels values must be strings");

    let (status, body) = post(
        app.clone(),
        "/api/v1/resource-flavors",
        r#"{"name": "h100", "tolerations": [{"key": "k", "tolerationSeconds": "30"}]}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["reason"], "tolerations tolerationSeconds must be an integer");

    let (status, flavor) = post(
        app,
        "/api/v1/resource-flavors",
        r#"{
            "name": "h100",
            "nodeLabels": {"gpu": "h100"},
            "nodeTaints": [{"key": "gpu", "value": "h100", "effect": "NoSchedule"}],
            "tolerations": [{"key": "gpu", "operator": "Exists", "tolerationSeconds": 0}]
        }"#,
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(flavor["name"], "h100");
    assert_eq!(flavor["nodeLabels"]["gpu"], "h100");
    assert_eq!(flavor["nodeTaints"][0]["effect"], "NoSchedule");
    assert_eq!(flavor["tolerations"][0]["tolerationSeconds"], 0);
}

#[tokio::test]
async fn test_deletes_return_no_content() {
    let (app, _state) = setup_test_app().await;

    let (status, _) = send(
        app.clone(),
        Method::DELETE,
        "/api/v1/resource-flavors/a100",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        app,
        Method::DELETE,
        "/api/v1/namespaces/ml/local-queues/team-a",
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);
}

#[tokio::test]
async fn test_unknown_route_returns_json_not_found() {
    let (app, _state) = setup_test_app().await;

    let (status, body) = get(app, "/api/v2/nodes").await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "error": "Not found" }));
}

#[tokio::test]
async fn test_live_without_client() {
    let dir = tempfile::tempdir().unwrap();
    let (app, _state) = app_with(false, dir.path()).await;

    let (status, body) = get(app.clone(), "/api/v1/nodes").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed reading nodes" }));

    let (status, body) = get(app.clone(), "/api/v1/kai-scheduler-queues/research/child-queues").await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({ "error": "Failed reading kai scheduler child queues" }));

    // job creation is skipped, not failed
    let (status, job) = post(app.clone(), "/api/v1/jobs", r#"{"name": "smoke"}"#).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(job["name"], "smoke");

    let (status, body) = post(
        app,
        "/api/v1/namespaces/ml/local-queues",
        r#"{"name": "team-c", "clusterQueue": "cq"}"#,
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(body["code"], 502);
    assert_eq!(body["message"], "Bad Gateway");
    assert_eq!(body["reason"], "Failed creating local queue");
}
