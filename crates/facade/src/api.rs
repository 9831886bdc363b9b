//! HTTP surface of the facade
//!
//! Canonical models are served under `/api/v1`. Empty lists answer
//! 204, absent entities 404, source failures 500 on reads and 502 on writes.

use axum::{
    body::Bytes,
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use facade_lib::{
    health::HealthRegistry,
    validation::{self, JsonObject},
    ClusterView,
};
use prometheus::{Encoder, TextEncoder};
use serde::Serialize;
use serde_json::{json, Value};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{error, info};

use crate::error::ApiError;

type ApiResult = Result<Response, ApiError>;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub view: ClusterView,
    pub health_registry: HealthRegistry,
}

impl AppState {
    pub fn new(view: ClusterView, health_registry: HealthRegistry) -> Self {
        Self {
            view,
            health_registry,
        }
    }
}

fn list_response<T: Serialize>(items: Vec<T>) -> Response {
    if items.is_empty() {
        StatusCode::NO_CONTENT.into_response()
    } else {
        Json(items).into_response()
    }
}

fn created<T: Serialize>(value: T) -> Response {
    (StatusCode::CREATED, Json(value)).into_response()
}

/// Write bodies must be a JSON object
fn object_body(body: &Bytes) -> Result<JsonObject, ApiError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) => Ok(map),
        _ => Err(ApiError::BadBody),
    }
}

/// 200 while operational, 503 once a component is down
async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let health = state.health_registry.snapshot().await;

    let status_code = if health.is_serving() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    (status_code, Json(health))
}

/// Prometheus metrics endpoint
async fn metrics() -> Response {
    let encoder = TextEncoder::new();
    let metric_families = prometheus::gather();
    let mut buffer = Vec::new();

    if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
        error!(error = %e, "Failed to encode metrics");
        return StatusCode::INTERNAL_SERVER_ERROR.into_response();
    }

    (
        StatusCode::OK,
        [("content-type", "text/plain; charset=utf-8")],
        buffer,
    )
        .into_response()
}

async fn not_found() -> impl IntoResponse {
    (StatusCode::NOT_FOUND, Json(json!({ "error": "Not found" })))
}

async fn list_nodes(State(state): State<Arc<AppState>>) -> ApiResult {
    let nodes = state
        .view
        .list_nodes()
        .await
        .map_err(ApiError::read("nodes", "Node not found"))?;
    Ok(list_response(nodes))
}

async fn get_node(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult {
    let node = state
        .view
        .get_node(&name)
        .await
        .map_err(ApiError::read("node", "Node not found"))?;
    Ok(Json(node).into_response())
}

async fn list_pods(State(state): State<Arc<AppState>>) -> ApiResult {
    let pods = state
        .view
        .list_pods()
        .await
        .map_err(ApiError::read("pods", "Pod not found"))?;
    Ok(list_response(pods))
}

async fn get_pod(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult {
    let pod = state
        .view
        .get_pod(&namespace, &name)
        .await
        .map_err(ApiError::read("pod", "Pod not found"))?;
    Ok(Json(pod).into_response())
}

async fn create_job(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let job = validation::validate_job(&object_body(&body)?)?;
    let job = state
        .view
        .create_job(job)
        .await
        .map_err(ApiError::write("creating job"))?;
    Ok(created(job))
}

async fn list_resource_flavors(State(state): State<Arc<AppState>>) -> ApiResult {
    let flavors = state
        .view
        .list_resource_flavors()
        .await
        .map_err(ApiError::read("resource flavors", "Resource flavor not found"))?;
    Ok(list_response(flavors))
}

async fn get_resource_flavor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult {
    let flavor = state
        .view
        .get_resource_flavor(&name)
        .await
        .map_err(ApiError::read("resource flavor", "Resource flavor not found"))?;
    Ok(Json(flavor).into_response())
}

async fn create_resource_flavor(State(state): State<Arc<AppState>>, body: Bytes) -> ApiResult {
    let input = validation::validate_resource_flavor(&object_body(&body)?)?;
    let flavor = state
        .view
        .create_resource_flavor(&input)
        .await
        .map_err(ApiError::write("creating resource flavor"))?;
    info!(name = %flavor.name, "Resource flavor created");
    Ok(created(flavor))
}

async fn delete_resource_flavor(
    State(state): State<Arc<AppState>>,
    Path(name): Path<String>,
) -> ApiResult {
    state
        .view
        .delete_resource_flavor(&name)
        .await
        .map_err(ApiError::write("deleting resource flavor"))?;
    info!(%name, "Resource flavor deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_local_queues(State(state): State<Arc<AppState>>) -> ApiResult {
    let queues = state
        .view
        .list_local_queues()
        .await
        .map_err(ApiError::read("local queues", "Local queue not found"))?;
    Ok(list_response(queues))
}

async fn get_local_queue(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult {
    let queue = state
        .view
        .get_local_queue(&namespace, &name)
        .await
        .map_err(ApiError::read("local queue", "Local queue not found"))?;
    Ok(Json(queue).into_response())
}

async fn create_local_queue(
    State(state): State<Arc<AppState>>,
    Path(namespace): Path<String>,
    body: Bytes,
) -> ApiResult {
    let input = validation::validate_local_queue(&object_body(&body)?)?;
    let queue = state
        .view
        .create_local_queue(&namespace, &input)
        .await
        .map_err(ApiError::write("creating local queue"))?;
    info!(%namespace, name = %queue.name, "Local queue created");
    Ok(created(queue))
}

async fn delete_local_queue(
    State(state): State<Arc<AppState>>,
    Path((namespace, name)): Path<(String, String)>,
) -> ApiResult {
    state
        .view
        .delete_local_queue(&namespace, &name)
        .await
        .map_err(ApiError::write("deleting local queue"))?;
    info!(%namespace, %name, "Local queue deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}

async fn list_parent_queues(State(state): State<Arc<AppState>>) -> ApiResult {
    let queues = state
        .view
        .list_parent_queues()
        .await
        .map_err(ApiError::read(
            "kai scheduler queues",
            "Kai scheduler queue not found",
        ))?;
    Ok(list_response(queues))
}

async fn child_queues(State(state): State<Arc<AppState>>, Path(name): Path<String>) -> ApiResult {
    let queues = state
        .view
        .child_queues(&name)
        .await
        .map_err(ApiError::read(
            "kai scheduler child queues",
            "Kai scheduler queue not found",
        ))?;
    Ok(list_response(queues))
}

/// Create the API router
pub fn create_router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/nodes", get(list_nodes))
        .route("/nodes/:name", get(get_node))
        .route("/pods", get(list_pods))
        .route("/namespaces/:namespace/pods/:name", get(get_pod))
        .route("/jobs", post(create_job))
        .route(
            "/resource-flavors",
            get(list_resource_flavors).post(create_resource_flavor),
        )
        .route(
            "/resource-flavors/:name",
            get(get_resource_flavor).delete(delete_resource_flavor),
        )
        .route("/local-queues", get(list_local_queues))
        .route(
            "/namespaces/:namespace/local-queues",
            post(create_local_queue),
        )
        .route(
            "/namespaces/:namespace/local-queues/:name",
            get(get_local_queue).delete(delete_local_queue),
        )
        .route("/kai-scheduler-queues", get(list_parent_queues))
        .route("/kai-scheduler-queues/:name/child-queues", get(child_queues));

    Router::new()
        .route("/api/health", get(health))
        .route("/metrics", get(metrics))
        .nest("/api/v1", v1)
        .fallback(not_found)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Serve until `shutdown` resolves
pub async fn serve<F>(port: u16, state: Arc<AppState>, shutdown: F) -> anyhow::Result<()>
where
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let app = create_router(state);

    let addr = format!("0.0.0.0:{}", port);
    info!(addr = %addr, "Starting API server");

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown)
        .await?;

    Ok(())
}
