//! KAI scheduler `scheduling.run.ai/v2` Queue

use kube::CustomResource;
use serde::{Deserialize, Serialize};

/// Hierarchical scheduler queue. An empty `parent_queue` marks a top-level queue.
#[derive(CustomResource, Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[kube(
    group = "scheduling.run.ai",
    version = "v2",
    kind = "Queue",
    plural = "queues",
    status = "QueueStatus",
    schema = "disabled"
)]
#[serde(rename_all = "camelCase")]
pub struct QueueSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(default)]
    pub parent_queue: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resources: Option<QueueResources>,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct QueueResources {
    #[serde(default)]
    pub cpu: QueueResource,
    #[serde(default)]
    pub gpu: QueueResource,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub memory: Option<QueueResource>,
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueResource {
    #[serde(default)]
    pub quota: f64,
    #[serde(default)]
    pub over_quota_weight: f64,
    #[serde(default)]
    pub limit: f64,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QueueStatus {
    #[serde(default)]
    pub child_queues: Vec<String>,
}
