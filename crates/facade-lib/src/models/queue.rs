use serde::{Deserialize, Serialize};

fn is_zero(value: &f64) -> bool {
    *value == 0.0
}

/// Quota triple for one resource of a scheduler queue
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueResource {
    pub limit: f64,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub over_quota_weight: f64,
    pub quota: f64,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QueueResources {
    pub cpu: QueueResource,
    pub gpu: QueueResource,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory: Option<QueueResource>,
}

/// Queue that references a parent queue
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChildQueue {
    pub name: String,
    pub parent: String,
    pub resources: QueueResources,
}

/// Top-level queue without a parent reference
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ParentQueue {
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub child_queues: Vec<String>,
    pub name: String,
    pub resources: QueueResources,
}
