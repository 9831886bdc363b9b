use serde::{Deserialize, Serialize};

/// Standard status condition as reported on queueing objects
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Condition {
    pub last_transition_time: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub observed_generation: Option<i64>,
    pub reason: String,
    pub status: String,
    #[serde(rename = "type")]
    pub type_: String,
}

/// Per-flavor resource totals of a local queue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FlavorUsage {
    pub name: String,
    pub resources: Vec<ResourceUsage>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceUsage {
    pub name: String,
    pub total: String,
}

/// Kueue LocalQueue
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalQueue {
    pub admitted_workloads: i32,
    pub cluster_queue: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conditions: Vec<Condition>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flavors_reservation: Vec<FlavorUsage>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub flavors_usage: Vec<FlavorUsage>,
    pub name: String,
    pub namespace: String,
    pub pending_workloads: i32,
    pub reserving_workloads: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_policy: Option<String>,
}

/// Validated input of a local queue creation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewLocalQueue {
    pub name: String,
    pub cluster_queue: String,
    pub stop_policy: Option<String>,
}
