//! Process health reported on `/api/health`
//!
//! One component per backing store the facade can serve from. The overall
//! status is the worst component status; nothing registered reads as `UP`.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::normalize::TIME_FORMAT;
use crate::source::FIXTURE_FILES;

pub mod components {
    pub const CLUSTER_CLIENT: &str = "cluster_client";
    pub const FIXTURES: &str = "fixtures";
}

/// Ordered best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ComponentStatus {
    Up,
    /// Serving, but some requests will fail
    Degraded,
    /// No request backed by this component can succeed
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentHealth {
    pub status: ComponentStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    pub checked_at: String,
}

impl ComponentHealth {
    fn now(status: ComponentStatus, detail: Option<String>) -> Self {
        Self {
            status,
            detail,
            checked_at: chrono::Utc::now().format(TIME_FORMAT).to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: ComponentStatus,
    pub components: BTreeMap<String, ComponentHealth>,
}

impl HealthResponse {
    /// False once any component is down
    pub fn is_serving(&self) -> bool {
        self.status < ComponentStatus::Down
    }
}

#[derive(Debug, Clone, Default)]
pub struct HealthRegistry {
    components: Arc<RwLock<BTreeMap<String, ComponentHealth>>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn report(&self, name: &str, status: ComponentStatus, detail: Option<String>) {
        self.components
            .write()
            .await
            .insert(name.to_string(), ComponentHealth::now(status, detail));
    }

    /// Outcome of the live client construction. A failed client degrades
    /// the facade: live reads fail, job creation is skipped.
    pub async fn record_client(&self, outcome: Result<(), String>) {
        match outcome {
            Ok(()) => {
                self.report(components::CLUSTER_CLIENT, ComponentStatus::Up, None)
                    .await
            }
            Err(detail) => {
                self.report(
                    components::CLUSTER_CLIENT,
                    ComponentStatus::Degraded,
                    Some(detail),
                )
                .await
            }
        }
    }

    /// Inspect the fixture directory served in mock mode. A missing
    /// directory fails every read; a missing document fails its family only.
    pub async fn check_fixtures(&self, dir: &Path) -> ComponentStatus {
        let is_dir = tokio::fs::metadata(dir)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);

        let (status, detail) = if !is_dir {
            (
                ComponentStatus::Down,
                Some(format!("fixture directory {} not found", dir.display())),
            )
        } else {
            let mut missing = Vec::new();
            for file in FIXTURE_FILES {
                if tokio::fs::metadata(dir.join(file)).await.is_err() {
                    missing.push(file);
                }
            }
            if missing.is_empty() {
                (ComponentStatus::Up, None)
            } else {
                (
                    ComponentStatus::Degraded,
                    Some(format!("missing fixtures: {}", missing.join(", "))),
                )
            }
        };

        self.report(components::FIXTURES, status, detail).await;
        status
    }

    pub async fn snapshot(&self) -> HealthResponse {
        let components = self.components.read().await.clone();
        let status = components
            .values()
            .map(|c| c.status)
            .max()
            .unwrap_or(ComponentStatus::Up);
        HealthResponse { status, components }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_empty_registry_is_up() {
        let health = HealthRegistry::new().snapshot().await;
        assert_eq!(health.status, ComponentStatus::Up);
        assert!(health.components.is_empty());
        assert!(health.is_serving());
    }

    #[tokio::test]
    async fn test_failed_client_degrades() {
        let registry = HealthRegistry::new();
        registry.record_client(Err("no kubeconfig".to_string())).await;

        let health = registry.snapshot().await;
        assert_eq!(health.status, ComponentStatus::Degraded);
        assert!(health.is_serving());
        assert_eq!(
            health.components[components::CLUSTER_CLIENT].detail.as_deref(),
            Some("no kubeconfig")
        );
    }

    #[tokio::test]
    async fn test_missing_fixture_directory_is_down() {
        let dir = tempfile::tempdir().unwrap();
        let registry = HealthRegistry::new();

        let status = registry.check_fixtures(&dir.path().join("absent")).await;
        assert_eq!(status, ComponentStatus::Down);
        assert!(!registry.snapshot().await.is_serving());
    }

    #[tokio::test]
    async fn test_partial_fixture_directory_is_degraded() {
        let dir = tempfile::tempdir().unwrap();
        for file in FIXTURE_FILES {
            std::fs::write(dir.path().join(file), r#"{"items": []}"#).unwrap();
        }
        let registry = HealthRegistry::new();
        assert_eq!(registry.check_fixtures(dir.path()).await, ComponentStatus::Up);

        std::fs::remove_file(dir.path().join("pods.json")).unwrap();
        assert_eq!(
            registry.check_fixtures(dir.path()).await,
            ComponentStatus::Degraded
        );
        let health = registry.snapshot().await;
        assert_eq!(
            health.components[components::FIXTURES].detail.as_deref(),
            Some("missing fixtures: pods.json")
        );
    }

    #[tokio::test]
    async fn test_worst_component_wins() {
        let dir = tempfile::tempdir().unwrap();
        let registry = HealthRegistry::new();
        registry.record_client(Ok(())).await;
        registry.check_fixtures(&dir.path().join("absent")).await;

        assert_eq!(registry.snapshot().await.status, ComponentStatus::Down);
    }

    #[test]
    fn test_status_wire_names() {
        assert_eq!(serde_json::to_value(ComponentStatus::Up).unwrap(), "UP");
        assert_eq!(
            serde_json::to_value(ComponentStatus::Degraded).unwrap(),
            "DEGRADED"
        );
        assert_eq!(serde_json::to_value(ComponentStatus::Down).unwrap(), "DOWN");
    }
}
