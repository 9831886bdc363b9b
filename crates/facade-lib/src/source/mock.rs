//! Fixture-backed adapter for offline development
//!
//! Each resource family lives in its own `{"items": [...]}` document in
//! upstream wire shape. Documents are read on every call; writes never
//! touch them.
//!
//! Items are parsed into the strict upstream types, so every field the
//! cluster API requires must be present (e.g. `image` and `imageID` on a
//! container status). One malformed item fails the whole document.

use k8s_openapi::api::core::v1 as core;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::debug;

use super::{
    async_trait, FlavorSource, HierarchyQueueSource, LocalQueueSource, NodeSource, PodSource,
    SourceResult,
};
use crate::crd;
use crate::error::{ResourceKind, SourceError};

pub const NODES_FILE: &str = "nodes.json";
pub const PODS_FILE: &str = "pods.json";
pub const LOCAL_QUEUES_FILE: &str = "local_queues.json";
pub const RESOURCE_FLAVORS_FILE: &str = "resource_flavors.json";
pub const QUEUES_FILE: &str = "kai_scheduler_queues.json";

/// Every document a complete fixture directory holds
pub const FIXTURE_FILES: [&str; 5] = [
    NODES_FILE,
    PODS_FILE,
    LOCAL_QUEUES_FILE,
    RESOURCE_FLAVORS_FILE,
    QUEUES_FILE,
];

/// Top-level shape of every fixture document
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FixtureList<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Clone)]
pub struct MockSource {
    dir: PathBuf,
}

impl MockSource {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    async fn load<T: DeserializeOwned>(&self, file: &str) -> SourceResult<Vec<T>> {
        let path = self.dir.join(file);
        let data = tokio::fs::read(&path)
            .await
            .map_err(|source| SourceError::FixtureRead {
                path: path.clone(),
                source,
            })?;

        let list: FixtureList<T> = serde_json::from_slice(&data)
            .map_err(|source| SourceError::FixtureParse { path, source })?;
        Ok(list.items)
    }
}

fn name_of(meta: &kube::api::ObjectMeta) -> &str {
    meta.name.as_deref().unwrap_or_default()
}

fn namespace_of(meta: &kube::api::ObjectMeta) -> &str {
    meta.namespace.as_deref().unwrap_or_default()
}

#[async_trait]
impl NodeSource for MockSource {
    async fn list_nodes(&self) -> SourceResult<Vec<core::Node>> {
        self.load(NODES_FILE).await
    }

    async fn get_node(&self, name: &str) -> SourceResult<core::Node> {
        self.load::<core::Node>(NODES_FILE)
            .await?
            .into_iter()
            .find(|n| name_of(&n.metadata) == name)
            .ok_or_else(|| SourceError::not_found(ResourceKind::Node, name))
    }
}

#[async_trait]
impl PodSource for MockSource {
    async fn list_pods(&self) -> SourceResult<Vec<core::Pod>> {
        self.load(PODS_FILE).await
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> SourceResult<core::Pod> {
        self.load::<core::Pod>(PODS_FILE)
            .await?
            .into_iter()
            .find(|p| namespace_of(&p.metadata) == namespace && name_of(&p.metadata) == name)
            .ok_or_else(|| {
                SourceError::not_found(ResourceKind::Pod, format!("{}/{}", namespace, name))
            })
    }

    async fn create_job(&self, name: &str) -> SourceResult<()> {
        debug!(job = %name, "Mock job accepted");
        Ok(())
    }
}

#[async_trait]
impl LocalQueueSource for MockSource {
    async fn list_local_queues(&self) -> SourceResult<Vec<crd::LocalQueue>> {
        self.load(LOCAL_QUEUES_FILE).await
    }

    async fn get_local_queue(
        &self,
        namespace: &str,
        name: &str,
    ) -> SourceResult<crd::LocalQueue> {
        self.load::<crd::LocalQueue>(LOCAL_QUEUES_FILE)
            .await?
            .into_iter()
            .find(|q| namespace_of(&q.metadata) == namespace && name_of(&q.metadata) == name)
            .ok_or_else(|| {
                SourceError::not_found(
                    ResourceKind::LocalQueue,
                    format!("{}/{}", namespace, name),
                )
            })
    }

    async fn create_local_queue(&self, queue: crd::LocalQueue) -> SourceResult<crd::LocalQueue> {
        debug!(name = %name_of(&queue.metadata), "Mock local queue accepted");
        Ok(queue)
    }

    async fn delete_local_queue(&self, namespace: &str, name: &str) -> SourceResult<()> {
        debug!(%namespace, %name, "Mock local queue delete accepted");
        Ok(())
    }
}

#[async_trait]
impl FlavorSource for MockSource {
    async fn list_resource_flavors(&self) -> SourceResult<Vec<crd::ResourceFlavor>> {
        self.load(RESOURCE_FLAVORS_FILE).await
    }

    async fn get_resource_flavor(&self, name: &str) -> SourceResult<crd::ResourceFlavor> {
        self.load::<crd::ResourceFlavor>(RESOURCE_FLAVORS_FILE)
            .await?
            .into_iter()
            .find(|f| name_of(&f.metadata) == name)
            .ok_or_else(|| SourceError::not_found(ResourceKind::ResourceFlavor, name))
    }

    async fn create_resource_flavor(
        &self,
        flavor: crd::ResourceFlavor,
    ) -> SourceResult<crd::ResourceFlavor> {
        debug!(name = %name_of(&flavor.metadata), "Mock resource flavor accepted");
        Ok(flavor)
    }

    async fn delete_resource_flavor(&self, name: &str) -> SourceResult<()> {
        debug!(%name, "Mock resource flavor delete accepted");
        Ok(())
    }
}

#[async_trait]
impl HierarchyQueueSource for MockSource {
    async fn list_queues(&self) -> SourceResult<Vec<crd::Queue>> {
        self.load(QUEUES_FILE).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, file: &str, value: serde_json::Value) {
        std::fs::write(dir.path().join(file), value.to_string()).unwrap();
    }

    #[tokio::test]
    async fn test_get_node_by_name() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            NODES_FILE,
            json!({ "items": [
                { "metadata": { "name": "cp-1" } },
                { "metadata": { "name": "worker-1" } }
            ]}),
        );

        let source = MockSource::new(dir.path());
        assert_eq!(source.list_nodes().await.unwrap().len(), 2);

        let node = source.get_node("worker-1").await.unwrap();
        assert_eq!(node.metadata.name.as_deref(), Some("worker-1"));

        let err = source.get_node("missing").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[tokio::test]
    async fn test_one_malformed_item_fails_the_document() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            PODS_FILE,
            json!({ "items": [
                { "metadata": { "name": "ok", "namespace": "default" } },
                {
                    "metadata": { "name": "bad", "namespace": "default" },
                    "status": { "containerStatuses": [
                        { "name": "app", "ready": true, "restartCount": 0 }
                    ]}
                }
            ]}),
        );

        let source = MockSource::new(dir.path());
        assert!(matches!(
            source.list_pods().await,
            Err(SourceError::FixtureParse { .. })
        ));
        assert!(matches!(
            source.get_pod("default", "ok").await,
            Err(SourceError::FixtureParse { .. })
        ));
    }

    #[tokio::test]
    async fn test_get_pod_matches_namespace() {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            PODS_FILE,
            json!({ "items": [{ "metadata": { "name": "web-0", "namespace": "default" } }] }),
        );

        let source = MockSource::new(dir.path());
        assert!(source.get_pod("default", "web-0").await.is_ok());
        assert!(source
            .get_pod("other", "web-0")
            .await
            .unwrap_err()
            .is_not_found());
    }

    #[tokio::test]
    async fn test_empty_document_is_empty_list() {
        let dir = TempDir::new().unwrap();
        write_fixture(&dir, QUEUES_FILE, json!({}));

        let source = MockSource::new(dir.path());
        assert!(source.list_queues().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_missing_and_malformed_fixtures() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(PODS_FILE), "not json").unwrap();
        let source = MockSource::new(dir.path());

        let err = source.list_nodes().await.unwrap_err();
        assert!(matches!(err, SourceError::FixtureRead { .. }));
        assert!(!err.is_not_found());

        let err = source.list_pods().await.unwrap_err();
        assert!(matches!(err, SourceError::FixtureParse { .. }));
    }

    #[tokio::test]
    async fn test_writes_leave_fixtures_untouched() {
        let dir = TempDir::new().unwrap();
        let doc = json!({ "items": [] });
        write_fixture(&dir, RESOURCE_FLAVORS_FILE, doc.clone());

        let source = MockSource::new(dir.path());
        let flavor = crd::ResourceFlavor::new("spot", Default::default());
        let created = source.create_resource_flavor(flavor).await.unwrap();
        assert_eq!(created.metadata.name.as_deref(), Some("spot"));
        source.delete_resource_flavor("spot").await.unwrap();

        let on_disk = std::fs::read_to_string(dir.path().join(RESOURCE_FLAVORS_FILE)).unwrap();
        assert_eq!(on_disk, doc.to_string());
        assert!(source.list_resource_flavors().await.unwrap().is_empty());
    }
}
