//! Live cluster adapter

use anyhow::Context;
use k8s_openapi::api::core::v1 as core;
use kube::api::{Api, DeleteParams, ListParams, ObjectMeta, PostParams};
use kube::config::{KubeConfigOptions, Kubeconfig};
use kube::{Client, Config};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::{debug, info, warn};

use super::{
    async_trait, FlavorSource, HierarchyQueueSource, LocalQueueSource, NodeSource, PodSource,
    SourceResult,
};
use crate::crd;
use crate::error::{ResourceKind, SourceError};

/// Namespace job pods are created in
pub const JOB_NAMESPACE: &str = "default";
pub const JOB_IMAGE: &str = "busybox:latest";
pub const JOB_CONTAINER: &str = "job-container";
const JOB_SCRIPT: &str = "echo 'Job started' && sleep 10 && echo 'Job completed'";

/// Build a cluster client from an explicit kubeconfig, falling back to
/// in-cluster or default inference when the file does not exist
pub async fn connect(kubeconfig: Option<&Path>) -> anyhow::Result<Client> {
    let config = match kubeconfig.filter(|p| p.exists()) {
        Some(path) => {
            debug!(path = %path.display(), "Loading kubeconfig");
            let kubeconfig = Kubeconfig::read_from(path)
                .with_context(|| format!("Failed to read kubeconfig {}", path.display()))?;
            Config::from_custom_kubeconfig(kubeconfig, &KubeConfigOptions::default())
                .await
                .context("Invalid kubeconfig")?
        }
        None => Config::infer()
            .await
            .context("Failed to infer cluster configuration")?,
    };

    Client::try_from(config).context("Failed to create cluster client")
}

/// Adapter over the cluster API. The client is absent when it failed to
/// initialize at startup.
#[derive(Clone)]
pub struct LiveSource {
    client: Option<Client>,
}

impl LiveSource {
    pub fn new(client: Option<Client>) -> Self {
        Self { client }
    }

    fn client(&self) -> SourceResult<Client> {
        self.client.clone().ok_or(SourceError::Unavailable)
    }

    /// Number of pods in the default namespace, used as a startup probe
    pub async fn default_namespace_pod_count(&self) -> SourceResult<usize> {
        let pods: Api<core::Pod> = Api::namespaced(self.client()?, JOB_NAMESPACE);
        Ok(pods.list(&ListParams::default()).await?.items.len())
    }
}

fn not_found<T>(found: Option<T>, kind: ResourceKind, name: &str) -> SourceResult<T> {
    found.ok_or_else(|| SourceError::not_found(kind, name))
}

/// Single-container pod that runs to completion
pub fn job_pod(name: &str) -> core::Pod {
    core::Pod {
        metadata: ObjectMeta {
            name: Some(name.to_string()),
            namespace: Some(JOB_NAMESPACE.to_string()),
            labels: Some(BTreeMap::from([("app".to_string(), "job".to_string())])),
            ..Default::default()
        },
        spec: Some(core::PodSpec {
            containers: vec![core::Container {
                name: JOB_CONTAINER.to_string(),
                image: Some(JOB_IMAGE.to_string()),
                command: Some(vec![
                    "sh".to_string(),
                    "-c".to_string(),
                    JOB_SCRIPT.to_string(),
                ]),
                ..Default::default()
            }],
            restart_policy: Some("Never".to_string()),
            ..Default::default()
        }),
        ..Default::default()
    }
}

#[async_trait]
impl NodeSource for LiveSource {
    async fn list_nodes(&self) -> SourceResult<Vec<core::Node>> {
        let nodes: Api<core::Node> = Api::all(self.client()?);
        Ok(nodes.list(&ListParams::default()).await?.items)
    }

    async fn get_node(&self, name: &str) -> SourceResult<core::Node> {
        let nodes: Api<core::Node> = Api::all(self.client()?);
        not_found(nodes.get_opt(name).await?, ResourceKind::Node, name)
    }
}

#[async_trait]
impl PodSource for LiveSource {
    async fn list_pods(&self) -> SourceResult<Vec<core::Pod>> {
        let pods: Api<core::Pod> = Api::all(self.client()?);
        Ok(pods.list(&ListParams::default()).await?.items)
    }

    async fn get_pod(&self, namespace: &str, name: &str) -> SourceResult<core::Pod> {
        let pods: Api<core::Pod> = Api::namespaced(self.client()?, namespace);
        not_found(
            pods.get_opt(name).await?,
            ResourceKind::Pod,
            &format!("{}/{}", namespace, name),
        )
    }

    async fn create_job(&self, name: &str) -> SourceResult<()> {
        let Some(client) = self.client.clone() else {
            warn!(job = %name, "Cluster client not initialized, skipping job creation");
            return Ok(());
        };

        let pods: Api<core::Pod> = Api::namespaced(client, JOB_NAMESPACE);
        pods.create(&PostParams::default(), &job_pod(name)).await?;
        info!(job = %name, namespace = JOB_NAMESPACE, "Job pod created");
        Ok(())
    }
}

#[async_trait]
impl LocalQueueSource for LiveSource {
    async fn list_local_queues(&self) -> SourceResult<Vec<crd::LocalQueue>> {
        let queues: Api<crd::LocalQueue> = Api::all(self.client()?);
        Ok(queues.list(&ListParams::default()).await?.items)
    }

    async fn get_local_queue(
        &self,
        namespace: &str,
        name: &str,
    ) -> SourceResult<crd::LocalQueue> {
        let queues: Api<crd::LocalQueue> = Api::namespaced(self.client()?, namespace);
        not_found(
            queues.get_opt(name).await?,
            ResourceKind::LocalQueue,
            &format!("{}/{}", namespace, name),
        )
    }

    async fn create_local_queue(&self, queue: crd::LocalQueue) -> SourceResult<crd::LocalQueue> {
        let client = self.client()?;
        let namespace = queue.metadata.namespace.clone().unwrap_or_default();
        let queues: Api<crd::LocalQueue> = Api::namespaced(client, &namespace);
        Ok(queues.create(&PostParams::default(), &queue).await?)
    }

    async fn delete_local_queue(&self, namespace: &str, name: &str) -> SourceResult<()> {
        let queues: Api<crd::LocalQueue> = Api::namespaced(self.client()?, namespace);
        queues.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}

#[async_trait]
impl FlavorSource for LiveSource {
    async fn list_resource_flavors(&self) -> SourceResult<Vec<crd::ResourceFlavor>> {
        let flavors: Api<crd::ResourceFlavor> = Api::all(self.client()?);
        Ok(flavors.list(&ListParams::default()).await?.items)
    }

    async fn get_resource_flavor(&self, name: &str) -> SourceResult<crd::ResourceFlavor> {
        let flavors: Api<crd::ResourceFlavor> = Api::all(self.client()?);
        not_found(
            flavors.get_opt(name).await?,
            ResourceKind::ResourceFlavor,
            name,
        )
    }

    async fn create_resource_flavor(
        &self,
        flavor: crd::ResourceFlavor,
    ) -> SourceResult<crd::ResourceFlavor> {
        let flavors: Api<crd::ResourceFlavor> = Api::all(self.client()?);
        Ok(flavors.create(&PostParams::default(), &flavor).await?)
    }

    async fn delete_resource_flavor(&self, name: &str) -> SourceResult<()> {
        let flavors: Api<crd::ResourceFlavor> = Api::all(self.client()?);
        flavors.delete(name, &DeleteParams::default()).await?;
        Ok(())
    }
}

#[async_trait]
impl HierarchyQueueSource for LiveSource {
    async fn list_queues(&self) -> SourceResult<Vec<crd::Queue>> {
        let queues: Api<crd::Queue> = Api::all(self.client()?);
        Ok(queues.list(&ListParams::default()).await?.items)
    }
}
