//! Canonical read/write operations over the selected sources
//!
//! One call = one adapter call followed by one mapper invocation. Every
//! outcome is counted, and failures other than not-found are logged here
//! so the transport can answer with a category message only.

use std::future::Future;
use std::time::Instant;

use crate::error::ResourceKind;
use crate::models::{
    ChildQueue, Job, LocalQueue, NewLocalQueue, Node, NodeDetail, ParentQueue, Pod, PodDetail,
    ResourceFlavor,
};
use crate::normalize::{self, queue::QueueHierarchy};
use crate::observability::{FacadeMetrics, StructuredLogger};
use crate::source::{SourceKind, SourceResult, Sources};

#[derive(Clone)]
pub struct ClusterView {
    sources: Sources,
    metrics: FacadeMetrics,
    logger: StructuredLogger,
}

impl ClusterView {
    pub fn new(sources: Sources) -> Self {
        let metrics = FacadeMetrics::new();
        metrics.set_mock_mode(sources.kind == SourceKind::Mock);
        let logger = StructuredLogger::new(sources.kind.as_str());

        Self {
            sources,
            metrics,
            logger,
        }
    }

    pub fn kind(&self) -> SourceKind {
        self.sources.kind
    }

    async fn observe<T, F>(&self, kind: ResourceKind, operation: &str, call: F) -> SourceResult<T>
    where
        F: Future<Output = SourceResult<T>>,
    {
        let resource = kind.as_str();
        let start = Instant::now();
        let result = call.await;
        self.metrics
            .observe_source_latency(resource, operation, start.elapsed().as_secs_f64());

        match &result {
            Ok(_) => self.metrics.record_request(resource, operation, "ok"),
            Err(e) => {
                self.metrics.record_request(resource, operation, e.category());
                if !e.is_not_found() {
                    self.logger.log_source_failure(resource, operation, e);
                }
            }
        }
        result
    }

    pub async fn list_nodes(&self) -> SourceResult<Vec<Node>> {
        self.observe(ResourceKind::Node, "list", async {
            let nodes = self.sources.nodes.list_nodes().await?;
            Ok(nodes.iter().map(normalize::node::to_summary).collect())
        })
        .await
    }

    pub async fn get_node(&self, name: &str) -> SourceResult<NodeDetail> {
        self.observe(ResourceKind::Node, "get", async {
            let node = self.sources.nodes.get_node(name).await?;
            Ok(normalize::node::to_detail(&node))
        })
        .await
    }

    pub async fn list_pods(&self) -> SourceResult<Vec<Pod>> {
        self.observe(ResourceKind::Pod, "list", async {
            let pods = self.sources.pods.list_pods().await?;
            Ok(pods.iter().map(normalize::pod::to_summary).collect())
        })
        .await
    }

    pub async fn get_pod(&self, namespace: &str, name: &str) -> SourceResult<PodDetail> {
        self.observe(ResourceKind::Pod, "get", async {
            let pod = self.sources.pods.get_pod(namespace, name).await?;
            Ok(normalize::pod::to_detail(&pod))
        })
        .await
    }

    /// The accepted job is echoed back
    pub async fn create_job(&self, job: Job) -> SourceResult<Job> {
        self.observe(ResourceKind::Job, "create", async {
            self.sources.pods.create_job(&job.name).await?;
            Ok(job)
        })
        .await
    }

    pub async fn list_local_queues(&self) -> SourceResult<Vec<LocalQueue>> {
        self.observe(ResourceKind::LocalQueue, "list", async {
            let queues = self.sources.local_queues.list_local_queues().await?;
            Ok(queues.iter().map(normalize::local_queue::to_model).collect())
        })
        .await
    }

    pub async fn get_local_queue(&self, namespace: &str, name: &str) -> SourceResult<LocalQueue> {
        self.observe(ResourceKind::LocalQueue, "get", async {
            let queue = self
                .sources
                .local_queues
                .get_local_queue(namespace, name)
                .await?;
            Ok(normalize::local_queue::to_model(&queue))
        })
        .await
    }

    pub async fn create_local_queue(
        &self,
        namespace: &str,
        input: &NewLocalQueue,
    ) -> SourceResult<LocalQueue> {
        self.observe(ResourceKind::LocalQueue, "create", async {
            let native = normalize::local_queue::to_native(namespace, input);
            let created = self.sources.local_queues.create_local_queue(native).await?;
            Ok(normalize::local_queue::to_model(&created))
        })
        .await
    }

    pub async fn delete_local_queue(&self, namespace: &str, name: &str) -> SourceResult<()> {
        self.observe(
            ResourceKind::LocalQueue,
            "delete",
            self.sources.local_queues.delete_local_queue(namespace, name),
        )
        .await
    }

    pub async fn list_resource_flavors(&self) -> SourceResult<Vec<ResourceFlavor>> {
        self.observe(ResourceKind::ResourceFlavor, "list", async {
            let flavors = self.sources.flavors.list_resource_flavors().await?;
            Ok(flavors
                .iter()
                .map(normalize::resource_flavor::to_model)
                .collect())
        })
        .await
    }

    pub async fn get_resource_flavor(&self, name: &str) -> SourceResult<ResourceFlavor> {
        self.observe(ResourceKind::ResourceFlavor, "get", async {
            let flavor = self.sources.flavors.get_resource_flavor(name).await?;
            Ok(normalize::resource_flavor::to_model(&flavor))
        })
        .await
    }

    pub async fn create_resource_flavor(
        &self,
        input: &ResourceFlavor,
    ) -> SourceResult<ResourceFlavor> {
        self.observe(ResourceKind::ResourceFlavor, "create", async {
            let native = normalize::resource_flavor::to_native(input);
            let created = self.sources.flavors.create_resource_flavor(native).await?;
            Ok(normalize::resource_flavor::to_model(&created))
        })
        .await
    }

    pub async fn delete_resource_flavor(&self, name: &str) -> SourceResult<()> {
        self.observe(
            ResourceKind::ResourceFlavor,
            "delete",
            self.sources.flavors.delete_resource_flavor(name),
        )
        .await
    }

    pub async fn list_parent_queues(&self) -> SourceResult<Vec<ParentQueue>> {
        self.observe(ResourceKind::Queue, "list", async {
            let queues = self.sources.queues.list_queues().await?;
            Ok(QueueHierarchy::build(&queues).into_parents())
        })
        .await
    }

    /// Not-found only when no top-level queue carries `parent`
    pub async fn child_queues(&self, parent: &str) -> SourceResult<Vec<ChildQueue>> {
        self.observe(ResourceKind::Queue, "children", async {
            let queues = self.sources.queues.list_queues().await?;
            QueueHierarchy::build(&queues).child_queues(parent)
        })
        .await
    }
}

impl std::fmt::Debug for ClusterView {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClusterView")
            .field("kind", &self.sources.kind)
            .finish()
    }
}
