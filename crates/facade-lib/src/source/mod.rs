//! Source adapters
//!
//! Every resource family has one capability trait with two implementations:
//! [`LiveSource`] talks to the cluster API, [`MockSource`] reads fixture
//! documents. Both return the same native object types so a single mapper
//! per family serves either backing store.

mod live;
mod mock;

pub use live::{connect, LiveSource};
pub use mock::{FixtureList, MockSource, FIXTURE_FILES};

use k8s_openapi::api::core::v1 as core;
use std::fmt;
use std::path::Path;
use std::sync::Arc;

use crate::crd;
use crate::error::SourceError;

pub use async_trait::async_trait;

pub type SourceResult<T> = Result<T, SourceError>;

/// Node reads
#[async_trait]
pub trait NodeSource: Send + Sync {
    async fn list_nodes(&self) -> SourceResult<Vec<core::Node>>;

    async fn get_node(&self, name: &str) -> SourceResult<core::Node>;
}

/// Pod reads and job creation
#[async_trait]
pub trait PodSource: Send + Sync {
    async fn list_pods(&self) -> SourceResult<Vec<core::Pod>>;

    async fn get_pod(&self, namespace: &str, name: &str) -> SourceResult<core::Pod>;

    /// Start a one-shot job pod with the given name
    async fn create_job(&self, name: &str) -> SourceResult<()>;
}

#[async_trait]
pub trait LocalQueueSource: Send + Sync {
    async fn list_local_queues(&self) -> SourceResult<Vec<crd::LocalQueue>>;

    async fn get_local_queue(&self, namespace: &str, name: &str)
        -> SourceResult<crd::LocalQueue>;

    /// Returns the object as stored after creation
    async fn create_local_queue(&self, queue: crd::LocalQueue) -> SourceResult<crd::LocalQueue>;

    async fn delete_local_queue(&self, namespace: &str, name: &str) -> SourceResult<()>;
}

#[async_trait]
pub trait FlavorSource: Send + Sync {
    async fn list_resource_flavors(&self) -> SourceResult<Vec<crd::ResourceFlavor>>;

    async fn get_resource_flavor(&self, name: &str) -> SourceResult<crd::ResourceFlavor>;

    async fn create_resource_flavor(
        &self,
        flavor: crd::ResourceFlavor,
    ) -> SourceResult<crd::ResourceFlavor>;

    async fn delete_resource_flavor(&self, name: &str) -> SourceResult<()>;
}

/// Hierarchical scheduler queues are read as one flat list
#[async_trait]
pub trait HierarchyQueueSource: Send + Sync {
    async fn list_queues(&self) -> SourceResult<Vec<crd::Queue>>;
}

/// Which backing store serves the process
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Live,
    Mock,
}

impl SourceKind {
    pub fn from_mock_flag(mock: bool) -> Self {
        if mock {
            SourceKind::Mock
        } else {
            SourceKind::Live
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SourceKind::Live => "live",
            SourceKind::Mock => "mock",
        }
    }
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One adapter per resource family, all from the same backing store
#[derive(Clone)]
pub struct Sources {
    pub kind: SourceKind,
    pub nodes: Arc<dyn NodeSource>,
    pub pods: Arc<dyn PodSource>,
    pub local_queues: Arc<dyn LocalQueueSource>,
    pub flavors: Arc<dyn FlavorSource>,
    pub queues: Arc<dyn HierarchyQueueSource>,
}

impl Sources {
    fn from_adapter<S>(kind: SourceKind, adapter: S) -> Self
    where
        S: NodeSource
            + PodSource
            + LocalQueueSource
            + FlavorSource
            + HierarchyQueueSource
            + 'static,
    {
        let adapter = Arc::new(adapter);
        Self {
            kind,
            nodes: adapter.clone(),
            pods: adapter.clone(),
            local_queues: adapter.clone(),
            flavors: adapter.clone(),
            queues: adapter,
        }
    }
}

impl fmt::Debug for Sources {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sources").field("kind", &self.kind).finish()
    }
}

/// Pick every adapter from the same backing store
///
/// `client` is the live cluster client, absent when it failed to initialize.
/// It is ignored in mock mode.
pub fn select(mock: bool, client: Option<kube::Client>, fixtures_dir: &Path) -> Sources {
    match SourceKind::from_mock_flag(mock) {
        SourceKind::Mock => Sources::from_adapter(SourceKind::Mock, MockSource::new(fixtures_dir)),
        SourceKind::Live => Sources::from_adapter(SourceKind::Live, LiveSource::new(client)),
    }
}
