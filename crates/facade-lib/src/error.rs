//! Error taxonomy shared by every source adapter

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

/// Resource families served by the facade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResourceKind {
    Node,
    Pod,
    Job,
    LocalQueue,
    ResourceFlavor,
    Queue,
}

impl ResourceKind {
    /// Stable label used in metrics and structured logs
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::Node => "node",
            ResourceKind::Pod => "pod",
            ResourceKind::Job => "job",
            ResourceKind::LocalQueue => "local_queue",
            ResourceKind::ResourceFlavor => "resource_flavor",
            ResourceKind::Queue => "kai_scheduler_queue",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ResourceKind::Node => "node",
            ResourceKind::Pod => "pod",
            ResourceKind::Job => "job",
            ResourceKind::LocalQueue => "local queue",
            ResourceKind::ResourceFlavor => "resource flavor",
            ResourceKind::Queue => "kai scheduler queue",
        };
        f.write_str(name)
    }
}

/// Errors surfaced by source adapters and propagated unchanged by the mappers
#[derive(Debug, Error)]
pub enum SourceError {
    /// The queried entity does not exist in the backing source
    #[error("{kind} {name} not found")]
    NotFound { kind: ResourceKind, name: String },

    /// The live cluster client failed to initialize at startup
    #[error("cluster client is not available")]
    Unavailable,

    /// The cluster API call failed
    #[error("cluster api error: {0}")]
    Kube(#[from] kube::Error),

    #[error("failed reading fixture {}: {source}", .path.display())]
    FixtureRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed parsing fixture {}: {source}", .path.display())]
    FixtureParse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl SourceError {
    pub fn not_found(kind: ResourceKind, name: impl Into<String>) -> Self {
        SourceError::NotFound {
            kind,
            name: name.into(),
        }
    }

    /// Returns true only for the "entity absent" category
    pub fn is_not_found(&self) -> bool {
        matches!(self, SourceError::NotFound { .. })
    }

    /// Short category label for metrics and logs
    pub fn category(&self) -> &'static str {
        match self {
            SourceError::NotFound { .. } => "not_found",
            SourceError::Unavailable => "unavailable",
            SourceError::Kube(_) => "upstream",
            SourceError::FixtureRead { .. } | SourceError::FixtureParse { .. } => "fixture",
        }
    }
}
