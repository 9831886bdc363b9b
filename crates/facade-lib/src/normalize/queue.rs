//! Hierarchical scheduler queue mapper
//!
//! A flat queue list is split in one pass into parents (empty parent
//! reference) and children grouped under the parent name they reference.

use std::collections::HashMap;

use crate::crd;
use crate::error::{ResourceKind, SourceError};
use crate::models::{ChildQueue, ParentQueue, QueueResource, QueueResources};

#[derive(Debug, Default)]
pub struct QueueHierarchy {
    parents: Vec<ParentQueue>,
    children: HashMap<String, Vec<ChildQueue>>,
}

impl QueueHierarchy {
    pub fn build(queues: &[crd::Queue]) -> Self {
        let mut hierarchy = Self::default();

        for queue in queues {
            let name = queue.metadata.name.clone().unwrap_or_default();
            let resources = resources(queue.spec.resources.as_ref());
            let parent = &queue.spec.parent_queue;

            if parent.is_empty() {
                hierarchy.parents.push(ParentQueue {
                    child_queues: queue
                        .status
                        .as_ref()
                        .map(|s| s.child_queues.clone())
                        .unwrap_or_default(),
                    name,
                    resources,
                });
            } else {
                hierarchy
                    .children
                    .entry(parent.clone())
                    .or_default()
                    .push(ChildQueue {
                        name,
                        parent: parent.clone(),
                        resources,
                    });
            }
        }

        hierarchy
    }

    pub fn parents(&self) -> &[ParentQueue] {
        &self.parents
    }

    pub fn into_parents(self) -> Vec<ParentQueue> {
        self.parents
    }

    /// Children of an existing parent; an unknown parent is not-found
    pub fn child_queues(mut self, parent: &str) -> Result<Vec<ChildQueue>, SourceError> {
        if !self.parents.iter().any(|p| p.name == parent) {
            return Err(SourceError::not_found(ResourceKind::Queue, parent));
        }
        Ok(self.children.remove(parent).unwrap_or_default())
    }
}

fn resources(native: Option<&crd::QueueResources>) -> QueueResources {
    native
        .map(|r| QueueResources {
            cpu: resource(&r.cpu),
            gpu: resource(&r.gpu),
            memory: r.memory.as_ref().map(resource),
        })
        .unwrap_or_default()
}

fn resource(r: &crd::QueueResource) -> QueueResource {
    QueueResource {
        limit: r.limit,
        over_quota_weight: r.over_quota_weight,
        quota: r.quota,
    }
}
