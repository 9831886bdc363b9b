//! Canonical data models returned to every caller
//!
//! These are the only shapes that leave the normalization layer. Live
//! objects and fixture objects both end up here, field for field.

mod local_queue;
mod node;
mod pod;
mod queue;
mod resource_flavor;

pub use local_queue::{Condition, FlavorUsage, LocalQueue, NewLocalQueue, ResourceUsage};
pub use node::{
    Node, NodeAddress, NodeCondition, NodeDetail, NodeImage, NodeSystemInfo, ResourceList, Taint,
};
pub use pod::{
    ContainerPort, ContainerState, EnvVar, OwnerReference, Pod, PodCondition, PodContainer,
    PodDetail, PodVolume, ResourceRequirements, StatusClass, VolumeMount, VolumeType,
};
pub use queue::{ChildQueue, ParentQueue, QueueResource, QueueResources};
pub use resource_flavor::{ResourceFlavor, Toleration};

use serde::{Deserialize, Serialize};

/// Job creation request and response body
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Job {
    pub name: String,
}
