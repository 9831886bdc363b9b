//! Native custom resources read from the queueing and scheduling subsystems
//!
//! Only the fields the facade projects are modelled; unknown fields are
//! ignored on read and never sent on write. Schema generation is disabled
//! because these CRDs are owned and installed by their upstream projects.

pub mod kai;
pub mod kueue;

pub use kai::{Queue, QueueResource, QueueResources, QueueSpec, QueueStatus};
pub use kueue::{
    LocalQueue, LocalQueueFlavorUsage, LocalQueueResourceUsage, LocalQueueSpec, LocalQueueStatus,
    ResourceFlavor, ResourceFlavorSpec,
};
