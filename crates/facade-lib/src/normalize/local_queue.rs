//! LocalQueue mapper

use super::format_time;
use crate::crd::{self, LocalQueueSpec};
use crate::models::{Condition, FlavorUsage, LocalQueue, NewLocalQueue, ResourceUsage};

pub fn to_model(lq: &crd::LocalQueue) -> LocalQueue {
    let status = lq.status.clone().unwrap_or_default();

    LocalQueue {
        admitted_workloads: status.admitted_workloads,
        cluster_queue: lq.spec.cluster_queue.clone(),
        conditions: status
            .conditions
            .iter()
            .map(|c| Condition {
                last_transition_time: format_time(&c.last_transition_time),
                message: c.message.clone(),
                observed_generation: c.observed_generation,
                reason: c.reason.clone(),
                status: c.status.clone(),
                type_: c.type_.clone(),
            })
            .collect(),
        flavors_reservation: flavor_usage(&status.flavors_reservation),
        flavors_usage: flavor_usage(&status.flavors_usage),
        name: lq.metadata.name.clone().unwrap_or_default(),
        namespace: lq.metadata.namespace.clone().unwrap_or_default(),
        pending_workloads: status.pending_workloads,
        reserving_workloads: status.reserving_workloads,
        stop_policy: lq.spec.stop_policy.clone().filter(|p| !p.is_empty()),
    }
}

fn flavor_usage(usages: &[crd::LocalQueueFlavorUsage]) -> Vec<FlavorUsage> {
    usages
        .iter()
        .map(|f| FlavorUsage {
            name: f.name.clone(),
            resources: f
                .resources
                .iter()
                .map(|r| ResourceUsage {
                    name: r.name.clone(),
                    total: r.total.0.clone(),
                })
                .collect(),
        })
        .collect()
}

/// Native write payload; an absent stop policy stays absent
pub fn to_native(namespace: &str, input: &NewLocalQueue) -> crd::LocalQueue {
    let mut lq = crd::LocalQueue::new(
        &input.name,
        LocalQueueSpec {
            cluster_queue: input.cluster_queue.clone(),
            stop_policy: input.stop_policy.clone(),
        },
    );
    lq.metadata.namespace = Some(namespace.to_string());
    lq
}
