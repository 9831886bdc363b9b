//! ResourceFlavor mapper

use k8s_openapi::api::core::v1 as core;

use super::node::taint;
use crate::crd::{self, ResourceFlavorSpec};
use crate::models::{ResourceFlavor, Taint, Toleration};

pub fn to_model(rf: &crd::ResourceFlavor) -> ResourceFlavor {
    let spec = &rf.spec;

    ResourceFlavor {
        name: rf.metadata.name.clone().unwrap_or_default(),
        node_labels: spec.node_labels.clone().unwrap_or_default(),
        node_taints: spec
            .node_taints
            .as_ref()
            .map(|taints| taints.iter().map(taint).collect())
            .unwrap_or_default(),
        tolerations: spec
            .tolerations
            .as_ref()
            .map(|tols| tols.iter().map(toleration).collect())
            .unwrap_or_default(),
        topology_name: spec.topology_name.clone(),
    }
}

fn toleration(t: &core::Toleration) -> Toleration {
    Toleration {
        effect: t.effect.clone(),
        key: t.key.clone(),
        operator: t.operator.clone(),
        toleration_seconds: t.toleration_seconds,
        value: t.value.clone(),
    }
}

/// Native write payload; empty collections are not sent
pub fn to_native(input: &ResourceFlavor) -> crd::ResourceFlavor {
    let spec = ResourceFlavorSpec {
        node_labels: (!input.node_labels.is_empty()).then(|| input.node_labels.clone()),
        node_taints: (!input.node_taints.is_empty())
            .then(|| input.node_taints.iter().map(native_taint).collect()),
        tolerations: (!input.tolerations.is_empty()).then(|| {
            input
                .tolerations
                .iter()
                .map(|t| core::Toleration {
                    effect: t.effect.clone(),
                    key: t.key.clone(),
                    operator: t.operator.clone(),
                    toleration_seconds: t.toleration_seconds,
                    value: t.value.clone(),
                })
                .collect()
        }),
        topology_name: input.topology_name.clone(),
    };

    crd::ResourceFlavor::new(&input.name, spec)
}

// timeAdded is server-assigned and never written
fn native_taint(t: &Taint) -> core::Taint {
    core::Taint {
        effect: t.effect.clone(),
        key: t.key.clone(),
        time_added: None,
        value: t.value.clone(),
    }
}
