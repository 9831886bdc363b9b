//! Node mapper

use k8s_openapi::api::core::v1 as core;
use std::collections::BTreeMap;

use super::{format_time, resource_list};
use crate::models::{
    Node, NodeAddress, NodeCondition, NodeDetail, NodeImage, NodeSystemInfo, Taint,
};

pub const ROLE_LABEL_PREFIX: &str = "node-role.kubernetes.io/";
pub const NO_ROLES: &str = "<none>";

/// Ready iff a `Ready` condition reports exactly `True`
pub fn is_ready(node: &core::Node) -> bool {
    conditions(node)
        .iter()
        .any(|c| c.type_ == "Ready" && c.status == "True")
}

/// Comma-joined role names taken from `node-role.kubernetes.io/<role>` labels
pub fn roles(labels: Option<&BTreeMap<String, String>>) -> String {
    let roles: Vec<&str> = labels
        .into_iter()
        .flat_map(|l| l.keys())
        .filter_map(|key| key.strip_prefix(ROLE_LABEL_PREFIX))
        .filter(|role| !role.is_empty())
        .collect();

    if roles.is_empty() {
        NO_ROLES.to_string()
    } else {
        roles.join(", ")
    }
}

/// First `InternalIP` address, or empty
pub fn internal_ip(node: &core::Node) -> String {
    node.status
        .as_ref()
        .and_then(|s| s.addresses.as_ref())
        .and_then(|addrs| addrs.iter().find(|a| a.type_ == "InternalIP"))
        .map(|a| a.address.clone())
        .unwrap_or_default()
}

fn conditions(node: &core::Node) -> &[core::NodeCondition] {
    node.status
        .as_ref()
        .and_then(|s| s.conditions.as_deref())
        .unwrap_or_default()
}

pub fn to_summary(node: &core::Node) -> Node {
    let status = node.status.as_ref();
    let capacity = resource_list(status.and_then(|s| s.capacity.as_ref()));

    Node {
        cpu: capacity.get("cpu").cloned().unwrap_or_default(),
        ip: internal_ip(node),
        kubelet_version: status
            .and_then(|s| s.node_info.as_ref())
            .map(|i| i.kubelet_version.clone())
            .unwrap_or_default(),
        memory: capacity.get("memory").cloned().unwrap_or_default(),
        name: node.metadata.name.clone().unwrap_or_default(),
        ready: is_ready(node),
        roles: roles(node.metadata.labels.as_ref()),
        uid: node.metadata.uid.clone().unwrap_or_default(),
    }
}

pub fn to_detail(node: &core::Node) -> NodeDetail {
    let meta = &node.metadata;
    let status = node.status.as_ref();
    let spec = node.spec.as_ref();

    NodeDetail {
        addresses: status
            .and_then(|s| s.addresses.as_ref())
            .map(|addrs| {
                addrs
                    .iter()
                    .map(|a| NodeAddress {
                        address: a.address.clone(),
                        type_: a.type_.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        allocatable: resource_list(status.and_then(|s| s.allocatable.as_ref())),
        annotations: meta.annotations.clone().unwrap_or_default(),
        capacity: resource_list(status.and_then(|s| s.capacity.as_ref())),
        conditions: conditions(node).iter().map(condition).collect(),
        creation_timestamp: super::format_time_or_empty(meta.creation_timestamp.as_ref()),
        images: status
            .and_then(|s| s.images.as_ref())
            .map(|images| {
                images
                    .iter()
                    .map(|i| NodeImage {
                        names: i.names.clone().unwrap_or_default(),
                        size_bytes: i.size_bytes,
                    })
                    .collect()
            })
            .unwrap_or_default(),
        labels: meta.labels.clone().unwrap_or_default(),
        name: meta.name.clone().unwrap_or_default(),
        node_info: status
            .and_then(|s| s.node_info.as_ref())
            .map(system_info)
            .unwrap_or_default(),
        pod_cidr: spec.and_then(|s| s.pod_cidr.clone()),
        ready: is_ready(node),
        roles: roles(meta.labels.as_ref()),
        taints: spec
            .and_then(|s| s.taints.as_ref())
            .map(|taints| taints.iter().map(taint).collect())
            .unwrap_or_default(),
        uid: meta.uid.clone().unwrap_or_default(),
    }
}

fn condition(c: &core::NodeCondition) -> NodeCondition {
    NodeCondition {
        last_heartbeat_time: c.last_heartbeat_time.as_ref().map(format_time),
        last_transition_time: c.last_transition_time.as_ref().map(format_time),
        message: c.message.clone(),
        reason: c.reason.clone(),
        status: c.status.clone(),
        type_: c.type_.clone(),
    }
}

fn system_info(info: &core::NodeSystemInfo) -> NodeSystemInfo {
    NodeSystemInfo {
        architecture: info.architecture.clone(),
        boot_id: info.boot_id.clone(),
        container_runtime_version: info.container_runtime_version.clone(),
        kernel_version: info.kernel_version.clone(),
        kube_proxy_version: info.kube_proxy_version.clone(),
        kubelet_version: info.kubelet_version.clone(),
        machine_id: info.machine_id.clone(),
        operating_system: info.operating_system.clone(),
        os_image: info.os_image.clone(),
        system_uuid: info.system_uuid.clone(),
    }
}

/// Shared with resource flavor node taints
pub fn taint(t: &core::Taint) -> Taint {
    Taint {
        effect: t.effect.clone(),
        key: t.key.clone(),
        time_added: t.time_added.as_ref().map(format_time),
        value: t.value.clone(),
    }
}
