//! Pod mapper

use k8s_openapi::api::core::v1 as core;

use super::{format_time, format_time_or_empty, resource_list};
use crate::models::{
    ContainerPort, ContainerState, EnvVar, OwnerReference, Pod, PodCondition, PodContainer,
    PodDetail, PodVolume, ResourceRequirements, StatusClass, VolumeMount, VolumeType,
};

/// Placeholder source for volumes that do not reference a named object
const NO_SOURCE: &str = "-";

/// Case-insensitive phase classification; unknown phases are pending
pub fn status_class(phase: &str) -> StatusClass {
    match phase.to_ascii_lowercase().as_str() {
        "running" => StatusClass::Running,
        "succeeded" => StatusClass::Ready,
        "failed" => StatusClass::NotReady,
        _ => StatusClass::Pending,
    }
}

/// Sum of restart counts across all reported container statuses
pub fn restarts(pod: &core::Pod) -> i64 {
    pod.status
        .as_ref()
        .and_then(|s| s.container_statuses.as_ref())
        .map(|statuses| statuses.iter().map(|cs| i64::from(cs.restart_count)).sum())
        .unwrap_or(0)
}

fn phase(pod: &core::Pod) -> String {
    pod.status
        .as_ref()
        .and_then(|s| s.phase.clone())
        .unwrap_or_default()
}

pub fn to_summary(pod: &core::Pod) -> Pod {
    let phase = phase(pod);

    Pod {
        name: pod.metadata.name.clone().unwrap_or_default(),
        namespace: pod.metadata.namespace.clone().unwrap_or_default(),
        node: pod
            .spec
            .as_ref()
            .and_then(|s| s.node_name.clone())
            .unwrap_or_default(),
        pod_ip: pod
            .status
            .as_ref()
            .and_then(|s| s.pod_ip.clone())
            .unwrap_or_default(),
        restarts: restarts(pod),
        status_class: status_class(&phase),
        status: phase,
        uid: pod.metadata.uid.clone().unwrap_or_default(),
    }
}

pub fn to_detail(pod: &core::Pod) -> PodDetail {
    let meta = &pod.metadata;
    let spec = pod.spec.as_ref();
    let status = pod.status.as_ref();
    let phase = phase(pod);

    let container_statuses = status
        .and_then(|s| s.container_statuses.as_deref())
        .unwrap_or_default();
    let init_statuses = status
        .and_then(|s| s.init_container_statuses.as_deref())
        .unwrap_or_default();

    PodDetail {
        annotations: meta.annotations.clone().unwrap_or_default(),
        conditions: status
            .and_then(|s| s.conditions.as_ref())
            .map(|conds| conds.iter().map(condition).collect())
            .unwrap_or_default(),
        containers: spec
            .map(|s| {
                s.containers
                    .iter()
                    .map(|c| container(c, container_statuses))
                    .collect()
            })
            .unwrap_or_default(),
        creation_timestamp: format_time_or_empty(meta.creation_timestamp.as_ref()),
        host_ip: status.and_then(|s| s.host_ip.clone()),
        init_containers: spec
            .and_then(|s| s.init_containers.as_ref())
            .map(|cs| cs.iter().map(|c| container(c, init_statuses)).collect())
            .unwrap_or_default(),
        labels: meta.labels.clone().unwrap_or_default(),
        name: meta.name.clone().unwrap_or_default(),
        namespace: meta.namespace.clone().unwrap_or_default(),
        node: spec.and_then(|s| s.node_name.clone()),
        owner_references: meta
            .owner_references
            .as_ref()
            .map(|refs| {
                refs.iter()
                    .map(|r| OwnerReference {
                        api_version: r.api_version.clone(),
                        kind: r.kind.clone(),
                        name: r.name.clone(),
                        uid: r.uid.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        pod_ip: status.and_then(|s| s.pod_ip.clone()),
        qos_class: status.and_then(|s| s.qos_class.clone()),
        restarts: restarts(pod),
        service_account: spec.and_then(|s| s.service_account_name.clone()),
        status_class: status_class(&phase),
        status: phase,
        uid: meta.uid.clone().unwrap_or_default(),
        volumes: spec
            .and_then(|s| s.volumes.as_ref())
            .map(|vols| vols.iter().map(volume).collect())
            .unwrap_or_default(),
    }
}

/// Map one declared container, joined with the first runtime status of the same name
fn container(c: &core::Container, statuses: &[core::ContainerStatus]) -> PodContainer {
    let runtime = statuses.iter().find(|cs| cs.name == c.name);
    let (state, state_reason) = runtime
        .and_then(|cs| cs.state.as_ref())
        .map(container_state)
        .unwrap_or((None, None));

    PodContainer {
        env: c
            .env
            .as_ref()
            .map(|env| {
                env.iter()
                    .filter(|e| e.value_from.is_none())
                    .map(|e| EnvVar {
                        name: e.name.clone(),
                        value: e.value.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        image: c.image.clone().unwrap_or_default(),
        name: c.name.clone(),
        ports: c
            .ports
            .as_ref()
            .map(|ports| {
                ports
                    .iter()
                    .map(|p| ContainerPort {
                        container_port: p.container_port,
                        host_ip: p.host_ip.clone(),
                        host_port: p.host_port,
                        name: p.name.clone(),
                        protocol: p.protocol.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
        ready: runtime.map(|cs| cs.ready).unwrap_or(false),
        resources: c
            .resources
            .as_ref()
            .map(|r| ResourceRequirements {
                limits: resource_list(r.limits.as_ref()),
                requests: resource_list(r.requests.as_ref()),
            })
            .unwrap_or_default(),
        restart_count: runtime.map(|cs| cs.restart_count).unwrap_or(0),
        state,
        state_reason,
        volume_mounts: c
            .volume_mounts
            .as_ref()
            .map(|mounts| {
                mounts
                    .iter()
                    .map(|m| VolumeMount {
                        mount_path: m.mount_path.clone(),
                        name: m.name.clone(),
                        read_only: m.read_only.unwrap_or(false),
                        sub_path: m.sub_path.clone(),
                    })
                    .collect()
            })
            .unwrap_or_default(),
    }
}

fn container_state(state: &core::ContainerState) -> (Option<ContainerState>, Option<String>) {
    if state.running.is_some() {
        (Some(ContainerState::Running), None)
    } else if let Some(waiting) = &state.waiting {
        (Some(ContainerState::Waiting), waiting.reason.clone())
    } else if let Some(terminated) = &state.terminated {
        (Some(ContainerState::Terminated), terminated.reason.clone())
    } else {
        (None, None)
    }
}

fn condition(c: &core::PodCondition) -> PodCondition {
    PodCondition {
        last_probe_time: c.last_probe_time.as_ref().map(format_time),
        last_transition_time: c.last_transition_time.as_ref().map(format_time),
        message: c.message.clone(),
        reason: c.reason.clone(),
        status: c.status.clone(),
        type_: c.type_.clone(),
    }
}

/// Typed by the first populated source field
fn volume(v: &core::Volume) -> PodVolume {
    let (type_, source) = if let Some(cm) = &v.config_map {
        (VolumeType::ConfigMap, cm.name.clone().unwrap_or_default())
    } else if let Some(secret) = &v.secret {
        (VolumeType::Secret, secret.secret_name.clone().unwrap_or_default())
    } else if let Some(pvc) = &v.persistent_volume_claim {
        (VolumeType::Pvc, pvc.claim_name.clone())
    } else if let Some(host) = &v.host_path {
        (VolumeType::HostPath, host.path.clone())
    } else if v.empty_dir.is_some() {
        (VolumeType::EmptyDir, NO_SOURCE.to_string())
    } else if v.projected.is_some() {
        (VolumeType::Projected, NO_SOURCE.to_string())
    } else {
        (VolumeType::Other, NO_SOURCE.to_string())
    };

    PodVolume {
        name: v.name.clone(),
        source,
        type_,
    }
}
