//! Write-body validation
//!
//! Each write endpoint has its own schema check over the raw JSON object.
//! The first violated constraint is reported. Job creation accepts exactly
//! one field; queue and flavor creation ignore unknown fields.

use serde_json::{Map, Value};
use std::collections::BTreeMap;
use thiserror::Error;

use crate::models::{Job, NewLocalQueue, ResourceFlavor, Taint, Toleration};

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("request must contain only '{0}' field")]
    UnexpectedFields(&'static str),

    #[error("field '{0}' is required")]
    MissingField(&'static str),

    #[error("field '{field}' must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("field '{0}' cannot be empty")]
    EmptyField(&'static str),

    #[error("{field} {what} must be {expected}")]
    WrongItemType {
        field: &'static str,
        what: &'static str,
        expected: &'static str,
    },
}

type Result<T> = std::result::Result<T, ValidationError>;

fn required_string(body: &JsonObject, field: &'static str) -> Result<String> {
    let value = body.get(field).ok_or(ValidationError::MissingField(field))?;
    let s = value.as_str().ok_or(ValidationError::WrongType {
        field,
        expected: "a string",
    })?;
    if s.is_empty() {
        return Err(ValidationError::EmptyField(field));
    }
    Ok(s.to_string())
}

/// Present strings are kept; an empty string counts as absent
fn optional_string(body: &JsonObject, field: &'static str) -> Result<Option<String>> {
    match body.get(field) {
        None => Ok(None),
        Some(value) => value
            .as_str()
            .map(|s| (!s.is_empty()).then(|| s.to_string()))
            .ok_or(ValidationError::WrongType {
                field,
                expected: "a string",
            }),
    }
}

fn optional_array<'a>(body: &'a JsonObject, field: &'static str) -> Result<&'a [Value]> {
    match body.get(field) {
        None => Ok(&[]),
        Some(value) => value
            .as_array()
            .map(Vec::as_slice)
            .ok_or(ValidationError::WrongType {
                field,
                expected: "an array",
            }),
    }
}

fn item_objects<'a>(
    items: &'a [Value],
    field: &'static str,
) -> Result<impl Iterator<Item = &'a JsonObject>> {
    if items.iter().any(|item| !item.is_object()) {
        return Err(ValidationError::WrongItemType {
            field,
            what: "items",
            expected: "objects",
        });
    }
    Ok(items.iter().filter_map(Value::as_object))
}

// Non-string values of known item keys are ignored
fn lenient_string(object: &JsonObject, key: &str) -> Option<String> {
    object.get(key).and_then(Value::as_str).map(str::to_string)
}

pub fn validate_job(body: &JsonObject) -> Result<Job> {
    if body.len() != 1 {
        return Err(ValidationError::UnexpectedFields("name"));
    }

    Ok(Job {
        name: required_string(body, "name")?,
    })
}

pub fn validate_local_queue(body: &JsonObject) -> Result<NewLocalQueue> {
    Ok(NewLocalQueue {
        name: required_string(body, "name")?,
        cluster_queue: required_string(body, "clusterQueue")?,
        stop_policy: optional_string(body, "stopPolicy")?,
    })
}

pub fn validate_resource_flavor(body: &JsonObject) -> Result<ResourceFlavor> {
    let name = required_string(body, "name")?;

    let node_labels = match body.get("nodeLabels") {
        None => BTreeMap::new(),
        Some(value) => {
            let labels = value.as_object().ok_or(ValidationError::WrongType {
                field: "nodeLabels",
                expected: "an object",
            })?;
            labels
                .iter()
                .map(|(k, v)| {
                    v.as_str().map(|s| (k.clone(), s.to_string())).ok_or(
                        ValidationError::WrongItemType {
                            field: "nodeLabels",
                            what: "values",
                            expected: "strings",
                        },
                    )
                })
                .collect::<Result<_>>()?
        }
    };

    let node_taints = item_objects(optional_array(body, "nodeTaints")?, "nodeTaints")?
        .map(|t| Taint {
            effect: lenient_string(t, "effect").unwrap_or_default(),
            key: lenient_string(t, "key").unwrap_or_default(),
            time_added: None,
            value: lenient_string(t, "value"),
        })
        .collect();

    let tolerations = item_objects(optional_array(body, "tolerations")?, "tolerations")?
        .map(|t| -> Result<Toleration> {
            let toleration_seconds = match t.get("tolerationSeconds") {
                None | Some(Value::Null) => None,
                Some(v) => Some(v.as_i64().ok_or(ValidationError::WrongItemType {
                    field: "tolerations",
                    what: "tolerationSeconds",
                    expected: "an integer",
                })?),
            };
            Ok(Toleration {
                effect: lenient_string(t, "effect"),
                key: lenient_string(t, "key"),
                operator: lenient_string(t, "operator"),
                toleration_seconds,
                value: lenient_string(t, "value"),
            })
        })
        .collect::<Result<_>>()?;

    Ok(ResourceFlavor {
        name,
        node_labels,
        node_taints,
        tolerations,
        topology_name: optional_string(body, "topologyName")?,
    })
}
