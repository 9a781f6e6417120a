//! Helm values schema
//!
//! [`HelmValues`] is the document written to `values.yaml`. Fields are
//! declared in output order. Opaque sub-trees copied out of manifests are
//! kept as `serde_yaml` mappings and sequences, which preserve key order, so
//! the rendered output is stable across runs.
//!
//! Some fields exist only so the output matches what the chart templates
//! expect: `imagePullSecrets`, `nameOverride`, `fullnameOverride`,
//! `genericAnnotations`, `route`, `serviceAccount` and `autoscaling` always
//! keep their defaults.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

use crate::error::{CoreError, Result};

/// First line of every generated values file
pub const VALUES_HEADER: &str = "### THIS VALUE FILE MADE BY SRE ALPHA";

pub const DEFAULT_REPLICA_COUNT: i32 = 1;
pub const DEFAULT_IMAGE_TAG: &str = "latest";

/// Reserved deployment annotation keys carried over from the source manifest
pub const COLLECTORD_INDEX: &str = "collectord.io/index";
pub const COLLECTORD_OUTPUT: &str = "collectord.io/output";

/// Values consumed by the chart templates
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HelmValues {
    pub replica_count: i32,
    pub image: ImageValues,
    pub resources: Mapping,
    pub env: Vec<EnvVar>,
    pub env_from: Vec<EnvFromSource>,
    pub volumes: Vec<Value>,
    pub volume_mounts: Vec<Value>,
    pub image_pull_secrets: Vec<Value>,
    pub name_override: String,
    pub fullname_override: String,
    pub generic_annotations: Mapping,
    pub deployment_annotations: Mapping,
    pub deployment_labels: Mapping,
    pub pod_security_context: Mapping,
    pub security_context: Mapping,
    pub route: RouteValues,
    pub service: ServiceValues,
    pub service_account: ServiceAccountValues,
    pub ingress: IngressValues,
    pub liveness_probe: Mapping,
    pub readiness_probe: Mapping,
    pub autoscaling: AutoscalingValues,
    pub node_selector: Mapping,
    pub tolerations: Vec<Value>,
    pub affinity: Mapping,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageValues {
    pub tag: String,
}

/// Container environment variable
///
/// At most one of `value` and `valueFrom` is set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvVar {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value_from: Option<Mapping>,
}

impl EnvVar {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: None,
            value_from: None,
        }
    }

    pub fn literal(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            value: Some(value.into()),
            ..Self::named(name)
        }
    }

    pub fn from_source(name: impl Into<String>, value_from: Mapping) -> Self {
        Self {
            value_from: Some(value_from),
            ..Self::named(name)
        }
    }
}

/// Bulk environment source, reduced to the referenced object names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnvFromSource {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub config_map_ref: Option<NameRef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub secret_ref: Option<NameRef>,
}

impl EnvFromSource {
    pub fn is_empty(&self) -> bool {
        self.config_map_ref.is_none() && self.secret_ref.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NameRef {
    pub name: String,
}

impl NameRef {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// OpenShift route settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteValues {
    pub annotations: Mapping,
    pub tls: RouteTls,
    pub to: RouteTarget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTls {
    pub termination: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteTarget {
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceValues {
    #[serde(rename = "type")]
    pub service_type: String,
    pub name: String,
    pub port: u16,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceAccountValues {
    pub create: bool,
    pub automount: bool,
    pub annotations: Mapping,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IngressValues {
    pub enabled: bool,
    pub class_name: String,
    pub annotations: Mapping,
    pub hosts: Vec<IngressHost>,
    pub tls: Vec<Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressHost {
    pub host: String,
    pub paths: Vec<IngressPath>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngressPath {
    pub path: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutoscalingValues {
    pub enabled: bool,
    pub min_replicas: u32,
    pub max_replicas: u32,
    #[serde(rename = "targetCPUUtilizationPercentage")]
    pub target_cpu_utilization_percentage: u32,
}

impl HelmValues {
    /// Baseline values before any manifest is applied
    ///
    /// Every call builds a fresh instance.
    pub fn defaults() -> Self {
        Self {
            replica_count: DEFAULT_REPLICA_COUNT,
            image: ImageValues {
                tag: DEFAULT_IMAGE_TAG.to_string(),
            },
            resources: Mapping::new(),
            env: Vec::new(),
            env_from: Vec::new(),
            volumes: Vec::new(),
            volume_mounts: Vec::new(),
            image_pull_secrets: Vec::new(),
            name_override: String::new(),
            fullname_override: String::new(),
            generic_annotations: mapping([("enabled", Value::Bool(true))]),
            deployment_annotations: mapping([
                (COLLECTORD_INDEX, Value::Mapping(Mapping::new())),
                (COLLECTORD_OUTPUT, Value::Mapping(Mapping::new())),
            ]),
            deployment_labels: Mapping::new(),
            pod_security_context: Mapping::new(),
            security_context: Mapping::new(),
            route: RouteValues {
                annotations: mapping([(
                    "haproxy.router.openshift.io/balance",
                    Value::from("leastconn"),
                )]),
                tls: RouteTls {
                    termination: "edge".to_string(),
                },
                to: RouteTarget {
                    kind: "Service".to_string(),
                },
            },
            service: ServiceValues {
                service_type: "ClusterIP".to_string(),
                name: "80-tcp".to_string(),
                port: 80,
            },
            service_account: ServiceAccountValues {
                create: true,
                automount: true,
                annotations: Mapping::new(),
                name: String::new(),
            },
            ingress: IngressValues {
                enabled: false,
                class_name: String::new(),
                annotations: Mapping::new(),
                hosts: Vec::new(),
                tls: Vec::new(),
            },
            liveness_probe: Mapping::new(),
            readiness_probe: Mapping::new(),
            autoscaling: AutoscalingValues {
                enabled: false,
                min_replicas: 1,
                max_replicas: 100,
                target_cpu_utilization_percentage: 80,
            },
            node_selector: Mapping::new(),
            tolerations: Vec::new(),
            affinity: Mapping::new(),
        }
    }

    /// Serialize to YAML (2-space indentation)
    pub fn to_yaml(&self) -> Result<String> {
        serde_yaml::to_string(self).map_err(CoreError::Render)
    }

    /// Full `values.yaml` content, header line included
    pub fn render(&self) -> Result<String> {
        let yaml = self.to_yaml()?;
        Ok(format!("{VALUES_HEADER}\n{yaml}"))
    }

    /// Parse a previously rendered values file
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        Ok(serde_yaml::from_str(yaml)?)
    }
}

impl Default for HelmValues {
    fn default() -> Self {
        Self::defaults()
    }
}

fn mapping<const N: usize>(entries: [(&str, Value); N]) -> Mapping {
    entries
        .into_iter()
        .map(|(key, value)| (Value::from(key), value))
        .collect()
}
