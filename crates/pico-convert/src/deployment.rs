//! Deployment extraction
//!
//! Reads replica count, the primary container and the pod template of a
//! Deployment and overlays them onto the values. Only the first container
//! of the pod template is examined; any others are reported and ignored.
//!
//! Every step is independent: a missing or mistyped field leaves the
//! corresponding value untouched and the remaining steps still run.

use pico_core::{
    COLLECTORD_INDEX, COLLECTORD_OUTPUT, EnvFromSource, EnvVar, HelmValues, NameRef, Node,
};
use serde_yaml::{Mapping, Value};

use crate::error::{ExtractionLog, WarningCategory};
use crate::manifest::{Manifest, ManifestKind};

const KIND: ManifestKind = ManifestKind::Deployment;

const POD_SPEC: &str = "spec.template.spec";
const CONTAINER: &str = "spec.template.spec.containers[0]";

/// Overlay a Deployment manifest onto `values`
pub fn apply(manifest: &Manifest, values: &mut HelmValues, log: &mut ExtractionLog) {
    let root = manifest.root();

    if let Some(replicas) = root
        .path("spec.replicas")
        .as_i64()
        .and_then(|r| i32::try_from(r).ok())
    {
        values.replica_count = replicas;
        log.applied(KIND, "spec.replicas", "replicaCount");
    }

    let pod = root.path(POD_SPEC);
    let containers = pod.get("containers");

    let container = containers.first();
    if container.as_mapping().is_some() {
        apply_container(manifest, container, values, log);
    }
    report_ignored_containers(manifest, containers, log);

    apply_pod_spec(pod, values, log);
    apply_metadata(root.get("metadata"), values, log);
}

fn apply_container(
    manifest: &Manifest,
    container: Node<'_>,
    values: &mut HelmValues,
    log: &mut ExtractionLog,
) {
    if let Some(tag) = container.get("image").as_str().and_then(image_tag) {
        values.image.tag = tag.to_string();
        log.applied(KIND, format!("{CONTAINER}.image"), "image.tag");
    }

    let mappings: [(&str, &'static str, &mut Mapping); 4] = [
        ("resources", "resources", &mut values.resources),
        ("securityContext", "securityContext", &mut values.security_context),
        ("livenessProbe", "livenessProbe", &mut values.liveness_probe),
        ("readinessProbe", "readinessProbe", &mut values.readiness_probe),
    ];
    for (field, target, slot) in mappings {
        if let Some(mapping) = container.get(field).mapping() {
            *slot = mapping;
            log.applied(KIND, format!("{CONTAINER}.{field}"), target);
        }
    }

    if let Some(mounts) = container.get("volumeMounts").sequence() {
        values.volume_mounts = mounts;
        log.applied(KIND, format!("{CONTAINER}.volumeMounts"), "volumeMounts");
    }

    let env = extract_env(manifest, container.get("env"), log);
    if !env.is_empty() {
        values.env.extend(env);
        log.applied(KIND, format!("{CONTAINER}.env"), "env");
    }

    let env_from = extract_env_from(manifest, container.get("envFrom"), log);
    if !env_from.is_empty() {
        values.env_from.extend(env_from);
        log.applied(KIND, format!("{CONTAINER}.envFrom"), "envFrom");
    }
}

/// Tag part of an image reference: the segment after the first `:`
///
/// `registry:5000/app:v1` yields `5000/app`.
fn image_tag(image: &str) -> Option<&str> {
    image.split(':').nth(1).filter(|tag| !tag.is_empty())
}

/// Build env entries; literal `value` wins over `valueFrom`
fn extract_env(manifest: &Manifest, env: Node<'_>, log: &mut ExtractionLog) -> Vec<EnvVar> {
    let mut entries = Vec::new();

    for (i, item) in env.items().enumerate() {
        let field = format!("{CONTAINER}.env[{i}]");

        let Some(name) = item.get("name").as_str().filter(|name| !name.is_empty()) else {
            log.warn(
                manifest
                    .warning(field, "env entry has no name, skipped")
                    .with_category(WarningCategory::SkippedEntry),
            );
            continue;
        };

        let value = item.get("value").as_scalar();
        let value_from = item.get("valueFrom").mapping();

        let entry = match (value, value_from) {
            (Some(value), Some(_)) => {
                log.warn(manifest.note(
                    field,
                    format!("env {name} sets both value and valueFrom, keeping value"),
                ));
                EnvVar::literal(name, value.clone())
            }
            (Some(value), None) => EnvVar::literal(name, value.clone()),
            (None, Some(value_from)) => EnvVar::from_source(name, value_from),
            (None, None) => EnvVar::named(name),
        };

        entries.push(entry);
    }

    entries
}

/// Reduce `configMapRef` / `secretRef` entries to the referenced names
fn extract_env_from(
    manifest: &Manifest,
    env_from: Node<'_>,
    log: &mut ExtractionLog,
) -> Vec<EnvFromSource> {
    let mut entries = Vec::new();

    for (i, item) in env_from.items().enumerate() {
        let source = EnvFromSource {
            config_map_ref: name_ref(item.get("configMapRef")),
            secret_ref: name_ref(item.get("secretRef")),
        };

        if source.is_empty() {
            log.warn(
                manifest
                    .warning(
                        format!("{CONTAINER}.envFrom[{i}]"),
                        "envFrom entry has no named configMapRef or secretRef, skipped",
                    )
                    .with_category(WarningCategory::SkippedEntry),
            );
            continue;
        }

        entries.push(source);
    }

    entries
}

fn name_ref(reference: Node<'_>) -> Option<NameRef> {
    reference.get("name").as_str().map(NameRef::new)
}

fn report_ignored_containers(manifest: &Manifest, containers: Node<'_>, log: &mut ExtractionLog) {
    let ignored: Vec<&str> = containers
        .items()
        .skip(1)
        .map(|container| container.get("name").as_str().unwrap_or("<unnamed>"))
        .collect();

    if ignored.is_empty() {
        return;
    }

    log.warn(
        manifest
            .warning(
                format!("{POD_SPEC}.containers"),
                format!(
                    "only the first container is converted, ignoring: {}",
                    ignored.join(", ")
                ),
            )
            .with_category(WarningCategory::Limitation),
    );
}

fn apply_pod_spec(pod: Node<'_>, values: &mut HelmValues, log: &mut ExtractionLog) {
    if let Some(volumes) = pod.get("volumes").sequence() {
        values.volumes = volumes;
        log.applied(KIND, format!("{POD_SPEC}.volumes"), "volumes");
    }

    if let Some(context) = pod.get("securityContext").mapping() {
        values.pod_security_context = context;
        log.applied(KIND, format!("{POD_SPEC}.securityContext"), "podSecurityContext");
    }

    if let Some(selector) = pod.get("nodeSelector").mapping() {
        values.node_selector = selector;
        log.applied(KIND, format!("{POD_SPEC}.nodeSelector"), "nodeSelector");
    }

    if let Some(tolerations) = pod.get("tolerations").sequence() {
        values.tolerations = tolerations;
        log.applied(KIND, format!("{POD_SPEC}.tolerations"), "tolerations");
    }

    if let Some(affinity) = pod.get("affinity").mapping() {
        values.affinity = affinity;
        log.applied(KIND, format!("{POD_SPEC}.affinity"), "affinity");
    }
}

fn apply_metadata(metadata: Node<'_>, values: &mut HelmValues, log: &mut ExtractionLog) {
    let annotations = metadata.get("annotations");

    for key in [COLLECTORD_INDEX, COLLECTORD_OUTPUT] {
        if let Some(value) = annotations.get(key).value() {
            values
                .deployment_annotations
                .insert(Value::from(key), value.clone());
            log.applied(
                KIND,
                format!("metadata.annotations[{key}]"),
                "deploymentAnnotations",
            );
        }
    }

    if let Some(labels) = metadata.get("labels").mapping() {
        values.deployment_labels = labels;
        log.applied(KIND, "metadata.labels", "deploymentLabels");
    }
}
