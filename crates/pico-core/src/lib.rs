//! Pico Core - Core types for converting Kubernetes manifests to Helm values
//!
//! This crate provides the foundational types used throughout pico:
//! - `Document` / `Node`: Tolerant, chainable navigation over parsed YAML
//! - `HelmValues`: The `values.yaml` schema with its defaults

pub mod document;
pub mod error;
pub mod values;

pub use document::{Document, Lookup, Node};
pub use error::{CoreError, Result};
pub use values::{
    AutoscalingValues, COLLECTORD_INDEX, COLLECTORD_OUTPUT, DEFAULT_IMAGE_TAG,
    DEFAULT_REPLICA_COUNT, EnvFromSource, EnvVar, HelmValues, ImageValues, IngressHost,
    IngressPath, IngressValues, NameRef, RouteTarget, RouteTls, RouteValues,
    ServiceAccountValues, ServiceValues, VALUES_HEADER,
};
