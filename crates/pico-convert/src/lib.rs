//! Pico Convert - Kubernetes manifests to Helm values converter
//!
//! This crate reads a Deployment, a Service and an OpenShift Route and
//! projects a fixed set of their fields onto a Helm `values.yaml`.
//!
//! | Manifest field                                  | Values key             |
//! |-------------------------------------------------|------------------------|
//! | `spec.replicas`                                 | `replicaCount`         |
//! | `containers[0].image` (after `:`)               | `image.tag`            |
//! | `containers[0].env` / `envFrom`                 | `env` / `envFrom`      |
//! | `containers[0].resources`, probes, `volumeMounts` | same name            |
//! | pod `securityContext`                           | `podSecurityContext`   |
//! | pod `volumes`, `nodeSelector`, `tolerations`, `affinity` | same name     |
//! | Service `spec.type`, `spec.ports[0].port`       | `service.type` / `service.port` |
//! | Route `spec.host`, `spec.to.name`               | `ingress.hosts`        |
//!
//! Extraction is tolerant: a missing or mistyped field only leaves its
//! default in place. Only unreadable or unparsable files fail a run.
//!
//! # Example
//!
//! ```no_run
//! use pico_convert::{ConvertOptions, ManifestPaths, convert_with_options};
//!
//! let paths = ManifestPaths::from_args(["./deployment.yaml", "./service.yaml"]);
//!
//! let result = convert_with_options(&paths, ConvertOptions {
//!     dry_run: true,
//!     ..Default::default()
//! }).unwrap();
//!
//! println!("{}", result.rendered);
//!
//! for warning in &result.warnings {
//!     println!("{}", warning);
//! }
//! ```

pub mod converter;
pub mod deployment;
pub mod error;
pub mod manifest;
pub mod route;
pub mod service;

// Re-exports
pub use converter::{
    ConversionResult, ConvertOptions, Converter, DEFAULT_OUTPUT, Extraction, ManifestPaths,
    apply_manifest, convert, convert_with_options,
};
pub use error::{
    AppliedField, ConversionWarning, ConvertError, ExtractionLog, Result, WarningCategory,
    WarningSeverity,
};
pub use manifest::{Manifest, ManifestKind};
