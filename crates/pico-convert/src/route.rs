//! Route extraction
//!
//! Supplying a Route at all is what turns ingress on. The route's host and
//! target service name become the single ingress host entry; both fall back
//! to empty strings.

use pico_core::{HelmValues, IngressHost, IngressPath};

use crate::error::ExtractionLog;
use crate::manifest::{Manifest, ManifestKind};

const KIND: ManifestKind = ManifestKind::Route;

/// Overlay a Route manifest onto `values`
pub fn apply(manifest: &Manifest, values: &mut HelmValues, log: &mut ExtractionLog) {
    values.ingress.enabled = true;
    log.applied(KIND, "(route supplied)", "ingress.enabled");

    let spec = manifest.root().get("spec");
    let host = spec.get("host").as_str().unwrap_or_default();
    let service = spec.path("to.name").as_str().unwrap_or_default();

    values.ingress.hosts = vec![IngressHost {
        host: host.to_string(),
        paths: vec![IngressPath {
            path: service.to_string(),
        }],
    }];
    log.applied(KIND, "spec.host", "ingress.hosts");
}
