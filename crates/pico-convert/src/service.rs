//! Service extraction: service type and primary port

use pico_core::HelmValues;

use crate::error::{ExtractionLog, WarningCategory};
use crate::manifest::{Manifest, ManifestKind};

const KIND: ManifestKind = ManifestKind::Service;

/// Overlay a Service manifest onto `values`
pub fn apply(manifest: &Manifest, values: &mut HelmValues, log: &mut ExtractionLog) {
    let spec = manifest.root().get("spec");

    if let Some(service_type) = spec.get("type").as_str() {
        values.service.service_type = service_type.to_string();
        log.applied(KIND, "spec.type", "service.type");
    }

    let Some(port) = spec.get("ports").first().get("port").as_i64() else {
        return;
    };

    match u16::try_from(port) {
        Ok(port) if port > 0 => {
            values.service.port = port;
            log.applied(KIND, "spec.ports[0].port", "service.port");
        }
        _ => log.warn(
            manifest
                .warning(
                    "spec.ports[0].port",
                    format!("port {port} is out of range, default is kept"),
                )
                .with_category(WarningCategory::SkippedEntry),
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn convert(content: &str) -> (HelmValues, ExtractionLog) {
        let mut log = ExtractionLog::new();
        let manifest = Manifest::parse(KIND, "service.yaml", content, &mut log).unwrap();
        let mut values = HelmValues::defaults();
        apply(&manifest, &mut values, &mut log);
        (values, log)
    }

    #[test]
    fn test_type_and_port() {
        let content = r#"
apiVersion: v1
kind: Service
spec:
  type: NodePort
  ports:
    - name: http
      port: 8080
      targetPort: 8080
    - name: metrics
      port: 9090
"#;
        let (values, log) = convert(content);

        assert_eq!(values.service.service_type, "NodePort");
        assert_eq!(values.service.port, 8080);
        assert_eq!(values.service.name, "80-tcp");
        assert_eq!(
            log.targets_for(KIND),
            vec!["service.type", "service.port"]
        );
    }

    #[test]
    fn test_type_only() {
        let (values, _) = convert("kind: Service\nspec:\n  type: LoadBalancer\n");

        assert_eq!(values.service.service_type, "LoadBalancer");
        assert_eq!(values.service.port, 80);
    }

    #[test]
    fn test_port_only() {
        let (values, _) = convert("kind: Service\nspec:\n  ports:\n    - port: 443\n");

        assert_eq!(values.service.service_type, "ClusterIP");
        assert_eq!(values.service.port, 443);
    }

    #[test]
    fn test_mistyped_fields_keep_defaults() {
        let content = r#"
kind: Service
spec:
  type: 12
  ports:
    port: 8080
"#;
        let (values, log) = convert(content);

        assert_eq!(values, HelmValues::defaults());
        assert!(log.applied.is_empty());
    }

    #[test]
    fn test_string_port_keeps_default() {
        let (values, _) = convert("kind: Service\nspec:\n  ports:\n    - port: \"8080\"\n");
        assert_eq!(values.service.port, 80);
    }

    #[test]
    fn test_out_of_range_port_is_reported() {
        let (values, log) = convert("kind: Service\nspec:\n  ports:\n    - port: 70000\n");

        assert_eq!(values.service.port, 80);
        assert_eq!(log.warnings.len(), 1);
        assert!(log.warnings[0].message.contains("70000"));
    }

    #[test]
    fn test_no_spec() {
        let (values, log) = convert("kind: Service\nmetadata:\n  name: web\n");

        assert_eq!(values, HelmValues::defaults());
        assert!(log.warnings.is_empty());
    }
}
