//! Main converter logic
//!
//! Orchestrates one conversion run: build the default values, overlay each
//! supplied manifest in the fixed order Deployment, Service, Route, render,
//! and write `values.yaml`.
//!
//! Nothing is written unless every supplied manifest was read and parsed.
//! The output file is overwritten without confirmation.

use pico_core::HelmValues;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{
    AppliedField, ConversionWarning, ConvertError, ExtractionLog, Result, WarningSeverity,
};
use crate::manifest::{Manifest, ManifestKind};
use crate::{deployment, route, service};

/// Default output file, relative to the working directory
pub const DEFAULT_OUTPUT: &str = "values.yaml";

/// Options for the converter
#[derive(Debug, Clone)]
pub struct ConvertOptions {
    /// Destination file
    pub output: PathBuf,
    /// Only render, do not write
    pub dry_run: bool,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            output: PathBuf::from(DEFAULT_OUTPUT),
            dry_run: false,
        }
    }
}

/// Manifest files supplied for one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ManifestPaths {
    pub deployment: Option<PathBuf>,
    pub service: Option<PathBuf>,
    pub route: Option<PathBuf>,
}

impl ManifestPaths {
    /// Build from positional arguments: deployment, service, route
    ///
    /// Empty arguments leave their slot unset; arguments past the third are
    /// ignored.
    pub fn from_args<I, S>(args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut slots = args.into_iter().map(|arg| {
            let arg = arg.as_ref();
            (!arg.is_empty()).then(|| PathBuf::from(arg))
        });

        Self {
            deployment: slots.next().flatten(),
            service: slots.next().flatten(),
            route: slots.next().flatten(),
        }
    }

    pub fn get(&self, kind: ManifestKind) -> Option<&Path> {
        match kind {
            ManifestKind::Deployment => self.deployment.as_deref(),
            ManifestKind::Service => self.service.as_deref(),
            ManifestKind::Route => self.route.as_deref(),
        }
    }

    /// Supplied manifests, in application order
    pub fn iter(&self) -> impl Iterator<Item = (ManifestKind, &Path)> {
        ManifestKind::ALL
            .into_iter()
            .filter_map(|kind| self.get(kind).map(|path| (kind, path)))
    }

    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }
}

/// Result of a conversion
#[derive(Debug)]
pub struct ConversionResult {
    /// Final values
    pub values: HelmValues,
    /// Rendered `values.yaml` content, header included
    pub rendered: String,
    /// Manifests that were applied, in order
    pub manifests: Vec<(ManifestKind, PathBuf)>,
    /// Fields overlaid from the manifests
    pub applied: Vec<AppliedField>,
    /// Warnings generated during conversion
    pub warnings: Vec<ConversionWarning>,
    /// Where the values were written; `None` on a dry run
    pub written: Option<PathBuf>,
}

/// Values built from the manifests, before rendering
#[derive(Debug)]
pub struct Extraction {
    pub values: HelmValues,
    /// Manifests that were applied, in order
    pub manifests: Vec<(ManifestKind, PathBuf)>,
    pub log: ExtractionLog,
}

/// Convert Kubernetes manifests to Helm values
pub struct Converter {
    options: ConvertOptions,
}

impl Converter {
    pub fn new(options: ConvertOptions) -> Self {
        Self { options }
    }

    /// Run every supplied extractor, then render and write the values
    pub fn convert(&self, paths: &ManifestPaths) -> Result<ConversionResult> {
        let Extraction {
            values,
            manifests,
            log,
        } = self.extract(paths)?;

        tracing::debug!(
            applied = log.applied.len(),
            warnings = log.count_by_severity(WarningSeverity::Warning),
            "extraction finished"
        );

        let rendered = values.render().map_err(ConvertError::Render)?;

        let written = if self.options.dry_run {
            None
        } else {
            write_values(&self.options.output, &rendered)?;
            Some(self.options.output.clone())
        };

        Ok(ConversionResult {
            values,
            rendered,
            manifests,
            applied: log.applied,
            warnings: log.warnings,
            written,
        })
    }

    /// Build the values without rendering or writing anything
    pub fn extract(&self, paths: &ManifestPaths) -> Result<Extraction> {
        let mut values = HelmValues::defaults();
        let mut log = ExtractionLog::new();
        let mut manifests = Vec::new();

        for (kind, path) in paths.iter() {
            let manifest = Manifest::load(kind, path, &mut log)?;
            apply_manifest(&manifest, &mut values, &mut log);
            manifests.push((kind, path.to_path_buf()));
        }

        Ok(Extraction {
            values,
            manifests,
            log,
        })
    }
}

/// Overlay one manifest with the extractor for its kind
pub fn apply_manifest(manifest: &Manifest, values: &mut HelmValues, log: &mut ExtractionLog) {
    match manifest.kind() {
        ManifestKind::Deployment => deployment::apply(manifest, values, log),
        ManifestKind::Service => service::apply(manifest, values, log),
        ManifestKind::Route => route::apply(manifest, values, log),
    }
}

fn write_values(path: &Path, rendered: &str) -> Result<()> {
    fs::write(path, rendered).map_err(|source| ConvertError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "wrote values");
    Ok(())
}

/// Convert with default options, writing `values.yaml` to the working directory
pub fn convert(paths: &ManifestPaths) -> Result<ConversionResult> {
    Converter::new(ConvertOptions::default()).convert(paths)
}

/// Convert with explicit options
pub fn convert_with_options(
    paths: &ManifestPaths,
    options: ConvertOptions,
) -> Result<ConversionResult> {
    Converter::new(options).convert(paths)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pico_core::{EnvVar, VALUES_HEADER};
    use tempfile::TempDir;

    const DEPLOYMENT: &str = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: app
spec:
  replicas: 3
  template:
    spec:
      containers:
        - name: app
          image: app:1.2
          env:
            - name: FOO
              value: bar
"#;

    const SERVICE: &str = r#"
apiVersion: v1
kind: Service
spec:
  type: NodePort
  ports:
    - port: 8080
"#;

    const ROUTE: &str = r#"
kind: Route
spec:
  host: app.example.com
  to:
    kind: Service
    name: app
"#;

    fn write(dir: &TempDir, name: &str, content: &str) -> PathBuf {
        let path = dir.path().join(name);
        fs::write(&path, content).unwrap();
        path
    }

    fn options(dir: &TempDir) -> ConvertOptions {
        ConvertOptions {
            output: dir.path().join("values.yaml"),
            dry_run: false,
        }
    }

    #[test]
    fn test_from_args() {
        let paths = ManifestPaths::from_args(["d.yaml", "", "r.yaml", "extra.yaml"]);

        assert_eq!(paths.deployment, Some(PathBuf::from("d.yaml")));
        assert_eq!(paths.service, None);
        assert_eq!(paths.route, Some(PathBuf::from("r.yaml")));

        let kinds: Vec<_> = paths.iter().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![ManifestKind::Deployment, ManifestKind::Route]);
    }

    #[test]
    fn test_from_no_args() {
        let paths = ManifestPaths::from_args(Vec::<String>::new());
        assert!(paths.is_empty());
        assert!(ManifestPaths::from_args([""]).is_empty());
    }

    #[test]
    fn test_end_to_end() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            deployment: Some(write(&dir, "deployment.yaml", DEPLOYMENT)),
            service: Some(write(&dir, "service.yaml", SERVICE)),
            route: None,
        };

        let result = convert_with_options(&paths, options(&dir)).unwrap();
        let values = &result.values;

        assert_eq!(values.replica_count, 3);
        assert_eq!(values.image.tag, "1.2");
        assert_eq!(values.env, vec![EnvVar::literal("FOO", "bar")]);
        assert_eq!(values.service.service_type, "NodePort");
        assert_eq!(values.service.port, 8080);
        assert!(!values.ingress.enabled);
        assert_eq!(result.manifests.len(), 2);

        let written = fs::read_to_string(dir.path().join("values.yaml")).unwrap();
        assert_eq!(written, result.rendered);
        assert!(written.starts_with(VALUES_HEADER));
        assert_eq!(&HelmValues::from_yaml(&written).unwrap(), values);
    }

    #[test]
    fn test_rendered_document() {
        let deployment = r#"
apiVersion: apps/v1
kind: Deployment
metadata:
  name: web
  labels:
    app: web
  annotations:
    collectord.io/index: web-logs
    unrelated: ignored
spec:
  replicas: 2
  template:
    spec:
      securityContext:
        runAsNonRoot: true
      containers:
        - name: web
          image: web:v2
          env:
            - name: MODE
              value: prod
          envFrom:
            - configMapRef:
                name: web-config
            - secretRef:
                name: web-secret
"#;
        let route = r#"
kind: Route
spec:
  host: web.example.com
  to:
    kind: Service
    name: web
"#;
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            deployment: Some(write(&dir, "deployment.yaml", deployment)),
            service: Some(write(&dir, "service.yaml", SERVICE)),
            route: Some(write(&dir, "route.yaml", route)),
        };

        let result = convert_with_options(&paths, options(&dir)).unwrap();

        let expected = "\
### THIS VALUE FILE MADE BY SRE ALPHA
replicaCount: 2
image:
  tag: v2
resources: {}
env:
- name: MODE
  value: prod
envFrom:
- configMapRef:
    name: web-config
- secretRef:
    name: web-secret
volumes: []
volumeMounts: []
imagePullSecrets: []
nameOverride: ''
fullnameOverride: ''
genericAnnotations:
  enabled: true
deploymentAnnotations:
  collectord.io/index: web-logs
  collectord.io/output: {}
deploymentLabels:
  app: web
podSecurityContext:
  runAsNonRoot: true
securityContext: {}
route:
  annotations:
    haproxy.router.openshift.io/balance: leastconn
  tls:
    termination: edge
  to:
    kind: Service
service:
  type: NodePort
  name: 80-tcp
  port: 8080
serviceAccount:
  create: true
  automount: true
  annotations: {}
  name: ''
ingress:
  enabled: true
  className: ''
  annotations: {}
  hosts:
  - host: web.example.com
    paths:
    - path: web
  tls: []
livenessProbe: {}
readinessProbe: {}
autoscaling:
  enabled: false
  minReplicas: 1
  maxReplicas: 100
  targetCPUUtilizationPercentage: 80
nodeSelector: {}
tolerations: []
affinity: {}
";
        assert_eq!(result.rendered, expected);
        assert_eq!(
            fs::read_to_string(dir.path().join("values.yaml")).unwrap(),
            expected
        );
    }

    #[test]
    fn test_deployment_only_keeps_service_and_ingress_defaults() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            deployment: Some(write(&dir, "deployment.yaml", DEPLOYMENT)),
            ..Default::default()
        };

        let result = convert_with_options(&paths, options(&dir)).unwrap();

        assert_eq!(result.values.service.port, 80);
        assert!(!result.values.ingress.enabled);
    }

    #[test]
    fn test_route_is_applied_last() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            deployment: Some(write(&dir, "deployment.yaml", DEPLOYMENT)),
            service: Some(write(&dir, "service.yaml", SERVICE)),
            route: Some(write(&dir, "route.yaml", ROUTE)),
        };

        let result = convert_with_options(&paths, options(&dir)).unwrap();

        assert!(result.values.ingress.enabled);
        assert_eq!(result.values.ingress.hosts.len(), 1);
        assert_eq!(result.values.ingress.hosts[0].host, "app.example.com");
        assert_eq!(
            result.manifests.last().map(|(kind, _)| *kind),
            Some(ManifestKind::Route)
        );
    }

    #[test]
    fn test_conversion_is_idempotent() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            deployment: Some(write(&dir, "deployment.yaml", DEPLOYMENT)),
            service: Some(write(&dir, "service.yaml", SERVICE)),
            route: Some(write(&dir, "route.yaml", ROUTE)),
        };

        convert_with_options(&paths, options(&dir)).unwrap();
        let first = fs::read(dir.path().join("values.yaml")).unwrap();

        convert_with_options(&paths, options(&dir)).unwrap();
        let second = fs::read(dir.path().join("values.yaml")).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn test_malformed_service_aborts_without_writing() {
        let dir = TempDir::new().unwrap();
        let output = dir.path().join("values.yaml");
        fs::write(&output, "previous content\n").unwrap();

        let paths = ManifestPaths {
            deployment: Some(write(&dir, "deployment.yaml", DEPLOYMENT)),
            service: Some(write(&dir, "service.yaml", "spec: [unclosed\n")),
            route: None,
        };

        let err = convert_with_options(&paths, options(&dir)).unwrap_err();

        assert!(matches!(
            err,
            ConvertError::Parse {
                kind: ManifestKind::Service,
                ..
            }
        ));
        assert_eq!(fs::read_to_string(&output).unwrap(), "previous content\n");
    }

    #[test]
    fn test_missing_file_aborts_without_writing() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            deployment: Some(dir.path().join("nope.yaml")),
            ..Default::default()
        };

        let err = convert_with_options(&paths, options(&dir)).unwrap_err();

        assert!(matches!(err, ConvertError::Read { .. }));
        assert!(!dir.path().join("values.yaml").exists());
    }

    #[test]
    fn test_dry_run_writes_nothing() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            service: Some(write(&dir, "service.yaml", SERVICE)),
            ..Default::default()
        };

        let result = convert_with_options(
            &paths,
            ConvertOptions {
                dry_run: true,
                ..options(&dir)
            },
        )
        .unwrap();

        assert!(result.written.is_none());
        assert!(result.rendered.contains("type: NodePort"));
        assert!(!dir.path().join("values.yaml").exists());
    }

    #[test]
    fn test_unwritable_output() {
        let dir = TempDir::new().unwrap();
        let paths = ManifestPaths {
            service: Some(write(&dir, "service.yaml", SERVICE)),
            ..Default::default()
        };

        let err = convert_with_options(
            &paths,
            ConvertOptions {
                output: dir.path().join("missing-dir").join("values.yaml"),
                dry_run: false,
            },
        )
        .unwrap_err();

        assert!(matches!(err, ConvertError::Write { .. }));
    }

    #[test]
    fn test_no_manifests_renders_defaults() {
        let converter = Converter::new(ConvertOptions::default());
        let extraction = converter.extract(&ManifestPaths::default()).unwrap();

        assert_eq!(extraction.values, HelmValues::defaults());
        assert!(extraction.manifests.is_empty());
        assert!(extraction.log.applied.is_empty());
    }
}
