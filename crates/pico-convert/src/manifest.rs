//! Loading Kubernetes manifests
//!
//! A manifest file may hold several `---` separated documents. The first
//! document whose `kind` matches the expected kind is used, falling back to
//! the first non-empty document. The chosen document must be a mapping.

use pico_core::{Document, Node};
use serde_yaml::{Mapping, Value};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{ConversionWarning, ConvertError, ExtractionLog, Result};

/// Manifest kinds the converter understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ManifestKind {
    Deployment,
    Service,
    Route,
}

impl ManifestKind {
    /// All kinds, in the order they are applied
    pub const ALL: [ManifestKind; 3] = [Self::Deployment, Self::Service, Self::Route];

    /// Value of the `kind` field in the manifest
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Deployment => "Deployment",
            Self::Service => "Service",
            Self::Route => "Route",
        }
    }

    /// Lowercase label for messages
    pub fn label(&self) -> &'static str {
        match self {
            Self::Deployment => "deployment",
            Self::Service => "service",
            Self::Route => "route",
        }
    }
}

impl fmt::Display for ManifestKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A manifest document selected from a file
#[derive(Debug, Clone)]
pub struct Manifest {
    kind: ManifestKind,
    path: PathBuf,
    document: Document,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(kind: ManifestKind, path: &Path, log: &mut ExtractionLog) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConvertError::Read {
            kind,
            path: path.to_path_buf(),
            source,
        })?;

        tracing::info!(manifest = %kind, path = %path.display(), "loaded manifest");
        Self::parse(kind, path, &content, log)
    }

    /// Parse manifest text; `path` is only used for reporting
    pub fn parse(
        kind: ManifestKind,
        path: impl Into<PathBuf>,
        content: &str,
        log: &mut ExtractionLog,
    ) -> Result<Self> {
        let path = path.into();

        let documents = Document::parse_all(content).map_err(|source| ConvertError::Parse {
            kind,
            path: path.clone(),
            source,
        })?;

        let mut candidates: Vec<Document> =
            documents.into_iter().filter(|doc| !doc.is_empty()).collect();
        let total = candidates.len();

        let matching = candidates
            .iter()
            .position(|doc| doc.kind() == Some(kind.as_str()));

        let selected = match matching {
            Some(pos) => Some((pos, candidates.swap_remove(pos))),
            None => candidates.into_iter().next().map(|doc| (0, doc)),
        };

        let Some((position, document)) = selected else {
            log.warn(ConversionWarning::warning(
                kind,
                path.clone(),
                "document is empty, no fields were read",
            ));
            return Ok(Self {
                kind,
                path,
                document: Document::new(Value::Mapping(Mapping::new())),
            });
        };

        if !document.is_mapping() {
            return Err(ConvertError::MalformedDocument {
                kind,
                path,
                message: "top-level document must be a mapping".to_string(),
            });
        }

        if total > 1 {
            log.warn(ConversionWarning::info(
                kind,
                path.clone(),
                format!("using document {} of {}", position + 1, total),
            ));
        }

        if let Some(found) = document.kind()
            && found != kind.as_str()
        {
            log.warn(ConversionWarning::warning(
                kind,
                path.clone(),
                format!("expected kind {}, found {}", kind.as_str(), found),
            ));
        }

        Ok(Self {
            kind,
            path,
            document,
        })
    }

    pub fn kind(&self) -> ManifestKind {
        self.kind
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    /// Cursor at the document root
    pub fn root(&self) -> Node<'_> {
        self.document.root()
    }

    /// Warning about a field of this manifest
    pub(crate) fn warning(
        &self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> ConversionWarning {
        ConversionWarning::warning(self.kind, self.path.clone(), message).at_field(field)
    }

    /// Informational note about a field of this manifest
    pub(crate) fn note(
        &self,
        field: impl Into<String>,
        message: impl Into<String>,
    ) -> ConversionWarning {
        ConversionWarning::info(self.kind, self.path.clone(), message).at_field(field)
    }
}
