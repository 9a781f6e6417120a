//! Error and warning types for the converter
//!
//! Hard errors abort the whole run. Everything that can be recovered from
//! (a missing field, a malformed list entry, an ignored container) is
//! reported as a [`ConversionWarning`] instead.

use std::path::PathBuf;
use thiserror::Error;

use crate::manifest::ManifestKind;

/// Converter error
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("Failed to read {kind} manifest {}: {source}", .path.display())]
    Read {
        kind: ManifestKind,
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse {kind} manifest {}: {source}", .path.display())]
    Parse {
        kind: ManifestKind,
        path: PathBuf,
        source: pico_core::CoreError,
    },

    #[error("Malformed {kind} manifest {}: {message}", .path.display())]
    MalformedDocument {
        kind: ManifestKind,
        path: PathBuf,
        message: String,
    },

    #[error("Failed to render values: {0}")]
    Render(#[source] pico_core::CoreError),

    #[error("Failed to write {}: {source}", .path.display())]
    Write {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Result type for conversion operations
pub type Result<T> = std::result::Result<T, ConvertError>;

// =============================================================================
// WARNING SYSTEM
// =============================================================================

/// Warning severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum WarningSeverity {
    /// Informational - conversion succeeded, nothing to review
    Info,
    /// Warning - part of the manifest was not carried over
    Warning,
}

impl WarningSeverity {
    /// Get the icon for this severity
    pub fn icon(&self) -> &'static str {
        match self {
            Self::Info => "ℹ",
            Self::Warning => "⚠",
        }
    }

    /// Get the label for this severity
    pub fn label(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warning => "warning",
        }
    }
}

/// Warning category for grouping related warnings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarningCategory {
    /// A list entry was dropped because it was malformed
    SkippedEntry,
    /// Source data the converter deliberately does not look at
    Limitation,
    /// Something about the document as a whole (kind, emptiness)
    Document,
}

impl WarningCategory {
    /// Get the display label
    pub fn label(&self) -> &'static str {
        match self {
            Self::SkippedEntry => "skipped",
            Self::Limitation => "limitation",
            Self::Document => "document",
        }
    }
}

/// Warning tied to a manifest and, when relevant, a field inside it
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversionWarning {
    pub severity: WarningSeverity,
    pub category: WarningCategory,
    /// Manifest kind the warning is about
    pub kind: ManifestKind,
    /// Manifest file
    pub file: PathBuf,
    /// Path of the field inside the manifest
    pub field: Option<String>,
    /// Human-readable message
    pub message: String,
}

impl ConversionWarning {
    /// Create an info-level note
    pub fn info(kind: ManifestKind, file: PathBuf, message: impl Into<String>) -> Self {
        Self {
            severity: WarningSeverity::Info,
            category: WarningCategory::Document,
            kind,
            file,
            field: None,
            message: message.into(),
        }
    }

    /// Create a warning-level note
    pub fn warning(kind: ManifestKind, file: PathBuf, message: impl Into<String>) -> Self {
        Self {
            severity: WarningSeverity::Warning,
            category: WarningCategory::Document,
            kind,
            file,
            field: None,
            message: message.into(),
        }
    }

    /// Attach the field path
    pub fn at_field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    /// Set category
    pub fn with_category(mut self, category: WarningCategory) -> Self {
        self.category = category;
        self
    }
}

impl std::fmt::Display for ConversionWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: [severity] file (field) - message
        write!(f, "[{}] {}", self.severity.label(), self.file.display())?;

        if let Some(ref field) = self.field {
            write!(f, " ({})", field)?;
        }

        write!(f, " - {}", self.message)
    }
}

// =============================================================================
// EXTRACTION LOG
// =============================================================================

/// A values field that was overlaid from a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppliedField {
    pub kind: ManifestKind,
    /// Field path inside the manifest
    pub source: String,
    /// Key in the values document
    pub target: &'static str,
}

/// Record of what the extractors did during one run
#[derive(Debug, Default)]
pub struct ExtractionLog {
    pub applied: Vec<AppliedField>,
    pub warnings: Vec<ConversionWarning>,
}

impl ExtractionLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an overlaid field
    pub fn applied(&mut self, kind: ManifestKind, source: impl Into<String>, target: &'static str) {
        let source = source.into();
        tracing::debug!(manifest = %kind, source = %source, target, "applied field");
        self.applied.push(AppliedField {
            kind,
            source,
            target,
        });
    }

    /// Record a warning
    pub fn warn(&mut self, warning: ConversionWarning) {
        match warning.severity {
            WarningSeverity::Info => tracing::info!("{}", warning),
            WarningSeverity::Warning => tracing::warn!("{}", warning),
        }
        self.warnings.push(warning);
    }

    /// Targets overlaid from manifests of the given kind
    pub fn targets_for(&self, kind: ManifestKind) -> Vec<&'static str> {
        self.applied
            .iter()
            .filter(|field| field.kind == kind)
            .map(|field| field.target)
            .collect()
    }

    /// Get count of warnings by severity
    pub fn count_by_severity(&self, severity: WarningSeverity) -> usize {
        self.warnings.iter().filter(|w| w.severity == severity).count()
    }
}
