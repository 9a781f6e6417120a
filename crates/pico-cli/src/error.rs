//! CLI error types with exit code handling
//!
//! Maps converter failures onto diagnostics and exit codes.

use miette::Diagnostic;
use pico_convert::ConvertError;
use thiserror::Error;

use crate::exit_codes;

/// CLI-specific error type that includes exit code information
#[derive(Error, Debug, Diagnostic)]
pub enum CliError {
    /// A manifest could not be read
    #[error("IO error: {message}")]
    #[diagnostic(code(pico::cli::io))]
    Io {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// A manifest is not valid YAML or not a mapping
    #[error("Parse error: {message}")]
    #[diagnostic(
        code(pico::cli::parse),
        help("Nothing was written; fix the manifest and run pico again")
    )]
    Parse { message: String },

    /// The values file could not be written
    #[error("Write error: {message}")]
    #[diagnostic(code(pico::cli::write))]
    Write {
        message: String,
        #[help]
        help: Option<String>,
    },

    /// Internal error (unexpected failure)
    #[error("Internal error: {message}")]
    #[diagnostic(code(pico::cli::internal))]
    Internal { message: String },
}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            CliError::Io { .. } => exit_codes::IO_ERROR,
            CliError::Parse { .. } => exit_codes::PARSE_ERROR,
            CliError::Write { .. } => exit_codes::WRITE_ERROR,
            CliError::Internal { .. } => exit_codes::ERROR,
        }
    }

    /// Create an internal error
    pub fn internal(message: impl Into<String>) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl From<ConvertError> for CliError {
    fn from(err: ConvertError) -> Self {
        let message = err.to_string();
        match err {
            ConvertError::Read { source, .. } => CliError::Io {
                help: (source.kind() == std::io::ErrorKind::NotFound)
                    .then(|| "Check the path; pass \"\" to skip a manifest".to_string()),
                message,
            },
            ConvertError::Parse { .. } | ConvertError::MalformedDocument { .. } => {
                CliError::Parse { message }
            }
            ConvertError::Write { .. } => CliError::Write {
                message,
                help: Some("Use --output to write somewhere else".to_string()),
            },
            ConvertError::Render(_) => CliError::internal(message),
        }
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Io {
            message: err.to_string(),
            help: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pico_convert::ManifestKind;
    use std::io;
    use std::path::PathBuf;

    fn read_error(kind: io::ErrorKind) -> ConvertError {
        ConvertError::Read {
            kind: ManifestKind::Deployment,
            path: PathBuf::from("deploy.yaml"),
            source: io::Error::from(kind),
        }
    }

    #[test]
    fn test_missing_file_maps_to_io() {
        let err = CliError::from(read_error(io::ErrorKind::NotFound));

        assert_eq!(err.exit_code(), exit_codes::IO_ERROR);
        assert!(err.to_string().contains("deploy.yaml"));
        assert!(matches!(err, CliError::Io { help: Some(_), .. }));
    }

    #[test]
    fn test_permission_denied_has_no_help() {
        let err = CliError::from(read_error(io::ErrorKind::PermissionDenied));
        assert!(matches!(err, CliError::Io { help: None, .. }));
    }

    #[test]
    fn test_malformed_document_maps_to_parse() {
        let err = CliError::from(ConvertError::MalformedDocument {
            kind: ManifestKind::Service,
            path: PathBuf::from("svc.yaml"),
            message: "top-level document must be a mapping".to_string(),
        });

        assert_eq!(err.exit_code(), exit_codes::PARSE_ERROR);
        assert!(err.to_string().contains("svc.yaml"));
    }

    #[test]
    fn test_write_error_code() {
        let err = CliError::from(ConvertError::Write {
            path: PathBuf::from("/nope/values.yaml"),
            source: io::Error::from(io::ErrorKind::PermissionDenied),
        });

        assert_eq!(err.exit_code(), exit_codes::WRITE_ERROR);
    }

    #[test]
    fn test_internal_error_code() {
        assert_eq!(CliError::internal("boom").exit_code(), exit_codes::ERROR);
    }
}
