//! Core error types

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to render values: {0}")]
    Render(serde_yaml::Error),
}

pub type Result<T> = std::result::Result<T, CoreError>;
