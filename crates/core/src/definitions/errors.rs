//! Error types for definition files.

use std::path::PathBuf;
use thiserror::Error;

use crate::form::FormError;

/// Errors that can occur when discovering or loading definition files.
#[derive(Debug, Error)]
pub enum DefinitionError {
    /// Definitions directory exists but cannot be resolved.
    #[error("definitions directory is not accessible: {0}")]
    MissingDir(String),

    /// Error walking the definitions directory.
    #[error("failed to read definitions directory {0}: {1}")]
    WalkError(String, #[source] walkdir::Error),

    /// Error reading a definition file.
    #[error("failed to read definition file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse TOML definition {path}: {source}")]
    Toml {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("failed to parse YAML definition {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("failed to parse JSON definition {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The file parsed but describes an inconsistent form.
    #[error("invalid definition in {path}: {source}")]
    Invalid {
        path: PathBuf,
        #[source]
        source: FormError,
    },

    /// No definition file with this name.
    #[error("definition not found: {0}")]
    NotFound(String),
}
