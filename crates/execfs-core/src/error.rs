//! Error types for workspace and configuration handling.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while touching the workspace.
#[derive(Debug, Error)]
pub enum WorkspaceError {
    /// The workspace directory could not be created or is not a directory.
    #[error("Workspace unavailable at {path}: {source}")]
    Unavailable {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A script-supplied name was rejected by the path policy.
    #[error("Invalid file name '{name}': {reason}")]
    InvalidName { name: String, reason: String },

    /// The target file could not be opened.
    #[error("Failed to open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Reading an opened file failed.
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Writing an opened file failed.
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl WorkspaceError {
    /// Short message surfaced to scripts as the second return value.
    pub fn script_message(&self) -> &'static str {
        match self {
            Self::Unavailable { .. } => "Workspace unavailable",
            Self::InvalidName { .. } => "Invalid filename",
            Self::Open { .. } => "Failed to open file",
            Self::Read { .. } => "Failed to read file",
            Self::Write { .. } => "Failed to write file",
        }
    }

    /// Path involved in the failure, if any.
    pub fn path(&self) -> Option<&PathBuf> {
        match self {
            Self::Unavailable { path, .. }
            | Self::Open { path, .. }
            | Self::Read { path, .. }
            | Self::Write { path, .. } => Some(path),
            Self::InvalidName { .. } => None,
        }
    }
}

/// Errors raised while building an [`ExtensionConfig`](crate::ExtensionConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The TOML document could not be parsed.
    #[error("Invalid configuration: {0}")]
    Parse(#[from] toml::de::Error),

    /// A field holds a value the extension cannot use.
    #[error("Invalid configuration: {message}")]
    Invalid { message: String },
}
