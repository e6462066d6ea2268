//! Core types for execfs.
//!
//! This crate owns everything that does not need an interpreter: the
//! workspace directory scripts are scoped to, the mapping from script-supplied
//! names to paths, the extension configuration, and the error types.

mod config;
mod error;
mod path;
mod workspace;

pub use config::{ExtensionConfig, ExtensionConfigBuilder, DEFAULT_CHUNK_NAME};
pub use error::{ConfigError, WorkspaceError};
pub use path::{name_from_bytes, resolve, validate_name, PathPolicy};
pub use workspace::{Workspace, DEFAULT_WORKSPACE_DIR};
