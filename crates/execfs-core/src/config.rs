//! Extension configuration types.

use std::path::{Path, PathBuf};

use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::path::PathPolicy;
use crate::workspace::{Workspace, DEFAULT_WORKSPACE_DIR};

/// Chunk name used when compiling the bootstrap script.
pub const DEFAULT_CHUNK_NAME: &str = "string";

/// Configuration for loading the extension into an interpreter.
#[derive(Debug, Clone, PartialEq, Builder, Serialize, Deserialize)]
#[builder(setter(into), build_fn(validate = "Self::validate"))]
pub struct ExtensionConfig {
    /// Directory all script file operations are scoped to.
    #[builder(default = "PathBuf::from(DEFAULT_WORKSPACE_DIR)")]
    #[serde(default = "default_workspace_dir")]
    pub workspace_dir: PathBuf,

    /// How script-supplied names are mapped under the workspace.
    #[builder(default)]
    #[serde(default)]
    pub path_policy: PathPolicy,

    /// Bootstrap source to evaluate instead of the bundled one.
    #[builder(default, setter(into, strip_option))]
    #[serde(default)]
    pub bootstrap: Option<String>,

    /// Chunk name reported in bootstrap compile and runtime errors.
    #[builder(default = "DEFAULT_CHUNK_NAME.to_string()")]
    #[serde(default = "default_chunk_name")]
    pub chunk_name: String,

    /// Install a stderr diagnostic subscriber when none is set.
    #[builder(default = "true")]
    #[serde(default = "default_true")]
    pub diagnostics: bool,
}

fn default_workspace_dir() -> PathBuf {
    PathBuf::from(DEFAULT_WORKSPACE_DIR)
}

fn default_chunk_name() -> String {
    DEFAULT_CHUNK_NAME.to_string()
}

fn default_true() -> bool {
    true
}

fn check_workspace_dir(dir: &Path) -> Result<(), String> {
    if dir.as_os_str().is_empty() {
        return Err("Workspace directory cannot be empty".to_string());
    }
    Ok(())
}

fn check_chunk_name(name: &str) -> Result<(), String> {
    if name.is_empty() {
        return Err("Chunk name cannot be empty".to_string());
    }
    Ok(())
}

impl ExtensionConfigBuilder {
    fn validate(&self) -> Result<(), String> {
        if let Some(ref dir) = self.workspace_dir {
            check_workspace_dir(dir)?;
        }
        if let Some(ref name) = self.chunk_name {
            check_chunk_name(name)?;
        }
        Ok(())
    }
}

impl ExtensionConfig {
    /// Create a new config builder.
    pub fn builder() -> ExtensionConfigBuilder {
        ExtensionConfigBuilder::default()
    }

    /// Create a config with defaults and the given workspace directory.
    pub fn new(workspace_dir: impl Into<PathBuf>) -> Self {
        Self {
            workspace_dir: workspace_dir.into(),
            path_policy: PathPolicy::default(),
            bootstrap: None,
            chunk_name: default_chunk_name(),
            diagnostics: true,
        }
    }

    /// Parse a config from a TOML document, e.g. a host's `[execfs]` table.
    pub fn from_toml_str(input: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(input)?;
        check_workspace_dir(&config.workspace_dir)
            .and_then(|()| check_chunk_name(&config.chunk_name))
            .map_err(|message| ConfigError::Invalid { message })?;
        Ok(config)
    }

    /// Build the workspace described by this config.
    pub fn workspace(&self) -> Workspace {
        Workspace::new(&self.workspace_dir).with_policy(self.path_policy)
    }
}

impl Default for ExtensionConfig {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_DIR)
    }
}
