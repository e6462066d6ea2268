//! The on-disk scratch directory scripts read from and write to.

use std::ffi::OsStr;
use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};

use crate::error::WorkspaceError;
use crate::path::{self, PathPolicy};

/// Default workspace directory, relative to the process working directory.
pub const DEFAULT_WORKSPACE_DIR: &str = "workspace";

/// A directory to which all script file operations are scoped.
///
/// Every operation calls [`Workspace::ensure`] first, since scripts (or other
/// processes) may remove the directory between calls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    root: PathBuf,
    policy: PathPolicy,
}

impl Workspace {
    /// Create a workspace rooted at `root` with the confined path policy.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            policy: PathPolicy::default(),
        }
    }

    /// Set the path policy.
    pub fn with_policy(mut self, policy: PathPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// The workspace root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// The path policy in effect.
    pub fn policy(&self) -> PathPolicy {
        self.policy
    }

    /// Make sure the root exists as a directory, creating missing parents.
    pub fn ensure(&self) -> Result<(), WorkspaceError> {
        match fs::metadata(&self.root) {
            Ok(meta) if meta.is_dir() => return Ok(()),
            Ok(_) => {
                return Err(WorkspaceError::Unavailable {
                    path: self.root.clone(),
                    source: std::io::Error::other("path exists and is not a directory"),
                });
            }
            Err(_) => {}
        }

        fs::create_dir_all(&self.root).map_err(|source| WorkspaceError::Unavailable {
            path: self.root.clone(),
            source,
        })?;

        tracing::debug!(target: "execfs::workspace", root = %self.root.display(), "created workspace");
        Ok(())
    }

    /// Resolve a script-supplied name to a path under the root.
    pub fn resolve(&self, name: impl AsRef<OsStr>) -> Result<PathBuf, WorkspaceError> {
        let name = name.as_ref();
        path::resolve(&self.root, name, self.policy).map_err(|reason| {
            WorkspaceError::InvalidName {
                name: name.to_string_lossy().into_owned(),
                reason,
            }
        })
    }

    /// Read a whole file as raw bytes.
    pub fn read(&self, name: impl AsRef<OsStr>) -> Result<Vec<u8>, WorkspaceError> {
        self.ensure()?;
        let path = self.resolve(name)?;

        let mut file = File::open(&path).map_err(|source| WorkspaceError::Open {
            path: path.clone(),
            source,
        })?;

        let mut buf = Vec::new();
        file.read_to_end(&mut buf)
            .map_err(|source| WorkspaceError::Read { path, source })?;

        Ok(buf)
    }

    /// Create or truncate a file and write `contents` to it.
    pub fn write(&self, name: impl AsRef<OsStr>, contents: &[u8]) -> Result<(), WorkspaceError> {
        self.ensure()?;
        let path = self.resolve(name)?;

        let mut file = File::create(&path).map_err(|source| WorkspaceError::Open {
            path: path.clone(),
            source,
        })?;

        file.write_all(contents)
            .and_then(|()| file.flush())
            .map_err(|source| WorkspaceError::Write { path, source })
    }
}

impl Default for Workspace {
    fn default() -> Self {
        Self::new(DEFAULT_WORKSPACE_DIR)
    }
}
