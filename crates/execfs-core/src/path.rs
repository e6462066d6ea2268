//! Mapping of script-supplied names onto workspace paths.

use std::ffi::{OsStr, OsString};
use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

/// How script-supplied names are turned into paths under the workspace.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PathPolicy {
    /// Reject names that could leave the workspace (`..`, absolute paths).
    #[default]
    Confined,

    /// Append the name verbatim after `<root>/`, with no validation.
    Prefix,
}

/// Turn a script byte string into a file name without altering any byte.
///
/// Platforms whose file names are not byte strings only accept UTF-8.
#[cfg(unix)]
pub fn name_from_bytes(bytes: &[u8]) -> Result<&OsStr, String> {
    use std::os::unix::ffi::OsStrExt;
    Ok(OsStr::from_bytes(bytes))
}

#[cfg(not(unix))]
pub fn name_from_bytes(bytes: &[u8]) -> Result<&OsStr, String> {
    std::str::from_utf8(bytes)
        .map(OsStr::new)
        .map_err(|_| "Name is not valid UTF-8".to_string())
}

/// Validate a script-supplied file name for the confined policy.
pub fn validate_name(name: impl AsRef<OsStr>) -> Result<(), String> {
    let name = name.as_ref();
    if name.is_empty() {
        return Err("Name cannot be empty".into());
    }

    if name.as_encoded_bytes().contains(&0) {
        return Err("Name cannot contain NUL".into());
    }

    let mut normal = 0usize;
    for component in Path::new(name).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {
                return Err("Absolute paths are not allowed".into());
            }
            Component::ParentDir => {
                return Err("Name cannot contain '..'".into());
            }
            Component::CurDir => {}
            Component::Normal(_) => normal += 1,
        }
    }

    if normal == 0 {
        return Err("Name must refer to a file".into());
    }

    Ok(())
}

/// Resolve `name` against `root` according to `policy`.
pub fn resolve(
    root: &Path,
    name: impl AsRef<OsStr>,
    policy: PathPolicy,
) -> Result<PathBuf, String> {
    let name = name.as_ref();
    match policy {
        PathPolicy::Confined => {
            validate_name(name)?;
            Ok(root.join(name))
        }
        PathPolicy::Prefix => {
            let mut joined = OsString::from(root.as_os_str());
            joined.push("/");
            joined.push(name);
            Ok(PathBuf::from(joined))
        }
    }
}
