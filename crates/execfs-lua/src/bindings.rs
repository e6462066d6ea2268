//! Script-visible file functions bound to a workspace.
//!
//! Both functions report failure through their return values, never by
//! raising: `readfile` yields `nil, message` and `writefile` yields `false`.

use std::ffi::OsStr;
use std::sync::Arc;

use execfs_core::{Workspace, WorkspaceError};
use mlua::{Function, Lua, MultiValue, Value as LuaValue};

use crate::error::{ExtensionError, ExtensionResult};

/// Global name of the read function.
pub const READFILE: &str = "readfile";

/// Global name of the write function.
pub const WRITEFILE: &str = "writefile";

/// Message returned by `readfile` when the name is missing or not a string.
pub const NO_FILENAME: &str = "No filename provided";

/// Install `readfile` and `writefile` into the interpreter's globals.
///
/// Installing again replaces both functions with ones bound to `workspace`.
pub fn install(lua: &Lua, workspace: Arc<Workspace>) -> ExtensionResult<()> {
    let globals = lua.globals();
    globals.set(READFILE, create_readfile(lua, Arc::clone(&workspace))?)?;
    globals.set(WRITEFILE, create_writefile(lua, workspace)?)?;

    tracing::debug!(target: "execfs::bindings", "installed {READFILE} and {WRITEFILE}");
    Ok(())
}

/// `readfile(name) -> contents | nil, message`
fn create_readfile(lua: &Lua, workspace: Arc<Workspace>) -> mlua::Result<Function> {
    lua.create_function(move |lua, name: LuaValue| {
        let name = match name {
            LuaValue::String(name) => name,
            other => {
                log_bad_argument(READFILE, "name", &other);
                return read_failure(lua, NO_FILENAME);
            }
        };

        let name = name.as_bytes();
        match file_name(&name).and_then(|file| workspace.read(file)) {
            Ok(contents) => Ok(MultiValue::from_vec(vec![LuaValue::String(
                lua.create_string(&contents)?,
            )])),
            Err(err) => {
                log_failure(READFILE, &err);
                read_failure(lua, err.script_message())
            }
        }
    })
}

/// `writefile(name, content) -> boolean`
fn create_writefile(lua: &Lua, workspace: Arc<Workspace>) -> mlua::Result<Function> {
    lua.create_function(move |_, (name, content): (LuaValue, LuaValue)| {
        let (name, content) = match (name, content) {
            (LuaValue::String(name), LuaValue::String(content)) => (name, content),
            (name, content) => {
                let (arg, got) = match name {
                    LuaValue::String(_) => ("content", content),
                    other => ("name", other),
                };
                log_bad_argument(WRITEFILE, arg, &got);
                return Ok(false);
            }
        };

        let (name, content) = (name.as_bytes(), content.as_bytes());
        match file_name(&name).and_then(|file| workspace.write(file, &content)) {
            Ok(()) => Ok(true),
            Err(err) => {
                log_failure(WRITEFILE, &err);
                Ok(false)
            }
        }
    })
}

fn file_name(bytes: &[u8]) -> Result<&OsStr, WorkspaceError> {
    execfs_core::name_from_bytes(bytes).map_err(|reason| WorkspaceError::InvalidName {
        name: String::from_utf8_lossy(bytes).into_owned(),
        reason,
    })
}

fn log_failure(function: &'static str, err: &WorkspaceError) {
    match err.path() {
        Some(path) => {
            tracing::debug!(target: "execfs::bindings", %err, path = %path.display(), "{function} failed")
        }
        None => tracing::debug!(target: "execfs::bindings", %err, "{function} failed"),
    }
}

fn read_failure(lua: &Lua, message: &str) -> mlua::Result<MultiValue> {
    Ok(MultiValue::from_vec(vec![
        LuaValue::Nil,
        LuaValue::String(lua.create_string(message)?),
    ]))
}

fn log_bad_argument(function: &'static str, arg: &str, got: &LuaValue) {
    let err = ExtensionError::BadArgument {
        function,
        message: format!("'{arg}' must be a string, got {}", got.type_name()),
    };
    tracing::debug!(target: "execfs::bindings", %err);
}
