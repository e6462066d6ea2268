//! execfs - an executor-style file API for Lua scripts.
//!
//! Built with the `module` feature this crate is a loadable Lua module:
//! `require("execfs")` resolves `luaopen_execfs`, which
//!
//! - creates `./workspace` if needed,
//! - installs the globals `readfile(name)` and `writefile(name, content)`,
//! - runs the bundled bootstrap and keeps the handler it returns,
//! - returns a module table with `workspace`, `dispatch(...)`,
//!   `has_handler()` and `release()`.
//!
//! Hosts embedding Lua from Rust can call [`open_with`] directly to choose the
//! workspace directory and bootstrap source.

use execfs_core::ExtensionConfig;
use execfs_lua::{diagnostics, Extension};
use mlua::{Lua, MultiValue, Result as LuaResult, Table};

pub use execfs_core;
pub use execfs_lua;

/// Load the extension with the default configuration.
pub fn open(lua: &Lua) -> LuaResult<Table> {
    open_with(lua, &ExtensionConfig::default())
}

/// Load the extension and build the module table.
///
/// Bootstrap problems are reported on the diagnostic stream and leave the
/// handler unset; only interpreter failures are raised to the caller.
pub fn open_with(lua: &Lua, config: &ExtensionConfig) -> LuaResult<Table> {
    if config.diagnostics {
        diagnostics::init();
    }

    let report = Extension::load(lua, config).map_err(mlua::Error::external)?;

    let module = lua.create_table()?;
    module.set(
        "workspace",
        config.workspace_dir.to_string_lossy().into_owned(),
    )?;
    module.set("dispatch", lua.create_function(dispatch)?)?;
    module.set(
        "has_handler",
        lua.create_function(|lua, ()| Ok(Extension::has_handler(lua)))?,
    )?;
    module.set(
        "release",
        lua.create_function(|lua, ()| Extension::release(lua).map_err(mlua::Error::external))?,
    )?;

    tracing::debug!(target: "execfs", handler = report.is_adopted(), "module opened");
    Ok(module)
}

/// `dispatch(...)`: call the handler, yielding no values when it is unset or
/// raises.
fn dispatch(lua: &Lua, args: MultiValue) -> LuaResult<MultiValue> {
    match Extension::invoke_lua(lua, args) {
        Ok(returns) => Ok(returns),
        Err(err) => {
            tracing::debug!(target: "execfs", %err, "dispatch returned nothing");
            Ok(MultiValue::new())
        }
    }
}

#[cfg(feature = "module")]
#[mlua::lua_module]
fn execfs(lua: &Lua) -> LuaResult<Table> {
    open(lua)
}
