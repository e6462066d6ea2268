//! Durable storage for the callable returned by the bootstrap.
//!
//! The callable is moved into the interpreter's registry table and only the
//! [`RegistryKey`] is kept on the native side, so it stays reachable after the
//! call that produced it has returned.

use mlua::{FromLua, IntoLua, Lua, MultiValue, RegistryKey, Value as LuaValue};

use crate::bootstrap::{call_metamethod, is_callable};
use crate::error::{ExtensionError, ExtensionResult};
use crate::value::Value;

/// Holds at most one handler reference.
#[derive(Debug, Default)]
pub struct HandlerRegistry {
    key: Option<RegistryKey>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a handler is currently stored.
    pub fn is_set(&self) -> bool {
        self.key.is_some()
    }

    /// Store `callable`, releasing any previously stored handler.
    pub fn adopt(&mut self, lua: &Lua, callable: LuaValue) -> ExtensionResult<()> {
        if !is_callable(&callable) {
            return Err(ExtensionError::BootstrapInvalid {
                found: callable.type_name().to_string(),
            });
        }

        let key = lua.create_registry_value(callable)?;
        if let Some(old) = self.key.replace(key) {
            lua.remove_registry_value(old)?;
            tracing::debug!(target: "execfs::handler", "replaced previous handler");
        }
        Ok(())
    }

    /// Fetch the stored callable.
    pub fn callable(&self, lua: &Lua) -> ExtensionResult<LuaValue> {
        let key = self.key.as_ref().ok_or(ExtensionError::HandlerUnset)?;
        Ok(lua.registry_value::<LuaValue>(key)?)
    }

    /// Call the handler with host values and convert its results back.
    pub fn invoke(&self, lua: &Lua, args: &[Value]) -> ExtensionResult<Vec<Value>> {
        let callable = self.callable(lua)?;
        invoke_callable(lua, &callable, args)
    }

    /// Call the handler with interpreter values.
    pub fn invoke_lua(&self, lua: &Lua, args: MultiValue) -> ExtensionResult<MultiValue> {
        let callable = self.callable(lua)?;
        call(&callable, args)
    }

    /// Drop the stored handler. Does nothing when unset.
    pub fn release(&mut self, lua: &Lua) -> ExtensionResult<()> {
        if let Some(key) = self.key.take() {
            lua.remove_registry_value(key)?;
            tracing::debug!(target: "execfs::handler", "released handler");
        }
        Ok(())
    }
}

/// Convert `args`, call `callable` and convert every return value.
pub(crate) fn invoke_callable(
    lua: &Lua,
    callable: &LuaValue,
    args: &[Value],
) -> ExtensionResult<Vec<Value>> {
    let args = args
        .iter()
        .cloned()
        .map(|v| v.into_lua(lua))
        .collect::<mlua::Result<Vec<_>>>()?;

    call(callable, MultiValue::from_vec(args))?
        .into_iter()
        .map(|v| Value::from_lua(v, lua))
        .collect::<mlua::Result<Vec<_>>>()
        .map_err(Into::into)
}

/// Protected call of a function or `__call` object.
pub(crate) fn call(callable: &LuaValue, args: MultiValue) -> ExtensionResult<MultiValue> {
    let result = match callable {
        LuaValue::Function(f) => f.call::<MultiValue>(args),
        other => match call_metamethod(other) {
            Some(f) => f.call::<MultiValue>(MultiValue::from_vec(
                std::iter::once(other.clone()).chain(args).collect(),
            )),
            None => {
                return Err(ExtensionError::HandlerFailed {
                    message: "handler is no longer callable".into(),
                });
            }
        },
    };

    result.map_err(|e| {
        let message = e.to_string();
        tracing::error!(target: "execfs::handler", error = %message, "handler raised an error");
        ExtensionError::HandlerFailed { message }
    })
}
