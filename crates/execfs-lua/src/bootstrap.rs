//! Compiling and running the bootstrap script.

use execfs_core::DEFAULT_CHUNK_NAME;
use mlua::{Function, Lua, MultiValue, Value as LuaValue};

use crate::error::{ExtensionError, ExtensionResult};

/// Bootstrap shipped with the extension, used when the host supplies none.
pub const BUNDLED_BOOTSTRAP: &str = include_str!("../assets/bootstrap.lua");

/// A bootstrap script whose final expression is the event handler.
#[derive(Debug, Clone)]
pub struct Bootstrap {
    source: String,
    chunk_name: String,
}

impl Bootstrap {
    /// Create a bootstrap from source text.
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            chunk_name: DEFAULT_CHUNK_NAME.to_string(),
        }
    }

    /// The bundled bootstrap.
    pub fn bundled() -> Self {
        Self::new(BUNDLED_BOOTSTRAP)
    }

    /// Set the chunk name used in error messages.
    pub fn with_chunk_name(mut self, name: impl Into<String>) -> Self {
        self.chunk_name = name.into();
        self
    }

    /// Compile and execute the script, returning the callable it evaluated to.
    ///
    /// The host functions must already be installed: the script may call them
    /// during its top-level evaluation.
    pub fn run(&self, lua: &Lua) -> ExtensionResult<LuaValue> {
        let chunk = lua
            .load(self.source.as_str())
            .set_name(self.chunk_name.clone())
            .into_function()
            .map_err(|e| self.failed(e))?;

        let returns: MultiValue = chunk.call(()).map_err(|e| self.failed(e))?;
        let value = returns.into_iter().next().unwrap_or(LuaValue::Nil);

        if !is_callable(&value) {
            return Err(ExtensionError::BootstrapInvalid {
                found: value.type_name().to_string(),
            });
        }

        tracing::trace!(target: "execfs::bootstrap", chunk = %self.chunk_name, "bootstrap returned a callable");
        Ok(value)
    }

    fn failed(&self, err: mlua::Error) -> ExtensionError {
        ExtensionError::BootstrapFailed {
            chunk: self.chunk_name.clone(),
            message: err.to_string(),
        }
    }
}

impl Default for Bootstrap {
    fn default() -> Self {
        Self::bundled()
    }
}

/// The `__call` metamethod of a table or userdata, if it has one.
pub(crate) fn call_metamethod(value: &LuaValue) -> Option<Function> {
    match value {
        LuaValue::Table(t) => t
            .metatable()
            .and_then(|mt| mt.raw_get::<Function>("__call").ok()),
        LuaValue::UserData(ud) => ud
            .metatable()
            .ok()
            .and_then(|mt| mt.get::<Function>("__call").ok()),
        _ => None,
    }
}

/// Whether `value` can be invoked: a function, or an object with `__call`.
pub fn is_callable(value: &LuaValue) -> bool {
    matches!(value, LuaValue::Function(_)) || call_metamethod(value).is_some()
}
