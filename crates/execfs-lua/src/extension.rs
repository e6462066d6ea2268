//! Loading the extension into an interpreter.
//!
//! Load order is fixed: workspace, host functions, bootstrap, handler. The
//! resulting state lives in the interpreter's app data, so it is dropped
//! together with the interpreter.

use std::sync::Arc;

use execfs_core::{ExtensionConfig, Workspace};
use mlua::{Lua, MultiValue};

use crate::bindings;
use crate::bootstrap::Bootstrap;
use crate::error::{ExtensionError, ExtensionResult};
use crate::events::HostEvent;
use crate::handler::{self, HandlerRegistry};
use crate::value::Value;

/// What happened to the bootstrap during a load.
#[derive(Debug)]
pub enum BootstrapOutcome {
    /// The bootstrap returned a callable, now stored as the handler.
    Adopted,

    /// No handler was stored. Holds a `BootstrapFailed` or `BootstrapInvalid`.
    Failed(ExtensionError),
}

/// Summary of a load. Only the handler path can be degraded; the file
/// functions are always installed when [`Extension::load`] returns `Ok`.
#[derive(Debug)]
pub struct LoadReport {
    /// Whether the workspace directory existed or was created at load time.
    pub workspace_ready: bool,

    /// Result of running the bootstrap.
    pub bootstrap: BootstrapOutcome,
}

impl LoadReport {
    /// Whether a handler was adopted.
    pub fn is_adopted(&self) -> bool {
        matches!(self.bootstrap, BootstrapOutcome::Adopted)
    }

    /// The bootstrap error, if the handler path is disabled.
    pub fn bootstrap_error(&self) -> Option<&ExtensionError> {
        match &self.bootstrap {
            BootstrapOutcome::Adopted => None,
            BootstrapOutcome::Failed(err) => Some(err),
        }
    }
}

/// Per-interpreter extension state.
#[derive(Debug)]
pub struct Extension {
    workspace: Arc<Workspace>,
    handler: HandlerRegistry,
}

impl Extension {
    /// Load the extension into `lua`.
    ///
    /// Loading again into the same interpreter rebinds the file functions and
    /// replaces the handler; the previous handler reference is released even
    /// when the new bootstrap fails.
    pub fn load(lua: &Lua, config: &ExtensionConfig) -> ExtensionResult<LoadReport> {
        let workspace = Arc::new(config.workspace());

        let workspace_ready = match workspace.ensure() {
            Ok(()) => true,
            Err(err) => {
                tracing::warn!(target: "execfs::extension", %err, "workspace not ready at load");
                false
            }
        };

        bindings::install(lua, Arc::clone(&workspace))?;

        let bootstrap = match &config.bootstrap {
            Some(source) => Bootstrap::new(source.as_str()),
            None => Bootstrap::bundled(),
        }
        .with_chunk_name(config.chunk_name.as_str());

        let mut handler = lua
            .remove_app_data::<Extension>()
            .map(|previous| previous.handler)
            .unwrap_or_default();

        let outcome = match bootstrap.run(lua) {
            Ok(callable) => {
                handler.adopt(lua, callable)?;
                BootstrapOutcome::Adopted
            }
            Err(err) if err.is_bootstrap() => {
                tracing::error!(target: "execfs::extension", %err, "bootstrap did not produce a handler");
                handler.release(lua)?;
                BootstrapOutcome::Failed(err)
            }
            Err(err) => {
                handler.release(lua)?;
                return Err(err);
            }
        };

        tracing::debug!(
            target: "execfs::extension",
            workspace = %workspace.root().display(),
            handler = handler.is_set(),
            "extension loaded"
        );

        lua.set_app_data(Extension { workspace, handler });

        Ok(LoadReport {
            workspace_ready,
            bootstrap: outcome,
        })
    }

    /// Whether the extension has been loaded into `lua`.
    pub fn is_loaded(lua: &Lua) -> bool {
        lua.app_data_ref::<Extension>().is_some()
    }

    /// Whether a handler is stored for `lua`.
    pub fn has_handler(lua: &Lua) -> bool {
        lua.app_data_ref::<Extension>()
            .is_some_and(|ext| ext.handler.is_set())
    }

    /// The workspace the file functions of `lua` are bound to.
    pub fn workspace(lua: &Lua) -> Option<Arc<Workspace>> {
        lua.app_data_ref::<Extension>()
            .map(|ext| Arc::clone(&ext.workspace))
    }

    /// Invoke the stored handler with host values.
    pub fn invoke_handler(lua: &Lua, args: &[Value]) -> ExtensionResult<Vec<Value>> {
        let callable = Self::callable(lua)?;
        handler::invoke_callable(lua, &callable, args)
    }

    /// Invoke the stored handler with interpreter values.
    pub fn invoke_lua(lua: &Lua, args: MultiValue) -> ExtensionResult<MultiValue> {
        let callable = Self::callable(lua)?;
        handler::call(&callable, args)
    }

    /// Deliver a host event to the handler.
    pub fn dispatch(lua: &Lua, event: &HostEvent) -> ExtensionResult<Vec<Value>> {
        tracing::debug!(target: "execfs::extension", event = event.name(), "dispatching event");
        let args = event.args()?;
        Self::invoke_handler(lua, &args)
    }

    /// Release the stored handler. Later invokes fail with `HandlerUnset`.
    pub fn release(lua: &Lua) -> ExtensionResult<()> {
        match lua.app_data_mut::<Extension>() {
            Some(mut ext) => ext.handler.release(lua),
            None => Ok(()),
        }
    }

    // The app data borrow must end before the handler runs, since the handler
    // may call back into `dispatch` or `release`.
    fn callable(lua: &Lua) -> ExtensionResult<mlua::Value> {
        let ext = lua
            .app_data_ref::<Extension>()
            .ok_or(ExtensionError::HandlerUnset)?;
        ext.handler.callable(lua)
    }
}
