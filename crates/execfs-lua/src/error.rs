//! Error type for the interpreter-facing side of the extension.

use execfs_core::WorkspaceError;
use thiserror::Error;

/// Result type for extension operations.
pub type ExtensionResult<T> = Result<T, ExtensionError>;

/// Errors that can occur while loading the extension or calling its handler.
#[derive(Debug, Error)]
pub enum ExtensionError {
    /// A workspace operation failed.
    #[error(transparent)]
    Workspace(#[from] WorkspaceError),

    /// A host function received a missing or wrongly typed argument.
    #[error("Bad argument to '{function}': {message}")]
    BadArgument {
        function: &'static str,
        message: String,
    },

    /// The bootstrap failed to compile or raised while running.
    #[error("Bootstrap '{chunk}' failed: {message}")]
    BootstrapFailed { chunk: String, message: String },

    /// The bootstrap ran but did not evaluate to a callable.
    #[error("Bootstrap returned {found}, expected a callable")]
    BootstrapInvalid { found: String },

    /// No handler has been adopted, or it was released.
    #[error("Handler not set")]
    HandlerUnset,

    /// The handler raised an error when invoked.
    #[error("Handler failed: {message}")]
    HandlerFailed { message: String },

    /// A host event payload could not be converted to handler arguments.
    #[error("Invalid event payload: {0}")]
    Event(#[from] serde_json::Error),

    /// Interpreter error outside script execution.
    #[error("Lua error: {0}")]
    Lua(#[from] mlua::Error),
}

impl ExtensionError {
    /// Whether this error means the bootstrap did not yield a handler.
    pub fn is_bootstrap(&self) -> bool {
        matches!(
            self,
            Self::BootstrapFailed { .. } | Self::BootstrapInvalid { .. }
        )
    }
}
