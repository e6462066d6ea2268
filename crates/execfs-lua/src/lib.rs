//! Interpreter side of execfs.
//!
//! This crate installs the executor-style file API into a Lua interpreter
//! and manages the bootstrap lifecycle.
//!
//! # Load sequence
//!
//! [`Extension::load`] runs these steps in order:
//!
//! 1. ensure the workspace directory exists,
//! 2. install `readfile` and `writefile` as globals ([`bindings`]),
//! 3. compile and run the bootstrap ([`Bootstrap`]),
//! 4. keep the callable it returned in the interpreter registry
//!    ([`HandlerRegistry`]).
//!
//! A broken bootstrap only disables the handler; the file functions stay
//! available.
//!
//! # Example
//!
//! ```ignore
//! use execfs_core::ExtensionConfig;
//! use execfs_lua::{Extension, HostEvent};
//!
//! let lua = mlua::Lua::new();
//! let report = Extension::load(&lua, &ExtensionConfig::default())?;
//!
//! // Later, from the host's event source
//! Extension::dispatch(&lua, &HostEvent::PlayerAdded { player: "ana".into() })?;
//! ```

pub mod bindings;
mod bootstrap;
pub mod diagnostics;
mod error;
mod events;
mod extension;
mod handler;
mod value;

pub use bootstrap::{is_callable, Bootstrap, BUNDLED_BOOTSTRAP};
pub use error::{ExtensionError, ExtensionResult};
pub use events::HostEvent;
pub use extension::{BootstrapOutcome, Extension, LoadReport};
pub use handler::HandlerRegistry;
pub use value::Value;
