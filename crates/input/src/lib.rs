//! Input bridge: raw keys, mouse motion and typed commands mapped to
//! navigation intents.
//!
//! # Invariants
//! - The kernel consumes intents, never raw input events.
//! - Every key maps to at most one intent.

mod bindings;
mod command;
mod intent;
mod mouse;

pub use bindings::{BindingError, Key, KeyBindings, keys_in};
pub use command::{Command, CommandError};
pub use intent::Intent;
pub use mouse::MouseDrag;

pub fn crate_info() -> &'static str {
    "skyline-input v0.1.0"
}
