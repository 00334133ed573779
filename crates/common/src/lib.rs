//! Shared value types used across the skyline workspace.

mod types;

pub use types::{MAX_PITCH, MotionMode, Viewpoint};

pub fn crate_info() -> &'static str {
    "skyline-common v0.1.0"
}
