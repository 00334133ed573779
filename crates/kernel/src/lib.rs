//! City kernel: procedural generation, collision validation and the
//! navigation session that owns the viewpoint.
//!
//! # Invariants
//! - The city is generated once and read-only afterwards.
//! - Every accepted translation leaves the eye above ground, on the map and
//!   outside building volumes.
//! - Intents are applied in arrival order; each sees the previous result.

pub mod collision;
pub mod generator;
pub mod session;

pub use collision::{CollisionValidator, Resolution, Verdict};
pub use generator::{Building, City, CityConfig, CityGenerator, GenerateError, WallTexture};
pub use session::{JournalEntry, NavConfig, Outcome, Response, Session};

pub fn crate_info() -> &'static str {
    "skyline-kernel v0.1.0"
}
