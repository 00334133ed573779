//! Rendering adapter: renderer-agnostic interface over the generated city.
//!
//! # Invariants
//! - Renderers never mutate the city or the viewpoint.
//! - City geometry is batched once, before the interactive loop starts.
//! - A frame is only produced after a redraw was requested.
//!
//! # Workaround
//! Ships a debug text backend in place of a GPU one. The [`RenderAdapter`]
//! trait is stable; a GPU backend uploads [`StaticBatch`] bytes as-is.

mod batch;
mod renderer;
mod textures;

pub use batch::{BatchError, DrawRange, StaticBatch, Vertex};
pub use renderer::{DebugTextRenderer, RenderAdapter, RenderView};
pub use textures::{TextureSet, TextureSlot};

pub fn crate_info() -> &'static str {
    "skyline-render v0.1.0"
}
