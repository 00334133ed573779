use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use serde::Deserialize;
use skyline_input::{Intent, KeyBindings};
use skyline_kernel::{CityConfig, NavConfig};
use skyline_render::TextureSet;

/// Everything an operator can tune from a YAML file.
///
/// ```yaml
/// city:
///   mean_height: 4.0
///   height_std_dev: 1.0
///   seed: 42
/// navigation:
///   ground_clearance: 0.25
///   step: 0.5
///   mode: walk
/// textures:
///   roof: assets/roof.png
/// keys:
///   k: step_forward
///   "<left>": turn_left
/// ```
#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AppConfig {
    pub city: CityConfig,
    pub navigation: NavConfig,
    pub textures: TextureSet,
    /// Key name → intent, applied over the default bindings.
    pub keys: BTreeMap<String, Intent>,
}

impl AppConfig {
    /// Load from `path`, or defaults when no path is given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }

    pub fn bindings(&self) -> anyhow::Result<KeyBindings> {
        KeyBindings::with_overrides(&self.keys).context("invalid key bindings")
    }
}
