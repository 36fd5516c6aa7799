//! Layer stack settings persisted as JSON.
//!
//! Only the untyped [`LayerConfig`] surface is used, so any registered layer
//! round-trips without the host knowing its concrete config type.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use facetview_core::FacetKind;
use facetview_renderer::{LayerConfig, LayerRegistry, LayerStack, ParamValue};
use serde::{Deserialize, Serialize};

use crate::error::CliError;

fn visible_by_default() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LayerSettings {
    pub kind: FacetKind,
    #[serde(default = "visible_by_default")]
    pub visible: bool,
    #[serde(default)]
    pub params: BTreeMap<String, ParamValue>,
}

/// The whole stack, bottom layer first.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StackSettings {
    pub layers: Vec<LayerSettings>,
}

impl StackSettings {
    pub fn capture(stack: &LayerStack) -> Self {
        let layers = stack
            .entries()
            .iter()
            .map(|entry| LayerSettings {
                kind: entry.layer.facet_kind(),
                visible: entry.visible,
                params: entry.layer.config().map(read_params).unwrap_or_default(),
            })
            .collect();
        Self { layers }
    }

    /// Instantiates every layer through `registry` and applies its params.
    pub fn build(&self, registry: &LayerRegistry) -> Result<LayerStack, CliError> {
        let mut stack = LayerStack::new();
        for settings in &self.layers {
            let layer = registry
                .create(settings.kind)
                .ok_or(CliError::UnknownLayer(settings.kind))?;
            if let Some(config) = layer.config() {
                for (name, value) in &settings.params {
                    config
                        .set(name, *value)
                        .map_err(|source| CliError::Config {
                            kind: settings.kind,
                            source,
                        })?;
                }
            } else if !settings.params.is_empty() {
                log::warn!("{} layer takes no parameters, ignoring them", settings.kind);
            }
            let id = stack.push(layer);
            stack.set_visible(id, settings.visible);
        }
        Ok(stack)
    }

    pub fn load(path: &Path) -> Result<Self, CliError> {
        let text = fs::read_to_string(path)?;
        let settings: Self = serde_json::from_str(&text)?;
        log::info!("Loaded {} layer settings from {}", settings.layers.len(), path.display());
        Ok(settings)
    }

    pub fn save(&self, path: &Path) -> Result<(), CliError> {
        let text = serde_json::to_string_pretty(self)?;
        fs::write(path, text)?;
        log::info!("Saved layer settings to {}", path.display());
        Ok(())
    }
}

fn read_params(config: &dyn LayerConfig) -> BTreeMap<String, ParamValue> {
    config
        .params()
        .iter()
        .filter_map(|spec| config.get(spec.name).map(|v| (spec.name.to_string(), v)))
        .collect()
}
