//! Maps facet kinds to layer constructors.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use facetview_core::FacetKind;

use crate::layer::FacetLayer;
use crate::layers::field::FieldFacetLayer;
use crate::layers::graph::GraphFacetLayer;

type Constructor = Box<dyn Fn() -> Arc<dyn FacetLayer> + Send + Sync>;

/// Builds a fresh layer for a facet kind, so hosts can list what they can draw
/// and instantiate it without naming concrete layer types.
#[derive(Default)]
pub struct LayerRegistry {
    constructors: BTreeMap<FacetKind, Constructor>,
}

impl LayerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Field layers for the scalar kinds plus the graph layer. Nominal layers
    /// need a value type and color map, so hosts register those themselves.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(FacetKind::SurfaceHeight, || {
            Arc::new(FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0))
        });
        registry.register(FacetKind::Humidity, || {
            Arc::new(FieldFacetLayer::new(FacetKind::Humidity, 0.0, 100.0))
        });
        registry.register(FacetKind::Temperature, || {
            Arc::new(FieldFacetLayer::new(FacetKind::Temperature, 50.0, 5.0))
        });
        registry.register(FacetKind::Graph, || Arc::new(GraphFacetLayer::new()));
        registry
    }

    /// Registers `constructor` for `kind`, replacing any previous one.
    pub fn register<F>(&mut self, kind: FacetKind, constructor: F)
    where
        F: Fn() -> Arc<dyn FacetLayer> + Send + Sync + 'static,
    {
        if self.constructors.insert(kind, Box::new(constructor)).is_some() {
            log::debug!("Replaced layer constructor for {}", kind);
        }
    }

    pub fn create(&self, kind: FacetKind) -> Option<Arc<dyn FacetLayer>> {
        self.constructors.get(&kind).map(|ctor| ctor())
    }

    pub fn contains(&self, kind: FacetKind) -> bool {
        self.constructors.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = FacetKind> + '_ {
        self.constructors.keys().copied()
    }
}

impl fmt::Debug for LayerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_set().entries(self.constructors.keys()).finish()
    }
}
