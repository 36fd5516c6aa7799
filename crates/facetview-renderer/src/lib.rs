//! # FacetView Renderer
//!
//! Layer renderers for region facets and the compositor that stacks them.
//!
//! Each [`FacetLayer`] colorizes one facet of a [`facetview_core::Region`] into
//! a shared [`PixelBuffer`]. Field and nominal layers blend additively, so
//! stacked layers saturate per channel; the graph layer strokes geometry on
//! top. A [`LayerStack`] renders the visible layers in order and answers
//! world-coordinate probes.

pub mod blend;
pub mod buffer;
pub mod config;
pub mod layer;
pub mod layers;
pub mod observer;
pub mod raster;
pub mod registry;
pub mod stack;

pub use buffer::PixelBuffer;
pub use config::{ConfigCell, ConfigError, Configurable, LayerConfig, ParamKind, ParamSpec, ParamValue};
pub use layer::{FacetLayer, LayerId, RenderError};
pub use layers::field::{FieldConfig, FieldFacetLayer};
pub use layers::graph::{GraphConfig, GraphFacetLayer};
pub use layers::nominal::NominalFacetLayer;
pub use observer::{ObserverId, Observers};
pub use registry::LayerRegistry;
pub use stack::{LayerStack, StackEntry};
