//! # FacetView Core
//!
//! Data model shared by the FacetView renderers: the packed RGBA color model,
//! integer and floating point geometry, the region/facet data contract and the
//! Voronoi graph model with its cached triangle lookup.
//!
//! Region and facet values are produced by a world generator; this
//! crate only defines how they are shaped and queried.

pub mod color;
pub mod facet;
pub mod geometry;
pub mod graph;
pub mod region;
pub mod spatial;

pub use color::{Color, GRAYS};
pub use facet::{FacetError, FacetKind, FacetShape, FieldFacet, NominalFacet};
pub use geometry::{BBox, Point, Rect2i};
pub use graph::{Cell, CellId, Corner, CornerId, Edge, Graph, GraphFacet, Triangle};
pub use region::{Region, RegionBuilder};
pub use spatial::{TriangleHit, TriangleLookup};
