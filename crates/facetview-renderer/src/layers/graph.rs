//! Draws Voronoi graphs: edges, fan triangles, corners, sites and bounds, plus
//! an overlay that marks world points missed by the triangle lookup.

use std::sync::Arc;
use std::time::Instant;

use facetview_core::{Cell, CellId, Color, FacetKind, Graph, GraphFacet, Region, Triangle};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::buffer::PixelBuffer;
use crate::config::{ConfigCell, ConfigError, Configurable, LayerConfig, ParamKind, ParamSpec, ParamValue};
use crate::layer::{FacetLayer, LayerId, RenderError};
use crate::observer::Observers;
use crate::raster::Canvas;

const TRIANGLE_SEED: u64 = 12332434;
const EDGE_COLOR: Color = Color::new(192, 192, 192, 160);
const MISS_DIAMETER: f64 = 10.0;
const MISS_STROKE: f64 = 3.0;

/// Persistent settings of a [`GraphFacetLayer`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct GraphConfig {
    pub show_edges: bool,
    pub show_bounds: bool,
    pub show_corners: bool,
    pub show_sites: bool,
    pub show_lookup: bool,
    pub show_tris: bool,
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            show_edges: true,
            show_bounds: true,
            show_corners: true,
            show_sites: true,
            show_lookup: false,
            show_tris: false,
        }
    }
}

const fn flag(name: &'static str, label: &'static str) -> ParamSpec {
    ParamSpec {
        name,
        label,
        kind: ParamKind::Flag,
    }
}

static GRAPH_PARAMS: [ParamSpec; 6] = [
    flag("show_edges", "Edges"),
    flag("show_tris", "Triangles"),
    flag("show_corners", "Corners"),
    flag("show_sites", "Sites"),
    flag("show_bounds", "Bounds"),
    flag("show_lookup", "Triangle Lookup"),
];

impl Configurable for GraphConfig {
    fn params() -> &'static [ParamSpec] {
        &GRAPH_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParamValue> {
        let flag = match name {
            "show_edges" => self.show_edges,
            "show_tris" => self.show_tris,
            "show_corners" => self.show_corners,
            "show_sites" => self.show_sites,
            "show_bounds" => self.show_bounds,
            "show_lookup" => self.show_lookup,
            _ => return None,
        };
        Some(ParamValue::Flag(flag))
    }

    fn apply(&mut self, name: &str, value: ParamValue) -> Result<(), ConfigError> {
        let slot = match name {
            "show_edges" => &mut self.show_edges,
            "show_tris" => &mut self.show_tris,
            "show_corners" => &mut self.show_corners,
            "show_sites" => &mut self.show_sites,
            "show_bounds" => &mut self.show_bounds,
            "show_lookup" => &mut self.show_lookup,
            _ => return Err(ConfigError::UnknownParam(name.to_string())),
        };
        *slot = value.as_flag().ok_or_else(|| ConfigError::flag(name))?;
        Ok(())
    }
}

/// Renders the graph facet of a region.
#[derive(Debug)]
pub struct GraphFacetLayer {
    id: LayerId,
    config: ConfigCell<GraphConfig>,
}

impl Default for GraphFacetLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl GraphFacetLayer {
    pub fn new() -> Self {
        Self::with_config(GraphConfig::default())
    }

    pub fn with_config(config: GraphConfig) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            config: ConfigCell::new(id, config),
        }
    }

    pub fn settings(&self) -> Arc<GraphConfig> {
        self.config.snapshot()
    }

    pub fn show_edges(&self) -> bool {
        self.config.snapshot().show_edges
    }

    pub fn set_show_edges(&self, show: bool) -> bool {
        self.config.update(|c| c.show_edges = show)
    }

    pub fn show_bounds(&self) -> bool {
        self.config.snapshot().show_bounds
    }

    pub fn set_show_bounds(&self, show: bool) -> bool {
        self.config.update(|c| c.show_bounds = show)
    }

    pub fn show_corners(&self) -> bool {
        self.config.snapshot().show_corners
    }

    pub fn set_show_corners(&self, show: bool) -> bool {
        self.config.update(|c| c.show_corners = show)
    }

    pub fn show_sites(&self) -> bool {
        self.config.snapshot().show_sites
    }

    pub fn set_show_sites(&self, show: bool) -> bool {
        self.config.update(|c| c.show_sites = show)
    }

    pub fn show_tris(&self) -> bool {
        self.config.snapshot().show_tris
    }

    pub fn set_show_tris(&self, show: bool) -> bool {
        self.config.update(|c| c.show_tris = show)
    }

    pub fn show_lookup(&self) -> bool {
        self.config.snapshot().show_lookup
    }

    pub fn set_show_lookup(&self, show: bool) -> bool {
        self.config.update(|c| c.show_lookup = show)
    }
}

impl FacetLayer for GraphFacetLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> String {
        FacetKind::Graph.name().to_string()
    }

    fn facet_kind(&self) -> FacetKind {
        FacetKind::Graph
    }

    fn check_region(&self, region: &Region) -> Result<(), RenderError> {
        region.graph()?;
        Ok(())
    }

    fn render(&self, buffer: &mut PixelBuffer, region: &Region) -> Result<(), RenderError> {
        let config = self.config.snapshot();
        let facet = region.graph()?;
        let started = Instant::now();

        let bounds = region.bounds();
        let mut canvas = Canvas::translated(buffer, bounds.min_x, bounds.min_z);
        for graph in facet.graphs().iter().filter(|g| !g.is_empty()) {
            if config.show_edges {
                draw_edges(&mut canvas, graph);
            }
            if config.show_tris {
                draw_triangles(&mut canvas, graph);
            }
            if config.show_corners {
                draw_corners(&mut canvas, graph);
            }
            if config.show_sites {
                draw_sites(&mut canvas, graph);
            }
            if config.show_bounds {
                draw_bounds(&mut canvas, graph);
            }
        }
        if config.show_lookup {
            draw_triangle_lookup(&mut canvas, facet);
        }

        log::trace!(
            "Rendered {} graphs in {}ms",
            facet.graphs().len(),
            started.elapsed().as_millis()
        );
        Ok(())
    }

    fn world_text(&self, region: &Region, wx: i32, wz: i32) -> Result<Option<String>, RenderError> {
        let facet = region.graph()?;
        let text = facet
            .graphs()
            .iter()
            .filter(|g| !g.is_empty())
            .find(|g| g.bounds().contains(wx, wz))
            .map(|g| {
                format!(
                    "{} regs, {} corners, {} edges",
                    g.cells().len(),
                    g.corners().len(),
                    g.edges().len()
                )
            });
        Ok(text)
    }

    fn config(&self) -> Option<&dyn LayerConfig> {
        Some(&self.config as &dyn LayerConfig)
    }

    fn observers(&self) -> &Observers {
        self.config.observers()
    }
}

pub fn draw_edges(canvas: &mut Canvas<'_>, graph: &Graph) {
    for edge in graph.edges() {
        let a = graph.corner_location(edge.corner0);
        let b = graph.corner_location(edge.corner1);
        canvas.draw_line(a.x as i32, a.z as i32, b.x as i32, b.z as i32, EDGE_COLOR);
    }
}

/// Fills every cell's corner loop with the color `color_fn` assigns it.
pub fn draw_polygons(canvas: &mut Canvas<'_>, graph: &Graph, color_fn: impl Fn(CellId, &Cell) -> Color) {
    for (id, cell) in graph.cells().iter().enumerate() {
        let points: Vec<(i32, i32)> = cell
            .corners
            .iter()
            .map(|&c| {
                let loc = graph.corner_location(c);
                (loc.x as i32, loc.z as i32)
            })
            .collect();
        canvas.fill_polygon(&points, color_fn(id, cell));
    }
}

/// Each fan triangle gets its own color from a fixed-seed generator, so the
/// palette is stable between frames.
pub fn draw_triangles(canvas: &mut Canvas<'_>, graph: &Graph) {
    let mut rng = SmallRng::seed_from_u64(TRIANGLE_SEED);
    for tri in graph.triangles() {
        let color = Color::from_rgb24(rng.gen_range(0..0x00FF_FFFF));
        draw_triangle(canvas, graph, &tri, color);
    }
}

pub fn draw_triangle(canvas: &mut Canvas<'_>, graph: &Graph, tri: &Triangle, color: Color) {
    let points = graph
        .triangle_points(tri)
        .map(|p| (p.x.round() as i32, p.z.round() as i32));
    canvas.fill_polygon(&points, color);
}

pub fn draw_corners(canvas: &mut Canvas<'_>, graph: &Graph) {
    for corner in graph.corners() {
        let loc = corner.location;
        canvas.fill_rect(
            (loc.x - 1.0).floor() as i32,
            (loc.z - 1.0).floor() as i32,
            2,
            2,
            Color::WHITE,
        );
    }
}

pub fn draw_sites(canvas: &mut Canvas<'_>, graph: &Graph) {
    for cell in graph.cells() {
        let c = cell.center;
        canvas.fill_rect(
            (c.x - 1.0).floor() as i32,
            (c.z - 1.0).floor() as i32,
            2,
            2,
            Color::BLACK,
        );
    }
}

pub fn draw_bounds(canvas: &mut Canvas<'_>, graph: &Graph) {
    let b = graph.bounds();
    canvas.draw_rect(b.min_x, b.min_z, b.size_x, b.size_z, Color::PINK);
}

/// Every integer world point of the facet's region that no triangle covers.
pub fn lookup_misses(facet: &GraphFacet) -> Vec<(i32, i32)> {
    let region = facet.world_region();
    let mut misses = Vec::new();
    for z in region.min_z..region.max_z() {
        for x in region.min_x..region.max_x() {
            if facet.world_triangle(x, z).is_none() {
                misses.push((x, z));
            }
        }
    }
    misses
}

pub fn draw_triangle_lookup(canvas: &mut Canvas<'_>, facet: &GraphFacet) {
    let misses = lookup_misses(facet);
    if !misses.is_empty() {
        log::debug!("Triangle lookup missed {} points", misses.len());
    }
    for (x, z) in misses {
        canvas.draw_ring(x, z, MISS_DIAMETER, MISS_STROKE, Color::RED);
    }
}
