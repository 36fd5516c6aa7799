//! Voronoi graph model.
//!
//! A [`Graph`] is one planar subdivision: corners, the edges between them and
//! the cells bounded by ordered corner loops. The geometry is computed by the
//! world generator; this module stores and walks it.

use serde::{Deserialize, Serialize};

use crate::facet::FacetError;
use crate::geometry::{Point, Rect2i};
use crate::spatial::{TriangleHit, TriangleLookup};

/// Index into [`Graph::corners`].
pub type CornerId = usize;

/// Index into [`Graph::cells`].
pub type CellId = usize;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Corner {
    pub location: Point,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Edge {
    pub corner0: CornerId,
    pub corner1: CornerId,
}

/// A Voronoi cell: its site and the loop of corners around it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cell {
    pub center: Point,
    pub corners: Vec<CornerId>,
}

/// A fan triangle of a cell: the cell center plus two adjacent corners.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Triangle {
    pub cell: CellId,
    pub corner1: CornerId,
    pub corner2: CornerId,
}

/// Deserialization goes through [`GraphData`] so corner references are
/// validated like [`Graph::add_edge`] and [`Graph::add_cell`] do.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GraphData")]
pub struct Graph {
    bounds: Rect2i,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
    cells: Vec<Cell>,
}

#[derive(Deserialize)]
struct GraphData {
    bounds: Rect2i,
    corners: Vec<Corner>,
    edges: Vec<Edge>,
    cells: Vec<Cell>,
}

impl TryFrom<GraphData> for Graph {
    type Error = FacetError;

    fn try_from(data: GraphData) -> Result<Self, Self::Error> {
        let mut graph = Graph::new(data.bounds);
        graph.corners = data.corners;
        for edge in data.edges {
            graph.add_edge(edge.corner0, edge.corner1)?;
        }
        for cell in data.cells {
            graph.add_cell(cell.center, cell.corners)?;
        }
        Ok(graph)
    }
}

impl Graph {
    /// An empty graph covering `bounds`.
    pub fn new(bounds: Rect2i) -> Self {
        Self {
            bounds,
            corners: Vec::new(),
            edges: Vec::new(),
            cells: Vec::new(),
        }
    }

    /// A regular lattice of square cells of side `step` covering `bounds`.
    pub fn lattice(bounds: Rect2i, step: i32) -> Self {
        Self::lattice_with(bounds, step, |_, _, center| Some(center))
    }

    /// Like [`Graph::lattice`], but `site` picks each cell's center from its
    /// column, row and geometric middle. Returning `None` leaves the cell out.
    pub fn lattice_with(
        bounds: Rect2i,
        step: i32,
        mut site: impl FnMut(usize, usize, Point) -> Option<Point>,
    ) -> Self {
        let mut graph = Self::new(bounds);
        if bounds.is_empty() {
            return graph;
        }
        let step = step.max(1);

        let mut xs: Vec<i32> = (bounds.min_x..bounds.max_x()).step_by(step as usize).collect();
        xs.push(bounds.max_x());
        let mut zs: Vec<i32> = (bounds.min_z..bounds.max_z()).step_by(step as usize).collect();
        zs.push(bounds.max_z());

        let cols = xs.len();
        for &z in &zs {
            for &x in &xs {
                graph.add_corner(Point::new(x as f64, z as f64));
            }
        }
        let id = |col: usize, row: usize| row * cols + col;

        for row in 0..zs.len() {
            for col in 0..cols {
                if col + 1 < cols {
                    graph.edges.push(Edge {
                        corner0: id(col, row),
                        corner1: id(col + 1, row),
                    });
                }
                if row + 1 < zs.len() {
                    graph.edges.push(Edge {
                        corner0: id(col, row),
                        corner1: id(col, row + 1),
                    });
                }
            }
        }

        for row in 0..zs.len() - 1 {
            for col in 0..cols - 1 {
                let middle = Point::new(
                    (xs[col] + xs[col + 1]) as f64 / 2.0,
                    (zs[row] + zs[row + 1]) as f64 / 2.0,
                );
                if let Some(center) = site(col, row, middle) {
                    graph.cells.push(Cell {
                        center,
                        corners: vec![
                            id(col, row),
                            id(col + 1, row),
                            id(col + 1, row + 1),
                            id(col, row + 1),
                        ],
                    });
                }
            }
        }

        graph
    }

    /// Appends a corner and returns its id.
    pub fn add_corner(&mut self, location: Point) -> CornerId {
        self.corners.push(Corner { location });
        self.corners.len() - 1
    }

    /// Connects two existing corners. Returns the edge index.
    pub fn add_edge(&mut self, corner0: CornerId, corner1: CornerId) -> Result<usize, FacetError> {
        self.check_corner(corner0)?;
        self.check_corner(corner1)?;
        self.edges.push(Edge { corner0, corner1 });
        Ok(self.edges.len() - 1)
    }

    /// Adds a cell around `center` bounded by the given corner loop.
    pub fn add_cell(&mut self, center: Point, corners: Vec<CornerId>) -> Result<CellId, FacetError> {
        for &c in &corners {
            self.check_corner(c)?;
        }
        self.cells.push(Cell { center, corners });
        Ok(self.cells.len() - 1)
    }

    fn check_corner(&self, id: CornerId) -> Result<(), FacetError> {
        if id < self.corners.len() {
            Ok(())
        } else {
            Err(FacetError::UnknownCorner(id))
        }
    }

    /// World area this graph was generated for.
    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    /// All corners, indexed by [`CornerId`].
    pub fn corners(&self) -> &[Corner] {
        &self.corners
    }

    /// All edges between corners.
    pub fn edges(&self) -> &[Edge] {
        &self.edges
    }

    /// All cells, indexed by [`CellId`].
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Position of a corner. Panics on an id not produced by this graph.
    pub fn corner_location(&self, id: CornerId) -> Point {
        self.corners[id].location
    }

    /// No corners, edges or cells.
    pub fn is_empty(&self) -> bool {
        self.corners.is_empty() && self.edges.is_empty() && self.cells.is_empty()
    }

    /// The fan triangles of one cell, one per pair of adjacent corners.
    pub fn cell_triangles(&self, cell: CellId) -> impl Iterator<Item = Triangle> + '_ {
        let corners = &self.cells[cell].corners;
        let n = if corners.len() < 2 { 0 } else { corners.len() };
        (0..n).map(move |i| Triangle {
            cell,
            corner1: corners[i],
            corner2: corners[(i + 1) % n],
        })
    }

    /// Fan triangles of every cell, cell by cell.
    pub fn triangles(&self) -> impl Iterator<Item = Triangle> + '_ {
        (0..self.cells.len()).flat_map(move |cell| self.cell_triangles(cell))
    }

    /// Resolves a triangle to its center, corner1 and corner2 positions.
    pub fn triangle_points(&self, tri: &Triangle) -> [Point; 3] {
        [
            self.cells[tri.cell].center,
            self.corner_location(tri.corner1),
            self.corner_location(tri.corner2),
        ]
    }
}

/// The graph facet of a region: all graphs touching it plus a triangle lookup
/// built once at construction.
#[derive(Debug)]
pub struct GraphFacet {
    world_region: Rect2i,
    graphs: Vec<Graph>,
    lookup: TriangleLookup,
}

impl GraphFacet {
    /// Indexes the fan triangles of `graphs` for point lookups.
    pub fn new(world_region: Rect2i, graphs: Vec<Graph>) -> Self {
        let lookup = TriangleLookup::build(&graphs);
        log::debug!(
            "Graph facet over {} with {} graphs, {} triangles indexed",
            world_region,
            graphs.len(),
            lookup.len()
        );
        Self {
            world_region,
            graphs,
            lookup,
        }
    }

    /// The world area this facet was requested for.
    pub fn world_region(&self) -> Rect2i {
        self.world_region
    }

    /// The graphs in lookup priority order.
    pub fn graphs(&self) -> &[Graph] {
        &self.graphs
    }

    /// The triangle covering a world coordinate, if any.
    pub fn world_triangle(&self, x: i32, z: i32) -> Option<TriangleHit> {
        self.lookup.locate(Point::new(x as f64, z as f64))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lattice_counts() {
        let graph = Graph::lattice(Rect2i::new(0, 0, 8, 4), 4);
        // 3 x 2 corner grid
        assert_eq!(graph.corners().len(), 6);
        assert_eq!(graph.edges().len(), 7);
        assert_eq!(graph.cells().len(), 2);
        assert_eq!(graph.triangles().count(), 8);
    }

    #[test]
    fn test_lattice_partial_last_column() {
        let graph = Graph::lattice(Rect2i::new(0, 0, 10, 4), 4);
        let max_x = graph
            .corners()
            .iter()
            .map(|c| c.location.x)
            .fold(f64::MIN, f64::max);
        assert_eq!(max_x, 10.0);
        assert_eq!(graph.cells().len(), 3);
    }

    #[test]
    fn test_cell_triangles_wrap_around() {
        let graph = Graph::lattice(Rect2i::new(0, 0, 4, 4), 4);
        let tris: Vec<Triangle> = graph.cell_triangles(0).collect();
        assert_eq!(tris.len(), 4);
        assert_eq!(tris[3].corner1, graph.cells()[0].corners[3]);
        assert_eq!(tris[3].corner2, graph.cells()[0].corners[0]);
        let [center, _, _] = graph.triangle_points(&tris[0]);
        assert_eq!(center, Point::new(2.0, 2.0));
    }

    #[test]
    fn test_add_edge_rejects_unknown_corner() {
        let mut graph = Graph::new(Rect2i::new(0, 0, 4, 4));
        let a = graph.add_corner(Point::new(0.0, 0.0));
        assert_eq!(graph.add_edge(a, 7), Err(FacetError::UnknownCorner(7)));
        assert!(graph.add_cell(Point::new(1.0, 1.0), vec![a, 3]).is_err());
    }

    #[test]
    fn test_deserialize_validates_corners() {
        let graph = Graph::lattice(Rect2i::new(0, 0, 8, 4), 4);
        let json = serde_json::to_string(&graph).unwrap();
        let back: Graph = serde_json::from_str(&json).unwrap();
        assert_eq!(back, graph);

        let bad = r#"{
            "bounds": {"min_x": 0, "min_z": 0, "size_x": 4, "size_z": 4},
            "corners": [{"location": {"x": 0.0, "z": 0.0}}],
            "edges": [],
            "cells": [{"center": {"x": 1.0, "z": 1.0}, "corners": [0, 5]}]
        }"#;
        let err = serde_json::from_str::<Graph>(bad).unwrap_err();
        assert!(err.to_string().contains("5"), "{err}");
    }

    #[test]
    fn test_empty_graph() {
        let graph = Graph::new(Rect2i::new(0, 0, 4, 4));
        assert!(graph.is_empty());
        assert_eq!(graph.triangles().count(), 0);
    }

    #[test]
    fn test_facet_triangle_lookup() {
        let facet = GraphFacet::new(
            Rect2i::new(0, 0, 8, 8),
            vec![Graph::lattice(Rect2i::new(0, 0, 8, 8), 4)],
        );
        let hit = facet.world_triangle(1, 2).unwrap();
        assert_eq!(hit.graph, 0);
        assert_eq!(hit.triangle.cell, 0);
        assert!(facet.world_triangle(20, 2).is_none());
    }
}
