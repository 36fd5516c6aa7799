use rstar::{RTree, RTreeObject, AABB};

use crate::geometry::{BBox, Point};
use crate::graph::{Graph, Triangle};

/// Orientation tolerance for points lying on a triangle edge.
const EDGE_EPSILON: f64 = 1e-9;

/// A triangle located by [`TriangleLookup::locate`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TriangleHit {
    /// Index of the graph within its facet.
    pub graph: usize,
    pub triangle: Triangle,
}

/// An entry in the R-tree: one fan triangle with its resolved vertices.
#[derive(Debug, Clone)]
struct TriangleEntry {
    hit: TriangleHit,
    points: [Point; 3],
    bbox: BBox,
}

impl RTreeObject for TriangleEntry {
    type Envelope = AABB<[f64; 2]>;

    fn envelope(&self) -> Self::Envelope {
        AABB::from_corners(
            [self.bbox.min.x, self.bbox.min.z],
            [self.bbox.max.x, self.bbox.max.z],
        )
    }
}

impl TriangleEntry {
    fn contains(&self, p: Point) -> bool {
        let [a, b, c] = self.points;
        let d1 = cross(a, b, p);
        let d2 = cross(b, c, p);
        let d3 = cross(c, a, p);
        let has_neg = d1 < -EDGE_EPSILON || d2 < -EDGE_EPSILON || d3 < -EDGE_EPSILON;
        let has_pos = d1 > EDGE_EPSILON || d2 > EDGE_EPSILON || d3 > EDGE_EPSILON;
        !(has_neg && has_pos)
    }
}

fn cross(a: Point, b: Point, p: Point) -> f64 {
    (b.x - a.x) * (p.z - a.z) - (b.z - a.z) * (p.x - a.x)
}

/// Point location over the fan triangulation of a set of graphs.
///
/// Candidates come from an R-tree over triangle bounding boxes and are then
/// tested exactly, edges inclusive. Degenerate triangles are not indexed.
pub struct TriangleLookup {
    tree: RTree<TriangleEntry>,
}

impl TriangleLookup {
    pub fn build(graphs: &[Graph]) -> Self {
        let mut entries = Vec::new();
        for (gi, graph) in graphs.iter().enumerate() {
            for triangle in graph.triangles() {
                let points = graph.triangle_points(&triangle);
                let [a, b, c] = points;
                if cross(a, b, c).abs() <= EDGE_EPSILON {
                    continue;
                }
                if let Some(bbox) = BBox::from_points(&points) {
                    entries.push(TriangleEntry {
                        hit: TriangleHit { graph: gi, triangle },
                        points,
                        bbox,
                    });
                }
            }
        }
        Self {
            tree: RTree::bulk_load(entries),
        }
    }

    /// The triangle containing `p`. When several share the point (an edge or
    /// a vertex) the lowest graph, cell and corner wins.
    pub fn locate(&self, p: Point) -> Option<TriangleHit> {
        let probe = AABB::from_point([p.x, p.z]);
        self.tree
            .locate_in_envelope_intersecting(&probe)
            .filter(|entry| entry.contains(p))
            .map(|entry| entry.hit)
            .min_by_key(|hit| (hit.graph, hit.triangle))
    }

    /// Number of indexed triangles.
    pub fn len(&self) -> usize {
        self.tree.size()
    }

    pub fn is_empty(&self) -> bool {
        self.tree.size() == 0
    }
}

impl std::fmt::Debug for TriangleLookup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TriangleLookup")
            .field("triangles", &self.tree.size())
            .finish()
    }
}
