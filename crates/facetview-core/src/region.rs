use std::any::{type_name, Any};
use std::collections::HashMap;
use std::fmt;

use crate::facet::{FacetError, FacetKind, FacetShape, FieldFacet, NominalFacet};
use crate::geometry::Rect2i;
use crate::graph::GraphFacet;

enum FacetData {
    Field(FieldFacet),
    Nominal(Box<dyn Any + Send + Sync>),
    Graph(GraphFacet),
}

impl FacetData {
    fn shape(&self) -> FacetShape {
        match self {
            FacetData::Field(_) => FacetShape::Field,
            FacetData::Nominal(_) => FacetShape::Nominal,
            FacetData::Graph(_) => FacetShape::Graph,
        }
    }
}

/// A rectangular area of world space and the facets generated for it.
///
/// Immutable once built. Layers borrow it for the duration of a render call.
pub struct Region {
    bounds: Rect2i,
    facets: HashMap<FacetKind, FacetData>,
}

impl Region {
    pub fn builder(bounds: Rect2i) -> RegionBuilder {
        RegionBuilder {
            region: Region {
                bounds,
                facets: HashMap::new(),
            },
        }
    }

    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    pub fn has_facet(&self, kind: FacetKind) -> bool {
        self.facets.contains_key(&kind)
    }

    pub fn kinds(&self) -> impl Iterator<Item = FacetKind> + '_ {
        self.facets.keys().copied()
    }

    fn facet(&self, kind: FacetKind) -> Result<&FacetData, FacetError> {
        self.facets.get(&kind).ok_or(FacetError::NotPresent(kind))
    }

    pub fn field(&self, kind: FacetKind) -> Result<&FieldFacet, FacetError> {
        match self.facet(kind)? {
            FacetData::Field(facet) => Ok(facet),
            other => Err(wrong_shape(kind, FacetShape::Field, other)),
        }
    }

    pub fn nominal<E: 'static>(&self, kind: FacetKind) -> Result<&NominalFacet<E>, FacetError> {
        match self.facet(kind)? {
            FacetData::Nominal(any) => any.downcast_ref::<NominalFacet<E>>().ok_or(FacetError::ValueType {
                kind,
                type_name: type_name::<E>(),
            }),
            other => Err(wrong_shape(kind, FacetShape::Nominal, other)),
        }
    }

    pub fn graph(&self) -> Result<&GraphFacet, FacetError> {
        match self.facet(FacetKind::Graph)? {
            FacetData::Graph(facet) => Ok(facet),
            other => Err(wrong_shape(FacetKind::Graph, FacetShape::Graph, other)),
        }
    }
}

fn wrong_shape(kind: FacetKind, expected: FacetShape, data: &FacetData) -> FacetError {
    FacetError::WrongShape {
        kind,
        expected,
        actual: data.shape(),
    }
}

impl fmt::Debug for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<FacetKind> = self.kinds().collect();
        kinds.sort();
        f.debug_struct("Region")
            .field("bounds", &self.bounds)
            .field("facets", &kinds)
            .finish()
    }
}

/// Assembles a [`Region`]. Grid facets must cover exactly the region bounds.
#[derive(Debug)]
pub struct RegionBuilder {
    region: Region,
}

impl RegionBuilder {
    fn check(&self, kind: FacetKind, shape: FacetShape, bounds: Option<Rect2i>) -> Result<(), FacetError> {
        if kind.shape() != shape {
            return Err(FacetError::WrongShape {
                kind,
                expected: kind.shape(),
                actual: shape,
            });
        }
        match bounds {
            Some(actual) if actual != self.region.bounds => Err(FacetError::BoundsMismatch {
                kind,
                expected: self.region.bounds,
                actual,
            }),
            _ => Ok(()),
        }
    }

    pub fn field(mut self, kind: FacetKind, facet: FieldFacet) -> Result<Self, FacetError> {
        self.check(kind, FacetShape::Field, Some(facet.bounds()))?;
        self.region.facets.insert(kind, FacetData::Field(facet));
        Ok(self)
    }

    pub fn nominal<E: Send + Sync + 'static>(
        mut self,
        kind: FacetKind,
        facet: NominalFacet<E>,
    ) -> Result<Self, FacetError> {
        self.check(kind, FacetShape::Nominal, Some(facet.bounds()))?;
        self.region
            .facets
            .insert(kind, FacetData::Nominal(Box::new(facet)));
        Ok(self)
    }

    /// Graph facets may extend past the region; graphs are not clipped.
    pub fn graph(mut self, facet: GraphFacet) -> Result<Self, FacetError> {
        self.check(FacetKind::Graph, FacetShape::Graph, None)?;
        self.region.facets.insert(FacetKind::Graph, FacetData::Graph(facet));
        Ok(self)
    }

    pub fn build(self) -> Region {
        self.region
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::Graph;

    fn bounds() -> Rect2i {
        Rect2i::new(0, 0, 2, 2)
    }

    #[test]
    fn test_field_roundtrip() {
        let region = Region::builder(bounds())
            .field(FacetKind::SurfaceHeight, FieldFacet::new(bounds(), vec![1.0; 4]).unwrap())
            .unwrap()
            .build();
        assert!(region.has_facet(FacetKind::SurfaceHeight));
        assert_eq!(region.field(FacetKind::SurfaceHeight).unwrap().get(1, 1), Some(1.0));
    }

    #[test]
    fn test_missing_facet() {
        let region = Region::builder(bounds()).build();
        assert_eq!(
            region.field(FacetKind::Humidity).unwrap_err(),
            FacetError::NotPresent(FacetKind::Humidity)
        );
        assert!(region.graph().is_err());
    }

    #[test]
    fn test_builder_rejects_wrong_kind() {
        let err = Region::builder(bounds())
            .field(FacetKind::Biome, FieldFacet::new(bounds(), vec![0.0; 4]).unwrap())
            .unwrap_err();
        assert!(matches!(err, FacetError::WrongShape { kind: FacetKind::Biome, .. }));
    }

    #[test]
    fn test_builder_rejects_other_bounds() {
        let other = Rect2i::new(1, 0, 2, 2);
        let err = Region::builder(bounds())
            .field(FacetKind::Humidity, FieldFacet::new(other, vec![0.0; 4]).unwrap())
            .unwrap_err();
        assert!(matches!(err, FacetError::BoundsMismatch { .. }));
    }

    #[test]
    fn test_nominal_downcast() {
        let facet = NominalFacet::new(bounds(), vec![Some(3u8), None, Some(1), Some(2)]).unwrap();
        let region = Region::builder(bounds())
            .nominal(FacetKind::Biome, facet)
            .unwrap()
            .build();
        assert_eq!(region.nominal::<u8>(FacetKind::Biome).unwrap().get(0, 0), Some(&3));
        assert!(matches!(
            region.nominal::<String>(FacetKind::Biome),
            Err(FacetError::ValueType { .. })
        ));
    }

    #[test]
    fn test_graph_facet() {
        let graph = Graph::lattice(bounds(), 2);
        let region = Region::builder(bounds())
            .graph(GraphFacet::new(bounds(), vec![graph]))
            .unwrap()
            .build();
        assert_eq!(region.graph().unwrap().graphs().len(), 1);
        assert!(matches!(
            region.field(FacetKind::Graph),
            Err(FacetError::WrongShape { .. })
        ));
    }
}
