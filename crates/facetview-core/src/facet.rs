use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::geometry::Rect2i;

/// The facet kinds a region can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum FacetKind {
    SurfaceHeight,
    Humidity,
    Temperature,
    Biome,
    Graph,
}

impl FacetKind {
    pub const ALL: [FacetKind; 5] = [
        FacetKind::SurfaceHeight,
        FacetKind::Humidity,
        FacetKind::Temperature,
        FacetKind::Biome,
        FacetKind::Graph,
    ];

    pub fn shape(self) -> FacetShape {
        match self {
            FacetKind::SurfaceHeight | FacetKind::Humidity | FacetKind::Temperature => {
                FacetShape::Field
            }
            FacetKind::Biome => FacetShape::Nominal,
            FacetKind::Graph => FacetShape::Graph,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FacetKind::SurfaceHeight => "Surface Height",
            FacetKind::Humidity => "Humidity",
            FacetKind::Temperature => "Temperature",
            FacetKind::Biome => "Biome",
            FacetKind::Graph => "Graph",
        }
    }
}

impl fmt::Display for FacetKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// How the data of a facet kind is laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FacetShape {
    /// One `f64` per cell.
    Field,
    /// One optional value of an arbitrary type per cell.
    Nominal,
    /// A set of planar subdivisions.
    Graph,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum FacetError {
    #[error("Facet '{0}' is not present in the region")]
    NotPresent(FacetKind),

    #[error("Facet '{kind}' is a {actual:?} facet, expected {expected:?}")]
    WrongShape {
        kind: FacetKind,
        expected: FacetShape,
        actual: FacetShape,
    },

    #[error("Facet '{kind}' does not hold values of type {type_name}")]
    ValueType {
        kind: FacetKind,
        type_name: &'static str,
    },

    #[error("World coordinate ({x}, {z}) is outside the facet")]
    OutOfBounds { x: i32, z: i32 },

    #[error("Grid of {actual} samples does not cover {bounds} ({expected} samples)")]
    SizeMismatch {
        bounds: Rect2i,
        expected: usize,
        actual: usize,
    },

    #[error("Facet '{kind}' covers {actual}, region covers {expected}")]
    BoundsMismatch {
        kind: FacetKind,
        expected: Rect2i,
        actual: Rect2i,
    },

    #[error("Corner {0} does not exist in the graph")]
    UnknownCorner(usize),
}

/// A scalar grid. Samples may be non-finite, which marks them invalid.
#[derive(Debug, Clone, PartialEq)]
pub struct FieldFacet {
    bounds: Rect2i,
    values: Vec<f64>,
}

impl FieldFacet {
    /// `values` are row-major, `bounds.size_x` per row.
    pub fn new(bounds: Rect2i, values: Vec<f64>) -> Result<Self, FacetError> {
        if values.len() != bounds.area() {
            return Err(FacetError::SizeMismatch {
                bounds,
                expected: bounds.area(),
                actual: values.len(),
            });
        }
        Ok(Self { bounds, values })
    }

    /// Samples `f` at every world coordinate of `bounds`.
    pub fn from_fn(bounds: Rect2i, mut f: impl FnMut(i32, i32) -> f64) -> Self {
        let mut values = Vec::with_capacity(bounds.area());
        for z in bounds.min_z..bounds.max_z() {
            for x in bounds.min_x..bounds.max_x() {
                values.push(f(x, z));
            }
        }
        Self { bounds, values }
    }

    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    pub fn width(&self) -> usize {
        self.bounds.size_x as usize
    }

    pub fn height(&self) -> usize {
        self.bounds.size_z as usize
    }

    /// Region-local lookup. `None` outside the grid.
    pub fn get(&self, x: usize, z: usize) -> Option<f64> {
        if x >= self.width() {
            return None;
        }
        self.values.get(z * self.width() + x).copied()
    }

    pub fn get_world(&self, x: i32, z: i32) -> Result<f64, FacetError> {
        self.bounds
            .index_of(x, z)
            .map(|idx| self.values[idx])
            .ok_or(FacetError::OutOfBounds { x, z })
    }

    /// One row of samples in region-local coordinates.
    pub fn row(&self, z: usize) -> &[f64] {
        let w = self.width();
        &self.values[z * w..(z + 1) * w]
    }
}

/// A categorical grid. Absent cells hold `None`.
#[derive(Debug, Clone, PartialEq)]
pub struct NominalFacet<E> {
    bounds: Rect2i,
    values: Vec<Option<E>>,
}

impl<E> NominalFacet<E> {
    pub fn new(bounds: Rect2i, values: Vec<Option<E>>) -> Result<Self, FacetError> {
        if values.len() != bounds.area() {
            return Err(FacetError::SizeMismatch {
                bounds,
                expected: bounds.area(),
                actual: values.len(),
            });
        }
        Ok(Self { bounds, values })
    }

    pub fn from_fn(bounds: Rect2i, mut f: impl FnMut(i32, i32) -> Option<E>) -> Self {
        let mut values = Vec::with_capacity(bounds.area());
        for z in bounds.min_z..bounds.max_z() {
            for x in bounds.min_x..bounds.max_x() {
                values.push(f(x, z));
            }
        }
        Self { bounds, values }
    }

    pub fn bounds(&self) -> Rect2i {
        self.bounds
    }

    pub fn width(&self) -> usize {
        self.bounds.size_x as usize
    }

    pub fn height(&self) -> usize {
        self.bounds.size_z as usize
    }

    pub fn get(&self, x: usize, z: usize) -> Option<&E> {
        if x >= self.width() {
            return None;
        }
        self.values.get(z * self.width() + x)?.as_ref()
    }

    /// `Ok(None)` is an absent sample, `Err` a coordinate outside the grid.
    pub fn get_world(&self, x: i32, z: i32) -> Result<Option<&E>, FacetError> {
        self.bounds
            .index_of(x, z)
            .map(|idx| self.values[idx].as_ref())
            .ok_or(FacetError::OutOfBounds { x, z })
    }

    pub fn row(&self, z: usize) -> &[Option<E>] {
        let w = self.width();
        &self.values[z * w..(z + 1) * w]
    }
}
