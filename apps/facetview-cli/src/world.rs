//! Synthetic world generator feeding the renderer.
//!
//! Scalar facets come from bilinear value noise over a coarse random lattice;
//! biomes are classified from those fields and the graph facet is a jittered
//! square lattice.

use std::fmt;

use facetview_core::{
    Color, FacetError, FacetKind, FieldFacet, Graph, GraphFacet, NominalFacet, Point, Rect2i, Region,
};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Biome {
    Ocean,
    Beach,
    Plains,
    Forest,
    Desert,
    Mountain,
    Snow,
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Biome::Ocean => "OCEAN",
            Biome::Beach => "BEACH",
            Biome::Plains => "PLAINS",
            Biome::Forest => "FOREST",
            Biome::Desert => "DESERT",
            Biome::Mountain => "MOUNTAIN",
            Biome::Snow => "SNOW",
        };
        f.write_str(name)
    }
}

impl Biome {
    pub fn classify(height: f64, humidity: f64, temperature: f64) -> Self {
        if height < 90.0 {
            Biome::Ocean
        } else if height < 100.0 {
            Biome::Beach
        } else if temperature < 0.0 {
            Biome::Snow
        } else if height > 200.0 {
            Biome::Mountain
        } else if humidity < 0.25 {
            Biome::Desert
        } else if humidity > 0.6 {
            Biome::Forest
        } else {
            Biome::Plains
        }
    }

    pub fn color(&self) -> Color {
        match self {
            Biome::Ocean => Color::rgb(0, 0, 96),
            Biome::Beach => Color::rgb(80, 72, 32),
            Biome::Plains => Color::rgb(40, 80, 16),
            Biome::Forest => Color::rgb(0, 56, 0),
            Biome::Desert => Color::rgb(96, 80, 24),
            Biome::Mountain => Color::rgb(48, 48, 48),
            Biome::Snow => Color::rgb(112, 112, 112),
        }
    }
}

/// Bilinear value noise in `0..1` over a random lattice of spacing `cell`.
struct ValueNoise {
    origin_x: i32,
    origin_z: i32,
    cell: f64,
    cols: usize,
    values: Vec<f64>,
}

impl ValueNoise {
    fn new(rng: &mut SmallRng, bounds: Rect2i, cell: i32) -> Self {
        let cell = cell.max(1);
        let cols = (bounds.size_x / cell + 2) as usize;
        let rows = (bounds.size_z / cell + 2) as usize;
        let values = (0..cols * rows).map(|_| rng.gen::<f64>()).collect();
        Self {
            origin_x: bounds.min_x,
            origin_z: bounds.min_z,
            cell: cell as f64,
            cols,
            values,
        }
    }

    fn at(&self, col: usize, row: usize) -> f64 {
        self.values[row * self.cols + col]
    }

    fn sample(&self, x: i32, z: i32) -> f64 {
        let fx = (x - self.origin_x) as f64 / self.cell;
        let fz = (z - self.origin_z) as f64 / self.cell;
        let (col, row) = (fx.floor() as usize, fz.floor() as usize);
        let tx = smoothstep(fx.fract());
        let tz = smoothstep(fz.fract());
        let top = lerp(self.at(col, row), self.at(col + 1, row), tx);
        let bottom = lerp(self.at(col, row + 1), self.at(col + 1, row + 1), tx);
        lerp(top, bottom, tz)
    }
}

fn smoothstep(t: f64) -> f64 {
    t * t * (3.0 - 2.0 * t)
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

#[derive(Debug, Clone, Copy)]
pub struct WorldOptions {
    pub seed: u64,
    pub bounds: Rect2i,
    /// Side of one graph cell in blocks.
    pub graph_step: i32,
}

/// Generates a region carrying every facet kind.
pub fn generate(options: &WorldOptions) -> Result<Region, FacetError> {
    let WorldOptions {
        seed,
        bounds,
        graph_step,
    } = *options;
    let mut rng = SmallRng::seed_from_u64(seed);

    let terrain = ValueNoise::new(&mut rng, bounds, 48);
    let moisture = ValueNoise::new(&mut rng, bounds, 64);
    let weather = ValueNoise::new(&mut rng, bounds, 96);

    let height = FieldFacet::from_fn(bounds, |x, z| terrain.sample(x, z) * 255.0);
    let humidity = FieldFacet::from_fn(bounds, |x, z| moisture.sample(x, z));
    let temperature = FieldFacet::from_fn(bounds, |x, z| {
        let latitude = (z - bounds.min_z) as f64 / bounds.size_z.max(1) as f64;
        35.0 - 40.0 * latitude + 10.0 * (weather.sample(x, z) - 0.5)
            - 0.05 * terrain.sample(x, z) * 255.0
    });

    let biomes = NominalFacet::from_fn(bounds, |x, z| {
        let h = height.get_world(x, z).ok()?;
        let m = humidity.get_world(x, z).ok()?;
        let t = temperature.get_world(x, z).ok()?;
        Some(Biome::classify(h, m, t))
    });

    let jitter = graph_step.max(1) as f64 / 4.0;
    let graph = Graph::lattice_with(bounds, graph_step, |_, _, middle| {
        Some(Point::new(
            middle.x + rng.gen_range(-jitter..=jitter),
            middle.z + rng.gen_range(-jitter..=jitter),
        ))
    });
    log::info!(
        "Generated world {} (seed {}): {} graph cells",
        bounds,
        seed,
        graph.cells().len()
    );

    Ok(Region::builder(bounds)
        .field(FacetKind::SurfaceHeight, height)?
        .field(FacetKind::Humidity, humidity)?
        .field(FacetKind::Temperature, temperature)?
        .nominal(FacetKind::Biome, biomes)?
        .graph(GraphFacet::new(bounds, vec![graph]))?
        .build())
}
