use std::fmt;
use std::sync::Arc;

use facetview_core::{
    Color, FacetError, FacetKind, FieldFacet, Graph, GraphFacet, NominalFacet, Rect2i, Region,
};
use facetview_renderer::{
    FacetLayer, FieldFacetLayer, GraphFacetLayer, LayerRegistry, LayerStack, NominalFacetLayer,
    PixelBuffer, RenderError,
};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Biome {
    Desert,
    Snow,
}

impl fmt::Display for Biome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Biome::Desert => f.write_str("DESERT"),
            Biome::Snow => f.write_str("SNOW"),
        }
    }
}

fn biome_color(biome: &Biome) -> Color {
    match biome {
        Biome::Desert => Color::rgb(60, 40, 0),
        Biome::Snow => Color::rgb(200, 200, 200),
    }
}

fn scenario_region() -> Region {
    let bounds = Rect2i::new(0, 0, 2, 2);
    let height = FieldFacet::new(bounds, vec![0.0, 128.4, f64::NAN, 255.6]).unwrap();
    Region::builder(bounds)
        .field(FacetKind::SurfaceHeight, height)
        .unwrap()
        .build()
}

#[test]
fn test_single_field_layer_scenario() {
    let mut stack = LayerStack::new();
    stack.push(Arc::new(FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0)));

    let mut buf = PixelBuffer::new(2, 2);
    stack.render(&mut buf, &scenario_region()).unwrap();

    assert_eq!(buf.color_at(0, 0), Some(Color::gray(0)));
    assert_eq!(buf.color_at(1, 0), Some(Color::gray(128)));
    assert_eq!(buf.color_at(0, 1), Some(Color::MISSING));
    assert_eq!(buf.color_at(1, 1), Some(Color::gray(255)));
}

#[test]
fn test_stacked_layers_saturate() {
    let bounds = Rect2i::new(0, 0, 2, 1);
    let biomes = NominalFacet::new(bounds, vec![Some(Biome::Desert), Some(Biome::Snow)]).unwrap();
    let region = Region::builder(bounds)
        .field(FacetKind::SurfaceHeight, FieldFacet::from_fn(bounds, |_, _| 100.0))
        .unwrap()
        .nominal(FacetKind::Biome, biomes)
        .unwrap()
        .build();

    let mut stack = LayerStack::new();
    stack.push(Arc::new(FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0)));
    stack.push(Arc::new(NominalFacetLayer::new(FacetKind::Biome, biome_color)));

    let mut buf = PixelBuffer::new(2, 1);
    stack.render(&mut buf, &region).unwrap();
    assert_eq!(buf.color_at(0, 0), Some(Color::rgb(160, 140, 100)));
    assert_eq!(buf.color_at(1, 0), Some(Color::rgb(255, 255, 255)));

    assert_eq!(stack.world_text(&region, 1, 0).unwrap().as_deref(), Some("SNOW"));
    let all = stack.world_text_all(&region, 0, 0).unwrap();
    assert_eq!(
        all,
        vec![
            ("Biome".to_string(), "DESERT".to_string()),
            ("Surface Height".to_string(), "100.00".to_string()),
        ]
    );
}

#[test]
fn test_graph_strokes_over_fields() {
    let bounds = Rect2i::new(-8, -8, 16, 16);
    let region = Region::builder(bounds)
        .field(FacetKind::Humidity, FieldFacet::from_fn(bounds, |_, _| 0.5))
        .unwrap()
        .graph(GraphFacet::new(bounds, vec![Graph::lattice(bounds, 8)]))
        .unwrap()
        .build();

    let registry = LayerRegistry::with_defaults();
    let mut stack = LayerStack::new();
    stack.push(registry.create(FacetKind::Humidity).unwrap());
    let graph = GraphFacetLayer::new();
    graph.set_show_edges(false);
    graph.set_show_corners(false);
    graph.set_show_sites(false);
    stack.push(Arc::new(graph));

    let mut buf = PixelBuffer::new(16, 16);
    stack.render(&mut buf, &region).unwrap();
    // Humidity 0.5 with the default scale of 100 is gray 50.
    assert_eq!(buf.color_at(4, 4), Some(Color::gray(50)));
    assert_eq!(buf.color_at(0, 0), Some(Color::PINK));

    assert_eq!(
        stack.world_text(&region, 0, 0).unwrap().as_deref(),
        Some("4 regs, 9 corners, 12 edges")
    );
}

#[test]
fn test_missing_facet_fails_loudly() {
    let mut stack = LayerStack::new();
    stack.push(Arc::new(GraphFacetLayer::new()));
    let mut buf = PixelBuffer::new(2, 2);
    assert_eq!(
        stack.render(&mut buf, &scenario_region()),
        Err(RenderError::Facet(FacetError::NotPresent(FacetKind::Graph)))
    );

    let layer = FieldFacetLayer::new(FacetKind::Temperature, 0.0, 1.0);
    assert!(layer.world_text(&scenario_region(), 0, 0).is_err());
}

#[test]
fn test_config_edit_visible_on_next_render() {
    let layer = Arc::new(FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0));
    let mut stack = LayerStack::new();
    stack.push(layer.clone());

    let config = layer.config().unwrap();
    config
        .set("offset", facetview_renderer::ParamValue::Number(10.0))
        .unwrap();

    let mut buf = PixelBuffer::new(2, 2);
    stack.render(&mut buf, &scenario_region()).unwrap();
    assert_eq!(buf.color_at(0, 0), Some(Color::gray(10)));
    assert_eq!(buf.color_at(1, 0), Some(Color::gray(138)));
}
