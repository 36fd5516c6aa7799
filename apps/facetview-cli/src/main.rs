//! FacetView command line host.
//!
//! Generates a synthetic world region, renders a layer stack over it to a PNG
//! and prints what every visible layer reports at the probed coordinates.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use facetview_core::{Color, FacetKind, Rect2i};
use facetview_renderer::{LayerRegistry, LayerStack, NominalFacetLayer, ParamKind, PixelBuffer, RenderError};

mod error;
mod settings;
mod world;

use error::CliError;
use settings::StackSettings;
use world::{Biome, WorldOptions};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum LayerArg {
    Height,
    Humidity,
    Temperature,
    Biome,
    Graph,
}

impl From<LayerArg> for FacetKind {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Height => FacetKind::SurfaceHeight,
            LayerArg::Humidity => FacetKind::Humidity,
            LayerArg::Temperature => FacetKind::Temperature,
            LayerArg::Biome => FacetKind::Biome,
            LayerArg::Graph => FacetKind::Graph,
        }
    }
}

/// Command line arguments for the viewer
#[derive(Parser, Debug)]
#[command(name = "facetview")]
#[command(about = "Renders world facets of a synthetic region to PNG")]
struct Args {
    /// Random seed for the synthetic world
    #[arg(long, default_value_t = 42)]
    seed: u64,

    /// World x of the region's minimum corner
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    x: i32,

    /// World z of the region's minimum corner
    #[arg(long, default_value_t = 0, allow_negative_numbers = true)]
    z: i32,

    /// Region width in blocks (one pixel per block)
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u32).range(1..=8192))]
    width: u32,

    /// Region height in blocks
    #[arg(long, default_value_t = 256, value_parser = clap::value_parser!(u32).range(1..=8192))]
    height: u32,

    /// Side of one graph cell in blocks
    #[arg(long, default_value_t = 32, value_parser = clap::value_parser!(i32).range(1..))]
    graph_step: i32,

    /// Layers to stack, bottom first. Ignored when --settings is given
    #[arg(long, value_enum, value_delimiter = ',', default_values_t = [LayerArg::Biome, LayerArg::Graph])]
    layers: Vec<LayerArg>,

    /// Load the layer stack from a JSON settings file
    #[arg(long)]
    settings: Option<PathBuf>,

    /// Write the layer stack to a JSON settings file after rendering
    #[arg(long)]
    save_settings: Option<PathBuf>,

    /// Output PNG path
    #[arg(long, short, default_value = "facetview.png")]
    output: PathBuf,

    /// World coordinate to describe, as `x,z` (repeatable)
    #[arg(long, value_parser = parse_probe, allow_hyphen_values = true)]
    probe: Vec<(i32, i32)>,

    /// Print the editable parameters of every layer in the stack
    #[arg(long)]
    list_params: bool,
}

fn parse_probe(s: &str) -> Result<(i32, i32), String> {
    let (x, z) = s
        .split_once(',')
        .ok_or_else(|| format!("expected `x,z`, got `{s}`"))?;
    let x = x.trim().parse().map_err(|e| format!("bad x `{x}`: {e}"))?;
    let z = z.trim().parse().map_err(|e| format!("bad z `{z}`: {e}"))?;
    Ok((x, z))
}

fn init_logging() {
    let mut builder = env_logger::Builder::new();
    match std::env::var("RUST_LOG") {
        Ok(filter) => {
            builder.parse_filters(&filter);
        }
        Err(_) => {
            builder.filter_level(log::LevelFilter::Info);
        }
    }
    builder.init();
}

fn registry() -> LayerRegistry {
    let mut registry = LayerRegistry::with_defaults();
    registry.register(FacetKind::Biome, || {
        Arc::new(NominalFacetLayer::new(FacetKind::Biome, Biome::color))
    });
    registry
}

fn build_stack(args: &Args, registry: &LayerRegistry) -> Result<LayerStack, CliError> {
    if let Some(path) = &args.settings {
        return StackSettings::load(path)?.build(registry);
    }
    let mut stack = LayerStack::new();
    for &arg in &args.layers {
        let kind = FacetKind::from(arg);
        let layer = registry.create(kind).ok_or(CliError::UnknownLayer(kind))?;
        stack.push(layer);
    }
    Ok(stack)
}

fn print_params(stack: &LayerStack) {
    for entry in stack.entries() {
        let layer = &entry.layer;
        println!("{} ({})", layer.name(), if entry.visible { "visible" } else { "hidden" });
        let Some(config) = layer.config() else {
            println!("  no parameters");
            continue;
        };
        for spec in config.params() {
            let value = config.get(spec.name);
            match spec.kind {
                ParamKind::Number {
                    min,
                    max,
                    increment,
                    precision,
                } => println!(
                    "  {} [{}]: {:?} (range {min}..{max}, step {increment}, {precision} decimals)",
                    spec.label, spec.name, value
                ),
                ParamKind::Flag => println!("  {} [{}]: {:?}", spec.label, spec.name, value),
            }
        }
    }
}

fn write_png(buffer: PixelBuffer, path: &std::path::Path) -> Result<(), CliError> {
    let (width, height) = (buffer.width() as u32, buffer.height() as u32);
    let bytes: Vec<u8> = buffer
        .into_raw()
        .into_iter()
        .flat_map(|argb| Color::from_argb(argb).rgba().to_be_bytes())
        .collect();
    let image = image::RgbaImage::from_raw(width, height, bytes)
        .ok_or(CliError::ImageSize { width, height })?;
    image.save(path)?;
    log::info!("Wrote {}x{} image to {}", width, height, path.display());
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let bounds = Rect2i::new(args.x, args.z, args.width as i32, args.height as i32);
    let region = world::generate(&WorldOptions {
        seed: args.seed,
        bounds,
        graph_step: args.graph_step,
    })
    .map_err(RenderError::from)?;

    let registry = registry();
    let stack = build_stack(&args, &registry)?;
    if args.list_params {
        print_params(&stack);
    }

    let mut buffer = PixelBuffer::new(args.width as usize, args.height as usize);
    stack.render(&mut buffer, &region)?;
    write_png(buffer, &args.output)?;

    for &(x, z) in &args.probe {
        println!("{x}, {z}:");
        let texts = stack.world_text_all(&region, x, z)?;
        if texts.is_empty() {
            println!("  nothing here");
        }
        for (name, text) in texts {
            println!("  {name}: {text}");
        }
    }

    if let Some(path) = &args.save_settings {
        StackSettings::capture(&stack).save(path)?;
    }
    Ok(())
}

fn main() {
    let args = Args::parse();
    init_logging();

    if let Err(e) = run(args) {
        log::error!("{e}");
        std::process::exit(1);
    }
}
