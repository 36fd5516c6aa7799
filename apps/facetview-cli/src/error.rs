use facetview_core::FacetKind;
use facetview_renderer::{ConfigError, RenderError};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CliError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Settings error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Render error: {0}")]
    Render(#[from] RenderError),

    #[error("{kind} layer: {source}")]
    Config {
        kind: FacetKind,
        #[source]
        source: ConfigError,
    },

    #[error("No layer registered for {0}")]
    UnknownLayer(FacetKind),

    #[error("Invalid image size {width}x{height}")]
    ImageSize { width: u32, height: u32 },
}
