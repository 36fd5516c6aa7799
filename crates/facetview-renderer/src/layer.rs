use facetview_core::{FacetError, FacetKind, Region};
use thiserror::Error;
use uuid::Uuid;

use crate::buffer::PixelBuffer;
use crate::config::LayerConfig;
use crate::observer::Observers;

/// Identity of a layer instance for the lifetime of a session.
pub type LayerId = Uuid;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    /// The host asked a layer to work on a region that lacks its facet.
    #[error("Facet error: {0}")]
    Facet(#[from] FacetError),
}

/// A renderer for one facet kind.
///
/// Layers are shared between the thread that edits their configuration and
/// the thread that renders, hence `Send + Sync` and `&self` everywhere.
pub trait FacetLayer: Send + Sync {
    fn id(&self) -> LayerId;

    /// Label for layer lists.
    fn name(&self) -> String;

    /// The facet the region must carry before [`FacetLayer::render`] is called.
    fn facet_kind(&self) -> FacetKind;

    /// Fails with the error [`FacetLayer::render`] would hit on `region`
    /// before drawing anything: a missing facet, the wrong shape or the
    /// wrong value type.
    fn check_region(&self, region: &Region) -> Result<(), RenderError> {
        if region.has_facet(self.facet_kind()) {
            Ok(())
        } else {
            Err(FacetError::NotPresent(self.facet_kind()).into())
        }
    }

    /// Draws this layer's contribution for `region` into `buffer`, whose pixel
    /// (0, 0) is the region's world minimum.
    fn render(&self, buffer: &mut PixelBuffer, region: &Region) -> Result<(), RenderError>;

    /// Describes the sample at a world coordinate, or `None` outside the
    /// layer's domain.
    fn world_text(&self, region: &Region, wx: i32, wz: i32) -> Result<Option<String>, RenderError>;

    fn config(&self) -> Option<&dyn LayerConfig> {
        None
    }

    fn observers(&self) -> &Observers;
}
