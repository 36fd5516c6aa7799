use std::fmt;
use std::time::Instant;

use facetview_core::{Color, FacetError, FacetKind, Region};
use uuid::Uuid;

use crate::blend::blend_add;
use crate::buffer::PixelBuffer;
use crate::layer::{FacetLayer, LayerId, RenderError};
use crate::observer::Observers;

const MISSING_TEXT: &str = "<missing>";

type ColorMap<E> = Box<dyn Fn(&E) -> Color + Send + Sync>;

/// Renders a categorical grid through a fixed value-to-color mapping.
pub struct NominalFacetLayer<E> {
    id: LayerId,
    kind: FacetKind,
    color_map: ColorMap<E>,
    observers: Observers,
}

impl<E> NominalFacetLayer<E> {
    pub fn new(kind: FacetKind, color_map: impl Fn(&E) -> Color + Send + Sync + 'static) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            kind,
            color_map: Box::new(color_map),
            observers: Observers::new(id),
        }
    }

    fn color(&self, value: Option<&E>) -> Color {
        value.map_or(Color::MISSING, |v| (self.color_map)(v))
    }
}

impl<E> fmt::Debug for NominalFacetLayer<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NominalFacetLayer")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .finish_non_exhaustive()
    }
}

impl<E> FacetLayer for NominalFacetLayer<E>
where
    E: fmt::Display + Send + Sync + 'static,
{
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> String {
        self.kind.name().to_string()
    }

    fn facet_kind(&self) -> FacetKind {
        self.kind
    }

    fn check_region(&self, region: &Region) -> Result<(), RenderError> {
        region.nominal::<E>(self.kind)?;
        Ok(())
    }

    fn render(&self, buffer: &mut PixelBuffer, region: &Region) -> Result<(), RenderError> {
        let facet = region.nominal::<E>(self.kind)?;
        let started = Instant::now();

        let width = facet.width().min(buffer.width());
        let height = facet.height().min(buffer.height());
        for z in 0..height {
            let src = &facet.row(z)[..width];
            let dst = &mut buffer.row_mut(z)[..width];
            for (px, value) in dst.iter_mut().zip(src) {
                *px = blend_add(*px, self.color(value.as_ref()));
            }
        }

        log::trace!("Rendered {} in {}ms", self.kind, started.elapsed().as_millis());
        Ok(())
    }

    fn world_text(&self, region: &Region, wx: i32, wz: i32) -> Result<Option<String>, RenderError> {
        let facet = region.nominal::<E>(self.kind)?;
        match facet.get_world(wx, wz) {
            Ok(Some(value)) => Ok(Some(value.to_string())),
            Ok(None) => Ok(Some(MISSING_TEXT.to_string())),
            Err(FacetError::OutOfBounds { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn observers(&self) -> &Observers {
        &self.observers
    }
}
