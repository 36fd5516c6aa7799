use std::sync::Arc;
use std::time::Instant;

use facetview_core::{Color, FacetError, FacetKind, Region, GRAYS};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::blend::blend_add;
use crate::buffer::PixelBuffer;
use crate::config::{ConfigCell, ConfigError, Configurable, LayerConfig, ParamKind, ParamSpec, ParamValue};
use crate::layer::{FacetLayer, LayerId, RenderError};
use crate::observer::Observers;

const MISSING_TEXT: &str = "<missing>";

/// Persistent settings of a [`FieldFacetLayer`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldConfig {
    pub kind: FacetKind,
    pub offset: f64,
    pub scale: f64,
}

/// Numbers compare by bit pattern, so a NaN parameter equals itself and
/// rewriting any field with its current value is a no-op.
impl PartialEq for FieldConfig {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.offset.to_bits() == other.offset.to_bits()
            && self.scale.to_bits() == other.scale.to_bits()
    }
}

static FIELD_PARAMS: [ParamSpec; 2] = [
    ParamSpec {
        name: "offset",
        label: "Offset",
        kind: ParamKind::Number {
            min: -100.0,
            max: 100.0,
            increment: 1.0,
            precision: 1,
        },
    },
    ParamSpec {
        name: "scale",
        label: "Scale",
        kind: ParamKind::Number {
            min: 0.0,
            max: 100.0,
            increment: 0.1,
            precision: 1,
        },
    },
];

impl Configurable for FieldConfig {
    fn params() -> &'static [ParamSpec] {
        &FIELD_PARAMS
    }

    fn value(&self, name: &str) -> Option<ParamValue> {
        match name {
            "offset" => Some(ParamValue::Number(self.offset)),
            "scale" => Some(ParamValue::Number(self.scale)),
            _ => None,
        }
    }

    fn apply(&mut self, name: &str, value: ParamValue) -> Result<(), ConfigError> {
        let slot = match name {
            "offset" => &mut self.offset,
            "scale" => &mut self.scale,
            _ => return Err(ConfigError::UnknownParam(name.to_string())),
        };
        *slot = value.as_number().ok_or_else(|| ConfigError::number(name))?;
        Ok(())
    }
}

/// Gray ramp index for a sample: `offset + scale * value`, rounded half away
/// from zero and clamped to `0..=255`. `None` for non-finite samples.
pub fn gray_index(offset: f64, scale: f64, value: f64) -> Option<u8> {
    if !value.is_finite() {
        return None;
    }
    // Clamping in f64 keeps huge products from overflowing the cast.
    Some((offset + scale * value).round().clamp(0.0, 255.0) as u8)
}

fn sample_color(config: &FieldConfig, value: f64) -> Color {
    match gray_index(config.offset, config.scale, value) {
        Some(idx) => GRAYS[idx as usize],
        None => Color::MISSING,
    }
}

/// Renders a scalar field through a linear transform into the gray ramp.
#[derive(Debug)]
pub struct FieldFacetLayer {
    id: LayerId,
    config: ConfigCell<FieldConfig>,
}

impl FieldFacetLayer {
    pub fn new(kind: FacetKind, offset: f64, scale: f64) -> Self {
        Self::with_config(FieldConfig { kind, offset, scale })
    }

    pub fn with_config(config: FieldConfig) -> Self {
        let id = Uuid::new_v4();
        Self {
            id,
            config: ConfigCell::new(id, config),
        }
    }

    pub fn settings(&self) -> Arc<FieldConfig> {
        self.config.snapshot()
    }

    pub fn offset(&self) -> f64 {
        self.config.snapshot().offset
    }

    pub fn scale(&self) -> f64 {
        self.config.snapshot().scale
    }

    /// Returns `true` if the offset changed.
    pub fn set_offset(&self, offset: f64) -> bool {
        self.config.update(|c| c.offset = offset)
    }

    /// Returns `true` if the scale changed.
    pub fn set_scale(&self, scale: f64) -> bool {
        self.config.update(|c| c.scale = scale)
    }
}

impl FacetLayer for FieldFacetLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn name(&self) -> String {
        self.config.snapshot().kind.name().to_string()
    }

    fn facet_kind(&self) -> FacetKind {
        self.config.snapshot().kind
    }

    fn check_region(&self, region: &Region) -> Result<(), RenderError> {
        region.field(self.config.snapshot().kind)?;
        Ok(())
    }

    fn render(&self, buffer: &mut PixelBuffer, region: &Region) -> Result<(), RenderError> {
        let config = self.config.snapshot();
        let facet = region.field(config.kind)?;
        let started = Instant::now();

        let width = facet.width().min(buffer.width());
        let height = facet.height().min(buffer.height());
        for z in 0..height {
            let src = &facet.row(z)[..width];
            let dst = &mut buffer.row_mut(z)[..width];
            for (px, &value) in dst.iter_mut().zip(src) {
                *px = blend_add(*px, sample_color(&config, value));
            }
        }

        log::trace!(
            "Rendered {} in {}ms",
            config.kind,
            started.elapsed().as_millis()
        );
        Ok(())
    }

    fn world_text(&self, region: &Region, wx: i32, wz: i32) -> Result<Option<String>, RenderError> {
        let config = self.config.snapshot();
        let facet = region.field(config.kind)?;
        match facet.get_world(wx, wz) {
            Ok(value) if value.is_finite() => Ok(Some(format!("{value:.2}"))),
            Ok(_) => Ok(Some(MISSING_TEXT.to_string())),
            Err(FacetError::OutOfBounds { .. }) => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn config(&self) -> Option<&dyn LayerConfig> {
        Some(&self.config as &dyn LayerConfig)
    }

    fn observers(&self) -> &Observers {
        self.config.observers()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use facetview_core::{FieldFacet, Rect2i};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn region(values: Vec<f64>, w: i32, h: i32) -> Region {
        let bounds = Rect2i::new(0, 0, w, h);
        Region::builder(bounds)
            .field(FacetKind::SurfaceHeight, FieldFacet::new(bounds, values).unwrap())
            .unwrap()
            .build()
    }

    fn counter(layer: &FieldFacetLayer) -> Arc<AtomicUsize> {
        let hits = Arc::new(AtomicUsize::new(0));
        let c = Arc::clone(&hits);
        layer.observers().subscribe(move |_| {
            c.fetch_add(1, Ordering::SeqCst);
        });
        hits
    }

    #[test]
    fn test_gray_index_matches_formula() {
        let cases: [(f64, f64, f64); 3] = [(0.0, 1.0, 12.3), (10.0, 2.5, 40.1), (-5.0, 0.5, 300.0)];
        for (offset, scale, v) in cases {
            let expected = (offset + scale * v).round().clamp(0.0, 255.0) as u8;
            assert_eq!(gray_index(offset, scale, v), Some(expected));
        }
    }

    #[test]
    fn test_gray_index_rounds_half_up() {
        assert_eq!(gray_index(0.0, 1.0, 127.5), Some(128));
        assert_eq!(gray_index(10.0, 1.0, 0.5), Some(11));
        assert_eq!(gray_index(0.0, 2.0, 0.25), Some(1));
        assert_eq!(gray_index(0.0, 1.0, 127.49), Some(127));
    }

    #[test]
    fn test_gray_index_clamps() {
        assert_eq!(gray_index(0.0, 1.0, -3.0), Some(0));
        assert_eq!(gray_index(0.0, 1.0, 255.6), Some(255));
        assert_eq!(gray_index(0.0, 1e300, 1e300), Some(255));
        assert_eq!(gray_index(0.0, 1e300, -1e300), Some(0));
    }

    #[test]
    fn test_gray_index_rejects_non_finite() {
        assert_eq!(gray_index(0.0, 1.0, f64::NAN), None);
        assert_eq!(gray_index(0.0, 1.0, f64::INFINITY), None);
        assert_eq!(gray_index(0.0, 1.0, f64::NEG_INFINITY), None);
    }

    #[test]
    fn test_render_two_by_two() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        let region = region(vec![0.0, 128.4, f64::NAN, 255.6], 2, 2);
        let mut buf = PixelBuffer::new(2, 2);
        layer.render(&mut buf, &region).unwrap();
        assert_eq!(buf.color_at(0, 0), Some(Color::gray(0)));
        assert_eq!(buf.color_at(1, 0), Some(Color::gray(128)));
        assert_eq!(buf.color_at(0, 1), Some(Color::MISSING));
        assert_eq!(buf.color_at(1, 1), Some(Color::gray(255)));
    }

    #[test]
    fn test_render_adds_onto_existing_pixels() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        let region = region(vec![100.0], 1, 1);
        let mut buf = PixelBuffer::new(1, 1);
        buf.fill(Color::rgb(200, 0, 50));
        layer.render(&mut buf, &region).unwrap();
        assert_eq!(buf.color_at(0, 0), Some(Color::rgb(255, 100, 150)));
    }

    #[test]
    fn test_render_stays_inside_region() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        let region = region(vec![10.0; 4], 2, 2);
        let mut buf = PixelBuffer::new(3, 3);
        layer.render(&mut buf, &region).unwrap();
        assert_eq!(buf.get(2, 0), Some(0));
        assert_eq!(buf.get(0, 2), Some(0));
        assert_eq!(buf.color_at(1, 1), Some(Color::gray(10)));
    }

    #[test]
    fn test_render_without_facet_fails() {
        let layer = FieldFacetLayer::new(FacetKind::Humidity, 0.0, 1.0);
        let region = region(vec![0.0], 1, 1);
        let mut buf = PixelBuffer::new(1, 1);
        assert_eq!(
            layer.render(&mut buf, &region),
            Err(RenderError::Facet(FacetError::NotPresent(FacetKind::Humidity)))
        );
    }

    #[test]
    fn test_world_text() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        let region = region(vec![1.0 / 3.0, f64::NAN], 2, 1);
        assert_eq!(layer.world_text(&region, 0, 0).unwrap().as_deref(), Some("0.33"));
        assert_eq!(layer.world_text(&region, 1, 0).unwrap().as_deref(), Some("<missing>"));
        assert_eq!(layer.world_text(&region, 5, 0).unwrap(), None);
    }

    #[test]
    fn test_setters_notify_only_on_change() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        let hits = counter(&layer);
        assert!(!layer.set_offset(0.0));
        assert!(!layer.set_scale(1.0));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert!(layer.set_offset(4.0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert!(layer.set_scale(2.0));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
        assert_eq!((layer.offset(), layer.scale()), (4.0, 2.0));
    }

    #[test]
    fn test_nan_offset_does_not_break_no_op_suppression() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, f64::NAN, 1.0);
        let hits = counter(&layer);
        assert!(!layer.set_scale(1.0));
        assert!(!layer.set_offset(f64::NAN));
        let config = layer.config().unwrap();
        assert_eq!(config.set("scale", ParamValue::Number(1.0)), Ok(false));
        assert_eq!(hits.load(Ordering::SeqCst), 0);

        assert!(layer.set_offset(0.0));
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_params_through_layer_config() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        let hits = counter(&layer);
        let config = layer.config().unwrap();
        let names: Vec<&str> = config.params().iter().map(|p| p.name).collect();
        assert_eq!(names, ["offset", "scale"]);
        assert_eq!(config.get("scale"), Some(ParamValue::Number(1.0)));

        assert_eq!(config.set("scale", ParamValue::Number(1.0)), Ok(false));
        assert_eq!(config.set("scale", ParamValue::Number(3.5)), Ok(true));
        assert_eq!(layer.scale(), 3.5);
        assert_eq!(hits.load(Ordering::SeqCst), 1);

        assert!(matches!(
            config.set("scale", ParamValue::Flag(true)),
            Err(ConfigError::TypeMismatch { .. })
        ));
        assert_eq!(
            config.set("gamma", ParamValue::Number(1.0)),
            Err(ConfigError::UnknownParam("gamma".into()))
        );
    }

    #[test]
    fn test_out_of_range_values_are_not_clamped() {
        let layer = FieldFacetLayer::new(FacetKind::SurfaceHeight, 0.0, 1.0);
        layer.config().unwrap().set("scale", ParamValue::Number(1000.0)).unwrap();
        assert_eq!(layer.scale(), 1000.0);
        let region = region(vec![1.0, -1.0], 2, 1);
        let mut buf = PixelBuffer::new(2, 1);
        layer.render(&mut buf, &region).unwrap();
        assert_eq!(buf.color_at(0, 0), Some(Color::gray(255)));
        assert_eq!(buf.color_at(1, 0), Some(Color::gray(0)));
    }
}
