//! Pixel write rules.

use facetview_core::Color;

const OPAQUE: u32 = 0xFF00_0000;

/// The compositing rule for colorization layers: the incoming alpha is
/// ignored, each RGB channel is added to the existing one and saturates at
/// 255, and the result is opaque.
#[inline]
pub fn blend_add(dst: u32, src: Color) -> u32 {
    let src = src.rgb24();
    let mut mix = OPAQUE;
    mix |= ((dst & 0x0000FF) + (src & 0x0000FF)).min(0x0000FF);
    mix |= ((dst & 0x00FF00) + (src & 0x00FF00)).min(0x00FF00);
    mix |= ((dst & 0xFF0000) + (src & 0xFF0000)).min(0xFF0000);
    mix
}

/// Source-over painting for geometry strokes and fills. The result is opaque.
#[inline]
pub fn blend_over(dst: u32, src: Color) -> u32 {
    let a = src.a() as u32;
    if a == 0xFF {
        return src.argb() | OPAQUE;
    }
    let inv = 0xFF - a;
    let channel = |s: u8, shift: u32| {
        let d = (dst >> shift) & 0xFF;
        ((s as u32 * a + d * inv + 127) / 255) << shift
    };
    OPAQUE | channel(src.r(), 16) | channel(src.g(), 8) | channel(src.b(), 0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn channels(argb: u32) -> (u32, u32, u32, u32) {
        (argb >> 24, (argb >> 16) & 0xFF, (argb >> 8) & 0xFF, argb & 0xFF)
    }

    #[test]
    fn test_add_saturates_per_channel() {
        let dst = Color::rgb(200, 10, 0).argb();
        let out = blend_add(dst, Color::rgb(100, 20, 255));
        assert_eq!(channels(out), (0xFF, 255, 30, 255));
    }

    #[test]
    fn test_add_ignores_source_alpha() {
        let out = blend_add(0, Color::new(10, 20, 30, 0));
        assert_eq!(channels(out), (0xFF, 10, 20, 30));
    }

    #[test]
    fn test_add_equals_min_of_sum() {
        for a in (0..=255u32).step_by(17) {
            for b in (0..=255u32).step_by(15) {
                let dst = blend_add(0, Color::gray(a as u8));
                let out = blend_add(dst, Color::gray(b as u8));
                assert_eq!(channels(out).1, (a + b).min(255));
            }
        }
    }

    #[test]
    fn test_add_is_order_independent() {
        let colors = [Color::rgb(90, 10, 200), Color::rgb(100, 250, 3), Color::rgb(70, 0, 80)];
        let forward = colors.iter().fold(0, |px, &c| blend_add(px, c));
        let backward = colors.iter().rev().fold(0, |px, &c| blend_add(px, c));
        assert_eq!(forward, backward);
        assert_eq!(channels(forward), (0xFF, 255, 255, 255));
    }

    #[test]
    fn test_over_opaque_replaces() {
        let out = blend_over(Color::rgb(1, 2, 3).argb(), Color::PINK);
        assert_eq!(out, Color::PINK.argb());
    }

    #[test]
    fn test_over_translucent_mixes() {
        let out = blend_over(Color::BLACK.argb(), Color::new(255, 255, 255, 128));
        assert_eq!(channels(out), (0xFF, 128, 128, 128));
    }
}
