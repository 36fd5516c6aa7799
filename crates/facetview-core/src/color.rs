use serde::{Deserialize, Serialize};

/// An 8-bit per channel RGBA color, packed as `0xRRGGBBAA`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color(u32);

impl Color {
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const RED: Color = Color::rgb(255, 0, 0);
    pub const PINK: Color = Color::rgb(255, 175, 175);
    pub const MAGENTA: Color = Color::rgb(255, 0, 255);

    /// Sentinel for absent or invalid samples.
    pub const MISSING: Color = Color::MAGENTA;

    /// A color from its four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self((r as u32) << 24 | (g as u32) << 16 | (b as u32) << 8 | a as u32)
    }

    /// An opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 0xFF)
    }

    /// An opaque gray with all channels at `level`.
    pub const fn gray(level: u8) -> Self {
        Self::rgb(level, level, level)
    }

    /// An opaque color from the low 24 bits of `0x__RRGGBB`.
    pub const fn from_rgb24(rgb: u32) -> Self {
        Self((rgb & 0x00FF_FFFF) << 8 | 0xFF)
    }

    /// Red channel.
    pub const fn r(self) -> u8 {
        (self.0 >> 24) as u8
    }

    /// Green channel.
    pub const fn g(self) -> u8 {
        (self.0 >> 16) as u8
    }

    /// Blue channel.
    pub const fn b(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Alpha channel.
    pub const fn a(self) -> u8 {
        self.0 as u8
    }

    /// The packed `0xRRGGBBAA` value.
    pub const fn rgba(self) -> u32 {
        self.0
    }

    /// The color channels without alpha, as `0x00RRGGBB`.
    pub const fn rgb24(self) -> u32 {
        self.0 >> 8
    }

    /// The `0xAARRGGBB` layout used by pixel buffers.
    pub const fn argb(self) -> u32 {
        (self.0 >> 8) | (self.0 << 24)
    }

    /// Inverse of [`Color::argb`].
    pub const fn from_argb(argb: u32) -> Self {
        Self((argb << 8) | (argb >> 24))
    }
}

/// Grayscale ramp: entry `i` is `gray(i)`.
pub static GRAYS: [Color; 256] = gray_ramp();

const fn gray_ramp() -> [Color; 256] {
    let mut ramp = [Color::BLACK; 256];
    let mut i = 0;
    while i < ramp.len() {
        ramp[i] = Color::gray(i as u8);
        i += 1;
    }
    ramp
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_extraction() {
        let c = Color::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.rgba(), 0x1234_5678);
        assert_eq!((c.r(), c.g(), c.b(), c.a()), (0x12, 0x34, 0x56, 0x78));
        assert_eq!(c.rgb24(), 0x0012_3456);
    }

    #[test]
    fn test_argb_conversion() {
        let c = Color::new(0x12, 0x34, 0x56, 0x78);
        assert_eq!(c.argb(), 0x7812_3456);
        assert_eq!(Color::from_argb(c.argb()), c);
    }

    #[test]
    fn test_gray_ramp() {
        assert_eq!(GRAYS.len(), 256);
        assert_eq!(GRAYS[0], Color::BLACK);
        assert_eq!(GRAYS[255], Color::WHITE);
        assert_eq!(GRAYS[128], Color::rgb(128, 128, 128));
    }

    #[test]
    fn test_missing_is_opaque_magenta() {
        assert_eq!(Color::MISSING.argb(), 0xFFFF_00FF);
    }

    #[test]
    fn test_from_rgb24_ignores_high_bits() {
        assert_eq!(Color::from_rgb24(0xAB12_3456), Color::rgb(0x12, 0x34, 0x56));
    }
}
