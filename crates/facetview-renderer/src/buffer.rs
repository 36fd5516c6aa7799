use facetview_core::Color;

/// A raster of packed `0xAARRGGBB` pixels, row-major.
///
/// The host allocates it; layers only write into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    width: usize,
    height: usize,
    data: Vec<u32>,
}

impl PixelBuffer {
    /// A buffer of transparent black.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            data: vec![0; width * height],
        }
    }

    /// Wraps existing pixels. `None` if `data` does not hold `width * height`.
    pub fn from_raw(width: usize, height: usize, data: Vec<u32>) -> Option<Self> {
        (data.len() == width * height).then_some(Self {
            width,
            height,
            data,
        })
    }

    /// Width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Raw ARGB pixel, or `None` outside the buffer.
    pub fn get(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.data[y * self.width + x])
    }

    /// The pixel as a [`Color`], or `None` outside the buffer.
    pub fn color_at(&self, x: usize, y: usize) -> Option<Color> {
        self.get(x, y).map(Color::from_argb)
    }

    /// All pixels, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.data
    }

    /// Mutable slice of one row. Panics if `y` is out of range.
    pub fn row_mut(&mut self, y: usize) -> &mut [u32] {
        let w = self.width;
        &mut self.data[y * w..(y + 1) * w]
    }

    /// Overwrites every pixel with `color`.
    pub fn fill(&mut self, color: Color) {
        self.data.fill(color.argb());
    }

    /// Consumes the buffer, returning its row-major ARGB pixels.
    pub fn into_raw(self) -> Vec<u32> {
        self.data
    }
}
