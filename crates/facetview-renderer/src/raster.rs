//! Minimal rasterizer for graph geometry.
//!
//! Coordinates are world coordinates; the canvas subtracts its origin so the
//! origin lands on pixel (0, 0). Everything is clipped to the buffer and
//! painted with [`blend_over`].

use facetview_core::Color;

use crate::blend::blend_over;
use crate::buffer::PixelBuffer;

pub struct Canvas<'a> {
    buffer: &'a mut PixelBuffer,
    origin_x: i32,
    origin_z: i32,
}

impl<'a> Canvas<'a> {
    pub fn new(buffer: &'a mut PixelBuffer) -> Self {
        Self::translated(buffer, 0, 0)
    }

    /// World `(origin_x, origin_z)` maps to pixel `(0, 0)`.
    pub fn translated(buffer: &'a mut PixelBuffer, origin_x: i32, origin_z: i32) -> Self {
        Self {
            buffer,
            origin_x,
            origin_z,
        }
    }

    /// Visible world rows as a half-open range.
    fn rows(&self) -> (i32, i32) {
        (self.origin_z, self.origin_z + self.buffer.height() as i32)
    }

    fn columns(&self) -> (i32, i32) {
        (self.origin_x, self.origin_x + self.buffer.width() as i32)
    }

    pub fn plot(&mut self, x: i32, z: i32, color: Color) {
        let px = x - self.origin_x;
        let pz = z - self.origin_z;
        if px < 0 || pz < 0 {
            return;
        }
        let (px, pz) = (px as usize, pz as usize);
        if px >= self.buffer.width() || pz >= self.buffer.height() {
            return;
        }
        let row = self.buffer.row_mut(pz);
        row[px] = blend_over(row[px], color);
    }

    /// Bresenham line, both endpoints included. The segment is clipped to the
    /// visible window first, so only on-buffer pixels are stepped.
    pub fn draw_line(&mut self, x0: i32, z0: i32, x1: i32, z1: i32, color: Color) {
        let Some((x0, z0, x1, z1)) = self.clip_segment(x0, z0, x1, z1) else {
            return;
        };
        let dx = (x1 - x0).abs();
        let dz = -(z1 - z0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sz = if z0 < z1 { 1 } else { -1 };
        let (mut x, mut z) = (x0, z0);
        let mut err = dx + dz;
        loop {
            // Clipped coordinates lie inside the window, which is i32.
            self.plot(x as i32, z as i32, color);
            if x == x1 && z == z1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dz {
                err += dz;
                x += sx;
            }
            if e2 <= dx {
                err += dx;
                z += sz;
            }
        }
    }

    /// Liang-Barsky clip of a segment against the inclusive pixel window.
    fn clip_segment(&self, x0: i32, z0: i32, x1: i32, z1: i32) -> Option<(i64, i64, i64, i64)> {
        let (col_min, col_max) = self.columns();
        let (row_min, row_max) = self.rows();
        if col_min >= col_max || row_min >= row_max {
            return None;
        }
        let (x_lo, x_hi) = (col_min as i64, col_max as i64 - 1);
        let (z_lo, z_hi) = (row_min as i64, row_max as i64 - 1);
        let (x0, z0, x1, z1) = (x0 as i64, z0 as i64, x1 as i64, z1 as i64);

        let dx = (x1 - x0) as f64;
        let dz = (z1 - z0) as f64;
        let mut t0 = 0.0_f64;
        let mut t1 = 1.0_f64;
        for (p, q) in [
            (-dx, (x0 - x_lo) as f64),
            (dx, (x_hi - x0) as f64),
            (-dz, (z0 - z_lo) as f64),
            (dz, (z_hi - z0) as f64),
        ] {
            if p == 0.0 {
                if q < 0.0 {
                    return None;
                }
                continue;
            }
            let r = q / p;
            if p < 0.0 {
                if r > t1 {
                    return None;
                }
                t0 = t0.max(r);
            } else {
                if r < t0 {
                    return None;
                }
                t1 = t1.min(r);
            }
        }

        let at = |t: f64| -> (i64, i64) {
            let cx = (x0 as f64 + t * dx).round() as i64;
            let cz = (z0 as f64 + t * dz).round() as i64;
            (cx.clamp(x_lo, x_hi), cz.clamp(z_lo, z_hi))
        };
        let (sx, sz) = if t0 > 0.0 { at(t0) } else { (x0, z0) };
        let (ex, ez) = if t1 < 1.0 { at(t1) } else { (x1, z1) };
        Some((sx, sz, ex, ez))
    }

    /// Fills `[x, x + w) x [z, z + h)`.
    pub fn fill_rect(&mut self, x: i32, z: i32, w: i32, h: i32, color: Color) {
        let (col_min, col_max) = self.columns();
        let (row_min, row_max) = self.rows();
        for zz in z.max(row_min)..z.saturating_add(h).min(row_max) {
            for xx in x.max(col_min)..x.saturating_add(w).min(col_max) {
                self.plot(xx, zz, color);
            }
        }
    }

    /// Outlines the border pixels of `[x, x + w) x [z, z + h)`.
    pub fn draw_rect(&mut self, x: i32, z: i32, w: i32, h: i32, color: Color) {
        if w <= 0 || h <= 0 {
            return;
        }
        let (x1, z1) = (x.saturating_add(w - 1), z.saturating_add(h - 1));
        self.draw_line(x, z, x1, z, color);
        if z1 > z {
            self.draw_line(x, z1, x1, z1, color);
        }
        if z1 - z > 1 {
            self.draw_line(x, z + 1, x, z1 - 1, color);
            if x1 > x {
                self.draw_line(x1, z + 1, x1, z1 - 1, color);
            }
        }
    }

    /// Even-odd scanline fill. A pixel is inside when its center is.
    pub fn fill_polygon(&mut self, points: &[(i32, i32)], color: Color) {
        if points.len() < 3 {
            return;
        }
        let z_min = points.iter().map(|p| p.1).min().unwrap_or(0);
        let z_max = points.iter().map(|p| p.1).max().unwrap_or(0);
        let (row_min, row_max) = self.rows();
        let (col_min, col_max) = self.columns();

        let mut crossings: Vec<f64> = Vec::with_capacity(points.len());
        for z in z_min.max(row_min)..z_max.min(row_max) {
            let y = z as f64 + 0.5;
            crossings.clear();
            for (i, &(ax, az)) in points.iter().enumerate() {
                let (bx, bz) = points[(i + 1) % points.len()];
                let (az, bz) = (az as f64, bz as f64);
                if (az <= y && y < bz) || (bz <= y && y < az) {
                    let t = (y - az) / (bz - az);
                    crossings.push(ax as f64 + t * (bx - ax) as f64);
                }
            }
            crossings.sort_by(f64::total_cmp);
            for span in crossings.chunks_exact(2) {
                let start = ((span[0] - 0.5).ceil() as i32).max(col_min);
                let end = ((span[1] - 0.5).ceil() as i32).min(col_max);
                for x in start..end {
                    self.plot(x, z, color);
                }
            }
        }
    }

    /// A ring centered on the grid point `(cx, cz)`.
    pub fn draw_ring(&mut self, cx: i32, cz: i32, diameter: f64, stroke: f64, color: Color) {
        let radius = diameter / 2.0;
        let inner = (radius - stroke / 2.0).max(0.0);
        let outer = radius + stroke / 2.0;
        let reach = outer.ceil() as i32;
        for z in cz.saturating_sub(reach)..cz.saturating_add(reach) {
            for x in cx.saturating_sub(reach)..cx.saturating_add(reach) {
                let dx = x as f64 + 0.5 - cx as f64;
                let dz = z as f64 + 0.5 - cz as f64;
                let d = (dx * dx + dz * dz).sqrt();
                if d >= inner && d <= outer {
                    self.plot(x, z, color);
                }
            }
        }
    }
}
