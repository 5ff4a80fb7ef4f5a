use std::f32::consts::{FRAC_PI_2, PI};
use std::io::Write;

pub type Rgb = (u8, u8, u8);

// Fraction of a glow stamp's weight deposited at its center.
const GLOW_GAIN: f32 = 0.5;

/// Software RGB drawing surface. Pixels are kept as f32 channels in the
/// 0..=255 range so repeated blends and glow deposits don't band.
///
/// Rows are paired into truecolor half-block cells by [`Canvas::present`], so
/// drivers should size the canvas at twice the terminal row count.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<[f32; 3]>,
    output_buf: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![[0.0; 3]; width * height],
            output_buf: Vec::with_capacity(width * height * 25),
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Rgb) {
        self.pixels
            .fill([color.0 as f32, color.1 as f32, color.2 as f32]);
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        let p = self.pixels[y * self.width + x];
        (
            p[0].round() as u8,
            p[1].round() as u8,
            p[2].round() as u8,
        )
    }

    fn blend(&mut self, x: i32, y: i32, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let px = &mut self.pixels[y as usize * self.width + x as usize];
        px[0] += (color.0 as f32 - px[0]) * alpha;
        px[1] += (color.1 as f32 - px[1]) * alpha;
        px[2] += (color.2 as f32 - px[2]) * alpha;
    }

    fn deposit(&mut self, x: i32, y: i32, color: Rgb, weight: f32) {
        if x < 0 || y < 0 || x >= self.width as i32 || y >= self.height as i32 {
            return;
        }
        let px = &mut self.pixels[y as usize * self.width + x as usize];
        px[0] = (px[0] + color.0 as f32 * weight).min(255.0);
        px[1] = (px[1] + color.1 as f32 * weight).min(255.0);
        px[2] = (px[2] + color.2 as f32 * weight).min(255.0);
    }

    fn bbox(&self, cx: f32, cy: f32, extent: f32) -> Option<(i32, i32, i32, i32)> {
        if !cx.is_finite() || !cy.is_finite() || !extent.is_finite() {
            return None;
        }
        let x0 = (cx - extent).floor().max(0.0) as i32;
        let y0 = (cy - extent).floor().max(0.0) as i32;
        let x1 = ((cx + extent).ceil() as i64).min(self.width as i64 - 1) as i32;
        let y1 = ((cy + extent).ceil() as i64).min(self.height as i64 - 1) as i32;
        (x0 <= x1 && y0 <= y1).then_some((x0, y0, x1, y1))
    }

    pub fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        let Some((x0, y0, x1, y1)) = self.bbox(cx, cy, radius) else {
            return;
        };
        let r2 = radius * radius;
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Axis-aligned half extents, rotated by `angle` about the center.
    pub fn fill_rotated_rect(
        &mut self,
        cx: f32,
        cy: f32,
        half_w: f32,
        half_h: f32,
        angle: f32,
        color: Rgb,
        alpha: f32,
    ) {
        let reach = (half_w * half_w + half_h * half_h).sqrt();
        let Some((x0, y0, x1, y1)) = self.bbox(cx, cy, reach) else {
            return;
        };
        let (sin, cos) = angle.sin_cos();
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                // Into the rect's local frame.
                let lx = dx * cos + dy * sin;
                let ly = -dx * sin + dy * cos;
                if lx.abs() <= half_w && ly.abs() <= half_h {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Five-pointed star, first spike pointing up.
    pub fn fill_star(&mut self, cx: f32, cy: f32, outer: f32, inner: f32, color: Rgb, alpha: f32) {
        let mut pts = [[0.0f32; 2]; 10];
        let mut rot = 3.0 * FRAC_PI_2;
        let step = PI / 5.0;
        for spike in 0..5 {
            pts[2 * spike] = [cx + rot.cos() * outer, cy + rot.sin() * outer];
            rot += step;
            pts[2 * spike + 1] = [cx + rot.cos() * inner, cy + rot.sin() * inner];
            rot += step;
        }
        let Some((x0, y0, x1, y1)) = self.bbox(cx, cy, outer) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                if point_in_polygon(&pts, x as f32 + 0.5, y as f32 + 0.5) {
                    self.blend(x, y, color, alpha);
                }
            }
        }
    }

    /// Additive radial glow around a particle, strongest at the center.
    pub fn add_glow(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb, alpha: f32) {
        if radius <= 0.0 {
            return;
        }
        let Some((x0, y0, x1, y1)) = self.bbox(cx, cy, radius) else {
            return;
        };
        for y in y0..=y1 {
            for x in x0..=x1 {
                let dx = x as f32 + 0.5 - cx;
                let dy = y as f32 + 0.5 - cy;
                let d = (dx * dx + dy * dy).sqrt();
                if d < radius {
                    let falloff = 1.0 - d / radius;
                    self.deposit(x, y, color, alpha * falloff * falloff * GLOW_GAIN);
                }
            }
        }
    }

    /// Writes the surface as truecolor half-block cells, two pixel rows per
    /// terminal row, emitting color escapes only when they change.
    pub fn present(&mut self, out: &mut impl Write) -> std::io::Result<()> {
        self.output_buf.clear();
        self.output_buf.extend_from_slice(b"\x1b[H");

        let mut prev_top: Rgb = (255, 255, 255);
        let mut prev_bot: Rgb = (255, 255, 255);

        for y in (0..self.height).step_by(2) {
            for x in 0..self.width {
                let top = self.pixel(x, y);
                let bot = if y + 1 < self.height {
                    self.pixel(x, y + 1)
                } else {
                    top
                };

                if top != prev_top {
                    write!(self.output_buf, "\x1b[48;2;{};{};{}m", top.0, top.1, top.2)?;
                    prev_top = top;
                }
                if bot != prev_bot {
                    write!(self.output_buf, "\x1b[38;2;{};{};{}m", bot.0, bot.1, bot.2)?;
                    prev_bot = bot;
                }
                self.output_buf.extend_from_slice("▄".as_bytes());
            }
            self.output_buf.extend_from_slice(b"\x1b[0m");
            prev_top = (255, 255, 255);
            prev_bot = (255, 255, 255);
            if y + 2 < self.height {
                self.output_buf.extend_from_slice(b"\r\n");
            }
        }

        out.write_all(&self.output_buf)?;
        out.flush()
    }
}

fn point_in_polygon(pts: &[[f32; 2]], x: f32, y: f32) -> bool {
    let mut inside = false;
    let mut j = pts.len() - 1;
    for i in 0..pts.len() {
        let [xi, yi] = pts[i];
        let [xj, yj] = pts[j];
        if (yi > y) != (yj > y) && x < (xj - xi) * (y - yi) / (yj - yi) + xi {
            inside = !inside;
        }
        j = i;
    }
    inside
}

#[cfg(test)]
mod tests {
    use super::*;

    const WHITE: Rgb = (255, 255, 255);

    #[test]
    fn circle_covers_its_center() {
        let mut c = Canvas::new(20, 20);
        c.clear((0, 0, 0));
        c.fill_circle(10.0, 10.0, 3.0, WHITE, 1.0);
        assert_eq!(c.pixel(10, 10), WHITE);
        // Well outside the radius stays background.
        assert_eq!(c.pixel(0, 0), (0, 0, 0));
    }

    #[test]
    fn blending_is_scoped_to_each_draw() {
        let mut c = Canvas::new(20, 20);
        c.clear((0, 0, 0));
        c.fill_circle(5.0, 5.0, 1.0, WHITE, 0.5);
        c.fill_circle(15.0, 15.0, 1.0, WHITE, 1.0);
        let half = c.pixel(5, 5);
        assert!(half.0 > 100 && half.0 < 155, "got {half:?}");
        // The second draw's full alpha must not bleed into the first.
        assert_eq!(c.pixel(15, 15), WHITE);
        assert!(c.pixel(5, 5).0 < 160);
    }

    #[test]
    fn rotated_square_changes_coverage() {
        let mut c = Canvas::new(30, 30);
        c.clear((0, 0, 0));
        c.fill_rotated_rect(15.0, 15.0, 4.0, 4.0, 0.0, WHITE, 1.0);
        // Axis-aligned: the corner region is covered.
        assert_eq!(c.pixel(18, 18), WHITE);

        c.clear((0, 0, 0));
        c.fill_rotated_rect(15.0, 15.0, 4.0, 4.0, PI / 4.0, WHITE, 1.0);
        // Rotated 45 degrees: the old corner is now outside...
        assert_eq!(c.pixel(18, 18), (0, 0, 0));
        // ...while the tip above the center is inside.
        assert_eq!(c.pixel(15, 10), WHITE);
        assert_eq!(c.pixel(15, 15), WHITE);
    }

    #[test]
    fn star_covers_center_and_top_spike() {
        let mut c = Canvas::new(40, 40);
        c.clear((0, 0, 0));
        c.fill_star(20.0, 20.0, 8.0, 3.0, WHITE, 1.0);
        assert_eq!(c.pixel(20, 20), WHITE);
        // Just inside the upward-pointing spike.
        assert_eq!(c.pixel(20, 14), WHITE);
        // Between two spikes, outside the inner radius.
        assert_eq!(c.pixel(27, 13), (0, 0, 0));
    }

    #[test]
    fn glow_lights_pixels_outside_the_shape() {
        let mut c = Canvas::new(20, 20);
        c.clear((0, 0, 0));
        c.add_glow(10.0, 10.0, 6.0, (255, 0, 0), 1.0);
        let near = c.pixel(11, 10);
        assert!(near.0 > 0, "glow should reach past the disc");
        assert_eq!(c.pixel(0, 0), (0, 0, 0));
    }

    #[test]
    fn out_of_bounds_geometry_is_ignored() {
        let mut c = Canvas::new(10, 10);
        c.clear((0, 0, 0));
        c.fill_circle(-50.0, -50.0, 5.0, WHITE, 1.0);
        c.fill_circle(100.0, 5.0, 3.0, WHITE, 1.0);
        c.fill_star(5.0, 5.0, f32::NAN, 1.0, WHITE, 1.0);
        c.fill_rotated_rect(200.0, 200.0, 4.0, 4.0, 1.0, WHITE, 1.0);
        assert!(c.pixels.iter().all(|p| *p == [0.0; 3]));
    }

    #[test]
    fn present_emits_half_blocks_and_home() {
        let mut c = Canvas::new(4, 4);
        c.clear((10, 20, 30));
        let mut out = Vec::new();
        c.present(&mut out).unwrap();
        let s = String::from_utf8(out).unwrap();
        assert!(s.starts_with("\x1b[H"));
        assert_eq!(s.matches('▄').count(), 8);
        assert!(s.contains("\x1b[48;2;10;20;30m"));
        assert!(s.contains("\x1b[38;2;10;20;30m"));
    }
}
