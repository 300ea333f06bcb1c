//! Immediate-mode 2D drawing surface and a software rasterizer for it.
//!
//! Coordinates passed to [`Canvas`] are logical pixels; the pixel ratio maps
//! them onto the backing framebuffer.

use crate::color::Rgba;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineCap {
    Butt,
    Round,
    Square,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineJoin {
    Round,
    Bevel,
}

pub trait Canvas {
    /// Backing framebuffer size in device pixels.
    fn pixel_size(&self) -> (usize, usize);
    fn resize(&mut self, pixel_width: usize, pixel_height: usize);
    /// Absolute logical-to-device scale. Setting the same ratio twice is a no-op.
    fn set_pixel_ratio(&mut self, ratio: f64);

    fn set_fill(&mut self, color: Rgba);
    fn set_stroke(&mut self, color: Rgba);
    fn set_line_width(&mut self, width: f64);
    fn set_line_cap(&mut self, cap: LineCap);
    fn set_line_join(&mut self, join: LineJoin);

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64);
    fn begin_path(&mut self);
    fn move_to(&mut self, x: f64, y: f64);
    fn line_to(&mut self, x: f64, y: f64);
    fn stroke(&mut self);
    fn fill_circle(&mut self, x: f64, y: f64, radius: f64);
}

/// `0x00RRGGBB` framebuffer, the layout minifb presents.
pub struct PixelCanvas {
    width: usize,
    height: usize,
    buffer: Vec<u32>,
    background: Rgba,
    ratio: f64,
    fill: Rgba,
    stroke: Rgba,
    line_width: f64,
    line_cap: LineCap,
    line_join: LineJoin,
    path: Vec<Vec<(f64, f64)>>,
    // Per-pixel coverage for the stroke being rasterized, so overlapping
    // segments of one path blend once.
    coverage: Vec<bool>,
    touched: Vec<usize>,
}

impl PixelCanvas {
    pub fn new(width: usize, height: usize, background: Rgba) -> Self {
        PixelCanvas {
            width,
            height,
            buffer: vec![background.pack(); width * height],
            background,
            ratio: 1.0,
            fill: Rgba::rgb(0, 0, 0),
            stroke: Rgba::rgb(0, 0, 0),
            line_width: 1.0,
            line_cap: LineCap::Butt,
            line_join: LineJoin::Round,
            path: Vec::new(),
            coverage: vec![false; width * height],
            touched: Vec::new(),
        }
    }

    pub fn buffer(&self) -> &[u32] {
        &self.buffer
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        (x < self.width && y < self.height).then(|| self.buffer[y * self.width + x])
    }

    pub fn pixel_ratio(&self) -> f64 {
        self.ratio
    }

    /// Device-pixel span covering `[lo, hi]`, clipped to `0..limit`.
    fn span(lo: f64, hi: f64, limit: usize) -> std::ops::Range<usize> {
        let start = lo.floor().max(0.0) as usize;
        let end = (hi.ceil().max(0.0) as usize).min(limit);
        start.min(end)..end
    }

    fn cover(&mut self, idx: usize) {
        if !self.coverage[idx] {
            self.coverage[idx] = true;
            self.touched.push(idx);
        }
    }

    fn flush_coverage(&mut self, color: Rgba) {
        for &idx in &self.touched {
            self.buffer[idx] = color.over(self.buffer[idx]);
            self.coverage[idx] = false;
        }
        self.touched.clear();
    }

    /// Marks pixels within half the line width of segment `a`-`b`. Each end
    /// gets its own cap so joints inside a path can differ from path ends.
    fn cover_segment(&mut self, a: (f64, f64), b: (f64, f64), caps: (LineCap, LineCap)) {
        let hw = self.line_width * self.ratio / 2.0;
        let (ax, ay) = (a.0 * self.ratio, a.1 * self.ratio);
        let (bx, by) = (b.0 * self.ratio, b.1 * self.ratio);
        let (dx, dy) = (bx - ax, by - ay);
        let len = (dx * dx + dy * dy).sqrt();

        let xs = Self::span(ax.min(bx) - hw, ax.max(bx) + hw, self.width);
        let ys = Self::span(ay.min(by) - hw, ay.max(by) + hw, self.height);

        for py in ys {
            for px in xs.clone() {
                let (cx, cy) = (px as f64 + 0.5, py as f64 + 0.5);
                let (rx, ry) = (cx - ax, cy - ay);
                let inside = if len == 0.0 {
                    caps.0 == LineCap::Round && (rx * rx + ry * ry).sqrt() <= hw
                } else {
                    let along = (rx * dx + ry * dy) / len;
                    let across = (rx * dy - ry * dx).abs() / len;
                    if along < 0.0 {
                        match caps.0 {
                            LineCap::Butt => false,
                            LineCap::Square => -along <= hw && across <= hw,
                            LineCap::Round => (rx * rx + ry * ry).sqrt() <= hw,
                        }
                    } else if along > len {
                        let (ex, ey) = (cx - bx, cy - by);
                        match caps.1 {
                            LineCap::Butt => false,
                            LineCap::Square => along - len <= hw && across <= hw,
                            LineCap::Round => (ex * ex + ey * ey).sqrt() <= hw,
                        }
                    } else {
                        across <= hw
                    }
                };
                if inside {
                    self.cover(py * self.width + px);
                }
            }
        }
    }
}

impl Canvas for PixelCanvas {
    fn pixel_size(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn resize(&mut self, pixel_width: usize, pixel_height: usize) {
        if (pixel_width, pixel_height) == (self.width, self.height) {
            return;
        }
        self.width = pixel_width;
        self.height = pixel_height;
        self.buffer = vec![self.background.pack(); pixel_width * pixel_height];
        self.coverage = vec![false; pixel_width * pixel_height];
        self.touched.clear();
    }

    fn set_pixel_ratio(&mut self, ratio: f64) {
        self.ratio = ratio;
    }

    fn set_fill(&mut self, color: Rgba) {
        self.fill = color;
    }

    fn set_stroke(&mut self, color: Rgba) {
        self.stroke = color;
    }

    fn set_line_width(&mut self, width: f64) {
        self.line_width = width;
    }

    fn set_line_cap(&mut self, cap: LineCap) {
        self.line_cap = cap;
    }

    fn set_line_join(&mut self, join: LineJoin) {
        self.line_join = join;
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64) {
        let r = self.ratio;
        let xs = Self::span(x * r, (x + width) * r, self.width);
        let ys = Self::span(y * r, (y + height) * r, self.height);
        let fill = self.fill;
        for py in ys {
            let row = py * self.width;
            for px in xs.clone() {
                self.buffer[row + px] = fill.over(self.buffer[row + px]);
            }
        }
    }

    fn begin_path(&mut self) {
        self.path.clear();
    }

    fn move_to(&mut self, x: f64, y: f64) {
        self.path.push(vec![(x, y)]);
    }

    fn line_to(&mut self, x: f64, y: f64) {
        match self.path.last_mut() {
            Some(sub) => sub.push((x, y)),
            None => self.path.push(vec![(x, y)]),
        }
    }

    fn stroke(&mut self) {
        let joint = match self.line_join {
            LineJoin::Round => LineCap::Round,
            LineJoin::Bevel => LineCap::Butt,
        };
        let path = std::mem::take(&mut self.path);
        for sub in &path {
            let last = sub.len().saturating_sub(2);
            for (i, seg) in sub.windows(2).enumerate() {
                let start = if i == 0 { self.line_cap } else { joint };
                let end = if i == last { self.line_cap } else { joint };
                self.cover_segment(seg[0], seg[1], (start, end));
            }
        }
        self.path = path;
        let stroke = self.stroke;
        self.flush_coverage(stroke);
    }

    fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
        let (cx, cy, rr) = (x * self.ratio, y * self.ratio, radius * self.ratio);
        let xs = Self::span(cx - rr, cx + rr, self.width);
        let ys = Self::span(cy - rr, cy + rr, self.height);
        let fill = self.fill;
        for py in ys {
            for px in xs.clone() {
                let (dx, dy) = (px as f64 + 0.5 - cx, py as f64 + 0.5 - cy);
                if dx * dx + dy * dy <= rr * rr {
                    let idx = py * self.width + px;
                    self.buffer[idx] = fill.over(self.buffer[idx]);
                }
            }
        }
    }
}

/// Records draw calls instead of rasterizing them.
#[cfg(test)]
pub(crate) mod recording {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    pub enum Call {
        FillRect { color: Rgba },
        Stroke { color: Rgba, points: Vec<(f64, f64)>, cap: LineCap, join: LineJoin },
        Circle { color: Rgba, x: f64, y: f64, radius: f64 },
    }

    pub struct RecordingCanvas {
        pub size: (usize, usize),
        pub ratio: f64,
        pub calls: Vec<Call>,
        fill: Rgba,
        stroke: Rgba,
        cap: LineCap,
        join: LineJoin,
        path: Vec<(f64, f64)>,
    }

    impl RecordingCanvas {
        pub fn new(width: usize, height: usize) -> Self {
            RecordingCanvas {
                size: (width, height),
                ratio: 1.0,
                calls: Vec::new(),
                fill: Rgba::rgb(0, 0, 0),
                stroke: Rgba::rgb(0, 0, 0),
                cap: LineCap::Butt,
                join: LineJoin::Round,
                path: Vec::new(),
            }
        }
    }

    impl Canvas for RecordingCanvas {
        fn pixel_size(&self) -> (usize, usize) {
            self.size
        }
        fn resize(&mut self, w: usize, h: usize) {
            self.size = (w, h);
        }
        fn set_pixel_ratio(&mut self, ratio: f64) {
            self.ratio = ratio;
        }
        fn set_fill(&mut self, color: Rgba) {
            self.fill = color;
        }
        fn set_stroke(&mut self, color: Rgba) {
            self.stroke = color;
        }
        fn set_line_width(&mut self, _width: f64) {}
        fn set_line_cap(&mut self, cap: LineCap) {
            self.cap = cap;
        }
        fn set_line_join(&mut self, join: LineJoin) {
            self.join = join;
        }
        fn fill_rect(&mut self, _x: f64, _y: f64, _w: f64, _h: f64) {
            self.calls.push(Call::FillRect { color: self.fill });
        }
        fn begin_path(&mut self) {
            self.path.clear();
        }
        fn move_to(&mut self, x: f64, y: f64) {
            self.path.push((x, y));
        }
        fn line_to(&mut self, x: f64, y: f64) {
            self.path.push((x, y));
        }
        fn stroke(&mut self) {
            self.calls.push(Call::Stroke {
                color: self.stroke,
                points: self.path.clone(),
                cap: self.cap,
                join: self.join,
            });
        }
        fn fill_circle(&mut self, x: f64, y: f64, radius: f64) {
            self.calls.push(Call::Circle { color: self.fill, x, y, radius });
        }
    }
}
