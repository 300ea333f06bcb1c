/// Golden angle in degrees; consecutive indices land far apart on the hue wheel.
pub const GOLDEN_ANGLE: f64 = 137.508;

/// Page background the overlay fades towards.
pub const BACKGROUND: Rgba = Rgba::rgb(49, 28, 35);

/// Straight-alpha color. `a` is in [0, 1].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f64,
}

impl Rgba {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Rgba { r, g, b, a: 1.0 }
    }

    pub fn with_alpha(self, a: f64) -> Self {
        Rgba { a: a.clamp(0.0, 1.0), ..self }
    }

    /// `s` and `l` are fractions, not percentages.
    pub fn hsla(h: f64, s: f64, l: f64, a: f64) -> Self {
        let (r, g, b) = hsl_to_rgb(h, s, l);
        Rgba { r, g, b, a: a.clamp(0.0, 1.0) }
    }

    /// minifb's `0x00RRGGBB` layout.
    pub fn pack(&self) -> u32 {
        ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    pub fn unpack(pixel: u32) -> Self {
        Rgba::rgb((pixel >> 16) as u8, (pixel >> 8) as u8, pixel as u8)
    }

    /// Source-over blend of `self` onto an opaque destination pixel.
    pub fn over(&self, dst: u32) -> u32 {
        if self.a >= 1.0 {
            return self.pack();
        }
        let d = Rgba::unpack(dst);
        let mix = |s: u8, d: u8| (s as f64 * self.a + d as f64 * (1.0 - self.a)).round() as u8;
        Rgba::rgb(mix(self.r, d.r), mix(self.g, d.g), mix(self.b, d.b)).pack()
    }
}

/// Hue for the particle at `index`.
pub fn golden_hue(index: usize) -> f64 {
    (index as f64 * GOLDEN_ANGLE) % 360.0
}

fn hsl_to_rgb(h: f64, s: f64, l: f64) -> (u8, u8, u8) {
    let h = h.rem_euclid(360.0);
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match h {
        h if h < 60.0 => (c, x, 0.0),
        h if h < 120.0 => (x, c, 0.0),
        h if h < 180.0 => (0.0, c, x),
        h if h < 240.0 => (0.0, x, c),
        h if h < 300.0 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    let to_u8 = |v: f64| ((v + m) * 255.0).round().clamp(0.0, 255.0) as u8;
    (to_u8(r), to_u8(g), to_u8(b))
}
