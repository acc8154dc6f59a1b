//! RGB and HSL value types plus the conversions between them.
//!
//! The two representations are views of one underlying color; the LED device
//! keeps them coherent. Conversion formulas follow the classic HSL color
//! space definition with hue, saturation, and luminosity in `[0, 1]`.

use libm::roundf;

/// Additive color with each channel in `[0, 255]`.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Self = Self::new(0, 0, 0);
    pub const WHITE: Self = Self::new(255, 255, 255);

    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// All three channels at the same level.
    #[must_use]
    pub const fn splat(level: u8) -> Self {
        Self::new(level, level, level)
    }
}

/// Hue/saturation/luminosity triple, each component in `[0, 1]`.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    #[must_use]
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

/// Quantizes a unit-interval component to a wire byte.
#[must_use]
pub fn unit_to_byte(value: f32) -> u8 {
    roundf(value.clamp(0.0, 1.0) * 255.0) as u8
}

/// Converts an RGB color to its HSL representation.
#[must_use]
pub fn rgb_to_hsl(color: Rgb) -> Hsl {
    let r = f32::from(color.r) / 255.0;
    let g = f32::from(color.g) / 255.0;
    let b = f32::from(color.b) / 255.0;

    let max = r.max(g).max(b);
    let min = r.min(g).min(b);
    let l = (max + min) / 2.0;

    if max == min {
        // Achromatic: hue is undefined, report zero.
        return Hsl::new(0.0, 0.0, l);
    }

    let d = max - min;
    let s = if l > 0.5 {
        d / (2.0 - max - min)
    } else {
        d / (max + min)
    };

    let mut h = if max == r {
        (g - b) / d + if g < b { 6.0 } else { 0.0 }
    } else if max == g {
        (b - r) / d + 2.0
    } else {
        (r - g) / d + 4.0
    };
    h /= 6.0;

    Hsl::new(h, s, l)
}

/// Converts an HSL color to its RGB representation.
#[must_use]
pub fn hsl_to_rgb(color: Hsl) -> Rgb {
    if color.s == 0.0 {
        let level = unit_to_byte(color.l);
        return Rgb::splat(level);
    }

    let q = if color.l < 0.5 {
        color.l * (1.0 + color.s)
    } else {
        color.l + color.s - color.l * color.s
    };
    let p = 2.0 * color.l - q;

    Rgb::new(
        unit_to_byte(hue_to_rgb(p, q, color.h + 1.0 / 3.0)),
        unit_to_byte(hue_to_rgb(p, q, color.h)),
        unit_to_byte(hue_to_rgb(p, q, color.h - 1.0 / 3.0)),
    )
}

fn hue_to_rgb(p: f32, q: f32, t: f32) -> f32 {
    let mut t = t;
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 1.0 / 2.0 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * (2.0 / 3.0 - t) * 6.0;
    }
    p
}
