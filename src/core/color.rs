//! RGB/HSL color helpers used by the point demos.
//!
//! HSL conversions follow the conventions of common web 3D libraries:
//! hue wraps into [0, 1), saturation and lightness are clamped.

/// Linear RGB triple. Channels are nominally in [0, 1] but may exceed 1.0
/// after [`Rgb::scale`] (used for glow/bloom-style highlights).
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Rgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

/// Hue, saturation, lightness, each in [0, 1].
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Hsl {
    pub h: f32,
    pub s: f32,
    pub l: f32,
}

impl Hsl {
    pub const fn new(h: f32, s: f32, l: f32) -> Self {
        Self { h, s, l }
    }
}

pub const WHITE: Rgb = Rgb::new(1.0, 1.0, 1.0);
pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);

impl Rgb {
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// `0xRRGGBB` → color
    pub const fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    pub fn from_array(c: [f32; 3]) -> Self {
        Self::new(c[0], c[1], c[2])
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn lerp(self, other: Rgb, t: f32) -> Rgb {
        Rgb {
            r: self.r + (other.r - self.r) * t,
            g: self.g + (other.g - self.g) * t,
            b: self.b + (other.b - self.b) * t,
        }
    }

    pub fn scale(self, k: f32) -> Rgb {
        Rgb::new(self.r * k, self.g * k, self.b * k)
    }

    pub fn clamp01(self) -> Rgb {
        Rgb::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
        )
    }

    pub fn from_hsl(hsl: Hsl) -> Rgb {
        let h = hsl.h.rem_euclid(1.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        if s == 0.0 {
            return Rgb::new(l, l, l);
        }

        let p = if l <= 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let q = 2.0 * l - p;

        Rgb::new(
            hue_to_rgb(q, p, h + 1.0 / 3.0),
            hue_to_rgb(q, p, h),
            hue_to_rgb(q, p, h - 1.0 / 3.0),
        )
    }

    pub fn to_hsl(self) -> Hsl {
        let max = self.r.max(self.g).max(self.b);
        let min = self.r.min(self.g).min(self.b);
        let l = (min + max) / 2.0;

        if min == max {
            return Hsl::new(0.0, 0.0, l);
        }

        let delta = max - min;
        let s = if l <= 0.5 {
            delta / (max + min)
        } else {
            delta / (2.0 - max - min)
        };

        let h = if max == self.r {
            (self.g - self.b) / delta + if self.g < self.b { 6.0 } else { 0.0 }
        } else if max == self.g {
            (self.b - self.r) / delta + 2.0
        } else {
            (self.r - self.g) / delta + 4.0
        };

        Hsl::new(h / 6.0, s, l)
    }

    /// Shift hue/saturation/lightness by the given offsets.
    pub fn offset_hsl(self, dh: f32, ds: f32, dl: f32) -> Rgb {
        let hsl = self.to_hsl();
        Rgb::from_hsl(Hsl::new(hsl.h + dh, hsl.s + ds, hsl.l + dl))
    }
}

fn hue_to_rgb(p: f32, q: f32, mut t: f32) -> f32 {
    if t < 0.0 {
        t += 1.0;
    }
    if t > 1.0 {
        t -= 1.0;
    }
    if t < 1.0 / 6.0 {
        return p + (q - p) * 6.0 * t;
    }
    if t < 0.5 {
        return q;
    }
    if t < 2.0 / 3.0 {
        return p + (q - p) * 6.0 * (2.0 / 3.0 - t);
    }
    p
}

/// RGB interpolation with `t` clamped to [0, 1].
pub fn gradient(a: Rgb, b: Rgb, t: f32) -> Rgb {
    a.lerp(b, t.clamp(0.0, 1.0))
}

/// Interpolate hue and lightness between two HSL endpoints (saturation from `a`).
pub fn hsl_ramp(a: Hsl, b: Hsl, t: f32) -> Rgb {
    let t = t.clamp(0.0, 1.0);
    Rgb::from_hsl(Hsl::new(
        a.h + (b.h - a.h) * t,
        a.s,
        a.l + (b.l - a.l) * t,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Rgb, b: Rgb) -> bool {
        (a.r - b.r).abs() < 1e-4 && (a.g - b.g).abs() < 1e-4 && (a.b - b.b).abs() < 1e-4
    }

    fn in_unit(c: Rgb) -> bool {
        [c.r, c.g, c.b].iter().all(|v| (0.0..=1.0).contains(v))
    }

    #[test]
    fn test_from_hex() {
        let c = Rgb::from_hex(0xff8000);
        assert_eq!(c.r, 1.0);
        assert!((c.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.b, 0.0);
    }

    #[test]
    fn test_hsl_primaries() {
        assert!(close(Rgb::from_hsl(Hsl::new(0.0, 1.0, 0.5)), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(Rgb::from_hsl(Hsl::new(1.0 / 3.0, 1.0, 0.5)), Rgb::new(0.0, 1.0, 0.0)));
        assert!(close(Rgb::from_hsl(Hsl::new(2.0 / 3.0, 1.0, 0.5)), Rgb::new(0.0, 0.0, 1.0)));
        // Hue wraps
        assert!(close(Rgb::from_hsl(Hsl::new(1.0, 1.0, 0.5)), Rgb::new(1.0, 0.0, 0.0)));
        assert!(close(Rgb::from_hsl(Hsl::new(-1.0 / 3.0, 1.0, 0.5)), Rgb::new(0.0, 0.0, 1.0)));
        // Grey
        assert!(close(Rgb::from_hsl(Hsl::new(0.3, 0.0, 0.25)), Rgb::new(0.25, 0.25, 0.25)));
    }

    #[test]
    fn test_hsl_round_trip_for_palette() {
        for hex in [0x034efc, 0x427afc, 0xf0c697, 0xffb3e6, 0x6b3b1a] {
            let c = Rgb::from_hex(hex);
            assert!(close(Rgb::from_hsl(c.to_hsl()), c), "round trip failed for {hex:06x}");
        }
    }

    #[test]
    fn test_gradient_clamps_t() {
        let a = Rgb::new(0.0, 0.2, 1.0);
        let b = Rgb::new(1.0, 0.8, 0.0);
        assert_eq!(gradient(a, b, -3.0), a);
        assert_eq!(gradient(a, b, 7.0), b);
    }

    #[test]
    fn test_ramps_stay_in_unit_range() {
        let navy = Hsl::new(220.0 / 360.0, 1.0, 0.15);
        let yellow = Hsl::new(60.0 / 360.0, 1.0, 0.5);
        for i in 0..=1000 {
            let t = i as f32 / 1000.0;
            assert!(in_unit(hsl_ramp(navy, yellow, t)), "hsl_ramp out of range at t={t}");
            assert!(in_unit(gradient(Rgb::from_hex(0x034efc), WHITE, t)));
            assert!(in_unit(Rgb::from_hsl(Hsl::new(t, t, t))));
        }
    }

    #[test]
    fn test_offset_hsl_brightens() {
        let base = Rgb::from_hex(0x034efc);
        let lighter = base.offset_hsl(0.0, 0.0, 0.2);
        assert!(lighter.to_hsl().l > base.to_hsl().l);
        assert_eq!(BLACK.offset_hsl(0.5, 0.0, 0.0), BLACK);
    }
}
