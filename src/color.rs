use std::f32::consts::FRAC_PI_3;

use palette::{Clamp, FromColor, Lab, LinSrgb, Srgb};

// ---------------------------------------------------------------------------
// Diverging colour map: value → Srgb<u8>
// ---------------------------------------------------------------------------

/// Moreland's "coolwarm" end points.
const COOL: (u8, u8, u8) = (59, 76, 192);
const WARM: (u8, u8, u8) = (180, 4, 38);

/// Magnitude of the unsaturated centre when the end points are too far apart
/// in hue to blend directly. `M = 88` is a light grey.
const MIN_CENTRE_MAGNITUDE: f32 = 88.0;

/// Saturation below which a colour counts as unsaturated.
const UNSATURATED: f32 = 0.05;

/// Annotation text switches from white to black above this luminance.
const TEXT_LUMINANCE_THRESHOLD: f32 = 0.408;

pub const BLACK: Srgb<u8> = Srgb::new(0, 0, 0);
pub const WHITE: Srgb<u8> = Srgb::new(255, 255, 255);

/// Polar form of CIE L*a*b*: magnitude, saturation (angle from the L axis)
/// and hue.
#[derive(Debug, Clone, Copy, PartialEq)]
struct Msh {
    m: f32,
    s: f32,
    h: f32,
}

impl Msh {
    fn from_rgb(rgb: (u8, u8, u8)) -> Self {
        let lab: Lab = Lab::from_color(Srgb::new(rgb.0, rgb.1, rgb.2).into_format::<f32>());
        let m = (lab.l * lab.l + lab.a * lab.a + lab.b * lab.b).sqrt();
        Msh {
            m,
            s: if m > 0.0 { (lab.l / m).clamp(-1.0, 1.0).acos() } else { 0.0 },
            h: lab.b.atan2(lab.a),
        }
    }

    fn to_rgb(self) -> Srgb<u8> {
        let lab: Lab = Lab::new(
            self.m * self.s.cos(),
            self.m * self.s.sin() * self.h.cos(),
            self.m * self.s.sin() * self.h.sin(),
        );
        Srgb::<f32>::from_color(lab).clamp().into_format::<u8>()
    }

    fn is_saturated(&self) -> bool {
        self.s > UNSATURATED
    }

    /// Hue for an unsaturated colour of magnitude `m_unsat` that sits next to
    /// this saturated one.
    fn adjacent_hue(&self, m_unsat: f32) -> f32 {
        if self.m >= m_unsat {
            return self.h;
        }
        let spin = self.s * (m_unsat * m_unsat - self.m * self.m).sqrt() / (self.m * self.s.sin());
        if self.h > -FRAC_PI_3 {
            self.h + spin
        } else {
            self.h - spin
        }
    }

    fn lerp(self, other: Msh, t: f32) -> Msh {
        Msh {
            m: self.m + (other.m - self.m) * t,
            s: self.s + (other.s - self.s) * t,
            h: self.h + (other.h - self.h) * t,
        }
    }
}

/// Moreland's diverging interpolation between two saturated colours at
/// `t` in `[0, 1]`.
fn diverging(low: Msh, high: Msh, t: f32) -> Msh {
    let (mut a, mut b, mut t) = (low, high, t);
    if a.is_saturated() && b.is_saturated() && (a.h - b.h).abs() > FRAC_PI_3 {
        let centre = Msh {
            m: a.m.max(b.m).max(MIN_CENTRE_MAGNITUDE),
            s: 0.0,
            h: 0.0,
        };
        if t < 0.5 {
            b = centre;
            t *= 2.0;
        } else {
            a = centre;
            t = 2.0 * t - 1.0;
        }
    }
    if !a.is_saturated() && b.is_saturated() {
        a.h = b.adjacent_hue(a.m);
    } else if !b.is_saturated() && a.is_saturated() {
        b.h = a.adjacent_hue(b.m);
    }
    a.lerp(b, t)
}

/// Maps values in `[vmin, vmax]` onto a blue → light grey → red ramp,
/// interpolated in Moreland's Msh space. Values outside the range take the end
/// colours.
#[derive(Debug, Clone)]
pub struct DivergingColorMap {
    pub vmin: f64,
    pub vmax: f64,
    low: Msh,
    high: Msh,
}

impl DivergingColorMap {
    pub fn coolwarm(vmin: f64, vmax: f64) -> Self {
        DivergingColorMap {
            vmin,
            vmax,
            low: Msh::from_rgb(COOL),
            high: Msh::from_rgb(WARM),
        }
    }

    /// Position of `value` on the ramp in `[0, 1]`; `None` for NaN.
    pub fn normalize(&self, value: f64) -> Option<f32> {
        if value.is_nan() {
            return None;
        }
        let span = self.vmax - self.vmin;
        if span <= 0.0 {
            return Some(0.5);
        }
        Some(((value - self.vmin) / span).clamp(0.0, 1.0) as f32)
    }

    /// Colour for a value; `None` for NaN (the cell is left blank).
    pub fn color_for(&self, value: f64) -> Option<Srgb<u8>> {
        let t = self.normalize(value)?;
        Some(diverging(self.low, self.high, t).to_rgb())
    }

    /// Readable annotation colour on top of `color_for(value)`.
    pub fn text_color_for(&self, value: f64) -> Srgb<u8> {
        match self.color_for(value) {
            Some(bg) if relative_luminance(bg) <= TEXT_LUMINANCE_THRESHOLD => WHITE,
            _ => BLACK,
        }
    }
}

/// WCAG relative luminance of an sRGB colour.
pub fn relative_luminance(color: Srgb<u8>) -> f32 {
    let lin: LinSrgb = color.into_format::<f32>().into_linear();
    0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: Srgb<u8>, b: (u8, u8, u8)) -> bool {
        let d = |x: u8, y: u8| (x as i16 - y as i16).abs() <= 3;
        d(a.red, b.0) && d(a.green, b.1) && d(a.blue, b.2)
    }

    #[test]
    fn end_points_and_centre() {
        let cmap = DivergingColorMap::coolwarm(-1.0, 1.0);
        assert!(close(cmap.color_for(-1.0).unwrap(), COOL));
        assert!(close(cmap.color_for(0.0).unwrap(), (221, 221, 221)));
        assert!(close(cmap.color_for(1.0).unwrap(), WARM));
    }

    #[test]
    fn quarter_points_stay_saturated() {
        // 0.1 and 0.7 sit a quarter of the way in from each end of [-0.2, 1.0].
        let cmap = DivergingColorMap::coolwarm(-0.2, 1.0);
        let cool = cmap.color_for(0.1).unwrap();
        let warm = cmap.color_for(0.7).unwrap();
        assert!(close(cool, (141, 176, 254)), "{cool:?}");
        assert!(close(warm, (244, 154, 123)), "{warm:?}");
    }

    #[test]
    fn ramp_is_monotone_on_each_side() {
        let cmap = DivergingColorMap::coolwarm(0.0, 1.0);
        let reds: Vec<u8> = (0..=10)
            .map(|i| cmap.color_for(i as f64 / 20.0).unwrap().red)
            .collect();
        assert!(reds.windows(2).all(|w| w[0] <= w[1]), "{reds:?}");
        let blues: Vec<u8> = (10..=20)
            .map(|i| cmap.color_for(i as f64 / 20.0).unwrap().blue)
            .collect();
        assert!(blues.windows(2).all(|w| w[0] >= w[1]), "{blues:?}");
    }

    #[test]
    fn out_of_range_values_clamp() {
        let cmap = DivergingColorMap::coolwarm(-0.2, 1.0);
        assert_eq!(cmap.color_for(-0.9), cmap.color_for(-0.2));
        assert_eq!(cmap.normalize(3.0), Some(1.0));
    }

    #[test]
    fn nan_has_no_colour() {
        let cmap = DivergingColorMap::coolwarm(-0.2, 1.0);
        assert_eq!(cmap.color_for(f64::NAN), None);
        assert_eq!(cmap.text_color_for(f64::NAN), BLACK);
    }

    #[test]
    fn text_contrasts_with_cell() {
        let cmap = DivergingColorMap::coolwarm(-0.2, 1.0);
        assert_eq!(cmap.text_color_for(1.0), WHITE);
        assert_eq!(cmap.text_color_for(0.4), BLACK);
        assert_eq!(cmap.text_color_for(-0.2), WHITE);
    }
}
