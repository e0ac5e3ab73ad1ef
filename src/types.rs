//! Strongly-typed primitives shared by the color, geometry and drawing code.
//!
//! - [`Rgb`] is always a valid 24-bit color, so every resolved color prints as `#rrggbb`
//! - [`Angle`] is in degrees; conversion to radians happens at the canvas boundary
//! - Points are `glam::DVec2`

use std::fmt;
use std::ops::{Add, Sub};
use std::str::FromStr;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::errors::{ColorParseError, NumericError};
use crate::log::warn;

/// A position in gauge-face coordinates (y grows downward).
pub type Point = DVec2;

/// Validate a user-provided strictly positive number.
pub fn try_positive(val: f64) -> Result<f64, NumericError> {
    if val.is_nan() {
        Err(NumericError::NaN)
    } else if val.is_infinite() {
        Err(NumericError::Infinite)
    } else if val == 0.0 {
        Err(NumericError::Zero)
    } else if val < 0.0 {
        Err(NumericError::Negative)
    } else {
        Ok(val)
    }
}

/// A document setting that must be strictly positive, or `None` (logged)
/// when it is not.
#[cfg_attr(not(feature = "tracing"), allow(unused_variables))]
pub(crate) fn positive_setting(field: &'static str, val: f64) -> Option<f64> {
    match try_positive(val) {
        Ok(val) => Some(val),
        Err(error) => {
            warn!(field, value = val, %error, "ignoring setting");
            None
        }
    }
}

// ============================================================================
// Rgb
// ============================================================================

/// An opaque 24-bit color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Rgb { r, g, b }
    }

    /// Per-channel linear interpolation toward `other`, rounded to the nearest integer.
    pub fn blend(self, other: Rgb, alpha: f64) -> Rgb {
        let mix = |a: u8, b: u8| -> u8 {
            let v = (f64::from(a) * (1.0 - alpha) + f64::from(b) * alpha).round();
            v.clamp(0.0, 255.0) as u8
        };
        Rgb::new(mix(self.r, other.r), mix(self.g, other.g), mix(self.b, other.b))
    }

    fn unit_channels(self) -> (f64, f64, f64) {
        (
            f64::from(self.r) / 255.0,
            f64::from(self.g) / 255.0,
            f64::from(self.b) / 255.0,
        )
    }

    fn from_unit_channels(r: f64, g: f64, b: f64) -> Rgb {
        let to = |c: f64| (c * 255.0).round().clamp(0.0, 255.0) as u8;
        Rgb::new(to(r), to(g), to(b))
    }

    /// Hue shared by the HSL and HSV conversions, in [0, 1).
    fn hue(r: f64, g: f64, b: f64, max: f64, d: f64) -> f64 {
        let h = if max == r {
            (g - b) / d + if g < b { 6.0 } else { 0.0 }
        } else if max == g {
            (b - r) / d + 2.0
        } else {
            (r - g) / d + 4.0
        };
        h / 6.0
    }

    /// Convert to (hue, saturation, lightness), each in [0, 1].
    pub fn to_hsl(self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit_channels();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let l = (max + min) / 2.0;
        if max == min {
            return (0.0, 0.0, l);
        }
        let d = max - min;
        let s = if l > 0.5 {
            d / (2.0 - max - min)
        } else {
            d / (max + min)
        };
        (Self::hue(r, g, b, max, d), s, l)
    }

    pub fn from_hsl(h: f64, s: f64, l: f64) -> Rgb {
        if s == 0.0 {
            return Rgb::from_unit_channels(l, l, l);
        }
        fn hue_to_channel(p: f64, q: f64, mut t: f64) -> f64 {
            if t < 0.0 {
                t += 1.0;
            }
            if t > 1.0 {
                t -= 1.0;
            }
            if t < 1.0 / 6.0 {
                p + (q - p) * 6.0 * t
            } else if t < 0.5 {
                q
            } else if t < 2.0 / 3.0 {
                p + (q - p) * (2.0 / 3.0 - t) * 6.0
            } else {
                p
            }
        }
        let q = if l < 0.5 { l * (1.0 + s) } else { l + s - l * s };
        let p = 2.0 * l - q;
        Rgb::from_unit_channels(
            hue_to_channel(p, q, h + 1.0 / 3.0),
            hue_to_channel(p, q, h),
            hue_to_channel(p, q, h - 1.0 / 3.0),
        )
    }

    /// Convert to (hue, saturation, value), each in [0, 1].
    pub fn to_hsv(self) -> (f64, f64, f64) {
        let (r, g, b) = self.unit_channels();
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let d = max - min;
        let s = if max == 0.0 { 0.0 } else { d / max };
        let h = if max == min {
            0.0
        } else {
            Self::hue(r, g, b, max, d)
        };
        (h, s, max)
    }

    pub fn from_hsv(h: f64, s: f64, v: f64) -> Rgb {
        let i = (h * 6.0).floor();
        let f = h * 6.0 - i;
        let p = v * (1.0 - s);
        let q = v * (1.0 - f * s);
        let t = v * (1.0 - (1.0 - f) * s);
        let (r, g, b) = match (i as i64).rem_euclid(6) {
            0 => (v, t, p),
            1 => (q, v, p),
            2 => (p, v, t),
            3 => (p, q, v),
            4 => (t, p, v),
            _ => (v, p, q),
        };
        Rgb::from_unit_channels(r, g, b)
    }
}

impl FromStr for Rgb {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ColorParseError {
            input: s.to_string(),
        };
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(err());
        }
        let channel = |range: std::ops::Range<usize>| u8::from_str_radix(&hex[range], 16);
        match hex.len() {
            6 => Ok(Rgb::new(
                channel(0..2).map_err(|_| err())?,
                channel(2..4).map_err(|_| err())?,
                channel(4..6).map_err(|_| err())?,
            )),
            3 => {
                let short = |i: usize| channel(i..i + 1).map(|v| v * 17).map_err(|_| err());
                Ok(Rgb::new(short(0)?, short(1)?, short(2)?))
            }
            _ => Err(err()),
        }
    }
}

impl TryFrom<String> for Rgb {
    type Error = ColorParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Rgb> for String {
    fn from(value: Rgb) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

// ============================================================================
// Angle
// ============================================================================

/// Angle in degrees, measured clockwise from the positive x axis.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Angle(pub f64);

impl Angle {
    pub const ZERO: Angle = Angle(0.0);

    #[inline]
    pub fn degrees(self) -> f64 {
        self.0
    }

    #[inline]
    pub fn radians(self) -> f64 {
        self.0.to_radians()
    }

    /// Wrap into [0, 360).
    pub fn wrapped(self) -> Angle {
        Angle(self.0.rem_euclid(360.0))
    }

    pub fn lerp(self, other: Angle, t: f64) -> Angle {
        Angle(self.0 + (other.0 - self.0) * t)
    }
}

impl Add for Angle {
    type Output = Angle;
    fn add(self, rhs: Angle) -> Angle {
        Angle(self.0 + rhs.0)
    }
}

impl Sub for Angle {
    type Output = Angle;
    fn sub(self, rhs: Angle) -> Angle {
        Angle(self.0 - rhs.0)
    }
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}°", self.0)
    }
}

// ============================================================================
// Rect
// ============================================================================

/// Axis-aligned rectangle anchored at its top-left corner.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn origin(&self) -> Point {
        DVec2::new(self.x, self.y)
    }

    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // ==================== Rgb tests ====================

    #[test]
    fn parse_long_and_short_hex() {
        assert_eq!("#FF0000".parse::<Rgb>(), Ok(Rgb::new(255, 0, 0)));
        assert_eq!("#0af".parse::<Rgb>(), Ok(Rgb::new(0, 170, 255)));
    }

    #[test]
    fn parse_rejects_garbage() {
        assert!("red".parse::<Rgb>().is_err());
        assert!("#12345".parse::<Rgb>().is_err());
        assert!("#gg0000".parse::<Rgb>().is_err());
        assert!("#ff00ff00".parse::<Rgb>().is_err());
    }

    #[test]
    fn display_is_lowercase_six_digit() {
        assert_eq!(Rgb::new(255, 10, 0).to_string(), "#ff0a00");
    }

    #[test]
    fn blend_half_rounds_up() {
        let red = Rgb::new(255, 0, 0);
        let blue = Rgb::new(0, 0, 255);
        assert_eq!(red.blend(blue, 0.5).to_string(), "#800080");
    }

    #[test]
    fn blend_endpoints() {
        let a = Rgb::new(12, 34, 56);
        let b = Rgb::new(200, 100, 0);
        assert_eq!(a.blend(b, 0.0), a);
        assert_eq!(a.blend(b, 1.0), b);
    }

    #[test]
    fn hsl_conversion_of_primary() {
        let (h, s, l) = Rgb::new(255, 0, 0).to_hsl();
        assert_eq!((h, s, l), (0.0, 1.0, 0.5));
        assert_eq!(Rgb::from_hsl(h, s, l), Rgb::new(255, 0, 0));
    }

    #[test]
    fn hsv_conversion_of_secondary() {
        let cyan = Rgb::new(0, 255, 255);
        let (h, s, v) = cyan.to_hsv();
        assert!((h - 0.5).abs() < 1e-12);
        assert_eq!((s, v), (1.0, 1.0));
        assert_eq!(Rgb::from_hsv(h, s, v), cyan);
    }

    #[test]
    fn gray_has_no_saturation() {
        let (_, s, l) = Rgb::new(128, 128, 128).to_hsl();
        assert_eq!(s, 0.0);
        assert!((l - 128.0 / 255.0).abs() < 1e-12);
    }

    #[test]
    fn serde_uses_hex_strings() {
        let json = serde_json::to_string(&Rgb::new(1, 2, 3)).unwrap();
        assert_eq!(json, "\"#010203\"");
        let back: Rgb = serde_json::from_str("\"#FFFFFF\"").unwrap();
        assert_eq!(back, Rgb::WHITE);
        assert!(serde_json::from_str::<Rgb>("\"white\"").is_err());
    }

    // ==================== Angle tests ====================

    #[test]
    fn angle_wraps_into_range() {
        assert_eq!(Angle(370.0).wrapped(), Angle(10.0));
        assert_eq!(Angle(-90.0).wrapped(), Angle(270.0));
        assert_eq!(Angle(360.0).wrapped(), Angle(0.0));
    }

    #[test]
    fn angle_lerp() {
        assert_eq!(Angle(0.0).lerp(Angle(270.0), 0.5), Angle(135.0));
    }

    // ==================== Misc ====================

    #[test]
    fn try_positive_rejects_bad_values() {
        assert_eq!(try_positive(0.0), Err(NumericError::Zero));
        assert_eq!(try_positive(-1.0), Err(NumericError::Negative));
        assert_eq!(try_positive(f64::NAN), Err(NumericError::NaN));
        assert_eq!(try_positive(f64::INFINITY), Err(NumericError::Infinite));
        assert_eq!(try_positive(240.0), Ok(240.0));
    }

    #[test]
    fn positive_setting_drops_rejected_values() {
        assert_eq!(positive_setting("length", 2000.0), Some(2000.0));
        assert_eq!(positive_setting("length", 0.0), None);
        assert_eq!(positive_setting("length", f64::NAN), None);
    }
}
