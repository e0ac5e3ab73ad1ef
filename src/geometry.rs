//! Alignment math and small numeric helpers.
//!
//! Alignments are serialized with the integer codes used in saved gauge files,
//! so each enum converts to and from `i64`.

use glam::DVec2;

use crate::types::Point;

/// Declares an integer-coded enum that round-trips through serde as a number.
macro_rules! coded_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $code:literal ),* $(,)?
        }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, ::serde::Serialize, ::serde::Deserialize)]
        #[serde(try_from = "i64", into = "i64")]
        pub enum $name {
            $( $(#[$vmeta])* $variant ),*
        }

        impl TryFrom<i64> for $name {
            type Error = String;

            fn try_from(code: i64) -> Result<Self, Self::Error> {
                match code {
                    $( $code => Ok($name::$variant), )*
                    other => Err(format!("invalid {} code {}", stringify!($name), other)),
                }
            }
        }

        impl From<$name> for i64 {
            fn from(value: $name) -> i64 {
                match value {
                    $( $name::$variant => $code, )*
                }
            }
        }
    };
}

pub(crate) use coded_enum;

coded_enum! {
    /// Where a length sits relative to its anchor coordinate.
    pub enum LengthAlignment {
        Outer = -1,
        Center = 0,
        Inner = 1,
    }
}

coded_enum! {
    /// Which point of a box its anchor coordinate names.
    pub enum BoxAlignment {
        TopLeft = 0,
        TopCenter = 1,
        TopRight = 2,
        MiddleLeft = 3,
        MiddleCenter = 4,
        MiddleRight = 5,
        BottomLeft = 6,
        BottomCenter = 7,
        BottomRight = 8,
    }
}

coded_enum! {
    pub enum Orientation {
        Horizontal = 0,
        Vertical = 1,
    }
}

coded_enum! {
    /// Pixel-exact band alignment used for rasterized rings.
    pub enum RadiusAlignment {
        Outer = 0,
        Center = 1,
        Inner = 2,
    }
}

impl Default for LengthAlignment {
    fn default() -> Self {
        LengthAlignment::Center
    }
}

impl Default for BoxAlignment {
    fn default() -> Self {
        BoxAlignment::TopLeft
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Orientation::Horizontal
    }
}

/// Place a length of `length` relative to `start`.
///
/// Returns `[from, to]`. `Outer` runs backward from `start` unless
/// `lowest_first` asks for the smaller coordinate first.
pub fn align_length(start: f64, length: f64, alignment: LengthAlignment, lowest_first: bool) -> [f64; 2] {
    match alignment {
        LengthAlignment::Outer if lowest_first => [start - length, start],
        LengthAlignment::Outer => [start, start - length],
        LengthAlignment::Center => {
            let half = length / 2.0;
            [start - half, start + half]
        }
        LengthAlignment::Inner => [start, start + length],
    }
}

/// Combine a horizontal and a vertical length alignment into a box alignment.
/// `Outer` is left/top, `Inner` is right/bottom.
pub fn length_alignments_to_box(horizontal: LengthAlignment, vertical: LengthAlignment) -> BoxAlignment {
    use LengthAlignment::*;
    match (horizontal, vertical) {
        (Outer, Outer) => BoxAlignment::TopLeft,
        (Outer, Center) => BoxAlignment::MiddleLeft,
        (Outer, Inner) => BoxAlignment::BottomLeft,
        (Center, Outer) => BoxAlignment::TopCenter,
        (Center, Center) => BoxAlignment::MiddleCenter,
        (Center, Inner) => BoxAlignment::BottomCenter,
        (Inner, Outer) => BoxAlignment::TopRight,
        (Inner, Center) => BoxAlignment::MiddleRight,
        (Inner, Inner) => BoxAlignment::BottomRight,
    }
}

/// Top-left corner of a `width` x `height` box anchored at `(x, y)`.
pub fn align_point(x: f64, y: f64, width: f64, height: f64, alignment: BoxAlignment) -> Point {
    let (dx, dy) = match alignment {
        BoxAlignment::TopLeft => (0.0, 0.0),
        BoxAlignment::TopCenter => (width / 2.0, 0.0),
        BoxAlignment::TopRight => (width, 0.0),
        BoxAlignment::MiddleLeft => (0.0, height / 2.0),
        BoxAlignment::MiddleCenter => (width / 2.0, height / 2.0),
        BoxAlignment::MiddleRight => (width, height / 2.0),
        BoxAlignment::BottomLeft => (0.0, height),
        BoxAlignment::BottomCenter => (width / 2.0, height),
        BoxAlignment::BottomRight => (width, height),
    };
    DVec2::new(x - dx, y - dy)
}

/// Outer and inner radius of a ring.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Radii {
    pub outer: f64,
    pub inner: f64,
}

/// Ring of `length` pixels around `radius`, with the half-pixel corrections of
/// a rasterized band (both edges inclusive).
///
/// ```
/// use gaugeface::geometry::{Radii, RadiusAlignment, align_radius};
///
/// // A 10 px band whose outermost pixel row sits on radius 100.
/// assert_eq!(align_radius(100.0, 10.0, RadiusAlignment::Outer), Radii { outer: 100.0, inner: 91.0 });
/// assert_eq!(align_radius(100.0, 10.0, RadiusAlignment::Center), Radii { outer: 104.5, inner: 95.5 });
/// ```
pub fn align_radius(radius: f64, length: f64, alignment: RadiusAlignment) -> Radii {
    match alignment {
        RadiusAlignment::Outer => Radii {
            outer: radius,
            inner: radius - length + 1.0,
        },
        RadiusAlignment::Center => Radii {
            outer: radius + length / 2.0 - 0.5,
            inner: radius - length / 2.0 + 0.5,
        },
        RadiusAlignment::Inner => Radii {
            outer: radius - length + 1.0,
            inner: radius,
        },
    }
}

// ============================================================================
// Points and lines
// ============================================================================

/// Unit vector at `radians`, clockwise from +x.
pub fn unit_vector(radians: f64) -> DVec2 {
    DVec2::new(radians.cos(), radians.sin())
}

/// Straight segment between two points.
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Line {
    pub p1: Point,
    pub p2: Point,
}

impl Line {
    pub fn new(p1: Point, p2: Point) -> Self {
        Line { p1, p2 }
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    pub fn midpoint(&self) -> Point {
        (self.p1 + self.p2) * 0.5
    }
}

// ============================================================================
// Scalar helpers
// ============================================================================

/// Linear interpolation from `start` to `end`.
#[inline]
pub fn lerp(start: f64, end: f64, amount: f64) -> f64 {
    start + (end - start) * amount
}

/// Remap `x` from [in_min, in_max] to [out_min, out_max].
///
/// A zero-width input range maps to the middle of the output range.
pub fn map(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    if in_max == in_min {
        return (out_min + out_max) / 2.0;
    }
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}

pub fn round_to(value: f64, decimal_places: i32) -> f64 {
    let factor = 10f64.powi(decimal_places);
    (value * factor).round() / factor
}

/// Largest `offset + k * factor` not above `n`.
pub fn floor_divisible(n: f64, factor: f64, offset: f64) -> f64 {
    ((n - offset) / factor).floor() * factor + offset
}

/// Smallest `offset + k * factor` not below `n`.
pub fn ceil_divisible(n: f64, factor: f64, offset: f64) -> f64 {
    ((n - offset) / factor).ceil() * factor + offset
}

#[inline]
pub fn in_range(n: f64, min: f64, max: f64) -> bool {
    n >= min && n <= max
}

/// Angle subtended by an arc of `arc_length` at `radius`; zero for a zero radius.
pub fn arc_length_to_angle_radians(arc_length: f64, radius: f64) -> f64 {
    if radius == 0.0 {
        return 0.0;
    }
    arc_length / radius
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn align_length_variants() {
        assert_eq!(align_length(100.0, 10.0, LengthAlignment::Outer, false), [100.0, 90.0]);
        assert_eq!(align_length(100.0, 10.0, LengthAlignment::Outer, true), [90.0, 100.0]);
        assert_eq!(align_length(100.0, 10.0, LengthAlignment::Center, false), [95.0, 105.0]);
        assert_eq!(align_length(100.0, 10.0, LengthAlignment::Inner, false), [100.0, 110.0]);
    }

    #[test]
    fn align_point_corners() {
        assert_eq!(align_point(10.0, 10.0, 4.0, 2.0, BoxAlignment::TopLeft), DVec2::new(10.0, 10.0));
        assert_eq!(align_point(10.0, 10.0, 4.0, 2.0, BoxAlignment::MiddleCenter), DVec2::new(8.0, 9.0));
        assert_eq!(align_point(10.0, 10.0, 4.0, 2.0, BoxAlignment::BottomRight), DVec2::new(6.0, 8.0));
    }

    #[test]
    fn length_alignments_combine() {
        assert_eq!(
            length_alignments_to_box(LengthAlignment::Outer, LengthAlignment::Center),
            BoxAlignment::MiddleLeft
        );
        assert_eq!(
            length_alignments_to_box(LengthAlignment::Inner, LengthAlignment::Outer),
            BoxAlignment::TopRight
        );
    }

    #[test]
    fn radius_alignment_half_pixel() {
        assert_eq!(
            align_radius(100.0, 10.0, RadiusAlignment::Center),
            Radii { outer: 104.5, inner: 95.5 }
        );
        assert_eq!(
            align_radius(100.0, 10.0, RadiusAlignment::Outer),
            Radii { outer: 100.0, inner: 91.0 }
        );
    }

    #[test]
    fn map_degenerate_range_is_midpoint() {
        assert_eq!(map(5.0, 3.0, 3.0, 0.0, 270.0), 135.0);
        assert_eq!(map(5.0, 0.0, 10.0, 0.0, 1.0), 0.5);
    }

    #[test]
    fn divisible_helpers_respect_offset() {
        assert_eq!(floor_divisible(7.0, 5.0, 0.0), 5.0);
        assert_eq!(ceil_divisible(7.0, 5.0, 0.0), 10.0);
        assert_eq!(floor_divisible(7.0, 5.0, 1.0), 6.0);
        assert_eq!(ceil_divisible(7.0, 5.0, 1.0), 11.0);
        assert_eq!(floor_divisible(-3.0, 5.0, 0.0), -5.0);
    }

    #[test]
    fn coded_enums_roundtrip_through_integers() {
        assert_eq!(serde_json::to_string(&LengthAlignment::Outer).unwrap(), "-1");
        let parsed: BoxAlignment = serde_json::from_str("4").unwrap();
        assert_eq!(parsed, BoxAlignment::MiddleCenter);
        assert!(serde_json::from_str::<Orientation>("7").is_err());
    }

    #[test]
    fn arc_length_zero_radius() {
        assert_eq!(arc_length_to_angle_radians(10.0, 0.0), 0.0);
        assert_eq!(arc_length_to_angle_radians(10.0, 5.0), 2.0);
    }

    #[test]
    fn line_properties() {
        let line = Line::new(DVec2::new(0.0, 0.0), DVec2::new(3.0, 4.0));
        assert_eq!(line.length(), 5.0);
        assert_eq!(line.midpoint(), DVec2::new(1.5, 2.0));
    }
}
