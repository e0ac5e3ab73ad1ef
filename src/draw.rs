//! Shape helpers shared by the elements.
//!
//! Each helper builds a [`Path`] and paints it with a resolved [`Paint`]: the
//! fill first, then the stroke. A missing side is skipped. Angles are degrees
//! unless the parameter says otherwise.

use std::f64::consts::TAU;

use crate::canvas::{Canvas, Path, StrokeStyle};
use crate::color::Paint;
use crate::geometry::{
    BoxAlignment, LengthAlignment, Orientation, align_length, align_point, length_alignments_to_box,
};
use crate::types::{Point, Rect};

/// Fill then stroke `path`.
pub fn paint_path(canvas: &mut dyn Canvas, path: &Path, paint: &Paint) {
    if let Some(fill) = paint.fill {
        canvas.fill_path(path, fill);
    }
    if let Some(stroke) = paint.stroke {
        canvas.stroke_path(path, &StrokeStyle::new(stroke.color, stroke.thickness));
    }
}

/// A ring segment `thickness` wide, placed against `radius` by `alignment`,
/// from `start_deg` clockwise to `end_deg`.
#[allow(clippy::too_many_arguments)]
pub fn fill_stroke_arc(
    canvas: &mut dyn Canvas,
    center: Point,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    thickness: f64,
    alignment: LengthAlignment,
    paint: &Paint,
) {
    let radii = align_length(radius, thickness, alignment, false);
    let (start, end) = (start_deg.to_radians(), end_deg.to_radians());
    let path = Path::new()
        .arc(center, radii[1], start, end, false)
        .arc(center, radii[0], end, start, true)
        .close();
    paint_path(canvas, &path, paint);
}

/// An arc stroked `thickness` wide with round caps, filled with the fill color
/// and outlined by the stroke.
#[allow(clippy::too_many_arguments)]
pub fn rounded_arc(
    canvas: &mut dyn Canvas,
    center: Point,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    thickness: f64,
    alignment: LengthAlignment,
    paint: &Paint,
) {
    let radii = align_length(radius, thickness, alignment, true);
    let middle = (radii[0] + radii[1]) / 2.0;
    let path = Path::new().arc(center, middle, start_deg.to_radians(), end_deg.to_radians(), false);
    if let Some(stroke) = paint.stroke {
        canvas.stroke_path(&path, &StrokeStyle::new(stroke.color, thickness + stroke.thickness).round());
    }
    if let Some(fill) = paint.fill {
        canvas.stroke_path(&path, &StrokeStyle::new(fill, thickness).round());
    }
}

pub fn draw_circle(canvas: &mut dyn Canvas, center: Point, radius: f64, paint: &Paint) {
    let path = Path::new().arc(center, radius, 0.0, TAU, false);
    paint_path(canvas, &path, paint);
}

/// A round-capped line `width` wide. The stroke shows as an outline around
/// the fill color.
pub fn draw_wide_line(canvas: &mut dyn Canvas, from: Point, to: Point, width: f64, paint: &Paint) {
    let path = Path::new().move_to(from).line_to(to);
    if let Some(stroke) = paint.stroke {
        canvas.stroke_path(&path, &StrokeStyle::new(stroke.color, width + stroke.thickness).round());
    }
    if let Some(fill) = paint.fill {
        canvas.stroke_path(&path, &StrokeStyle::new(fill, width));
    }
}

/// A rounded rectangle whose `(x, y)` anchor is the `alignment` point of the
/// box. Empty boxes draw nothing.
#[allow(clippy::too_many_arguments)]
pub fn fill_stroke_rectangle_box_aligned(
    canvas: &mut dyn Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    corner_radius: f64,
    alignment: BoxAlignment,
    paint: &Paint,
) {
    if width <= 0.0 || height <= 0.0 {
        return;
    }
    let origin = align_point(x, y, width, height, alignment);
    let path = Path::new().round_rect(Rect::new(origin.x, origin.y, width, height), corner_radius);
    paint_path(canvas, &path, paint);
}

/// A rectangle anchored at `(x, y)` by one alignment per axis. `Outer` is the
/// left or top edge, `Inner` the right or bottom edge.
///
/// ```
/// use gaugeface::canvas::Path;
/// use gaugeface::draw::fill_stroke_rectangle_hv_aligned;
/// use gaugeface::geometry::LengthAlignment;
/// use gaugeface::{DrawCommand, FillStroke, FrameContext, RecordingCanvas, Rect, ValueCatalog};
///
/// let values = ValueCatalog::builtin();
/// let paint = FillStroke::default().resolve(&FrameContext::new(&values, 0.0));
/// let mut canvas = RecordingCanvas::new(240.0, 240.0);
/// // Right edge at x = 100, top edge at y = 50.
/// fill_stroke_rectangle_hv_aligned(
///     &mut canvas,
///     100.0,
///     50.0,
///     40.0,
///     20.0,
///     0.0,
///     LengthAlignment::Inner,
///     LengthAlignment::Outer,
///     &paint,
/// );
/// let DrawCommand::FillPath { path, .. } = &canvas.commands[0] else {
///     panic!("expected a filled rectangle");
/// };
/// assert_eq!(path, &Path::new().round_rect(Rect::new(60.0, 50.0, 40.0, 20.0), 0.0));
/// ```
#[allow(clippy::too_many_arguments)]
pub fn fill_stroke_rectangle_hv_aligned(
    canvas: &mut dyn Canvas,
    x: f64,
    y: f64,
    width: f64,
    height: f64,
    corner_radius: f64,
    horizontal: LengthAlignment,
    vertical: LengthAlignment,
    paint: &Paint,
) {
    let alignment = length_alignments_to_box(horizontal, vertical);
    fill_stroke_rectangle_box_aligned(canvas, x, y, width, height, corner_radius, alignment, paint);
}

/// A rectangle described along an axis: `length` runs with the orientation and
/// `thickness` across it.
#[allow(clippy::too_many_arguments)]
pub fn fill_stroke_rectangle_orientation(
    canvas: &mut dyn Canvas,
    length_component: f64,
    thickness_component: f64,
    length: f64,
    thickness: f64,
    corner_radius: f64,
    orientation: Orientation,
    length_alignment: LengthAlignment,
    thickness_alignment: LengthAlignment,
    paint: &Paint,
) {
    match orientation {
        Orientation::Horizontal => fill_stroke_rectangle_hv_aligned(
            canvas,
            length_component,
            thickness_component,
            length,
            thickness,
            corner_radius,
            length_alignment,
            thickness_alignment,
            paint,
        ),
        Orientation::Vertical => fill_stroke_rectangle_hv_aligned(
            canvas,
            thickness_component,
            length_component,
            thickness,
            length,
            corner_radius,
            thickness_alignment,
            length_alignment,
            paint,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas, Segment};
    use crate::color::PaintStroke;
    use crate::types::Rgb;
    use glam::DVec2;

    fn paint() -> Paint {
        Paint {
            fill: Some(Rgb::BLACK),
            stroke: Some(PaintStroke {
                color: Rgb::WHITE,
                thickness: 2.0,
            }),
        }
    }

    #[test]
    fn fill_is_painted_before_stroke() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        draw_circle(&mut canvas, DVec2::new(5.0, 5.0), 3.0, &paint());
        assert!(matches!(canvas.commands[0], DrawCommand::FillPath { .. }));
        assert!(matches!(canvas.commands[1], DrawCommand::StrokePath { .. }));
    }

    #[test]
    fn arc_band_uses_both_radii() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        fill_stroke_arc(
            &mut canvas,
            DVec2::ZERO,
            100.0,
            0.0,
            90.0,
            20.0,
            LengthAlignment::Outer,
            &Paint {
                fill: Some(Rgb::WHITE),
                stroke: None,
            },
        );
        let DrawCommand::FillPath { path, .. } = &canvas.commands[0] else {
            panic!("expected a fill");
        };
        let radii: Vec<f64> = path
            .segments
            .iter()
            .filter_map(|s| match s {
                Segment::Arc { radius, .. } => Some(*radius),
                _ => None,
            })
            .collect();
        assert_eq!(radii, vec![80.0, 100.0]);
    }

    #[test]
    fn wide_line_outline_is_wider_than_fill() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        draw_wide_line(&mut canvas, DVec2::ZERO, DVec2::new(0.0, 10.0), 4.0, &paint());
        let widths: Vec<f64> = canvas.strokes().map(|s| s.width).collect();
        assert_eq!(widths, vec![6.0, 4.0]);
    }

    #[test]
    fn empty_rectangle_draws_nothing() {
        let mut canvas = RecordingCanvas::new(10.0, 10.0);
        fill_stroke_rectangle_box_aligned(&mut canvas, 0.0, 0.0, 0.0, 5.0, 0.0, BoxAlignment::TopLeft, &paint());
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn vertical_rectangle_swaps_axes() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        fill_stroke_rectangle_orientation(
            &mut canvas,
            10.0,
            50.0,
            30.0,
            4.0,
            0.0,
            Orientation::Vertical,
            LengthAlignment::Outer,
            LengthAlignment::Center,
            &Paint {
                fill: Some(Rgb::WHITE),
                stroke: None,
            },
        );
        let DrawCommand::FillPath { path, .. } = &canvas.commands[0] else {
            panic!("expected a fill");
        };
        assert_eq!(path.segments, vec![Segment::RoundRect {
            rect: Rect::new(48.0, 10.0, 4.0, 30.0),
            radius: 0.0
        }]);
    }
}
