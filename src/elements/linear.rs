//! Linear gauges.
//!
//! A [`LinearGauge`] lays its value out along a horizontal or vertical axis of
//! `length` pixels. Its children implement [`LinearDrawable`] and are drawn
//! with the [`LinearContext`] the gauge builds for them.

use enum_dispatch::enum_dispatch;
use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Element, InsertOption};
use crate::canvas::Canvas;
use crate::color::{FillStroke, Paint};
use crate::context::FrameContext;
use crate::defaults;
use crate::draw::fill_stroke_rectangle_orientation;
use crate::gauge_value::{BoundGaugeValue, DisplayObserver, GaugeValue};
use crate::geometry::{LengthAlignment, Orientation, align_length};
use crate::log::{debug, warn};
use crate::panels::{Field, FieldKind, Inspect, Panel, choices};
use crate::registry;
use crate::ticks::{LinearTicks, TickList};
use crate::types::Point;
use crate::value::ValueCatalog;

/// What a linear gauge hands to each child when drawing.
#[derive(Debug, Clone, Copy)]
pub struct LinearContext<'a> {
    /// Where the axis starts.
    pub origin: Point,
    pub alignment: LengthAlignment,
    pub length: f64,
    pub orientation: Orientation,
    /// Lay the range out from the far end of the axis.
    pub reverse: bool,
    pub gauge: BoundGaugeValue<'a>,
}

impl LinearContext<'_> {
    /// The origin split into its along-axis and across-axis coordinates.
    pub fn components(&self) -> (f64, f64) {
        match self.orientation {
            Orientation::Horizontal => (self.origin.x, self.origin.y),
            Orientation::Vertical => (self.origin.y, self.origin.x),
        }
    }

    /// The origin moved `offset` pixels across the axis.
    pub fn shifted(&self, offset: f64) -> Point {
        match self.orientation {
            Orientation::Horizontal => self.origin + DVec2::new(0.0, offset),
            Orientation::Vertical => self.origin + DVec2::new(offset, 0.0),
        }
    }
}

/// An element drawn along a linear gauge.
#[enum_dispatch]
pub trait LinearDrawable {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &LinearContext);

    /// The owning gauge's display range is now `[start, end]`.
    fn rebind(&mut self, _start: f64, _end: f64) {}

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);
}

#[enum_dispatch(LinearDrawable)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum LinearElement {
    #[serde(rename = "LScale")]
    Scale(LinearScale),
    #[serde(rename = "LSegments")]
    Segments(LinearSegments),
}

impl<'de> Deserialize<'de> for LinearElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        registry::deserialize_tagged(&registry::LINEAR_ELEMENTS, deserializer)
    }
}

impl LinearElement {
    pub fn kind(&self) -> LinearKind {
        match self {
            LinearElement::Scale(_) => LinearKind::Scale,
            LinearElement::Segments(_) => LinearKind::Segments,
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            LinearElement::Scale(e) => e.tick_list.value_names(names),
            LinearElement::Segments(e) => {
                e.bar_color.value_names(names);
                e.background_color.value_names(names);
            }
        }
    }
}

impl Inspect for LinearElement {
    fn panels(&self) -> Vec<Panel> {
        match self {
            LinearElement::Scale(e) => e.panels(),
            LinearElement::Segments(e) => e.panels(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LinearKind {
    Scale,
    Segments,
}

impl LinearKind {
    pub fn type_name(self) -> &'static str {
        match self {
            LinearKind::Scale => "LScale",
            LinearKind::Segments => "LSegments",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            LinearKind::Scale => "Scale",
            LinearKind::Segments => "Segments",
        }
    }

    pub fn create(self) -> LinearElement {
        match self {
            LinearKind::Scale => LinearScale::default().into(),
            LinearKind::Segments => LinearSegments::default().into(),
        }
    }
}

// ============================================================================
// Gauge
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearGauge {
    pub x: f64,
    pub y: f64,
    /// How the axis sits on `(x, y)`.
    pub alignment: LengthAlignment,
    pub length: f64,
    pub orientation: Orientation,
    pub reverse_direction: bool,
    pub gauge_value: GaugeValue,
    elements: Vec<LinearElement>,
    pub visible: bool,
}

impl Default for LinearGauge {
    fn default() -> Self {
        LinearGauge {
            x: defaults::ELEMENT_X,
            y: defaults::ELEMENT_Y,
            alignment: LengthAlignment::Center,
            length: defaults::LINEAR_GAUGE_LENGTH,
            orientation: Orientation::Horizontal,
            reverse_direction: false,
            gauge_value: GaugeValue::default(),
            elements: Vec::new(),
            visible: true,
        }
    }
}

impl LinearGauge {
    pub fn elements(&self) -> &[LinearElement] {
        &self.elements
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut LinearElement> {
        self.elements.get_mut(index)
    }

    pub fn add_element(&mut self, element: LinearElement, values: &ValueCatalog) {
        let index = self.elements.len();
        self.insert_element(index, element, values);
    }

    /// Insert `element` at `index`, clamped to the end of the list.
    pub fn insert_element(&mut self, index: usize, mut element: LinearElement, values: &ValueCatalog) {
        if let Some((start, end)) = self.gauge_value.display_range(values) {
            element.rebind(start, end);
        }
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    pub fn remove_element(&mut self, index: usize) -> Option<LinearElement> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    /// Tell every child the current display range. Returns `false` when the
    /// gauge value is not in `values`.
    pub fn notify(&mut self, values: &ValueCatalog) -> bool {
        let Some((start, end)) = self.gauge_value.display_range(values) else {
            warn!(value = %self.gauge_value.value, "linear gauge bound to an unknown value");
            return false;
        };
        debug!(value = %self.gauge_value.value, start, end, children = self.elements.len(), "notify");
        for element in &mut self.elements {
            element.rebind(start, end);
        }
        true
    }

    pub fn set_gauge_value(&mut self, gauge_value: GaugeValue, values: &ValueCatalog) {
        self.gauge_value = gauge_value;
        self.notify(values);
    }

    /// A deep copy displaying `gauge_value` instead.
    pub fn clone_with_value(&self, gauge_value: GaugeValue, values: &ValueCatalog) -> Self {
        let mut cloned = self.clone();
        cloned.set_gauge_value(gauge_value, values);
        cloned
    }

    /// Start of the axis once `alignment` is applied.
    pub fn origin(&self) -> Point {
        match self.orientation {
            Orientation::Horizontal => {
                DVec2::new(align_length(self.x, self.length, self.alignment, false)[0], self.y)
            }
            Orientation::Vertical => DVec2::new(self.x, align_length(self.y, self.length, self.alignment, false)[0]),
        }
    }

    pub fn context<'a>(&'a self, values: &'a ValueCatalog) -> Option<LinearContext<'a>> {
        self.gauge_value.bind(values).map(|gauge| LinearContext {
            origin: self.origin(),
            alignment: self.alignment,
            length: self.length,
            orientation: self.orientation,
            reverse: self.reverse_direction,
            gauge,
        })
    }

    pub fn insert_options(&self) -> Vec<InsertOption<LinearKind>> {
        vec![InsertOption::Kind(LinearKind::Scale), InsertOption::Kind(LinearKind::Segments)]
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(&self.gauge_value.value);
        for element in &self.elements {
            element.value_names(names);
        }
    }
}

impl Element for LinearGauge {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        if !self.visible {
            return;
        }
        let Some(ctx) = self.context(frame.values) else {
            warn!(value = %self.gauge_value.value, "linear gauge bound to an unknown value");
            return;
        };
        for element in self.elements.iter().filter(|e| e.is_visible()) {
            element.draw(canvas, frame, &ctx);
        }
    }

    fn attach(&mut self, values: &ValueCatalog) {
        self.notify(values);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for LinearGauge {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Position")
                .row([Field::integer("X", "x"), Field::integer("Y", "y")])
                .row([
                    Field::number("Length", "length"),
                    Field::choice("Alignment", "alignment", choices::LENGTH_ALIGNMENT),
                ])
                .row([
                    Field::choice("Orientation", "orientation", choices::ORIENTATION),
                    Field::toggle("Reverse", "reverseDirection"),
                ]),
            Panel::titled("Value").row([Field::new("Value", "gaugeValue", FieldKind::GaugeValue)]),
        ]
    }
}

// ============================================================================
// Scale
// ============================================================================

/// Tick marks along the axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearScale {
    /// Offset across the axis.
    pub position: f64,
    pub alignment: LengthAlignment,
    pub tick_list: TickList,
    pub visible: bool,
}

impl Default for LinearScale {
    fn default() -> Self {
        LinearScale {
            position: 0.0,
            alignment: LengthAlignment::Center,
            tick_list: TickList::default(),
            visible: true,
        }
    }
}

impl LinearDrawable for LinearScale {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &LinearContext) {
        self.tick_list.draw_linear(
            canvas,
            frame,
            &LinearTicks {
                origin: ctx.shifted(self.position),
                length: ctx.length,
                orientation: ctx.orientation,
                alignment: self.alignment,
                reverse: ctx.reverse,
                start_value: ctx.gauge.minimum(),
                end_value: ctx.gauge.maximum(),
                current: ctx.gauge.value(),
            },
        );
    }

    fn rebind(&mut self, start: f64, end: f64) {
        self.tick_list.change_display(start, end);
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for LinearScale {
    fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![Panel::titled("Appearance").row([
            Field::number("Position", "position"),
            Field::choice("Alignment", "alignment", choices::LENGTH_ALIGNMENT),
        ])];
        panels.extend(self.tick_list.panels());
        panels
    }
}

// ============================================================================
// Segments
// ============================================================================

/// A bar split into rectangles that light up with the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LinearSegments {
    /// Offset across the axis.
    pub position: f64,
    pub thickness: f64,
    pub alignment: LengthAlignment,
    pub segment_count: u32,
    pub segment_spacing: f64,
    /// Margin left free at both ends of the axis.
    pub border_spacing: f64,
    pub corner_radius: f64,
    pub interpolated_segments: bool,
    pub bar_color: FillStroke,
    pub background_color: FillStroke,
    pub visible: bool,
}

impl Default for LinearSegments {
    fn default() -> Self {
        LinearSegments {
            position: 0.0,
            thickness: 10.0,
            alignment: LengthAlignment::Center,
            segment_count: 10,
            segment_spacing: 3.0,
            border_spacing: 0.0,
            corner_radius: 2.0,
            interpolated_segments: true,
            bar_color: FillStroke::default(),
            background_color: FillStroke::none(),
            visible: true,
        }
    }
}

impl LinearSegments {
    /// Paint a segment piece `length` long starting `offset` pixels into the bar.
    fn piece(&self, canvas: &mut dyn Canvas, ctx: &LinearContext, offset: f64, length: f64, paint: &Paint) {
        let (along, across) = ctx.components();
        let across = across + self.position;
        let start = along + self.border_spacing;
        let (anchor, alignment) = if ctx.reverse {
            (start + ctx.length - 2.0 * self.border_spacing - offset, LengthAlignment::Inner)
        } else {
            (start + offset, LengthAlignment::Outer)
        };
        fill_stroke_rectangle_orientation(
            canvas,
            anchor,
            across,
            length,
            self.thickness,
            self.corner_radius,
            ctx.orientation,
            alignment,
            self.alignment,
            paint,
        );
    }
}

impl LinearDrawable for LinearSegments {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &LinearContext) {
        if self.segment_count == 0 {
            return;
        }
        let count = f64::from(self.segment_count);
        let length = ctx.length - 2.0 * self.border_spacing;
        let segment = (length - (count - 1.0) * self.segment_spacing) / count;
        if segment <= 0.0 {
            warn!(segment, "linear segments do not fit their gauge");
            return;
        }
        let value_length = ctx.gauge.interpolation() * length;

        let bar = self.bar_color.resolve(frame);
        let background = self.background_color.resolve(frame);
        for i in 0..self.segment_count {
            let offset = f64::from(i) * (segment + self.segment_spacing);
            let fill = (value_length - offset) / segment;

            if fill >= 1.0 {
                self.piece(canvas, ctx, offset, segment, &bar);
            } else if fill > 0.0 {
                if self.interpolated_segments {
                    self.piece(canvas, ctx, offset, segment, &background);
                    self.piece(canvas, ctx, offset, segment * fill, &bar);
                } else {
                    self.piece(canvas, ctx, offset, segment, &bar);
                }
            } else {
                self.piece(canvas, ctx, offset, segment, &background);
            }
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for LinearSegments {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Positioning")
                .row([Field::number("Relative Position", "position")])
                .row([
                    Field::number("Thickness", "thickness"),
                    Field::choice("Alignment", "alignment", choices::LENGTH_ALIGNMENT),
                ]),
            Panel::titled("Appearance")
                .row([Field::integer("Segment Count", "segmentCount")])
                .row([
                    Field::number("Spacing", "segmentSpacing"),
                    Field::number("Margin", "borderSpacing"),
                ])
                .row([
                    Field::number("Corner Radius", "cornerRadius"),
                    Field::toggle("Interpolated", "interpolatedSegments"),
                ]),
            Panel::titled("Colors").row([
                Field::new("Bar", "barColor", FieldKind::FillStroke),
                Field::new("Background", "backgroundColor", FieldKind::FillStroke),
            ]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas, Segment};
    use crate::types::{Rect, Rgb};

    fn catalog_with_rpm(rpm: f64) -> ValueCatalog {
        let mut values = ValueCatalog::builtin();
        if let Some(v) = values.get_mut("RPM") {
            v.set_value_raw(rpm, 0.0);
        }
        values
    }

    fn filled_rects(canvas: &RecordingCanvas) -> Vec<Rect> {
        canvas
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::FillPath { path, .. } => match path.segments.first() {
                    Some(Segment::RoundRect { rect, .. }) => Some(*rect),
                    _ => None,
                },
                _ => None,
            })
            .collect()
    }

    // ==================== Gauge tests ====================

    #[test]
    fn origin_applies_alignment() {
        let mut gauge = LinearGauge::default();
        assert_eq!(gauge.origin(), DVec2::new(80.0, 120.0));
        gauge.orientation = Orientation::Vertical;
        gauge.alignment = LengthAlignment::Inner;
        assert_eq!(gauge.origin(), DVec2::new(120.0, 120.0));
    }

    #[test]
    fn clone_with_value_leaves_original_alone() {
        let values = ValueCatalog::builtin();
        let mut gauge = LinearGauge::default();
        gauge.add_element(LinearKind::Scale.create(), &values);
        let cloned = gauge.clone_with_value(GaugeValue::new("Speed"), &values);
        assert_eq!(cloned.gauge_value.value, "Speed");
        assert_eq!(gauge.gauge_value.value, "RPM");
        assert_eq!(cloned.elements().len(), 1);
    }

    // ==================== Segments tests ====================

    #[test]
    fn segments_light_up_to_the_value() {
        let values = catalog_with_rpm(4000.0);
        let mut gauge = LinearGauge::default();
        gauge.add_element(LinearKind::Segments.create(), &values);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        gauge.draw(&mut canvas, &FrameContext::new(&values, 0.0));

        let rects = filled_rects(&canvas);
        assert_eq!(rects.len(), 5);
        assert_eq!(rects[0], Rect::new(80.0, 115.0, 5.3, 10.0));
        assert!(canvas.fills().all(|c| c == Rgb::BLACK));
    }

    #[test]
    fn reversed_segments_start_at_the_far_end() {
        let values = catalog_with_rpm(4000.0);
        let mut gauge = LinearGauge {
            reverse_direction: true,
            ..LinearGauge::default()
        };
        gauge.add_element(LinearKind::Segments.create(), &values);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        gauge.draw(&mut canvas, &FrameContext::new(&values, 0.0));

        let rects = filled_rects(&canvas);
        assert!((rects[0].right() - 160.0).abs() < 1e-9);
        assert!(rects.iter().all(|r| r.x >= 120.0 - 1e-9));
    }

    #[test]
    fn vertical_segments_grow_downward() {
        let values = catalog_with_rpm(8000.0);
        let mut gauge = LinearGauge {
            orientation: Orientation::Vertical,
            ..LinearGauge::default()
        };
        gauge.add_element(LinearKind::Segments.create(), &values);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        gauge.draw(&mut canvas, &FrameContext::new(&values, 0.0));

        let rects = filled_rects(&canvas);
        assert_eq!(rects.len(), 10);
        assert_eq!(rects[0], Rect::new(115.0, 80.0, 10.0, 5.3));
        assert!((rects[9].bottom() - 160.0).abs() < 1e-9);
    }

    // ==================== Scale tests ====================

    #[test]
    fn scale_spans_the_axis() {
        let values = ValueCatalog::builtin();
        let mut gauge = LinearGauge::default();
        gauge.add_element(
            LinearScale {
                position: 20.0,
                ..LinearScale::default()
            }
            .into(),
            &values,
        );
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        gauge.draw(&mut canvas, &FrameContext::new(&values, 0.0));

        let starts: Vec<Point> = canvas
            .commands
            .iter()
            .filter_map(|c| match c {
                DrawCommand::StrokePath { path, .. } => match path.segments.first() {
                    Some(Segment::MoveTo(p)) => Some(*p),
                    _ => None,
                },
                _ => None,
            })
            .collect();
        let xs = starts.iter().map(|p| p.x);
        assert!((xs.clone().fold(f64::INFINITY, f64::min) - 80.0).abs() < 1e-9);
        assert!((xs.fold(f64::NEG_INFINITY, f64::max) - 160.0).abs() < 1e-9);
        assert!(starts.iter().all(|p| p.y == 135.0));
    }

    // ==================== Serialization tests ====================

    #[test]
    fn unknown_linear_type_is_rejected() {
        let err = serde_json::from_str::<LinearElement>(r#"{"type":"LNeedle"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown LinearElement type `LNeedle`"), "{err}");
    }
}
