//! Circular gauges.
//!
//! A [`CircularGauge`] maps its value onto an arc from `startAngle` to
//! `endAngle` around `(x, y)`. Its children only make sense on that arc, so
//! they implement [`CircularDrawable`] instead of [`Element`] and are drawn
//! with the [`CircularContext`] the gauge builds for them.

use std::f64::consts::{FRAC_PI_2, SQRT_2};

use enum_dispatch::enum_dispatch;
use glam::DVec2;
use serde::{Deserialize, Deserializer, Serialize};

use super::{Element, InsertOption};
use crate::canvas::{Canvas, Path};
use crate::color::{FillStroke, Paint};
use crate::context::FrameContext;
use crate::defaults;
use crate::draw::{draw_circle, draw_wide_line, fill_stroke_arc, paint_path, rounded_arc};
use crate::gauge_value::{BoundGaugeValue, DisplayObserver, GaugeValue};
use crate::geometry::{LengthAlignment, align_length, arc_length_to_angle_radians, lerp, map, unit_vector};
use crate::log::{debug, warn};
use crate::panels::{Field, FieldKind, Inspect, Panel, choices};
use crate::registry;
use crate::ticks::{CircularTicks, TickList};
use crate::types::{Angle, Point};
use crate::value::ValueCatalog;

/// What a circular gauge hands to each child when drawing.
#[derive(Debug, Clone, Copy)]
pub struct CircularContext<'a> {
    pub center: Point,
    pub start: Angle,
    pub end: Angle,
    pub gauge: BoundGaugeValue<'a>,
}

impl CircularContext<'_> {
    /// The current value mapped onto the arc, not wrapped.
    pub fn sweep(&self) -> Angle {
        let g = &self.gauge;
        Angle(map(
            g.value_raw(),
            g.minimum_raw(),
            g.maximum_raw(),
            self.start.degrees(),
            self.end.degrees(),
        ))
    }

    /// The current value mapped onto the arc, wrapped into [0, 360).
    pub fn value_angle(&self) -> Angle {
        self.sweep().wrapped()
    }
}

/// An element drawn around a circular gauge.
#[enum_dispatch]
pub trait CircularDrawable {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &CircularContext);

    /// The owning gauge's display range is now `[start, end]`.
    fn rebind(&mut self, _start: f64, _end: f64) {}

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);
}

#[enum_dispatch(CircularDrawable)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum CircularElement {
    #[serde(rename = "CNeedle")]
    Needle(Needle),
    #[serde(rename = "CPointer")]
    Pointer(Pointer),
    #[serde(rename = "CScale")]
    Scale(CircularScale),
    #[serde(rename = "CSegments")]
    Segments(CircularSegments),
}

impl<'de> Deserialize<'de> for CircularElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        registry::deserialize_tagged(&registry::CIRCULAR_ELEMENTS, deserializer)
    }
}

impl CircularElement {
    pub fn kind(&self) -> CircularKind {
        match self {
            CircularElement::Needle(_) => CircularKind::Needle,
            CircularElement::Pointer(_) => CircularKind::Pointer,
            CircularElement::Scale(_) => CircularKind::Scale,
            CircularElement::Segments(_) => CircularKind::Segments,
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            CircularElement::Needle(e) => {
                e.pointer_color.value_names(names);
                e.pinion_color.value_names(names);
            }
            CircularElement::Pointer(e) => {
                e.pointer_color.value_names(names);
                e.pinion_color.value_names(names);
            }
            CircularElement::Scale(e) => e.tick_list.value_names(names),
            CircularElement::Segments(e) => {
                e.bar_color.value_names(names);
                e.background_color.value_names(names);
            }
        }
    }
}

impl Inspect for CircularElement {
    fn panels(&self) -> Vec<Panel> {
        match self {
            CircularElement::Needle(e) => e.panels(),
            CircularElement::Pointer(e) => e.panels(),
            CircularElement::Scale(e) => e.panels(),
            CircularElement::Segments(e) => e.panels(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CircularKind {
    Needle,
    Pointer,
    Scale,
    Segments,
}

impl CircularKind {
    pub fn type_name(self) -> &'static str {
        match self {
            CircularKind::Needle => "CNeedle",
            CircularKind::Pointer => "CPointer",
            CircularKind::Scale => "CScale",
            CircularKind::Segments => "CSegments",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            CircularKind::Needle => "Needle",
            CircularKind::Pointer => "Pointer",
            CircularKind::Scale => "Scale",
            CircularKind::Segments => "Segments",
        }
    }

    pub fn create(self) -> CircularElement {
        match self {
            CircularKind::Needle => Needle::default().into(),
            CircularKind::Pointer => Pointer::default().into(),
            CircularKind::Scale => CircularScale::default().into(),
            CircularKind::Segments => CircularSegments::default().into(),
        }
    }
}

// ============================================================================
// Gauge
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircularGauge {
    pub x: f64,
    pub y: f64,
    pub start_angle: Angle,
    pub end_angle: Angle,
    pub gauge_value: GaugeValue,
    elements: Vec<CircularElement>,
    pub visible: bool,
}

impl Default for CircularGauge {
    fn default() -> Self {
        CircularGauge {
            x: defaults::ELEMENT_X,
            y: defaults::ELEMENT_Y,
            start_angle: Angle(defaults::GAUGE_START_ANGLE),
            end_angle: Angle(defaults::GAUGE_END_ANGLE),
            gauge_value: GaugeValue::default(),
            elements: Vec::new(),
            visible: true,
        }
    }
}

impl CircularGauge {
    pub fn elements(&self) -> &[CircularElement] {
        &self.elements
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut CircularElement> {
        self.elements.get_mut(index)
    }

    /// Append `element`, spanning it over this gauge's display range.
    pub fn add_element(&mut self, element: CircularElement, values: &ValueCatalog) {
        let index = self.elements.len();
        self.insert_element(index, element, values);
    }

    /// Insert `element` at `index`, clamped to the end of the list.
    pub fn insert_element(&mut self, index: usize, mut element: CircularElement, values: &ValueCatalog) {
        if let Some((start, end)) = self.gauge_value.display_range(values) {
            element.rebind(start, end);
        }
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    pub fn remove_element(&mut self, index: usize) -> Option<CircularElement> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    /// Tell every child the current display range. Returns `false` when the
    /// gauge value is not in `values`.
    pub fn notify(&mut self, values: &ValueCatalog) -> bool {
        let Some((start, end)) = self.gauge_value.display_range(values) else {
            warn!(value = %self.gauge_value.value, "circular gauge bound to an unknown value");
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

    pub fn swap_angles(&mut self) {
        std::mem::swap(&mut self.start_angle, &mut self.end_angle);
    }

    pub fn context<'a>(&'a self, values: &'a ValueCatalog) -> Option<CircularContext<'a>> {
        self.gauge_value.bind(values).map(|gauge| CircularContext {
            center: DVec2::new(self.x, self.y),
            start: self.start_angle,
            end: self.end_angle,
            gauge,
        })
    }

    pub fn insert_options(&self) -> Vec<InsertOption<CircularKind>> {
        [
            CircularKind::Needle,
            CircularKind::Pointer,
            CircularKind::Scale,
            CircularKind::Segments,
        ]
        .into_iter()
        .map(InsertOption::Kind)
        .collect()
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(&self.gauge_value.value);
        for element in &self.elements {
            element.value_names(names);
        }
    }
}

impl Element for CircularGauge {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        if !self.visible {
            return;
        }
        let Some(ctx) = self.context(frame.values) else {
            warn!(value = %self.gauge_value.value, "circular gauge bound to an unknown value");
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

impl Inspect for CircularGauge {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Position")
                .row([Field::integer("X", "x"), Field::integer("Y", "y")])
                .row([Field::number("Start", "startAngle"), Field::number("End", "endAngle")]),
            Panel::titled("Value").row([Field::new("Value", "gaugeValue", FieldKind::GaugeValue)]),
        ]
    }
}

// ============================================================================
// Needle
// ============================================================================

/// A diamond pinion with a triangular pointer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Needle {
    pub pinion_radius: f64,
    pub pointer_radius: f64,
    /// Scales the pointer's base width.
    pub pointer_thickness: f64,
    /// Gap between the pinion and the pointer base.
    pub spacing: f64,
    pub pointer_color: FillStroke,
    pub pinion_color: FillStroke,
    pub visible: bool,
}

impl Default for Needle {
    fn default() -> Self {
        Needle {
            pinion_radius: 15.0,
            pointer_radius: 80.0,
            pointer_thickness: 1.0,
            spacing: 8.0,
            pointer_color: FillStroke::default(),
            pinion_color: FillStroke::default(),
            visible: true,
        }
    }
}

impl CircularDrawable for Needle {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &CircularContext) {
        let angle = ctx.value_angle().radians();
        let c = ctx.center;
        let r = self.pinion_radius;

        let pinion = Path::polygon(&[
            c + DVec2::new(0.0, -r),
            c + DVec2::new(r, 0.0),
            c + DVec2::new(0.0, r),
            c + DVec2::new(-r, 0.0),
        ]);
        paint_path(canvas, &pinion, &self.pinion_color.resolve(frame));

        let base = (self.pinion_radius + self.spacing) / SQRT_2 * self.pointer_thickness;
        let pointer = Path::polygon(&[
            c + unit_vector(angle) * self.pointer_radius,
            c + unit_vector(angle - FRAC_PI_2) * base,
            c + unit_vector(angle + FRAC_PI_2) * base,
        ]);
        paint_path(canvas, &pointer, &self.pointer_color.resolve(frame));
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for Needle {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Appearance")
                .row([Field::number("Length", "pointerRadius"), Field::number("Thickness", "pointerThickness")])
                .row([Field::number("Pinion Radius", "pinionRadius"), Field::number("Spacing", "spacing")]),
            Panel::titled("Colors").row([
                Field::new("Pinion", "pinionColor", FieldKind::FillStroke),
                Field::new("Pointer", "pointerColor", FieldKind::FillStroke),
            ]),
        ]
    }
}

// ============================================================================
// Pointer
// ============================================================================

/// A round pinion with a wide line through it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Pointer {
    pub pointer_front_radius: f64,
    /// Negative values extend the tail behind the pinion.
    pub pointer_back_radius: f64,
    pub pointer_thickness: f64,
    pub pinion_radius: f64,
    pub pointer_color: FillStroke,
    pub pinion_color: FillStroke,
    pub visible: bool,
}

impl Default for Pointer {
    fn default() -> Self {
        Pointer {
            pointer_front_radius: 100.0,
            pointer_back_radius: -25.0,
            pointer_thickness: 20.0,
            pinion_radius: 10.0,
            pointer_color: FillStroke::default(),
            pinion_color: FillStroke::default(),
            visible: true,
        }
    }
}

impl CircularDrawable for Pointer {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &CircularContext) {
        let direction = unit_vector(ctx.value_angle().radians());
        draw_circle(canvas, ctx.center, self.pinion_radius, &self.pinion_color.resolve(frame));
        draw_wide_line(
            canvas,
            ctx.center + direction * self.pointer_front_radius,
            ctx.center + direction * self.pointer_back_radius,
            self.pointer_thickness / 2.0,
            &self.pointer_color.resolve(frame),
        );
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for Pointer {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Appearance")
                .row([
                    Field::number("Front", "pointerFrontRadius"),
                    Field::number("Back", "pointerBackRadius"),
                ])
                .row([Field::number("Pointer Thickness", "pointerThickness")])
                .row([Field::number("Pinion Radius", "pinionRadius")]),
            Panel::titled("Pinion").row([Field::new("Pinion", "pinionColor", FieldKind::FillStroke)]),
            Panel::titled("Pointer").row([Field::new("Pointer", "pointerColor", FieldKind::FillStroke)]),
        ]
    }
}

// ============================================================================
// Scale
// ============================================================================

/// Tick marks around the arc.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircularScale {
    pub radius: f64,
    pub alignment: LengthAlignment,
    pub tick_list: TickList,
    pub visible: bool,
}

impl Default for CircularScale {
    fn default() -> Self {
        CircularScale {
            radius: 110.0,
            alignment: LengthAlignment::Outer,
            tick_list: TickList::default(),
            visible: true,
        }
    }
}

impl CircularDrawable for CircularScale {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &CircularContext) {
        self.tick_list.draw_circular(
            canvas,
            frame,
            &CircularTicks {
                center: ctx.center,
                radius: self.radius,
                alignment: self.alignment,
                start: ctx.start,
                end: ctx.end,
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

impl Inspect for CircularScale {
    fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![Panel::titled("Appearance").row([
            Field::number("Radius", "radius"),
            Field::choice("Alignment", "alignment", choices::LENGTH_ALIGNMENT),
        ])];
        panels.extend(self.tick_list.panels());
        panels
    }
}

// ============================================================================
// Segments
// ============================================================================

/// A bar split into arc segments that light up with the value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CircularSegments {
    pub radius: f64,
    pub alignment: LengthAlignment,
    pub thickness: f64,
    pub segment_count: u32,
    /// Gap between segments, in pixels along the arc.
    pub spacing: f64,
    pub rounded: bool,
    /// Partially covered segments fill up to the value instead of all at once.
    pub interpolated_segments: bool,
    pub bar_color: FillStroke,
    pub background_color: FillStroke,
    pub visible: bool,
}

impl Default for CircularSegments {
    fn default() -> Self {
        CircularSegments {
            radius: 100.0,
            alignment: LengthAlignment::Center,
            thickness: 20.0,
            segment_count: 8,
            spacing: 10.0,
            rounded: false,
            interpolated_segments: true,
            bar_color: FillStroke::default(),
            background_color: FillStroke::none(),
            visible: true,
        }
    }
}

impl CircularSegments {
    fn arc(&self, canvas: &mut dyn Canvas, center: Point, from: f64, to: f64, paint: &Paint) {
        let draw = if self.rounded { rounded_arc } else { fill_stroke_arc };
        draw(canvas, center, self.radius, from, to, self.thickness, self.alignment, paint);
    }
}

impl CircularDrawable for CircularSegments {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext, ctx: &CircularContext) {
        let (start, end) = (ctx.start.degrees(), ctx.end.degrees());
        let span = end - start;
        if self.segment_count == 0 || span == 0.0 {
            return;
        }

        let radii = align_length(self.radius, self.thickness, self.alignment, true);
        let spacing = arc_length_to_angle_radians(self.spacing, radii[0] + radii[1]).to_degrees();
        // Segment bounds as fractions of the sweep, so reversed arcs work too.
        let count = f64::from(self.segment_count);
        let gap = spacing / span.abs() / 2.0;
        let value = ctx.gauge.interpolation();

        let bar = self.bar_color.resolve(frame);
        let background = self.background_color.resolve(frame);
        for i in 0..self.segment_count {
            let from = f64::from(i) / count + gap;
            let to = f64::from(i + 1) / count - gap;
            let (from_angle, to_angle) = (lerp(start, end, from), lerp(start, end, to));

            if value > to {
                self.arc(canvas, ctx.center, from_angle, to_angle, &bar);
            } else if value > from {
                if self.interpolated_segments {
                    self.arc(canvas, ctx.center, from_angle, to_angle, &background);
                    self.arc(canvas, ctx.center, from_angle, lerp(start, end, value), &bar);
                } else {
                    self.arc(canvas, ctx.center, from_angle, to_angle, &bar);
                }
            } else {
                self.arc(canvas, ctx.center, from_angle, to_angle, &background);
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

impl Inspect for CircularSegments {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Positioning")
                .row([Field::number("Radius", "radius")])
                .row([
                    Field::number("Thickness", "thickness"),
                    Field::choice("Alignment", "alignment", choices::LENGTH_ALIGNMENT),
                ]),
            Panel::titled("Appearance")
                .row([Field::integer("Segment Count", "segmentCount")])
                .row([Field::number("Spacing", "spacing")])
                .row([
                    Field::toggle("Rounded", "rounded"),
                    Field::toggle("Interpolated", "interpolatedSegments"),
                ]),
            Panel::titled("Colors").row([
                Field::new("Bar", "barColor", FieldKind::FillStroke),
                Field::new("Background", "backgroundColor", FieldKind::FillStroke),
            ]),
        ]
    }
}
