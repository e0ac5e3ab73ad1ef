//! Tick marks.
//!
//! A [`TickList`] is a [`RootTick`] that splits the gauge range into equal
//! divisions or fixed intervals, plus up to four [`SubTick`] levels that each
//! split the gaps of the level above. Positions are normalized to `[0, 1]`
//! over the display range and only then mapped onto an arc or an axis.
//!
//! Levels without their own length, thickness, style or color inherit from
//! the nearest coarser level that has one.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use crate::canvas::{Canvas, Path, TextAlign, TextBaseline, TextStyle};
use crate::color::{Color, ColorSource, FillStroke, FillStrokeTimeline, Paint};
use crate::context::FrameContext;
use crate::defaults;
use crate::draw::{draw_circle, draw_wide_line, paint_path};
use crate::gauge_value::DisplayObserver;
use crate::geometry::{
    LengthAlignment, Line, Orientation, align_length, ceil_divisible, coded_enum, floor_divisible, in_range,
    lerp, map, unit_vector,
};
use crate::log::warn;
use crate::panels::{Field, FieldKind, Inspect, Panel, choices};
use crate::types::{Angle, Point, Rgb, positive_setting};

coded_enum! {
    pub enum TickStyle {
        Line = 0,
        Triangle = 1,
        Circle = 2,
    }
}

impl Default for TickStyle {
    fn default() -> Self {
        TickStyle::Line
    }
}

/// Value labels drawn next to the ticks of one level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickValueStyle {
    pub font_size: f64,
    pub font_family: String,
    pub color: Color,
    /// Gap between the tick's far end and the label center.
    pub distance: f64,
    pub decimal_places: usize,
}

impl Default for TickValueStyle {
    fn default() -> Self {
        TickValueStyle {
            font_size: defaults::TICK_LABEL_FONT_SIZE,
            font_family: defaults::TICK_LABEL_FONT_FAMILY.to_string(),
            color: Rgb::WHITE.into(),
            distance: defaults::TICK_LABEL_DISTANCE,
            decimal_places: 0,
        }
    }
}

impl Inspect for TickValueStyle {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Labels")
                .row([Field::number("Size", "fontSize"), Field::new("Font", "fontFamily", FieldKind::Text)])
                .row([Field::number("Distance", "distance"), Field::integer("Decimals", "decimalPlaces")])
                .row([Field::new("Color", "color", FieldKind::Color)]),
        ]
    }
}

// ============================================================================
// Root and sub ticks
// ============================================================================

/// The coarsest tick level. Exactly one of `divisions` and `interval` is
/// normally set.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RootTick {
    pub divisions: Option<i64>,
    /// Spacing in display units.
    pub interval: Option<f64>,
    pub length: f64,
    pub thickness: f64,
    pub style: TickStyle,
    pub color: FillStrokeTimeline,
    pub tick_value_style: Option<TickValueStyle>,
}

impl Default for RootTick {
    fn default() -> Self {
        RootTick {
            divisions: Some(defaults::TICK_DIVISIONS),
            interval: None,
            length: defaults::TICK_LENGTH,
            thickness: defaults::TICK_THICKNESS,
            style: TickStyle::Line,
            color: FillStrokeTimeline::default(),
            tick_value_style: None,
        }
    }
}

impl RootTick {
    /// Use `divisions` equal parts; clears the interval.
    pub fn set_divisions(&mut self, divisions: i64) {
        self.divisions = Some(divisions);
        self.interval = None;
    }

    /// Use a fixed spacing; clears the divisions.
    pub fn set_interval(&mut self, interval: f64) {
        self.interval = Some(interval);
        self.divisions = None;
    }

    /// Normalized gap between neighboring ticks over `[lower, upper]`.
    pub fn interval(&self, lower: f64, upper: f64) -> f64 {
        if let Some(divisions) = self.divisions {
            if divisions <= 0 {
                return 0.0;
            }
            return 1.0 / divisions as f64;
        }
        if let Some(interval) = self.interval {
            let range = upper - lower;
            if range == 0.0 {
                return 0.0;
            }
            return interval / range;
        }
        warn!("root tick has neither divisions nor an interval");
        0.0
    }

    /// Normalized tick positions over `[lower, upper]`, phased so a tick lands
    /// on `offset`. May fall slightly outside `[0, 1]`.
    pub fn positions(&self, lower: f64, upper: f64, offset: f64) -> Vec<f64> {
        if let Some(divisions) = self.divisions {
            if divisions <= 0 {
                return Vec::new();
            }
            let divisions = clamp_count(divisions);
            let interval = 1.0 / divisions as f64;
            let offset_position = map(offset, lower, upper, 0.0, 1.0);
            let remainder = offset_position.rem_euclid(interval);
            if remainder < defaults::TICK_EPSILON || interval - remainder < defaults::TICK_EPSILON {
                return (0..=divisions).map(|i| i as f64 * interval).collect();
            }
            // Start one step before zero so both ends of the range stay covered.
            let shift = remainder - interval;
            return (0..=divisions + 1).map(|i| i as f64 * interval + shift).collect();
        }

        let Some(interval) = self.interval else {
            warn!("root tick has neither divisions nor an interval");
            return Vec::new();
        };
        let Some(interval) = positive_setting("interval", interval) else {
            return Vec::new();
        };
        if lower == upper {
            return Vec::new();
        }
        let (low, high) = (lower.min(upper), lower.max(upper));
        let last = ceil_divisible(high, interval, offset);
        let mut current = floor_divisible(low, interval, offset);
        let mut positions = Vec::new();
        while current <= last {
            if positions.len() > defaults::MAX_TICKS_PER_LEVEL {
                warn!(interval, "tick interval too fine, truncating");
                break;
            }
            positions.push(map(current, lower, upper, 0.0, 1.0));
            current += interval;
        }
        positions
    }
}

impl Inspect for RootTick {
    fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![
            Panel::titled("Style")
                .row([Field::integer("Divisions", "divisions"), Field::number("Interval", "interval")])
                .row([Field::number("Length", "length"), Field::number("Thickness", "thickness")])
                .row([
                    Field::choice("Shape", "style", choices::TICK_STYLE),
                    Field::new("Labels", "tickValueStyle", FieldKind::TickLabels),
                ]),
        ];
        panels.extend(self.color.panels());
        panels
    }
}

/// A finer level splitting each gap of its parent into `divisions + 1` parts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SubTick {
    pub divisions: i64,
    pub length: Option<f64>,
    pub thickness: Option<f64>,
    pub style: Option<TickStyle>,
    pub color: Option<FillStrokeTimeline>,
    pub tick_value_style: Option<TickValueStyle>,
}

impl Default for SubTick {
    fn default() -> Self {
        SubTick::new(1)
    }
}

impl SubTick {
    pub fn new(divisions: i64) -> Self {
        SubTick {
            divisions,
            length: None,
            thickness: None,
            style: None,
            color: None,
            tick_value_style: None,
        }
    }

    pub fn interval(&self, lower: f64, upper: f64) -> f64 {
        (upper - lower) / (self.divisions as f64 + 1.0)
    }

    /// Positions from `lower` toward `upper`; the first one is `lower` itself.
    pub fn positions(&self, lower: f64, upper: f64) -> Vec<f64> {
        if self.divisions <= 0 {
            return Vec::new();
        }
        let divisions = clamp_count(self.divisions);
        let interval = self.interval(lower, upper);
        (0..=divisions).map(|i| lower + i as f64 * interval).collect()
    }
}

impl Inspect for SubTick {
    fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![
            Panel::titled("Style")
                .row([Field::integer("Divisions", "divisions")])
                .row([Field::number("Length", "length"), Field::number("Thickness", "thickness")])
                .row([
                    Field::choice("Shape", "style", choices::TICK_STYLE),
                    Field::new("Labels", "tickValueStyle", FieldKind::TickLabels),
                ]),
        ];
        match &self.color {
            Some(color) => panels.extend(color.panels()),
            None => panels.push(Panel::titled("Color").row([Field::new(
                "Color",
                "color",
                FieldKind::FillStrokeTimeline,
            )])),
        }
        panels
    }
}

fn clamp_count(count: i64) -> i64 {
    let max = defaults::MAX_TICKS_PER_LEVEL as i64;
    if count > max {
        warn!(count, "too many tick divisions, clamping");
        return max;
    }
    count
}

// ============================================================================
// Tick list
// ============================================================================

/// Where circular ticks go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CircularTicks {
    pub center: Point,
    pub radius: f64,
    pub alignment: LengthAlignment,
    pub start: Angle,
    pub end: Angle,
    /// Display value at the start and end of the arc.
    pub start_value: f64,
    pub end_value: f64,
    /// The gauge's current display value, for highlighting.
    pub current: f64,
}

/// Where linear ticks go.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearTicks {
    /// Axis start; ticks are placed across the axis at this point's other coordinate.
    pub origin: Point,
    pub length: f64,
    pub orientation: Orientation,
    pub alignment: LengthAlignment,
    pub reverse: bool,
    pub start_value: f64,
    pub end_value: f64,
    pub current: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TickList {
    pub root_tick: RootTick,
    sub_ticks: Vec<SubTick>,
    /// Display value a root tick is phased onto.
    pub offset: f64,
    /// Extra length per unit of highlight.
    pub length_factor: f64,
    pub thickness_factor: f64,
    pub text_size_factor: f64,
    /// Blended into tick colors by the highlight factor.
    pub fill_stroke_modifier: FillStroke,
    /// Blended into label colors by the highlight factor.
    pub value_color_modifier: Option<Color>,
    pub left_highlight_base: f64,
    pub left_highlight_factor: f64,
    pub left_highlight_distance: f64,
    pub right_highlight_base: f64,
    pub right_highlight_factor: f64,
    pub right_highlight_distance: f64,
}

impl Default for TickList {
    fn default() -> Self {
        TickList {
            root_tick: RootTick::default(),
            sub_ticks: Vec::new(),
            offset: 0.0,
            length_factor: 0.0,
            thickness_factor: 0.0,
            text_size_factor: 0.0,
            fill_stroke_modifier: FillStroke::none(),
            value_color_modifier: None,
            left_highlight_base: 1.0,
            left_highlight_factor: 1.0,
            left_highlight_distance: 0.0,
            right_highlight_base: 0.0,
            right_highlight_factor: 0.0,
            right_highlight_distance: 0.0,
        }
    }
}

impl TickList {
    pub fn sub_ticks(&self) -> &[SubTick] {
        &self.sub_ticks
    }

    pub fn sub_tick_mut(&mut self, index: usize) -> Option<&mut SubTick> {
        self.sub_ticks.get_mut(index)
    }

    /// Append a level. Returns `false` once the list is full. A level with its
    /// own color must be re-spanned by the owner afterwards.
    pub fn add_sub_tick(&mut self, tick: SubTick) -> bool {
        if self.sub_ticks.len() >= defaults::MAX_SUB_TICK_LEVELS {
            return false;
        }
        self.sub_ticks.push(tick);
        true
    }

    pub fn remove_sub_tick(&mut self, index: usize) -> Option<SubTick> {
        (index < self.sub_ticks.len()).then(|| self.sub_ticks.remove(index))
    }

    /// Sub-tick levels above `level`, nearest first.
    fn ancestors(&self, level: usize) -> impl Iterator<Item = &SubTick> {
        self.sub_ticks[..level.min(self.sub_ticks.len())].iter().rev()
    }

    pub fn level_length(&self, level: usize) -> f64 {
        self.ancestors(level).find_map(|t| t.length).unwrap_or(self.root_tick.length)
    }

    pub fn level_thickness(&self, level: usize) -> f64 {
        self.ancestors(level).find_map(|t| t.thickness).unwrap_or(self.root_tick.thickness)
    }

    pub fn level_style(&self, level: usize) -> TickStyle {
        self.ancestors(level).find_map(|t| t.style).unwrap_or(self.root_tick.style)
    }

    pub fn level_color(&self, level: usize) -> &FillStrokeTimeline {
        self.ancestors(level)
            .find_map(|t| t.color.as_ref())
            .unwrap_or(&self.root_tick.color)
    }

    /// Label style of exactly this level; labels are not inherited.
    pub fn level_value_style(&self, level: usize) -> Option<&TickValueStyle> {
        match level {
            0 => self.root_tick.tick_value_style.as_ref(),
            n => self.sub_ticks.get(n - 1).and_then(|t| t.tick_value_style.as_ref()),
        }
    }

    /// Emphasis for a tick at `value` while the gauge shows `current`.
    ///
    /// Ticks within the left (below) or right (above) distance fade linearly
    /// from that side's factor back to its base.
    pub fn highlight_factor(&self, value: f64, current: f64) -> f64 {
        let delta = value - current;
        let side = |base: f64, factor: f64, distance: f64| {
            if distance <= 0.0 || delta.abs() >= distance {
                base
            } else {
                lerp(base, factor, 1.0 - delta.abs() / distance)
            }
        };
        if delta < 0.0 {
            side(self.left_highlight_base, self.left_highlight_factor, self.left_highlight_distance)
        } else if delta > 0.0 {
            side(self.right_highlight_base, self.right_highlight_factor, self.right_highlight_distance)
        } else {
            self.left_highlight_factor.max(self.right_highlight_factor)
        }
    }

    /// Normalized positions per level (index 0 is the root) over the display
    /// range `[start_value, end_value]`.
    /// Levels past the [`MAX_TICKS`](defaults::MAX_TICKS) budget are left empty.
    pub fn tick_positions(&self, start_value: f64, end_value: f64) -> Vec<Vec<f64>> {
        let mut levels = vec![Vec::new(); self.sub_ticks.len() + 1];
        let interval = self.root_tick.interval(start_value, end_value);
        let roots = self.root_tick.positions(start_value, end_value, self.offset);
        let depth = self.affordable_levels(roots.len());
        for position in roots {
            if in_range(position, 0.0, 1.0) {
                levels[0].push(position);
            }
            self.sub_positions(&mut levels, position, position + interval, 0, depth);
        }
        levels
    }

    /// How many sub-tick levels fit in the tick budget under `roots` root
    /// positions. Finer levels go first.
    fn affordable_levels(&self, roots: usize) -> usize {
        let mut per_level = roots;
        let mut total = roots;
        for (level, tick) in self.sub_ticks.iter().enumerate() {
            let per_parent = clamp_count(tick.divisions).max(0) as usize + 1;
            per_level = per_level.saturating_mul(per_parent);
            total = total.saturating_add(per_level);
            if total > defaults::MAX_TICKS {
                warn!(level, total, "too many ticks, dropping finer levels");
                return level;
            }
        }
        self.sub_ticks.len()
    }

    fn sub_positions(&self, levels: &mut [Vec<f64>], lower: f64, upper: f64, index: usize, depth: usize) {
        if index >= depth {
            return;
        }
        let Some(tick) = self.sub_ticks.get(index) else {
            return;
        };
        let interval = tick.interval(lower, upper);
        for (i, position) in tick.positions(lower, upper).into_iter().enumerate() {
            // The first position sits on the parent tick, which already draws it.
            if i > 0 && in_range(position, 0.0, 1.0) {
                levels[index + 1].push(position);
            }
            self.sub_positions(levels, position, position + interval, index + 1, depth);
        }
    }

    /// Resolve a level's paint at `value` and apply the highlight modifier.
    fn tick_paint(&self, level: usize, value: f64, highlight: f64, frame: &FrameContext) -> Paint {
        let mut paint = self.level_color(level).fill_stroke_at(value, frame);
        if let Some(fill) = &self.fill_stroke_modifier.fill {
            paint.blend_fill(fill.color(frame), highlight);
        }
        if let Some(stroke) = &self.fill_stroke_modifier.stroke {
            paint.blend_stroke(stroke.color.color(frame), stroke.thickness, highlight);
        }
        paint
    }

    fn scaled_size(&self, level: usize, highlight: f64) -> (f64, f64) {
        let mut length = self.level_length(level);
        let mut thickness = self.level_thickness(level);
        if highlight >= 0.0 {
            length *= 1.0 + self.length_factor * highlight;
            thickness *= 1.0 + self.thickness_factor * highlight;
        }
        (length, thickness)
    }

    fn draw_tick(&self, canvas: &mut dyn Canvas, level: usize, line: Line, thickness: f64, paint: &Paint) {
        match self.level_style(level) {
            TickStyle::Line => draw_wide_line(canvas, line.p1, line.p2, thickness, paint),
            TickStyle::Triangle => {
                let half = (line.p2 - line.p1).normalize_or_zero().perp() * (thickness / 2.0);
                paint_path(canvas, &Path::polygon(&[line.p1 + half, line.p2, line.p1 - half]), paint);
            }
            TickStyle::Circle => draw_circle(canvas, line.midpoint(), line.length() / 2.0, paint),
        }
    }

    fn draw_label(
        &self,
        canvas: &mut dyn Canvas,
        level: usize,
        line: Line,
        value: f64,
        highlight: f64,
        frame: &FrameContext,
    ) {
        let Some(style) = self.level_value_style(level) else {
            return;
        };
        let direction: DVec2 = (line.p2 - line.p1).normalize_or_zero();
        let at = line.p2 + direction * style.distance;
        let mut color = style.color.color(frame);
        if let Some(modifier) = &self.value_color_modifier {
            color = color.blend(modifier.color(frame), highlight);
        }
        let size = style.font_size * (1.0 + self.text_size_factor * highlight.max(0.0));
        let text = format!("{:.*}", style.decimal_places, value);
        canvas.fill_text(
            &text,
            at,
            &TextStyle {
                font: format!("{}px {}", size, style.font_family),
                color,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            },
        );
    }

    /// Draw every level around an arc, finest level first.
    pub fn draw_circular(&self, canvas: &mut dyn Canvas, frame: &FrameContext, dial: &CircularTicks) {
        let levels = self.tick_positions(dial.start_value, dial.end_value);
        let (start, end) = (dial.start.radians(), dial.end.radians());
        for (level, positions) in levels.iter().enumerate().rev() {
            for &position in positions {
                let angle = lerp(start, end, position);
                let value = lerp(dial.start_value, dial.end_value, position);
                let highlight = self.highlight_factor(value, dial.current);
                let (length, thickness) = self.scaled_size(level, highlight);

                let radii = align_length(dial.radius, length, dial.alignment, false);
                let direction = unit_vector(angle);
                let line = Line::new(dial.center + direction * radii[0], dial.center + direction * radii[1]);

                let paint = self.tick_paint(level, value, highlight, frame);
                self.draw_tick(canvas, level, line, thickness, &paint);
                self.draw_label(canvas, level, line, value, highlight, frame);
            }
        }
    }

    /// Draw every level along an axis, finest level first.
    pub fn draw_linear(&self, canvas: &mut dyn Canvas, frame: &FrameContext, axis: &LinearTicks) {
        let levels = self.tick_positions(axis.start_value, axis.end_value);
        let (along, across) = match axis.orientation {
            Orientation::Horizontal => (axis.origin.x, axis.origin.y),
            Orientation::Vertical => (axis.origin.y, axis.origin.x),
        };
        for (level, positions) in levels.iter().enumerate().rev() {
            for &position in positions {
                let placed = if axis.reverse { 1.0 - position } else { position };
                let at = lerp(along, along + axis.length, placed);
                let value = lerp(axis.start_value, axis.end_value, position);
                let highlight = self.highlight_factor(value, axis.current);
                let (length, thickness) = self.scaled_size(level, highlight);

                let span = align_length(across, length, axis.alignment, false);
                let line = match axis.orientation {
                    Orientation::Horizontal => Line::new(DVec2::new(at, span[0]), DVec2::new(at, span[1])),
                    Orientation::Vertical => Line::new(DVec2::new(span[0], at), DVec2::new(span[1], at)),
                };

                let paint = self.tick_paint(level, value, highlight, frame);
                self.draw_tick(canvas, level, line, thickness, &paint);
                self.draw_label(canvas, level, line, value, highlight, frame);
            }
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        self.root_tick.color.value_names(names);
        for tick in &self.sub_ticks {
            if let Some(color) = &tick.color {
                color.value_names(names);
            }
            if let Some(style) = &tick.tick_value_style {
                style.color.value_names(names);
            }
        }
        if let Some(style) = &self.root_tick.tick_value_style {
            style.color.value_names(names);
        }
        self.fill_stroke_modifier.value_names(names);
        if let Some(color) = &self.value_color_modifier {
            color.value_names(names);
        }
    }
}

impl DisplayObserver for TickList {
    fn change_display(&mut self, start: f64, end: f64) {
        self.root_tick.color.change_display(start, end);
        for tick in &mut self.sub_ticks {
            if let Some(color) = &mut tick.color {
                color.change_display(start, end);
            }
        }
    }
}

impl Inspect for TickList {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Tick marks").row([
                Field::new("Root", "rootTick", FieldKind::Tick),
                Field::new(
                    "Ticks",
                    "subTicks",
                    FieldKind::SubTicks {
                        max: defaults::MAX_SUB_TICK_LEVELS,
                    },
                ),
            ]),
            Panel::titled("Modifiers")
                .row([Field::number("Length", "lengthFactor"), Field::number("Thickness", "thicknessFactor")])
                .row([Field::number("Text Size", "textSizeFactor"), Field::number("Offset", "offset")])
                .row([Field::new("Text Color", "valueColorModifier", FieldKind::Color)])
                .row([Field::new("Tick Color", "fillStrokeModifier", FieldKind::FillStroke)]),
            Panel::titled("Modifiers (Advanced)")
                .row([Field::number("Base", "leftHighlightBase")])
                .row([
                    Field::number("Factor", "leftHighlightFactor"),
                    Field::number("Distance", "leftHighlightDistance"),
                ])
                .row([Field::number("Base", "rightHighlightBase")])
                .row([
                    Field::number("Factor", "rightHighlightFactor"),
                    Field::number("Distance", "rightHighlightDistance"),
                ]),
        ]
    }
}
