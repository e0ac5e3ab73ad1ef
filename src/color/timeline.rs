//! Keyframed color gradients over a position axis.

use std::fmt::Write as _;

use serde::{Deserialize, Serialize};

use super::{Color, ColorSource, StaticColor};
use crate::context::FrameContext;
use crate::gauge_value::DisplayObserver;
use crate::types::Rgb;

/// A color anchored at a position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColorKeyframe {
    pub color: Color,
    #[serde(rename = "value")]
    pub position: f64,
    /// Blend toward the next keyframe; otherwise hold until it.
    pub smoothed: bool,
}

impl Default for ColorKeyframe {
    fn default() -> Self {
        ColorKeyframe::new(StaticColor::new(Rgb::WHITE), 0.0, true)
    }
}

impl ColorKeyframe {
    pub fn new(color: impl Into<Color>, position: f64, smoothed: bool) -> Self {
        ColorKeyframe {
            color: color.into(),
            position,
            smoothed,
        }
    }
}

/// Keyframes kept sorted by position, spread over `[display_start, display_end]`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "TimelineDocument")]
pub struct ColorTimeline {
    pub display_start: f64,
    pub display_end: f64,
    keyframes: Vec<ColorKeyframe>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct TimelineDocument {
    display_start: f64,
    display_end: f64,
    keyframes: Vec<ColorKeyframe>,
}

impl Default for TimelineDocument {
    fn default() -> Self {
        let ColorTimeline {
            display_start,
            display_end,
            keyframes,
        } = ColorTimeline::default();
        TimelineDocument {
            display_start,
            display_end,
            keyframes,
        }
    }
}

impl From<TimelineDocument> for ColorTimeline {
    fn from(doc: TimelineDocument) -> Self {
        let mut timeline = ColorTimeline {
            display_start: doc.display_start,
            display_end: doc.display_end,
            keyframes: doc.keyframes,
        };
        timeline.sort_keyframes();
        timeline
    }
}

impl Default for ColorTimeline {
    /// White to white over `[0, 1]`.
    fn default() -> Self {
        ColorTimeline {
            display_start: 0.0,
            display_end: 1.0,
            keyframes: vec![
                ColorKeyframe::new(StaticColor::new(Rgb::WHITE), 0.0, true),
                ColorKeyframe::new(StaticColor::new(Rgb::WHITE), 1.0, true),
            ],
        }
    }
}

impl ColorTimeline {
    /// A timeline over `[0, 1]` with the given keyframes.
    pub fn new(keyframes: Vec<ColorKeyframe>) -> Self {
        let mut timeline = ColorTimeline {
            display_start: 0.0,
            display_end: 1.0,
            keyframes,
        };
        timeline.sort_keyframes();
        timeline
    }

    /// Default keyframes spread over `[start, end]`.
    pub fn spanning(start: f64, end: f64) -> Self {
        let mut timeline = ColorTimeline::default();
        timeline.change_display(start, end);
        timeline
    }

    pub fn keyframes(&self) -> &[ColorKeyframe] {
        &self.keyframes
    }

    /// Mutable access to one keyframe's color and smoothing. Positions are
    /// moved through [`ColorTimeline::set_position`] so order is preserved.
    pub fn keyframe_mut(&mut self, index: usize) -> Option<&mut Color> {
        self.keyframes.get_mut(index).map(|k| &mut k.color)
    }

    pub fn set_position(&mut self, index: usize, position: f64) {
        if let Some(keyframe) = self.keyframes.get_mut(index) {
            keyframe.position = position;
            self.sort_keyframes();
        }
    }

    pub fn add_keyframe(&mut self, keyframe: ColorKeyframe) {
        self.keyframes.push(keyframe);
        self.sort_keyframes();
    }

    pub fn remove_keyframe(&mut self, index: usize) -> Option<ColorKeyframe> {
        (index < self.keyframes.len()).then(|| self.keyframes.remove(index))
    }

    fn sort_keyframes(&mut self) {
        self.keyframes.sort_by(|a, b| a.position.total_cmp(&b.position));
    }

    /// Blend every keyframe toward `target`.
    pub fn blend(&mut self, target: Rgb, alpha: f64) {
        for keyframe in &mut self.keyframes {
            keyframe.color.blend(target, alpha);
        }
    }

    /// Move to a new display range, keeping each keyframe's relative place.
    pub fn change_display(&mut self, start: f64, end: f64) {
        let old_start = self.display_start;
        let old_range = self.display_end - self.display_start;
        let new_range = end - start;
        let count = self.keyframes.len();

        for (i, keyframe) in self.keyframes.iter_mut().enumerate() {
            let normal = if old_range != 0.0 {
                (keyframe.position - old_start) / old_range
            } else if count > 1 {
                i as f64 / (count - 1) as f64
            } else {
                0.0
            };
            keyframe.position = start + normal * new_range;
        }

        self.display_start = start;
        self.display_end = end;
    }

    /// Color at `position`: flat outside the keyframes, stepped or blended
    /// between them.
    pub fn color_at(&self, position: f64, frame: &FrameContext) -> Rgb {
        let (Some(first), Some(last)) = (self.keyframes.first(), self.keyframes.last()) else {
            return Rgb::BLACK;
        };
        if position <= first.position {
            return first.color.color(frame);
        }
        if position >= last.position {
            return last.color.color(frame);
        }

        let i = self.keyframes.partition_point(|k| k.position < position);
        let (a, b) = (&self.keyframes[i - 1], &self.keyframes[i]);
        if position >= b.position {
            return b.color.color(frame);
        }
        if !a.smoothed {
            return a.color.color(frame);
        }
        let span = b.position - a.position;
        if span == 0.0 {
            return b.color.color(frame);
        }
        let alpha = (position - a.position) / span;
        a.color.color(frame).blend(b.color.color(frame), alpha)
    }

    /// First and last keyframe positions (`[0, 0]` when empty).
    pub fn start_end_positions(&self) -> [f64; 2] {
        match (self.keyframes.first(), self.keyframes.last()) {
            (Some(first), Some(last)) => [first.position, last.position],
            _ => [0.0, 0.0],
        }
    }

    pub fn range(&self) -> f64 {
        self.display_end - self.display_start
    }

    pub fn value_at_position(&self, position: f64) -> f64 {
        position * self.range() + self.display_start
    }

    /// Normalized place of `value` in the display range; `0` for an empty range.
    pub fn position_at_value(&self, value: f64) -> f64 {
        let range = self.range();
        if range == 0.0 {
            return 0.0;
        }
        (value - self.display_start) / range
    }

    /// CSS `linear-gradient` preview. Unsmoothed keyframes produce hard stops.
    pub fn gradient(&self, frame: &FrameContext) -> String {
        match self.keyframes.as_slice() {
            [] => return Rgb::BLACK.to_string(),
            [only] => return only.color.color(frame).to_string(),
            _ => {}
        }

        let mut stops = Vec::with_capacity(self.keyframes.len() * 2);
        for (i, keyframe) in self.keyframes.iter().enumerate() {
            let color = keyframe.color.color(frame);
            let mut stop = String::new();
            let _ = write!(stop, "{} {}%", color, self.position_at_value(keyframe.position) * 100.0);
            stops.push(stop);
            if let Some(next) = self.keyframes.get(i + 1).filter(|_| !keyframe.smoothed) {
                stops.push(format!("{} {}%", color, self.position_at_value(next.position) * 100.0));
            }
        }
        format!("linear-gradient(to right, {})", stops.join(", "))
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for keyframe in &self.keyframes {
            keyframe.color.value_names(names);
        }
    }
}

impl DisplayObserver for ColorTimeline {
    fn change_display(&mut self, start: f64, end: f64) {
        ColorTimeline::change_display(self, start, end);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::ValueCatalog;

    fn hex(s: &str) -> Rgb {
        s.parse().unwrap()
    }

    fn black_to_white(smoothed: bool) -> ColorTimeline {
        let mut timeline = ColorTimeline::new(vec![
            ColorKeyframe::new(StaticColor::new(hex("#000000")), 0.0, smoothed),
            ColorKeyframe::new(StaticColor::new(hex("#FFFFFF")), 10.0, smoothed),
        ]);
        timeline.display_end = 10.0;
        timeline
    }

    // ==================== Evaluation tests ====================

    #[test]
    fn midpoint_is_half_blend() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        assert_eq!(black_to_white(true).color_at(5.0, &frame).to_string(), "#808080");
    }

    #[test]
    fn exact_keyframe_positions_return_their_color() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        let mut timeline = black_to_white(true);
        timeline.add_keyframe(ColorKeyframe::new(StaticColor::new(hex("#ff0000")), 4.0, true));
        assert_eq!(timeline.color_at(0.0, &frame), hex("#000000"));
        assert_eq!(timeline.color_at(4.0, &frame), hex("#ff0000"));
        assert_eq!(timeline.color_at(10.0, &frame), hex("#ffffff"));
    }

    #[test]
    fn flat_outside_range() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        let timeline = black_to_white(true);
        assert_eq!(timeline.color_at(-100.0, &frame), Rgb::BLACK);
        assert_eq!(timeline.color_at(100.0, &frame), Rgb::WHITE);
    }

    #[test]
    fn unsmoothed_holds_previous_color() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        assert_eq!(black_to_white(false).color_at(9.9, &frame), Rgb::BLACK);
    }

    #[test]
    fn empty_timeline_is_black() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        let timeline = ColorTimeline::new(Vec::new());
        assert_eq!(timeline.color_at(0.5, &frame), Rgb::BLACK);
        assert_eq!(timeline.start_end_positions(), [0.0, 0.0]);
    }

    #[test]
    fn coincident_keyframes_snap_to_later() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        let timeline = ColorTimeline::new(vec![
            ColorKeyframe::new(StaticColor::new(hex("#000000")), 0.0, true),
            ColorKeyframe::new(StaticColor::new(hex("#ff0000")), 5.0, true),
            ColorKeyframe::new(StaticColor::new(hex("#00ff00")), 5.0, true),
            ColorKeyframe::new(StaticColor::new(hex("#0000ff")), 10.0, true),
        ]);
        assert_eq!(timeline.color_at(5.0, &frame), hex("#ff0000"));
        assert_eq!(timeline.color_at(7.5, &frame), hex("#008080"));
    }

    // ==================== Editing tests ====================

    #[test]
    fn keyframes_stay_sorted() {
        let mut timeline = black_to_white(true);
        timeline.add_keyframe(ColorKeyframe::new(StaticColor::default(), 3.0, true));
        timeline.set_position(0, 20.0);
        let positions: Vec<f64> = timeline.keyframes().iter().map(|k| k.position).collect();
        assert_eq!(positions, vec![3.0, 10.0, 20.0]);
        assert!(timeline.remove_keyframe(7).is_none());
    }

    #[test]
    fn change_display_rescales_positions() {
        let mut timeline = black_to_white(true);
        timeline.add_keyframe(ColorKeyframe::new(StaticColor::default(), 2.5, true));
        timeline.change_display(100.0, 200.0);
        let positions: Vec<f64> = timeline.keyframes().iter().map(|k| k.position).collect();
        assert_eq!(positions, vec![100.0, 125.0, 200.0]);
        assert_eq!(timeline.position_at_value(150.0), 0.5);
        assert_eq!(timeline.value_at_position(0.25), 125.0);
    }

    #[test]
    fn change_display_from_empty_range_spreads_keyframes() {
        let mut timeline = ColorTimeline::default();
        timeline.change_display(5.0, 5.0);
        timeline.change_display(0.0, 10.0);
        assert_eq!(timeline.start_end_positions(), [0.0, 10.0]);
    }

    #[test]
    fn gradient_with_hard_stop() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        assert_eq!(
            black_to_white(false).gradient(&frame),
            "linear-gradient(to right, #000000 0%, #000000 100%, #ffffff 100%)"
        );
    }

    #[test]
    fn deserialized_keyframes_are_sorted() {
        let timeline: ColorTimeline = serde_json::from_str(
            r##"{"displayStart":0,"displayEnd":1,"keyframes":[
                {"color":{"type":"StaticColor","color":"#ffffff"},"value":1,"smoothed":true},
                {"color":{"type":"StaticColor","color":"#000000"},"value":0,"smoothed":false}
            ]}"##,
        )
        .unwrap();
        assert_eq!(timeline.keyframes()[0].position, 0.0);
        assert!(!timeline.keyframes()[0].smoothed);
    }
}
