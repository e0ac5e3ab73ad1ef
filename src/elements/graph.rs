//! A scrolling plot of recent values.

use std::collections::VecDeque;

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::Element;
use crate::canvas::{Canvas, Path, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use crate::color::FillStroke;
use crate::context::FrameContext;
use crate::defaults;
use crate::draw::fill_stroke_rectangle_box_aligned;
use crate::gauge_value::GaugeValue;
use crate::geometry::{BoxAlignment, align_point, map};
use crate::log::{trace, warn};
use crate::panels::{Field, FieldKind, Inspect, Panel, choices};
use crate::types::{Rgb, positive_setting};

/// One remembered sample, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimeValue {
    pub value: f64,
    pub time: f64,
}

/// Newest samples enter on the left and scroll right as they age.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Graph {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub alignment: BoxAlignment,
    pub seconds_displayed: f64,
    /// Delay before a sample appears at the left edge.
    pub buffer_milliseconds: f64,
    pub background_color: FillStroke,
    pub gauge_value: GaugeValue,
    pub visible: bool,
    /// Newest first.
    #[serde(skip)]
    memory: VecDeque<TimeValue>,
}

impl Default for Graph {
    fn default() -> Self {
        Graph {
            x: defaults::ELEMENT_X,
            y: defaults::ELEMENT_Y,
            width: defaults::GRAPH_SIZE,
            height: defaults::GRAPH_SIZE,
            alignment: BoxAlignment::TopLeft,
            seconds_displayed: defaults::GRAPH_SECONDS,
            buffer_milliseconds: 0.0,
            background_color: FillStroke::default(),
            gauge_value: GaugeValue::default(),
            visible: true,
            memory: VecDeque::new(),
        }
    }
}

/// Sample memory is runtime state and does not take part in equality.
impl PartialEq for Graph {
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x
            && self.y == other.y
            && self.width == other.width
            && self.height == other.height
            && self.alignment == other.alignment
            && self.seconds_displayed == other.seconds_displayed
            && self.buffer_milliseconds == other.buffer_milliseconds
            && self.background_color == other.background_color
            && self.gauge_value == other.gauge_value
            && self.visible == other.visible
    }
}

impl Graph {
    pub fn memory(&self) -> impl Iterator<Item = &TimeValue> {
        self.memory.iter()
    }

    /// Oldest age still drawn, in milliseconds. Unusable windows count as zero.
    pub fn max_age(&self) -> f64 {
        let age = self.seconds_displayed * 1000.0 + self.buffer_milliseconds;
        if age.is_finite() { age.max(0.0) } else { 0.0 }
    }

    /// Record `value` at `time`. Expired samples are dropped except the newest
    /// one, which the plot still needs to clip its segment at the edge.
    pub fn record(&mut self, value: f64, time: f64) {
        self.memory.push_front(TimeValue { value, time });
        let max_age = self.max_age();
        if let Some(index) = self.memory.iter().position(|tv| time - tv.time > max_age) {
            self.memory.truncate(index + 1);
        }
    }

    /// A copy with an empty sample memory.
    pub fn clone_with_value(&self, gauge_value: GaugeValue) -> Self {
        Graph {
            gauge_value,
            memory: VecDeque::new(),
            ..self.clone()
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(&self.gauge_value.value);
        self.background_color.value_names(names);
    }

    /// The polyline, clipped to the plot's left and right edges.
    fn plot(&self, origin: DVec2, now: f64, minimum: f64, maximum: f64) -> Path {
        let second = self.width / self.seconds_displayed;
        let left = origin.x;
        let right = origin.x + self.width - 1.0;
        let to_x = |time: f64| left + (now - time) / 1000.0 * second - self.buffer_milliseconds / 1000.0 * second;
        let to_y = |value: f64| map(value, minimum, maximum, origin.y + self.height - 1.0, origin.y);
        let at = |x: f64, y: f64| DVec2::new(x, y);

        let mut path = Path::new();
        let mut segment = |from: DVec2, to: DVec2| {
            path = std::mem::take(&mut path).move_to(from).line_to(to);
        };

        let points: Vec<DVec2> = self.memory.iter().map(|tv| at(to_x(tv.time), to_y(tv.value))).collect();
        for pair in points.windows(2) {
            let (current, previous) = (pair[0], pair[1]);
            let slope = (current.y - previous.y) / (current.x - previous.x);
            let y_at = |x: f64| previous.y + slope * (x - previous.x);
            let left_clip = current.x < left && previous.x > left;
            let right_clip = current.x < right && previous.x > right;

            if current.x >= left && previous.x <= right {
                segment(current, previous);
            } else if left_clip && right_clip {
                segment(at(left, y_at(left)), at(right, y_at(right)));
            } else if left_clip {
                segment(at(left, y_at(left)), previous);
            } else if right_clip {
                segment(current, at(right, y_at(right)));
            }
        }

        // Hold the newest value flat while it waits out the buffer.
        if let Some(newest) = points.first() {
            if newest.x > left {
                if newest.x > right {
                    segment(at(left, newest.y), at(right, newest.y));
                } else {
                    segment(*newest, at(left, newest.y));
                }
            }
        }
        path
    }
}

impl Element for Graph {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        if !self.visible {
            return;
        }
        fill_stroke_rectangle_box_aligned(
            canvas,
            self.x,
            self.y,
            self.width,
            self.height,
            0.0,
            self.alignment,
            &self.background_color.resolve(frame),
        );
        let Some(gauge) = self.gauge_value.bind(frame.values) else {
            warn!(value = %self.gauge_value.value, "graph bound to an unknown value");
            return;
        };
        let Some(seconds) = positive_setting("secondsDisplayed", self.seconds_displayed) else {
            return;
        };

        let origin = align_point(self.x, self.y, self.width, self.height, self.alignment);
        let now = frame.time_ms;
        let style = StrokeStyle::new(Rgb::WHITE, 1.0);

        let plot = self.plot(origin, now, gauge.minimum(), gauge.maximum());
        if !plot.is_empty() {
            canvas.stroke_path(&plot, &style);
        }

        let second = self.width / seconds;
        let offset = now.rem_euclid(1000.0) / 1000.0 * second;
        let bottom = origin.y + self.height;
        let mut ticks = Path::new();
        let marks = (seconds.ceil() as usize).min(defaults::GRAPH_MAX_SECOND_MARKS);
        for i in 0..marks {
            let x = origin.x + offset + i as f64 * second;
            ticks = ticks.move_to(DVec2::new(x, bottom)).line_to(DVec2::new(x, bottom + 3.0));
        }
        canvas.stroke_path(&ticks, &style);

        canvas.fill_text(
            &gauge.value_string(true),
            DVec2::new(origin.x, origin.y - 2.0),
            &TextStyle {
                font: defaults::GRAPH_FONT.to_string(),
                color: Rgb::WHITE,
                align: TextAlign::Left,
                baseline: TextBaseline::Alphabetic,
            },
        );
    }

    fn update(&mut self, frame: &FrameContext) {
        let Some(value) = self.gauge_value.bind(frame.values).map(|g| g.value()) else {
            return;
        };
        self.record(value, frame.time_ms);
        trace!(samples = self.memory.len(), "graph update");
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for Graph {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Position")
                .row([Field::integer("X", "x"), Field::integer("Y", "y")])
                .row([Field::number("Width", "width"), Field::number("Height", "height")])
                .row([Field::choice("Alignment", "alignment", choices::BOX_ALIGNMENT)]),
            Panel::titled("Timing").row([
                Field::number("Seconds", "secondsDisplayed"),
                Field::number("Buffer", "bufferMilliseconds"),
            ]),
            Panel::titled("Colors").row([Field::new("Background", "backgroundColor", FieldKind::FillStroke)]),
            Panel::titled("Value").row([Field::new("Value", "gaugeValue", FieldKind::GaugeValue)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas, Segment};
    use crate::value::ValueCatalog;

    fn times(graph: &Graph) -> Vec<f64> {
        graph.memory().map(|tv| tv.time).collect()
    }

    // ==================== Memory tests ====================

    #[test]
    fn eviction_keeps_one_straddling_sample() {
        let mut graph = Graph::default();
        for t in [0.0, 1000.0, 2000.0, 2500.0, 3000.0] {
            graph.record(1.0, t);
        }
        // 0 is expired but still the only sample past the edge.
        assert_eq!(times(&graph), vec![3000.0, 2500.0, 2000.0, 1000.0, 0.0]);

        graph.record(1.0, 3500.0);
        assert_eq!(times(&graph), vec![3500.0, 3000.0, 2500.0, 2000.0, 1000.0]);

        graph.record(1.0, 10_000.0);
        assert_eq!(times(&graph), vec![10_000.0, 3500.0]);
    }

    #[test]
    fn buffer_extends_the_window() {
        let mut graph = Graph {
            buffer_milliseconds: 500.0,
            ..Graph::default()
        };
        for t in [0.0, 400.0, 2500.0] {
            graph.record(1.0, t);
        }
        assert_eq!(times(&graph), vec![2500.0, 400.0, 0.0]);
    }

    #[test]
    fn unusable_window_keeps_memory_short() {
        let mut graph = Graph {
            seconds_displayed: f64::NAN,
            ..Graph::default()
        };
        for t in [0.0, 100.0, 200.0, 300.0] {
            graph.record(1.0, t);
        }
        assert_eq!(times(&graph), vec![300.0, 200.0]);
    }

    #[test]
    fn update_reads_the_frame() {
        let mut values = ValueCatalog::builtin();
        if let Some(v) = values.get_mut("RPM") {
            v.set_value_raw(3000.0, 0.0);
        }
        let mut graph = Graph::default();
        graph.update(&FrameContext::new(&values, 42.0));
        assert_eq!(graph.memory().next(), Some(&TimeValue {
            value: 3000.0,
            time: 42.0
        }));
    }

    #[test]
    fn memory_is_not_serialized() {
        let mut graph = Graph::default();
        graph.record(5.0, 0.0);
        let json = serde_json::to_value(&graph).unwrap();
        assert!(json.get("memory").is_none());
        let back: Graph = serde_json::from_value(json).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.memory().count(), 0);
    }

    // ==================== Drawing tests ====================

    #[test]
    fn segment_crossing_the_right_edge_is_clipped() {
        let values = ValueCatalog::builtin();
        let mut graph = Graph {
            x: 0.0,
            y: 0.0,
            width: 101.0,
            height: 101.0,
            seconds_displayed: 1.0,
            ..Graph::default()
        };
        for t in [0.0, 1000.0, 2000.0] {
            graph.record(8000.0, t);
        }

        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        graph.draw(&mut canvas, &FrameContext::new(&values, 2000.0));
        let DrawCommand::StrokePath { path, .. } = &canvas.commands[2] else {
            panic!("expected the plot");
        };
        // Samples sit at x = 0, 101 and 202; only the first span is visible,
        // cut at the right edge.
        assert_eq!(path.segments, vec![
            Segment::MoveTo(DVec2::new(0.0, 0.0)),
            Segment::LineTo(DVec2::new(100.0, 0.0)),
        ]);
        assert_eq!(canvas.texts().count(), 1);
    }

    #[test]
    fn non_positive_window_draws_only_the_background() {
        let values = ValueCatalog::builtin();
        for seconds in [0.0, -3.0, f64::NAN] {
            let graph = Graph {
                seconds_displayed: seconds,
                ..Graph::default()
            };
            let mut canvas = RecordingCanvas::new(240.0, 240.0);
            graph.draw(&mut canvas, &FrameContext::new(&values, 0.0));
            assert!(!canvas.commands.is_empty());
            assert_eq!(canvas.texts().count(), 0);
        }
    }

    #[test]
    fn second_marks_are_capped() {
        let values = ValueCatalog::builtin();
        let graph = Graph {
            seconds_displayed: 1e300,
            ..Graph::default()
        };
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        graph.draw(&mut canvas, &FrameContext::new(&values, 0.0));
        let marks = canvas
            .commands
            .iter()
            .rev()
            .find_map(|command| match command {
                DrawCommand::StrokePath { path, .. } => Some(path.segments.len()),
                _ => None,
            });
        assert_eq!(marks, Some(2 * defaults::GRAPH_MAX_SECOND_MARKS));
    }

    #[test]
    fn buffered_sample_is_held_flat() {
        let values = ValueCatalog::builtin();
        let mut graph = Graph {
            x: 0.0,
            y: 0.0,
            width: 101.0,
            height: 101.0,
            seconds_displayed: 1.0,
            buffer_milliseconds: 500.0,
            ..Graph::default()
        };
        graph.record(0.0, 1000.0);

        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        graph.draw(&mut canvas, &FrameContext::new(&values, 2000.0));
        let DrawCommand::StrokePath { path, .. } = &canvas.commands[2] else {
            panic!("expected the plot");
        };
        assert_eq!(path.segments, vec![
            Segment::MoveTo(DVec2::new(50.5, 100.0)),
            Segment::LineTo(DVec2::new(0.0, 100.0)),
        ]);
    }
}
