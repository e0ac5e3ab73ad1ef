//! A mechanical roll counter.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::Element;
use crate::canvas::{Canvas, Path, StrokeStyle, TextAlign, TextBaseline, TextStyle};
use crate::color::{Color, ColorSource};
use crate::context::FrameContext;
use crate::defaults::{
    self, ODOMETER_MAX_DIGITS as MAX_DIGITS, ODOMETER_PADDING as PADDING, ODOMETER_SEGMENT_HEIGHT as HEIGHT,
    ODOMETER_SEGMENT_WIDTH as WIDTH,
};
use crate::gauge_value::GaugeValue;
use crate::log::warn;
use crate::panels::{Field, FieldKind, Inspect, Panel};
use crate::types::{Rect, Rgb};

/// Digit drums centered on `x`, top edge at `y`. The last `decimals` drums
/// swap primary and secondary colors. Both counts are capped at
/// [`ODOMETER_MAX_DIGITS`](defaults::ODOMETER_MAX_DIGITS) when drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RollOdometer {
    pub x: f64,
    pub y: f64,
    pub gauge_value: GaugeValue,
    pub segments: u32,
    pub decimals: u32,
    pub primary_color: Color,
    pub secondary_color: Color,
    pub visible: bool,
}

impl Default for RollOdometer {
    fn default() -> Self {
        RollOdometer {
            x: defaults::ODOMETER_X,
            y: defaults::ODOMETER_Y,
            gauge_value: GaugeValue::default(),
            segments: defaults::ODOMETER_SEGMENTS,
            decimals: defaults::ODOMETER_DECIMALS,
            primary_color: Color::from(Rgb::WHITE),
            secondary_color: Color::from(Rgb::BLACK),
            visible: true,
        }
    }
}

/// Whole digits shown on the drums, most significant first. Values too large
/// for the drums keep their leading digits.
pub(crate) fn drum_digits(value: f64, segments: u32, decimals: u32) -> Vec<u32> {
    let (segments, decimals) = (segments.min(MAX_DIGITS), decimals.min(MAX_DIGITS));
    let scaled = (value.max(0.0) * 10f64.powi(decimals as i32 + 1)).floor() as u64;
    let text = format!("{:0>width$}", scaled / 10, width = segments as usize);
    text.chars()
        .take(segments as usize)
        .map(|c| c.to_digit(10).unwrap_or(0))
        .collect()
}

/// How far drum `index` has rolled toward its next digit, from 0 to 1. Only
/// the last drum turns continuously; the others move while every drum to
/// their right is on its final digit.
pub(crate) fn drum_roll(value: f64, index: u32, segments: u32, decimals: u32) -> f64 {
    let segments = segments.min(MAX_DIGITS) as i32;
    let decimals = decimals.min(MAX_DIGITS) as i32;
    let index = index.min(MAX_DIGITS) as i32;
    if index == segments - 1 {
        return (value * 10f64.powi(decimals)).rem_euclid(1.0).clamp(0.0, 1.0);
    }
    let position = (value * 10f64.powi(decimals + 2 + index - segments)).rem_euclid(10.0);
    let width = 10f64.powi(index - segments + 2);
    if position >= 10.0 - width {
        ((position - 10.0 + width) / width).clamp(0.0, 1.0)
    } else {
        0.0
    }
}

impl RollOdometer {
    /// Drums actually drawn.
    pub fn drum_count(&self) -> u32 {
        self.segments.min(MAX_DIGITS)
    }

    pub fn total_width(&self) -> f64 {
        let n = self.drum_count() as f64;
        WIDTH * n + PADDING * (n - 1.0).max(0.0)
    }

    pub fn clone_with_value(&self, gauge_value: GaugeValue) -> Self {
        RollOdometer {
            gauge_value,
            ..self.clone()
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        names.push(&self.gauge_value.value);
        self.primary_color.value_names(names);
        self.secondary_color.value_names(names);
    }
}

impl Element for RollOdometer {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        let segments = self.drum_count();
        if !self.visible || segments == 0 {
            return;
        }
        let Some(gauge) = self.gauge_value.bind(frame.values) else {
            warn!(value = %self.gauge_value.value, "odometer bound to an unknown value");
            return;
        };
        let value = gauge.value();
        let total = self.total_width();
        let left = self.x - total / 2.0;

        let outline = Path::new().round_rect(
            Rect::new(left - PADDING, self.y - PADDING, total + 2.0 * PADDING, HEIGHT + 2.0 * PADDING),
            0.0,
        );
        canvas.stroke_path(&outline, &StrokeStyle::new(Rgb::WHITE, 1.0));

        let primary = self.primary_color.color(frame);
        let secondary = self.secondary_color.color(frame);
        let decimals = self.decimals.min(MAX_DIGITS);
        let decimal_start = segments.saturating_sub(decimals);

        for (i, digit) in drum_digits(value, segments, decimals).into_iter().enumerate() {
            let i = i as u32;
            let (drum, ink) = if i >= decimal_start {
                (primary, secondary)
            } else {
                (secondary, primary)
            };
            let cell = Rect::new(left + (WIDTH + PADDING) * i as f64, self.y, WIDTH, HEIGHT);
            let roll = -drum_roll(value, i, segments, decimals) * HEIGHT;
            let style = TextStyle {
                font: defaults::ODOMETER_FONT.to_string(),
                color: ink,
                align: TextAlign::Center,
                baseline: TextBaseline::Middle,
            };
            let center = DVec2::new(cell.x + WIDTH / 2.0, cell.y + HEIGHT / 2.0 + roll);

            canvas.save();
            canvas.clip(cell);
            canvas.fill_rect(cell, drum);
            canvas.fill_text(&digit.to_string(), center, &style);
            canvas.fill_text(&((digit + 1) % 10).to_string(), center + DVec2::new(0.0, HEIGHT), &style);
            canvas.restore();
        }

        canvas.fill_text(
            gauge.abbreviation(),
            DVec2::new(self.x, self.y + HEIGHT + 2.0 * PADDING),
            &TextStyle {
                font: defaults::ODOMETER_FONT.to_string(),
                color: Rgb::WHITE,
                align: TextAlign::Center,
                baseline: TextBaseline::Top,
            },
        );
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for RollOdometer {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Position").row([Field::integer("X", "x"), Field::integer("Y", "y")]),
            Panel::titled("Digits").row([Field::integer("Segments", "segments"), Field::integer("Decimals", "decimals")]),
            Panel::titled("Colors").row([
                Field::new("Primary", "primaryColor", FieldKind::Color),
                Field::new("Secondary", "secondaryColor", FieldKind::Color),
            ]),
            Panel::titled("Value").row([Field::new("Value", "gaugeValue", FieldKind::GaugeValue)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;
    use crate::units;
    use crate::value::{Value, ValueCatalog};

    fn odometer_catalog(reading: f64) -> ValueCatalog {
        let mut values = ValueCatalog::new();
        values.insert(Value::new("Odo", reading, 0.0, 1_000_000.0, &units::DISTANCE));
        values
    }

    // ==================== Digit tests ====================

    #[test]
    fn digits_are_zero_padded() {
        assert_eq!(drum_digits(1234.5, 7, 2), vec![0, 1, 2, 3, 4, 5, 0]);
        assert_eq!(drum_digits(0.0, 4, 1), vec![0, 0, 0, 0]);
        assert_eq!(drum_digits(-3.0, 3, 0), vec![0, 0, 0]);
    }

    #[test]
    fn overflow_keeps_leading_digits() {
        assert_eq!(drum_digits(123_456.0, 3, 0), vec![1, 2, 3]);
    }

    #[test]
    fn last_drum_rolls_continuously() {
        assert!((drum_roll(12.345, 6, 7, 2) - 0.5).abs() < 1e-6);
        assert_eq!(drum_roll(12.0, 6, 7, 2), 0.0);
    }

    #[test]
    fn carry_drum_rolls_only_near_the_end() {
        // Tens-of-hundredths drum moves while the last drum passes 9.
        assert!((drum_roll(0.095, 5, 7, 2) - 0.5).abs() < 1e-6);
        assert_eq!(drum_roll(0.05, 5, 7, 2), 0.0);
    }

    // ==================== Drawing tests ====================

    #[test]
    fn draws_each_drum_and_the_unit() {
        let values = odometer_catalog(1234.5);
        let odometer = RollOdometer {
            gauge_value: GaugeValue::new("Odo"),
            ..RollOdometer::default()
        };
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        odometer.draw(&mut canvas, &FrameContext::new(&values, 0.0));

        let texts: Vec<&str> = canvas.texts().collect();
        assert_eq!(texts.len(), 15);
        let shown: String = texts.iter().step_by(2).take(7).copied().collect();
        assert_eq!(shown, "0123450");
        assert_eq!(texts[14], "m");

        let drums: Vec<Rgb> = canvas.fills().collect();
        assert_eq!(drums.len(), 7);
        assert_eq!(drums[0], Rgb::BLACK);
        assert_eq!(drums[5], Rgb::WHITE);
        assert_eq!(drums[6], Rgb::WHITE);
    }

    #[test]
    fn oversized_counts_are_capped() {
        let odometer: RollOdometer =
            serde_json::from_str(r#"{"gaugeValue": {"value": "Odo"}, "segments": 4294967295, "decimals": 2147483647}"#)
                .unwrap();
        assert_eq!(odometer.drum_count(), 20);
        assert_eq!(drum_digits(f64::MAX, u32::MAX, u32::MAX).len(), 20);
        assert!((0.0..=1.0).contains(&drum_roll(12.5, u32::MAX, u32::MAX, u32::MAX)));

        let values = odometer_catalog(1234.5);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        odometer.draw(&mut canvas, &FrameContext::new(&values, 0.0));
        assert_eq!(canvas.fills().count(), 20);
    }

    #[test]
    fn outline_spans_every_drum() {
        let odometer = RollOdometer::default();
        assert_eq!(odometer.total_width(), 18.0 * 7.0 + 2.0 * 6.0);
    }
}
