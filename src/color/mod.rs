//! Colors that resolve per frame.
//!
//! A [`Color`] is one of four sources: a fixed [`StaticColor`], a
//! time-animated [`CycleColor`], a [`ValueColor`] driven by a live value, or a
//! [`UserColor`] slot in the host's palette. All of them resolve to an [`Rgb`]
//! against a [`FrameContext`].

mod fill_stroke;
mod timeline;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Deserializer, Serialize};

pub use fill_stroke::{FillStroke, FillStrokeTimeline, Paint, PaintStroke, Stroke, StrokeTimeline};
pub use timeline::{ColorKeyframe, ColorTimeline};

use crate::context::FrameContext;
use crate::defaults;
use crate::gauge_value::DEFAULT_VALUE;
use crate::geometry::coded_enum;
use crate::log::warn;
use crate::panels::{Field, FieldKind, Inspect, Panel, choices};
use crate::registry;
use crate::types::{Rgb, positive_setting};
use crate::value::Value;

/// Behavior shared by every color variant.
#[enum_dispatch]
pub trait ColorSource {
    /// Resolve to a concrete color for this frame.
    fn color(&self, frame: &FrameContext) -> Rgb;

    /// Move this color `alpha` of the way toward `target`, in place.
    fn blend(&mut self, target: Rgb, alpha: f64);
}

#[enum_dispatch(ColorSource)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum Color {
    #[serde(rename = "StaticColor")]
    Static(StaticColor),
    #[serde(rename = "CycleColor")]
    Cycle(CycleColor),
    #[serde(rename = "ValueColor")]
    Value(ValueColor),
    #[serde(rename = "UserColor")]
    User(UserColor),
}

impl Default for Color {
    fn default() -> Self {
        Color::Static(StaticColor::default())
    }
}

impl<'de> Deserialize<'de> for Color {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        registry::deserialize_tagged(&registry::COLORS, deserializer)
    }
}

impl From<Rgb> for Color {
    fn from(rgb: Rgb) -> Self {
        Color::Static(StaticColor::new(rgb))
    }
}

impl Color {
    /// The `type` tag this variant serializes under.
    pub fn type_name(&self) -> &'static str {
        match self {
            Color::Static(_) => "StaticColor",
            Color::Cycle(_) => "CycleColor",
            Color::Value(_) => "ValueColor",
            Color::User(_) => "UserColor",
        }
    }

    /// This color resolved and then mixed `alpha` toward `target`, leaving
    /// `self` untouched.
    pub fn blended(&self, target: Rgb, alpha: f64, frame: &FrameContext) -> Rgb {
        self.color(frame).blend(target, alpha)
    }

    /// Names of catalog values this color reads.
    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Color::Static(_) | Color::User(_) => {}
            Color::Cycle(c) => c.timeline.value_names(names),
            Color::Value(c) => {
                names.push(&c.value);
                c.timeline.value_names(names);
            }
        }
    }
}

impl Inspect for Color {
    fn panels(&self) -> Vec<Panel> {
        let mut panels = vec![Panel::new().row([Field::choice("Type", "type", choices::COLOR_TYPES)])];
        match self {
            Color::Static(_) => {
                panels.push(Panel::new().row([Field::new("Color", "color", FieldKind::Text)]));
            }
            Color::Cycle(_) => {
                panels.push(
                    Panel::new().row([Field::number("Length", "length"), Field::toggle("Loop", "loop")]),
                );
                panels.push(Panel::new().row([Field::new("Timeline", "timeline", FieldKind::ColorTimeline)]));
            }
            Color::Value(_) => {
                panels.push(Panel::new().row([Field::new("Mapped Value", "value", FieldKind::ValuePicker)]));
                panels.push(Panel::new().row([Field::new("Timeline", "timeline", FieldKind::ColorTimeline)]));
            }
            Color::User(_) => {
                panels.push(Panel::new().row([Field::choice("Slot", "colorType", choices::USER_COLOR)]));
            }
        }
        panels
    }
}

// ============================================================================
// Static
// ============================================================================

/// A fixed color.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticColor {
    pub color: Rgb,
}

impl StaticColor {
    pub fn new(color: Rgb) -> Self {
        StaticColor { color }
    }
}

impl ColorSource for StaticColor {
    fn color(&self, _frame: &FrameContext) -> Rgb {
        self.color
    }

    fn blend(&mut self, target: Rgb, alpha: f64) {
        self.color = self.color.blend(target, alpha);
    }
}

// ============================================================================
// Cycle
// ============================================================================

/// A timeline played over `length` milliseconds, either ping-ponging or
/// restarting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CycleColor {
    pub length: f64,
    #[serde(rename = "loop")]
    pub looping: bool,
    pub timeline: ColorTimeline,
}

impl Default for CycleColor {
    fn default() -> Self {
        CycleColor {
            length: defaults::CYCLE_LENGTH_MS,
            looping: true,
            timeline: ColorTimeline::spanning(0.0, defaults::CYCLE_LENGTH_MS),
        }
    }
}

impl CycleColor {
    /// Change the period and stretch the timeline to match.
    pub fn set_length(&mut self, length: f64) {
        self.length = length;
        self.timeline.change_display(0.0, length);
    }

    /// Phase within the cycle at `time_ms`.
    pub fn time(&self, time_ms: f64) -> f64 {
        let Some(length) = positive_setting("length", self.length) else {
            return 0.0;
        };
        if self.looping {
            let t = time_ms.rem_euclid(2.0 * length);
            if t < length { t } else { 2.0 * length - t }
        } else {
            time_ms.rem_euclid(length)
        }
    }
}

impl ColorSource for CycleColor {
    fn color(&self, frame: &FrameContext) -> Rgb {
        self.timeline.color_at(self.time(frame.time_ms), frame)
    }

    fn blend(&mut self, target: Rgb, alpha: f64) {
        self.timeline.blend(target, alpha);
    }
}

// ============================================================================
// Value
// ============================================================================

/// A timeline evaluated at a catalog value, spanning its raw bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ValueColor {
    /// Catalog name of the driving value.
    pub value: String,
    pub timeline: ColorTimeline,
}

impl Default for ValueColor {
    fn default() -> Self {
        ValueColor {
            value: DEFAULT_VALUE.to_string(),
            timeline: ColorTimeline::spanning(0.0, defaults::RPM_MAXIMUM),
        }
    }
}

impl ValueColor {
    /// Follow another value; the timeline is re-spanned over its bounds.
    pub fn set_value(&mut self, value: &Value) {
        self.value = value.name().to_string();
        self.timeline.change_display(value.minimum_raw(), value.maximum_raw());
    }
}

impl ColorSource for ValueColor {
    fn color(&self, frame: &FrameContext) -> Rgb {
        match frame.values.get(&self.value) {
            Some(value) => self.timeline.color_at(value.value_raw(), frame),
            None => {
                warn!(value = %self.value, "value color refers to an unknown value");
                self.timeline.color_at(self.timeline.display_start, frame)
            }
        }
    }

    fn blend(&mut self, target: Rgb, alpha: f64) {
        self.timeline.blend(target, alpha);
    }
}

// ============================================================================
// User
// ============================================================================

coded_enum! {
    /// A slot in the user's palette.
    pub enum UserColorSlot {
        Primary = 0,
        Accent = 1,
        Background = 2,
    }
}

impl Default for UserColorSlot {
    fn default() -> Self {
        UserColorSlot::Primary
    }
}

/// The host-chosen palette [`UserColor`]s resolve against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserPalette {
    pub primary: Rgb,
    pub accent: Rgb,
    pub background: Rgb,
}

impl Default for UserPalette {
    fn default() -> Self {
        UserPalette {
            primary: Rgb::WHITE,
            accent: Rgb::new(0xff, 0, 0),
            background: Rgb::BLACK,
        }
    }
}

impl UserPalette {
    pub fn get(&self, slot: UserColorSlot) -> Rgb {
        match slot {
            UserColorSlot::Primary => self.primary,
            UserColorSlot::Accent => self.accent,
            UserColorSlot::Background => self.background,
        }
    }
}

/// A reference into the user's palette. Blending leaves it unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserColor {
    pub color_type: UserColorSlot,
}

impl UserColor {
    pub fn new(color_type: UserColorSlot) -> Self {
        UserColor { color_type }
    }
}

impl ColorSource for UserColor {
    fn color(&self, frame: &FrameContext) -> Rgb {
        frame.palette.get(self.color_type)
    }

    fn blend(&mut self, _target: Rgb, _alpha: f64) {}
}
