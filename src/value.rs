//! Live quantities shown on a gauge face.
//!
//! A [`Value`] is a bounded number in the base unit of its [`UnitType`] with a
//! short time-stamped history. Values live in a [`ValueCatalog`] owned by the
//! host; documents refer to them by name.

use std::collections::VecDeque;

use crate::defaults;
use crate::geometry::{lerp, round_to};
use crate::log::{debug, trace};
use crate::units::{self, UnitType};

/// One history sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time: f64,
    pub value: f64,
}

/// A named physical quantity, always clamped into `[minimum, maximum]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Value {
    name: String,
    value: f64,
    minimum: f64,
    maximum: f64,
    unit_type: &'static UnitType,
    tag: Option<String>,
    history: VecDeque<Sample>,
    /// Retention window in milliseconds.
    pub history_length: f64,
}

impl Value {
    pub fn new(
        name: impl Into<String>,
        value: f64,
        minimum: f64,
        maximum: f64,
        unit_type: &'static UnitType,
    ) -> Self {
        let minimum = if minimum.is_nan() { 0.0 } else { minimum };
        let maximum = if maximum.is_nan() { minimum } else { maximum.max(minimum) };
        Value {
            name: name.into(),
            value: clamp_reading(value, minimum, maximum, minimum),
            minimum,
            maximum,
            unit_type,
            tag: None,
            history: VecDeque::new(),
            history_length: defaults::HISTORY_LENGTH_MS,
        }
    }

    /// Group label used when listing values in a menu.
    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    pub fn unit_type(&self) -> &'static UnitType {
        self.unit_type
    }

    pub fn value_raw(&self) -> f64 {
        self.value
    }

    pub fn minimum_raw(&self) -> f64 {
        self.minimum
    }

    pub fn maximum_raw(&self) -> f64 {
        self.maximum
    }

    pub fn history(&self) -> impl Iterator<Item = &Sample> {
        self.history.iter()
    }

    /// Clamp and store `value`, record a sample at `now_ms` and drop samples
    /// that fell out of the retention window. A NaN reading keeps the
    /// previous value.
    pub fn set_value_raw(&mut self, value: f64, now_ms: f64) {
        if value.is_nan() {
            trace!(name = %self.name, "NaN reading ignored");
        }
        self.value = clamp_reading(value, self.minimum, self.maximum, self.value);
        if self.history.back().is_some_and(|last| last.time > now_ms) {
            trace!(name = %self.name, now_ms, "clock went backwards, history reset");
            self.history.clear();
        }
        self.history.push_back(Sample {
            time: now_ms,
            value: self.value,
        });
        self.remove_expired_history(now_ms);
    }

    fn remove_expired_history(&mut self, now_ms: f64) {
        let cutoff = now_ms - self.history_length;
        while self.history.front().is_some_and(|s| s.time < cutoff) {
            self.history.pop_front();
        }
    }

    /// Current value in display unit `unit`.
    pub fn value(&self, unit: i32) -> f64 {
        self.unit_type.from_base(self.value, unit)
    }

    pub fn set_value(&mut self, value: f64, unit: i32, now_ms: f64) {
        self.set_value_raw(self.unit_type.to_base(value, unit), now_ms);
    }

    /// Position of the value within its bounds, `0.5` for an empty range.
    pub fn interpolation(&self) -> f64 {
        if self.minimum == self.maximum {
            return 0.5;
        }
        (self.value - self.minimum) / (self.maximum - self.minimum)
    }

    /// Lower the bound; it never rises above the maximum. NaN is ignored.
    pub fn set_minimum_raw(&mut self, minimum: f64) {
        if minimum.is_nan() {
            return;
        }
        self.minimum = minimum.min(self.maximum);
        self.value = self.value.max(self.minimum);
    }

    /// Raise the bound; it never drops below the minimum. NaN is ignored.
    pub fn set_maximum_raw(&mut self, maximum: f64) {
        if maximum.is_nan() {
            return;
        }
        self.maximum = maximum.max(self.minimum);
        self.value = self.value.min(self.maximum);
    }

    pub fn minimum(&self, unit: i32) -> f64 {
        self.unit_type.from_base(self.minimum, unit)
    }

    pub fn maximum(&self, unit: i32) -> f64 {
        self.unit_type.from_base(self.maximum, unit)
    }

    pub fn set_minimum(&mut self, minimum: f64, unit: i32) {
        self.set_minimum_raw(self.unit_type.to_base(minimum, unit));
    }

    pub fn set_maximum(&mut self, maximum: f64, unit: i32) {
        self.set_maximum_raw(self.unit_type.to_base(maximum, unit));
    }

    /// Value in `unit`, fixed to the unit's decimal places.
    pub fn value_string(&self, unit: i32, abbreviation: bool) -> String {
        let places = self.unit_type.decimal_places(unit);
        let mut text = format!("{:.*}", places, self.value(unit));
        if abbreviation {
            text.push_str(self.unit_type.abbreviation(unit));
        }
        text
    }

    /// Maximum in `unit`. With an abbreviation the number is printed without
    /// trailing zeros.
    pub fn max_string(&self, unit: i32, abbreviation: bool) -> String {
        let places = self.unit_type.decimal_places(unit);
        let rounded = round_to(self.maximum(unit), places as i32);
        if abbreviation {
            format!("{}{}", rounded, self.unit_type.abbreviation(unit))
        } else {
            format!("{:.*}", places, rounded)
        }
    }

    /// Value at `time`, interpolated between the bracketing samples and held
    /// flat outside the sampled range.
    pub fn history_at(&self, time: f64) -> f64 {
        let (Some(first), Some(last)) = (self.history.front(), self.history.back()) else {
            return self.value;
        };
        if time <= first.time {
            return first.value;
        }
        if time >= last.time {
            return last.value;
        }
        let i = self.history.partition_point(|s| s.time < time);
        let (a, b) = (self.history[i - 1], self.history[i]);
        if b.time == a.time {
            return b.value;
        }
        lerp(a.value, b.value, (time - a.time) / (b.time - a.time))
    }

    /// [`Value::history_at`] normalized to the bounds.
    ///
    /// ```
    /// use gaugeface::units;
    /// use gaugeface::value::Value;
    ///
    /// let mut speed = Value::new("Speed", 0.0, 0.0, 160.0, &units::VELOCITY);
    /// speed.set_value_raw(40.0, 0.0);
    /// speed.set_value_raw(120.0, 1000.0);
    /// // 80 km/h half a second in, half of the range.
    /// assert_eq!(speed.interpolated_history_at(500.0), 0.5);
    /// ```
    pub fn interpolated_history_at(&self, time: f64) -> f64 {
        if self.minimum == self.maximum {
            return 0.5;
        }
        (self.history_at(time) - self.minimum) / (self.maximum - self.minimum)
    }
}

/// `value` clamped into `[minimum, maximum]`, or `fallback` when it is NaN.
fn clamp_reading(value: f64, minimum: f64, maximum: f64, fallback: f64) -> f64 {
    if value.is_nan() { fallback } else { value.clamp(minimum, maximum) }
}

// ============================================================================
// Catalog
// ============================================================================

/// Every value a document may refer to, in menu order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ValueCatalog {
    values: Vec<Value>,
}

/// A menu section: values sharing a tag (`None` for untagged values).
#[derive(Debug, Clone, PartialEq)]
pub struct ValueGroup<'a> {
    pub tag: Option<&'a str>,
    pub values: Vec<&'a Value>,
}

impl ValueCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// The vehicle values shipped with the editor.
    pub fn builtin() -> Self {
        let mut catalog = ValueCatalog::new();
        for value in [
            Value::new("RPM", 0.0, 0.0, defaults::RPM_MAXIMUM, &units::REVOLUTIONS).with_tag("Engine"),
            Value::new("Coolant Temp", 0.0, -40.0, 120.0, &units::TEMPERATURE).with_tag("Engine"),
            Value::new("Oil Temp", 0.0, -40.0, 120.0, &units::TEMPERATURE).with_tag("Engine"),
            Value::new("Transmission Temp", 0.0, -40.0, 120.0, &units::TEMPERATURE)
                .with_tag("Transmission"),
            Value::new("Oil Pressure", 0.0, 0.0, 100.0, &units::PRESSURE).with_tag("Engine"),
            Value::new("Transmission Fluid Pressure", 0.0, 0.0, 100.0, &units::PRESSURE)
                .with_tag("Transmission"),
            Value::new("Fuel Pressure", 0.0, 0.0, 100.0, &units::PRESSURE).with_tag("Fuel"),
            Value::new("Boost Pressure", 0.0, 0.0, 100.0, &units::PRESSURE).with_tag("Engine"),
            Value::new("Distance Driven", 0.0, 0.0, 100000.0, &units::DISTANCE).with_tag("Motion"),
            Value::new("Speed", 0.0, 0.0, 160.0, &units::VELOCITY).with_tag("Motion"),
            Value::new("Fuel Level", 8.0, 0.0, 12.0, &units::VOLUME).with_tag("Fuel"),
        ] {
            catalog.insert(value);
        }
        catalog
    }

    /// Add a value, replacing any value with the same name.
    pub fn insert(&mut self, value: Value) {
        match self.values.iter_mut().find(|v| v.name == value.name) {
            Some(existing) => *existing = value,
            None => self.values.push(value),
        }
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.iter().find(|v| v.name == name)
    }

    pub fn get_mut(&mut self, name: &str) -> Option<&mut Value> {
        self.values.iter_mut().find(|v| v.name == name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Value> {
        self.values.iter()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.values.iter().map(|v| v.name())
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Values grouped by tag, groups in order of first appearance.
    pub fn groups(&self) -> Vec<ValueGroup<'_>> {
        let mut groups: Vec<ValueGroup<'_>> = Vec::new();
        for value in &self.values {
            match groups.iter_mut().find(|g| g.tag == value.tag()) {
                Some(group) => group.values.push(value),
                None => groups.push(ValueGroup {
                    tag: value.tag(),
                    values: vec![value],
                }),
            }
        }
        groups
    }
}

// ============================================================================
// Simulation
// ============================================================================

/// Demo driver that animates the built-in values.
#[derive(Debug, Clone, PartialEq)]
pub struct Simulation {
    /// Simulated milliseconds; does not advance while paused.
    pub time_ms: f64,
    last_frame_ms: Option<f64>,
    paused: bool,
    throttle: f64,
    rpm: f64,
    speed: f64,
}

impl Default for Simulation {
    fn default() -> Self {
        Simulation {
            time_ms: 0.0,
            last_frame_ms: None,
            paused: false,
            throttle: 0.5,
            rpm: 0.0,
            speed: 0.0,
        }
    }
}

impl Simulation {
    /// Fixed integration step for speed, in seconds.
    const TICK: f64 = 0.016;
    const MAX_TEMPERATURE: f64 = 100.0;

    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_paused(&self) -> bool {
        self.paused
    }

    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Resume without a jump: the paused interval is skipped.
    pub fn resume(&mut self) {
        self.paused = false;
        self.last_frame_ms = None;
    }

    pub fn toggle(&mut self) {
        if self.paused {
            self.resume();
        } else {
            self.pause();
        }
    }

    /// Advance to wall time `now_ms` and write new readings into `values`.
    /// Values missing from the catalog are skipped.
    pub fn step(&mut self, values: &mut ValueCatalog, now_ms: f64) {
        let delta = self.last_frame_ms.map_or(0.0, |last| now_ms - last);
        self.last_frame_ms = Some(now_ms);
        if !self.paused {
            self.time_ms += delta;
        }
        let t = self.time_ms;

        self.throttle = 0.4 + 0.3 * (t * 0.0005).sin();
        self.rpm = 800.0 + self.throttle * 6000.0 + (t * 0.002).sin() * 200.0;

        let acceleration = (self.throttle - 0.2) * 10.0;
        self.speed = (self.speed + acceleration * Self::TICK).clamp(0.0, 160.0);

        let oil_pressure = 20.0 + (self.rpm / 8000.0) * 80.0;
        let warm_up = self.throttle * 0.1;
        let fuel_pressure = 45.0 - self.throttle * 2.0 + (t * 0.003).sin() * 0.5;

        let mut warm = |name: &str, rate: f64| {
            if let Some(v) = values.get_mut(name) {
                let next = Self::MAX_TEMPERATURE.min(v.value_raw() + rate);
                v.set_value_raw(next, now_ms);
            }
        };
        warm("Coolant Temp", warm_up);
        warm("Oil Temp", warm_up * 1.2);

        for (name, reading) in [
            ("RPM", self.rpm),
            ("Speed", self.speed),
            ("Oil Pressure", oil_pressure),
            ("Fuel Pressure", fuel_pressure),
        ] {
            if let Some(v) = values.get_mut(name) {
                v.set_value_raw(reading, now_ms);
            }
        }
        debug!(time_ms = t, rpm = self.rpm, speed = self.speed, "simulation step");
    }
}
