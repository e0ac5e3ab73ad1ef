//! Gauge values: how an element looks at a [`Value`].
//!
//! A [`GaugeValue`] names a value in the catalog and picks a display unit and
//! optional bounds. Binding it to a catalog yields a [`BoundGaugeValue`] that
//! answers every numeric question an element asks while drawing.

use serde::{Deserialize, Serialize};

use crate::log::trace;
use crate::units::{Unit, UnitType};
use crate::value::{Value, ValueCatalog};

/// Name of the value new gauges display.
pub const DEFAULT_VALUE: &str = "RPM";

/// Something laid out over a gauge value's display range.
///
/// Owners call [`DisplayObserver::change_display`] whenever the range may have
/// changed (value switched, unit switched, bounds edited, subtree re-attached).
pub trait DisplayObserver {
    fn change_display(&mut self, start: f64, end: f64);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaugeValue {
    /// Catalog name of the displayed value.
    pub value: String,
    /// Display unit; `-1` is the unit type's default.
    pub unit_index: i32,
    /// Raw-unit lower bound overriding the value's own.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_minimum: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub custom_maximum: Option<f64>,
}

impl Default for GaugeValue {
    fn default() -> Self {
        GaugeValue::new(DEFAULT_VALUE)
    }
}

impl GaugeValue {
    pub fn new(value: impl Into<String>) -> Self {
        GaugeValue {
            value: value.into(),
            unit_index: -1,
            custom_minimum: None,
            custom_maximum: None,
        }
    }

    /// Switch to another value; the unit goes back to the default.
    pub fn set_value(&mut self, name: impl Into<String>) {
        self.value = name.into();
        self.unit_index = -1;
    }

    pub fn bind<'a>(&'a self, values: &'a ValueCatalog) -> Option<BoundGaugeValue<'a>> {
        values.get(&self.value).map(|value| BoundGaugeValue { gauge: self, value })
    }

    /// Effective bounds in the display unit.
    pub fn display_range(&self, values: &ValueCatalog) -> Option<(f64, f64)> {
        self.bind(values).map(|b| (b.minimum(), b.maximum()))
    }

    /// Tell `observer` the current display range. Returns `false` when the
    /// value is not in the catalog, leaving the observer untouched.
    pub fn subscribe(&self, values: &ValueCatalog, observer: &mut dyn DisplayObserver) -> bool {
        match self.display_range(values) {
            Some((start, end)) => {
                trace!(value = %self.value, start, end, "change_display");
                observer.change_display(start, end);
                true
            }
            None => false,
        }
    }
}

/// A [`GaugeValue`] resolved against a catalog.
#[derive(Debug, Clone, Copy)]
pub struct BoundGaugeValue<'a> {
    pub gauge: &'a GaugeValue,
    pub value: &'a Value,
}

impl<'a> BoundGaugeValue<'a> {
    pub fn unit_type(&self) -> &'static UnitType {
        self.value.unit_type()
    }

    pub fn unit(&self) -> &'static Unit {
        self.value.unit_type().unit(self.gauge.unit_index)
    }

    pub fn minimum_raw(&self) -> f64 {
        self.gauge.custom_minimum.unwrap_or_else(|| self.value.minimum_raw())
    }

    pub fn maximum_raw(&self) -> f64 {
        self.gauge.custom_maximum.unwrap_or_else(|| self.value.maximum_raw())
    }

    /// The value clamped into the effective bounds.
    pub fn value_raw(&self) -> f64 {
        let (lo, hi) = (self.minimum_raw(), self.maximum_raw());
        self.value.value_raw().max(lo.min(hi)).min(hi.max(lo))
    }

    pub fn value(&self) -> f64 {
        self.unit().from_base(self.value_raw())
    }

    pub fn minimum(&self) -> f64 {
        self.unit().from_base(self.minimum_raw())
    }

    pub fn maximum(&self) -> f64 {
        self.unit().from_base(self.maximum_raw())
    }

    /// Position within the effective bounds, `0.5` for an empty range.
    pub fn interpolation(&self) -> f64 {
        let (lo, hi) = (self.minimum_raw(), self.maximum_raw());
        if lo == hi {
            return 0.5;
        }
        (self.value_raw() - lo) / (hi - lo)
    }

    pub fn value_string(&self, abbreviation: bool) -> String {
        self.value.value_string(self.gauge.unit_index, abbreviation)
    }

    pub fn abbreviation(&self) -> &'static str {
        self.unit().abbreviation
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Range(Option<(f64, f64)>);

    impl DisplayObserver for Range {
        fn change_display(&mut self, start: f64, end: f64) {
            self.0 = Some((start, end));
        }
    }

    fn catalog_with_speed(raw: f64) -> ValueCatalog {
        let mut values = ValueCatalog::builtin();
        if let Some(v) = values.get_mut("Speed") {
            v.set_value_raw(raw, 0.0);
        }
        values
    }

    #[test]
    fn custom_bounds_clamp_the_exposed_value() {
        let values = catalog_with_speed(150.0);
        let mut gauge = GaugeValue::new("Speed");
        gauge.custom_maximum = Some(100.0);
        let bound = gauge.bind(&values).unwrap();
        assert_eq!(bound.value_raw(), 100.0);
        assert_eq!(bound.interpolation(), 1.0);
        assert_eq!(bound.minimum_raw(), 0.0);
    }

    #[test]
    fn display_unit_converts() {
        let values = catalog_with_speed(100.0);
        let mut gauge = GaugeValue::new("Speed");
        gauge.unit_index = 1;
        let bound = gauge.bind(&values).unwrap();
        assert!((bound.value() - 62.1371).abs() < 1e-9);
        assert_eq!(bound.abbreviation(), "mph");
    }

    #[test]
    fn subscribe_reports_display_range_immediately() {
        let values = ValueCatalog::builtin();
        let mut gauge = GaugeValue::new("Coolant Temp");
        gauge.unit_index = 1;
        let mut observer = Range(None);
        assert!(gauge.subscribe(&values, &mut observer));
        assert_eq!(observer.0, Some((-40.0, 248.0)));
    }

    #[test]
    fn unknown_value_does_not_bind() {
        let values = ValueCatalog::builtin();
        let gauge = GaugeValue::new("Warp Factor");
        assert!(gauge.bind(&values).is_none());
        let mut observer = Range(None);
        assert!(!gauge.subscribe(&values, &mut observer));
        assert_eq!(observer.0, None);
    }

    #[test]
    fn set_value_resets_unit() {
        let mut gauge = GaugeValue::new("Speed");
        gauge.unit_index = 1;
        gauge.set_value("RPM");
        assert_eq!(gauge.unit_index, -1);
    }

    #[test]
    fn json_omits_unset_bounds() {
        let json = serde_json::to_string(&GaugeValue::new("Speed")).unwrap();
        assert_eq!(json, r#"{"value":"Speed","unitIndex":-1}"#);
        let parsed: GaugeValue =
            serde_json::from_str(r#"{"value":"Speed","customMinimum":10}"#).unwrap();
        assert_eq!(parsed.custom_minimum, Some(10.0));
        assert_eq!(parsed.unit_index, -1);
    }
}
