//! Physical units and their display conversions.
//!
//! Every [`Value`](crate::value::Value) stores its number in the base unit of
//! its [`UnitType`]; a [`Unit`] maps that base number to something a person
//! reads on the dial via `display = base * factor + offset`.

/// One display unit of a quantity.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Unit {
    pub name: &'static str,
    pub abbreviation: &'static str,
    pub factor: f64,
    pub offset: f64,
    pub decimal_places: usize,
    /// Suggested tick spacing, in this unit.
    pub display_interval: f64,
}

impl Unit {
    const fn new(
        name: &'static str,
        abbreviation: &'static str,
        factor: f64,
        offset: f64,
        decimal_places: usize,
        display_interval: f64,
    ) -> Self {
        Unit {
            name,
            abbreviation,
            factor,
            offset,
            decimal_places,
            display_interval,
        }
    }

    pub fn to_base(&self, value: f64) -> f64 {
        (value - self.offset) / self.factor
    }

    pub fn from_base(&self, value: f64) -> f64 {
        value * self.factor + self.offset
    }
}

/// An ordered family of units for one physical quantity.
#[derive(Debug, PartialEq)]
pub struct UnitType {
    pub name: &'static str,
    pub units: &'static [Unit],
    pub default_index: usize,
}

impl UnitType {
    /// Unit at `index`; negative or out-of-range indices give the default unit.
    pub fn unit(&self, index: i32) -> &Unit {
        usize::try_from(index)
            .ok()
            .and_then(|i| self.units.get(i))
            .unwrap_or(&self.units[self.default_index])
    }

    pub fn from_base(&self, value: f64, index: i32) -> f64 {
        self.unit(index).from_base(value)
    }

    pub fn to_base(&self, value: f64, index: i32) -> f64 {
        self.unit(index).to_base(value)
    }

    pub fn abbreviation(&self, index: i32) -> &'static str {
        self.unit(index).abbreviation
    }

    pub fn decimal_places(&self, index: i32) -> usize {
        self.unit(index).decimal_places
    }
}

pub static TEMPERATURE: UnitType = UnitType {
    name: "Temperature",
    units: &[
        Unit::new("Celsius", "°C", 1.0, 0.0, 2, 10.0),
        Unit::new("Fahrenheit", "°F", 1.8, 32.0, 2, 20.0),
        Unit::new("Kelvin", "K", 1.0, 273.15, 2, 10.0),
    ],
    default_index: 0,
};

pub static DISTANCE: UnitType = UnitType {
    name: "Distance",
    units: &[
        Unit::new("Meter", "m", 1.0, 0.0, 2, 100.0),
        Unit::new("Foot", "ft", 3.28084, 0.0, 2, 100.0),
        Unit::new("Kilometer", "km", 0.001, 0.0, 2, 1.0),
        Unit::new("Mile", "mi", 0.00062137, 0.0, 1, 1.0),
    ],
    default_index: 0,
};

pub static PRESSURE: UnitType = UnitType {
    name: "Pressure",
    units: &[
        Unit::new("PSI", "psi", 1.0, 0.0, 1, 5.0),
        Unit::new("Bar", "bar", 0.0689476, 0.0, 4, 1.0),
        Unit::new("InHg", "inHg", 2.03602, 0.0, 1, 10.0),
        Unit::new("KPa", "kPa", 6.89476, 0.0, 1, 50.0),
    ],
    default_index: 0,
};

pub static VELOCITY: UnitType = UnitType {
    name: "Velocity",
    units: &[
        Unit::new("Kilometers per hour", "km/h", 1.0, 0.0, 2, 20.0),
        Unit::new("Miles per hour", "mph", 0.621371, 0.0, 1, 20.0),
    ],
    default_index: 0,
};

pub static ACCELERATION: UnitType = UnitType {
    name: "Acceleration",
    units: &[
        Unit::new("Meters per second squared", "m/s²", 1.0, 0.0, 2, 5.0),
        Unit::new("Feet per second squared", "ft/s²", 3.2808398950131, 0.0, 2, 10.0),
        Unit::new("G-Force", "g", 0.10197162129779283, 0.0, 2, 1.0),
    ],
    default_index: 0,
};

pub static VOLUME: UnitType = UnitType {
    name: "Volume",
    units: &[
        Unit::new("Liter", "L", 1.0, 0.0, 2, 5.0),
        Unit::new("Gallon", "gal", 0.264172, 0.0, 3, 1.0),
        Unit::new("CC", "cc", 1000.0, 0.0, 0, 1000.0),
    ],
    default_index: 0,
};

pub static REVOLUTIONS: UnitType = UnitType {
    name: "Revolutions",
    units: &[Unit::new("RPM", "rpm", 1.0, 0.0, 0, 1000.0)],
    default_index: 0,
};

pub static ANGLE: UnitType = UnitType {
    name: "Angle",
    units: &[Unit::new("Degrees", "°", 1.0, 0.0, 0, 45.0)],
    default_index: 0,
};

pub static PERCENTAGE: UnitType = UnitType {
    name: "Percentage",
    units: &[Unit::new("Percent", "%", 1.0, 0.0, 1, 25.0)],
    default_index: 0,
};

pub static VOLUME_PER_TIME: UnitType = UnitType {
    name: "Volume per time",
    units: &[
        Unit::new("Liters per hour", "L/h", 1.0, 0.0, 2, 1.0),
        Unit::new("Milliliters per minute", "mL/min", 16.6666666667, 0.0, 1, 10.0),
        Unit::new("Gallons per hour", "GPH", 0.264172, 0.0, 1, 1.0),
    ],
    default_index: 0,
};

pub static TIME: UnitType = UnitType {
    name: "Time",
    units: &[
        Unit::new("Second", "s", 1.0, 0.0, 2, 15.0),
        Unit::new("Minute", "min", 0.0166667, 0.0, 1, 15.0),
        Unit::new("Hour", "hr", 0.00027777833333, 0.0, 1, 1.0),
    ],
    default_index: 0,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_roundtrip() {
        let f = TEMPERATURE.unit(1);
        assert_eq!(f.from_base(100.0), 212.0);
        assert_eq!(f.to_base(32.0), 0.0);
    }

    #[test]
    fn out_of_range_index_uses_default() {
        assert_eq!(PRESSURE.unit(-1).abbreviation, "psi");
        assert_eq!(PRESSURE.unit(99).abbreviation, "psi");
        assert_eq!(PRESSURE.unit(3).abbreviation, "kPa");
    }

    #[test]
    fn kelvin_offset() {
        assert!((TEMPERATURE.from_base(0.0, 2) - 273.15).abs() < 1e-12);
        assert_eq!(TEMPERATURE.decimal_places(2), 2);
    }
}
