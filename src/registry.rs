//! Type-tagged deserialization.
//!
//! Every polymorphic object in a gauge document carries a `type` tag. Each
//! polymorphic base has one [`Registry`]: a fixed table from tag to decoder,
//! checked when the document is read. An unknown or missing tag rejects the
//! whole document.

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};
use thiserror::Error;

use crate::color::{Color, CycleColor, StaticColor, UserColor, ValueColor};
use crate::elements::circular::{CircularElement, CircularScale, CircularSegments, Needle, Pointer};
use crate::elements::linear::{LinearElement, LinearScale, LinearSegments};
use crate::elements::{Circle, CircularGauge, GaugeElement, Graph, Group, LinearGauge, Rectangle, RollOdometer};
use crate::errors::RegistryError;

pub type Decoder<T> = fn(serde_json::Value) -> Result<T, serde_json::Error>;

/// One tag and the decoder for it.
pub struct Entry<T: 'static> {
    pub name: &'static str,
    pub decode: Decoder<T>,
}

/// All concrete types of one polymorphic base.
pub struct Registry<T: 'static> {
    pub base: &'static str,
    pub entries: &'static [Entry<T>],
}

#[derive(Debug, Error)]
pub enum DecodeError {
    #[error(transparent)]
    Registry(#[from] RegistryError),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

impl<T> Registry<T> {
    pub fn type_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.entries.iter().map(|e| e.name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entries.iter().any(|e| e.name == name)
    }

    /// Read the `type` tag of `value` without decoding it.
    pub fn type_of<'v>(&self, value: &'v serde_json::Value) -> Result<&'v str, RegistryError> {
        let object = value
            .as_object()
            .ok_or(RegistryError::NotAnObject { base: self.base })?;
        object
            .get("type")
            .and_then(serde_json::Value::as_str)
            .ok_or(RegistryError::MissingType { base: self.base })
    }

    pub fn decode(&self, value: serde_json::Value) -> Result<T, DecodeError> {
        let name = self.type_of(&value)?;
        let entry = self
            .entries
            .iter()
            .find(|e| e.name == name)
            .ok_or_else(|| RegistryError::UnknownType {
                base: self.base,
                name: name.to_string(),
                expected: format!("expected one of: {}", self.type_names().collect::<Vec<_>>().join(", ")),
            })?;
        Ok((entry.decode)(value)?)
    }
}

fn decode_as<C, T>(value: serde_json::Value) -> Result<T, serde_json::Error>
where
    C: DeserializeOwned + Into<T>,
{
    serde_json::from_value::<C>(value).map(Into::into)
}

/// `Deserialize` body for a registry-backed enum.
pub fn deserialize_tagged<'de, D, T>(registry: &Registry<T>, deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
{
    let value = serde_json::Value::deserialize(deserializer)?;
    registry.decode(value).map_err(D::Error::custom)
}

pub static COLORS: Registry<Color> = Registry {
    base: "Color",
    entries: &[
        Entry {
            name: "StaticColor",
            decode: decode_as::<StaticColor, Color>,
        },
        Entry {
            name: "CycleColor",
            decode: decode_as::<CycleColor, Color>,
        },
        Entry {
            name: "ValueColor",
            decode: decode_as::<ValueColor, Color>,
        },
        Entry {
            name: "UserColor",
            decode: decode_as::<UserColor, Color>,
        },
    ],
};

pub static GAUGE_ELEMENTS: Registry<GaugeElement> = Registry {
    base: "GaugeElement",
    entries: &[
        Entry {
            name: "CircularGauge",
            decode: decode_as::<CircularGauge, GaugeElement>,
        },
        Entry {
            name: "LinearGauge",
            decode: decode_as::<LinearGauge, GaugeElement>,
        },
        Entry {
            name: "Group",
            decode: decode_as::<Group, GaugeElement>,
        },
        Entry {
            name: "Graph",
            decode: decode_as::<Graph, GaugeElement>,
        },
        Entry {
            name: "RollOdometer",
            decode: decode_as::<RollOdometer, GaugeElement>,
        },
        Entry {
            name: "Circle",
            decode: decode_as::<Circle, GaugeElement>,
        },
        Entry {
            name: "Rectangle",
            decode: decode_as::<Rectangle, GaugeElement>,
        },
    ],
};

pub static CIRCULAR_ELEMENTS: Registry<CircularElement> = Registry {
    base: "CircularElement",
    entries: &[
        Entry {
            name: "CNeedle",
            decode: decode_as::<Needle, CircularElement>,
        },
        Entry {
            name: "CPointer",
            decode: decode_as::<Pointer, CircularElement>,
        },
        Entry {
            name: "CScale",
            decode: decode_as::<CircularScale, CircularElement>,
        },
        Entry {
            name: "CSegments",
            decode: decode_as::<CircularSegments, CircularElement>,
        },
    ],
};

pub static LINEAR_ELEMENTS: Registry<LinearElement> = Registry {
    base: "LinearElement",
    entries: &[
        Entry {
            name: "LScale",
            decode: decode_as::<LinearScale, LinearElement>,
        },
        Entry {
            name: "LSegments",
            decode: decode_as::<LinearSegments, LinearElement>,
        },
    ],
};

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn missing_tag_names_the_base() {
        let err = COLORS.decode(json!({"color": "#ffffff"})).unwrap_err();
        assert_eq!(err.to_string(), "Color object is missing its `type` tag");
    }

    #[test]
    fn unknown_tag_lists_known_types() {
        let err = CIRCULAR_ELEMENTS.decode(json!({"type": "CDial"})).unwrap_err();
        let DecodeError::Registry(RegistryError::UnknownType { name, expected, .. }) = err else {
            panic!("expected an unknown type error");
        };
        assert_eq!(name, "CDial");
        assert!(expected.contains("CNeedle"));
    }

    #[test]
    fn non_object_is_rejected() {
        assert!(matches!(
            LINEAR_ELEMENTS.decode(json!(3)),
            Err(DecodeError::Registry(RegistryError::NotAnObject { .. }))
        ));
    }

    #[test]
    fn tables_cover_every_tag() {
        assert_eq!(COLORS.type_names().count(), 4);
        assert!(GAUGE_ELEMENTS.contains("RollOdometer"));
        assert!(!GAUGE_ELEMENTS.contains("GaugeFace"));
    }

    #[test]
    fn decoded_defaults_fill_missing_fields() {
        let color = COLORS.decode(json!({"type": "StaticColor"})).unwrap();
        assert_eq!(color, Color::default());
    }
}
