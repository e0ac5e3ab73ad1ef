//! The document root.
//!
//! A [`GaugeFace`] is what a `.gauge` file holds: a title, a design
//! resolution, a background color and the top-level element list. Loading
//! validates the whole tree up front, so a document that loads also draws.

use serde::de::{self, Unexpected};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::canvas::Canvas;
use crate::color::{Color, ColorSource};
use crate::context::FrameContext;
use crate::defaults;
use crate::elements::{Element, ElementKind, GaugeElement, InsertOption, element_insert_options};
use crate::errors::{LoadError, SourceContext};
use crate::log::{debug, trace, warn};
use crate::panels::{Field, FieldKind, Inspect, Panel};
use crate::types::{Rect, Rgb};
use crate::value::ValueCatalog;

const FACE_TYPE: &str = "GaugeFace";

/// The `"type": "GaugeFace"` marker on the root object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
struct FaceTag;

impl Serialize for FaceTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(FACE_TYPE)
    }
}

impl<'de> Deserialize<'de> for FaceTag {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let tag = String::deserialize(deserializer)?;
        if tag == FACE_TYPE {
            Ok(FaceTag)
        } else {
            Err(de::Error::invalid_value(Unexpected::Str(&tag), &FACE_TYPE))
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GaugeFace {
    #[serde(rename = "type")]
    tag: FaceTag,
    pub title: String,
    pub description: String,
    #[serde(rename = "resolution_x")]
    pub resolution_x: f64,
    #[serde(rename = "resolution_y")]
    pub resolution_y: f64,
    /// Round display; hosts may mask the corners.
    pub circular: bool,
    pub background_color: Color,
    elements: Vec<GaugeElement>,
}

impl Default for GaugeFace {
    fn default() -> Self {
        GaugeFace {
            tag: FaceTag,
            title: defaults::FACE_TITLE.to_string(),
            description: defaults::FACE_DESCRIPTION.to_string(),
            resolution_x: defaults::FACE_RESOLUTION,
            resolution_y: defaults::FACE_RESOLUTION,
            circular: true,
            background_color: Color::from(Rgb::BLACK),
            elements: Vec::new(),
        }
    }
}

impl GaugeFace {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a `.gauge` document. See [`GaugeFace::from_json_named`].
    pub fn from_json(source: &str, values: &ValueCatalog) -> Result<Self, LoadError> {
        Self::from_json_named("<input>", source, values)
    }

    /// Parse a `.gauge` document, naming it `name` in diagnostics.
    ///
    /// Every value reference in the tree must exist in `values`. On success
    /// each gauge has already pushed its display range to its children.
    pub fn from_json_named(name: &str, source: &str, values: &ValueCatalog) -> Result<Self, LoadError> {
        let ctx = SourceContext::new(name, source);
        let document: serde_json::Value =
            serde_json::from_str(source).map_err(|err| LoadError::from_json(err, &ctx))?;
        match document.get("type").and_then(serde_json::Value::as_str) {
            Some(FACE_TYPE) => {}
            Some(other) => {
                return Err(LoadError::NotAGaugeFace {
                    found: other.to_string(),
                });
            }
            None => {
                return Err(LoadError::NotAGaugeFace {
                    found: String::from("(none)"),
                });
            }
        }

        let mut face: GaugeFace = serde_json::from_str(source).map_err(|err| LoadError::from_json(err, &ctx))?;
        face.check_values(values)?;
        face.attach(values);
        debug!(
            document = name,
            top_level = face.elements.len(),
            total = face.count(),
            "loaded gauge face"
        );
        Ok(face)
    }

    /// Load from an already parsed document.
    pub fn from_value(document: &serde_json::Value, values: &ValueCatalog) -> Result<Self, LoadError> {
        Self::from_json_named("<document>", &document.to_string(), values)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    fn check_values(&self, values: &ValueCatalog) -> Result<(), LoadError> {
        let mut names = Vec::new();
        self.value_names(&mut names);
        match names.into_iter().find(|name| !values.contains(name)) {
            None => Ok(()),
            Some(name) => {
                let known: Vec<&str> = values.names().collect();
                let suggestion = (!known.is_empty()).then(|| format!("known values: {}", known.join(", ")));
                Err(LoadError::UnknownValue {
                    name: name.to_string(),
                    suggestion,
                })
            }
        }
    }

    /// Names of every catalog value the document reads, duplicates included.
    pub fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        self.background_color.value_names(names);
        for element in &self.elements {
            element.value_names(names);
        }
    }

    pub fn elements(&self) -> &[GaugeElement] {
        &self.elements
    }

    pub fn element_mut(&mut self, index: usize) -> Option<&mut GaugeElement> {
        self.elements.get_mut(index)
    }

    pub fn add_element(&mut self, element: GaugeElement, values: &ValueCatalog) {
        let index = self.elements.len();
        self.insert_element(index, element, values);
    }

    pub fn insert_element(&mut self, index: usize, mut element: GaugeElement, values: &ValueCatalog) {
        element.attach(values);
        let index = index.min(self.elements.len());
        self.elements.insert(index, element);
    }

    pub fn remove_element(&mut self, index: usize) -> Option<GaugeElement> {
        (index < self.elements.len()).then(|| self.elements.remove(index))
    }

    pub fn insert_options(&self) -> Vec<InsertOption<ElementKind>> {
        element_insert_options()
    }

    /// Number of elements in the tree, containers and their children included.
    pub fn count(&self) -> usize {
        self.elements.iter().map(GaugeElement::count).sum()
    }

    /// Re-push display ranges after the catalog or a unit changed.
    pub fn attach(&mut self, values: &ValueCatalog) {
        for element in &mut self.elements {
            element.attach(values);
        }
    }

    pub fn update(&mut self, frame: &FrameContext) {
        for element in &mut self.elements {
            element.update(frame);
        }
    }

    /// Paint one frame, scaling the design resolution to the canvas size.
    pub fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        let (width, height) = canvas.size();
        canvas.clear();
        if self.resolution_x > 0.0 && self.resolution_y > 0.0 {
            canvas.set_scale(width / self.resolution_x, height / self.resolution_y);
        } else {
            warn!(x = self.resolution_x, y = self.resolution_y, "gauge face has no resolution");
        }
        canvas.fill_rect(
            Rect::new(0.0, 0.0, self.resolution_x, self.resolution_y),
            self.background_color.color(frame),
        );
        for element in &self.elements {
            element.draw(canvas, frame);
        }
        trace!(time = frame.time_ms, "drew gauge face");
    }
}

impl Inspect for GaugeFace {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Info")
                .row([Field::new("Title", "title", FieldKind::Text)])
                .row([Field::new("Description", "description", FieldKind::Text)]),
            Panel::titled("Display")
                .row([
                    Field::integer("Width", "resolution_x"),
                    Field::integer("Height", "resolution_y"),
                ])
                .row([Field::toggle("Circular", "circular")]),
            Panel::titled("Background").row([Field::new("Color", "backgroundColor", FieldKind::Color)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas};

    // ==================== Loading tests ====================

    #[test]
    fn empty_document_takes_defaults() {
        let values = ValueCatalog::builtin();
        let face = GaugeFace::from_json(r#"{"type": "GaugeFace"}"#, &values).unwrap();
        assert_eq!(face, GaugeFace::default());
    }

    #[test]
    fn resolution_keys_stay_snake_case() {
        let json = serde_json::to_value(GaugeFace::default()).unwrap();
        assert_eq!(json["type"], "GaugeFace");
        assert_eq!(json["resolution_x"], 240.0);
        assert!(json.get("backgroundColor").is_some());
        assert!(json.get("resolutionX").is_none());
    }

    #[test]
    fn wrong_root_type_is_rejected() {
        let values = ValueCatalog::builtin();
        let err = GaugeFace::from_json(r#"{"type": "Circle"}"#, &values).unwrap_err();
        assert!(matches!(err, LoadError::NotAGaugeFace { ref found } if found == "Circle"), "{err:?}");

        let err = GaugeFace::from_json(r#"{"title": "x"}"#, &values).unwrap_err();
        assert!(matches!(err, LoadError::NotAGaugeFace { .. }), "{err:?}");
    }

    #[test]
    fn malformed_json_is_a_syntax_error() {
        let values = ValueCatalog::builtin();
        let err = GaugeFace::from_json("{\"type\": \"GaugeFace\",", &values).unwrap_err();
        assert!(matches!(err, LoadError::Syntax { .. }), "{err:?}");
    }

    #[test]
    fn unknown_element_type_is_invalid() {
        let values = ValueCatalog::builtin();
        let source = r#"{"type": "GaugeFace", "elements": [{"type": "Hexagon"}]}"#;
        let err = GaugeFace::from_json(source, &values).unwrap_err();
        let LoadError::Invalid { message, .. } = &err else {
            panic!("expected an invalid document, got {err:?}");
        };
        assert!(message.contains("unknown GaugeElement type `Hexagon`"), "{message}");
    }

    #[test]
    fn unknown_value_lists_known_names() {
        let values = ValueCatalog::builtin();
        let source = r#"{
            "type": "GaugeFace",
            "elements": [{"type": "Graph", "gaugeValue": {"value": "Warp Factor"}}]
        }"#;
        let err = GaugeFace::from_json(source, &values).unwrap_err();
        let LoadError::UnknownValue { name, suggestion } = &err else {
            panic!("expected an unknown value, got {err:?}");
        };
        assert_eq!(name, "Warp Factor");
        assert!(suggestion.as_deref().is_some_and(|s| s.contains("RPM")));
    }

    #[test]
    fn from_value_matches_from_json() {
        let values = ValueCatalog::builtin();
        let mut face = GaugeFace::new();
        face.add_element(ElementKind::CircularGauge.create(), &values);
        let document = serde_json::to_value(&face).unwrap();
        assert_eq!(GaugeFace::from_value(&document, &values).unwrap(), face);
    }

    // ==================== Editing tests ====================

    #[test]
    fn insert_and_remove() {
        let values = ValueCatalog::builtin();
        let mut face = GaugeFace::new();
        face.add_element(ElementKind::Circle.create(), &values);
        face.insert_element(0, ElementKind::Rectangle.create(), &values);
        face.insert_element(99, ElementKind::Graph.create(), &values);
        let kinds: Vec<ElementKind> = face.elements().iter().map(GaugeElement::kind).collect();
        assert_eq!(kinds, vec![ElementKind::Rectangle, ElementKind::Circle, ElementKind::Graph]);

        assert_eq!(face.remove_element(1).map(|e| e.kind()), Some(ElementKind::Circle));
        assert!(face.remove_element(5).is_none());
        assert_eq!(face.count(), 2);
    }

    // ==================== Drawing tests ====================

    #[test]
    fn draw_scales_to_the_canvas_and_fills_the_background() {
        let values = ValueCatalog::builtin();
        let face = GaugeFace {
            background_color: Color::from(Rgb::new(0x10, 0x20, 0x30)),
            ..GaugeFace::default()
        };
        let mut canvas = RecordingCanvas::new(480.0, 120.0);
        face.draw(&mut canvas, &FrameContext::new(&values, 0.0));
        assert_eq!(canvas.commands, vec![
            DrawCommand::Clear,
            DrawCommand::SetScale { x: 2.0, y: 0.5 },
            DrawCommand::FillRect {
                rect: Rect::new(0.0, 0.0, 240.0, 240.0),
                color: Rgb::new(0x10, 0x20, 0x30),
            },
        ]);
    }
}
