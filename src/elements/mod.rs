//! The gauge element tree.
//!
//! A [`GaugeFace`](crate::face::GaugeFace) owns a list of [`GaugeElement`]s.
//! Containers own their children outright: a [`Group`] holds more gauge
//! elements, a [`CircularGauge`] holds [`CircularElement`]s and a
//! [`LinearGauge`] holds [`LinearElement`]s. Children are drawn in list order,
//! so later entries paint over earlier ones.

pub mod circular;
mod graph;
mod group;
pub mod linear;
mod odometer;
mod primitives;

use enum_dispatch::enum_dispatch;
use serde::{Deserialize, Deserializer, Serialize};

pub use circular::{CircularContext, CircularDrawable, CircularElement, CircularGauge, CircularKind};
pub use graph::{Graph, TimeValue};
pub use group::Group;
pub use linear::{LinearContext, LinearDrawable, LinearElement, LinearGauge, LinearKind};
pub use odometer::RollOdometer;
pub use primitives::{Circle, Rectangle};

use crate::canvas::Canvas;
use crate::context::FrameContext;
use crate::panels::{Inspect, Panel};
use crate::registry;
use crate::value::ValueCatalog;

/// Behavior shared by every top-level element.
#[enum_dispatch]
pub trait Element {
    /// Paint into `canvas`. Invisible elements draw nothing, children included.
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext);

    /// Advance per-frame state such as sample history.
    fn update(&mut self, _frame: &FrameContext) {}

    /// Push the current display ranges of `values` down to every observer in
    /// this subtree.
    fn attach(&mut self, _values: &ValueCatalog) {}

    fn is_visible(&self) -> bool;

    fn set_visible(&mut self, visible: bool);
}

#[enum_dispatch(Element)]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type")]
pub enum GaugeElement {
    CircularGauge(CircularGauge),
    LinearGauge(LinearGauge),
    Group(Group),
    Graph(Graph),
    RollOdometer(RollOdometer),
    Circle(Circle),
    Rectangle(Rectangle),
}

impl<'de> Deserialize<'de> for GaugeElement {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        registry::deserialize_tagged(&registry::GAUGE_ELEMENTS, deserializer)
    }
}

impl GaugeElement {
    pub fn kind(&self) -> ElementKind {
        match self {
            GaugeElement::CircularGauge(_) => ElementKind::CircularGauge,
            GaugeElement::LinearGauge(_) => ElementKind::LinearGauge,
            GaugeElement::Group(_) => ElementKind::Group,
            GaugeElement::Graph(_) => ElementKind::Graph,
            GaugeElement::RollOdometer(_) => ElementKind::RollOdometer,
            GaugeElement::Circle(_) => ElementKind::Circle,
            GaugeElement::Rectangle(_) => ElementKind::Rectangle,
        }
    }

    pub fn type_name(&self) -> &'static str {
        self.kind().type_name()
    }

    /// Catalog values this element and its children read.
    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            GaugeElement::CircularGauge(e) => e.value_names(names),
            GaugeElement::LinearGauge(e) => e.value_names(names),
            GaugeElement::Group(e) => e.value_names(names),
            GaugeElement::Graph(e) => e.value_names(names),
            GaugeElement::RollOdometer(e) => e.value_names(names),
            GaugeElement::Circle(e) => e.fill_stroke.value_names(names),
            GaugeElement::Rectangle(e) => e.fill_stroke.value_names(names),
        }
    }

    /// Number of elements in this subtree, counting sub-elements of gauges.
    pub fn count(&self) -> usize {
        match self {
            GaugeElement::CircularGauge(e) => 1 + e.elements().len(),
            GaugeElement::LinearGauge(e) => 1 + e.elements().len(),
            GaugeElement::Group(e) => 1 + e.elements().iter().map(GaugeElement::count).sum::<usize>(),
            _ => 1,
        }
    }
}

impl Inspect for GaugeElement {
    fn panels(&self) -> Vec<Panel> {
        match self {
            GaugeElement::CircularGauge(e) => e.panels(),
            GaugeElement::LinearGauge(e) => e.panels(),
            GaugeElement::Group(e) => e.panels(),
            GaugeElement::Graph(e) => e.panels(),
            GaugeElement::RollOdometer(e) => e.panels(),
            GaugeElement::Circle(e) => e.panels(),
            GaugeElement::Rectangle(e) => e.panels(),
        }
    }
}

// ============================================================================
// Insert options
// ============================================================================

/// One entry of a container's "insert" menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsertOption<K> {
    Kind(K),
    Divider,
}

impl<K: Copy> InsertOption<K> {
    pub fn kind(&self) -> Option<K> {
        match self {
            InsertOption::Kind(kind) => Some(*kind),
            InsertOption::Divider => None,
        }
    }
}

/// A top-level element type that can be created from a menu.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    CircularGauge,
    LinearGauge,
    Group,
    Graph,
    RollOdometer,
    Circle,
    Rectangle,
}

impl ElementKind {
    pub fn type_name(self) -> &'static str {
        match self {
            ElementKind::CircularGauge => "CircularGauge",
            ElementKind::LinearGauge => "LinearGauge",
            ElementKind::Group => "Group",
            ElementKind::Graph => "Graph",
            ElementKind::RollOdometer => "RollOdometer",
            ElementKind::Circle => "Circle",
            ElementKind::Rectangle => "Rectangle",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            ElementKind::CircularGauge => "Circular Gauge",
            ElementKind::LinearGauge => "Linear Gauge",
            ElementKind::Group => "Group",
            ElementKind::Graph => "Graph",
            ElementKind::RollOdometer => "Roll Odometer",
            ElementKind::Circle => "Circle",
            ElementKind::Rectangle => "Rectangle",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            ElementKind::CircularGauge => "Container for circular based gauge elements.",
            ElementKind::LinearGauge => "Container for linear based gauge elements.",
            ElementKind::Group => "Container for multiple gauge elements.",
            ElementKind::Graph => "Displays a graph of recent values.",
            ElementKind::RollOdometer => "Rolling counter styled like a mechanical odometer.",
            ElementKind::Circle => "Circle.",
            ElementKind::Rectangle => "Rectangle.",
        }
    }

    /// A new element of this kind with default settings.
    pub fn create(self) -> GaugeElement {
        match self {
            ElementKind::CircularGauge => CircularGauge::default().into(),
            ElementKind::LinearGauge => LinearGauge::default().into(),
            ElementKind::Group => Group::default().into(),
            ElementKind::Graph => Graph::default().into(),
            ElementKind::RollOdometer => RollOdometer::default().into(),
            ElementKind::Circle => Circle::default().into(),
            ElementKind::Rectangle => Rectangle::default().into(),
        }
    }
}

/// What a face or a group offers to insert.
pub fn element_insert_options() -> Vec<InsertOption<ElementKind>> {
    use InsertOption::{Divider, Kind};
    vec![
        Kind(ElementKind::CircularGauge),
        Kind(ElementKind::LinearGauge),
        Divider,
        Kind(ElementKind::Group),
        Divider,
        Kind(ElementKind::Graph),
        Kind(ElementKind::RollOdometer),
        Divider,
        Kind(ElementKind::Circle),
        Kind(ElementKind::Rectangle),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    // ==================== Kind tests ====================

    #[test]
    fn created_elements_carry_their_tag() {
        for option in element_insert_options() {
            let Some(kind) = option.kind() else { continue };
            let element = kind.create();
            assert_eq!(element.kind(), kind);
            let json = serde_json::to_value(&element).unwrap();
            assert_eq!(json["type"], kind.type_name());
        }
    }

    #[test]
    fn insert_menu_has_dividers_between_groups() {
        let options = element_insert_options();
        let dividers = options.iter().filter(|o| o.kind().is_none()).count();
        assert_eq!(options.len(), 10);
        assert_eq!(dividers, 3);
    }

    #[test]
    fn panel_fields_name_document_keys() {
        for option in element_insert_options() {
            let Some(kind) = option.kind() else { continue };
            let element = kind.create();
            let json = serde_json::to_value(&element).unwrap();
            for property in crate::panels::properties(&element.panels()) {
                assert!(json.get(property).is_some(), "{} has no `{property}`", kind.type_name());
            }
        }
    }

    // ==================== Visibility tests ====================

    #[test]
    fn hidden_element_draws_nothing() {
        let values = ValueCatalog::builtin();
        let frame = FrameContext::new(&values, 0.0);
        let mut element = ElementKind::Circle.create();
        element.set_visible(false);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        element.draw(&mut canvas, &frame);
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn visibility_survives_json() {
        let mut element = ElementKind::Rectangle.create();
        element.set_visible(false);
        let json = serde_json::to_string(&element).unwrap();
        let back: GaugeElement = serde_json::from_str(&json).unwrap();
        assert!(!back.is_visible());
    }

    #[test]
    fn unknown_element_type_is_rejected() {
        let err = serde_json::from_str::<GaugeElement>(r#"{"type":"Hexagon"}"#).unwrap_err();
        assert!(err.to_string().contains("unknown GaugeElement type `Hexagon`"), "{err}");
    }
}
