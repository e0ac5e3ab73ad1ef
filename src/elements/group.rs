use serde::{Deserialize, Serialize};

use super::{Element, ElementKind, GaugeElement, InsertOption, element_insert_options};
use crate::canvas::Canvas;
use crate::context::FrameContext;
use crate::panels::{Field, FieldKind, Inspect, Panel};
use crate::value::ValueCatalog;

/// A plain container; hiding it hides everything inside.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Group {
    elements: Vec<GaugeElement>,
    pub visible: bool,
}

impl Default for Group {
    fn default() -> Self {
        Group {
            elements: Vec::new(),
            visible: true,
        }
    }
}

impl Group {
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

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        for element in &self.elements {
            element.value_names(names);
        }
    }
}

impl Element for Group {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        if !self.visible {
            return;
        }
        for element in &self.elements {
            element.draw(canvas, frame);
        }
    }

    fn update(&mut self, frame: &FrameContext) {
        for element in &mut self.elements {
            element.update(frame);
        }
    }

    fn attach(&mut self, values: &ValueCatalog) {
        for element in &mut self.elements {
            element.attach(values);
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for Group {
    fn panels(&self) -> Vec<Panel> {
        vec![Panel::titled("Elements").row([
            Field::toggle("Visible", "visible"),
            Field::new("Elements", "elements", FieldKind::Elements),
        ])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::RecordingCanvas;

    #[test]
    fn hidden_group_hides_children() {
        let values = ValueCatalog::builtin();
        let mut group = Group::default();
        group.add_element(ElementKind::Circle.create(), &values);
        group.add_element(ElementKind::Rectangle.create(), &values);

        let frame = FrameContext::new(&values, 0.0);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        group.draw(&mut canvas, &frame);
        assert_eq!(canvas.commands.len(), 4);

        group.set_visible(false);
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        group.draw(&mut canvas, &frame);
        assert!(canvas.commands.is_empty());
    }

    #[test]
    fn nested_groups_round_trip() {
        let values = ValueCatalog::builtin();
        let mut inner = Group::default();
        inner.add_element(ElementKind::Graph.create(), &values);
        let mut outer = Group::default();
        outer.add_element(inner.into(), &values);
        outer.insert_element(0, ElementKind::Circle.create(), &values);

        let json = serde_json::to_string(&outer).unwrap();
        let back: Group = serde_json::from_str(&json).unwrap();
        assert_eq!(back, outer);
        assert_eq!(back.elements()[0].kind(), ElementKind::Circle);
        assert_eq!(GaugeElement::from(back).count(), 4);
    }

    #[test]
    fn removing_out_of_range_is_none() {
        let mut group = Group::default();
        assert!(group.remove_element(3).is_none());
    }
}
