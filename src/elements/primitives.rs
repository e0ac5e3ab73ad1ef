//! Plain shapes.

use glam::DVec2;
use serde::{Deserialize, Serialize};

use super::Element;
use crate::canvas::Canvas;
use crate::color::FillStroke;
use crate::context::FrameContext;
use crate::defaults;
use crate::draw::{draw_circle, fill_stroke_rectangle_box_aligned};
use crate::geometry::BoxAlignment;
use crate::panels::{Field, FieldKind, Inspect, Panel, choices};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Circle {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
    pub fill_stroke: FillStroke,
    pub visible: bool,
}

impl Default for Circle {
    fn default() -> Self {
        Circle {
            x: defaults::ELEMENT_X,
            y: defaults::ELEMENT_Y,
            radius: 50.0,
            fill_stroke: FillStroke::default(),
            visible: true,
        }
    }
}

impl Element for Circle {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        if self.visible {
            draw_circle(canvas, DVec2::new(self.x, self.y), self.radius, &self.fill_stroke.resolve(frame));
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for Circle {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Position")
                .row([Field::integer("X", "x"), Field::integer("Y", "y")])
                .row([Field::number("Radius", "radius")]),
            Panel::titled("Color").row([Field::new("Color", "fillStroke", FieldKind::FillStroke)]),
        ]
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Rectangle {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Which point of the rectangle `(x, y)` names.
    pub alignment: BoxAlignment,
    pub fill_stroke: FillStroke,
    pub visible: bool,
}

impl Default for Rectangle {
    fn default() -> Self {
        Rectangle {
            x: defaults::ELEMENT_X,
            y: defaults::ELEMENT_Y,
            width: 50.0,
            height: 50.0,
            alignment: BoxAlignment::MiddleCenter,
            fill_stroke: FillStroke::default(),
            visible: true,
        }
    }
}

impl Element for Rectangle {
    fn draw(&self, canvas: &mut dyn Canvas, frame: &FrameContext) {
        if self.visible {
            fill_stroke_rectangle_box_aligned(
                canvas,
                self.x,
                self.y,
                self.width,
                self.height,
                0.0,
                self.alignment,
                &self.fill_stroke.resolve(frame),
            );
        }
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }
}

impl Inspect for Rectangle {
    fn panels(&self) -> Vec<Panel> {
        vec![
            Panel::titled("Position")
                .row([Field::integer("X", "x"), Field::integer("Y", "y")])
                .row([Field::number("Width", "width"), Field::number("Height", "height")])
                .row([Field::choice("Alignment", "alignment", choices::BOX_ALIGNMENT)]),
            Panel::titled("Color").row([Field::new("Color", "fillStroke", FieldKind::FillStroke)]),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::{DrawCommand, RecordingCanvas, Segment};
    use crate::types::Rect;
    use crate::value::ValueCatalog;

    #[test]
    fn rectangle_is_centered_by_default() {
        let values = ValueCatalog::new();
        let mut canvas = RecordingCanvas::new(240.0, 240.0);
        Rectangle::default().draw(&mut canvas, &FrameContext::new(&values, 0.0));
        let DrawCommand::FillPath { path, .. } = &canvas.commands[0] else {
            panic!("expected a fill");
        };
        assert_eq!(path.segments, vec![Segment::RoundRect {
            rect: Rect::new(95.0, 95.0, 50.0, 50.0),
            radius: 0.0
        }]);
    }

    #[test]
    fn circle_json_uses_camel_case() {
        let json = serde_json::to_value(Circle::default()).unwrap();
        assert!(json.get("fillStroke").is_some());
        assert_eq!(json["radius"], 50.0);
    }
}
