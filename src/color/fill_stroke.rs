//! Fill and stroke pairs, fixed or driven by a timeline.

use serde::{Deserialize, Serialize};

use super::{Color, ColorSource, ColorTimeline, StaticColor};
use crate::context::FrameContext;
use crate::defaults;
use crate::gauge_value::DisplayObserver;
use crate::geometry::lerp;
use crate::panels::{Field, FieldKind, Inspect, Panel};
use crate::types::Rgb;

/// An outline color and width.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Stroke {
    pub color: Color,
    pub thickness: f64,
}

impl Default for Stroke {
    fn default() -> Self {
        Stroke::new(Rgb::BLACK, defaults::STROKE_THICKNESS)
    }
}

impl Stroke {
    pub fn new(color: impl Into<Color>, thickness: f64) -> Self {
        Stroke {
            color: color.into(),
            thickness,
        }
    }
}

/// Optional fill plus optional stroke. `None` means "do not paint".
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FillStroke {
    pub fill: Option<Color>,
    pub stroke: Option<Stroke>,
}

impl Default for FillStroke {
    /// Black fill with a thin white outline.
    fn default() -> Self {
        FillStroke {
            fill: Some(StaticColor::new(Rgb::BLACK).into()),
            stroke: Some(Stroke::new(Rgb::WHITE, defaults::STROKE_THICKNESS)),
        }
    }
}

impl FillStroke {
    pub fn new(fill: Option<Color>, stroke: Option<Stroke>) -> Self {
        FillStroke { fill, stroke }
    }

    /// Neither fill nor stroke.
    pub fn none() -> Self {
        FillStroke::new(None, None)
    }

    pub fn blend(&mut self, color: Rgb, thickness: f64, alpha: f64) {
        self.blend_fill(color, alpha);
        self.blend_stroke(color, thickness, alpha);
    }

    pub fn blend_fill(&mut self, color: Rgb, alpha: f64) {
        if let Some(fill) = &mut self.fill {
            fill.blend(color, alpha);
        }
    }

    /// Blend the stroke color and move its width toward `thickness`.
    pub fn blend_stroke(&mut self, color: Rgb, thickness: f64, alpha: f64) {
        if let Some(stroke) = &mut self.stroke {
            stroke.thickness = lerp(stroke.thickness, thickness, alpha);
            stroke.color.blend(color, alpha);
        }
    }

    /// Resolved paint mixed `alpha` toward `target`; `self` is unchanged.
    pub fn blended(&self, target: Rgb, alpha: f64, frame: &FrameContext) -> Paint {
        Paint {
            fill: self.fill.as_ref().map(|c| c.blended(target, alpha, frame)),
            stroke: self.stroke.as_ref().map(|s| PaintStroke {
                color: s.color.blended(target, alpha, frame),
                thickness: s.thickness,
            }),
        }
    }

    pub fn resolve(&self, frame: &FrameContext) -> Paint {
        Paint {
            fill: self.fill.as_ref().map(|c| c.color(frame)),
            stroke: self.stroke.as_ref().map(|s| PaintStroke {
                color: s.color.color(frame),
                thickness: s.thickness,
            }),
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        if let Some(fill) = &self.fill {
            fill.value_names(names);
        }
        if let Some(stroke) = &self.stroke {
            stroke.color.value_names(names);
        }
    }
}

impl Inspect for FillStroke {
    fn panels(&self) -> Vec<Panel> {
        vec![Panel::new().row([
            Field::new("Fill", "fill", FieldKind::Color),
            Field::new("Stroke", "stroke", FieldKind::Color),
        ])]
    }
}

/// A [`FillStroke`] resolved for one frame.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Paint {
    pub fill: Option<Rgb>,
    pub stroke: Option<PaintStroke>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaintStroke {
    pub color: Rgb,
    pub thickness: f64,
}

impl Paint {
    pub fn is_invisible(&self) -> bool {
        self.fill.is_none() && self.stroke.is_none()
    }

    /// Mix the fill toward `target`.
    pub fn blend_fill(&mut self, target: Rgb, alpha: f64) {
        if let Some(fill) = &mut self.fill {
            *fill = fill.blend(target, alpha);
        }
    }

    /// Mix the stroke color toward `color` and its width toward `thickness`.
    pub fn blend_stroke(&mut self, color: Rgb, thickness: f64, alpha: f64) {
        if let Some(stroke) = &mut self.stroke {
            stroke.color = stroke.color.blend(color, alpha);
            stroke.thickness = lerp(stroke.thickness, thickness, alpha);
        }
    }
}

// ============================================================================
// Timelines
// ============================================================================

/// A stroke whose color follows a timeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StrokeTimeline {
    pub timeline: ColorTimeline,
    pub thickness: f64,
}

impl Default for StrokeTimeline {
    fn default() -> Self {
        StrokeTimeline {
            timeline: ColorTimeline::default(),
            thickness: defaults::STROKE_THICKNESS,
        }
    }
}

/// Fill and stroke timelines sharing one position axis.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FillStrokeTimeline {
    pub fill_timeline: Option<ColorTimeline>,
    pub stroke: Option<StrokeTimeline>,
}

impl Default for FillStrokeTimeline {
    fn default() -> Self {
        FillStrokeTimeline {
            fill_timeline: Some(ColorTimeline::default()),
            stroke: Some(StrokeTimeline::default()),
        }
    }
}

impl FillStrokeTimeline {
    pub fn fill_stroke_at(&self, position: f64, frame: &FrameContext) -> Paint {
        Paint {
            fill: self.fill_timeline.as_ref().map(|t| t.color_at(position, frame)),
            stroke: self.stroke.as_ref().map(|s| PaintStroke {
                color: s.timeline.color_at(position, frame),
                thickness: s.thickness,
            }),
        }
    }

    pub(crate) fn value_names<'a>(&'a self, names: &mut Vec<&'a str>) {
        if let Some(fill) = &self.fill_timeline {
            fill.value_names(names);
        }
        if let Some(stroke) = &self.stroke {
            stroke.timeline.value_names(names);
        }
    }
}

impl DisplayObserver for FillStrokeTimeline {
    fn change_display(&mut self, start: f64, end: f64) {
        if let Some(fill) = &mut self.fill_timeline {
            fill.change_display(start, end);
        }
        if let Some(stroke) = &mut self.stroke {
            stroke.timeline.change_display(start, end);
        }
    }
}

impl Inspect for FillStrokeTimeline {
    fn panels(&self) -> Vec<Panel> {
        vec![Panel::titled("Color").row([
            Field::new("Fill", "fillTimeline", FieldKind::ColorTimeline),
            Field::new("Stroke", "stroke", FieldKind::ColorTimeline),
        ])]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::ColorKeyframe;
    use crate::value::ValueCatalog;

    // ==================== FillStroke tests ====================

    #[test]
    fn default_is_black_fill_white_stroke() {
        let values = ValueCatalog::new();
        let paint = FillStroke::default().resolve(&FrameContext::new(&values, 0.0));
        assert_eq!(paint.fill, Some(Rgb::BLACK));
        assert_eq!(
            paint.stroke,
            Some(PaintStroke {
                color: Rgb::WHITE,
                thickness: 1.0
            })
        );
    }

    #[test]
    fn blend_stroke_moves_thickness() {
        let mut fs = FillStroke::default();
        fs.blend_stroke(Rgb::BLACK, 5.0, 0.5);
        let stroke = fs.stroke.as_ref().unwrap();
        assert_eq!(stroke.thickness, 3.0);
        let values = ValueCatalog::new();
        assert_eq!(stroke.color.color(&FrameContext::new(&values, 0.0)).to_string(), "#808080");
    }

    #[test]
    fn absent_sides_stay_absent() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        let mut fs = FillStroke::none();
        fs.blend(Rgb::WHITE, 3.0, 1.0);
        assert!(fs.resolve(&frame).is_invisible());
        assert!(fs.blended(Rgb::WHITE, 0.5, &frame).is_invisible());
    }

    #[test]
    fn null_sides_round_trip() {
        let json = serde_json::to_string(&FillStroke::none()).unwrap();
        assert_eq!(json, r#"{"fill":null,"stroke":null}"#);
        let back: FillStroke = serde_json::from_str(&json).unwrap();
        assert_eq!(back, FillStroke::none());
    }

    // ==================== FillStrokeTimeline tests ====================

    #[test]
    fn timeline_paint_follows_position() {
        let values = ValueCatalog::new();
        let frame = FrameContext::new(&values, 0.0);
        let mut fst = FillStrokeTimeline {
            fill_timeline: Some(ColorTimeline::new(vec![
                ColorKeyframe::new(Rgb::BLACK, 0.0, true),
                ColorKeyframe::new(Rgb::WHITE, 1.0, true),
            ])),
            stroke: None,
        };
        fst.change_display(0.0, 100.0);
        let paint = fst.fill_stroke_at(50.0, &frame);
        assert_eq!(paint.fill.map(|c| c.to_string()), Some("#808080".to_string()));
        assert_eq!(paint.stroke, None);
    }
}
