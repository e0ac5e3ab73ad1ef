//! The drawing surface.
//!
//! Elements paint through the [`Canvas`] trait, a small subset of a 2D raster
//! context. Angles handed to [`Path::arc`] are radians, clockwise from +x,
//! like the browser canvas. [`RecordingCanvas`] keeps a display list instead
//! of pixels.

use std::fmt;

use crate::types::{Point, Rect, Rgb};

/// One path segment.
#[derive(Debug, Clone, PartialEq)]
pub enum Segment {
    MoveTo(Point),
    LineTo(Point),
    Arc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        counterclockwise: bool,
    },
    RoundRect {
        rect: Rect,
        radius: f64,
    },
    Close,
}

/// A path under construction.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Path {
    pub segments: Vec<Segment>,
}

impl Path {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn move_to(mut self, p: Point) -> Self {
        self.segments.push(Segment::MoveTo(p));
        self
    }

    pub fn line_to(mut self, p: Point) -> Self {
        self.segments.push(Segment::LineTo(p));
        self
    }

    pub fn arc(mut self, center: Point, radius: f64, start: f64, end: f64, counterclockwise: bool) -> Self {
        self.segments.push(Segment::Arc {
            center,
            radius: radius.max(0.0),
            start,
            end,
            counterclockwise,
        });
        self
    }

    pub fn round_rect(mut self, rect: Rect, radius: f64) -> Self {
        self.segments.push(Segment::RoundRect { rect, radius });
        self
    }

    pub fn close(mut self) -> Self {
        self.segments.push(Segment::Close);
        self
    }

    /// Closed polygon through `points`.
    pub fn polygon(points: &[Point]) -> Self {
        let mut path = Path::new();
        for (i, p) in points.iter().enumerate() {
            path = if i == 0 { path.move_to(*p) } else { path.line_to(*p) };
        }
        path.close()
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineCap {
    #[default]
    Butt,
    Round,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StrokeStyle {
    pub color: Rgb,
    pub width: f64,
    pub cap: LineCap,
}

impl StrokeStyle {
    pub fn new(color: Rgb, width: f64) -> Self {
        StrokeStyle {
            color,
            width,
            cap: LineCap::Butt,
        }
    }

    pub fn round(mut self) -> Self {
        self.cap = LineCap::Round;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextBaseline {
    #[default]
    Alphabetic,
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// CSS font shorthand, e.g. `12px sans-serif`.
    pub font: String,
    pub color: Rgb,
    pub align: TextAlign,
    pub baseline: TextBaseline,
}

/// A 2D drawing surface.
pub trait Canvas {
    /// Destination size in device pixels.
    fn size(&self) -> (f64, f64);
    /// Erase everything and reset the transform.
    fn clear(&mut self);
    /// Scale all following drawing.
    fn set_scale(&mut self, x: f64, y: f64);
    fn save(&mut self);
    fn restore(&mut self);
    /// Intersect the clip region with `rect` until the matching `restore`.
    fn clip(&mut self, rect: Rect);
    fn fill_rect(&mut self, rect: Rect, color: Rgb);
    fn fill_path(&mut self, path: &Path, color: Rgb);
    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle);
    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle);
}

// ============================================================================
// Recording
// ============================================================================

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear,
    SetScale { x: f64, y: f64 },
    Save,
    Restore,
    Clip(Rect),
    FillRect { rect: Rect, color: Rgb },
    FillPath { path: Path, color: Rgb },
    StrokePath { path: Path, style: StrokeStyle },
    FillText { text: String, at: Point, style: TextStyle },
}

/// A canvas that records every call.
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingCanvas {
    width: f64,
    height: f64,
    pub commands: Vec<DrawCommand>,
}

impl RecordingCanvas {
    pub fn new(width: f64, height: f64) -> Self {
        RecordingCanvas {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn fills(&self) -> impl Iterator<Item = Rgb> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillPath { color, .. } | DrawCommand::FillRect { color, .. } => Some(*color),
            _ => None,
        })
    }

    pub fn strokes(&self) -> impl Iterator<Item = &StrokeStyle> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::StrokePath { style, .. } => Some(style),
            _ => None,
        })
    }

    pub fn texts(&self) -> impl Iterator<Item = &str> + '_ {
        self.commands.iter().filter_map(|c| match c {
            DrawCommand::FillText { text, .. } => Some(text.as_str()),
            _ => None,
        })
    }

    /// One line per command.
    pub fn display_list(&self) -> String {
        self.commands.iter().map(|c| format!("{c}\n")).collect()
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn set_scale(&mut self, x: f64, y: f64) {
        self.commands.push(DrawCommand::SetScale { x, y });
    }

    fn save(&mut self) {
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.commands.push(DrawCommand::Restore);
    }

    fn clip(&mut self, rect: Rect) {
        self.commands.push(DrawCommand::Clip(rect));
    }

    fn fill_rect(&mut self, rect: Rect, color: Rgb) {
        self.commands.push(DrawCommand::FillRect { rect, color });
    }

    fn fill_path(&mut self, path: &Path, color: Rgb) {
        self.commands.push(DrawCommand::FillPath {
            path: path.clone(),
            color,
        });
    }

    fn stroke_path(&mut self, path: &Path, style: &StrokeStyle) {
        self.commands.push(DrawCommand::StrokePath {
            path: path.clone(),
            style: *style,
        });
    }

    fn fill_text(&mut self, text: &str, at: Point, style: &TextStyle) {
        self.commands.push(DrawCommand::FillText {
            text: text.to_string(),
            at,
            style: style.clone(),
        });
    }
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Segment::MoveTo(p) => write!(f, "M{},{}", p.x, p.y),
            Segment::LineTo(p) => write!(f, "L{},{}", p.x, p.y),
            Segment::Arc {
                center,
                radius,
                start,
                end,
                counterclockwise,
            } => write!(
                f,
                "A{},{} r{} {}..{}{}",
                center.x,
                center.y,
                radius,
                start.to_degrees(),
                end.to_degrees(),
                if *counterclockwise { " ccw" } else { "" }
            ),
            Segment::RoundRect { rect, radius } => {
                write!(f, "R{},{} {}x{} r{}", rect.x, rect.y, rect.width, rect.height, radius)
            }
            Segment::Close => write!(f, "Z"),
        }
    }
}

impl fmt::Display for Path {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{segment}")?;
        }
        Ok(())
    }
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::Clear => write!(f, "clear"),
            DrawCommand::SetScale { x, y } => write!(f, "scale {x} {y}"),
            DrawCommand::Save => write!(f, "save"),
            DrawCommand::Restore => write!(f, "restore"),
            DrawCommand::Clip(r) => write!(f, "clip {},{} {}x{}", r.x, r.y, r.width, r.height),
            DrawCommand::FillRect { rect, color } => {
                write!(f, "fill-rect {},{} {}x{} {color}", rect.x, rect.y, rect.width, rect.height)
            }
            DrawCommand::FillPath { path, color } => write!(f, "fill {color} {path}"),
            DrawCommand::StrokePath { path, style } => {
                let cap = match style.cap {
                    LineCap::Butt => "",
                    LineCap::Round => " round",
                };
                write!(f, "stroke {} w{}{cap} {path}", style.color, style.width)
            }
            DrawCommand::FillText { text, at, style } => {
                write!(f, "text {:?} {},{} {} {}", text, at.x, at.y, style.font, style.color)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::DVec2;

    #[test]
    fn polygon_closes() {
        let path = Path::polygon(&[DVec2::ZERO, DVec2::new(1.0, 0.0), DVec2::new(0.0, 1.0)]);
        assert_eq!(path.to_string(), "M0,0 L1,0 L0,1 Z");
    }

    #[test]
    fn clear_drops_earlier_commands() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        canvas.fill_rect(Rect::new(0.0, 0.0, 1.0, 1.0), Rgb::WHITE);
        canvas.clear();
        assert_eq!(canvas.commands, vec![DrawCommand::Clear]);
    }

    #[test]
    fn display_list_lines() {
        let mut canvas = RecordingCanvas::new(100.0, 100.0);
        canvas.set_scale(2.0, 2.0);
        canvas.stroke_path(
            &Path::new().move_to(DVec2::ZERO).line_to(DVec2::new(3.0, 4.0)),
            &StrokeStyle::new(Rgb::BLACK, 1.5).round(),
        );
        assert_eq!(canvas.display_list(), "scale 2 2\nstroke #000000 w1.5 round M0,0 L3,4\n");
    }
}
