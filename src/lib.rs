//! Gauge faces: composable instrument dials described by `.gauge` documents.
//!
//! A [`GaugeFace`] is a tree of elements (circular and linear gauges with
//! needles, scales and segment bars, graphs, roll odometers and plain shapes)
//! bound to live [`Value`]s from a [`ValueCatalog`]. Each frame the host
//! updates the catalog, calls [`GaugeFace::update`] and then
//! [`GaugeFace::draw`] into anything implementing [`Canvas`].
//!
//! ```
//! use gaugeface::{FrameContext, RecordingCanvas, ValueCatalog};
//!
//! let values = ValueCatalog::builtin();
//! let face = gaugeface::load(r#"{"type": "GaugeFace"}"#, &values).unwrap();
//! let mut canvas = RecordingCanvas::new(240.0, 240.0);
//! face.draw(&mut canvas, &FrameContext::new(&values, 0.0));
//! ```

pub mod canvas;
pub mod color;
pub mod context;
pub mod defaults;
pub mod draw;
pub mod elements;
pub mod errors;
pub mod face;
pub mod gauge_value;
pub mod geometry;
mod log;
pub mod panels;
pub mod registry;
pub mod ticks;
pub mod types;
pub mod units;
pub mod value;

pub use canvas::{Canvas, DrawCommand, Path, RecordingCanvas};
pub use color::{Color, ColorTimeline, FillStroke, Paint, UserPalette};
pub use context::FrameContext;
pub use elements::{Element, ElementKind, GaugeElement};
pub use errors::{LoadError, RegistryError};
pub use face::GaugeFace;
pub use gauge_value::GaugeValue;
pub use panels::Inspect;
pub use ticks::TickList;
pub use types::{Angle, Point, Rect, Rgb};
pub use value::{Simulation, Value, ValueCatalog};

/// Load a `.gauge` document against `values`.
pub fn load(source: &str, values: &ValueCatalog) -> Result<GaugeFace, LoadError> {
    GaugeFace::from_json(source, values)
}
