//! Default sizes and settings (gauge-face pixels unless noted)

pub const FACE_TITLE: &str = "My Gauge Face";
pub const FACE_DESCRIPTION: &str = "No description.";
pub const FACE_RESOLUTION: f64 = 240.0;

/// Default anchor for new elements: the middle of a default face.
pub const ELEMENT_X: f64 = 120.0;
pub const ELEMENT_Y: f64 = 120.0;

pub const GAUGE_START_ANGLE: f64 = 0.0;
pub const GAUGE_END_ANGLE: f64 = 270.0;
pub const LINEAR_GAUGE_LENGTH: f64 = 80.0;

/// Upper bound of the built-in RPM value, which new gauges and value colors track.
pub const RPM_MAXIMUM: f64 = 8000.0;

pub const HISTORY_LENGTH_MS: f64 = 5000.0;
pub const CYCLE_LENGTH_MS: f64 = 1000.0;

pub const STROKE_THICKNESS: f64 = 1.0;

pub const TICK_DIVISIONS: i64 = 10;
pub const TICK_LENGTH: f64 = 10.0;
pub const TICK_THICKNESS: f64 = 1.0;
pub const MAX_SUB_TICK_LEVELS: usize = 4;

/// Upper bound on ticks generated for one level between two parent ticks.
pub const MAX_TICKS_PER_LEVEL: usize = 1000;
/// Upper bound on ticks generated for a whole tick list, all levels together.
pub const MAX_TICKS: usize = 10_000;

/// Remainders smaller than this snap to zero when phasing tick divisions.
pub const TICK_EPSILON: f64 = 1e-10;

pub const GRAPH_SIZE: f64 = 80.0;
pub const GRAPH_SECONDS: f64 = 2.0;
pub const GRAPH_FONT: &str = "12px sans-serif";
pub const GRAPH_MAX_SECOND_MARKS: usize = 1000;

pub const ODOMETER_X: f64 = 160.0;
pub const ODOMETER_Y: f64 = 160.0;
pub const ODOMETER_SEGMENTS: u32 = 7;
pub const ODOMETER_DECIMALS: u32 = 2;
/// An f64 carries no more significant decimal digits than this.
pub const ODOMETER_MAX_DIGITS: u32 = 20;
pub const ODOMETER_SEGMENT_WIDTH: f64 = 18.0;
pub const ODOMETER_SEGMENT_HEIGHT: f64 = 25.0;
pub const ODOMETER_PADDING: f64 = 2.0;
pub const ODOMETER_FONT: &str = "16px monospace";

pub const TICK_LABEL_FONT_SIZE: f64 = 12.0;
pub const TICK_LABEL_DISTANCE: f64 = 10.0;
pub const TICK_LABEL_FONT_FAMILY: &str = "sans-serif";
