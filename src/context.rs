//! Per-frame evaluation context.

use crate::color::UserPalette;
use crate::value::ValueCatalog;

/// What every color, tick list and element reads while a frame is evaluated:
/// the live values, the user's palette and the frame clock.
#[derive(Debug, Clone, Copy)]
pub struct FrameContext<'a> {
    pub values: &'a ValueCatalog,
    pub palette: UserPalette,
    /// Milliseconds on the host's animation clock.
    pub time_ms: f64,
}

impl<'a> FrameContext<'a> {
    pub fn new(values: &'a ValueCatalog, time_ms: f64) -> Self {
        FrameContext {
            values,
            palette: UserPalette::default(),
            time_ms,
        }
    }

    pub fn with_palette(mut self, palette: UserPalette) -> Self {
        self.palette = palette;
        self
    }
}
