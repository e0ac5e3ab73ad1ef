//! Error types with rich diagnostics using miette
//!
//! Load errors carry the document text and a span, so a rejected `.gauge`
//! file points at the offending spot.

use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// Source context for error reporting
#[derive(Debug, Clone)]
pub struct SourceContext {
    /// Name of the source (filename or "<input>")
    pub name: String,
    /// The full source text
    pub source: String,
}

impl SourceContext {
    /// Create a new source context
    pub fn new(name: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            source: source.into(),
        }
    }

    /// Create a NamedSource for miette
    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.source.clone())
    }

    /// Convert a 1-based line/column pair (as reported by serde_json) into a span.
    pub fn span_at(&self, line: usize, column: usize) -> SourceSpan {
        let mut offset = 0;
        for (index, text) in self.source.split_inclusive('\n').enumerate() {
            if index + 1 == line {
                offset += column.saturating_sub(1).min(text.len());
                break;
            }
            offset += text.len();
        }
        let offset = offset.min(self.source.len());
        let len = usize::from(offset < self.source.len());
        SourceSpan::new(offset.into(), len)
    }
}

// ============================================================================
// Numeric Errors
// ============================================================================

/// Error type for invalid numeric values
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum NumericError {
    #[error("value is NaN")]
    NaN,
    #[error("value is infinite")]
    Infinite,
    #[error("value is zero")]
    Zero,
    #[error("value is negative")]
    Negative,
}

// ============================================================================
// Color Errors
// ============================================================================

/// A color string that is not `#rrggbb` or `#rgb`.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
#[error("invalid hex color `{input}`")]
#[diagnostic(
    code(gaugeface::color::invalid_hex),
    help("colors are written as #rrggbb or #rgb")
)]
pub struct ColorParseError {
    pub input: String,
}

// ============================================================================
// Registry Errors
// ============================================================================

/// Errors raised while dispatching a tagged object to its concrete type.
#[derive(Error, Diagnostic, Debug, Clone, PartialEq)]
pub enum RegistryError {
    #[error("{base} object is missing its `type` tag")]
    #[diagnostic(code(gaugeface::registry::missing_type))]
    MissingType { base: &'static str },

    #[error("unknown {base} type `{name}`")]
    #[diagnostic(code(gaugeface::registry::unknown_type))]
    UnknownType {
        base: &'static str,
        name: String,
        #[help]
        expected: String,
    },

    #[error("{base} must be a JSON object")]
    #[diagnostic(code(gaugeface::registry::not_an_object))]
    NotAnObject { base: &'static str },
}

// ============================================================================
// Load Errors
// ============================================================================

/// Errors that abort loading a gauge document.
///
/// Loading is all-or-nothing: on error the caller keeps whatever it had before.
#[derive(Error, Diagnostic, Debug)]
pub enum LoadError {
    #[error("malformed gauge document: {message}")]
    #[diagnostic(code(gaugeface::load::syntax))]
    Syntax {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("here")]
        span: SourceSpan,
    },

    #[error("invalid gauge document: {message}")]
    #[diagnostic(code(gaugeface::load::invalid))]
    Invalid {
        message: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("rejected here")]
        span: SourceSpan,
    },

    #[error("root object has type `{found}`, expected `GaugeFace`")]
    #[diagnostic(code(gaugeface::load::not_a_gauge_face))]
    NotAGaugeFace { found: String },

    #[error("document refers to unknown value `{name}`")]
    #[diagnostic(code(gaugeface::load::unknown_value))]
    UnknownValue {
        name: String,
        #[help]
        suggestion: Option<String>,
    },
}

impl LoadError {
    /// Classify a serde_json failure and attach the document source.
    pub fn from_json(err: serde_json::Error, ctx: &SourceContext) -> Self {
        let span = ctx.span_at(err.line(), err.column());
        let message = strip_position(&err.to_string());
        match err.classify() {
            serde_json::error::Category::Data => LoadError::Invalid {
                message,
                src: ctx.named_source(),
                span,
            },
            _ => LoadError::Syntax {
                message,
                src: ctx.named_source(),
                span,
            },
        }
    }
}

/// serde_json appends " at line X column Y"; the span already carries that.
fn strip_position(message: &str) -> String {
    match message.rfind(" at line ") {
        Some(index) => message[..index].to_string(),
        None => message.to_string(),
    }
}
