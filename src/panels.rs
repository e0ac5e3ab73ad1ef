//! Editor property panels.
//!
//! Every model type describes its editable fields as data. A host UI walks the
//! returned [`Panel`]s and builds whatever widgets it likes; each [`Field`]
//! names the JSON property it edits, so reading and writing goes through the
//! document format rather than through per-type callbacks.

/// What kind of widget edits a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Number,
    Integer,
    Toggle,
    Text,
    /// A polymorphic [`Color`](crate::color::Color).
    Color,
    ColorTimeline,
    FillStroke,
    FillStrokeTimeline,
    /// One of a fixed list of labels, stored as its index.
    Choice(&'static [&'static str]),
    /// A value name picked from the catalog.
    ValuePicker,
    GaugeValue,
    TickList,
    /// The root level of a tick list.
    Tick,
    /// Up to `max` sub-tick levels.
    SubTicks { max: usize },
    /// Optional value labels for one tick level.
    TickLabels,
    /// A child element list.
    Elements,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: &'static str,
    /// JSON property the field reads and writes.
    pub property: &'static str,
    pub kind: FieldKind,
}

impl Field {
    pub const fn new(label: &'static str, property: &'static str, kind: FieldKind) -> Self {
        Field { label, property, kind }
    }

    pub const fn number(label: &'static str, property: &'static str) -> Self {
        Field::new(label, property, FieldKind::Number)
    }

    pub const fn integer(label: &'static str, property: &'static str) -> Self {
        Field::new(label, property, FieldKind::Integer)
    }

    pub const fn toggle(label: &'static str, property: &'static str) -> Self {
        Field::new(label, property, FieldKind::Toggle)
    }

    pub const fn choice(label: &'static str, property: &'static str, options: &'static [&'static str]) -> Self {
        Field::new(label, property, FieldKind::Choice(options))
    }
}

/// A horizontal group of fields.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub fields: Vec<Field>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct Panel {
    pub title: Option<&'static str>,
    pub rows: Vec<Row>,
}

impl Panel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn titled(title: &'static str) -> Self {
        Panel {
            title: Some(title),
            rows: Vec::new(),
        }
    }

    pub fn row(mut self, fields: impl IntoIterator<Item = Field>) -> Self {
        self.rows.push(Row {
            fields: fields.into_iter().collect(),
        });
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = &Field> {
        self.rows.iter().flat_map(|r| r.fields.iter())
    }
}

/// Option lists shared by several panels.
pub mod choices {
    pub const LENGTH_ALIGNMENT: &[&str] = &["Outer", "Center", "Inner"];
    pub const BOX_ALIGNMENT: &[&str] = &[
        "Top Left",
        "Top Center",
        "Top Right",
        "Middle Left",
        "Middle Center",
        "Middle Right",
        "Bottom Left",
        "Bottom Center",
        "Bottom Right",
    ];
    pub const ORIENTATION: &[&str] = &["Horizontal", "Vertical"];
    pub const COLOR_TYPES: &[&str] = &["StaticColor", "ValueColor", "CycleColor", "UserColor"];
    pub const USER_COLOR: &[&str] = &["Primary", "Accent", "Background"];
    pub const TICK_STYLE: &[&str] = &["Line", "Triangle", "Circle"];
}

/// A type with editable fields.
pub trait Inspect {
    fn panels(&self) -> Vec<Panel>;
}

/// Every field across `panels`, in display order.
pub fn properties(panels: &[Panel]) -> Vec<&'static str> {
    panels.iter().flat_map(|p| p.fields().map(|f| f.property)).collect()
}
