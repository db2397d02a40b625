//! Table structure kinds, event timings and identifiers.

use std::fmt;

use indexmap::IndexMap;
use serde::Serialize;

/// Parts of a table the tracer recognises.
///
/// Only some variants take part in event dispatch, and fewer still may stop
/// tracing. These are static properties of the variant, not configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Structure {
    /// `<thead>` section.
    TableHead,
    /// `<tbody>` section (or the table itself when no `<tbody>` exists).
    TableBody,
    /// `<caption>` element.
    Caption,
    /// A single header cell.
    HeadCell,
    /// A body row.
    Row,
    /// A body cell.
    Column,
}

impl Structure {
    /// Every variant, in declaration order.
    pub const ALL: [Self; 6] = [
        Self::TableHead,
        Self::TableBody,
        Self::Caption,
        Self::HeadCell,
        Self::Row,
        Self::Column,
    ];

    /// Whether listeners may be registered for this structure.
    #[must_use]
    pub const fn supports_event(self) -> bool {
        matches!(self, Self::TableHead | Self::TableBody | Self::Caption | Self::Row)
    }

    /// Whether a `Start` listener may stop tracing this structure.
    #[must_use]
    pub const fn supports_stop(self) -> bool {
        matches!(self, Self::TableHead | Self::Row)
    }

    /// Whether tracing of this structure can be disabled with `trace_without`.
    #[must_use]
    pub const fn is_optional(self) -> bool {
        matches!(self, Self::TableHead | Self::Caption)
    }

    /// Tag name the structure is read from.
    #[must_use]
    pub const fn tag(self) -> &'static str {
        match self {
            Self::TableHead => "thead",
            Self::TableBody => "tbody",
            Self::Caption => "caption",
            Self::HeadCell => "th",
            Self::Row => "tr",
            Self::Column => "td",
        }
    }
}

impl fmt::Display for Structure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::TableHead => "TableHead",
            Self::TableBody => "TableBody",
            Self::Caption => "Caption",
            Self::HeadCell => "HeadCell",
            Self::Row => "Row",
            Self::Column => "Column",
        };
        f.write_str(name)
    }
}

/// When an event fires relative to the structure's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum EventTiming {
    /// Before the content is consumed.
    Start,
    /// After the content is consumed.
    End,
}

impl fmt::Display for EventTiming {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Start => "Start",
            Self::End => "End",
        })
    }
}

/// Identifier of one discovered table within a tracing run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct TableId(u64);

impl TableId {
    /// Wraps a raw hash value.
    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    /// The raw hash value.
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:016x}", self.0)
    }
}

/// Key of a collected cell: the mapped column name, or its logical position
/// when no name covers that position.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(untagged)]
pub enum ColumnKey {
    /// Name declared through `set_column_names`.
    Name(String),
    /// Zero-based logical position (skipped non-cell nodes excluded).
    Position(usize),
}

impl ColumnKey {
    /// The name, if this key is one.
    #[must_use]
    pub fn as_name(&self) -> Option<&str> {
        match self {
            Self::Name(name) => Some(name),
            Self::Position(_) => None,
        }
    }
}

impl fmt::Display for ColumnKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Name(name) => f.write_str(name),
            Self::Position(position) => write!(f, "{position}"),
        }
    }
}

impl From<&str> for ColumnKey {
    fn from(name: &str) -> Self {
        Self::Name(name.to_string())
    }
}

impl From<usize> for ColumnKey {
    fn from(position: usize) -> Self {
        Self::Position(position)
    }
}

/// One row's collected cells in source order.
pub type Dataset = IndexMap<ColumnKey, serde_json::Value>;
