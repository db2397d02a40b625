//! Result types for tracing output.
//!
//! The tracer itself keeps rows behind lazy cursors. `DiscoveredTable` is the
//! eager snapshot returned by the one-call helpers in the crate root.

use serde::Serialize;

use crate::structure::{Dataset, TableId};

/// One traced table with every row collected.
///
/// Serializes with `serde` so callers can hand it to their own writers.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::trace_tables;
///
/// let tables = trace_tables("<table><tr><th>a</th></tr><tr><td>1</td></tr></table>")?;
/// let json = serde_json::to_value(&tables[0])?;
/// assert_eq!(json["head"], serde_json::json!(["a"]));
/// assert_eq!(json["rows"], serde_json::json!([{"0": "1"}]));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct DiscoveredTable {
    /// Identity of the table within its tracing run.
    pub id: TableId,

    /// Caption text, if the table has one and captions were traced.
    pub caption: Option<String>,

    /// Head labels, from `<thead>` or a detected head row.
    pub head: Option<Vec<String>>,

    /// Row datasets in source order.
    pub rows: Vec<Dataset>,
}

impl DiscoveredTable {
    /// Number of collected rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no row was collected.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
