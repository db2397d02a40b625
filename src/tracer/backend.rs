//! The seam between the tracing engine and a concrete source representation.

use crate::error::Result;
use crate::structure::TableId;
use crate::transform::RawUnit;

/// Structural queries the tracing engine needs from a source.
///
/// A backend owns how nodes are represented and located. The engine only
/// ever asks for direct structural children (caption, head, body, rows,
/// cells), so both backends reach the same acceptance, head and column
/// decisions for equivalent markup.
pub trait Backend<'a> {
    /// What `infer_table_from` accepts.
    type Source;

    /// A located element (or comment) within the source.
    type Node: Clone;

    /// Prepares `source` for discovery and returns the scope to search.
    ///
    /// The scope is either a table itself or something containing tables.
    fn open(&mut self, source: Self::Source, normalize: bool) -> Result<Self::Node>;

    /// Whether every table of a source can be discovered in one run.
    fn supports_all_tables(&self) -> bool;

    /// Whether `node` is a `<table>` element.
    fn is_table(&self, node: &Self::Node) -> bool;

    /// Outermost tables below `scope` (excluding `scope`), in source order.
    fn tables_in(&self, scope: &Self::Node) -> Vec<Self::Node>;

    /// The table's own `<caption>`.
    fn caption_of(&self, table: &Self::Node) -> Option<Self::Node>;

    /// The table's own `<thead>`.
    fn head_of(&self, table: &Self::Node) -> Option<Self::Node>;

    /// The table's body: its first `<tbody>`, or the table itself when rows
    /// sit directly inside it.
    fn body_of(&self, table: &Self::Node) -> Option<Self::Node>;

    /// Rows directly inside `section`.
    fn rows_of(&self, section: &Self::Node) -> Vec<Self::Node>;

    /// Element and comment children of `row`, in source order.
    fn cells_of(&self, row: &Self::Node) -> Vec<Self::Node>;

    /// Whether `node` is a comment.
    fn is_comment(&self, node: &Self::Node) -> bool;

    /// Whether `node` is a `td` or `th` element.
    fn is_column_cell(&self, node: &Self::Node) -> bool;

    /// Whether `node` is a `th` element.
    fn is_head_cell(&self, node: &Self::Node) -> bool;

    /// Plain text of a caption or head cell.
    fn text_of(&self, node: &Self::Node) -> String;

    /// Default value of a body cell when no column transformer is set.
    fn cell_value(&self, node: &Self::Node) -> String;

    /// Whether a complete table exists inside `node`.
    fn contains_table(&self, node: &Self::Node) -> bool;

    /// Identity of a table paired with its body.
    fn table_id(&self, table: &Self::Node, body: &Self::Node) -> TableId;

    /// The unit handed to hooks for `node`.
    fn unit(&self, node: &Self::Node) -> RawUnit<'a>;
}
