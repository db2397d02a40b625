//! # rs-table-tracer
//!
//! Extracts structured tabular data (rows, columns, optional head and
//! caption) from HTML.
//!
//! Two backends share one tracing engine: [`DomTableTracer`] walks a document
//! parsed with `dom_query`, [`MarkupTableTracer`] scans a markup string
//! without building a tree. For the same table both make the same
//! acceptance, head and column decisions.
//!
//! ## Quick Start
//!
//! ```rust
//! use rs_table_tracer::{trace_tables, ColumnKey};
//!
//! let html = r#"<table>
//!     <caption>Prices</caption>
//!     <tr><th>Item</th><th>Price</th></tr>
//!     <tr><td>Tea</td><td>2.50</td></tr>
//! </table>"#;
//!
//! let tables = trace_tables(html)?;
//! assert_eq!(tables[0].caption.as_deref(), Some("Prices"));
//! assert_eq!(tables[0].rows[0][&ColumnKey::Position(1)], "2.50");
//! # Ok::<(), rs_table_tracer::Error>(())
//! ```
//!
//! ## Hooks
//!
//! - **Transformers** turn a caption, head cell, row or body cell into a
//!   value ([`Transformer`]). One per structure kind.
//! - **Event listeners** run at the `Start` and `End` of a structure
//!   ([`TracedEvent`]). A `Row`/`Start` listener is where column names are
//!   declared; `TableHead`/`Start` and `Row`/`Start` listeners may stop
//!   tracing.
//!
//! Rows are produced lazily: [`TableTracer::rows`] pulls one row at a time.

mod error;
mod options;
mod patterns;
mod result;
mod state;
mod structure;

/// DOM operations adapter over `dom_query`.
pub mod dom;

/// Character encoding detection and transcoding.
pub mod encoding;

/// Whitespace and markup normalization.
pub mod normalize;

/// Structural matcher used by the markup backend.
pub mod matcher;

/// Column name and skip offset resolution.
pub mod columns;

/// Transformer pipeline and the raw units handed to hooks.
pub mod transform;

/// Lifecycle events and listeners.
pub mod event;

/// The tracing engine and its backends.
pub mod tracer;

// Public API - re-exports
pub use columns::ColumnMapping;
pub use error::{Error, ErrorContext, Result};
pub use event::{Listener, TracedEvent};
pub use options::TraceOptions;
pub use result::DiscoveredTable;
pub use state::TraceState;
pub use structure::{ColumnKey, Dataset, EventTiming, Structure, TableId};
pub use tracer::{
    Backend, DomBackend, DomSource, DomTableTracer, MarkupBackend, MarkupTableTracer, Rows,
    TableTracer,
};
pub use transform::{RawUnit, Transformer};

/// Traces every table of an HTML document with the DOM backend.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::trace_tables;
///
/// let html = "<table><tr><td>1</td></tr></table><table><tr><td>2</td></tr></table>";
/// let tables = trace_tables(html)?;
/// assert_eq!(tables.len(), 2);
/// # Ok::<(), rs_table_tracer::Error>(())
/// ```
pub fn trace_tables(html: &str) -> Result<Vec<DiscoveredTable>> {
    let options = TraceOptions {
        all_tables: true,
        ..TraceOptions::default()
    };
    trace_tables_with_options(html, &options)
}

/// Traces tables of an HTML document with the DOM backend and custom
/// options.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::{trace_tables_with_options, Structure, TraceOptions};
///
/// let html = "<table><caption>Skip me</caption><tr><td>1</td></tr></table>";
/// let options = TraceOptions {
///     excluded: [Structure::Caption].into_iter().collect(),
///     ..TraceOptions::default()
/// };
/// let tables = trace_tables_with_options(html, &options)?;
/// assert_eq!(tables[0].caption, None);
/// # Ok::<(), rs_table_tracer::Error>(())
/// ```
pub fn trace_tables_with_options(html: &str, options: &TraceOptions) -> Result<Vec<DiscoveredTable>> {
    let document = dom::parse(html, options.normalize);
    let mut tracer = DomTableTracer::with_options(options.clone());
    tracer.infer_table_from(DomSource::Document(&document), false)?;
    let tables = tracer.discovered_tables()?;
    Ok(tables)
}

/// Traces the first table of a markup string with the markup backend.
///
/// Returns `None` when no table with at least one cell exists.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::{trace_markup_table, ColumnKey};
///
/// let table = trace_markup_table("<table><tr><td><b>1</b></td></tr></table>")?.unwrap();
/// assert_eq!(table.rows[0][&ColumnKey::Position(0)], "<b>1</b>");
/// # Ok::<(), rs_table_tracer::Error>(())
/// ```
pub fn trace_markup_table(html: &str) -> Result<Option<DiscoveredTable>> {
    let mut tracer = MarkupTableTracer::new();
    tracer.infer_table_from(html, false)?;
    let tables = tracer.discovered_tables()?;
    Ok(tables.into_iter().next())
}
