//! Configuration options for table tracing.
//!
//! `TraceOptions` controls which tables are discovered and which optional
//! structures are collected. The tracer's builder methods write into the same
//! struct, so options can be set up front or adjusted before a run.

use std::collections::HashSet;

use crate::structure::Structure;

/// Configuration options for table tracing.
///
/// All fields are public for easy configuration. Use `Default::default()`
/// for standard settings.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::{Structure, TraceOptions};
///
/// let options = TraceOptions {
///     all_tables: true,
///     excluded: [Structure::Caption].into_iter().collect(),
///     ..TraceOptions::default()
/// };
/// assert!(options.traces(Structure::TableHead));
/// assert!(!options.traces(Structure::Caption));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TraceOptions {
    /// Discover every table, including tables nested inside collected cells.
    ///
    /// When `false`, discovery stops at the first accepted table. Only the
    /// DOM backend supports `true`.
    ///
    /// Default: `false`
    pub all_tables: bool,

    /// Structures whose data collection and events are disabled.
    ///
    /// Only `Caption` and `TableHead` can be disabled; other entries are
    /// ignored.
    ///
    /// Default: empty
    pub excluded: HashSet<Structure>,

    /// Normalize whitespace and non-breaking spaces in the source.
    ///
    /// Used by the one-call helpers; `infer_table_from` takes the flag
    /// directly.
    ///
    /// Default: `false`
    pub normalize: bool,
}

impl TraceOptions {
    /// Whether `structure` is collected under these options.
    #[must_use]
    pub fn traces(&self, structure: Structure) -> bool {
        !(structure.is_optional() && self.excluded.contains(&structure))
    }
}
