//! Tracing state shared with hooks.
//!
//! `TraceState` holds everything a tracing run has discovered so far: table
//! ids, captions, heads, column mappings and the per-table iteration
//! counters. Transformers receive it read-only; event listeners receive it
//! mutably through [`TracedEvent::tracer_mut`](crate::TracedEvent::tracer_mut).
//!
//! Counters are kept per `TableId`, so tracing a nested table never touches
//! the counters of the table whose cell contains it.

use std::collections::HashMap;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::columns::{self, ColumnMapping};
use crate::error::{Error, ErrorContext, Result};
use crate::structure::{EventTiming, Structure, TableId};

/// Iteration counters of one table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct IterationCounters {
    /// 1-based ordinal of the row being collected.
    pub(crate) row: Option<usize>,
    /// 1-based ordinal of the collected column, skipped offsets excluded.
    pub(crate) column: Option<usize>,
    /// Skipped offsets passed so far in the current row.
    pub(crate) skipped: usize,
    /// 1-based ordinal of the head cell being inferred.
    pub(crate) head_cell: Option<usize>,
    /// Name of the column being collected, if mapped.
    pub(crate) column_name: Option<String>,
}

impl IterationCounters {
    /// Starts a new row: advances the row ordinal and resets column state.
    pub(crate) fn begin_row(&mut self) {
        self.row = Some(self.row.map_or(1, |row| row + 1));
        self.column = None;
        self.skipped = 0;
        self.column_name = None;
    }

    /// Advances to the next collected column.
    pub(crate) fn begin_column(&mut self, name: Option<String>) {
        self.column = Some(self.column.map_or(1, |column| column + 1));
        self.column_name = name;
    }

    /// Clears column state when a row is abandoned mid-way.
    pub(crate) fn end_columns(&mut self) {
        self.column = None;
        self.skipped = 0;
        self.column_name = None;
    }

    /// Clears row and column state once every row was produced.
    pub(crate) fn end_rows(&mut self) {
        self.row = None;
        self.end_columns();
    }
}

/// Discovery results and iteration state of a tracing run.
#[derive(Debug, Default)]
pub struct TraceState {
    table_ids: Vec<TableId>,
    current: Option<TableId>,
    captions: IndexMap<TableId, String>,
    heads: IndexMap<TableId, Vec<String>>,
    mappings: HashMap<TableId, Rc<ColumnMapping>>,
    counters: HashMap<TableId, IterationCounters>,
    dispatching: Option<(Structure, EventTiming)>,
}

impl TraceState {
    /// Every table id discovered so far, in discovery order.
    ///
    /// Survives [`reset_table_traced`](crate::TableTracer::reset_table_traced).
    #[must_use]
    pub fn table_ids(&self) -> &[TableId] {
        &self.table_ids
    }

    /// Table currently being traced.
    ///
    /// Overwritten as discovery and iteration move between tables; read it
    /// within the callback that needs it.
    #[must_use]
    pub fn current_table_id(&self) -> Option<TableId> {
        self.current
    }

    /// Caption collected for `table_id`.
    #[must_use]
    pub fn table_caption(&self, table_id: TableId) -> Option<&str> {
        self.captions.get(&table_id).map(String::as_str)
    }

    /// Every collected caption, in discovery order.
    #[must_use]
    pub fn table_captions(&self) -> &IndexMap<TableId, String> {
        &self.captions
    }

    /// Head labels collected for `table_id`.
    #[must_use]
    pub fn table_head(&self, table_id: TableId) -> Option<&[String]> {
        self.heads.get(&table_id).map(Vec::as_slice)
    }

    /// Every collected head, in discovery order.
    #[must_use]
    pub fn table_heads(&self) -> &IndexMap<TableId, Vec<String>> {
        &self.heads
    }

    /// Column names declared for `table_id`; empty when none were.
    #[must_use]
    pub fn column_names(&self, table_id: TableId) -> &[String] {
        self.mappings
            .get(&table_id)
            .map(|mapping| mapping.names())
            .unwrap_or_default()
    }

    /// Column mapping declared for `table_id`.
    #[must_use]
    pub fn column_mapping(&self, table_id: TableId) -> Option<&ColumnMapping> {
        self.mappings.get(&table_id).map(Rc::as_ref)
    }

    /// Name of the column being collected in the current table.
    ///
    /// `None` outside of a named column and after the row ended.
    #[must_use]
    pub fn current_column_name(&self) -> Option<&str> {
        self.current_counters()?.column_name.as_deref()
    }

    /// Current ordinal of `structure` within the current table.
    ///
    /// Supported for `Row`, `Column` and `HeadCell`; `None` for anything else
    /// and once iteration of the structure has completed. Column ordinals
    /// exclude skipped offsets unless `offset_inclusive` is set.
    #[must_use]
    pub fn current_iteration_count_of(
        &self,
        structure: Structure,
        offset_inclusive: bool,
    ) -> Option<usize> {
        let counters = self.current_counters()?;
        match structure {
            Structure::Row => counters.row,
            Structure::HeadCell => counters.head_cell,
            Structure::Column if offset_inclusive => counters
                .column
                .map(|column| column + counters.skipped)
                .or((counters.skipped > 0).then_some(counters.skipped)),
            Structure::Column => counters.column,
            _ => None,
        }
    }

    /// Declares the column names of `table_id`.
    ///
    /// Names take sequential cell positions, jumping over `offsets`; see
    /// [`columns::resolve`]. Only allowed from a `Row`/`Start` listener.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_table_tracer::{dom, ColumnKey, DomTableTracer, EventTiming, Structure};
    ///
    /// let doc = dom::parse("<table><tr><td>Ada</td><td>x</td><td>36</td></tr></table>", false);
    /// let mut tracer = DomTableTracer::new();
    /// tracer.add_event_listener(Structure::Row, EventTiming::Start, |event| {
    ///     let id = event.table_id().unwrap_or_default();
    ///     event.tracer_mut().set_column_names(&["name", "age"], id, &[1])
    /// })?;
    /// tracer.infer_table_from((&doc).into(), false)?;
    ///
    /// let data = tracer.table_data()?;
    /// let row = &data[0][0];
    /// assert_eq!(row[&ColumnKey::from("name")], "Ada");
    /// assert_eq!(row[&ColumnKey::from("age")], "36");
    /// # Ok::<(), rs_table_tracer::Error>(())
    /// ```
    pub fn set_column_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
        table_id: TableId,
        offsets: &[usize],
    ) -> Result<()> {
        self.set_column_mapping(table_id, columns::resolve(names, offsets))
    }

    /// Declares a prepared mapping for `table_id`, e.g. one built with
    /// [`ColumnMapping::subset`]. Same restrictions as
    /// [`set_column_names`](Self::set_column_names).
    pub fn set_column_mapping(&mut self, table_id: TableId, mapping: ColumnMapping) -> Result<()> {
        if !self.is_dispatching(Structure::Row, EventTiming::Start) {
            return Err(Error::usage(
                "set_column_names",
                "column names can only be declared from a Row/Start event listener; \
                 register one with add_event_listener(Structure::Row, EventTiming::Start, ..)",
            ));
        }

        self.mappings.insert(table_id, Rc::new(mapping));
        Ok(())
    }

    /// Position of the current table, row and column, for error reporting.
    #[must_use]
    pub fn error_context(&self) -> ErrorContext {
        let counters = self.current_counters();
        ErrorContext {
            table_id: self.current,
            row: counters.and_then(|c| c.row),
            column: counters.and_then(|c| c.column),
            column_name: counters.and_then(|c| c.column_name.clone()),
        }
    }

    /// Whether the `(structure, timing)` event is being dispatched.
    #[must_use]
    pub fn is_dispatching(&self, structure: Structure, timing: EventTiming) -> bool {
        self.dispatching == Some((structure, timing))
    }

    fn current_counters(&self) -> Option<&IterationCounters> {
        self.counters.get(&self.current?)
    }

    pub(crate) fn begin_dispatch(&mut self, structure: Structure, timing: EventTiming) {
        self.dispatching = Some((structure, timing));
    }

    pub(crate) fn end_dispatch(&mut self) {
        self.dispatching = None;
    }

    /// Records `table_id` as discovered. Returns `false` if it already was.
    pub(crate) fn register_table(&mut self, table_id: TableId) -> bool {
        self.counters.entry(table_id).or_default();
        if self.table_ids.contains(&table_id) {
            return false;
        }
        self.table_ids.push(table_id);
        true
    }

    pub(crate) fn set_current(&mut self, table_id: Option<TableId>) {
        self.current = table_id;
    }

    pub(crate) fn set_caption(&mut self, table_id: TableId, caption: String) {
        self.captions.insert(table_id, caption);
    }

    pub(crate) fn set_head(&mut self, table_id: TableId, head: Vec<String>) {
        self.heads.insert(table_id, head);
    }

    pub(crate) fn mapping(&self, table_id: TableId) -> Option<Rc<ColumnMapping>> {
        self.mappings.get(&table_id).cloned()
    }

    pub(crate) fn counters_mut(&mut self, table_id: TableId) -> &mut IterationCounters {
        self.counters.entry(table_id).or_default()
    }

    /// Drops collected data and counters; discovered ids are kept.
    pub(crate) fn reset_traced(&mut self) {
        self.current = None;
        self.captions.clear();
        self.heads.clear();
        self.mappings.clear();
        self.counters.clear();
        self.dispatching = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ID: TableId = TableId::new(7);

    fn state_with_table() -> TraceState {
        let mut state = TraceState::default();
        state.register_table(ID);
        state.set_current(Some(ID));
        state
    }

    #[test]
    fn test_set_column_names_outside_row_start_fails() {
        let mut state = state_with_table();
        let err = state.set_column_names(&["a"], ID, &[]).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("Row"));
        assert!(message.contains("Start"));

        state.begin_dispatch(Structure::Caption, EventTiming::Start);
        assert!(state.set_column_names(&["a"], ID, &[]).is_err());
    }

    #[test]
    fn test_set_column_names_during_row_start() {
        let mut state = state_with_table();
        state.begin_dispatch(Structure::Row, EventTiming::Start);
        state.set_column_names(&["a", "b"], ID, &[1]).unwrap();
        state.end_dispatch();

        assert_eq!(state.column_names(ID), ["a", "b"]);
        assert_eq!(state.column_mapping(ID).unwrap().name_at(2), Some("b"));
    }

    #[test]
    fn test_column_counts_with_and_without_offsets() {
        let mut state = state_with_table();
        let counters = state.counters_mut(ID);
        counters.begin_row();
        counters.skipped = 1;
        counters.begin_column(Some("b".to_string()));

        assert_eq!(state.current_iteration_count_of(Structure::Row, false), Some(1));
        assert_eq!(state.current_iteration_count_of(Structure::Column, false), Some(1));
        assert_eq!(state.current_iteration_count_of(Structure::Column, true), Some(2));
        assert_eq!(state.current_column_name(), Some("b"));
        assert_eq!(state.current_iteration_count_of(Structure::Caption, false), None);

        state.counters_mut(ID).end_rows();
        assert_eq!(state.current_iteration_count_of(Structure::Row, false), None);
        assert_eq!(state.current_column_name(), None);
    }

    #[test]
    fn test_counters_are_scoped_per_table() {
        let nested = TableId::new(8);
        let mut state = state_with_table();
        state.counters_mut(ID).begin_row();
        state.counters_mut(ID).begin_column(None);

        state.register_table(nested);
        state.set_current(Some(nested));
        for _ in 0..3 {
            state.counters_mut(nested).begin_column(None);
        }
        assert_eq!(state.current_iteration_count_of(Structure::Column, false), Some(3));

        state.set_current(Some(ID));
        assert_eq!(state.current_iteration_count_of(Structure::Column, false), Some(1));
    }

    #[test]
    fn test_register_table_does_not_duplicate_ids() {
        let mut state = TraceState::default();
        assert!(state.register_table(ID));
        assert!(!state.register_table(ID));
        assert_eq!(state.table_ids(), [ID]);
    }

    #[test]
    fn test_reset_keeps_ids_only() {
        let mut state = state_with_table();
        state.set_caption(ID, "Caption".to_string());
        state.set_head(ID, vec!["a".to_string()]);
        state.reset_traced();

        assert_eq!(state.table_ids(), [ID]);
        assert_eq!(state.current_table_id(), None);
        assert!(state.table_captions().is_empty());
        assert!(state.table_head(ID).is_none());
        assert!(state.column_names(ID).is_empty());
    }

    #[test]
    fn test_error_context_reports_position() {
        let mut state = state_with_table();
        state.counters_mut(ID).begin_row();
        state.counters_mut(ID).begin_column(Some("price".to_string()));

        let context = state.error_context();
        assert_eq!(context.table_id, Some(ID));
        assert_eq!(context.row, Some(1));
        assert_eq!(context.column, Some(1));
        assert_eq!(context.column_name.as_deref(), Some("price"));
    }
}
