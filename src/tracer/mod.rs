//! Table tracing engine.
//!
//! `TableTracer` discovers tables in a source, collects their caption and
//! head eagerly and produces their rows lazily, one row per pull. The engine
//! is generic over a [`Backend`]: [`DomTableTracer`] walks a parsed
//! document, [`MarkupTableTracer`] scans a markup string. Both reach the same
//! acceptance, head and column decisions for equivalent markup.
//!
//! # Event order
//!
//! For each accepted table:
//!
//! 1. `TableBody`/`Start`
//! 2. `Caption`/`Start`, `Caption`/`End` (when a caption exists)
//! 3. `TableHead`/`Start`, `TableHead`/`End` (when a `<thead>` exists)
//! 4. `Row`/`Start` on the first pull of the table's rows
//! 5. one dataset per row
//! 6. `Row`/`End`, then `TableBody`/`End`, once rows are exhausted
//!
//! A table found in a collected cell is discovered on the spot (steps 1 to
//! 3). Its steps 4 to 6 run before the enclosing table's `Row`/`End`; the
//! rows it produces then are kept until pulled.
//!
//! A `TableHead`/`Start` listener may stop head inference; a `Row`/`Start`
//! listener may stop row production altogether.

mod backend;
mod dom_backend;
mod markup_backend;

pub use backend::Backend;
pub use dom_backend::{DomBackend, DomSource};
pub use markup_backend::MarkupBackend;

use std::collections::VecDeque;
use std::fmt;

use indexmap::IndexMap;
use log::{debug, trace};
use serde_json::Value;

use crate::columns::ColumnMapping;
use crate::encoding;
use crate::error::{Error, Result};
use crate::event::{Dispatcher, TracedEvent};
use crate::options::TraceOptions;
use crate::result::DiscoveredTable;
use crate::state::TraceState;
use crate::structure::{ColumnKey, Dataset, EventTiming, Structure, TableId};
use crate::transform::{RawUnit, Transformer, Transformers};

/// Tracer walking a parsed `dom_query` document.
pub type DomTableTracer<'a> = TableTracer<'a, DomBackend>;

/// Tracer scanning a markup string.
pub type MarkupTableTracer<'a> = TableTracer<'a, MarkupBackend>;

/// Decides whether a discovered table is traced.
pub type TargetPredicate<'a> = Box<dyn Fn(&RawUnit<'a>) -> bool + 'a>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    /// `Row`/`Start` has not fired yet.
    Pending,
    /// Rows are being produced.
    Rows,
    /// `Row`/`End` has fired.
    Done,
}

/// Lazy, forward-only position within one table's rows.
struct RowCursor<N> {
    body: N,
    rows: Vec<N>,
    next: usize,
    phase: Phase,
    /// Table whose cell held this one.
    parent: Option<TableId>,
    /// Rows produced while the parent finished, not yet pulled.
    buffered: VecDeque<Dataset>,
}

/// Discovers tables and traces their rows and columns.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::{dom, ColumnKey, DomTableTracer};
///
/// let doc = dom::parse(
///     "<table><caption>People</caption>\
///      <tr><th>Name</th><th>Age</th></tr>\
///      <tr><td>Ada</td><td>36</td></tr></table>",
///     false,
/// );
///
/// let mut tracer = DomTableTracer::new();
/// tracer.infer_table_from((&doc).into(), false)?;
///
/// let id = tracer.table_ids()[0];
/// assert_eq!(tracer.table_caption(id), Some("People"));
/// assert_eq!(tracer.table_head(id), Some(&["Name".to_string(), "Age".to_string()][..]));
///
/// let rows: Vec<_> = tracer.rows(id).collect::<Result<_, _>>()?;
/// assert_eq!(rows[0][&ColumnKey::Position(0)], "Ada");
/// # Ok::<(), rs_table_tracer::Error>(())
/// ```
pub struct TableTracer<'a, B: Backend<'a>> {
    backend: B,
    options: TraceOptions,
    state: TraceState,
    transformers: Transformers<'a>,
    dispatcher: Dispatcher<'a>,
    target: Option<TargetPredicate<'a>>,
    cursors: IndexMap<TableId, RowCursor<B::Node>>,
    accepted_in_run: usize,
    nested_under: Option<TableId>,
}

impl<'a, B: Backend<'a> + Default> TableTracer<'a, B> {
    /// Creates a tracer with default options.
    #[must_use]
    pub fn new() -> Self {
        Self::with_options(TraceOptions::default())
    }

    /// Creates a tracer with `options`.
    ///
    /// Backend support for `all_tables` is checked when tracing starts.
    #[must_use]
    pub fn with_options(options: TraceOptions) -> Self {
        Self {
            backend: B::default(),
            options,
            state: TraceState::default(),
            transformers: Transformers::default(),
            dispatcher: Dispatcher::default(),
            target: None,
            cursors: IndexMap::new(),
            accepted_in_run: 0,
            nested_under: None,
        }
    }
}

impl<'a, B: Backend<'a>> fmt::Debug for TableTracer<'a, B> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TableTracer")
            .field("options", &self.options)
            .field("state", &self.state)
            .field("cursors", &self.cursors.len())
            .finish_non_exhaustive()
    }
}

impl<'a, B: Backend<'a> + Default> Default for TableTracer<'a, B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a, B: Backend<'a>> TableTracer<'a, B> {
    // === Configuration ===

    /// Discovers every table, including tables nested in collected cells.
    ///
    /// Fails on backends that discover a single table per run.
    pub fn with_all_tables(&mut self, trace: bool) -> Result<&mut Self> {
        if trace && !self.backend.supports_all_tables() {
            return Err(all_tables_unsupported("with_all_tables"));
        }
        self.options.all_tables = trace;
        Ok(self)
    }

    /// Disables caption and/or head collection, events included.
    ///
    /// Replaces any previous exclusion set. Structures other than `Caption`
    /// and `TableHead` cannot be disabled and are ignored.
    pub fn trace_without(&mut self, structures: &[Structure]) -> &mut Self {
        self.options.excluded = structures.iter().copied().collect();
        self
    }

    /// Registers a transformer, replacing the one for the same structure.
    pub fn add_transformer(&mut self, transformer: Transformer<'a>) -> &mut Self {
        self.transformers.insert(transformer);
        self
    }

    /// Registers the listener for `(structure, timing)`, replacing any
    /// previous one.
    ///
    /// Fails for structures that do not dispatch events.
    pub fn add_event_listener(
        &mut self,
        structure: Structure,
        timing: EventTiming,
        listener: impl FnMut(&mut TracedEvent<'_, 'a>) -> Result<()> + 'a,
    ) -> Result<&mut Self> {
        self.dispatcher.insert(structure, timing, Box::new(listener))?;
        Ok(self)
    }

    /// Restricts tracing to tables accepted by `predicate`.
    ///
    /// Rejected tables are still searched for nested tables.
    pub fn with_target(&mut self, predicate: impl Fn(&RawUnit<'a>) -> bool + 'a) -> &mut Self {
        self.target = Some(Box::new(predicate));
        self
    }

    /// Current options.
    #[must_use]
    pub fn options(&self) -> &TraceOptions {
        &self.options
    }

    // === Tracing ===

    /// Discovers tables in `source`.
    ///
    /// Captions and heads are collected before this returns; rows are only
    /// produced when pulled through [`rows`](Self::rows) or
    /// [`table_data`](Self::table_data). Sources without a table holding at
    /// least one cell yield no tables and no error.
    pub fn infer_table_from(&mut self, source: B::Source, normalize: bool) -> Result<()> {
        if self.options.all_tables && !self.backend.supports_all_tables() {
            return Err(all_tables_unsupported("infer_table_from"));
        }
        let root = self.backend.open(source, normalize)?;
        self.discover_from(&root)
    }

    fn discover_from(&mut self, root: &B::Node) -> Result<()> {
        self.accepted_in_run = 0;
        let candidates = if self.backend.is_table(root) {
            vec![root.clone()]
        } else {
            self.backend.tables_in(root)
        };
        debug!("discovery started with {} candidate table(s)", candidates.len());
        self.discover(candidates)
    }

    fn should_trace_more(&self) -> bool {
        self.options.all_tables || self.accepted_in_run == 0
    }

    /// Depth-first discovery over `candidates`.
    fn discover(&mut self, candidates: Vec<B::Node>) -> Result<()> {
        for table in candidates {
            if !self.should_trace_more() {
                break;
            }
            if !self.trace_table(&table)? {
                let nested = self.backend.tables_in(&table);
                self.discover(nested)?;
            }
        }
        Ok(())
    }

    /// Accepts `table` if it is a target with a collectible body, then
    /// collects its caption and head. Returns whether it was accepted.
    fn trace_table(&mut self, table: &B::Node) -> Result<bool> {
        if let Some(target) = &self.target {
            if !target(&self.backend.unit(table)) {
                debug!("table skipped by target predicate");
                return Ok(false);
            }
        }

        let Some(body) = self.backend.body_of(table) else {
            debug!("table skipped: no body");
            return Ok(false);
        };
        let mut rows = self.backend.rows_of(&body);
        if !rows.iter().any(|row| self.has_column_cell(row)) {
            debug!("table skipped: body holds no column cell");
            return Ok(false);
        }

        let id = self.backend.table_id(table, &body);
        self.accepted_in_run += 1;
        self.state.register_table(id);
        self.state.set_current(Some(id));
        debug!("table {id} accepted with {} row(s)", rows.len());

        self.dispatch(Structure::TableBody, EventTiming::Start, &body)?;

        if self.options.traces(Structure::Caption) {
            if let Some(caption) = self.backend.caption_of(table) {
                self.trace_caption(id, &caption)?;
            }
        }

        let mut head_stopped = false;
        if self.options.traces(Structure::TableHead) {
            if let Some(head) = self.backend.head_of(table) {
                head_stopped = self.trace_head(id, &head)?;
            }

            if !head_stopped && self.state.table_head(id).is_none() {
                if let Some(first) = rows.first() {
                    if self.is_head_row(first) {
                        let first = first.clone();
                        if let Some(labels) = self.infer_head(id, &first)? {
                            debug!("table {id}: first body row detected as head");
                            self.state.set_head(id, labels);
                            rows.remove(0);
                        }
                    }
                }
            }
        }

        self.cursors.insert(
            id,
            RowCursor {
                body,
                rows,
                next: 0,
                phase: Phase::Pending,
                parent: self.nested_under,
                buffered: VecDeque::new(),
            },
        );
        Ok(true)
    }

    fn trace_caption(&mut self, id: TableId, caption: &B::Node) -> Result<()> {
        self.dispatch(Structure::Caption, EventTiming::Start, caption)?;

        let text = match self.transformers.caption() {
            Some(transform) => transform(&self.backend.unit(caption), &self.state)?,
            None => self.backend.text_of(caption),
        };
        self.state.set_caption(id, text);

        self.dispatch(Structure::Caption, EventTiming::End, caption)?;
        Ok(())
    }

    /// Traces the `<thead>`. Returns whether a listener stopped it.
    fn trace_head(&mut self, id: TableId, head: &B::Node) -> Result<bool> {
        let stopped = self.dispatch(Structure::TableHead, EventTiming::Start, head)?;

        if stopped {
            debug!("table {id}: head inference stopped by listener");
        } else {
            let row = self
                .backend
                .rows_of(head)
                .into_iter()
                .next()
                .unwrap_or_else(|| head.clone());
            if let Some(labels) = self.infer_head(id, &row)? {
                self.state.set_head(id, labels);
            }
        }

        self.dispatch(Structure::TableHead, EventTiming::End, head)?;
        Ok(stopped)
    }

    fn has_column_cell(&self, row: &B::Node) -> bool {
        self.backend
            .cells_of(row)
            .iter()
            .any(|cell| self.backend.is_column_cell(cell))
    }

    /// Whether every element of `row` is a head cell, with at least one.
    /// Comments do not count against it.
    fn is_head_row(&self, row: &B::Node) -> bool {
        let cells = self.backend.cells_of(row);
        let mut heads = 0;
        for cell in &cells {
            if self.backend.is_comment(cell) {
                continue;
            }
            if !self.backend.is_head_cell(cell) {
                return false;
            }
            heads += 1;
        }
        heads > 0
    }

    /// Labels of the cells of `row`, through the head cell transformer.
    fn infer_head(&mut self, id: TableId, row: &B::Node) -> Result<Option<Vec<String>>> {
        let cells: Vec<B::Node> = self
            .backend
            .cells_of(row)
            .into_iter()
            .filter(|cell| self.backend.is_column_cell(cell))
            .collect();
        if cells.is_empty() {
            return Ok(None);
        }

        let mut labels = Vec::with_capacity(cells.len());
        for (index, cell) in cells.iter().enumerate() {
            self.state.counters_mut(id).head_cell = Some(index + 1);
            let label = match self.transformers.head_cell() {
                Some(transform) => transform(&self.backend.unit(cell), &self.state),
                None => Ok(self.backend.text_of(cell)),
            };
            match label {
                Ok(label) => labels.push(label),
                Err(err) => {
                    self.state.counters_mut(id).head_cell = None;
                    return Err(err);
                }
            }
        }

        self.state.counters_mut(id).head_cell = None;
        Ok(Some(labels))
    }

    /// Fires `(structure, timing)` for `node`. Returns whether a listener
    /// stopped tracing.
    fn dispatch(&mut self, structure: Structure, timing: EventTiming, node: &B::Node) -> Result<bool> {
        let backend = &self.backend;
        self.dispatcher
            .dispatch(structure, timing, || backend.unit(node), &mut self.state)
    }

    // === Rows ===

    /// Lazy rows of `table_id`.
    ///
    /// The sequence is single-pass: rows already pulled are not produced
    /// again. Unknown ids yield nothing.
    pub fn rows(&mut self, table_id: TableId) -> Rows<'_, 'a, B> {
        Rows {
            tracer: self,
            table_id,
        }
    }

    /// Next row of `id`: a row buffered while its parent finished, or a
    /// freshly produced one.
    fn next_row(&mut self, id: TableId) -> Option<Result<Dataset>> {
        if let Some(dataset) = self.cursors.get_mut(&id)?.buffered.pop_front() {
            return Some(Ok(dataset));
        }
        self.produce_row(id)
    }

    /// Produces the next row of `id`, firing `Row` events around the rows.
    fn produce_row(&mut self, id: TableId) -> Option<Result<Dataset>> {
        loop {
            let cursor = self.cursors.get_mut(&id)?;
            match cursor.phase {
                Phase::Done => return None,
                Phase::Pending => {
                    cursor.phase = Phase::Rows;
                    let body = cursor.body.clone();
                    self.state.set_current(Some(id));
                    match self.dispatch(Structure::Row, EventTiming::Start, &body) {
                        Ok(false) => {}
                        Ok(true) => {
                            debug!("table {id}: rows stopped by listener");
                            if let Some(cursor) = self.cursors.get_mut(&id) {
                                cursor.next = cursor.rows.len();
                            }
                        }
                        Err(err) => {
                            if let Some(cursor) = self.cursors.get_mut(&id) {
                                cursor.phase = Phase::Done;
                            }
                            return Some(Err(err));
                        }
                    }
                }
                Phase::Rows => {
                    let Some(row) = cursor.rows.get(cursor.next).cloned() else {
                        cursor.phase = Phase::Done;
                        return self.finish(id).err().map(Err);
                    };
                    cursor.next += 1;
                    self.state.set_current(Some(id));
                    match self.infer_table_data_from(id, &row) {
                        Ok(Some(dataset)) => return Some(Ok(dataset)),
                        Ok(None) => {}
                        Err(err) => return Some(Err(err)),
                    }
                }
            }
        }
    }

    /// Clears the row counters and fires the terminal events of `id`.
    ///
    /// Tables nested in `id`'s cells run their own row lifecycle first; their
    /// rows are buffered for a later pull.
    fn finish(&mut self, id: TableId) -> Result<()> {
        let nested: Vec<TableId> = self
            .cursors
            .iter()
            .filter(|(_, cursor)| cursor.parent == Some(id) && cursor.phase != Phase::Done)
            .map(|(nested, _)| *nested)
            .collect();
        for nested in nested {
            self.buffer_rows(nested)?;
        }

        self.state.set_current(Some(id));
        self.state.counters_mut(id).end_rows();

        let Some(body) = self.cursors.get(&id).map(|cursor| cursor.body.clone()) else {
            return Ok(());
        };
        self.dispatch(Structure::Row, EventTiming::End, &body)?;
        self.dispatch(Structure::TableBody, EventTiming::End, &body)?;
        trace!("table {id}: rows exhausted");
        Ok(())
    }

    /// Produces every remaining row of `id` into its buffer.
    fn buffer_rows(&mut self, id: TableId) -> Result<()> {
        trace!("table {id}: finishing nested rows before parent ends");
        while let Some(dataset) = self.produce_row(id) {
            let dataset = dataset?;
            if let Some(cursor) = self.cursors.get_mut(&id) {
                cursor.buffered.push_back(dataset);
            }
        }
        Ok(())
    }

    /// Collects the cells of `row` into a dataset.
    ///
    /// Only `td`/`th` children take a position. Returns `None` for rows
    /// without any such cell; they are not counted.
    fn infer_table_data_from(&mut self, id: TableId, row: &B::Node) -> Result<Option<Dataset>> {
        let cells: Vec<B::Node> = self
            .backend
            .cells_of(row)
            .into_iter()
            .filter(|cell| self.backend.is_column_cell(cell))
            .collect();
        if cells.is_empty() {
            trace!("table {id}: row without cells skipped");
            return Ok(None);
        }

        let mapping = self.state.mapping(id);
        self.state.counters_mut(id).begin_row();

        let mut dataset = Dataset::new();
        for (position, cell) in cells.iter().enumerate() {
            if let Some(mapping) = mapping.as_deref() {
                if mapping.is_beyond(position) {
                    break;
                }
                if mapping.is_skipped(position) {
                    self.state.counters_mut(id).skipped += 1;
                    continue;
                }
            }

            let name = mapping
                .as_deref()
                .and_then(|mapping| mapping.name_at(position))
                .map(str::to_string);
            self.state.counters_mut(id).begin_column(name.clone());

            let value = match self.transformers.column() {
                Some(transform) => match transform(&self.backend.unit(cell), &self.state) {
                    Ok(value) => value,
                    Err(err) => {
                        self.state.counters_mut(id).end_columns();
                        return Err(err);
                    }
                },
                None => Value::String(self.backend.cell_value(cell)),
            };
            if value.is_null() {
                continue;
            }

            let nests = is_non_empty(&value) && self.should_trace_more();
            let key = name.map_or(ColumnKey::Position(position), ColumnKey::Name);
            dataset.insert(key, value);

            if nests && self.backend.contains_table(cell) {
                self.discover_nested(id, cell)?;
            }
        }

        self.state.counters_mut(id).column_name = None;

        if let Some(transform) = self.transformers.row() {
            dataset = transform(&self.backend.unit(row), dataset, &self.state)?;
        }

        trace!(
            "table {id}: row {} collected {} column(s)",
            self.state
                .current_iteration_count_of(Structure::Row, false)
                .unwrap_or_default(),
            dataset.len()
        );
        Ok(Some(dataset))
    }

    /// Discovers tables inside `cell` of table `parent`, restoring `parent`
    /// as the current table afterwards.
    fn discover_nested(&mut self, parent: TableId, cell: &B::Node) -> Result<()> {
        let nested = self.backend.tables_in(cell);
        trace!("table {parent}: descending into {} nested table(s)", nested.len());
        let outer = self.nested_under.replace(parent);
        let result = self.discover(nested);
        self.nested_under = outer;
        self.state.set_current(Some(parent));
        result
    }

    /// Drains every table's rows, in discovery order.
    ///
    /// Tables discovered while draining (nested in a collected cell) are
    /// drained too. Rows already pulled through [`rows`](Self::rows) are not
    /// produced again.
    pub fn table_data(&mut self) -> Result<IndexMap<TableId, Vec<Dataset>>> {
        let mut data = IndexMap::new();
        let mut index = 0;
        while let Some(id) = self.cursors.get_index(index).map(|(id, _)| *id) {
            let rows = self.rows(id).collect::<Result<Vec<_>>>()?;
            data.insert(id, rows);
            index += 1;
        }
        Ok(data)
    }

    /// Drains every table and pairs its rows with its caption and head.
    pub fn discovered_tables(&mut self) -> Result<Vec<DiscoveredTable>> {
        let data = self.table_data()?;
        Ok(data
            .into_iter()
            .map(|(id, rows)| DiscoveredTable {
                id,
                caption: self.state.table_caption(id).map(str::to_string),
                head: self.state.table_head(id).map(<[String]>::to_vec),
                rows,
            })
            .collect())
    }

    // === State ===

    /// Tracing state: ids, captions, heads, mappings and counters.
    #[must_use]
    pub fn state(&self) -> &TraceState {
        &self.state
    }

    /// Every discovered table id, in discovery order.
    #[must_use]
    pub fn table_ids(&self) -> &[TableId] {
        self.state.table_ids()
    }

    /// Table currently being traced.
    #[must_use]
    pub fn current_table_id(&self) -> Option<TableId> {
        self.state.current_table_id()
    }

    /// Column names declared for `table_id`.
    #[must_use]
    pub fn column_names(&self, table_id: TableId) -> &[String] {
        self.state.column_names(table_id)
    }

    /// Column mapping declared for `table_id`.
    #[must_use]
    pub fn column_mapping(&self, table_id: TableId) -> Option<&ColumnMapping> {
        self.state.column_mapping(table_id)
    }

    /// Caption of `table_id`.
    #[must_use]
    pub fn table_caption(&self, table_id: TableId) -> Option<&str> {
        self.state.table_caption(table_id)
    }

    /// Every collected caption.
    #[must_use]
    pub fn table_captions(&self) -> &IndexMap<TableId, String> {
        self.state.table_captions()
    }

    /// Head labels of `table_id`.
    #[must_use]
    pub fn table_head(&self, table_id: TableId) -> Option<&[String]> {
        self.state.table_head(table_id)
    }

    /// Every collected head.
    #[must_use]
    pub fn table_heads(&self) -> &IndexMap<TableId, Vec<String>> {
        self.state.table_heads()
    }

    /// See [`TraceState::current_column_name`].
    #[must_use]
    pub fn current_column_name(&self) -> Option<&str> {
        self.state.current_column_name()
    }

    /// See [`TraceState::current_iteration_count_of`].
    #[must_use]
    pub fn current_iteration_count_of(&self, structure: Structure, offset_inclusive: bool) -> Option<usize> {
        self.state.current_iteration_count_of(structure, offset_inclusive)
    }

    /// See [`TraceState::set_column_names`]. Outside a `Row`/`Start`
    /// listener this always fails.
    pub fn set_column_names<S: AsRef<str>>(
        &mut self,
        names: &[S],
        table_id: TableId,
        offsets: &[usize],
    ) -> Result<()> {
        self.state.set_column_names(names, table_id, offsets)
    }

    // === Reset ===

    /// Drops captions, heads, mappings and pending rows. Discovered ids are
    /// kept.
    pub fn reset_table_traced(&mut self) -> &mut Self {
        self.state.reset_traced();
        self.cursors.clear();
        self.accepted_in_run = 0;
        self.nested_under = None;
        self
    }

    /// Drops every transformer and listener.
    ///
    /// Rows not yet pulled are produced without them.
    pub fn reset_table_hooks(&mut self) -> &mut Self {
        self.transformers.clear();
        self.dispatcher.clear();
        self
    }
}

impl<'a> TableTracer<'a, MarkupBackend> {
    /// Discovers tables in markup bytes, decoding them with the charset
    /// declared in the document.
    pub fn infer_table_from_bytes(&mut self, bytes: &[u8], normalize: bool) -> Result<()> {
        if self.options.all_tables {
            return Err(all_tables_unsupported("infer_table_from_bytes"));
        }
        let root = MarkupBackend::open_owned(encoding::transcode_to_utf8(bytes), normalize);
        self.discover_from(&root)
    }
}

/// Lazy rows of one table. See [`TableTracer::rows`].
pub struct Rows<'t, 'a, B: Backend<'a>> {
    tracer: &'t mut TableTracer<'a, B>,
    table_id: TableId,
}

impl<'a, B: Backend<'a>> Rows<'_, 'a, B> {
    /// Table the rows belong to.
    #[must_use]
    pub fn table_id(&self) -> TableId {
        self.table_id
    }

    /// Tracing state, readable between rows.
    #[must_use]
    pub fn state(&self) -> &TraceState {
        &self.tracer.state
    }
}

impl<'a, B: Backend<'a>> Iterator for Rows<'_, 'a, B> {
    type Item = Result<Dataset>;

    fn next(&mut self) -> Option<Self::Item> {
        self.tracer.next_row(self.table_id)
    }
}

fn is_non_empty(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::String(text) => !text.is_empty(),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
        Value::Bool(_) | Value::Number(_) => true,
    }
}

fn all_tables_unsupported(method: &'static str) -> Error {
    Error::usage(
        method,
        "the markup backend traces a single table per run; \
         parse the source with dom::parse and use DomTableTracer to trace every table",
    )
}
