//! Transformer pipeline.
//!
//! A transformer turns one raw matched unit (a DOM element or a matched
//! markup fragment) into an application value. The tracer holds at most one
//! transformer per structure kind; the variant of [`Transformer`] decides the
//! kind it is registered for.

use std::collections::HashMap;
use std::fmt;

use serde_json::Value;

use crate::dom::{self, Selection};
use crate::error::{Error, Result};
use crate::matcher::Fragment;
use crate::normalize;
use crate::patterns::ATTRIBUTE;
use crate::state::TraceState;
use crate::structure::{Dataset, Structure};

/// A unit handed to transformers, listeners and the target predicate.
#[derive(Clone)]
pub enum RawUnit<'a> {
    /// Element handle from the DOM backend.
    Element(Selection<'a>),
    /// Matched fragment from the markup backend.
    MatchedText(Fragment),
}

impl<'a> RawUnit<'a> {
    /// Lowercase tag name.
    #[must_use]
    pub fn tag_name(&self) -> Option<String> {
        match self {
            Self::Element(sel) => dom::tag_name(sel),
            Self::MatchedText(fragment) => {
                (!fragment.tag().is_empty()).then(|| fragment.tag().to_string())
            }
        }
    }

    /// Text with markup removed and whitespace collapsed.
    #[must_use]
    pub fn text(&self) -> String {
        match self {
            Self::Element(sel) => normalize::collapse_whitespace(&dom::text_content(sel)),
            Self::MatchedText(fragment) => normalize::strip_tags(fragment.inner()),
        }
    }

    /// Inner markup.
    #[must_use]
    pub fn inner_markup(&self) -> String {
        match self {
            Self::Element(sel) => dom::inner_html(sel).to_string(),
            Self::MatchedText(fragment) => fragment.inner().to_string(),
        }
    }

    /// Attribute value; bare attributes yield an empty string.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<String> {
        match self {
            Self::Element(sel) => dom::get_attribute(sel, name),
            Self::MatchedText(fragment) => ATTRIBUTE
                .captures_iter(fragment.attributes())
                .find(|caps| caps[1].eq_ignore_ascii_case(name))
                .map(|caps| {
                    caps.get(2)
                        .or_else(|| caps.get(3))
                        .or_else(|| caps.get(4))
                        .map_or_else(String::new, |m| m.as_str().to_string())
                }),
        }
    }

    /// Whether attribute `name` is present and contains `needle`.
    ///
    /// Handy in target predicates:
    ///
    /// ```rust
    /// use rs_table_tracer::MarkupTableTracer;
    ///
    /// let html = "<table class=\"nav\"><tr><td>menu</td></tr></table>\
    ///             <table class=\"stats wide\"><tr><td>42</td></tr></table>";
    /// let mut tracer = MarkupTableTracer::new();
    /// tracer.with_target(|unit| unit.attr_contains("class", "stats"));
    /// tracer.infer_table_from(html, false)?;
    /// assert_eq!(tracer.table_data()?[0].len(), 1);
    /// # Ok::<(), rs_table_tracer::Error>(())
    /// ```
    #[must_use]
    pub fn attr_contains(&self, name: &str, needle: &str) -> bool {
        match self {
            Self::Element(sel) => dom::attr_contains(sel, name, needle),
            Self::MatchedText(_) => self.attr(name).is_some_and(|value| value.contains(needle)),
        }
    }

    /// The DOM element, when traced by the DOM backend.
    #[must_use]
    pub fn as_element(&self) -> Option<&Selection<'a>> {
        match self {
            Self::Element(sel) => Some(sel),
            Self::MatchedText(_) => None,
        }
    }

    /// The matched fragment, when traced by the markup backend.
    #[must_use]
    pub fn as_fragment(&self) -> Option<&Fragment> {
        match self {
            Self::Element(_) => None,
            Self::MatchedText(fragment) => Some(fragment),
        }
    }
}

impl fmt::Debug for RawUnit<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Element(sel) => f
                .debug_tuple("Element")
                .field(&dom::tag_name(sel).unwrap_or_default())
                .finish(),
            Self::MatchedText(fragment) => f.debug_tuple("MatchedText").field(fragment).finish(),
        }
    }
}

/// Turns a caption or head cell into its label.
pub type TextTransform<'a> = Box<dyn Fn(&RawUnit<'a>, &TraceState) -> Result<String> + 'a>;

/// Post-processes a row's collected cells.
pub type RowTransform<'a> = Box<dyn Fn(&RawUnit<'a>, Dataset, &TraceState) -> Result<Dataset> + 'a>;

/// Turns a body cell into its value. `Value::Null` omits the cell.
pub type ColumnTransform<'a> = Box<dyn Fn(&RawUnit<'a>, &TraceState) -> Result<Value> + 'a>;

/// A transformer for one structure kind.
pub enum Transformer<'a> {
    /// Receives the `<caption>`.
    Caption(TextTransform<'a>),
    /// Receives each header cell.
    HeadCell(TextTransform<'a>),
    /// Receives the `<tr>` and the cells collected from it.
    Row(RowTransform<'a>),
    /// Receives each collected body cell.
    Column(ColumnTransform<'a>),
}

impl<'a> Transformer<'a> {
    /// Caption transformer.
    pub fn caption(f: impl Fn(&RawUnit<'a>, &TraceState) -> Result<String> + 'a) -> Self {
        Self::Caption(Box::new(f))
    }

    /// Head cell transformer.
    pub fn head_cell(f: impl Fn(&RawUnit<'a>, &TraceState) -> Result<String> + 'a) -> Self {
        Self::HeadCell(Box::new(f))
    }

    /// Row transformer.
    pub fn row(f: impl Fn(&RawUnit<'a>, Dataset, &TraceState) -> Result<Dataset> + 'a) -> Self {
        Self::Row(Box::new(f))
    }

    /// Column transformer.
    pub fn column(f: impl Fn(&RawUnit<'a>, &TraceState) -> Result<Value> + 'a) -> Self {
        Self::Column(Box::new(f))
    }

    /// Structure this transformer is registered for.
    #[must_use]
    pub fn structure(&self) -> Structure {
        match self {
            Self::Caption(_) => Structure::Caption,
            Self::HeadCell(_) => Structure::HeadCell,
            Self::Row(_) => Structure::Row,
            Self::Column(_) => Structure::Column,
        }
    }
}

impl fmt::Debug for Transformer<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Transformer({})", self.structure())
    }
}

/// Row transformer failing when a row did not collect exactly `expected`
/// cells.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::{transform, DomTableTracer, Error, dom};
///
/// let doc = dom::parse("<table><tr><td>1</td><td>2</td></tr></table>", false);
/// let mut tracer = DomTableTracer::new();
/// tracer.add_transformer(transform::expect_column_count(3));
/// tracer.infer_table_from((&doc).into(), false)?;
///
/// let err = tracer.table_data().unwrap_err();
/// assert!(matches!(err, Error::ColumnCountMismatch { expected: 3, actual: 2, .. }));
/// # Ok::<(), Error>(())
/// ```
#[must_use]
pub fn expect_column_count<'a>(expected: usize) -> Transformer<'a> {
    Transformer::row(move |_row, dataset, state| {
        if dataset.len() == expected {
            Ok(dataset)
        } else {
            Err(Error::ColumnCountMismatch {
                expected,
                actual: dataset.len(),
                context: state.error_context(),
            })
        }
    })
}

/// The transformer slots, one per structure kind.
#[derive(Default)]
pub(crate) struct Transformers<'a> {
    slots: HashMap<Structure, Transformer<'a>>,
}

impl<'a> Transformers<'a> {
    /// Stores `transformer`, replacing any previous one for its structure.
    pub(crate) fn insert(&mut self, transformer: Transformer<'a>) {
        self.slots.insert(transformer.structure(), transformer);
    }

    pub(crate) fn clear(&mut self) {
        self.slots.clear();
    }

    pub(crate) fn caption(&self) -> Option<&TextTransform<'a>> {
        match self.slots.get(&Structure::Caption) {
            Some(Transformer::Caption(f)) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn head_cell(&self) -> Option<&TextTransform<'a>> {
        match self.slots.get(&Structure::HeadCell) {
            Some(Transformer::HeadCell(f)) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn row(&self) -> Option<&RowTransform<'a>> {
        match self.slots.get(&Structure::Row) {
            Some(Transformer::Row(f)) => Some(f),
            _ => None,
        }
    }

    pub(crate) fn column(&self) -> Option<&ColumnTransform<'a>> {
        match self.slots.get(&Structure::Column) {
            Some(Transformer::Column(f)) => Some(f),
            _ => None,
        }
    }
}
