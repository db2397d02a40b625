//! Tree-walking backend over a `dom_query` document.

use crate::dom::{self, Document, NodeRef, Selection};
use crate::error::{Error, Result};
use crate::normalize;
use crate::structure::TableId;
use crate::transform::RawUnit;

use super::backend::Backend;

/// What the DOM backend traces: a whole document, or one `<table>` element.
#[derive(Clone)]
pub enum DomSource<'a> {
    /// Every table of the document is a candidate.
    Document(&'a Document),
    /// A single table. Anything other than a `<table>` element is rejected.
    Element(Selection<'a>),
}

impl<'a> From<&'a Document> for DomSource<'a> {
    fn from(document: &'a Document) -> Self {
        Self::Document(document)
    }
}

impl<'a> From<Selection<'a>> for DomSource<'a> {
    fn from(selection: Selection<'a>) -> Self {
        Self::Element(selection)
    }
}

/// Backend walking parsed DOM nodes.
///
/// The document is already parsed, so the `normalize` flag applies to every
/// text value extracted from it.
#[derive(Debug, Clone, Copy, Default)]
pub struct DomBackend {
    normalize: bool,
}

impl DomBackend {
    fn clean(&self, text: &str) -> String {
        if self.normalize {
            normalize::normalize(text)
        } else {
            normalize::collapse_whitespace(text)
        }
    }
}

impl<'a> Backend<'a> for DomBackend {
    type Source = DomSource<'a>;
    type Node = NodeRef<'a>;

    fn open(&mut self, source: DomSource<'a>, normalize: bool) -> Result<NodeRef<'a>> {
        self.normalize = normalize;
        match source {
            DomSource::Document(document) => Ok(document.root()),
            DomSource::Element(selection) => {
                let node = selection.nodes().first().copied().ok_or_else(|| {
                    Error::InvalidSource("the selection holds no element".to_string())
                })?;
                if dom::has_tag(&node, "table") {
                    Ok(node)
                } else {
                    let tag = dom::node_tag(&node).unwrap_or_else(|| "non-element node".to_string());
                    Err(Error::InvalidSource(format!(
                        "expected a <table> element, got <{tag}>"
                    )))
                }
            }
        }
    }

    fn supports_all_tables(&self) -> bool {
        true
    }

    fn is_table(&self, node: &NodeRef<'a>) -> bool {
        dom::has_tag(node, "table")
    }

    fn tables_in(&self, scope: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
        dom::outermost_descendants(scope, "table")
    }

    fn caption_of(&self, table: &NodeRef<'a>) -> Option<NodeRef<'a>> {
        dom::child_elements(table, "caption").into_iter().next()
    }

    fn head_of(&self, table: &NodeRef<'a>) -> Option<NodeRef<'a>> {
        dom::child_elements(table, "thead").into_iter().next()
    }

    fn body_of(&self, table: &NodeRef<'a>) -> Option<NodeRef<'a>> {
        dom::child_elements(table, "tbody")
            .into_iter()
            .next()
            .or_else(|| (!dom::child_elements(table, "tr").is_empty()).then_some(*table))
    }

    fn rows_of(&self, section: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
        dom::child_elements(section, "tr")
    }

    fn cells_of(&self, row: &NodeRef<'a>) -> Vec<NodeRef<'a>> {
        row.children()
            .into_iter()
            .filter(|child| child.is_element() || dom::is_comment(child))
            .collect()
    }

    fn is_comment(&self, node: &NodeRef<'a>) -> bool {
        dom::is_comment(node)
    }

    fn is_column_cell(&self, node: &NodeRef<'a>) -> bool {
        dom::is_column_cell(node)
    }

    fn is_head_cell(&self, node: &NodeRef<'a>) -> bool {
        dom::is_head_cell(node)
    }

    fn text_of(&self, node: &NodeRef<'a>) -> String {
        self.clean(&dom::text_content(&Selection::from(*node)))
    }

    fn cell_value(&self, node: &NodeRef<'a>) -> String {
        self.text_of(node)
    }

    fn contains_table(&self, node: &NodeRef<'a>) -> bool {
        !dom::outermost_descendants(node, "table").is_empty()
    }

    fn table_id(&self, table: &NodeRef<'a>, body: &NodeRef<'a>) -> TableId {
        TableId::new(fxhash::hash64(&(table.id, body.id)))
    }

    fn unit(&self, node: &NodeRef<'a>) -> RawUnit<'a> {
        RawUnit::Element(Selection::from(*node))
    }
}
