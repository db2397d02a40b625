//! DOM Operations Adapter
//!
//! Thin helpers over the `dom_query` crate used by the DOM backend: parsing,
//! text access and the element predicates the tracer relies on (tag match,
//! attribute match, comment detection, cell classification).

// Re-export core types for external use
pub use dom_query::{Document, NodeRef, Selection};

pub use tendril::StrTendril;

use crate::encoding;
use crate::normalize;

// === Parsing ===

/// Parse HTML into a document, normalizing the markup first when asked.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::dom;
///
/// let doc = dom::parse("<table>\n <tr><td>a</td></tr>\n</table>", true);
/// assert_eq!(doc.select("td").text().to_string(), "a");
/// ```
#[must_use]
pub fn parse(html: &str, normalize: bool) -> Document {
    if normalize {
        Document::from(normalize::normalize(html).as_str())
    } else {
        Document::from(html)
    }
}

/// Parse HTML bytes, detecting the charset from meta tags.
#[must_use]
pub fn parse_bytes(html: &[u8], normalize: bool) -> Document {
    parse(&encoding::transcode_to_utf8(html), normalize)
}

// === Tag/Node Information ===

/// Get tag name (lowercase) of the first node in a selection
#[must_use]
pub fn tag_name(sel: &Selection) -> Option<String> {
    sel.nodes().first().and_then(node_tag)
}

/// Get tag name (lowercase) of a node; `None` for text and comments
#[must_use]
pub fn node_tag(node: &NodeRef) -> Option<String> {
    if !node.is_element() {
        return None;
    }
    node.node_name().map(|name| name.to_ascii_lowercase())
}

/// Get any attribute value
#[inline]
#[must_use]
pub fn get_attribute(sel: &Selection, name: &str) -> Option<String> {
    sel.attr(name).map(|s| s.to_string())
}

// === Text Content ===

/// Get all text content of node and descendants
///
/// Returns `StrTendril` for zero-copy passing.
#[inline]
#[must_use]
pub fn text_content(sel: &Selection) -> StrTendril {
    sel.text()
}

/// Get inner HTML content
#[inline]
#[must_use]
pub fn inner_html(sel: &Selection) -> StrTendril {
    sel.inner_html()
}

// === Tree Navigation ===

/// Element children of `node` with the given tag, in document order
#[must_use]
pub fn child_elements<'a>(node: &NodeRef<'a>, tag: &str) -> Vec<NodeRef<'a>> {
    node.children()
        .into_iter()
        .filter(|child| has_tag(child, tag))
        .collect()
}

/// Outermost `tag` elements below `node`, in document order
///
/// Once an element matches, its own descendants are not searched.
#[must_use]
pub fn outermost_descendants<'a>(node: &NodeRef<'a>, tag: &str) -> Vec<NodeRef<'a>> {
    let mut found = Vec::new();
    collect_outermost(node, tag, &mut found);
    found
}

fn collect_outermost<'a>(node: &NodeRef<'a>, tag: &str, found: &mut Vec<NodeRef<'a>>) {
    for child in node.children() {
        if !child.is_element() {
            continue;
        }
        if has_tag(&child, tag) {
            found.push(child);
        } else {
            collect_outermost(&child, tag, found);
        }
    }
}

// === Element Predicates ===

/// Whether `node` is an element named `tag` (case-insensitive)
#[must_use]
pub fn has_tag(node: &NodeRef, tag: &str) -> bool {
    node_tag(node).is_some_and(|name| name.eq_ignore_ascii_case(tag))
}

/// Whether attribute `name` of `sel` contains `needle`
#[must_use]
pub fn attr_contains(sel: &Selection, name: &str, needle: &str) -> bool {
    sel.attr(name).is_some_and(|value| value.contains(needle))
}

/// Whether `node` is a comment
#[inline]
#[must_use]
pub fn is_comment(node: &NodeRef) -> bool {
    node.is_comment()
}

/// Whether `node` is a `td` or `th` element
#[must_use]
pub fn is_column_cell(node: &NodeRef) -> bool {
    has_tag(node, "td") || has_tag(node, "th")
}

/// Whether `node` is a `th` element
#[must_use]
pub fn is_head_cell(node: &NodeRef) -> bool {
    has_tag(node, "th")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_and_tag_name() {
        let doc = parse(r#"<table id="t"><tr><td>x</td></tr></table>"#, false);
        let table = doc.select("table");

        assert_eq!(tag_name(&table), Some("table".to_string()));
        assert_eq!(get_attribute(&table, "id"), Some("t".to_string()));
    }

    #[test]
    fn test_parse_bytes_transcodes() {
        let doc = parse_bytes(
            b"<meta charset=\"ISO-8859-1\"><table><tr><td>Caf\xE9</td></tr></table>",
            false,
        );
        assert_eq!(text_content(&doc.select("td")).to_string(), "Café");
    }

    #[test]
    fn test_child_elements_skip_text_and_other_tags() {
        let doc = parse("<table><caption>c</caption><tbody><tr><td>1</td></tr></tbody></table>", false);
        let table = *doc.select("table").nodes().first().unwrap();

        let bodies = child_elements(&table, "tbody");
        assert_eq!(bodies.len(), 1);
        assert!(child_elements(&table, "thead").is_empty());
    }

    #[test]
    fn test_outermost_descendants_stop_at_match() {
        let doc = parse(
            "<div><table><tr><td><table><tr><td>in</td></tr></table></td></tr></table><table></table></div>",
            false,
        );
        let div = *doc.select("div").nodes().first().unwrap();

        let tables = outermost_descendants(&div, "table");
        assert_eq!(tables.len(), 2);
    }

    #[test]
    fn test_cell_predicates() {
        let doc = parse("<table><tr><!-- c --><th>h</th><td>d</td></tr></table>", false);
        let row = *doc.select("tr").nodes().first().unwrap();
        let children = row.children();

        assert!(is_comment(&children[0]));
        assert!(is_head_cell(&children[1]));
        assert!(is_column_cell(&children[1]));
        assert!(is_column_cell(&children[2]));
        assert!(!is_head_cell(&children[2]));
        assert!(!is_column_cell(&children[0]));
    }

    #[test]
    fn test_attr_contains() {
        let doc = parse(r#"<table class="data wide"></table>"#, false);
        let table = doc.select("table");

        assert!(attr_contains(&table, "class", "wide"));
        assert!(!attr_contains(&table, "class", "narrow"));
        assert!(!attr_contains(&table, "id", "x"));
    }

    #[test]
    fn test_operations_on_empty_selection() {
        let doc = parse("<div></div>", false);
        let missing = doc.select("table");

        assert_eq!(tag_name(&missing), None);
        assert!(text_content(&missing).is_empty());
    }
}
