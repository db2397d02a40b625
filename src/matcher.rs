//! Structural matcher for the markup backend.
//!
//! Locates elements by tag name inside a markup string and reports each one
//! as a [`Fragment`]: the full match, its raw attribute text and its inner
//! content. Matching is balanced against nested elements of the same name,
//! so a `<td>` holding a whole nested table still ends at its own `</td>`.
//!
//! Fragments share the scanned source through an `Rc<str>`; cloning one is
//! cheap and nested fragments never copy markup.

use std::fmt;
use std::ops::Range;
use std::rc::Rc;

use crate::patterns::MARKUP_TOKEN;

/// Tags whose content is never searched unless they are the target.
pub const OPAQUE_TABLE: &[&str] = &["table"];

/// A matched element or comment within a markup source.
#[derive(Clone, PartialEq, Eq)]
pub struct Fragment {
    source: Rc<str>,
    tag: Box<str>,
    full: Range<usize>,
    inner: Range<usize>,
    attributes: Range<usize>,
    comment: bool,
}

impl Fragment {
    /// Wraps a whole markup string as a scope to search in.
    #[must_use]
    pub fn root(markup: impl Into<Rc<str>>) -> Self {
        let source: Rc<str> = markup.into();
        let len = source.len();
        Self {
            source,
            tag: Box::from(""),
            full: 0..len,
            inner: 0..len,
            attributes: 0..0,
            comment: false,
        }
    }

    /// Lowercase tag name; empty for comments and roots.
    #[must_use]
    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// The complete match, including the opening and closing tags.
    #[must_use]
    pub fn full(&self) -> &str {
        &self.source[self.full.clone()]
    }

    /// Raw attribute text of the opening tag, trimmed.
    #[must_use]
    pub fn attributes(&self) -> &str {
        self.source[self.attributes.clone()].trim()
    }

    /// Content between the opening and closing tags (or the comment body).
    #[must_use]
    pub fn inner(&self) -> &str {
        &self.source[self.inner.clone()]
    }

    /// Byte offset of the full match within the scanned source.
    #[must_use]
    pub fn start(&self) -> usize {
        self.full.start
    }

    /// Whether this fragment is a comment.
    #[must_use]
    pub fn is_comment(&self) -> bool {
        self.comment
    }

    /// The `(full, attributes, inner)` triple.
    #[must_use]
    pub fn triple(&self) -> (&str, &str, &str) {
        (self.full(), self.attributes(), self.inner())
    }

    /// Direct matches of `wanted` tags inside this fragment.
    ///
    /// Only top-level matches are reported: once an element is matched its
    /// content is not searched again. Elements named in `opaque` (and not
    /// wanted) are jumped over entirely. Comments are reported when
    /// `with_comments` is set.
    #[must_use]
    pub fn children(&self, wanted: &[&str], opaque: &[&str], with_comments: bool) -> Vec<Fragment> {
        let tokens = tokenize(&self.source, self.inner.clone());
        let mut found = Vec::new();
        let mut index = 0;

        while index < tokens.len() {
            let token = &tokens[index];
            match token.kind {
                TokenKind::Comment => {
                    if with_comments {
                        found.push(self.comment_from(token));
                    }
                    index += 1;
                }
                TokenKind::Open if wanted.contains(&token.name.as_str()) => {
                    match matching_close(&tokens, index) {
                        Some(close) => {
                            found.push(self.element_from(token, &tokens[close]));
                            index = close + 1;
                        }
                        None => index += 1,
                    }
                }
                TokenKind::Open if opaque.contains(&token.name.as_str()) => {
                    index = matching_close(&tokens, index).map_or(index + 1, |close| close + 1);
                }
                _ => index += 1,
            }
        }

        found
    }

    /// Whether a complete `tag` element exists anywhere inside this fragment.
    #[must_use]
    pub fn contains(&self, tag: &str) -> bool {
        let tokens = tokenize(&self.source, self.inner.clone());
        tokens
            .iter()
            .enumerate()
            .any(|(index, token)| {
                token.kind == TokenKind::Open
                    && token.name == tag
                    && matching_close(&tokens, index).is_some()
            })
    }

    fn element_from(&self, open: &Token, close: &Token) -> Fragment {
        let inner = if open.self_closing {
            open.range.end..open.range.end
        } else {
            open.range.end..close.range.start
        };
        Fragment {
            source: Rc::clone(&self.source),
            tag: open.name.clone().into_boxed_str(),
            full: open.range.start..close.range.end,
            inner,
            attributes: open.attributes.clone(),
            comment: false,
        }
    }

    fn comment_from(&self, token: &Token) -> Fragment {
        Fragment {
            source: Rc::clone(&self.source),
            tag: Box::from(""),
            full: token.range.clone(),
            inner: token.attributes.clone(),
            attributes: token.range.start..token.range.start,
            comment: true,
        }
    }
}

impl fmt::Debug for Fragment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fragment")
            .field("tag", &self.tag)
            .field("start", &self.full.start)
            .field("full", &self.full())
            .finish()
    }
}

/// First top-level `tag` element in `markup`.
///
/// Nested tables are not searched unless `tag` is `table` itself.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::matcher::find_first;
///
/// let row = find_first(r#"<tr class="odd"><td>1</td></tr>"#, "tr").unwrap();
/// assert_eq!(row.triple(), (r#"<tr class="odd"><td>1</td></tr>"#, r#"class="odd""#, "<td>1</td>"));
/// ```
#[must_use]
pub fn find_first(markup: &str, tag: &str) -> Option<Fragment> {
    find_all(markup, tag).into_iter().next()
}

/// Every top-level `tag` element in `markup`, in source order.
#[must_use]
pub fn find_all(markup: &str, tag: &str) -> Vec<Fragment> {
    let opaque: &[&str] = if tag == "table" { &[] } else { OPAQUE_TABLE };
    Fragment::root(markup).children(&[tag], opaque, false)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TokenKind {
    Open,
    Close,
    Comment,
}

#[derive(Debug)]
struct Token {
    kind: TokenKind,
    name: String,
    range: Range<usize>,
    // Attribute text for tags, body for comments.
    attributes: Range<usize>,
    self_closing: bool,
}

fn tokenize(source: &str, scope: Range<usize>) -> Vec<Token> {
    let base = scope.start;
    MARKUP_TOKEN
        .captures_iter(&source[scope])
        .filter_map(|caps| {
            let whole = caps.get(0)?;
            let range = base + whole.start()..base + whole.end();

            if let Some(body) = caps.get(1) {
                return Some(Token {
                    kind: TokenKind::Comment,
                    name: String::new(),
                    range,
                    attributes: base + body.start()..base + body.end(),
                    self_closing: false,
                });
            }

            let name = caps.get(3)?.as_str().to_ascii_lowercase();
            let attributes = caps.get(4).map_or(range.end..range.end, |m| {
                let text = m.as_str();
                let trimmed = text.trim_end().strip_suffix('/').unwrap_or(text);
                base + m.start()..base + m.start() + trimmed.len()
            });
            let self_closing = caps.get(4).is_some_and(|m| m.as_str().trim_end().ends_with('/'));
            let kind = if caps.get(2).is_some() {
                TokenKind::Close
            } else {
                TokenKind::Open
            };

            Some(Token {
                kind,
                name,
                range,
                attributes,
                self_closing,
            })
        })
        .collect()
}

/// Index of the token closing the element opened at `open`.
fn matching_close(tokens: &[Token], open: usize) -> Option<usize> {
    let opener = &tokens[open];
    if opener.self_closing {
        return Some(open);
    }

    let mut depth = 0usize;
    for (index, token) in tokens.iter().enumerate().skip(open) {
        if token.name != opener.name {
            continue;
        }
        match token.kind {
            TokenKind::Open if !token.self_closing => depth += 1,
            TokenKind::Close => {
                depth -= 1;
                if depth == 0 {
                    return Some(index);
                }
            }
            _ => {}
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_first_returns_triple() {
        let table = find_first("<div><TABLE id='t'><tr><td>x</td></tr></TABLE></div>", "table").unwrap();
        assert_eq!(table.tag(), "table");
        assert_eq!(table.attributes(), "id='t'");
        assert_eq!(table.inner(), "<tr><td>x</td></tr>");
        assert_eq!(table.start(), 5);
    }

    #[test]
    fn test_balanced_match_spans_nested_same_tag() {
        let html = "<table><tr><td><table><tr><td>in</td></tr></table></td></tr></table><p>after</p>";
        let tables = find_all(html, "table");
        assert_eq!(tables.len(), 1);
        assert!(tables[0].full().ends_with("</table></td></tr></table>"));
    }

    #[test]
    fn test_find_all_is_top_level_and_ordered() {
        let html = "<table><tr><td>1</td></tr></table><table><tr><td>2</td></tr></table>";
        let tables = find_all(html, "table");
        assert_eq!(tables.len(), 2);
        assert!(tables[1].inner().contains('2'));
    }

    #[test]
    fn test_nested_tables_are_opaque() {
        let html = "<tr><td><table><tr><td>deep</td></tr></table></td></tr>";
        let rows = find_all(html, "tr");
        assert_eq!(rows.len(), 1);

        let cells = rows[0].children(&["td", "th"], OPAQUE_TABLE, false);
        assert_eq!(cells.len(), 1);
        assert!(cells[0].contains("table"));
    }

    #[test]
    fn test_children_reports_comments_in_order() {
        let row = find_first("<tr><!-- note --><th>a</th><td>b</td></tr>", "tr").unwrap();
        let children = row.children(&["td", "th"], OPAQUE_TABLE, true);
        assert_eq!(children.len(), 3);
        assert!(children[0].is_comment());
        assert_eq!(children[0].inner(), " note ");
        assert_eq!(children[1].tag(), "th");
        assert_eq!(children[2].inner(), "b");
    }

    #[test]
    fn test_unclosed_element_is_not_matched() {
        assert!(find_first("<table><tr><td>x</td></tr>", "table").is_none());
    }

    #[test]
    fn test_self_closing_element_has_empty_inner() {
        let row = find_first("<tr><td/><td>b</td></tr>", "tr").unwrap();
        let cells = row.children(&["td"], OPAQUE_TABLE, false);
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].inner(), "");
        assert_eq!(cells[1].inner(), "b");
    }

    #[test]
    fn test_contains_requires_complete_element() {
        let cell = find_first("<td><table></td>", "td").unwrap();
        assert!(!cell.contains("table"));
    }
}
