//! Whitespace and markup normalization.

use html_escape::decode_html_entities;

use crate::patterns::{
    ANY_TAG, CONTROL_CHARS, NON_BREAKING_SPACE, WHITESPACE_BETWEEN_TAGS, WHITESPACE_NORMALIZE,
};

/// Normalizes markup or text content.
///
/// Non-breaking spaces (encoded or literal) become plain spaces, stray control
/// characters are dropped, whitespace between tags is removed and remaining
/// whitespace runs collapse to a single space. The result is trimmed.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::normalize::normalize;
///
/// let html = "<tr>\n  <td>a&nbsp;  b</td>\n</tr>";
/// assert_eq!(normalize(html), "<tr><td>a b</td></tr>");
/// ```
#[must_use]
pub fn normalize(text: &str) -> String {
    let text = NON_BREAKING_SPACE.replace_all(text, " ");
    let text = CONTROL_CHARS.replace_all(&text, "");
    let text = WHITESPACE_BETWEEN_TAGS.replace_all(&text, "><");
    let text = WHITESPACE_NORMALIZE.replace_all(&text, " ");
    text.trim().to_string()
}

/// Collapses whitespace runs without touching markup.
#[must_use]
pub fn collapse_whitespace(text: &str) -> String {
    WHITESPACE_NORMALIZE.replace_all(text, " ").trim().to_string()
}

/// Removes every tag and comment, decodes entities, then collapses
/// whitespace.
///
/// Used to compare string-backend cell values (raw inner markup) with
/// DOM-backend values (text content).
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::normalize::strip_tags;
///
/// assert_eq!(strip_tags("<b>R&amp;D</b> &lt;2%"), "R&D <2%");
/// ```
#[must_use]
pub fn strip_tags(markup: &str) -> String {
    let text = ANY_TAG.replace_all(markup, "");
    collapse_whitespace(&decode_html_entities(&text))
}
