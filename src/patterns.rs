//! Compiled regex patterns for normalization and markup scanning.
//!
//! All patterns are compiled once on first use with `LazyLock`.

#![allow(clippy::expect_used)]

use std::sync::LazyLock;

use regex::Regex;

// =============================================================================
// Normalization Patterns
// =============================================================================

/// Matches HTML-encoded and literal non-breaking spaces.
pub static NON_BREAKING_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)&nbsp;|&#160;|&#x0*a0;|\x{00A0}").expect("NON_BREAKING_SPACE regex")
});

/// Matches control characters that are not ordinary whitespace.
pub static CONTROL_CHARS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[\x00-\x08\x0B\x0E-\x1F\x7F]").expect("CONTROL_CHARS regex")
});

/// Matches whitespace sitting between a closing `>` and the next `<`.
pub static WHITESPACE_BETWEEN_TAGS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r">\s+<").expect("WHITESPACE_BETWEEN_TAGS regex")
});

/// Matches runs of whitespace for collapsing.
pub static WHITESPACE_NORMALIZE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\s+").expect("WHITESPACE_NORMALIZE regex")
});

/// Matches any tag or comment, for stripping markup from text.
pub static ANY_TAG: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--.*?-->|</?[a-zA-Z][^>]*>").expect("ANY_TAG regex")
});

// =============================================================================
// Markup Scanning Patterns
// =============================================================================

/// Matches a comment, an opening tag or a closing tag.
///
/// Comments come first in the alternation so tags inside them are never
/// reported. Groups: 1 = comment body, 2 = `/` for closing tags,
/// 3 = tag name, 4 = raw attribute text.
pub static MARKUP_TOKEN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?s)<!--(.*?)-->|<(/)?([a-zA-Z][a-zA-Z0-9:-]*)([^>]*)>")
        .expect("MARKUP_TOKEN regex")
});

/// Matches one `name="value"`, `name='value'`, `name=value` or bare `name`
/// attribute. Groups: 1 = name, 2/3/4 = value by quoting style.
pub static ATTRIBUTE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"([^\s"'=<>/]+)(?:\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+)))?"#)
        .expect("ATTRIBUTE regex")
});

// =============================================================================
// Charset Detection Patterns
// =============================================================================

/// Matches `<meta charset="...">`.
pub static CHARSET_META: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+charset\s*=\s*["']?([^"'\s>;]+)"#).expect("CHARSET_META regex")
});

/// Matches the charset inside `<meta http-equiv="Content-Type" content="...">`.
pub static CONTENT_TYPE_CHARSET: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)<meta[^>]+http-equiv\s*=\s*["']?content-type["']?[^>]+content\s*=\s*["']?[^"'>]*;\s*charset\s*=\s*([^"'\s>]+)"#)
        .expect("CONTENT_TYPE_CHARSET regex")
});
