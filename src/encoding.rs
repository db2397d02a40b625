//! Character encoding detection and transcoding for byte sources.
//!
//! Scraped pages often arrive as raw bytes. The charset is read from meta
//! tags near the top of the document and the bytes are decoded to UTF-8
//! before either backend sees them.

use encoding_rs::{Encoding, UTF_8};
use log::debug;

use crate::patterns::{CHARSET_META, CONTENT_TYPE_CHARSET};

/// Number of leading bytes searched for a charset declaration.
const SNIFF_LEN: usize = 1024;

/// Detect character encoding from HTML bytes.
///
/// Looks for `<meta charset="...">`, then for the charset inside
/// `<meta http-equiv="Content-Type" content="...">`, within the first
/// 1024 bytes. Defaults to UTF-8.
#[must_use]
pub fn detect_encoding(html: &[u8]) -> &'static Encoding {
    let head = String::from_utf8_lossy(&html[..html.len().min(SNIFF_LEN)]);

    charset_label(&head)
        .and_then(|label| Encoding::for_label(label.as_bytes()))
        .unwrap_or(UTF_8)
}

/// Charset label declared in `head`, if any.
fn charset_label(head: &str) -> Option<String> {
    [&*CHARSET_META, &*CONTENT_TYPE_CHARSET]
        .into_iter()
        .find_map(|pattern| pattern.captures(head))
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().to_string())
}

/// Transcode HTML bytes to a UTF-8 string.
///
/// Invalid sequences are replaced with U+FFFD rather than failing.
///
/// # Examples
///
/// ```
/// use rs_table_tracer::encoding::transcode_to_utf8;
///
/// let html = b"<table><tr><td>Hello</td></tr></table>";
/// assert!(transcode_to_utf8(html).contains("Hello"));
/// ```
#[must_use]
pub fn transcode_to_utf8(html: &[u8]) -> String {
    let encoding = detect_encoding(html);

    if encoding == UTF_8 {
        return String::from_utf8_lossy(html).into_owned();
    }

    let (decoded, used, had_errors) = encoding.decode(html);
    if had_errors {
        debug!("decoding {} bytes as {} replaced invalid sequences", html.len(), used.name());
    }
    decoded.into_owned()
}
