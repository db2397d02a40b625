//! String-scanning backend over raw markup.

use crate::error::Result;
use crate::matcher::{Fragment, OPAQUE_TABLE};
use crate::normalize;
use crate::structure::TableId;
use crate::transform::RawUnit;

use super::backend::Backend;

/// Sections that never hold body rows.
const OPAQUE_SECTIONS: &[&str] = &["table", "thead", "tfoot", "caption"];

/// Backend scanning a markup string with the structural matcher.
///
/// The normalizer runs once over the whole markup before discovery. Cell
/// values are the trimmed inner markup of each cell; captions and head
/// labels have their tags stripped.
#[derive(Debug, Clone, Copy, Default)]
pub struct MarkupBackend;

impl MarkupBackend {
    /// Wraps owned markup as the discovery scope.
    pub(crate) fn open_owned(markup: String, normalize: bool) -> Fragment {
        if normalize {
            Fragment::root(normalize::normalize(&markup))
        } else {
            Fragment::root(markup)
        }
    }
}

impl<'a> Backend<'a> for MarkupBackend {
    type Source = &'a str;
    type Node = Fragment;

    fn open(&mut self, source: &'a str, normalize: bool) -> Result<Fragment> {
        Ok(Self::open_owned(source.to_string(), normalize))
    }

    fn supports_all_tables(&self) -> bool {
        false
    }

    fn is_table(&self, node: &Fragment) -> bool {
        node.tag() == "table"
    }

    fn tables_in(&self, scope: &Fragment) -> Vec<Fragment> {
        scope.children(&["table"], &[], false)
    }

    fn caption_of(&self, table: &Fragment) -> Option<Fragment> {
        table
            .children(&["caption"], OPAQUE_TABLE, false)
            .into_iter()
            .next()
    }

    fn head_of(&self, table: &Fragment) -> Option<Fragment> {
        table
            .children(&["thead"], OPAQUE_TABLE, false)
            .into_iter()
            .next()
    }

    fn body_of(&self, table: &Fragment) -> Option<Fragment> {
        let body = table
            .children(&["tbody"], OPAQUE_TABLE, false)
            .into_iter()
            .next();
        if body.is_some() {
            return body;
        }

        (!self.rows_of(table).is_empty()).then(|| table.clone())
    }

    fn rows_of(&self, section: &Fragment) -> Vec<Fragment> {
        section.children(&["tr"], OPAQUE_SECTIONS, false)
    }

    fn cells_of(&self, row: &Fragment) -> Vec<Fragment> {
        row.children(&["td", "th"], OPAQUE_TABLE, true)
    }

    fn is_comment(&self, node: &Fragment) -> bool {
        node.is_comment()
    }

    fn is_column_cell(&self, node: &Fragment) -> bool {
        matches!(node.tag(), "td" | "th")
    }

    fn is_head_cell(&self, node: &Fragment) -> bool {
        node.tag() == "th"
    }

    fn text_of(&self, node: &Fragment) -> String {
        normalize::strip_tags(node.inner())
    }

    fn cell_value(&self, node: &Fragment) -> String {
        node.inner().trim().to_string()
    }

    fn contains_table(&self, node: &Fragment) -> bool {
        node.contains("table")
    }

    fn table_id(&self, table: &Fragment, _body: &Fragment) -> TableId {
        TableId::new(fxhash::hash64(&(table.start(), table.full())))
    }

    fn unit(&self, node: &Fragment) -> RawUnit<'a> {
        RawUnit::MatchedText(node.clone())
    }
}
