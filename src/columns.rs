//! Column index resolution.
//!
//! Maps physical cell positions to logical column names, given the names in
//! order and the positions to skip.

use std::collections::{BTreeMap, BTreeSet};

/// Physical-to-logical column mapping for one table.
///
/// Positions are logical cell positions: only `td`/`th` children of a row are
/// counted. Positions greater than [`highest_mappable_position`] are never
/// collected.
///
/// [`highest_mappable_position`]: ColumnMapping::highest_mappable_position
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMapping {
    names: Vec<String>,
    positions: BTreeMap<usize, String>,
    skip_offsets: BTreeSet<usize>,
    highest: Option<usize>,
}

impl ColumnMapping {
    /// Names in the order they were declared.
    #[must_use]
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Name mapped to `position`, if any.
    #[must_use]
    pub fn name_at(&self, position: usize) -> Option<&str> {
        self.positions.get(&position).map(String::as_str)
    }

    /// Position `name` is mapped to, if it was declared.
    #[must_use]
    pub fn position_of(&self, name: &str) -> Option<usize> {
        self.positions
            .iter()
            .find_map(|(position, mapped)| (mapped == name).then_some(*position))
    }

    /// Positions skipped while mapping names.
    #[must_use]
    pub fn skip_offsets(&self) -> &BTreeSet<usize> {
        &self.skip_offsets
    }

    /// Whether `position` is one of the skip offsets.
    #[must_use]
    pub fn is_skipped(&self, position: usize) -> bool {
        self.skip_offsets.contains(&position)
    }

    /// Last position that can still be collected.
    #[must_use]
    pub fn highest_mappable_position(&self) -> Option<usize> {
        self.highest
    }

    /// Whether `position` lies after the last mappable position.
    #[must_use]
    pub fn is_beyond(&self, position: usize) -> bool {
        self.highest.is_some_and(|highest| position > highest)
    }

    /// Whether no names were declared.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Recomputes the mapping for a subset of the declared names.
    ///
    /// The kept names stay at their original positions; every other position
    /// up to the last kept one becomes a skip offset. Unknown names are
    /// ignored.
    ///
    /// # Example
    ///
    /// ```rust
    /// use rs_table_tracer::columns::resolve;
    ///
    /// let all = resolve(&["name", "title", "address"], &[]);
    /// let some = all.subset(&["name", "address"]);
    ///
    /// assert_eq!(some.name_at(0), Some("name"));
    /// assert_eq!(some.name_at(2), Some("address"));
    /// assert!(some.is_skipped(1));
    /// ```
    #[must_use]
    pub fn subset<S: AsRef<str>>(&self, keep: &[S]) -> Self {
        let kept: BTreeMap<usize, &str> = keep
            .iter()
            .filter_map(|name| {
                let name = name.as_ref();
                self.position_of(name).map(|position| (position, name))
            })
            .collect();

        let Some(&last) = kept.keys().next_back() else {
            return Self::default();
        };

        let offsets: Vec<usize> = (0..=last).filter(|p| !kept.contains_key(p)).collect();
        let names: Vec<&str> = kept.into_values().collect();

        resolve(&names, &offsets)
    }
}

/// Builds a [`ColumnMapping`] from names and skip offsets.
///
/// Names take sequential positions, jumping over any position listed in
/// `offsets`. The highest mappable position is the larger of the last named
/// position and the last offset, so cells trailing it are dropped. Without
/// offsets the mapping is the identity over `names`. Without names there is
/// no mapping at all.
///
/// # Example
///
/// ```rust
/// use rs_table_tracer::columns::resolve;
///
/// let mapping = resolve(&["zero", "two"], &[1]);
/// assert_eq!(mapping.name_at(0), Some("zero"));
/// assert_eq!(mapping.name_at(2), Some("two"));
/// assert_eq!(mapping.highest_mappable_position(), Some(2));
/// assert!(mapping.is_beyond(3));
/// ```
#[must_use]
pub fn resolve<S: AsRef<str>>(names: &[S], offsets: &[usize]) -> ColumnMapping {
    if names.is_empty() {
        return ColumnMapping::default();
    }

    let skip_offsets: BTreeSet<usize> = offsets.iter().copied().collect();
    let mut positions = BTreeMap::new();
    let mut position = 0;

    for name in names {
        while skip_offsets.contains(&position) {
            position += 1;
        }
        positions.insert(position, name.as_ref().to_string());
        position += 1;
    }

    let last_named = position - 1;
    let highest = skip_offsets
        .iter()
        .next_back()
        .map_or(last_named, |&last_offset| last_offset.max(last_named));

    ColumnMapping {
        names: names.iter().map(|n| n.as_ref().to_string()).collect(),
        positions,
        skip_offsets,
        highest: Some(highest),
    }
}
