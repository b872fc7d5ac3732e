//! Lookup structures over immutable row collections
//!
//! The free functions are linear scans with first-match semantics. `RowIndex`
//! precomputes the same answers once per snapshot so that every selection
//! change resolves rows in O(1).

use crate::table::row::Row;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;
use tracing::warn;

/// Group used for rows that have no grouping key
pub const DEFAULT_GROUP: &str = "Other";

/// First row whose trimmed `Entity Name` equals `name` (case-sensitive)
pub fn find_by_name<'a>(rows: &'a [Row], name: &str) -> Option<&'a Row> {
    rows.iter()
        .find(|row| row.entity_name().as_deref() == Some(name))
}

/// First row whose integer identifier equals `id`
pub fn find_by_id(rows: &[Row], id: i64) -> Option<&Row> {
    rows.iter().find(|row| row.identifier() == Some(id))
}

/// Group rows by a key, keeping first-seen group order and row order inside
/// each group. Rows without a key land in [`DEFAULT_GROUP`].
pub fn group_by<'a, I, F>(rows: I, key_fn: F) -> IndexMap<String, Vec<&'a Row>>
where
    I: IntoIterator<Item = &'a Row>,
    F: Fn(&Row) -> Option<String>,
{
    let mut groups: IndexMap<String, Vec<&'a Row>> = IndexMap::new();
    for row in rows {
        let key = key_fn(row).unwrap_or_else(|| DEFAULT_GROUP.to_string());
        groups.entry(key).or_default().push(row);
    }
    groups
}

/// Name and identifier index over one table
#[derive(Debug, Clone, Default)]
pub struct RowIndex {
    /// Trimmed name -> position of the first row carrying it
    by_name: FxHashMap<String, usize>,
    /// Identifier -> position of the first row carrying it
    by_id: FxHashMap<i64, usize>,
}

impl RowIndex {
    /// Index `rows`. Later duplicates of a name or identifier are ignored and
    /// reported.
    pub fn build(table: &str, rows: &[Row]) -> Self {
        let mut index = Self::default();
        for (pos, row) in rows.iter().enumerate() {
            if let Some(name) = row.entity_name() {
                if let Some(&first) = index.by_name.get(&name) {
                    warn!(
                        "{}: duplicate entity name '{}' at row {} (keeping row {})",
                        table, name, pos, first
                    );
                } else {
                    index.by_name.insert(name, pos);
                }
            }
            if let Some(id) = row.identifier() {
                if let Some(&first) = index.by_id.get(&id) {
                    warn!(
                        "{}: duplicate identifier {} at row {} (keeping row {})",
                        table, id, pos, first
                    );
                } else {
                    index.by_id.insert(id, pos);
                }
            }
        }
        index
    }

    pub fn find_by_name<'a>(&self, rows: &'a [Row], name: &str) -> Option<&'a Row> {
        self.by_name.get(name).and_then(|&pos| rows.get(pos))
    }

    pub fn find_by_id<'a>(&self, rows: &'a [Row], id: i64) -> Option<&'a Row> {
        self.by_id.get(&id).and_then(|&pos| rows.get(pos))
    }

    /// Number of distinct names indexed
    pub fn name_count(&self) -> usize {
        self.by_name.len()
    }

    /// Number of distinct identifiers indexed
    pub fn id_count(&self) -> usize {
        self.by_id.len()
    }
}
