//! Tabular data model
//!
//! - `row`: schema-free ordered rows and scalar coercion
//! - `index`: name / identifier lookups and grouping
//! - `snapshot`: the immutable four-table snapshot

pub mod index;
pub mod row;
pub mod snapshot;

pub use index::{find_by_id, find_by_name, group_by, RowIndex, DEFAULT_GROUP};
pub use row::{
    KeyMatch, ReservedColumns, Row, DIMENSION_PREFIX, ENTITY_ID, ENTITY_NAME, ID_CANDIDATES,
};
pub use snapshot::{DataSnapshot, Table, TableKind, TableStatus};
