//! Immutable snapshot of the four source tables

use crate::table::row::Row;
use serde::{Deserialize, Serialize};
use std::fmt;

/// The logical tables published by the data source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TableKind {
    Entities,
    RollUpScores,
    ContrastScores,
    RawScorePivot,
}

impl TableKind {
    pub const ALL: [TableKind; 4] = [
        TableKind::Entities,
        TableKind::RollUpScores,
        TableKind::ContrastScores,
        TableKind::RawScorePivot,
    ];

    /// Sheet name used by the data source
    pub fn sheet_name(&self) -> &'static str {
        match self {
            TableKind::Entities => "Entities",
            TableKind::RollUpScores => "RollUpScores",
            TableKind::ContrastScores => "ContrastScores",
            TableKind::RawScorePivot => "RawScorePivot",
        }
    }
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.sheet_name())
    }
}

/// Outcome of loading one table
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum TableStatus {
    Loaded { rows: usize },
    Failed { error: String },
}

impl TableStatus {
    pub fn is_loaded(&self) -> bool {
        matches!(self, TableStatus::Loaded { .. })
    }
}

/// One table's rows plus how they were obtained
#[derive(Debug, Clone)]
pub struct Table {
    pub kind: TableKind,
    pub rows: Vec<Row>,
    pub status: TableStatus,
}

impl Table {
    pub fn loaded(kind: TableKind, rows: Vec<Row>) -> Self {
        let status = TableStatus::Loaded { rows: rows.len() };
        Self { kind, rows, status }
    }

    /// A failed table behaves as an empty one
    pub fn failed(kind: TableKind, error: impl Into<String>) -> Self {
        Self {
            kind,
            rows: Vec::new(),
            status: TableStatus::Failed { error: error.into() },
        }
    }
}

/// All source data for one session.
///
/// Built once per load and never mutated afterwards; a reload builds a new
/// snapshot.
#[derive(Debug, Clone)]
pub struct DataSnapshot {
    pub entities: Table,
    pub rollup: Table,
    pub contrast: Table,
    pub raw_pivot: Table,
    /// Unix timestamp in milliseconds
    pub loaded_at: i64,
}

impl DataSnapshot {
    pub fn new(entities: Table, rollup: Table, contrast: Table, raw_pivot: Table) -> Self {
        Self {
            entities,
            rollup,
            contrast,
            raw_pivot,
            loaded_at: chrono::Utc::now().timestamp_millis(),
        }
    }

    /// Snapshot with every table loaded from the given rows
    pub fn from_rows(
        entities: Vec<Row>,
        rollup: Vec<Row>,
        contrast: Vec<Row>,
        raw_pivot: Vec<Row>,
    ) -> Self {
        Self::new(
            Table::loaded(TableKind::Entities, entities),
            Table::loaded(TableKind::RollUpScores, rollup),
            Table::loaded(TableKind::ContrastScores, contrast),
            Table::loaded(TableKind::RawScorePivot, raw_pivot),
        )
    }

    pub fn table(&self, kind: TableKind) -> &Table {
        match kind {
            TableKind::Entities => &self.entities,
            TableKind::RollUpScores => &self.rollup,
            TableKind::ContrastScores => &self.contrast,
            TableKind::RawScorePivot => &self.raw_pivot,
        }
    }

    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        TableKind::ALL.into_iter().map(move |kind| self.table(kind))
    }

    /// Tables that failed to load
    pub fn failed_tables(&self) -> Vec<TableKind> {
        self.tables()
            .filter(|t| !t.status.is_loaded())
            .map(|t| t.kind)
            .collect()
    }
}
