//! StaticSource: in-memory tables, no network
//!
//! Used by tests, demos and offline runs against exported JSON files.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use tracing::{debug, warn};

use crate::error::{ContrastError, ContrastResult};
use crate::source::{TableResponse, TableSource};
use crate::table::{Row, TableKind};

/// Serves fixed rows (or fixed failures) per table
#[derive(Debug, Default)]
pub struct StaticSource {
    tables: HashMap<TableKind, Result<Vec<Row>, String>>,
    fetches: AtomicUsize,
}

impl StaticSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Publish rows for a table
    pub fn with_table(mut self, kind: TableKind, rows: Vec<Row>) -> Self {
        self.tables.insert(kind, Ok(rows));
        self
    }

    /// Make a table fail with the given message
    pub fn with_failure(mut self, kind: TableKind, message: impl Into<String>) -> Self {
        self.tables.insert(kind, Err(message.into()));
        self
    }

    /// Read `<dir>/<Table>.json` for every table.
    ///
    /// Each file holds either the wire envelope `{success, rows, error}` or a
    /// bare array of rows. Missing or unreadable files become failed tables.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        let mut source = Self::new();
        for kind in TableKind::ALL {
            let path = dir.join(format!("{}.json", kind.sheet_name()));
            match read_table_file(&path, kind) {
                Ok(rows) => {
                    debug!("Read {} rows for {} from {:?}", rows.len(), kind, path);
                    source.tables.insert(kind, Ok(rows));
                }
                Err(e) => {
                    warn!("Could not read {} from {:?}: {}", kind, path, e);
                    source.tables.insert(kind, Err(e.to_string()));
                }
            }
        }
        source
    }

    /// Number of `fetch_table` calls served so far
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

fn read_table_file(path: &Path, kind: TableKind) -> ContrastResult<Vec<Row>> {
    let text = std::fs::read_to_string(path)?;
    let value: serde_json::Value = serde_json::from_str(&text)?;
    if value.is_array() {
        return Ok(serde_json::from_value(value)?);
    }
    let response: TableResponse = serde_json::from_value(value)?;
    response.into_rows(kind)
}

#[async_trait]
impl TableSource for StaticSource {
    async fn fetch_table(&self, kind: TableKind) -> ContrastResult<Vec<Row>> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        match self.tables.get(&kind) {
            Some(Ok(rows)) => Ok(rows.clone()),
            Some(Err(message)) => Err(ContrastError::Source {
                table: kind.sheet_name().to_string(),
                message: message.clone(),
            }),
            None => Err(ContrastError::Source {
                table: kind.sheet_name().to_string(),
                message: "table not published".to_string(),
            }),
        }
    }

    fn describe(&self) -> String {
        format!("static({} tables)", self.tables.len())
    }
}
