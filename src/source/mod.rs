//! Table sources
//!
//! Provides three implementations of [`TableSource`]:
//!
//! - **`RemoteSource`**: fetches tables from the HTTP endpoint
//!   (`GET <base>?sheet=<Table>` answering `{success, rows, error}`).
//! - **`StaticSource`**: in-memory tables, optionally read from a directory of
//!   JSON files. Used by tests, demos and offline runs.
//! - **`CachedSource`**: read-through wrapper persisting each table to a local
//!   [`CacheStore`] with an expiry.

pub mod cache;
pub mod remote;
pub mod static_source;

pub use cache::{CacheStore, CachedRows, CachedSource};
pub use remote::RemoteSource;
pub use static_source::StaticSource;

use crate::error::{ContrastError, ContrastResult};
use crate::table::{Row, TableKind};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Anything that can produce the rows of a named table
#[async_trait]
pub trait TableSource: Send + Sync {
    /// Fetch all rows of one table
    async fn fetch_table(&self, kind: TableKind) -> ContrastResult<Vec<Row>>;

    /// Short description for logs
    fn describe(&self) -> String;
}

#[async_trait]
impl<T: TableSource + ?Sized> TableSource for Box<T> {
    async fn fetch_table(&self, kind: TableKind) -> ContrastResult<Vec<Row>> {
        (**self).fetch_table(kind).await
    }

    fn describe(&self) -> String {
        (**self).describe()
    }
}

/// Wire envelope returned by the data source for one table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableResponse {
    pub success: bool,
    #[serde(default)]
    pub rows: Vec<Row>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl TableResponse {
    pub fn ok(rows: Vec<Row>) -> Self {
        Self {
            success: true,
            rows,
            error: None,
        }
    }

    /// Rows on success, a source error carrying the reported message otherwise
    pub fn into_rows(self, kind: TableKind) -> ContrastResult<Vec<Row>> {
        if self.success {
            Ok(self.rows)
        } else {
            Err(ContrastError::Source {
                table: kind.sheet_name().to_string(),
                message: self.error.unwrap_or_else(|| "Unknown error".to_string()),
            })
        }
    }
}
