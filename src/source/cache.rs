//! Local read-through cache
//!
//! One JSON file per table under the cache directory, holding the rows and
//! the time they were stored:
//!
//! ```text
//! .contrast-cache/
//!   Entities.json        {"timestamp_ms": 1700000000000, "rows": [...]}
//!   RollUpScores.json
//!   ...
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};

use crate::config::CacheConfig;
use crate::error::{ContrastError, ContrastResult};
use crate::source::TableSource;
use crate::table::{Row, TableKind};

#[derive(Debug, Serialize, Deserialize)]
struct CacheEntry {
    timestamp_ms: i64,
    rows: Vec<Row>,
}

/// Rows read back from the cache
#[derive(Debug, Clone)]
pub struct CachedRows {
    pub rows: Vec<Row>,
    /// When the rows were stored (Unix milliseconds)
    pub timestamp_ms: i64,
    /// Whether the entry is still within its time-to-live
    pub fresh: bool,
}

/// Directory of cached tables
#[derive(Debug, Clone)]
pub struct CacheStore {
    dir: PathBuf,
    ttl: Duration,
}

impl CacheStore {
    /// Open (creating if needed) a cache directory
    pub fn open(dir: impl Into<PathBuf>, ttl: Duration) -> ContrastResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir).map_err(|e| {
            ContrastError::Cache(format!("cannot create cache directory {:?}: {}", dir, e))
        })?;
        Ok(Self { dir, ttl })
    }

    pub fn from_config(config: &CacheConfig) -> ContrastResult<Self> {
        Self::open(&config.dir, Duration::from_secs(config.ttl_secs))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn path(&self, kind: TableKind) -> PathBuf {
        self.dir.join(format!("{}.json", kind.sheet_name()))
    }

    /// Read an entry, fresh or stale. Unreadable entries count as misses.
    pub fn get(&self, kind: TableKind) -> Option<CachedRows> {
        let path = self.path(kind);
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(_) => return None,
        };
        let entry: CacheEntry = match serde_json::from_str(&text) {
            Ok(entry) => entry,
            Err(e) => {
                warn!("Ignoring corrupt cache entry {:?}: {}", path, e);
                return None;
            }
        };

        let age_ms = chrono::Utc::now().timestamp_millis() - entry.timestamp_ms;
        let fresh = age_ms >= 0 && (age_ms as u128) < self.ttl.as_millis();
        Some(CachedRows {
            rows: entry.rows,
            timestamp_ms: entry.timestamp_ms,
            fresh,
        })
    }

    /// Store rows stamped with the current time
    pub fn put(&self, kind: TableKind, rows: &[Row]) -> ContrastResult<()> {
        self.put_at(kind, rows, chrono::Utc::now().timestamp_millis())
    }

    /// Store rows with an explicit timestamp
    pub fn put_at(&self, kind: TableKind, rows: &[Row], timestamp_ms: i64) -> ContrastResult<()> {
        let entry = CacheEntry {
            timestamp_ms,
            rows: rows.to_vec(),
        };
        let path = self.path(kind);
        std::fs::write(&path, serde_json::to_vec(&entry)?)?;
        debug!("Cached {} rows for {} at {:?}", rows.len(), kind, path);
        Ok(())
    }

    /// Remove every entry; returns how many were removed
    pub fn clear(&self) -> ContrastResult<usize> {
        let mut removed = 0;
        for kind in TableKind::ALL {
            let path = self.path(kind);
            match std::fs::remove_file(&path) {
                Ok(()) => removed += 1,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
        }
        info!("Cleared {} cache entries from {:?}", removed, self.dir);
        Ok(removed)
    }
}

/// Wraps a source with a [`CacheStore`].
///
/// Fresh entries are served without touching the inner source. Otherwise the
/// inner source is asked and its answer stored; if it fails, a stale entry is
/// served instead when one exists.
pub struct CachedSource<S> {
    inner: S,
    store: CacheStore,
}

impl<S: TableSource> CachedSource<S> {
    pub fn new(inner: S, store: CacheStore) -> Self {
        Self { inner, store }
    }

    pub fn inner(&self) -> &S {
        &self.inner
    }

    pub fn store(&self) -> &CacheStore {
        &self.store
    }
}

#[async_trait]
impl<S: TableSource> TableSource for CachedSource<S> {
    async fn fetch_table(&self, kind: TableKind) -> ContrastResult<Vec<Row>> {
        let cached = self.store.get(kind);
        if let Some(entry) = &cached {
            if entry.fresh {
                debug!("Cache hit for {}", kind);
                return Ok(entry.rows.clone());
            }
        }

        match self.inner.fetch_table(kind).await {
            Ok(rows) => {
                if let Err(e) = self.store.put(kind, &rows) {
                    warn!("Failed to cache {}: {}", kind, e);
                }
                Ok(rows)
            }
            Err(e) => match cached {
                Some(entry) => {
                    warn!(
                        "Fetching {} failed ({}); serving stale cache from {}",
                        kind, e, entry.timestamp_ms
                    );
                    Ok(entry.rows)
                }
                None => Err(e),
            },
        }
    }

    fn describe(&self) -> String {
        format!("cached({}, {:?})", self.inner.describe(), self.store.dir)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::StaticSource;

    fn rows() -> Vec<Row> {
        vec![Row::new().with("EntID", 1).with("Entity Name", "X")]
    }

    #[test]
    fn test_put_get_and_clear() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path().join("cache"), Duration::from_secs(60)).unwrap();

        assert!(store.get(TableKind::Entities).is_none());
        store.put(TableKind::Entities, &rows()).unwrap();
        let entry = store.get(TableKind::Entities).unwrap();
        assert!(entry.fresh);
        assert_eq!(entry.rows, rows());

        assert_eq!(store.clear().unwrap(), 1);
        assert!(store.get(TableKind::Entities).is_none());
        assert_eq!(store.clear().unwrap(), 0);
    }

    #[test]
    fn test_expired_entry_is_stale() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), Duration::from_secs(60)).unwrap();
        let old = chrono::Utc::now().timestamp_millis() - 120_000;
        store.put_at(TableKind::RollUpScores, &rows(), old).unwrap();

        let entry = store.get(TableKind::RollUpScores).unwrap();
        assert!(!entry.fresh);
        assert_eq!(entry.timestamp_ms, old);
    }

    #[test]
    fn test_corrupt_entry_is_a_miss() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), Duration::from_secs(60)).unwrap();
        std::fs::write(dir.path().join("Entities.json"), "{not json").unwrap();
        assert!(store.get(TableKind::Entities).is_none());
    }

    #[tokio::test]
    async fn test_fresh_hit_skips_inner_source() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), Duration::from_secs(60)).unwrap();
        let source = CachedSource::new(
            StaticSource::new().with_table(TableKind::Entities, rows()),
            store,
        );

        assert_eq!(source.fetch_table(TableKind::Entities).await.unwrap(), rows());
        assert_eq!(source.fetch_table(TableKind::Entities).await.unwrap(), rows());
        assert_eq!(source.inner().fetch_count(), 1);
    }

    #[tokio::test]
    async fn test_stale_entry_served_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let store = CacheStore::open(dir.path(), Duration::from_secs(60)).unwrap();
        let old = chrono::Utc::now().timestamp_millis() - 3_600_000;
        store.put_at(TableKind::ContrastScores, &rows(), old).unwrap();

        let source = CachedSource::new(
            StaticSource::new().with_failure(TableKind::ContrastScores, "offline"),
            store,
        );
        let served = source.fetch_table(TableKind::ContrastScores).await.unwrap();
        assert_eq!(served, rows());
        assert_eq!(source.inner().fetch_count(), 1);

        // No entry at all: the failure propagates
        assert!(source.fetch_table(TableKind::Entities).await.is_err());
    }
}
