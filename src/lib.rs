//! Contrast
//!
//! Side-by-side comparison of two named entities from a four-table dataset:
//! a similarity score over raw dimension scores, radar chart geometry over the
//! aggregate feature scores, and a continuum chart placing both entities on
//! bipolar scales.
//!
//! # Architecture
//!
//! - `table`: schema-free ordered rows, lookups, the immutable snapshot
//! - `catalog`: selectable entities and name → identifier mapping
//! - `similarity`: divergence-based similarity with an explicit fallback chain
//! - `chart`: radar and continuum projectors (geometry only, no painting)
//! - `source`: remote, static and cached table sources
//! - `loader`: concurrent snapshot loading with degraded mode
//! - `dashboard`: facade tying one snapshot to a configuration
//!
//! ## Example Usage
//!
//! ```rust
//! use contrast::{Dashboard, DashboardConfig, DataSnapshot, Row};
//!
//! let entities = vec![
//!     Row::new().with("EntID", 1).with("Entity Name", "X").with("ModelGroup", "Primary"),
//!     Row::new().with("EntID", 2).with("Entity Name", "Y").with("ModelGroup", "Primary"),
//! ];
//! let raw = vec![
//!     Row::new().with("EntID", 1).with("Dim1", 5).with("Dim2", -5),
//!     Row::new().with("EntID", 2).with("Dim1", -5).with("Dim2", 5),
//! ];
//! let snapshot = DataSnapshot::from_rows(entities, vec![], vec![], raw);
//! let dashboard = Dashboard::new(snapshot, DashboardConfig::default());
//!
//! let comparison = dashboard.compare("X", "Y");
//! assert_eq!(comparison.similarity.value, Some(0.0));
//! assert!(comparison.radar.is_none());
//! ```

#![allow(missing_docs)]
#![warn(clippy::all)]

pub mod catalog;
pub mod chart;
pub mod config;
pub mod dashboard;
pub mod error;
pub mod loader;
pub mod similarity;
pub mod source;
pub mod table;

// Re-export main types for convenience
pub use catalog::{CatalogIssue, EntityCatalog, EntityGroup, EntityRecord};

pub use chart::{
    ContinuumChart, ContinuumProjector, ContinuumScale, LegendEntry, Point, RadarAxis, RadarChart,
    RadarProjector, RadarSeries, SlotRow, TextAnchor,
};

pub use config::{CacheConfig, ContinuumConfig, DashboardConfig, RadarConfig, SourceConfig};

pub use dashboard::{Comparison, Dashboard, Selection};

pub use error::{ContrastError, ContrastResult};

pub use loader::load_snapshot;

pub use similarity::{JoinKey, Similarity, SimilarityEngine, Unavailable};

pub use source::{
    CacheStore, CachedRows, CachedSource, RemoteSource, StaticSource, TableResponse, TableSource,
};

pub use table::{DataSnapshot, KeyMatch, Row, RowIndex, Table, TableKind, TableStatus};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Get version string
pub fn version() -> &'static str {
    VERSION
}
