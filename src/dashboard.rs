//! Dashboard facade
//!
//! Owns one immutable [`DataSnapshot`] plus everything derived from it (entity
//! catalog, row indexes). A reload builds a new `Dashboard`; nothing is patched
//! in place.

use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

use crate::catalog::{EntityCatalog, EntityRecord};
use crate::chart::{ContinuumChart, ContinuumProjector, RadarChart, RadarProjector, SlotRow};
use crate::config::DashboardConfig;
use crate::error::ContrastResult;
use crate::loader::load_snapshot;
use crate::similarity::{Similarity, SimilarityEngine, Unavailable};
use crate::source::TableSource;
use crate::table::{DataSnapshot, Row, RowIndex, TableKind};

/// The two entity pickers
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub first: Option<String>,
    pub second: Option<String>,
}

impl Selection {
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        let mut selection = Self::default();
        selection.set(0, first);
        selection.set(1, second);
        selection
    }

    /// Change the pick in `slot` (0 or 1). A blank name clears it.
    pub fn set(&mut self, slot: usize, name: impl Into<String>) {
        let name = name.into().trim().to_string();
        let value = if name.is_empty() { None } else { Some(name) };
        match slot {
            0 => self.first = value,
            _ => self.second = value,
        }
    }

    pub fn is_complete(&self) -> bool {
        self.first.is_some() && self.second.is_some()
    }
}

/// Everything derived for one pair of entities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Comparison {
    pub first: String,
    pub second: String,
    pub similarity: Similarity,
    pub radar: Option<RadarChart>,
    pub continuum: Option<ContinuumChart>,
}

pub struct Dashboard {
    snapshot: Arc<DataSnapshot>,
    config: DashboardConfig,
    catalog: EntityCatalog,
    rollup_index: RowIndex,
    contrast_index: RowIndex,
    raw_index: RowIndex,
}

impl Dashboard {
    /// Build catalog and indexes over a snapshot
    pub fn new(snapshot: impl Into<Arc<DataSnapshot>>, config: DashboardConfig) -> Self {
        let snapshot = snapshot.into();
        let catalog = EntityCatalog::build(&snapshot.entities.rows);
        let rollup_index = RowIndex::build(TableKind::RollUpScores.sheet_name(), &snapshot.rollup.rows);
        let contrast_index =
            RowIndex::build(TableKind::ContrastScores.sheet_name(), &snapshot.contrast.rows);
        let raw_index = RowIndex::build(TableKind::RawScorePivot.sheet_name(), &snapshot.raw_pivot.rows);

        info!(
            "Dashboard ready: {} selectable entities in {} groups",
            catalog.len(),
            catalog.groups().len()
        );

        Self {
            snapshot,
            config,
            catalog,
            rollup_index,
            contrast_index,
            raw_index,
        }
    }

    /// Load a snapshot from `source` and build a dashboard over it
    pub async fn load<S: TableSource + ?Sized>(source: &S, config: DashboardConfig) -> ContrastResult<Self> {
        let snapshot = load_snapshot(source).await?;
        Ok(Self::new(snapshot, config))
    }

    pub fn snapshot(&self) -> &Arc<DataSnapshot> {
        &self.snapshot
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn catalog(&self) -> &EntityCatalog {
        &self.catalog
    }

    /// Descriptive record for an entity
    pub fn entity(&self, name: &str) -> Option<&EntityRecord> {
        self.catalog.record(name)
    }

    pub fn similarity(&self, first: &str, second: &str) -> Similarity {
        SimilarityEngine::new(&self.catalog, &self.snapshot.raw_pivot.rows, &self.raw_index)
            .similarity(first, second)
    }

    fn slot_row<'a>(
        index: &RowIndex,
        rows: &'a [Row],
        slot: usize,
        entity: &'a str,
    ) -> Option<SlotRow<'a>> {
        let row = index.find_by_name(rows, entity.trim())?;
        Some(SlotRow { slot, entity, row })
    }

    pub fn radar(&self, first: &str, second: &str) -> Option<RadarChart> {
        let rows = &self.snapshot.rollup.rows;
        let entries: Vec<SlotRow<'_>> = [first, second]
            .iter()
            .enumerate()
            .filter_map(|(slot, entity)| Self::slot_row(&self.rollup_index, rows, slot, entity))
            .collect();
        debug!("Radar rows found: {} of 2", entries.len());
        RadarProjector::new(&self.config).project(&entries)
    }

    pub fn continuum(&self, first: &str, second: &str) -> Option<ContinuumChart> {
        let rows = &self.snapshot.contrast.rows;
        ContinuumProjector::new(&self.config).project(
            Self::slot_row(&self.contrast_index, rows, 0, first),
            Self::slot_row(&self.contrast_index, rows, 1, second),
        )
    }

    /// Similarity, radar and continuum for one pair, computed in parallel
    pub fn compare(&self, first: &str, second: &str) -> Comparison {
        let (similarity, (radar, continuum)) = rayon::join(
            || self.similarity(first, second),
            || {
                rayon::join(
                    || self.radar(first, second),
                    || self.continuum(first, second),
                )
            },
        );

        Comparison {
            first: first.trim().to_string(),
            second: second.trim().to_string(),
            similarity,
            radar,
            continuum,
        }
    }

    /// Comparison for the current pickers; incomplete picks yield no charts
    pub fn render(&self, selection: &Selection) -> Comparison {
        match (&selection.first, &selection.second) {
            (Some(first), Some(second)) => self.compare(first, second),
            (first, second) => Comparison {
                first: first.clone().unwrap_or_default(),
                second: second.clone().unwrap_or_default(),
                similarity: Similarity::unavailable(None, Unavailable::NoSelection),
                radar: None,
                continuum: None,
            },
        }
    }
}
