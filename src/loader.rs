//! Snapshot loading
//!
//! Fetches the four tables concurrently. A table that fails is kept as an
//! empty, failed table so the rest of the dashboard keeps working; only a
//! complete outage is an error.

use tracing::{error, info, warn};

use crate::error::{ContrastError, ContrastResult};
use crate::source::TableSource;
use crate::table::{DataSnapshot, Row, Table, TableKind};

fn settle(kind: TableKind, result: ContrastResult<Vec<Row>>) -> Table {
    match result {
        Ok(rows) => Table::loaded(kind, rows),
        Err(e) => {
            warn!("Table {} failed to load, continuing without it: {}", kind, e);
            Table::failed(kind, e.to_string())
        }
    }
}

/// Load a fresh snapshot from `source`
pub async fn load_snapshot<S: TableSource + ?Sized>(source: &S) -> ContrastResult<DataSnapshot> {
    info!("Loading tables from {}", source.describe());

    let (entities, rollup, contrast, raw_pivot) = tokio::join!(
        source.fetch_table(TableKind::Entities),
        source.fetch_table(TableKind::RollUpScores),
        source.fetch_table(TableKind::ContrastScores),
        source.fetch_table(TableKind::RawScorePivot),
    );

    let snapshot = DataSnapshot::new(
        settle(TableKind::Entities, entities),
        settle(TableKind::RollUpScores, rollup),
        settle(TableKind::ContrastScores, contrast),
        settle(TableKind::RawScorePivot, raw_pivot),
    );

    let failed = snapshot.failed_tables();
    if failed.len() == TableKind::ALL.len() {
        error!("All {} table loads failed from {}", failed.len(), source.describe());
        return Err(ContrastError::AllTablesFailed(failed.len()));
    }

    info!(
        "Loaded snapshot: {} entities, {} roll-up, {} contrast, {} raw rows ({} tables failed)",
        snapshot.entities.rows.len(),
        snapshot.rollup.rows.len(),
        snapshot.contrast.rows.len(),
        snapshot.raw_pivot.rows.len(),
        failed.len()
    );
    Ok(snapshot)
}
