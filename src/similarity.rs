//! Normalized-difference similarity between two entities
//!
//! Each entity's raw `Dim*` scores are compared position by position. A pair
//! contributes `|a - b| / (|a| + |b|)`, which is 0 for identical values and 1
//! for a zero against a non-zero value or for equal magnitudes of opposite
//! sign. Pairs where both values are zero carry no information and are
//! skipped. The score is `1 - mean(contribution)`.
//!
//! Rows are joined by integer identifier when the catalog maps both names,
//! and by name otherwise. Every failure collapses to an unavailable result
//! with a reason; nothing here returns an error.

use crate::catalog::EntityCatalog;
use crate::table::{Row, RowIndex};
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Which key joined the selection to the raw score pivot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum JoinKey {
    Identifier,
    Name,
}

/// Why no similarity could be computed
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum Unavailable {
    /// One or both selections are empty
    NoSelection,
    /// No raw pivot row for this entity under the join key in use
    RowNotFound { entity: String },
    /// Both rows carry the same identifier (self comparison or a collision)
    SameIdentifier { id: Option<i64> },
    /// Every dimension pair was zero on both sides, missing or non-numeric
    NoComparablePairs,
}

impl fmt::Display for Unavailable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Unavailable::NoSelection => write!(f, "two entities must be selected"),
            Unavailable::RowNotFound { entity } => write!(f, "no raw scores for '{}'", entity),
            Unavailable::SameIdentifier { id: Some(id) } => {
                write!(f, "both rows share identifier {}", id)
            }
            Unavailable::SameIdentifier { id: None } => {
                write!(f, "neither row carries an identifier")
            }
            Unavailable::NoComparablePairs => write!(f, "no comparable dimension pairs"),
        }
    }
}

/// Similarity result. `value` is `None` when not available.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Similarity {
    pub value: Option<f64>,
    /// Join key used, once both names were known
    pub join: Option<JoinKey>,
    /// Number of dimension pairs that contributed
    pub pairs: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unavailable: Option<Unavailable>,
}

impl Similarity {
    fn score(value: f64, join: JoinKey, pairs: usize) -> Self {
        Self {
            value: Some(value),
            join: Some(join),
            pairs,
            unavailable: None,
        }
    }

    pub fn unavailable(join: Option<JoinKey>, reason: Unavailable) -> Self {
        Self {
            value: None,
            join,
            pairs: 0,
            unavailable: Some(reason),
        }
    }

    pub fn is_available(&self) -> bool {
        self.value.is_some()
    }
}

impl fmt::Display for Similarity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.value {
            Some(value) => write!(f, "{:.2}", value),
            None => write!(f, "N/A"),
        }
    }
}

/// Contribution of one dimension pair, `None` when both values are zero
fn pair_divergence(a: f64, b: f64) -> Option<f64> {
    let sum = a.abs() + b.abs();
    if sum == 0.0 {
        return None;
    }
    if sum.is_finite() {
        return Some((a - b).abs() / sum);
    }
    // |a| + |b| overflowed; rescale by the larger magnitude
    let scale = a.abs().max(b.abs());
    let (a, b) = (a / scale, b / scale);
    Some((a - b).abs() / (a.abs() + b.abs()))
}

/// Similarity over positionally aligned dimension vectors.
///
/// Returns the score and the number of contributing pairs, or `None` when no
/// pair was comparable. Missing or non-numeric values skip their pair.
pub fn dimension_similarity(first: &[Option<f64>], second: &[Option<f64>]) -> Option<(f64, usize)> {
    let mut numerator = 0.0;
    let mut pairs = 0usize;

    for (i, a) in first.iter().enumerate() {
        let (Some(a), Some(b)) = (*a, second.get(i).copied().flatten()) else {
            debug!("Pair {}: skipped (missing or non-numeric)", i);
            continue;
        };
        match pair_divergence(a, b) {
            Some(divergence) => {
                debug!("Pair {}: a={}, b={}, divergence={}", i, a, b, divergence);
                numerator += divergence;
                pairs += 1;
            }
            None => debug!("Pair {}: both zero, skipped", i),
        }
    }

    if pairs == 0 {
        return None;
    }
    let score = (1.0 - numerator / pairs as f64).clamp(0.0, 1.0);
    Some((score, pairs))
}

/// Convenience form of [`dimension_similarity`] over plain values
pub fn similarity_of(first: &[f64], second: &[f64]) -> Option<f64> {
    let first: Vec<Option<f64>> = first.iter().copied().map(Some).collect();
    let second: Vec<Option<f64>> = second.iter().copied().map(Some).collect();
    dimension_similarity(&first, &second).map(|(score, _)| score)
}

/// Computes similarity against the raw score pivot
pub struct SimilarityEngine<'a> {
    catalog: &'a EntityCatalog,
    raw_rows: &'a [Row],
    raw_index: &'a RowIndex,
}

impl<'a> SimilarityEngine<'a> {
    pub fn new(catalog: &'a EntityCatalog, raw_rows: &'a [Row], raw_index: &'a RowIndex) -> Self {
        Self {
            catalog,
            raw_rows,
            raw_index,
        }
    }

    /// Similarity between two selected entity names
    pub fn similarity(&self, first: &str, second: &str) -> Similarity {
        let (first, second) = (first.trim(), second.trim());
        if first.is_empty() || second.is_empty() {
            return Similarity::unavailable(None, Unavailable::NoSelection);
        }

        let (join, rows) = self.resolve_rows(first, second);
        let (raw1, raw2) = match rows {
            Ok(rows) => rows,
            Err(reason) => {
                warn!("Similarity for '{}' / '{}' unavailable: {}", first, second, reason);
                return Similarity::unavailable(Some(join), reason);
            }
        };

        let (id1, id2) = (raw1.identifier(), raw2.identifier());
        if id1 == id2 {
            let reason = Unavailable::SameIdentifier { id: id1 };
            warn!("Similarity for '{}' / '{}' unavailable: {}", first, second, reason);
            return Similarity::unavailable(Some(join), reason);
        }

        match dimension_similarity(&raw1.dimensions(), &raw2.dimensions()) {
            Some((score, pairs)) => {
                debug!(
                    "Similarity for '{}' / '{}' ({:?} join): {} over {} pairs",
                    first, second, join, score, pairs
                );
                Similarity::score(score, join, pairs)
            }
            None => {
                warn!("No valid dimension pairs for '{}' / '{}'", first, second);
                Similarity::unavailable(Some(join), Unavailable::NoComparablePairs)
            }
        }
    }

    /// Resolve both raw pivot rows, by identifier when both names map to one
    /// and by name otherwise.
    fn resolve_rows(
        &self,
        first: &str,
        second: &str,
    ) -> (JoinKey, Result<(&'a Row, &'a Row), Unavailable>) {
        // Identifier 0 counts as unresolved and sends the join to names
        let resolved = |name: &str| self.catalog.identity(name).filter(|&id| id != 0);
        let ids = (resolved(first), resolved(second));
        debug!("Mapping entities to identifiers: {} -> {:?}, {} -> {:?}", first, ids.0, second, ids.1);

        let (join, raw1, raw2) = match ids {
            (Some(id1), Some(id2)) => (
                JoinKey::Identifier,
                self.raw_index.find_by_id(self.raw_rows, id1),
                self.raw_index.find_by_id(self.raw_rows, id2),
            ),
            _ => {
                warn!(
                    "Unresolved identifier mapping ({:?}, {:?}); joining raw scores by name",
                    ids.0, ids.1
                );
                (
                    JoinKey::Name,
                    self.raw_index.find_by_name(self.raw_rows, first),
                    self.raw_index.find_by_name(self.raw_rows, second),
                )
            }
        };

        let rows = match (raw1, raw2) {
            (Some(raw1), Some(raw2)) => Ok((raw1, raw2)),
            (None, _) => Err(Unavailable::RowNotFound {
                entity: first.to_string(),
            }),
            (_, None) => Err(Unavailable::RowNotFound {
                entity: second.to_string(),
            }),
        };
        (join, rows)
    }
}
