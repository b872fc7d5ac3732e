//! Continuum chart projection
//!
//! Every non-reserved ContrastScores column names a bipolar scale written as
//! `"<Left> to <Right>"`. Each entity becomes a scatter series placing one
//! marker per scale on a [0,1] horizontal axis (0 = left pole, 1 = right pole).
//! Each scale also gets a guide line across [0,1] and two pole labels pushed
//! outside the plot area.

use crate::chart::{LegendEntry, SlotRow, TextAnchor};
use crate::config::{DashboardConfig, Padding};
use crate::table::{KeyMatch, ReservedColumns};
use serde::Serialize;
use tracing::{debug, warn};

/// Separator between the two pole names of a scale label
pub const SCALE_SEPARATOR: &str = " to ";

/// Split a scale label into its left and right pole text.
///
/// Everything before the first separator is the left pole, everything after
/// it the right pole. A label without a separator is all left pole.
pub fn split_scale_label(label: &str) -> (String, String) {
    match label.split_once(SCALE_SEPARATOR) {
        Some((left, right)) => (left.to_string(), right.to_string()),
        None => (label.to_string(), String::new()),
    }
}

/// Horizontal guide spanning the scale at its category slot
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GuideLine {
    pub x_min: f64,
    pub x_max: f64,
    pub y: String,
}

/// Pole text anchored at one end of a scale
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PoleLabel {
    /// Data x of the anchor (0 or 1)
    pub x: f64,
    pub y: String,
    pub content: String,
    /// Pixel shift away from the plot area
    pub x_adjust: f64,
    pub anchor: TextAnchor,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuumScale {
    /// Full column name, also the category value
    pub key: String,
    /// Display row counted from the top
    pub row: usize,
    pub left_label: String,
    pub right_label: String,
    pub guide: GuideLine,
    pub left_annotation: PoleLabel,
    pub right_annotation: PoleLabel,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuumPoint {
    pub x: f64,
    pub y: String,
}

/// Scatter markers for one entity (never joined by a line)
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuumSeries {
    pub entity: String,
    pub slot: usize,
    pub color: String,
    pub point_radius: f64,
    pub points: Vec<ContinuumPoint>,
}

/// Categorical (vertical) axis
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryAxis {
    /// Scale keys in discovery order
    pub labels: Vec<String>,
    /// When set, the first label is drawn at the top
    pub reverse: bool,
}

/// Numeric (horizontal) axis
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ValueAxis {
    pub min: f64,
    pub max: f64,
    pub step: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ContinuumChart {
    pub scales: Vec<ContinuumScale>,
    pub category_axis: CategoryAxis,
    pub value_axis: ValueAxis,
    pub series: Vec<ContinuumSeries>,
    pub legend: Vec<LegendEntry>,
    pub padding: Padding,
}

impl ContinuumChart {
    /// Scales in display order, top row first
    pub fn scales_top_to_bottom(&self) -> Vec<&ContinuumScale> {
        let mut scales: Vec<&ContinuumScale> = self.scales.iter().collect();
        scales.sort_by_key(|scale| scale.row);
        scales
    }
}

pub struct ContinuumProjector<'a> {
    config: &'a DashboardConfig,
}

impl<'a> ContinuumProjector<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    fn position(&self, entry: &SlotRow<'_>, key: &str) -> f64 {
        match entry.row.number(key) {
            Some(value) if (0.0..=1.0).contains(&value) => value,
            Some(value) => {
                warn!("{}: '{}' = {} outside [0,1], clamped", entry.entity, key, value);
                value.clamp(0.0, 1.0)
            }
            None => {
                debug!("{}: no numeric value for '{}', placing at 0", entry.entity, key);
                0.0
            }
        }
    }

    fn scale(&self, key: &str, row: usize) -> ContinuumScale {
        let offset = self.config.continuum.label_offset;
        let (left_label, right_label) = split_scale_label(key);
        if right_label.is_empty() {
            debug!("Scale '{}' has no '{}' separator", key, SCALE_SEPARATOR.trim());
        }
        ContinuumScale {
            key: key.to_string(),
            row,
            guide: GuideLine {
                x_min: 0.0,
                x_max: 1.0,
                y: key.to_string(),
            },
            left_annotation: PoleLabel {
                x: 0.0,
                y: key.to_string(),
                content: left_label.clone(),
                x_adjust: -offset,
                anchor: TextAnchor::Start,
            },
            right_annotation: PoleLabel {
                x: 1.0,
                y: key.to_string(),
                content: right_label.clone(),
                x_adjust: offset,
                anchor: TextAnchor::End,
            },
            left_label,
            right_label,
        }
    }

    /// Project both entities' ContrastScores rows.
    ///
    /// Both rows are required; scales come from the first entity's row.
    pub fn project(&self, first: Option<SlotRow<'_>>, second: Option<SlotRow<'_>>) -> Option<ContinuumChart> {
        let (first, second) = match (first, second) {
            (Some(first), Some(second)) => (first, second),
            _ => {
                debug!("Contrast rows missing for the selection; continuum skipped");
                return None;
            }
        };

        let continuum = &self.config.continuum;
        let labels: Vec<String> = first
            .row
            .data_columns(ReservedColumns::ENTITY, KeyMatch::Exact)
            .into_iter()
            .map(str::to_string)
            .collect();
        let count = labels.len();

        let scales = labels
            .iter()
            .enumerate()
            .map(|(i, key)| {
                let row = if continuum.reverse { i } else { count - 1 - i };
                self.scale(key, row)
            })
            .collect();

        let series: Vec<ContinuumSeries> = [first, second]
            .iter()
            .map(|entry| ContinuumSeries {
                entity: entry.entity.to_string(),
                slot: entry.slot,
                color: self.config.color(entry.slot).to_string(),
                point_radius: continuum.point_radius,
                points: labels
                    .iter()
                    .map(|key| ContinuumPoint {
                        x: self.position(entry, key),
                        y: key.clone(),
                    })
                    .collect(),
            })
            .collect();

        let legend = series
            .iter()
            .map(|s| LegendEntry {
                entity: s.entity.clone(),
                slot: s.slot,
                color: s.color.clone(),
            })
            .collect();

        Some(ContinuumChart {
            scales,
            category_axis: CategoryAxis {
                labels,
                reverse: continuum.reverse,
            },
            value_axis: ValueAxis {
                min: 0.0,
                max: 1.0,
                step: continuum.tick_step,
            },
            series,
            legend,
            padding: continuum.padding.clone(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::Row;

    fn slot<'a>(slot: usize, entity: &'a str, row: &'a Row) -> Option<SlotRow<'a>> {
        Some(SlotRow { slot, entity, row })
    }

    fn rows() -> (Row, Row) {
        let x = Row::new()
            .with("EntID", 1)
            .with("Entity Name", "X")
            .with("Slow to Fast", 0.2)
            .with("Cautious to Bold", 0.9)
            .with("Openness", 0.5);
        let y = Row::new()
            .with("EntID", 2)
            .with("Entity Name", "Y")
            .with("Slow to Fast", 0.7);
        (x, y)
    }

    #[test]
    fn test_split_scale_label() {
        assert_eq!(split_scale_label("Slow to Fast"), ("Slow".to_string(), "Fast".to_string()));
        assert_eq!(split_scale_label("Openness"), ("Openness".to_string(), String::new()));
        assert_eq!(
            split_scale_label("Here to There to Everywhere"),
            ("Here".to_string(), "There to Everywhere".to_string())
        );
        assert_eq!(split_scale_label("Toronto"), ("Toronto".to_string(), String::new()));
    }

    #[test]
    fn test_requires_both_rows() {
        let config = DashboardConfig::default();
        let (x, _) = rows();
        let projector = ContinuumProjector::new(&config);
        assert!(projector.project(slot(0, "X", &x), None).is_none());
        assert!(projector.project(None, slot(1, "X", &x)).is_none());
    }

    #[test]
    fn test_points_and_defaults() {
        let config = DashboardConfig::default();
        let (x, y) = rows();
        let chart = ContinuumProjector::new(&config)
            .project(slot(0, "X", &x), slot(1, "Y", &y))
            .unwrap();

        assert_eq!(
            chart.category_axis.labels,
            vec!["Slow to Fast", "Cautious to Bold", "Openness"]
        );
        let xs: Vec<f64> = chart.series[0].points.iter().map(|p| p.x).collect();
        assert_eq!(xs, vec![0.2, 0.9, 0.5]);
        let ys: Vec<f64> = chart.series[1].points.iter().map(|p| p.x).collect();
        assert_eq!(ys, vec![0.7, 0.0, 0.0]);
        assert_eq!(chart.series[1].points[0].y, "Slow to Fast");
        assert_eq!(chart.series[0].color, "darkorange");
        assert_eq!(chart.series[0].point_radius, 12.0);
    }

    #[test]
    fn test_annotations() {
        let config = DashboardConfig::default();
        let (x, y) = rows();
        let chart = ContinuumProjector::new(&config)
            .project(slot(0, "X", &x), slot(1, "Y", &y))
            .unwrap();
        let scale = &chart.scales[0];
        assert_eq!(scale.left_label, "Slow");
        assert_eq!(scale.right_label, "Fast");
        assert_eq!(scale.guide, GuideLine { x_min: 0.0, x_max: 1.0, y: "Slow to Fast".to_string() });
        assert_eq!(scale.left_annotation.x, 0.0);
        assert_eq!(scale.left_annotation.x_adjust, -150.0);
        assert_eq!(scale.right_annotation.x, 1.0);
        assert_eq!(scale.right_annotation.x_adjust, 150.0);
        assert_eq!(scale.right_annotation.content, "Fast");
        assert_eq!(chart.scales[2].right_label, "");
    }

    #[test]
    fn test_row_order_matches_axis_direction() {
        let (x, y) = rows();
        let config = DashboardConfig::default();
        let chart = ContinuumProjector::new(&config)
            .project(slot(0, "X", &x), slot(1, "Y", &y))
            .unwrap();
        let top_down: Vec<&str> = chart.scales_top_to_bottom().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(top_down, vec!["Slow to Fast", "Cautious to Bold", "Openness"]);

        let mut config = DashboardConfig::default();
        config.continuum.reverse = false;
        let chart = ContinuumProjector::new(&config)
            .project(slot(0, "X", &x), slot(1, "Y", &y))
            .unwrap();
        let top_down: Vec<&str> = chart.scales_top_to_bottom().iter().map(|s| s.key.as_str()).collect();
        assert_eq!(top_down, vec!["Openness", "Cautious to Bold", "Slow to Fast"]);
        // Category axis keeps discovery order; only the row assignment flips
        assert_eq!(chart.category_axis.labels[0], "Slow to Fast");
        assert!(!chart.category_axis.reverse);
    }

    #[test]
    fn test_out_of_range_clamped() {
        let config = DashboardConfig::default();
        let x = Row::new().with("Low to High", 1.4);
        let y = Row::new().with("Low to High", -0.1);
        let chart = ContinuumProjector::new(&config)
            .project(slot(0, "X", &x), slot(1, "Y", &y))
            .unwrap();
        assert_eq!(chart.series[0].points[0].x, 1.0);
        assert_eq!(chart.series[1].points[0].x, 0.0);
    }
}
