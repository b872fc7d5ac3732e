//! Radar (spider) chart projection
//!
//! Feature axes are discovered from the first available RollUpScores row:
//! every column except `EntID` / `Entity Name` (matched trimmed and
//! case-insensitively) becomes an axis, in column order. The second entity is
//! read through the same axis list, so columns it lacks plot at zero and
//! columns only it has are ignored.
//!
//! Axis `i` of `n` sits at `π/2 + 2π·i/n` (axis 0 points up, counter-clockwise).
//! Scores are clamped to [0,1] and mapped linearly onto `[0, max_radius]`.
//! Canvas y grows downwards, so `y = cy - sin(θ)·r`.

use crate::chart::{LegendEntry, Point, SlotRow, TextAnchor};
use crate::config::DashboardConfig;
use crate::table::{KeyMatch, ReservedColumns};
use serde::Serialize;
use std::f64::consts::{FRAC_PI_2, TAU};
use tracing::{debug, warn};

/// A concentric level ring
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ring {
    pub value: f64,
    pub radius: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisLabel {
    pub position: Point,
    pub anchor: TextAnchor,
    /// Stacked lines, top to bottom
    pub lines: Vec<String>,
    pub line_height_em: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarAxis {
    pub name: String,
    /// Radians, math convention
    pub angle: f64,
    /// Outer end of the axis line (score 1.0); the line starts at the centre
    pub line_end: Point,
    pub label: AxisLabel,
}

/// One entity's closed score polygon
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarSeries {
    pub entity: String,
    pub slot: usize,
    pub color: String,
    /// Clamped score per axis
    pub values: Vec<f64>,
    /// Vertices in axis order, first vertex repeated at the end
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RadarChart {
    pub width: f64,
    pub height: f64,
    pub center: Point,
    pub max_radius: f64,
    pub rings: Vec<Ring>,
    pub axes: Vec<RadarAxis>,
    pub series: Vec<RadarSeries>,
    pub legend: Vec<LegendEntry>,
}

/// Angle of axis `index` out of `count`
pub fn axis_angle(index: usize, count: usize) -> f64 {
    FRAC_PI_2 + TAU * index as f64 / count as f64
}

/// Split a camel-case feature name before every ASCII upper-case letter.
///
/// `"RiskTolerance"` becomes `["Risk", "Tolerance"]`. Segments are trimmed and
/// empty segments dropped.
pub fn split_camel_case(name: &str) -> Vec<String> {
    let mut words: Vec<String> = Vec::new();
    let mut current = String::new();
    for c in name.chars() {
        if c.is_ascii_uppercase() && !current.is_empty() {
            words.push(std::mem::take(&mut current));
        }
        current.push(c);
    }
    words.push(current);
    words
        .into_iter()
        .map(|w| w.trim().to_string())
        .filter(|w| !w.is_empty())
        .collect()
}

fn clamp_score(value: f64) -> f64 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

pub struct RadarProjector<'a> {
    config: &'a DashboardConfig,
}

impl<'a> RadarProjector<'a> {
    pub fn new(config: &'a DashboardConfig) -> Self {
        Self { config }
    }

    fn center(&self) -> Point {
        Point::new(self.config.radar.width / 2.0, self.config.radar.height / 2.0)
    }

    /// Canvas point at `angle` and pixel `radius` from the centre
    fn polar(&self, angle: f64, radius: f64) -> Point {
        let center = self.center();
        Point::new(
            center.x + angle.cos() * radius,
            center.y - angle.sin() * radius,
        )
    }

    /// Canvas point for a score on the axis at `angle`
    pub fn score_point(&self, angle: f64, score: f64) -> Point {
        self.polar(angle, clamp_score(score) * self.config.radar.max_radius)
    }

    fn anchor_for(&self, position: &Point) -> TextAnchor {
        let dx = position.x - self.center().x;
        let dead_zone = self.config.radar.anchor_dead_zone;
        if dx < -dead_zone {
            TextAnchor::Start
        } else if dx > dead_zone {
            TextAnchor::End
        } else {
            TextAnchor::Middle
        }
    }

    fn axis(&self, name: &str, index: usize, count: usize) -> RadarAxis {
        let radar = &self.config.radar;
        let angle = axis_angle(index, count);
        let label_position = self.polar(angle, radar.max_radius * radar.label_factor + radar.label_offset);
        RadarAxis {
            name: name.to_string(),
            angle,
            line_end: self.score_point(angle, 1.0),
            label: AxisLabel {
                position: label_position,
                anchor: self.anchor_for(&label_position),
                lines: split_camel_case(name),
                line_height_em: radar.line_height_em,
            },
        }
    }

    fn series(&self, features: &[String], entry: &SlotRow<'_>) -> RadarSeries {
        let values: Vec<f64> = features
            .iter()
            .map(|feature| match entry.row.number(feature) {
                Some(value) => {
                    if !(0.0..=1.0).contains(&value) {
                        debug!("{}: {} = {} clamped into [0,1]", entry.entity, feature, value);
                    }
                    clamp_score(value)
                }
                None => {
                    debug!("{}: no numeric value for {}, plotting 0", entry.entity, feature);
                    0.0
                }
            })
            .collect();

        let mut points: Vec<Point> = values
            .iter()
            .enumerate()
            .map(|(i, value)| self.score_point(axis_angle(i, features.len()), *value))
            .collect();
        if let Some(first) = points.first().copied() {
            points.push(first);
        }

        RadarSeries {
            entity: entry.entity.to_string(),
            slot: entry.slot,
            color: self.config.color(entry.slot).to_string(),
            values,
            points,
        }
    }

    /// Project the rows found for the selected entities.
    ///
    /// `entries` holds at most one row per selection slot, in slot order.
    /// Returns `None` ("no data") when no row was found or the reference row
    /// has no feature columns.
    pub fn project(&self, entries: &[SlotRow<'_>]) -> Option<RadarChart> {
        let reference = match entries.first() {
            Some(entry) => entry,
            None => {
                debug!("No RollUpScores rows for the selection; radar skipped");
                return None;
            }
        };

        let features: Vec<String> = reference
            .row
            .data_columns(ReservedColumns::ENTITY, KeyMatch::Normalized)
            .into_iter()
            .map(str::to_string)
            .collect();
        if features.is_empty() {
            warn!("RollUpScores row for '{}' has no feature columns", reference.entity);
            return None;
        }
        debug!("Radar features (axes): {:?}", features);

        for entry in entries.iter().skip(1) {
            let missing: Vec<&String> = features.iter().filter(|f| !entry.row.contains(f)).collect();
            if !missing.is_empty() {
                warn!(
                    "RollUpScores row for '{}' lacks {:?}; plotting those axes at 0",
                    entry.entity, missing
                );
            }
        }

        let radar = &self.config.radar;
        let axes = features
            .iter()
            .enumerate()
            .map(|(i, name)| self.axis(name, i, features.len()))
            .collect();
        let series: Vec<RadarSeries> = entries.iter().map(|entry| self.series(&features, entry)).collect();
        let legend = series
            .iter()
            .map(|s| LegendEntry {
                entity: s.entity.clone(),
                slot: s.slot,
                color: s.color.clone(),
            })
            .collect();

        Some(RadarChart {
            width: radar.width,
            height: radar.height,
            center: self.center(),
            max_radius: radar.max_radius,
            rings: radar
                .ticks
                .iter()
                .map(|&value| Ring {
                    value,
                    radius: clamp_score(value) * radar.max_radius,
                })
                .collect(),
            axes,
            series,
            legend,
        })
    }
}
