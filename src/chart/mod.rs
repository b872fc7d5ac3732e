//! Chart-ready structures derived from score rows
//!
//! Projectors produce coordinates, labels and datasets; painting them is left
//! to whatever rendering surface consumes the output.
//!
//! - `radar`: closed-polygon spider chart over the RollUpScores features
//! - `continuum`: bipolar horizontal scales over the ContrastScores labels

pub mod continuum;
pub mod radar;

pub use continuum::{
    split_scale_label, CategoryAxis, ContinuumChart, ContinuumPoint, ContinuumProjector,
    ContinuumScale, ContinuumSeries, GuideLine, PoleLabel, ValueAxis, SCALE_SEPARATOR,
};
pub use radar::{axis_angle, split_camel_case, AxisLabel, RadarAxis, RadarChart, RadarProjector, RadarSeries, Ring};

use serde::Serialize;

/// A point in canvas (radar) or data (continuum) coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(&self, other: &Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Horizontal text alignment relative to a label's anchor point
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAnchor {
    Start,
    Middle,
    End,
}

/// Legend entry for one plotted entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub entity: String,
    /// Selection slot (0 = first entity, 1 = second)
    pub slot: usize,
    pub color: String,
}

/// One selected entity's row, tagged with its selection slot
#[derive(Debug, Clone, Copy)]
pub struct SlotRow<'a> {
    pub slot: usize,
    pub entity: &'a str,
    pub row: &'a crate::table::Row,
}
