//! Dashboard configuration
//!
//! Every section has defaults matching the stock dashboard layout, so an empty
//! YAML file (or no file) yields a working configuration.

use crate::error::{ContrastError, ContrastResult};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tracing::info;

/// Data source settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    /// Endpoint answering `?sheet=<Table>` with `{success, rows, error}`
    pub base_url: Option<String>,
    /// Request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
        }
    }
}

impl SourceConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Local read-through cache settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    pub enabled: bool,
    /// Directory holding one JSON file per table
    pub dir: String,
    /// Entry lifetime in seconds
    pub ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            dir: ".contrast-cache".to_string(),
            ttl_secs: 3600, // 1 hour
        }
    }
}

/// Radar chart geometry, in canvas pixels
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RadarConfig {
    pub width: f64,
    pub height: f64,
    /// Radius of a score of 1.0
    pub max_radius: f64,
    /// Label radius as a multiple of `max_radius`
    pub label_factor: f64,
    /// Extra label distance added after `label_factor`
    pub label_offset: f64,
    /// Horizontal band around the centre where labels are middle-anchored
    pub anchor_dead_zone: f64,
    /// Spacing between stacked label lines, in em
    pub line_height_em: f64,
    /// Score levels drawn as concentric rings
    pub ticks: Vec<f64>,
}

impl Default for RadarConfig {
    fn default() -> Self {
        Self {
            width: 300.0,
            height: 400.0,
            max_radius: 125.0,
            label_factor: 1.2,
            label_offset: 0.0,
            anchor_dead_zone: 20.0,
            line_height_em: 1.2,
            ticks: vec![0.0, 0.25, 0.5, 0.75, 1.0],
        }
    }
}

/// Layout padding around the continuum plot area
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Padding {
    pub left: f64,
    pub right: f64,
    pub top: f64,
    pub bottom: f64,
}

impl Default for Padding {
    fn default() -> Self {
        Self {
            left: 150.0,
            right: 150.0,
            top: 20.0,
            bottom: 20.0,
        }
    }
}

/// Continuum chart layout
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContinuumConfig {
    /// Horizontal pixel shift of pole labels away from the plot area
    pub label_offset: f64,
    /// First discovered scale at the top
    pub reverse: bool,
    pub point_radius: f64,
    /// Tick spacing along the [0,1] axis
    pub tick_step: f64,
    pub padding: Padding,
}

impl Default for ContinuumConfig {
    fn default() -> Self {
        Self {
            label_offset: 150.0,
            reverse: true,
            point_radius: 12.0,
            tick_step: 0.5,
            padding: Padding::default(),
        }
    }
}

/// Complete dashboard configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    pub cache: CacheConfig,
    pub radar: RadarConfig,
    pub continuum: ContinuumConfig,
    /// Series colours, indexed by selection slot
    pub palette: Vec<String>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            cache: CacheConfig::default(),
            radar: RadarConfig::default(),
            continuum: ContinuumConfig::default(),
            palette: vec!["darkorange".to_string(), "green".to_string()],
        }
    }
}

impl DashboardConfig {
    /// Parse a YAML document; missing keys take their defaults
    pub fn from_yaml_str(yaml: &str) -> ContrastResult<Self> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_yaml_file(path: impl AsRef<Path>) -> ContrastResult<Self> {
        let path = path.as_ref();
        info!("Loading configuration from {:?}", path);
        let yaml = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&yaml)
    }

    pub fn validate(&self) -> ContrastResult<()> {
        if self.palette.is_empty() {
            return Err(ContrastError::Config("palette must list at least one colour".to_string()));
        }
        if !(self.radar.max_radius.is_finite() && self.radar.max_radius > 0.0) {
            return Err(ContrastError::Config(format!(
                "radar.max_radius must be positive, got {}",
                self.radar.max_radius
            )));
        }
        if !(self.radar.width > 0.0 && self.radar.height > 0.0) {
            return Err(ContrastError::Config("radar canvas must have a positive size".to_string()));
        }
        if !(self.continuum.tick_step > 0.0) {
            return Err(ContrastError::Config("continuum.tick_step must be positive".to_string()));
        }
        Ok(())
    }

    /// Colour of a selection slot; wraps around the palette
    pub fn color(&self, slot: usize) -> &str {
        self.palette
            .get(slot % self.palette.len().max(1))
            .map(String::as_str)
            .unwrap_or("black")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_layout() {
        let config = DashboardConfig::default();
        assert_eq!(config.radar.max_radius, 125.0);
        assert_eq!(config.radar.label_factor, 1.2);
        assert_eq!(config.continuum.label_offset, 150.0);
        assert_eq!(config.color(0), "darkorange");
        assert_eq!(config.color(3), "green");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = DashboardConfig::from_yaml_str(
            "source:\n  base_url: http://localhost:9000/exec\nradar:\n  max_radius: 250\n",
        )
        .unwrap();
        assert_eq!(config.source.base_url.as_deref(), Some("http://localhost:9000/exec"));
        assert_eq!(config.source.timeout_secs, 30);
        assert_eq!(config.radar.max_radius, 250.0);
        assert_eq!(config.radar.width, 300.0);
        assert!(config.cache.enabled);
    }

    #[test]
    fn test_empty_yaml_is_default() {
        assert_eq!(DashboardConfig::from_yaml_str("  \n").unwrap(), DashboardConfig::default());
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(matches!(
            DashboardConfig::from_yaml_str("palette: []"),
            Err(ContrastError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_yaml_str("radar:\n  max_radius: -1"),
            Err(ContrastError::Config(_))
        ));
        assert!(matches!(
            DashboardConfig::from_yaml_str("radar: [1, 2"),
            Err(ContrastError::Yaml(_))
        ));
    }
}
