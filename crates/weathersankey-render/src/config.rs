//! Chart configuration.
//!
//! One immutable [`ChartConfig`] is passed into every render. Nothing in a render writes back
//! into it; values that depend on the canvas size are derived into
//! [`crate::model::ChartMetrics`] per call.

use crate::model::LayoutCanvas;
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use weathersankey_core::{ColumnMapping, ConditionRegistry, SortMode};

/// Reference canvas the top margin and icon size were tuned for.
const REFERENCE_HEIGHT: f64 = 650.0;
const REFERENCE_WIDTH: f64 = 1024.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Margins {
    /// Space above the sankey for condition icons, at the reference height.
    pub sankey_top: f64,
    /// Space below the sankey for date labels.
    pub sankey_bottom: f64,
    /// Space below the temperature chart.
    pub temp: f64,
}

impl Default for Margins {
    fn default() -> Self {
        Self {
            sankey_top: 60.0,
            sankey_bottom: 25.0,
            temp: 15.0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ChartConfig {
    pub width: f64,
    pub height: f64,
    pub left_margin: f64,
    pub margins: Margins,
    /// Icon size at the reference width.
    pub icon_size: f64,
    pub temp_height: f64,
    pub sort: SortMode,
    pub unit: String,
    pub high_color: String,
    pub low_color: String,
    pub columns: ColumnMapping,
    pub registry: ConditionRegistry,
    pub node_thickness: f64,
    pub node_gap: f64,
    pub iterations: usize,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 1024.0,
            height: 768.0,
            left_margin: 20.0,
            margins: Margins::default(),
            icon_size: 50.0,
            temp_height: 100.0,
            sort: SortMode::None,
            unit: "°F".to_string(),
            high_color: "#ef476f".to_string(),
            low_color: "#457b9d".to_string(),
            columns: ColumnMapping::default(),
            registry: ConditionRegistry::reference(),
            node_thickness: 10.0,
            node_gap: 10.0,
            iterations: 6,
        }
    }
}

impl ChartConfig {
    /// Reads a (possibly partial) JSON object; missing keys keep their defaults.
    pub fn from_json(value: &Value) -> Result<Self> {
        let cfg: Self = serde_json::from_value(Value::clone(value))?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn with_size(mut self, width: f64, height: f64) -> Self {
        self.width = width;
        self.height = height;
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = unit.into();
        self
    }

    pub fn with_columns(mut self, columns: ColumnMapping) -> Self {
        self.columns = columns;
        self
    }

    pub fn with_registry(mut self, registry: ConditionRegistry) -> Self {
        self.registry = registry;
        self
    }

    pub fn with_temp_chart_height(mut self, height: f64) -> Self {
        self.temp_height = height;
        self
    }

    pub fn validate(&self) -> Result<()> {
        let positive = [
            ("width", self.width),
            ("height", self.height),
            ("tempHeight", self.temp_height),
        ];
        for (name, v) in positive {
            if !(v.is_finite() && v > 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be positive and finite, got {v}"),
                });
            }
        }
        let non_negative = [
            ("leftMargin", self.left_margin),
            ("margins.sankeyTop", self.margins.sankey_top),
            ("margins.sankeyBottom", self.margins.sankey_bottom),
            ("margins.temp", self.margins.temp),
            ("iconSize", self.icon_size),
            ("nodeThickness", self.node_thickness),
            ("nodeGap", self.node_gap),
        ];
        for (name, v) in non_negative {
            if !(v.is_finite() && v >= 0.0) {
                return Err(Error::InvalidConfig {
                    message: format!("{name} must be non-negative and finite, got {v}"),
                });
            }
        }
        if self.left_margin >= self.width {
            return Err(Error::InvalidConfig {
                message: format!(
                    "leftMargin {} leaves no room in width {}",
                    self.left_margin, self.width
                ),
            });
        }
        Ok(())
    }

    /// Top margin scaled to the configured height.
    pub fn effective_sankey_top(&self) -> f64 {
        self.height / REFERENCE_HEIGHT * self.margins.sankey_top
    }

    /// Icon size scaled to the configured width.
    pub fn effective_icon_size(&self) -> f64 {
        self.width / REFERENCE_WIDTH * self.icon_size
    }

    /// Canvas handed to the flow layout. The chart draws the flow vertically, so the flow axis
    /// is the leftover height and the band axis is the width right of the margin.
    pub fn sankey_canvas(&self) -> LayoutCanvas {
        LayoutCanvas {
            width: self.height
                - self.temp_height
                - self.effective_sankey_top()
                - self.margins.sankey_bottom
                - self.margins.temp,
            height: self.width - self.left_margin,
            node_thickness: self.node_thickness,
            node_gap: self.node_gap,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_canvas_follows_reference_chart() {
        let cfg = ChartConfig::default();
        let top = 768.0 / 650.0 * 60.0;
        assert_eq!(cfg.effective_sankey_top(), top);
        assert_eq!(cfg.effective_icon_size(), 50.0);
        let canvas = cfg.sankey_canvas();
        assert_eq!(canvas.width, 768.0 - 100.0 - top - 25.0 - 15.0);
        assert_eq!(canvas.height, 1004.0);
    }

    #[test]
    fn partial_json_keeps_defaults() {
        let cfg = ChartConfig::from_json(&serde_json::json!({
            "width": 800,
            "sort": "ascending",
            "unit": "°C",
            "columns": { "date": "datetime" }
        }))
        .expect("config");
        assert_eq!(cfg.width, 800.0);
        assert_eq!(cfg.height, 768.0);
        assert_eq!(cfg.sort, SortMode::Ascending);
        assert_eq!(cfg.columns.date, "datetime");
        assert_eq!(cfg.columns.high, "high");
        assert_eq!(cfg.registry.len(), 5);
    }

    #[test]
    fn rejects_nonsense_sizes() {
        let err = ChartConfig::from_json(&serde_json::json!({ "height": -1 })).unwrap_err();
        assert!(matches!(err, Error::InvalidConfig { .. }));
        let err = ChartConfig::from_json(&serde_json::json!({ "sort": "sideways" })).unwrap_err();
        assert!(matches!(err, Error::Json(_)));
    }
}
