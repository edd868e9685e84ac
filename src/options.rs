//! Host-supplied chart configuration.

use serde::{Deserialize, Serialize};

use crate::axis::AxisConfig;
use crate::error::ChartError;
use crate::pipeline::{FrameData, FrameProperties};

/// Legend configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LegendOptions {
    /// Draw the legend.
    #[serde(default = "default_display")]
    pub display: bool,
}

impl Default for LegendOptions {
    fn default() -> Self {
        Self { display: true }
    }
}

fn default_display() -> bool {
    true
}

/// Per-axis configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AxesOptions {
    /// Horizontal axis.
    #[serde(default)]
    pub x: AxisConfig,
    /// Vertical axis.
    #[serde(default)]
    pub y: AxisConfig,
}

/// Chart options (`props.options`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartOptions {
    /// Legend configuration.
    #[serde(default)]
    pub legend: LegendOptions,
    /// Width over height of the plot area; unset fills the bounds.
    #[serde(default)]
    pub aspect_ratio: Option<f32>,
    /// Axis configuration.
    #[serde(default)]
    pub axes: AxesOptions,
    /// Keep both axes the same width, each centered on its own data.
    #[serde(default, rename = "syncXYWindowSize")]
    pub sync_xy_window_size: bool,
}

impl ChartOptions {
    /// Usable aspect ratio, if configured.
    pub fn aspect_ratio(&self) -> Option<f32> {
        self.aspect_ratio
            .filter(|ratio| ratio.is_finite() && *ratio > 0.0)
    }
}

/// Everything a host passes to the chart component.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GraphProps {
    /// Chart title.
    #[serde(default)]
    pub title: Option<String>,
    /// Chart options; required at mount.
    #[serde(default)]
    pub options: Option<ChartOptions>,
    /// Entity styles; required at mount.
    #[serde(default)]
    pub properties: Option<FrameProperties>,
    /// Entity data for the current frame.
    #[serde(default)]
    pub data: Option<FrameData>,
}

impl GraphProps {
    /// Decode props from a JSON string.
    pub fn from_json(json: &str) -> Result<Self, ChartError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Decode props from a JSON value.
    pub fn from_value(value: serde_json::Value) -> Result<Self, ChartError> {
        Ok(serde_json::from_value(value)?)
    }

    /// Options and properties, the two blocks a chart cannot be built without.
    pub fn required(&self) -> Result<(&ChartOptions, &FrameProperties), ChartError> {
        let properties = self
            .properties
            .as_ref()
            .ok_or(ChartError::MissingConfig("properties"))?;
        let options = self
            .options
            .as_ref()
            .ok_or(ChartError::MissingConfig("options"))?;
        Ok((options, properties))
    }
}
