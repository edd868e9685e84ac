//! Axis configuration, windowing policy, ticks, and formatting.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::view::Range;

const MAX_TICKS: usize = 1000;

/// One of the two chart axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AxisId {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

/// Windowing policy of a single axis.
///
/// Joint square auto-fit is a chart-level setting and overrides these
/// per-axis policies (see [`AxisWindowController`](crate::window::AxisWindowController)).
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AxisWindow {
    /// Fixed-size window centered on a configured or computed midpoint.
    Fixed {
        /// Window width in data units.
        size: f64,
        /// Fixed midpoint; the data midpoint is used when absent.
        mid: Option<f64>,
    },
    /// Configured bounds; missing sides follow the data extent.
    Bounded {
        /// Lower bound.
        min: Option<f64>,
        /// Upper bound.
        max: Option<f64>,
    },
    /// Follow the data extent.
    Data,
}

/// Formatter for axis tick labels.
#[derive(Clone, Default)]
pub enum AxisFormatter {
    /// Numeric formatter with precision derived from the tick step.
    #[default]
    Default,
    /// Custom formatter callback.
    Custom(Arc<dyn Fn(f64) -> String + Send + Sync>),
}

impl AxisFormatter {
    /// Format a tick value produced with the given step.
    pub fn format(&self, value: f64, step: f64) -> String {
        match self {
            Self::Default => {
                let decimals = if step > 0.0 && step.is_finite() {
                    (-step.log10().floor()).clamp(0.0, 6.0) as usize
                } else {
                    2
                };
                // Avoid printing "-0".
                let value = if value.abs() < step.abs() * 1e-9 { 0.0 } else { value };
                format!("{value:.decimals$}")
            }
            Self::Custom(formatter) => formatter(value),
        }
    }
}

impl std::fmt::Debug for AxisFormatter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Default => write!(f, "AxisFormatter::Default"),
            Self::Custom(_) => write!(f, "AxisFormatter::Custom(..)"),
        }
    }
}

/// Axis options as supplied by the host (`options.axes.x` / `options.axes.y`).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AxisConfig {
    /// Axis title.
    #[serde(default)]
    pub label_string: Option<String>,
    /// Lower bound.
    #[serde(default)]
    pub min: Option<f64>,
    /// Upper bound.
    #[serde(default)]
    pub max: Option<f64>,
    /// Tick spacing in data units.
    #[serde(default)]
    pub step_size: Option<f64>,
    /// Fixed window width in data units.
    #[serde(default)]
    pub window_size: Option<f64>,
    /// Fixed window midpoint.
    #[serde(default)]
    pub mid_value: Option<f64>,
    #[serde(skip)]
    formatter: AxisFormatter,
}

impl AxisConfig {
    /// Create an axis that follows the data extent.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the axis title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.label_string = Some(title.into());
        self
    }

    /// Set fixed bounds.
    pub fn with_bounds(mut self, min: f64, max: f64) -> Self {
        self.min = Some(min);
        self.max = Some(max);
        self
    }

    /// Set the tick step.
    pub fn with_step(mut self, step: f64) -> Self {
        self.step_size = Some(step);
        self
    }

    /// Use a fixed-size window, optionally pinned to a midpoint.
    pub fn with_window(mut self, size: f64, mid: Option<f64>) -> Self {
        self.window_size = Some(size);
        self.mid_value = mid;
        self
    }

    /// Set the tick formatter.
    pub fn with_formatter(mut self, formatter: AxisFormatter) -> Self {
        self.formatter = formatter;
        self
    }

    /// Access the axis title.
    pub fn title(&self) -> Option<&str> {
        self.label_string.as_deref()
    }

    /// Access the formatter.
    pub fn formatter(&self) -> &AxisFormatter {
        &self.formatter
    }

    /// Windowing policy derived from the configuration.
    ///
    /// A non-positive or non-finite window size is ignored.
    pub fn window(&self) -> AxisWindow {
        match self.window_size.filter(|size| size.is_finite() && *size > 0.0) {
            Some(size) => AxisWindow::Fixed {
                size,
                mid: self.mid_value.filter(|mid| mid.is_finite()),
            },
            None if self.min.is_some() || self.max.is_some() => AxisWindow::Bounded {
                min: self.min.filter(|min| min.is_finite()),
                max: self.max.filter(|max| max.is_finite()),
            },
            None => AxisWindow::Data,
        }
    }

    /// Tick step used for a range: the configured step, or a nice step
    /// targeting `target` ticks.
    pub fn tick_step(&self, range: Range, target: usize) -> f64 {
        let span = range.span();
        match self.step_size.filter(|step| step.is_finite() && *step > 0.0) {
            Some(step) if span / step <= MAX_TICKS as f64 => step,
            _ => nice_step(span, target),
        }
    }

    /// Tick positions inside `range`.
    pub fn ticks(&self, range: Range, target: usize) -> Vec<f64> {
        if !range.is_finite() {
            return Vec::new();
        }
        let step = self.tick_step(range, target);
        let first = (range.min / step).ceil();
        let mut ticks = Vec::new();
        for i in 0..=MAX_TICKS {
            let value = (first + i as f64) * step;
            if value > range.max + step * 1e-9 {
                break;
            }
            ticks.push(value);
        }
        ticks
    }
}

fn nice_step(span: f64, target: usize) -> f64 {
    if !span.is_finite() || span <= 0.0 {
        return 1.0;
    }
    let raw = span / target.max(1) as f64;
    let magnitude = 10_f64.powf(raw.log10().floor());
    let normalized = raw / magnitude;
    let nice = if normalized <= 1.0 {
        1.0
    } else if normalized <= 2.0 {
        2.0
    } else if normalized <= 5.0 {
        5.0
    } else {
        10.0
    };
    nice * magnitude
}
