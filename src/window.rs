//! Axis window controller: recomputes visible axis ranges from the data.
//!
//! Each axis follows its own [`AxisWindow`] policy unless joint auto-fit is
//! enabled, in which case both axes get the same width (the larger of the
//! two data spans), each centered on its own data midpoint. Under joint
//! auto-fit one data unit covers the same distance on both axes for a
//! square plot area.

use crate::axis::{AxisConfig, AxisId, AxisWindow};
use crate::series::Series;
use crate::view::{Range, Viewport};

/// Extent of the visible, finite data on one axis.
///
/// Hidden series and non-finite or absent coordinates are skipped.
pub fn data_extent<'a>(series: impl IntoIterator<Item = &'a Series>, axis: AxisId) -> Option<Range> {
    let mut extent: Option<Range> = None;
    for series in series {
        if !series.is_visible() {
            continue;
        }
        for sample in series.points() {
            let value = match axis {
                AxisId::X => sample.finite_x(),
                AxisId::Y => sample.finite_y(),
            };
            let Some(value) = value else {
                continue;
            };
            extent = Some(match extent {
                None => Range::new(value, value),
                Some(mut existing) => {
                    existing.expand_to_include(value);
                    existing
                }
            });
        }
    }
    extent
}

/// Equal-width ranges for both axes, each centered on its own extent.
pub fn joint_fit(x: Range, y: Range) -> (Range, Range) {
    let width = x.span().max(y.span());
    (
        Range::centered(x.midpoint(), width),
        Range::centered(y.midpoint(), width),
    )
}

/// Holds per-axis range state and recomputes it on layout.
#[derive(Debug, Clone)]
pub struct AxisWindowController {
    x_window: AxisWindow,
    y_window: AxisWindow,
    sync_xy: bool,
    x: Option<Range>,
    y: Option<Range>,
}

impl AxisWindowController {
    /// Create a controller from axis configurations.
    pub fn new(x_axis: &AxisConfig, y_axis: &AxisConfig, sync_xy: bool) -> Self {
        Self {
            x_window: x_axis.window(),
            y_window: y_axis.window(),
            sync_xy,
            x: None,
            y: None,
        }
    }

    /// Whether joint auto-fit is active.
    pub fn is_synced(&self) -> bool {
        self.sync_xy
    }

    /// Policy of one axis.
    pub fn window(&self, axis: AxisId) -> AxisWindow {
        match axis {
            AxisId::X => self.x_window,
            AxisId::Y => self.y_window,
        }
    }

    /// Current range of one axis, if computed.
    pub fn range(&self, axis: AxisId) -> Option<Range> {
        match axis {
            AxisId::X => self.x,
            AxisId::Y => self.y,
        }
    }

    /// Current viewport, once both axes have a range.
    pub fn viewport(&self) -> Option<Viewport> {
        Some(Viewport::new(self.x?, self.y?))
    }

    /// Recompute both axis ranges from the given series.
    ///
    /// Axes without usable data keep their previous range.
    pub fn refresh<'a, I>(&mut self, series: I) -> Option<Viewport>
    where
        I: IntoIterator<Item = &'a Series>,
        I::IntoIter: Clone,
    {
        let series = series.into_iter();
        let x_extent = data_extent(series.clone(), AxisId::X);
        let y_extent = data_extent(series, AxisId::Y);

        if self.sync_xy {
            if let (Some(x_extent), Some(y_extent)) = (x_extent, y_extent) {
                let (x, y) = joint_fit(x_extent, y_extent);
                self.x = Some(x);
                self.y = Some(y);
            }
        } else {
            self.x = apply_window(self.x_window, x_extent, self.x);
            self.y = apply_window(self.y_window, y_extent, self.y);
        }
        log::trace!("axis windows x={:?} y={:?}", self.x, self.y);
        self.viewport()
    }
}

/// Apply a single-axis policy.
///
/// A fixed window centers on the configured midpoint, else the data
/// midpoint, else the previous midpoint, else zero, so its width is always
/// the configured size.
pub fn apply_window(window: AxisWindow, extent: Option<Range>, previous: Option<Range>) -> Option<Range> {
    match window {
        AxisWindow::Fixed { size, mid } => {
            let mid = mid
                .or_else(|| extent.map(|extent| extent.midpoint()))
                .or_else(|| previous.map(|previous| previous.midpoint()))
                .unwrap_or(0.0);
            Some(Range::centered(mid, size))
        }
        AxisWindow::Bounded { min, max } => {
            let min = min.or_else(|| extent.map(|extent| extent.min));
            let max = max.or_else(|| extent.map(|extent| extent.max));
            match (min, max) {
                (Some(min), Some(max)) => Some(Range::new(min, max)),
                _ => previous,
            }
        }
        AxisWindow::Data => extent.or(previous),
    }
}
