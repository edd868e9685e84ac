//! GPUI integration for gpui_trajplot.
//!
//! This module provides a GPUI view that renders a
//! [`LiveChart`](crate::chart::LiveChart) and a painter that replays a
//! [`RenderList`](crate::render::RenderList) onto a GPUI window.

mod paint;
mod view;

pub use paint::GpuiPainter;
pub use view::{ChartHandle, GpuiChartView};
