use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};

use gpui::prelude::*;
use gpui::{Window, canvas, div};

use crate::chart::{ChartSurface, LiveChart, Redraw};
use crate::options::GraphProps;
use crate::pipeline::{FrameData, FrameProperties, FrameSummary};

use super::paint::{paint_render_list, to_hsla, to_screen_rect};

/// A GPUI view that renders a [`LiveChart`].
///
/// The chart is shared behind a lock so frames can be pushed from other
/// tasks through a [`ChartHandle`]; call [`GpuiChartView::flush`] afterwards
/// to turn the chart's redraw request into a GPUI notification.
#[derive(Clone)]
pub struct GpuiChartView {
    chart: Arc<RwLock<LiveChart>>,
    pending: Arc<AtomicBool>,
}

struct ViewSurface {
    pending: Arc<AtomicBool>,
}

impl ChartSurface for ViewSurface {
    fn request_redraw(&mut self, _mode: Redraw) {
        self.pending.store(true, Ordering::Release);
    }

    fn release(&mut self) {
        self.pending.store(false, Ordering::Release);
    }
}

impl GpuiChartView {
    /// Wrap a mounted chart, binding it to this view.
    pub fn new(mut chart: LiveChart) -> Self {
        let pending = Arc::new(AtomicBool::new(false));
        chart.attach_surface(ViewSurface {
            pending: Arc::clone(&pending),
        });
        Self {
            chart: Arc::new(RwLock::new(chart)),
            pending,
        }
    }

    /// Mount a chart from host props; `None` when required props are missing.
    pub fn mount(props: &GraphProps) -> Option<Self> {
        LiveChart::mount(props).map(Self::new)
    }

    /// Get a handle for mutating the underlying chart.
    ///
    /// This is useful for streaming frames from async tasks.
    pub fn chart_handle(&self) -> ChartHandle {
        ChartHandle {
            chart: Arc::clone(&self.chart),
        }
    }

    /// Apply new host props and notify GPUI if the chart asked for a redraw.
    pub fn set_props(&mut self, props: &GraphProps, cx: &mut Context<Self>) {
        self.chart_handle().write(|chart| chart.update_props(props));
        self.flush(cx);
    }

    /// Apply one frame and notify GPUI if the chart asked for a redraw.
    pub fn push_frame(
        &mut self,
        data: Option<&FrameData>,
        properties: Option<&FrameProperties>,
        cx: &mut Context<Self>,
    ) -> Option<FrameSummary> {
        let summary = self.chart_handle().update(data, properties);
        self.flush(cx);
        summary
    }

    /// Forward a pending redraw request to GPUI.
    pub fn flush(&self, cx: &mut Context<Self>) {
        if self.pending.swap(false, Ordering::AcqRel) {
            cx.notify();
        }
    }
}

impl Render for GpuiChartView {
    fn render(&mut self, _window: &mut Window, _cx: &mut Context<Self>) -> impl IntoElement {
        self.pending.store(false, Ordering::Release);
        let chart = Arc::clone(&self.chart);
        let background = chart.read().expect("chart lock").theme().background;

        div().size_full().bg(to_hsla(background)).child(
            canvas(
                move |bounds, _window, _cx| {
                    let mut chart = chart.write().expect("chart lock");
                    chart.render(to_screen_rect(bounds))
                },
                move |_, list, window, cx| {
                    paint_render_list(&list, window, cx);
                },
            )
            .size_full(),
        )
    }
}

/// Shared access to the chart behind a [`GpuiChartView`].
#[derive(Clone)]
pub struct ChartHandle {
    chart: Arc<RwLock<LiveChart>>,
}

impl ChartHandle {
    /// Read the chart.
    pub fn read<R>(&self, f: impl FnOnce(&LiveChart) -> R) -> R {
        let chart = self.chart.read().expect("chart lock");
        f(&chart)
    }

    /// Mutate the chart.
    pub fn write<R>(&self, f: impl FnOnce(&mut LiveChart) -> R) -> R {
        let mut chart = self.chart.write().expect("chart lock");
        f(&mut chart)
    }

    /// Apply one frame.
    pub fn update(
        &self,
        data: Option<&FrameData>,
        properties: Option<&FrameProperties>,
    ) -> Option<FrameSummary> {
        self.write(|chart| chart.update(data, properties))
    }
}
