//! One render pass of a [`LiveChart`](crate::chart::LiveChart).

use crate::chart::LiveChart;
use crate::geom::{Point as DataPoint, ScreenPoint, ScreenRect};
use crate::overlay::DrawContext;
use crate::series::Series;
use crate::style::Theme;
use crate::transform::Transform;
use crate::view::Viewport;

use super::{
    Color, DrawBackend, LineSegment, LineStyle, MarkerStyle, PolygonStyle, RectStyle, TextAlign,
    TextStyle, build_line_segments, build_scatter_points, smooth_path,
};

const PADDING: f32 = 8.0;
const TITLE_HEIGHT: f32 = 24.0;
const LEGEND_ROW_HEIGHT: f32 = 20.0;
const LEGEND_SWATCH: f32 = 12.0;
const LEGEND_GAP: f32 = 4.0;
const LEGEND_ENTRY_GAP: f32 = 12.0;
const LEGEND_FONT_SIZE: f32 = 12.0;
const LEGEND_HIDDEN_ALPHA: f32 = 0.35;
const Y_AXIS_WIDTH: f32 = 48.0;
const X_AXIS_HEIGHT: f32 = 28.0;
const AXIS_TITLE_HEIGHT: f32 = 18.0;
const TICK_LENGTH: f32 = 5.0;
const LABEL_GAP: f32 = 3.0;
const X_TICK_SPACING: f32 = 80.0;
const Y_TICK_SPACING: f32 = 50.0;
const CHAR_WIDTH: f32 = 0.6;
const SMOOTH_STEPS: usize = 12;
const FILL_ALPHA: f32 = 0.3;

/// Screen regions of one chart frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLayout {
    /// Area the chart occupies after aspect-ratio fitting.
    pub bounds: ScreenRect,
    /// Data area; series are clipped to it.
    pub plot: ScreenRect,
    /// Strip below the plot holding X tick labels.
    pub x_axis: ScreenRect,
    /// Strip left of the plot holding Y tick labels.
    pub y_axis: ScreenRect,
    /// Title row, when a title is set.
    pub title: Option<ScreenRect>,
    /// Legend rows, when the legend is shown.
    pub legend: Option<ScreenRect>,
}

impl ChartLayout {
    /// Split `bounds` into chart regions.
    pub fn new(
        bounds: ScreenRect,
        aspect_ratio: Option<f32>,
        has_title: bool,
        legend_rows: usize,
        has_x_title: bool,
        has_y_title: bool,
    ) -> Self {
        let bounds = aspect_ratio
            .map(|ratio| fit_aspect(bounds, ratio))
            .unwrap_or(bounds);
        let inner_left = bounds.min.x + PADDING;
        let inner_right = bounds.max.x - PADDING;
        let mut top = bounds.min.y + PADDING;

        let title = if has_title {
            let rect = row(inner_left, inner_right, top, TITLE_HEIGHT);
            top += TITLE_HEIGHT;
            Some(rect)
        } else {
            None
        };
        let legend = if legend_rows > 0 {
            let height = legend_rows as f32 * LEGEND_ROW_HEIGHT;
            let rect = row(inner_left, inner_right, top, height);
            top += height;
            Some(rect)
        } else {
            None
        };
        if has_y_title {
            top += AXIS_TITLE_HEIGHT;
        }

        let mut bottom = bounds.max.y - PADDING - X_AXIS_HEIGHT;
        if has_x_title {
            bottom -= AXIS_TITLE_HEIGHT;
        }
        let left = inner_left + Y_AXIS_WIDTH;
        let plot = ScreenRect::new(
            ScreenPoint::new(left, top),
            ScreenPoint::new(inner_right.max(left + 1.0), bottom.max(top + 1.0)),
        );
        let x_axis = ScreenRect::new(
            ScreenPoint::new(plot.min.x, plot.max.y),
            ScreenPoint::new(plot.max.x, plot.max.y + X_AXIS_HEIGHT),
        );
        let y_axis = ScreenRect::new(
            ScreenPoint::new(plot.min.x - Y_AXIS_WIDTH, plot.min.y),
            ScreenPoint::new(plot.min.x, plot.max.y),
        );

        Self {
            bounds,
            plot,
            x_axis,
            y_axis,
            title,
            legend,
        }
    }
}

fn row(left: f32, right: f32, top: f32, height: f32) -> ScreenRect {
    ScreenRect::new(
        ScreenPoint::new(left, top),
        ScreenPoint::new(right.max(left), top + height),
    )
}

/// Largest rectangle with `width / height == ratio` centered in `bounds`.
pub(crate) fn fit_aspect(bounds: ScreenRect, ratio: f32) -> ScreenRect {
    if !(ratio.is_finite() && ratio > 0.0) || !bounds.is_valid() {
        return bounds;
    }
    let (width, height) = if bounds.width() / bounds.height() > ratio {
        (bounds.height() * ratio, bounds.height())
    } else {
        (bounds.width(), bounds.width() / ratio)
    };
    ScreenRect::from_origin_size(
        bounds.min.x + (bounds.width() - width) * 0.5,
        bounds.min.y + (bounds.height() - height) * 0.5,
        width,
        height,
    )
}

/// Estimated advance of `text` at `size`; backends measure exactly.
pub(crate) fn text_width(text: &str, size: f32) -> f32 {
    text.chars().count() as f32 * size * CHAR_WIDTH
}

struct LegendItem {
    label: String,
    color: Color,
    visible: bool,
    width: f32,
}

fn legend_items(chart: &LiveChart) -> Vec<LegendItem> {
    chart
        .legend_entries()
        .map(|series| {
            let label = series.label().text.clone();
            LegendItem {
                width: LEGEND_SWATCH + LEGEND_GAP + text_width(&label, LEGEND_FONT_SIZE),
                color: series.style().color,
                visible: series.is_visible(),
                label,
            }
        })
        .collect()
}

/// Greedy row wrapping; every row holds at least one item.
pub(crate) fn wrap_rows(widths: &[f32], max_width: f32) -> Vec<Vec<usize>> {
    let mut rows: Vec<Vec<usize>> = Vec::new();
    let mut used = 0.0;
    for (index, width) in widths.iter().enumerate() {
        match rows.last_mut() {
            Some(current) if used + LEGEND_ENTRY_GAP + width <= max_width => {
                used += LEGEND_ENTRY_GAP + width;
                current.push(index);
            }
            _ => {
                used = *width;
                rows.push(vec![index]);
            }
        }
    }
    rows
}

/// Draw a full frame of `chart` into `bounds`.
///
/// Returns `None` when the bounds are too small to draw anything.
pub(crate) fn build_frame(
    chart: &mut LiveChart,
    bounds: ScreenRect,
    backend: &mut dyn DrawBackend,
) -> Option<ChartLayout> {
    if bounds.width() <= 1.0 || bounds.height() <= 1.0 {
        return None;
    }

    let viewport = chart.refresh_viewport().unwrap_or_else(Viewport::unit);

    let items = if chart.options().legend.display {
        legend_items(chart)
    } else {
        Vec::new()
    };
    let bounds = chart
        .options()
        .aspect_ratio()
        .map(|ratio| fit_aspect(bounds, ratio))
        .unwrap_or(bounds);
    let legend_width = (bounds.width() - PADDING * 2.0).max(1.0);
    let widths: Vec<f32> = items.iter().map(|item| item.width).collect();
    let rows = wrap_rows(&widths, legend_width);

    let axes = &chart.options().axes;
    let layout = ChartLayout::new(
        bounds,
        None,
        chart.title().is_some(),
        rows.len(),
        axes.x.title().is_some(),
        axes.y.title().is_some(),
    );
    let theme = chart.theme();

    backend.draw_rect(
        layout.bounds,
        RectStyle {
            fill: theme.background,
            stroke: Color::TRANSPARENT,
            stroke_width: 0.0,
        },
    );

    if let Some(transform) = Transform::new(viewport, layout.plot) {
        build_grid(backend, chart, &transform, &layout);
        build_series(backend, chart, &transform, layout.plot);
        let ctx = DrawContext {
            registry: chart.registry(),
            transform: &transform,
            theme,
            plot_rect: layout.plot,
        };
        for plugin in chart.plugins() {
            plugin.after_draw(&ctx, backend);
        }
        build_axes(backend, chart, &transform, &layout);
    } else {
        log::debug!("invalid viewport {viewport:?}, skipping series");
        backend.draw_text(
            ScreenPoint::new(layout.plot.center_x(), layout.plot.min.y + layout.plot.height() * 0.5),
            "Invalid axis range",
            &TextStyle {
                color: theme.axis,
                size: 14.0,
                family: theme.font_family.clone(),
                align: TextAlign::Center,
            },
        );
    }

    if let Some(rect) = layout.legend {
        build_legend(backend, theme, &items, &rows, rect);
    }
    build_titles(backend, chart, &layout);

    Some(layout)
}

fn tick_target(pixels: f32, spacing: f32) -> usize {
    ((pixels / spacing).floor() as usize).max(2)
}

fn build_grid(
    backend: &mut dyn DrawBackend,
    chart: &LiveChart,
    transform: &Transform,
    layout: &ChartLayout,
) {
    let viewport = transform.viewport();
    let plot = layout.plot;
    let axes = &chart.options().axes;
    let mut grid = Vec::new();

    for value in axes.x.ticks(viewport.x, tick_target(plot.width(), X_TICK_SPACING)) {
        if let Some(point) = transform.data_to_screen(DataPoint::new(value, viewport.y.min)) {
            grid.push(LineSegment::new(
                ScreenPoint::new(point.x, plot.min.y),
                ScreenPoint::new(point.x, plot.max.y),
            ));
        }
    }
    for value in axes.y.ticks(viewport.y, tick_target(plot.height(), Y_TICK_SPACING)) {
        if let Some(point) = transform.data_to_screen(DataPoint::new(viewport.x.min, value)) {
            grid.push(LineSegment::new(
                ScreenPoint::new(plot.min.x, point.y),
                ScreenPoint::new(plot.max.x, point.y),
            ));
        }
    }

    backend.push_clip(plot);
    backend.draw_lines(
        &grid,
        LineStyle {
            color: chart.theme().grid,
            width: 1.0,
        },
    );
    backend.pop_clip();
}

fn build_series(
    backend: &mut dyn DrawBackend,
    chart: &LiveChart,
    transform: &Transform,
    plot_rect: ScreenRect,
) {
    let mut segments = Vec::new();
    let mut markers = Vec::new();
    backend.push_clip(plot_rect);
    for series in chart.registry().series() {
        if series.is_visible() {
            draw_series(backend, series, transform, plot_rect, &mut segments, &mut markers);
        }
    }
    backend.pop_clip();
}

fn draw_series(
    backend: &mut dyn DrawBackend,
    series: &Series,
    transform: &Transform,
    plot_rect: ScreenRect,
    segments: &mut Vec<LineSegment>,
    markers: &mut Vec<ScreenPoint>,
) {
    let style = series.style();
    let positions = series.positions();
    let closed = series.role().is_closed();
    let stroke = LineStyle {
        color: style.color,
        width: style.border_width,
    };

    if style.show_line {
        if closed && style.fill {
            let vertices: Vec<ScreenPoint> = positions
                .iter()
                .filter_map(|point| transform.data_to_screen(*point))
                .collect();
            backend.draw_polygon(
                &vertices,
                PolygonStyle {
                    fill: Some(style.color.with_alpha(style.color.a * FILL_ALPHA)),
                    stroke,
                },
            );
        } else if !closed && style.tension > 0.0 {
            let smoothed = smooth_path(&positions, f64::from(style.tension), SMOOTH_STEPS);
            build_line_segments(&smoothed, false, transform, plot_rect, segments);
            backend.draw_lines(segments, stroke);
        } else {
            build_line_segments(&positions, closed, transform, plot_rect, segments);
            backend.draw_lines(segments, stroke);
        }
    }

    if style.point_radius > 0.0 {
        build_scatter_points(&positions, transform, plot_rect, markers);
        backend.draw_points(
            markers,
            MarkerStyle {
                color: style.color,
                radius: style.point_radius,
            },
        );
    }
}

fn build_axes(
    backend: &mut dyn DrawBackend,
    chart: &LiveChart,
    transform: &Transform,
    layout: &ChartLayout,
) {
    let theme = chart.theme();
    let viewport = transform.viewport();
    let plot = layout.plot;
    let axes = &chart.options().axes;
    let axis_style = LineStyle {
        color: theme.axis,
        width: 1.0,
    };
    let mut lines = vec![
        LineSegment::new(
            ScreenPoint::new(plot.min.x, plot.max.y),
            ScreenPoint::new(plot.max.x, plot.max.y),
        ),
        LineSegment::new(
            ScreenPoint::new(plot.min.x, plot.min.y),
            ScreenPoint::new(plot.min.x, plot.max.y),
        ),
    ];
    let label_style = |align| TextStyle {
        color: theme.axis,
        size: theme.tick_size,
        family: theme.font_family.clone(),
        align,
    };

    let x_style = label_style(TextAlign::Center);
    let x_step = axes.x.tick_step(viewport.x, tick_target(plot.width(), X_TICK_SPACING));
    let mut last_right = f32::NEG_INFINITY;
    for value in axes.x.ticks(viewport.x, tick_target(plot.width(), X_TICK_SPACING)) {
        let Some(point) = transform.data_to_screen(DataPoint::new(value, viewport.y.min)) else {
            continue;
        };
        lines.push(LineSegment::new(
            ScreenPoint::new(point.x, plot.max.y),
            ScreenPoint::new(point.x, plot.max.y + TICK_LENGTH),
        ));
        let label = axes.x.formatter().format(value, x_step);
        let half = text_width(&label, x_style.size) * 0.5;
        if point.x - half < last_right + LABEL_GAP {
            continue;
        }
        last_right = point.x + half;
        backend.draw_text(
            ScreenPoint::new(
                point.x,
                plot.max.y + TICK_LENGTH + LABEL_GAP + x_style.size * 0.5,
            ),
            &label,
            &x_style,
        );
    }

    let y_style = label_style(TextAlign::Right);
    let y_step = axes.y.tick_step(viewport.y, tick_target(plot.height(), Y_TICK_SPACING));
    for value in axes.y.ticks(viewport.y, tick_target(plot.height(), Y_TICK_SPACING)) {
        let Some(point) = transform.data_to_screen(DataPoint::new(viewport.x.min, value)) else {
            continue;
        };
        lines.push(LineSegment::new(
            ScreenPoint::new(plot.min.x - TICK_LENGTH, point.y),
            ScreenPoint::new(plot.min.x, point.y),
        ));
        backend.draw_text(
            ScreenPoint::new(plot.min.x - TICK_LENGTH - LABEL_GAP, point.y),
            &axes.y.formatter().format(value, y_step),
            &y_style,
        );
    }

    backend.draw_lines(&lines, axis_style);
}

fn build_legend(
    backend: &mut dyn DrawBackend,
    theme: &Theme,
    items: &[LegendItem],
    rows: &[Vec<usize>],
    rect: ScreenRect,
) {
    for (row_index, row) in rows.iter().enumerate() {
        let row_width: f32 = row.iter().map(|&index| items[index].width).sum::<f32>()
            + LEGEND_ENTRY_GAP * row.len().saturating_sub(1) as f32;
        let center_y = rect.min.y + (row_index as f32 + 0.5) * LEGEND_ROW_HEIGHT;
        let mut x = rect.center_x() - row_width * 0.5;
        for &index in row {
            let item = &items[index];
            let alpha = if item.visible { 1.0 } else { LEGEND_HIDDEN_ALPHA };
            backend.draw_rect(
                ScreenRect::from_origin_size(
                    x,
                    center_y - LEGEND_SWATCH * 0.5,
                    LEGEND_SWATCH,
                    LEGEND_SWATCH,
                ),
                RectStyle {
                    fill: item.color.with_alpha(item.color.a * alpha),
                    stroke: item.color,
                    stroke_width: 1.0,
                },
            );
            backend.draw_text(
                ScreenPoint::new(x + LEGEND_SWATCH + LEGEND_GAP, center_y),
                &item.label,
                &TextStyle {
                    color: theme.text.with_alpha(theme.text.a * alpha),
                    size: LEGEND_FONT_SIZE,
                    family: theme.font_family.clone(),
                    align: TextAlign::Left,
                },
            );
            x += item.width + LEGEND_ENTRY_GAP;
        }
    }
}

fn axis_title_style(theme: &Theme, align: TextAlign) -> TextStyle {
    TextStyle {
        color: theme.text,
        size: theme.tick_size + 1.0,
        family: theme.font_family.clone(),
        align,
    }
}

fn build_titles(backend: &mut dyn DrawBackend, chart: &LiveChart, layout: &ChartLayout) {
    let theme = chart.theme();
    if let (Some(title), Some(rect)) = (chart.title(), layout.title) {
        backend.draw_text(
            ScreenPoint::new(rect.center_x(), rect.min.y + rect.height() * 0.5),
            title,
            &TextStyle {
                color: theme.text,
                size: theme.title_size,
                family: theme.font_family.clone(),
                align: TextAlign::Center,
            },
        );
    }

    let axes = &chart.options().axes;
    if let Some(title) = axes.x.title() {
        backend.draw_text(
            ScreenPoint::new(
                layout.plot.center_x(),
                layout.x_axis.max.y + AXIS_TITLE_HEIGHT * 0.5,
            ),
            title,
            &axis_title_style(theme, TextAlign::Center),
        );
    }
    if let Some(title) = axes.y.title() {
        backend.draw_text(
            ScreenPoint::new(
                layout.y_axis.min.x,
                layout.plot.min.y - AXIS_TITLE_HEIGHT * 0.5,
            ),
            title,
            &axis_title_style(theme, TextAlign::Left),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds() -> ScreenRect {
        ScreenRect::from_origin_size(0.0, 0.0, 400.0, 300.0)
    }

    #[test]
    fn layout_reserves_rows_top_to_bottom() {
        let layout = ChartLayout::new(bounds(), None, true, 2, true, false);
        let title = layout.title.expect("title row");
        let legend = layout.legend.expect("legend rows");
        assert_eq!(title.min.y, PADDING);
        assert_eq!(legend.min.y, title.max.y);
        assert_eq!(legend.height(), 2.0 * LEGEND_ROW_HEIGHT);
        assert_eq!(layout.plot.min.y, legend.max.y);
        assert_eq!(layout.plot.min.x, PADDING + Y_AXIS_WIDTH);
        assert_eq!(
            layout.plot.max.y,
            300.0 - PADDING - X_AXIS_HEIGHT - AXIS_TITLE_HEIGHT
        );
        assert_eq!(layout.x_axis.min.y, layout.plot.max.y);
        assert_eq!(layout.y_axis.max.x, layout.plot.min.x);
    }

    #[test]
    fn layout_without_chrome() {
        let layout = ChartLayout::new(bounds(), None, false, 0, false, false);
        assert!(layout.title.is_none());
        assert!(layout.legend.is_none());
        assert_eq!(layout.plot.min.y, PADDING);
        assert_eq!(layout.plot.max.x, 400.0 - PADDING);
    }

    #[test]
    fn aspect_ratio_is_centered() {
        let fitted = fit_aspect(bounds(), 1.0);
        assert_eq!(fitted, ScreenRect::from_origin_size(50.0, 0.0, 300.0, 300.0));
        let wide = fit_aspect(bounds(), 4.0);
        assert_eq!(wide, ScreenRect::from_origin_size(0.0, 100.0, 400.0, 100.0));
        assert_eq!(fit_aspect(bounds(), -1.0), bounds());
    }

    #[test]
    fn legend_rows_wrap() {
        let rows = wrap_rows(&[50.0, 50.0, 50.0, 200.0], 130.0);
        assert_eq!(rows, vec![vec![0, 1], vec![2], vec![3]]);
        assert!(wrap_rows(&[], 100.0).is_empty());
        assert_eq!(wrap_rows(&[500.0], 100.0), vec![vec![0]]);
    }
}
