//! Post-draw overlays: series labels and car heading glyphs.

use crate::geom::{ScreenPoint, ScreenRect};
use crate::registry::DatasetRegistry;
use crate::render::{DrawBackend, Glyph, TextAlign, TextStyle};
use crate::series::{Series, SpecialMarker};
use crate::style::Theme;
use crate::transform::Transform;

/// State visible to a [`DrawPlugin`] once series have been drawn.
#[derive(Debug, Clone, Copy)]
pub struct DrawContext<'a> {
    /// Series in slot order.
    pub registry: &'a DatasetRegistry,
    /// Data-to-screen transform of the plot area.
    pub transform: &'a Transform,
    /// Chart theme.
    pub theme: &'a Theme,
    /// Plot area in screen space.
    pub plot_rect: ScreenRect,
}

/// Hook invoked once per render pass, after all series are drawn.
///
/// Plugins are registered per chart.
pub trait DrawPlugin {
    /// Draw on top of the series.
    fn after_draw(&self, ctx: &DrawContext<'_>, backend: &mut dyn DrawBackend);
}

/// Draws series labels and car heading glyphs.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesOverlay {
    /// Label and glyph size in pixels.
    pub font_size: f32,
    /// Label font family.
    pub font_family: String,
    /// Gap between a label and its anchor point, in pixels.
    pub padding: f32,
}

impl Default for SeriesOverlay {
    fn default() -> Self {
        Self {
            font_size: 12.0,
            font_family: "Helvetica".to_string(),
            padding: 1.0,
        }
    }
}

impl SeriesOverlay {
    fn text_style(&self, series: &Series) -> TextStyle {
        TextStyle {
            color: series.style().color,
            size: self.font_size,
            family: self.font_family.clone(),
            align: TextAlign::Center,
        }
    }

    fn draw_label(&self, series: &Series, transform: &Transform, backend: &mut dyn DrawBackend) {
        let Some(anchor) = label_anchor(series, transform) else {
            return;
        };
        let position = ScreenPoint::new(anchor.x, anchor.y - (self.font_size / 2.0 + self.padding));
        backend.draw_text(position, &series.label().text, &self.text_style(series));
    }

    fn draw_car(&self, series: &Series, transform: &Transform, backend: &mut dyn DrawBackend) {
        let Some(sample) = series.points().first() else {
            return;
        };
        let Some(position) = sample.position().and_then(|point| transform.data_to_screen(point))
        else {
            return;
        };
        let rotation = heading_rotation(sample.heading.unwrap_or(0.0), transform.pixels_per_unit());
        backend.draw_glyph(position, Glyph::CarArrow, rotation, &self.text_style(series));
    }
}

impl DrawPlugin for SeriesOverlay {
    fn after_draw(&self, ctx: &DrawContext<'_>, backend: &mut dyn DrawBackend) {
        backend.push_clip(ctx.plot_rect);
        for series in ctx.registry.series().filter(|series| series.is_visible()) {
            if series.label().show {
                self.draw_label(series, ctx.transform, backend);
            } else if series.marker() == Some(SpecialMarker::Car) {
                self.draw_car(series, ctx.transform, backend);
            }
        }
        backend.pop_clip();
    }
}

/// Screen position of the middle sample (`floor(n / 2)`) of a series.
pub fn label_anchor(series: &Series, transform: &Transform) -> Option<ScreenPoint> {
    let points = series.points();
    let middle = points.get(points.len() / 2)?;
    transform.data_to_screen(middle.position()?)
}

/// Clockwise screen rotation for a counter-clockwise data heading.
///
/// The heading direction is scaled by the per-axis pixel density before the
/// angle is taken, so the glyph follows the drawn path on non-square plots.
pub fn heading_rotation(heading: f64, pixels_per_unit: (f64, f64)) -> f32 {
    let (sx, sy) = pixels_per_unit;
    let (sin, cos) = heading.sin_cos();
    -(sin * sy).atan2(cos * sx) as f32
}
