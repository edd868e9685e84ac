//! Series styling and chart theme.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::render::Color;
use crate::series::SpecialMarker;

/// Visual theme for chart chrome (axes, grid, text).
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Background color.
    pub background: Color,
    /// Axis line and tick label color.
    pub axis: Color,
    /// Grid line color.
    pub grid: Color,
    /// Title and legend text color.
    pub text: Color,
    /// Color for series without a usable color.
    pub series: Color,
    /// Font family for chrome text.
    pub font_family: String,
    /// Tick label font size.
    pub tick_size: f32,
    /// Title font size.
    pub title_size: f32,
}

impl Theme {
    /// Create the default light theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// A dark theme.
    pub fn dark() -> Self {
        Self {
            background: Color::rgb8(0x1e, 0x1e, 0x24),
            axis: Color::rgb8(0xc8, 0xc8, 0xd0),
            grid: Color::rgb8(0x3a, 0x3a, 0x44),
            text: Color::rgb8(0xe6, 0xe6, 0xea),
            series: Color::rgb8(0x4f, 0xc3, 0xf7),
            ..Self::default()
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            axis: Color::rgb8(0x66, 0x66, 0x66),
            grid: Color::rgb8(0xe0, 0xe0, 0xe0),
            text: Color::rgb8(0x33, 0x33, 0x33),
            series: Color::rgb8(0x1f, 0x77, 0xb4),
            font_family: "Helvetica".to_string(),
            tick_size: 11.0,
            title_size: 14.0,
        }
    }
}

/// Per-entity style as supplied by the host (`properties.cars.<name>` etc.).
///
/// Every field is optional; unset fields fall through to the series role
/// template. Unrecognized keys are kept in `extensions` for backends that
/// understand them.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeriesStyle {
    /// Line and marker color (CSS color string).
    #[serde(default)]
    pub color: Option<String>,
    /// Stroke width in pixels.
    #[serde(default)]
    pub border_width: Option<f32>,
    /// Point marker radius in pixels; zero hides markers.
    #[serde(default)]
    pub point_radius: Option<f32>,
    /// Fill closed shapes.
    #[serde(default)]
    pub fill: Option<bool>,
    /// Connect points with lines.
    #[serde(default)]
    pub show_line: Option<bool>,
    /// Curve tension; zero draws straight segments.
    #[serde(default, alias = "lineTension")]
    pub tension: Option<f32>,
    /// Directional marker drawn by the overlay.
    #[serde(default)]
    pub special_marker: Option<SpecialMarker>,
    /// Draw the series name as a label.
    #[serde(default)]
    pub show_text: Option<bool>,
    /// Backend-specific passthrough fields.
    #[serde(flatten)]
    pub extensions: BTreeMap<String, serde_json::Value>,
}

impl SeriesStyle {
    /// Style with only a color set.
    pub fn with_color(color: impl Into<String>) -> Self {
        Self {
            color: Some(color.into()),
            ..Self::default()
        }
    }

    /// Layer `overrides` on top of `self`; set fields in `overrides` win.
    pub fn layered(&self, overrides: &Self) -> Self {
        let mut extensions = self.extensions.clone();
        extensions.extend(
            overrides
                .extensions
                .iter()
                .map(|(key, value)| (key.clone(), value.clone())),
        );
        Self {
            color: overrides.color.clone().or_else(|| self.color.clone()),
            border_width: overrides.border_width.or(self.border_width),
            point_radius: overrides.point_radius.or(self.point_radius),
            fill: overrides.fill.or(self.fill),
            show_line: overrides.show_line.or(self.show_line),
            tension: overrides.tension.or(self.tension),
            special_marker: overrides.special_marker.or(self.special_marker),
            show_text: overrides.show_text.or(self.show_text),
            extensions,
        }
    }

    /// Resolve unset fields to concrete values.
    pub fn resolve(&self, theme: &Theme) -> ResolvedStyle {
        let color = match self.color.as_deref() {
            Some(value) => Color::parse_or(value, theme.series),
            None => theme.series,
        };
        ResolvedStyle {
            color,
            border_width: self.border_width.unwrap_or(1.0).max(0.0),
            point_radius: self.point_radius.unwrap_or(3.0).max(0.0),
            fill: self.fill.unwrap_or(false),
            show_line: self.show_line.unwrap_or(false),
            tension: self.tension.unwrap_or(0.0).max(0.0),
            extensions: self.extensions.clone(),
        }
    }
}

/// A fully resolved series style.
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedStyle {
    /// Line, marker, and fill color.
    pub color: Color,
    /// Stroke width in pixels.
    pub border_width: f32,
    /// Point marker radius in pixels.
    pub point_radius: f32,
    /// Fill closed shapes.
    pub fill: bool,
    /// Connect points with lines.
    pub show_line: bool,
    /// Curve tension.
    pub tension: f32,
    /// Backend-specific passthrough fields.
    pub extensions: BTreeMap<String, serde_json::Value>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn overrides_win_and_extensions_merge() {
        let base = SeriesStyle {
            border_width: Some(2.0),
            show_line: Some(true),
            extensions: BTreeMap::from([("borderDash".to_string(), serde_json::json!([4, 2]))]),
            ..SeriesStyle::with_color("red")
        };
        let overrides = SeriesStyle {
            border_width: Some(5.0),
            extensions: BTreeMap::from([("hoverRadius".to_string(), serde_json::json!(4))]),
            ..SeriesStyle::default()
        };
        let layered = base.layered(&overrides);
        assert_eq!(layered.color.as_deref(), Some("red"));
        assert_eq!(layered.border_width, Some(5.0));
        assert_eq!(layered.show_line, Some(true));
        assert_eq!(layered.extensions.len(), 2);
    }

    #[test]
    fn unknown_keys_land_in_extensions() {
        let style: SeriesStyle = serde_json::from_value(serde_json::json!({
            "color": "#00ff00",
            "borderWidth": 3,
            "lineTension": 0.2,
            "specialMarker": "car",
            "showText": true,
            "borderDash": [5, 5],
        }))
        .expect("style json");
        assert_eq!(style.border_width, Some(3.0));
        assert_eq!(style.tension, Some(0.2));
        assert_eq!(style.special_marker, Some(SpecialMarker::Car));
        assert_eq!(style.show_text, Some(true));
        assert_eq!(
            style.extensions.get("borderDash"),
            Some(&serde_json::json!([5, 5]))
        );
    }

    #[test]
    fn resolve_falls_back_to_theme_color() {
        let theme = Theme::default();
        let resolved = SeriesStyle::with_color("not-a-color").resolve(&theme);
        assert_eq!(resolved.color, theme.series);
        let resolved = SeriesStyle::with_color("red").resolve(&theme);
        assert_eq!(resolved.color, Color::RED);
        assert!(!resolved.show_line);
    }
}
