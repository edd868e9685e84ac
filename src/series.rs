//! Renderable series records.

use serde::{Deserialize, Serialize};

use crate::geom::{Point, Sample};
use crate::style::{ResolvedStyle, SeriesStyle, Theme};

/// What a series represents; determines its template style and tags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SeriesRole {
    /// A named trajectory line.
    Line,
    /// The heading marker of a car.
    CarArrow,
    /// The footprint polygon of a car.
    CarFootprint,
    /// A free-form polygon from the per-frame polygon set.
    Polygon,
}

impl SeriesRole {
    /// Template style the host style is layered on.
    pub fn template(self) -> SeriesStyle {
        match self {
            Self::Line => SeriesStyle {
                show_line: Some(true),
                point_radius: Some(0.0),
                border_width: Some(2.0),
                fill: Some(false),
                ..SeriesStyle::default()
            },
            Self::CarArrow => SeriesStyle {
                show_line: Some(false),
                point_radius: Some(0.0),
                special_marker: Some(SpecialMarker::Car),
                ..SeriesStyle::default()
            },
            Self::CarFootprint => SeriesStyle {
                show_line: Some(true),
                point_radius: Some(0.0),
                border_width: Some(1.0),
                fill: Some(false),
                ..SeriesStyle::default()
            },
            Self::Polygon => SeriesStyle {
                color: Some("red".to_string()),
                show_line: Some(true),
                point_radius: Some(0.0),
                border_width: Some(2.0),
                fill: Some(false),
                ..SeriesStyle::default()
            },
        }
    }

    /// Whether the path is drawn as a closed ring.
    pub fn is_closed(self) -> bool {
        matches!(self, Self::CarFootprint | Self::Polygon)
    }

    /// Whether series of this role are listed in the legend.
    pub fn in_legend(self) -> bool {
        !matches!(self, Self::CarFootprint)
    }
}

/// Special marker drawn by the overlay instead of point markers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialMarker {
    /// Rotated car heading glyph.
    Car,
}

/// Label drawn by the overlay at the middle of a series.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesLabel {
    /// Whether the label is drawn.
    pub show: bool,
    /// Label text.
    pub text: String,
}

/// One named renderable data set.
#[derive(Debug, Clone, PartialEq)]
pub struct Series {
    name: String,
    role: SeriesRole,
    style: ResolvedStyle,
    label: SeriesLabel,
    marker: Option<SpecialMarker>,
    in_legend: bool,
    visible: bool,
    points: Vec<Sample>,
}

impl Series {
    /// Build a series from the role template with `style` layered on top.
    ///
    /// The label text starts out as the series name.
    pub fn new(
        name: impl Into<String>,
        role: SeriesRole,
        style: &SeriesStyle,
        points: Vec<Sample>,
        theme: &Theme,
    ) -> Self {
        let name = name.into();
        let merged = role.template().layered(style);
        Self {
            label: SeriesLabel {
                show: merged.show_text.unwrap_or(false),
                text: name.clone(),
            },
            marker: merged.special_marker,
            in_legend: role.in_legend(),
            style: merged.resolve(theme),
            visible: true,
            name,
            role,
            points,
        }
    }

    /// Replace label text and points, keeping the style.
    pub(crate) fn update(&mut self, label: &str, points: Vec<Sample>) {
        if self.label.text != label {
            self.label.text = label.to_string();
        }
        self.points = points;
    }

    /// Access the series name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Access the series role.
    pub fn role(&self) -> SeriesRole {
        self.role
    }

    /// Access the resolved style.
    pub fn style(&self) -> &ResolvedStyle {
        &self.style
    }

    /// Access the label.
    pub fn label(&self) -> &SeriesLabel {
        &self.label
    }

    /// Access the special marker tag.
    pub fn marker(&self) -> Option<SpecialMarker> {
        self.marker
    }

    /// Whether the series is listed in the legend.
    pub fn in_legend(&self) -> bool {
        self.in_legend
    }

    /// Check if the series is visible.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Toggle series visibility.
    pub fn set_visible(&mut self, visible: bool) {
        self.visible = visible;
    }

    /// Access the raw samples.
    pub fn points(&self) -> &[Sample] {
        &self.points
    }

    /// Positions of samples with finite coordinates, in order.
    pub fn positions(&self) -> Vec<Point> {
        self.points.iter().filter_map(Sample::position).collect()
    }
}
