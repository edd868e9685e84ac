//! Geometric primitives used by the charting pipeline.
//!
//! [`Point`] and [`Sample`] live in data space. [`ScreenPoint`] and
//! [`ScreenRect`] are pixel coordinates handed to draw backends.

use serde::{Deserialize, Serialize};

/// A point in data space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    /// X value in data coordinates.
    pub x: f64,
    /// Y value in data coordinates.
    pub y: f64,
}

impl Point {
    /// Create a new data point.
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Check whether both coordinates are finite.
    pub fn is_finite(&self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

/// A sample as delivered by the data feed.
///
/// Coordinates may be absent; car samples additionally carry a heading in
/// radians (counter-clockwise from +X).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Sample {
    /// X value, if present.
    #[serde(default)]
    pub x: Option<f64>,
    /// Y value, if present.
    #[serde(default)]
    pub y: Option<f64>,
    /// Heading angle in radians, if present.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub heading: Option<f64>,
}

impl Sample {
    /// Create a sample at the given position.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            heading: None,
        }
    }

    /// Create a sample at the given position with a heading.
    pub fn with_heading(x: f64, y: f64, heading: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            heading: Some(heading),
        }
    }

    /// The empty sample used when a feed entry is missing.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Finite X coordinate, if any.
    pub fn finite_x(&self) -> Option<f64> {
        self.x.filter(|x| x.is_finite())
    }

    /// Finite Y coordinate, if any.
    pub fn finite_y(&self) -> Option<f64> {
        self.y.filter(|y| y.is_finite())
    }

    /// Position of the sample when both coordinates are present and finite.
    pub fn position(&self) -> Option<Point> {
        Some(Point::new(self.finite_x()?, self.finite_y()?))
    }
}

impl From<Point> for Sample {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// A point in screen space (pixel coordinates, Y grows downwards).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenPoint {
    /// X value in screen pixels.
    pub x: f32,
    /// Y value in screen pixels.
    pub y: f32,
}

impl ScreenPoint {
    /// Create a new screen point.
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }
}

/// A rectangle in screen space (pixel coordinates).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenRect {
    /// Top-left corner.
    pub min: ScreenPoint,
    /// Bottom-right corner.
    pub max: ScreenPoint,
}

impl ScreenRect {
    /// Create a new screen rectangle from corners.
    pub fn new(min: ScreenPoint, max: ScreenPoint) -> Self {
        Self { min, max }
    }

    /// Create a rectangle from an origin and a size.
    pub fn from_origin_size(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self::new(ScreenPoint::new(x, y), ScreenPoint::new(x + width, y + height))
    }

    /// Rectangle width in pixels.
    pub fn width(&self) -> f32 {
        self.max.x - self.min.x
    }

    /// Rectangle height in pixels.
    pub fn height(&self) -> f32 {
        self.max.y - self.min.y
    }

    /// Horizontal center in pixels.
    pub fn center_x(&self) -> f32 {
        (self.min.x + self.max.x) * 0.5
    }

    /// Check whether the rectangle has positive area.
    pub fn is_valid(&self) -> bool {
        self.width() > 0.0 && self.height() > 0.0
    }

    /// Check whether a point lies inside the rectangle (inclusive).
    pub fn contains(&self, point: ScreenPoint) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sample_position_requires_finite_coordinates() {
        assert_eq!(Sample::new(1.0, 2.0).position(), Some(Point::new(1.0, 2.0)));
        assert!(Sample::empty().position().is_none());
        assert!(Sample::new(f64::NAN, 2.0).position().is_none());
        let partial = Sample {
            x: Some(1.0),
            y: None,
            heading: None,
        };
        assert!(partial.position().is_none());
        assert_eq!(partial.finite_x(), Some(1.0));
    }

    #[test]
    fn sample_deserializes_missing_fields() {
        let sample: Sample = serde_json::from_str(r#"{"x": 3.0}"#).expect("sample json");
        assert_eq!(sample.x, Some(3.0));
        assert!(sample.y.is_none());
        assert!(sample.heading.is_none());
    }
}
