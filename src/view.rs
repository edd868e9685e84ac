//! Data ranges and viewports.

use crate::axis::AxisId;

/// Numeric range with inclusive bounds.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Range {
    /// Minimum value.
    pub min: f64,
    /// Maximum value.
    pub max: f64,
}

impl Range {
    /// Create a new range, swapping bounds if needed.
    pub fn new(mut min: f64, mut max: f64) -> Self {
        if min > max {
            std::mem::swap(&mut min, &mut max);
        }
        Self { min, max }
    }

    /// Create a range of the given width centered on `mid`.
    pub fn centered(mid: f64, width: f64) -> Self {
        let half = width.abs() * 0.5;
        Self {
            min: mid - half,
            max: mid + half,
        }
    }

    /// Span of the range.
    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// Midpoint of the range.
    pub fn midpoint(&self) -> f64 {
        (self.min + self.max) * 0.5
    }

    /// Check whether both bounds are finite.
    pub fn is_finite(&self) -> bool {
        self.min.is_finite() && self.max.is_finite()
    }

    /// Check whether the range has positive span and finite bounds.
    pub fn is_valid(&self) -> bool {
        self.is_finite() && self.span() > 0.0
    }

    /// Expand the range to include a value.
    pub fn expand_to_include(&mut self, value: f64) {
        if !value.is_finite() {
            return;
        }
        if value < self.min {
            self.min = value;
        }
        if value > self.max {
            self.max = value;
        }
    }

    /// Ensure the range has at least the given span.
    pub fn with_min_span(&self, min_span: f64) -> Self {
        if self.span() >= min_span {
            return *self;
        }
        Self::centered(self.midpoint(), min_span)
    }
}

/// Visible data ranges on both axes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// X axis range.
    pub x: Range,
    /// Y axis range.
    pub y: Range,
}

impl Viewport {
    /// Create a viewport from X and Y ranges.
    pub fn new(x: Range, y: Range) -> Self {
        Self { x, y }
    }

    /// The unit viewport used before any data arrives.
    pub fn unit() -> Self {
        Self::new(Range::new(0.0, 1.0), Range::new(0.0, 1.0))
    }

    /// Range of one axis.
    pub fn axis(&self, axis: AxisId) -> Range {
        match axis {
            AxisId::X => self.x,
            AxisId::Y => self.y,
        }
    }

    /// Check whether both axes are valid.
    pub fn is_valid(&self) -> bool {
        self.x.is_valid() && self.y.is_valid()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn range_with_min_span_expands() {
        let range = Range::new(2.0, 2.0);
        let expanded = range.with_min_span(1.0);
        assert!(expanded.span() >= 1.0);
        assert!((expanded.midpoint() - 2.0).abs() < 1e-9);
    }

    #[test]
    fn centered_range_has_requested_width() {
        let range = Range::centered(5.0, 10.0);
        assert_eq!(range, Range::new(0.0, 10.0));
        assert_eq!(Range::centered(1.0, -4.0).span(), 4.0);
    }

    #[test]
    fn expand_ignores_non_finite() {
        let mut range = Range::new(0.0, 1.0);
        range.expand_to_include(f64::NAN);
        range.expand_to_include(f64::INFINITY);
        range.expand_to_include(-2.0);
        assert_eq!(range, Range::new(-2.0, 1.0));
    }
}
