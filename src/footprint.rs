//! Vehicle footprint geometry.

use serde::{Deserialize, Serialize};

use crate::geom::Point;

/// Supplies the footprint polygon of a vehicle at a pose.
///
/// Closures of the form `Fn(x, y, heading) -> Vec<Point>` implement this
/// trait, so an application data store can be plugged in directly.
pub trait FootprintProvider {
    /// Ordered polygon for a vehicle at `(x, y)` facing `heading` radians.
    fn footprint(&self, x: f64, y: f64, heading: f64) -> Vec<Point>;
}

impl<F> FootprintProvider for F
where
    F: Fn(f64, f64, f64) -> Vec<Point>,
{
    fn footprint(&self, x: f64, y: f64, heading: f64) -> Vec<Point> {
        self(x, y, heading)
    }
}

/// Rectangular vehicle dimensions measured from the reference point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VehicleParams {
    /// Distance from the reference point to the front bumper.
    pub front_edge_to_center: f64,
    /// Distance from the reference point to the rear bumper.
    pub back_edge_to_center: f64,
    /// Distance from the reference point to the left side.
    pub left_edge_to_center: f64,
    /// Distance from the reference point to the right side.
    pub right_edge_to_center: f64,
}

impl Default for VehicleParams {
    /// Dimensions of a mid-size sedan referenced at the rear axle.
    fn default() -> Self {
        Self {
            front_edge_to_center: 3.89,
            back_edge_to_center: 1.043,
            left_edge_to_center: 1.055,
            right_edge_to_center: 1.055,
        }
    }
}

impl FootprintProvider for VehicleParams {
    /// Corners in order front-left, front-right, rear-right, rear-left, with
    /// the first corner repeated to close the ring.
    fn footprint(&self, x: f64, y: f64, heading: f64) -> Vec<Point> {
        let (sin, cos) = heading.sin_cos();
        let corner = |forward: f64, left: f64| {
            Point::new(
                x + forward * cos - left * sin,
                y + forward * sin + left * cos,
            )
        };
        let front_left = corner(self.front_edge_to_center, self.left_edge_to_center);
        vec![
            front_left,
            corner(self.front_edge_to_center, -self.right_edge_to_center),
            corner(-self.back_edge_to_center, -self.right_edge_to_center),
            corner(-self.back_edge_to_center, self.left_edge_to_center),
            front_left,
        ]
    }
}
