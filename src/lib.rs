//! gpui_trajplot draws live-updating vehicle trajectory charts.
//! Named cars, lines and polygons keep stable series identities across frames,
//! and the axes follow the data with fixed-width or square auto-fit windows.

#![forbid(unsafe_code)]

pub mod axis;
pub mod chart;
pub mod error;
pub mod footprint;
pub mod geom;
#[cfg(feature = "gpui")]
pub mod gpui_backend;
pub mod options;
pub mod overlay;
pub mod pipeline;
pub mod registry;
pub mod render;
pub mod series;
pub mod style;
pub mod transform;
pub mod view;
pub mod window;

pub use axis::{AxisConfig, AxisFormatter, AxisId, AxisWindow};
pub use chart::{ChartBuilder, ChartSurface, LiveChart, Redraw};
pub use error::{ChartError, ColorParseError};
pub use footprint::{FootprintProvider, VehicleParams};
pub use geom::{Point, Sample, ScreenPoint, ScreenRect};
pub use options::{AxesOptions, ChartOptions, GraphProps, LegendOptions};
pub use overlay::{DrawContext, DrawPlugin, SeriesOverlay};
pub use pipeline::{FrameData, FrameProperties, FrameSummary, apply_frame};
pub use registry::{DatasetRegistry, SeriesHandle};
pub use render::{
    ChartLayout, Color, DrawBackend, Glyph, LineSegment, LineStyle, MarkerStyle, PolygonStyle,
    RectStyle, RenderCommand, RenderList, TextAlign, TextStyle,
};
pub use series::{Series, SeriesLabel, SeriesRole, SpecialMarker};
pub use style::{ResolvedStyle, SeriesStyle, Theme};
pub use transform::Transform;
pub use view::{Range, Viewport};
pub use window::AxisWindowController;
