//! Rendering primitives, the draw backend seam, and path helpers.
//!
//! These types are backend-agnostic. A render pass talks to a
//! [`DrawBackend`]; [`RenderList`] records the calls so that a concrete
//! backend (such as the GPUI painter) can replay them later.

mod color;
pub(crate) mod frame;

pub use color::Color;
pub use frame::ChartLayout;

use crate::geom::{Point, ScreenPoint, ScreenRect};
use crate::transform::Transform;

/// Line stroke styling.
///
/// The width is expressed in logical pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    /// Stroke color.
    pub color: Color,
    /// Stroke width in pixels.
    pub width: f32,
}

impl Default for LineStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            width: 1.0,
        }
    }
}

/// Circular point marker styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MarkerStyle {
    /// Marker color.
    pub color: Color,
    /// Marker radius in pixels.
    pub radius: f32,
}

/// Closed polygon styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PolygonStyle {
    /// Fill color; `None` draws the outline only.
    pub fill: Option<Color>,
    /// Outline stroke.
    pub stroke: LineStyle,
}

/// Rectangle styling.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectStyle {
    /// Fill color.
    pub fill: Color,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width.
    pub stroke_width: f32,
}

impl Default for RectStyle {
    fn default() -> Self {
        Self {
            fill: Color::TRANSPARENT,
            stroke: Color::BLACK,
            stroke_width: 1.0,
        }
    }
}

/// Horizontal text alignment relative to the anchor point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TextAlign {
    /// Anchor is the left edge.
    #[default]
    Left,
    /// Anchor is the horizontal center.
    Center,
    /// Anchor is the right edge.
    Right,
}

/// Text styling.
///
/// Text is vertically centered on its anchor point.
#[derive(Debug, Clone, PartialEq)]
pub struct TextStyle {
    /// Text color.
    pub color: Color,
    /// Font size in pixels.
    pub size: f32,
    /// Font family.
    pub family: String,
    /// Horizontal alignment.
    pub align: TextAlign,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            color: Color::BLACK,
            size: 12.0,
            family: "Helvetica".to_string(),
            align: TextAlign::Left,
        }
    }
}

/// Directional glyphs drawn by overlays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Glyph {
    /// Arrowhead pointing along +X before rotation.
    CarArrow,
}

impl Glyph {
    /// Closed outline of the glyph, `size` pixels long, centered on
    /// `position` and rotated clockwise by `rotation` radians.
    pub fn outline(self, position: ScreenPoint, rotation: f32, size: f32) -> Vec<ScreenPoint> {
        let half = size * 0.5;
        let local: &[(f32, f32)] = match self {
            Self::CarArrow => &[(1.0, 0.0), (-1.0, -0.8), (-0.5, 0.0), (-1.0, 0.8)],
        };
        let (sin, cos) = rotation.sin_cos();
        local
            .iter()
            .map(|&(x, y)| {
                let (x, y) = (x * half, y * half);
                ScreenPoint::new(
                    position.x + x * cos - y * sin,
                    position.y + x * sin + y * cos,
                )
            })
            .collect()
    }
}

/// A line segment in screen space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineSegment {
    /// Segment start.
    pub start: ScreenPoint,
    /// Segment end.
    pub end: ScreenPoint,
}

impl LineSegment {
    /// Create a new line segment.
    pub fn new(start: ScreenPoint, end: ScreenPoint) -> Self {
        Self { start, end }
    }
}

/// The drawing surface a render pass paints onto.
pub trait DrawBackend {
    /// Start clipping to a rectangle.
    fn push_clip(&mut self, rect: ScreenRect);
    /// End the innermost clip.
    fn pop_clip(&mut self);
    /// Draw line segments.
    fn draw_lines(&mut self, segments: &[LineSegment], style: LineStyle);
    /// Draw circular markers.
    fn draw_points(&mut self, points: &[ScreenPoint], style: MarkerStyle);
    /// Draw a closed polygon.
    fn draw_polygon(&mut self, vertices: &[ScreenPoint], style: PolygonStyle);
    /// Draw a rectangle.
    fn draw_rect(&mut self, rect: ScreenRect, style: RectStyle);
    /// Draw text anchored at `position`.
    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle);
    /// Draw a glyph centered at `position`, rotated clockwise by `rotation`
    /// radians.
    fn draw_glyph(&mut self, position: ScreenPoint, glyph: Glyph, rotation: f32, style: &TextStyle);
}

/// A recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Start clipping to a rectangle.
    ClipRect(ScreenRect),
    /// End clipping.
    ClipEnd,
    /// Draw line segments.
    LineSegments {
        /// Segments to draw.
        segments: Vec<LineSegment>,
        /// Styling for the segments.
        style: LineStyle,
    },
    /// Draw point markers.
    Points {
        /// Points to draw.
        points: Vec<ScreenPoint>,
        /// Marker styling.
        style: MarkerStyle,
    },
    /// Draw a closed polygon.
    Polygon {
        /// Polygon vertices.
        vertices: Vec<ScreenPoint>,
        /// Polygon styling.
        style: PolygonStyle,
    },
    /// Draw a rectangle.
    Rect {
        /// Rectangle bounds.
        rect: ScreenRect,
        /// Rectangle styling.
        style: RectStyle,
    },
    /// Draw text.
    Text {
        /// Text anchor.
        position: ScreenPoint,
        /// Text content.
        text: String,
        /// Text styling.
        style: TextStyle,
    },
    /// Draw a rotated glyph.
    Glyph {
        /// Glyph center.
        position: ScreenPoint,
        /// Glyph kind.
        glyph: Glyph,
        /// Clockwise rotation in radians.
        rotation: f32,
        /// Glyph color and size.
        style: TextStyle,
    },
}

/// Draw calls recorded in order.
#[derive(Debug, Default, Clone)]
pub struct RenderList {
    commands: Vec<RenderCommand>,
}

impl RenderList {
    /// Create an empty render list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Push a render command.
    pub fn push(&mut self, command: RenderCommand) {
        self.commands.push(command);
    }

    /// Access all render commands.
    pub fn commands(&self) -> &[RenderCommand] {
        &self.commands
    }

    /// Replay the recorded commands onto another backend.
    pub fn replay(&self, backend: &mut dyn DrawBackend) {
        for command in &self.commands {
            match command {
                RenderCommand::ClipRect(rect) => backend.push_clip(*rect),
                RenderCommand::ClipEnd => backend.pop_clip(),
                RenderCommand::LineSegments { segments, style } => {
                    backend.draw_lines(segments, *style);
                }
                RenderCommand::Points { points, style } => backend.draw_points(points, *style),
                RenderCommand::Polygon { vertices, style } => {
                    backend.draw_polygon(vertices, *style);
                }
                RenderCommand::Rect { rect, style } => backend.draw_rect(*rect, *style),
                RenderCommand::Text {
                    position,
                    text,
                    style,
                } => backend.draw_text(*position, text, style),
                RenderCommand::Glyph {
                    position,
                    glyph,
                    rotation,
                    style,
                } => backend.draw_glyph(*position, *glyph, *rotation, style),
            }
        }
    }
}

impl DrawBackend for RenderList {
    fn push_clip(&mut self, rect: ScreenRect) {
        self.push(RenderCommand::ClipRect(rect));
    }

    fn pop_clip(&mut self) {
        self.push(RenderCommand::ClipEnd);
    }

    fn draw_lines(&mut self, segments: &[LineSegment], style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        self.push(RenderCommand::LineSegments {
            segments: segments.to_vec(),
            style,
        });
    }

    fn draw_points(&mut self, points: &[ScreenPoint], style: MarkerStyle) {
        if points.is_empty() {
            return;
        }
        self.push(RenderCommand::Points {
            points: points.to_vec(),
            style,
        });
    }

    fn draw_polygon(&mut self, vertices: &[ScreenPoint], style: PolygonStyle) {
        if vertices.len() < 3 {
            return;
        }
        self.push(RenderCommand::Polygon {
            vertices: vertices.to_vec(),
            style,
        });
    }

    fn draw_rect(&mut self, rect: ScreenRect, style: RectStyle) {
        self.push(RenderCommand::Rect { rect, style });
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        self.push(RenderCommand::Text {
            position,
            text: text.to_string(),
            style: style.clone(),
        });
    }

    fn draw_glyph(&mut self, position: ScreenPoint, glyph: Glyph, rotation: f32, style: &TextStyle) {
        self.push(RenderCommand::Glyph {
            position,
            glyph,
            rotation,
            style: style.clone(),
        });
    }
}

/// Build clipped line segments from data points.
///
/// When `closed` is set and the path does not already end on its first
/// point, a closing segment is added.
pub fn build_line_segments(
    points: &[Point],
    closed: bool,
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<LineSegment>,
) {
    out.clear();
    if points.len() < 2 {
        return;
    }
    let closing = match (points.first(), points.last()) {
        (Some(first), Some(last)) if closed && first != last => Some([*last, *first]),
        _ => None,
    };
    for window in points.windows(2).chain(closing.iter().map(|pair| &pair[..])) {
        let Some(start) = transform.data_to_screen(window[0]) else {
            continue;
        };
        let Some(end) = transform.data_to_screen(window[1]) else {
            continue;
        };
        if let Some((clipped_start, clipped_end)) = clip_segment(start, end, clip) {
            out.push(LineSegment::new(clipped_start, clipped_end));
        }
    }
}

/// Build scatter points inside the clip rectangle.
pub fn build_scatter_points(
    points: &[Point],
    transform: &Transform,
    clip: ScreenRect,
    out: &mut Vec<ScreenPoint>,
) {
    out.clear();
    for point in points {
        let Some(screen) = transform.data_to_screen(*point) else {
            continue;
        };
        if clip.contains(screen) {
            out.push(screen);
        }
    }
}

/// Smooth an open path with a cardinal spline.
///
/// `tension` follows the line-tension convention: 0 keeps straight segments,
/// larger values bend further. Each span is subdivided into `steps` pieces.
pub fn smooth_path(points: &[Point], tension: f64, steps: usize) -> Vec<Point> {
    if points.len() < 3 || tension <= 0.0 || steps < 2 {
        return points.to_vec();
    }
    let mut out = Vec::with_capacity((points.len() - 1) * steps + 1);
    for i in 0..points.len() - 1 {
        let p0 = points[i.saturating_sub(1)];
        let p1 = points[i];
        let p2 = points[i + 1];
        let p3 = points[(i + 2).min(points.len() - 1)];
        let m1 = Point::new((p2.x - p0.x) * tension, (p2.y - p0.y) * tension);
        let m2 = Point::new((p3.x - p1.x) * tension, (p3.y - p1.y) * tension);
        for step in 0..steps {
            let t = step as f64 / steps as f64;
            let t2 = t * t;
            let t3 = t2 * t;
            let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
            let h10 = t3 - 2.0 * t2 + t;
            let h01 = -2.0 * t3 + 3.0 * t2;
            let h11 = t3 - t2;
            out.push(Point::new(
                h00 * p1.x + h10 * m1.x + h01 * p2.x + h11 * m2.x,
                h00 * p1.y + h10 * m1.y + h01 * p2.y + h11 * m2.y,
            ));
        }
    }
    if let Some(last) = points.last() {
        out.push(*last);
    }
    out
}

fn clip_segment(
    mut start: ScreenPoint,
    mut end: ScreenPoint,
    rect: ScreenRect,
) -> Option<(ScreenPoint, ScreenPoint)> {
    let mut out_start = region_code(start, rect);
    let mut out_end = region_code(end, rect);

    loop {
        if (out_start | out_end) == 0 {
            return Some((start, end));
        }
        if (out_start & out_end) != 0 {
            return None;
        }

        let out_code = if out_start != 0 { out_start } else { out_end };
        let clipped = if (out_code & TOP) != 0 {
            ScreenPoint::new(
                start.x + (end.x - start.x) * (rect.min.y - start.y) / (end.y - start.y),
                rect.min.y,
            )
        } else if (out_code & BOTTOM) != 0 {
            ScreenPoint::new(
                start.x + (end.x - start.x) * (rect.max.y - start.y) / (end.y - start.y),
                rect.max.y,
            )
        } else if (out_code & RIGHT) != 0 {
            ScreenPoint::new(
                rect.max.x,
                start.y + (end.y - start.y) * (rect.max.x - start.x) / (end.x - start.x),
            )
        } else {
            ScreenPoint::new(
                rect.min.x,
                start.y + (end.y - start.y) * (rect.min.x - start.x) / (end.x - start.x),
            )
        };

        if out_code == out_start {
            start = clipped;
            out_start = region_code(start, rect);
        } else {
            end = clipped;
            out_end = region_code(end, rect);
        }
    }
}

const LEFT: u8 = 1;
const RIGHT: u8 = 2;
const TOP: u8 = 4;
const BOTTOM: u8 = 8;

fn region_code(point: ScreenPoint, rect: ScreenRect) -> u8 {
    let mut code = 0;
    if point.x < rect.min.x {
        code |= LEFT;
    } else if point.x > rect.max.x {
        code |= RIGHT;
    }
    if point.y < rect.min.y {
        code |= TOP;
    } else if point.y > rect.max.y {
        code |= BOTTOM;
    }
    code
}
