use gpui::{
    App, BorderStyle, Bounds, ContentMask, Corners, Edges, PathBuilder, Pixels, TextRun, Window,
    font, point, px, quad,
};

use crate::geom::{ScreenPoint, ScreenRect};
use crate::render::{
    Color, DrawBackend, Glyph, LineSegment, LineStyle, MarkerStyle, PolygonStyle, RectStyle,
    RenderList, TextAlign, TextStyle,
};

/// Draw backend painting straight onto a GPUI window.
pub struct GpuiPainter<'a> {
    window: &'a mut Window,
    cx: &'a mut App,
    clip_stack: Vec<ContentMask<Pixels>>,
}

impl<'a> GpuiPainter<'a> {
    /// Create a painter for the current paint pass.
    pub fn new(window: &'a mut Window, cx: &'a mut App) -> Self {
        Self {
            window,
            cx,
            clip_stack: Vec::new(),
        }
    }

    fn with_clip(&mut self, f: impl FnOnce(&mut Window, &mut App)) {
        let cx = &mut *self.cx;
        if let Some(mask) = self.clip_stack.last() {
            self.window
                .with_content_mask(Some(mask.clone()), |window| f(window, cx));
        } else {
            f(self.window, cx);
        }
    }
}

pub(crate) fn paint_render_list(list: &RenderList, window: &mut Window, cx: &mut App) {
    let mut painter = GpuiPainter::new(window, cx);
    list.replay(&mut painter);
}

impl DrawBackend for GpuiPainter<'_> {
    fn push_clip(&mut self, rect: ScreenRect) {
        self.clip_stack.push(ContentMask {
            bounds: to_bounds(rect),
        });
    }

    fn pop_clip(&mut self) {
        self.clip_stack.pop();
    }

    fn draw_lines(&mut self, segments: &[LineSegment], style: LineStyle) {
        if segments.is_empty() {
            return;
        }
        self.with_clip(|window, _| {
            let mut builder = PathBuilder::stroke(px(style.width.max(0.5)));
            for segment in segments {
                builder.move_to(to_point(segment.start));
                builder.line_to(to_point(segment.end));
            }
            if let Ok(path) = builder.build() {
                window.paint_path(path, to_rgba(style.color));
            }
        });
    }

    fn draw_points(&mut self, points: &[ScreenPoint], style: MarkerStyle) {
        if points.is_empty() {
            return;
        }
        let radius = style.radius.max(1.0);
        self.with_clip(|window, _| {
            for pt in points {
                let bounds = Bounds::from_corners(
                    point(px(pt.x - radius), px(pt.y - radius)),
                    point(px(pt.x + radius), px(pt.y + radius)),
                );
                window.paint_quad(quad(
                    bounds,
                    Corners::all(px(radius)),
                    to_rgba(style.color),
                    Edges::all(px(0.0)),
                    to_rgba(style.color),
                    BorderStyle::default(),
                ));
            }
        });
    }

    fn draw_polygon(&mut self, vertices: &[ScreenPoint], style: PolygonStyle) {
        if vertices.len() < 3 {
            return;
        }
        self.with_clip(|window, _| {
            if let Some(fill) = style.fill {
                if let Some(path) = outline_path(PathBuilder::fill(), vertices) {
                    window.paint_path(path, to_rgba(fill));
                }
            }
            let stroke = PathBuilder::stroke(px(style.stroke.width.max(0.5)));
            if let Some(path) = outline_path(stroke, vertices) {
                window.paint_path(path, to_rgba(style.stroke.color));
            }
        });
    }

    fn draw_rect(&mut self, rect: ScreenRect, style: RectStyle) {
        self.with_clip(|window, _| {
            window.paint_quad(quad(
                to_bounds(rect),
                Corners::all(px(0.0)),
                to_rgba(style.fill),
                Edges::all(px(style.stroke_width)),
                to_rgba(style.stroke),
                BorderStyle::default(),
            ));
        });
    }

    fn draw_text(&mut self, position: ScreenPoint, text: &str, style: &TextStyle) {
        if text.is_empty() {
            return;
        }
        self.with_clip(|window, cx| {
            let run = TextRun {
                len: text.len(),
                font: font(style.family.clone()),
                color: to_hsla(style.color),
                background_color: None,
                underline: None,
                strikethrough: None,
            };
            let shaped =
                window
                    .text_system()
                    .shape_line(text.to_string().into(), px(style.size), &[run], None);
            let width = f32::from(shaped.width);
            let line_height = shaped.ascent + shaped.descent;
            let x = match style.align {
                TextAlign::Left => position.x,
                TextAlign::Center => position.x - width * 0.5,
                TextAlign::Right => position.x - width,
            };
            let origin = point(px(x), px(position.y - f32::from(line_height) * 0.5));
            let _ = shaped.paint(origin, line_height, window, cx);
        });
    }

    fn draw_glyph(&mut self, position: ScreenPoint, glyph: Glyph, rotation: f32, style: &TextStyle) {
        let outline = glyph.outline(position, rotation, style.size);
        self.with_clip(|window, _| {
            if let Some(path) = outline_path(PathBuilder::fill(), &outline) {
                window.paint_path(path, to_rgba(style.color));
            }
        });
    }
}

fn outline_path(mut builder: PathBuilder, vertices: &[ScreenPoint]) -> Option<gpui::Path<Pixels>> {
    let (first, rest) = vertices.split_first()?;
    builder.move_to(to_point(*first));
    for vertex in rest {
        builder.line_to(to_point(*vertex));
    }
    builder.close();
    builder.build().ok()
}

fn to_point(screen: ScreenPoint) -> gpui::Point<Pixels> {
    point(px(screen.x), px(screen.y))
}

fn to_rgba(color: Color) -> gpui::Rgba {
    gpui::Rgba {
        r: color.r,
        g: color.g,
        b: color.b,
        a: color.a,
    }
}

pub(crate) fn to_hsla(color: Color) -> gpui::Hsla {
    gpui::Hsla::from(to_rgba(color))
}

fn to_bounds(rect: ScreenRect) -> Bounds<Pixels> {
    Bounds::from_corners(
        point(px(rect.min.x), px(rect.min.y)),
        point(px(rect.max.x), px(rect.max.y)),
    )
}

pub(crate) fn to_screen_rect(bounds: Bounds<Pixels>) -> ScreenRect {
    ScreenRect::from_origin_size(
        f32::from(bounds.origin.x),
        f32::from(bounds.origin.y),
        f32::from(bounds.size.width),
        f32::from(bounds.size.height),
    )
}
