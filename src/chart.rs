//! Live chart instance: lifecycle, frame updates, and rendering.

use std::fmt;

use crate::footprint::{FootprintProvider, VehicleParams};
use crate::geom::ScreenRect;
use crate::options::{ChartOptions, GraphProps};
use crate::overlay::{DrawPlugin, SeriesOverlay};
use crate::pipeline::{FrameData, FrameProperties, FrameSummary, apply_frame};
use crate::registry::DatasetRegistry;
use crate::render::frame::build_frame;
use crate::render::{ChartLayout, DrawBackend, RenderList};
use crate::series::Series;
use crate::style::Theme;
use crate::view::Viewport;
use crate::window::AxisWindowController;

/// How a redraw should be performed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Redraw {
    /// Redraw now, without animation.
    Immediate,
}

/// The host surface a chart is bound to.
pub trait ChartSurface {
    /// Schedule a redraw of the chart.
    fn request_redraw(&mut self, mode: Redraw);
    /// Drop the binding; called once when the chart is torn down.
    fn release(&mut self);
}

type Footprints = Box<dyn FootprintProvider + Send + Sync>;
type Plugin = Box<dyn DrawPlugin + Send + Sync>;
type Surface = Box<dyn ChartSurface + Send + Sync>;

/// A mounted chart.
///
/// Owns the dataset registry and the axis window state. Frames are folded in
/// with [`LiveChart::update`]; drawing happens on demand through
/// [`LiveChart::draw`] or [`LiveChart::render`].
pub struct LiveChart {
    title: Option<String>,
    options: ChartOptions,
    theme: Theme,
    registry: DatasetRegistry,
    windows: AxisWindowController,
    footprint: Footprints,
    plugins: Vec<Plugin>,
    surface: Option<Surface>,
    redraws: u64,
}

impl LiveChart {
    /// Mount a chart with the default builder configuration.
    pub fn mount(props: &GraphProps) -> Option<Self> {
        Self::builder().mount(props)
    }

    /// Start configuring a chart.
    pub fn builder() -> ChartBuilder {
        ChartBuilder::default()
    }

    /// Apply one frame of data.
    ///
    /// Does nothing and returns `None` when either payload is absent.
    /// Otherwise the registry is updated and an immediate redraw requested.
    pub fn update(
        &mut self,
        data: Option<&FrameData>,
        properties: Option<&FrameProperties>,
    ) -> Option<FrameSummary> {
        let (Some(data), Some(properties)) = (data, properties) else {
            log::trace!("frame skipped: payload absent");
            return None;
        };
        let summary = apply_frame(&mut self.registry, data, properties, &*self.footprint);
        self.request_redraw();
        Some(summary)
    }

    /// Apply new host props: title, then the frame they carry.
    ///
    /// Options are fixed at mount.
    pub fn update_props(&mut self, props: &GraphProps) -> Option<FrameSummary> {
        if self.title != props.title {
            self.title = props.title.clone();
        }
        self.update(props.data.as_ref(), props.properties.as_ref())
    }

    /// Recompute axis ranges from the visible series.
    pub fn refresh_viewport(&mut self) -> Option<Viewport> {
        self.windows.refresh(self.registry.series())
    }

    /// Current axis ranges, as of the last refresh.
    pub fn viewport(&self) -> Option<Viewport> {
        self.windows.viewport()
    }

    /// Draw the chart into `bounds` on `backend`.
    pub fn draw(&mut self, bounds: ScreenRect, backend: &mut dyn DrawBackend) -> Option<ChartLayout> {
        build_frame(self, bounds, backend)
    }

    /// Draw the chart into a fresh [`RenderList`].
    pub fn render(&mut self, bounds: ScreenRect) -> RenderList {
        let mut list = RenderList::new();
        self.draw(bounds, &mut list);
        list
    }

    /// Add a post-draw plugin.
    pub fn register_plugin(&mut self, plugin: impl DrawPlugin + Send + Sync + 'static) {
        self.plugins.push(Box::new(plugin));
    }

    /// Bind the chart to a host surface, releasing any previous one.
    pub fn attach_surface(&mut self, surface: impl ChartSurface + Send + Sync + 'static) {
        self.release_surface();
        self.surface = Some(Box::new(surface));
    }

    /// Show or hide a series by name. Returns `false` for unknown names.
    pub fn set_series_visible(&mut self, name: &str, visible: bool) -> bool {
        let Some(series) = self
            .registry
            .resolve(name)
            .and_then(|handle| self.registry.get_mut(handle))
        else {
            return false;
        };
        if series.is_visible() != visible {
            series.set_visible(visible);
            self.request_redraw();
        }
        true
    }

    /// Series listed in the legend, in slot order.
    pub fn legend_entries(&self) -> impl Iterator<Item = &Series> + '_ {
        self.registry.series().filter(|series| series.in_legend())
    }

    /// Access the title.
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Access the options.
    pub fn options(&self) -> &ChartOptions {
        &self.options
    }

    /// Access the theme.
    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Access the dataset registry.
    pub fn registry(&self) -> &DatasetRegistry {
        &self.registry
    }

    /// Number of redraws requested so far.
    pub fn redraw_count(&self) -> u64 {
        self.redraws
    }

    pub(crate) fn plugins(&self) -> &[Plugin] {
        &self.plugins
    }

    /// Tear the chart down, releasing its surface binding.
    pub fn destroy(mut self) {
        self.release_surface();
    }

    fn request_redraw(&mut self) {
        self.redraws += 1;
        if let Some(surface) = self.surface.as_mut() {
            surface.request_redraw(Redraw::Immediate);
        }
    }

    fn release_surface(&mut self) {
        if let Some(mut surface) = self.surface.take() {
            surface.release();
            log::debug!("chart surface released");
        }
    }
}

impl Drop for LiveChart {
    fn drop(&mut self) {
        self.release_surface();
    }
}

impl fmt::Debug for LiveChart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LiveChart")
            .field("title", &self.title)
            .field("options", &self.options)
            .field("registry", &self.registry)
            .field("windows", &self.windows)
            .field("plugins", &self.plugins.len())
            .field("bound", &self.surface.is_some())
            .field("redraws", &self.redraws)
            .finish_non_exhaustive()
    }
}

/// Builder for configuring a chart before mounting.
pub struct ChartBuilder {
    theme: Theme,
    footprint: Footprints,
    plugins: Vec<Plugin>,
    surface: Option<Surface>,
}

impl Default for ChartBuilder {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            footprint: Box::new(VehicleParams::default()),
            plugins: vec![Box::new(SeriesOverlay::default())],
            surface: None,
        }
    }
}

impl ChartBuilder {
    /// Set the theme.
    pub fn theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    /// Set the footprint collaborator.
    pub fn footprint(mut self, provider: impl FootprintProvider + Send + Sync + 'static) -> Self {
        self.footprint = Box::new(provider);
        self
    }

    /// Add a post-draw plugin after the label overlay.
    pub fn plugin(mut self, plugin: impl DrawPlugin + Send + Sync + 'static) -> Self {
        self.plugins.push(Box::new(plugin));
        self
    }

    /// Drop the built-in label overlay.
    pub fn without_overlay(mut self) -> Self {
        self.plugins.clear();
        self
    }

    /// Bind the chart to a host surface.
    pub fn surface(mut self, surface: impl ChartSurface + Send + Sync + 'static) -> Self {
        self.surface = Some(Box::new(surface));
        self
    }

    /// Build the chart from host props and apply the frame they carry.
    ///
    /// Returns `None`, with a warning, when `options` or `properties` is
    /// missing.
    pub fn mount(self, props: &GraphProps) -> Option<LiveChart> {
        let (options, properties) = match props.required() {
            Ok(required) => required,
            Err(err) => {
                log::warn!("chart not created: {err}");
                return None;
            }
        };
        let mut chart = LiveChart {
            title: props.title.clone(),
            options: options.clone(),
            windows: AxisWindowController::new(
                &options.axes.x,
                &options.axes.y,
                options.sync_xy_window_size,
            ),
            registry: DatasetRegistry::with_theme(self.theme.clone()),
            theme: self.theme,
            footprint: self.footprint,
            plugins: self.plugins,
            surface: self.surface,
            redraws: 0,
        };
        chart.update(props.data.as_ref(), Some(properties));
        Some(chart)
    }
}

impl fmt::Debug for ChartBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChartBuilder")
            .field("theme", &self.theme)
            .field("plugins", &self.plugins.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geom::Point;
    use crate::overlay::DrawContext;
    use crate::render::{Glyph, RenderCommand};
    use crate::view::Range;
    use serde_json::json;
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Recorder {
        events: Arc<Mutex<Vec<&'static str>>>,
    }

    impl Recorder {
        fn events(&self) -> Vec<&'static str> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ChartSurface for Recorder {
        fn request_redraw(&mut self, mode: Redraw) {
            assert_eq!(mode, Redraw::Immediate);
            self.events.lock().unwrap().push("redraw");
        }

        fn release(&mut self) {
            self.events.lock().unwrap().push("release");
        }
    }

    fn props() -> GraphProps {
        GraphProps::from_value(json!({
            "title": "Planning",
            "options": {
                "legend": { "display": true },
                "syncXYWindowSize": true
            },
            "properties": {
                "cars": { "ego": { "color": "red" } },
                "lines": { "plan": { "color": "blue", "showText": true } }
            },
            "data": {
                "cars": { "ego": { "x": 0, "y": 0, "heading": 0 } },
                "lines": { "plan": [{ "x": 0, "y": 0 }, { "x": 10, "y": 4 }] }
            }
        }))
        .expect("props")
    }

    fn bounds() -> ScreenRect {
        ScreenRect::from_origin_size(0.0, 0.0, 640.0, 480.0)
    }

    #[test]
    fn mount_requires_options_and_properties() {
        let props = GraphProps::from_value(json!({ "options": {} })).expect("props");
        assert!(LiveChart::mount(&props).is_none());
        let props = GraphProps::from_value(json!({ "properties": {} })).expect("props");
        assert!(LiveChart::mount(&props).is_none());
    }

    #[test]
    fn mount_applies_initial_frame_and_requests_redraw() {
        let recorder = Recorder::default();
        let chart = LiveChart::builder()
            .surface(recorder.clone())
            .mount(&props())
            .expect("chart");
        assert_eq!(chart.registry().len(), 3);
        assert_eq!(chart.redraw_count(), 1);
        assert_eq!(recorder.events(), ["redraw"]);
        assert_eq!(chart.title(), Some("Planning"));
    }

    #[test]
    fn absent_payload_is_a_noop() {
        let mut chart = LiveChart::mount(&props()).expect("chart");
        let before: Vec<_> = chart.registry().series().cloned().collect();
        let properties = props().properties;
        assert!(chart.update(None, properties.as_ref()).is_none());
        assert!(chart.update(Some(&FrameData::default()), None).is_none());
        let after: Vec<_> = chart.registry().series().cloned().collect();
        assert_eq!(before, after);
        assert_eq!(chart.redraw_count(), 1);
    }

    #[test]
    fn joint_fit_viewport_and_idempotent_frames() {
        let mut chart = LiveChart::mount(&props()).expect("chart");
        let footprint_free = chart.set_series_visible("ego_footprint", false);
        assert!(footprint_free);
        let viewport = chart.refresh_viewport().expect("viewport");
        assert_eq!(viewport.x, Range::new(0.0, 10.0));
        assert_eq!(viewport.y, Range::new(-3.0, 7.0));

        let props = props();
        chart.update_props(&props);
        assert_eq!(chart.refresh_viewport(), Some(viewport));
        assert_eq!(chart.registry().len(), 3);
    }

    #[test]
    fn render_draws_series_overlay_and_legend() {
        let mut chart = LiveChart::mount(&props()).expect("chart");
        let list = chart.render(bounds());
        let commands = list.commands();

        let glyphs = commands
            .iter()
            .filter(|command| {
                matches!(
                    command,
                    RenderCommand::Glyph {
                        glyph: Glyph::CarArrow,
                        ..
                    }
                )
            })
            .count();
        assert_eq!(glyphs, 1);

        let texts: Vec<&str> = commands
            .iter()
            .filter_map(|command| match command {
                RenderCommand::Text { text, .. } => Some(text.as_str()),
                _ => None,
            })
            .collect();
        assert!(texts.contains(&"Planning"));
        assert!(texts.contains(&"ego_arrow"));
        assert_eq!(texts.iter().filter(|text| **text == "plan").count(), 2);
        assert!(!texts.contains(&"ego_footprint"));

        let polylines = commands
            .iter()
            .filter(|command| matches!(command, RenderCommand::LineSegments { .. }))
            .count();
        assert!(polylines >= 2);
    }

    #[test]
    fn legend_hidden_when_disabled() {
        let mut props = props();
        if let Some(options) = props.options.as_mut() {
            options.legend.display = false;
        }
        let mut chart = LiveChart::builder().without_overlay().mount(&props).expect("chart");
        let layout = chart.draw(bounds(), &mut RenderList::new()).expect("layout");
        assert!(layout.legend.is_none());
        assert!(layout.title.is_some());
    }

    #[test]
    fn hidden_series_leave_the_extent() {
        let mut chart = LiveChart::mount(&props()).expect("chart");
        assert!(chart.set_series_visible("plan", false));
        assert!(chart.set_series_visible("ego_footprint", false));
        assert!(!chart.set_series_visible("missing", false));
        let viewport = chart.refresh_viewport().expect("viewport");
        assert_eq!(viewport.x, Range::new(0.0, 0.0));
        assert_eq!(chart.legend_entries().count(), 2);
    }

    #[test]
    fn plugins_run_after_series() {
        struct Marker;
        impl DrawPlugin for Marker {
            fn after_draw(&self, ctx: &DrawContext<'_>, backend: &mut dyn DrawBackend) {
                let origin = ctx.transform.data_to_screen(Point::new(0.0, 0.0));
                if let Some(origin) = origin {
                    backend.draw_text(origin, "marker", &Default::default());
                }
            }
        }
        let mut chart = LiveChart::builder()
            .without_overlay()
            .mount(&props())
            .expect("chart");
        chart.register_plugin(Marker);
        let list = chart.render(bounds());
        assert!(list.commands().iter().any(|command| matches!(
            command,
            RenderCommand::Text { text, .. } if text == "marker"
        )));
        assert!(!list.commands().iter().any(|command| matches!(command, RenderCommand::Glyph { .. })));
    }

    #[test]
    fn teardown_releases_surface_once() {
        let recorder = Recorder::default();
        let chart = LiveChart::builder()
            .surface(recorder.clone())
            .mount(&props())
            .expect("chart");
        chart.destroy();
        assert_eq!(recorder.events(), ["redraw", "release"]);

        let recorder = Recorder::default();
        {
            let mut chart = LiveChart::mount(&props()).expect("chart");
            chart.attach_surface(recorder.clone());
        }
        assert_eq!(recorder.events(), ["release"]);
    }
}
