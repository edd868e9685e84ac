//! Frame update pipeline: folds one data frame into the dataset registry.
//!
//! Cars are processed first, then lines, then polygons. Cars and lines are
//! driven by the style payload and keep their slots for the life of the
//! registry. Polygons are driven by the data payload and are laid out after
//! the named series on every frame; whatever the previous frame left past
//! the last polygon is truncated.

use indexmap::IndexMap;
use serde::{Deserialize, Deserializer, Serialize};

use crate::footprint::FootprintProvider;
use crate::geom::Sample;
use crate::registry::DatasetRegistry;
use crate::series::SeriesRole;
use crate::style::SeriesStyle;

/// Per-frame entity data (`props.data`), keyed by entity name.
///
/// A `null` car or line decodes as an empty sample or list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameData {
    /// Car poses.
    #[serde(default, deserialize_with = "entries")]
    pub cars: IndexMap<String, Sample>,
    /// Line point lists.
    #[serde(default, deserialize_with = "entries")]
    pub lines: IndexMap<String, Vec<Sample>>,
    /// Polygon point lists; `null` entries are skipped.
    #[serde(default, deserialize_with = "entries")]
    pub polygons: IndexMap<String, Option<Vec<Sample>>>,
}

/// Per-entity styles (`props.properties`), keyed by entity name.
///
/// A `null` style decodes as the default style.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FrameProperties {
    /// Car styles; each key produces an arrow and a footprint series.
    #[serde(default, deserialize_with = "entries")]
    pub cars: IndexMap<String, SeriesStyle>,
    /// Line styles; each key produces one series.
    #[serde(default, deserialize_with = "entries")]
    pub lines: IndexMap<String, SeriesStyle>,
    /// Optional polygon styles.
    #[serde(default, deserialize_with = "entries")]
    pub polygons: IndexMap<String, SeriesStyle>,
}

/// Entity map where a `null` map or a `null` entry decodes as its default.
fn entries<'de, D, V>(deserializer: D) -> Result<IndexMap<String, V>, D::Error>
where
    D: Deserializer<'de>,
    V: Deserialize<'de> + Default,
{
    let entries = Option::<IndexMap<String, Option<V>>>::deserialize(deserializer)?;
    Ok(entries
        .unwrap_or_default()
        .into_iter()
        .map(|(name, value)| (name, value.unwrap_or_default()))
        .collect())
}

/// Counts produced by one [`apply_frame`] call.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FrameSummary {
    /// Cars processed.
    pub cars: usize,
    /// Lines processed.
    pub lines: usize,
    /// Polygons placed.
    pub polygons: usize,
    /// Slots dropped by truncation.
    pub removed: usize,
}

/// Name of the heading-marker series of a car.
pub fn arrow_name(car: &str) -> String {
    format!("{car}_arrow")
}

/// Name of the footprint series of a car.
pub fn footprint_name(car: &str) -> String {
    format!("{car}_footprint")
}

/// Apply one frame to the registry.
///
/// Missing car data yields an empty sample, missing line data an empty
/// list, and missing polygon styles the polygon template. Nothing is drawn.
pub fn apply_frame(
    registry: &mut DatasetRegistry,
    data: &FrameData,
    properties: &FrameProperties,
    footprint: &dyn FootprintProvider,
) -> FrameSummary {
    let mut summary = FrameSummary::default();

    for (name, style) in &properties.cars {
        let sample = data.cars.get(name).copied().unwrap_or_default();

        let arrow = arrow_name(name);
        let handle = registry.resolve_or_create(&arrow);
        registry.set_series(handle, &arrow, SeriesRole::CarArrow, style, vec![sample]);

        let ring = match sample.position() {
            Some(position) => footprint
                .footprint(position.x, position.y, sample.heading.unwrap_or(0.0))
                .into_iter()
                .map(Sample::from)
                .collect(),
            None => Vec::new(),
        };
        let outline = footprint_name(name);
        let handle = registry.resolve_or_create(&outline);
        registry.set_series(handle, &outline, SeriesRole::CarFootprint, style, ring);
        summary.cars += 1;
    }

    for (name, style) in &properties.lines {
        let points = data.lines.get(name).cloned().unwrap_or_default();
        let handle = registry.resolve_or_create(name);
        registry.set_series(handle, name, SeriesRole::Line, style, points);
        summary.lines += 1;
    }

    let default_style = SeriesStyle::default();
    let mut index = registry.named_len();
    for (name, points) in &data.polygons {
        let Some(points) = points else {
            continue;
        };
        let style = properties.polygons.get(name).unwrap_or(&default_style);
        let handle = registry.place(index, name);
        registry.set_series(handle, name, SeriesRole::Polygon, style, points.clone());
        index = handle.index() + 1;
        summary.polygons += 1;
    }
    summary.removed = registry.truncate_from(index);

    log::trace!(
        "frame applied: {} cars, {} lines, {} polygons, {} removed",
        summary.cars,
        summary.lines,
        summary.polygons,
        summary.removed
    );
    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::footprint::VehicleParams;
    use crate::geom::Point;
    use crate::options::GraphProps;
    use crate::render::Color;
    use crate::series::SpecialMarker;
    use serde_json::json;

    fn frame(value: serde_json::Value) -> (FrameData, FrameProperties) {
        let data = serde_json::from_value(value["data"].clone()).expect("data");
        let properties = serde_json::from_value(value["properties"].clone()).expect("properties");
        (data, properties)
    }

    fn names(registry: &DatasetRegistry) -> Vec<String> {
        registry.series().map(|series| series.name().to_string()).collect()
    }

    fn square(x: f64) -> serde_json::Value {
        json!([{ "x": x, "y": 0 }, { "x": x + 1.0, "y": 0 }, { "x": x + 1.0, "y": 1 }])
    }

    #[test]
    fn ego_car_produces_arrow_and_footprint() {
        let (data, properties) = frame(json!({
            "data": { "cars": { "ego": { "x": 0, "y": 0, "heading": 0 } } },
            "properties": { "cars": { "ego": { "color": "red" } } }
        }));
        let mut registry = DatasetRegistry::new();
        let summary = apply_frame(&mut registry, &data, &properties, &VehicleParams::default());

        assert_eq!(summary.cars, 1);
        assert_eq!(registry.len(), 2);
        assert_eq!(names(&registry), ["ego_arrow", "ego_footprint"]);

        let arrow = registry
            .get(registry.resolve("ego_arrow").expect("arrow"))
            .expect("arrow series");
        assert_eq!(arrow.marker(), Some(SpecialMarker::Car));
        assert_eq!(arrow.style().point_radius, 0.0);
        assert_eq!(arrow.style().color, Color::RED);
        assert_eq!(arrow.points(), [Sample::with_heading(0.0, 0.0, 0.0)]);

        let outline = registry
            .get(registry.resolve("ego_footprint").expect("footprint"))
            .expect("footprint series");
        assert!(outline.marker().is_none());
        assert!(!outline.in_legend());
        assert_eq!(outline.points().len(), 5);
        assert_eq!(outline.points()[0].position(), Some(Point::new(3.89, 1.055)));
    }

    #[test]
    fn dropped_polygon_is_truncated() {
        let mut registry = DatasetRegistry::new();
        let provider = VehicleParams::default();
        let (data, properties) = frame(json!({
            "data": { "polygons": { "a": square(0.0), "b": square(5.0) } },
            "properties": {}
        }));
        apply_frame(&mut registry, &data, &properties, &provider);
        assert_eq!(names(&registry), ["a", "b"]);

        let (data, properties) = frame(json!({
            "data": { "polygons": { "a": square(0.0) } },
            "properties": {}
        }));
        let summary = apply_frame(&mut registry, &data, &properties, &provider);
        assert_eq!(summary.removed, 1);
        assert_eq!(names(&registry), ["a"]);
        assert!(registry.resolve("b").is_none());
    }

    #[test]
    fn polygons_default_to_red_outline_and_skip_null() {
        let (data, properties) = frame(json!({
            "data": {
                "lines": { "path": [{ "x": 0, "y": 0 }] },
                "polygons": { "zone": square(0.0), "gone": null, "styled": square(2.0) }
            },
            "properties": {
                "lines": { "path": {} },
                "polygons": { "styled": { "color": "#0000ff", "fill": true } }
            }
        }));
        let mut registry = DatasetRegistry::new();
        let summary = apply_frame(&mut registry, &data, &properties, &VehicleParams::default());
        assert_eq!(summary.polygons, 2);
        assert_eq!(names(&registry), ["path", "zone", "styled"]);

        let zone = registry.get(registry.resolve("zone").expect("zone")).expect("series");
        assert_eq!(zone.style().color, Color::RED);
        assert_eq!(zone.style().border_width, 2.0);
        assert!(!zone.style().fill);
        let styled = registry.get(registry.resolve("styled").expect("styled")).expect("series");
        assert_eq!(styled.style().color, Color::rgb8(0, 0, 255));
        assert!(styled.style().fill);
    }

    #[test]
    fn polygon_slots_follow_feed_order_through_props() {
        let props = GraphProps::from_value(json!({
            "options": {},
            "properties": { "cars": { "zed": {} }, "lines": { "beta": {}, "alpha": {} } },
            "data": {
                "polygons": { "zone": square(0.0), "gone": null, "styled": square(2.0) }
            }
        }))
        .expect("props");
        let (_, properties) = props.required().expect("required");
        let data = props.data.as_ref().expect("data");
        let mut registry = DatasetRegistry::new();
        apply_frame(&mut registry, data, properties, &VehicleParams::default());
        assert_eq!(
            names(&registry),
            ["zed_arrow", "zed_footprint", "beta", "alpha", "zone", "styled"]
        );
    }

    #[test]
    fn null_entities_decode_as_empty_defaults() {
        let props = GraphProps::from_value(json!({
            "options": {},
            "properties": {
                "cars": { "ego": null },
                "lines": { "plan": null },
                "polygons": null
            },
            "data": {
                "cars": { "ego": null },
                "lines": { "plan": null },
                "polygons": { "zone": square(0.0) }
            }
        }))
        .expect("props");
        let (_, properties) = props.required().expect("required");
        assert_eq!(properties.cars["ego"], SeriesStyle::default());
        let data = props.data.as_ref().expect("data");
        assert_eq!(data.cars["ego"], Sample::empty());
        assert!(data.lines["plan"].is_empty());

        let mut registry = DatasetRegistry::new();
        let summary = apply_frame(&mut registry, data, properties, &VehicleParams::default());
        assert_eq!(summary, FrameSummary { cars: 1, lines: 1, polygons: 1, removed: 0 });
        assert_eq!(names(&registry), ["ego_arrow", "ego_footprint", "plan", "zone"]);
        let plan = registry.get(registry.resolve("plan").expect("plan")).expect("series");
        assert!(plan.points().is_empty());
    }

    #[test]
    fn reapplying_a_frame_is_idempotent() {
        let (data, properties) = frame(json!({
            "data": {
                "cars": { "ego": { "x": 1, "y": 2, "heading": 0.3 } },
                "lines": { "plan": [{ "x": 0, "y": 0 }, { "x": 4, "y": 1 }] },
                "polygons": { "zone": square(0.0) }
            },
            "properties": {
                "cars": { "ego": { "color": "green" } },
                "lines": { "plan": { "color": "blue" } }
            }
        }));
        let mut registry = DatasetRegistry::new();
        let provider = VehicleParams::default();
        apply_frame(&mut registry, &data, &properties, &provider);
        let first: Vec<_> = registry.series().cloned().collect();
        let summary = apply_frame(&mut registry, &data, &properties, &provider);
        let second: Vec<_> = registry.series().cloned().collect();
        assert_eq!(first, second);
        assert_eq!(summary.removed, 0);
    }

    #[test]
    fn indices_stay_stable_and_length_tracks_entities() {
        let mut registry = DatasetRegistry::new();
        let provider = VehicleParams::default();
        let frames = [
            json!({
                "data": { "polygons": { "p1": square(0.0), "p2": square(1.0), "p3": square(2.0) } },
                "properties": { "cars": { "ego": {} }, "lines": { "plan": {} } }
            }),
            json!({
                "data": {
                    "cars": { "ego": { "x": 3, "y": 3 } },
                    "polygons": { "p2": square(1.0) }
                },
                "properties": { "cars": { "ego": {} }, "lines": { "plan": {} } }
            }),
            json!({
                "data": { "polygons": { "p1": square(0.0), "p4": square(3.0) } },
                "properties": {
                    "cars": { "ego": {}, "other": {} },
                    "lines": { "plan": {}, "ref": {} }
                }
            }),
        ];

        let mut seen: Vec<(String, usize)> = Vec::new();
        for value in frames {
            let (data, properties) = frame(value);
            apply_frame(&mut registry, &data, &properties, &provider);

            let polygons = data.polygons.values().filter(|points| points.is_some()).count();
            assert_eq!(
                registry.len(),
                properties.cars.len() * 2 + properties.lines.len() + polygons
            );
            for (name, index) in &seen {
                assert_eq!(registry.resolve(name).map(|handle| handle.index()), Some(*index));
            }
            for (handle, series) in registry.iter() {
                if series.role() != SeriesRole::Polygon {
                    seen.push((series.name().to_string(), handle.index()));
                }
            }
        }
        assert_eq!(
            names(&registry)[..6],
            ["ego_arrow", "ego_footprint", "plan", "other_arrow", "other_footprint", "ref"]
        );
        assert_eq!(names(&registry)[6..], ["p1", "p4"]);
    }

    #[test]
    fn removed_polygon_reappears_as_fresh_series() {
        let mut registry = DatasetRegistry::new();
        let provider = VehicleParams::default();
        let styled = json!({ "polygons": { "a": { "color": "blue" } } });

        let (data, _) = frame(json!({ "data": { "polygons": { "a": square(0.0) } }, "properties": {} }));
        let properties: FrameProperties = serde_json::from_value(styled).expect("properties");
        apply_frame(&mut registry, &data, &properties, &provider);

        let (empty, plain) = frame(json!({ "data": {}, "properties": {} }));
        apply_frame(&mut registry, &empty, &plain, &provider);
        assert!(registry.is_empty());

        apply_frame(&mut registry, &data, &plain, &provider);
        let series = registry.get(registry.resolve("a").expect("a")).expect("series");
        assert_eq!(series.style().color, Color::RED);
    }

    #[test]
    fn polygon_shifting_within_a_frame_rebuilds_slots() {
        let mut registry = DatasetRegistry::new();
        let provider = VehicleParams::default();
        let (data, properties) = frame(json!({
            "data": { "polygons": { "a": square(0.0), "b": square(1.0) } },
            "properties": { "polygons": { "a": { "color": "blue" } } }
        }));
        apply_frame(&mut registry, &data, &properties, &provider);

        let (data, properties) = frame(json!({
            "data": { "polygons": { "b": square(1.0), "a": null } },
            "properties": { "polygons": { "a": { "color": "blue" } } }
        }));
        apply_frame(&mut registry, &data, &properties, &provider);
        assert_eq!(names(&registry), ["b"]);
        let b = registry.get(registry.resolve("b").expect("b")).expect("series");
        assert_eq!(b.style().color, Color::RED);
        assert_eq!(b.points().len(), 3);
    }

    #[test]
    fn missing_car_data_yields_empty_sample() {
        let (data, properties) = frame(json!({
            "data": {},
            "properties": { "cars": { "ghost": {} }, "lines": { "plan": {} } }
        }));
        let mut registry = DatasetRegistry::new();
        apply_frame(&mut registry, &data, &properties, &VehicleParams::default());
        let arrow = registry.get(registry.resolve("ghost_arrow").expect("arrow")).expect("series");
        assert_eq!(arrow.points(), [Sample::empty()]);
        let outline = registry
            .get(registry.resolve("ghost_footprint").expect("footprint"))
            .expect("series");
        assert!(outline.points().is_empty());
        let plan = registry.get(registry.resolve("plan").expect("plan")).expect("series");
        assert!(plan.points().is_empty());
    }

    #[test]
    fn footprint_provider_receives_pose() {
        let (data, properties) = frame(json!({
            "data": { "cars": { "ego": { "x": 2, "y": 3 } } },
            "properties": { "cars": { "ego": {} } }
        }));
        let provider = |x: f64, y: f64, heading: f64| vec![Point::new(x + heading, y)];
        let mut registry = DatasetRegistry::new();
        apply_frame(&mut registry, &data, &properties, &provider);
        let outline = registry
            .get(registry.resolve("ego_footprint").expect("footprint"))
            .expect("series");
        assert_eq!(outline.positions(), vec![Point::new(2.0, 3.0)]);
    }
}
