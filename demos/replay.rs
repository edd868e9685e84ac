use gpui_trajplot::{GraphProps, LiveChart, RenderCommand, ScreenRect};
use serde_json::json;

fn frame(step: usize) -> serde_json::Value {
    let t = step as f64 * 0.1;
    let plan: Vec<_> = (0..20)
        .map(|i| {
            let s = t + i as f64 * 0.5;
            json!({ "x": s, "y": (s * 0.3).sin() * 2.0 })
        })
        .collect();
    let mut polygons = serde_json::Map::new();
    for obstacle in 0..(step % 4) {
        let x = t + 5.0 + obstacle as f64 * 3.0;
        polygons.insert(
            format!("obstacle_{obstacle}"),
            json!([{ "x": x, "y": 1 }, { "x": x + 1.0, "y": 1 }, { "x": x + 1.0, "y": 2 }, { "x": x, "y": 2 }]),
        );
    }
    json!({
        "title": "Replay",
        "options": {
            "axes": { "x": { "labelString": "x (m)", "windowSize": 30 }, "y": { "labelString": "y (m)", "windowSize": 12, "midValue": 0 } }
        },
        "properties": {
            "cars": { "ego": { "color": "#d62728" } },
            "lines": { "plan": { "color": "#1f77b4", "showText": true, "lineTension": 0.3 } }
        },
        "data": {
            "cars": { "ego": { "x": t, "y": (t * 0.3).sin() * 2.0, "heading": (t * 0.3).cos() * 0.6 } },
            "lines": { "plan": plan },
            "polygons": polygons
        }
    })
}

fn main() {
    let steps: usize = std::env::var("STEPS")
        .ok()
        .and_then(|value| value.parse().ok())
        .unwrap_or(12);

    let Ok(props) = GraphProps::from_value(frame(0)) else {
        eprintln!("invalid initial props");
        return;
    };
    let Some(mut chart) = LiveChart::mount(&props) else {
        eprintln!("chart not mounted");
        return;
    };
    let bounds = ScreenRect::from_origin_size(0.0, 0.0, 800.0, 600.0);

    for step in 1..steps {
        let Ok(props) = GraphProps::from_value(frame(step)) else {
            continue;
        };
        let summary = chart.update_props(&props);
        let list = chart.render(bounds);
        let glyphs = list
            .commands()
            .iter()
            .filter(|command| matches!(command, RenderCommand::Glyph { .. }))
            .count();
        println!(
            "step {step:>3}: series={:>2} {:?} glyphs={glyphs} viewport={:?}",
            chart.registry().len(),
            summary,
            chart.viewport(),
        );
    }
    chart.destroy();
}
