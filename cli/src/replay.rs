use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use geom::{GeoPoint, ScreenPt};
use route_trace::{DrawingSession, MercatorProjector, TraceConfig, TraceOverlay};

/// A recording of everything that happened while drawing.
#[derive(Serialize, Deserialize)]
pub struct TouchLog {
    /// How the map was showing when the recording started
    pub view: ViewSnapshot,
    pub events: Vec<Event>,
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ViewSnapshot {
    pub lat: f64,
    pub lon: f64,
    pub zoom: f64,
    pub width: u32,
    pub height: u32,
    #[serde(default)]
    pub rotation_degs: f64,
}

impl ViewSnapshot {
    fn projector(&self) -> Result<MercatorProjector> {
        let center = GeoPoint::new(self.lat, self.lon)?;
        Ok(MercatorProjector::new(center, self.zoom, self.width, self.height)?
            .rotated(self.rotation_degs))
    }
}

#[derive(Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Event {
    Touch {
        x: i32,
        y: i32,
        #[serde(default)]
        start: bool,
    },
    TouchUp,
    Measure,
    Erase,
    /// The map panned, zoomed, or rotated
    View(ViewSnapshot),
}

/// Returns the labels of every route measured, in order.
pub fn run(path: &str, config: TraceConfig, geojson_path: Option<String>) -> Result<Vec<String>> {
    let log: TouchLog = traceutil::read_json(path)?;
    let labels = replay(log, config, geojson_path)?;
    for label in &labels {
        println!("{}", label);
    }
    Ok(labels)
}

fn replay(
    log: TouchLog,
    config: TraceConfig,
    geojson_path: Option<String>,
) -> Result<Vec<String>> {
    let padding = config.distance_padding;
    let mut session = DrawingSession::new(config);
    let mut projector = log.view.projector()?;
    let mut labels = Vec::new();

    for (idx, event) in log.events.into_iter().enumerate() {
        match event {
            Event::Touch { x, y, start } => session
                .touch(ScreenPt::new(x, y), start, &projector)
                .with_context(|| format!("event {}", idx))?,
            Event::TouchUp => {
                if let Some(wings) = session.touch_up(&projector) {
                    debug!("Arrowhead at {}", wings.tip);
                }
            }
            Event::Measure => {
                let route = session.measure();
                labels.push(route.label(padding));
            }
            Event::Erase => session.erase(),
            Event::View(view) => {
                projector = view
                    .projector()
                    .with_context(|| format!("event {}", idx))?;
            }
        }
    }

    let overlay = TraceOverlay::new(session.store(), &projector, session.arrows());
    info!(
        "At the end, {} strokes remain on screen",
        overlay.segments.len()
    );

    if let Some(path) = geojson_path {
        match session.last_measured_route() {
            Some(route) => {
                let fc = route.to_geojson(padding);
                fs_err::write(&path, serde_json::to_string_pretty(&fc)?)?;
                info!("Wrote {}", path);
            }
            None => warn!("Nothing was measured, so not writing {}", path),
        }
    }

    Ok(labels)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch_log(raw: &str) -> TouchLog {
        traceutil::from_json(raw).unwrap()
    }

    #[test]
    fn replay_two_measurements() {
        let log = touch_log(
            r#"{
  "view": {"lat": 42.3601, "lon": -71.0589, "zoom": 15.0, "width": 1080, "height": 1920},
  "events": [
    {"type": "touch", "x": 100, "y": 500, "start": true},
    {"type": "touch", "x": 900, "y": 500},
    {"type": "touch_up"},
    {"type": "measure"},
    {"type": "view", "lat": 42.3601, "lon": -71.0589, "zoom": 16.0, "width": 1080, "height": 1920},
    {"type": "touch", "x": 540, "y": 960, "start": true},
    {"type": "touch", "x": 540, "y": 1560},
    {"type": "touch_up"},
    {"type": "measure"},
    {"type": "erase"},
    {"type": "measure"}
  ]
}"#,
        );
        let labels = replay(log, TraceConfig::default(), None).unwrap();
        assert_eq!(labels.len(), 3);
        assert_ne!(labels[0], "0 miles");
        assert_ne!(labels[0], labels[1]);
        assert_eq!(labels[2], "0 miles");
    }

    #[test]
    fn bad_view() {
        let log = touch_log(
            r#"{
  "view": {"lat": 42.3601, "lon": -71.0589, "zoom": 15.0, "width": 0, "height": 1920},
  "events": []
}"#,
        );
        assert!(replay(log, TraceConfig::default(), None).is_err());
    }
}
