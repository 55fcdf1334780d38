use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::GeoPoint;

use crate::ZoomConfig;

/// Where the map should be centered when nothing else says so, usually the device's last known
/// location.
pub trait LocationSource {
    fn last_known_location(&self) -> Option<GeoPoint>;
}

/// What the host saves when it's suspended and restores afterwards.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    map_center: Option<GeoPoint>,
    zoom_level: i32,
    draw_mode_open: bool,
    #[serde(skip)]
    zoom_bounds: ZoomConfig,
}

impl ViewState {
    pub fn new(zoom: &ZoomConfig) -> ViewState {
        ViewState {
            map_center: None,
            zoom_level: zoom.default_zoom,
            draw_mode_open: false,
            zoom_bounds: zoom.clone(),
        }
    }

    /// If no center has been set yet, falls back to the location source and remembers the answer.
    pub fn map_center(&mut self, location: &dyn LocationSource) -> Option<GeoPoint> {
        if self.map_center.is_none() {
            self.map_center = location.last_known_location();
        }
        self.map_center
    }

    /// Without consulting any fallback.
    pub fn stored_map_center(&self) -> Option<GeoPoint> {
        self.map_center
    }

    pub fn set_map_center(&mut self, center: GeoPoint) {
        self.map_center = Some(center);
    }

    pub fn zoom_level(&self) -> i32 {
        self.zoom_level
    }

    /// Levels outside the exclusive bounds are ignored. Returns true if the level changed.
    pub fn set_zoom_level(&mut self, zoom: i32) -> bool {
        if !self.zoom_bounds.allows(zoom) {
            warn!(
                "Ignoring zoom level {}; it must be strictly between {} and {}",
                zoom, self.zoom_bounds.min_zoom, self.zoom_bounds.max_zoom
            );
            return false;
        }
        let changed = self.zoom_level != zoom;
        self.zoom_level = zoom;
        changed
    }

    pub fn draw_mode_open(&self) -> bool {
        self.draw_mode_open
    }

    pub fn set_draw_mode_open(&mut self, open: bool) {
        self.draw_mode_open = open;
    }

    pub fn to_json(&self) -> Result<String> {
        traceutil::to_json(self)
    }

    /// The zoom bounds aren't saved, so they come from the current config.
    pub fn from_json(raw: &str, zoom: &ZoomConfig) -> Result<ViewState> {
        let mut view: ViewState = traceutil::from_json(raw)?;
        view.zoom_bounds = zoom.clone();
        if !zoom.allows(view.zoom_level) {
            warn!(
                "Saved zoom level {} is out of bounds; using {}",
                view.zoom_level, zoom.default_zoom
            );
            view.zoom_level = zoom.default_zoom;
        }
        Ok(view)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use super::*;

    struct FakeGps {
        location: Option<GeoPoint>,
        reads: Cell<usize>,
    }

    impl LocationSource for FakeGps {
        fn last_known_location(&self) -> Option<GeoPoint> {
            self.reads.set(self.reads.get() + 1);
            self.location
        }
    }

    #[test]
    fn defaults() {
        let view = ViewState::new(&ZoomConfig::default());
        assert_eq!(view.zoom_level(), 11);
        assert!(!view.draw_mode_open());
        assert_eq!(view.stored_map_center(), None);
    }

    #[test]
    fn center_falls_back_once() {
        let here = GeoPoint::new(42.5, -71.5).unwrap();
        let gps = FakeGps {
            location: Some(here),
            reads: Cell::new(0),
        };
        let mut view = ViewState::new(&ZoomConfig::default());
        assert_eq!(view.map_center(&gps), Some(here));
        assert_eq!(view.map_center(&gps), Some(here));
        assert_eq!(gps.reads.get(), 1);

        let elsewhere = GeoPoint::new(40.0, -70.0).unwrap();
        view.set_map_center(elsewhere);
        assert_eq!(view.map_center(&gps), Some(elsewhere));
    }

    #[test]
    fn no_location_anywhere() {
        let gps = FakeGps {
            location: None,
            reads: Cell::new(0),
        };
        let mut view = ViewState::new(&ZoomConfig::default());
        assert_eq!(view.map_center(&gps), None);
        assert_eq!(view.map_center(&gps), None);
        assert_eq!(gps.reads.get(), 2);
    }

    #[test]
    fn out_of_range_zoom_is_ignored() {
        let mut view = ViewState::new(&ZoomConfig::default());
        assert!(view.set_zoom_level(15));
        assert!(!view.set_zoom_level(15));
        assert!(!view.set_zoom_level(18));
        assert!(!view.set_zoom_level(1));
        assert!(!view.set_zoom_level(-3));
        assert_eq!(view.zoom_level(), 15);
        assert!(view.set_zoom_level(2));
        assert!(view.set_zoom_level(17));
    }

    #[test]
    fn survives_suspension() {
        let zoom = ZoomConfig::default();
        let mut view = ViewState::new(&zoom);
        view.set_map_center(GeoPoint::new(42.3601, -71.0589).unwrap());
        view.set_zoom_level(14);
        view.set_draw_mode_open(true);

        let restored = ViewState::from_json(&view.to_json().unwrap(), &zoom).unwrap();
        assert_eq!(restored, view);

        let tighter = ZoomConfig {
            default_zoom: 5,
            min_zoom: 2,
            max_zoom: 10,
        };
        let restored = ViewState::from_json(&view.to_json().unwrap(), &tighter).unwrap();
        assert_eq!(restored.zoom_level(), 5);
        assert!(restored.draw_mode_open());
    }

    #[test]
    fn corrupt_center_is_rejected() {
        let raw = r#"{"map_center": {"latitude": 999.0, "longitude": 0.0}, "zoom_level": 10, "draw_mode_open": false}"#;
        assert!(ViewState::from_json(raw, &ZoomConfig::default()).is_err());
    }
}
