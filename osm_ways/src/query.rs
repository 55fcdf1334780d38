use std::time::Duration;

use serde::{Deserialize, Serialize};

use geom::GPSBounds;

/// Where and how to ask for ways.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FetchOptions {
    pub endpoint: String,
    pub connect_timeout_secs: u64,
    /// The longest to wait for the next piece of the response.
    pub read_timeout_secs: u64,
    /// An Overpass QL filter applied to the ways, like `[highway]`.
    pub way_filter: String,
    /// How far past the trace to look, in degrees.
    pub padding_degrees: f64,
}

impl Default for FetchOptions {
    fn default() -> FetchOptions {
        FetchOptions {
            endpoint: "https://overpass-api.de/api/interpreter".to_string(),
            connect_timeout_secs: 15,
            read_timeout_secs: 10,
            way_filter: "[highway]".to_string(),
            padding_degrees: 0.001,
        }
    }
}

impl FetchOptions {
    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn read_timeout(&self) -> Duration {
        Duration::from_secs(self.read_timeout_secs)
    }
}

/// All ways matching the filter inside the box, and just enough of their nodes to know where
/// they are. See https://wiki.openstreetmap.org/wiki/Overpass_API/Overpass_QL
pub fn overpass_query(bounds: &GPSBounds, way_filter: &str) -> String {
    let (south, west, north, east) = bounds.as_swne();
    format!(
        "(way({},{},{},{}){};node(w));out skel;",
        south, west, north, east, way_filter
    )
}
