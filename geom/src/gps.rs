use std::fmt;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::Distance;

const EARTH_RADIUS_METERS: f64 = 6_371_000.0;

/// A geographic coordinate, in degrees. This is the only form in which traced points are stored,
/// because it stays valid no matter how the map is panned, zoomed, or rotated afterwards.
#[derive(Copy, Clone, PartialEq, Debug, Serialize, Deserialize)]
#[serde(try_from = "RawGeoPoint")]
pub struct GeoPoint {
    latitude: f64,
    longitude: f64,
}

// Loading goes through the same checks as GeoPoint::new.
#[derive(Deserialize)]
struct RawGeoPoint {
    latitude: f64,
    longitude: f64,
}

impl TryFrom<RawGeoPoint> for GeoPoint {
    type Error = anyhow::Error;

    fn try_from(raw: RawGeoPoint) -> Result<GeoPoint> {
        GeoPoint::new(raw.latitude, raw.longitude)
    }
}

impl GeoPoint {
    /// Fails for non-finite or out-of-range coordinates, rather than letting garbage leak into a
    /// trace.
    pub fn new(lat: f64, lon: f64) -> Result<GeoPoint> {
        if !lat.is_finite() || !lon.is_finite() {
            bail!("GeoPoint({}, {}) isn't finite", lat, lon);
        }
        if !(-90.0..=90.0).contains(&lat) {
            bail!("Latitude {} is outside [-90, 90]", lat);
        }
        if !(-180.0..=180.0).contains(&lon) {
            bail!("Longitude {} is outside [-180, 180]", lon);
        }
        Ok(GeoPoint {
            latitude: lat,
            longitude: lon,
        })
    }

    pub fn lat(&self) -> f64 {
        self.latitude
    }

    pub fn lon(&self) -> f64 {
        self.longitude
    }

    /// Great-circle distance, using the haversine formula.
    pub fn gps_dist(self, other: GeoPoint) -> Distance {
        let lon1 = self.longitude.to_radians();
        let lon2 = other.longitude.to_radians();
        let lat1 = self.latitude.to_radians();
        let lat2 = other.latitude.to_radians();

        let delta_lat = lat2 - lat1;
        let delta_lon = lon2 - lon1;

        let a = (delta_lat / 2.0).sin().powi(2)
            + (delta_lon / 2.0).sin().powi(2) * lat1.cos() * lat2.cos();
        let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());
        Distance::meters(EARTH_RADIUS_METERS * c)
    }

    /// GeoJSON orders coordinates (longitude, latitude).
    pub fn to_geojson_coords(self) -> Vec<f64> {
        vec![self.longitude, self.latitude]
    }
}

impl fmt::Display for GeoPoint {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "GeoPoint({}, {})", self.latitude, self.longitude)
    }
}

/// An axis-aligned box in degrees.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GPSBounds {
    pub min_lon: f64,
    pub min_lat: f64,
    pub max_lon: f64,
    pub max_lat: f64,
}

impl GPSBounds {
    pub fn new() -> GPSBounds {
        GPSBounds {
            min_lon: f64::MAX,
            min_lat: f64::MAX,
            max_lon: f64::MIN,
            max_lat: f64::MIN,
        }
    }

    /// None if there are no points.
    pub fn from(pts: impl IntoIterator<Item = GeoPoint>) -> Option<GPSBounds> {
        let mut b = GPSBounds::new();
        for pt in pts {
            b.update(pt);
        }
        if b.is_empty() {
            None
        } else {
            Some(b)
        }
    }

    pub fn update(&mut self, pt: GeoPoint) {
        self.min_lon = self.min_lon.min(pt.lon());
        self.max_lon = self.max_lon.max(pt.lon());
        self.min_lat = self.min_lat.min(pt.lat());
        self.max_lat = self.max_lat.max(pt.lat());
    }

    pub fn is_empty(&self) -> bool {
        self.min_lon > self.max_lon || self.min_lat > self.max_lat
    }

    pub fn contains(&self, pt: GeoPoint) -> bool {
        pt.lon() >= self.min_lon
            && pt.lon() <= self.max_lon
            && pt.lat() >= self.min_lat
            && pt.lat() <= self.max_lat
    }

    /// Grows the box by some degrees in every direction, clamped to valid coordinates.
    pub fn padded(&self, degrees: f64) -> GPSBounds {
        GPSBounds {
            min_lon: (self.min_lon - degrees).max(-180.0),
            min_lat: (self.min_lat - degrees).max(-90.0),
            max_lon: (self.max_lon + degrees).min(180.0),
            max_lat: (self.max_lat + degrees).min(90.0),
        }
    }

    /// (south, west, north, east), the order Overpass expects.
    pub fn as_swne(&self) -> (f64, f64, f64, f64) {
        (self.min_lat, self.min_lon, self.max_lat, self.max_lon)
    }
}

impl Default for GPSBounds {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn boston_to_cambridge() {
        let boston = GeoPoint::new(42.3601, -71.0589).unwrap();
        let cambridge = GeoPoint::new(42.3736, -71.1097).unwrap();
        let miles = boston.gps_dist(cambridge).to_miles();
        assert!((miles - 2.756).abs() <= 0.01, "got {} miles", miles);
        // With the historical 10% padding, this is the "about 3 miles" users saw
        assert!((miles * 1.1 - 3.0).abs() <= 0.2);
        // Symmetric
        assert_eq!(boston.gps_dist(cambridge), cambridge.gps_dist(boston));
        assert_eq!(boston.gps_dist(boston), Distance::ZERO);
    }

    #[test]
    fn garbage_coordinates_are_rejected() {
        assert!(GeoPoint::new(f64::NAN, 0.0).is_err());
        assert!(GeoPoint::new(0.0, f64::INFINITY).is_err());
        assert!(GeoPoint::new(91.0, 0.0).is_err());
        assert!(GeoPoint::new(0.0, -180.5).is_err());
        assert!(GeoPoint::new(-90.0, 180.0).is_ok());
    }

    #[test]
    fn loading_checks_coordinates() {
        let pt: GeoPoint =
            serde_json::from_str(r#"{"latitude": 42.3601, "longitude": -71.0589}"#).unwrap();
        assert_eq!(pt, GeoPoint::new(42.3601, -71.0589).unwrap());
        assert_eq!(
            serde_json::from_str::<GeoPoint>(&serde_json::to_string(&pt).unwrap()).unwrap(),
            pt
        );

        assert!(
            serde_json::from_str::<GeoPoint>(r#"{"latitude": 999.0, "longitude": 0.0}"#).is_err()
        );
        assert!(
            serde_json::from_str::<GeoPoint>(r#"{"latitude": 0.0, "longitude": -200.0}"#).is_err()
        );
    }

    #[test]
    fn bounds() {
        assert!(GPSBounds::from(Vec::<GeoPoint>::new()).is_none());

        let b = GPSBounds::from(vec![
            GeoPoint::new(42.55, -71.49).unwrap(),
            GeoPoint::new(42.59, -71.45).unwrap(),
        ])
        .unwrap();
        assert_eq!(b.as_swne(), (42.55, -71.49, 42.59, -71.45));
        assert!(b.contains(GeoPoint::new(42.57, -71.47).unwrap()));
        assert!(!b.contains(GeoPoint::new(42.60, -71.47).unwrap()));

        let padded = GPSBounds::from(vec![GeoPoint::new(89.999, 179.999).unwrap()])
            .unwrap()
            .padded(0.01);
        assert_eq!(padded.max_lat, 90.0);
        assert_eq!(padded.max_lon, 180.0);
    }
}
