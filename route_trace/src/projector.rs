use std::f64::consts::PI;

use anyhow::{Context, Result};

use geom::{GeoPoint, ScreenPt};

/// Converts between pixels and geographic coordinates for one snapshot of the map view. The
/// mapping changes whenever the map pans, zooms, or rotates, so ask the host for a fresh one for
/// every operation instead of holding onto it.
pub trait Projector {
    /// Fails if the pixel doesn't correspond to a valid coordinate.
    fn to_geo(&self, pixel: ScreenPt) -> Result<GeoPoint>;
    fn to_screen(&self, pt: GeoPoint) -> ScreenPt;
}

pub const TILE_SIZE_PX: f64 = 256.0;
// Web Mercator squashes everything beyond this into the top and bottom edges.
const MAX_MERCATOR_LAT: f64 = 85.051_128_78;

/// A Web Mercator view: a viewport of some pixel size centered on a point, at a (possibly
/// fractional) zoom level, optionally rotated clockwise around the viewport's center.
#[derive(Clone, Debug, PartialEq)]
pub struct MercatorProjector {
    center: GeoPoint,
    zoom: f64,
    width: u32,
    height: u32,
    rotation_degs: f64,
}

impl MercatorProjector {
    pub fn new(center: GeoPoint, zoom: f64, width: u32, height: u32) -> Result<MercatorProjector> {
        if !zoom.is_finite() || zoom < 0.0 {
            bail!("Bad zoom level {}", zoom);
        }
        if width == 0 || height == 0 {
            bail!("Empty viewport {}x{}", width, height);
        }
        Ok(MercatorProjector {
            center,
            zoom,
            width,
            height,
            rotation_degs: 0.0,
        })
    }

    pub fn rotated(mut self, degrees: f64) -> MercatorProjector {
        self.rotation_degs = degrees;
        self
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    /// The number of pixels spanning the whole world at this zoom.
    fn world_size(&self) -> f64 {
        TILE_SIZE_PX * 2.0_f64.powf(self.zoom)
    }

    fn geo_to_world(&self, pt: GeoPoint) -> (f64, f64) {
        let size = self.world_size();
        let x = (pt.lon() + 180.0) / 360.0 * size;
        let sin_lat = pt
            .lat()
            .clamp(-MAX_MERCATOR_LAT, MAX_MERCATOR_LAT)
            .to_radians()
            .sin();
        let y = (0.5 - ((1.0 + sin_lat) / (1.0 - sin_lat)).ln() / (4.0 * PI)) * size;
        (x, y)
    }

    fn world_to_geo(&self, x: f64, y: f64) -> Result<GeoPoint> {
        let size = self.world_size();
        let lon = x / size * 360.0 - 180.0;
        let lat = (PI * (1.0 - 2.0 * y / size)).sinh().atan().to_degrees();
        GeoPoint::new(lat, lon)
            .with_context(|| format!("world pixel ({}, {}) is off the map", x, y))
    }

    fn rotate(&self, dx: f64, dy: f64, degrees: f64) -> (f64, f64) {
        if degrees == 0.0 {
            return (dx, dy);
        }
        let (sin, cos) = degrees.to_radians().sin_cos();
        (dx * cos - dy * sin, dx * sin + dy * cos)
    }

    fn half_viewport(&self) -> (f64, f64) {
        (f64::from(self.width) / 2.0, f64::from(self.height) / 2.0)
    }
}

impl Projector for MercatorProjector {
    fn to_geo(&self, pixel: ScreenPt) -> Result<GeoPoint> {
        let (half_w, half_h) = self.half_viewport();
        let (dx, dy) = self.rotate(
            f64::from(pixel.x) - half_w,
            f64::from(pixel.y) - half_h,
            -self.rotation_degs,
        );
        let (cx, cy) = self.geo_to_world(self.center);
        self.world_to_geo(cx + dx, cy + dy)
            .with_context(|| format!("projecting {}", pixel))
    }

    fn to_screen(&self, pt: GeoPoint) -> ScreenPt {
        let (half_w, half_h) = self.half_viewport();
        let (cx, cy) = self.geo_to_world(self.center);
        let (x, y) = self.geo_to_world(pt);
        let (dx, dy) = self.rotate(x - cx, y - cy, self.rotation_degs);
        ScreenPt::rounded(dx + half_w, dy + half_h)
    }
}
