//! Value types shared by everything that captures and measures a hand-drawn route: geographic
//! points that persist across pan and zoom, integer screen pixels that don't, distances, and the
//! planar angles used to smooth stroke junctions.

#[macro_use]
extern crate anyhow;

mod angle;
mod distance;
mod gps;
mod screen;

pub use crate::angle::Angle;
pub use crate::distance::Distance;
pub use crate::gps::{GPSBounds, GeoPoint};
pub use crate::screen::ScreenPt;

/// Rounds to 4 decimal places, so distances summed in the same order compare equal and survive a
/// JSON round trip unchanged.
pub fn trim_f64(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}

/// Truncates (never rounds) to the given number of decimal places. A small nudge absorbs binary
/// representation error and the error from `trim_f64`, so 3.07 stays 3.07 instead of becoming
/// 3.06. Rounding meters to 4 places can leave miles up to about 3.1e-8 short, which is 3.1e-6
/// after scaling to cents, so the nudge has to be bigger than that.
pub fn truncate_f64(x: f64, places: i32) -> f64 {
    let scale = 10_f64.powi(places);
    let nudge = if x < 0.0 { -1e-5 } else { 1e-5 };
    ((x * scale) + nudge).trunc() / scale
}
