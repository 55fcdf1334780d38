use std::fmt;

/// A point in whole pixels. Only meaningful against the projector snapshot that produced it or
/// will consume it, so it's never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScreenPt {
    pub x: i32,
    pub y: i32,
}

impl ScreenPt {
    pub fn new(x: i32, y: i32) -> ScreenPt {
        ScreenPt { x, y }
    }

    /// Rounds to the nearest pixel, the same way touch coordinates are snapped.
    pub fn rounded(x: f64, y: f64) -> ScreenPt {
        ScreenPt {
            x: x.round() as i32,
            y: y.round() as i32,
        }
    }
}

impl fmt::Display for ScreenPt {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "ScreenPt({}, {})", self.x, self.y)
    }
}
