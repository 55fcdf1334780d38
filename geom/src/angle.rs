use std::fmt;

use serde::{Deserialize, Serialize};

/// An unsigned angle in degrees, in [0, 180].
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
pub struct Angle(f64);

impl Angle {
    pub const STRAIGHT: Angle = Angle(180.0);

    pub fn degrees(degs: f64) -> Angle {
        Angle(degs)
    }

    /// The angle at `vertex` formed by the rays toward `a` and `b`, treating (x, y) pairs as
    /// planar coordinates and using the law of cosines on the three side lengths.
    ///
    /// If any side has zero length, the cosine is undefined. That's treated as a straight line,
    /// 180 degrees.
    pub fn at_vertex(a: (f64, f64), vertex: (f64, f64), b: (f64, f64)) -> Angle {
        let ac_squared = dist_squared(a, vertex);
        let cb_squared = dist_squared(vertex, b);
        let ab_squared = dist_squared(a, b);

        if ac_squared == 0.0 || cb_squared == 0.0 || ab_squared == 0.0 {
            return Angle::STRAIGHT;
        }

        let cos_theta =
            (ab_squared - ac_squared - cb_squared) / (-2.0 * ac_squared.sqrt() * cb_squared.sqrt());
        // Rounding can push nearly-collinear points just outside acos's domain
        Angle(cos_theta.clamp(-1.0, 1.0).acos().to_degrees())
    }

    pub fn to_degrees(self) -> f64 {
        self.0
    }
}

fn dist_squared(p1: (f64, f64), p2: (f64, f64)) -> f64 {
    (p1.0 - p2.0).powi(2) + (p1.1 - p2.1).powi(2)
}

impl fmt::Display for Angle {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "Angle({} degrees)", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(angle: Angle, expected: f64) -> bool {
        (angle.to_degrees() - expected).abs() < 1e-9
    }

    #[test]
    fn known_angles() {
        assert!(close(
            Angle::at_vertex((0.0, 0.0), (1.0, 0.0), (2.0, 0.0)),
            180.0
        ));
        assert!(close(
            Angle::at_vertex((0.0, 0.0), (1.0, 0.0), (1.0, 1.0)),
            90.0
        ));
        assert!(close(
            Angle::at_vertex((0.0, 0.0), (1.0, 0.0), (0.0, 1.0)),
            45.0
        ));
        // Nearly doubling back on yourself
        assert!(Angle::at_vertex((0.0, 0.0), (1.0, 0.0), (0.0, 0.001)).to_degrees() < 0.1);
    }

    #[test]
    fn coincident_points_are_straight() {
        assert_eq!(
            Angle::at_vertex((1.0, 1.0), (1.0, 1.0), (2.0, 3.0)),
            Angle::STRAIGHT
        );
        assert_eq!(
            Angle::at_vertex((0.0, 0.0), (1.0, 1.0), (1.0, 1.0)),
            Angle::STRAIGHT
        );
        // Returning to exactly where you started
        assert_eq!(
            Angle::at_vertex((0.0, 0.0), (1.0, 0.0), (0.0, 0.0)),
            Angle::STRAIGHT
        );
    }
}
