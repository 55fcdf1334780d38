use geom::ScreenPt;

use crate::ArrowConfig;

/// The two short strokes of an arrowhead, each drawn from its point to the tip.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ArrowWings {
    pub tip: ScreenPt,
    /// Derived from the larger x solution
    pub first: ScreenPt,
    /// Derived from the smaller x solution
    pub second: ScreenPt,
}

impl ArrowWings {
    pub fn lines(&self) -> [(ScreenPt, ScreenPt); 2] {
        [(self.first, self.tip), (self.second, self.tip)]
    }
}

/// Which way a stroke heads on the screen, where y grows downward.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Heading {
    DownRight,
    UpRight,
    DownLeft,
    UpLeft,
}

impl Heading {
    fn between(prior: ScreenPt, tip: ScreenPt) -> Heading {
        match (tip.x >= prior.x, tip.y >= prior.y) {
            (true, true) => Heading::DownRight,
            (true, false) => Heading::UpRight,
            (false, true) => Heading::DownLeft,
            (false, false) => Heading::UpLeft,
        }
    }
}

/// Computes arrowhead geometry in screen space.
pub struct ArrowAnnotator {
    config: ArrowConfig,
}

impl ArrowAnnotator {
    pub fn new(config: ArrowConfig) -> ArrowAnnotator {
        ArrowAnnotator { config }
    }

    pub fn config(&self) -> &ArrowConfig {
        &self.config
    }

    /// The arrowhead for the end of a stroke drawn through these points, at the configured size.
    pub fn wings_at_end(&self, polyline: &[ScreenPt]) -> Option<ArrowWings> {
        let (prior, tip) = stroke_end(polyline)?;
        self.wings_for(tip, prior)
    }

    /// Uses the configured size.
    pub fn wings_for(&self, tip: ScreenPt, prior: ScreenPt) -> Option<ArrowWings> {
        self.wings(tip, prior, self.config.size_px)
    }

    /// An arrowhead pointing at `tip`, along the direction from `prior`. The base of the arrow is
    /// `size` pixels back along the stroke, and the wings sit `size / 2` (in whole pixels) to
    /// either side of the base. None when the two points coincide, since there's no direction.
    pub fn wings(&self, tip: ScreenPt, prior: ScreenPt, size: i32) -> Option<ArrowWings> {
        if tip == prior {
            return None;
        }

        let tip_x = f64::from(tip.x);
        let tip_y = f64::from(tip.y);
        let mut slope = f64::from(tip.y - prior.y) / f64::from(tip.x - prior.x);
        if slope.is_infinite() {
            slope = self.config.infinite_slope_sentinel.copysign(slope);
        }

        // Of the two points on the stroke's line at this distance from the tip, the base is the
        // one behind the tip.
        let (larger_x, smaller_x) = points_on_line_at_distance(f64::from(size), slope, tip_x);
        let base_x = match Heading::between(prior, tip) {
            Heading::DownRight | Heading::UpRight => smaller_x,
            Heading::DownLeft | Heading::UpLeft => larger_x,
        };
        let base_y = slope * (base_x - tip_x) + tip_y;

        let base_slope = if slope.abs() < self.config.flat_slope_threshold {
            self.config.flat_slope_sentinel
        } else {
            -1.0 / slope
        };
        let (first_x, second_x) =
            points_on_line_at_distance(f64::from(size / 2), base_slope, base_x);
        let first_y = base_slope * (first_x - base_x) + base_y;
        let second_y = base_slope * (second_x - base_x) + base_y;

        Some(ArrowWings {
            tip,
            first: ScreenPt::rounded(first_x, first_y),
            second: ScreenPt::rounded(second_x, second_y),
        })
    }
}

/// Intersects a circle of some radius around a point with a line of some slope through the same
/// point, returning the x coordinates of both intersections, larger first. This is the quadratic
/// `x^2 - 2*x0*x + x0^2 - r^2/(1+m^2) = 0`. The x0^2 terms cancel in the discriminant, which
/// keeps steep slopes from losing all precision.
fn points_on_line_at_distance(radius: f64, slope: f64, x0: f64) -> (f64, f64) {
    let b = -2.0 * x0;
    let discriminant = 4.0 * radius * radius / (1.0 + slope * slope);
    let root = discriminant.sqrt();
    ((-b + root) / 2.0, (-b - root) / 2.0)
}

/// The last point of a stroke and the point before it that gives it a direction, in drawing
/// order. When zoomed out, the last few points can collapse onto the same pixel, so this looks
/// back for the last point that's somewhere else.
pub(crate) fn stroke_end(polyline: &[ScreenPt]) -> Option<(ScreenPt, ScreenPt)> {
    let (tip, rest) = polyline.split_last()?;
    let prior = rest.iter().rev().find(|pt| *pt != tip)?;
    Some((*prior, *tip))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn annotator() -> ArrowAnnotator {
        ArrowAnnotator::new(ArrowConfig::default())
    }

    fn dist(a: ScreenPt, b: ScreenPt) -> f64 {
        (f64::from(a.x - b.x).powi(2) + f64::from(a.y - b.y).powi(2)).sqrt()
    }

    #[test]
    fn horizontal_stroke() {
        let wings = annotator()
            .wings(ScreenPt::new(100, 100), ScreenPt::new(0, 100), 20)
            .unwrap();
        assert_eq!(wings.first, ScreenPt::new(80, 110));
        assert_eq!(wings.second, ScreenPt::new(80, 90));

        // Heading left, the base is to the right of the tip
        let wings = annotator()
            .wings(ScreenPt::new(0, 100), ScreenPt::new(100, 100), 20)
            .unwrap();
        assert_eq!(wings.first, ScreenPt::new(20, 110));
        assert_eq!(wings.second, ScreenPt::new(20, 90));
    }

    #[test]
    fn diagonal_stroke() {
        // A 3-4-5 triangle makes the base land on whole pixels: (24, 32)
        let wings = annotator()
            .wings(ScreenPt::new(30, 40), ScreenPt::new(0, 0), 10)
            .unwrap();
        assert_eq!(wings.first, ScreenPt::new(28, 29));
        assert_eq!(wings.second, ScreenPt::new(20, 35));

        let wings = annotator()
            .wings(ScreenPt::new(0, 0), ScreenPt::new(30, 40), 10)
            .unwrap();
        assert_eq!(wings.first, ScreenPt::new(10, 5));
        assert_eq!(wings.second, ScreenPt::new(2, 11));
    }

    #[test]
    fn vertical_strokes_point_the_right_way() {
        // Going up
        let wings = annotator()
            .wings(ScreenPt::new(50, 60), ScreenPt::new(50, 100), 10)
            .unwrap();
        assert_eq!(wings.first, ScreenPt::new(55, 70));
        assert_eq!(wings.second, ScreenPt::new(45, 70));

        // Going down
        let wings = annotator()
            .wings(ScreenPt::new(50, 100), ScreenPt::new(50, 60), 10)
            .unwrap();
        assert_eq!(wings.first, ScreenPt::new(55, 90));
        assert_eq!(wings.second, ScreenPt::new(45, 90));
    }

    #[test]
    fn wings_are_symmetric_and_behind_the_tip() {
        let tip = ScreenPt::new(500, 500);
        for prior in [
            ScreenPt::new(400, 430),
            ScreenPt::new(620, 410),
            ScreenPt::new(580, 640),
            ScreenPt::new(350, 560),
            ScreenPt::new(505, 300),
            ScreenPt::new(300, 503),
        ] {
            let wings = annotator().wings_for(tip, prior).unwrap();
            let d1 = dist(wings.first, tip);
            let d2 = dist(wings.second, tip);
            assert!((d1 - d2).abs() <= 1.5, "{} vs {} from {}", d1, d2, prior);
            assert!(d1 > 20.0 && d1 < 35.0, "{} from {}", d1, prior);
            // Both wings are closer to where the stroke came from than the tip is
            assert!(dist(wings.first, prior) < dist(tip, prior));
            assert!(dist(wings.second, prior) < dist(tip, prior));
        }
    }

    #[test]
    fn no_direction() {
        let pt = ScreenPt::new(3, 4);
        assert!(annotator().wings(pt, pt, 25).is_none());
    }

    #[test]
    fn end_of_a_stroke() {
        let a = annotator();
        let collapsed = vec![
            ScreenPt::new(0, 0),
            ScreenPt::new(50, 0),
            ScreenPt::new(50, 0),
        ];
        assert_eq!(
            a.wings_at_end(&collapsed),
            a.wings_for(ScreenPt::new(50, 0), ScreenPt::new(0, 0))
        );
        assert!(a.wings_at_end(&[]).is_none());
        assert!(a.wings_at_end(&[ScreenPt::new(1, 1), ScreenPt::new(1, 1)]).is_none());
    }

    #[test]
    fn zero_size() {
        let tip = ScreenPt::new(10, 10);
        let wings = annotator().wings(tip, ScreenPt::new(0, 0), 0).unwrap();
        assert_eq!(wings.first, tip);
        assert_eq!(wings.second, tip);
        assert_eq!(wings.lines(), [(tip, tip), (tip, tip)]);
    }
}
