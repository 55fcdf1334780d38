use geom::Distance;

use crate::Trace;

/// Sums the haversine distance between consecutive points of each segment. The jump between one
/// stroke's end and the next stroke's start is a lifted finger, not part of the route, so it's
/// never counted.
pub fn measure(trace: &Trace) -> Distance {
    trace
        .segments()
        .iter()
        .flat_map(|segment| segment.windows(2))
        .map(|pair| pair[0].gps_dist(pair[1]))
        .sum()
}

#[cfg(test)]
mod tests {
    use geom::GeoPoint;

    use super::*;

    fn pt(lat: f64, lon: f64) -> GeoPoint {
        GeoPoint::new(lat, lon).unwrap()
    }

    #[test]
    fn degenerate_traces_are_zero() {
        assert_eq!(measure(&Trace::new()), Distance::ZERO);
        assert_eq!(
            measure(&Trace::from_segments(vec![vec![], vec![pt(1.0, 1.0)]])),
            Distance::ZERO
        );
    }

    #[test]
    fn pen_lifts_are_not_counted() {
        let boston = pt(42.3601, -71.0589);
        let cambridge = pt(42.3736, -71.1097);
        let somerville = pt(42.3876, -71.0995);
        let medford = pt(42.4184, -71.1062);

        let trace = Trace::from_segments(vec![vec![boston, cambridge], vec![somerville, medford]]);
        let expected = boston.gps_dist(cambridge) + somerville.gps_dist(medford);
        assert_eq!(measure(&trace), expected);
        assert!(measure(&trace) < expected + cambridge.gps_dist(somerville));

        let one_stroke = Trace::from_segments(vec![vec![boston, cambridge, somerville, medford]]);
        assert_eq!(
            measure(&one_stroke),
            boston.gps_dist(cambridge)
                + cambridge.gps_dist(somerville)
                + somerville.gps_dist(medford)
        );
    }
}
