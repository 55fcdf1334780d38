use anyhow::Result;
use serde::{Deserialize, Serialize};

use geom::{GPSBounds, GeoPoint, ScreenPt};

use crate::arrow::stroke_end;
use crate::Projector;

/// One continuous stroke, from finger down to finger up.
pub type Segment = Vec<GeoPoint>;

/// Every stroke drawn so far in one session, in order.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Trace {
    segments: Vec<Segment>,
}

impl Trace {
    pub fn new() -> Trace {
        Trace::default()
    }

    pub fn from_segments(segments: Vec<Segment>) -> Trace {
        Trace { segments }
    }

    pub fn segments(&self) -> &Vec<Segment> {
        &self.segments
    }

    pub(crate) fn segments_mut(&mut self) -> &mut Vec<Segment> {
        &mut self.segments
    }

    pub fn num_points(&self) -> usize {
        self.segments.iter().map(|s| s.len()).sum()
    }

    pub fn all_points(&self) -> impl Iterator<Item = GeoPoint> + '_ {
        self.segments.iter().flatten().copied()
    }

    /// None if there are no points at all.
    pub fn bounds(&self) -> Option<GPSBounds> {
        GPSBounds::from(self.all_points())
    }
}

/// Owns the trace being drawn. Touches are converted to geographic coordinates the moment they
/// arrive, using whatever projector is current then.
#[derive(Clone, Debug, Default)]
pub struct TraceStore {
    trace: Trace,
    last_draw_spot: Option<GeoPoint>,
}

impl TraceStore {
    pub fn new() -> TraceStore {
        TraceStore::default()
    }

    pub fn begin_segment(&mut self) {
        self.trace.segments.push(Vec::new());
    }

    /// Appends to the last segment. If there isn't one yet, starts it first; the touch-down that
    /// should have done that may have been dropped. If the pixel can't be projected, the trace
    /// is left untouched.
    pub fn append_point(&mut self, pixel: ScreenPt, projector: &dyn Projector) -> Result<()> {
        let pt = projector.to_geo(pixel)?;
        if self.trace.segments.is_empty() {
            self.begin_segment();
        }
        if let Some(segment) = self.trace.segments.last_mut() {
            segment.push(pt);
        }
        self.last_draw_spot = Some(pt);
        Ok(())
    }

    /// One event from the touch source.
    pub fn touch(
        &mut self,
        pixel: ScreenPt,
        is_segment_start: bool,
        projector: &dyn Projector,
    ) -> Result<()> {
        if is_segment_start {
            // Project before starting the segment, so a failure doesn't leave an empty one
            // behind
            let pt = projector.to_geo(pixel)?;
            self.begin_segment();
            if let Some(segment) = self.trace.segments.last_mut() {
                segment.push(pt);
            }
            self.last_draw_spot = Some(pt);
            Ok(())
        } else {
            self.append_point(pixel, projector)
        }
    }

    pub fn forget(&mut self) {
        self.trace.segments.clear();
        self.last_draw_spot = None;
    }

    pub fn has_points(&self) -> bool {
        self.trace.segments.iter().any(|s| !s.is_empty())
    }

    /// Re-projects everything through the projector passed in now. Screen coordinates are never
    /// stored.
    pub fn to_screen_space(&self, projector: &dyn Projector) -> Vec<Vec<ScreenPt>> {
        self.trace
            .segments
            .iter()
            .map(|segment| segment.iter().map(|pt| projector.to_screen(*pt)).collect())
            .collect()
    }

    pub fn as_geographic(&self) -> &Trace {
        &self.trace
    }

    pub(crate) fn trace_mut(&mut self) -> &mut Trace {
        &mut self.trace
    }

    /// The most recently drawn point, for re-centering the map.
    pub fn last_draw_spot(&self) -> Option<GeoPoint> {
        self.last_draw_spot
    }

    /// The end of the last segment in current screen space, as (prior, tip) in the order they
    /// were drawn. If the final points land on the same pixel, `prior` is the last one that
    /// doesn't.
    pub fn last_two_screen_points(
        &self,
        projector: &dyn Projector,
    ) -> Option<(ScreenPt, ScreenPt)> {
        let segment = self.trace.segments.last()?;
        let on_screen: Vec<ScreenPt> = segment.iter().map(|pt| projector.to_screen(*pt)).collect();
        stroke_end(&on_screen)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::MercatorProjector;

    fn projector() -> MercatorProjector {
        MercatorProjector::new(GeoPoint::new(42.3601, -71.0589).unwrap(), 16.0, 1000, 1000)
            .unwrap()
    }

    #[test]
    fn points_land_in_the_open_segment_in_order() {
        let proj = projector();
        let mut store = TraceStore::new();
        let pixels: Vec<ScreenPt> = (0..7).map(|i| ScreenPt::new(100 + 10 * i, 200)).collect();
        store.touch(pixels[0], true, &proj).unwrap();
        for pixel in &pixels[1..] {
            store.touch(*pixel, false, &proj).unwrap();
        }

        let trace = store.as_geographic();
        assert_eq!(trace.segments().len(), 1);
        assert_eq!(trace.segments()[0].len(), 7);
        assert_eq!(store.to_screen_space(&proj), vec![pixels]);
    }

    #[test]
    fn dropped_touch_down_starts_a_segment_anyway() {
        let proj = projector();
        let mut store = TraceStore::new();
        assert!(!store.has_points());
        store.append_point(ScreenPt::new(5, 5), &proj).unwrap();
        assert!(store.has_points());
        assert_eq!(store.as_geographic().segments().len(), 1);
    }

    #[test]
    fn forget_then_draw_again() {
        let proj = projector();
        let mut store = TraceStore::new();
        store.touch(ScreenPt::new(1, 1), true, &proj).unwrap();
        store.touch(ScreenPt::new(2, 2), false, &proj).unwrap();
        store.touch(ScreenPt::new(3, 3), true, &proj).unwrap();
        assert_eq!(store.as_geographic().segments().len(), 2);

        store.forget();
        assert!(!store.has_points());
        assert!(store.last_draw_spot().is_none());
        store.forget();
        assert!(!store.has_points());

        store.append_point(ScreenPt::new(4, 4), &proj).unwrap();
        assert_eq!(store.as_geographic().segments().len(), 1);
        assert_eq!(store.as_geographic().num_points(), 1);
    }

    #[test]
    fn begin_segment_alone_has_no_points() {
        let mut store = TraceStore::new();
        store.begin_segment();
        assert!(!store.has_points());
        assert!(store.as_geographic().bounds().is_none());
    }

    #[test]
    fn trace_survives_zooming() {
        let proj = projector();
        let mut store = TraceStore::new();
        store.touch(ScreenPt::new(600, 500), true, &proj).unwrap();
        let spot = store.last_draw_spot().unwrap();

        // Zoom in one level around the same center; the point moves twice as far from center
        let zoomed = MercatorProjector::new(proj.center(), 17.0, 1000, 1000).unwrap();
        assert_eq!(
            store.to_screen_space(&zoomed),
            vec![vec![ScreenPt::new(700, 500)]]
        );
        assert_eq!(store.last_draw_spot(), Some(spot));
    }

    #[test]
    fn failed_projection_leaves_trace_alone() {
        let edge = MercatorProjector::new(GeoPoint::new(0.0, 179.99).unwrap(), 12.0, 1000, 1000)
            .unwrap();
        let mut store = TraceStore::new();
        store.touch(ScreenPt::new(500, 500), true, &edge).unwrap();
        assert!(store.touch(ScreenPt::new(999, 500), true, &edge).is_err());
        assert!(store.append_point(ScreenPt::new(999, 500), &edge).is_err());
        assert_eq!(store.as_geographic().segments().len(), 1);
        assert_eq!(store.as_geographic().num_points(), 1);
    }

    #[test]
    fn last_two_points() {
        let proj = projector();
        let mut store = TraceStore::new();
        assert!(store.last_two_screen_points(&proj).is_none());
        store.touch(ScreenPt::new(10, 10), true, &proj).unwrap();
        assert!(store.last_two_screen_points(&proj).is_none());
        store.touch(ScreenPt::new(20, 30), false, &proj).unwrap();
        store.touch(ScreenPt::new(40, 50), false, &proj).unwrap();
        assert_eq!(
            store.last_two_screen_points(&proj),
            Some((ScreenPt::new(20, 30), ScreenPt::new(40, 50)))
        );

        // Finishing on the same pixel twice looks further back
        store.touch(ScreenPt::new(40, 50), false, &proj).unwrap();
        assert_eq!(
            store.last_two_screen_points(&proj),
            Some((ScreenPt::new(20, 30), ScreenPt::new(40, 50)))
        );

        // A stroke that never leaves its first pixel has no direction
        store.touch(ScreenPt::new(70, 70), true, &proj).unwrap();
        store.touch(ScreenPt::new(70, 70), false, &proj).unwrap();
        assert!(store.last_two_screen_points(&proj).is_none());
    }
}
