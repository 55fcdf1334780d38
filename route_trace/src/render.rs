use geom::ScreenPt;

use crate::{ArrowAnnotator, ArrowWings, Projector, TraceStore};

/// One stroke, ready to draw in the current view.
#[derive(Clone, Debug, PartialEq)]
pub struct SegmentOverlay {
    pub polyline: Vec<ScreenPt>,
    /// At the end of the stroke. None for strokes without a direction.
    pub arrow: Option<ArrowWings>,
}

/// The in-progress trace in screen space, recomputed for every frame from whatever projector is
/// current.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TraceOverlay {
    pub segments: Vec<SegmentOverlay>,
}

impl TraceOverlay {
    pub fn new(
        store: &TraceStore,
        projector: &dyn Projector,
        arrows: &ArrowAnnotator,
    ) -> TraceOverlay {
        let segments = store
            .to_screen_space(projector)
            .into_iter()
            .map(|polyline| {
                let arrow = arrows.wings_at_end(&polyline);
                SegmentOverlay { polyline, arrow }
            })
            .collect();
        TraceOverlay { segments }
    }

    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }
}
