use std::fmt;

use anyhow::Result;

use geom::{GeoPoint, ScreenPt};

use crate::snap::new_fetch;
use crate::{
    smooth_junctions, ArrowAnnotator, ArrowWings, FetchPoll, FetchSender, MeasuredRoute,
    NoNetworkChoice, PendingFetch, Projector, TraceConfig, TraceStore, ViewState, Way,
};

/// Identifies one drawing session. Increases every time drawing starts from scratch, and when
/// the trace is erased.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SessionStamp(pub u64);

impl fmt::Display for SessionStamp {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "drawing session {}", self.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DrawState {
    /// Nothing being drawn. The next touch starts a new session.
    Idle,
    /// A finger is down.
    Drawing,
    /// Between strokes. The next touch starts another segment of the same trace.
    SegmentClosed,
}

/// Everything about drawing a route, owned by the single context that handles input. Nothing
/// here locks; background work only reaches in through `poll_fetch`.
pub struct DrawingSession {
    config: TraceConfig,
    store: TraceStore,
    view: ViewState,
    arrows: ArrowAnnotator,
    state: DrawState,
    stamp: SessionStamp,
    last_route: Option<MeasuredRoute>,
    nearby_ways: Vec<Way>,
}

impl DrawingSession {
    pub fn new(config: TraceConfig) -> DrawingSession {
        let view = ViewState::new(&config.zoom);
        DrawingSession::with_view(config, view)
    }

    /// Resumes with a view restored by the host.
    pub fn with_view(config: TraceConfig, view: ViewState) -> DrawingSession {
        let arrows = ArrowAnnotator::new(config.arrow.clone());
        DrawingSession {
            config,
            store: TraceStore::new(),
            view,
            arrows,
            state: DrawState::Idle,
            stamp: SessionStamp::default(),
            last_route: None,
            nearby_ways: Vec::new(),
        }
    }

    pub fn config(&self) -> &TraceConfig {
        &self.config
    }

    pub fn state(&self) -> DrawState {
        self.state
    }

    pub fn stamp(&self) -> SessionStamp {
        self.stamp
    }

    pub fn store(&self) -> &TraceStore {
        &self.store
    }

    pub fn view(&self) -> &ViewState {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut ViewState {
        &mut self.view
    }

    pub fn arrows(&self) -> &ArrowAnnotator {
        &self.arrows
    }

    /// One event from the touch source. Outside of a stroke, every touch starts a new segment,
    /// even if the touch-down itself was lost.
    pub fn touch(
        &mut self,
        pixel: ScreenPt,
        is_segment_start: bool,
        projector: &dyn Projector,
    ) -> Result<()> {
        let starts_segment = is_segment_start || self.state != DrawState::Drawing;
        self.store.touch(pixel, starts_segment, projector)?;

        if self.state == DrawState::Idle {
            self.stamp = SessionStamp(self.stamp.0 + 1);
            debug!("Starting {}", self.stamp);
        }
        if self.state != DrawState::Drawing {
            debug!("Touch down at {}, {:?} -> Drawing", pixel, self.state);
        }
        self.state = DrawState::Drawing;
        Ok(())
    }

    /// The finger lifted. Returns the arrowhead to draw at the end of the stroke, if the stroke
    /// has a direction.
    pub fn touch_up(&mut self, projector: &dyn Projector) -> Option<ArrowWings> {
        if self.state != DrawState::Drawing {
            return None;
        }
        debug!("Touch up, Drawing -> SegmentClosed");
        self.state = DrawState::SegmentClosed;
        let (prior, tip) = self.store.last_two_screen_points(projector)?;
        self.arrows.wings_for(tip, prior)
    }

    /// Smooths the junctions in the trace, then measures it. The result replaces any previous
    /// route. Depending on config, the raw trace is either consumed or kept for more drawing.
    pub fn measure(&mut self) -> &MeasuredRoute {
        smooth_junctions(self.store.trace_mut(), self.config.min_junction_angle());
        let route = MeasuredRoute::new(self.store.as_geographic().clone());
        info!(
            "Measured {} points in {} segments: {}",
            route.trace().num_points(),
            route.trace().segments().len(),
            route.label(self.config.distance_padding)
        );

        if self.config.clear_trace_on_measure {
            self.store.forget();
        }
        self.state = DrawState::Idle;
        self.last_route.insert(route)
    }

    /// Throws away the trace, no matter what state things are in. Ways found near it are dropped,
    /// and fetches still in flight for it will come back stale.
    pub fn erase(&mut self) {
        debug!("Erasing {}, {:?} -> Idle", self.stamp, self.state);
        self.store.forget();
        self.nearby_ways.clear();
        self.stamp = SessionStamp(self.stamp.0 + 1);
        self.state = DrawState::Idle;
    }

    pub fn last_measured_route(&self) -> Option<&MeasuredRoute> {
        self.last_route.as_ref()
    }

    /// The label for the last measured route, with the configured padding.
    pub fn last_route_label(&self) -> Option<String> {
        self.last_route
            .as_ref()
            .map(|route| route.label(self.config.distance_padding))
    }

    pub fn forget_last_measured_route(&mut self) {
        self.last_route = None;
    }

    /// Drops the previous measurement and re-centers the view on wherever drawing last left off.
    /// Returns that spot, if there is one.
    pub fn open_draw_mode(&mut self) -> Option<GeoPoint> {
        self.view.set_draw_mode_open(true);
        self.forget_last_measured_route();
        let spot = self.store.last_draw_spot()?;
        self.view.set_map_center(spot);
        Some(spot)
    }

    pub fn close_draw_mode(&mut self) {
        self.view.set_draw_mode_open(false);
    }

    /// Starts fetching the ways around the current trace, padded by some degrees. None if there's
    /// nothing drawn. The sender half goes to whatever runs in the background.
    pub fn start_fetch(&self, padding_degrees: f64) -> Option<(PendingFetch, FetchSender)> {
        let bounds = self.store.as_geographic().bounds()?.padded(padding_degrees);
        Some(new_fetch(self.stamp, bounds))
    }

    /// Checks on a fetch. Results from an older drawing session are thrown away.
    pub fn poll_fetch(&mut self, pending: &mut PendingFetch) -> FetchPoll {
        let result = match pending.try_recv() {
            Ok(None) => {
                return FetchPoll::Pending;
            }
            Ok(Some(result)) => result,
            Err(err) => {
                return FetchPoll::Failed(err);
            }
        };

        if pending.stamp() != self.stamp {
            warn!(
                "Discarding ways fetched for {}; now on {}",
                pending.stamp(),
                self.stamp
            );
            return FetchPoll::Stale;
        }
        match result {
            Ok(ways) => {
                info!(
                    "Found {} near the trace",
                    traceutil::plural(ways.len(), "way")
                );
                let n = ways.len();
                self.nearby_ways = ways;
                FetchPoll::Applied(n)
            }
            Err(err) => FetchPoll::Failed(err),
        }
    }

    pub fn nearby_ways(&self) -> &Vec<Way> {
        &self.nearby_ways
    }

    /// If a failed fetch was for lack of a network, what the user should be offered.
    pub fn no_network_choices(&self, err: &anyhow::Error) -> Option<Vec<NoNetworkChoice>> {
        if crate::is_no_network(err) {
            Some(self.config.no_network.choices())
        } else {
            None
        }
    }
}
