//! The core of turning a finger-drawn path on a map into a measured route.
//!
//! Touches arrive in screen pixels, but they're immediately converted to geographic coordinates
//! through whatever [`Projector`] describes the map right now. Everything is stored
//! geographically, so the trace survives panning, zooming, and rotation; screen coordinates are
//! only ever derived on demand. When the user asks to measure, the junctions between strokes are
//! smoothed, and the length of each stroke is summed with the haversine formula.
//!
//! Nothing here talks to the network. Snapping to nearby OSM ways goes through the narrow
//! [`WayFetcher`] interface, and results are marshaled back through a [`PendingFetch`] stamped
//! with the drawing session that asked for them.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod arrow;
mod config;
mod measure;
mod projector;
mod render;
mod route;
mod session;
mod smoother;
mod snap;
mod store;
mod view;

pub use crate::arrow::{ArrowAnnotator, ArrowWings};
pub use crate::config::{ArrowConfig, NoNetworkChoice, NoNetworkPolicy, TraceConfig, ZoomConfig};
pub use crate::measure::measure;
pub use crate::projector::{MercatorProjector, Projector, TILE_SIZE_PX};
pub use crate::render::{SegmentOverlay, TraceOverlay};
pub use crate::route::MeasuredRoute;
pub use crate::session::{DrawState, DrawingSession, SessionStamp};
pub use crate::smoother::smooth_junctions;
pub use crate::snap::{
    is_no_network, FetchPoll, FetchSender, NoNetwork, NodeID, PendingFetch, Way, WayFetcher,
    WayFuture, WayID,
};
pub use crate::store::{Segment, Trace, TraceStore};
pub use crate::view::{LocationSource, ViewState};
