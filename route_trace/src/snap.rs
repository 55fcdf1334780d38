use std::fmt;
use std::future::Future;
use std::pin::Pin;

use anyhow::Result;
use futures_channel::oneshot;
use serde::{Deserialize, Serialize};

use geom::{GPSBounds, GeoPoint};
use traceutil::Tags;

use crate::SessionStamp;

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct WayID(pub i64);

impl fmt::Display for WayID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/way/{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct NodeID(pub i64);

impl fmt::Display for NodeID {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "https://www.openstreetmap.org/node/{}", self.0)
    }
}

/// An OSM way near the trace, something a route could be snapped to.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Way {
    pub id: WayID,
    pub nodes: Vec<NodeID>,
    /// Matches `nodes`
    pub pts: Vec<GeoPoint>,
    pub tags: Tags,
}

pub type WayFuture = Pin<Box<dyn Future<Output = Result<Vec<Way>>> + Send>>;

/// Looks up the ways inside a bounding box. The real implementation goes over the network, so it
/// must never run on the context that owns the drawing session.
pub trait WayFetcher: Send + Sync {
    fn fetch_ways(&self, bounds: &GPSBounds) -> WayFuture;
}

/// The network wasn't reachable, as opposed to the server returning something bad. The user
/// should be offered a chance to retry.
#[derive(Debug)]
pub struct NoNetwork {
    pub reason: String,
}

impl fmt::Display for NoNetwork {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "no network: {}", self.reason)
    }
}

impl std::error::Error for NoNetwork {}

/// Looks through the whole chain of context.
pub fn is_no_network(err: &anyhow::Error) -> bool {
    err.chain().any(|e| e.is::<NoNetwork>())
}

/// The owner's end of a fetch in flight. Poll it through the session that started it until the
/// answer is something other than `Pending`, then drop it.
pub struct PendingFetch {
    stamp: SessionStamp,
    bounds: GPSBounds,
    rx: oneshot::Receiver<Result<Vec<Way>>>,
}

/// The background end of a fetch in flight.
pub struct FetchSender {
    stamp: SessionStamp,
    bounds: GPSBounds,
    tx: oneshot::Sender<Result<Vec<Way>>>,
}

/// What happened to a fetch since the last poll.
#[derive(Debug)]
pub enum FetchPoll {
    Pending,
    /// A new drawing session began after this fetch started, so its result was thrown away.
    Stale,
    /// The result was stored as the session's nearby ways. This many.
    Applied(usize),
    Failed(anyhow::Error),
}

pub(crate) fn new_fetch(stamp: SessionStamp, bounds: GPSBounds) -> (PendingFetch, FetchSender) {
    let (tx, rx) = oneshot::channel();
    (
        PendingFetch {
            stamp,
            bounds: bounds.clone(),
            rx,
        },
        FetchSender { stamp, bounds, tx },
    )
}

impl PendingFetch {
    pub fn stamp(&self) -> SessionStamp {
        self.stamp
    }

    pub fn bounds(&self) -> &GPSBounds {
        &self.bounds
    }

    /// None while the fetch is still running. An error means the sender was dropped without
    /// answering, or this was already polled to completion.
    pub(crate) fn try_recv(&mut self) -> Result<Option<Result<Vec<Way>>>> {
        match self.rx.try_recv() {
            Ok(x) => Ok(x),
            Err(oneshot::Canceled) => {
                bail!("fetch for {} ended without an answer", self.stamp)
            }
        }
    }
}

impl FetchSender {
    pub fn stamp(&self) -> SessionStamp {
        self.stamp
    }

    pub fn bounds(&self) -> &GPSBounds {
        &self.bounds
    }

    pub fn send(self, result: Result<Vec<Way>>) {
        if self.tx.send(result).is_err() {
            debug!("Nobody is waiting on the fetch for {} anymore", self.stamp);
        }
    }

    /// Runs the fetch to completion and passes along whatever it produced.
    pub async fn run(self, fetcher: &dyn WayFetcher) {
        let result = fetcher.fetch_ways(&self.bounds).await;
        self.send(result);
    }
}
