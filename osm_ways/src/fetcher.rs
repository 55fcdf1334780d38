use std::sync::Arc;

use anyhow::{Context, Result};

use geom::GPSBounds;
use route_trace::{FetchSender, NoNetwork, Way, WayFetcher, WayFuture};
use traceutil::prettyprint_usize;

use crate::{overpass_query, read_ways, FetchOptions};

/// Asks an Overpass server for ways. This must be used with a tokio runtime somewhere.
#[derive(Clone)]
pub struct OverpassFetcher {
    client: reqwest::Client,
    opts: FetchOptions,
}

impl OverpassFetcher {
    pub fn new(opts: FetchOptions) -> Result<OverpassFetcher> {
        let client = reqwest::Client::builder()
            .connect_timeout(opts.connect_timeout())
            .build()
            .context("building HTTP client")?;
        Ok(OverpassFetcher { client, opts })
    }

    pub fn options(&self) -> &FetchOptions {
        &self.opts
    }

    pub async fn fetch(&self, bounds: &GPSBounds) -> Result<Vec<Way>> {
        let query = overpass_query(bounds, &self.opts.way_filter);
        info!("Asking {} for {}", self.opts.endpoint, query);
        let bytes = self.download(query).await?;
        let raw = String::from_utf8(bytes).context("Overpass returned non-UTF8")?;
        let ways = read_ways(&raw)?;
        info!("Got {} from Overpass", traceutil::plural(ways.len(), "way"));
        Ok(ways)
    }

    async fn download(&self, query: String) -> Result<Vec<u8>> {
        let url = &self.opts.endpoint;
        let read_timeout = self.opts.read_timeout();

        let request = self.client.post(url).form(&[("data", query)]).send();
        let mut resp = tokio::time::timeout(read_timeout, request)
            .await
            .map_err(|_| stalled(url, read_timeout))?
            .map_err(|err| classify(err, url))?;
        resp.error_for_status_ref()
            .with_context(|| format!("downloading {}", url))?;

        let mut bytes = Vec::new();
        loop {
            let chunk = tokio::time::timeout(read_timeout, resp.chunk())
                .await
                .map_err(|_| stalled(url, read_timeout))?
                .map_err(|err| classify(err, url))?;
            match chunk {
                Some(chunk) => bytes.extend_from_slice(&chunk),
                None => break,
            }
        }
        debug!(
            "Downloaded {} bytes from {}",
            prettyprint_usize(bytes.len()),
            url
        );
        Ok(bytes)
    }
}

impl WayFetcher for OverpassFetcher {
    fn fetch_ways(&self, bounds: &GPSBounds) -> WayFuture {
        let fetcher = self.clone();
        let bounds = bounds.clone();
        Box::pin(async move { fetcher.fetch(&bounds).await })
    }
}

/// Runs the fetch in the background. The result comes back through the session's
/// `PendingFetch`. This must be called with a tokio runtime somewhere.
pub fn spawn_fetch(
    fetcher: Arc<dyn WayFetcher>,
    sender: FetchSender,
) -> tokio::task::JoinHandle<()> {
    debug!("Fetching ways for {} in the background", sender.stamp());
    tokio::spawn(async move { sender.run(fetcher.as_ref()).await })
}

// Not reaching the server at all is a network problem the user might fix. Anything else, like
// the server rejecting the query, isn't.
fn classify(err: reqwest::Error, url: &str) -> anyhow::Error {
    if err.is_connect() || err.is_timeout() {
        anyhow::Error::new(NoNetwork {
            reason: err.to_string(),
        })
        .context(format!("downloading {}", url))
    } else {
        anyhow::Error::new(err).context(format!("downloading {}", url))
    }
}

fn stalled(url: &str, timeout: std::time::Duration) -> anyhow::Error {
    anyhow::Error::new(NoNetwork {
        reason: format!("nothing received for {:?}", timeout),
    })
    .context(format!("downloading {}", url))
}
