//! Finds the OSM ways near a drawn route, for snapping it to real streets. Ways come from the
//! Overpass API as OSM XML.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod fetcher;
mod query;
mod reader;

pub use self::fetcher::{spawn_fetch, OverpassFetcher};
pub use self::query::{overpass_query, FetchOptions};
pub use self::reader::{read_ways, read_ways_file};
pub use route_trace::{is_no_network, NoNetwork};
