//! Odds and ends shared by the route tracing crates: logging setup, JSON file IO, OSM tags, and
//! formatting helpers.

mod io;
pub mod logger;
mod tags;
mod utils;

pub use crate::io::{from_json, read_json, to_json, write_json};
pub use crate::tags::Tags;
pub use crate::utils::{plural, prettyprint_usize};
