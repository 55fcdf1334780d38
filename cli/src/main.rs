//! A collection of tools for capturing and measuring hand-drawn routes, bundled as a single
//! executable.

#[macro_use]
extern crate anyhow;
#[macro_use]
extern crate log;

mod replay;

use anyhow::Result;
use structopt::StructOpt;

use geom::{GPSBounds, GeoPoint, ScreenPt};
use osm_ways::{is_no_network, FetchOptions, OverpassFetcher};
use route_trace::{ArrowAnnotator, ArrowConfig, MeasuredRoute, Trace, TraceConfig, Way};

#[derive(StructOpt)]
#[structopt(name = "trailtrace", about = "Measure routes drawn by hand on a map")]
enum Command {
    /// Feeds a recorded log of touch events through a drawing session and prints every measured
    /// route
    Replay {
        /// The path to a JSON touch log
        #[structopt()]
        input: String,
        /// The path to a JSON config file. Defaults are used for anything missing.
        #[structopt(long)]
        config: Option<String>,
        /// Write the last measured route as GeoJSON here
        #[structopt(long)]
        geojson: Option<String>,
    },
    /// Prints the great-circle distance between two points
    Distance {
        /// Latitude and longitude, like "42.3601,-71.0589"
        #[structopt(long, parse(try_from_str = parse_pt), allow_hyphen_values = true)]
        from: GeoPoint,
        #[structopt(long, parse(try_from_str = parse_pt), allow_hyphen_values = true)]
        to: GeoPoint,
        /// A fraction to add on top, like 0.1 for 10%
        #[structopt(long, default_value = "0")]
        padding: f64,
    },
    /// Prints the arrowhead drawn at the end of a stroke
    Arrow {
        /// The pixel the stroke ends at, like "540,960"
        #[structopt(long, parse(try_from_str = parse_pixel), allow_hyphen_values = true)]
        tip: ScreenPt,
        /// The pixel just before that
        #[structopt(long, parse(try_from_str = parse_pixel), allow_hyphen_values = true)]
        prior: ScreenPt,
        /// Size the arrowhead for a display this large, like "1080x1920". Otherwise, use the
        /// default size.
        #[structopt(long, parse(try_from_str = parse_display))]
        display: Option<(u32, u32)>,
    },
    /// Downloads the ways in a bounding box from Overpass
    FetchWays {
        #[structopt(long, allow_hyphen_values = true)]
        south: f64,
        #[structopt(long, allow_hyphen_values = true)]
        west: f64,
        #[structopt(long, allow_hyphen_values = true)]
        north: f64,
        #[structopt(long, allow_hyphen_values = true)]
        east: f64,
        /// The Overpass API endpoint
        #[structopt(long)]
        endpoint: Option<String>,
        /// Write the ways as JSON here
        #[structopt(long)]
        output: Option<String>,
    },
    /// Reads the ways from a saved .osm XML file
    ParseWays {
        #[structopt()]
        path: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    traceutil::logger::setup();

    match Command::from_args() {
        Command::Replay {
            input,
            config,
            geojson,
        } => {
            let config = match config {
                Some(path) => TraceConfig::load(&path)?,
                None => TraceConfig::default(),
            };
            replay::run(&input, config, geojson)?;
        }
        Command::Distance { from, to, padding } => {
            let route = MeasuredRoute::new(Trace::from_segments(vec![vec![from, to]]));
            println!(
                "{} ({})",
                route.label(padding),
                route.padded_distance(padding)
            );
        }
        Command::Arrow {
            tip,
            prior,
            display,
        } => {
            let config = match display {
                Some((width, height)) => ArrowConfig::for_display(width, height),
                None => ArrowConfig::default(),
            };
            let annotator = ArrowAnnotator::new(config);
            match annotator.wings_for(tip, prior) {
                Some(wings) => {
                    println!(
                        "Arrowhead of size {} at {}",
                        annotator.config().size_px,
                        wings.tip
                    );
                    for (from, to) in wings.lines() {
                        println!("  {} -> {}", from, to);
                    }
                }
                None => println!("{} and {} are the same point; no direction", tip, prior),
            }
        }
        Command::FetchWays {
            south,
            west,
            north,
            east,
            endpoint,
            output,
        } => {
            let mut bounds = GPSBounds::new();
            bounds.update(GeoPoint::new(south, west)?);
            bounds.update(GeoPoint::new(north, east)?);
            let mut opts = FetchOptions::default();
            if let Some(endpoint) = endpoint {
                opts.endpoint = endpoint;
            }
            fetch_ways(opts, bounds, output).await?
        }
        Command::ParseWays { path } => {
            let ways = osm_ways::read_ways_file(&path)?;
            print_ways(&ways);
        }
    }
    Ok(())
}

async fn fetch_ways(opts: FetchOptions, bounds: GPSBounds, output: Option<String>) -> Result<()> {
    let fetcher = OverpassFetcher::new(opts)?;
    match fetcher.fetch(&bounds).await {
        Ok(ways) => {
            print_ways(&ways);
            if let Some(path) = output {
                traceutil::write_json(&path, &ways)?;
                println!("Wrote {}", path);
            }
            Ok(())
        }
        Err(err) => {
            if is_no_network(&err) {
                error!("Couldn't reach the network. Check the connection and try again.");
            }
            Err(err)
        }
    }
}

fn print_ways(ways: &[Way]) {
    println!("{}", traceutil::plural(ways.len(), "way"));
    for way in ways {
        let kind = way
            .tags
            .get("highway")
            .map(|x| x.as_str())
            .unwrap_or("untagged");
        println!(
            "  {} ({}): {}",
            way.id,
            kind,
            traceutil::plural(way.nodes.len(), "node")
        );
    }
}

fn parse_pt(raw: &str) -> Result<GeoPoint> {
    let (lat, lon) = split_pair(raw)?;
    GeoPoint::new(lat.parse()?, lon.parse()?)
}

fn parse_pixel(raw: &str) -> Result<ScreenPt> {
    let (x, y) = split_pair(raw)?;
    Ok(ScreenPt::new(x.parse()?, y.parse()?))
}

fn parse_display(raw: &str) -> Result<(u32, u32)> {
    match raw.split_once('x') {
        Some((width, height)) => Ok((width.trim().parse()?, height.trim().parse()?)),
        None => bail!("{} should look like 1080x1920", raw),
    }
}

fn split_pair(raw: &str) -> Result<(&str, &str)> {
    match raw.split_once(',') {
        Some((a, b)) => Ok((a.trim(), b.trim())),
        None => bail!("{} should be two comma-separated numbers", raw),
    }
}
