use std::collections::{BTreeMap, BTreeSet};
use std::str::FromStr;

use anyhow::{Context, Result};

use geom::GeoPoint;
use route_trace::{NodeID, Way, WayID};
use traceutil::{prettyprint_usize, Tags};

// References to missing nodes are just filtered out, and ways left with no nodes at all are
// dropped. Overpass lists nodes before ways, but that isn't relied on.

/// Reads every way out of an OSM XML document, in order of ID.
pub fn read_ways(raw: &str) -> Result<Vec<Way>> {
    let tree = roxmltree::Document::parse(raw).context("parsing OSM XML")?;

    let mut nodes: BTreeMap<NodeID, GeoPoint> = BTreeMap::new();
    for obj in elements(&tree, "node") {
        let id = NodeID(parse_attr(obj, "id")?);
        if nodes.contains_key(&id) {
            bail!("Duplicate {}, the OSM XML is corrupt", id);
        }
        let pt = GeoPoint::new(parse_attr(obj, "lat")?, parse_attr(obj, "lon")?)
            .with_context(|| format!("{} has bad coordinates", id))?;
        nodes.insert(id, pt);
    }

    let mut ways: BTreeMap<WayID, Way> = BTreeMap::new();
    let mut seen_ways = BTreeSet::new();
    let mut dropped = 0;
    for obj in elements(&tree, "way") {
        let id = WayID(parse_attr(obj, "id")?);
        if !seen_ways.insert(id) {
            bail!("Duplicate {}, the OSM XML is corrupt", id);
        }

        let mut way_nodes = Vec::new();
        let mut pts = Vec::new();
        for child in obj.children() {
            if child.tag_name().name() == "nd" {
                let n = NodeID(parse_attr(child, "ref")?);
                // Just skip missing nodes
                if let Some(pt) = nodes.get(&n) {
                    way_nodes.push(n);
                    pts.push(*pt);
                }
            }
        }
        if way_nodes.is_empty() {
            dropped += 1;
            continue;
        }
        ways.insert(
            id,
            Way {
                id,
                nodes: way_nodes,
                pts,
                tags: read_tags(obj),
            },
        );
    }

    debug!(
        "Found {} nodes and {} ways",
        prettyprint_usize(nodes.len()),
        prettyprint_usize(ways.len())
    );
    if dropped > 0 {
        warn!("Dropped {} with no known nodes", traceutil::plural(dropped, "way"));
    }
    Ok(ways.into_values().collect())
}

/// Like `read_ways`, for a saved .osm file.
pub fn read_ways_file(path: &str) -> Result<Vec<Way>> {
    let raw = fs_err::read_to_string(path)?;
    read_ways(&raw).with_context(|| format!("reading {}", path))
}

fn elements<'a, 'input>(
    tree: &'a roxmltree::Document<'input>,
    name: &'static str,
) -> impl Iterator<Item = roxmltree::Node<'a, 'input>> {
    tree.descendants()
        .filter(move |obj| obj.is_element() && obj.tag_name().name() == name)
}

fn parse_attr<T>(obj: roxmltree::Node, key: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    let raw = obj
        .attribute(key)
        .ok_or_else(|| anyhow!("<{}> is missing {}", obj.tag_name().name(), key))?;
    raw.parse::<T>()
        .with_context(|| format!("<{}> has bad {}=\"{}\"", obj.tag_name().name(), key, raw))
}

fn read_tags(obj: roxmltree::Node) -> Tags {
    let mut tags = Tags::empty();
    for child in obj.children() {
        if child.tag_name().name() == "tag" {
            if let (Some(k), Some(v)) = (child.attribute("k"), child.attribute("v")) {
                tags.insert(k, v);
            }
        }
    }
    tags
}
