//! Network loaders: a CSV node/link pair or a MATSim `network.xml(.gz)`.
//!
//! # MATSim XML
//!
//! Streamed element by element.  Only `<node>` and `<link>` are read; their
//! attributes map onto the CSV columns below (`length` → `length_m`,
//! `from`/`to` → `from_node`/`to_node`).
//!
//! ```xml
//! <network>
//!   <nodes>
//!     <node id="n1" x="651200.5" y="6862010.0"/>
//!   </nodes>
//!   <links capperiod="01:00:00">
//!     <link id="L1" from="n1" to="n2" length="500.0" freespeed="13.89"
//!           capacity="1800.0" permlanes="1.0" modes="car,bike"/>
//!   </links>
//! </network>
//! ```
//!
//! # CSV format
//!
//! Two files, one per entity.  Nodes carry projected coordinates:
//!
//! ```csv
//! node_id,x,y
//! n1,651200.5,6862010.0
//! n2,651700.5,6862010.0
//! ```
//!
//! Links carry endpoints and length; `freespeed`, `capacity` and `modes` may
//! be left empty.  `modes` is a comma-separated list and must be quoted when
//! it holds more than one entry:
//!
//! ```csv
//! link_id,from_node,to_node,length_m,freespeed,capacity,modes
//! L1,n1,n2,500.0,13.89,1800,"car,bike"
//! L2,n2,n1,500.0,,,
//! ```
//!
//! Negative or non-finite lengths are rejected: they would let a reconstructed
//! trip accumulate negative distance.

use std::io::{BufRead, Read};
use std::path::Path;

use quick_xml::events::{BytesStart, Event as XmlEvent};
use quick_xml::Reader;
use serde::Deserialize;

use tt_core::{Coord, LinkId, NodeId, open_input};

use crate::topology::{Link, Topology, TopologyBuilder};
use crate::{NetworkError, NetworkResult};

// ── CSV records ───────────────────────────────────────────────────────────────

#[derive(Deserialize)]
struct NodeRecord {
    node_id: String,
    x:       f64,
    y:       f64,
}

#[derive(Deserialize)]
struct LinkRecord {
    link_id:   String,
    from_node: String,
    to_node:   String,
    length_m:  f64,
    #[serde(default)]
    freespeed: Option<f64>,
    #[serde(default)]
    capacity:  Option<f64>,
    #[serde(default)]
    modes:     Option<String>,
}

// ── Public API ────────────────────────────────────────────────────────────────

/// Load a [`Topology`] from a `links.csv` / `nodes.csv` pair.
pub fn load_topology_csv(links_path: &Path, nodes_path: &Path) -> NetworkResult<Topology> {
    let links = open_input(links_path)?;
    let nodes = open_input(nodes_path)?;
    load_topology_readers(links, nodes)
}

/// Like [`load_topology_csv`] but accepts any `Read` sources.
///
/// Useful for testing (pass a `std::io::Cursor`).
pub fn load_topology_readers<L: Read, N: Read>(links: L, nodes: N) -> NetworkResult<Topology> {
    let mut builder = TopologyBuilder::new();

    let mut node_reader = csv::Reader::from_reader(nodes);
    for result in node_reader.deserialize::<NodeRecord>() {
        let row = result?;
        builder.add_node(NodeId(row.node_id), Coord::new(row.x, row.y));
    }

    let mut link_reader = csv::Reader::from_reader(links);
    for result in link_reader.deserialize::<LinkRecord>() {
        let row = result?;
        builder.add_link(link_from_record(row)?);
    }

    Ok(finish(builder))
}

/// Load a [`Topology`] from a MATSim network file (`.xml` or `.xml.gz`).
pub fn load_network_xml(path: &Path) -> NetworkResult<Topology> {
    load_network_xml_reader(open_input(path)?)
}

/// Like [`load_network_xml`] but accepts any `BufRead` source.
pub fn load_network_xml_reader<R: BufRead>(reader: R) -> NetworkResult<Topology> {
    let mut reader = Reader::from_reader(reader);
    let mut buf = Vec::new();
    let mut builder = TopologyBuilder::new();

    loop {
        buf.clear();
        match reader.read_event_into(&mut buf)? {
            XmlEvent::Empty(e) | XmlEvent::Start(e) => match e.name().as_ref() {
                b"node" => {
                    let row = node_from_element(&e)?;
                    builder.add_node(NodeId(row.node_id), Coord::new(row.x, row.y));
                }
                b"link" => builder.add_link(link_from_record(link_record_from_element(&e)?)?),
                _ => {}
            },
            XmlEvent::Eof => break,
            _ => {}
        }
    }

    Ok(finish(builder))
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn finish(builder: TopologyBuilder) -> Topology {
    let topology = builder.build();
    tracing::info!(
        nodes = topology.node_count(),
        links = topology.link_count(),
        "network loaded"
    );
    topology
}

fn node_from_element(e: &BytesStart<'_>) -> NetworkResult<NodeRecord> {
    Ok(NodeRecord {
        node_id: required(e, "node", "id")?,
        x:       number(e, "node", "x")?.ok_or_else(|| missing("node", "x"))?,
        y:       number(e, "node", "y")?.ok_or_else(|| missing("node", "y"))?,
    })
}

fn link_record_from_element(e: &BytesStart<'_>) -> NetworkResult<LinkRecord> {
    Ok(LinkRecord {
        link_id:   required(e, "link", "id")?,
        from_node: required(e, "link", "from")?,
        to_node:   required(e, "link", "to")?,
        length_m:  number(e, "link", "length")?.ok_or_else(|| missing("link", "length"))?,
        freespeed: number(e, "link", "freespeed")?,
        capacity:  number(e, "link", "capacity")?,
        modes:     attribute(e, "modes")?,
    })
}

fn attribute(e: &BytesStart<'_>, name: &str) -> NetworkResult<Option<String>> {
    let Some(attr) = e.try_get_attribute(name).map_err(quick_xml::Error::from)? else {
        return Ok(None);
    };
    Ok(Some(attr.unescape_value()?.into_owned()))
}

fn required(e: &BytesStart<'_>, element: &'static str, name: &'static str) -> NetworkResult<String> {
    attribute(e, name)?.ok_or_else(|| missing(element, name))
}

fn number(e: &BytesStart<'_>, element: &'static str, name: &'static str) -> NetworkResult<Option<f64>> {
    attribute(e, name)?
        .map(|value| {
            value.trim().parse::<f64>().map_err(|_| NetworkError::InvalidNumber {
                element,
                attribute: name,
                value,
            })
        })
        .transpose()
}

fn missing(element: &'static str, attribute: &'static str) -> NetworkError {
    NetworkError::MissingAttribute { element, attribute }
}

fn link_from_record(row: LinkRecord) -> NetworkResult<Link> {
    if !row.length_m.is_finite() || row.length_m < 0.0 {
        return Err(NetworkError::InvalidLength { link: row.link_id, length_m: row.length_m });
    }
    let modes = row
        .modes
        .as_deref()
        .map(parse_modes)
        .unwrap_or_default();

    Ok(Link {
        id:           LinkId(row.link_id),
        from:         NodeId(row.from_node),
        to:           NodeId(row.to_node),
        length_m:     row.length_m,
        freespeed_ms: row.freespeed.unwrap_or(0.0),
        capacity:     row.capacity.unwrap_or(0.0),
        modes,
    })
}

fn parse_modes(s: &str) -> Vec<String> {
    s.split(',')
        .map(str::trim)
        .filter(|m| !m.is_empty())
        .map(str::to_owned)
        .collect()
}
