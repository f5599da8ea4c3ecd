//! Topology representation, lookup traits, and builder.
//!
//! # Data layout
//!
//! Simulation networks key links and nodes by arbitrary strings, so the
//! topology is two hash maps rather than a dense CSR graph:
//!
//! ```text
//! links: LinkId → Link { from, to, length_m, … }
//! nodes: NodeId → Coord
//! ```
//!
//! Both lookups are O(1).  The event reducer queries `length` once per
//! link-traversal event, which dominates the runtime on large logs.

use std::collections::HashMap;

use tt_core::{Coord, LinkId, NodeId};

// ── Lookup traits ─────────────────────────────────────────────────────────────

/// Link-length lookup, the only topology access the event reducer needs.
pub trait LinkLengths {
    /// Length of `link` in metres, or `None` if the link is unknown.
    fn length(&self, link: &str) -> Option<f64>;
}

/// Full read-only topology access used by the activity matcher.
pub trait TopologyLookup: LinkLengths {
    /// `(from_node, to_node)` of `link`.
    fn endpoints(&self, link: &str) -> Option<(&NodeId, &NodeId)>;

    /// Projected coordinates of `node`.
    fn coordinates(&self, node: &str) -> Option<Coord>;

    /// Coordinates of the node at the downstream end of `link`.
    ///
    /// A vehicle parked on a link is placed at its `to_node`.
    fn to_node_coordinates(&self, link: &str) -> Option<Coord> {
        let (_, to) = self.endpoints(link)?;
        self.coordinates(to.as_str())
    }
}

impl LinkLengths for HashMap<LinkId, f64> {
    #[inline]
    fn length(&self, link: &str) -> Option<f64> {
        self.get(link).copied()
    }
}

// ── Link ──────────────────────────────────────────────────────────────────────

/// One directed network link.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Link {
    pub id:        LinkId,
    pub from:      NodeId,
    pub to:        NodeId,
    /// Physical length in metres.  Always finite and ≥ 0.
    pub length_m:  f64,
    /// Free-flow speed in m/s (0 when absent from the source).
    pub freespeed_ms: f64,
    /// Vehicles per hour (0 when absent from the source).
    pub capacity:  f64,
    /// Allowed modes, e.g. `["car", "bike"]`.
    pub modes:     Vec<String>,
}

impl Link {
    /// Minimal link with no speed, capacity, or mode metadata.
    pub fn new(id: LinkId, from: NodeId, to: NodeId, length_m: f64) -> Self {
        Self {
            id,
            from,
            to,
            length_m,
            freespeed_ms: 0.0,
            capacity:     0.0,
            modes:        Vec::new(),
        }
    }

    /// `true` if `mode` is listed in the link's allowed modes.
    pub fn allows(&self, mode: &str) -> bool {
        self.modes.iter().any(|m| m == mode)
    }
}

// ── Topology ──────────────────────────────────────────────────────────────────

/// Immutable network snapshot.  Construct with [`TopologyBuilder`] or the
/// CSV loader.
#[derive(Clone, Debug, Default)]
pub struct Topology {
    links: HashMap<LinkId, Link>,
    nodes: HashMap<NodeId, Coord>,
}

impl Topology {
    /// A topology with no links or nodes.  Every lookup returns `None`.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn link_count(&self) -> usize {
        self.links.len()
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.links.is_empty() && self.nodes.is_empty()
    }

    /// Full link record, including speed/capacity/mode metadata.
    pub fn link(&self, id: &str) -> Option<&Link> {
        self.links.get(id)
    }
}

impl LinkLengths for Topology {
    #[inline]
    fn length(&self, link: &str) -> Option<f64> {
        self.links.get(link).map(|l| l.length_m)
    }
}

impl TopologyLookup for Topology {
    #[inline]
    fn endpoints(&self, link: &str) -> Option<(&NodeId, &NodeId)> {
        self.links.get(link).map(|l| (&l.from, &l.to))
    }

    #[inline]
    fn coordinates(&self, node: &str) -> Option<Coord> {
        self.nodes.get(node).copied()
    }
}

// ── TopologyBuilder ───────────────────────────────────────────────────────────

/// Construct a [`Topology`] incrementally, then call [`build`](Self::build).
///
/// Links may reference nodes that are never added; such links still resolve
/// lengths and endpoints but not coordinates.
///
/// # Example
///
/// ```
/// use tt_core::Coord;
/// use tt_network::{LinkLengths, TopologyBuilder, TopologyLookup};
///
/// let mut b = TopologyBuilder::new();
/// b.add_node("n1", Coord::new(0.0, 0.0));
/// b.add_node("n2", Coord::new(500.0, 0.0));
/// b.add_road("L1", "n1", "n2", 500.0);
/// let topo = b.build();
/// assert_eq!(topo.length("L1"), Some(500.0));
/// assert_eq!(topo.to_node_coordinates("L1"), Some(Coord::new(500.0, 0.0)));
/// ```
pub struct TopologyBuilder {
    links:      HashMap<LinkId, Link>,
    nodes:      HashMap<NodeId, Coord>,
    duplicates: usize,
}

impl TopologyBuilder {
    pub fn new() -> Self {
        Self { links: HashMap::new(), nodes: HashMap::new(), duplicates: 0 }
    }

    /// Pre-allocate for the expected number of nodes and links.
    pub fn with_capacity(nodes: usize, links: usize) -> Self {
        Self {
            links:      HashMap::with_capacity(links),
            nodes:      HashMap::with_capacity(nodes),
            duplicates: 0,
        }
    }

    /// Add (or replace) a node.
    pub fn add_node(&mut self, id: impl Into<NodeId>, pos: Coord) {
        if self.nodes.insert(id.into(), pos).is_some() {
            self.duplicates += 1;
        }
    }

    /// Add (or replace) a fully specified link.
    pub fn add_link(&mut self, link: Link) {
        debug_assert!(
            link.length_m.is_finite() && link.length_m >= 0.0,
            "link length must be finite and non-negative"
        );
        if self.links.insert(link.id.clone(), link).is_some() {
            self.duplicates += 1;
        }
    }

    /// Convenience: add a directed link with no metadata.
    pub fn add_road(
        &mut self,
        id:       impl Into<LinkId>,
        from:     impl Into<NodeId>,
        to:       impl Into<NodeId>,
        length_m: f64,
    ) {
        self.add_link(Link::new(id.into(), from.into(), to.into(), length_m));
    }

    pub fn node_count(&self) -> usize { self.nodes.len() }
    pub fn link_count(&self) -> usize { self.links.len() }

    /// Consume the builder and produce a [`Topology`].
    pub fn build(self) -> Topology {
        if self.duplicates > 0 {
            tracing::warn!(
                duplicates = self.duplicates,
                "duplicate link/node ids in network input; later entries replaced earlier ones"
            );
        }
        Topology { links: self.links, nodes: self.nodes }
    }
}

impl Default for TopologyBuilder {
    fn default() -> Self {
        Self::new()
    }
}
