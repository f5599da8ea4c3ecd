//! `tt-network` — read-only road topology for timeline reconstruction.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`topology`] | `LinkLengths`, `TopologyLookup`, `Topology`, `TopologyBuilder` |
//! | [`loader`]   | CSV pair and MATSim XML network loaders                    |
//! | [`error`]    | `NetworkError`, `NetworkResult<T>`                         |
//!
//! The reconstruction stages never mutate the network.  They see it only
//! through the [`LinkLengths`] / [`TopologyLookup`] traits, so tests can pass
//! a bare `HashMap<LinkId, f64>` where only lengths matter.

pub mod error;
pub mod loader;
pub mod topology;

#[cfg(test)]
mod tests;

pub use error::{NetworkError, NetworkResult};
pub use loader::{
    load_network_xml, load_network_xml_reader, load_topology_csv, load_topology_readers,
};
pub use topology::{Link, LinkLengths, Topology, TopologyBuilder, TopologyLookup};
