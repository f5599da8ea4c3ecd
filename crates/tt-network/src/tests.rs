//! Unit tests for tt-network.
//!
//! All tests use hand-crafted networks so they run without any input files.

#[cfg(test)]
mod helpers {
    use tt_core::Coord;

    use crate::{Topology, TopologyBuilder};

    /// Three nodes on a line, two links each way:
    ///
    ///   n1 ──L1──▶ n2 ──L2──▶ n3
    ///   n1 ◀─L1r── n2 ◀─L2r── n3
    pub fn line_network() -> Topology {
        let mut b = TopologyBuilder::new();
        b.add_node("n1", Coord::new(0.0, 0.0));
        b.add_node("n2", Coord::new(500.0, 0.0));
        b.add_node("n3", Coord::new(500.0, 300.0));
        b.add_road("L1", "n1", "n2", 500.0);
        b.add_road("L1r", "n2", "n1", 500.0);
        b.add_road("L2", "n2", "n3", 300.0);
        b.add_road("L2r", "n3", "n2", 300.0);
        b.build()
    }
}

// ── Topology & builder ────────────────────────────────────────────────────────

#[cfg(test)]
mod topology {
    use std::collections::HashMap;

    use tt_core::{Coord, LinkId, NodeId};

    use crate::{LinkLengths, TopologyBuilder, TopologyLookup};

    #[test]
    fn empty_build() {
        let topo = TopologyBuilder::new().build();
        assert_eq!(topo.link_count(), 0);
        assert_eq!(topo.node_count(), 0);
        assert!(topo.is_empty());
        assert_eq!(topo.length("L1"), None);
    }

    #[test]
    fn lengths_and_endpoints() {
        let topo = super::helpers::line_network();
        assert_eq!(topo.link_count(), 4);
        assert_eq!(topo.node_count(), 3);
        assert_eq!(topo.length("L2"), Some(300.0));
        let (from, to) = topo.endpoints("L2").unwrap();
        assert_eq!(from, &NodeId::from("n2"));
        assert_eq!(to, &NodeId::from("n3"));
    }

    #[test]
    fn to_node_coordinates_follow_direction() {
        let topo = super::helpers::line_network();
        assert_eq!(topo.to_node_coordinates("L1"), Some(Coord::new(500.0, 0.0)));
        assert_eq!(topo.to_node_coordinates("L1r"), Some(Coord::new(0.0, 0.0)));
    }

    #[test]
    fn dangling_node_reference_resolves_no_coordinates() {
        let mut b = TopologyBuilder::new();
        b.add_node("a", Coord::new(1.0, 1.0));
        b.add_road("L9", "a", "ghost", 42.0);
        let topo = b.build();
        assert_eq!(topo.length("L9"), Some(42.0));
        assert!(topo.endpoints("L9").is_some());
        assert_eq!(topo.to_node_coordinates("L9"), None);
        assert_eq!(topo.to_node_coordinates("missing"), None);
    }

    #[test]
    fn duplicate_link_replaces_earlier() {
        let mut b = TopologyBuilder::with_capacity(0, 2);
        b.add_road("L1", "a", "b", 10.0);
        b.add_road("L1", "a", "b", 20.0);
        assert_eq!(b.link_count(), 1);
        assert_eq!(b.build().length("L1"), Some(20.0));
    }

    #[test]
    fn plain_length_map_implements_link_lengths() {
        let mut m: HashMap<LinkId, f64> = HashMap::new();
        m.insert(LinkId::from("L2"), 500.0);
        assert_eq!(LinkLengths::length(&m, "L2"), Some(500.0));
        assert_eq!(LinkLengths::length(&m, "L3"), None);
    }
}

// ── CSV loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use tt_core::Coord;

    use crate::{load_topology_readers, NetworkError, LinkLengths, TopologyLookup};

    const NODES: &str = "\
node_id,x,y
n1,651200.5,6862010.0
n2,651700.5,6862010.0
";

    const LINKS: &str = "\
link_id,from_node,to_node,length_m,freespeed,capacity,modes
L1,n1,n2,500.0,13.89,1800,\"car,bike\"
L2,n2,n1,500.0,,,
";

    #[test]
    fn loads_nodes_and_links() {
        let topo = load_topology_readers(Cursor::new(LINKS), Cursor::new(NODES)).unwrap();
        assert_eq!(topo.node_count(), 2);
        assert_eq!(topo.link_count(), 2);
        assert_eq!(topo.length("L1"), Some(500.0));
        assert_eq!(topo.to_node_coordinates("L2"), Some(Coord::new(651_200.5, 6_862_010.0)));
    }

    #[test]
    fn optional_columns_default() {
        let topo = load_topology_readers(Cursor::new(LINKS), Cursor::new(NODES)).unwrap();
        let l1 = topo.link("L1").unwrap();
        assert_eq!(l1.freespeed_ms, 13.89);
        assert_eq!(l1.capacity, 1800.0);
        assert!(l1.allows("car"));
        assert!(l1.allows("bike"));
        assert!(!l1.allows("pt"));

        let l2 = topo.link("L2").unwrap();
        assert_eq!(l2.freespeed_ms, 0.0);
        assert_eq!(l2.capacity, 0.0);
        assert!(l2.modes.is_empty());
    }

    #[test]
    fn negative_length_rejected() {
        let links = "link_id,from_node,to_node,length_m,freespeed,capacity,modes\nL1,n1,n2,-3.0,,,\n";
        let err = load_topology_readers(Cursor::new(links), Cursor::new(NODES)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidLength { .. }), "got {err}");
    }

    #[test]
    fn non_numeric_coordinate_is_csv_error() {
        let nodes = "node_id,x,y\nn1,east,0.0\n";
        let err = load_topology_readers(Cursor::new(LINKS), Cursor::new(nodes)).unwrap_err();
        assert!(matches!(err, NetworkError::Csv(_)), "got {err}");
    }
}

// ── XML loader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod xml_loader {
    use std::io::Cursor;

    use tt_core::Coord;

    use crate::{LinkLengths, NetworkError, TopologyLookup, load_network_xml_reader};

    const NETWORK: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE network SYSTEM "http://www.matsim.org/files/dtd/network_v2.dtd">
<network name="test">
	<nodes>
		<node id="n1" x="651200.5" y="6862010.0" >
		</node>
		<node id="n2" x="651700.5" y="6862010.0" />
	</nodes>
	<links capperiod="01:00:00" effectivecellsize="7.5" effectivelanewidth="3.75">
		<link id="L1" from="n1" to="n2" length="500.0" freespeed="13.89" capacity="1800.0" permlanes="1.0" oneway="1" modes="car,bike" >
			<attributes>
				<attribute name="type" class="java.lang.String">primary</attribute>
			</attributes>
		</link>
		<link id="L2" from="n2" to="n1" length="500.0" />
	</links>
</network>
"#;

    #[test]
    fn loads_nodes_and_links() {
        let topo = load_network_xml_reader(Cursor::new(NETWORK)).unwrap();
        assert_eq!(topo.node_count(), 2);
        assert_eq!(topo.link_count(), 2);
        assert_eq!(topo.length("L1"), Some(500.0));
        assert_eq!(topo.to_node_coordinates("L2"), Some(Coord::new(651_200.5, 6_862_010.0)));

        let l1 = topo.link("L1").unwrap();
        assert_eq!(l1.freespeed_ms, 13.89);
        assert!(l1.allows("bike"));
        let l2 = topo.link("L2").unwrap();
        assert_eq!(l2.capacity, 0.0);
        assert!(l2.modes.is_empty());
    }

    #[test]
    fn link_without_length_is_rejected() {
        let xml = r#"<network><links><link id="L1" from="a" to="b"/></links></network>"#;
        let err = load_network_xml_reader(Cursor::new(xml)).unwrap_err();
        assert!(
            matches!(err, NetworkError::MissingAttribute { element: "link", attribute: "length" }),
            "got {err}"
        );
    }

    #[test]
    fn bad_coordinate_is_reported() {
        let xml = r#"<network><nodes><node id="n1" x="east" y="0"/></nodes></network>"#;
        let err = load_network_xml_reader(Cursor::new(xml)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidNumber { attribute: "x", .. }), "got {err}");
    }

    #[test]
    fn negative_length_rejected() {
        let xml = r#"<network><links><link id="L1" from="a" to="b" length="-1"/></links></network>"#;
        let err = load_network_xml_reader(Cursor::new(xml)).unwrap_err();
        assert!(matches!(err, NetworkError::InvalidLength { .. }), "got {err}");
    }
}
