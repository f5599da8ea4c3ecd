//! Synthetic Mobile, AL road network.
//!
//! Five nodes in a projected CRS (metres), six bidirectional roads.  Link ids
//! name their endpoints: `nr_dt` runs north_residential → downtown.

use std::io::Cursor;

use tt_network::{NetworkResult, Topology, load_topology_readers};

const NODES_CSV: &str = "\
node_id,x,y
north_residential,0.0,4000.0
south_residential,4000.0,0.0
downtown,2000.0,2500.0
commerce_park,4000.0,2500.0
connector,1000.0,1500.0
";

// ~45 km/h urban roads.
const LINKS_CSV: &str = "\
link_id,from_node,to_node,length_m,freespeed,capacity,modes
nr_dt,north_residential,downtown,2500.0,12.5,1800,car
dt_nr,downtown,north_residential,2500.0,12.5,1800,car
nr_cn,north_residential,connector,1500.0,12.5,1200,car
cn_nr,connector,north_residential,1500.0,12.5,1200,car
cn_dt,connector,downtown,1000.0,12.5,1200,car
dt_cn,downtown,connector,1000.0,12.5,1200,car
sr_cn,south_residential,connector,1500.0,12.5,1200,car
cn_sr,connector,south_residential,1500.0,12.5,1200,car
sr_cp,south_residential,commerce_park,2000.0,12.5,1600,car
cp_sr,commerce_park,south_residential,2000.0,12.5,1600,car
dt_cp,downtown,commerce_park,2000.0,12.5,1600,car
cp_dt,commerce_park,downtown,2000.0,12.5,1600,car
";

pub fn build_network() -> NetworkResult<Topology> {
    load_topology_readers(Cursor::new(LINKS_CSV), Cursor::new(NODES_CSV))
}
