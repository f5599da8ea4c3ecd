//! Synthetic commuter day: event log and plans for the xsmall network.
//!
//! Every commuter drives home → work in the morning and work → home in the
//! evening, and each route ends on the link the plan names for the next
//! activity.  Person 6 carpools with person 5; bus 7 runs a loop the reducer
//! ignores.  The evening home activity never ends, so each driver contributes
//! one open activity at end of log, as in a real simulation run.

use std::fmt::Write as _;

use tt_core::{PersonId, TransportMode, VehicleId, format_hms};
use tt_events::RawEvent;
use tt_events::event::{
    ACTIVITY_END, ACTIVITY_START, ENTERED_LINK, PERSON_ENTERS_VEHICLE, VEHICLE_ENTERS_TRAFFIC,
    VEHICLE_LEAVES_TRAFFIC,
};
use tt_network::{Topology, TopologyLookup};

/// Seconds to traverse one link at free speed.
const LINK_TRAVEL_S: f64 = 200.0;
/// Seconds from entering the last link to leaving traffic.
const PARKING_S: f64 = 30.0;
/// Plans schedule activities slightly after arrival.
const PLAN_OFFSET_S: f64 = 300.0;

pub struct Commuter {
    pub person:    &'static str,
    pub passenger: Option<&'static str>,
    pub home_link: &'static str,
    pub work_link: &'static str,
    pub to_work:   &'static [&'static str],
    pub to_home:   &'static [&'static str],
    pub depart_s:  f64,
    pub return_s:  f64,
}

pub const COMMUTERS: [Commuter; 5] = [
    Commuter {
        person: "1", passenger: None, home_link: "cn_nr", work_link: "nr_dt",
        to_work: &["nr_dt"], to_home: &["dt_cn", "cn_nr"],
        depart_s: 25_200.0, return_s: 61_200.0,
    },
    Commuter {
        person: "2", passenger: None, home_link: "dt_nr", work_link: "nr_dt",
        to_work: &["nr_dt"], to_home: &["dt_nr"],
        depart_s: 26_100.0, return_s: 62_100.0,
    },
    Commuter {
        person: "3", passenger: None, home_link: "cp_sr", work_link: "sr_cp",
        to_work: &["sr_cp"], to_home: &["cp_sr"],
        depart_s: 24_300.0, return_s: 59_400.0,
    },
    Commuter {
        person: "4", passenger: None, home_link: "cn_sr", work_link: "cn_dt",
        to_work: &["sr_cn", "cn_dt"], to_home: &["dt_cn", "cn_sr"],
        depart_s: 27_900.0, return_s: 64_800.0,
    },
    Commuter {
        person: "5", passenger: Some("6"), home_link: "cp_sr", work_link: "dt_cp",
        to_work: &["sr_cn", "cn_dt", "dt_cp"], to_home: &["cp_sr"],
        depart_s: 28_800.0, return_s: 63_000.0,
    },
];

fn arrival(depart_s: f64, route: &[&str]) -> f64 {
    depart_s + route.len() as f64 * LINK_TRAVEL_S + PARKING_S
}

fn car_of(person: &str) -> VehicleId {
    let person = PersonId::from(person);
    TransportMode::Car
        .vehicle_for(&person)
        .unwrap_or_else(|| VehicleId(person.0))
}

/// Append one leg: end activity, board, drive `route`, park, start activity.
fn leg(
    out:     &mut Vec<(f64, RawEvent)>,
    c:       &Commuter,
    depart:  f64,
    from:    &str,
    route:   &[&str],
    acts:    (&str, &str),
) {
    let vehicle = car_of(c.person);
    let vehicle = vehicle.as_str();

    out.push((depart, RawEvent::new(ACTIVITY_END, depart).person(c.person).link(from).act_type(acts.0)));
    out.push((depart, RawEvent::new(PERSON_ENTERS_VEHICLE, depart).person(c.person).vehicle(vehicle)));
    if let Some(p) = c.passenger {
        out.push((depart, RawEvent::new(ACTIVITY_END, depart).person(p).link(from).act_type(acts.0)));
        out.push((depart, RawEvent::new(PERSON_ENTERS_VEHICLE, depart).person(p).vehicle(vehicle)));
    }
    out.push((depart, RawEvent::new(VEHICLE_ENTERS_TRAFFIC, depart).vehicle(vehicle).link(from)));

    let mut t = depart;
    for link in route {
        t += LINK_TRAVEL_S;
        out.push((t, RawEvent::new(ENTERED_LINK, t).vehicle(vehicle).link(link)));
    }

    let arrive = arrival(depart, route);
    let last = route.last().copied().unwrap_or(from);
    out.push((arrive, RawEvent::new(VEHICLE_LEAVES_TRAFFIC, arrive).vehicle(vehicle).link(last)));
    out.push((arrive, RawEvent::new(ACTIVITY_START, arrive).person(c.person).link(last).act_type(acts.1)));
    if let Some(p) = c.passenger {
        out.push((arrive, RawEvent::new(ACTIVITY_START, arrive).person(p).link(last).act_type(acts.1)));
    }
}

/// The full day's event log in time order.
pub fn events() -> Vec<RawEvent> {
    let mut out = Vec::new();
    for c in &COMMUTERS {
        leg(&mut out, c, c.depart_s, c.home_link, c.to_work, ("home", "work"));
        leg(&mut out, c, c.return_s, c.work_link, c.to_home, ("work", "home"));
    }

    // Transit: no car suffix, never tracked.
    for (i, link) in ["cn_dt", "dt_cp", "cp_sr", "sr_cn"].iter().enumerate() {
        let t = 21_600.0 + i as f64 * 600.0;
        out.push((t, RawEvent::new(ENTERED_LINK, t).vehicle("bus_7").link(link)));
    }

    // Stable: events at one timestamp keep their causal order.
    out.sort_by(|a, b| a.0.total_cmp(&b.0));
    out.into_iter().map(|(_, e)| e).collect()
}

/// Plans CSV for every driver, with staging activities the loader skips.
pub fn plans_csv(topo: &Topology) -> String {
    let mut csv = String::from("person_id,activity_type,link_id,x,y,start_time\n");
    let mut row = |person: &str, act: &str, link: &str, start: Option<f64>| {
        let pos = topo.to_node_coordinates(link).unwrap_or_default();
        let start = start.map(format_hms).unwrap_or_default();
        // Facilities sit a short walk from the parking node.
        let _ = writeln!(csv, "{person},{act},{link},{:.1},{:.1},{start}", pos.x + 15.0, pos.y + 10.0);
    };

    for c in &COMMUTERS {
        let at_work = arrival(c.depart_s, c.to_work) + PLAN_OFFSET_S;
        let at_home = arrival(c.return_s, c.to_home) + PLAN_OFFSET_S;
        row(c.person, "home", c.home_link, None);
        row(c.person, "car interaction", c.home_link, Some(c.depart_s));
        row(c.person, "work", c.work_link, Some(at_work));
        row(c.person, "car interaction", c.work_link, Some(c.return_s));
        row(c.person, "home", c.home_link, Some(at_home));
    }
    csv
}
