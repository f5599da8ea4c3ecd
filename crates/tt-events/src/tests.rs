//! Unit tests for tt-events.

use std::collections::HashMap;

use tt_core::LinkId;

use crate::RawEvent;

// ── Helpers ───────────────────────────────────────────────────────────────────

fn lengths() -> HashMap<LinkId, f64> {
    [
        (LinkId::from("L1"), 120.0),
        (LinkId::from("L2"), 500.0),
        (LinkId::from("L3"), 250.0),
    ]
    .into()
}

fn enters(t: f64, vehicle: &str, link: &str) -> RawEvent {
    RawEvent::new("vehicle enters traffic", t).vehicle(vehicle).link(link)
}

fn link(t: f64, vehicle: &str, link: &str) -> RawEvent {
    RawEvent::new("entered link", t).vehicle(vehicle).link(link)
}

fn leaves(t: f64, vehicle: &str, link: &str) -> RawEvent {
    RawEvent::new("vehicle leaves traffic", t).vehicle(vehicle).link(link)
}

fn boards(t: f64, person: &str, vehicle: &str) -> RawEvent {
    RawEvent::new("PersonEntersVehicle", t).person(person).vehicle(vehicle)
}

fn act_start(t: f64, person: &str, act: &str, link: &str) -> RawEvent {
    RawEvent::new("actstart", t).person(person).act_type(act).link(link)
}

fn act_end(t: f64, person: &str) -> RawEvent {
    RawEvent::new("actend", t).person(person)
}

fn run(events: Vec<RawEvent>) -> crate::ReducedLog {
    crate::reduce(events.into_iter().map(Ok), &lengths(), None, Default::default()).unwrap()
}

// ── Decoding ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod decode {
    use tt_core::{LinkId, PersonId, VehicleId};

    use crate::{Event, EventError, RawEvent};

    #[test]
    fn unknown_type_is_ignored_without_attributes() {
        let raw = RawEvent { kind: "departure".into(), ..RawEvent::default() };
        assert_eq!(raw.decode().unwrap(), Event::Ignored);
    }

    #[test]
    fn traffic_entry_decodes() {
        let ev = super::enters(3600.0, "v1:car", "L1").decode().unwrap();
        assert_eq!(
            ev,
            Event::VehicleEntersTraffic {
                time:    3600.0,
                vehicle: VehicleId::from("v1:car"),
                link:    LinkId::from("L1"),
            }
        );
    }

    #[test]
    fn activity_start_defaults_optional_fields() {
        let raw = RawEvent::new("actstart", 10.0).person("p1");
        match raw.decode().unwrap() {
            Event::ActivityStart { person, act_type, link, .. } => {
                assert_eq!(person, PersonId::from("p1"));
                assert_eq!(act_type, "unknown");
                assert!(link.is_unknown());
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn missing_required_attribute() {
        let raw = RawEvent::new("vehicle leaves traffic", 10.0).vehicle("v1:car");
        let err = raw.decode().unwrap_err();
        assert!(
            matches!(err, EventError::MissingAttribute { attribute: "link", .. }),
            "got {err}"
        );
    }

    #[test]
    fn empty_string_counts_as_missing() {
        let raw = RawEvent::new("actend", 10.0).person("");
        assert!(matches!(raw.decode(), Err(EventError::MissingAttribute { attribute: "person", .. })));
    }

    #[test]
    fn bad_time_rejected() {
        let mut raw = RawEvent::new("actend", 0.0).person("p1");
        raw.time = Some("noon".into());
        assert!(matches!(raw.clone().decode(), Err(EventError::InvalidTime { .. })));
        raw.time = Some("-5".into());
        assert!(matches!(raw.clone().decode(), Err(EventError::InvalidTime { .. })));
        raw.time = None;
        assert!(matches!(raw.decode(), Err(EventError::MissingAttribute { attribute: "time", .. })));
    }

    #[test]
    fn pedestrian_link_entry_is_ignored() {
        let raw = RawEvent::new("entered link", 10.0).link("L1");
        assert_eq!(raw.decode().unwrap(), Event::Ignored);
    }
}

// ── Trip extraction ───────────────────────────────────────────────────────────

#[cfg(test)]
mod trips {
    use std::collections::HashSet;

    use tt_core::{LinkId, PersonId, VehicleId};

    use super::*;
    use crate::{EventReducer, ReducerConfig};

    #[test]
    fn single_trip_accumulates_distance() {
        let log = run(vec![
            enters(3600.0, "v1:car", "L1"),
            link(3650.0, "v1:car", "L2"),
            leaves(3700.0, "v1:car", "L2"),
        ]);
        assert_eq!(log.trips.len(), 1);
        let t = &log.trips[0];
        assert_eq!(t.t_start, 3600.0);
        assert_eq!(t.t_end, 3700.0);
        assert_eq!(t.distance_m, 500.0);
        assert_eq!(t.from_link, LinkId::from("L1"));
        assert_eq!(t.to_link, LinkId::from("L2"));
        assert_eq!(t.duration_s(), 100.0);
    }

    #[test]
    fn departure_link_is_not_counted() {
        // The entry link's length is not added; only links entered afterwards.
        let log = run(vec![
            enters(0.0, "v1:car", "L1"),
            link(10.0, "v1:car", "L2"),
            link(20.0, "v1:car", "L3"),
            leaves(30.0, "v1:car", "L3"),
        ]);
        assert_eq!(log.trips[0].distance_m, 750.0);
    }

    #[test]
    fn unknown_links_are_skipped() {
        let log = run(vec![
            enters(0.0, "v1:car", "L1"),
            link(10.0, "v1:car", "ghost"),
            link(20.0, "v1:car", "L2"),
            leaves(30.0, "v1:car", "L2"),
        ]);
        assert_eq!(log.trips[0].distance_m, 500.0);
    }

    #[test]
    fn driver_is_first_occupant() {
        let log = run(vec![
            boards(100.0, "alice", "alice:car"),
            boards(101.0, "bob", "alice:car"),
            enters(102.0, "alice:car", "L1"),
            leaves(200.0, "alice:car", "L1"),
        ]);
        assert_eq!(log.trips[0].person_id, PersonId::from("alice"));
        assert_eq!(log.person_to_vehicle.len(), 1);
        assert_eq!(log.person_to_vehicle[&PersonId::from("alice")], VehicleId::from("alice:car"));
    }

    #[test]
    fn missing_boarding_falls_back_to_vehicle_id() {
        let log = run(vec![enters(0.0, "carol:car", "L1"), leaves(60.0, "carol:car", "L1")]);
        assert_eq!(log.trips[0].person_id, PersonId::from("carol:car"));
        assert!(log.person_to_vehicle.is_empty());
    }

    #[test]
    fn non_car_vehicles_are_not_tracked() {
        let log = run(vec![
            boards(0.0, "p1", "bus_7"),
            enters(1.0, "bus_7", "L1"),
            leaves(50.0, "bus_7", "L2"),
            enters(1.0, "p2:bike", "L1"),
            leaves(50.0, "p2:bike", "L2"),
        ]);
        assert!(log.trips.is_empty());
        assert!(log.person_to_vehicle.is_empty());
    }

    #[test]
    fn filter_restricts_tracked_cars() {
        let lens = lengths();
        let keep: HashSet<VehicleId> = [VehicleId::from("a:car")].into();
        let mut r = EventReducer::new(&lens).with_filter(&keep);
        for raw in [
            enters(0.0, "a:car", "L1"),
            enters(0.0, "b:car", "L1"),
            leaves(10.0, "a:car", "L1"),
            leaves(10.0, "b:car", "L1"),
        ] {
            r.push_raw(raw).unwrap();
        }
        let log = r.finish();
        assert_eq!(log.trips.len(), 1);
        assert_eq!(log.trips[0].vehicle_id, VehicleId::from("a:car"));
    }

    #[test]
    fn empty_filter_tracks_nothing() {
        let lens = lengths();
        let keep = HashSet::new();
        let mut r = EventReducer::new(&lens).with_filter(&keep);
        r.push_raw(enters(0.0, "a:car", "L1")).unwrap();
        r.push_raw(leaves(10.0, "a:car", "L1")).unwrap();
        assert!(r.finish().trips.is_empty());
    }

    #[test]
    fn reentry_while_open_is_ignored() {
        let log = run(vec![
            enters(0.0, "v:car", "L1"),
            link(5.0, "v:car", "L2"),
            enters(6.0, "v:car", "L3"),
            leaves(10.0, "v:car", "L2"),
        ]);
        assert_eq!(log.trips.len(), 1);
        assert_eq!(log.trips[0].t_start, 0.0);
        assert_eq!(log.trips[0].from_link, LinkId::from("L1"));
        assert_eq!(log.report.reentries_ignored, 1);
    }

    #[test]
    fn zero_duration_trip_is_discarded() {
        let log = run(vec![enters(50.0, "v:car", "L1"), leaves(50.0, "v:car", "L1")]);
        assert!(log.trips.is_empty());
        assert_eq!(log.report.zero_duration_trips, 1);
        assert_eq!(log.report.stuck_trips, 0);
    }

    #[test]
    fn unterminated_trip_is_counted_not_emitted() {
        let log = run(vec![
            enters(0.0, "a:car", "L1"),
            leaves(10.0, "a:car", "L1"),
            enters(3600.0, "stuck:car", "L1"),
            link(3650.0, "stuck:car", "L2"),
        ]);
        assert_eq!(log.trips.len(), 1);
        assert!(log.trips.iter().all(|t| t.vehicle_id != VehicleId::from("stuck:car")));
        assert_eq!(log.report.stuck_trips, 1);
    }

    #[test]
    fn open_counts_track_state() {
        let lens = lengths();
        let mut r = EventReducer::new(&lens).with_config(ReducerConfig::default());
        r.push_raw(enters(0.0, "a:car", "L1")).unwrap();
        r.push_raw(act_start(0.0, "p", "home", "L1")).unwrap();
        assert_eq!(r.open_trip_count(), 1);
        assert_eq!(r.open_activity_count(), 1);
        r.push_raw(leaves(5.0, "a:car", "L1")).unwrap();
        assert_eq!(r.open_trip_count(), 0);
    }

    #[test]
    fn every_trip_satisfies_invariants() {
        let log = run(vec![
            enters(0.0, "a:car", "L1"),
            enters(0.0, "b:car", "L2"),
            link(1.0, "a:car", "L2"),
            leaves(1.0, "b:car", "L2"),
            link(2.0, "a:car", "L3"),
            leaves(2.0, "a:car", "L3"),
            enters(2.0, "b:car", "L2"),
            leaves(2.0, "b:car", "L2"),
        ]);
        assert!(!log.trips.is_empty());
        for t in &log.trips {
            assert!(t.t_end > t.t_start, "{t:?}");
            assert!(t.distance_m >= 0.0, "{t:?}");
        }
    }
}

// ── Activities ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod activities {
    use tt_core::{LinkId, PersonId};

    use super::*;

    #[test]
    fn activity_uses_start_type_and_link() {
        let end = RawEvent::new("actend", 30_000.0).person("p1").act_type("other").link("L9");
        let log = run(vec![act_start(28_800.0, "p1", "work", "L2"), end]);
        assert_eq!(log.activities.len(), 1);
        let a = &log.activities[0];
        assert_eq!(a.person_id, PersonId::from("p1"));
        assert_eq!(a.act_type, "work");
        assert_eq!(a.link_id, LinkId::from("L2"));
        assert_eq!(a.t_start, 28_800.0);
        assert_eq!(a.t_end, 30_000.0);
        assert_eq!(a.duration_s(), 1_200.0);
    }

    #[test]
    fn restart_overwrites_open_activity() {
        let log = run(vec![
            act_start(0.0, "p1", "home", "L1"),
            act_start(10.0, "p1", "shop", "L3"),
            act_end(20.0, "p1"),
        ]);
        assert_eq!(log.activities.len(), 1);
        assert_eq!(log.activities[0].act_type, "shop");
        assert_eq!(log.activities[0].t_start, 10.0);
    }

    #[test]
    fn end_without_start_and_stuck_activity_are_counted() {
        // First activity of the day has no start; last one never ends.
        let log = run(vec![
            act_end(25_200.0, "p1"),
            act_start(27_000.0, "p1", "work", "L2"),
            act_end(50_000.0, "p1"),
            act_start(52_000.0, "p1", "home", "L1"),
        ]);
        assert_eq!(log.activities.len(), 1);
        assert_eq!(log.report.activity_ends_without_start, 1);
        assert_eq!(log.report.stuck_activities, 1);
        assert_eq!(log.report.activities, 1);
    }
}

// ── Policies & report ─────────────────────────────────────────────────────────

#[cfg(test)]
mod report {
    use super::*;
    use crate::{reduce, EventError, MalformedPolicy, ReducerConfig};

    fn with_malformed() -> Vec<RawEvent> {
        vec![
            enters(0.0, "a:car", "L1"),
            RawEvent::new("vehicle leaves traffic", 5.0).vehicle("a:car"), // no link
            RawEvent { kind: "departure".into(), ..RawEvent::default() },
            leaves(10.0, "a:car", "L2"),
        ]
    }

    #[test]
    fn skip_policy_counts_and_continues() {
        let log = run(with_malformed());
        assert_eq!(log.trips.len(), 1);
        assert_eq!(log.trips[0].t_end, 10.0);
        assert_eq!(log.report.malformed_skipped, 1);
        assert_eq!(log.report.events_ignored, 1);
        assert_eq!(log.report.events_seen, 4);
    }

    #[test]
    fn abort_policy_reports_record_number() {
        let config = ReducerConfig { malformed: MalformedPolicy::Abort };
        let err = reduce(with_malformed().into_iter().map(Ok), &lengths(), None, config).unwrap_err();
        match err {
            EventError::Malformed { record, source } => {
                assert_eq!(record, 2);
                assert!(matches!(*source, EventError::MissingAttribute { .. }));
            }
            other => panic!("unexpected {other}"),
        }
    }

    #[test]
    fn out_of_order_events_are_counted() {
        let log = run(vec![
            act_start(100.0, "p", "home", "L1"),
            act_end(50.0, "p"),
            act_start(200.0, "p", "work", "L2"),
        ]);
        assert_eq!(log.report.out_of_order, 1);
    }
}

// ── CSV reader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod loader {
    use std::io::Cursor;

    use tt_core::LinkId;

    use super::lengths;
    use crate::{read_events_reader, reduce, EventError};

    const LOG: &str = "\
type,time,person,vehicle,link,actType
actend,25200,p1,,L1,home
PersonEntersVehicle,25200,p1,p1:car,,
departure,25200,p1,,L1,
vehicle enters traffic,25201,,p1:car,L1,
entered link,25260,,p1:car,L2,
entered link,25270,p9,,,
vehicle leaves traffic,25320,,p1:car,L2,
actstart,25320,p1,,L2,work
";

    #[test]
    fn streams_and_reduces() {
        let log = reduce(read_events_reader(Cursor::new(LOG)), &lengths(), None, Default::default())
            .unwrap();
        assert_eq!(log.trips.len(), 1);
        assert_eq!(log.trips[0].person_id.as_str(), "p1");
        assert_eq!(log.trips[0].to_link, LinkId::from("L2"));
        assert_eq!(log.trips[0].distance_m, 500.0);
        assert_eq!(log.report.events_seen, 8);
        assert_eq!(log.report.events_ignored, 2);
        assert_eq!(log.report.stuck_activities, 1);
    }

    #[test]
    fn short_rows_are_accepted() {
        let log = "type,time,person,vehicle,link,actType\nactstart,10,p1\nactend,20,p1\n";
        let out = reduce(read_events_reader(Cursor::new(log)), &lengths(), None, Default::default())
            .unwrap();
        assert_eq!(out.activities.len(), 1);
        assert!(out.activities[0].link_id.is_unknown());
    }

    #[test]
    fn missing_type_column_is_fatal() {
        let log = "time,person\n10,p1\n";
        let err = reduce(read_events_reader(Cursor::new(log)), &lengths(), None, Default::default())
            .unwrap_err();
        assert!(matches!(err, EventError::Csv(_)), "got {err}");
    }
}

// ── XML reader ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod xml_loader {
    use std::io::{Cursor, Write};

    use tt_core::{InputFormat, LinkId, PersonId};

    use super::lengths;
    use crate::{EventError, RawEvent, read_events, read_events_xml_reader, reduce};

    const LOG: &str = r#"<?xml version="1.0" encoding="utf-8"?>
<events version="1.0">
	<event time="3590.0" type="actend" person="v1" link="L1" actType="home"  />
	<event time="3590.0" type="departure" person="v1" link="L1" legMode="car"  />
	<event time="3590.0" type="PersonEntersVehicle" person="v1" vehicle="v1:car"  />
	<event time="3600.0" type="vehicle enters traffic" person="v1" link="L1" vehicle="v1:car" networkMode="car" relativePosition="1.0"  />
	<event time="3650.0" type="left link" link="L1" vehicle="v1:car"  />
	<event time="3650.0" type="entered link" link="L2" vehicle="v1:car"  />
	<event time="3700.0" type="vehicle leaves traffic" person="v1" link="L2" vehicle="v1:car" networkMode="car" relativePosition="1.0"  />
	<event time="3700.0" type="actstart" person="v1" link="L2" actType="work &amp; study"  />
</events>
"#;

    #[test]
    fn attributes_map_onto_raw_event() {
        let events: Vec<RawEvent> =
            read_events_xml_reader(Cursor::new(LOG)).map(|e| e.unwrap()).collect();
        assert_eq!(events.len(), 8);
        assert_eq!(
            events[3],
            RawEvent {
                kind:     "vehicle enters traffic".to_owned(),
                time:     Some("3600.0".to_owned()),
                person:   Some("v1".to_owned()),
                vehicle:  Some("v1:car".to_owned()),
                link:     Some("L1".to_owned()),
                act_type: None,
            },
        );
        assert_eq!(events[7].act_type.as_deref(), Some("work & study"));
    }

    #[test]
    fn single_trip_from_xml() {
        let log = reduce(read_events_xml_reader(Cursor::new(LOG)), &lengths(), None, Default::default())
            .unwrap();
        assert_eq!(log.trips.len(), 1);
        let trip = &log.trips[0];
        assert_eq!(trip.person_id, PersonId::from("v1"));
        assert_eq!((trip.t_start, trip.t_end), (3600.0, 3700.0));
        assert_eq!(trip.distance_m, 500.0);
        assert_eq!(trip.from_link, LinkId::from("L1"));
        assert_eq!(trip.to_link, LinkId::from("L2"));
        assert_eq!(log.report.events_ignored, 2, "departure and left link");
        assert_eq!(log.report.stuck_activities, 1);
    }

    #[test]
    fn nested_event_elements_are_read() {
        let log = r#"<events><event time="10" type="actstart" person="p1" link="L1" actType="home"><attributes/></event>
<event time="20" type="actend" person="p1" link="L1" actType="home"/></events>"#;
        let out = reduce(read_events_xml_reader(Cursor::new(log)), &lengths(), None, Default::default())
            .unwrap();
        assert_eq!(out.activities.len(), 1);
        assert_eq!(out.activities[0].t_end, 20.0);
    }

    #[test]
    fn syntax_error_ends_the_stream() {
        let log = r#"<events><event time="10" type="actstart" person="p1"/><event time="20" type=actend/></events>"#;
        let items: Vec<_> = read_events_xml_reader(Cursor::new(log)).collect();
        assert_eq!(items.len(), 2);
        assert!(items[0].is_ok());
        assert!(matches!(items[1], Err(EventError::Xml(_))));
    }

    #[test]
    fn gzipped_file_by_extension() {
        use flate2::Compression;
        use flate2::write::GzEncoder;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("output_events.xml.gz");
        let mut gz = GzEncoder::new(std::fs::File::create(&path).unwrap(), Compression::fast());
        gz.write_all(LOG.as_bytes()).unwrap();
        gz.finish().unwrap();

        let events = read_events(&path, InputFormat::from_path(&path)).unwrap();
        let log = reduce(events, &lengths(), None, Default::default()).unwrap();
        assert_eq!(log.trips.len(), 1);
    }
}
