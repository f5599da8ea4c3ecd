//! Checks on the generated xsmall day.

#[cfg(test)]
mod scenario {
    use std::io::Cursor;

    use tt_events::ReducerConfig;
    use tt_network::TopologyLookup;
    use tt_pipeline::{NoopObserver, Pipeline};
    use tt_timetable::load_plans_reader;

    use crate::network::build_network;
    use crate::scenario::{COMMUTERS, events, plans_csv};

    /// Each route starts where the previous link ends and parks on the
    /// link the plan names for the next activity.
    #[test]
    fn routes_connect_and_end_on_plan_links() {
        let topo = build_network().unwrap();
        for c in &COMMUTERS {
            for (from, route, to) in [
                (c.home_link, c.to_work, c.work_link),
                (c.work_link, c.to_home, c.home_link),
            ] {
                let mut at = topo.endpoints(from).unwrap().1;
                for link in route {
                    let (start, end) = topo.endpoints(link).unwrap();
                    assert_eq!(start, at, "commuter {}: {link} does not follow on", c.person);
                    at = end;
                }
                assert_eq!(route.last().copied(), Some(to), "commuter {} parks off-plan", c.person);
            }
        }
    }

    #[test]
    fn only_the_morning_stop_falls_back() {
        let topo = build_network().unwrap();
        let plans = load_plans_reader(Cursor::new(plans_csv(&topo))).unwrap();
        let out = Pipeline::new(&topo, ReducerConfig::default())
            .run(events().into_iter().map(Ok), &plans, &mut NoopObserver)
            .unwrap();

        let m = &out.reports.matching;
        assert_eq!(m.parked, 3 * COMMUTERS.len());
        assert_eq!(m.matched, 2 * COMMUTERS.len());
        assert_eq!(m.fallback, COMMUTERS.len());
        assert_eq!(m.zero_length, 0);
    }
}
