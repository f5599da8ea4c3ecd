//! The `EventReducer` state machine and the `reduce` driver.

use std::collections::{HashMap, HashSet};

use serde::Deserialize;

use tt_core::{PersonId, TransportMode, VehicleId};
use tt_network::LinkLengths;

use crate::event::{Event, RawEvent};
use crate::record::{ActivityEvent, OpenActivity, OpenTrip, Trip};
use crate::{EventError, EventResult};

#[cfg(feature = "fx-hash")]
type OpenMap<K, V> = rustc_hash::FxHashMap<K, V>;
#[cfg(not(feature = "fx-hash"))]
type OpenMap<K, V> = HashMap<K, V>;

// ── Configuration ─────────────────────────────────────────────────────────────

/// What to do with an event of a used type that fails to decode.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MalformedPolicy {
    /// Drop the record, count it in [`ReduceReport::malformed_skipped`], and
    /// keep going.
    #[default]
    Skip,
    /// Stop the reduction with [`EventError::Malformed`].
    Abort,
}

/// Reducer options.
#[derive(Clone, Debug, Default)]
pub struct ReducerConfig {
    pub malformed: MalformedPolicy,
}

// ── Output ────────────────────────────────────────────────────────────────────

/// Counters describing one reduction.  Logged by the reducer and surfaced to
/// pipeline observers for data-quality monitoring.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ReduceReport {
    /// Every record handed to the reducer, including ignored and malformed ones.
    pub events_seen:                 u64,
    /// Records of a type the reducer does not use.
    pub events_ignored:              u64,
    /// Records of a used type that failed to decode and were skipped.
    pub malformed_skipped:           u64,
    /// Records whose time was earlier than the previous record's.
    pub out_of_order:                u64,
    pub trips:                       usize,
    pub activities:                  usize,
    /// Trips still open at end of log (agent stuck mid-journey), discarded.
    pub stuck_trips:                 usize,
    /// Activities still open at end of log, discarded.
    pub stuck_activities:            usize,
    /// Trips closed at or before their own start time, discarded.
    pub zero_duration_trips:         usize,
    /// Traffic entries for a vehicle already on an open trip, ignored.
    pub reentries_ignored:           usize,
    /// Activity ends with no preceding start for that person.
    pub activity_ends_without_start: usize,
}

/// Everything a reduction produces.
#[derive(Clone, Debug, Default)]
pub struct ReducedLog {
    /// Completed trips in order of completion.
    pub trips:             Vec<Trip>,
    /// Completed activities in order of completion.
    pub activities:        Vec<ActivityEvent>,
    /// Driver identity: the first person seen boarding each car.
    pub person_to_vehicle: HashMap<PersonId, VehicleId>,
    pub report:            ReduceReport,
}

// ── EventReducer ──────────────────────────────────────────────────────────────

/// Single-pass reducer from an ordered event log to trips and activities.
///
/// All open state lives in the reducer value, so independent logs can be
/// reduced concurrently with separate reducers.
///
/// ```
/// use std::collections::HashMap;
/// use tt_core::LinkId;
/// use tt_events::{EventReducer, RawEvent};
///
/// let lengths: HashMap<LinkId, f64> = [(LinkId::from("L2"), 500.0)].into();
/// let mut r = EventReducer::new(&lengths);
/// r.push_raw(RawEvent::new("vehicle enters traffic", 3600.0).vehicle("v1:car").link("L1")).unwrap();
/// r.push_raw(RawEvent::new("entered link", 3650.0).vehicle("v1:car").link("L2")).unwrap();
/// r.push_raw(RawEvent::new("vehicle leaves traffic", 3700.0).vehicle("v1:car").link("L2")).unwrap();
/// let log = r.finish();
/// assert_eq!(log.trips.len(), 1);
/// assert_eq!(log.trips[0].distance_m, 500.0);
/// ```
pub struct EventReducer<'a, L: LinkLengths + ?Sized> {
    lengths:           &'a L,
    filter:            Option<&'a HashSet<VehicleId>>,
    config:            ReducerConfig,

    open_trips:        OpenMap<VehicleId, OpenTrip>,
    open_activities:   OpenMap<PersonId, OpenActivity>,
    vehicle_to_person: OpenMap<VehicleId, PersonId>,
    person_to_vehicle: HashMap<PersonId, VehicleId>,

    trips:             Vec<Trip>,
    activities:        Vec<ActivityEvent>,
    report:            ReduceReport,
    last_time:         f64,
}

impl<'a, L: LinkLengths + ?Sized> EventReducer<'a, L> {
    /// A reducer tracking every private car, with default options.
    pub fn new(lengths: &'a L) -> Self {
        Self {
            lengths,
            filter:            None,
            config:            ReducerConfig::default(),
            open_trips:        OpenMap::default(),
            open_activities:   OpenMap::default(),
            vehicle_to_person: OpenMap::default(),
            person_to_vehicle: HashMap::new(),
            trips:             Vec::new(),
            activities:        Vec::new(),
            report:            ReduceReport::default(),
            last_time:         0.0,
        }
    }

    /// Only open trips for cars in `filter`.  An empty set tracks no vehicle.
    pub fn with_filter(mut self, filter: &'a HashSet<VehicleId>) -> Self {
        self.filter = Some(filter);
        self
    }

    pub fn with_config(mut self, config: ReducerConfig) -> Self {
        self.config = config;
        self
    }

    /// Number of trips currently open.
    pub fn open_trip_count(&self) -> usize {
        self.open_trips.len()
    }

    /// Number of activities currently open.
    pub fn open_activity_count(&self) -> usize {
        self.open_activities.len()
    }

    /// Decode and apply one boundary record.
    ///
    /// Decoding failures follow the configured [`MalformedPolicy`]; with
    /// `Skip` this never returns an error.
    pub fn push_raw(&mut self, raw: RawEvent) -> EventResult<()> {
        match raw.decode() {
            Ok(event) => {
                self.push(event);
                Ok(())
            }
            Err(err) => {
                self.report.events_seen += 1;
                match self.config.malformed {
                    MalformedPolicy::Skip => {
                        tracing::debug!(record = self.report.events_seen, error = %err, "skipping malformed event");
                        self.report.malformed_skipped += 1;
                        Ok(())
                    }
                    MalformedPolicy::Abort => Err(EventError::Malformed {
                        record: self.report.events_seen,
                        source: Box::new(err),
                    }),
                }
            }
        }
    }

    /// Apply one decoded event.
    pub fn push(&mut self, event: Event) {
        self.report.events_seen += 1;

        if let Some(t) = event.time() {
            if t < self.last_time {
                self.report.out_of_order += 1;
            } else {
                self.last_time = t;
            }
        }

        match event {
            Event::PersonEntersVehicle { person, vehicle, .. } => {
                self.on_boarding(person, vehicle);
            }
            Event::VehicleEntersTraffic { time, vehicle, link } => {
                if !self.is_tracked(&vehicle) {
                    return;
                }
                if self.open_trips.contains_key(&vehicle) {
                    self.report.reentries_ignored += 1;
                    return;
                }
                let person = self
                    .vehicle_to_person
                    .get(&vehicle)
                    .cloned()
                    .unwrap_or_else(|| PersonId(vehicle.0.clone()));
                self.open_trips
                    .insert(vehicle.clone(), OpenTrip::new(person, vehicle, time, link));
            }
            Event::LinkEntered { vehicle, link, .. } => {
                if let Some(open) = self.open_trips.get_mut(&vehicle) {
                    if let Some(length) = self.lengths.length(link.as_str()) {
                        open.advance(link, length);
                    }
                }
            }
            Event::VehicleLeavesTraffic { time, vehicle, link } => {
                if let Some(open) = self.open_trips.remove(&vehicle) {
                    if time <= open.t_start {
                        self.report.zero_duration_trips += 1;
                        return;
                    }
                    self.trips.push(open.close(time, link));
                }
            }
            Event::ActivityStart { time, person, act_type, link } => {
                self.open_activities
                    .insert(person, OpenActivity { act_type, link_id: link, t_start: time });
            }
            Event::ActivityEnd { time, person } => match self.open_activities.remove(&person) {
                Some(open) => self.activities.push(open.close(person, time)),
                None => self.report.activity_ends_without_start += 1,
            },
            Event::Ignored => {
                self.report.events_ignored += 1;
            }
        }
    }

    /// End of log: discard open entities and return the results.
    pub fn finish(mut self) -> ReducedLog {
        self.report.stuck_trips      = self.open_trips.len();
        self.report.stuck_activities = self.open_activities.len();
        self.report.trips            = self.trips.len();
        self.report.activities       = self.activities.len();

        let r = &self.report;
        if r.stuck_trips > 0 {
            tracing::warn!(stuck_trips = r.stuck_trips, "vehicles had unclosed trips (stuck agents), discarded");
        }
        if r.stuck_activities > 0 {
            tracing::warn!(stuck_activities = r.stuck_activities, "persons had unclosed activities, discarded");
        }
        if r.malformed_skipped > 0 {
            tracing::warn!(malformed = r.malformed_skipped, "malformed events skipped");
        }
        if r.out_of_order > 0 {
            tracing::warn!(out_of_order = r.out_of_order, "events arrived out of time order");
        }
        tracing::info!(
            events   = r.events_seen,
            trips    = r.trips,
            vehicles = self.trips.iter().map(|t| &t.vehicle_id).collect::<HashSet<_>>().len(),
            persons  = self.person_to_vehicle.len(),
            activities = r.activities,
            "event log reduced"
        );

        ReducedLog {
            trips:             self.trips,
            activities:        self.activities,
            person_to_vehicle: self.person_to_vehicle,
            report:            self.report,
        }
    }

    // ── Private helpers ───────────────────────────────────────────────────

    /// First occupant of a car is its driver; later boardings are passengers.
    fn on_boarding(&mut self, person: PersonId, vehicle: VehicleId) {
        if TransportMode::of_vehicle(&vehicle) != TransportMode::Car
            || self.vehicle_to_person.contains_key(&vehicle)
        {
            return;
        }
        self.person_to_vehicle.insert(person.clone(), vehicle.clone());
        self.vehicle_to_person.insert(vehicle, person);
    }

    fn is_tracked(&self, vehicle: &VehicleId) -> bool {
        TransportMode::of_vehicle(vehicle) == TransportMode::Car
            && self.filter.is_none_or(|f| f.contains(vehicle))
    }
}

// ── Driver ────────────────────────────────────────────────────────────────────

/// Reduce a whole event stream.
///
/// `events` is consumed lazily, one record at a time; pair it with
/// [`read_events_csv`](crate::read_events_csv) to stream a file of any size.
/// Errors from the stream itself (I/O, unreadable CSV rows) are always fatal.
pub fn reduce<I, L>(
    events:  I,
    lengths: &L,
    filter:  Option<&HashSet<VehicleId>>,
    config:  ReducerConfig,
) -> EventResult<ReducedLog>
where
    I: IntoIterator<Item = EventResult<RawEvent>>,
    L: LinkLengths + ?Sized,
{
    let mut reducer = EventReducer::new(lengths).with_config(config);
    if let Some(f) = filter {
        reducer = reducer.with_filter(f);
    }
    for raw in events {
        reducer.push_raw(raw?)?;
    }
    Ok(reducer.finish())
}
