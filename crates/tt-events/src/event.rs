//! Event records: the string-typed boundary form and the typed form the
//! reducer consumes.
//!
//! Every event in the log shares one loose shape (`type`, `time`, optional
//! attributes).  [`RawEvent::decode`] turns that into an [`Event`] with one
//! variant per event type the reducer uses, carrying exactly the fields that
//! type requires.  Everything else collapses into [`Event::Ignored`], so a
//! missing attribute is caught once at decode time rather than at each use.

use serde::Deserialize;

use tt_core::{LinkId, PersonId, VehicleId, UNKNOWN};

use crate::{EventError, EventResult};

// ── Event type strings ────────────────────────────────────────────────────────

pub const PERSON_ENTERS_VEHICLE:  &str = "PersonEntersVehicle";
pub const VEHICLE_ENTERS_TRAFFIC: &str = "vehicle enters traffic";
pub const ENTERED_LINK:           &str = "entered link";
pub const VEHICLE_LEAVES_TRAFFIC: &str = "vehicle leaves traffic";
pub const ACTIVITY_START:         &str = "actstart";
pub const ACTIVITY_END:           &str = "actend";

// ── RawEvent ──────────────────────────────────────────────────────────────────

/// One event exactly as it appears at the input boundary.
///
/// All attributes are strings; absent ones are `None`.
#[derive(Clone, Debug, Default, PartialEq, Deserialize)]
pub struct RawEvent {
    #[serde(rename = "type")]
    pub kind:     String,
    #[serde(default)]
    pub time:     Option<String>,
    #[serde(default)]
    pub person:   Option<String>,
    #[serde(default)]
    pub vehicle:  Option<String>,
    #[serde(default)]
    pub link:     Option<String>,
    #[serde(default, rename = "actType")]
    pub act_type: Option<String>,
}

impl RawEvent {
    /// Start a raw event of type `kind` at `time` with no attributes.
    pub fn new(kind: &str, time: f64) -> Self {
        Self {
            kind: kind.to_owned(),
            time: Some(time.to_string()),
            ..Self::default()
        }
    }

    pub fn person(mut self, person: &str) -> Self {
        self.person = Some(person.to_owned());
        self
    }

    pub fn vehicle(mut self, vehicle: &str) -> Self {
        self.vehicle = Some(vehicle.to_owned());
        self
    }

    pub fn link(mut self, link: &str) -> Self {
        self.link = Some(link.to_owned());
        self
    }

    pub fn act_type(mut self, act_type: &str) -> Self {
        self.act_type = Some(act_type.to_owned());
        self
    }

    /// Decode into a typed [`Event`].
    ///
    /// Unrecognised types decode to [`Event::Ignored`] without inspecting any
    /// attribute.  For recognised types, `time` must be a finite,
    /// non-negative number and the type's required attributes must be
    /// present.  `entered link` events lacking a vehicle or link (walk legs)
    /// are ignored rather than rejected.
    pub fn decode(self) -> EventResult<Event> {
        let event_type: &'static str = match self.kind.as_str() {
            PERSON_ENTERS_VEHICLE  => PERSON_ENTERS_VEHICLE,
            VEHICLE_ENTERS_TRAFFIC => VEHICLE_ENTERS_TRAFFIC,
            ENTERED_LINK           => ENTERED_LINK,
            VEHICLE_LEAVES_TRAFFIC => VEHICLE_LEAVES_TRAFFIC,
            ACTIVITY_START         => ACTIVITY_START,
            ACTIVITY_END           => ACTIVITY_END,
            _                      => return Ok(Event::Ignored),
        };

        if event_type == ENTERED_LINK && (self.vehicle.is_none() || self.link.is_none()) {
            return Ok(Event::Ignored);
        }

        let time = parse_time(event_type, self.time.as_deref())?;

        let event = match event_type {
            PERSON_ENTERS_VEHICLE => Event::PersonEntersVehicle {
                time,
                person:  PersonId(required(event_type, "person", self.person)?),
                vehicle: VehicleId(required(event_type, "vehicle", self.vehicle)?),
            },
            VEHICLE_ENTERS_TRAFFIC => Event::VehicleEntersTraffic {
                time,
                vehicle: VehicleId(required(event_type, "vehicle", self.vehicle)?),
                link:    LinkId(required(event_type, "link", self.link)?),
            },
            ENTERED_LINK => Event::LinkEntered {
                time,
                vehicle: VehicleId(required(event_type, "vehicle", self.vehicle)?),
                link:    LinkId(required(event_type, "link", self.link)?),
            },
            VEHICLE_LEAVES_TRAFFIC => Event::VehicleLeavesTraffic {
                time,
                vehicle: VehicleId(required(event_type, "vehicle", self.vehicle)?),
                link:    LinkId(required(event_type, "link", self.link)?),
            },
            ACTIVITY_START => Event::ActivityStart {
                time,
                person:   PersonId(required(event_type, "person", self.person)?),
                act_type: optional(self.act_type),
                link:     LinkId(optional(self.link)),
            },
            _ => Event::ActivityEnd {
                time,
                person: PersonId(required(event_type, "person", self.person)?),
            },
        };
        Ok(event)
    }
}

// ── Event ─────────────────────────────────────────────────────────────────────

/// A decoded event.  `time` is seconds from midnight.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// A person boards a vehicle (as driver or passenger).
    PersonEntersVehicle { time: f64, person: PersonId, vehicle: VehicleId },
    /// A vehicle departs onto the network: a trip begins.
    VehicleEntersTraffic { time: f64, vehicle: VehicleId, link: LinkId },
    /// A vehicle moves onto the next link of its route.
    LinkEntered { time: f64, vehicle: VehicleId, link: LinkId },
    /// A vehicle leaves the network: the trip ends.
    VehicleLeavesTraffic { time: f64, vehicle: VehicleId, link: LinkId },
    /// A person begins an activity.  Missing type/link default to `"unknown"`.
    ActivityStart { time: f64, person: PersonId, act_type: String, link: LinkId },
    /// A person ends their current activity.
    ActivityEnd { time: f64, person: PersonId },
    /// Any event type the reducer does not use.
    Ignored,
}

impl Event {
    /// Timestamp, or `None` for [`Event::Ignored`].
    pub fn time(&self) -> Option<f64> {
        match self {
            Event::PersonEntersVehicle { time, .. }
            | Event::VehicleEntersTraffic { time, .. }
            | Event::LinkEntered { time, .. }
            | Event::VehicleLeavesTraffic { time, .. }
            | Event::ActivityStart { time, .. }
            | Event::ActivityEnd { time, .. } => Some(*time),
            Event::Ignored => None,
        }
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn parse_time(event_type: &'static str, raw: Option<&str>) -> EventResult<f64> {
    let Some(raw) = raw else {
        return Err(EventError::MissingAttribute { event_type, attribute: "time" });
    };
    match raw.trim().parse::<f64>() {
        Ok(t) if t.is_finite() && t >= 0.0 => Ok(t),
        _ => Err(EventError::InvalidTime { event_type, value: raw.to_owned() }),
    }
}

fn required(
    event_type: &'static str,
    attribute:  &'static str,
    value:      Option<String>,
) -> EventResult<String> {
    match value {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(EventError::MissingAttribute { event_type, attribute }),
    }
}

fn optional(value: Option<String>) -> String {
    value
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| UNKNOWN.to_owned())
}
