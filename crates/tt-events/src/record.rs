//! Trip and activity records, plus the in-progress forms the reducer keeps
//! while a trip or activity is still open.

use tt_core::{LinkId, PersonId, VehicleId};

// ── Trips ─────────────────────────────────────────────────────────────────────

/// A trip that has entered traffic but not yet left it.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenTrip {
    /// Driver, or the vehicle id itself when no boarding was seen.
    pub person_id:    PersonId,
    pub vehicle_id:   VehicleId,
    pub t_start:      f64,
    pub from_link:    LinkId,
    /// Sum of the lengths of every known link entered so far.
    pub distance_m:   f64,
    /// The last link the vehicle entered.
    pub current_link: LinkId,
}

impl OpenTrip {
    pub fn new(person_id: PersonId, vehicle_id: VehicleId, t_start: f64, link: LinkId) -> Self {
        Self {
            person_id,
            vehicle_id,
            t_start,
            current_link: link.clone(),
            from_link:    link,
            distance_m:   0.0,
        }
    }

    /// Record entry onto `link` of length `length_m`.
    #[inline]
    pub fn advance(&mut self, link: LinkId, length_m: f64) {
        self.distance_m += length_m;
        self.current_link = link;
    }

    /// Close the trip at `t_end` on `to_link`.
    pub fn close(self, t_end: f64, to_link: LinkId) -> Trip {
        Trip {
            person_id:  self.person_id,
            vehicle_id: self.vehicle_id,
            t_start:    self.t_start,
            t_end,
            distance_m: self.distance_m,
            from_link:  self.from_link,
            to_link,
        }
    }
}

/// A completed vehicle movement from traffic entry to traffic exit.
///
/// Invariants: `t_end > t_start`, `distance_m >= 0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Trip {
    pub person_id:  PersonId,
    pub vehicle_id: VehicleId,
    pub t_start:    f64,
    pub t_end:      f64,
    pub distance_m: f64,
    pub from_link:  LinkId,
    pub to_link:    LinkId,
}

impl Trip {
    #[inline]
    pub fn duration_s(&self) -> f64 {
        self.t_end - self.t_start
    }
}

// ── Activities ────────────────────────────────────────────────────────────────

/// An activity that has started but not yet ended.
#[derive(Clone, Debug, PartialEq)]
pub struct OpenActivity {
    pub act_type: String,
    pub link_id:  LinkId,
    pub t_start:  f64,
}

impl OpenActivity {
    /// Close the activity at `t_end`.  Type and link come from the start.
    pub fn close(self, person_id: PersonId, t_end: f64) -> ActivityEvent {
        ActivityEvent {
            person_id,
            act_type: self.act_type,
            link_id:  self.link_id,
            t_start:  self.t_start,
            t_end,
        }
    }
}

/// A completed person activity as observed in the event log.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityEvent {
    pub person_id: PersonId,
    pub act_type:  String,
    pub link_id:   LinkId,
    pub t_start:   f64,
    pub t_end:     f64,
}

impl ActivityEvent {
    #[inline]
    pub fn duration_s(&self) -> f64 {
        self.t_end - self.t_start
    }
}
