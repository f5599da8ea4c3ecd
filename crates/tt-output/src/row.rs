//! Plain data row types written by output backends.
//!
//! Identifier and activity-type columns are owned strings so a batch of rows
//! stands alone once converted.  Optional episode columns are `None` where the
//! column does not apply to the episode type.

use tt_events::{ActivityEvent, Trip};
use tt_timetable::EnrichedEpisode;

/// One completed trip.
#[derive(Debug, Clone, PartialEq)]
pub struct TripRow {
    pub person_id:  String,
    pub vehicle_id: String,
    pub t_start:    f64,
    pub t_end:      f64,
    pub duration_s: f64,
    pub distance_m: f64,
    pub from_link:  String,
    pub to_link:    String,
}

impl From<&Trip> for TripRow {
    fn from(t: &Trip) -> Self {
        Self {
            person_id:  t.person_id.to_string(),
            vehicle_id: t.vehicle_id.to_string(),
            t_start:    t.t_start,
            t_end:      t.t_end,
            duration_s: t.duration_s(),
            distance_m: t.distance_m,
            from_link:  t.from_link.to_string(),
            to_link:    t.to_link.to_string(),
        }
    }
}

/// One completed activity from the event log.
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityRow {
    pub person_id:     String,
    pub activity_type: String,
    pub link_id:       String,
    pub t_start:       f64,
    pub t_end:         f64,
    pub duration_s:    f64,
}

impl From<&ActivityEvent> for ActivityRow {
    fn from(a: &ActivityEvent) -> Self {
        Self {
            person_id:     a.person_id.to_string(),
            activity_type: a.act_type.clone(),
            link_id:       a.link_id.to_string(),
            t_start:       a.t_start,
            t_end:         a.t_end,
            duration_s:    a.duration_s(),
        }
    }
}

/// One episode of a vehicle timetable.
///
/// | Column          | driving    | parked                           |
/// |-----------------|------------|----------------------------------|
/// | `link_id`       | `None`     | parking link                     |
/// | `distance_m`    | metres     | `None`                           |
/// | `activity_type` | `None`     | matched type or `"unknown"`      |
/// | `x`, `y`        | `None`     | coordinates, NaN when unresolved |
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeRow {
    pub vehicle_id:    String,
    pub episode_type:  &'static str,
    pub t_start:       f64,
    pub t_end:         f64,
    pub duration_s:    f64,
    pub link_id:       Option<String>,
    pub distance_m:    Option<f64>,
    pub activity_type: Option<String>,
    pub x:             Option<f64>,
    pub y:             Option<f64>,
}

impl From<&EnrichedEpisode> for EpisodeRow {
    fn from(e: &EnrichedEpisode) -> Self {
        let ep = &e.episode;
        let activity = e.activity.as_ref();
        Self {
            vehicle_id:    ep.vehicle_id.to_string(),
            episode_type:  ep.episode_type(),
            t_start:       ep.t_start,
            t_end:         ep.t_end,
            duration_s:    ep.duration_s(),
            link_id:       ep.link_id().map(ToString::to_string),
            distance_m:    ep.distance_m(),
            activity_type: activity.map(|a| a.activity_type.clone()),
            x:             activity.map(|a| a.coord.x),
            y:             activity.map(|a| a.coord.y),
        }
    }
}
