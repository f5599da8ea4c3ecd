//! Trips → gap-free per-vehicle episode sequences.
//!
//! Stitching is a pure function of the trip list: the same input always
//! yields the same timetable, and vehicles are independent of one another.
//! With the `parallel` feature each vehicle is stitched on Rayon's pool; the
//! result is concatenated in vehicle order either way.

use std::collections::BTreeMap;

use tt_core::{DAY_END_S, DAY_START_S, VehicleId};
use tt_events::Trip;

use crate::episode::{Episode, EpisodeTimetable};
use crate::{TimetableError, TimetableResult};

/// Build the day timetable of every vehicle that appears in `trips`.
///
/// Vehicles without trips produce no episodes.  Fails on the first vehicle
/// whose trips overlap or whose trip interval is not strictly increasing.
pub fn stitch(trips: &[Trip]) -> TimetableResult<EpisodeTimetable> {
    let mut by_vehicle: BTreeMap<&VehicleId, Vec<&Trip>> = BTreeMap::new();
    for trip in trips {
        by_vehicle.entry(&trip.vehicle_id).or_default().push(trip);
    }
    let vehicles = by_vehicle.len();

    #[cfg(not(feature = "parallel"))]
    let per_vehicle: Vec<Vec<Episode>> = by_vehicle
        .into_values()
        .map(stitch_vehicle)
        .collect::<TimetableResult<_>>()?;

    #[cfg(feature = "parallel")]
    let per_vehicle: Vec<Vec<Episode>> = {
        use rayon::prelude::*;

        let groups: Vec<Vec<&Trip>> = by_vehicle.into_values().collect();
        groups
            .into_par_iter()
            .map(stitch_vehicle)
            .collect::<TimetableResult<_>>()?
    };

    let episodes: Vec<Episode> = per_vehicle.into_iter().flatten().collect();
    tracing::info!(vehicles, trips = trips.len(), episodes = episodes.len(), "timetable stitched");

    Ok(EpisodeTimetable::from_sorted(episodes))
}

/// Stitch one vehicle's trips.  `trips` is non-empty and all share a vehicle.
fn stitch_vehicle(mut trips: Vec<&Trip>) -> TimetableResult<Vec<Episode>> {
    // Stable sort; equal start times are an overlap and rejected below.
    trips.sort_by(|a, b| a.t_start.total_cmp(&b.t_start));

    let mut episodes = Vec::with_capacity(2 * trips.len() + 1);
    let mut prev: Option<&Trip> = None;

    for trip in trips {
        let increasing = trip.t_end > trip.t_start;
        if !increasing {
            return Err(TimetableError::InvalidTrip {
                vehicle: trip.vehicle_id.clone(),
                t_start: trip.t_start,
                t_end:   trip.t_end,
            });
        }

        match prev {
            None if trip.t_start > DAY_START_S => {
                episodes.push(Episode::parked(
                    trip.vehicle_id.clone(),
                    DAY_START_S,
                    trip.t_start,
                    trip.from_link.clone(),
                ));
            }
            None => {}
            Some(p) => {
                if trip.t_start < p.t_end {
                    return Err(TimetableError::OverlappingTrips {
                        vehicle:    trip.vehicle_id.clone(),
                        prev_end:   p.t_end,
                        next_start: trip.t_start,
                    });
                }
                // Interior gap, emitted even when zero-length.
                episodes.push(Episode::parked(
                    trip.vehicle_id.clone(),
                    p.t_end,
                    trip.t_start,
                    p.to_link.clone(),
                ));
            }
        }

        episodes.push(Episode::driving(
            trip.vehicle_id.clone(),
            trip.t_start,
            trip.t_end,
            trip.distance_m,
        ));
        prev = Some(trip);
    }

    if let Some(last) = prev {
        if last.t_end < DAY_END_S {
            episodes.push(Episode::parked(
                last.vehicle_id.clone(),
                last.t_end,
                DAY_END_S,
                last.to_link.clone(),
            ));
        }
    }

    Ok(episodes)
}
