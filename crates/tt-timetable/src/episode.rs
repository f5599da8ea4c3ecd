//! Episodes: the parked/driving intervals that make up a vehicle's day.

use tt_core::{LinkId, VehicleId};

// ── Episode ───────────────────────────────────────────────────────────────────

/// What the vehicle was doing during an episode.
#[derive(Clone, Debug, PartialEq)]
pub enum EpisodeKind {
    /// Stationary on `link_id`.
    Parked { link_id: LinkId },
    /// On the network, covering `distance_m`.
    Driving { distance_m: f64 },
}

/// One half-open interval `[t_start, t_end)` of a vehicle's timeline.
#[derive(Clone, Debug, PartialEq)]
pub struct Episode {
    pub vehicle_id: VehicleId,
    pub t_start:    f64,
    pub t_end:      f64,
    pub kind:       EpisodeKind,
}

impl Episode {
    pub fn parked(vehicle_id: VehicleId, t_start: f64, t_end: f64, link_id: LinkId) -> Self {
        Self { vehicle_id, t_start, t_end, kind: EpisodeKind::Parked { link_id } }
    }

    pub fn driving(vehicle_id: VehicleId, t_start: f64, t_end: f64, distance_m: f64) -> Self {
        Self { vehicle_id, t_start, t_end, kind: EpisodeKind::Driving { distance_m } }
    }

    #[inline]
    pub fn duration_s(&self) -> f64 {
        self.t_end - self.t_start
    }

    #[inline]
    pub fn is_parked(&self) -> bool {
        matches!(self.kind, EpisodeKind::Parked { .. })
    }

    /// `"parked"` or `"driving"`, as written to output tables.
    pub fn episode_type(&self) -> &'static str {
        match self.kind {
            EpisodeKind::Parked { .. }  => "parked",
            EpisodeKind::Driving { .. } => "driving",
        }
    }

    /// Parking link, or `None` for a driving episode.
    pub fn link_id(&self) -> Option<&LinkId> {
        match &self.kind {
            EpisodeKind::Parked { link_id } => Some(link_id),
            EpisodeKind::Driving { .. }     => None,
        }
    }

    /// Distance driven, or `None` for a parked episode.
    pub fn distance_m(&self) -> Option<f64> {
        match self.kind {
            EpisodeKind::Driving { distance_m } => Some(distance_m),
            EpisodeKind::Parked { .. }          => None,
        }
    }
}

// ── EpisodeTimetable ──────────────────────────────────────────────────────────

/// Every vehicle's episodes, ordered by `(vehicle_id, t_start)`.
///
/// Each vehicle's episodes form one contiguous run, so per-vehicle access is
/// a binary search rather than a scan.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EpisodeTimetable {
    episodes: Vec<Episode>,
}

impl EpisodeTimetable {
    /// Wrap episodes that are already ordered by `(vehicle_id, t_start)`.
    pub(crate) fn from_sorted(episodes: Vec<Episode>) -> Self {
        debug_assert!(
            episodes.windows(2).all(|w| w[0].vehicle_id <= w[1].vehicle_id),
            "episodes must be grouped by vehicle in ascending order"
        );
        Self { episodes }
    }

    pub fn episodes(&self) -> &[Episode] {
        &self.episodes
    }

    pub fn into_episodes(self) -> Vec<Episode> {
        self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Episode> {
        self.episodes.iter()
    }

    /// The episodes of one vehicle, in time order.  Empty if the vehicle made
    /// no trips.
    pub fn for_vehicle(&self, vehicle: &str) -> &[Episode] {
        let lo = self.episodes.partition_point(|e| e.vehicle_id.as_str() < vehicle);
        let hi = self.episodes.partition_point(|e| e.vehicle_id.as_str() <= vehicle);
        &self.episodes[lo..hi]
    }

    /// Number of distinct vehicles.
    pub fn vehicle_count(&self) -> usize {
        self.episodes
            .windows(2)
            .filter(|w| w[0].vehicle_id != w[1].vehicle_id)
            .count()
            + usize::from(!self.episodes.is_empty())
    }

    /// Number of parked episodes across all vehicles.
    pub fn parked_count(&self) -> usize {
        self.episodes.iter().filter(|e| e.is_parked()).count()
    }
}

impl<'a> IntoIterator for &'a EpisodeTimetable {
    type Item     = &'a Episode;
    type IntoIter = std::slice::Iter<'a, Episode>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}
