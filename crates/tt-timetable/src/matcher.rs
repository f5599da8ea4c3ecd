//! Attach a planned activity (or a topology fallback) to every parked episode.
//!
//! # Matching rule
//!
//! A parked episode of vehicle `"<person>:car"` on link `L` over
//! `[t_start, t_end)` matches a plan activity of `<person>` on `L` whose start
//! time lies strictly inside `(t_start, t_end)`.  Several such activities are
//! resolved by the candidate order below; the episode is then counted as
//! ambiguous.
//!
//! ```text
//! candidates per (person, link):  start_time_s ↑, activity_type ↑, input order
//! ```
//!
//! Without a match the episode gets activity type `"unknown"` and the
//! coordinates of `L`'s downstream node, or NaN if the topology cannot
//! resolve them.  Driving episodes pass through with no assignment.

use std::collections::HashMap;

use tt_core::{Coord, LinkId, PersonId, TransportMode, UNKNOWN};
use tt_network::TopologyLookup;

use crate::episode::{Episode, EpisodeTimetable};
use crate::plan::PlanActivity;

// ── Output types ──────────────────────────────────────────────────────────────

/// Where an [`ActivityAssignment`] came from.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum MatchSource {
    /// A plan activity matched on person, link and time.
    Plan,
    /// No plan match; coordinates from the link's downstream node.
    LinkEndpoint,
    /// No plan match and no topology coordinates; `coord` is NaN.
    Unresolved,
}

/// The activity assigned to a parked episode.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityAssignment {
    pub activity_type: String,
    pub coord:         Coord,
    pub source:        MatchSource,
}

impl ActivityAssignment {
    fn fallback(coord: Option<Coord>) -> Self {
        let (coord, source) = match coord {
            Some(c) => (c, MatchSource::LinkEndpoint),
            None    => (Coord::UNRESOLVED, MatchSource::Unresolved),
        };
        Self { activity_type: UNKNOWN.to_owned(), coord, source }
    }
}

/// An episode plus its activity (`None` for driving episodes).
#[derive(Clone, Debug, PartialEq)]
pub struct EnrichedEpisode {
    pub episode:  Episode,
    pub activity: Option<ActivityAssignment>,
}

/// Enriched episodes in the same `(vehicle_id, t_start)` order as the input
/// timetable.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct EnrichedTimetable {
    episodes: Vec<EnrichedEpisode>,
}

impl EnrichedTimetable {
    pub fn episodes(&self) -> &[EnrichedEpisode] {
        &self.episodes
    }

    pub fn into_episodes(self) -> Vec<EnrichedEpisode> {
        self.episodes
    }

    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, EnrichedEpisode> {
        self.episodes.iter()
    }

    pub fn for_vehicle(&self, vehicle: &str) -> &[EnrichedEpisode] {
        let lo = self.episodes.partition_point(|e| e.episode.vehicle_id.as_str() < vehicle);
        let hi = self.episodes.partition_point(|e| e.episode.vehicle_id.as_str() <= vehicle);
        &self.episodes[lo..hi]
    }
}

impl<'a> IntoIterator for &'a EnrichedTimetable {
    type Item     = &'a EnrichedEpisode;
    type IntoIter = std::slice::Iter<'a, EnrichedEpisode>;

    fn into_iter(self) -> Self::IntoIter {
        self.episodes.iter()
    }
}

/// Matching counters.
/// `matched + fallback + fallback_unresolved + zero_length == parked`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct MatchReport {
    pub parked:              usize,
    pub matched:             usize,
    /// Fallbacks placed at the link's downstream node.
    pub fallback:            usize,
    /// Fallbacks with NaN coordinates.
    pub fallback_unresolved: usize,
    /// Parked episodes with no duration.  Their window holds no candidate, so
    /// they carry a fallback assignment but are not counted as fallbacks.
    pub zero_length:         usize,
    /// Matched episodes that had more than one candidate in their window.
    pub ambiguous:           usize,
}

// ── Plan index ────────────────────────────────────────────────────────────────

#[derive(Clone, Debug)]
struct Candidate {
    start_time_s:  f64,
    activity_type: String,
    coord:         Coord,
}

/// person → link → candidates in tie-break order.
type PlanIndex = HashMap<PersonId, HashMap<LinkId, Vec<Candidate>>>;

fn build_index<'p>(plans: impl IntoIterator<Item = &'p PlanActivity>) -> PlanIndex {
    let mut index = PlanIndex::new();
    for plan in plans {
        let Some(link) = &plan.link_id else { continue };
        index
            .entry(plan.person_id.clone())
            .or_default()
            .entry(link.clone())
            .or_default()
            .push(Candidate {
                start_time_s:  plan.start_time_s,
                activity_type: plan.activity_type.clone(),
                coord:         plan.coord,
            });
    }
    for candidates in index.values_mut().flat_map(HashMap::values_mut) {
        // Stable: ties on both keys keep input order.
        candidates.sort_by(|a, b| {
            a.start_time_s
                .total_cmp(&b.start_time_s)
                .then_with(|| a.activity_type.cmp(&b.activity_type))
        });
    }
    index
}

// ── ActivityMatcher ───────────────────────────────────────────────────────────

/// Plan index plus topology, reusable across timetables.
pub struct ActivityMatcher<'a, T: TopologyLookup + Sync + ?Sized> {
    index:    PlanIndex,
    topology: &'a T,
}

impl<'a, T: TopologyLookup + Sync + ?Sized> ActivityMatcher<'a, T> {
    /// Index `plans` by `(person, link)`.  Activities without a link are
    /// left out.
    pub fn new<'p>(plans: impl IntoIterator<Item = &'p PlanActivity>, topology: &'a T) -> Self {
        Self { index: build_index(plans), topology }
    }

    /// Number of persons with at least one indexed activity.
    pub fn person_count(&self) -> usize {
        self.index.len()
    }

    /// Enrich every episode of `timetable`, preserving its order.
    pub fn match_timetable(&self, timetable: EpisodeTimetable) -> (EnrichedTimetable, MatchReport) {
        let episodes = timetable.into_episodes();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<(EnrichedEpisode, bool)> =
            episodes.into_iter().map(|e| self.match_episode(e)).collect();

        #[cfg(feature = "parallel")]
        let results: Vec<(EnrichedEpisode, bool)> = {
            use rayon::prelude::*;
            episodes.into_par_iter().map(|e| self.match_episode(e)).collect()
        };

        let mut report = MatchReport::default();
        let mut enriched = Vec::with_capacity(results.len());
        for (episode, ambiguous) in results {
            if let Some(activity) = &episode.activity {
                report.parked += 1;
                if episode.episode.t_end <= episode.episode.t_start {
                    report.zero_length += 1;
                } else {
                    match activity.source {
                        MatchSource::Plan         => report.matched += 1,
                        MatchSource::LinkEndpoint => report.fallback += 1,
                        MatchSource::Unresolved   => report.fallback_unresolved += 1,
                    }
                }
            }
            report.ambiguous += usize::from(ambiguous);
            enriched.push(episode);
        }

        if report.ambiguous > 0 {
            tracing::warn!(
                ambiguous = report.ambiguous,
                "parked episodes had several plan candidates; earliest start chosen"
            );
        }
        tracing::info!(
            parked     = report.parked,
            matched    = report.matched,
            fallback   = report.fallback,
            unresolved = report.fallback_unresolved,
            zero_length = report.zero_length,
            "activities matched"
        );

        (EnrichedTimetable { episodes: enriched }, report)
    }

    /// Enrich one episode.  The flag is `true` when more than one candidate
    /// fell inside the window.
    pub fn match_episode(&self, episode: Episode) -> (EnrichedEpisode, bool) {
        let Some(link) = episode.link_id() else {
            return (EnrichedEpisode { episode, activity: None }, false);
        };

        let person = person_of(&episode);
        let (t0, t1) = (episode.t_start, episode.t_end);
        let mut in_window = self
            .index
            .get(person.as_str())
            .and_then(|links| links.get(link.as_str()))
            .into_iter()
            .flatten()
            .filter(|c| c.start_time_s > t0 && c.start_time_s < t1);

        let (activity, ambiguous) = match in_window.next() {
            Some(c) => (
                ActivityAssignment {
                    activity_type: c.activity_type.clone(),
                    coord:         c.coord,
                    source:        MatchSource::Plan,
                },
                in_window.next().is_some(),
            ),
            None => {
                let coord = self.topology.to_node_coordinates(link.as_str());
                tracing::debug!(
                    vehicle = %episode.vehicle_id,
                    link    = %link,
                    t_start = t0,
                    resolved = coord.is_some(),
                    "no plan activity for parked episode"
                );
                (ActivityAssignment::fallback(coord), false)
            }
        };

        (EnrichedEpisode { episode, activity: Some(activity) }, ambiguous)
    }
}

/// Match `timetable` against `plans` in one call.
pub fn match_activities<T: TopologyLookup + Sync + ?Sized>(
    timetable: EpisodeTimetable,
    plans:     &[PlanActivity],
    topology:  &T,
) -> (EnrichedTimetable, MatchReport) {
    ActivityMatcher::new(plans, topology).match_timetable(timetable)
}

/// The driver of an episode's vehicle: the car id without its suffix, or the
/// whole id when it carries no car marker.
fn person_of(episode: &Episode) -> PersonId {
    match TransportMode::split_vehicle_id(&episode.vehicle_id) {
        (Some(person), TransportMode::Car) => person,
        _ => PersonId(episode.vehicle_id.0.clone()),
    }
}
