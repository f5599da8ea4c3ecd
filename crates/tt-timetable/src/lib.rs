//! `tt-timetable` — per-vehicle day timelines from reconstructed trips.
//!
//! # Crate layout
//!
//! | Module       | Contents                                                   |
//! |--------------|------------------------------------------------------------|
//! | [`episode`]  | `Episode`, `EpisodeKind`, `EpisodeTimetable`               |
//! | [`stitcher`] | `stitch` — trips → gap-free parked/driving sequence        |
//! | [`plan`]     | `PlanActivity`, CSV and MATSim XML plan loaders            |
//! | [`matcher`]  | `ActivityMatcher`, `EnrichedEpisode`, `MatchReport`        |
//! | [`error`]    | `TimetableError`, `TimetableResult<T>`                     |
//!
//! # Day model (summary)
//!
//! For a vehicle with trips `T1 … Tn` sorted by start time:
//!
//! ```text
//! [0, T1.start)          parked  @ T1.from_link   (only if T1.start > 0)
//! [Ti.start, Ti.end)     driving
//! [Ti.end, Ti+1.start)   parked  @ Ti.to_link     (always, even if empty)
//! [Tn.end, 86400)        parked  @ Tn.to_link     (only if Tn.end < 86400)
//! ```
//!
//! # Cargo features
//!
//! | Feature    | Effect                                                 |
//! |------------|--------------------------------------------------------|
//! | `parallel` | Per-vehicle stitching and per-episode matching on Rayon. |

pub mod episode;
pub mod error;
pub mod matcher;
pub mod plan;
pub mod stitcher;


pub use episode::{Episode, EpisodeKind, EpisodeTimetable};
pub use error::{TimetableError, TimetableResult};
pub use matcher::{
    ActivityAssignment, ActivityMatcher, EnrichedEpisode, EnrichedTimetable, MatchReport,
    MatchSource, match_activities,
};
pub use plan::{
    PlanActivity, load_plans, load_plans_csv, load_plans_reader, load_plans_xml,
    load_plans_xml_reader,
};
pub use stitcher::stitch;
