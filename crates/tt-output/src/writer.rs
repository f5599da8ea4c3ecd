//! The `TimetableWriter` trait implemented by all backend writers.

use tt_events::{ActivityEvent, Trip};
use tt_timetable::EnrichedTimetable;

use crate::{ActivityRow, EpisodeRow, OutputResult, TripRow};

/// Trait implemented by CSV, SQLite, and Parquet writers.
///
/// Each `write_*` call appends one batch; callers may split a table across
/// several calls.
pub trait TimetableWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()>;

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()>;

    fn write_episodes(&mut self, rows: &[EpisodeRow]) -> OutputResult<()>;

    /// Flush and close all underlying file handles.
    ///
    /// Idempotent.
    fn finish(&mut self) -> OutputResult<()>;
}

impl<W: TimetableWriter + ?Sized> TimetableWriter for Box<W> {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        (**self).write_trips(rows)
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        (**self).write_activities(rows)
    }

    fn write_episodes(&mut self, rows: &[EpisodeRow]) -> OutputResult<()> {
        (**self).write_episodes(rows)
    }

    fn finish(&mut self) -> OutputResult<()> {
        (**self).finish()
    }
}

/// Write all three tables and finish the writer.
pub fn write_timetable<W: TimetableWriter + ?Sized>(
    writer:     &mut W,
    trips:      &[Trip],
    activities: &[ActivityEvent],
    timetable:  &EnrichedTimetable,
) -> OutputResult<()> {
    let trip_rows: Vec<TripRow> = trips.iter().map(TripRow::from).collect();
    writer.write_trips(&trip_rows)?;

    let activity_rows: Vec<ActivityRow> = activities.iter().map(ActivityRow::from).collect();
    writer.write_activities(&activity_rows)?;

    let episode_rows: Vec<EpisodeRow> = timetable.iter().map(EpisodeRow::from).collect();
    writer.write_episodes(&episode_rows)?;

    writer.finish()?;
    tracing::info!(
        trips      = trip_rows.len(),
        activities = activity_rows.len(),
        episodes   = episode_rows.len(),
        "output written"
    );
    Ok(())
}
