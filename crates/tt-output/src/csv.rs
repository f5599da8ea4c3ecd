//! CSV output backend.
//!
//! Creates three files in the configured output directory:
//! - `trips.csv`
//! - `activities.csv`
//! - `vehicle_timetable.csv`
//!
//! Absent optional columns are written as empty fields; unresolved
//! coordinates as `NaN`.

use std::fs::File;
use std::path::Path;

use csv::Writer;

use crate::writer::TimetableWriter;
use crate::{ActivityRow, EpisodeRow, OutputResult, TripRow};

pub const TRIP_HEADER: [&str; 8] = [
    "person_id", "vehicle_id", "t_start", "t_end", "duration_s", "distance_m", "from_link", "to_link",
];

pub const ACTIVITY_HEADER: [&str; 6] = [
    "person_id", "activity_type", "link_id", "t_start", "t_end", "duration_s",
];

pub const EPISODE_HEADER: [&str; 10] = [
    "vehicle_id", "episode_type", "t_start", "t_end", "duration_s",
    "link_id", "distance_m", "activity_type", "x", "y",
];

/// Writes timetable output to three CSV files.
pub struct CsvWriter {
    trips:      Writer<File>,
    activities: Writer<File>,
    episodes:   Writer<File>,
    finished:   bool,
}

impl CsvWriter {
    /// Create (or truncate) the three CSV files in `dir` and write the header
    /// rows.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let mut trips = Writer::from_path(dir.join("trips.csv"))?;
        trips.write_record(TRIP_HEADER)?;

        let mut activities = Writer::from_path(dir.join("activities.csv"))?;
        activities.write_record(ACTIVITY_HEADER)?;

        let mut episodes = Writer::from_path(dir.join("vehicle_timetable.csv"))?;
        episodes.write_record(EPISODE_HEADER)?;

        Ok(Self {
            trips,
            activities,
            episodes,
            finished: false,
        })
    }
}

fn opt<T: ToString>(v: Option<T>) -> String {
    v.map(|v| v.to_string()).unwrap_or_default()
}

impl TimetableWriter for CsvWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        for row in rows {
            self.trips.write_record(&[
                row.person_id.clone(),
                row.vehicle_id.clone(),
                row.t_start.to_string(),
                row.t_end.to_string(),
                row.duration_s.to_string(),
                row.distance_m.to_string(),
                row.from_link.clone(),
                row.to_link.clone(),
            ])?;
        }
        Ok(())
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        for row in rows {
            self.activities.write_record(&[
                row.person_id.clone(),
                row.activity_type.clone(),
                row.link_id.clone(),
                row.t_start.to_string(),
                row.t_end.to_string(),
                row.duration_s.to_string(),
            ])?;
        }
        Ok(())
    }

    fn write_episodes(&mut self, rows: &[EpisodeRow]) -> OutputResult<()> {
        for row in rows {
            self.episodes.write_record(&[
                row.vehicle_id.clone(),
                row.episode_type.to_owned(),
                row.t_start.to_string(),
                row.t_end.to_string(),
                row.duration_s.to_string(),
                opt(row.link_id.as_deref()),
                opt(row.distance_m),
                opt(row.activity_type.as_deref()),
                opt(row.x),
                opt(row.y),
            ])?;
        }
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.trips.flush()?;
        self.activities.flush()?;
        self.episodes.flush()?;
        Ok(())
    }
}
