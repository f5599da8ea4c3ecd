//! `tt-output` — timetable writers.
//!
//! Three backends are provided behind Cargo features:
//!
//! | Feature   | Backend | Files created                                                        |
//! |-----------|---------|----------------------------------------------------------------------|
//! | *(none)*  | CSV     | `trips.csv`, `activities.csv`, `vehicle_timetable.csv`               |
//! | `sqlite`  | SQLite  | `timetable.db`                                                       |
//! | `parquet` | Parquet | `trips.parquet`, `activities.parquet`, `vehicle_timetable.parquet`   |
//!
//! All backends implement [`TimetableWriter`].  [`write_timetable`] converts
//! pipeline results to rows and drives any backend through one full write.
//!
//! # Usage
//!
//! ```rust,ignore
//! use tt_output::{CsvWriter, write_timetable};
//!
//! let mut writer = CsvWriter::new(Path::new("./output"))?;
//! write_timetable(&mut writer, &log.trips, &log.activities, &enriched)?;
//! ```

pub mod csv;
pub mod error;
pub mod row;
pub mod writer;

#[cfg(feature = "sqlite")]
pub mod sqlite;

#[cfg(feature = "parquet")]
pub mod parquet;


pub use crate::csv::CsvWriter;
pub use error::{OutputError, OutputResult};
pub use row::{ActivityRow, EpisodeRow, TripRow};
pub use writer::{TimetableWriter, write_timetable};

#[cfg(feature = "sqlite")]
pub use sqlite::SqliteWriter;

#[cfg(feature = "parquet")]
pub use parquet::ParquetWriter;
