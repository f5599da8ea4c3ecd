//! SQLite output backend (feature `sqlite`).
//!
//! Creates a single `timetable.db` file in the configured output directory
//! with three tables: `trips`, `activities` and `vehicle_timetable`.  NaN
//! coordinates are stored as NULL (SQLite has no NaN).

use std::path::Path;

use rusqlite::Connection;

use crate::writer::TimetableWriter;
use crate::{ActivityRow, EpisodeRow, OutputResult, TripRow};

/// Writes timetable output to an SQLite database.
pub struct SqliteWriter {
    conn:     Connection,
    finished: bool,
}

impl SqliteWriter {
    /// Open (or create) `timetable.db` in `dir` and initialise the schema.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let conn = Connection::open(dir.join("timetable.db"))?;

        conn.execute_batch(
            "PRAGMA journal_mode = WAL;
             PRAGMA synchronous  = NORMAL;
             CREATE TABLE IF NOT EXISTS trips (
                 person_id  TEXT NOT NULL,
                 vehicle_id TEXT NOT NULL,
                 t_start    REAL NOT NULL,
                 t_end      REAL NOT NULL,
                 duration_s REAL NOT NULL,
                 distance_m REAL NOT NULL,
                 from_link  TEXT NOT NULL,
                 to_link    TEXT NOT NULL
             );
             CREATE TABLE IF NOT EXISTS activities (
                 person_id     TEXT NOT NULL,
                 activity_type TEXT NOT NULL,
                 link_id       TEXT NOT NULL,
                 t_start       REAL NOT NULL,
                 t_end         REAL NOT NULL,
                 duration_s    REAL NOT NULL
             );
             CREATE TABLE IF NOT EXISTS vehicle_timetable (
                 vehicle_id    TEXT NOT NULL,
                 episode_type  TEXT NOT NULL,
                 t_start       REAL NOT NULL,
                 t_end         REAL NOT NULL,
                 duration_s    REAL NOT NULL,
                 link_id       TEXT,
                 distance_m    REAL,
                 activity_type TEXT,
                 x             REAL,
                 y             REAL
             );
             CREATE INDEX IF NOT EXISTS vehicle_timetable_key
                 ON vehicle_timetable (vehicle_id, t_start);",
        )?;

        Ok(Self { conn, finished: false })
    }
}

/// NaN → NULL.
fn real(v: Option<f64>) -> Option<f64> {
    v.filter(|x| !x.is_nan())
}

impl TimetableWriter for SqliteWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO trips \
                 (person_id, vehicle_id, t_start, t_end, duration_s, distance_m, from_link, to_link) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.person_id,
                    row.vehicle_id,
                    row.t_start,
                    row.t_end,
                    row.duration_s,
                    row.distance_m,
                    row.from_link,
                    row.to_link,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO activities \
                 (person_id, activity_type, link_id, t_start, t_end, duration_s) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.person_id,
                    row.activity_type,
                    row.link_id,
                    row.t_start,
                    row.t_end,
                    row.duration_s,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn write_episodes(&mut self, rows: &[EpisodeRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let tx = self.conn.unchecked_transaction()?;
        {
            let mut stmt = tx.prepare_cached(
                "INSERT INTO vehicle_timetable \
                 (vehicle_id, episode_type, t_start, t_end, duration_s, \
                  link_id, distance_m, activity_type, x, y) \
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
            )?;
            for row in rows {
                stmt.execute(rusqlite::params![
                    row.vehicle_id,
                    row.episode_type,
                    row.t_start,
                    row.t_end,
                    row.duration_s,
                    row.link_id,
                    row.distance_m,
                    row.activity_type,
                    real(row.x),
                    real(row.y),
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        if self.finished {
            return Ok(());
        }
        self.finished = true;
        self.conn
            .execute_batch("PRAGMA wal_checkpoint(TRUNCATE);")?;
        Ok(())
    }
}
