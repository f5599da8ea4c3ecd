//! Parquet output backend (feature `parquet`).
//!
//! Creates three files in the configured output directory:
//! - `trips.parquet`
//! - `activities.parquet`
//! - `vehicle_timetable.parquet`

use std::fs::File;
use std::path::Path;
use std::sync::Arc;

use arrow::array::{ArrayRef, Float64Builder, StringBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use parquet::basic::Compression;
use parquet::file::properties::WriterProperties;

use crate::writer::TimetableWriter;
use crate::{ActivityRow, EpisodeRow, OutputResult, TripRow};

fn trip_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("person_id",  DataType::Utf8,    false),
        Field::new("vehicle_id", DataType::Utf8,    false),
        Field::new("t_start",    DataType::Float64, false),
        Field::new("t_end",      DataType::Float64, false),
        Field::new("duration_s", DataType::Float64, false),
        Field::new("distance_m", DataType::Float64, false),
        Field::new("from_link",  DataType::Utf8,    false),
        Field::new("to_link",    DataType::Utf8,    false),
    ]))
}

fn activity_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("person_id",     DataType::Utf8,    false),
        Field::new("activity_type", DataType::Utf8,    false),
        Field::new("link_id",       DataType::Utf8,    false),
        Field::new("t_start",       DataType::Float64, false),
        Field::new("t_end",         DataType::Float64, false),
        Field::new("duration_s",    DataType::Float64, false),
    ]))
}

fn episode_schema() -> Arc<Schema> {
    Arc::new(Schema::new(vec![
        Field::new("vehicle_id",    DataType::Utf8,    false),
        Field::new("episode_type",  DataType::Utf8,    false),
        Field::new("t_start",       DataType::Float64, false),
        Field::new("t_end",         DataType::Float64, false),
        Field::new("duration_s",    DataType::Float64, false),
        Field::new("link_id",       DataType::Utf8,    true),
        Field::new("distance_m",    DataType::Float64, true),
        Field::new("activity_type", DataType::Utf8,    true),
        Field::new("x",             DataType::Float64, true),
        Field::new("y",             DataType::Float64, true),
    ]))
}

fn snappy_props() -> WriterProperties {
    WriterProperties::builder()
        .set_compression(Compression::SNAPPY)
        .build()
}

fn open(dir: &Path, name: &str, schema: &Arc<Schema>) -> OutputResult<ArrowWriter<File>> {
    let file = File::create(dir.join(name))?;
    Ok(ArrowWriter::try_new(file, Arc::clone(schema), Some(snappy_props()))?)
}

/// A Utf8 column from borrowed strings.
fn utf8<'a>(values: impl Iterator<Item = Option<&'a str>>) -> ArrayRef {
    let mut b = StringBuilder::new();
    for v in values {
        b.append_option(v);
    }
    Arc::new(b.finish())
}

/// A Float64 column.
fn f64s(values: impl Iterator<Item = Option<f64>>) -> ArrayRef {
    let mut b = Float64Builder::new();
    for v in values {
        b.append_option(v);
    }
    Arc::new(b.finish())
}

/// Writes timetable output to three Parquet files.
///
/// `finish()` **must** be called to write the Parquet file footers; files
/// written without calling `finish()` cannot be opened by Parquet readers.
pub struct ParquetWriter {
    trips:           Option<ArrowWriter<File>>,
    activities:      Option<ArrowWriter<File>>,
    episodes:        Option<ArrowWriter<File>>,
    trip_schema:     Arc<Schema>,
    activity_schema: Arc<Schema>,
    episode_schema:  Arc<Schema>,
}

impl ParquetWriter {
    /// Create all three Parquet files in `dir`.
    pub fn new(dir: &Path) -> OutputResult<Self> {
        let trip_schema     = trip_schema();
        let activity_schema = activity_schema();
        let episode_schema  = episode_schema();

        Ok(Self {
            trips:      Some(open(dir, "trips.parquet", &trip_schema)?),
            activities: Some(open(dir, "activities.parquet", &activity_schema)?),
            episodes:   Some(open(dir, "vehicle_timetable.parquet", &episode_schema)?),
            trip_schema,
            activity_schema,
            episode_schema,
        })
    }
}

impl TimetableWriter for ParquetWriter {
    fn write_trips(&mut self, rows: &[TripRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.trips.as_mut() else {
            return Ok(());
        };

        let batch = RecordBatch::try_new(
            Arc::clone(&self.trip_schema),
            vec![
                utf8(rows.iter().map(|r| Some(r.person_id.as_str()))),
                utf8(rows.iter().map(|r| Some(r.vehicle_id.as_str()))),
                f64s(rows.iter().map(|r| Some(r.t_start))),
                f64s(rows.iter().map(|r| Some(r.t_end))),
                f64s(rows.iter().map(|r| Some(r.duration_s))),
                f64s(rows.iter().map(|r| Some(r.distance_m))),
                utf8(rows.iter().map(|r| Some(r.from_link.as_str()))),
                utf8(rows.iter().map(|r| Some(r.to_link.as_str()))),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_activities(&mut self, rows: &[ActivityRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.activities.as_mut() else {
            return Ok(());
        };

        let batch = RecordBatch::try_new(
            Arc::clone(&self.activity_schema),
            vec![
                utf8(rows.iter().map(|r| Some(r.person_id.as_str()))),
                utf8(rows.iter().map(|r| Some(r.activity_type.as_str()))),
                utf8(rows.iter().map(|r| Some(r.link_id.as_str()))),
                f64s(rows.iter().map(|r| Some(r.t_start))),
                f64s(rows.iter().map(|r| Some(r.t_end))),
                f64s(rows.iter().map(|r| Some(r.duration_s))),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn write_episodes(&mut self, rows: &[EpisodeRow]) -> OutputResult<()> {
        if rows.is_empty() {
            return Ok(());
        }
        let Some(writer) = self.episodes.as_mut() else {
            return Ok(());
        };

        let batch = RecordBatch::try_new(
            Arc::clone(&self.episode_schema),
            vec![
                utf8(rows.iter().map(|r| Some(r.vehicle_id.as_str()))),
                utf8(rows.iter().map(|r| Some(r.episode_type))),
                f64s(rows.iter().map(|r| Some(r.t_start))),
                f64s(rows.iter().map(|r| Some(r.t_end))),
                f64s(rows.iter().map(|r| Some(r.duration_s))),
                utf8(rows.iter().map(|r| r.link_id.as_deref())),
                f64s(rows.iter().map(|r| r.distance_m)),
                utf8(rows.iter().map(|r| r.activity_type.as_deref())),
                f64s(rows.iter().map(|r| r.x)),
                f64s(rows.iter().map(|r| r.y)),
            ],
        )?;
        writer.write(&batch)?;
        Ok(())
    }

    fn finish(&mut self) -> OutputResult<()> {
        for slot in [&mut self.trips, &mut self.activities, &mut self.episodes] {
            if let Some(w) = slot.take() {
                w.close()?;
            }
        }
        Ok(())
    }
}
