//! Pipeline observer trait for progress reporting and data-quality checks.

use tt_events::ReduceReport;
use tt_timetable::{EpisodeTimetable, MatchReport};

use crate::PipelineOutput;

/// Callbacks invoked by [`Pipeline::run`][crate::Pipeline::run] after each
/// stage.
///
/// All methods have default no-op implementations so implementors only need to
/// override what they care about.
///
/// # Example: stuck-vehicle alarm
///
/// ```rust,ignore
/// struct StuckAlarm;
///
/// impl PipelineObserver for StuckAlarm {
///     fn on_events_reduced(&mut self, report: &ReduceReport) {
///         if report.stuck_trips > 100 {
///             eprintln!("{} stuck trips, check the simulation", report.stuck_trips);
///         }
///     }
/// }
/// ```
pub trait PipelineObserver {
    /// Called once the whole event log has been reduced.
    fn on_events_reduced(&mut self, _report: &ReduceReport) {}

    /// Called with the stitched timetable, before activity matching.
    fn on_timetable_stitched(&mut self, _timetable: &EpisodeTimetable) {}

    /// Called after every parked episode has an activity.
    fn on_activities_matched(&mut self, _report: &MatchReport) {}

    /// Called once with the complete output.
    fn on_pipeline_end(&mut self, _output: &PipelineOutput) {}
}

/// A [`PipelineObserver`] that does nothing.
pub struct NoopObserver;

impl PipelineObserver for NoopObserver {}

/// Logs a one-line summary of every stage at `info` level, and data-quality
/// problems at `warn`.
#[derive(Debug, Default)]
pub struct LoggingObserver;

impl PipelineObserver for LoggingObserver {
    fn on_events_reduced(&mut self, r: &ReduceReport) {
        tracing::info!(
            events     = r.events_seen,
            ignored    = r.events_ignored,
            trips      = r.trips,
            activities = r.activities,
            "stage 1/3: event log reduced"
        );
        let dropped = r.stuck_trips + r.zero_duration_trips + r.reentries_ignored;
        if dropped > 0 || r.stuck_activities > 0 {
            tracing::warn!(
                stuck_trips      = r.stuck_trips,
                zero_duration    = r.zero_duration_trips,
                reentries        = r.reentries_ignored,
                stuck_activities = r.stuck_activities,
                "incomplete records dropped during reduction"
            );
        }
    }

    fn on_timetable_stitched(&mut self, timetable: &EpisodeTimetable) {
        tracing::info!(
            vehicles = timetable.vehicle_count(),
            episodes = timetable.len(),
            parked   = timetable.parked_count(),
            "stage 2/3: timetable stitched"
        );
    }

    fn on_activities_matched(&mut self, r: &MatchReport) {
        let share = if r.parked == 0 { 0.0 } else { r.matched as f64 / r.parked as f64 };
        tracing::info!(
            parked        = r.parked,
            matched       = r.matched,
            matched_share = format!("{:.1}%", share * 100.0),
            "stage 3/3: activities matched"
        );
    }

    fn on_pipeline_end(&mut self, output: &PipelineOutput) {
        tracing::info!(
            trips    = output.trips.len(),
            persons  = output.person_to_vehicle.len(),
            episodes = output.timetable.len(),
            "pipeline finished"
        );
    }
}
